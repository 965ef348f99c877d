// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::queue::{DeferredEvent, DeferredQueue};
use crate::config::DispatchConfig;
use crate::error::{BusError, Result};
use crate::event::{Event, ListenerId, TypeKey};
use crate::registry::{Callback, CallbackRegistry};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// Thread-safe dispatch core of the event bus.
///
/// Any thread may post, postpone, listen or unlisten concurrently. Consumer
/// threads drain postponed events with [`process_limit`](Self::process_limit),
/// optionally blocking in [`wait`](Self::wait) or [`wait_for`](Self::wait_for)
/// until work appears.
///
/// ### Dispatch rules
/// - `post` reads a consistent snapshot of the callbacks for its event type
///   under the shared lock, releases the lock, then invokes them in
///   registration order on the calling thread. A listener removed while a post
///   is already in flight may therefore be invoked once more by that post.
/// - Callbacks may post, postpone, listen or unlisten on the same core.
/// - Postponed events are drained in FIFO order and see the registry as it is
///   at drain time, not at postpone time.
/// - A panicking callback unwinds to whoever called `post` or the drain; the
///   remaining callbacks of that pass are skipped and a drained event is not
///   retried.
pub struct DispatchCore {
    registry: RwLock<CallbackRegistry>,
    queue: DeferredQueue,
}

impl DispatchCore {
    /// Creates a dispatch core with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&DispatchConfig::default())
    }

    /// Creates a dispatch core from `config`.
    ///
    /// An initial queue capacity above
    /// [`DispatchConfig::MAX_INITIAL_QUEUE_CAPACITY`] is clamped to it; use
    /// [`DispatchConfig::validate`] to reject such configurations instead.
    pub fn with_config(config: &DispatchConfig) -> Self {
        let capacity = config
            .initial_queue_capacity
            .min(DispatchConfig::MAX_INITIAL_QUEUE_CAPACITY);
        if capacity < config.initial_queue_capacity {
            log::warn!(
                "Initial queue capacity {} clamped to {capacity}.",
                config.initial_queue_capacity
            );
        }
        Self {
            registry: RwLock::new(CallbackRegistry::new()),
            queue: DeferredQueue::with_capacity(capacity),
        }
    }

    // Structural mutations never run user code, so a poisoned registry is
    // still consistent.
    fn read_registry(&self) -> RwLockReadGuard<'_, CallbackRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_registry(&self) -> RwLockWriteGuard<'_, CallbackRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_id(id: ListenerId) -> Result<()> {
        if id.is_none() {
            log::warn!("Rejected subscription change for reserved {id}.");
            return Err(BusError::InvalidListenerId);
        }
        Ok(())
    }

    /// Registers `callback` for events of type `E` under `id`.
    ///
    /// Registering several callbacks under the same id accumulates independent
    /// entries.
    ///
    /// # Errors
    /// [`BusError::InvalidListenerId`] if `id` is [`ListenerId::NONE`].
    pub fn listen<E, F>(&self, id: ListenerId, callback: F) -> Result<()>
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.listen_shared(id, Arc::new(callback))
    }

    /// Registers an already shared callback for events of type `E` under `id`.
    pub fn listen_shared<E: Event>(&self, id: ListenerId, callback: Callback<E>) -> Result<()> {
        Self::check_id(id)?;
        self.write_registry().add::<E>(id, callback);
        log::debug!("{id} listens to {}.", TypeKey::of::<E>());
        Ok(())
    }

    /// Removes the callbacks `id` registered for events of type `E`.
    pub fn unlisten<E: Event>(&self, id: ListenerId) -> Result<()> {
        Self::check_id(id)?;
        // The write guard ends with this statement. Captured state is dropped
        // below, unlocked, since its `Drop` may unlisten on this core.
        let detached = self.write_registry().remove::<E>(id);
        log::debug!(
            "{id} stopped listening to {} ({} callbacks removed).",
            TypeKey::of::<E>(),
            detached.len()
        );
        drop(detached);
        Ok(())
    }

    /// Removes every callback `id` registered, across all event types.
    ///
    /// Calling this for an id without registrations is a no-op.
    pub fn unlisten_all(&self, id: ListenerId) -> Result<()> {
        Self::check_id(id)?;
        let detached = self.write_registry().remove_all(id);
        log::debug!(
            "{id} unsubscribed from everything ({} callbacks removed).",
            detached.len()
        );
        drop(detached);
        Ok(())
    }

    /// Dispatches `event` to every callback registered for `E`, on the calling
    /// thread, before returning.
    ///
    /// Returns the number of callbacks invoked. Having no listeners is a
    /// normal outcome and returns zero.
    pub fn post<E: Event>(&self, event: E) -> usize {
        self.post_ref(&event)
    }

    /// Dispatches a borrowed event. See [`post`](Self::post).
    pub fn post_ref<E: Event>(&self, event: &E) -> usize {
        // The read guard is a temporary of this statement; callbacks run unlocked.
        let Some(callbacks) = self.read_registry().snapshot::<E>() else {
            log::trace!("No listeners for {}.", TypeKey::of::<E>());
            return 0;
        };

        log::trace!(
            "Posting {} to {} listeners.",
            TypeKey::of::<E>(),
            callbacks.len()
        );
        callbacks.for_each(event)
    }

    /// Queues `event` for a later drain and wakes one waiting drain thread.
    ///
    /// The listeners are looked up when the event is drained.
    pub fn postpone<E: Event>(&self, event: E) {
        log::trace!("Postponing {}.", TypeKey::of::<E>());
        let deferred: DeferredEvent = Box::new(move |core: &DispatchCore| {
            core.post_ref(&event);
        });
        self.queue.push(deferred);
    }

    /// Drains up to `max_count` postponed events in FIFO order on the calling
    /// thread.
    ///
    /// Returns the number of events processed, which is smaller than
    /// `max_count` when the queue empties first. Never blocks waiting for work.
    pub fn process_limit(&self, max_count: usize) -> usize {
        let mut processed = 0;
        while processed < max_count {
            let Some(deferred) = self.queue.pop() else {
                break;
            };
            deferred(self);
            processed += 1;
        }
        if processed > 0 {
            log::trace!("Processed {processed} postponed events.");
        }
        processed
    }

    /// Drains the events that are queued when the call starts.
    ///
    /// Events postponed by callbacks during this drain are left for the next
    /// call, so a callback that keeps re-postponing cannot pin the caller.
    pub fn process_all(&self) -> usize {
        self.process_limit(self.queue.len())
    }

    /// Blocks until at least one postponed event is queued, then returns `true`.
    pub fn wait(&self) -> bool {
        self.queue.wait()
    }

    /// Blocks until at least one postponed event is queued or `timeout`
    /// elapses.
    ///
    /// Returns `false` on timeout with an empty queue.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        self.queue.wait_for(timeout)
    }

    /// Returns the number of queued postponed events.
    ///
    /// Advisory only: it may be stale as soon as it returns.
    pub fn postponed_count(&self) -> usize {
        self.queue.len()
    }

    /// Returns the number of callbacks registered for `E`.
    pub fn listener_count<E: Event>(&self) -> usize {
        self.read_registry().listener_count::<E>()
    }

    /// Returns `true` if `id` has a callback registered for `E`.
    pub fn is_listening<E: Event>(&self, id: ListenerId) -> bool {
        self.read_registry().is_listening::<E>(id)
    }
}

impl Default for DispatchCore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DispatchCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchCore")
            .field("registry", &*self.read_registry())
            .field("postponed", &self.postponed_count())
            .finish()
    }
}
