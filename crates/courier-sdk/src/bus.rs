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

//! The bus facade.

use crate::listener::Listener;
use courier_core::{DispatchConfig, DispatchCore, Event, ListenerId, Result};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct Shared {
    core: DispatchCore,
    last_id: AtomicU64,
}

/// A thread-safe publish/subscribe bus.
///
/// `Bus` is cheap to clone: every clone shares the same dispatch core and id
/// counter. Subscriptions are usually owned by a [`Listener`], which removes
/// them when dropped; the raw id-based methods below exist for owners that
/// manage ids themselves.
#[derive(Clone)]
pub struct Bus {
    shared: Arc<Shared>,
}

impl Bus {
    /// Creates a bus with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    /// Creates a bus from `config`.
    pub fn with_config(config: DispatchConfig) -> Self {
        log::debug!("Bus initialized with {config:?}.");
        Self {
            shared: Arc::new(Shared {
                core: DispatchCore::with_config(&config),
                last_id: AtomicU64::new(0),
            }),
        }
    }

    /// Creates a bus from `config` after validating it.
    ///
    /// # Errors
    /// [`BusError::InvalidConfig`](courier_core::BusError::InvalidConfig) if
    /// the configuration is out of range.
    pub fn try_with_config(config: DispatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Issues a fresh listener id.
    ///
    /// Ids increase monotonically from 1 and are never reused. Once the
    /// counter is exhausted every further call returns [`ListenerId::NONE`],
    /// which the bus refuses as a subscription owner.
    pub fn new_listener_id(&self) -> ListenerId {
        match self
            .shared
            .last_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
                last.checked_add(1)
            }) {
            Ok(last) => ListenerId::new(last + 1),
            Err(_) => {
                log::error!("Listener ids exhausted; issuing {}.", ListenerId::NONE);
                ListenerId::NONE
            }
        }
    }

    /// Creates a [`Listener`] bound to this bus.
    pub fn listener(&self) -> Listener {
        Listener::new(self)
    }

    /// Registers `callback` for events of type `E` under `id`.
    pub fn listen<E, F>(&self, id: ListenerId, callback: F) -> Result<()>
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.shared.core.listen(id, callback)
    }

    /// Removes the callbacks `id` registered for events of type `E`.
    pub fn unlisten<E: Event>(&self, id: ListenerId) -> Result<()> {
        self.shared.core.unlisten::<E>(id)
    }

    /// Removes every callback `id` registered.
    pub fn unlisten_all(&self, id: ListenerId) -> Result<()> {
        self.shared.core.unlisten_all(id)
    }

    /// Dispatches `event` immediately, on the calling thread.
    ///
    /// Keep these callbacks fast; anything heavy belongs in
    /// [`postpone`](Self::postpone).
    pub fn post<E: Event>(&self, event: E) -> usize {
        self.shared.core.post(event)
    }

    /// Queues `event` for a later drain.
    pub fn postpone<E: Event>(&self, event: E) {
        self.shared.core.postpone(event)
    }

    /// Drains up to `max_count` postponed events on the calling thread.
    pub fn process_limit(&self, max_count: usize) -> usize {
        self.shared.core.process_limit(max_count)
    }

    /// Drains the postponed events queued when the call starts.
    pub fn process_all(&self) -> usize {
        self.shared.core.process_all()
    }

    /// Blocks until a postponed event is queued.
    pub fn wait(&self) -> bool {
        self.shared.core.wait()
    }

    /// Blocks until a postponed event is queued or `timeout` elapses.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        self.shared.core.wait_for(timeout)
    }

    /// Returns the number of queued postponed events (advisory).
    pub fn postponed_count(&self) -> usize {
        self.shared.core.postponed_count()
    }

    /// Returns the number of callbacks registered for `E`.
    pub fn listener_count<E: Event>(&self) -> usize {
        self.shared.core.listener_count::<E>()
    }

    /// Returns the underlying dispatch core.
    pub fn core(&self) -> &DispatchCore {
        &self.shared.core
    }

    /// Returns `true` if both handles share the same dispatch core.
    pub fn same_bus(&self, other: &Bus) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("core", &self.shared.core)
            .field("last_id", &self.shared.last_id.load(Ordering::Relaxed))
            .finish()
    }
}
