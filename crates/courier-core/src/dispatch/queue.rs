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

//! The blocking FIFO of postponed dispatches.

use super::DispatchCore;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A postponed dispatch. It captures one event and fans it out against the
/// registry as it is when the closure runs.
pub(crate) type DeferredEvent = Box<dyn FnOnce(&DispatchCore) + Send>;

/// Mutex-protected queue paired with the condition variable drain threads
/// wait on.
pub(crate) struct DeferredQueue {
    events: Mutex<VecDeque<DeferredEvent>>,
    event_waiting: Condvar,
}

impl DeferredQueue {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            event_waiting: Condvar::new(),
        }
    }

    // The lock is never held while user code runs, so a poisoned guard still
    // protects a consistent queue.
    fn lock(&self) -> MutexGuard<'_, VecDeque<DeferredEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `event` and wakes one waiting drain thread.
    pub(crate) fn push(&self, event: DeferredEvent) {
        self.lock().push_back(event);
        self.event_waiting.notify_one();
    }

    /// Removes the oldest entry. The lock is released before returning, so
    /// the caller runs the closure unlocked.
    pub(crate) fn pop(&self) -> Option<DeferredEvent> {
        self.lock().pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Blocks until the queue is non-empty.
    pub(crate) fn wait(&self) -> bool {
        let events = self
            .event_waiting
            .wait_while(self.lock(), |events| events.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        !events.is_empty()
    }

    /// Blocks until the queue is non-empty or `timeout` elapses.
    ///
    /// The predicate is re-checked after every wake-up, so a spurious wake
    /// never reports work that is not there.
    pub(crate) fn wait_for(&self, timeout: Duration) -> bool {
        let (events, _) = self
            .event_waiting
            .wait_timeout_while(self.lock(), timeout, |events| events.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        !events.is_empty()
    }
}
