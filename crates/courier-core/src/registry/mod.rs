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

//! The type-erased callback registry.
//!
//! The [`CallbackRegistry`] maps each event [`TypeKey`] to one homogeneous
//! [`CallbackVector<E>`], stored behind the object-safe [`CallbackSlot`]
//! trait. The concrete collection is only ever created and read by the generic
//! methods that computed its key from `E`, so every downcast is checked and
//! cannot fail in practice.
//!
//! The registry itself is not synchronized; the
//! [`DispatchCore`](crate::DispatchCore) wraps it in a reader-writer lock.

mod slot;

pub use self::slot::{Callback, CallbackSlot, CallbackVector, Detached};

use crate::event::{Event, ListenerId, TypeKey};
use std::collections::HashMap;
use std::fmt;

/// Type-erased mapping from event type to its registered callbacks.
#[derive(Default)]
pub struct CallbackRegistry {
    slots: HashMap<TypeKey, Box<dyn CallbackSlot>>,
}

impl CallbackRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Appends `callback` for events of type `E`, owned by `id`.
    ///
    /// The collection for `E` is created on first use.
    pub fn add<E: Event>(&mut self, id: ListenerId, callback: Callback<E>) {
        let slot = self
            .slots
            .entry(TypeKey::of::<E>())
            .or_insert_with(|| Box::new(CallbackVector::<E>::new()));

        match slot.as_any_mut().downcast_mut::<CallbackVector<E>>() {
            Some(vector) => vector.push(id, callback),
            None => {
                // Keys are derived from `E` on every path, so the slot is always a `CallbackVector<E>`.
                debug_assert!(false, "callback slot type mismatch");
                log::error!(
                    "Callback slot for {} holds a foreign collection; registration dropped.",
                    TypeKey::of::<E>()
                );
            }
        }
    }

    /// Removes every callback owned by `id` for events of type `E`.
    ///
    /// Returns the removed callbacks. Callers holding a lock around the
    /// registry must release it before dropping them.
    pub fn remove<E: Event>(&mut self, id: ListenerId) -> Detached {
        self.remove_key(TypeKey::of::<E>(), id)
    }

    /// Removes every callback owned by `id` for the event type `key`.
    pub fn remove_key(&mut self, key: TypeKey, id: ListenerId) -> Detached {
        let Some(slot) = self.slots.get_mut(&key) else {
            return Detached::new();
        };
        let removed = slot.remove_listener(id);
        if slot.is_empty() {
            self.slots.remove(&key);
        }
        removed
    }

    /// Removes every callback owned by `id`, across all event types.
    ///
    /// Collections left empty are pruned. Returns the removed callbacks, to be
    /// dropped by the caller; calling this for an id without registrations is
    /// a no-op.
    pub fn remove_all(&mut self, id: ListenerId) -> Detached {
        let mut removed = Detached::new();
        self.slots.retain(|_, slot| {
            removed.extend(slot.remove_listener(id));
            !slot.is_empty()
        });
        removed
    }

    /// Returns the collection registered for `E`, if any.
    pub fn get<E: Event>(&self) -> Option<&CallbackVector<E>> {
        self.slots
            .get(&TypeKey::of::<E>())
            .and_then(|slot| slot.as_any().downcast_ref::<CallbackVector<E>>())
    }

    /// Copies the callbacks currently registered for `E`, in registration order.
    ///
    /// Returns `None` when nothing listens to `E`.
    pub fn snapshot<E: Event>(&self) -> Option<CallbackVector<E>> {
        self.get::<E>().map(CallbackVector::snapshot)
    }

    /// Invokes every callback registered for `E` with `event`, in place.
    ///
    /// Meant for direct use of an unshared registry. Behind a lock, take a
    /// [`snapshot`](Self::snapshot) instead so user code runs unlocked.
    /// Returns the number of callbacks invoked, zero when nothing listens.
    pub fn for_each<E: Event>(&self, event: &E) -> usize {
        self.get::<E>().map_or(0, |vector| vector.for_each(event))
    }

    /// Returns the number of callbacks registered for `E`.
    pub fn listener_count<E: Event>(&self) -> usize {
        self.slots
            .get(&TypeKey::of::<E>())
            .map_or(0, |slot| slot.len())
    }

    /// Returns `true` if `id` owns a callback for `E`.
    pub fn is_listening<E: Event>(&self, id: ListenerId) -> bool {
        self.get::<E>().is_some_and(|vector| vector.contains(id))
    }

    /// Returns the number of event types with at least one callback.
    pub fn event_type_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no callbacks are registered at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().map(|(key, slot)| (key, slot.len())))
            .finish()
    }
}
