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

//! Per-event-type callback storage.

use crate::event::ListenerId;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A subscriber callback for events of type `E`.
///
/// Callbacks are reference counted so a dispatch can clone the list it is
/// about to invoke and release the registry lock before running user code.
pub type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Callbacks taken out of the registry, erased to their owning handles.
///
/// A callback's captures may run arbitrary `Drop` code, including releasing a
/// listener on the same bus, so these must be dropped after the registry lock
/// is released.
pub type Detached = Vec<Box<dyn Any + Send>>;

/// An internal helper trait to operate on a type-erased `CallbackVector<E>`.
///
/// This allows the registry to remove listeners from every collection without
/// knowing the concrete event type of each one at compile time.
pub trait CallbackSlot: Send + Sync {
    /// Casts the trait object to `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Casts the trait object to `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Takes out every entry owned by `id`. The caller decides when the
    /// returned callbacks are dropped.
    fn remove_listener(&mut self, id: ListenerId) -> Detached;

    /// Returns the number of registered callbacks.
    fn len(&self) -> usize;

    /// Returns `true` if no callbacks are registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The insertion-ordered callbacks registered for one event type.
///
/// The same listener may appear several times; each registration is an
/// independent entry and all of them are removed together.
pub struct CallbackVector<E> {
    entries: Vec<(ListenerId, Callback<E>)>,
}

impl<E> CallbackVector<E> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a callback owned by `id`.
    pub fn push(&mut self, id: ListenerId, callback: Callback<E>) {
        self.entries.push((id, callback));
    }

    /// Takes out every entry owned by `id`, preserving the order of the rest.
    ///
    /// The removed callbacks are returned rather than dropped in place.
    pub fn remove(&mut self, id: ListenerId) -> Vec<Callback<E>> {
        let (removed, kept) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition::<Vec<_>, _>(|(owner, _)| *owner == id);
        self.entries = kept;
        removed.into_iter().map(|(_, callback)| callback).collect()
    }

    /// Returns `true` if `id` owns at least one entry.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|(owner, _)| *owner == id)
    }

    /// Copies the current entries, in registration order.
    ///
    /// The copy shares the callbacks, so it can be invoked after the lock
    /// guarding this collection is released.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Invokes every callback with `event`, in registration order.
    ///
    /// Returns the number of callbacks invoked. A panicking callback aborts
    /// the pass.
    pub fn for_each(&self, event: &E) -> usize {
        for (_, callback) in &self.entries {
            callback(event);
        }
        self.entries.len()
    }

    /// Returns the number of registered callbacks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Clone for CallbackVector<E> {
    fn clone(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(owner, callback)| (*owner, Arc::clone(callback)))
                .collect(),
        }
    }
}

impl<E> Default for CallbackVector<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for CallbackVector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(owner, _)| owner))
            .finish()
    }
}

// We implement the slot trait for any collection whose event type is `'static`.
impl<E: 'static> CallbackSlot for CallbackVector<E> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove_listener(&mut self, id: ListenerId) -> Detached {
        self.remove(id)
            .into_iter()
            .map(|callback| Box::new(callback) as Box<dyn Any + Send>)
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
