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

//! Scoped subscription handles.

use crate::bus::Bus;
use courier_core::{BusError, Event, ListenerId, Result};

/// Owns one listener id on a [`Bus`] and every subscription made through it.
///
/// Dropping a bound `Listener` (or overwriting it by assignment) removes all
/// of its callbacks, so no callback outlives its owner. A listener cannot be
/// cloned: two handles must never own the same id.
///
/// An unbound listener, created with [`Listener::dummy`] or left behind by
/// [`Listener::take`], rejects every operation with
/// [`BusError::UnboundListener`].
#[derive(Debug, Default)]
pub struct Listener {
    id: ListenerId,
    bus: Option<Bus>,
}

impl Listener {
    /// Creates a listener bound to `bus` with a fresh id.
    pub fn new(bus: &Bus) -> Self {
        let id = bus.new_listener_id();
        log::debug!("Created {id}.");
        Self {
            id,
            bus: Some(bus.clone()),
        }
    }

    /// Creates an unbound listener.
    pub fn dummy() -> Self {
        Self::default()
    }

    /// Returns the id this listener owns, or [`ListenerId::NONE`] when unbound.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Returns `true` if the listener is bound to a bus.
    pub fn is_bound(&self) -> bool {
        self.bus.is_some()
    }

    fn bus(&self) -> Result<&Bus> {
        self.bus.as_ref().ok_or(BusError::UnboundListener)
    }

    /// Registers `callback` for events of type `E`.
    ///
    /// # Errors
    /// [`BusError::UnboundListener`] if the listener holds no bus.
    pub fn listen<E, F>(&self, callback: F) -> Result<()>
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.bus()?.listen(self.id, callback)
    }

    /// Removes this listener's callbacks for events of type `E`.
    pub fn unlisten<E: Event>(&self) -> Result<()> {
        self.bus()?.unlisten::<E>(self.id)
    }

    /// Removes all of this listener's callbacks. The listener stays bound and
    /// can subscribe again.
    pub fn unlisten_all(&self) -> Result<()> {
        self.bus()?.unlisten_all(self.id)
    }

    /// Moves the subscription out of `self` into a new listener.
    ///
    /// The returned listener owns the id and its existing callbacks; `self`
    /// is left unbound.
    #[must_use = "dropping the returned listener removes its subscriptions"]
    pub fn take(&mut self) -> Listener {
        std::mem::take(self)
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        // A listener issued after id exhaustion holds `NONE` and owns nothing.
        if let Some(bus) = self.bus.take().filter(|_| !self.id.is_none()) {
            if let Err(e) = bus.unlisten_all(self.id) {
                log::warn!("Failed to release {}: {e}", self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug, Clone, Copy)]
    struct Ping;

    #[derive(Debug, Clone, Copy)]
    struct Pong;

    fn counter(hits: &Arc<AtomicUsize>) -> impl Fn(&Ping) + Send + Sync + 'static {
        let hits = Arc::clone(hits);
        move |_: &Ping| {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_dummy_listener_is_unbound() {
        let listener = Listener::dummy();
        assert!(!listener.is_bound());
        assert!(listener.id().is_none());
        assert_eq!(listener.listen(|_: &Ping| {}), Err(BusError::UnboundListener));
        assert_eq!(listener.unlisten::<Ping>(), Err(BusError::UnboundListener));
        assert_eq!(listener.unlisten_all(), Err(BusError::UnboundListener));
    }

    #[test]
    fn test_drop_removes_every_subscription() {
        let bus = Bus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let listener = Listener::new(&bus);
            listener.listen::<Ping, _>(counter(&hits)).unwrap();
            listener.listen(|_: &Pong| {}).unwrap();
            assert_eq!(bus.post(Ping), 1);
        }

        assert_eq!(bus.listener_count::<Ping>(), 0);
        assert_eq!(bus.listener_count::<Pong>(), 0);
        bus.post(Ping);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_take_transfers_ownership() {
        let bus = Bus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let mut a = Listener::new(&bus);
        a.listen::<Ping, _>(counter(&hits)).unwrap();
        let id = a.id();

        let b = a.take();
        assert!(!a.is_bound());
        assert_eq!(a.listen(|_: &Ping| {}), Err(BusError::UnboundListener));
        assert_eq!(b.id(), id);

        // Dropping the emptied source must not touch the transferred callbacks.
        drop(a);
        bus.post(Ping);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        b.listen::<Ping, _>(counter(&hits)).unwrap();
        bus.post(Ping);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_reassignment_releases_previous_subscriptions() {
        let bus = Bus::new();
        let old_hits = Arc::new(AtomicUsize::new(0));
        let new_hits = Arc::new(AtomicUsize::new(0));

        let mut slot = Listener::new(&bus);
        slot.listen::<Ping, _>(counter(&old_hits)).unwrap();

        let replacement = Listener::new(&bus);
        replacement.listen::<Ping, _>(counter(&new_hits)).unwrap();
        slot = replacement;

        bus.post(Ping);
        assert_eq!(old_hits.load(Ordering::SeqCst), 0);
        assert_eq!(new_hits.load(Ordering::SeqCst), 1);
        assert!(slot.is_bound());
    }

    #[test]
    fn test_unlisten_all_keeps_listener_usable() {
        let bus = Bus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let listener = bus.listener();
        listener.listen::<Ping, _>(counter(&hits)).unwrap();

        listener.unlisten_all().unwrap();
        bus.post(Ping);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        listener.listen::<Ping, _>(counter(&hits)).unwrap();
        bus.post(Ping);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unlisten_one_type() {
        let bus = Bus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let listener = bus.listener();
        listener.listen::<Ping, _>(counter(&hits)).unwrap();
        listener.listen(|_: &Pong| {}).unwrap();

        listener.unlisten::<Ping>().unwrap();
        assert_eq!(bus.listener_count::<Ping>(), 0);
        assert_eq!(bus.listener_count::<Pong>(), 1);
    }

    #[test]
    fn test_dropping_listener_whose_callback_owns_another_listener() {
        let bus = Bus::new();
        let inner = bus.listener();
        inner.listen(|_: &Pong| {}).unwrap();

        let outer = bus.listener();
        outer
            .listen(move |_: &Ping| {
                let _held = &inner;
            })
            .unwrap();
        assert_eq!(bus.listener_count::<Pong>(), 1);

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        std::thread::spawn(move || {
            drop(outer);
            let _ = done_tx.send(());
        });

        assert!(done_rx.recv_timeout(Duration::from_secs(3)).is_ok());
        assert_eq!(bus.listener_count::<Ping>(), 0);
        assert_eq!(bus.listener_count::<Pong>(), 0);
    }
}
