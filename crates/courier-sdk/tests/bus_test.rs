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

use courier_sdk::{Bus, BusError, Listener};
use crossbeam_channel::unbounded;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// --- EVENTS FOR THIS TEST ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OrderPlaced {
    order: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OrderShipped {
    order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Note(String);

#[test]
fn test_immediate_and_deferred_delivery() {
    let bus = Bus::new();
    let (tx, rx) = unbounded();

    let listener = Listener::new(&bus);
    let placed_tx = tx.clone();
    listener
        .listen(move |e: &OrderPlaced| placed_tx.send(format!("placed {}", e.order)).unwrap())
        .unwrap();
    listener
        .listen(move |e: &OrderShipped| tx.send(format!("shipped {}", e.order)).unwrap())
        .unwrap();

    bus.post(OrderPlaced { order: 1 });
    bus.postpone(OrderShipped { order: 1 });
    bus.postpone(OrderPlaced { order: 2 });

    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["placed 1"]);
    assert_eq!(bus.postponed_count(), 2);

    assert_eq!(bus.process_all(), 2);
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec!["shipped 1", "placed 2"]
    );
}

#[test]
fn test_events_are_moved_not_shared() {
    let bus = Bus::new();
    let (tx, rx) = unbounded();
    let listener = bus.listener();
    listener
        .listen(move |note: &Note| tx.send(note.clone()).unwrap())
        .unwrap();

    bus.postpone(Note("deferred".to_string()));
    bus.post(Note("now".to_string()));
    bus.process_limit(1);

    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![Note("now".to_string()), Note("deferred".to_string())]
    );
}

#[test]
fn test_moved_listener_keeps_subscriptions_on_another_thread() {
    let bus = Bus::new();
    let hits = Arc::new(AtomicUsize::new(0));

    let mut original = Listener::new(&bus);
    {
        let hits = Arc::clone(&hits);
        original
            .listen(move |_: &OrderPlaced| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
    }

    let moved = original.take();
    assert_eq!(
        original.listen(|_: &OrderPlaced| {}),
        Err(BusError::UnboundListener)
    );

    let (release_tx, release_rx) = unbounded::<()>();
    let owner = thread::spawn(move || {
        let listener = moved;
        assert!(listener.is_bound());
        release_rx.recv().expect("release signal");
        drop(listener);
    });

    bus.post(OrderPlaced { order: 7 });
    release_tx.send(()).unwrap();
    owner.join().expect("owner thread panicked");
    bus.post(OrderPlaced { order: 8 });

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(bus.listener_count::<OrderPlaced>(), 0);
}

#[test]
fn test_consumer_thread_drains_with_wait() {
    const EVENTS: u32 = 100;
    let bus = Bus::new();
    let (tx, rx) = unbounded();
    let listener = bus.listener();
    listener
        .listen(move |e: &OrderPlaced| tx.send(e.order).unwrap())
        .unwrap();

    let consumer = {
        let bus = bus.clone();
        thread::spawn(move || {
            let mut drained = 0;
            while drained < EVENTS as usize {
                if bus.wait_for(Duration::from_secs(5)) {
                    drained += bus.process_limit(8);
                } else {
                    break;
                }
            }
            drained
        })
    };

    for order in 0..EVENTS {
        bus.postpone(OrderPlaced { order });
    }

    assert_eq!(consumer.join().expect("consumer panicked"), EVENTS as usize);
    // A single producer thread: the drain preserves its FIFO order.
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        (0..EVENTS).collect::<Vec<_>>()
    );
}

#[test]
fn test_concurrent_subscription_churn_while_posting() {
    let bus = Bus::new();
    let stable_hits = Arc::new(AtomicUsize::new(0));
    let stable = bus.listener();
    {
        let stable_hits = Arc::clone(&stable_hits);
        stable
            .listen(move |_: &OrderPlaced| {
                stable_hits.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
    }

    let churners: Vec<_> = (0..4)
        .map(|_| {
            let bus = bus.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let listener = bus.listener();
                    listener.listen(|_: &OrderPlaced| {}).unwrap();
                    listener.listen(|_: &OrderShipped| {}).unwrap();
                }
            })
        })
        .collect();

    let posters: Vec<_> = (0..4)
        .map(|_| {
            let bus = bus.clone();
            thread::spawn(move || {
                for order in 0..500 {
                    bus.post(OrderPlaced { order });
                    bus.post(OrderShipped { order });
                }
            })
        })
        .collect();

    for handle in churners.into_iter().chain(posters) {
        handle.join().expect("worker thread panicked");
    }

    assert_eq!(stable_hits.load(Ordering::SeqCst), 4 * 500);
    assert_eq!(bus.listener_count::<OrderPlaced>(), 1);
    assert_eq!(bus.listener_count::<OrderShipped>(), 0);
}

#[test]
fn test_blocked_wait_returns_after_postpone() {
    let bus = Bus::new();
    let waiter = {
        let bus = bus.clone();
        thread::spawn(move || bus.wait())
    };

    thread::sleep(Duration::from_millis(20));
    bus.postpone(OrderShipped { order: 3 });

    assert!(waiter.join().expect("waiter panicked"));
    assert!(!Bus::new().wait_for(Duration::from_millis(0)));
}
