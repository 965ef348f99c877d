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

//! # Courier SDK
//!
//! The stable, public-facing API of the courier event bus.
//!
//! Producers post strongly typed events by value; consumers register
//! per-event-type callbacks through a [`Listener`] and receive events either
//! synchronously, on the poster's thread, or deferred, when a consumer thread
//! drains the postponed queue (by hand or with a [`DrainWorker`]).
//!
//! ```rust
//! use courier_sdk::{Bus, Listener};
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Clone, Copy)]
//! struct Scored(u32);
//!
//! let bus = Bus::new();
//! let total = Arc::new(AtomicU32::new(0));
//!
//! let listener = Listener::new(&bus);
//! let sink = Arc::clone(&total);
//! listener
//!     .listen(move |event: &Scored| {
//!         sink.fetch_add(event.0, Ordering::SeqCst);
//!     })
//!     .unwrap();
//!
//! bus.post(Scored(2));
//! bus.postpone(Scored(40));
//! assert_eq!(bus.process_limit(10), 1);
//! assert_eq!(total.load(Ordering::SeqCst), 42);
//!
//! // Dropping the listener removes its callbacks.
//! drop(listener);
//! bus.post(Scored(1000));
//! assert_eq!(total.load(Ordering::SeqCst), 42);
//! ```

#![warn(missing_docs)]

mod bus;
mod listener;
mod worker;

pub use bus::Bus;
pub use listener::Listener;
pub use worker::{DrainWorker, WorkerConfig};

pub use courier_core::{BusError, DispatchConfig, DispatchCore, Event, ListenerId, Result, TypeKey};
