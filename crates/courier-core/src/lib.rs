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

//! # Courier Core
//!
//! Foundational crate of the courier event bus: the type-erased callback
//! registry, the thread-safe dispatch core with its deferred-delivery queue,
//! and the identifier, error and configuration types shared by the public
//! [`courier-sdk`] surface.
//!
//! [`courier-sdk`]: https://docs.rs/courier-sdk

#![warn(missing_docs)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod registry;

pub use config::DispatchConfig;
pub use dispatch::DispatchCore;
pub use error::{BusError, Result};
pub use event::{Event, ListenerId, TypeKey};
pub use registry::{Callback, CallbackRegistry};
