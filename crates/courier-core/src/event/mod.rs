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

//! Event identity: the [`Event`] marker trait, the [`TypeKey`] used to index
//! the registry, and the [`ListenerId`] that owns subscriptions.
//!
//! The bus is agnostic to what an event is. Any owned, sendable value type can
//! be posted; its Rust type alone selects which callbacks receive it.

mod listener_id;
mod type_key;

pub use self::listener_id::ListenerId;
pub use self::type_key::TypeKey;

/// Marker trait for values that can travel through the bus.
///
/// Implemented for every `Send + 'static` type, so user code never needs to
/// implement it by hand. `Send` is required because a postponed event is
/// carried to whichever thread drains the queue.
pub trait Event: Send + 'static {}

impl<T: Send + 'static> Event for T {}
