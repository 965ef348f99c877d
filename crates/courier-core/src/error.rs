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

//! Error types raised by the dispatch core and the public bus surface.

use thiserror::Error;

/// A specialized `Result` type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;

/// Errors produced by the event bus.
///
/// Callback failures are not represented here: a panicking callback unwinds
/// straight through `post` or the drain call that invoked it.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// A subscription operation was attempted on a listener that holds no bus,
    /// either because it was created empty or because its subscription was
    /// taken by another listener.
    #[error("listener is not bound to a bus")]
    UnboundListener,

    /// The reserved "no listener" id was used to subscribe or unsubscribe.
    #[error("listener id 0 is reserved and cannot own subscriptions")]
    InvalidListenerId,

    /// The drain worker thread could not be started.
    #[error("failed to spawn drain worker: {0}")]
    WorkerSpawn(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::UnboundListener => "unbound_listener",
            BusError::InvalidListenerId => "invalid_listener_id",
            BusError::WorkerSpawn(_) => "worker_spawn",
            BusError::InvalidConfig(_) => "invalid_config",
        }
    }
}
