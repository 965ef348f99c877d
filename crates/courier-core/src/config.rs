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

//! Configuration of the dispatch core.

use crate::error::{BusError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a [`DispatchCore`](crate::DispatchCore).
///
/// Missing fields fall back to their defaults when deserialized, so a partial
/// document such as `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Number of deferred events the postpone queue can hold before it grows.
    pub initial_queue_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            initial_queue_capacity: 64,
        }
    }
}

impl DispatchConfig {
    /// Largest accepted [`initial_queue_capacity`](Self::initial_queue_capacity).
    ///
    /// The queue still grows past this on demand; only the up-front
    /// allocation is bounded.
    pub const MAX_INITIAL_QUEUE_CAPACITY: usize = 1 << 20;

    /// Sets the initial capacity of the deferred queue.
    pub fn with_initial_queue_capacity(mut self, capacity: usize) -> Self {
        self.initial_queue_capacity = capacity;
        self
    }

    /// Checks that the configuration can be used to build a dispatch core.
    ///
    /// # Errors
    /// [`BusError::InvalidConfig`] if `initial_queue_capacity` exceeds
    /// [`MAX_INITIAL_QUEUE_CAPACITY`](Self::MAX_INITIAL_QUEUE_CAPACITY).
    pub fn validate(&self) -> Result<()> {
        if self.initial_queue_capacity > Self::MAX_INITIAL_QUEUE_CAPACITY {
            return Err(BusError::InvalidConfig(format!(
                "initial_queue_capacity {} exceeds the maximum of {}",
                self.initial_queue_capacity,
                Self::MAX_INITIAL_QUEUE_CAPACITY
            )));
        }
        Ok(())
    }
}
