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

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one subscription owner on a bus.
///
/// Ids are issued by the bus, starting above the reserved [`ListenerId::NONE`]
/// sentinel. All callbacks registered under one id are removed together when
/// the owner unsubscribes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListenerId(u64);

impl ListenerId {
    /// The reserved "no listener" value. It never owns subscriptions.
    pub const NONE: ListenerId = ListenerId(0);

    /// Wraps a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns `true` for the reserved sentinel.
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<u64> for ListenerId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}
