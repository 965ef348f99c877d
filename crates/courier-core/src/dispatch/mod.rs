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

//! Immediate and deferred dispatch.
//!
//! The [`DispatchCore`] owns the callback registry and the postpone queue,
//! each behind its own lock:
//!
//! ```text
//!  post ────────► RwLock<CallbackRegistry> ──► callbacks (calling thread)
//!                        ▲
//!  postpone ──► Mutex<VecDeque> + Condvar ──► process_limit (draining thread)
//!                        │
//!          wait / wait_for
//! ```
//!
//! Waiting only touches the queue's mutex and condition variable, so a
//! consumer blocked in [`DispatchCore::wait`] never holds up producers or
//! subscription changes.

mod dispatcher;
mod queue;

pub use self::dispatcher::DispatchCore;
