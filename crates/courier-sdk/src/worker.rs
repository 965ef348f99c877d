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

//! Background drain thread for postponed events.

use crate::bus::Bus;
use courier_core::{BusError, Result};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Configuration for a [`DrainWorker`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Maximum number of postponed events drained per wake-up.
    pub batch_size: usize,
    /// How long the worker blocks waiting for work before re-checking whether
    /// it was asked to stop. This bounds the latency of [`DrainWorker::stop`].
    pub poll_interval_ms: u64,
    /// Name given to the worker thread.
    pub thread_name: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            poll_interval_ms: 50,
            thread_name: "courier-drain".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Checks that every value is in range.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(BusError::InvalidConfig(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(BusError::InvalidConfig(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.thread_name.trim().is_empty() {
            return Err(BusError::InvalidConfig(
                "thread_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Default)]
struct WorkerStats {
    processed: AtomicU64,
    failures: AtomicU64,
}

/// A dedicated consumer thread that drains a bus's postponed events as soon
/// as they appear.
///
/// A callback that panics during a drain is logged and counted; the event it
/// was handling is consumed and the worker keeps draining.
pub struct DrainWorker {
    running: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
    handle: Option<thread::JoinHandle<()>>,
    thread_name: String,
}

impl DrainWorker {
    /// Starts a worker thread draining `bus`.
    ///
    /// # Errors
    /// [`BusError::InvalidConfig`] for an out-of-range configuration,
    /// [`BusError::WorkerSpawn`] if the OS refuses to create the thread.
    pub fn spawn(bus: &Bus, config: WorkerConfig) -> Result<Self> {
        config.validate()?;

        let running = Arc::new(AtomicBool::new(true));
        let stats = Arc::new(WorkerStats::default());
        let thread_name = config.thread_name.clone();

        let handle = {
            let bus = bus.clone();
            let running = Arc::clone(&running);
            let stats = Arc::clone(&stats);
            thread::Builder::new()
                .name(config.thread_name.clone())
                .spawn(move || drain_loop(&bus, &running, &stats, &config))
                .map_err(|e| BusError::WorkerSpawn(e.to_string()))?
        };

        Ok(Self {
            running,
            stats,
            handle: Some(handle),
            thread_name,
        })
    }

    /// Number of postponed events drained without a callback panicking.
    pub fn processed(&self) -> u64 {
        self.stats.processed.load(Ordering::Relaxed)
    }

    /// Number of postponed events whose dispatch panicked.
    pub fn failures(&self) -> u64 {
        self.stats.failures.load(Ordering::Relaxed)
    }

    /// Returns `true` until [`stop`](Self::stop) is called.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Signals the worker to stop and joins its thread.
    ///
    /// Events still queued stay on the bus for another consumer.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Drain worker '{}' terminated abnormally.", self.thread_name);
            }
        }
    }
}

impl Drop for DrainWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn drain_loop(bus: &Bus, running: &AtomicBool, stats: &WorkerStats, config: &WorkerConfig) {
    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    log::info!("Drain worker '{}' started.", config.thread_name);

    while running.load(Ordering::Relaxed) {
        if !bus.wait_for(poll_interval) {
            continue;
        }

        // One event per call so a panic is attributed to exactly one event.
        for _ in 0..config.batch_size {
            match panic::catch_unwind(AssertUnwindSafe(|| bus.process_limit(1))) {
                Ok(0) => break,
                Ok(processed) => {
                    stats.processed.fetch_add(processed as u64, Ordering::Relaxed);
                }
                Err(payload) => {
                    stats.failures.fetch_add(1, Ordering::Relaxed);
                    log::error!(
                        "Drain worker '{}': callback panicked: {}",
                        config.thread_name,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
    }

    log::info!("Drain worker '{}' stopped.", config.thread_name);
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
