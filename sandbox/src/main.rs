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

use anyhow::Result;
use courier_sdk::{Bus, DrainWorker, Listener, WorkerConfig};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct PlayerJoined {
    name: String,
}

#[derive(Debug, Clone, Copy)]
struct ScoreChanged {
    player: u32,
    delta: i32,
}

#[derive(Debug, Clone, Copy)]
struct RoundOver {
    round: u32,
}

/// Keeps a running total of score changes for as long as it is alive.
struct ScoreBoard {
    total: Arc<AtomicU32>,
    _listener: Listener,
}

impl ScoreBoard {
    fn new(bus: &Bus) -> Result<Self> {
        let total = Arc::new(AtomicU32::new(0));
        let listener = Listener::new(bus);

        let sink = Arc::clone(&total);
        listener.listen(move |event: &ScoreChanged| {
            sink.fetch_add(event.delta.unsigned_abs(), Ordering::Relaxed);
            log::debug!("Player {} scored {}.", event.player, event.delta);
        })?;
        listener.listen(|event: &RoundOver| {
            log::info!("Round {} is over.", event.round);
        })?;

        Ok(Self {
            total,
            _listener: listener,
        })
    }

    fn total(&self) -> u32 {
        self.total.load(Ordering::Relaxed)
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let bus = Bus::new();

    // Immediate delivery runs on the posting thread.
    let lobby = bus.listener();
    lobby.listen(|event: &PlayerJoined| log::info!("{} joined the lobby.", event.name))?;
    bus.post(PlayerJoined {
        name: "ada".to_string(),
    });

    // Deferred delivery is drained by a dedicated worker thread.
    let mut worker = DrainWorker::spawn(&bus, WorkerConfig::default())?;
    let board = ScoreBoard::new(&bus)?;

    const PLAYERS: u32 = 4;
    const CHANGES_PER_PLAYER: i32 = 25;
    let producers: Vec<_> = (0..PLAYERS)
        .map(|player| {
            let bus = bus.clone();
            thread::spawn(move || {
                for delta in 1..=CHANGES_PER_PLAYER {
                    bus.postpone(ScoreChanged { player, delta });
                }
            })
        })
        .collect();
    for producer in producers {
        if producer.join().is_err() {
            log::error!("A producer thread panicked.");
        }
    }
    bus.postpone(RoundOver { round: 1 });

    // The worker counts an event once its callbacks have returned, so this
    // waits for the last event to finish, not just to leave the queue.
    let sent = u64::from(PLAYERS) * CHANGES_PER_PLAYER as u64 + 1;
    let deadline = Instant::now() + Duration::from_secs(5);
    while worker.processed() + worker.failures() < sent {
        if Instant::now() >= deadline {
            log::warn!("Gave up waiting for the worker to drain {sent} events.");
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    worker.stop();

    log::info!(
        "Worker drained {} events ({} failures); total score {}.",
        worker.processed(),
        worker.failures(),
        board.total()
    );

    // Dropping the board removes its subscriptions; later events go unheard.
    drop(board);
    bus.post(ScoreChanged { player: 0, delta: 100 });
    log::info!(
        "ScoreChanged listeners after the board is gone: {}",
        bus.listener_count::<ScoreChanged>()
    );

    Ok(())
}
