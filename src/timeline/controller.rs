use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::scheduler::Scheduler;
use super::state::{InitialPosition, TimelineState};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = false;

use crate::log_debug;

pub type RenderCallback = Arc<dyn Fn(usize) + Send + Sync>;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSnapshot {
    pub position: usize,
    pub is_playing: bool,
    pub week_count: usize,
}

struct Playback {
    state: TimelineState,
    ticker: Option<CancellationToken>,
    /// Bumped on every play/pause so a tick from an older run is ignored.
    generation: u64,
}

struct Shared {
    playback: Mutex<Playback>,
    render: RwLock<Option<RenderCallback>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Playback> {
        self.playback
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, position: usize) {
        let callback = self
            .render
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(position);
        }
    }
}

/// Playback state machine over week positions. Rendering is delegated to the
/// registered callback, which is invoked synchronously after every move.
#[derive(Clone)]
pub struct TimelineController {
    shared: Arc<Shared>,
    scheduler: Arc<dyn Scheduler>,
    tick_interval: Duration,
}

impl TimelineController {
    pub fn new(
        week_count: usize,
        initial: InitialPosition,
        scheduler: Arc<dyn Scheduler>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                playback: Mutex::new(Playback {
                    state: TimelineState::new(week_count, initial),
                    ticker: None,
                    generation: 0,
                }),
                render: RwLock::new(None),
            }),
            scheduler,
            tick_interval,
        }
    }

    pub fn on_position<F>(&self, callback: F)
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        *self
            .shared
            .render
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Arc::new(callback));
    }

    pub fn snapshot(&self) -> TimelineSnapshot {
        let playback = self.shared.lock();
        TimelineSnapshot {
            position: playback.state.position,
            is_playing: playback.state.is_playing,
            week_count: playback.state.week_count,
        }
    }

    pub fn position(&self) -> usize {
        self.shared.lock().state.position
    }

    pub fn is_playing(&self) -> bool {
        self.shared.lock().state.is_playing
    }

    pub fn week_count(&self) -> usize {
        self.shared.lock().state.week_count
    }

    /// Clamps `position` into range, stores it and notifies the renderer.
    /// Does not touch playback; use [`Self::scrub_to`] for user input.
    /// An empty timeline stays at 0 and renders nothing.
    pub fn set_position(&self, position: i64) -> usize {
        let Some(position) = self.shared.lock().state.set_position(position) else {
            return 0;
        };
        self.shared.notify(position);
        position
    }

    /// User-driven move: pauses first so the tick driver cannot overwrite it.
    pub fn scrub_to(&self, position: i64) -> usize {
        self.pause();
        self.set_position(position)
    }

    pub fn step_forward(&self) -> usize {
        let current = self.position() as i64;
        self.scrub_to(current + 1)
    }

    pub fn step_back(&self) -> usize {
        let current = self.position() as i64;
        self.scrub_to(current - 1)
    }

    /// Starts auto-advance. No-op when already playing or when there are no weeks.
    pub fn play(&self) {
        let (generation, rewound_to) = {
            let mut playback = self.shared.lock();
            let was_at_end = playback.state.at_end();
            if !playback.state.begin_playing() {
                return;
            }
            playback.generation += 1;
            (
                playback.generation,
                was_at_end.then_some(playback.state.position),
            )
        };

        if let Some(position) = rewound_to {
            self.shared.notify(position);
        }

        let shared = Arc::clone(&self.shared);
        let token = self
            .scheduler
            .schedule(self.tick_interval, Box::new(move || tick(&shared, generation)));

        let mut playback = self.shared.lock();
        if playback.generation == generation && playback.state.is_playing {
            playback.ticker = Some(token);
        } else {
            // paused (or finished) before the ticker was registered
            token.cancel();
        }
        log_debug!("timeline playing from week {}", playback.state.position);
    }

    /// Stops auto-advance. Idempotent.
    pub fn pause(&self) {
        let ticker = {
            let mut playback = self.shared.lock();
            playback.state.stop();
            playback.generation += 1;
            playback.ticker.take()
        };
        if let Some(token) = ticker {
            token.cancel();
        }
    }
}

fn tick(shared: &Shared, generation: u64) {
    let (position, finished) = {
        let mut playback = shared.lock();
        if playback.generation != generation {
            return;
        }
        let Some(position) = playback.state.advance() else {
            return;
        };
        let finished = if playback.state.is_playing {
            None
        } else {
            playback.ticker.take()
        };
        (position, finished)
    };

    if let Some(token) = finished {
        token.cancel();
        log_debug!("timeline reached week {position}, pausing");
    }
    shared.notify(position);
}
