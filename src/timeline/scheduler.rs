//! Fixed-interval tick drivers for timeline playback.
//!
//! A [`Scheduler`] calls a tick closure every interval until the returned
//! [`CancellationToken`] is cancelled.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::Handle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub type TickFn = Box<dyn FnMut() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    fn schedule(&self, interval: Duration, tick: TickFn) -> CancellationToken;
}

/// Runs ticks on a tokio runtime.
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    pub fn current() -> Result<Self> {
        let handle = Handle::try_current().context("tick scheduler needs a tokio runtime")?;
        Ok(Self::new(handle))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, interval: Duration, mut tick: TickFn) -> CancellationToken {
        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        self.handle.spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => tick(),
                    _ = token_clone.cancelled() => break,
                }
            }
        });

        cancel_token
    }
}

struct ManualTask {
    token: CancellationToken,
    tick: TickFn,
}

/// Test clock: ticks only run when [`ManualScheduler::fire`] is called.
#[derive(Default)]
pub struct ManualScheduler {
    tasks: Mutex<Vec<ManualTask>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapses one interval: every live task ticks once. Returns how many ticked.
    pub fn fire(&self) -> usize {
        let mut due = std::mem::take(&mut *self.lock());
        let mut fired = 0;

        for task in &mut due {
            if !task.token.is_cancelled() {
                (task.tick)();
                fired += 1;
            }
        }

        let mut tasks = self.lock();
        // tasks scheduled from inside a tick were pushed while `due` was out
        let scheduled_meanwhile = std::mem::take(&mut *tasks);
        *tasks = due
            .into_iter()
            .chain(scheduled_meanwhile)
            .filter(|task| !task.token.is_cancelled())
            .collect();
        fired
    }

    /// Fires up to `times` intervals, stopping early once nothing is live.
    pub fn fire_times(&self, times: usize) -> usize {
        (0..times).take_while(|_| self.fire() > 0).count()
    }

    pub fn active_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|task| !task.token.is_cancelled())
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ManualTask>> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, _interval: Duration, tick: TickFn) -> CancellationToken {
        let token = CancellationToken::new();
        self.lock().push(ManualTask {
            token: token.clone(),
            tick,
        });
        token
    }
}
