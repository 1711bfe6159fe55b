//! Cancellable countdown ticker driving a round's lifetime.

use std::{future::Future, time::Duration};

use tokio::{task::JoinHandle, time::interval};

/// Decision returned by the tick callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockControl {
    /// Keep ticking.
    Continue,
    /// Stop the ticker; the round resolved or expired.
    Stop,
}

/// Owner of at most one spawned ticking task.
///
/// Starting an already-running clock is a guarded no-op so callers can never
/// end up with two concurrent tickers racing over the same round.
#[derive(Debug, Default)]
pub struct RoundClock {
    task: Option<JoinHandle<()>>,
}

impl RoundClock {
    /// Create a stopped clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin ticking at `period`, invoking `on_tick` once per elapsed period.
    ///
    /// No-op when a ticker is already live. The spawned task exits when the
    /// callback returns [`ClockControl::Stop`].
    pub fn start<F, Fut>(&mut self, period: Duration, mut on_tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ClockControl> + Send,
    {
        if self.is_running() {
            return;
        }

        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            // The first interval tick completes immediately; skip it so the
            // countdown starts after one full period.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if on_tick().await == ClockControl::Stop {
                    break;
                }
            }
        }));
    }

    /// Whether a ticker task is currently live.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Halt the ticker if one is live. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for RoundClock {
    fn drop(&mut self) {
        self.stop();
    }
}
