//! Coalescing guard for consumer-side leaderboard re-fetches.
//!
//! Ranking-change notifications can arrive in bursts; a viewer must never
//! stack one fetch per notification. The guard keeps a single fetch in
//! flight and folds every extra trigger into at most one follow-up run.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use futures::future::BoxFuture;
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};

use crate::dto::sse::ServerEvent;

/// Job executed on each (coalesced) trigger.
pub type RefreshJob = dyn Fn() -> BoxFuture<'static, ()> + Send + Sync;

/// Single-flight runner with one pending follow-up slot.
#[derive(Clone)]
pub struct CoalescedRefresher {
    inner: Arc<Inner>,
}

struct Inner {
    job: Box<RefreshJob>,
    running: AtomicBool,
    pending: AtomicBool,
}

impl CoalescedRefresher {
    /// Wrap `job` so concurrent triggers collapse instead of queueing.
    pub fn new<F>(job: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                job: Box::new(job),
                running: AtomicBool::new(false),
                pending: AtomicBool::new(false),
            }),
        }
    }

    /// Request a refresh.
    ///
    /// Starts the job when idle; otherwise marks a follow-up. Triggers beyond
    /// the marked follow-up are dropped, never queued.
    pub fn trigger(&self) {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            self.inner.pending.store(true, Ordering::SeqCst);
            return;
        }
        Self::spawn_runner(self.inner.clone());
    }

    /// Trigger the refresher from a stream of change notifications.
    ///
    /// Events carry no payload, so a lagged subscription folds into a single
    /// refresh; the task ends when the sending hub is dropped.
    pub fn drive_from(&self, mut receiver: broadcast::Receiver<ServerEvent>) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(_) | Err(RecvError::Lagged(_)) => this.trigger(),
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    fn spawn_runner(inner: Arc<Inner>) {
        tokio::spawn(async move {
            loop {
                (inner.job)().await;
                if !inner.pending.swap(false, Ordering::SeqCst) {
                    break;
                }
            }
            inner.running.store(false, Ordering::SeqCst);

            // A trigger that slipped in after the last pending check would be
            // lost with the runner gone; pick it up here.
            if inner.pending.swap(false, Ordering::SeqCst)
                && !inner.running.swap(true, Ordering::SeqCst)
            {
                Self::spawn_runner(inner);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use tokio::time::{Duration, sleep, timeout};

    use super::*;

    fn counting_refresher(delay: Duration) -> (CoalescedRefresher, Arc<AtomicU32>) {
        let runs = Arc::new(AtomicU32::new(0));
        let counter = runs.clone();
        let refresher = CoalescedRefresher::new(move || {
            let counter = counter.clone();
            Box::pin(async move {
                sleep(delay).await;
                counter.fetch_add(1, Ordering::SeqCst);
            })
        });
        (refresher, runs)
    }

    async fn wait_for_runs(runs: &Arc<AtomicU32>, wanted: u32) {
        timeout(Duration::from_secs(1), async {
            while runs.load(Ordering::SeqCst) < wanted {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("runs within deadline");
    }

    #[tokio::test]
    async fn single_trigger_runs_once() {
        let (refresher, runs) = counting_refresher(Duration::from_millis(10));
        refresher.trigger();
        wait_for_runs(&runs, 1).await;
        sleep(Duration::from_millis(50)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn burst_collapses_to_one_in_flight_plus_one_follow_up() {
        let (refresher, runs) = counting_refresher(Duration::from_millis(30));
        for _ in 0..6 {
            refresher.trigger();
        }
        wait_for_runs(&runs, 2).await;
        sleep(Duration::from_millis(100)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn notifications_from_a_hub_collapse_too() {
        let hub = crate::state::SseHub::new(16);
        let (refresher, runs) = counting_refresher(Duration::from_millis(30));
        let task = refresher.drive_from(hub.subscribe());

        for _ in 0..5 {
            hub.broadcast(ServerEvent::new(None, String::new()));
        }
        wait_for_runs(&runs, 1).await;
        sleep(Duration::from_millis(150)).await;
        assert!(runs.load(Ordering::SeqCst) <= 2);
        task.abort();
    }

    #[tokio::test]
    async fn trigger_after_completion_runs_again() {
        let (refresher, runs) = counting_refresher(Duration::from_millis(5));
        refresher.trigger();
        wait_for_runs(&runs, 1).await;
        refresher.trigger();
        wait_for_runs(&runs, 2).await;
    }
}
