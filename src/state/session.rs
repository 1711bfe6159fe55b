//! Play session: one player's round lifecycle glued to scoring and submission.
//!
//! The session is shared as `Arc<Mutex<_>>`; the clock task and user-driven
//! calls all serialize on that mutex, so no two resolution paths can race for
//! the same round.

use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::warn;

use crate::{
    catalog::QuizItem,
    config::AppConfig,
    state::{
        clock::{ClockControl, RoundClock},
        progress::PlayerProgress,
        round::{Round, RoundError, RoundEvent, RoundPhase, TickOutcome},
        scoring::{self, Resolution, RoundResult},
    },
};

/// Wall-clock pace of the round countdown.
pub const ROUND_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Failure reported by a [`ScoreSubmitter`].
#[derive(Debug, Clone, Error)]
#[error("score submission failed: {0}")]
pub struct SubmitError(pub String);

/// Totals reported to the ledger after a round resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreReport {
    /// New authoritative total.
    pub score: u32,
    /// Current streak after the round.
    pub correct_streak: u32,
    /// Best streak after the round.
    pub best_streak: u32,
}

/// Transport seam between the session and the score ledger.
pub trait ScoreSubmitter: Send + Sync {
    /// Deliver a report to the ledger.
    fn submit(&self, report: ScoreReport) -> BoxFuture<'static, Result<(), SubmitError>>;
}

/// Observable state of the last fired submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// No submission fired yet.
    Idle,
    /// A submission is in flight.
    Pending,
    /// The last submission was acknowledged.
    Saved,
    /// The last submission failed; local totals may diverge from the server
    /// until the next successful one overwrites them.
    Failed,
}

/// One player's in-progress game.
pub struct PlaySession {
    config: AppConfig,
    round: Option<Round>,
    item: Option<QuizItem>,
    progress: PlayerProgress,
    clock: RoundClock,
    submitter: Arc<dyn ScoreSubmitter>,
    submit_status: watch::Sender<SubmitStatus>,
    tick_period: Duration,
}

/// Handle shared between the clock task and callers.
pub type SharedSession = Arc<Mutex<PlaySession>>;

impl PlaySession {
    /// Build a session submitting through `submitter`.
    pub fn new(config: AppConfig, submitter: Arc<dyn ScoreSubmitter>) -> Self {
        let (submit_status, _) = watch::channel(SubmitStatus::Idle);
        Self {
            config,
            round: None,
            item: None,
            progress: PlayerProgress::new(),
            clock: RoundClock::new(),
            submitter,
            submit_status,
            tick_period: ROUND_TICK_PERIOD,
        }
    }

    /// Override the countdown pace; meant for tests.
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Wrap the session into its shared handle.
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// Current totals mirror.
    pub fn progress(&self) -> PlayerProgress {
        self.progress
    }

    /// Phase of the current round, or `Idle` before the first one.
    pub fn round_phase(&self) -> RoundPhase {
        self.round
            .as_ref()
            .map_or(RoundPhase::Idle, |round| round.phase().clone())
    }

    /// Subscribe to submission state changes.
    pub fn submit_status(&self) -> watch::Receiver<SubmitStatus> {
        self.submit_status.subscribe()
    }

    /// Overwrite the local mirror from ledger values, e.g. after login.
    pub fn sync_progress(&mut self, score: u32, correct_streak: u32, best_streak: u32) {
        self.progress.sync(score, correct_streak, best_streak);
    }

    /// Score the outcome, fold it into the totals, and fire the submission.
    fn finish_round(&mut self, result: RoundResult) -> Resolution {
        let resolution = scoring::resolve(result, &self.progress, &self.config.scoring);
        self.progress.apply(&resolution);
        self.spawn_submit();
        resolution
    }

    /// Fire-and-forget delivery so the round stays responsive; failures are
    /// logged and surfaced through the [`SubmitStatus`] watch channel.
    fn spawn_submit(&self) {
        let report = ScoreReport {
            score: self.progress.total_score(),
            correct_streak: self.progress.current_streak(),
            best_streak: self.progress.best_streak(),
        };
        let submitter = self.submitter.clone();
        let status = self.submit_status.clone();
        let _ = status.send(SubmitStatus::Pending);

        tokio::spawn(async move {
            match submitter.submit(report).await {
                Ok(()) => {
                    let _ = status.send(SubmitStatus::Saved);
                }
                Err(err) => {
                    warn!(error = %err, "score submission failed; local totals keep the round outcome");
                    let _ = status.send(SubmitStatus::Failed);
                }
            }
        });
    }
}

/// Start a fresh round over `item`, replacing any previous round.
pub async fn start_round(session: &SharedSession, item: QuizItem) -> Result<(), RoundError> {
    let mut guard = session.lock().await;
    let mut round = Round::new(&guard.config.round, item.choices.len());
    round.begin()?;

    guard.round = Some(round);
    guard.item = Some(item);
    guard.clock.stop();

    let weak = Arc::downgrade(session);
    let period = guard.tick_period;
    guard.clock.start(period, move || {
        let weak = weak.clone();
        async move {
            let Some(session) = weak.upgrade() else {
                return ClockControl::Stop;
            };
            handle_tick(&session).await
        }
    });

    Ok(())
}

/// Submit an answer for the active round.
pub async fn answer(session: &SharedSession, choice: usize) -> Result<Resolution, RoundError> {
    let mut guard = session.lock().await;
    let Some(round) = guard.round.as_mut() else {
        return Err(RoundError::Guarded {
            phase: RoundPhase::Idle,
            event: RoundEvent::Answer,
        });
    };

    let echo = round.answer(choice)?;
    guard.clock.stop();

    let correct = guard
        .item
        .as_ref()
        .is_some_and(|item| item.correct_index == echo.choice);
    let result = if correct {
        RoundResult::Correct {
            time_remaining: echo.time_remaining,
        }
    } else {
        RoundResult::Wrong
    };

    Ok(guard.finish_round(result))
}

/// Spend one hint on the active round.
pub async fn reveal_hint(session: &SharedSession) -> Option<usize> {
    let mut guard = session.lock().await;
    guard
        .round
        .as_mut()
        .and_then(|round| round.reveal_hint(&mut rand::rng()))
}

/// Clock callback: apply one countdown second under the session lock.
async fn handle_tick(session: &SharedSession) -> ClockControl {
    let mut guard = session.lock().await;
    let Some(round) = guard.round.as_mut() else {
        return ClockControl::Stop;
    };

    match round.tick() {
        TickOutcome::Counting(_) => ClockControl::Continue,
        TickOutcome::Expired => {
            guard.finish_round(RoundResult::TimedOut);
            ClockControl::Stop
        }
        TickOutcome::Ignored => ClockControl::Stop,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use tokio::time::{sleep, timeout};

    use crate::state::round::ResolutionKind;

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingSubmitter {
        reports: Arc<StdMutex<Vec<ScoreReport>>>,
        fail: bool,
    }

    impl ScoreSubmitter for RecordingSubmitter {
        fn submit(&self, report: ScoreReport) -> BoxFuture<'static, Result<(), SubmitError>> {
            let this = self.clone();
            Box::pin(async move {
                this.reports.lock().unwrap().push(report);
                if this.fail {
                    Err(SubmitError("connection refused".into()))
                } else {
                    Ok(())
                }
            })
        }
    }

    fn quiz_item(correct_index: usize) -> QuizItem {
        QuizItem {
            path: "img/owl.jpg".into(),
            choices: vec!["owl".into(), "hawk".into(), "crow".into()],
            correct_index,
        }
    }

    fn session_with(submitter: RecordingSubmitter, config: AppConfig) -> SharedSession {
        // Full-second ticks: answer-path tests stay immune to timer races.
        PlaySession::new(config, Arc::new(submitter)).into_shared()
    }

    async fn wait_for_status(session: &SharedSession, wanted: SubmitStatus) {
        let mut rx = session.lock().await.submit_status();
        timeout(Duration::from_secs(1), rx.wait_for(|status| *status == wanted))
            .await
            .expect("status within deadline")
            .expect("status channel open");
    }

    #[tokio::test]
    async fn correct_answer_scores_and_submits() {
        let submitter = RecordingSubmitter::default();
        let reports = submitter.reports.clone();
        let session = session_with(submitter, AppConfig::default());

        start_round(&session, quiz_item(0)).await.unwrap();
        let resolution = answer(&session, 0).await.unwrap();

        // Full 30s left: streak multiplier 1.1, two full time bands -> 1.2.
        assert_eq!(resolution.points_awarded, 132);
        assert_eq!(resolution.new_streak, 1);

        wait_for_status(&session, SubmitStatus::Saved).await;
        let sent = reports.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![ScoreReport {
                score: 132,
                correct_streak: 1,
                best_streak: 1
            }]
        );

        let guard = session.lock().await;
        assert_eq!(guard.progress().total_score(), 132);
        assert_eq!(
            guard.round_phase(),
            RoundPhase::Resolved(ResolutionKind::Answered { choice: 0 })
        );
    }

    #[tokio::test]
    async fn wrong_answer_resets_streak_and_floors_score() {
        let submitter = RecordingSubmitter::default();
        let reports = submitter.reports.clone();
        let session = session_with(submitter, AppConfig::default());
        session.lock().await.sync_progress(50, 3, 4);

        start_round(&session, quiz_item(1)).await.unwrap();
        let resolution = answer(&session, 2).await.unwrap();

        assert_eq!(resolution.new_total, 0);
        assert_eq!(resolution.new_streak, 0);
        assert_eq!(resolution.new_best_streak, 4);

        wait_for_status(&session, SubmitStatus::Saved).await;
        assert_eq!(
            reports.lock().unwrap().clone(),
            vec![ScoreReport {
                score: 0,
                correct_streak: 0,
                best_streak: 4
            }]
        );
    }

    #[tokio::test]
    async fn expiry_resolves_the_round_exactly_once() {
        let submitter = RecordingSubmitter::default();
        let reports = submitter.reports.clone();
        let mut config = AppConfig::default();
        config.round.round_seconds = 2;
        let session = PlaySession::new(config, Arc::new(submitter))
            .with_tick_period(Duration::from_millis(5))
            .into_shared();
        session.lock().await.sync_progress(40, 5, 5);

        start_round(&session, quiz_item(0)).await.unwrap();

        timeout(Duration::from_secs(1), async {
            loop {
                if matches!(
                    session.lock().await.round_phase(),
                    RoundPhase::Resolved(ResolutionKind::TimedOut)
                ) {
                    break;
                }
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("timeout resolution within deadline");

        wait_for_status(&session, SubmitStatus::Saved).await;
        // Give any stray extra tick a chance to misfire before asserting.
        sleep(Duration::from_millis(30)).await;

        let sent = reports.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![ScoreReport {
                score: 0,
                correct_streak: 0,
                best_streak: 5
            }]
        );

        let guard = session.lock().await;
        assert_eq!(guard.progress().total_score(), 0);
        assert_eq!(guard.progress().best_streak(), 5);
    }

    #[tokio::test]
    async fn answer_after_resolution_is_rejected_without_resubmission() {
        let submitter = RecordingSubmitter::default();
        let reports = submitter.reports.clone();
        let session = session_with(submitter, AppConfig::default());

        start_round(&session, quiz_item(0)).await.unwrap();
        answer(&session, 1).await.unwrap();
        wait_for_status(&session, SubmitStatus::Saved).await;

        let err = answer(&session, 0).await.unwrap_err();
        assert!(matches!(err, RoundError::Guarded { .. }));
        sleep(Duration::from_millis(20)).await;
        assert_eq!(reports.lock().unwrap().len(), 1, "no double submission");
    }

    #[tokio::test]
    async fn failed_submission_is_surfaced_but_keeps_local_totals() {
        let submitter = RecordingSubmitter {
            fail: true,
            ..RecordingSubmitter::default()
        };
        let session = session_with(submitter, AppConfig::default());

        start_round(&session, quiz_item(0)).await.unwrap();
        answer(&session, 0).await.unwrap();

        wait_for_status(&session, SubmitStatus::Failed).await;
        assert_eq!(session.lock().await.progress().total_score(), 132);
    }

    #[tokio::test]
    async fn answer_before_any_round_is_guarded() {
        let session = session_with(RecordingSubmitter::default(), AppConfig::default());
        let err = answer(&session, 0).await.unwrap_err();
        assert!(matches!(
            err,
            RoundError::Guarded {
                phase: RoundPhase::Idle,
                ..
            }
        ));
    }
}
