//! Pure point computation for round outcomes.
//!
//! Correct answers scale a base award by a streak multiplier and a discrete
//! time-band bonus; misses and timeouts subtract a flat penalty with the
//! total floored at zero. Nothing in here touches I/O.

use crate::config::ScoringConfig;
use crate::state::progress::PlayerProgress;

/// Outcome of a resolved round as seen by the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundResult {
    /// Right choice, with the seconds that were left on the countdown.
    Correct {
        /// Remaining countdown seconds at answer time.
        time_remaining: u32,
    },
    /// Wrong choice.
    Wrong,
    /// Countdown expired without an answer.
    TimedOut,
}

/// New totals produced by resolving one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Points granted by this round; zero for misses and timeouts.
    pub points_awarded: u32,
    /// Total score after the round, floored at zero.
    pub new_total: u32,
    /// Consecutive-correct count after the round.
    pub new_streak: u32,
    /// Best streak ever observed, merged with this round's streak.
    pub new_best_streak: u32,
}

/// Compute the totals resulting from `result` applied on top of `progress`.
pub fn resolve(
    result: RoundResult,
    progress: &PlayerProgress,
    config: &ScoringConfig,
) -> Resolution {
    match result {
        RoundResult::Correct { time_remaining } => {
            let new_streak = progress.current_streak() + 1;
            let multiplier =
                streak_multiplier(new_streak, config) * time_multiplier(time_remaining, config);
            let points_awarded =
                (f64::from(config.base_correct_points) * multiplier).round() as u32;

            Resolution {
                points_awarded,
                new_total: progress.total_score() + points_awarded,
                new_streak,
                new_best_streak: progress.best_streak().max(new_streak),
            }
        }
        RoundResult::Wrong => penalty(progress, config.wrong_penalty),
        RoundResult::TimedOut => penalty(progress, config.timeout_penalty),
    }
}

/// `1 + streak_step * streak`, growing with every consecutive correct answer.
fn streak_multiplier(new_streak: u32, config: &ScoringConfig) -> f64 {
    1.0 + config.streak_step * f64::from(new_streak)
}

/// `1 + time_band_step` per full band of seconds left above the bonus
/// threshold. Below the threshold the multiplier stays at 1.
fn time_multiplier(time_remaining: u32, config: &ScoringConfig) -> f64 {
    if config.time_band_seconds == 0 {
        return 1.0;
    }
    let banded = time_remaining.saturating_sub(config.time_bonus_threshold_seconds)
        / config.time_band_seconds;
    1.0 + config.time_band_step * f64::from(banded)
}

fn penalty(progress: &PlayerProgress, amount: u32) -> Resolution {
    Resolution {
        points_awarded: 0,
        new_total: progress.total_score().saturating_sub(amount),
        new_streak: 0,
        new_best_streak: progress.best_streak(),
    }
}
