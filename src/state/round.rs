//! Round state machine: countdown budget, hint budget, and tile reveal flags.
//!
//! The machine owns every bit of per-round state explicitly. Renderers read
//! the `revealed` flags; nothing in here is derived from a display layer.

use std::time::Instant;

use rand::Rng;
use thiserror::Error;

use crate::config::RoundConfig;

/// Phases a round moves through. `Resolved` is terminal for the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundPhase {
    /// Created but not yet started.
    Idle,
    /// Countdown running, answers and hints accepted.
    Active,
    /// Outcome locked in; a fresh [`Round`] is needed to play again.
    Resolved(ResolutionKind),
}

/// How an active round reached its resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// The player picked a choice before the countdown ran out.
    Answered {
        /// Index of the selected choice.
        choice: usize,
    },
    /// The countdown expired without an answer.
    TimedOut,
}

/// Events named in guard errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    /// Start the countdown.
    Begin,
    /// Submit an answer.
    Answer,
    /// One countdown second elapsed.
    Tick,
}

/// Errors raised when an event cannot be applied to the current phase.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoundError {
    /// The event is not valid in the current phase; no state was changed.
    #[error("round event {event:?} is not allowed while {phase:?}")]
    Guarded {
        /// Phase the round was in.
        phase: RoundPhase,
        /// Offending event.
        event: RoundEvent,
    },
    /// The submitted choice index does not address any choice.
    #[error("choice index {choice} is out of range for {choice_count} choices")]
    ChoiceOutOfRange {
        /// Index that was submitted.
        choice: usize,
        /// Number of choices in the current item.
        choice_count: usize,
    },
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting; carries the seconds left.
    Counting(u32),
    /// The budget just hit zero: the round resolved as timed out.
    Expired,
    /// The round was not active; nothing happened.
    Ignored,
}

/// Echo of an accepted answer, carrying what the scoring engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerEcho {
    /// Index of the selected choice.
    pub choice: usize,
    /// Seconds that were left on the countdown.
    pub time_remaining: u32,
}

/// One round of play over a single picture.
#[derive(Debug, Clone)]
pub struct Round {
    phase: RoundPhase,
    time_remaining: u32,
    reveals_remaining: u32,
    revealed: Vec<bool>,
    choice_count: usize,
    started_at: Option<Instant>,
    time_budget: u32,
    reveal_budget: u32,
}

impl Round {
    /// Create an idle round for an item with `choice_count` answer choices.
    pub fn new(config: &RoundConfig, choice_count: usize) -> Self {
        Self {
            phase: RoundPhase::Idle,
            time_remaining: config.round_seconds,
            reveals_remaining: config.reveal_budget,
            revealed: vec![false; config.tile_count],
            choice_count,
            started_at: None,
            time_budget: config.round_seconds,
            reveal_budget: config.reveal_budget,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> &RoundPhase {
        &self.phase
    }

    /// Seconds left on the countdown.
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Hint reveals left.
    pub fn reveals_remaining(&self) -> u32 {
        self.reveals_remaining
    }

    /// Per-tile reveal flags, for the rendering layer to read.
    pub fn revealed(&self) -> &[bool] {
        &self.revealed
    }

    /// Instant the round went active, if it did.
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Start the countdown: `Idle -> Active`, resetting both budgets.
    pub fn begin(&mut self) -> Result<(), RoundError> {
        if self.phase != RoundPhase::Idle {
            return Err(RoundError::Guarded {
                phase: self.phase.clone(),
                event: RoundEvent::Begin,
            });
        }

        self.time_remaining = self.time_budget;
        self.reveals_remaining = self.reveal_budget;
        self.revealed.fill(false);
        self.started_at = Some(Instant::now());
        self.phase = RoundPhase::Active;
        Ok(())
    }

    /// Apply one countdown second.
    ///
    /// When the budget reaches zero while still active the round resolves as
    /// timed out in the same call, so expiry fires exactly once.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != RoundPhase::Active {
            return TickOutcome::Ignored;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.resolve(ResolutionKind::TimedOut);
            return TickOutcome::Expired;
        }
        TickOutcome::Counting(self.time_remaining)
    }

    /// Accept an answer: `Active -> Resolved`, revealing the whole picture.
    ///
    /// Guarded against non-active phases and out-of-range indexes; a rejected
    /// call leaves the round untouched.
    pub fn answer(&mut self, choice: usize) -> Result<AnswerEcho, RoundError> {
        if self.phase != RoundPhase::Active {
            return Err(RoundError::Guarded {
                phase: self.phase.clone(),
                event: RoundEvent::Answer,
            });
        }
        if choice >= self.choice_count {
            return Err(RoundError::ChoiceOutOfRange {
                choice,
                choice_count: self.choice_count,
            });
        }

        let echo = AnswerEcho {
            choice,
            time_remaining: self.time_remaining,
        };
        self.resolve(ResolutionKind::Answered { choice });
        Ok(echo)
    }

    /// Spend one hint to uncover a random still-covered tile.
    ///
    /// Returns the revealed tile index, or `None` when the round is not
    /// active, the budget is spent, or no tile is still covered. The phase
    /// never changes.
    pub fn reveal_hint<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.phase != RoundPhase::Active || self.reveals_remaining == 0 {
            return None;
        }

        let hidden: Vec<usize> = self
            .revealed
            .iter()
            .enumerate()
            .filter_map(|(index, &shown)| (!shown).then_some(index))
            .collect();
        let pick = *hidden.get(rng.random_range(0..hidden.len().max(1)))?;

        self.revealed[pick] = true;
        self.reveals_remaining -= 1;
        Some(pick)
    }

    fn resolve(&mut self, kind: ResolutionKind) {
        self.revealed.fill(true);
        self.phase = RoundPhase::Resolved(kind);
    }
}
