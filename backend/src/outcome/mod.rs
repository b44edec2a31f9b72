//! Outcome evaluator
//!
//! Checked once per tick after every other component has run. First match
//! wins:
//!
//! 1. any failure counter at or above its maximum → **lose**
//! 2. countdown at zero → **win**
//!
//! The payout and message are pure functions of the terminal counters, so
//! identical counters always settle to the identical `(payout, message)`.

use crate::models::{EndCause, FailureKind, ScoreBoard};
use crate::orchestrator::config::{FailureLimits, PayoutRates};
use serde::Serialize;

/// Final result of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionOutcome {
    pub won: bool,
    pub cause: EndCause,
    /// Credits paid to the player; negative is a fine
    pub payout: i64,
    pub message: String,
    pub score: ScoreBoard,
}

/// Decide whether the session ends this tick
pub fn evaluate(score: &ScoreBoard, limits: &FailureLimits, time_remaining: u32) -> Option<EndCause> {
    for kind in FailureKind::ALL {
        if score.failures(kind) >= limits.limit(kind) {
            return Some(EndCause::FailureLimit(kind));
        }
    }
    if time_remaining == 0 {
        return Some(EndCause::TimeExpired);
    }
    None
}

/// Payout for the given end cause and terminal counters
///
/// # Example
///
/// ```rust
/// use surveillance_core::outcome::payout;
/// use surveillance_core::{EndCause, PayoutRates, ScoreBoard};
///
/// let rates = PayoutRates::default();
/// let quiet = ScoreBoard::default();
/// assert_eq!(payout(EndCause::TimeExpired, &quiet, &rates), rates.base_reward);
/// ```
pub fn payout(cause: EndCause, score: &ScoreBoard, rates: &PayoutRates) -> i64 {
    let bonus = rates.success_bonus * score.successes as i64;
    match cause {
        EndCause::TimeExpired => {
            let raw = rates.base_reward + bonus
                - rates.item_loss_penalty * score.items_lost as i64
                - rates.wrongful_penalty * score.wrongful_actions as i64;
            raw.max(rates.min_win_payout)
        }
        EndCause::FailureLimit(_) => bonus - rates.failure_fine,
    }
}

/// Narrative line for the given end cause and terminal counters
pub fn message(cause: EndCause, score: &ScoreBoard, rates: &PayoutRates) -> &'static str {
    match cause {
        EndCause::FailureLimit(FailureKind::ItemsLost) => {
            if score.successes == 0 {
                "Half the warehouse walked out the door and you never lifted a finger. The client wants their money back."
            } else {
                "You nabbed a few, but too much went missing on your watch. The client is docking your fee."
            }
        }
        EndCause::FailureLimit(FailureKind::WrongfulActions) => {
            "One honest worker hassled too many. Site security has pulled you off the cameras."
        }
        EndCause::TimeExpired => {
            if score.total_failures() == 0 {
                if score.successes >= rates.flawless_threshold {
                    "Flawless shift. Every thief caught red-handed, not a single crate gone."
                } else if score.successes > 0 {
                    "Clean shift. Nothing went missing that you didn't bring back."
                } else {
                    "Quiet shift. Nobody tried anything, and you were paid to watch."
                }
            } else if score.successes > score.total_failures() {
                "Shift's over. A few slips, but you caught more than you missed."
            } else {
                "Shift's over. The client pays up, though not without a few pointed questions."
            }
        }
    }
}

/// Settle a finished session
pub fn settle(cause: EndCause, score: ScoreBoard, rates: &PayoutRates) -> SessionOutcome {
    SessionOutcome {
        won: matches!(cause, EndCause::TimeExpired),
        cause,
        payout: payout(cause, &score, rates),
        message: message(cause, &score, rates).to_string(),
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(successes: u32, items_lost: u32, wrongful_actions: u32) -> ScoreBoard {
        ScoreBoard {
            successes,
            items_lost,
            wrongful_actions,
        }
    }

    #[test]
    fn test_failure_takes_priority_over_time() {
        let limits = FailureLimits::default();
        let cause = evaluate(&board(0, 3, 0), &limits, 0);
        assert_eq!(cause, Some(EndCause::FailureLimit(FailureKind::ItemsLost)));
    }

    #[test]
    fn test_running_session_has_no_cause() {
        let limits = FailureLimits::default();
        assert_eq!(evaluate(&board(4, 2, 2), &limits, 1), None);
    }

    #[test]
    fn test_win_payout_is_clamped() {
        let rates = PayoutRates::default();
        let p = payout(EndCause::TimeExpired, &board(0, 2, 2), &rates);
        // 5000 - 1000 - 600 = 3400, above the floor
        assert_eq!(p, 3_400);

        let stingy = PayoutRates {
            item_loss_penalty: 10_000,
            ..rates
        };
        assert_eq!(payout(EndCause::TimeExpired, &board(0, 2, 0), &stingy), stingy.min_win_payout);
    }

    #[test]
    fn test_loss_can_be_a_fine() {
        let rates = PayoutRates::default();
        let cause = EndCause::FailureLimit(FailureKind::WrongfulActions);
        assert_eq!(payout(cause, &board(2, 0, 3), &rates), 500 - 2_000);
    }

    #[test]
    fn test_message_tiers() {
        let rates = PayoutRates::default();
        let t = EndCause::TimeExpired;
        assert!(message(t, &board(5, 0, 0), &rates).starts_with("Flawless"));
        assert!(message(t, &board(1, 0, 0), &rates).starts_with("Clean"));
        assert!(message(t, &board(0, 0, 0), &rates).starts_with("Quiet"));
        assert!(message(t, &board(3, 1, 0), &rates).contains("caught more"));
    }
}
