//! Match state invariants - sanity checks that detect accounting bugs.
//!
//! With correct event handling these should NEVER trigger, no matter how
//! malformed the input stream is. If they do, it indicates a bug.

use crate::state::MatchState;

/// Tolerance for comparing sums of unit values.
pub(crate) const VALUE_EPSILON: f64 = 1e-6;

/// Invariant violation error.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

/// Check all match state invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &MatchState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (id, totals) in state.aggregates().iter() {
        // Live army value must match the ledger
        let expected = state.ledger().live_army_value(id);
        if (totals.army_value - expected).abs() > VALUE_EPSILON {
            violations.push(InvariantViolation {
                message: format!(
                    "Participant {id} army value {} != live unit value {expected}",
                    totals.army_value
                ),
            });
        }

        let counters = [
            ("army_value", totals.army_value),
            ("killed_army_value", totals.killed_army_value),
            ("lost_army_value", totals.lost_army_value),
            ("killed_economic_value", totals.killed_economic_value),
            ("lost_economic_value", totals.lost_economic_value),
        ];
        for (name, value) in counters {
            if value < 0.0 || !value.is_finite() {
                violations.push(InvariantViolation {
                    message: format!("Participant {id} {name} is {value}"),
                });
            }
        }

        // Samples must be time-ordered
        let series = state.samples().series(id);
        if let Some(pair) = series.windows(2).find(|w| w[1].time < w[0].time) {
            violations.push(InvariantViolation {
                message: format!(
                    "Participant {id} sample at {} follows sample at {}",
                    pair[1].time, pair[0].time
                ),
            });
        }
    }

    // Every live unit belongs to a participant
    let owned: usize = state
        .participants()
        .iter()
        .map(|p| state.ledger().live_units(p.id).count())
        .sum();
    if owned != state.ledger().live_count() {
        violations.push(InvariantViolation {
            message: format!(
                "Ledger reports {} live units but participants own {owned}",
                state.ledger().live_count()
            ),
        });
    }

    violations
}

/// Assert all match invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &MatchState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Match invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &MatchState) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TrackerEvent;
    use crate::state::{Participant, ValueModel};

    fn create_valid_state() -> MatchState {
        let mut state = MatchState::new(
            vec![
                Participant::new(1, "Alpha", "Zerg"),
                Participant::new(2, "Beta", "Terran"),
            ],
            ValueModel::standard(),
        );
        for (unit_id, type_name, owner) in [(1, "Roach", 1), (2, "Drone", 1), (3, "Marine", 2)] {
            state.apply(&TrackerEvent::UnitRegistered {
                time: 0,
                unit_id,
                type_name: type_name.to_string(),
                owner,
            });
        }
        state.apply(&TrackerEvent::UnitDied {
            time: 30,
            unit_id: 3,
            killer: Some(1),
        });
        state
    }

    #[test]
    fn test_valid_state_passes() {
        let state = create_valid_state();
        let violations = check_invariants(&state);
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_empty_state_passes() {
        let state = MatchState::new(Vec::new(), ValueModel::standard());
        assert!(check_invariants(&state).is_empty());
        assert_invariants(&state);
    }

    #[test]
    fn test_violation_display() {
        let violation = InvariantViolation {
            message: "army drift".to_string(),
        };
        assert_eq!(violation.to_string(), "Invariant violation: army drift");
    }
}
