//! Session state and pure transitions
//!
//! The state machine underneath [`crate::session::PuzzleSession`],
//! independently testable without timers or collaborators. Every
//! transition bumps an epoch; hold timers capture the epoch at spawn and
//! settle only if it is unchanged, so an expired timer from a superseded
//! state can never clobber newer state.

use crate::config::PuzzleId;

/// Ternary feedback shown for the open puzzle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Feedback {
    /// No verdict pending.
    #[default]
    Neutral,
    /// The last guess matched.
    Success,
    /// The last guess did not match.
    Failure,
}

/// Normalizes a guess or expected answer for comparison: surrounding
/// whitespace is trimmed and the text is uppercased.
#[must_use]
pub fn normalize_guess(text: &str) -> String {
    text.trim().to_uppercase()
}

/// Selection, guess, and feedback state of one puzzle session.
#[derive(Debug, Default)]
pub struct SessionState {
    selected: Option<PuzzleId>,
    guess_text: String,
    feedback: Feedback,
    epoch: u64,
}

impl SessionState {
    /// Fresh state: nothing selected, neutral feedback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected puzzle id, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<PuzzleId> {
        self.selected
    }

    /// Current feedback.
    #[must_use]
    pub const fn feedback(&self) -> Feedback {
        self.feedback
    }

    /// Current guess text.
    #[must_use]
    pub fn guess_text(&self) -> &str {
        &self.guess_text
    }

    /// Current epoch. Bumped on every transition.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    fn bump(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Opens a puzzle: sets the selection, clears the guess, resets
    /// feedback. Returns the new epoch.
    pub fn open(&mut self, id: PuzzleId) -> u64 {
        self.selected = Some(id);
        self.guess_text.clear();
        self.feedback = Feedback::Neutral;
        self.bump()
    }

    /// Closes the puzzle unconditionally. Returns the new epoch.
    pub fn close(&mut self) -> u64 {
        self.selected = None;
        self.guess_text.clear();
        self.feedback = Feedback::Neutral;
        self.bump()
    }

    /// Updates the free-text guess without a transition (no epoch bump).
    pub fn set_guess(&mut self, text: &str) {
        self.guess_text.clear();
        self.guess_text.push_str(text);
    }

    /// Records a guess verdict. Returns the new epoch, which a hold timer
    /// should capture.
    pub fn record(&mut self, feedback: Feedback) -> u64 {
        self.feedback = feedback;
        self.bump()
    }

    /// Rolls a recorded verdict back to neutral if the state is still at
    /// `epoch`. Selection is untouched. Returns whether it applied.
    pub fn rollback(&mut self, epoch: u64) -> bool {
        if self.epoch != epoch {
            return false;
        }
        self.feedback = Feedback::Neutral;
        self.bump();
        true
    }

    /// Settles an expired success hold: closes the puzzle if the state is
    /// still at `epoch`. Returns whether it applied.
    pub fn settle_success(&mut self, epoch: u64) -> bool {
        if self.epoch != epoch || self.feedback != Feedback::Success {
            return false;
        }
        self.close();
        true
    }

    /// Settles an expired failure hold: resets feedback to neutral,
    /// keeping the puzzle open, if the state is still at `epoch`.
    /// Returns whether it applied.
    pub fn settle_failure(&mut self, epoch: u64) -> bool {
        if self.epoch != epoch || self.feedback != Feedback::Failure {
            return false;
        }
        self.feedback = Feedback::Neutral;
        self.bump();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_open_resets_guess_and_feedback() {
        let mut state = SessionState::new();
        state.set_guess("stale");
        state.record(Feedback::Failure);
        state.open(3);
        assert_eq!(state.selected(), Some(3));
        assert_eq!(state.guess_text(), "");
        assert_eq!(state.feedback(), Feedback::Neutral);
    }

    #[test]
    fn test_close_clears_everything() {
        let mut state = SessionState::new();
        state.open(3);
        state.record(Feedback::Success);
        state.close();
        assert_eq!(state.selected(), None);
        assert_eq!(state.feedback(), Feedback::Neutral);
    }

    #[test]
    fn test_settle_success_closes_at_matching_epoch() {
        let mut state = SessionState::new();
        state.open(1);
        let epoch = state.record(Feedback::Success);
        assert!(state.settle_success(epoch));
        assert_eq!(state.selected(), None);
        assert_eq!(state.feedback(), Feedback::Neutral);
    }

    #[test]
    fn test_settle_success_ignores_stale_epoch() {
        let mut state = SessionState::new();
        state.open(1);
        let stale = state.record(Feedback::Success);
        state.close();
        state.open(2);
        assert!(!state.settle_success(stale));
        assert_eq!(state.selected(), Some(2));
    }

    #[test]
    fn test_settle_failure_keeps_selection() {
        let mut state = SessionState::new();
        state.open(1);
        let epoch = state.record(Feedback::Failure);
        assert!(state.settle_failure(epoch));
        assert_eq!(state.selected(), Some(1));
        assert_eq!(state.feedback(), Feedback::Neutral);
    }

    #[test]
    fn test_rollback_only_at_matching_epoch() {
        let mut state = SessionState::new();
        state.open(1);
        let epoch = state.record(Feedback::Success);
        assert!(state.rollback(epoch));
        assert_eq!(state.feedback(), Feedback::Neutral);
        assert_eq!(state.selected(), Some(1));
        assert!(!state.rollback(epoch));
    }

    #[test]
    fn test_normalize_examples() {
        assert_eq!(normalize_guess(" system "), "SYSTEM");
        assert_eq!(normalize_guess("System"), "SYSTEM");
        assert_eq!(normalize_guess("SYSTEM"), "SYSTEM");
        assert_ne!(normalize_guess("SYSTE"), "SYSTEM");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(s in ".{0,64}") {
            let once = normalize_guess(&s);
            prop_assert_eq!(normalize_guess(&once), once);
        }

        #[test]
        fn prop_normalize_ignores_surrounding_whitespace(s in "[a-zA-Z0-9]{1,16}") {
            let padded = format!("  {s}\t");
            prop_assert_eq!(normalize_guess(&padded), normalize_guess(&s));
        }

        #[test]
        fn prop_normalize_ignores_case(s in "[a-zA-Z]{1,16}") {
            prop_assert_eq!(
                normalize_guess(&s.to_lowercase()),
                normalize_guess(&s.to_uppercase())
            );
        }
    }
}
