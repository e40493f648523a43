//! Metric names and registration.
//!
//! Counters are recorded through the `metrics` facade; whatever recorder
//! the embedding process installs receives them. Without a recorder the
//! macros are no-ops.

use metrics::describe_counter;

/// Guesses evaluated, labelled by `outcome` (`success` / `failure`).
pub const GUESSES_TOTAL: &str = "hashgrid_guesses_total";

/// Solves recorded with the progress store.
pub const SOLVES_TOTAL: &str = "hashgrid_solves_total";

/// Reveal steps resolved, labelled by `kind`.
pub const STEPS_RESOLVED_TOTAL: &str = "hashgrid_steps_resolved_total";

/// Registers metric descriptions with the installed recorder.
pub fn describe() {
    describe_counter!(GUESSES_TOTAL, "Guesses evaluated, by outcome");
    describe_counter!(SOLVES_TOTAL, "Solves recorded with the progress store");
    describe_counter!(STEPS_RESOLVED_TOTAL, "Reveal steps resolved, by step kind");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_is_safe_without_recorder() {
        describe();
    }

    #[test]
    fn metric_names_share_prefix() {
        for name in [GUESSES_TOTAL, SOLVES_TOTAL, STEPS_RESOLVED_TOTAL] {
            assert!(name.starts_with("hashgrid_"));
        }
    }
}
