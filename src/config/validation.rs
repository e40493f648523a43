//! Configuration validation
//!
//! Structural checks that serde cannot express: unique puzzle ids, sane
//! spans, non-empty answers, and script sanity. Errors block loading;
//! warnings surface through [`crate::config::LoadResult`].

use std::collections::HashSet;

use crate::error::{Severity, ValidationIssue};
use crate::sequencer::Step;

use super::loader::ConfigLimits;
use super::schema::GameConfig;

/// Outcome of validating a configuration.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Issues that prevent the configuration from being used.
    pub errors: Vec<ValidationIssue>,
    /// Issues worth surfacing that do not block loading.
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Whether any blocking issue was found.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
            severity: Severity::Error,
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
            severity: Severity::Warning,
        });
    }
}

/// Validates a parsed configuration against structural rules and limits.
#[must_use]
pub fn validate(config: &GameConfig, limits: &ConfigLimits) -> ValidationResult {
    let mut result = ValidationResult::default();

    if config.game.name.trim().is_empty() {
        result.error("game.name", "name must not be empty");
    }

    validate_puzzles(config, limits, &mut result);
    validate_script(&config.boot, "boot", limits, &mut result);
    validate_intro(config, &mut result);

    if config.timing.points_per_solve == 0 {
        result.warn("timing.points_per_solve", "solves will score zero points");
    }

    result
}

fn validate_puzzles(config: &GameConfig, limits: &ConfigLimits, result: &mut ValidationResult) {
    if config.puzzles.is_empty() {
        result.warn("puzzles", "no puzzles configured; the grid will be empty");
    }
    if config.puzzles.len() > limits.max_puzzles {
        result.error(
            "puzzles",
            format!(
                "{} puzzles exceeds the limit of {}",
                config.puzzles.len(),
                limits.max_puzzles
            ),
        );
    }

    let mut seen: HashSet<u32> = HashSet::new();
    for (i, puzzle) in config.puzzles.iter().enumerate() {
        if !seen.insert(puzzle.id) {
            result.error(format!("puzzles[{i}].id"), format!("duplicate id {}", puzzle.id));
        }
        if !matches!(puzzle.span, 1 | 2) {
            result.error(
                format!("puzzles[{i}].span"),
                format!("span must be 1 or 2, got {}", puzzle.span),
            );
        }
        if puzzle.answer.trim().is_empty() {
            result.error(format!("puzzles[{i}].answer"), "answer must not be blank");
        }
        if puzzle.cipher.is_empty() {
            result.warn(format!("puzzles[{i}].cipher"), "cipher text is empty");
        }
    }
}

fn validate_script(
    steps: &[Step],
    section: &str,
    limits: &ConfigLimits,
    result: &mut ValidationResult,
) {
    if steps.len() > limits.max_steps {
        result.error(
            section,
            format!("{} steps exceeds the limit of {}", steps.len(), limits.max_steps),
        );
    }

    for (i, step) in steps.iter().enumerate() {
        match step {
            Step::TickingBar { total_ticks: 0, .. } => {
                result.warn(
                    format!("{section}[{i}]"),
                    "ticking bar has zero ticks; it will occupy a single tick interval",
                );
            }
            Step::TypedText { text, .. } if text.is_empty() => {
                result.warn(
                    format!("{section}[{i}]"),
                    "typed text is empty; it will occupy a single tick interval",
                );
            }
            _ => {}
        }
    }
}

fn validate_intro(config: &GameConfig, result: &mut ValidationResult) {
    let Some(intro) = &config.intro else {
        return;
    };
    if intro.title.trim().is_empty() {
        result.warn("intro.title", "title is empty");
    }
    for (i, stroke) in intro.strokes.iter().enumerate() {
        if stroke.ticks == 0 {
            result.warn(
                format!("intro.strokes[{i}].ticks"),
                "stroke has zero ticks; it will occupy a single tick interval",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{GameMetadata, Puzzle, PuzzleCategory, TimingConfig};
    use std::time::Duration;

    fn puzzle(id: u32) -> Puzzle {
        Puzzle {
            id,
            cipher: "UlVO".to_string(),
            answer: "RUN".to_string(),
            category: PuzzleCategory::Base64,
            hint: "Standard-64".to_string(),
            span: 1,
        }
    }

    fn config(puzzles: Vec<Puzzle>) -> GameConfig {
        GameConfig {
            game: GameMetadata {
                name: "hashgrid".to_string(),
                version: None,
                tagline: None,
            },
            timing: TimingConfig::default(),
            intro: None,
            boot: Vec::new(),
            puzzles,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let result = validate(&config(vec![puzzle(1), puzzle(2)]), &ConfigLimits::default());
        assert!(!result.has_errors());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = validate(&config(vec![puzzle(1), puzzle(1)]), &ConfigLimits::default());
        assert!(result.has_errors());
        assert!(result.errors[0].message.contains("duplicate id 1"));
    }

    #[test]
    fn test_bad_span_rejected() {
        let mut bad = puzzle(1);
        bad.span = 3;
        let result = validate(&config(vec![bad]), &ConfigLimits::default());
        assert!(result.has_errors());
        assert!(result.errors[0].path.contains("span"));
    }

    #[test]
    fn test_blank_answer_rejected() {
        let mut bad = puzzle(1);
        bad.answer = "   ".to_string();
        let result = validate(&config(vec![bad]), &ConfigLimits::default());
        assert!(result.has_errors());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut cfg = config(vec![puzzle(1)]);
        cfg.game.name = String::new();
        let result = validate(&cfg, &ConfigLimits::default());
        assert!(result.has_errors());
    }

    #[test]
    fn test_empty_table_warns() {
        let result = validate(&config(vec![]), &ConfigLimits::default());
        assert!(!result.has_errors());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_zero_tick_bar_warns() {
        let mut cfg = config(vec![puzzle(1)]);
        cfg.boot.push(Step::TickingBar {
            total_ticks: 0,
            tick_interval: Duration::from_millis(100),
            label: None,
        });
        let result = validate(&cfg, &ConfigLimits::default());
        assert!(!result.has_errors());
        assert!(result.warnings[0].message.contains("zero ticks"));
    }

    #[test]
    fn test_puzzle_limit_enforced() {
        let limits = ConfigLimits {
            max_puzzles: 1,
            ..ConfigLimits::default()
        };
        let result = validate(&config(vec![puzzle(1), puzzle(2)]), &limits);
        assert!(result.has_errors());
    }
}
