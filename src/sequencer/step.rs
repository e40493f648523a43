//! Step definitions for the reveal sequencer.
//!
//! Steps are immutable once defined: the sequencer never mutates a step,
//! only its own cursor and per-step progress counter. Steps deserialize
//! from YAML script sections with humantime duration strings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One timed unit of a reveal sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Fixed pause with no intermediate observable progress.
    Delay {
        /// Wall-clock interval after which the step resolves.
        #[serde(with = "crate::config::duration")]
        duration: Duration,
    },

    /// Text materializing one character per interval.
    ///
    /// Resolves on the tick *after* the last character is revealed, so a
    /// text of N characters occupies N+1 ticks including the completion
    /// tick. Empty text resolves after exactly one tick, never instantly.
    TypedText {
        /// Full text to reveal.
        text: String,

        /// Interval between character reveals.
        #[serde(with = "crate::config::duration")]
        char_interval: Duration,

        /// Presentation-only prefix printed before the text (e.g. `"> "`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
    },

    /// Progress bar filling in discrete ticks.
    ///
    /// The counter runs 0..=`total_ticks`, +1 per interval, and the step
    /// resolves when the counter first reaches `total_ticks`. A zero-tick
    /// bar still occupies one tick interval before resolving.
    TickingBar {
        /// Number of ticks to fill the bar.
        total_ticks: u32,

        /// Interval between ticks.
        #[serde(with = "crate::config::duration")]
        tick_interval: Duration,

        /// Presentation-only label printed next to the bar.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

impl Step {
    /// Short kind name for logging and metrics labels.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Delay { .. } => "delay",
            Self::TypedText { .. } => "typed_text",
            Self::TickingBar { .. } => "ticking_bar",
        }
    }

    /// Number of characters for a `TypedText` step, `None` otherwise.
    #[must_use]
    pub fn char_count(&self) -> Option<usize> {
        match self {
            Self::TypedText { text, .. } => Some(text.chars().count()),
            _ => None,
        }
    }

    /// The first `revealed` characters of a `TypedText` step's text.
    ///
    /// Returns the empty string for non-text steps. `revealed` beyond the
    /// text length yields the full text.
    #[must_use]
    pub fn typed_slice(&self, revealed: usize) -> &str {
        let Self::TypedText { text, .. } = self else {
            return "";
        };
        match text.char_indices().nth(revealed) {
            Some((byte_idx, _)) => &text[..byte_idx],
            None => text,
        }
    }
}

/// Live progress of the active step, suitable for rendering on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepProgress {
    /// Not started yet, or inside the initial delay.
    Pending,
    /// A `Delay` step is in flight (no observable progress).
    Waiting,
    /// A `TypedText` step with `revealed` characters shown so far.
    Typing {
        /// Characters revealed so far.
        revealed: usize,
    },
    /// A `TickingBar` step at `count` ticks.
    Ticking {
        /// Current tick count.
        count: u32,
    },
}
