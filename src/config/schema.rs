//! Configuration schema types
//!
//! These types deserialize from the YAML game configuration: metadata,
//! timing constants, the intro/boot reveal scripts, and the puzzle table.
//! Table order is significant — it encodes the grid layout.

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::sequencer::Step;

/// Identifier of a puzzle in the configured table.
pub type PuzzleId = u32;

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration for a `HashGrid` game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GameConfig {
    /// Game metadata (required)
    pub game: GameMetadata,

    /// Feedback hold durations and scoring
    #[serde(default)]
    pub timing: TimingConfig,

    /// Intro animation: staggered stroke bars plus a title reveal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<IntroConfig>,

    /// Boot terminal script, run in order before the grid is shown
    #[serde(default)]
    pub boot: Vec<Step>,

    /// The puzzle table; order is grid display order
    pub puzzles: Vec<Puzzle>,
}

/// Game identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GameMetadata {
    /// Game name (required)
    pub name: String,

    /// Config version string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// One-line flavor text shown above the grid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

// ============================================================================
// Timing
// ============================================================================

/// Feedback hold durations and scoring constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimingConfig {
    /// How long `Success` feedback stays up before the puzzle closes.
    #[serde(with = "crate::config::duration", default = "default_success_hold")]
    pub success_hold: Duration,

    /// How long `Failure` feedback stays up before resetting to neutral.
    #[serde(with = "crate::config::duration", default = "default_failure_hold")]
    pub failure_hold: Duration,

    /// Points credited per solve.
    #[serde(default = "default_points")]
    pub points_per_solve: u32,
}

const fn default_success_hold() -> Duration {
    Duration::from_millis(1000)
}

const fn default_failure_hold() -> Duration {
    Duration::from_millis(1500)
}

const fn default_points() -> u32 {
    100
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            success_hold: default_success_hold(),
            failure_hold: default_failure_hold(),
            points_per_solve: default_points(),
        }
    }
}

// ============================================================================
// Intro
// ============================================================================

/// Intro animation: independent stroke bars running concurrently with
/// staggered starts, then a title.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IntroConfig {
    /// Title revealed once every stroke has finished drawing.
    pub title: String,

    /// How long the title holds before the game continues.
    #[serde(with = "crate::config::duration", default = "default_title_hold")]
    pub title_hold: Duration,

    /// Stroke animations; each becomes its own sequencer instance.
    #[serde(default)]
    pub strokes: Vec<StrokeConfig>,
}

const fn default_title_hold() -> Duration {
    Duration::from_millis(1000)
}

/// One stroke of the intro: a ticking bar with its own start offset.
///
/// Strokes are not coordinated by a barrier — each instance runs on its
/// own configured delay, matching the overlapping draw of the original.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StrokeConfig {
    /// Display label for the stroke.
    pub label: String,

    /// Delay before this stroke begins drawing.
    #[serde(with = "crate::config::duration", default)]
    pub start_after: Duration,

    /// Number of ticks to complete the draw.
    pub ticks: u32,

    /// Interval between ticks.
    #[serde(with = "crate::config::duration")]
    pub tick_interval: Duration,
}

impl StrokeConfig {
    /// The step list for this stroke's sequencer.
    #[must_use]
    pub fn steps(&self) -> Vec<Step> {
        vec![Step::TickingBar {
            total_ticks: self.ticks,
            tick_interval: self.tick_interval,
            label: Some(self.label.clone()),
        }]
    }
}

// ============================================================================
// Puzzles
// ============================================================================

/// A static challenge record.
///
/// The cipher is a pre-computed decorative string, not the output of any
/// algorithm implemented here; matching is exact string equality after
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Puzzle {
    /// Unique puzzle id.
    pub id: PuzzleId,

    /// The displayed cipher text.
    pub cipher: String,

    /// The expected plaintext answer.
    pub answer: String,

    /// Flavor category shown on the card.
    pub category: PuzzleCategory,

    /// Protocol hint shown when the puzzle is open.
    pub hint: String,

    /// Grid columns occupied (1 or 2).
    #[serde(default = "default_span")]
    pub span: u8,
}

const fn default_span() -> u8 {
    1
}

/// Cipher flavor of a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleCategory {
    /// Standard base64 text.
    Base64,
    /// Legacy 128-bit digest flavor.
    Md4,
    /// Retro 56-bit block flavor.
    Des,
    /// Military-grade 256-bit flavor.
    Aes,
}

impl std::fmt::Display for PuzzleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Base64 => "Base64",
            Self::Md4 => "MD4",
            Self::Des => "DES",
            Self::Aes => "AES",
        };
        write!(f, "{name}")
    }
}

/// Frozen, insertion-ordered puzzle table.
#[derive(Debug, Clone, Default)]
pub struct PuzzleSet {
    inner: IndexMap<PuzzleId, Puzzle>,
}

impl PuzzleSet {
    /// Builds a set from a configured table, preserving order.
    ///
    /// Duplicate ids keep the first occurrence; the validator reports
    /// duplicates as errors before a table ever reaches this point.
    #[must_use]
    pub fn new(puzzles: Vec<Puzzle>) -> Self {
        let mut inner = IndexMap::with_capacity(puzzles.len());
        for puzzle in puzzles {
            inner.entry(puzzle.id).or_insert(puzzle);
        }
        Self { inner }
    }

    /// Looks up a puzzle by id.
    #[must_use]
    pub fn get(&self, id: PuzzleId) -> Option<&Puzzle> {
        self.inner.get(&id)
    }

    /// Whether the table contains `id`.
    #[must_use]
    pub fn contains(&self, id: PuzzleId) -> bool {
        self.inner.contains_key(&id)
    }

    /// Puzzles in configured (grid) order.
    pub fn iter(&self) -> impl Iterator<Item = &Puzzle> {
        self.inner.values()
    }

    /// Number of puzzles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
