//! Configuration for `HashGrid`
//!
//! The puzzle table, timing constants, and reveal scripts are data, not
//! code: they load from a YAML file, validate, and freeze behind `Arc`.

pub mod duration;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLimits, LoadResult, LoadWarning, load, load_with_limits};
pub use schema::{
    GameConfig, GameMetadata, IntroConfig, Puzzle, PuzzleCategory, PuzzleId, PuzzleSet,
    StrokeConfig, TimingConfig,
};
