//! Progress store seam
//!
//! The store is the external service of record for solved-puzzle sets and
//! leaderboard scores. The session only ever mirrors it: solve state is
//! written through [`ProgressStore::submit_solve`] and read back through
//! queries, never edited locally.

pub mod http;
pub mod memory;

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::config::PuzzleId;
use crate::error::StoreError;

pub use http::HttpStore;
pub use memory::MemoryStore;

/// One row of the leaderboard, as returned by the store.
///
/// The store returns entries pre-sorted by score descending; display code
/// labels them `#1, #2, …` in received order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Store-assigned record id.
    pub id: String,

    /// Player display name.
    pub name: String,

    /// Total score.
    pub score: u32,

    /// Ids of the puzzles this player has solved.
    #[serde(default)]
    pub solved_challenges: Vec<PuzzleId>,
}

/// External progress store.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Idempotent upsert of the player record. Called once per
    /// authenticated session.
    async fn register_user(&self, player: &Identity) -> Result<(), StoreError>;

    /// Records a solve. Idempotency under duplicate submission is the
    /// store's responsibility, not the caller's.
    async fn submit_solve(
        &self,
        player: &Identity,
        puzzle: PuzzleId,
        points: u32,
    ) -> Result<(), StoreError>;

    /// The leaderboard, sorted by score descending.
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, StoreError>;

    /// The set of puzzle ids the player has solved.
    async fn user_progress(&self, player: &Identity) -> Result<HashSet<PuzzleId>, StoreError>;
}
