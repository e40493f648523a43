//! In-process progress store
//!
//! Backs local play and tests. Enforces the store-side contracts the
//! session relies on: idempotent registration, no double-scoring on
//! duplicate solves, leaderboard pre-sorted by score descending.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::auth::Identity;
use crate::config::PuzzleId;
use crate::error::StoreError;

use super::{LeaderboardEntry, ProgressStore};

#[derive(Debug, Clone)]
struct PlayerRecord {
    id: Uuid,
    name: String,
    score: u32,
    solved: HashSet<PuzzleId>,
    registered_at: DateTime<Utc>,
}

impl PlayerRecord {
    fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            score: 0,
            solved: HashSet::new(),
            registered_at: Utc::now(),
        }
    }
}

/// In-memory [`ProgressStore`] keyed by player display name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: DashMap<String, PlayerRecord>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn register_user(&self, player: &Identity) -> Result<(), StoreError> {
        let name = player.display_name();
        self.players
            .entry(name.to_string())
            .or_insert_with(|| PlayerRecord::new(name));
        Ok(())
    }

    async fn submit_solve(
        &self,
        player: &Identity,
        puzzle: PuzzleId,
        points: u32,
    ) -> Result<(), StoreError> {
        let name = player.display_name();
        let mut record = self
            .players
            .entry(name.to_string())
            .or_insert_with(|| PlayerRecord::new(name));
        // Duplicate submissions must not double-score.
        if record.solved.insert(puzzle) {
            record.score += points;
        }
        Ok(())
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let mut records: Vec<PlayerRecord> =
            self.players.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.registered_at.cmp(&b.registered_at))
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(records
            .into_iter()
            .map(|record| {
                let mut solved: Vec<PuzzleId> = record.solved.into_iter().collect();
                solved.sort_unstable();
                LeaderboardEntry {
                    id: record.id.to_string(),
                    name: record.name,
                    score: record.score,
                    solved_challenges: solved,
                }
            })
            .collect())
    }

    async fn user_progress(&self, player: &Identity) -> Result<HashSet<PuzzleId>, StoreError> {
        Ok(self
            .players
            .get(player.display_name())
            .map(|record| record.solved.clone())
            .unwrap_or_default())
    }
}
