//! HTTP progress store client
//!
//! JSON-over-HTTP client for a remote progress backend. Every call is
//! bounded by a client-side timeout so a hung backend cannot wedge the
//! session; redirects are not followed.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect;
use serde::Serialize;
use tracing::debug;

use crate::auth::Identity;
use crate::config::PuzzleId;
use crate::error::StoreError;

use super::{LeaderboardEntry, ProgressStore};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveBody<'a> {
    player: &'a str,
    challenge_id: PuzzleId,
    points: u32,
}

/// Remote [`ProgressStore`] speaking JSON over HTTP.
///
/// Endpoints, relative to the base URL:
/// - `POST /users` — register (idempotent upsert)
/// - `POST /solves` — record a solve
/// - `GET /leaderboard` — entries sorted by score descending
/// - `GET /progress/{player}` — solved puzzle ids
#[derive(Debug)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpStore {
    /// Creates a store client for the given base URL.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should never happen).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a store client with a custom per-request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should never happen).
    #[must_use]
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .expect("failed to build HTTP client");
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            timeout,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Sends a request, enforcing the timeout and a 2xx status.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| StoreError::Timeout)?
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::HttpStatus(status.as_u16()));
        }
        Ok(response)
    }

    /// Reads and decodes a JSON response body, enforcing the timeout.
    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let bytes = tokio::time::timeout(self.timeout, response.bytes())
            .await
            .map_err(|_| StoreError::Timeout)?
            .map_err(|e| StoreError::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ProgressStore for HttpStore {
    async fn register_user(&self, player: &Identity) -> Result<(), StoreError> {
        let url = self.endpoint("users");
        debug!(url, player = player.display_name(), "registering player");
        let body = RegisterBody {
            name: player.display_name(),
        };
        self.send(self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn submit_solve(
        &self,
        player: &Identity,
        puzzle: PuzzleId,
        points: u32,
    ) -> Result<(), StoreError> {
        let url = self.endpoint("solves");
        debug!(url, puzzle, points, "submitting solve");
        let body = SolveBody {
            player: player.display_name(),
            challenge_id: puzzle,
            points,
        };
        self.send(self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let response = self.send(self.client.get(self.endpoint("leaderboard"))).await?;
        self.decode(response).await
    }

    async fn user_progress(&self, player: &Identity) -> Result<HashSet<PuzzleId>, StoreError> {
        let url = self.endpoint(&format!("progress/{}", player.display_name()));
        let response = self.send(self.client.get(url)).await?;
        let ids: Vec<PuzzleId> = self.decode(response).await?;
        Ok(ids.into_iter().collect())
    }
}
