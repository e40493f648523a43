//! Puzzle session
//!
//! Holds the puzzle table, the current selection/guess/feedback state, and
//! a read-only mirror of the store's solved set. Evaluates guesses and
//! records solves through the [`ProgressStore`]; feedback holds run on
//! background timers that are cancelled on shutdown.

pub mod state;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use metrics::counter;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::{AuthProvider, Identity};
use crate::config::{PuzzleId, PuzzleSet, TimingConfig};
use crate::error::{SessionError, StoreError};
use crate::observability::metrics::{GUESSES_TOTAL, SOLVES_TOTAL};
use crate::store::{LeaderboardEntry, ProgressStore};

pub use state::{Feedback, SessionState, normalize_guess};

/// One player's interactive game session.
///
/// The solved set and leaderboard are owned by the store; this type keeps
/// only an eventually-consistent mirror refreshed by queries. Optimistic
/// local writes to the mirror are deliberately not done.
pub struct PuzzleSession {
    puzzles: Arc<PuzzleSet>,
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn ProgressStore>,
    timing: TimingConfig,
    state: Mutex<SessionState>,
    solved: RwLock<HashSet<PuzzleId>>,
    cancel: CancellationToken,
}

impl PuzzleSession {
    /// Creates a session over the given table and collaborators.
    #[must_use]
    pub fn new(
        puzzles: Arc<PuzzleSet>,
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn ProgressStore>,
        timing: TimingConfig,
    ) -> Self {
        Self {
            puzzles,
            auth,
            store,
            timing,
            state: Mutex::new(SessionState::new()),
            solved: RwLock::new(HashSet::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Registers the player with the store, once per authenticated
    /// session. Errors are logged, not fatal: the store upsert is
    /// idempotent and a later solve re-creates the record anyway.
    pub async fn register(&self) {
        if !self.auth.is_authenticated() {
            return;
        }
        let identity = self.identity();
        if let Err(err) = self.store.register_user(&identity).await {
            warn!(player = identity.display_name(), %err, "player registration failed");
        }
    }

    /// Replaces the solved-set mirror from the store.
    ///
    /// # Errors
    ///
    /// Returns the store error; the previous mirror is kept on failure.
    pub async fn refresh_progress(&self) -> Result<(), StoreError> {
        if !self.auth.is_authenticated() {
            return Ok(());
        }
        let solved = self.store.user_progress(&self.identity()).await?;
        debug!(count = solved.len(), "solved mirror refreshed");
        *self.solved.write().expect("solved lock poisoned") = solved;
        Ok(())
    }

    /// Opens a puzzle for guessing.
    ///
    /// No-op returning `false` unless the player is authenticated, the id
    /// exists, and the puzzle is not already solved. On success the guess
    /// is cleared and feedback resets to neutral.
    pub fn select_puzzle(&self, id: PuzzleId) -> bool {
        if !self.auth.is_authenticated() {
            debug!(id, "selection ignored: not authenticated");
            return false;
        }
        if !self.puzzles.contains(id) || self.is_solved(id) {
            debug!(id, "selection ignored: unknown or already solved");
            return false;
        }
        self.state.lock().expect("state lock poisoned").open(id);
        true
    }

    /// Closes the open puzzle unconditionally.
    pub fn close_puzzle(&self) {
        self.state.lock().expect("state lock poisoned").close();
    }

    /// Updates the free-text guess without evaluating it.
    pub fn set_guess(&self, text: &str) {
        self.state.lock().expect("state lock poisoned").set_guess(text);
    }

    /// Evaluates a guess against the open puzzle.
    ///
    /// On a match, records the solve with the store, refreshes the solved
    /// mirror, and schedules the success hold that closes the puzzle. On a
    /// mismatch, schedules the failure hold that resets feedback while the
    /// puzzle stays open for retry.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoPuzzleSelected`] if no puzzle is open.
    /// - [`SessionError::Store`] if the solve could not be recorded; the
    ///   optimistic `Success` is rolled back and the puzzle stays open so
    ///   the player can retry.
    pub async fn submit_guess(self: &Arc<Self>, text: &str) -> Result<Feedback, SessionError> {
        let (id, answer) = {
            let mut state = self.state.lock().expect("state lock poisoned");
            let id = state.selected().ok_or(SessionError::NoPuzzleSelected)?;
            let puzzle = self
                .puzzles
                .get(id)
                .ok_or(SessionError::UnknownPuzzle(id))?;
            state.set_guess(text);
            (id, puzzle.answer.clone())
        };

        if normalize_guess(text) != normalize_guess(&answer) {
            let epoch = self
                .state
                .lock()
                .expect("state lock poisoned")
                .record(Feedback::Failure);
            counter!(GUESSES_TOTAL, "outcome" => "failure").increment(1);
            self.spawn_hold(self.timing.failure_hold, move |state| {
                state.settle_failure(epoch)
            });
            return Ok(Feedback::Failure);
        }

        let epoch = self
            .state
            .lock()
            .expect("state lock poisoned")
            .record(Feedback::Success);
        counter!(GUESSES_TOTAL, "outcome" => "success").increment(1);

        let identity = self.identity();
        match self
            .store
            .submit_solve(&identity, id, self.timing.points_per_solve)
            .await
        {
            Ok(()) => {
                counter!(SOLVES_TOTAL).increment(1);
                info!(id, player = identity.display_name(), "solve recorded");
                if let Err(err) = self.refresh_progress().await {
                    warn!(%err, "solved mirror refresh failed after solve");
                }
                self.spawn_hold(self.timing.success_hold, move |state| {
                    state.settle_success(epoch)
                });
                Ok(Feedback::Success)
            }
            Err(err) => {
                // Roll the optimistic verdict back; the mirror never saw it,
                // and keeping the puzzle open gives the player a retry.
                warn!(id, %err, "solve not recorded; reverting success feedback");
                self.state
                    .lock()
                    .expect("state lock poisoned")
                    .rollback(epoch);
                Err(SessionError::Store(err))
            }
        }
    }

    /// The leaderboard, in the store's (score-descending) order.
    ///
    /// # Errors
    ///
    /// Returns the store error unchanged.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        self.store.leaderboard().await
    }

    /// Currently selected puzzle id, if any.
    #[must_use]
    pub fn selected(&self) -> Option<PuzzleId> {
        self.state.lock().expect("state lock poisoned").selected()
    }

    /// Current feedback.
    #[must_use]
    pub fn feedback(&self) -> Feedback {
        self.state.lock().expect("state lock poisoned").feedback()
    }

    /// Whether the solved mirror contains `id`.
    #[must_use]
    pub fn is_solved(&self, id: PuzzleId) -> bool {
        self.solved.read().expect("solved lock poisoned").contains(&id)
    }

    /// Number of puzzles in the solved mirror.
    #[must_use]
    pub fn solved_count(&self) -> usize {
        self.solved.read().expect("solved lock poisoned").len()
    }

    /// The puzzle table backing this session.
    #[must_use]
    pub fn puzzles(&self) -> &PuzzleSet {
        &self.puzzles
    }

    /// Cancels outstanding hold timers. After this call returns, no timer
    /// mutates session state. Idempotent.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn identity(&self) -> Identity {
        self.auth.identity().unwrap_or_default()
    }

    /// Spawns a hold timer that applies `settle` after `hold`, unless the
    /// session is shut down first. `settle` itself re-checks the captured
    /// epoch, so a superseded hold is a no-op.
    fn spawn_hold<F>(self: &Arc<Self>, hold: std::time::Duration, settle: F)
    where
        F: FnOnce(&mut SessionState) -> bool + Send + 'static,
    {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                () = session.cancel.cancelled() => {}
                () = tokio::time::sleep(hold) => {
                    let mut state = session.state.lock().expect("state lock poisoned");
                    if !settle(&mut state) {
                        debug!("hold expired against superseded state; ignored");
                    }
                }
            }
        });
    }
}

impl std::fmt::Debug for PuzzleSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PuzzleSession")
            .field("num_puzzles", &self.puzzles.len())
            .field("selected", &self.selected())
            .field("feedback", &self.feedback())
            .finish_non_exhaustive()
    }
}
