//! Reveal sequencer driver
//!
//! The [`RevealSequencer`] owns an ordered step list and a driver task that
//! runs each step's timers in turn. Exactly one step is active at any time;
//! step *i+1* is scheduled only after step *i* resolves, and the cursor
//! advance between the two is synchronous within the driver. Cancellation
//! clears all pending timers and suppresses any further events.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicIsize, AtomicUsize, Ordering};
use std::time::Duration;

use metrics::counter;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::observability::metrics::STEPS_RESOLVED_TOTAL;

use super::step::{Step, StepProgress};

// ============================================================================
// Events
// ============================================================================

/// Completion notifications emitted by the driver task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    /// Step `index` became the active step.
    StepStarted {
        /// Index of the activated step.
        index: usize,
    },
    /// Step `index` resolved. Emitted at most once per step.
    StepResolved {
        /// Index of the resolved step.
        index: usize,
    },
    /// The last step resolved; the sequencer is terminal.
    Finished,
}

/// Point-in-time view of the sequencer for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerSnapshot {
    /// Index of the active step, or `None` before the first activation.
    pub index: Option<usize>,
    /// Live progress of the active step.
    pub progress: StepProgress,
    /// Whether the sequence ran to completion.
    pub finished: bool,
}

// ============================================================================
// Shared atomic state
// ============================================================================

/// Cursor and per-step progress, readable by a renderer while the driver
/// task runs.
struct SequencerState {
    /// Active step index; -1 means "not started".
    current: AtomicIsize,
    /// Progress counter for the active step (chars revealed / ticks).
    progress: AtomicUsize,
    started: AtomicBool,
    finished: AtomicBool,
}

impl SequencerState {
    fn new() -> Self {
        Self {
            current: AtomicIsize::new(-1),
            progress: AtomicUsize::new(0),
            started: AtomicBool::new(false),
            finished: AtomicBool::new(false),
        }
    }

    /// Claims the one-shot start. Returns `false` if already started.
    fn try_start(&self) -> bool {
        !self.started.swap(true, Ordering::SeqCst)
    }

    fn begin_step(&self, index: usize) {
        self.progress.store(0, Ordering::SeqCst);
        self.current
            .store(isize::try_from(index).unwrap_or(isize::MAX), Ordering::SeqCst);
    }

    fn set_progress(&self, value: usize) {
        self.progress.store(value, Ordering::SeqCst);
    }

    fn current_index(&self) -> Option<usize> {
        usize::try_from(self.current.load(Ordering::SeqCst)).ok()
    }

    fn progress(&self) -> usize {
        self.progress.load(Ordering::SeqCst)
    }

    fn mark_finished(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

// ============================================================================
// RevealSequencer
// ============================================================================

/// Restartable-by-recreation staged reveal state machine.
///
/// Created with an ordered step list and an optional initial delay. The
/// sequence begins at [`RevealSequencer::start`] and terminates after the
/// last step resolves; [`RevealSequencer::cancel`] tears it down at any
/// point. Reuse after cancellation requires a new sequencer.
pub struct RevealSequencer {
    steps: Vec<Step>,
    initial_delay: Duration,
    state: SequencerState,
    cancel: CancellationToken,
    event_tx: mpsc::UnboundedSender<SequencerEvent>,
    /// Single-consumer event receiver.
    event_rx: Mutex<mpsc::UnboundedReceiver<SequencerEvent>>,
}

impl RevealSequencer {
    /// Creates a sequencer that starts its first step immediately on
    /// [`RevealSequencer::start`].
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        Self::with_initial_delay(steps, Duration::ZERO)
    }

    /// Creates a sequencer whose first step is held back by `initial_delay`
    /// after [`RevealSequencer::start`].
    #[must_use]
    pub fn with_initial_delay(steps: Vec<Step>, initial_delay: Duration) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            steps,
            initial_delay,
            state: SequencerState::new(),
            cancel: CancellationToken::new(),
            event_tx,
            event_rx: Mutex::new(event_rx),
        }
    }

    /// Begins the sequence after the configured initial delay.
    ///
    /// Returns the driver task handle, or `None` if the sequencer was
    /// already started (the call is then a no-op).
    pub fn start(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.state.try_start() {
            debug!("start ignored: sequencer already started");
            return None;
        }
        let sequencer = Arc::clone(self);
        Some(tokio::spawn(async move { sequencer.drive().await }))
    }

    /// Cancels the sequence, clearing all pending timers.
    ///
    /// Idempotent and safe at any state, including before `start()` and
    /// after natural completion. No completion event is observable after
    /// this call returns.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether [`RevealSequencer::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The configured step list, in activation order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The step at `index`, if any.
    #[must_use]
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Current cursor, progress, and terminal flag.
    #[must_use]
    pub fn snapshot(&self) -> SequencerSnapshot {
        let index = self.state.current_index();
        let progress = match index.and_then(|i| self.steps.get(i)) {
            None => StepProgress::Pending,
            Some(Step::Delay { .. }) => StepProgress::Waiting,
            Some(Step::TypedText { .. }) => StepProgress::Typing {
                revealed: self.state.progress(),
            },
            Some(Step::TickingBar { .. }) => StepProgress::Ticking {
                count: u32::try_from(self.state.progress()).unwrap_or(u32::MAX),
            },
        };
        SequencerSnapshot {
            index,
            progress,
            finished: self.state.is_finished(),
        }
    }

    /// The partial text of the active `TypedText` step, empty otherwise.
    #[must_use]
    pub fn revealed_text(&self) -> &str {
        self.state
            .current_index()
            .and_then(|i| self.steps.get(i))
            .map_or("", |step| step.typed_slice(self.state.progress()))
    }

    /// Tries to receive the next completion event (non-blocking).
    pub async fn recv_event(&self) -> Option<SequencerEvent> {
        let mut rx = self.event_rx.lock().await;
        match rx.try_recv() {
            Ok(event) => Some(event),
            Err(mpsc::error::TryRecvError::Empty | mpsc::error::TryRecvError::Disconnected) => None,
        }
    }

    /// Driver task: runs each step's timers in order.
    async fn drive(self: Arc<Self>) {
        if !self.initial_delay.is_zero() && !self.pause(self.initial_delay).await {
            return;
        }

        for (index, step) in self.steps.iter().enumerate() {
            self.state.begin_step(index);
            self.emit(SequencerEvent::StepStarted { index });

            if !self.run_step(step).await {
                debug!(index, "sequence cancelled mid-step");
                return;
            }

            // The cursor advance is synchronous with the resolution: the
            // resolved event is emitted before the next step is scheduled.
            counter!(STEPS_RESOLVED_TOTAL, "kind" => step.kind()).increment(1);
            self.emit(SequencerEvent::StepResolved { index });
        }

        self.state.mark_finished();
        self.emit(SequencerEvent::Finished);
    }

    /// Runs one step to resolution. Returns `false` on cancellation.
    async fn run_step(&self, step: &Step) -> bool {
        match step {
            Step::Delay { duration } => self.pause(*duration).await,
            Step::TypedText {
                text,
                char_interval,
                ..
            } => {
                let len = text.chars().count();
                for revealed in 1..=len {
                    if !self.pause(*char_interval).await {
                        return false;
                    }
                    self.state.set_progress(revealed);
                }
                // One more tick after the last character flips completion;
                // empty text therefore still occupies a single tick.
                self.pause(*char_interval).await
            }
            Step::TickingBar {
                total_ticks,
                tick_interval,
                ..
            } => {
                if *total_ticks == 0 {
                    // A zero-length bar keeps its timing slot.
                    return self.pause(*tick_interval).await;
                }
                for tick in 1..=*total_ticks {
                    if !self.pause(*tick_interval).await {
                        return false;
                    }
                    self.state.set_progress(tick as usize);
                }
                true
            }
        }
    }

    /// Sleeps for `duration` unless cancelled first. Returns `false` on
    /// cancellation.
    async fn pause(&self, duration: Duration) -> bool {
        tokio::select! {
            () = self.cancel.cancelled() => false,
            () = tokio::time::sleep(duration) => true,
        }
    }

    fn emit(&self, event: SequencerEvent) {
        if self.cancel.is_cancelled() {
            return;
        }
        let _ = self.event_tx.send(event);
    }
}

impl std::fmt::Debug for RevealSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealSequencer")
            .field("num_steps", &self.steps.len())
            .field("current", &self.state.current_index())
            .field("finished", &self.state.is_finished())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn typed(text: &str, interval_ms: u64) -> Step {
        Step::TypedText {
            text: text.to_string(),
            char_interval: ms(interval_ms),
            prefix: None,
        }
    }

    /// Yields repeatedly so the spawned driver task can make progress.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    async fn drain(seq: &RevealSequencer) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        while let Some(event) = seq.recv_event().await {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_snapshot_before_start() {
        let seq = RevealSequencer::new(vec![typed("HI", 10)]);
        let snap = seq.snapshot();
        assert_eq!(snap.index, None);
        assert_eq!(snap.progress, StepProgress::Pending);
        assert!(!snap.finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_one_shot() {
        let seq = Arc::new(RevealSequencer::new(vec![Step::Delay { duration: ms(10) }]));
        let first = seq.start();
        assert!(first.is_some());
        assert!(seq.start().is_none());
        tokio::time::advance(ms(20)).await;
        settle().await;
        first.unwrap().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_step_list_finishes_immediately() {
        let seq = Arc::new(RevealSequencer::new(vec![]));
        let handle = seq.start().unwrap();
        settle().await;
        assert!(seq.snapshot().finished);
        assert_eq!(drain(&seq).await, vec![SequencerEvent::Finished]);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_delay_holds_first_step() {
        let seq = Arc::new(RevealSequencer::with_initial_delay(
            vec![Step::Delay { duration: ms(10) }],
            ms(100),
        ));
        let handle = seq.start().unwrap();
        settle().await;
        assert_eq!(seq.snapshot().index, None);

        tokio::time::advance(ms(100)).await;
        settle().await;
        assert_eq!(seq.snapshot().index, Some(0));

        tokio::time::advance(ms(10)).await;
        settle().await;
        assert!(seq.snapshot().finished);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_start_suppresses_everything() {
        let seq = Arc::new(RevealSequencer::new(vec![typed("RUN", 50)]));
        seq.cancel();
        let handle = seq.start().unwrap();
        tokio::time::advance(ms(10_000)).await;
        settle().await;
        assert!(drain(&seq).await.is_empty());
        assert!(!seq.snapshot().finished);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent_and_safe_after_finish() {
        let seq = Arc::new(RevealSequencer::new(vec![Step::Delay { duration: ms(10) }]));
        let handle = seq.start().unwrap();
        settle().await;
        tokio::time::advance(ms(10)).await;
        settle().await;
        assert!(seq.snapshot().finished);
        seq.cancel();
        seq.cancel();
        assert!(seq.is_cancelled());
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_tick_bar_occupies_one_interval() {
        let seq = Arc::new(RevealSequencer::new(vec![Step::TickingBar {
            total_ticks: 0,
            tick_interval: ms(100),
            label: None,
        }]));
        let handle = seq.start().unwrap();
        settle().await;
        assert!(!seq.snapshot().finished, "must not resolve instantly");

        tokio::time::advance(ms(100)).await;
        settle().await;
        assert!(seq.snapshot().finished);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_text_occupies_one_tick() {
        let seq = Arc::new(RevealSequencer::new(vec![typed("", 50)]));
        let handle = seq.start().unwrap();
        settle().await;
        assert!(!seq.snapshot().finished, "must not resolve instantly");

        tokio::time::advance(ms(50)).await;
        settle().await;
        assert!(seq.snapshot().finished);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_revealed_text_tracks_progress() {
        let seq = Arc::new(RevealSequencer::new(vec![typed("RUN", 50)]));
        let handle = seq.start().unwrap();
        settle().await;
        assert_eq!(seq.revealed_text(), "");

        tokio::time::advance(ms(50)).await;
        settle().await;
        assert_eq!(seq.revealed_text(), "R");

        tokio::time::advance(ms(100)).await;
        settle().await;
        assert_eq!(seq.revealed_text(), "RUN");
        assert!(!seq.snapshot().finished, "completion tick still pending");

        tokio::time::advance(ms(50)).await;
        settle().await;
        assert!(seq.snapshot().finished);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_debug_output() {
        let seq = RevealSequencer::new(vec![typed("X", 10)]);
        let debug = format!("{seq:?}");
        assert!(debug.contains("RevealSequencer"));
        assert!(debug.contains("num_steps: 1"));
    }
}
