//! `play` command: intro animation, boot script, then the puzzle grid.
//!
//! The renderer polls sequencer snapshots on a frame interval and drains
//! completion events for line management. Game input is a plain blocking
//! stdin loop; hold timers keep running on the runtime's worker threads.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::auth::{AuthProvider, StaticAuth};
use crate::cli::args::PlayArgs;
use crate::config::{GameConfig, IntroConfig, PuzzleId, PuzzleSet, loader};
use crate::error::HashGridError;
use crate::sequencer::{RevealSequencer, SequencerEvent, Step, StepProgress};
use crate::session::{Feedback, PuzzleSession};
use crate::store::{HttpStore, MemoryStore, ProgressStore};

/// Render frame interval; fast enough to catch every 50ms typing tick.
const FRAME: Duration = Duration::from_millis(25);

/// Runs the game.
///
/// # Errors
///
/// Returns an error if the configuration fails to load or terminal I/O
/// fails. Store failures during play are reported inline and recoverable.
pub async fn run(args: &PlayArgs) -> Result<(), HashGridError> {
    let loaded = loader::load(&args.config)?;
    for warning in &loaded.warnings {
        warn!(
            location = warning.location.as_deref().unwrap_or("<config>"),
            "{}", warning.message
        );
    }
    let config = loaded.config;

    let auth: Arc<dyn AuthProvider> = Arc::new(
        args.player
            .as_deref()
            .map_or_else(StaticAuth::signed_out, StaticAuth::signed_in),
    );
    let store: Arc<dyn ProgressStore> = match &args.store_url {
        Some(url) => Arc::new(HttpStore::new(url.clone())),
        None => Arc::new(MemoryStore::new()),
    };

    if !args.skip_intro {
        if let Some(intro) = &config.intro {
            render_intro(intro).await?;
        }
    }
    if !args.skip_boot && !config.boot.is_empty() {
        render_boot(&config.boot).await?;
    }

    let puzzles = Arc::new(PuzzleSet::new(config.puzzles.clone()));
    let session = Arc::new(PuzzleSession::new(
        puzzles,
        Arc::clone(&auth),
        store,
        config.timing.clone(),
    ));
    session.register().await;
    if let Err(err) = session.refresh_progress().await {
        warn!(%err, "initial progress query failed");
    }

    game_loop(&session, &config, auth.as_ref()).await?;
    session.shutdown();
    Ok(())
}

// ============================================================================
// Intro renderer
// ============================================================================

/// Draws the staggered stroke bars on one line, then the title.
///
/// Each stroke is its own sequencer instance; nothing coordinates them
/// beyond their configured start offsets.
async fn render_intro(intro: &IntroConfig) -> io::Result<()> {
    let sequencers: Vec<Arc<RevealSequencer>> = intro
        .strokes
        .iter()
        .map(|stroke| {
            Arc::new(RevealSequencer::with_initial_delay(
                stroke.steps(),
                stroke.start_after,
            ))
        })
        .collect();
    let handles: Vec<_> = sequencers.iter().filter_map(RevealSequencer::start).collect();

    let mut out = io::stdout();
    if !sequencers.is_empty() {
        let mut ticker = tokio::time::interval(Duration::from_millis(50));
        loop {
            ticker.tick().await;
            let mut line = String::from("\r");
            for (sequencer, stroke) in sequencers.iter().zip(&intro.strokes) {
                let count = match sequencer.snapshot().progress {
                    StepProgress::Ticking { count } => count,
                    _ => 0,
                };
                line.push_str(&bar_text(count, stroke.ticks));
                line.push(' ');
            }
            out.write_all(line.as_bytes())?;
            out.flush()?;
            if sequencers.iter().all(|s| s.snapshot().finished) {
                break;
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "\n  {}\n", intro.title)?;
    out.flush()?;
    tokio::time::sleep(intro.title_hold).await;

    for handle in handles {
        let _ = handle.await;
    }
    Ok(())
}

// ============================================================================
// Boot script renderer
// ============================================================================

/// Plays the boot script: typed lines appear character by character,
/// ticking bars redraw in place.
async fn render_boot(steps: &[Step]) -> io::Result<()> {
    let sequencer = Arc::new(RevealSequencer::new(steps.to_vec()));
    let handle = sequencer.start();

    let mut out = io::stdout();
    // Step index the echo state below belongs to.
    let mut active: Option<usize> = None;
    // Characters already echoed for the active typed step.
    let mut printed = 0usize;

    let mut ticker = tokio::time::interval(FRAME);
    loop {
        ticker.tick().await;

        while let Some(event) = sequencer.recv_event().await {
            match event {
                SequencerEvent::StepStarted { index } => {
                    active = Some(index);
                    printed = 0;
                    match sequencer.step(index) {
                        Some(Step::TypedText {
                            prefix: Some(prefix),
                            ..
                        }) => write!(out, "{prefix}")?,
                        Some(Step::TickingBar {
                            total_ticks, label, ..
                        }) => draw_bar(&mut out, label.as_deref(), 0, *total_ticks)?,
                        _ => {}
                    }
                }
                SequencerEvent::StepResolved { index } => {
                    match sequencer.step(index) {
                        Some(step @ Step::TypedText { .. }) => {
                            // Echo whatever the frame loop has not caught up on.
                            let tail: String =
                                step.typed_slice(usize::MAX).chars().skip(printed).collect();
                            writeln!(out, "{tail}")?;
                        }
                        Some(Step::TickingBar {
                            total_ticks, label, ..
                        }) => {
                            draw_bar(&mut out, label.as_deref(), *total_ticks, *total_ticks)?;
                            writeln!(out)?;
                        }
                        _ => {}
                    }
                    active = None;
                    printed = 0;
                }
                SequencerEvent::Finished => {}
            }
        }

        let snapshot = sequencer.snapshot();
        if snapshot.index == active {
            match (active.and_then(|i| sequencer.step(i)), snapshot.progress) {
                (
                    Some(step @ Step::TypedText { .. }),
                    StepProgress::Typing { revealed },
                ) if revealed > printed => {
                    let fresh: String =
                        step.typed_slice(revealed).chars().skip(printed).collect();
                    write!(out, "{fresh}")?;
                    printed = revealed;
                }
                (
                    Some(Step::TickingBar {
                        total_ticks, label, ..
                    }),
                    StepProgress::Ticking { count },
                ) => draw_bar(&mut out, label.as_deref(), count, *total_ticks)?,
                _ => {}
            }
        }
        out.flush()?;

        if snapshot.finished {
            break;
        }
    }

    // The last resolution may land between a drain and the final snapshot;
    // echo whatever is still queued so no line loses its tail.
    while let Some(event) = sequencer.recv_event().await {
        if let SequencerEvent::StepResolved { index } = event {
            match sequencer.step(index) {
                Some(step @ Step::TypedText { .. }) => {
                    let tail: String =
                        step.typed_slice(usize::MAX).chars().skip(printed).collect();
                    writeln!(out, "{tail}")?;
                    printed = 0;
                }
                Some(Step::TickingBar {
                    total_ticks, label, ..
                }) => {
                    draw_bar(&mut out, label.as_deref(), *total_ticks, *total_ticks)?;
                    writeln!(out)?;
                }
                _ => {}
            }
        }
    }
    out.flush()?;

    if let Some(handle) = handle {
        let _ = handle.await;
    }
    Ok(())
}

fn bar_text(count: u32, total: u32) -> String {
    let filled = "█".repeat(count as usize);
    let rest = ".".repeat(total.saturating_sub(count) as usize);
    format!("[{filled}{rest}]")
}

fn draw_bar(out: &mut impl Write, label: Option<&str>, count: u32, total: u32) -> io::Result<()> {
    let bar = bar_text(count, total);
    match label {
        Some(label) => write!(out, "\r> {label} {bar}"),
        None => write!(out, "\r{bar}"),
    }
}

// ============================================================================
// Game loop
// ============================================================================

async fn game_loop(
    session: &Arc<PuzzleSession>,
    config: &GameConfig,
    auth: &dyn AuthProvider,
) -> Result<(), HashGridError> {
    if let Some(tagline) = &config.game.tagline {
        println!("{tagline}");
    }
    match auth.identity() {
        Some(identity) => println!("AGENT: {}", identity.display_name()),
        None => println!("LOGIN_REQUIRED — restart with --player <name> to unlock the grid"),
    }
    print_grid(session);

    loop {
        print!("\n[id / grid / board / quit] > ");
        io::stdout().flush()?;
        let Some(line) = read_line()? else { break };
        let input = line.trim().to_lowercase();
        match input.as_str() {
            "" => {}
            "quit" | "q" | "exit" => break,
            "grid" | "g" => print_grid(session),
            "board" | "b" => print_leaderboard(session).await,
            _ => {
                let Ok(id) = input.parse::<PuzzleId>() else {
                    println!("unrecognized command");
                    continue;
                };
                if session.select_puzzle(id) {
                    play_selected(session, id).await?;
                } else if !auth.is_authenticated() {
                    println!("LOGIN_REQUIRED");
                } else if session.is_solved(id) {
                    println!("ACCESS GRANTED — already decrypted");
                } else {
                    println!("no such block");
                }
            }
        }
    }
    Ok(())
}

/// Guess loop for the open puzzle; `back` or a blank line closes it.
async fn play_selected(
    session: &Arc<PuzzleSession>,
    id: PuzzleId,
) -> Result<(), HashGridError> {
    let Some(puzzle) = session.puzzles().get(id).cloned() else {
        return Ok(());
    };
    println!("PROTOCOL: {}", puzzle.hint);
    println!("ENCRYPTED MESSAGE: {}", puzzle.cipher);

    while session.selected() == Some(id) {
        print!("decrypt> ");
        io::stdout().flush()?;
        let Some(line) = read_line()? else { break };
        let guess = line.trim();
        if guess.is_empty() || guess.eq_ignore_ascii_case("back") {
            session.close_puzzle();
            break;
        }
        match session.submit_guess(guess).await {
            Ok(Feedback::Success) => {
                println!("ACCESS GRANTED");
                break;
            }
            Ok(_) => println!("INVALID HASH — ACCESS DENIED"),
            Err(err) => println!("UPLINK FAILURE: {err} (solve not recorded, try again)"),
        }
    }
    Ok(())
}

fn print_grid(session: &PuzzleSession) {
    println!(
        "\nHASHING GRID — {} / {} decrypted",
        session.solved_count(),
        session.puzzles().len()
    );
    for puzzle in session.puzzles().iter() {
        let solved = session.is_solved(puzzle.id);
        let marker = if solved { "*" } else { " " };
        let text = if solved { "ACCESS GRANTED" } else { puzzle.cipher.as_str() };
        println!(
            " [{marker}] #{:<3} {:<6} {text}",
            puzzle.id,
            puzzle.category.to_string()
        );
    }
}

async fn print_leaderboard(session: &PuzzleSession) {
    match session.leaderboard().await {
        Ok(entries) if entries.is_empty() => println!("Syncing Neural Net..."),
        Ok(entries) => {
            println!("HALL OF FAME");
            for (position, entry) in entries.iter().enumerate() {
                println!(
                    " #{:<3} {:<20} PTS: {:<6} decrypted: {}",
                    position + 1,
                    entry.name,
                    entry.score,
                    entry.solved_challenges.len()
                );
            }
        }
        Err(err) => println!("leaderboard unavailable: {err}"),
    }
}

/// Reads one line from stdin; `None` on EOF.
fn read_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    let read = io::stdin().read_line(&mut line)?;
    Ok((read > 0).then_some(line))
}
