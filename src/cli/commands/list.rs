//! `list` command: print the puzzle table and scripts from a config.

use serde_json::json;

use crate::cli::args::{ListArgs, ListCategory, OutputFormat};
use crate::config::loader;
use crate::error::HashGridError;

/// Lists the requested config sections.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn run(args: &ListArgs) -> Result<(), HashGridError> {
    let loaded = loader::load(&args.config)?;
    let config = loaded.config;

    let show_puzzles = matches!(args.category, ListCategory::Puzzles | ListCategory::All);
    let show_boot = matches!(args.category, ListCategory::Boot | ListCategory::All);

    if args.format == OutputFormat::Json {
        let mut out = serde_json::Map::new();
        if show_puzzles {
            out.insert("puzzles".to_string(), json!(config.puzzles));
        }
        if show_boot {
            out.insert("boot".to_string(), json!(config.boot));
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if show_puzzles {
        println!("puzzles ({}):", config.puzzles.len());
        for puzzle in &config.puzzles {
            println!(
                "  #{:<3} [{}] span={} hint={:<14} {}",
                puzzle.id, puzzle.category, puzzle.span, puzzle.hint, puzzle.cipher
            );
        }
    }
    if show_boot {
        println!("boot script ({} steps):", config.boot.len());
        for (i, step) in config.boot.iter().enumerate() {
            println!("  {i:>2}. {}", step.kind());
        }
    }

    Ok(())
}
