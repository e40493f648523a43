//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod list;
pub mod play;
pub mod validate;

use crate::cli::args::{Cli, Commands};
use crate::error::HashGridError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), HashGridError> {
    match cli.command {
        Commands::Play(args) => play::run(&args).await,
        Commands::Validate(args) => validate::run(&args),
        Commands::List(args) => list::run(&args),
    }
}
