//! CLI argument definitions
//!
//! All Clap derive structs for `HashGrid` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Decrypt-the-hash puzzle game in your terminal.
#[derive(Parser, Debug)]
#[command(name = "hashgrid", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "HASHGRID_COLOR")]
    pub color: ColorChoice,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play the game: intro, boot script, then the puzzle grid.
    Play(PlayArgs),

    /// Validate configuration files without starting the game.
    Validate(ValidateArgs),

    /// List puzzles and scripts from a configuration file.
    List(ListArgs),
}

// ============================================================================
// Play
// ============================================================================

/// Arguments for `play`.
#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Path to the YAML game configuration.
    #[arg(
        short,
        long,
        default_value = "library/decrypt.yaml",
        env = "HASHGRID_CONFIG"
    )]
    pub config: PathBuf,

    /// Sign in under this player name. Without it the grid is locked.
    #[arg(long, env = "HASHGRID_PLAYER")]
    pub player: Option<String>,

    /// Base URL of a remote progress store. Defaults to in-process.
    #[arg(long, env = "HASHGRID_STORE_URL")]
    pub store_url: Option<String>,

    /// Skip the logo intro animation.
    #[arg(long)]
    pub skip_intro: bool,

    /// Skip the boot terminal script.
    #[arg(long)]
    pub skip_boot: bool,
}

// ============================================================================
// Validate
// ============================================================================

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// List
// ============================================================================

/// Arguments for `list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Path to the YAML game configuration.
    #[arg(
        short,
        long,
        default_value = "library/decrypt.yaml",
        env = "HASHGRID_CONFIG"
    )]
    pub config: PathBuf,

    /// Category to list.
    #[arg(default_value = "all")]
    pub category: ListCategory,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Config listing category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ListCategory {
    /// The puzzle table.
    Puzzles,
    /// The boot script steps.
    Boot,
    /// Everything.
    #[default]
    All,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_defaults() {
        let cli = Cli::try_parse_from(["hashgrid", "play"]).unwrap();
        let Commands::Play(args) = cli.command else {
            panic!("expected PlayArgs");
        };
        assert_eq!(args.config, PathBuf::from("library/decrypt.yaml"));
        assert!(args.player.is_none());
        assert!(!args.skip_intro);
    }

    #[test]
    fn test_play_with_player_and_store() {
        let cli = Cli::try_parse_from([
            "hashgrid",
            "play",
            "--player",
            "neo",
            "--store-url",
            "http://localhost:8080",
        ])
        .unwrap();
        let Commands::Play(args) = cli.command else {
            panic!("expected PlayArgs");
        };
        assert_eq!(args.player.as_deref(), Some("neo"));
        assert_eq!(args.store_url.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn test_validate_requires_files() {
        let result = Cli::try_parse_from(["hashgrid", "validate"]);
        assert!(result.is_err(), "expected error for missing files");
    }

    #[test]
    fn test_validate_strict_flag() {
        let cli = Cli::try_parse_from(["hashgrid", "validate", "--strict", "a.yaml"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected ValidateArgs");
        };
        assert!(args.strict);
        assert_eq!(args.files.len(), 1);
    }

    #[test]
    fn test_list_categories_parse() {
        for category in ["puzzles", "boot", "all"] {
            let cli = Cli::try_parse_from(["hashgrid", "list", category]);
            assert!(cli.is_ok(), "failed to parse category={category}");
        }
    }

    #[test]
    fn test_color_choices_parse() {
        for variant in ["auto", "always", "never"] {
            let cli = Cli::try_parse_from(["hashgrid", "--color", variant, "play"]);
            assert!(cli.is_ok(), "failed to parse color={variant}");
        }
    }

    #[test]
    fn test_verbose_count() {
        let cli = Cli::try_parse_from(["hashgrid", "-vvv", "play"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::try_parse_from(["hashgrid", "--quiet", "play"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_help_output() {
        let result = Cli::try_parse_from(["hashgrid", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let result = Cli::try_parse_from(["hashgrid", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
