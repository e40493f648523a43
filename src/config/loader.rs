//! Configuration loader
//!
//! Loading pipeline:
//! 1. File size check
//! 2. Read and strip a UTF-8 BOM if present
//! 3. YAML parsing
//! 4. Validation
//! 5. Freeze with `Arc`

use std::path::Path;
use std::sync::Arc;

use crate::error::ConfigError;

use super::schema::GameConfig;
use super::validation;

// ============================================================================
// Limits
// ============================================================================

/// Limits on configuration size to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum number of puzzles in the table.
    pub max_puzzles: usize,

    /// Maximum number of steps in a single script section.
    pub max_steps: usize,

    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_puzzles: env_or("HASHGRID_MAX_PUZZLES", 500),
            max_steps: env_or("HASHGRID_MAX_STEPS", 200),
            max_config_size: env_or("HASHGRID_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

/// Parses an environment variable with a default value.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Load result
// ============================================================================

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: Arc<GameConfig>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

// ============================================================================
// Loading
// ============================================================================

/// Loads a configuration file with default limits.
///
/// # Errors
///
/// Returns an error if the file cannot be read, YAML parsing fails, or
/// validation fails.
pub fn load(path: &Path) -> Result<LoadResult, ConfigError> {
    load_with_limits(path, &ConfigLimits::default())
}

/// Loads a configuration file with the given limits.
///
/// # Errors
///
/// Returns an error if the file cannot be read, exceeds the size limit,
/// YAML parsing fails, or validation fails.
pub fn load_with_limits(path: &Path, limits: &ConfigLimits) -> Result<LoadResult, ConfigError> {
    // Stage 1: size check
    let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
        path: path.to_path_buf(),
    })?;
    let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    if file_size > limits.max_config_size {
        return Err(ConfigError::InvalidValue {
            field: "file_size".to_string(),
            value: format!("{file_size} bytes"),
            expected: format!("at most {} bytes", limits.max_config_size),
        });
    }

    // Stage 2: read, handle UTF-8 BOM
    let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
        path: path.to_path_buf(),
    })?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    // Stage 3: YAML parsing
    if raw.trim().is_empty() {
        return Err(ConfigError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message: "configuration file is empty".to_string(),
        });
    }
    let config: GameConfig = serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })?;

    // Stage 4: validation
    let result = validation::validate(&config, limits);
    if result.has_errors() {
        return Err(ConfigError::ValidationError {
            path: path.display().to_string(),
            errors: result.errors,
        });
    }

    let warnings = result
        .warnings
        .into_iter()
        .map(|issue| LoadWarning {
            message: issue.message,
            location: Some(issue.path),
        })
        .collect();

    // Stage 5: freeze
    Ok(LoadResult {
        config: Arc::new(config),
        warnings,
    })
}

// ============================================================================
// Tests
// ============================================================================
