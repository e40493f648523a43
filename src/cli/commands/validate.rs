//! `validate` command: check configuration files without playing.

use serde_json::json;
use tracing::debug;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::loader;
use crate::error::{ConfigError, HashGridError};

/// Validates each file and reports per-file status.
///
/// With `--strict`, warnings count as failures.
///
/// # Errors
///
/// Returns the first encountered [`ConfigError`] if any file fails.
pub fn run(args: &ValidateArgs) -> Result<(), HashGridError> {
    let mut first_failure: Option<ConfigError> = None;
    let mut reports = Vec::new();

    for path in &args.files {
        debug!(path = %path.display(), "validating");
        match loader::load(path) {
            Ok(result) => {
                let strict_fail = args.strict && !result.warnings.is_empty();
                reports.push(json!({
                    "file": path.display().to_string(),
                    "ok": !strict_fail,
                    "puzzles": result.config.puzzles.len(),
                    "warnings": result
                        .warnings
                        .iter()
                        .map(|w| w.message.clone())
                        .collect::<Vec<_>>(),
                }));
                if args.format == OutputFormat::Human {
                    let status = if strict_fail { "FAIL (strict)" } else { "OK" };
                    println!("{status}: {} ({} puzzles)", path.display(), result.config.puzzles.len());
                    for warning in &result.warnings {
                        let location = warning.location.as_deref().unwrap_or("<config>");
                        println!("  warning: {} at {location}", warning.message);
                    }
                }
                if strict_fail && first_failure.is_none() {
                    first_failure = Some(ConfigError::InvalidValue {
                        field: path.display().to_string(),
                        value: format!("{} warnings", result.warnings.len()),
                        expected: "no warnings in strict mode".to_string(),
                    });
                }
            }
            Err(err) => {
                reports.push(json!({
                    "file": path.display().to_string(),
                    "ok": false,
                    "error": err.to_string(),
                }));
                if args.format == OutputFormat::Human {
                    println!("FAIL: {}", path.display());
                    println!("  {err}");
                    if let ConfigError::ValidationError { errors, .. } = &err {
                        for issue in errors {
                            println!("  {issue}");
                        }
                    }
                }
                if first_failure.is_none() {
                    first_failure = Some(err);
                }
            }
        }
    }

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    match first_failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
