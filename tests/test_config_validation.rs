//! Configuration loading and validation against real files.

use std::io::Write;
use std::path::Path;

use hashgrid::config::{ConfigLimits, PuzzleCategory, loader};
use hashgrid::error::ConfigError;

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn shipped_default_config_loads_clean() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("library/decrypt.yaml");
    let loaded = loader::load(&path).unwrap();

    assert_eq!(loaded.config.puzzles.len(), 19);
    assert!(loaded.warnings.is_empty(), "warnings: {:?}", loaded.warnings);

    // Script and intro made it through with the reference timings.
    assert_eq!(loaded.config.boot.len(), 12);
    let intro = loaded.config.intro.as_ref().unwrap();
    assert_eq!(intro.strokes.len(), 4);
    assert_eq!(
        intro.strokes[3].start_after,
        std::time::Duration::from_millis(1700)
    );

    // Spot-check the table.
    let first = &loaded.config.puzzles[0];
    assert_eq!(first.id, 1);
    assert_eq!(first.cipher, "U1lTVEVN");
    assert_eq!(first.answer, "SYSTEM");
    assert_eq!(first.category, PuzzleCategory::Base64);

    let wide = loaded
        .config
        .puzzles
        .iter()
        .find(|p| p.id == 23)
        .unwrap();
    assert_eq!(wide.span, 2);
    assert_eq!(wide.category, PuzzleCategory::Des);
}

#[test]
fn duplicate_puzzle_ids_are_rejected() {
    let file = write_temp(
        r"
game:
  name: sample
puzzles:
  - { id: 1, cipher: UlVO, answer: RUN, category: base64, hint: Standard-64 }
  - { id: 1, cipher: UlVO, answer: RUN, category: base64, hint: Standard-64 }
",
    );
    match loader::load(file.path()) {
        Err(ConfigError::ValidationError { errors, .. }) => {
            assert!(errors.iter().any(|e| e.message.contains("duplicate id 1")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn span_outside_grid_widths_is_rejected() {
    let file = write_temp(
        r"
game:
  name: sample
puzzles:
  - { id: 1, cipher: UlVO, answer: RUN, category: base64, hint: Standard-64, span: 4 }
",
    );
    match loader::load(file.path()) {
        Err(ConfigError::ValidationError { errors, .. }) => {
            assert!(errors[0].path.contains("span"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn blank_answer_is_rejected() {
    let file = write_temp(
        r"
game:
  name: sample
puzzles:
  - { id: 1, cipher: UlVO, answer: '  ', category: base64, hint: Standard-64 }
",
    );
    assert!(matches!(
        loader::load(file.path()),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn zero_tick_bar_warns_but_loads() {
    let file = write_temp(
        r"
game:
  name: sample
boot:
  - { type: ticking_bar, total_ticks: 0, tick_interval: 100ms }
puzzles:
  - { id: 1, cipher: UlVO, answer: RUN, category: base64, hint: Standard-64 }
",
    );
    let loaded = loader::load(file.path()).unwrap();
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].message.contains("zero ticks"));
}

#[test]
fn unknown_category_is_a_parse_error() {
    let file = write_temp(
        r"
game:
  name: sample
puzzles:
  - { id: 1, cipher: UlVO, answer: RUN, category: rot13, hint: Classic }
",
    );
    assert!(matches!(
        loader::load(file.path()),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn bad_duration_string_is_a_parse_error() {
    let file = write_temp(
        r"
game:
  name: sample
boot:
  - { type: delay, duration: soonish }
puzzles:
  - { id: 1, cipher: UlVO, answer: RUN, category: base64, hint: Standard-64 }
",
    );
    assert!(matches!(
        loader::load(file.path()),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn limits_can_be_tightened() {
    let file = write_temp(
        r"
game:
  name: sample
puzzles:
  - { id: 1, cipher: UlVO, answer: RUN, category: base64, hint: Standard-64 }
  - { id: 2, cipher: UlVO, answer: RUN, category: base64, hint: Standard-64 }
",
    );
    let limits = ConfigLimits {
        max_puzzles: 1,
        ..ConfigLimits::default()
    };
    assert!(matches!(
        loader::load_with_limits(file.path(), &limits),
        Err(ConfigError::ValidationError { .. })
    ));
}
