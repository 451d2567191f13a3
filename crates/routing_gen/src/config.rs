//! Hand-rolled INI configuration parsing.
//!
//! Strict `key = value` syntax with exactly one required space on each side
//! of `=`; `;` starts a comment; `[Section]` switches the active section.
//! There is no INI crate in the dependency graph because none of the
//! candidate crates match this exact grammar - it is reimplemented directly
//! from the format the original generator used.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{GenError, Result};

/// Raw key-value pairs grouped by section name, as read off disk.
#[derive(Default)]
struct RawIni {
  sections: HashMap<String, HashMap<String, String>>,
}

impl RawIni {
  fn section(&self, name: &str) -> Option<&HashMap<String, String>> {
    self.sections.get(name)
  }
}

fn parse_raw(path: &Path) -> Result<RawIni> {
  if !path.exists() {
    return Err(GenError::ConfigMissing(path.to_path_buf()));
  }

  let contents = std::fs::read_to_string(path).map_err(|source| GenError::IOError {
    path: path.to_path_buf(),
    source,
  })?;

  let mut raw = RawIni::default();
  let mut section_name = String::new();

  for (line_no, raw_line) in contents.lines().enumerate() {
    let line = raw_line.trim();
    if line.is_empty() || line.starts_with(';') {
      continue;
    }

    if let Some(stripped) = line.strip_prefix('[') {
      section_name = stripped.trim_end_matches(']').to_string();
      continue;
    }

    let separator = line.find('=').ok_or_else(|| GenError::ConfigParse {
      line: line_no + 1,
      text: line.to_string(),
      message: "expected a key = value pair but found nothing".to_string(),
    })?;

    if separator == 0 {
      return Err(GenError::ConfigParse {
        line: line_no + 1,
        text: line.to_string(),
        message: "expected a key but found nothing".to_string(),
      });
    }
    if separator == line.len() - 1 {
      return Err(GenError::ConfigParse {
        line: line_no + 1,
        text: line.to_string(),
        message: "expected a value but found nothing".to_string(),
      });
    }

    let bytes = line.as_bytes();
    let before = bytes[separator - 1] as char;
    let after = bytes[separator + 1] as char;
    if !before.is_whitespace() || !after.is_whitespace() {
      return Err(GenError::ConfigParse {
        line: line_no + 1,
        text: line.to_string(),
        message: "expected a single space on both sides of '='".to_string(),
      });
    }

    let key = line[..separator - 1].to_string();
    let value = line[separator + 2..].to_string();

    raw
      .sections
      .entry(section_name.clone())
      .or_default()
      .insert(key, value);
  }

  Ok(raw)
}

/// Generation parameters, already validated and clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Generation {
  pub size: u8,
  pub depth: u8,
  pub max_points: u8,
  pub desired_combinations: u32,
}

impl Default for Generation {
  fn default() -> Self {
    Self {
      size: 32,
      depth: 1,
      max_points: 4,
      desired_combinations: 100,
    }
  }
}

/// Fully resolved configuration: where to write output, and how to
/// enumerate terminal sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
  pub output: PathBuf,
  pub generation: Generation,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      output: default_output_dir(),
      generation: Generation::default(),
    }
  }
}

fn default_output_dir() -> PathBuf {
  std::env::current_dir()
    .unwrap_or_else(|_| PathBuf::from("."))
    .join("GeneratedData")
}

/// Read a numeric key, falling back to `default` (with a warning) if the
/// key is absent, unparsable, or outside `[min, max]`.
fn config_number<T>(section: &HashMap<String, String>, key: &str, default: T, min: T, max: T) -> T
where
  T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
{
  let Some(raw) = section.get(key) else {
    return default;
  };

  match raw.parse::<T>() {
    Ok(value) if value >= min && value <= max => value,
    Ok(value) => {
      warn!(
        key,
        %value, %min, %max, %default,
        "config value out of range, falling back to default"
      );
      default
    }
    Err(_) => {
      warn!(key, raw, %default, "config value could not be parsed, falling back to default");
      default
    }
  }
}

/// Parse and validate the configuration file at `path`.
pub fn load(path: &Path) -> Result<Config> {
  let raw = parse_raw(path)?;
  let mut config = Config::default();

  if let Some(section) = raw.section("Path") {
    if let Some(value) = section.get("Output") {
      config.output = PathBuf::from(value);
    }
  }

  if let Some(section) = raw.section("Generation") {
    let defaults = Generation::default();
    config.generation = Generation {
      size: config_number(section, "Size", defaults.size, 1, u8::MAX),
      depth: config_number(section, "Depth", defaults.depth, 1, u8::MAX),
      max_points: config_number(
        section,
        "MaxNumberOfPoints",
        defaults.max_points,
        1,
        u8::MAX,
      ),
      desired_combinations: config_number(
        section,
        "DesiredCombinations",
        defaults.desired_combinations,
        1,
        u32::MAX,
      ),
    };
  }

  Ok(config)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
  }

  #[test]
  fn missing_file_is_config_missing() {
    let err = load(Path::new("/nonexistent/config.ini")).unwrap_err();
    assert!(matches!(err, GenError::ConfigMissing(_)));
  }

  #[test]
  fn parses_sections_and_applies_values() {
    let file = write_temp(
      "[Path]\nOutput = /tmp/out\n\n[Generation]\nSize = 16\nDepth = 2\nMaxNumberOfPoints = 5\nDesiredCombinations = 50\n",
    );
    let config = load(file.path()).unwrap();

    assert_eq!(config.output, PathBuf::from("/tmp/out"));
    assert_eq!(config.generation.size, 16);
    assert_eq!(config.generation.depth, 2);
    assert_eq!(config.generation.max_points, 5);
    assert_eq!(config.generation.desired_combinations, 50);
  }

  #[test]
  fn absent_keys_fall_back_to_defaults() {
    let file = write_temp("[Generation]\nSize = 8\n");
    let config = load(file.path()).unwrap();

    assert_eq!(config.generation.size, 8);
    assert_eq!(config.generation.depth, Generation::default().depth);
  }

  #[test]
  fn out_of_range_value_falls_back_to_default() {
    let file = write_temp("[Generation]\nMaxNumberOfPoints = 0\n");
    let config = load(file.path()).unwrap();
    assert_eq!(
      config.generation.max_points,
      Generation::default().max_points
    );
  }

  #[test]
  fn missing_equals_is_a_parse_error() {
    let file = write_temp("[Generation]\nSize 8\n");
    let err = load(file.path()).unwrap_err();
    assert!(matches!(err, GenError::ConfigParse { .. }));
  }

  #[test]
  fn missing_space_around_equals_is_a_parse_error() {
    let file = write_temp("[Generation]\nSize=8\n");
    let err = load(file.path()).unwrap_err();
    assert!(matches!(err, GenError::ConfigParse { .. }));
  }

  #[test]
  fn comment_lines_are_ignored() {
    let file = write_temp("; a comment\n[Generation]\nSize = 8\n");
    let config = load(file.path()).unwrap();
    assert_eq!(config.generation.size, 8);
  }
}
