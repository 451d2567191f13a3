//! Error types for configuration, array serialization, and the driver.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
  #[error("config file not found: {0}")]
  ConfigMissing(std::path::PathBuf),

  #[error("malformed config line {line}: {message}\n  \"{text}\"")]
  ConfigParse {
    line: usize,
    text: String,
    message: String,
  },

  /// String-valued keys fail fatally on a type mismatch; numeric keys are
  /// handled by the caller (log + fall back to default) and never produce
  /// this variant.
  #[error("config key \"{key}\" could not be read as a string")]
  ConfigType { key: String },

  #[error("I/O failure on {path}: {source}")]
  IOError {
    path: std::path::PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Core(#[from] routing_core::CoreError),
}
