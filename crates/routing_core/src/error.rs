//! Error types for the routing core.

use thiserror::Error;

/// Result alias used throughout `routing_core`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Failures raised by the core pipeline.
///
/// These are invariant violations, not recoverable user-facing conditions:
/// callers that hit them have a bug, not bad input.
#[derive(Debug, Error)]
pub enum CoreError {
  /// A grid access addressed a coordinate outside the grid's shape.
  #[error(
    "coordinate ({x}, {y}, {z}) is out of bounds for shape ({width}, {height}, {depth})"
  )]
  OutOfBounds {
    x: u16,
    y: u16,
    z: u16,
    width: u8,
    height: u8,
    depth: u8,
  },

  /// The grid's backing buffer could not be allocated.
  #[error("failed to allocate a grid of {0} cells")]
  AllocFailure(usize),
}
