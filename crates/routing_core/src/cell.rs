//! Cell codes painted onto and read back from a [`crate::grid::Grid`].
//!
//! Values are part of the on-disk contract: they are written verbatim into
//! emitted arrays, so they must never be renumbered.

/// Untouched cell.
pub const EMPTY: u8 = 0;
/// Part of the final target Steiner tree.
pub const PATH: u8 = 1;
/// Vertical (z-axis) connection between layers.
pub const VIA: u8 = 2;
/// In-plane crossing of two traces.
pub const INTERSECTION: u8 = 3;
/// A required terminal the target tree must connect.
pub const TERMINAL: u8 = 4;
/// Candidate routing segment cell in the source canvas.
pub const TRACE: u8 = 5;

/// True for codes the graph transformer treats as graph vertices.
#[inline]
pub fn is_vertex_code(code: u8) -> bool {
  matches!(code, INTERSECTION | VIA | TERMINAL)
}
