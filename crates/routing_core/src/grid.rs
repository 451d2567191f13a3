//! Dense 3D cell grid with layer-major storage and bounds-checked access.
//!
//! Index layout mirrors the serialized array shape `(depth, height, width)`:
//! z varies slowest, x fastest. See `coord_to_index`.

use crate::cell;
use crate::error::{CoreError, Result};

/// Grid dimensions. All three axes are clamped to `[1, 255]` by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
  pub width: u8,
  pub height: u8,
  pub depth: u8,
}

impl Shape {
  pub fn new(width: u8, height: u8, depth: u8) -> Self {
    Self {
      width,
      height,
      depth,
    }
  }

  /// Total number of cells, `width * height * depth`.
  pub fn volume(&self) -> usize {
    self.width as usize * self.height as usize * self.depth as usize
  }
}

/// A coordinate triple on a grid of some [`Shape`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
  pub x: u8,
  pub y: u8,
  pub z: u8,
}

impl Coordinate {
  pub fn new(x: u8, y: u8, z: u8) -> Self {
    Self { x, y, z }
  }
}

/// Dense 3D array of [`cell`] codes.
pub struct Grid {
  shape: Shape,
  cells: Vec<u8>,
}

/// Convert 3D coordinates to a linear index in layer-major (z, y, x) order.
#[inline]
fn coord_to_index(x: u8, y: u8, z: u8, shape: Shape) -> usize {
  let layer = shape.width as usize * shape.height as usize;
  z as usize * layer + y as usize * shape.width as usize + x as usize
}

impl Grid {
  /// Allocate a zero-filled grid of the given shape.
  pub fn new(width: u8, height: u8, depth: u8) -> Result<Self> {
    let shape = Shape::new(width, height, depth);
    let len = shape.volume();

    let mut cells = Vec::new();
    cells
      .try_reserve_exact(len)
      .map_err(|_| CoreError::AllocFailure(len))?;
    cells.resize(len, cell::EMPTY);

    Ok(Self { shape, cells })
  }

  pub fn shape(&self) -> Shape {
    self.shape
  }

  fn checked_index(&self, x: u8, y: u8, z: u8) -> Result<usize> {
    if x >= self.shape.width || y >= self.shape.height || z >= self.shape.depth {
      return Err(CoreError::OutOfBounds {
        x: x as u16,
        y: y as u16,
        z: z as u16,
        width: self.shape.width,
        height: self.shape.height,
        depth: self.shape.depth,
      });
    }
    Ok(coord_to_index(x, y, z, self.shape))
  }

  pub fn get(&self, x: u8, y: u8, z: u8) -> Result<u8> {
    let idx = self.checked_index(x, y, z)?;
    Ok(self.cells[idx])
  }

  pub fn set(&mut self, x: u8, y: u8, z: u8, value: u8) -> Result<()> {
    let idx = self.checked_index(x, y, z)?;
    self.cells[idx] = value;
    Ok(())
  }

  /// Contiguous buffer in layer-major (z, y, x) order, ready for serialization.
  pub fn raw_bytes(&self) -> &[u8] {
    &self.cells
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_grid_is_zeroed() {
    let grid = Grid::new(4, 3, 2).unwrap();
    assert_eq!(grid.raw_bytes().len(), 24);
    assert!(grid.raw_bytes().iter().all(|&c| c == cell::EMPTY));
  }

  #[test]
  fn get_set_round_trip() {
    let mut grid = Grid::new(4, 3, 2).unwrap();
    grid.set(3, 2, 1, cell::TERMINAL).unwrap();
    assert_eq!(grid.get(3, 2, 1).unwrap(), cell::TERMINAL);
    assert_eq!(grid.get(0, 0, 0).unwrap(), cell::EMPTY);
  }

  #[test]
  fn out_of_bounds_is_an_error() {
    let grid = Grid::new(4, 3, 2).unwrap();
    assert!(matches!(
      grid.get(4, 0, 0),
      Err(CoreError::OutOfBounds { .. })
    ));
    assert!(matches!(
      grid.get(0, 3, 0),
      Err(CoreError::OutOfBounds { .. })
    ));
    assert!(matches!(
      grid.get(0, 0, 2),
      Err(CoreError::OutOfBounds { .. })
    ));
  }

  #[test]
  fn layer_major_index_matches_serialized_shape() {
    // (D, H, W) serialization order: z is the slowest-varying axis.
    let mut grid = Grid::new(2, 2, 2).unwrap();
    grid.set(0, 0, 1, cell::TERMINAL).unwrap();
    let bytes = grid.raw_bytes();
    // layer z=1 starts at offset width*height = 4
    assert_eq!(bytes[4], cell::TERMINAL);
  }
}
