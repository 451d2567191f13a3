//! Paints a source canvas for a set of terminal coordinates: borders, axis
//! traces through each terminal, intersections, and vias.

use crate::cell;
use crate::error::Result;
use crate::grid::{Coordinate, Grid};

/// Paint `grid` in place for the given terminals, in the order given.
///
/// `grid` must be freshly allocated (all-empty); this is not idempotent
/// across repeated calls with different terminal sets.
pub fn paint(grid: &mut Grid, terminals: &[Coordinate]) -> Result<()> {
  let shape = grid.shape();

  for z in 0..shape.depth {
    for x in 0..shape.width {
      grid.set(x, 0, z, cell::TRACE)?;
      grid.set(x, shape.height - 1, z, cell::TRACE)?;
    }
    for y in 0..shape.height {
      grid.set(0, y, z, cell::TRACE)?;
      grid.set(shape.width - 1, y, z, cell::TRACE)?;
    }
    grid.set(0, 0, z, cell::INTERSECTION)?;
    grid.set(shape.width - 1, 0, z, cell::INTERSECTION)?;
    grid.set(0, shape.height - 1, z, cell::INTERSECTION)?;
    grid.set(shape.width - 1, shape.height - 1, z, cell::INTERSECTION)?;
  }

  for &Coordinate { x: tx, y: ty, z: tz } in terminals {
    grid.set(tx, ty, tz, cell::TERMINAL)?;

    let mut x_line_free = false;
    for x in 0..shape.width {
      if grid.get(x, ty, tz)? == cell::EMPTY {
        x_line_free = true;
        break;
      }
    }
    if x_line_free {
      for x in 0..shape.width {
        let value = grid.get(x, ty, tz)?;
        if value == cell::EMPTY {
          grid.set(x, ty, tz, cell::TRACE)?;
        } else if value != cell::TERMINAL && ty != 0 && ty != shape.height - 1 {
          grid.set(x, ty, tz, cell::INTERSECTION)?;
        }
      }
    }

    let mut y_line_free = false;
    for y in 0..shape.height {
      if grid.get(tx, y, tz)? == cell::EMPTY {
        y_line_free = true;
        break;
      }
    }
    if y_line_free {
      for y in 0..shape.height {
        let value = grid.get(tx, y, tz)?;
        if value == cell::EMPTY {
          grid.set(tx, y, tz, cell::TRACE)?;
        } else if value != cell::TERMINAL && tx != 0 && tx != shape.width - 1 {
          grid.set(tx, y, tz, cell::INTERSECTION)?;
        }
      }
    }

    let mut z_line_free = false;
    for z in 0..shape.depth {
      if grid.get(tx, ty, z)? == cell::EMPTY {
        z_line_free = true;
        break;
      }
    }
    if z_line_free {
      for z in 0..shape.depth {
        let value = grid.get(tx, ty, z)?;
        if value == cell::EMPTY {
          grid.set(tx, ty, z, cell::TRACE)?;
        } else if value != cell::TERMINAL {
          grid.set(tx, ty, z, cell::VIA)?;
        }
      }
    }
  }

  Ok(())
}
