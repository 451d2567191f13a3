//! Bidirectional conversion between a [`Grid`] and a [`Graph`], preserving
//! vertex coordinates.

use std::collections::{HashMap, VecDeque};

use crate::cell;
use crate::error::Result;
use crate::graph::Graph;
use crate::grid::{Coordinate, Grid, Shape};

const DIRECTIONS: [(i16, i16, i16); 6] = [
  (1, 0, 0),
  (-1, 0, 0),
  (0, 1, 0),
  (0, -1, 0),
  (0, 0, 1),
  (0, 0, -1),
];

/// Extract the weighted graph of intersection/via/terminal cells reachable
/// from `(0,0,0)` along straight axis-aligned runs of non-empty cells.
pub fn grid_to_graph(grid: &Grid) -> Result<Graph> {
  let shape = grid.shape();
  let mut graph = Graph::new();
  let mut index_of: HashMap<(u8, u8, u8), usize> = HashMap::new();
  let mut queue: VecDeque<(u8, u8, u8)> = VecDeque::new();

  let origin = (0u8, 0u8, 0u8);
  let origin_idx = graph.add_vertex(Coordinate::new(0, 0, 0));
  index_of.insert(origin, origin_idx);
  queue.push_back(origin);

  while let Some((x, y, z)) = queue.pop_front() {
    let u = index_of[&(x, y, z)];

    for (dx, dy, dz) in DIRECTIONS {
      let mut cx = x as i16;
      let mut cy = y as i16;
      let mut cz = z as i16;
      let mut steps: u32 = 0;

      loop {
        cx += dx;
        cy += dy;
        cz += dz;

        if cx < 0
          || cy < 0
          || cz < 0
          || cx >= shape.width as i16
          || cy >= shape.height as i16
          || cz >= shape.depth as i16
        {
          break;
        }
        steps += 1;

        let (nx, ny, nz) = (cx as u8, cy as u8, cz as u8);
        let code = grid.get(nx, ny, nz)?;

        if cell::is_vertex_code(code) {
          let key = (nx, ny, nz);
          let v = *index_of.entry(key).or_insert_with(|| {
            let idx = graph.add_vertex(Coordinate::new(nx, ny, nz));
            queue.push_back(key);
            idx
          });

          graph.add_edge(u, v, steps);
          if code == cell::TERMINAL {
            graph.mark_terminal(v);
          }
          break;
        }
      }
    }
  }

  Ok(graph)
}

/// Render an MST edge list (vertex index pairs) back onto a grid as PATH
/// cells, using `coordinates` to map vertex indices to positions.
pub fn mst_to_grid(
  shape: Shape,
  edges: &[(usize, usize)],
  coordinates: &[Coordinate],
) -> Result<Grid> {
  let mut grid = Grid::new(shape.width, shape.height, shape.depth)?;

  for &(u, v) in edges {
    let mut first = coordinates[u];
    let mut second = coordinates[v];

    let should_swap = (second.x == first.x && second.y == first.y && second.z <= first.z)
      || (second.x == first.x && second.y <= first.y && second.z == first.z)
      || (second.x <= first.x && second.y == first.y && second.z == first.z);
    if should_swap {
      std::mem::swap(&mut first, &mut second);
    }

    if first.x == second.x && first.y == second.y {
      for z in first.z..=second.z {
        grid.set(first.x, first.y, z, cell::PATH)?;
      }
    } else if first.x == second.x && first.z == second.z {
      for y in first.y..=second.y {
        grid.set(first.x, y, first.z, cell::PATH)?;
      }
    } else if first.y == second.y && first.z == second.z {
      for x in first.x..=second.x {
        grid.set(x, first.y, first.z, cell::PATH)?;
      }
    }
  }

  Ok(grid)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::painter::paint;

  #[test]
  fn grid_to_graph_edges_are_manhattan_and_axis_aligned() {
    let mut grid = Grid::new(5, 5, 1).unwrap();
    paint(&mut grid, &[Coordinate::new(1, 1, 0), Coordinate::new(3, 3, 0)]).unwrap();
    let graph = grid_to_graph(&grid).unwrap();

    for u in 0..graph.len() {
      let cu = graph.coordinate(u);
      for edge in graph.neighbors(u) {
        let cv = graph.coordinate(edge.to);
        let dx = (cu.x as i32 - cv.x as i32).abs();
        let dy = (cu.y as i32 - cv.y as i32).abs();
        let dz = (cu.z as i32 - cv.z as i32).abs();
        let nonzero_axes = [dx, dy, dz].iter().filter(|&&d| d != 0).count();
        assert_eq!(nonzero_axes, 1);
        assert_eq!((dx + dy + dz) as u32, edge.weight);
      }
    }
  }

  #[test]
  fn mst_to_grid_walks_inclusive_staircase() {
    let coords = vec![Coordinate::new(1, 1, 0), Coordinate::new(1, 4, 0)];
    let grid = mst_to_grid(Shape::new(5, 5, 1), &[(0, 1)], &coords).unwrap();

    for y in 1..=4 {
      assert_eq!(grid.get(1, y, 0).unwrap(), cell::PATH);
    }
    assert_eq!(grid.get(2, 1, 0).unwrap(), cell::EMPTY);
  }
}
