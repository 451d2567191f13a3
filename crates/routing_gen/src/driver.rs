//! Drives the pipeline across point counts and combination ranks, fanning
//! work out across a rayon-managed worker pool.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use routing_core::combinator::{n_choose_r, StrideIter};
use routing_core::grid::{Coordinate, Shape};
use routing_core::{painter, solver, transformer, Grid};
use tracing::info;

use crate::array::write_u8_array;
use crate::config::Config;
use crate::error::{GenError, Result};

/// Per-point-count outcome, surfaced for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
  pub point_count: u8,
  pub samples_emitted: u64,
}

/// Recreate `Output/{Source,Target,Nodes}`, deleting any prior contents.
fn prepare_output_dirs(output: &Path) -> Result<(PathBuf, PathBuf, PathBuf)> {
  let io_err = |path: &Path, source: std::io::Error| GenError::IOError {
    path: path.to_path_buf(),
    source,
  };

  std::fs::create_dir_all(output).map_err(|e| io_err(output, e))?;

  let source_dir = output.join("Source");
  let target_dir = output.join("Target");
  let nodes_dir = output.join("Nodes");

  for dir in [&source_dir, &target_dir, &nodes_dir] {
    if dir.exists() {
      std::fs::remove_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
  }

  Ok((source_dir, target_dir, nodes_dir))
}

/// Convert a flat grid index back to a coordinate, per the layout the
/// generator's enumeration operates over: `x = (i % (W*H)) / W`,
/// `y = i % W`, `z = i / (W*H)`.
fn index_to_coordinate(index: u32, shape: Shape) -> Coordinate {
  let layer = shape.width as u32 * shape.height as u32;
  let remainder = index % layer;
  let x = (remainder / shape.width as u32) as u8;
  let y = (remainder % shape.width as u32) as u8;
  let z = (index / layer) as u8;
  Coordinate::new(x, y, z)
}

/// Build the zero-padded `(MaxPoints, 3)` node-coordinate table for a set of
/// terminals, in the order they were decoded.
fn node_table(terminals: &[Coordinate], max_points: u8) -> Vec<u8> {
  let mut table = vec![0u8; max_points as usize * 3];
  for (i, c) in terminals.iter().enumerate() {
    table[i * 3] = c.x;
    table[i * 3 + 1] = c.y;
    table[i * 3 + 2] = c.z;
  }
  table
}

/// Run one full sample (paint, extract, solve, render, serialize) for a
/// single combination of terminal indices.
fn emit_sample(
  shape: Shape,
  indices: &[u32],
  max_points: u8,
  point_count: u8,
  counter: u64,
  source_dir: &Path,
  target_dir: &Path,
  nodes_dir: &Path,
) -> Result<()> {
  let terminals: Vec<Coordinate> = indices
    .iter()
    .map(|&i| index_to_coordinate(i, shape))
    .collect();

  let mut source_grid = Grid::new(shape.width, shape.height, shape.depth)?;
  painter::paint(&mut source_grid, &terminals)?;

  let graph = transformer::grid_to_graph(&source_grid)?;
  let mst = solver::solve(&graph);

  let coordinates: Vec<Coordinate> = (0..graph.len()).map(|v| graph.coordinate(v)).collect();
  let target_grid = transformer::mst_to_grid(shape, &mst, &coordinates)?;

  let file_name = format!(
    "s{}_d{}_p{}_n{}.npy",
    shape.width, shape.depth, point_count, counter
  );
  let array_shape = [shape.depth, shape.height, shape.width];

  write_u8_array(
    &source_dir.join(&file_name),
    source_grid.raw_bytes(),
    &array_shape,
  )?;
  write_u8_array(
    &target_dir.join(&file_name),
    target_grid.raw_bytes(),
    &array_shape,
  )?;
  write_u8_array(
    &nodes_dir.join(&file_name),
    &node_table(&terminals, max_points),
    &[max_points, 3u8],
  )?;

  Ok(())
}

/// Partition `[0, total)` into `workers` contiguous, roughly equal slices.
fn partition(total: u64, workers: u64) -> Vec<(u64, u64)> {
  let workers = workers.max(1);
  let chunk = total / workers;
  (0..workers)
    .map(|w| {
      let start = w * chunk;
      let end = if w == workers - 1 { total } else { start + chunk };
      (start, end)
    })
    .filter(|&(start, end)| start < end)
    .collect()
}

fn generate_for_point_count(
  shape: Shape,
  point_count: u8,
  max_points: u8,
  desired_combinations: u32,
  dirs: (&Path, &Path, &Path),
  abort: &AtomicBool,
) -> Result<Summary> {
  let (source_dir, target_dir, nodes_dir) = dirs;
  let n = shape.volume() as u32;
  let total = n_choose_r(n as u64, point_count as u64);
  if total == 0 {
    return Ok(Summary {
      point_count,
      samples_emitted: 0,
    });
  }
  let stride = (total / desired_combinations as u64).max(1);

  let workers = rayon::current_num_threads() as u64;
  let slices = partition(total, workers);

  let progress = ProgressBar::new(desired_combinations as u64);
  progress.set_style(
    ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} p={msg}")
      .unwrap_or_else(|_| ProgressStyle::default_bar()),
  );
  progress.set_message(point_count.to_string());

  let counter = AtomicU64::new(0);
  let write_error: Mutex<Option<GenError>> = Mutex::new(None);

  slices.into_par_iter().for_each(|(start, end)| {
    for indices in StrideIter::new(n, point_count, start, end, stride) {
      if abort.load(Ordering::Relaxed) {
        break;
      }
      if write_error.lock().unwrap().is_some() {
        break;
      }

      let sample_no = counter.fetch_add(1, Ordering::Relaxed) + 1;
      let result = emit_sample(
        shape,
        &indices,
        max_points,
        point_count,
        sample_no,
        source_dir,
        target_dir,
        nodes_dir,
      );

      match result {
        Ok(()) => progress.inc(1),
        Err(err) => {
          *write_error.lock().unwrap() = Some(err);
        }
      }
    }
  });

  progress.finish_and_clear();

  if let Some(err) = write_error.into_inner().unwrap() {
    return Err(err);
  }

  Ok(Summary {
    point_count,
    samples_emitted: counter.load(Ordering::Relaxed),
  })
}

/// Run the full generation sweep for every point count in `[2, MaxPoints]`.
pub fn run(config: &Config, abort: &AtomicBool) -> Result<Vec<Summary>> {
  let (source_dir, target_dir, nodes_dir) = prepare_output_dirs(&config.output)?;
  let shape = Shape::new(
    config.generation.size,
    config.generation.size,
    config.generation.depth,
  );

  let mut summaries = Vec::new();
  for point_count in 2..=config.generation.max_points {
    if abort.load(Ordering::Relaxed) {
      break;
    }

    let summary = generate_for_point_count(
      shape,
      point_count,
      config.generation.max_points,
      config.generation.desired_combinations,
      (&source_dir, &target_dir, &nodes_dir),
      abort,
    )?;
    info!(
      point_count,
      samples = summary.samples_emitted,
      "finished point count"
    );
    summaries.push(summary);
  }

  Ok(summaries)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partition_covers_the_whole_range_without_overlap() {
    let slices = partition(100, 7);
    assert_eq!(slices.first().unwrap().0, 0);
    assert_eq!(slices.last().unwrap().1, 100);
    for pair in slices.windows(2) {
      assert_eq!(pair[0].1, pair[1].0);
    }
  }

  #[test]
  fn index_to_coordinate_matches_documented_formula() {
    let shape = Shape::new(4, 4, 2);
    let c = index_to_coordinate(20, shape);
    // layer = 16; 20 % 16 = 4; x = 4/4 = 1; y = 4%4 = 0; z = 20/16 = 1.
    assert_eq!(c, Coordinate::new(1, 0, 1));
  }

  #[test]
  fn node_table_zero_pads_unused_rows() {
    let terminals = [Coordinate::new(1, 2, 3)];
    let table = node_table(&terminals, 4);
    assert_eq!(table.len(), 12);
    assert_eq!(&table[0..3], &[1, 2, 3]);
    assert!(table[3..].iter().all(|&b| b == 0));
  }
}
