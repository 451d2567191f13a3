//! Two-phase Dijkstra + Kruskal Steiner-tree approximation.
//!
//! Phase A runs Dijkstra from every terminal to discover the shortest path
//! to every other terminal. Phase B runs Kruskal twice: once over those
//! terminal-to-terminal paths to discover which intermediate vertices are
//! shared branch points (promoting them to honorary terminals), and once
//! more over the re-split paths to produce the final tree.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::graph::Graph;

/// One hop of a reconstructed shortest path: `source` -> `destination` at
/// `weight`. Mirrors the directed edge records the original pathfinder
/// works with internally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PathEdge {
  weight: u32,
  source: usize,
  destination: usize,
}

impl PathEdge {
  fn new(weight: u32, source: usize, destination: usize) -> Self {
    Self {
      weight,
      source,
      destination,
    }
  }
}

/// Ascending order by `(weight, source, destination)`, used to give Kruskal
/// a deterministic pop order when multiple candidate edges tie on weight.
impl Ord for PathEdge {
  fn cmp(&self, other: &Self) -> std::cmp::Ordering {
    (self.weight, self.source, self.destination).cmp(&(
      other.weight,
      other.source,
      other.destination,
    ))
  }
}

impl PartialOrd for PathEdge {
  fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
    Some(self.cmp(other))
  }
}

/// Union-find over arbitrary vertex indices (not necessarily contiguous,
/// since the working set grows to include promoted Steiner points).
#[derive(Default)]
struct DisjointSet {
  parent: HashMap<usize, usize>,
  rank: HashMap<usize, u32>,
  num_sets: usize,
}

impl DisjointSet {
  fn make_set(&mut self, item: usize) {
    if self.parent.contains_key(&item) {
      return;
    }
    self.parent.insert(item, item);
    self.rank.insert(item, 0);
    self.num_sets += 1;
  }

  fn exists(&self, item: usize) -> bool {
    self.parent.contains_key(&item)
  }

  fn find(&mut self, item: usize) -> usize {
    let parent = self.parent[&item];
    if parent != item {
      let root = self.find(parent);
      self.parent.insert(item, root);
      root
    } else {
      item
    }
  }

  fn union(&mut self, a: usize, b: usize) {
    let x = self.find(a);
    let y = self.find(b);
    if x == y {
      return;
    }

    let rank_x = self.rank[&x];
    let rank_y = self.rank[&y];
    if rank_x < rank_y {
      self.parent.insert(x, y);
    } else {
      self.parent.insert(y, x);
      if rank_x == rank_y {
        *self.rank.get_mut(&x).unwrap() += 1;
      }
    }
    self.num_sets -= 1;
  }

  fn is_one_set(&self) -> bool {
    self.num_sets == 1
  }
}

/// Dijkstra from `source`, returning the full edge-by-edge path to every
/// other reachable vertex (empty for unreached or the source itself).
fn shortest_paths(graph: &Graph, source: usize) -> Vec<Vec<PathEdge>> {
  let n = graph.len();
  let mut visited = vec![false; n];
  let mut dist = vec![u32::MAX; n];
  let mut paths: Vec<Vec<PathEdge>> = vec![Vec::new(); n];
  let mut heap: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();

  dist[source] = 0;
  heap.push(Reverse((0, source)));

  while let Some(Reverse((_, u))) = heap.pop() {
    if visited[u] {
      continue;
    }
    visited[u] = true;

    for edge in graph.neighbors(u) {
      let v = edge.to;
      let candidate = dist[u].saturating_add(edge.weight);
      if candidate < dist[v] {
        dist[v] = candidate;
        let mut path = paths[u].clone();
        path.push(PathEdge::new(edge.weight, u, v));
        paths[v] = path;
        heap.push(Reverse((candidate, v)));
      }
    }
  }

  paths
}

fn path_weight(path: &[PathEdge]) -> u32 {
  path.iter().map(|e| e.weight).sum()
}

/// Run Kruskal over `candidates`, using `full_paths` (indices aligned with
/// `candidates`) to expand each accepted edge back into its underlying hop
/// sequence. `seed` vertices start as their own singleton sets.
///
/// Returns the accepted `(candidate index, edge)` pairs in acceptance order.
fn kruskal_accept(
  seed: impl IntoIterator<Item = usize>,
  candidates: &[PathEdge],
) -> Vec<(usize, PathEdge)> {
  let mut disjoint_set = DisjointSet::default();
  for s in seed {
    disjoint_set.make_set(s);
  }

  let mut heap: BinaryHeap<Reverse<PathEdge>> = BinaryHeap::new();
  for &edge in candidates {
    heap.push(Reverse(edge));
  }

  let mut accepted = Vec::new();
  while let Some(Reverse(edge)) = heap.pop() {
    if disjoint_set.find(edge.source) != disjoint_set.find(edge.destination) {
      let idx = candidates
        .iter()
        .position(|c| *c == edge)
        .expect("accepted edge must originate from the candidate list");

      disjoint_set.union(edge.source, edge.destination);
      accepted.push((idx, edge));

      if disjoint_set.is_one_set() {
        break;
      }
    }
  }

  accepted
}

/// Approximate the minimum rectilinear Steiner tree connecting every
/// terminal in `graph`, returning the selected tree as vertex-index pairs.
///
/// Returns an empty tree when there are fewer than two terminals.
pub fn solve(graph: &Graph) -> Vec<(usize, usize)> {
  let terminals = graph.sorted_terminals();
  if terminals.len() <= 1 {
    return Vec::new();
  }
  let terminal_set: HashSet<usize> = terminals.iter().copied().collect();

  let mut short_paths: Vec<PathEdge> = Vec::new();
  let mut full_paths: Vec<Vec<PathEdge>> = Vec::new();

  for &t in &terminals {
    let paths = shortest_paths(graph, t);

    for &tt in &terminals {
      if tt == t || paths[tt].is_empty() {
        continue;
      }

      let path = &paths[tt];
      let head = path.first().unwrap().source;
      let tail = path.last().unwrap().destination;

      let already_seen = short_paths
        .iter()
        .any(|e| e.destination == head && e.source == tail);
      if already_seen {
        continue;
      }

      short_paths.push(PathEdge::new(path_weight(path), head, tail));
      full_paths.push(path.clone());
    }
  }

  // Phase B, pass 1: walk a Kruskal MST over the terminal-to-terminal
  // shortest paths to find which intermediate vertices are shared by more
  // than one accepted path - those get promoted to honorary terminals.
  let mut k_terminals = terminal_set.clone();
  {
    let mut disjoint_set = DisjointSet::default();
    for &t in &terminals {
      disjoint_set.make_set(t);
    }

    let mut heap: BinaryHeap<Reverse<PathEdge>> = BinaryHeap::new();
    for &edge in &short_paths {
      heap.push(Reverse(edge));
    }

    loop {
      let Reverse(edge) = heap.pop().expect("terminal set must become connected");
      if disjoint_set.find(edge.source) == disjoint_set.find(edge.destination) {
        continue;
      }

      let idx = short_paths
        .iter()
        .position(|e| *e == edge)
        .expect("accepted edge must originate from short_paths");

      for hop in &full_paths[idx] {
        if terminal_set.contains(&hop.destination) {
          continue;
        }
        if disjoint_set.exists(hop.destination) {
          k_terminals.insert(hop.destination);
        } else {
          disjoint_set.make_set(hop.destination);
          disjoint_set.union(edge.source, hop.destination);
        }
      }

      disjoint_set.union(edge.source, edge.destination);
      if disjoint_set.is_one_set() {
        break;
      }
    }
  }

  // Re-split each original path at every promoted Steiner point so Kruskal
  // can route through it independently in the final pass.
  let mut k_short_paths: Vec<PathEdge> = Vec::new();
  let mut k_full_paths: Vec<Vec<PathEdge>> = Vec::new();

  for (i, _) in short_paths.iter().enumerate() {
    let mut segment: Vec<PathEdge> = Vec::new();

    for &hop in &full_paths[i] {
      segment.push(hop);

      let is_new_steiner_point =
        k_terminals.contains(&hop.destination) && !terminal_set.contains(&hop.destination);
      if is_new_steiner_point {
        let head = segment.first().unwrap().source;
        k_short_paths.push(PathEdge::new(path_weight(&segment), head, hop.destination));
        k_full_paths.push(std::mem::take(&mut segment));
      }
    }

    let head = segment.first().expect("path always ends at a terminal").source;
    let tail = segment.last().unwrap().destination;
    k_short_paths.push(PathEdge::new(path_weight(&segment), head, tail));
    k_full_paths.push(segment);
  }

  // Phase B, pass 2: final Kruskal pass over the re-split paths, now
  // treating every promoted Steiner point as a connectable terminal too.
  let accepted = kruskal_accept(k_terminals.iter().copied(), &k_short_paths);

  let mut mst = Vec::new();
  for (idx, _) in accepted {
    for hop in &k_full_paths[idx] {
      mst.push((hop.source, hop.destination));
    }
  }

  mst
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grid::Coordinate;
  use crate::painter::paint;
  use crate::transformer::grid_to_graph;

  #[test]
  fn fewer_than_two_terminals_yields_empty_tree() {
    let mut graph = Graph::new();
    let a = graph.add_vertex(Coordinate::new(0, 0, 0));
    graph.mark_terminal(a);
    assert!(solve(&graph).is_empty());
  }

  #[test]
  fn two_terminals_connect_via_a_single_edge() {
    let mut graph = Graph::new();
    let a = graph.add_vertex(Coordinate::new(0, 0, 0));
    let b = graph.add_vertex(Coordinate::new(1, 0, 0));
    graph.mark_terminal(a);
    graph.mark_terminal(b);
    graph.add_edge(a, b, 1);

    let mst = solve(&graph);
    assert_eq!(mst.len(), 1);
    let (u, v) = mst[0];
    assert_eq!((u.min(v), u.max(v)), (a.min(b), a.max(b)));
  }

  #[test]
  fn three_terminals_on_a_painted_grid_produce_a_connected_tree() {
    let mut grid = crate::grid::Grid::new(7, 7, 1).unwrap();
    let terminals = [
      Coordinate::new(1, 1, 0),
      Coordinate::new(5, 1, 0),
      Coordinate::new(3, 5, 0),
    ];
    paint(&mut grid, &terminals).unwrap();
    let graph = grid_to_graph(&grid).unwrap();

    let mst = solve(&graph);
    assert!(!mst.is_empty());

    // Every terminal vertex must appear in at least one selected edge.
    let touched: HashSet<usize> = mst.iter().flat_map(|&(u, v)| [u, v]).collect();
    for t in graph.sorted_terminals() {
      assert!(touched.contains(&t));
    }
  }
}
