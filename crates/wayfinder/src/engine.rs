//! Single-source, single-target shortest path search
//!
//! Dijkstra's algorithm over one [`Graph`], treating every edge as directed.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, span, trace, warn, Level};

use crate::core::{Graph, Route};

/// Entry in the search frontier
///
/// Ordered so that `BinaryHeap` (a max-heap) pops the smallest distance
/// first, and among equal distances the entry pushed first.
#[derive(Debug)]
struct Frontier<'a> {
    distance: f64,
    seq: u64,
    node: &'a str,
}

impl Ord for Frontier<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier<'_> {}

/// Find the shortest path from `start` to `end`
///
/// Returns `None` when either endpoint is not a node of `graph`, when `end`
/// is unreachable, or when the best path runs through a neighbor id that has
/// no node record. Neighbors without records still take part in the search.
///
/// Edges with a negative or non-finite weight are ignored, so a negative
/// cycle cannot keep the search alive. `editor::check_graph` reports such
/// edges and `Navigator::save_graph` refuses them.
///
/// Among equally short paths the one discovered first wins; the frontier is
/// FIFO among equal distances and neighbors are visited in id order, so the
/// result is deterministic for a given graph.
pub fn shortest_path(graph: &Graph, start: &str, end: &str) -> Option<Route> {
    let search_span = span!(Level::DEBUG, "shortest_path", start, end);
    let _enter = search_span.enter();

    let (Some(start_record), Some(_)) = (graph.node(start), graph.node(end)) else {
        debug!("Endpoint not in graph");
        return None;
    };

    if start == end {
        return Some(Route {
            path: vec![start.to_string()],
            distance: 0.0,
            nodes: vec![start_record.clone()],
        });
    }

    let mut distances: HashMap<&str, f64> = HashMap::with_capacity(graph.node_count());
    let mut predecessors: HashMap<&str, &str> = HashMap::with_capacity(graph.node_count());
    let mut frontier = BinaryHeap::new();
    let mut seq = 0u64;

    distances.insert(start, 0.0);
    frontier.push(Frontier {
        distance: 0.0,
        seq,
        node: start,
    });

    let mut settled = 0usize;
    while let Some(Frontier { distance, node, .. }) = frontier.pop() {
        if node == end {
            break;
        }
        // Stale entry: a shorter distance was pushed after this one
        if distance > distances.get(node).copied().unwrap_or(f64::INFINITY) {
            continue;
        }
        settled += 1;

        for (neighbor, weight) in graph.neighbors(node) {
            if !weight.is_finite() || weight < 0.0 {
                trace!(from = node, to = neighbor, weight, "Skipped unusable edge");
                continue;
            }
            let candidate = distance + weight;
            let known = distances.get(neighbor).copied().unwrap_or(f64::INFINITY);
            if candidate < known {
                trace!(from = node, to = neighbor, candidate, "Relaxed edge");
                distances.insert(neighbor, candidate);
                predecessors.insert(neighbor, node);
                seq += 1;
                frontier.push(Frontier {
                    distance: candidate,
                    seq,
                    node: neighbor,
                });
            }
        }
    }

    let Some(&distance) = distances.get(end) else {
        debug!(settled, "End unreachable");
        return None;
    };

    let path = reconstruct(&predecessors, start, end)?;

    let mut nodes = Vec::with_capacity(path.len());
    for id in &path {
        match graph.node(id) {
            Some(record) => nodes.push(record.clone()),
            None => {
                warn!(node = %id, "Shortest path crosses a neighbor with no node record");
                return None;
            }
        }
    }

    debug!(settled, hops = path.len() - 1, distance, "Path found");
    Some(Route {
        path,
        distance,
        nodes,
    })
}

/// Walk predecessor links back from `end`; `None` if the walk misses `start`
fn reconstruct<'a>(
    predecessors: &HashMap<&'a str, &'a str>,
    start: &str,
    end: &'a str,
) -> Option<Vec<String>> {
    let mut path = vec![end.to_string()];
    let mut current = end;
    while current != start {
        current = *predecessors.get(current)?;
        path.push(current.to_string());
        // A predecessor chain can never be longer than the number of relaxed nodes
        if path.len() > predecessors.len() + 1 {
            return None;
        }
    }
    path.reverse();
    Some(path)
}
