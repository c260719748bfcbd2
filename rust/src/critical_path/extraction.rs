//! Critical path extraction from a computed schedule.

use crate::graph::DependencyGraph;
use crate::interner::NodeId;

use super::types::{CriticalPath, Schedule};

/// Find the nodes with zero slack, in the schedule's topological order.
pub fn find_critical_path(schedule: &Schedule) -> CriticalPath {
    let nodes = schedule
        .topo_order
        .iter()
        .filter(|name| schedule.is_critical(name))
        .cloned()
        .collect();
    CriticalPath { nodes }
}

/// Reconstruct every explicit chain of critical tasks.
///
/// A chain starts at a node without predecessors and follows tight edges
/// (successor's earliest start equals the predecessor's earliest finish) until
/// the terminal node. Durations along any returned chain sum to the finish
/// time.
pub fn critical_chains(graph: &DependencyGraph, schedule: &Schedule) -> Vec<Vec<String>> {
    let critical: Vec<bool> = graph
        .node_ids()
        .map(|id| schedule.is_critical(graph.name(id)))
        .collect();
    let earliest = |id: NodeId| schedule.es(graph.name(id));
    let is_tight = |from: NodeId, to: NodeId| {
        critical[to as usize]
            && earliest(from)
                .and_then(|es| es.checked_add(graph.duration(from)))
                .is_some_and(|finish| earliest(to) == Some(finish))
    };

    let mut chains = Vec::new();
    let starts = graph
        .node_ids()
        .filter(|&id| critical[id as usize] && graph.in_degree(id) == 0);

    for start in starts {
        // Depth-first walk with an explicit stack of (node, next successor index)
        let mut path: Vec<NodeId> = vec![start];
        let mut cursor: Vec<usize> = vec![0];

        while let Some(&node) = path.last() {
            if node == graph.terminal() {
                chains.push(path.iter().map(|&id| graph.name(id).to_string()).collect());
                path.pop();
                cursor.pop();
                continue;
            }

            let successors = graph.successors(node);
            let Some(next_idx) = cursor.last_mut() else {
                break;
            };
            let next = successors[*next_idx..]
                .iter()
                .position(|&succ| is_tight(node, succ))
                .map(|offset| *next_idx + offset);

            match next {
                Some(idx) => {
                    *next_idx = idx + 1;
                    path.push(successors[idx]);
                    cursor.push(0);
                }
                None => {
                    path.pop();
                    cursor.pop();
                }
            }
        }
    }

    tracing::debug!(chains = chains.len(), "reconstructed critical chains");
    chains
}
