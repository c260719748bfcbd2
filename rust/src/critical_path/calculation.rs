//! Critical path calculation using forward and backward passes.

use thiserror::Error;

use crate::graph::DependencyGraph;
use crate::interner::NodeId;
use crate::models::Days;
use crate::sorting::{topological_order, SortError};

use super::types::Schedule;

/// Error types for schedule calculation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("Cannot schedule an empty task graph")]
    EmptyGraph,
    #[error(transparent)]
    CyclicDependency(#[from] SortError),
    #[error("Schedule length overflows at task '{task}'")]
    DurationOverflow { task: String },
}

/// Forward pass: earliest start of every node, indexed by node id.
///
/// A node cannot start until all of its predecessors have finished, so each
/// node takes the latest predecessor finish (longest-path relaxation).
///
/// Fails with [`SolveError::DurationOverflow`] if a predecessor's finish does
/// not fit in [`Days`]. Once this succeeds, every `ES + duration` is bounded by
/// the terminal's earliest start, so the backward pass cannot overflow.
pub fn forward_pass(graph: &DependencyGraph, order: &[NodeId]) -> Result<Vec<Days>, SolveError> {
    let mut earliest: Vec<Days> = vec![0; graph.node_count()];
    for &id in order {
        for &pred in graph.predecessors(id) {
            let pred_finish = earliest[pred as usize]
                .checked_add(graph.duration(pred))
                .ok_or_else(|| SolveError::DurationOverflow {
                    task: graph.name(pred).to_string(),
                })?;
            if pred_finish > earliest[id as usize] {
                earliest[id as usize] = pred_finish;
            }
        }
    }
    Ok(earliest)
}

/// Backward pass: latest start of every node, indexed by node id.
///
/// `order` must be the same topological order given to [`forward_pass`]; it is
/// walked in reverse.
pub fn backward_pass(graph: &DependencyGraph, order: &[NodeId], finish_time: Days) -> Vec<Days> {
    let terminal = graph.terminal();
    // Every task reaches the terminal, so finish_time >= its duration
    let mut latest: Vec<Days> = graph
        .node_ids()
        .map(|id| {
            if id == terminal {
                finish_time
            } else {
                finish_time - graph.duration(id)
            }
        })
        .collect();

    for &id in order.iter().rev() {
        let duration = graph.duration(id);
        for &succ in graph.successors(id) {
            let required_start = latest[succ as usize] - duration;
            if required_start < latest[id as usize] {
                latest[id as usize] = required_start;
            }
        }
    }
    latest
}

/// Compute the earliest and latest start times for each node.
///
/// # Returns
/// * `Ok(Schedule)` keyed by node name, terminal included
/// * `Err(SolveError::EmptyGraph)` if the graph holds no tasks
/// * `Err(SolveError::CyclicDependency)` if the graph has a cycle
/// * `Err(SolveError::DurationOverflow)` if a path is longer than `Days::MAX`
pub fn compute_start_times(graph: &DependencyGraph) -> Result<Schedule, SolveError> {
    if graph.task_count() == 0 {
        return Err(SolveError::EmptyGraph);
    }

    let order = topological_order(graph)?;
    let earliest = forward_pass(graph, &order)?;
    let finish_time = earliest[graph.terminal() as usize];
    let latest = backward_pass(graph, &order, finish_time);

    tracing::debug!(
        nodes = graph.node_count(),
        finish_time,
        "computed start times"
    );

    // Strings only at the boundary
    let mut schedule = Schedule {
        finish_time,
        topo_order: Vec::with_capacity(order.len()),
        ..Default::default()
    };
    for &id in &order {
        let name = graph.name(id);
        let (es, ls) = (earliest[id as usize], latest[id as usize]);
        tracing::trace!(node = name, es, ls, "node timing");
        schedule.earliest_start.insert(name.to_string(), es);
        schedule.latest_start.insert(name.to_string(), ls);
        schedule.topo_order.push(name.to_string());
    }

    Ok(schedule)
}
