//! Topological ordering of the dependency graph.
//!
//! Kahn's algorithm is the only place cycles are detected: if some nodes never
//! reach in-degree zero, the graph is cyclic and no order is returned.

use std::collections::VecDeque;

use thiserror::Error;

use crate::graph::DependencyGraph;
use crate::interner::NodeId;

/// Errors that can occur during topological sorting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// Names of the nodes left unordered (members of a cycle or downstream of one).
    #[error("Circular dependency detected among tasks: {}", .nodes.join(", "))]
    CyclicDependency { nodes: Vec<String> },
}

/// Compute in-degrees and the ids that start with in-degree zero.
fn initial_in_degrees(graph: &DependencyGraph) -> (Vec<usize>, VecDeque<NodeId>) {
    let in_degree: Vec<usize> = graph.node_ids().map(|id| graph.in_degree(id)).collect();
    // Seed in insertion order so that the result is deterministic
    let queue: VecDeque<NodeId> = graph
        .node_ids()
        .filter(|&id| in_degree[id as usize] == 0)
        .collect();
    (in_degree, queue)
}

fn cycle_error(graph: &DependencyGraph, in_degree: &[usize]) -> SortError {
    let nodes = graph
        .node_ids()
        .filter(|&id| in_degree[id as usize] > 0)
        .map(|id| graph.name(id).to_string())
        .collect();
    SortError::CyclicDependency { nodes }
}

/// Order nodes so that every prerequisite precedes its dependents.
///
/// # Returns
/// * `Ok(order)` containing every node exactly once
/// * `Err(SortError::CyclicDependency)` if the graph has a cycle
pub fn topological_order(graph: &DependencyGraph) -> Result<Vec<NodeId>, SortError> {
    let (mut in_degree, mut queue) = initial_in_degrees(graph);
    let mut order: Vec<NodeId> = Vec::with_capacity(graph.node_count());

    while let Some(id) = queue.pop_front() {
        order.push(id);
        for &succ in graph.successors(id) {
            let degree = &mut in_degree[succ as usize];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(succ);
            }
        }
    }

    if order.len() != graph.node_count() {
        return Err(cycle_error(graph, &in_degree));
    }

    Ok(order)
}

/// Group nodes into layers: layer 0 holds nodes without predecessors, and each
/// following layer holds nodes whose predecessors all sit in earlier layers.
pub fn topological_generations(graph: &DependencyGraph) -> Result<Vec<Vec<NodeId>>, SortError> {
    let (mut in_degree, queue) = initial_in_degrees(graph);
    let mut generations: Vec<Vec<NodeId>> = Vec::new();
    let mut current: Vec<NodeId> = queue.into_iter().collect();
    let mut visited = 0;

    while !current.is_empty() {
        visited += current.len();
        let mut next = Vec::new();
        for &id in &current {
            for &succ in graph.successors(id) {
                let degree = &mut in_degree[succ as usize];
                *degree -= 1;
                if *degree == 0 {
                    next.push(succ);
                }
            }
        }
        generations.push(current);
        current = next;
    }

    if visited != graph.node_count() {
        return Err(cycle_error(graph, &in_degree));
    }

    Ok(generations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{construct_task_graph, FINISH_NODE};
    use crate::models::{Task, TaskSet};

    fn make_task(uid: &str, name: &str, duration: u64, deps: &[&str]) -> Task {
        Task::new(uid, name, duration, deps.iter().map(|d| d.to_string()).collect())
    }

    fn graph_of(tasks: Vec<Task>) -> DependencyGraph {
        construct_task_graph(&TaskSet::try_from(tasks).unwrap()).unwrap()
    }

    fn order_names(graph: &DependencyGraph, order: &[NodeId]) -> Vec<String> {
        order.iter().map(|&id| graph.name(id).to_string()).collect()
    }

    #[test]
    fn test_diamond_order() {
        let graph = graph_of(vec![
            make_task("a", "A", 1, &[]),
            make_task("b", "B", 5, &["a"]),
            make_task("c", "C", 1, &["a"]),
            make_task("d", "D", 1, &["b", "c"]),
        ]);
        let order = topological_order(&graph).unwrap();
        assert_eq!(
            order_names(&graph, &order),
            vec!["A", "B", "C", "D", FINISH_NODE]
        );
    }

    #[test]
    fn test_order_respects_every_edge() {
        let graph = graph_of(vec![
            make_task("4", "Deploy", 1, &["3", "2"]),
            make_task("3", "Test", 2, &["1"]),
            make_task("2", "Docs", 1, &[]),
            make_task("1", "Build", 3, &[]),
        ]);
        let order = topological_order(&graph).unwrap();
        let position: Vec<usize> = {
            let mut pos = vec![0; graph.node_count()];
            for (idx, &id) in order.iter().enumerate() {
                pos[id as usize] = idx;
            }
            pos
        };

        assert_eq!(order.len(), graph.node_count());
        for (from, to) in graph.edges() {
            assert!(position[from as usize] < position[to as usize]);
        }
        assert_eq!(order.last().copied(), Some(graph.terminal()));
    }

    #[test]
    fn test_two_cycle_detected() {
        let graph = graph_of(vec![
            make_task("a", "A", 1, &["b"]),
            make_task("b", "B", 1, &["a"]),
        ]);
        let err = topological_order(&graph).unwrap_err();
        assert_eq!(
            err,
            SortError::CyclicDependency {
                nodes: vec!["A".to_string(), "B".to_string()]
            }
        );
        assert!(err.to_string().contains("A, B"));
    }

    #[test]
    fn test_self_dependency_detected() {
        let graph = graph_of(vec![
            make_task("a", "A", 1, &[]),
            make_task("b", "B", 2, &["b", "a"]),
        ]);
        match topological_order(&graph) {
            Err(SortError::CyclicDependency { nodes }) => {
                assert!(nodes.contains(&"B".to_string()));
                assert!(!nodes.contains(&"A".to_string()));
            }
            other => panic!("expected cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_generations_layer_by_depth() {
        let graph = graph_of(vec![
            make_task("a", "A", 1, &[]),
            make_task("b", "B", 5, &["a"]),
            make_task("c", "C", 1, &["a"]),
            make_task("d", "D", 1, &["b", "c"]),
            make_task("e", "E", 2, &[]),
        ]);
        let generations = topological_generations(&graph).unwrap();
        let layers: Vec<Vec<String>> = generations
            .iter()
            .map(|layer| order_names(&graph, layer))
            .collect();

        assert_eq!(
            layers,
            vec![
                vec!["A".to_string(), "E".to_string()],
                vec!["B".to_string(), "C".to_string()],
                vec!["D".to_string()],
                vec![FINISH_NODE.to_string()],
            ]
        );
    }

    #[test]
    fn test_generations_reject_cycle() {
        let graph = graph_of(vec![
            make_task("a", "A", 1, &["c"]),
            make_task("b", "B", 1, &["a"]),
            make_task("c", "C", 1, &["b"]),
        ]);
        assert!(matches!(
            topological_generations(&graph),
            Err(SortError::CyclicDependency { .. })
        ));
    }
}
