//! Dependency graph construction.
//!
//! The graph is built in two phases. Phase 1 ([`GraphBuilder::add_task`]) adds
//! task nodes and prerequisite edges. Phase 2 ([`GraphBuilder::finalize`])
//! appends the terminal node, wires every sink to it and hands back an
//! immutable [`DependencyGraph`].

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::interner::{NodeId, NodeInterner};
use crate::models::{Days, Task, TaskSet};

/// Name of the synthetic terminal node every sink is wired to.
pub const FINISH_NODE: &str = "Finish";

/// Errors raised while building a dependency graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Task '{task}' depends on invalid UID '{uid}'")]
    InvalidReference { task: String, uid: String },
    #[error("Task name '{name}' is shared by UIDs '{first}' and '{second}'")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },
    #[error("Task '{uid}' uses the reserved name 'Finish'")]
    ReservedName { uid: String },
}

/// A graph node: either a task or the terminal node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub uid: String,
    pub name: String,
    pub duration: Days,
}

/// Phase-1 graph under construction.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    interner: NodeInterner,
    nodes: Vec<Node>,
    successors: Vec<Vec<NodeId>>,
    predecessors: Vec<Vec<NodeId>>,
    by_name: FxHashMap<String, NodeId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run phase 1 for every task in the set.
    pub fn from_tasks(tasks: &TaskSet) -> Result<Self, GraphError> {
        let mut builder = Self {
            interner: NodeInterner::with_capacity(tasks.len()),
            nodes: Vec::with_capacity(tasks.len() + 1),
            successors: Vec::with_capacity(tasks.len() + 1),
            predecessors: Vec::with_capacity(tasks.len() + 1),
            by_name: FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default()),
        };
        for task in tasks {
            builder.add_task(task, tasks)?;
        }
        Ok(builder)
    }

    /// Add a task node plus one edge from each of its dependencies.
    ///
    /// Dependencies are resolved against `tasks`; a uid that is not present is
    /// an [`GraphError::InvalidReference`].
    pub fn add_task(&mut self, task: &Task, tasks: &TaskSet) -> Result<NodeId, GraphError> {
        let id = self.ensure_node(task)?;
        for dep_uid in &task.depends_on {
            let Some(dependency) = tasks.get(dep_uid) else {
                return Err(GraphError::InvalidReference {
                    task: task.name.clone(),
                    uid: dep_uid.clone(),
                });
            };
            let dep_id = self.ensure_node(dependency)?;
            self.add_edge(dep_id, id);
        }
        Ok(id)
    }

    /// Add the terminal node, wire every sink to it, and freeze the graph.
    pub fn finalize(mut self) -> DependencyGraph {
        let terminal = self.push_node(Node {
            uid: FINISH_NODE.to_string(),
            name: FINISH_NODE.to_string(),
            duration: 0,
        });

        let sinks: Vec<NodeId> = (0..terminal)
            .filter(|&id| self.successors[id as usize].is_empty())
            .collect();
        for &sink in &sinks {
            self.add_edge(sink, terminal);
        }

        tracing::debug!(
            nodes = self.nodes.len(),
            sinks = sinks.len(),
            "finalized dependency graph"
        );

        DependencyGraph {
            interner: self.interner,
            nodes: self.nodes,
            successors: self.successors,
            predecessors: self.predecessors,
            by_name: self.by_name,
            terminal,
        }
    }

    fn ensure_node(&mut self, task: &Task) -> Result<NodeId, GraphError> {
        if let Some(id) = self.interner.get(&task.uid) {
            return Ok(id);
        }
        if task.name == FINISH_NODE {
            return Err(GraphError::ReservedName {
                uid: task.uid.clone(),
            });
        }
        if let Some(&existing) = self.by_name.get(&task.name) {
            return Err(GraphError::DuplicateName {
                name: task.name.clone(),
                first: self.nodes[existing as usize].uid.clone(),
                second: task.uid.clone(),
            });
        }

        let id = self.interner.intern(&task.uid);
        let pushed = self.push_node(Node {
            uid: task.uid.clone(),
            name: task.name.clone(),
            duration: task.duration,
        });
        debug_assert_eq!(id, pushed);
        self.by_name.insert(task.name.clone(), id);
        tracing::trace!(uid = %task.uid, name = %task.name, id, "added node");
        Ok(id)
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
        id
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId) {
        let succs = &mut self.successors[from as usize];
        if succs.contains(&to) {
            return;
        }
        succs.push(to);
        self.predecessors[to as usize].push(from);
    }
}

/// Build the complete graph for a task set (both phases).
pub fn construct_task_graph(tasks: &TaskSet) -> Result<DependencyGraph, GraphError> {
    Ok(GraphBuilder::from_tasks(tasks)?.finalize())
}

/// Immutable dependency graph with a single terminal node.
///
/// Edges point from a prerequisite to its dependent. Acyclicity is not
/// checked here; see [`crate::sorting::topological_order`].
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    interner: NodeInterner,
    nodes: Vec<Node>,
    successors: Vec<Vec<NodeId>>,
    predecessors: Vec<Vec<NodeId>>,
    by_name: FxHashMap<String, NodeId>,
    terminal: NodeId,
}

impl DependencyGraph {
    /// Number of nodes, terminal included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of task nodes (terminal excluded).
    pub fn task_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn terminal(&self) -> NodeId {
        self.terminal
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    #[inline]
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id as usize].name
    }

    #[inline]
    pub fn duration(&self, id: NodeId) -> Days {
        self.nodes[id as usize].duration
    }

    #[inline]
    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        &self.predecessors[id as usize]
    }

    #[inline]
    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        &self.successors[id as usize]
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.successors[id as usize].len()
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.predecessors[id as usize].len()
    }

    pub fn id_by_name(&self, name: &str) -> Option<NodeId> {
        if name == FINISH_NODE {
            return Some(self.terminal);
        }
        self.by_name.get(name).copied()
    }

    pub fn id_by_uid(&self, uid: &str) -> Option<NodeId> {
        self.interner.get(uid)
    }

    /// Node ids in insertion order (terminal last).
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|idx| idx as NodeId)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (idx as NodeId, node))
    }

    /// All edges as (prerequisite, dependent) pairs.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.successors
            .iter()
            .enumerate()
            .flat_map(|(from, succs)| succs.iter().map(move |&to| (from as NodeId, to)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(uid: &str, name: &str, duration: Days, deps: &[&str]) -> Task {
        Task::new(uid, name, duration, deps.iter().map(|d| d.to_string()).collect())
    }

    fn task_set(tasks: Vec<Task>) -> TaskSet {
        TaskSet::try_from(tasks).unwrap()
    }

    fn names(graph: &DependencyGraph, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| graph.name(id).to_string()).collect()
    }

    #[test]
    fn test_edges_point_from_dependency_to_dependent() {
        let tasks = task_set(vec![
            make_task("1", "A", 1, &[]),
            make_task("2", "B", 2, &["1"]),
            make_task("3", "C", 3, &["2"]),
        ]);
        let graph = construct_task_graph(&tasks).unwrap();

        let a = graph.id_by_name("A").unwrap();
        let b = graph.id_by_name("B").unwrap();
        let c = graph.id_by_name("C").unwrap();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.task_count(), 3);
        assert_eq!(graph.successors(a), &[b]);
        assert_eq!(graph.successors(b), &[c]);
        assert_eq!(names(&graph, graph.successors(c)), vec![FINISH_NODE]);
        assert_eq!(graph.duration(b), 2);
    }

    #[test]
    fn test_terminal_wired_from_every_sink() {
        let tasks = task_set(vec![
            make_task("1", "A", 1, &[]),
            make_task("2", "B", 5, &["1"]),
            make_task("3", "C", 1, &["1"]),
        ]);
        let graph = construct_task_graph(&tasks).unwrap();
        let terminal = graph.terminal();

        assert_eq!(graph.name(terminal), FINISH_NODE);
        assert_eq!(graph.duration(terminal), 0);
        assert_eq!(graph.out_degree(terminal), 0);
        assert_eq!(names(&graph, graph.predecessors(terminal)), vec!["B", "C"]);
        // A has dependents, so it is not wired to the terminal
        assert!(!graph
            .successors(graph.id_by_name("A").unwrap())
            .contains(&terminal));
    }

    #[test]
    fn test_isolated_task_gets_single_terminal_edge() {
        let tasks = task_set(vec![make_task("1", "A", 4, &[])]);
        let graph = construct_task_graph(&tasks).unwrap();
        let a = graph.id_by_name("A").unwrap();

        assert_eq!(graph.successors(a), &[graph.terminal()]);
        assert_eq!(graph.edges().count(), 1);
    }

    #[test]
    fn test_forward_reference_resolved() {
        // B is listed before its dependency A
        let tasks = task_set(vec![
            make_task("2", "B", 2, &["1"]),
            make_task("1", "A", 1, &[]),
        ]);
        let graph = construct_task_graph(&tasks).unwrap();
        let a = graph.id_by_name("A").unwrap();
        let b = graph.id_by_name("B").unwrap();

        assert_eq!(graph.successors(a), &[b]);
        assert_eq!(graph.duration(a), 1);
        assert_eq!(graph.id_by_uid("1"), Some(a));
    }

    #[test]
    fn test_duplicate_dependency_collapses() {
        let tasks = task_set(vec![
            make_task("1", "A", 1, &[]),
            make_task("2", "B", 1, &["1", "1"]),
        ]);
        let graph = construct_task_graph(&tasks).unwrap();
        let b = graph.id_by_name("B").unwrap();
        assert_eq!(graph.in_degree(b), 1);
    }

    #[test]
    fn test_invalid_reference_names_task_and_uid() {
        let tasks = task_set(vec![
            make_task("1", "A", 1, &[]),
            make_task("2", "B", 1, &["1", "99"]),
        ]);
        let err = construct_task_graph(&tasks).unwrap_err();

        assert_eq!(
            err,
            GraphError::InvalidReference {
                task: "B".to_string(),
                uid: "99".to_string(),
            }
        );
        let message = err.to_string();
        assert!(message.contains("'B'"));
        assert!(message.contains("'99'"));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let tasks = task_set(vec![
            make_task("1", "Build", 1, &[]),
            make_task("2", "Build", 2, &[]),
        ]);
        let err = construct_task_graph(&tasks).unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateName {
                name: "Build".to_string(),
                first: "1".to_string(),
                second: "2".to_string(),
            }
        );
    }

    #[test]
    fn test_terminal_name_reserved() {
        let tasks = task_set(vec![make_task("7", FINISH_NODE, 1, &[])]);
        let err = construct_task_graph(&tasks).unwrap_err();
        assert_eq!(
            err,
            GraphError::ReservedName {
                uid: "7".to_string()
            }
        );
    }

    #[test]
    fn test_cycle_is_not_rejected_by_builder() {
        let tasks = task_set(vec![
            make_task("1", "A", 1, &["2"]),
            make_task("2", "B", 1, &["1"]),
        ]);
        let graph = construct_task_graph(&tasks).unwrap();
        // Neither node is a sink, so the terminal stays unwired
        assert_eq!(graph.in_degree(graph.terminal()), 0);
    }

    #[test]
    fn test_empty_task_set_yields_terminal_only() {
        let graph = construct_task_graph(&TaskSet::new()).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.task_count(), 0);
        assert_eq!(graph.id_by_name(FINISH_NODE), Some(graph.terminal()));
    }
}
