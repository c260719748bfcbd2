//! Critical Path Method scheduling for interdependent tasks.
//!
//! Tasks flow through the pipeline leaves-first:
//! 1. [`import`] loads a uid-keyed [`TaskSet`] from CSV
//! 2. [`graph`] builds an immutable dependency graph ending in a `Finish` node
//! 3. [`critical_path`] computes earliest/latest start times and the
//!    zero-slack nodes
//! 4. [`visualize`] renders the graph and a Gantt chart from the results

use thiserror::Error;

pub mod config;
pub mod critical_path;
pub mod graph;
pub mod import;
pub mod interner;
pub mod logging;
pub mod models;
#[cfg(feature = "python")]
mod python;
pub mod sorting;
pub mod visualize;

pub use config::{ImportConfig, ReportConfig};
pub use critical_path::{
    compute_start_times, critical_chains, find_critical_path, CriticalPath, Schedule, SolveError,
    TaskTiming,
};
pub use graph::{construct_task_graph, DependencyGraph, GraphBuilder, GraphError, FINISH_NODE};
pub use import::{from_csv, from_reader, ImportError};
pub use interner::NodeId;
pub use models::{Days, Task, TaskSet};
pub use sorting::{topological_generations, topological_order, SortError};
pub use visualize::{render_dot, render_gantt, GanttRow};

/// Any failure of a scheduling run.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error(transparent)]
    Sort(#[from] SortError),
}

/// Everything computed for one task set.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub graph: DependencyGraph,
    pub schedule: Schedule,
    pub critical_path: CriticalPath,
}

/// Build the graph, solve the schedule, and extract the critical path.
///
/// Either every step succeeds or nothing is returned.
pub fn analyze(tasks: &TaskSet) -> Result<Analysis, Error> {
    let graph = construct_task_graph(tasks)?;
    tracing::info!(
        tasks = graph.task_count(),
        edges = graph.edges().count(),
        "built dependency graph"
    );

    let schedule = compute_start_times(&graph)?;
    let critical_path = find_critical_path(&schedule);
    tracing::info!(
        finish_time = schedule.finish_time,
        critical = critical_path.len(),
        "solved schedule"
    );

    Ok(Analysis {
        graph,
        schedule,
        critical_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(uid: &str, name: &str, duration: Days, deps: &[&str]) -> Task {
        Task::new(uid, name, duration, deps.iter().map(|d| d.to_string()).collect())
    }

    #[test]
    fn test_analyze_diamond() {
        let tasks = TaskSet::try_from(vec![
            make_task("1", "A", 1, &[]),
            make_task("2", "B", 5, &["1"]),
            make_task("3", "C", 1, &["1"]),
            make_task("4", "D", 1, &["2", "3"]),
        ])
        .unwrap();

        let analysis = analyze(&tasks).unwrap();
        assert_eq!(analysis.schedule.finish_time, 7);
        assert_eq!(
            analysis.critical_path.nodes,
            vec!["A", "B", "D", FINISH_NODE]
        );
    }

    #[test]
    fn test_analyze_invalid_reference() {
        let tasks = TaskSet::try_from(vec![make_task("1", "A", 1, &["404"])]).unwrap();
        match analyze(&tasks) {
            Err(Error::Graph(GraphError::InvalidReference { task, uid })) => {
                assert_eq!(task, "A");
                assert_eq!(uid, "404");
            }
            other => panic!("expected invalid reference, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_cycle() {
        let tasks = TaskSet::try_from(vec![
            make_task("1", "A", 1, &["2"]),
            make_task("2", "B", 1, &["1"]),
        ])
        .unwrap();
        assert!(matches!(
            analyze(&tasks),
            Err(Error::Solve(SolveError::CyclicDependency(_)))
        ));
    }

    #[test]
    fn test_analyze_csv_with_overflowing_durations() {
        let data = "UID,Task Name,Duration (days),Depends On\n\
                    1,A,18446744073709551615,\n\
                    2,B,1,1\n";
        let tasks = from_reader(data.as_bytes(), &ImportConfig::default()).unwrap();

        let err = analyze(&tasks).unwrap_err();
        assert!(matches!(
            err,
            Error::Solve(SolveError::DurationOverflow { ref task }) if task == "B"
        ));
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn test_analyze_empty() {
        assert!(matches!(
            analyze(&TaskSet::new()),
            Err(Error::Solve(SolveError::EmptyGraph))
        ));
    }
}
