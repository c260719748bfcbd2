//! Types for critical path scheduling.

use rustc_hash::FxHashMap;

use crate::models::Days;

/// Per-task timing derived from a schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskTiming {
    /// Earliest possible start time (from forward pass).
    pub earliest_start: Days,
    /// Earliest possible finish time.
    pub earliest_finish: Days,
    /// Latest allowable start time (from backward pass).
    pub latest_start: Days,
    /// Latest allowable finish time.
    pub latest_finish: Days,
    /// Slack = latest_start - earliest_start.
    pub slack: Days,
}

impl TaskTiming {
    /// Finishes saturate at `Days::MAX` and slack at zero; a solved schedule
    /// never reaches either bound.
    pub fn new(earliest_start: Days, latest_start: Days, duration: Days) -> Self {
        Self {
            earliest_start,
            earliest_finish: earliest_start.saturating_add(duration),
            latest_start,
            latest_finish: latest_start.saturating_add(duration),
            slack: latest_start.saturating_sub(earliest_start),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.slack == 0
    }
}

/// Earliest and latest start times for every node of a graph.
///
/// Keyed by node name, terminal node included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    pub earliest_start: FxHashMap<String, Days>,
    pub latest_start: FxHashMap<String, Days>,
    /// Minimum project duration: the terminal node's earliest start.
    pub finish_time: Days,
    /// Topological order used for both passes.
    pub topo_order: Vec<String>,
}

impl Schedule {
    #[inline]
    pub fn es(&self, name: &str) -> Option<Days> {
        self.earliest_start.get(name).copied()
    }

    #[inline]
    pub fn ls(&self, name: &str) -> Option<Days> {
        self.latest_start.get(name).copied()
    }

    pub fn slack(&self, name: &str) -> Option<Days> {
        Some(self.ls(name)?.saturating_sub(self.es(name)?))
    }

    pub fn is_critical(&self, name: &str) -> bool {
        self.slack(name) == Some(0)
    }

    /// Full timing for a node, given its duration.
    pub fn timing(&self, name: &str, duration: Days) -> Option<TaskTiming> {
        Some(TaskTiming::new(self.es(name)?, self.ls(name)?, duration))
    }
}

/// Zero-slack nodes of a schedule in topological order.
///
/// This is every critical node, not a single walk: when several chains tie
/// for the longest, all of their nodes are included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CriticalPath {
    pub nodes: Vec<String>,
}

impl CriticalPath {
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.nodes.iter()
    }
}

impl std::fmt::Display for CriticalPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.nodes.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_timing_critical() {
        let timing = TaskTiming::new(1, 1, 5);
        assert_eq!(timing.earliest_finish, 6);
        assert_eq!(timing.latest_finish, 6);
        assert!(timing.is_critical());

        let with_slack = TaskTiming::new(1, 5, 1);
        assert_eq!(with_slack.slack, 4);
        assert_eq!(with_slack.latest_finish, 6);
        assert!(!with_slack.is_critical());
    }

    #[test]
    fn test_task_timing_saturates() {
        let timing = TaskTiming::new(3, 3, Days::MAX);
        assert_eq!(timing.earliest_finish, Days::MAX);
        assert_eq!(timing.latest_finish, Days::MAX);
        assert_eq!(timing.slack, 0);
    }

    #[test]
    fn test_schedule_lookups() {
        let mut schedule = Schedule::default();
        schedule.earliest_start.insert("C".to_string(), 1);
        schedule.latest_start.insert("C".to_string(), 5);

        assert_eq!(schedule.slack("C"), Some(4));
        assert!(!schedule.is_critical("C"));
        assert_eq!(schedule.slack("missing"), None);
        assert!(!schedule.is_critical("missing"));
        assert_eq!(schedule.timing("C", 1).map(|t| t.earliest_finish), Some(2));
    }

    #[test]
    fn test_critical_path_display() {
        let path = CriticalPath {
            nodes: vec!["A".to_string(), "B".to_string(), "Finish".to_string()],
        };
        assert_eq!(path.to_string(), "[A, B, Finish]");
        assert!(path.contains("B"));
        assert!(!path.contains("C"));
    }
}
