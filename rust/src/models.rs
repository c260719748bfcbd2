//! Core data types for the scheduling system.

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Whole time units (days) counted from an arbitrary zero epoch.
pub type Days = u64;

/// A task to be scheduled, as loaded from the task repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier referenced by other tasks' `depends_on`.
    pub uid: String,
    /// Display name; also the key used in schedule output.
    pub name: String,
    pub duration: Days,
    /// Uids of the tasks that must finish before this one starts.
    pub depends_on: Vec<String>,
}

impl Task {
    pub fn new(
        uid: impl Into<String>,
        name: impl Into<String>,
        duration: Days,
        depends_on: Vec<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            duration,
            depends_on,
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Task(uid={:?}, name={:?}, duration={}, depends_on={:?})",
            self.uid, self.name, self.duration, self.depends_on
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Duplicate task UID '{0}'")]
pub struct DuplicateUid(pub String);

/// Mapping from task uid to task record.
///
/// Iteration follows insertion order so that output is stable across runs.
#[derive(Clone, Debug, Default)]
pub struct TaskSet {
    tasks: Vec<Task>,
    by_uid: FxHashMap<String, usize>,
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task, rejecting a uid that is already present.
    pub fn insert(&mut self, task: Task) -> Result<(), DuplicateUid> {
        if self.by_uid.contains_key(&task.uid) {
            return Err(DuplicateUid(task.uid));
        }
        self.by_uid.insert(task.uid.clone(), self.tasks.len());
        self.tasks.push(task);
        Ok(())
    }

    #[inline]
    pub fn get(&self, uid: &str) -> Option<&Task> {
        self.by_uid.get(uid).map(|&idx| &self.tasks[idx])
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.by_uid.contains_key(uid)
    }

    /// Tasks in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl TryFrom<Vec<Task>> for TaskSet {
    type Error = DuplicateUid;

    fn try_from(tasks: Vec<Task>) -> Result<Self, Self::Error> {
        let mut set = TaskSet::new();
        for task in tasks {
            set.insert(task)?;
        }
        Ok(set)
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
