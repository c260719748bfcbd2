//! Task import from CSV files.
//!
//! Each row holds one task: a unique identifier, a display name, a duration in
//! whole days, and a delimiter-joined list of dependency uids (empty when the
//! task has no dependencies).

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;

use crate::config::ImportConfig;
use crate::models::{Days, Task, TaskSet};

/// Errors raised while loading tasks.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Cannot import nonexistent or unreadable path {}", .0.display())]
    MissingInput(PathBuf),
    #[error("Expected a .csv file; received {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },
    #[error("Duplicate task UID '{uid}' on line {line}")]
    DuplicateUid { uid: String, line: u64 },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Positions of the configured columns within the header row.
struct ColumnIndex {
    uid: usize,
    name: usize,
    duration: usize,
    depends_on: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord, config: &ImportConfig) -> Result<Self, ImportError> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|header| header.trim() == column)
                .ok_or_else(|| ImportError::MalformedRecord {
                    line: 1,
                    reason: format!("missing column '{column}'"),
                })
        };
        Ok(Self {
            uid: find(&config.uid_column)?,
            name: find(&config.name_column)?,
            duration: find(&config.duration_column)?,
            depends_on: find(&config.depends_on_column)?,
        })
    }
}

fn field<'r>(
    record: &'r StringRecord,
    idx: usize,
    column: &str,
    line: u64,
) -> Result<&'r str, ImportError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| ImportError::MalformedRecord {
            line,
            reason: format!("missing field '{column}'"),
        })
}

fn required_field<'r>(
    record: &'r StringRecord,
    idx: usize,
    column: &str,
    line: u64,
) -> Result<&'r str, ImportError> {
    let value = field(record, idx, column, line)?;
    if value.is_empty() {
        return Err(ImportError::MalformedRecord {
            line,
            reason: format!("empty field '{column}'"),
        });
    }
    Ok(value)
}

fn parse_record(
    record: &StringRecord,
    columns: &ColumnIndex,
    config: &ImportConfig,
    line: u64,
) -> Result<Task, ImportError> {
    let uid = required_field(record, columns.uid, &config.uid_column, line)?;
    let name = required_field(record, columns.name, &config.name_column, line)?;
    let raw_duration = required_field(record, columns.duration, &config.duration_column, line)?;
    let duration: Days = raw_duration
        .parse()
        .map_err(|_| ImportError::MalformedRecord {
            line,
            reason: format!(
                "'{}' is not a non-negative whole number of days",
                raw_duration
            ),
        })?;

    let depends_on = field(record, columns.depends_on, &config.depends_on_column, line)?
        .split(config.dependency_delimiter)
        .map(str::trim)
        .filter(|dep| !dep.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Task::new(uid, name, duration, depends_on))
}

/// Read tasks from any CSV source.
pub fn from_reader<R: io::Read>(reader: R, config: &ImportConfig) -> Result<TaskSet, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(reader.headers()?, config)?;
    let mut tasks = TaskSet::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }

        let task = parse_record(&record, &columns, config, line)?;
        tracing::trace!(line, uid = %task.uid, name = %task.name, "parsed task");
        tasks
            .insert(task)
            .map_err(|dup| ImportError::DuplicateUid { uid: dup.0, line })?;
    }

    Ok(tasks)
}

/// Read tasks from a CSV file into an ordered uid -> task mapping.
///
/// A path that is not a regular file, or that cannot be opened for lack of
/// permission, is reported as [`ImportError::MissingInput`] before any parsing.
pub fn from_csv(path: &Path, config: &ImportConfig) -> Result<TaskSet, ImportError> {
    if !path.is_file() {
        return Err(ImportError::MissingInput(path.to_path_buf()));
    }
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(ImportError::UnsupportedFormat(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            ImportError::MissingInput(path.to_path_buf())
        }
        _ => ImportError::Io(err),
    })?;
    let tasks = from_reader(file, config)?;
    tracing::info!(path = %path.display(), tasks = tasks.len(), "loaded tasks");
    Ok(tasks)
}
