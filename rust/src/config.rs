//! Configuration types for importing tasks and reporting schedules.

use chrono::NaiveDate;

use crate::logging::VERBOSITY_SILENT;

/// Column layout of the task CSV file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportConfig {
    /// Header of the unique identifier column
    pub uid_column: String,
    /// Header of the display name column
    pub name_column: String,
    /// Header of the duration column (whole days)
    pub duration_column: String,
    /// Header of the dependency list column
    pub depends_on_column: String,
    /// Separator between uids in the dependency column
    pub dependency_delimiter: char,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            uid_column: "UID".to_string(),
            name_column: "Task Name".to_string(),
            duration_column: "Duration (days)".to_string(),
            depends_on_column: "Depends On".to_string(),
            dependency_delimiter: ';',
        }
    }
}

impl ImportConfig {
    pub fn new(dependency_delimiter: Option<char>) -> Self {
        let defaults = Self::default();
        Self {
            dependency_delimiter: dependency_delimiter.unwrap_or(defaults.dependency_delimiter),
            ..defaults
        }
    }
}

/// Options for printing and rendering a computed schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    /// Calendar date that day offset 0 maps to in the Gantt chart.
    pub start_date: NaiveDate,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
    /// Whether to render the dependency graph and Gantt chart at all.
    pub charts: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            start_date: chrono::Local::now().date_naive(),
            verbosity: VERBOSITY_SILENT,
            charts: true,
        }
    }
}

impl ReportConfig {
    pub fn new(start_date: Option<NaiveDate>, verbosity: Option<u8>, charts: Option<bool>) -> Self {
        let defaults = Self::default();
        Self {
            start_date: start_date.unwrap_or(defaults.start_date),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            charts: charts.unwrap_or(defaults.charts),
        }
    }
}
