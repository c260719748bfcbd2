//! Rendering of the dependency graph and Gantt chart.
//!
//! Renderers only consume the scheduling output (start-time maps, critical
//! path, and per-node name/duration) and never reach into the solver.

use std::fmt::Write as _;

use chrono::{Datelike, Days as CalendarDays, NaiveDate, Weekday};

use crate::critical_path::{CriticalPath, Schedule, TaskTiming};
use crate::graph::DependencyGraph;
use crate::models::Days;
use crate::sorting::{topological_generations, SortError};

const DEFAULT_FILL: &str = "skyblue";
const CRITICAL_FILL: &str = "tomato";
const CRITICAL_EDGE: &str = "red";
const DEFAULT_EDGE: &str = "gray";

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render the dependency graph as a Graphviz digraph, top to bottom by
/// topological layer, with critical nodes and tight critical edges highlighted.
pub fn render_dot(
    graph: &DependencyGraph,
    schedule: &Schedule,
    critical_path: &CriticalPath,
) -> Result<String, SortError> {
    let generations = topological_generations(graph)?;
    let mut out = String::new();

    let _ = writeln!(out, "digraph tasks {{");
    let _ = writeln!(out, "  label=\"Task Dependency Graph\";");
    let _ = writeln!(out, "  rankdir=TB;");
    let _ = writeln!(out, "  node [shape=box, style=filled];");
    let _ = writeln!(out);

    for (layer, ids) in generations.iter().enumerate() {
        let _ = writeln!(out, "  subgraph layer_{layer} {{");
        let _ = writeln!(out, "    rank=same;");
        for &id in ids {
            let node = graph.node(id);
            let name = escape(&node.name);
            let fill = if critical_path.contains(&node.name) {
                CRITICAL_FILL
            } else {
                DEFAULT_FILL
            };
            let _ = writeln!(
                out,
                "    \"{name}\" [label=\"{name}\\n({})\", fillcolor={fill}];",
                node.duration
            );
        }
        let _ = writeln!(out, "  }}");
    }
    let _ = writeln!(out);

    for (from, to) in graph.edges() {
        let (from_name, to_name) = (graph.name(from), graph.name(to));
        let tight = match (schedule.es(from_name), schedule.es(to_name)) {
            (Some(es_from), Some(es_to)) => {
                es_from.checked_add(graph.duration(from)) == Some(es_to)
            }
            _ => false,
        };
        let on_path = critical_path.contains(from_name) && critical_path.contains(to_name);
        let color = if tight && on_path {
            CRITICAL_EDGE
        } else {
            DEFAULT_EDGE
        };
        let _ = writeln!(
            out,
            "  \"{}\" -> \"{}\" [color={color}];",
            escape(from_name),
            escape(to_name)
        );
    }

    let _ = writeln!(out, "}}");
    Ok(out)
}

/// One task's line in the Gantt chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GanttRow {
    pub name: String,
    pub duration: Days,
    pub timing: TaskTiming,
    pub critical: bool,
}

impl GanttRow {
    /// Build rows for every task node (terminal excluded), ordered by earliest
    /// start and then by graph insertion order.
    pub fn from_schedule(
        graph: &DependencyGraph,
        schedule: &Schedule,
        critical_path: &CriticalPath,
    ) -> Vec<GanttRow> {
        let mut rows: Vec<GanttRow> = graph
            .nodes()
            .filter(|&(id, _)| id != graph.terminal())
            .filter_map(|(_, node)| {
                let timing = schedule.timing(&node.name, node.duration)?;
                Some(GanttRow {
                    name: node.name.clone(),
                    duration: node.duration,
                    timing,
                    critical: critical_path.contains(&node.name),
                })
            })
            .collect();
        // Stable sort keeps insertion order among equal starts
        rows.sort_by_key(|row| row.timing.earliest_start);
        rows
    }
}

fn offset_date(start: NaiveDate, offset: Days) -> NaiveDate {
    start
        .checked_add_days(CalendarDays::new(offset))
        .unwrap_or(NaiveDate::MAX)
}

fn weekday_initial(date: NaiveDate) -> char {
    match date.weekday() {
        Weekday::Mon => 'M',
        Weekday::Tue | Weekday::Thu => 'T',
        Weekday::Wed => 'W',
        Weekday::Fri => 'F',
        Weekday::Sat | Weekday::Sun => 'S',
    }
}

/// Widest Gantt bar, in columns. Longer schedules are scaled to fit.
pub const MAX_CHART_COLUMNS: Days = 120;

/// Bar character for the `days` window `[lo, hi)`: `#` if it overlaps the
/// earliest schedule, `-` if it overlaps the slack window.
fn bar_cell(timing: &TaskTiming, lo: Days, hi: Days) -> char {
    let overlaps = |start: Days, end: Days| lo < end && hi > start;
    if overlaps(timing.earliest_start, timing.earliest_finish) {
        '#'
    } else if overlaps(timing.earliest_finish, timing.latest_finish) {
        '-'
    } else {
        ' '
    }
}

/// Render a text Gantt chart.
///
/// The table lists earliest/latest start and finish dates (day offsets mapped
/// onto `start_date`). Each bar shows the earliest schedule as `#` and the
/// slack window as `-`; critical tasks are flagged with `*`.
///
/// Up to [`MAX_CHART_COLUMNS`] days, each column is one day: the axis carries
/// one weekday initial per day, and the full date of every Sunday on the chart
/// is listed underneath. Longer schedules are drawn with several days per
/// column and a plain axis.
pub fn render_gantt(rows: &[GanttRow], finish_time: Days, start_date: NaiveDate) -> String {
    let name_width = rows
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Task".len());
    let date = |offset: Days| offset_date(start_date, offset).format("%m/%d/%Y").to_string();
    let days_per_column = finish_time.div_ceil(MAX_CHART_COLUMNS).max(1);
    let columns = finish_time.div_ceil(days_per_column);
    let scaled = days_per_column > 1;
    if scaled {
        tracing::warn!(finish_time, days_per_column, "scaling Gantt chart to fit");
    }

    let mut out = String::new();
    let _ = writeln!(out, "Gantt Chart with Critical Path Analysis");
    let _ = writeln!(
        out,
        "  {:<name_width$}  {:>4}  {:>5}  {:<10}  {:<10}  {:<10}  {:<10}",
        "Task", "Days", "Slack", "ES", "EF", "LS", "LF"
    );
    for row in rows {
        let marker = if row.critical { '*' } else { ' ' };
        let t = &row.timing;
        let _ = writeln!(
            out,
            "{marker} {:<name_width$}  {:>4}  {:>5}  {}  {}  {}  {}",
            row.name,
            row.duration,
            t.slack,
            date(t.earliest_start),
            date(t.earliest_finish),
            date(t.latest_start),
            date(t.latest_finish),
        );
    }
    let _ = writeln!(out);

    let axis: String = if scaled {
        "=".repeat(columns as usize)
    } else {
        (0..finish_time)
            .map(|day| weekday_initial(offset_date(start_date, day)))
            .collect()
    };
    let _ = writeln!(out, "  {:<name_width$}  |{axis}|", "");

    for row in rows {
        let marker = if row.critical { '*' } else { ' ' };
        let bar: String = (0..columns)
            .map(|column| {
                let lo = column * days_per_column;
                bar_cell(&row.timing, lo, lo.saturating_add(days_per_column))
            })
            .collect();
        let _ = writeln!(out, "{marker} {:<name_width$}  |{bar}|", row.name);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Start {}, finish {} ({} days)",
        date(0),
        date(finish_time),
        finish_time
    );
    if scaled {
        let _ = writeln!(out, "Scale: 1 column = {days_per_column} days");
        return out;
    }

    let sundays: Vec<String> = (0..finish_time)
        .filter_map(|day| {
            let d = offset_date(start_date, day);
            (d.weekday() == Weekday::Sun).then(|| format!("{} = {}", day, d.format("%m/%d/%Y")))
        })
        .collect();
    if !sundays.is_empty() {
        let _ = writeln!(out, "Sundays (day offset = date): {}", sundays.join(", "));
    }
    out
}
