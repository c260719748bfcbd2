use std::fs;
use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{ArgAction, Parser};

use critpath::visualize::{render_dot, render_gantt, GanttRow};
use critpath::{analyze, from_csv, logging, Error, ImportConfig, ReportConfig, Schedule, TaskSet};

#[derive(Parser)]
#[command(name = "critpath")]
#[command(about = "Compute the critical path of a project's tasks and chart its schedule")]
#[command(version)]
struct Cli {
    /// Path to the CSV file of tasks
    csv_path: PathBuf,

    /// Calendar date for day 0 of the Gantt chart (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    start_date: Option<NaiveDate>,

    /// Separator between UIDs in the dependency column
    #[arg(long)]
    delimiter: Option<char>,

    /// Write the Graphviz dependency graph to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Skip the dependency graph and Gantt chart
    #[arg(long)]
    no_charts: bool,

    /// Increase log verbosity (-v changes, -vv checks, -vvv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Schedule(#[from] Error),
    #[error("Task '{0}' is missing from the schedule")]
    Unscheduled(String),
    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// `name: ES(x) LS(y)` for every task, in input order.
fn start_time_lines(tasks: &TaskSet, schedule: &Schedule) -> Result<Vec<String>, CliError> {
    tasks
        .iter()
        .map(|task| {
            let unscheduled = || CliError::Unscheduled(task.name.clone());
            let es = schedule.es(&task.name).ok_or_else(unscheduled)?;
            let ls = schedule.ls(&task.name).ok_or_else(unscheduled)?;
            Ok(format!("{}: ES({}) LS({})", task.name, es, ls))
        })
        .collect()
}

fn run(cli: Cli) -> Result<(), CliError> {
    let import_config = ImportConfig::new(cli.delimiter);
    let report_config = ReportConfig::new(cli.start_date, Some(cli.verbose), Some(!cli.no_charts));
    logging::init(report_config.verbosity);

    let tasks = from_csv(&cli.csv_path, &import_config).map_err(Error::from)?;
    for task in &tasks {
        println!("{task}");
    }

    let analysis = analyze(&tasks)?;
    let schedule = &analysis.schedule;
    for line in start_time_lines(&tasks, schedule)? {
        println!("{line}");
    }
    println!("Critical path: {}", analysis.critical_path);

    if !report_config.charts {
        return Ok(());
    }

    let dot = render_dot(&analysis.graph, schedule, &analysis.critical_path).map_err(Error::from)?;
    match &cli.dot {
        Some(path) => fs::write(path, dot).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?,
        None => println!("\n{dot}"),
    }

    let rows = GanttRow::from_schedule(&analysis.graph, schedule, &analysis.critical_path);
    println!(
        "{}",
        render_gantt(&rows, schedule.finish_time, report_config.start_date)
    );
    Ok(())
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
