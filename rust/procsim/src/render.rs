//! Plain-text renderings of a timeline: Gantt chart, event log and
//! statistics table.

use std::fmt::Write;

use crate::process::OperationKind;
use crate::stats::{ProcessStats, RunSummary};
use crate::trace::{EventState, Timeline, TimelineEvent};
use crate::types::Tick;

const RULER_STEP: Tick = 5;

fn cell(event: &TimelineEvent) -> char {
    match (event.state, event.operation) {
        (EventState::Running, Some(OperationKind::Io)) => '=',
        (EventState::Running, _) => '#',
        (EventState::Waiting, _) => '.',
        (EventState::Terminated, _) => 'X',
    }
}

/// A Gantt chart column: one recorded tick, or a run of skipped idle ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Tick(Tick),
    Gap,
}

/// Columns for every recorded tick, from the first to the last, with each
/// stretch of ticks that has no events folded into a single `Gap`.
fn columns(timeline: &Timeline) -> Vec<Column> {
    let mut columns = Vec::new();
    let mut prev: Option<Tick> = None;
    for event in timeline.events() {
        match prev {
            Some(tick) if tick == event.tick => continue,
            Some(tick) if event.tick > tick + 1 => columns.push(Column::Gap),
            _ => {}
        }
        columns.push(Column::Tick(event.tick));
        prev = Some(event.tick);
    }
    columns
}

/// One row per process, one column per recorded tick.
///
/// `#` CPU, `=` I/O, `.` waiting, `X` terminated, blank when the process
/// has not arrived or is gone. Idle stretches between arrivals show as a
/// single `~` column on the ruler.
pub fn gantt(timeline: &Timeline) -> String {
    let columns = columns(timeline);
    let index: Vec<(Tick, usize)> = columns
        .iter()
        .enumerate()
        .filter_map(|(col, column)| match column {
            Column::Tick(tick) => Some((*tick, col)),
            Column::Gap => None,
        })
        .collect();
    let name_width = timeline
        .processes()
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0)
        .max("tick".len());

    let mut rows: Vec<Vec<char>> = vec![vec![' '; columns.len()]; timeline.processes().len()];
    for event in timeline.events() {
        if let Ok(pos) = index.binary_search_by_key(&event.tick, |&(tick, _)| tick) {
            rows[event.pid.index()][index[pos].1] = cell(event);
        }
    }

    let mut ruler = vec![' '; columns.len()];
    for (col, column) in columns.iter().enumerate() {
        let tick = match column {
            Column::Gap => {
                ruler[col] = '~';
                continue;
            }
            Column::Tick(tick) => *tick,
        };
        let after_gap = col == 0 || columns[col - 1] == Column::Gap;
        let free = col == 0 || !ruler[col - 1].is_ascii_digit();
        if !(free && (after_gap || tick % RULER_STEP == 0)) {
            continue;
        }
        for (offset, digit) in tick.to_string().chars().enumerate() {
            match ruler.get_mut(col + offset) {
                Some(slot) if *slot == ' ' => *slot = digit,
                Some(_) => break,
                None => ruler.push(digit),
            }
        }
    }

    let mut out = String::new();
    let ruler: String = ruler.into_iter().collect();
    let _ = writeln!(out, "{:<name_width$} |{}", "tick", ruler.trim_end());
    for (info, row) in timeline.processes().iter().zip(rows) {
        let row: String = row.into_iter().collect();
        let _ = writeln!(out, "{:<name_width$} |{}", info.name, row.trim_end());
    }
    let _ = writeln!(out, "legend: # cpu  = io  . waiting  X terminated  ~ idle");
    out
}

/// The timeline as a table, one line per event.
pub fn event_table(timeline: &Timeline) -> String {
    let name_width = timeline
        .processes()
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0)
        .max("process".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<name_width$}  {:<10}  {}",
        "tick", "process", "state", "operation"
    );
    for event in timeline.events() {
        let state = match event.state {
            EventState::Running => "RUNNING",
            EventState::Waiting => "WAITING",
            EventState::Terminated => "TERMINATED",
        };
        let operation = event.operation.map_or("-".to_string(), |op| op.to_string());
        let _ = writeln!(
            out,
            "{:>6}  {:<name_width$}  {:<10}  {}",
            event.tick,
            timeline.name(event.pid),
            state,
            operation
        );
    }
    out
}

/// Per-process statistics followed by run-wide averages.
pub fn stats_table(stats: &[ProcessStats], summary: &RunSummary) -> String {
    let name_width = stats
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max("process".len());
    let opt = |v: Option<u64>| v.map_or("-".to_string(), |v| v.to_string());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:>7}  {:>10}  {:>10}  {:>7}  {:>7}  {:>7}",
        "process", "arrival", "completion", "turnaround", "cpu", "io", "waiting"
    );
    for s in stats {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>7}  {:>10}  {:>10}  {:>7}  {:>7}  {:>7}",
            s.name,
            s.arrival,
            opt(s.completion),
            opt(s.turnaround),
            s.cpu_time,
            s.io_time,
            opt(s.waiting)
        );
    }
    let _ = writeln!(
        out,
        "completed {}/{} by tick {}: avg turnaround {:.2}, avg waiting {:.2}, cpu {:.0}%, io {:.0}%",
        summary.completed,
        stats.len(),
        summary.makespan,
        summary.avg_turnaround,
        summary.avg_waiting,
        summary.cpu_utilization * 100.0,
        summary.io_utilization * 100.0
    );
    out
}
