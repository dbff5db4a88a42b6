//! Per-process and run-wide statistics derived from a timeline.
//!
//! Everything here is computed from the recorded events alone:
//!
//! - **Completion**: tick of the `Terminated` event
//! - **Turnaround**: completion − arrival
//! - **Waiting**: turnaround − (CPU ticks + I/O ticks)
//! - **Utilisation**: busy ticks of a resource over the makespan

use serde::Serialize;

use crate::process::OperationKind;
use crate::trace::{EventState, Timeline};
use crate::types::{Pid, Tick};

/// Statistics for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    pub pid: Pid,
    pub name: String,
    pub arrival: Tick,
    /// None if the run stopped before the process terminated.
    pub completion: Option<Tick>,
    pub turnaround: Option<Tick>,
    /// Ticks spent holding the CPU.
    pub cpu_time: Tick,
    /// Ticks spent holding the I/O device.
    pub io_time: Tick,
    /// Turnaround not spent on either resource.
    pub waiting: Option<Tick>,
    /// Ticks recorded as `Waiting`.
    pub ready_ticks: Tick,
}

/// Aggregates over all processes of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Tick of the last recorded event.
    pub makespan: Tick,
    pub completed: usize,
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    /// Fraction of ticks `0..makespan` the CPU was held.
    pub cpu_utilization: f64,
    /// Fraction of ticks `0..makespan` the I/O device was held.
    pub io_utilization: f64,
}

impl ProcessStats {
    pub fn from_timeline(timeline: &Timeline, pid: Pid) -> Self {
        let info = &timeline.processes()[pid.index()];
        let mut cpu_time = 0;
        let mut io_time = 0;
        let mut ready_ticks = 0;
        let mut completion = None;
        for event in timeline.events_for(pid) {
            match (event.state, event.operation) {
                (EventState::Running, Some(OperationKind::Cpu)) => cpu_time += 1,
                (EventState::Running, Some(OperationKind::Io)) => io_time += 1,
                (EventState::Waiting, _) => ready_ticks += 1,
                (EventState::Terminated, _) => completion = Some(event.tick),
                (EventState::Running, None) => {}
            }
        }
        let turnaround = completion.map(|done| done.saturating_sub(info.arrival));
        let waiting = turnaround.map(|t| t.saturating_sub(cpu_time + io_time));
        ProcessStats {
            pid,
            name: info.name.clone(),
            arrival: info.arrival,
            completion,
            turnaround,
            cpu_time,
            io_time,
            waiting,
            ready_ticks,
        }
    }
}

/// Statistics for every process, in scenario order.
pub fn process_stats(timeline: &Timeline) -> Vec<ProcessStats> {
    (0..timeline.processes().len())
        .map(|idx| ProcessStats::from_timeline(timeline, Pid(idx)))
        .collect()
}

/// Summarise a run.
pub fn summarize(timeline: &Timeline, stats: &[ProcessStats]) -> RunSummary {
    let makespan = timeline.last_tick().unwrap_or(0);
    let finished: Vec<&ProcessStats> = stats.iter().filter(|s| s.completion.is_some()).collect();
    let mean = |values: &mut dyn Iterator<Item = Tick>| {
        if finished.is_empty() {
            0.0
        } else {
            values.sum::<Tick>() as f64 / finished.len() as f64
        }
    };
    let avg_turnaround = mean(&mut finished.iter().filter_map(|s| s.turnaround));
    let avg_waiting = mean(&mut finished.iter().filter_map(|s| s.waiting));

    let utilization = |busy: Tick| {
        if makespan == 0 {
            0.0
        } else {
            busy as f64 / makespan as f64
        }
    };
    let cpu_busy: Tick = stats.iter().map(|s| s.cpu_time).sum();
    let io_busy: Tick = stats.iter().map(|s| s.io_time).sum();

    RunSummary {
        makespan,
        completed: finished.len(),
        avg_turnaround,
        avg_waiting,
        cpu_utilization: utilization(cpu_busy),
        io_utilization: utilization(io_busy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessDef;
    use crate::scenario::Scenario;

    #[test]
    fn test_stats_for_mixed_bursts() {
        // A: CPU 0-1, I/O 2-3, CPU 4; B waits for the CPU during 1, runs 2-3.
        let timeline = Scenario::builder()
            .process(ProcessDef::new("A", 0, 0).cpu(2).io(2).cpu(1))
            .process(ProcessDef::new("B", 1, 0).cpu(2))
            .build()
            .unwrap()
            .simulate()
            .unwrap();

        let stats = process_stats(&timeline);
        let a = &stats[0];
        assert_eq!(a.completion, Some(5));
        assert_eq!(a.turnaround, Some(5));
        assert_eq!(a.cpu_time, 3);
        assert_eq!(a.io_time, 2);
        assert_eq!(a.waiting, Some(0));

        let b = &stats[1];
        assert_eq!(b.completion, Some(4));
        assert_eq!(b.turnaround, Some(3));
        assert_eq!(b.waiting, Some(1));
        assert_eq!(b.ready_ticks, 1);

        let summary = summarize(&timeline, &stats);
        assert_eq!(summary.makespan, 5);
        assert_eq!(summary.completed, 2);
        assert!((summary.avg_turnaround - 4.0).abs() < f64::EPSILON);
        assert!((summary.avg_waiting - 0.5).abs() < f64::EPSILON);
        assert!((summary.cpu_utilization - 1.0).abs() < f64::EPSILON);
        assert!((summary.io_utilization - 0.4).abs() < 1e-9);
    }
}
