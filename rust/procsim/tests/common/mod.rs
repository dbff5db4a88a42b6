#![allow(dead_code)]

use procsim::{EventState, OperationKind, Pid, Scenario, SimFormat, Timeline};

/// Initialize tracing from `RUST_LOG`.
///
/// `try_init()` is idempotent: first call in the process succeeds,
/// subsequent calls are silently ignored.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .event_format(SimFormat)
        .try_init();
}

/// Build, run and return the timeline, panicking on any error.
pub fn run(scenario: &Scenario) -> Timeline {
    match scenario.simulate() {
        Ok(timeline) => timeline,
        Err(e) => panic!("simulation failed: {e}"),
    }
}

/// Look up a process handle, panicking if the name is unknown.
pub fn pid(timeline: &Timeline, name: &str) -> Pid {
    timeline
        .pid_of(name)
        .unwrap_or_else(|| panic!("no process named {name}"))
}

pub fn cpu_ticks(timeline: &Timeline, name: &str) -> Vec<u64> {
    timeline.running_ticks(pid(timeline, name), OperationKind::Cpu)
}

pub fn io_ticks(timeline: &Timeline, name: &str) -> Vec<u64> {
    timeline.running_ticks(pid(timeline, name), OperationKind::Io)
}

pub fn completion(timeline: &Timeline, name: &str) -> Option<u64> {
    timeline.completion_tick(pid(timeline, name))
}

/// Check the properties every completed run must have.
///
/// - events are ordered by tick, then by scenario order
/// - each tick has at most one CPU holder and at most one I/O holder
/// - each process holds each resource for exactly its demand
/// - each process has events on every tick from its arrival to its single
///   `Terminated` event, and none after
pub fn assert_timeline_invariants(scenario: &Scenario, timeline: &Timeline) {
    let events = timeline.events();

    for pair in events.windows(2) {
        assert!(
            (pair[0].tick, pair[0].pid) < (pair[1].tick, pair[1].pid),
            "events out of order: {:?} then {:?}",
            pair[0],
            pair[1]
        );
    }

    let mut start = 0;
    while start < events.len() {
        let tick = events[start].tick;
        let end = start
            + events[start..]
                .iter()
                .take_while(|e| e.tick == tick)
                .count();
        for kind in [OperationKind::Cpu, OperationKind::Io] {
            let holders = events[start..end]
                .iter()
                .filter(|e| e.is_running(kind))
                .count();
            assert!(holders <= 1, "tick {tick}: {holders} {kind} holders");
        }
        start = end;
    }

    for (idx, def) in scenario.processes.iter().enumerate() {
        let pid = Pid(idx);
        for kind in [OperationKind::Cpu, OperationKind::Io] {
            assert_eq!(
                timeline.busy_ticks(pid, kind),
                def.demand(kind),
                "{}: {kind} ticks do not match demand",
                def.name
            );
        }

        let ticks: Vec<u64> = timeline.events_for(pid).map(|e| e.tick).collect();
        let expected: Vec<u64> = (def.arrival..def.arrival + ticks.len() as u64).collect();
        assert_eq!(ticks, expected, "{}: gap in events", def.name);

        let terminated: Vec<_> = timeline
            .events_for(pid)
            .filter(|e| e.state == EventState::Terminated)
            .collect();
        assert_eq!(terminated.len(), 1, "{}: terminal events", def.name);
        assert_eq!(
            timeline.events_for(pid).last().map(|e| e.state),
            Some(EventState::Terminated),
            "{}: events after termination",
            def.name
        );

        let last_burst = timeline
            .events_for(pid)
            .filter(|e| e.state == EventState::Running)
            .map(|e| e.tick)
            .max();
        assert_eq!(
            last_burst.map(|t| t + 1),
            Some(terminated[0].tick),
            "{}: terminated on the wrong tick",
            def.name
        );
    }
}
