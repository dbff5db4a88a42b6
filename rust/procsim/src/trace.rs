//! Timeline recording for the simulator.
//!
//! Every tick, each process that has arrived and not yet terminated gets
//! exactly one [`TimelineEvent`]. Events are stored tick-ascending and,
//! within a tick, in scenario order. Renderers and statistics rely on that
//! ordering.

use std::io::Write;

use serde::Serialize;

use crate::arbiter::Assignment;
use crate::process::{OperationKind, ProcessDef};
use crate::registry::Registry;
use crate::types::{Pid, Tick};

/// What a process was doing during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventState {
    /// Holding the CPU or the I/O device.
    Running,
    /// Arrived but holding neither resource.
    Waiting,
    /// Finished its last burst on the previous tick. Emitted once.
    Terminated,
}

/// A single timeline record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEvent {
    pub tick: Tick,
    pub pid: Pid,
    pub state: EventState,
    /// The resource held, for `Running` events.
    pub operation: Option<OperationKind>,
}

impl TimelineEvent {
    /// Whether this event is the process holding the given resource.
    pub fn is_running(&self, kind: OperationKind) -> bool {
        self.state == EventState::Running && self.operation == Some(kind)
    }
}

/// Identity of a process as it appears in a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessInfo {
    pub name: String,
    pub arrival: Tick,
}

/// The ordered event log of a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    processes: Vec<ProcessInfo>,
    events: Vec<TimelineEvent>,
}

impl Timeline {
    pub(crate) fn new(defs: &[ProcessDef]) -> Self {
        Timeline {
            processes: defs
                .iter()
                .map(|def| ProcessInfo {
                    name: def.name.clone(),
                    arrival: def.arrival,
                })
                .collect(),
            events: Vec::new(),
        }
    }

    /// Emit this tick's events: a `Terminated` for every process whose last
    /// burst ended on the previous tick, and a `Running` or `Waiting` for
    /// every live process.
    pub(crate) fn record_tick(&mut self, now: Tick, registry: &Registry<'_>, assignment: &Assignment) {
        for pid in registry.pids() {
            let state = registry.state(pid);
            let (state, operation) = if !state.terminated && state.finished_at == Some(now) {
                (EventState::Terminated, None)
            } else if !registry.is_live(pid, now) {
                continue;
            } else if assignment.cpu == Some(pid) {
                (EventState::Running, Some(OperationKind::Cpu))
            } else if assignment.io == Some(pid) {
                (EventState::Running, Some(OperationKind::Io))
            } else {
                (EventState::Waiting, None)
            };
            self.events.push(TimelineEvent {
                tick: now,
                pid,
                state,
                operation,
            });
        }
    }

    /// Get all events in order.
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// The processes of the scenario, indexed by [`Pid`].
    pub fn processes(&self) -> &[ProcessInfo] {
        &self.processes
    }

    pub fn name(&self, pid: Pid) -> &str {
        self.processes
            .get(pid.index())
            .map_or("?", |p| p.name.as_str())
    }

    /// Look up a process handle by name.
    pub fn pid_of(&self, name: &str) -> Option<Pid> {
        self.processes.iter().position(|p| p.name == name).map(Pid)
    }

    /// Events of one process, in tick order.
    pub fn events_for(&self, pid: Pid) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter().filter(move |e| e.pid == pid)
    }

    /// Ticks during which the process held the given resource.
    pub fn running_ticks(&self, pid: Pid, kind: OperationKind) -> Vec<Tick> {
        self.events_for(pid)
            .filter(|e| e.is_running(kind))
            .map(|e| e.tick)
            .collect()
    }

    /// Number of ticks the process held the given resource.
    pub fn busy_ticks(&self, pid: Pid, kind: OperationKind) -> Tick {
        self.events_for(pid).filter(|e| e.is_running(kind)).count() as Tick
    }

    /// Ticks during which the process was waiting.
    pub fn waiting_ticks(&self, pid: Pid) -> Vec<Tick> {
        self.events_for(pid)
            .filter(|e| e.state == EventState::Waiting)
            .map(|e| e.tick)
            .collect()
    }

    /// Which process held the given resource during `tick`.
    pub fn holder_at(&self, tick: Tick, kind: OperationKind) -> Option<Pid> {
        self.events
            .iter()
            .skip_while(|e| e.tick < tick)
            .take_while(|e| e.tick == tick)
            .find(|e| e.is_running(kind))
            .map(|e| e.pid)
    }

    /// Tick of the process's `Terminated` event.
    pub fn completion_tick(&self, pid: Pid) -> Option<Tick> {
        self.events_for(pid)
            .find(|e| e.state == EventState::Terminated)
            .map(|e| e.tick)
    }

    /// Tick of the last recorded event.
    pub fn last_tick(&self) -> Option<Tick> {
        self.events.last().map(|e| e.tick)
    }

    /// Pretty-print the timeline for debugging.
    pub fn dump(&self) {
        for event in &self.events {
            let desc = match (event.state, event.operation) {
                (EventState::Running, Some(OperationKind::Cpu)) => "RUN  cpu",
                (EventState::Running, Some(OperationKind::Io)) => "RUN  io",
                (EventState::Running, None) => "RUN",
                (EventState::Waiting, _) => "WAIT",
                (EventState::Terminated, _) => "TERM",
            };
            eprintln!(
                "[{:>6}] {:<12} {}",
                event.tick,
                self.name(event.pid),
                desc
            );
        }
    }

    /// Write the timeline as a JSON object with process names resolved.
    ///
    /// Events are streamed one at a time rather than collected first.
    pub fn write_json(&self, writer: &mut impl Write) -> std::io::Result<()> {
        #[derive(Serialize)]
        struct EventRecord<'a> {
            tick: Tick,
            process: &'a str,
            state: EventState,
            operation: Option<OperationKind>,
        }

        writer.write_all(b"{\"processes\":")?;
        serde_json::to_writer(&mut *writer, &self.processes)?;
        writer.write_all(b",\"events\":[")?;
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                writer.write_all(b",")?;
            }
            serde_json::to_writer(
                &mut *writer,
                &EventRecord {
                    tick: event.tick,
                    process: self.name(event.pid),
                    state: event.state,
                    operation: event.operation,
                },
            )?;
        }
        writer.write_all(b"]}")?;
        Ok(())
    }
}
