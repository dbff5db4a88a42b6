//! Process model for the simulator.
//!
//! A [`ProcessDef`] is the immutable, scenario-level description of a
//! process: its name, arrival tick, priority and scripted sequence of
//! bursts. A [`RuntimeState`] is the mutable per-run bookkeeping the engine
//! keeps for it.

use std::fmt;

use serde::Serialize;

use crate::types::{Priority, Tick};

/// Which resource a burst needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Cpu,
    Io,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Cpu => write!(f, "CPU"),
            OperationKind::Io => write!(f, "I/O"),
        }
    }
}

/// One burst: a contiguous span of CPU or I/O work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    pub duration: Tick,
}

impl Operation {
    pub fn cpu(duration: Tick) -> Self {
        Self {
            kind: OperationKind::Cpu,
            duration,
        }
    }

    pub fn io(duration: Tick) -> Self {
        Self {
            kind: OperationKind::Io,
            duration,
        }
    }
}

/// Definition of a process for scenario creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDef {
    /// Unique name within the scenario.
    pub name: String,
    /// First tick at which the process exists.
    pub arrival: Tick,
    pub priority: Priority,
    /// Bursts, executed strictly in order.
    pub operations: Vec<Operation>,
}

impl ProcessDef {
    pub fn new(name: impl Into<String>, arrival: Tick, priority: Priority) -> Self {
        Self {
            name: name.into(),
            arrival,
            priority,
            operations: Vec::new(),
        }
    }

    /// Append a CPU burst.
    pub fn cpu(mut self, duration: Tick) -> Self {
        self.operations.push(Operation::cpu(duration));
        self
    }

    /// Append an I/O burst.
    pub fn io(mut self, duration: Tick) -> Self {
        self.operations.push(Operation::io(duration));
        self
    }

    /// Total ticks of work of the given kind.
    pub fn demand(&self, kind: OperationKind) -> Tick {
        self.operations
            .iter()
            .filter(|op| op.kind == kind)
            .map(|op| op.duration)
            .sum()
    }

    /// Total ticks of work across all bursts.
    pub fn total_burst(&self) -> Tick {
        self.operations.iter().map(|op| op.duration).sum()
    }
}

/// Mutable simulation state of one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeState {
    /// Index of the current operation. Equal to the operation count once
    /// every burst has completed.
    pub op_index: usize,
    /// Ticks left in the current operation.
    pub remaining: Tick,
    /// Tick at which the in-flight I/O burst completes, while this process
    /// holds the I/O device.
    pub io_due_at: Option<Tick>,
    /// Ticks spent ready for the CPU since last granted it.
    pub wait_age: Tick,
    /// Copy of the scenario priority; diverges only through aging.
    pub current_priority: Priority,
    /// Tick at which the `Terminated` event is owed.
    pub finished_at: Option<Tick>,
    /// Set once the `Terminated` event has been emitted.
    pub terminated: bool,
}

impl RuntimeState {
    pub fn new(def: &ProcessDef) -> Self {
        let remaining = def.operations.first().map_or(0, |op| op.duration);
        RuntimeState {
            op_index: 0,
            remaining,
            io_due_at: None,
            wait_age: 0,
            current_priority: def.priority,
            finished_at: None,
            terminated: false,
        }
    }

    /// The operation currently being worked on, or None once all are done.
    pub fn current_op<'a>(&self, def: &'a ProcessDef) -> Option<&'a Operation> {
        def.operations.get(self.op_index)
    }

    /// Whether the process still has bursts to run.
    pub fn is_active(&self) -> bool {
        self.finished_at.is_none() && !self.terminated
    }

    /// Move to the next operation. Returns true if there is one.
    pub fn advance(&mut self, def: &ProcessDef) -> bool {
        self.op_index += 1;
        self.io_due_at = None;
        match def.operations.get(self.op_index) {
            Some(op) => {
                self.remaining = op.duration;
                true
            }
            None => {
                self.remaining = 0;
                false
            }
        }
    }
}
