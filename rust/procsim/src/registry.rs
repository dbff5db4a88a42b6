//! Per-process runtime state for one simulation run.
//!
//! The registry pairs each scenario [`ProcessDef`] with the mutable
//! [`RuntimeState`] the engine advances. Both are indexed by [`Pid`], the
//! process's position in scenario order; names are never copied.

use crate::policy::Candidate;
use crate::process::{OperationKind, ProcessDef, RuntimeState};
use crate::types::{Pid, Tick};

pub(crate) struct Registry<'a> {
    defs: &'a [ProcessDef],
    states: Vec<RuntimeState>,
}

impl<'a> Registry<'a> {
    pub(crate) fn new(defs: &'a [ProcessDef]) -> Self {
        Registry {
            defs,
            states: defs.iter().map(RuntimeState::new).collect(),
        }
    }

    /// All handles, in scenario order.
    pub(crate) fn pids(&self) -> impl Iterator<Item = Pid> {
        (0..self.defs.len()).map(Pid)
    }

    pub(crate) fn def(&self, pid: Pid) -> &'a ProcessDef {
        &self.defs[pid.index()]
    }

    pub(crate) fn state(&self, pid: Pid) -> &RuntimeState {
        &self.states[pid.index()]
    }

    pub(crate) fn state_mut(&mut self, pid: Pid) -> &mut RuntimeState {
        &mut self.states[pid.index()]
    }

    pub(crate) fn name(&self, pid: Pid) -> &'a str {
        self.def(pid).name.as_str()
    }

    /// Arrived and still has bursts to run.
    pub(crate) fn is_live(&self, pid: Pid, now: Tick) -> bool {
        self.def(pid).arrival <= now && self.state(pid).is_active()
    }

    /// Kind of the burst a live process is currently on.
    pub(crate) fn current_kind(&self, pid: Pid) -> Option<OperationKind> {
        self.state(pid)
            .current_op(self.def(pid))
            .map(|op| op.kind)
    }

    /// Ranking view of a process, as handed to policies.
    pub(crate) fn candidate(&self, pid: Pid) -> Candidate {
        Candidate {
            pid,
            arrival: self.def(pid).arrival,
            priority: self.state(pid).current_priority,
        }
    }

    /// Whether any process owes an event at `now`.
    pub(crate) fn has_visible(&self, now: Tick) -> bool {
        self.pids().any(|pid| {
            let state = self.state(pid);
            self.is_live(pid, now) || (!state.terminated && state.finished_at == Some(now))
        })
    }

    /// Earliest arrival strictly after `now`.
    pub(crate) fn next_arrival_after(&self, now: Tick) -> Option<Tick> {
        self.defs
            .iter()
            .map(|def| def.arrival)
            .filter(|&arrival| arrival > now)
            .min()
    }

    /// Mark processes whose `Terminated` event was owed at `now` as
    /// terminated. Returns their handles.
    pub(crate) fn retire(&mut self, now: Tick) -> Vec<Pid> {
        let mut retired = Vec::new();
        for (idx, state) in self.states.iter_mut().enumerate() {
            if !state.terminated && state.finished_at == Some(now) {
                state.terminated = true;
                retired.push(Pid(idx));
            }
        }
        retired
    }

    pub(crate) fn all_terminated(&self) -> bool {
        self.states.iter().all(|state| state.terminated)
    }
}
