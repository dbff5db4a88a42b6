//! Per-tick arbitration of the CPU and the I/O device.
//!
//! [`Arbiter::select`] splits the live processes into CPU and I/O
//! candidates and asks the policy for one winner per resource.
//! [`Arbiter::commit`] then applies the consequences: wait ages and aging,
//! burst countdown, operation advance and completion. It is the only place
//! runtime state changes during a tick.

use tracing::{debug, info};

use crate::policy::{Candidate, Policy, Tenure};
use crate::process::OperationKind;
use crate::registry::Registry;
use crate::types::{Pid, Tick};

/// The resource holders for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Assignment {
    pub cpu: Option<Pid>,
    pub io: Option<Pid>,
}

#[derive(Debug, Clone, Copy)]
struct CpuTenure {
    tenure: Tenure,
    /// Operation index of the burst the tenure belongs to.
    op_index: usize,
}

#[derive(Debug, Default)]
pub(crate) struct Arbiter {
    cpu: Option<CpuTenure>,
    io: Option<Pid>,
    /// CPU candidates of the current tick, in scenario order.
    cpu_candidates: Vec<Pid>,
}

impl Arbiter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Decide who holds each resource during `now`.
    pub(crate) fn select<P: Policy + ?Sized>(
        &mut self,
        now: Tick,
        registry: &Registry<'_>,
        policy: &mut P,
    ) -> Assignment {
        let mut cpu_candidates: Vec<Candidate> = Vec::new();
        let mut io_candidates: Vec<Candidate> = Vec::new();
        for pid in registry.pids() {
            if !registry.is_live(pid, now) {
                continue;
            }
            match registry.current_kind(pid) {
                Some(OperationKind::Cpu) => cpu_candidates.push(registry.candidate(pid)),
                Some(OperationKind::Io) => io_candidates.push(registry.candidate(pid)),
                None => {}
            }
        }
        self.cpu_candidates = cpu_candidates.iter().map(|c| c.pid).collect();

        // An I/O burst in flight keeps the device until it completes.
        let in_flight = self.io.filter(|&pid| {
            registry
                .state(pid)
                .io_due_at
                .is_some_and(|due| due > now)
        });
        let io = in_flight.or_else(|| pick(&io_candidates, |c| policy.pick_io(c)));
        if let Some(pid) = io.filter(|&pid| Some(pid) != in_flight) {
            info!(
                tick = now,
                process = registry.name(pid),
                pid = pid.0,
                ticks = registry.state(pid).remaining,
                "IO START"
            );
        }
        self.io = io;

        // The previous CPU holder may keep the CPU while it is on the same
        // burst, if the policy lets it.
        let previous = self.cpu.filter(|held| {
            let pid = held.tenure.pid;
            registry.is_live(pid, now)
                && registry.current_kind(pid) == Some(OperationKind::Cpu)
                && registry.state(pid).op_index == held.op_index
        });
        let retained = previous.filter(|held| policy.keeps_cpu(&held.tenure));

        let cpu = match retained {
            Some(held) => {
                self.cpu = Some(CpuTenure {
                    tenure: Tenure {
                        pid: held.tenure.pid,
                        held: held.tenure.held + 1,
                    },
                    op_index: held.op_index,
                });
                Some(held.tenure.pid)
            }
            None => {
                let picked = pick(&cpu_candidates, |c| policy.pick_cpu(c));
                if let Some(prev) = previous.map(|held| held.tenure.pid) {
                    if picked != Some(prev) {
                        info!(
                            tick = now,
                            process = registry.name(prev),
                            pid = prev.0,
                            remaining = registry.state(prev).remaining,
                            "PREEMPTED"
                        );
                    }
                }
                if let Some(pid) = picked {
                    if previous.map(|held| held.tenure.pid) != Some(pid) {
                        info!(
                            tick = now,
                            process = registry.name(pid),
                            pid = pid.0,
                            remaining = registry.state(pid).remaining,
                            "STARTED"
                        );
                    }
                }
                self.cpu = picked.map(|pid| CpuTenure {
                    tenure: Tenure { pid, held: 1 },
                    op_index: registry.state(pid).op_index,
                });
                picked
            }
        };

        let cpu_name = cpu.map(|pid| registry.name(pid));
        let io_name = io.map(|pid| registry.name(pid));
        debug!(
            tick = now,
            cpu = ?cpu_name,
            io = ?io_name,
            cpu_queue = cpu_candidates.len(),
            io_queue = io_candidates.len(),
            "arbitrate"
        );

        Assignment { cpu, io }
    }

    /// Apply the effects of `assignment` at the end of tick `now`.
    pub(crate) fn commit<P: Policy + ?Sized>(
        &mut self,
        now: Tick,
        assignment: &Assignment,
        registry: &mut Registry<'_>,
        policy: &mut P,
    ) {
        for &pid in &self.cpu_candidates {
            let name = registry.name(pid);
            let state = registry.state_mut(pid);
            if assignment.cpu == Some(pid) {
                state.wait_age = 0;
                continue;
            }
            state.wait_age += 1;
            if let Some(promoted) = policy.promote(state.wait_age, state.current_priority) {
                if promoted != state.current_priority {
                    info!(
                        tick = now,
                        process = name,
                        pid = pid.0,
                        from = state.current_priority,
                        to = promoted,
                        "PROMOTED"
                    );
                }
                state.current_priority = promoted;
                state.wait_age = 0;
            }
        }

        if let Some(pid) = assignment.io {
            let state = registry.state_mut(pid);
            if state.io_due_at.is_none() {
                state.io_due_at = Some(now + state.remaining);
            }
            if work(now, pid, registry) {
                self.io = None;
            }
        }

        if let Some(pid) = assignment.cpu {
            if work(now, pid, registry) {
                self.cpu = None;
            }
        }
    }
}

/// Spend one tick of the holder's current burst. Returns true when the
/// burst completed.
fn work(now: Tick, pid: Pid, registry: &mut Registry<'_>) -> bool {
    let def = registry.def(pid);
    let state = registry.state_mut(pid);
    state.remaining = state.remaining.saturating_sub(1);
    if state.remaining > 0 {
        return false;
    }
    if !state.advance(def) {
        state.finished_at = Some(now + 1);
        info!(
            tick = now,
            process = def.name.as_str(),
            pid = pid.0,
            completion = now + 1,
            "COMPLETED"
        );
    }
    true
}

/// Ask the policy for a winner, accepting only one of the candidates.
fn pick(candidates: &[Candidate], rank: impl FnOnce(&[Candidate]) -> Option<Pid>) -> Option<Pid> {
    if candidates.is_empty() {
        return None;
    }
    rank(candidates).filter(|pid| candidates.iter().any(|c| c.pid == *pid))
}
