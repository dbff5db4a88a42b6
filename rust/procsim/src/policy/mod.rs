//! Scheduling policies.
//!
//! A policy ranks the processes competing for each resource. The
//! [arbiter](crate::arbiter) consults it every tick, separately for the CPU
//! and the I/O device, and owns every state change that follows from the
//! decision. Policies only keep their own ranking state (rotation cursors).

mod fifo;
mod multilevel;
mod priority;
mod round_robin;

pub use fifo::Fifo;
pub use multilevel::Multilevel;
pub use priority::PriorityPreemptive;
pub use round_robin::RoundRobin;

use crate::scenario::{PolicyKind, Scenario};
use crate::types::{Pid, Priority, Tick};

/// What a policy sees of a process competing for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub pid: Pid,
    pub arrival: Tick,
    /// Current, possibly aged, priority.
    pub priority: Priority,
}

/// The CPU holder of the previous tick, still inside the same CPU burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tenure {
    pub pid: Pid,
    /// Consecutive ticks held so far.
    pub held: Tick,
}

/// A ranking strategy for the CPU and the I/O device.
///
/// Candidate slices are always non-empty and in scenario order.
pub trait Policy {
    fn name(&self) -> &'static str;

    /// Called once before the first tick of a run.
    fn init(&mut self, _scenario: &Scenario) {}

    /// Whether the previous CPU holder keeps the CPU for another tick
    /// without a new ranking.
    fn keeps_cpu(&self, tenure: &Tenure) -> bool;

    /// Choose the CPU holder for this tick.
    fn pick_cpu(&mut self, candidates: &[Candidate]) -> Option<Pid>;

    /// Choose the process to start an I/O burst when the device is free.
    fn pick_io(&mut self, candidates: &[Candidate]) -> Option<Pid> {
        earliest_arrival(candidates)
    }

    /// Called for a CPU candidate that was passed over, after its wait age
    /// was incremented. Returns the priority it is promoted to once the
    /// wait age warrants a promotion; the arbiter then resets the age.
    fn promote(&mut self, _wait_age: Tick, _priority: Priority) -> Option<Priority> {
        None
    }
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn init(&mut self, scenario: &Scenario) {
        (**self).init(scenario)
    }

    fn keeps_cpu(&self, tenure: &Tenure) -> bool {
        (**self).keeps_cpu(tenure)
    }

    fn pick_cpu(&mut self, candidates: &[Candidate]) -> Option<Pid> {
        (**self).pick_cpu(candidates)
    }

    fn pick_io(&mut self, candidates: &[Candidate]) -> Option<Pid> {
        (**self).pick_io(candidates)
    }

    fn promote(&mut self, wait_age: Tick, priority: Priority) -> Option<Priority> {
        (**self).promote(wait_age, priority)
    }
}

/// Instantiate the policy a scenario asks for.
pub fn build(scenario: &Scenario) -> Box<dyn Policy> {
    match &scenario.policy {
        PolicyKind::Fifo => Box::new(Fifo),
        PolicyKind::RoundRobin { quantum } => Box::new(RoundRobin::new(*quantum)),
        PolicyKind::Priority => Box::new(PriorityPreemptive),
        PolicyKind::Multilevel {
            aging_threshold,
            promotion,
        } => Box::new(Multilevel::new(*aging_threshold, promotion.clone())),
    }
}

/// Smallest arrival tick; ties go to scenario order.
pub(crate) fn earliest_arrival(candidates: &[Candidate]) -> Option<Pid> {
    candidates
        .iter()
        .min_by_key(|c| (c.arrival, c.pid))
        .map(|c| c.pid)
}

/// Largest priority; ties go to the earliest arrival, then scenario order.
pub(crate) fn highest_priority(candidates: &[Candidate]) -> Option<Pid> {
    candidates
        .iter()
        .min_by_key(|c| (std::cmp::Reverse(c.priority), c.arrival, c.pid))
        .map(|c| c.pid)
}

/// Next candidate after `cursor` in circular scenario order.
pub(crate) fn next_after<'a>(
    cursor: Option<Pid>,
    candidates: impl IntoIterator<Item = &'a Candidate> + Clone,
) -> Option<Pid> {
    let wrapped = candidates.clone().into_iter().next().map(|c| c.pid);
    match cursor {
        None => wrapped,
        Some(last) => candidates
            .into_iter()
            .map(|c| c.pid)
            .find(|&pid| pid > last)
            .or(wrapped),
    }
}
