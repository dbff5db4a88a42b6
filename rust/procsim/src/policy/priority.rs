//! Preemptive priority scheduling.
//!
//! Every tick the CPU goes to the highest current priority, ties broken by
//! earliest arrival then scenario order. A displaced process keeps its
//! remaining burst and resumes where it left off. The I/O device uses the
//! same ranking, but an I/O burst in flight is never displaced.

use super::{highest_priority, Candidate, Policy, Tenure};
use crate::types::Pid;

#[derive(Debug, Default, Clone, Copy)]
pub struct PriorityPreemptive;

impl Policy for PriorityPreemptive {
    fn name(&self) -> &'static str {
        "priority"
    }

    fn keeps_cpu(&self, _tenure: &Tenure) -> bool {
        false
    }

    fn pick_cpu(&mut self, candidates: &[Candidate]) -> Option<Pid> {
        highest_priority(candidates)
    }

    fn pick_io(&mut self, candidates: &[Candidate]) -> Option<Pid> {
        highest_priority(candidates)
    }
}
