//! Round Robin.
//!
//! The CPU rotates over the candidates in scenario order. A holder keeps
//! the CPU for at most `quantum` consecutive ticks of one burst; the next
//! selection starts scanning right after the last process granted the
//! CPU. The I/O device is not time-sliced and is handed out by arrival.

use super::{next_after, Candidate, Policy, Tenure};
use crate::types::{Pid, Tick};

#[derive(Debug, Clone)]
pub struct RoundRobin {
    quantum: Tick,
    /// Last process granted the CPU.
    cursor: Option<Pid>,
}

impl RoundRobin {
    pub fn new(quantum: Tick) -> Self {
        RoundRobin {
            quantum,
            cursor: None,
        }
    }
}

impl Policy for RoundRobin {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn keeps_cpu(&self, tenure: &Tenure) -> bool {
        tenure.held < self.quantum
    }

    fn pick_cpu(&mut self, candidates: &[Candidate]) -> Option<Pid> {
        let pick = next_after(self.cursor, candidates)?;
        self.cursor = Some(pick);
        Some(pick)
    }
}
