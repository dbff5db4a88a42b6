//! First In, First Out.
//!
//! Both resources go to the earliest arrival. A CPU burst runs to
//! completion once granted: a process that arrives earlier only wins the
//! next selection.

use super::{earliest_arrival, Candidate, Policy, Tenure};
use crate::types::Pid;

#[derive(Debug, Default, Clone, Copy)]
pub struct Fifo;

impl Policy for Fifo {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn keeps_cpu(&self, _tenure: &Tenure) -> bool {
        true
    }

    fn pick_cpu(&mut self, candidates: &[Candidate]) -> Option<Pid> {
        earliest_arrival(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::tests::cand;

    #[test]
    fn test_fifo_never_preempts() {
        let fifo = Fifo;
        let tenure = Tenure {
            pid: Pid(3),
            held: 1_000,
        };
        assert!(fifo.keeps_cpu(&tenure));
    }

    #[test]
    fn test_fifo_ranks_by_arrival_for_both_resources() {
        let mut fifo = Fifo;
        let c = [cand(0, 5, 9), cand(1, 2, 0), cand(2, 2, 1)];
        assert_eq!(fifo.pick_cpu(&c), Some(Pid(1)));
        assert_eq!(fifo.pick_io(&c), Some(Pid(1)));
    }
}
