//! Multilevel feedback queue with aging.
//!
//! The CPU goes to the highest current priority, re-ranked every tick.
//! Processes tied at that priority take turns: each priority level keeps
//! its own rotation cursor, created the first time the level wins. A CPU
//! candidate passed over for `aging_threshold` ticks is promoted one step,
//! never beyond the cap of its [`Promotion`] scheme. The I/O device uses
//! plain priority order on the current priorities.

use std::collections::BTreeMap;

use super::{highest_priority, next_after, Candidate, Policy, Tenure};
use crate::scenario::{Promotion, Scenario};
use crate::types::{Pid, Priority, Tick};

#[derive(Debug, Clone)]
pub struct Multilevel {
    aging_threshold: Tick,
    promotion: Promotion,
    /// Last process granted the CPU, per priority level.
    cursors: BTreeMap<Priority, Pid>,
}

impl Multilevel {
    pub fn new(aging_threshold: Tick, promotion: Promotion) -> Self {
        Multilevel {
            aging_threshold,
            promotion,
            cursors: BTreeMap::new(),
        }
    }

    /// The priority one promotion step above `priority`.
    pub fn promoted(&self, priority: Priority) -> Priority {
        match &self.promotion {
            Promotion::Increment {
                ceiling: Some(ceiling),
            } => {
                if priority < *ceiling {
                    priority + 1
                } else {
                    priority
                }
            }
            // Unresolved until `init` sees the scenario.
            Promotion::Increment { ceiling: None } => priority,
            Promotion::Tiered { bands } => bands
                .iter()
                .copied()
                .filter(|&band| band > priority)
                .min()
                .unwrap_or(priority),
        }
    }
}

impl Policy for Multilevel {
    fn name(&self) -> &'static str {
        "multilevel"
    }

    fn init(&mut self, scenario: &Scenario) {
        if let Promotion::Increment { ceiling: None } = self.promotion {
            self.promotion = Promotion::Increment {
                ceiling: Some(scenario.max_priority()),
            };
        }
    }

    fn keeps_cpu(&self, _tenure: &Tenure) -> bool {
        false
    }

    fn pick_cpu(&mut self, candidates: &[Candidate]) -> Option<Pid> {
        let best = candidates.iter().map(|c| c.priority).max()?;
        let tied = candidates.iter().filter(|c| c.priority == best);
        let pick = next_after(self.cursors.get(&best).copied(), tied)?;
        self.cursors.insert(best, pick);
        Some(pick)
    }

    fn pick_io(&mut self, candidates: &[Candidate]) -> Option<Pid> {
        highest_priority(candidates)
    }

    fn promote(&mut self, wait_age: Tick, priority: Priority) -> Option<Priority> {
        (wait_age >= self.aging_threshold).then(|| self.promoted(priority))
    }
}
