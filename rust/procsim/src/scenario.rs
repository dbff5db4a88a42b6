//! Scenario definition and builder API.

use std::collections::HashSet;
use std::fmt;

use crate::error::{InvalidScenario, SimulationError};
use crate::process::ProcessDef;
use crate::types::{Priority, Tick};

/// Default number of ticks a run may take before it is abandoned.
pub const DEFAULT_TICK_BUDGET: Tick = 10_000;

/// How aging raises a waiting process's priority under [`PolicyKind::Multilevel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Promotion {
    /// Add one per promotion, up to `ceiling`. Without a ceiling, the highest
    /// priority declared in the scenario is the cap.
    Increment { ceiling: Option<Priority> },
    /// Jump to the next band above the current priority. The highest band
    /// is the cap.
    Tiered { bands: Vec<Priority> },
}

impl Default for Promotion {
    fn default() -> Self {
        Promotion::Increment { ceiling: None }
    }
}

/// Which scheduling discipline arbitrates the CPU and I/O device, with its
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyKind {
    Fifo,
    RoundRobin {
        quantum: Tick,
    },
    Priority,
    Multilevel {
        aging_threshold: Tick,
        promotion: Promotion,
    },
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Fifo => write!(f, "FIFO"),
            PolicyKind::RoundRobin { quantum } => write!(f, "Round Robin (quantum={quantum})"),
            PolicyKind::Priority => write!(f, "Priority Preemptive"),
            PolicyKind::Multilevel {
                aging_threshold, ..
            } => write!(f, "Multilevel with Aging (threshold={aging_threshold})"),
        }
    }
}

/// A complete simulation scenario: processes, policy and tick budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Processes in declaration order. A process's position is its [`Pid`](crate::Pid).
    pub processes: Vec<ProcessDef>,
    pub policy: PolicyKind,
    /// Ticks `0..tick_budget` may be simulated.
    pub tick_budget: Tick,
}

/// Builder for constructing scenarios.
pub struct ScenarioBuilder {
    processes: Vec<ProcessDef>,
    policy: PolicyKind,
    tick_budget: Tick,
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder {
            processes: Vec::new(),
            policy: PolicyKind::Fifo,
            tick_budget: DEFAULT_TICK_BUDGET,
        }
    }

    /// Check every structural rule a run relies on.
    pub fn validate(&self) -> Result<(), InvalidScenario> {
        if self.processes.is_empty() {
            return Err(InvalidScenario::NoProcesses);
        }

        let mut seen = HashSet::new();
        for def in &self.processes {
            if !seen.insert(def.name.as_str()) {
                return Err(InvalidScenario::DuplicateName(def.name.clone()));
            }
            if def.operations.is_empty() {
                return Err(InvalidScenario::NoOperations(def.name.clone()));
            }
            if let Some(index) = def.operations.iter().position(|op| op.duration == 0) {
                return Err(InvalidScenario::ZeroDuration {
                    process: def.name.clone(),
                    index,
                });
            }
        }

        match &self.policy {
            PolicyKind::RoundRobin { quantum: 0 } => Err(InvalidScenario::ZeroQuantum),
            PolicyKind::Multilevel {
                aging_threshold: 0,
                ..
            } => Err(InvalidScenario::ZeroAgingThreshold),
            PolicyKind::Multilevel {
                promotion: Promotion::Tiered { bands },
                ..
            } if bands.is_empty() => Err(InvalidScenario::EmptyBands),
            _ => Ok(()),
        }
    }

    /// Highest priority declared by any process.
    pub fn max_priority(&self) -> Priority {
        self.processes
            .iter()
            .map(|def| def.priority)
            .max()
            .unwrap_or_default()
    }

    /// Find a process by name.
    pub fn process(&self, name: &str) -> Option<&ProcessDef> {
        self.processes.iter().find(|def| def.name == name)
    }
}

impl ScenarioBuilder {
    /// Add a process with a full ProcessDef.
    pub fn process(mut self, def: ProcessDef) -> Self {
        self.processes.push(def);
        self
    }

    /// Select the scheduling policy.
    pub fn policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn fifo(self) -> Self {
        self.policy(PolicyKind::Fifo)
    }

    pub fn round_robin(self, quantum: Tick) -> Self {
        self.policy(PolicyKind::RoundRobin { quantum })
    }

    pub fn priority(self) -> Self {
        self.policy(PolicyKind::Priority)
    }

    pub fn multilevel(self, aging_threshold: Tick, promotion: Promotion) -> Self {
        self.policy(PolicyKind::Multilevel {
            aging_threshold,
            promotion,
        })
    }

    /// Set the maximum number of ticks a run may take.
    pub fn tick_budget(mut self, ticks: Tick) -> Self {
        self.tick_budget = ticks;
        self
    }

    /// Build and validate the scenario.
    pub fn build(self) -> Result<Scenario, SimulationError> {
        let scenario = Scenario {
            processes: self.processes,
            policy: self.policy,
            tick_budget: self.tick_budget,
        };
        scenario.validate()?;
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(result: Result<Scenario, SimulationError>) -> InvalidScenario {
        match result {
            Err(SimulationError::InvalidScenario(e)) => e,
            other => panic!("expected InvalidScenario, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_scenario_rejected() {
        assert_eq!(
            invalid(Scenario::builder().build()),
            InvalidScenario::NoProcesses
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = Scenario::builder()
            .process(ProcessDef::new("A", 0, 1).cpu(1))
            .process(ProcessDef::new("A", 3, 1).cpu(2))
            .build();
        assert_eq!(invalid(result), InvalidScenario::DuplicateName("A".into()));
    }

    #[test]
    fn test_missing_operations_rejected() {
        let result = Scenario::builder()
            .process(ProcessDef::new("A", 0, 1))
            .build();
        assert_eq!(invalid(result), InvalidScenario::NoOperations("A".into()));
    }

    #[test]
    fn test_zero_duration_reports_position() {
        let result = Scenario::builder()
            .process(ProcessDef::new("A", 0, 1).cpu(2).io(0).cpu(1))
            .build();
        assert_eq!(
            invalid(result),
            InvalidScenario::ZeroDuration {
                process: "A".into(),
                index: 1
            }
        );
    }

    #[test]
    fn test_policy_parameters_checked() {
        let base = || Scenario::builder().process(ProcessDef::new("A", 0, 1).cpu(1));
        assert_eq!(
            invalid(base().round_robin(0).build()),
            InvalidScenario::ZeroQuantum
        );
        assert_eq!(
            invalid(base().multilevel(0, Promotion::default()).build()),
            InvalidScenario::ZeroAgingThreshold
        );
        assert_eq!(
            invalid(
                base()
                    .multilevel(3, Promotion::Tiered { bands: vec![] })
                    .build()
            ),
            InvalidScenario::EmptyBands
        );
        assert!(base().round_robin(1).build().is_ok());
    }

    #[test]
    fn test_defaults() {
        let scenario = Scenario::builder()
            .process(ProcessDef::new("A", 0, 4).cpu(1))
            .process(ProcessDef::new("B", 0, 7).io(1))
            .build()
            .unwrap();
        assert_eq!(scenario.policy, PolicyKind::Fifo);
        assert_eq!(scenario.tick_budget, DEFAULT_TICK_BUDGET);
        assert_eq!(scenario.max_priority(), 7);
        assert_eq!(scenario.process("B").map(|p| p.arrival), Some(0));
    }
}
