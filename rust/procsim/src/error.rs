//! Errors reported by scenario validation and the simulation engine.

use std::fmt;

use crate::trace::Timeline;
use crate::types::Tick;

/// A defect in a scenario, detected before any tick is simulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidScenario {
    /// The scenario has no processes.
    NoProcesses,
    /// Two processes share a name.
    DuplicateName(String),
    /// A process has no operations.
    NoOperations(String),
    /// An operation has a zero duration.
    ZeroDuration { process: String, index: usize },
    /// Round Robin was configured with a zero quantum.
    ZeroQuantum,
    /// Multilevel was configured with a zero aging threshold.
    ZeroAgingThreshold,
    /// Tiered promotion was configured without any band.
    EmptyBands,
}

impl fmt::Display for InvalidScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidScenario::NoProcesses => write!(f, "scenario has no processes"),
            InvalidScenario::DuplicateName(name) => write!(f, "duplicate process name {name:?}"),
            InvalidScenario::NoOperations(name) => {
                write!(f, "process {name:?} has no operations")
            }
            InvalidScenario::ZeroDuration { process, index } => {
                write!(f, "operation {index} of process {process:?} has zero duration")
            }
            InvalidScenario::ZeroQuantum => write!(f, "round robin quantum must be positive"),
            InvalidScenario::ZeroAgingThreshold => write!(f, "aging threshold must be positive"),
            InvalidScenario::EmptyBands => write!(f, "tiered promotion needs at least one band"),
        }
    }
}

impl std::error::Error for InvalidScenario {}

/// Errors from running a simulation.
#[derive(Debug)]
pub enum SimulationError {
    /// The scenario failed validation; nothing was simulated.
    InvalidScenario(InvalidScenario),
    /// The tick budget ran out with processes still unterminated. Carries
    /// everything recorded up to that point.
    NotConverged { tick_budget: Tick, timeline: Timeline },
}

impl SimulationError {
    /// The partial timeline of a run that did not converge.
    pub fn partial_timeline(&self) -> Option<&Timeline> {
        match self {
            SimulationError::NotConverged { timeline, .. } => Some(timeline),
            SimulationError::InvalidScenario(_) => None,
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidScenario(e) => write!(f, "invalid scenario: {e}"),
            SimulationError::NotConverged {
                tick_budget,
                timeline,
            } => write!(
                f,
                "simulation did not converge within {tick_budget} ticks ({} events recorded)",
                timeline.events().len()
            ),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::InvalidScenario(e) => Some(e),
            SimulationError::NotConverged { .. } => None,
        }
    }
}

impl From<InvalidScenario> for SimulationError {
    fn from(e: InvalidScenario) -> Self {
        SimulationError::InvalidScenario(e)
    }
}
