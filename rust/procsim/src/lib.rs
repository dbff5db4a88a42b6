//! procsim - Deterministic tick-driven simulator for CPU scheduling policies.
//!
//! Processes are scripted as alternating CPU and I/O bursts. The engine
//! advances one tick at a time, arbitrating two single-unit resources (the
//! CPU and the I/O device) under a pluggable policy, and records what every
//! process was doing at every tick.
//!
//! # Architecture
//!
//! - **Scenario**: processes, policy and tick budget; validated up front
//! - **Registry**: per-process runtime state, indexed by [`Pid`]
//! - **Policies**: FIFO, Round Robin, Priority Preemptive, Multilevel with aging
//! - **Arbiter**: per-tick CPU/I-O assignment and the state changes it implies
//! - **Timeline**: the ordered per-tick event log, plus statistics and renderers
//!
//! # Usage
//!
//! ```rust
//! use procsim::*;
//!
//! let scenario = Scenario::builder()
//!     .process(ProcessDef::new("P1", 0, 1).cpu(3))
//!     .process(ProcessDef::new("P2", 1, 1).cpu(2).io(1))
//!     .round_robin(2)
//!     .build()
//!     .unwrap();
//!
//! let timeline = scenario.simulate().unwrap();
//! print!("{}", render::gantt(&timeline));
//! ```

mod arbiter;
pub mod config;
pub mod engine;
pub mod error;
pub mod fmt;
pub mod policy;
pub mod process;
mod registry;
pub mod render;
pub mod scenario;
pub mod stats;
pub mod trace;
pub mod types;

// Re-export the main public types for convenience.
pub use arbiter::Assignment;
pub use config::{load_workload, parse_workload, ConfigError, Workload};
pub use engine::Simulator;
pub use error::{InvalidScenario, SimulationError};
pub use fmt::{sim_tick, SimFormat};
pub use policy::{Candidate, Fifo, Multilevel, Policy, PriorityPreemptive, RoundRobin, Tenure};
pub use process::{Operation, OperationKind, ProcessDef, RuntimeState};
pub use scenario::{PolicyKind, Promotion, Scenario, ScenarioBuilder, DEFAULT_TICK_BUDGET};
pub use stats::{process_stats, summarize, ProcessStats, RunSummary};
pub use trace::{EventState, ProcessInfo, Timeline, TimelineEvent};
pub use types::{Pid, Priority, Tick};
