//! Newtype wrappers and type aliases for domain concepts.
//!
//! Process handles are newtypes so an index into the process registry can
//! never be confused with a tick count or a priority. Plain quantities
//! (ticks, priorities) are aliases.

use serde::Serialize;

/// Stable handle of a process within one scenario.
///
/// The handle is the process's position in scenario order, so iterating
/// handles in ascending order is iterating processes in the order the
/// scenario declared them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Pid(pub usize);

impl Pid {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Simulated time, in discrete ticks.
pub type Tick = u64;

/// Scheduling priority. Larger values are more important.
pub type Priority = i32;
