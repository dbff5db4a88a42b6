//! Tick-driven simulation engine.
//!
//! Each tick the engine asks the [`Arbiter`] for the CPU and I/O holders,
//! records one event per visible process, retires processes whose
//! `Terminated` event has been emitted, and commits the tick's work. Ticks
//! with no arrived process are skipped by jumping to the next arrival; no
//! events are owed for them.

use tracing::{debug, info, warn};

use crate::arbiter::Arbiter;
use crate::error::SimulationError;
use crate::fmt::set_sim_tick;
use crate::policy::{self, Policy};
use crate::registry::Registry;
use crate::scenario::Scenario;
use crate::trace::Timeline;
use crate::types::Tick;

/// The main simulator.
pub struct Simulator<P: Policy> {
    policy: P,
}

impl Simulator<Box<dyn Policy>> {
    /// A simulator running the policy the scenario asks for.
    pub fn for_scenario(scenario: &Scenario) -> Self {
        Simulator::new(policy::build(scenario))
    }
}

impl<P: Policy> Simulator<P> {
    pub fn new(policy: P) -> Self {
        Simulator { policy }
    }

    /// Run a scenario and return the timeline.
    ///
    /// The policy is consumed so every run starts from fresh ranking state.
    pub fn run(mut self, scenario: &Scenario) -> Result<Timeline, SimulationError> {
        scenario.validate()?;
        self.policy.init(scenario);

        let mut registry = Registry::new(&scenario.processes);
        let mut arbiter = Arbiter::new();
        let mut timeline = Timeline::new(&scenario.processes);
        let mut now: Tick = 0;

        info!(
            policy = self.policy.name(),
            processes = scenario.processes.len(),
            tick_budget = scenario.tick_budget,
            "simulation start"
        );

        while !registry.all_terminated() {
            if !registry.has_visible(now) {
                if let Some(next) = registry.next_arrival_after(now) {
                    debug!(from = now, to = next, "idle, skipping to next arrival");
                    now = next;
                    continue;
                }
            }

            if now >= scenario.tick_budget || !registry.has_visible(now) {
                set_sim_tick(None);
                warn!(
                    tick_budget = scenario.tick_budget,
                    events = timeline.events().len(),
                    "tick budget exhausted"
                );
                return Err(SimulationError::NotConverged {
                    tick_budget: scenario.tick_budget,
                    timeline,
                });
            }

            set_sim_tick(Some(now));
            let assignment = arbiter.select(now, &registry, &mut self.policy);
            timeline.record_tick(now, &registry, &assignment);
            for pid in registry.retire(now) {
                debug!(tick = now, process = registry.name(pid), "terminated");
            }
            arbiter.commit(now, &assignment, &mut registry, &mut self.policy);
            now += 1;
        }

        set_sim_tick(None);
        info!(
            ticks = now,
            events = timeline.events().len(),
            "simulation complete"
        );
        Ok(timeline)
    }
}

impl Scenario {
    /// Run this scenario under its own policy.
    pub fn simulate(&self) -> Result<Timeline, SimulationError> {
        Simulator::for_scenario(self).run(self)
    }
}
