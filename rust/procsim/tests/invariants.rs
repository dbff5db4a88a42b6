//! Property checks over fixed and randomized scenarios.
//!
//! Randomized scenarios are seeded so any failure is reproducible:
//! - `PROCSIM_SEED`: Random seed (default: 42)

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use procsim::*;

mod common;

const RANDOM_RUNS: usize = 200;

/// Get seed from environment or use default.
fn get_seed() -> u64 {
    std::env::var("PROCSIM_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(42)
}

fn all_policies() -> Vec<PolicyKind> {
    vec![
        PolicyKind::Fifo,
        PolicyKind::RoundRobin { quantum: 1 },
        PolicyKind::RoundRobin { quantum: 3 },
        PolicyKind::Priority,
        PolicyKind::Multilevel {
            aging_threshold: 2,
            promotion: Promotion::default(),
        },
        PolicyKind::Multilevel {
            aging_threshold: 3,
            promotion: Promotion::Tiered {
                bands: vec![0, 2, 4],
            },
        },
    ]
}

/// Generate a random process: 1-4 bursts of alternating kind.
fn random_process(rng: &mut SmallRng, idx: usize) -> ProcessDef {
    let mut def = ProcessDef::new(
        format!("p{idx}"),
        rng.gen_range(0..12),
        rng.gen_range(0..5),
    );
    let mut cpu = rng.gen_bool(0.7);
    for _ in 0..rng.gen_range(1..=4) {
        let duration = rng.gen_range(1..=5);
        def = if cpu { def.cpu(duration) } else { def.io(duration) };
        cpu = !cpu;
    }
    def
}

fn random_scenario(rng: &mut SmallRng, policy: PolicyKind) -> Scenario {
    let count = rng.gen_range(1..=6);
    (0..count)
        .fold(Scenario::builder().policy(policy), |builder, idx| {
            builder.process(random_process(rng, idx))
        })
        .build()
        .unwrap()
}

fn mixed_scenario(policy: PolicyKind) -> Scenario {
    Scenario::builder()
        .process(ProcessDef::new("editor", 0, 3).cpu(2).io(3).cpu(1))
        .process(ProcessDef::new("compiler", 1, 1).cpu(6).io(1).cpu(2))
        .process(ProcessDef::new("backup", 2, 0).io(4).cpu(1).io(4))
        .process(ProcessDef::new("shell", 7, 4).cpu(1))
        .policy(policy)
        .build()
        .unwrap()
}

#[test]
fn test_invariants_hold_for_every_policy() {
    common::setup_test();
    for policy in all_policies() {
        let scenario = mixed_scenario(policy);
        let timeline = common::run(&scenario);
        common::assert_timeline_invariants(&scenario, &timeline);
    }
}

#[test]
fn test_invariants_hold_for_random_scenarios() {
    common::setup_test();
    let seed = get_seed();
    let mut rng = SmallRng::seed_from_u64(seed);
    for run in 0..RANDOM_RUNS {
        let policies = all_policies();
        let policy = policies[rng.gen_range(0..policies.len())].clone();
        let scenario = random_scenario(&mut rng, policy);
        let timeline = match scenario.simulate() {
            Ok(timeline) => timeline,
            Err(e) => panic!("seed {seed} run {run}: {e}\n{scenario:#?}"),
        };
        common::assert_timeline_invariants(&scenario, &timeline);
    }
}

/// Running the same scenario twice yields identical timelines, down to the
/// serialized bytes.
#[test]
fn test_runs_are_deterministic() {
    common::setup_test();
    for policy in all_policies() {
        let scenario = mixed_scenario(policy);
        let first = common::run(&scenario);
        let second = common::run(&scenario);
        assert_eq!(first, second);

        let mut a = Vec::new();
        let mut b = Vec::new();
        first.write_json(&mut a).unwrap();
        second.write_json(&mut b).unwrap();
        assert_eq!(a, b);
    }
}

/// A policy handed to `Simulator::new` behaves like the one the scenario
/// selects.
#[test]
fn test_explicit_policy_matches_scenario_policy() {
    common::setup_test();
    let scenario = mixed_scenario(PolicyKind::RoundRobin { quantum: 2 });
    let via_scenario = common::run(&scenario);
    let via_simulator = Simulator::new(RoundRobin::new(2)).run(&scenario).unwrap();
    assert_eq!(via_scenario, via_simulator);
}

/// Without I/O bursts, FIFO degenerates to running processes one after
/// another in arrival order.
#[test]
fn test_fifo_without_io_is_sequential() {
    common::setup_test();
    let mut rng = SmallRng::seed_from_u64(get_seed());
    for _ in 0..50 {
        let count = rng.gen_range(1..=5);
        let scenario = (0..count)
            .fold(Scenario::builder().fifo(), |builder, idx| {
                builder.process(
                    ProcessDef::new(format!("p{idx}"), rng.gen_range(0..8), 0)
                        .cpu(rng.gen_range(1..=4)),
                )
            })
            .build()
            .unwrap();
        let timeline = common::run(&scenario);

        let mut order: Vec<usize> = (0..count).collect();
        order.sort_by_key(|&idx| scenario.processes[idx].arrival);
        let mut clock: Tick = 0;
        for idx in order {
            let def = &scenario.processes[idx];
            let start = clock.max(def.arrival);
            let expected: Vec<Tick> = (start..start + def.total_burst()).collect();
            assert_eq!(
                timeline.running_ticks(Pid(idx), OperationKind::Cpu),
                expected,
                "{}",
                def.name
            );
            clock = start + def.total_burst();
        }
    }
}
