use procsim::*;

mod common;
use common::{completion, cpu_ticks, io_ticks};

/// A higher-priority arrival takes the CPU at once; the displaced process
/// resumes with its remaining work.
#[test]
fn test_higher_priority_arrival_preempts() {
    common::setup_test();
    let scenario = Scenario::builder()
        .process(ProcessDef::new("P1", 0, 1).cpu(4))
        .process(ProcessDef::new("P2", 2, 5).cpu(2))
        .priority()
        .build()
        .unwrap();

    let timeline = common::run(&scenario);
    timeline.dump();

    assert_eq!(cpu_ticks(&timeline, "P1"), vec![0, 1, 4, 5]);
    assert_eq!(cpu_ticks(&timeline, "P2"), vec![2, 3]);
    assert_eq!(completion(&timeline, "P2"), Some(4));
    assert_eq!(completion(&timeline, "P1"), Some(6));

    let p1 = common::pid(&timeline, "P1");
    assert_eq!(timeline.waiting_ticks(p1), vec![2, 3]);
    common::assert_timeline_invariants(&scenario, &timeline);
}

/// Equal priorities fall back to arrival, then scenario order.
#[test]
fn test_ties_break_by_arrival_then_order() {
    common::setup_test();
    let scenario = Scenario::builder()
        .process(ProcessDef::new("second", 1, 3).cpu(1))
        .process(ProcessDef::new("third", 1, 3).cpu(1))
        .process(ProcessDef::new("first", 0, 3).io(1).cpu(1))
        .priority()
        .build()
        .unwrap();
    let timeline = common::run(&scenario);

    assert_eq!(cpu_ticks(&timeline, "first"), vec![1]);
    assert_eq!(cpu_ticks(&timeline, "second"), vec![2]);
    assert_eq!(cpu_ticks(&timeline, "third"), vec![3]);
    common::assert_timeline_invariants(&scenario, &timeline);
}

/// The I/O device is ranked by priority as well.
#[test]
fn test_io_ranked_by_priority() {
    common::setup_test();
    let scenario = Scenario::builder()
        .process(ProcessDef::new("low", 0, 1).io(2))
        .process(ProcessDef::new("high", 0, 3).io(1))
        .priority()
        .build()
        .unwrap();
    let timeline = common::run(&scenario);

    assert_eq!(io_ticks(&timeline, "high"), vec![0]);
    assert_eq!(io_ticks(&timeline, "low"), vec![1, 2]);
    assert_eq!(completion(&timeline, "low"), Some(3));
    common::assert_timeline_invariants(&scenario, &timeline);
}

/// An I/O burst in flight is not displaced by a higher-priority arrival.
#[test]
fn test_io_in_flight_not_preempted() {
    common::setup_test();
    let scenario = Scenario::builder()
        .process(ProcessDef::new("low", 0, 1).io(3))
        .process(ProcessDef::new("high", 1, 5).io(1))
        .priority()
        .build()
        .unwrap();
    let timeline = common::run(&scenario);

    assert_eq!(io_ticks(&timeline, "low"), vec![0, 1, 2]);
    assert_eq!(io_ticks(&timeline, "high"), vec![3]);
    assert_eq!(completion(&timeline, "high"), Some(4));
    common::assert_timeline_invariants(&scenario, &timeline);
}

/// Without aging, a low-priority process waits for every higher one.
#[test]
fn test_low_priority_waits() {
    common::setup_test();
    let scenario = Scenario::builder()
        .process(ProcessDef::new("hog", 0, 9).cpu(20))
        .process(ProcessDef::new("meek", 0, 0).cpu(1))
        .priority()
        .build()
        .unwrap();
    let timeline = common::run(&scenario);

    assert_eq!(cpu_ticks(&timeline, "meek"), vec![20]);
    common::assert_timeline_invariants(&scenario, &timeline);
}
