//! Hand-checked scheduling scenarios.
//!
//! Each test pins down the exact dispatch order, timestamps and telemetry
//! of a small workload.

use rr_energy_sim::*;

mod common;

fn slices(result: &SimulationResult, pid: u32) -> Vec<(u64, u64)> {
    result
        .process(Pid(pid))
        .expect("process completed")
        .execution_history()
        .iter()
        .map(|s| (s.start, s.end))
        .collect()
}

/// One process, quantum smaller than its burst: two slices, no idle.
#[test]
fn test_single_process_two_slices() {
    common::setup_test();
    let scenario = common::scenario(&[(1, 0, 5, 1)], 3);
    let result = common::run(&scenario);
    common::assert_invariants(&scenario, &result);

    assert_eq!(slices(&result, 1), vec![(0, 3), (3, 5)]);
    let p = result.process(Pid(1)).unwrap();
    assert_eq!(p.start_time(), Some(0));
    assert_eq!(p.finish_time(), Some(5));
    assert_eq!(result.cpu.idle_time, 0);
    assert_eq!(result.trace.dispatch_count(Pid(1)), 2);
}

/// Two equal processes alternate every quantum.
#[test]
fn test_two_processes_alternate() {
    common::setup_test();
    let scenario = common::scenario(&[(1, 0, 4, 1), (2, 0, 4, 1)], 2);
    let result = common::run(&scenario);
    common::assert_invariants(&scenario, &result);

    assert_eq!(
        result.trace.dispatch_order(),
        vec![Pid(1), Pid(2), Pid(1), Pid(2)]
    );
    assert_eq!(slices(&result, 1), vec![(0, 2), (4, 6)]);
    assert_eq!(slices(&result, 2), vec![(2, 4), (6, 8)]);
    assert_eq!(result.process(Pid(1)).unwrap().finish_time(), Some(6));
    assert_eq!(result.process(Pid(2)).unwrap().finish_time(), Some(8));
    assert_eq!(result.completion_order(), vec![Pid(1), Pid(2)]);
    assert_eq!(result.cpu.idle_time, 0);
}

/// A late arrival leaves the CPU idle until it shows up.
#[test]
fn test_late_arrival_idles_first() {
    common::setup_test();
    let scenario = common::scenario(&[(1, 3, 2, 1)], 3);
    let result = common::run(&scenario);
    common::assert_invariants(&scenario, &result);

    assert_eq!(result.trace.idle_times(), vec![0, 1, 2]);
    assert_eq!(result.cpu.idle_time, 3);

    let cpu = CpuConfig::default();
    let idle_samples: Vec<_> = result.cpu.power_history[..3].to_vec();
    assert_eq!(
        idle_samples,
        vec![
            Sample { time: 0, value: cpu.base_power * IDLE_POWER_FRACTION },
            Sample { time: 1, value: cpu.base_power * IDLE_POWER_FRACTION },
            Sample { time: 2, value: cpu.base_power * IDLE_POWER_FRACTION },
        ]
    );
    assert!(result.cpu.frequency_history[..3]
        .iter()
        .all(|s| s.value == cpu.min_frequency));

    let p = result.process(Pid(1)).unwrap();
    assert_eq!(p.start_time(), Some(3));
    assert_eq!(p.finish_time(), Some(5));
    // Idle ticks draw power but are not charged to consumption.
    assert_eq!(result.cpu.power_consumption, 2.0 * cpu.base_power);
}

/// Priority 1 runs at max frequency, anything else at min frequency.
#[test]
fn test_priority_selects_frequency() {
    common::setup_test();
    let cpu = CpuConfig {
        base_power: 120.0,
        max_frequency: 4.0,
        min_frequency: 1.0,
    };
    let scenario = common::scenario_with_cpu(&[(1, 0, 3, 1), (2, 0, 3, 2)], 3, cpu);
    let result = common::run(&scenario);
    common::assert_invariants(&scenario, &result);

    assert_eq!(
        result.cpu.frequency_history,
        vec![Sample { time: 0, value: 4.0 }, Sample { time: 3, value: 1.0 }]
    );
    assert_eq!(
        result.cpu.power_history,
        vec![Sample { time: 0, value: 120.0 }, Sample { time: 3, value: 30.0 }]
    );
    assert_eq!(result.cpu.power_consumption, 120.0 * 3.0 + 30.0 * 3.0);
    assert_eq!(result.cpu.current_frequency, 1.0);
}

/// Any priority other than 1 is treated the same, however large.
#[test]
fn test_priority_is_binary() {
    common::setup_test();
    let scenario = common::scenario(&[(1, 0, 2, 2), (2, 0, 2, 50)], 2);
    let result = common::run(&scenario);

    let freqs: Vec<f64> = result.cpu.frequency_history.iter().map(|s| s.value).collect();
    assert_eq!(freqs, vec![1.0, 1.0]);
}

/// A quantum larger than every burst degenerates to first-come-first-served.
#[test]
fn test_large_quantum_is_fcfs() {
    common::setup_test();
    let defs = [(1, 0, 4, 1), (2, 1, 3, 2), (3, 2, 6, 1), (4, 10, 2, 2), (5, 2, 1, 2)];
    let scenario = common::scenario(&defs, 100);
    let result = common::run(&scenario);
    common::assert_invariants(&scenario, &result);

    // FCFS by arrival, input order among equal arrivals.
    let mut fcfs: Vec<_> = defs.to_vec();
    fcfs.sort_by_key(|&(_, arrival, _, _)| arrival);
    let mut now = 0;
    for &(pid, arrival, burst, _) in &fcfs {
        now = now.max(arrival);
        assert_eq!(slices(&result, pid), vec![(now, now + burst)], "P{pid}");
        now += burst;
    }
    assert_eq!(
        result.completion_order(),
        vec![Pid(1), Pid(2), Pid(3), Pid(5), Pid(4)]
    );
    assert!(result.completed.iter().all(|p| p.execution_history().len() == 1));
}

/// Same-time arrivals are admitted in input order, not by PID or burst.
#[test]
fn test_tie_break_follows_input_order() {
    common::setup_test();
    let scenario = common::scenario(&[(9, 0, 2, 1), (3, 0, 1, 1), (5, 0, 3, 1)], 5);
    let result = common::run(&scenario);

    assert_eq!(result.trace.admission_order(), vec![Pid(9), Pid(3), Pid(5)]);
    assert_eq!(result.trace.dispatch_order(), vec![Pid(9), Pid(3), Pid(5)]);
}

/// A process requeued at time t goes ahead of a process arriving at t.
#[test]
fn test_requeue_precedes_simultaneous_arrival() {
    common::setup_test();
    let scenario = common::scenario(&[(1, 0, 4, 1), (2, 2, 2, 1)], 2);
    let result = common::run(&scenario);
    common::assert_invariants(&scenario, &result);

    // P1 runs [0,2), is requeued at 2, then P2 is admitted at 2.
    assert_eq!(result.trace.dispatch_order(), vec![Pid(1), Pid(1), Pid(2)]);
    assert_eq!(slices(&result, 1), vec![(0, 2), (2, 4)]);
    assert_eq!(slices(&result, 2), vec![(4, 6)]);
}

/// Idle gaps between bursts of arrivals.
#[test]
fn test_gap_between_arrivals() {
    common::setup_test();
    let scenario = common::scenario(&[(1, 0, 2, 1), (2, 5, 1, 2)], 4);
    let result = common::run(&scenario);
    common::assert_invariants(&scenario, &result);

    assert_eq!(result.trace.idle_times(), vec![2, 3, 4]);
    assert_eq!(slices(&result, 2), vec![(5, 6)]);
    assert_eq!(result.makespan(), 6);
}

/// The demo workload from the command-line tool.
#[test]
fn test_demo_workload() {
    common::setup_test();
    let scenario = demo_scenario();
    let result = common::run(&scenario);
    common::assert_invariants(&scenario, &result);

    assert_eq!(
        result.completion_order(),
        vec![Pid(4), Pid(2), Pid(3), Pid(1)]
    );
    assert_eq!(result.process(Pid(4)).unwrap().finish_time(), Some(14));
    assert_eq!(result.process(Pid(2)).unwrap().finish_time(), Some(19));
    assert_eq!(result.process(Pid(3)).unwrap().finish_time(), Some(27));
    assert_eq!(result.process(Pid(1)).unwrap().finish_time(), Some(115));
    assert_eq!(result.cpu.idle_time, 0);
}
