#![allow(dead_code)]

use rr_energy_sim::{CpuConfig, ProcessDef, Scenario, SimFormat, SimulationResult, Simulator};

/// Initialize tracing from `RUST_LOG`.
///
/// `try_init()` is idempotent: first call in the process succeeds,
/// subsequent calls are silently ignored.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .event_format(SimFormat)
        .with_test_writer()
        .try_init();
}

/// Build a scenario from `(pid, arrival, burst, priority)` tuples.
pub fn scenario(defs: &[(u32, u64, u64, u32)], quantum: u64) -> Scenario {
    scenario_with_cpu(defs, quantum, CpuConfig::default())
}

pub fn scenario_with_cpu(defs: &[(u32, u64, u64, u32)], quantum: u64, cpu: CpuConfig) -> Scenario {
    Scenario::builder()
        .processes(
            defs.iter()
                .map(|&(pid, arrival, burst, prio)| ProcessDef::new(pid, arrival, burst, prio)),
        )
        .quantum(quantum)
        .cpu(cpu)
        .build()
        .expect("test scenario should be valid")
}

/// Run a scenario that is known to be valid.
pub fn run(scenario: &Scenario) -> SimulationResult {
    let result = Simulator::run(scenario).expect("simulation should succeed");
    if std::env::var("RRSIM_DUMP_TRACE").ok().as_deref() == Some("1") {
        result.trace.dump();
    }
    result
}

/// Check every invariant that must hold after any valid run.
pub fn assert_invariants(scenario: &Scenario, result: &SimulationResult) {
    // Completion: every input process exactly once.
    assert_eq!(result.completed.len(), scenario.processes.len());
    let mut pids: Vec<_> = result.completed.iter().map(|p| p.pid).collect();
    pids.sort();
    let mut expected: Vec<_> = scenario.processes.iter().map(|p| p.pid).collect();
    expected.sort();
    assert_eq!(pids, expected, "pids dropped or duplicated");

    for p in &result.completed {
        let start = p.start_time().expect("completed process has a start time");
        let finish = p.finish_time().expect("completed process has a finish time");

        // Conservation.
        assert_eq!(p.executed_time(), p.burst_time, "{}: slices != burst", p.pid);
        assert_eq!(p.remaining_time(), 0);

        // Ordering of timestamps.
        assert!(p.arrival_time <= start, "{}: started before arrival", p.pid);
        assert!(start <= finish, "{}: finished before start", p.pid);

        let history = p.execution_history();
        assert_eq!(history.first().map(|s| s.start), Some(start));
        assert_eq!(history.last().map(|s| s.end), Some(finish));
        for pair in history.windows(2) {
            assert!(pair[0].end <= pair[1].start, "{}: overlapping slices", p.pid);
        }

        // Quantum bound.
        for slice in history {
            assert!(!slice.is_empty());
            assert!(
                slice.len() <= scenario.quantum,
                "{}: slice {slice:?} exceeds quantum {}",
                p.pid,
                scenario.quantum
            );
        }
        let (last, rest) = history.split_last().expect("non-empty history");
        for slice in rest {
            assert_eq!(slice.len(), scenario.quantum, "{}: short non-final slice", p.pid);
        }
        assert!(last.len() <= scenario.quantum);
    }

    // Completion order is by finish time.
    for pair in result.completed.windows(2) {
        assert!(pair[0].finish_time() <= pair[1].finish_time());
    }

    // One telemetry sample per decision, in time order.
    let cpu = &result.cpu;
    let summary = result.trace.summary();
    let decisions = summary.total_dispatches + summary.total_idle_ticks;
    assert_eq!(cpu.power_history.len(), decisions);
    assert_eq!(cpu.frequency_history.len(), decisions);
    assert_eq!(cpu.idle_time as usize, summary.total_idle_ticks);
    for history in [&cpu.power_history, &cpu.frequency_history] {
        for pair in history.windows(2) {
            assert!(pair[0].time <= pair[1].time, "telemetry out of order");
        }
    }

    // Slices on the CPU never overlap across processes.
    let mut slices: Vec<_> = result
        .completed
        .iter()
        .flat_map(|p| p.execution_history().iter().copied())
        .collect();
    slices.sort_by_key(|s| s.start);
    for pair in slices.windows(2) {
        assert!(pair[0].end <= pair[1].start, "CPU double-booked");
    }

    assert!(result.makespan() <= scenario.step_bound());
}
