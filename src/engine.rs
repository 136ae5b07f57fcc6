//! Discrete-event round-robin scheduling engine.
//!
//! This is the core of the simulator. It keeps a FIFO ready queue and a
//! pool of processes that have not arrived yet, advances a single logical
//! clock, and drives the CPU through `execute` and `idle` calls.
//!
//! Each step:
//! 1. Every pooled process with `arrival_time <= now` joins the back of the
//!    ready queue, scanned in input order. Same-time arrivals therefore keep
//!    their input order; nothing is re-sorted by PID or burst.
//! 2. If the queue is non-empty, its head runs for
//!    `min(quantum, remaining)` and the clock advances by that much.
//!    Unfinished work goes back to the end of the queue before the next
//!    admission scan, so a process that arrives exactly when another one is
//!    requeued lines up behind it.
//! 3. Otherwise the CPU idles for one unit.
//!
//! The loop ends once both the queue and the pool are empty.

use std::cell::Cell;
use std::collections::VecDeque;

use tracing::{debug, info};

use crate::cpu::SimCpu;
use crate::error::{InvalidInput, SimError};
use crate::process::{Process, ProcessDef};
use crate::scenario::{self, Scenario};
use crate::stats::Metrics;
use crate::trace::{Trace, TraceKind};
use crate::types::{Pid, TimeUnits};

thread_local! {
    static SIM_CLOCK: Cell<TimeUnits> = const { Cell::new(0) };
}

/// Simulated time of the run in progress on this thread.
///
/// Used by the log formatter; reads the final time after a run ends.
pub fn sim_clock() -> TimeUnits {
    SIM_CLOCK.with(|c| c.get())
}

fn set_sim_clock(now: TimeUnits) {
    SIM_CLOCK.with(|c| c.set(now));
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Processes in completion order.
    pub completed: Vec<Process>,
    /// The CPU with its accumulated telemetry.
    pub cpu: SimCpu,
    pub trace: Trace,
    pub quantum: TimeUnits,
}

impl SimulationResult {
    /// Look up a completed process by PID.
    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.completed.iter().find(|p| p.pid == pid)
    }

    /// PIDs in completion order.
    pub fn completion_order(&self) -> Vec<Pid> {
        self.completed.iter().map(|p| p.pid).collect()
    }

    /// Time at which the last process finished.
    pub fn makespan(&self) -> TimeUnits {
        self.completed
            .iter()
            .filter_map(Process::finish_time)
            .max()
            .unwrap_or(0)
    }

    pub fn metrics(&self) -> Result<Metrics, SimError> {
        Metrics::compute(&self.completed, &self.cpu)
    }
}

/// The main simulator.
pub struct Simulator;

impl Simulator {
    /// Validate and run a scenario on a fresh CPU.
    pub fn run(scenario: &Scenario) -> Result<SimulationResult, SimError> {
        scenario.validate()?;

        let mut cpu = SimCpu::new(scenario.cpu);
        let mut trace = Trace::new();
        let processes = scenario.processes.iter().map(Process::new).collect();
        let completed = schedule(processes, scenario.quantum, &mut cpu, &mut trace);

        Ok(SimulationResult {
            completed,
            cpu,
            trace,
            quantum: scenario.quantum,
        })
    }
}

/// Run `processes` to completion under round robin with `quantum`.
///
/// Returns the processes in completion order and leaves the accumulated
/// telemetry in `cpu`. Fails with `InvalidInput` before executing anything
/// if the list is empty, the quantum is zero, a process is malformed or
/// has already run, or the CPU configuration is invalid.
pub fn round_robin(
    processes: Vec<Process>,
    quantum: TimeUnits,
    cpu: &mut SimCpu,
) -> Result<Vec<Process>, SimError> {
    let defs: Vec<ProcessDef> = processes
        .iter()
        .map(|p| ProcessDef {
            pid: p.pid,
            arrival_time: p.arrival_time,
            burst_time: p.burst_time,
            priority: p.priority,
        })
        .collect();
    scenario::validate(&defs, quantum, &cpu.config)?;
    if let Some(p) = processes.iter().find(|p| !p.is_fresh()) {
        return Err(InvalidInput::AlreadyDispatched(p.pid).into());
    }

    let mut trace = Trace::new();
    Ok(schedule(processes, quantum, cpu, &mut trace))
}

fn schedule(
    processes: Vec<Process>,
    quantum: TimeUnits,
    cpu: &mut SimCpu,
    trace: &mut Trace,
) -> Vec<Process> {
    let nr_processes = processes.len();
    let bound: TimeUnits = processes
        .iter()
        .map(|p| p.remaining_time())
        .sum::<TimeUnits>()
        + processes.iter().map(|p| p.arrival_time).max().unwrap_or(0);

    let mut pending = processes;
    let mut ready: VecDeque<Process> = VecDeque::with_capacity(nr_processes);
    let mut completed = Vec::with_capacity(nr_processes);
    let mut now: TimeUnits = 0;

    set_sim_clock(now);
    info!(processes = nr_processes, quantum, "starting round robin");

    while !pending.is_empty() || !ready.is_empty() {
        set_sim_clock(now);
        admit(&mut pending, &mut ready, now, trace);

        let Some(mut head) = ready.pop_front() else {
            cpu.idle(1, now);
            trace.record(now, TraceKind::Idle);
            debug!(pending = pending.len(), "idle");
            now += 1;
            continue;
        };

        let slice = quantum.min(head.remaining_time());
        cpu.execute(&mut head, slice, now);
        let power = cpu.power_history.last().map_or(0.0, |s| s.value);
        trace.record(
            now,
            TraceKind::Dispatched {
                pid: head.pid,
                slice,
                frequency: cpu.current_frequency,
                power,
            },
        );
        debug!(
            pid = head.pid.0,
            slice,
            frequency = cpu.current_frequency,
            power,
            "dispatch"
        );
        now += slice;
        set_sim_clock(now);

        if head.remaining_time() > 0 {
            trace.record(
                now,
                TraceKind::Requeued {
                    pid: head.pid,
                    remaining: head.remaining_time(),
                },
            );
            debug!(pid = head.pid.0, remaining = head.remaining_time(), "requeue");
            ready.push_back(head);
        } else {
            trace.record(now, TraceKind::Completed { pid: head.pid });
            debug!(pid = head.pid.0, "complete");
            completed.push(head);
        }
    }

    debug_assert!(now <= bound, "clock {now} passed step bound {bound}");
    debug_assert_eq!(completed.len(), nr_processes);

    info!(
        completed = completed.len(),
        idle_time = cpu.idle_time,
        power = cpu.power_consumption,
        "round robin finished"
    );
    completed
}

/// Move every arrived process from `pending` to the back of `ready`,
/// keeping input order among them and among those still pending.
fn admit(
    pending: &mut Vec<Process>,
    ready: &mut VecDeque<Process>,
    now: TimeUnits,
    trace: &mut Trace,
) {
    if pending.iter().all(|p| p.arrival_time > now) {
        return;
    }
    let (arrived, waiting): (Vec<Process>, Vec<Process>) = std::mem::take(pending)
        .into_iter()
        .partition(|p| p.arrival_time <= now);
    *pending = waiting;
    for p in arrived {
        trace.record(now, TraceKind::Admitted { pid: p.pid });
        debug!(pid = p.pid.0, arrival = p.arrival_time, "admit");
        ready.push_back(p);
    }
}
