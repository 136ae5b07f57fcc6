//! Scenario definition and builder API.

use std::collections::HashSet;

use crate::cpu::CpuConfig;
use crate::error::InvalidInput;
use crate::process::ProcessDef;
use crate::types::{Pid, Priority, TimeUnits};

/// Quantum used by the builder when none is given.
pub const DEFAULT_QUANTUM: TimeUnits = 3;

/// A complete simulation scenario: processes, quantum and CPU parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Processes in input order. Input order is the admission tie-break.
    pub processes: Vec<ProcessDef>,
    pub quantum: TimeUnits,
    pub cpu: CpuConfig,
}

/// Builder for constructing scenarios.
pub struct ScenarioBuilder {
    processes: Vec<ProcessDef>,
    quantum: TimeUnits,
    cpu: CpuConfig,
    next_pid: Pid,
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder {
            processes: Vec::new(),
            quantum: DEFAULT_QUANTUM,
            cpu: CpuConfig::default(),
            next_pid: Pid(1),
        }
    }

    /// Check every precondition of the engine.
    ///
    /// Rejects an empty process list, a zero quantum, zero PIDs, zero
    /// bursts, zero priorities, duplicate PIDs and malformed CPU
    /// parameters. Runs before any process is dispatched.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        validate(&self.processes, self.quantum, &self.cpu)
    }

    /// Sum of all burst times.
    pub fn total_burst(&self) -> TimeUnits {
        self.processes.iter().map(|p| p.burst_time).sum()
    }

    /// Upper bound on simulated time steps: total work plus the longest
    /// idle prefix.
    pub fn step_bound(&self) -> TimeUnits {
        let max_arrival = self
            .processes
            .iter()
            .map(|p| p.arrival_time)
            .max()
            .unwrap_or(0);
        self.total_burst() + max_arrival
    }
}

pub(crate) fn validate(
    processes: &[ProcessDef],
    quantum: TimeUnits,
    cpu: &CpuConfig,
) -> Result<(), InvalidInput> {
    if processes.is_empty() {
        return Err(InvalidInput::EmptyProcessList);
    }
    if quantum == 0 {
        return Err(InvalidInput::NonPositiveQuantum(0));
    }
    cpu.validate()?;

    let mut seen = HashSet::with_capacity(processes.len());
    for def in processes {
        if def.pid.0 == 0 {
            return Err(InvalidInput::InvalidPid(0));
        }
        if def.burst_time == 0 {
            return Err(InvalidInput::InvalidBurst {
                pid: def.pid,
                burst: 0,
            });
        }
        if def.priority.0 == 0 {
            return Err(InvalidInput::InvalidPriority {
                pid: def.pid,
                priority: 0,
            });
        }
        if !seen.insert(def.pid) {
            return Err(InvalidInput::DuplicatePid(def.pid));
        }
    }
    Ok(())
}

impl ScenarioBuilder {
    /// Set the round-robin time quantum.
    pub fn quantum(mut self, quantum: TimeUnits) -> Self {
        self.quantum = quantum;
        self
    }

    /// Set the CPU parameters.
    pub fn cpu(mut self, cpu: CpuConfig) -> Self {
        self.cpu = cpu;
        self
    }

    /// Add a process with a full ProcessDef.
    pub fn process(mut self, def: ProcessDef) -> Self {
        self.next_pid = Pid(self.next_pid.0.max(def.pid.0.saturating_add(1)));
        self.processes.push(def);
        self
    }

    /// Add several processes, keeping their order.
    pub fn processes(self, defs: impl IntoIterator<Item = ProcessDef>) -> Self {
        defs.into_iter().fold(self, |b, def| b.process(def))
    }

    /// Convenience: add a process with an auto-assigned PID.
    pub fn add_process(self, arrival_time: TimeUnits, burst_time: TimeUnits, priority: u32) -> Self {
        let pid = self.next_pid;
        self.process(ProcessDef {
            pid,
            arrival_time,
            burst_time,
            priority: Priority(priority),
        })
    }

    /// Build and validate the scenario.
    pub fn build(self) -> Result<Scenario, InvalidInput> {
        let scenario = Scenario {
            processes: self.processes,
            quantum: self.quantum,
            cpu: self.cpu,
        };
        scenario.validate()?;
        Ok(scenario)
    }
}

/// The workload the command-line tool runs when no file is given.
pub fn demo_scenario() -> Scenario {
    Scenario {
        processes: vec![
            ProcessDef::new(1, 0, 100, 1),
            ProcessDef::new(2, 1, 5, 2),
            ProcessDef::new(3, 2, 8, 1),
            ProcessDef::new(4, 3, 2, 2),
        ],
        quantum: DEFAULT_QUANTUM,
        cpu: CpuConfig::default(),
    }
}
