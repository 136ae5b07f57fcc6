//! Derived scheduling and energy metrics.
//!
//! Pure functions over the engine's output. Nothing here mutates a process
//! or the CPU.
//!
//! # Metrics Computed
//!
//! - **Turnaround**: `finish - arrival` per process, and its mean
//! - **Waiting**: `turnaround - burst` per process, and its mean
//! - **Energy savings**: consumption relative to running every burst unit
//!   at `base_power`
//! - **Utilization**: busy time over makespan

use serde::Serialize;

use crate::cpu::SimCpu;
use crate::error::SimError;
use crate::process::Process;
use crate::types::{Pid, TimeUnits};

/// Per-process timing results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    pub pid: Pid,
    pub arrival: TimeUnits,
    pub burst: TimeUnits,
    pub start: TimeUnits,
    pub finish: TimeUnits,
    pub turnaround: TimeUnits,
    pub waiting: TimeUnits,
    /// Number of slices the process was dispatched for.
    pub dispatches: usize,
}

impl ProcessStats {
    /// Timing for one process, or `None` if it never finished.
    pub fn from_process(p: &Process) -> Option<Self> {
        let start = p.start_time()?;
        let finish = p.finish_time()?;
        let turnaround = finish - p.arrival_time;
        Some(ProcessStats {
            pid: p.pid,
            arrival: p.arrival_time,
            burst: p.burst_time,
            start,
            finish,
            turnaround,
            waiting: turnaround.saturating_sub(p.burst_time),
            dispatches: p.execution_history().len(),
        })
    }
}

/// Aggregate metrics for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    /// Cumulative `power * duration` over dispatched slices.
    pub total_power: f64,
    pub idle_time: TimeUnits,
    /// `sum(burst) * base_power`: every unit of work at max frequency.
    pub baseline_power: f64,
    pub energy_savings_percent: f64,
    pub makespan: TimeUnits,
    pub cpu_utilization_percent: f64,
    /// Per-process rows, in completion order.
    pub processes: Vec<ProcessStats>,
}

impl Metrics {
    /// Compute metrics from completed processes and the CPU that ran them.
    ///
    /// Fails with `DivisionUndefined` when `completed` is empty. Processes
    /// without a finish time are left out of the averages.
    pub fn compute(completed: &[Process], cpu: &SimCpu) -> Result<Self, SimError> {
        let processes: Vec<ProcessStats> =
            completed.iter().filter_map(ProcessStats::from_process).collect();
        if processes.is_empty() {
            return Err(SimError::DivisionUndefined);
        }

        let n = processes.len() as f64;
        let total_turnaround: TimeUnits = processes.iter().map(|p| p.turnaround).sum();
        let total_waiting: TimeUnits = processes.iter().map(|p| p.waiting).sum();
        let total_burst: TimeUnits = processes.iter().map(|p| p.burst).sum();
        let makespan = processes.iter().map(|p| p.finish).max().unwrap_or(0);

        Ok(Metrics {
            avg_turnaround: total_turnaround as f64 / n,
            avg_waiting: total_waiting as f64 / n,
            total_power: cpu.power_consumption,
            idle_time: cpu.idle_time,
            baseline_power: baseline_power(total_burst, cpu.config.base_power),
            energy_savings_percent: energy_savings_percent(
                total_burst,
                cpu.config.base_power,
                cpu.power_consumption,
            ),
            makespan,
            cpu_utilization_percent: if makespan == 0 {
                0.0
            } else {
                100.0 * total_burst as f64 / makespan as f64
            },
            processes,
        })
    }
}

pub fn baseline_power(total_burst: TimeUnits, base_power: f64) -> f64 {
    total_burst as f64 * base_power
}

/// `(baseline - consumed) / baseline * 100`.
pub fn energy_savings_percent(total_burst: TimeUnits, base_power: f64, consumed: f64) -> f64 {
    let baseline = baseline_power(total_burst, base_power);
    if baseline == 0.0 {
        return 0.0;
    }
    (baseline - consumed) / baseline * 100.0
}

impl std::fmt::Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:>6} {:>8} {:>8} {:>8} {:>8} {:>10} {:>8}",
            "PID", "ARRIVAL", "BURST", "START", "FINISH", "TURNAROUND", "WAITING"
        )?;
        for p in &self.processes {
            writeln!(
                f,
                "{:>6} {:>8} {:>8} {:>8} {:>8} {:>10} {:>8}",
                p.pid.0, p.arrival, p.burst, p.start, p.finish, p.turnaround, p.waiting
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Average Turnaround Time: {:.2}", self.avg_turnaround)?;
        writeln!(f, "Average Waiting Time:    {:.2}", self.avg_waiting)?;
        writeln!(f, "Total Power:             {:.2} J", self.total_power)?;
        writeln!(f, "Idle Time:               {} units", self.idle_time)?;
        writeln!(f, "Energy Saved:            {:.1}%", self.energy_savings_percent)?;
        writeln!(f, "Makespan:                {}", self.makespan)?;
        writeln!(
            f,
            "CPU Utilization:         {:.1}%",
            self.cpu_utilization_percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::CpuConfig;
    use crate::process::ProcessDef;

    #[test]
    fn empty_input_is_division_undefined() {
        let cpu = SimCpu::new(CpuConfig::default());
        assert_eq!(Metrics::compute(&[], &cpu), Err(SimError::DivisionUndefined));
    }

    #[test]
    fn unfinished_processes_are_skipped() {
        let cpu = SimCpu::new(CpuConfig::default());
        let p = Process::new(&ProcessDef::new(1, 0, 3, 1));
        assert_eq!(ProcessStats::from_process(&p), None);
        assert_eq!(Metrics::compute(&[p], &cpu), Err(SimError::DivisionUndefined));
    }

    #[test]
    fn averages_and_savings() {
        let mut cpu = SimCpu::new(CpuConfig::default());
        let mut a = Process::new(&ProcessDef::new(1, 0, 2, 1));
        let mut b = Process::new(&ProcessDef::new(2, 0, 2, 2));
        cpu.execute(&mut a, 2, 0);
        cpu.execute(&mut b, 2, 2);

        let m = Metrics::compute(&[a, b], &cpu).unwrap();
        // Turnarounds 2 and 4, waits 0 and 2.
        assert_eq!(m.avg_turnaround, 3.0);
        assert_eq!(m.avg_waiting, 1.0);
        assert_eq!(m.baseline_power, 400.0);
        assert_eq!(m.makespan, 4);
        assert_eq!(m.cpu_utilization_percent, 100.0);
        assert!((m.total_power - (200.0 + 200.0 / 3.0)).abs() < 1e-9);
        let expected = (400.0 - m.total_power) / 400.0 * 100.0;
        assert!((m.energy_savings_percent - expected).abs() < 1e-9);
    }

    #[test]
    fn savings_with_zero_baseline_is_zero() {
        assert_eq!(energy_savings_percent(0, 100.0, 0.0), 0.0);
        assert_eq!(energy_savings_percent(10, 10.0, 50.0), 50.0);
    }
}
