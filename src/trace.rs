//! Trace event recording for the simulator.
//!
//! Every scheduling decision (admission, dispatch, requeue, completion,
//! idle tick) is recorded as a `TraceEvent` with its simulated timestamp.

use crate::types::{Pid, TimeUnits};

/// Summary counts over a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceSummary {
    pub total_events: usize,
    pub total_admissions: usize,
    pub total_dispatches: usize,
    pub total_requeues: usize,
    pub total_completions: usize,
    pub total_idle_ticks: usize,
}

impl std::fmt::Display for TraceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Trace Summary:")?;
        writeln!(f, "  total_events:      {}", self.total_events)?;
        writeln!(f, "  total_admissions:  {}", self.total_admissions)?;
        writeln!(f, "  total_dispatches:  {}", self.total_dispatches)?;
        writeln!(f, "  total_requeues:    {}", self.total_requeues)?;
        writeln!(f, "  total_completions: {}", self.total_completions)?;
        writeln!(f, "  total_idle_ticks:  {}", self.total_idle_ticks)
    }
}

/// A single trace event produced by the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEvent {
    /// Simulated time when this event occurred.
    pub time: TimeUnits,
    pub kind: TraceKind,
}

/// The type of scheduling event recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceKind {
    /// A process arrived and joined the back of the ready queue.
    Admitted { pid: Pid },
    /// A process was given the CPU for `slice` units.
    Dispatched {
        pid: Pid,
        slice: TimeUnits,
        frequency: f64,
        power: f64,
    },
    /// A process used its quantum and went back to the end of the queue.
    Requeued { pid: Pid, remaining: TimeUnits },
    /// A process finished its burst.
    Completed { pid: Pid },
    /// The ready queue was empty while arrivals were pending.
    Idle,
}

/// A complete simulation trace, containing all events in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, time: TimeUnits, kind: TraceKind) {
        self.events.push(TraceEvent { time, kind });
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// PIDs in the order they were dispatched, one entry per slice.
    pub fn dispatch_order(&self) -> Vec<Pid> {
        self.events
            .iter()
            .filter_map(|e| match e.kind {
                TraceKind::Dispatched { pid, .. } => Some(pid),
                _ => None,
            })
            .collect()
    }

    /// PIDs in the order they joined the ready queue on arrival.
    pub fn admission_order(&self) -> Vec<Pid> {
        self.events
            .iter()
            .filter_map(|e| match e.kind {
                TraceKind::Admitted { pid } => Some(pid),
                _ => None,
            })
            .collect()
    }

    /// Count the number of times a process was dispatched.
    pub fn dispatch_count(&self, pid: Pid) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Dispatched { pid: p, .. } if p == pid))
            .count()
    }

    /// Times at which the CPU idled.
    pub fn idle_times(&self) -> Vec<TimeUnits> {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Idle))
            .map(|e| e.time)
            .collect()
    }

    pub fn summary(&self) -> TraceSummary {
        let mut summary = TraceSummary {
            total_events: self.events.len(),
            ..Default::default()
        };
        for event in &self.events {
            match event.kind {
                TraceKind::Admitted { .. } => summary.total_admissions += 1,
                TraceKind::Dispatched { .. } => summary.total_dispatches += 1,
                TraceKind::Requeued { .. } => summary.total_requeues += 1,
                TraceKind::Completed { .. } => summary.total_completions += 1,
                TraceKind::Idle => summary.total_idle_ticks += 1,
            }
        }
        summary
    }

    /// Pretty-print the trace for debugging.
    pub fn dump(&self) {
        for event in &self.events {
            let desc = match &event.kind {
                TraceKind::Admitted { pid } => format!("ADMIT    pid={}", pid.0),
                TraceKind::Dispatched {
                    pid,
                    slice,
                    frequency,
                    power,
                } => format!(
                    "DISPATCH pid={} slice={slice} freq={frequency:.2} power={power:.2}",
                    pid.0
                ),
                TraceKind::Requeued { pid, remaining } => {
                    format!("REQUEUE  pid={} remaining={remaining}", pid.0)
                }
                TraceKind::Completed { pid } => format!("COMPLETE pid={}", pid.0),
                TraceKind::Idle => "IDLE".to_string(),
            };
            eprintln!("[{:>8}] {}", event.time, desc);
        }
    }
}
