//! Process model for the simulator.
//!
//! A [`ProcessDef`] is the caller-supplied description of a unit of work.
//! The engine turns each one into a [`Process`] that carries the mutable
//! scheduling state: remaining work, first-dispatch and completion times,
//! and the ordered list of execution slices.

use crate::types::{Pid, Priority, Slice, TimeUnits};

/// Definition of a process for scenario creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessDef {
    pub pid: Pid,
    /// When the process becomes eligible for the ready queue.
    pub arrival_time: TimeUnits,
    /// Total CPU time the process needs.
    pub burst_time: TimeUnits,
    pub priority: Priority,
}

impl ProcessDef {
    pub fn new(pid: u32, arrival_time: TimeUnits, burst_time: TimeUnits, priority: u32) -> Self {
        ProcessDef {
            pid: Pid(pid),
            arrival_time,
            burst_time,
            priority: Priority(priority),
        }
    }
}

/// A simulated process at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pub pid: Pid,
    pub arrival_time: TimeUnits,
    pub burst_time: TimeUnits,
    pub priority: Priority,
    remaining_time: TimeUnits,
    start_time: Option<TimeUnits>,
    finish_time: Option<TimeUnits>,
    execution_history: Vec<Slice>,
}

impl Process {
    pub fn new(def: &ProcessDef) -> Self {
        Process {
            pid: def.pid,
            arrival_time: def.arrival_time,
            burst_time: def.burst_time,
            priority: def.priority,
            remaining_time: def.burst_time,
            start_time: None,
            finish_time: None,
            execution_history: Vec::new(),
        }
    }

    /// CPU time still owed to this process.
    pub fn remaining_time(&self) -> TimeUnits {
        self.remaining_time
    }

    /// Time of the first dispatch, or `None` if never dispatched.
    pub fn start_time(&self) -> Option<TimeUnits> {
        self.start_time
    }

    /// Completion time, or `None` while work remains.
    pub fn finish_time(&self) -> Option<TimeUnits> {
        self.finish_time
    }

    /// Every slice this process ran, in dispatch order.
    pub fn execution_history(&self) -> &[Slice] {
        &self.execution_history
    }

    /// True until the first dispatch: full remaining work, no start time
    /// and no slices.
    pub fn is_fresh(&self) -> bool {
        self.remaining_time == self.burst_time
            && self.start_time.is_none()
            && self.finish_time.is_none()
            && self.execution_history.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.finish_time.is_some()
    }

    /// Sum of all slice lengths.
    pub fn executed_time(&self) -> TimeUnits {
        self.execution_history.iter().map(Slice::len).sum()
    }

    /// `finish - arrival`, once finished.
    pub fn turnaround(&self) -> Option<TimeUnits> {
        self.finish_time.map(|f| f - self.arrival_time)
    }

    /// `turnaround - burst`, once finished.
    pub fn waiting(&self) -> Option<TimeUnits> {
        self.turnaround().map(|t| t.saturating_sub(self.burst_time))
    }

    /// Record the first dispatch. Later calls leave the value untouched.
    pub(crate) fn mark_started(&mut self, now: TimeUnits) {
        if self.start_time.is_none() {
            self.start_time = Some(now);
        }
    }

    /// Charge `units` of CPU time starting at `now`.
    ///
    /// Returns the part of the slice that exceeded the remaining work, which
    /// is zero whenever the caller clamps the slice to `remaining_time`.
    pub(crate) fn consume(&mut self, units: TimeUnits, now: TimeUnits) -> TimeUnits {
        let overshoot = units.saturating_sub(self.remaining_time);
        self.remaining_time = self.remaining_time.saturating_sub(units);
        self.execution_history.push(Slice {
            start: now,
            end: now + units,
        });
        overshoot
    }

    /// Record completion. Later calls leave the value untouched.
    pub(crate) fn mark_finished(&mut self, at: TimeUnits) {
        if self.finish_time.is_none() {
            self.finish_time = Some(at);
        }
    }
}
