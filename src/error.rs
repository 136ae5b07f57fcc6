//! Error types for scenario validation and metrics derivation.

use std::fmt;

use crate::types::Pid;

/// Why a scenario was rejected before the simulation started.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidInput {
    /// No processes to schedule.
    EmptyProcessList,
    /// The quantum must be at least one time unit.
    NonPositiveQuantum(i64),
    /// PIDs must be positive.
    InvalidPid(i64),
    /// Burst time must be positive.
    InvalidBurst { pid: Pid, burst: i64 },
    /// Arrival time must not be negative.
    InvalidArrival { pid: Pid, arrival: i64 },
    /// Priority must be positive.
    InvalidPriority { pid: Pid, priority: i64 },
    /// Two processes share a PID.
    DuplicatePid(Pid),
    /// A process handed to the engine has already been dispatched.
    AlreadyDispatched(Pid),
    /// CPU configuration is malformed.
    InvalidCpuConfig(String),
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInput::EmptyProcessList => write!(f, "process list is empty"),
            InvalidInput::NonPositiveQuantum(q) => {
                write!(f, "time quantum must be positive, got {q}")
            }
            InvalidInput::InvalidPid(pid) => write!(f, "pid must be positive, got {pid}"),
            InvalidInput::InvalidBurst { pid, burst } => {
                write!(f, "{pid}: burst time must be positive, got {burst}")
            }
            InvalidInput::InvalidArrival { pid, arrival } => {
                write!(f, "{pid}: arrival time must not be negative, got {arrival}")
            }
            InvalidInput::InvalidPriority { pid, priority } => {
                write!(f, "{pid}: priority must be positive, got {priority}")
            }
            InvalidInput::DuplicatePid(pid) => write!(f, "pid {} already exists", pid.0),
            InvalidInput::AlreadyDispatched(pid) => {
                write!(f, "{pid}: already dispatched, expected a fresh process")
            }
            InvalidInput::InvalidCpuConfig(msg) => write!(f, "invalid CPU configuration: {msg}"),
        }
    }
}

impl std::error::Error for InvalidInput {}

/// Errors from the simulator library.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// The scenario failed validation; nothing was executed.
    InvalidInput(InvalidInput),
    /// An average was requested over zero processes.
    DivisionUndefined,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidInput(e) => write!(f, "invalid input: {e}"),
            SimError::DivisionUndefined => {
                write!(f, "cannot average metrics over zero completed processes")
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::InvalidInput(e) => Some(e),
            SimError::DivisionUndefined => None,
        }
    }
}

impl From<InvalidInput> for SimError {
    fn from(e: InvalidInput) -> Self {
        SimError::InvalidInput(e)
    }
}
