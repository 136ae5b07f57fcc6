//! Process-list exchange format.
//!
//! A workload file is a JSON array of records:
//!
//! ```json
//! [
//!   { "pid": 1, "arrival": 0, "burst": 5, "priority": 1 },
//!   { "pid": 2, "arrival": 1, "burst": 3, "priority": 2 }
//! ]
//! ```
//!
//! Values are read as signed integers so that negative or zero fields are
//! reported with the offending record instead of as a JSON type error.
//! Unknown keys are ignored. Record order is preserved; it is the
//! admission tie-break for processes arriving at the same time.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InvalidInput;
use crate::process::ProcessDef;
use crate::types::{Pid, Priority};

/// Errors from reading or writing workload files.
#[derive(Debug)]
pub enum WorkloadError {
    /// JSON parse or encode error.
    Json(serde_json::Error),
    /// File could not be read or written.
    Io(io::Error),
    /// A record has an out-of-range field.
    InvalidValue { index: usize, source: InvalidInput },
    /// A value does not fit the signed exchange format.
    OutOfRange { pid: Pid, field: &'static str },
    /// There are no records to read or write.
    Empty,
}

impl std::fmt::Display for WorkloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkloadError::Json(e) => write!(f, "JSON error: {e}"),
            WorkloadError::Io(e) => write!(f, "I/O error: {e}"),
            WorkloadError::InvalidValue { index, source } => {
                write!(f, "record {index}: {source}")
            }
            WorkloadError::OutOfRange { pid, field } => {
                write!(f, "{pid}: {field} does not fit in a signed 64-bit integer")
            }
            WorkloadError::Empty => write!(f, "no processes"),
        }
    }
}

impl std::error::Error for WorkloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkloadError::Json(e) => Some(e),
            WorkloadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WorkloadError {
    fn from(e: serde_json::Error) -> Self {
        WorkloadError::Json(e)
    }
}

impl From<io::Error> for WorkloadError {
    fn from(e: io::Error) -> Self {
        WorkloadError::Io(e)
    }
}

/// One record of the exchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: i64,
    pub arrival: i64,
    pub burst: i64,
    pub priority: i64,
}

impl ProcessRecord {
    /// Range-check the record and convert it.
    pub fn to_def(&self) -> Result<ProcessDef, InvalidInput> {
        let pid = u32::try_from(self.pid)
            .ok()
            .filter(|&p| p > 0)
            .ok_or(InvalidInput::InvalidPid(self.pid))?;
        let pid = Pid(pid);
        let arrival_time = u64::try_from(self.arrival).map_err(|_| InvalidInput::InvalidArrival {
            pid,
            arrival: self.arrival,
        })?;
        let burst_time = u64::try_from(self.burst)
            .ok()
            .filter(|&b| b > 0)
            .ok_or(InvalidInput::InvalidBurst {
                pid,
                burst: self.burst,
            })?;
        let priority = u32::try_from(self.priority)
            .ok()
            .filter(|&p| p > 0)
            .ok_or(InvalidInput::InvalidPriority {
                pid,
                priority: self.priority,
            })?;
        Ok(ProcessDef {
            pid,
            arrival_time,
            burst_time,
            priority: Priority(priority),
        })
    }
}

impl TryFrom<&ProcessDef> for ProcessRecord {
    type Error = WorkloadError;

    fn try_from(def: &ProcessDef) -> Result<Self, Self::Error> {
        let signed = |value: u64, field: &'static str| {
            i64::try_from(value).map_err(|_| WorkloadError::OutOfRange {
                pid: def.pid,
                field,
            })
        };
        Ok(ProcessRecord {
            pid: i64::from(def.pid.0),
            arrival: signed(def.arrival_time, "arrival")?,
            burst: signed(def.burst_time, "burst")?,
            priority: i64::from(def.priority.0),
        })
    }
}

/// Parse a workload from JSON text.
///
/// Checks each record's ranges and rejects duplicate PIDs, but leaves
/// scenario-level checks (quantum, CPU) to [`crate::Scenario::validate`].
pub fn load_processes(json: &str) -> Result<Vec<ProcessDef>, WorkloadError> {
    let records: Vec<ProcessRecord> = serde_json::from_str(json)?;
    let mut defs: Vec<ProcessDef> = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let def = record
            .to_def()
            .map_err(|source| WorkloadError::InvalidValue { index, source })?;
        if defs.iter().any(|d| d.pid == def.pid) {
            return Err(WorkloadError::InvalidValue {
                index,
                source: InvalidInput::DuplicatePid(def.pid),
            });
        }
        defs.push(def);
    }
    debug!(processes = defs.len(), "loaded workload");
    Ok(defs)
}

/// Read and parse a workload file.
pub fn load_processes_file(path: &Path) -> Result<Vec<ProcessDef>, WorkloadError> {
    let json = std::fs::read_to_string(path)?;
    load_processes(&json)
}

/// Encode processes as a pretty-printed JSON array (2-space indent).
pub fn export_processes(defs: &[ProcessDef]) -> Result<String, WorkloadError> {
    if defs.is_empty() {
        return Err(WorkloadError::Empty);
    }
    let records = defs
        .iter()
        .map(ProcessRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Encode processes and write them to `path`.
pub fn export_processes_file(defs: &[ProcessDef], path: &Path) -> Result<(), WorkloadError> {
    let json = export_processes(defs)?;
    std::fs::write(path, json)?;
    Ok(())
}
