//! rr_energy_sim - Deterministic round-robin scheduling simulator with a
//! priority-driven CPU power model.
//!
//! Processes with arrival, burst and priority attributes are run through a
//! fixed-quantum round-robin scheduler on a single simulated CPU. The CPU
//! runs priority-1 work at its maximum frequency and everything else at its
//! minimum frequency, and records power and frequency samples for every
//! scheduling decision.
//!
//! # Architecture
//!
//! - **Scenario**: validated bundle of processes, quantum and CPU parameters
//! - **Engine**: discrete-event round-robin loop
//! - **CPU**: power/frequency model and telemetry
//! - **Stats**: turnaround, waiting and energy metrics
//! - **Workload**: JSON process-list exchange format
//!
//! # Usage
//!
//! ```rust
//! use rr_energy_sim::*;
//!
//! let scenario = Scenario::builder()
//!     .quantum(2)
//!     .add_process(0, 4, 1)
//!     .add_process(0, 4, 2)
//!     .build()
//!     .unwrap();
//!
//! let result = Simulator::run(&scenario).unwrap();
//! let metrics = result.metrics().unwrap();
//! assert_eq!(metrics.makespan, 8);
//! ```

pub mod cpu;
pub mod engine;
pub mod error;
pub mod fmt;
mod perfetto;
pub mod process;
pub mod scenario;
pub mod stats;
pub mod trace;
pub mod types;
pub mod workload;

// Re-export the main public types for convenience.
pub use cpu::{CpuConfig, SimCpu, IDLE_POWER_FRACTION};
pub use engine::{round_robin, sim_clock, SimulationResult, Simulator};
pub use error::{InvalidInput, SimError};
pub use fmt::{FmtTs, SimFormat};
pub use process::{Process, ProcessDef};
pub use scenario::{demo_scenario, Scenario, ScenarioBuilder, DEFAULT_QUANTUM};
pub use stats::{Metrics, ProcessStats};
pub use trace::{Trace, TraceEvent, TraceKind, TraceSummary};
pub use types::{FrequencyTier, Pid, Priority, Sample, Slice, TimeUnits};
pub use workload::{export_processes, load_processes, ProcessRecord, WorkloadError};
