//! Simulated CPU state and its power/frequency model.
//!
//! The CPU runs each slice at one of two configured frequencies, chosen by
//! the dispatched process's priority. Instantaneous power scales linearly
//! with frequency relative to `max_frequency`; an idle tick draws a fixed
//! fraction of `base_power` and is not charged to `power_consumption`.

use serde::Serialize;

use crate::error::InvalidInput;
use crate::process::Process;
use crate::types::{FrequencyTier, Sample, TimeUnits};

/// Fraction of `base_power` drawn while idle.
pub const IDLE_POWER_FRACTION: f64 = 0.1;

/// Static CPU parameters, fixed for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CpuConfig {
    /// Watts drawn at `max_frequency`.
    pub base_power: f64,
    /// Frequency used for priority-1 processes (GHz).
    pub max_frequency: f64,
    /// Frequency used for every other priority and while idle (GHz).
    pub min_frequency: f64,
}

impl Default for CpuConfig {
    fn default() -> Self {
        CpuConfig {
            base_power: 100.0,
            max_frequency: 3.0,
            min_frequency: 1.0,
        }
    }
}

impl CpuConfig {
    /// Create a CpuConfig with defaults overridden by environment variables.
    ///
    /// - `RRSIM_BASE_POWER` overrides `base_power`.
    /// - `RRSIM_MAX_FREQ` overrides `max_frequency`.
    /// - `RRSIM_MIN_FREQ` overrides `min_frequency`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let read = |var: &str, slot: &mut f64| {
            if let Ok(raw) = std::env::var(var) {
                match raw.parse::<f64>() {
                    Ok(v) => *slot = v,
                    Err(_) => tracing::warn!(var, value = raw.as_str(), "ignoring unparseable value"),
                }
            }
        };
        read("RRSIM_BASE_POWER", &mut config.base_power);
        read("RRSIM_MAX_FREQ", &mut config.max_frequency);
        read("RRSIM_MIN_FREQ", &mut config.min_frequency);
        config
    }

    /// Replace each parameter that has an explicit value.
    pub fn with_overrides(
        mut self,
        base_power: Option<f64>,
        max_frequency: Option<f64>,
        min_frequency: Option<f64>,
    ) -> Self {
        if let Some(v) = base_power {
            self.base_power = v;
        }
        if let Some(v) = max_frequency {
            self.max_frequency = v;
        }
        if let Some(v) = min_frequency {
            self.min_frequency = v;
        }
        self
    }

    /// Check `base_power > 0` and `0 < min_frequency <= max_frequency`.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if !(self.base_power.is_finite() && self.base_power > 0.0) {
            return Err(InvalidInput::InvalidCpuConfig(format!(
                "base power must be positive, got {}",
                self.base_power
            )));
        }
        if !(self.min_frequency.is_finite() && self.min_frequency > 0.0) {
            return Err(InvalidInput::InvalidCpuConfig(format!(
                "min frequency must be positive, got {}",
                self.min_frequency
            )));
        }
        if !(self.max_frequency.is_finite() && self.max_frequency > 0.0) {
            return Err(InvalidInput::InvalidCpuConfig(format!(
                "max frequency must be positive, got {}",
                self.max_frequency
            )));
        }
        if self.min_frequency > self.max_frequency {
            return Err(InvalidInput::InvalidCpuConfig(format!(
                "min frequency {} exceeds max frequency {}",
                self.min_frequency, self.max_frequency
            )));
        }
        Ok(())
    }

    pub fn frequency(&self, tier: FrequencyTier) -> f64 {
        match tier {
            FrequencyTier::Max => self.max_frequency,
            FrequencyTier::Min => self.min_frequency,
        }
    }

    /// Instantaneous power at `frequency`.
    pub fn power_at(&self, frequency: f64) -> f64 {
        self.base_power * (frequency / self.max_frequency)
    }

    pub fn idle_power(&self) -> f64 {
        self.base_power * IDLE_POWER_FRACTION
    }
}

/// A simulated CPU with its accumulated telemetry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimCpu {
    pub config: CpuConfig,
    /// Frequency of the most recent dispatch or idle tick.
    pub current_frequency: f64,
    /// Sum of `power * duration` over all dispatched slices.
    pub power_consumption: f64,
    /// Total idle ticks.
    pub idle_time: TimeUnits,
    /// One `(time, power)` sample per dispatch or idle tick.
    pub power_history: Vec<Sample>,
    /// One `(time, frequency)` sample per dispatch or idle tick.
    pub frequency_history: Vec<Sample>,
}

impl SimCpu {
    pub fn new(config: CpuConfig) -> Self {
        SimCpu {
            config,
            current_frequency: config.max_frequency,
            power_consumption: 0.0,
            idle_time: 0,
            power_history: Vec::new(),
            frequency_history: Vec::new(),
        }
    }

    /// Run `process` for `time_units` starting at `now`.
    pub fn execute(&mut self, process: &mut Process, time_units: TimeUnits, now: TimeUnits) {
        process.mark_started(now);

        self.current_frequency = self.config.frequency(process.priority.tier());
        self.frequency_history.push(Sample {
            time: now,
            value: self.current_frequency,
        });

        let power = self.config.power_at(self.current_frequency);
        self.power_consumption += power * time_units as f64;
        self.power_history.push(Sample {
            time: now,
            value: power,
        });

        let overshoot = process.consume(time_units, now);
        if process.remaining_time() == 0 {
            process.mark_finished(now + time_units - overshoot);
        }
    }

    /// Spend `time_units` idle starting at `now`.
    pub fn idle(&mut self, time_units: TimeUnits, now: TimeUnits) {
        self.idle_time += time_units;
        self.current_frequency = self.config.min_frequency;
        self.power_history.push(Sample {
            time: now,
            value: self.config.idle_power(),
        });
        self.frequency_history.push(Sample {
            time: now,
            value: self.config.min_frequency,
        });
    }

    /// Number of dispatches and idle ticks recorded so far.
    pub fn decisions(&self) -> usize {
        self.power_history.len()
    }
}
