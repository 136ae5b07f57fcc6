//! Chrome Trace Event Format (JSON) export for Perfetto.
//!
//! Writes a finished run as a JSON file loadable in
//! [ui.perfetto.dev](https://ui.perfetto.dev). The CPU is a single Perfetto
//! process with one thread per simulated process showing its execution
//! slices, an "idle" thread with instant markers, and two counter tracks
//! for instantaneous power and frequency. One time unit is shown as one
//! microsecond.

use std::io::Write;

use serde_json::json;

use crate::engine::SimulationResult;
use crate::trace::TraceKind;

const CPU_PID: u32 = 0;
const IDLE_TID: u32 = 0;

/// Write the run as Chrome Trace Event Format JSON.
///
/// Stream-writes events one at a time (no intermediate `Vec<Value>`).
pub(crate) fn write_json(result: &SimulationResult, writer: &mut impl Write) -> std::io::Result<()> {
    writer.write_all(b"{\"traceEvents\":[")?;

    let mut need_comma = false;

    write_comma(writer, &mut need_comma)?;
    serde_json::to_writer(
        &mut *writer,
        &json!({
            "ph": "M",
            "pid": CPU_PID,
            "tid": 0,
            "name": "process_name",
            "args": { "name": "CPU" }
        }),
    )?;

    write_comma(writer, &mut need_comma)?;
    serde_json::to_writer(
        &mut *writer,
        &json!({
            "ph": "M",
            "pid": CPU_PID,
            "tid": IDLE_TID,
            "name": "thread_name",
            "args": { "name": "idle" }
        }),
    )?;

    for p in &result.completed {
        write_comma(writer, &mut need_comma)?;
        serde_json::to_writer(
            &mut *writer,
            &json!({
                "ph": "M",
                "pid": CPU_PID,
                "tid": p.pid.0,
                "name": "thread_name",
                "args": { "name": p.pid.to_string() }
            }),
        )?;
    }

    for event in result.trace.events() {
        let value = match &event.kind {
            TraceKind::Dispatched {
                pid,
                slice,
                frequency,
                power,
            } => json!({
                "ph": "X",
                "pid": CPU_PID,
                "tid": pid.0,
                "ts": event.time,
                "dur": slice,
                "name": pid.to_string(),
                "cat": "sched",
                "args": { "frequency": frequency, "power": power }
            }),
            TraceKind::Idle => json!({
                "ph": "i",
                "pid": CPU_PID,
                "tid": IDLE_TID,
                "ts": event.time,
                "name": "idle",
                "s": "t"
            }),
            TraceKind::Completed { pid } => json!({
                "ph": "i",
                "pid": CPU_PID,
                "tid": pid.0,
                "ts": event.time,
                "name": "complete",
                "s": "t"
            }),
            TraceKind::Admitted { .. } | TraceKind::Requeued { .. } => continue,
        };
        write_comma(writer, &mut need_comma)?;
        serde_json::to_writer(&mut *writer, &value)?;
    }

    for sample in &result.cpu.power_history {
        write_comma(writer, &mut need_comma)?;
        serde_json::to_writer(
            &mut *writer,
            &json!({
                "ph": "C",
                "pid": CPU_PID,
                "ts": sample.time,
                "name": "power",
                "args": { "watts": sample.value }
            }),
        )?;
    }

    for sample in &result.cpu.frequency_history {
        write_comma(writer, &mut need_comma)?;
        serde_json::to_writer(
            &mut *writer,
            &json!({
                "ph": "C",
                "pid": CPU_PID,
                "ts": sample.time,
                "name": "frequency",
                "args": { "ghz": sample.value }
            }),
        )?;
    }

    writer.write_all(b"]}")?;
    Ok(())
}

/// Write a comma separator if this is not the first entry.
fn write_comma(writer: &mut impl Write, need_comma: &mut bool) -> std::io::Result<()> {
    if *need_comma {
        writer.write_all(b",")?;
    }
    *need_comma = true;
    Ok(())
}

impl SimulationResult {
    /// Export the run for Perfetto. See the module docs for the layout.
    pub fn write_perfetto_json(&self, writer: &mut impl Write) -> std::io::Result<()> {
        write_json(self, writer)
    }
}
