//! rrsim: run round-robin energy simulations from JSON process lists.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use rr_energy_sim::workload::{export_processes_file, load_processes_file};
use rr_energy_sim::{
    demo_scenario, CpuConfig, InvalidInput, Scenario, SimFormat, Simulator, DEFAULT_QUANTUM,
};

/// Run round-robin energy simulations from JSON process lists.
#[derive(Parser)]
#[command(name = "rrsim")]
struct Cli {
    /// Path to a JSON process list (`[{"pid", "arrival", "burst", "priority"}, ...]`).
    ///
    /// Runs a built-in four-process demo workload when omitted.
    workload: Option<PathBuf>,

    /// Round-robin time quantum.
    #[arg(short, long, env = "RRSIM_QUANTUM", default_value_t = DEFAULT_QUANTUM as i64)]
    quantum: i64,

    /// Power drawn at max frequency (watts).
    ///
    /// CPU parameters fall back to RRSIM_BASE_POWER, RRSIM_MAX_FREQ and
    /// RRSIM_MIN_FREQ, then to 100 W, 3.0 GHz and 1.0 GHz.
    #[arg(long)]
    base_power: Option<f64>,

    /// Frequency for priority-1 processes (GHz).
    #[arg(long)]
    max_freq: Option<f64>,

    /// Frequency for all other priorities and idle ticks (GHz).
    #[arg(long)]
    min_freq: Option<f64>,

    /// Print trace events to stderr.
    #[arg(long)]
    dump_trace: bool,

    /// Write Perfetto trace JSON to file.
    #[arg(long, value_name = "PATH")]
    perfetto: Option<PathBuf>,

    /// Write the validated process list back out in exchange format.
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Print metrics as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let scenario = build_scenario(cli)?;

    if let Some(path) = &cli.export {
        export_processes_file(&scenario.processes, path)
            .with_context(|| format!("failed to export {}", path.display()))?;
        info!(path = %path.display(), "exported process list");
    }

    let result = Simulator::run(&scenario)?;

    if cli.dump_trace {
        result.trace.dump();
    }

    if let Some(path) = &cli.perfetto {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        result
            .write_perfetto_json(&mut file)
            .context("failed to write perfetto trace")?;
        eprintln!("wrote perfetto trace to {}", path.display());
    }

    let metrics = result.metrics()?;
    info!(
        avg_turnaround = metrics.avg_turnaround,
        avg_waiting = metrics.avg_waiting,
        total_power = metrics.total_power,
        idle_time = metrics.idle_time,
        "simulation complete"
    );
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        print!("{metrics}");
    }
    Ok(())
}

fn build_scenario(cli: &Cli) -> Result<Scenario> {
    if cli.quantum <= 0 {
        bail!(InvalidInput::NonPositiveQuantum(cli.quantum));
    }

    let cpu = CpuConfig::from_env().with_overrides(cli.base_power, cli.max_freq, cli.min_freq);

    let processes = match &cli.workload {
        Some(path) => load_processes_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => {
            info!("no workload given, running demo");
            demo_scenario().processes
        }
    };

    let scenario = Scenario::builder()
        .processes(processes)
        .quantum(cli.quantum as u64)
        .cpu(cpu)
        .build()?;
    Ok(scenario)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .event_format(SimFormat)
        .try_init();
}
