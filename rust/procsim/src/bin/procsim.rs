//! procsim - Run CPU scheduling simulations from text workloads.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use procsim::{
    load_workload, process_stats, render, summarize, PolicyKind, Promotion, SimFormat,
    SimulationError, Tick, Timeline, DEFAULT_TICK_BUDGET,
};

const DEFAULT_QUANTUM: Tick = 4;
const DEFAULT_AGING_THRESHOLD: Tick = 10;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Fifo,
    RoundRobin,
    Priority,
    Multilevel,
}

/// Run CPU scheduling simulations from text workloads.
#[derive(Parser)]
#[command(name = "procsim")]
struct Cli {
    /// Path to a workload file.
    workload: PathBuf,

    /// Scheduling policy.
    #[arg(short, long, value_enum, default_value = "fifo")]
    policy: PolicyArg,

    /// Round Robin quantum in ticks.
    ///
    /// Falls back to the quantum given in the workload file, then 4.
    #[arg(short, long)]
    quantum: Option<Tick>,

    /// Ticks a ready process may wait before aging promotes it (multilevel).
    #[arg(long, default_value_t = DEFAULT_AGING_THRESHOLD)]
    aging_threshold: Tick,

    /// Highest priority aging may promote to (multilevel).
    ///
    /// Defaults to the highest priority in the workload.
    #[arg(long, conflicts_with = "bands", allow_negative_numbers = true)]
    max_priority: Option<i32>,

    /// Promote through these priority bands instead of one step at a time
    /// (multilevel), e.g. `--bands 0,5,10`.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    bands: Option<Vec<i32>>,

    /// Maximum number of ticks to simulate.
    #[arg(long, env = "PROCSIM_TICK_BUDGET", default_value_t = DEFAULT_TICK_BUDGET)]
    tick_budget: Tick,

    /// Do not print the Gantt chart.
    #[arg(long)]
    no_gantt: bool,

    /// Print every timeline event as a table.
    #[arg(long)]
    table: bool,

    /// Do not print per-process statistics.
    #[arg(long)]
    no_stats: bool,

    /// Write the timeline as JSON to a file.
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Print timeline events to stderr.
    #[arg(long)]
    dump_trace: bool,
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
    let workload = load_workload(&cli.workload)
        .with_context(|| format!("failed to load {}", cli.workload.display()))?;

    let policy = match cli.policy {
        PolicyArg::Fifo => PolicyKind::Fifo,
        PolicyArg::RoundRobin => PolicyKind::RoundRobin {
            quantum: cli.quantum.or(workload.quantum).unwrap_or(DEFAULT_QUANTUM),
        },
        PolicyArg::Priority => PolicyKind::Priority,
        PolicyArg::Multilevel => PolicyKind::Multilevel {
            aging_threshold: cli.aging_threshold,
            promotion: match &cli.bands {
                Some(bands) => Promotion::Tiered {
                    bands: bands.clone(),
                },
                None => Promotion::Increment {
                    ceiling: cli.max_priority,
                },
            },
        },
    };

    let scenario = workload
        .into_scenario(policy)
        .tick_budget(cli.tick_budget)
        .build()?;
    println!("{} on {} processes", scenario.policy, scenario.processes.len());

    match scenario.simulate() {
        Ok(timeline) => report(cli, &timeline),
        Err(SimulationError::NotConverged {
            tick_budget,
            timeline,
        }) => {
            report(cli, &timeline)?;
            anyhow::bail!("simulation did not converge within {tick_budget} ticks")
        }
        Err(e) => Err(e.into()),
    }
}

fn report(cli: &Cli, timeline: &Timeline) -> Result<()> {
    if cli.dump_trace {
        timeline.dump();
    }
    if !cli.no_gantt {
        println!();
        print!("{}", render::gantt(timeline));
    }
    if cli.table {
        println!();
        print!("{}", render::event_table(timeline));
    }
    if !cli.no_stats {
        let stats = process_stats(timeline);
        println!();
        print!("{}", render::stats_table(&stats, &summarize(timeline, &stats)));
    }
    if let Some(path) = &cli.json {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        timeline
            .write_json(&mut file)
            .context("failed to write timeline JSON")?;
        eprintln!("wrote timeline to {}", path.display());
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .event_format(SimFormat)
        .try_init();
}
