//! Microprocessor and memory-management simulator CLI.
//!
//! This binary drives the engine from the command line: it builds a batch of
//! deterministic demo processes, steps the simulation until every process
//! terminates (or a step budget runs out), and prints the final CPU, cache,
//! and memory statistics as text or JSON.

use std::collections::VecDeque;
use std::{fs, process};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use memsim_core::config::{AllocationMode, Config, ReplacementPolicy};
use memsim_core::isa::ProgramGenerator;
use memsim_core::sim::{Simulation, StepOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "memsim",
    author,
    version,
    about = "Didactic microprocessor and memory-management simulator",
    long_about = "Run a batch of generated demo programs through the simulated CPU and \
memory subsystem and report cache, paging, and fault statistics.\n\nExamples:\n  \
memsim run\n  memsim run --processes 8 --policy fifo\n  memsim run --mode segmentation --json\n  \
memsim run --config sim.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a batch of generated programs to completion.
    Run {
        /// JSON configuration file; flags below override its values.
        #[arg(short, long)]
        config: Option<String>,

        /// Number of demo processes to spawn.
        #[arg(short, long, default_value_t = 4)]
        processes: u32,

        /// Process size in KiB.
        #[arg(long, default_value_t = 16)]
        size_kb: u64,

        /// Replacement policy (overrides config).
        #[arg(long)]
        policy: Option<PolicyArg>,

        /// Allocation mode (overrides config).
        #[arg(long)]
        mode: Option<ModeArg>,

        /// Seed for the demo-program generator.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Step budget; the run stops after this many instructions.
        #[arg(long, default_value_t = 100_000)]
        steps: u64,

        /// Emit statistics as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

/// Replacement policy flag.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// First in, first out.
    Fifo,
    /// Least recently used.
    Lru,
    /// Belady's optimal over a bounded lookahead.
    Optimal,
}

impl From<PolicyArg> for ReplacementPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Fifo => Self::Fifo,
            PolicyArg::Lru => Self::Lru,
            PolicyArg::Optimal => Self::Optimal,
        }
    }
}

/// Allocation mode flag.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Fixed-size pages with a fault protocol.
    Paging,
    /// Base/limit segments, first-fit.
    Segmentation,
}

impl From<ModeArg> for AllocationMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Paging => Self::Paging,
            ModeArg::Segmentation => Self::Segmentation,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            processes,
            size_kb,
            policy,
            mode,
            seed,
            steps,
            json,
        } => cmd_run(&RunArgs {
            config,
            processes,
            size_kb,
            policy,
            mode,
            seed,
            steps,
            json,
        }),
    }
}

struct RunArgs {
    config: Option<String>,
    processes: u32,
    size_kb: u64,
    policy: Option<PolicyArg>,
    mode: Option<ModeArg>,
    seed: u64,
    steps: u64,
    json: bool,
}

/// Spawns the demo batch, steps to completion or budget, and reports.
fn cmd_run(args: &RunArgs) {
    let mut config = load_config(args.config.as_deref());
    if let Some(policy) = args.policy {
        config.policy = policy.into();
    }
    if let Some(mode) = args.mode {
        config.memory.mode = mode.into();
    }

    let mut simulation = Simulation::new(config);
    let mut generator = ProgramGenerator::new(args.seed);

    let mut queue: VecDeque<_> = (0..args.processes)
        .map(|index| {
            let program = generator.generate(args.size_kb);
            simulation.spawn(format!("demo-{index}"), args.size_kb, program)
        })
        .collect();

    if let Some(first) = queue.pop_front() {
        let _ = simulation.load(first);
    }

    let mut executed = 0_u64;
    while executed < args.steps {
        match simulation.step() {
            StepOutcome::Executed { .. } => executed += 1,
            StepOutcome::Finished { .. } => {
                let Some(next) = queue.pop_front() else { break };
                let _ = simulation.load(next);
            }
            StepOutcome::Idle => break,
        }
    }

    report(&simulation, args.json);
}

fn load_config(path: Option<&str>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let text = fs::read_to_string(path).unwrap_or_else(|error| {
        eprintln!("error reading config {path}: {error}");
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|error| {
        eprintln!("error parsing config {path}: {error}");
        process::exit(1);
    })
}

fn report(simulation: &Simulation, json: bool) {
    let cpu = simulation.cpu().snapshot();
    let l1 = simulation.cpu().l1.stats();
    let l2 = simulation.cpu().l2.stats();
    let memory = simulation.memory().statistics();

    if json {
        let state = simulation.memory().memory_state();
        let combined = serde_json::json!({
            "cpu": cpu,
            "l1": l1,
            "l2": l2,
            "memory": memory,
            "memory_state": state,
        });
        match serde_json::to_string_pretty(&combined) {
            Ok(text) => println!("{text}"),
            Err(error) => {
                eprintln!("error encoding report: {error}");
                process::exit(1);
            }
        }
        return;
    }

    println!("CPU");
    println!("  cycles: {}  state: {:?}", cpu.cycles, cpu.state);
    for (register, value) in &cpu.registers {
        println!("  {register:?}: {value}");
    }
    println!("Caches");
    println!(
        "  L1: {} accesses, {} hits ({:.1}%), {} bytes used",
        l1.accesses, l1.hits, l1.hit_rate_percent, l1.used_bytes
    );
    println!(
        "  L2: {} accesses, {} hits ({:.1}%), {} bytes used",
        l2.accesses, l2.hits, l2.hit_rate_percent, l2.used_bytes
    );
    println!("Memory");
    println!(
        "  {} accesses, {} faults ({:.1}%), {} / {} KiB used",
        memory.accesses, memory.faults, memory.fault_rate_percent, memory.used_kb, memory.total_kb
    );
    println!("  {} pages in swap", memory.swapped_pages);
}
