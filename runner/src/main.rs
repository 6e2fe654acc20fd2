use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};

use processor::generate::{generate, Bounds};
use processor::input::{load_processes, to_input_format};
use processor::{format_averages, format_logs, Processor, Report};
use scheduler::{Config, RoundRobin, TieBreak};

/// Round-Robin CPU scheduling simulator.
///
/// Simulates a fixed set of processes on a single CPU and reports the
/// average waiting and response times, or cross-checks them against the
/// output of the online process scheduling solver.
#[derive(Debug, Parser)]
#[clap(version)]
struct Opts {
    /// Enable verbose output. Specify multiple times to increase verbosity.
    #[clap(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate a process list file.
    Simulate(SimulateOpts),
    /// Generate a random but valid process list.
    Generate(GenerateOpts),
    /// Summarise the text copied from the solver page.
    Solve {
        /// File with the copied solver page.
        file: PathBuf,
    },
    /// Print the Gantt chart of the solver page saved as HTML.
    Chart {
        /// The saved solver page.
        file: PathBuf,
    },
    /// Simulate a process list and compare with the solver's results.
    Compare {
        #[clap(flatten)]
        simulate: SimulateOpts,

        /// File with the copied solver page.
        solver_file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TieBreakArg {
    InputOrder,
    Pid,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::InputOrder => TieBreak::InputOrder,
            TieBreakArg::Pid => TieBreak::Pid,
        }
    }
}

#[derive(Debug, clap::Args)]
struct SimulateOpts {
    /// Process list file: a count line, then `pid, arrival, burst` lines.
    input: PathBuf,

    /// Time quantum length.
    quantum: usize,

    /// Ordering of processes arriving at the same time.
    #[clap(long, value_enum, default_value = "input-order")]
    tie_break: TieBreakArg,

    /// Fail on an empty process list.
    #[clap(long)]
    require_processes: bool,

    /// Print the Gantt chart.
    #[clap(long)]
    gantt: bool,

    /// Print every scheduling iteration.
    #[clap(long)]
    logs: bool,

    /// Print the whole report as JSON.
    #[clap(long)]
    json: bool,
}

#[derive(Debug, clap::Args)]
struct GenerateOpts {
    /// Number of processes.
    #[clap(default_value = "4")]
    num: usize,

    /// Inclusive bounds of the arrival times, as `LOWER-UPPER`.
    #[clap(short = 'a', long, default_value = "0-20")]
    arrival_range: Bounds,

    /// Inclusive bounds of the burst times, as `LOWER-UPPER`.
    #[clap(short = 'b', long, default_value = "1-20")]
    burst_range: Bounds,

    /// Also save the processes as a process list file.
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,

    /// Seed of the random generator, the current time if omitted.
    #[clap(long)]
    seed: Option<u32>,
}

fn config(opts: &SimulateOpts) -> Config {
    Config::new(opts.quantum)
        .with_tie_break(opts.tie_break.into())
        .with_require_processes(opts.require_processes)
}

fn report(opts: &SimulateOpts) -> Result<(Report, String)> {
    let specs = load_processes(&opts.input)
        .with_context(|| format!("failed to load {}", opts.input.display()))?;
    let scheduler = RoundRobin::new(specs, config(opts)).context("invalid simulation input")?;
    let (simulation, logs) = Processor::run(scheduler);
    let report = Report::new(&simulation)?;
    Ok((report, format_logs(&logs)))
}

fn simulate(opts: &SimulateOpts) -> Result<String> {
    let (report, logs) = report(opts)?;

    if opts.json {
        return Ok(serde_json::to_string_pretty(&report)? + "\n");
    }

    let mut output = String::new();
    if opts.logs {
        output.push_str(&logs);
    }
    if opts.gantt {
        output.push_str(&report.gantt());
    }
    output.push_str(&report.averages());
    Ok(output)
}

fn random_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(1, |elapsed| elapsed.subsec_nanos())
}

fn generate_processes(opts: &GenerateOpts) -> Result<String> {
    let seed = opts.seed.unwrap_or_else(random_seed);
    let specs = generate(opts.num, opts.arrival_range, opts.burst_range, seed)?;
    info!("generated {} processes with seed {}", specs.len(), seed);

    let join = |times: Vec<i64>| {
        times
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    };
    let arrivals = join(specs.iter().map(|spec| spec.arrival_time).collect());
    let bursts = join(specs.iter().map(|spec| spec.burst_time).collect());

    if let Some(output) = &opts.output {
        fs::write(output, to_input_format(&specs))
            .with_context(|| format!("failed to write {}", output.display()))?;
        debug!("saved to {}", output.display());
    }

    Ok(format!(
        "Arrival times: {}\n  Burst times: {}\n",
        arrivals, bursts
    ))
}

fn solve(file: &Path) -> Result<String> {
    let text =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let run = gantt::parse(&text).context("failed to parse the solver output")?;
    Ok(format_averages(&run.summary()))
}

fn chart(file: &Path) -> Result<String> {
    let html =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let chart = gantt::html::parse_html_chart(&html).context("failed to parse the solver page")?;

    let slots = chart
        .slots
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    let times = chart
        .times
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    Ok(format!(
        "Processes: {}\n    Times: {}\n",
        slots.join(" "),
        times.join(" ")
    ))
}

fn compare(opts: &SimulateOpts, solver_file: &Path) -> Result<String> {
    let (report, _) = report(opts)?;
    let text = fs::read_to_string(solver_file)
        .with_context(|| format!("failed to read {}", solver_file.display()))?;
    let expected = gantt::parse(&text)
        .context("failed to parse the solver output")?
        .summary();
    let actual = report.metrics.summary;

    let output = format!(
        "Simulation:\n{}Solver:\n{}",
        format_averages(&actual),
        format_averages(&expected)
    );
    if actual != expected {
        bail!("the simulation does not match the solver\n{}", output);
    }
    Ok(output)
}

fn init_logging(verbose: u8) -> Result<()> {
    let llv = match verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        llv,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}

fn execute(command: &Command) -> Result<String> {
    match command {
        Command::Simulate(simulate_opts) => simulate(simulate_opts),
        Command::Generate(generate_opts) => generate_processes(generate_opts),
        Command::Solve { file } => solve(file),
        Command::Chart { file } => chart(file),
        Command::Compare {
            simulate: simulate_opts,
            solver_file,
        } => compare(simulate_opts, solver_file),
    }
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    init_logging(opts.verbose)?;

    print!("{}", execute(&opts.command)?);
    Ok(())
}

#[cfg(test)]
mod tests;
