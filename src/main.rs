// Histogram contention benchmark runner
//
// Usage:
//   histogram run   -n <N> -r <R> [-w W] [-s SEED] [-v 0|1|2] [--scheduler threads|rayon]
//                   [--dist uniform|skewed|cyclic] [--pad] [--affinity] [--format csv|text|json]
//   histogram sweep -n <N> -r <R> [-t 1,2,4,8,16] [--strategies local,mutex,atomic]
//                   [--schedulers threads,rayon] ...
//
// Exit codes: 0 ok, 1 rejected parameters or runtime error, 2 usage error, 3 checksum mismatch.
// Logs go to stderr (RUST_LOG, default info); stdout carries only reports.

use clap::{Args, Parser, Subcommand};
use histo_contention::report::{render, OutputFormat};
use histo_contention::{run, BenchConfig, Distribution, HistoError, SchedulerKind, Strategy};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "histogram", about = "Parallel histogram contention benchmark")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Single run of one strategy
    Run(RunArgs),
    /// One run per strategy x scheduler x worker count
    Sweep(SweepArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// Number of elements N
    #[arg(short = 'n', long)]
    elements: usize,

    /// Values lie in [0, R)
    #[arg(short = 'r', long)]
    range: usize,

    #[arg(short = 's', long, default_value_t = 12345)]
    seed: u64,

    #[arg(long = "dist", default_value = "uniform")]
    distribution: Distribution,

    /// Cache-line padded bins (atomic only)
    #[arg(long)]
    pad: bool,

    /// Pin worker i to core i
    #[arg(long)]
    affinity: bool,

    #[arg(long, default_value = "csv")]
    format: OutputFormat,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Number of workers W
    #[arg(short = 'w', long, default_value_t = default_workers())]
    workers: usize,

    /// 0 = local, 1 = mutex, 2 = atomic
    #[arg(short = 'v', long = "variant", default_value = "local")]
    strategy: Strategy,

    #[arg(long, default_value = "threads")]
    scheduler: SchedulerKind,
}

#[derive(Args)]
struct SweepArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[arg(short = 't', long, value_delimiter = ',', default_values_t = vec![1, 2, 4, 8, 16])]
    threads: Vec<usize>,

    #[arg(long, value_delimiter = ',', default_values_t = vec![Strategy::Local, Strategy::Mutex, Strategy::Atomic])]
    strategies: Vec<Strategy>,

    #[arg(long, value_delimiter = ',', default_values_t = vec![SchedulerKind::Threads, SchedulerKind::Rayon])]
    schedulers: Vec<SchedulerKind>,
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn config_for(common: &CommonArgs, workers: usize, strategy: Strategy, scheduler: SchedulerKind) -> BenchConfig {
    BenchConfig::new(common.elements, common.range, workers, common.seed, strategy)
        .with_scheduler(scheduler)
        .with_distribution(common.distribution)
        .with_padding(common.pad)
        .with_affinity(common.affinity)
}

// Run one configuration and print its report; Ok(false) on checksum mismatch
fn run_one(config: &BenchConfig, format: OutputFormat) -> Result<bool, HistoError> {
    let report = run(config)?;
    print!("{}", render(&report, format)?);
    if format == OutputFormat::Json {
        println!();
    }
    Ok(report.is_consistent())
}

fn execute(command: Command) -> Result<bool, HistoError> {
    match command {
        Command::Run(args) => {
            let config = config_for(&args.common, args.workers, args.strategy, args.scheduler);
            run_one(&config, args.common.format)
        }
        Command::Sweep(args) => {
            let mut consistent = true;
            for &scheduler in &args.schedulers {
                for &strategy in &args.strategies {
                    for &workers in &args.threads {
                        let config = config_for(&args.common, workers, strategy, scheduler);
                        consistent &= run_one(&config, args.common.format)?;
                    }
                }
            }
            Ok(consistent)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match execute(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("checksum mismatch: histogram does not account for every element");
            ExitCode::from(3)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args() {
        let cli = Cli::try_parse_from([
            "histogram", "run", "-n", "12", "-r", "3", "-w", "4", "-s", "9", "-v", "2", "--scheduler", "rayon",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.common.elements, 12);
        assert_eq!(args.workers, 4);
        assert_eq!(args.strategy, Strategy::Atomic);
        assert_eq!(args.scheduler, SchedulerKind::Rayon);
        assert_eq!(args.common.format, OutputFormat::Csv);
    }

    #[test]
    fn test_sweep_defaults() {
        let cli = Cli::try_parse_from(["histogram", "sweep", "-n", "100", "-r", "10"]).unwrap();
        let Command::Sweep(args) = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(args.threads, vec![1, 2, 4, 8, 16]);
        assert_eq!(args.strategies.len(), 3);
        assert_eq!(args.schedulers.len(), 2);
    }

    #[test]
    fn test_bad_variant_rejected() {
        assert!(Cli::try_parse_from(["histogram", "run", "-n", "1", "-r", "1", "-v", "7"]).is_err());
    }
}
