//! `reduced` - run one reduction benchmark and report its sustained bandwidth
//!
//! ```text
//! reduced <benchmark> [<size>] [<second-size>] [--backend cpu|serial] [--threads N] [--iterations N] [--json]
//! ```
//!
//! `--json` replaces the text report with one JSON record on stdout.
//!
//! Exits with status 1 on usage errors (unknown benchmark, missing or
//! malformed size) and when the backend cannot be constructed. A failed
//! verification is reported but does not change the exit status.

use anyhow::{anyhow, Context};
use clap::error::ErrorKind;
use clap::Parser;
use reduced_backends::BackendType;
use reduced_core::{run_benchmark, BenchmarkKind, BenchmarkRun, GridShape, MetricsRecord, ProblemSize, RunConfig};
use reduced_tracing::{init_global_tracing, TracingConfig};
use serde::Serialize;
use std::process::ExitCode;

const LINE: &str = "--------------------------------------------------------------------------------";

/// Everything's Reduced: cross-backend reduction micro-benchmarks
#[derive(Parser, Debug)]
#[command(name = "reduced", version, long_about = None)]
#[command(about = "Measure sustained bandwidth of common reduction patterns")]
struct Cli {
    /// Benchmark to run
    benchmark: String,

    /// Problem size(s), e.g. 1024, 1.5k, 64Mi; matrix benchmarks take rows and columns
    #[arg(value_name = "SIZE", allow_negative_numbers = true)]
    sizes: Vec<String>,

    /// Execution backend: cpu or serial (overrides REDUCED_BACKEND)
    #[arg(long)]
    backend: Option<BackendType>,

    /// Dedicated worker threads for the cpu backend (overrides REDUCED_THREADS)
    #[arg(long)]
    threads: Option<usize>,

    /// Timed iterations (overrides REDUCED_ITERATIONS)
    #[arg(long)]
    iterations: Option<usize>,

    /// Print a JSON record instead of the text report
    #[arg(long)]
    json: bool,
}

/// Machine-readable result of one invocation
#[derive(Serialize, Debug)]
struct JsonReport {
    benchmark: &'static str,
    backend: String,
    sizes: Vec<usize>,
    #[serde(flatten)]
    metrics: MetricsRecord,
    verified: bool,
    mismatch: Option<String>,
}

impl JsonReport {
    fn new(run: &BenchmarkRun, backend: String, sizes: &[ProblemSize]) -> Self {
        Self {
            benchmark: run.kind.as_str(),
            backend,
            sizes: sizes.iter().map(|s| s.get()).collect(),
            metrics: MetricsRecord::from(&run.metrics),
            verified: run.report.passed(),
            mismatch: run.report.mismatch.as_ref().map(|m| m.to_string()),
        }
    }
}

impl Cli {
    /// Environment configuration with command-line overrides applied
    fn run_config(&self) -> anyhow::Result<RunConfig> {
        let mut config = RunConfig::from_env().context("reading REDUCED_* environment")?;
        if let Some(backend) = self.backend {
            config = config.with_backend(backend);
        }
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        if let Some(iterations) = self.iterations {
            config = config.with_iterations(iterations);
        }
        config.validate()?;
        Ok(config)
    }

    fn kind(&self) -> anyhow::Result<BenchmarkKind> {
        self.benchmark
            .parse()
            .map_err(|err| anyhow!("{err}\nValid benchmarks: {}", BenchmarkKind::names()))
    }

    fn problem_sizes(&self, kind: BenchmarkKind) -> anyhow::Result<Vec<ProblemSize>> {
        if self.sizes.len() != kind.required_sizes() {
            return Err(anyhow!(
                "Missing problem size: {kind} takes {} size argument(s), got {}",
                kind.required_sizes(),
                self.sizes.len()
            ));
        }
        self.sizes
            .iter()
            .map(|s| s.parse::<ProblemSize>().map_err(anyhow::Error::from))
            .collect()
    }
}

fn print_report(run: &BenchmarkRun) {
    if let Some(mismatch) = &run.report.mismatch {
        eprintln!("{mismatch}");
    }
    println!();
    println!("{}", run.metrics);
    println!("{LINE}");
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if !cli.json {
        println!("Everything's Reduced (v{})", reduced_core::VERSION);
        println!();
    }

    let kind = cli.kind()?;
    let sizes = cli.problem_sizes(kind)?;
    let config = cli.run_config()?;
    let backend = config.create_backend()?;
    tracing::info!(benchmark = %kind, backend = %backend, iterations = config.iterations, "benchmark_selected");

    if cli.json {
        let result = run_benchmark(&backend, kind, &sizes, config.iterations)?;
        let report = JsonReport::new(&result, backend.to_string(), &sizes);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Unit of time: milliseconds");
    println!("Backend: {backend}");
    match sizes.as_slice() {
        [] => println!("Grid: {}", GridShape::FIELD_SUMMARY),
        [n] => println!("Problem size: {n}"),
        [rows, cols] => println!("Problem size: {rows} x {cols}"),
        _ => {}
    }

    let result = run_benchmark(&backend, kind, &sizes, config.iterations)?;
    print_report(&result);
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    if let Err(err) = init_global_tracing(&TracingConfig::from_env()) {
        eprintln!("warning: tracing disabled: {err}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "benchmark_failed");
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
