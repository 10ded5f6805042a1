use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "rowdeque workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the deque benchmarks and write a comparison report
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,

        /// Enable the crate's `tracing` feature while benchmarking
        #[arg(long, default_value_t = false)]
        tracing: bool,
    },
}

const BENCH: &str = "row_deque_benchmark";
const BASELINE: &str = "std::VecDeque";

/// The parts of criterion's `benchmark.json` the report needs.
#[derive(Deserialize)]
struct BenchmarkId {
    group_id: String,
    function_id: Option<String>,
    throughput: Option<Throughput>,
}

#[derive(Deserialize)]
enum Throughput {
    Elements(u64),
    Bytes(u64),
    BytesDecimal(u64),
}

#[derive(Deserialize)]
struct Estimates {
    mean: Estimate,
}

#[derive(Deserialize)]
struct Estimate {
    point_estimate: f64,
}

/// group -> function -> operations per second
type Results = BTreeMap<String, BTreeMap<String, f64>>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only, tracing } => {
            if !report_only {
                run_benchmarks(quick, tracing)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool, tracing: bool) -> Result<()> {
    println!("Running {BENCH}...");
    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.env("CARGO_INCREMENTAL", "0");
    cmd.args(["bench", "--bench", BENCH]);
    if tracing {
        cmd.args(["--features", "tracing"]);
    }

    // Args for the test runner (Criterion) go after --
    cmd.arg("--");
    if quick {
        cmd.args(["--measurement-time", "0.1", "--sample-size", "10", "--noplot"]);
    }

    let status = cmd.status().with_context(|| format!("failed to run cargo bench for {BENCH}"))?;
    if !status.success() {
        anyhow::bail!("benchmark {BENCH} failed");
    }
    println!("Finished in {:.2?}", start.elapsed());
    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");

    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let mut results = Results::new();
    collect_results(criterion_dir, &mut results)?;

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(report_path, render_report(&results))
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn render_report(results: &Results) -> String {
    let mut out = String::from("# RowDeque Benchmark Report\n\n");
    out.push_str("| Group | Function | Ops/s | vs std::VecDeque |\n");
    out.push_str("|---|---|---|---|\n");

    for (group, functions) in results {
        let baseline = functions.get(BASELINE).copied();
        for (function, ops) in functions {
            let relative = match baseline {
                Some(base) if base > 0.0 => format!("**{:.2}x**", ops / base),
                _ => "-".to_string(),
            };
            out.push_str(&format!("| {group} | {function} | {} | {relative} |\n", format_ops(*ops)));
        }
    }
    out
}

fn format_ops(ops: f64) -> String {
    if ops > 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops > 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{ops:.0}")
    }
}

/// Walks criterion's output and records each benchmark's latest run.
///
/// Layout: `<group>/<function>/new/{benchmark,estimates}.json`.
fn collect_results(dir: &Path, results: &mut Results) -> Result<()> {
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if !path.is_dir() || path.file_name().and_then(|s| s.to_str()) == Some("report") {
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("new") {
            collect_results(&path, results)?;
            continue;
        }

        let (Ok(id), Ok(estimates)) = (
            read_json::<BenchmarkId>(&path.join("benchmark.json")),
            read_json::<Estimates>(&path.join("estimates.json")),
        ) else {
            continue;
        };

        let time_ns = estimates.mean.point_estimate;
        if time_ns <= 0.0 {
            continue;
        }
        let per_iter = match id.throughput {
            Some(Throughput::Elements(n) | Throughput::Bytes(n) | Throughput::BytesDecimal(n)) => n as f64,
            None => 1.0,
        };
        let function = id.function_id.unwrap_or_else(|| id.group_id.clone());
        results
            .entry(id.group_id)
            .or_default()
            .insert(function, per_iter * 1e9 / time_ns);
    }
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}
