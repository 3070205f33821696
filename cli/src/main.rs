//! `maxflow`: command-line front end for the Edmonds-Karp solver
//!
//! Modes:
//! - `file <path>`: solve a CSV dataset from node `0` to the last node
//! - `demo`: generate a small random dataset and solve it
//! - `benchmark`: time the solver over growing random datasets
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` to follow every
//! augmentation.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod dataset;
mod report;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use maxflow_core::{EdmondsKarp, FlowValidator, NodeId, SolverConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::dataset::Dataset;
use crate::report::{BenchmarkEntry, BenchmarkReport, FlowReport};

#[derive(Debug, Parser)]
#[command(name = "maxflow", version, about = "Maximum throughput of logistics networks")]
struct Cli {
    /// JSON file with solver configuration
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a CSV dataset
    File {
        path: PathBuf,
        /// Route report destination
        #[arg(short, long, default_value = "output_graph.json")]
        output: PathBuf,
    },
    /// Generate a random dataset and solve it
    Demo {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "demo_data.csv")]
        data: PathBuf,
        #[arg(short, long, default_value = "demo_result.json")]
        output: PathBuf,
    },
    /// Time the solver over growing random datasets
    Benchmark {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_delimiter = ',', default_values_t = [10, 50, 100, 200, 300])]
        sizes: Vec<usize>,
        #[arg(long, default_value_t = 0.2)]
        density: f64,
        /// Directory receiving the generated `bench_<n>.csv` files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
        #[arg(short, long, default_value = "benchmark.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let solver = EdmondsKarp::with_config(config);

    match cli.command {
        Command::File { path, output } => {
            println!("--- Processing {} ---", path.display());
            let dataset = dataset::load_csv(&path)?;
            solve_and_report(&solver, &dataset, &output)?;
        }
        Command::Demo { seed, data, output } => {
            println!("--- Running Demo Mode ---");
            let generated = dataset::generate(12, 0.25, &mut make_rng(seed))?;
            dataset::write_csv(&data, &generated)?;
            let dataset = dataset::load_csv(&data)?;
            solve_and_report(&solver, &dataset, &output)?;
        }
        Command::Benchmark {
            seed,
            sizes,
            density,
            data_dir,
            output,
        } => {
            println!("--- Running Timing Analysis ---");
            let report = benchmark(&solver, &sizes, density, &data_dir, seed)?;
            report::write_json(&output, &report)?;
            println!("Timing table saved to: {}", output.display());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SolverConfig> {
    let Some(path) = path else {
        return Ok(SolverConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading solver config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing solver config {}", path.display()))?;
    info!("solver config: {:?}", config);
    Ok(config)
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Terminals used by every mode: first and last node
fn terminals(dataset: &Dataset) -> (NodeId, NodeId) {
    (NodeId(0), NodeId(dataset.node_count - 1))
}

fn solve_and_report(solver: &EdmondsKarp, dataset: &Dataset, output: &Path) -> Result<()> {
    let mut network = dataset.to_network()?;
    let (source, sink) = terminals(dataset);

    let start = Instant::now();
    let result = solver
        .solve(&mut network, source, sink)
        .with_context(|| format!("solving max flow from {} to {}", source, sink))?;
    println!("Algorithm time: {:.6}s", start.elapsed().as_secs_f64());
    println!("Max Flow: {}", result.max_flow);

    let validation = FlowValidator::with_terminals(source, sink).validate(&network)?;
    anyhow::ensure!(
        validation.is_valid(),
        "solved network violates flow invariants: {:?}",
        validation.violations
    );

    report::write_json(output, &FlowReport::new(&network, source, sink, &result))?;
    println!("Route report saved to: {}", output.display());
    Ok(())
}

fn benchmark(
    solver: &EdmondsKarp,
    sizes: &[usize],
    density: f64,
    data_dir: &Path,
    seed: Option<u64>,
) -> Result<BenchmarkReport> {
    let mut rng = make_rng(seed);
    let mut report = BenchmarkReport {
        density,
        entries: Vec::with_capacity(sizes.len()),
    };

    for &nodes in sizes {
        let path = data_dir.join(format!("bench_{}.csv", nodes));
        let generated = dataset::generate(nodes, density, &mut rng)?;
        dataset::write_csv(&path, &generated)?;
        let dataset = dataset::load_csv(&path)?;

        let mut network = dataset.to_network()?;
        let (source, sink) = terminals(&dataset);
        let start = Instant::now();
        let result = solver
            .solve(&mut network, source, sink)
            .with_context(|| format!("benchmarking {} nodes", nodes))?;
        let seconds = start.elapsed().as_secs_f64();

        println!("Nodes: {:3} | Time: {:.5}s", nodes, seconds);
        report.entries.push(BenchmarkEntry {
            nodes,
            edges: network.edge_count(),
            max_flow: result.max_flow,
            seconds,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_modes() {
        let cli = Cli::parse_from(["maxflow", "file", "routes.csv"]);
        assert!(matches!(
            cli.command,
            Command::File { ref path, ref output }
                if path == Path::new("routes.csv") && output == Path::new("output_graph.json")
        ));

        let cli = Cli::parse_from(["maxflow", "benchmark", "--sizes", "5,8", "--seed", "3"]);
        match cli.command {
            Command::Benchmark { sizes, seed, density, .. } => {
                assert_eq!(sizes, vec![5, 8]);
                assert_eq!(seed, Some(3));
                assert_eq!(density, 0.2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_benchmark_runs_over_sizes() {
        let dir = std::env::temp_dir().join(format!("maxflow-bench-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let report = benchmark(&EdmondsKarp::new(), &[4, 9], 0.3, &dir, Some(5)).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[1].nodes, 9);
        assert!(report.entries.iter().all(|entry| entry.max_flow >= 50));
    }

    #[test]
    fn test_missing_config_defaults() {
        assert_eq!(load_config(None).unwrap(), SolverConfig::default());
        assert!(load_config(Some(Path::new("no/such/config.json"))).is_err());
    }
}
