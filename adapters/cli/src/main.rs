#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line driver for the Schelling segregation simulation.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use schelling_core::{Parameters, DEFAULT_ITERATION_CAP};
use schelling_engine::Simulation;
use schelling_rendering::{FrameStyle, RenderingBackend, TextBackend, DEFAULT_EMPTY_MARKER};
use schelling_system_analytics::SegregationReport;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "schelling=info";

/// Runs a Schelling segregation model on a rectangular city
#[derive(Parser, Debug)]
#[command(name = "schelling")]
#[command(about = "Runs a Schelling segregation model on a rectangular city")]
struct Args {
    /// Number of rows in the city
    #[arg(long, default_value_t = 100)]
    height: usize,

    /// Number of columns in the city
    #[arg(long, default_value_t = 100)]
    width: usize,

    /// Manhattan radius of each resident's neighborhood
    #[arg(long, default_value_t = 2)]
    radius: usize,

    /// Number of residents to place
    #[arg(long, default_value_t = 8500)]
    population: usize,

    /// Comma-separated share of the population per resident type
    #[arg(long, value_delimiter = ',', default_value = "0.5,0.5")]
    fractions: Vec<f64>,

    /// Satisfaction a resident needs to stay put
    #[arg(long, default_value_t = 0.5)]
    threshold: f64,

    /// Relocation passes to run before giving up
    #[arg(long, default_value_t = DEFAULT_ITERATION_CAP)]
    max_iterations: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Which frames to print
    #[arg(long, value_enum, default_value_t = Frames::All)]
    frames: Frames,

    /// Do not mark unsatisfied residents with `U`
    #[arg(long)]
    no_annotate: bool,

    /// Print the run summary as JSON instead of text frames
    #[arg(long)]
    json: bool,
}

/// Frame selection for text output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Frames {
    /// The initial state and every pass.
    All,
    /// Only the state the run ended in.
    Final,
    /// No frames.
    None,
}

/// Machine-readable outcome of a run.
#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    height: usize,
    width: usize,
    radius: usize,
    population: usize,
    threshold: f64,
    iterations: u64,
    settled: bool,
    report: SegregationReport,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "starting simulation");

    let stdout = io::stdout();
    let summary = run(&args, seed, stdout.lock())?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("failed to encode run summary")?;
        println!("{json}");
    }
    Ok(())
}

/// Runs one simulation, writing text frames and the closing line to `out` unless JSON was requested.
fn run<W: Write>(args: &Args, seed: u64, out: W) -> Result<RunSummary> {
    let parameters = Parameters::new(
        args.height,
        args.width,
        args.radius,
        args.population,
        args.fractions.clone(),
    );
    let mut simulation =
        Simulation::new(&parameters, seed).context("invalid simulation parameters")?;
    simulation
        .place_residents()
        .context("failed to place residents")?;
    simulation
        .initialize(args.threshold)
        .context("failed to score residents")?;

    let style = FrameStyle::new(!args.no_annotate, DEFAULT_EMPTY_MARKER)?;
    let frames = if args.json { Frames::None } else { args.frames };
    let mut backend = TextBackend::new(out, style);

    if frames == Frames::All {
        backend.present(&simulation.snapshot())?;
    }

    let mut events = Vec::new();
    while !simulation.is_settled() && simulation.iteration() < args.max_iterations {
        events.clear();
        simulation
            .iterate(&mut events)
            .with_context(|| format!("relocation pass {} failed", simulation.iteration() + 1))?;
        if frames == Frames::All {
            backend.present(&simulation.snapshot())?;
        }
    }

    let snapshot = simulation.snapshot();
    if frames == Frames::Final {
        backend.present(&snapshot)?;
    }
    if !simulation.is_settled() {
        tracing::warn!(
            cap = args.max_iterations,
            unsatisfied = simulation.unsatisfied().len(),
            "iteration cap reached before the city settled"
        );
    }

    let report = SegregationReport::from_snapshot(&snapshot);
    tracing::info!(
        iterations = simulation.iteration(),
        satisfied_share = report.satisfied_share,
        like_neighbor_share = report.like_neighbor_share,
        "simulation finished"
    );

    let mut out = backend.into_inner();
    if !args.json {
        writeln!(
            out,
            "The simulation terminated in {} iteration(s)",
            simulation.iteration()
        )
        .context("failed to write termination line")?;
    }

    Ok(RunSummary {
        seed,
        height: args.height,
        width: args.width,
        radius: args.radius,
        population: args.population,
        threshold: args.threshold,
        iterations: simulation.iteration(),
        settled: simulation.is_settled(),
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["schelling"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn defaults_match_the_classic_city() {
        let args = args(&[]);
        assert_eq!(args.height, 100);
        assert_eq!(args.width, 100);
        assert_eq!(args.radius, 2);
        assert_eq!(args.population, 8500);
        assert_eq!(args.fractions, vec![0.5, 0.5]);
        assert_eq!(args.threshold, 0.5);
        assert_eq!(args.max_iterations, DEFAULT_ITERATION_CAP);
        assert_eq!(args.frames, Frames::All);
        assert!(args.seed.is_none());
    }

    #[test]
    fn fractions_split_on_commas() {
        let args = args(&["--fractions", "0.2,0.3,0.5", "--frames", "final"]);
        assert_eq!(args.fractions, vec![0.2, 0.3, 0.5]);
        assert_eq!(args.frames, Frames::Final);
    }

    #[test]
    fn run_prints_frames_and_termination_line() {
        let args = args(&[
            "--height", "6", "--width", "6", "--population", "24", "--frames", "all",
        ]);
        let mut out = Vec::new();
        let summary = run(&args, 42, &mut out).expect("run");

        let text = String::from_utf8(out).expect("utf-8");
        let frames = text.matches("Iteration: ").count() as u64;
        assert_eq!(frames, summary.iterations + 1);
        assert_eq!(
            text.lines().last(),
            Some(format!("The simulation terminated in {} iteration(s)", summary.iterations).as_str())
        );
        assert_eq!(summary.report.occupied, 24);
    }

    #[test]
    fn iteration_cap_stops_the_run() {
        let args = args(&[
            "--height", "8", "--width", "8", "--population", "40", "--threshold", "1",
            "--max-iterations", "3", "--frames", "none",
        ]);
        let mut out = Vec::new();
        let summary = run(&args, 9, &mut out).expect("run");

        assert!(summary.iterations <= 3);
        let text = String::from_utf8(out).expect("utf-8");
        assert!(!text.contains("Iteration: "));
    }

    #[test]
    fn overflowing_population_is_reported() {
        let args = args(&["--height", "3", "--width", "3", "--population", "9"]);
        let error = run(&args, 1, Vec::new()).expect_err("population cannot fit");
        assert!(format!("{error:#}").contains("does not fit"));
    }

    #[test]
    fn json_mode_suppresses_text_output() {
        let args = args(&["--height", "5", "--width", "5", "--population", "10", "--json"]);
        let mut out = Vec::new();
        let summary = run(&args, 3, &mut out).expect("run");

        assert!(out.is_empty());
        let json = serde_json::to_value(&summary).expect("serializable");
        assert_eq!(json["seed"], 3);
        assert_eq!(json["report"]["occupied"], 10);
    }
}
