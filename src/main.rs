//! ACO TSP Solver - Command Line Interface
//!
//! Solves the Traveling Salesman Problem on a distance matrix with Ant Colony Optimization.

use clap::{Parser, Subcommand, ValueEnum};
use aco_tsp::benchmark::{Benchmark, BenchmarkConfig};
use aco_tsp::colony::{AcoParams, AntColonyOptimizer, FitOptions};
use aco_tsp::exact::{BruteForceSolver, MAX_EXACT_NODES};
use aco_tsp::matrix::DistanceMatrix;
use aco_tsp::Result;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "aco-tsp")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "Ant Colony Optimization for the Traveling Salesman Problem")]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the colony once on a distance matrix
    Solve {
        /// Distance matrix file (CSV without header, or JSON)
        #[arg(short, long)]
        matrix: PathBuf,

        /// JSON file with ACO parameters
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        colony: ColonyArgs,

        #[command(flatten)]
        fit: FitArgs,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write the fit report as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the colony with several seeds and summarize
    Benchmark {
        /// Distance matrix file (CSV without header, or JSON)
        #[arg(short, long)]
        matrix: PathBuf,

        /// JSON file with ACO parameters
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        colony: ColonyArgs,

        #[command(flatten)]
        fit: FitArgs,

        /// Number of runs (seeds 0..runs)
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Output CSV file for per-run results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Analyze a distance matrix
    Analyze {
        /// Distance matrix file (CSV without header, or JSON)
        #[arg(short, long)]
        matrix: PathBuf,
    },

    /// Generate a random Euclidean distance matrix as CSV
    Generate {
        /// Number of nodes
        #[arg(short, long)]
        nodes: usize,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Hyperparameter overrides; unset values come from --config or the defaults
#[derive(clap::Args)]
struct ColonyArgs {
    /// Number of ants per iteration
    #[arg(long)]
    ants: Option<usize>,

    /// Pheromone evaporation rate
    #[arg(long)]
    evaporation_rate: Option<f64>,

    /// Pheromone multiplier for the best tour's edges
    #[arg(long)]
    intensification: Option<f64>,

    /// Pheromone importance
    #[arg(long)]
    alpha: Option<f64>,

    /// Heuristic importance
    #[arg(long)]
    beta: Option<f64>,

    /// Heuristic decay rate
    #[arg(long)]
    beta_decay: Option<f64>,

    /// Exploitation probability
    #[arg(long)]
    rho: Option<f64>,

    /// Exploitation rule
    #[arg(long, value_enum)]
    exploitation: Option<Exploitation>,
}

#[derive(clap::Args)]
struct FitArgs {
    /// Maximum number of iterations
    #[arg(short, long, default_value = "100")]
    iterations: usize,

    /// Minimize or maximize the tour length
    #[arg(long, value_enum, default_value = "min")]
    mode: Mode,

    /// Stop after this many iterations matching the best score
    #[arg(short, long, default_value = "20")]
    early_stopping: usize,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Mode {
    /// Shortest tour
    Min,
    /// Longest tour
    Max,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Exploitation {
    /// Highest remaining node id
    HighestNodeId,
    /// Edge with the largest transition weight
    HighestProbability,
}

impl FitArgs {
    fn to_options(&self) -> FitOptions {
        FitOptions {
            iterations: self.iterations,
            mode: match self.mode {
                Mode::Min => aco_tsp::Mode::Minimize,
                Mode::Max => aco_tsp::Mode::Maximize,
            },
            early_stopping: self.early_stopping,
        }
    }
}

impl ColonyArgs {
    fn apply(&self, params: &mut AcoParams) {
        if let Some(ants) = self.ants {
            params.num_ants = ants;
        }
        if let Some(rate) = self.evaporation_rate {
            params.evaporation_rate = rate;
        }
        if let Some(intensification) = self.intensification {
            params.intensification = intensification;
        }
        if let Some(alpha) = self.alpha {
            params.alpha = alpha;
        }
        if let Some(beta) = self.beta {
            params.beta = beta;
        }
        if let Some(decay) = self.beta_decay {
            params.beta_decay = decay;
        }
        if let Some(rho) = self.rho {
            params.rho = rho;
        }
        if let Some(exploitation) = self.exploitation {
            params.exploitation = match exploitation {
                Exploitation::HighestNodeId => aco_tsp::Exploitation::HighestNodeId,
                Exploitation::HighestProbability => aco_tsp::Exploitation::HighestProbability,
            };
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = match (&cli.command, cli.verbose) {
        (_, true) => "debug",
        (Commands::Benchmark { .. }, false) => "warn",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Commands::Solve { matrix, config, colony, fit, seed, output } => {
            solve_matrix(&matrix, config.as_deref(), &colony, &fit, seed, output.as_deref())
        }

        Commands::Benchmark { matrix, config, colony, fit, runs, output } => {
            run_benchmark(&matrix, config.as_deref(), &colony, &fit, runs, output.as_deref())
        }

        Commands::Analyze { matrix } => analyze_matrix(&matrix),

        Commands::Generate { nodes, seed, output } => generate_matrix(nodes, seed, &output),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_params(config: Option<&Path>, colony: &ColonyArgs) -> Result<AcoParams> {
    let mut params = match config {
        Some(path) => AcoParams::from_json_file(path)?,
        None => AcoParams::default(),
    };
    colony.apply(&mut params);
    Ok(params)
}

fn solve_matrix(
    path: &Path,
    config: Option<&Path>,
    colony: &ColonyArgs,
    fit: &FitArgs,
    seed: Option<u64>,
    output: Option<&Path>,
) -> Result<()> {
    println!("Loading distance matrix from {:?}...", path);
    let distances = DistanceMatrix::from_file(path)?;

    let mut params = load_params(config, colony)?;
    if let Some(seed) = seed {
        params.seed = seed;
    }

    let mut optimizer = AntColonyOptimizer::with_params(params);
    optimizer.fit(&distances, &fit.to_options())?;

    let Some(report) = optimizer.report() else {
        return Ok(());
    };

    println!("\n========== Results ==========");
    print!("{}", report);

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(out_path, json)?;
        println!("\nReport saved to {:?}", out_path);
    }

    Ok(())
}

fn run_benchmark(
    path: &Path,
    config: Option<&Path>,
    colony: &ColonyArgs,
    fit: &FitArgs,
    runs: usize,
    output: Option<&Path>,
) -> Result<()> {
    let distances = DistanceMatrix::from_file(path)?;
    println!("Benchmarking {} runs on {} nodes...", runs, distances.dimension());

    let config = BenchmarkConfig {
        num_runs: runs,
        params: load_params(config, colony)?,
        options: fit.to_options(),
        ..Default::default()
    };

    let mut benchmark = Benchmark::new(config);
    benchmark.run(&distances)?;

    println!("\n{}", benchmark.generate_report());

    if let Some(out_path) = output {
        benchmark.export_to_csv(out_path)?;
        println!("Results exported to {:?}", out_path);
    }

    Ok(())
}

fn analyze_matrix(path: &Path) -> Result<()> {
    let distances = DistanceMatrix::from_file(path)?;

    println!("========== Matrix Analysis ==========\n");
    println!("{}", distances.statistics());

    if distances.dimension() > MAX_EXACT_NODES {
        println!("Exact optimum: skipped (more than {} nodes)", MAX_EXACT_NODES);
        return Ok(());
    }

    let shortest = BruteForceSolver::new(aco_tsp::Mode::Minimize).solve(&distances)?;
    let longest = BruteForceSolver::new(aco_tsp::Mode::Maximize).solve(&distances)?;

    println!("Exact solutions ({} tours):", shortest.tours_evaluated);
    println!("  Shortest: {:.2} {:?}", shortest.score, shortest.path);
    println!("  Longest: {:.2} {:?}", longest.score, longest.path);

    Ok(())
}

fn generate_matrix(nodes: usize, seed: u64, output: &Path) -> Result<()> {
    let distances = DistanceMatrix::random_euclidean(nodes, seed)?;
    distances.to_csv_file(output)?;
    println!("Generated {} nodes (seed {}) into {:?}", nodes, seed, output);
    Ok(())
}
