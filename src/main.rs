//! CVRP-ACO Solver - Command Line Interface
//!
//! An Ant Colony Optimization solver for the Capacitated Vehicle Routing Problem.

use clap::{Parser, Subcommand, ValueEnum};
use cvrp_aco::benchmark::{Benchmark, BenchmarkConfig};
use cvrp_aco::heuristics::aco::{AcoConfig, AntColonySolver};
use cvrp_aco::heuristics::deposition::{DepositionStrategy, ElitistTopK, RankWeighted, Uniform};
use cvrp_aco::heuristics::greedy::GreedySolver;
use cvrp_aco::instance::CvrpInstance;
use cvrp_aco::solution::Solution;
use cvrp_aco::visualization::Visualizer;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cvrp-aco")]
#[command(version = "1.0")]
#[command(about = "An Ant Colony Optimization solver for the Capacitated VRP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance with one algorithm
    Solve {
        /// Path to the instance file (.vrp)
        #[arg(short, long)]
        instance: PathBuf,

        /// Algorithm to use
        #[arg(short, long, value_enum, default_value = "uniform")]
        algorithm: Algorithm,

        /// Number of ants per iteration
        #[arg(long, default_value = "50")]
        ants: usize,

        /// Number of iterations
        #[arg(long, default_value = "200")]
        iterations: usize,

        /// Exponent on the inverse edge cost
        #[arg(long, default_value = "2.0")]
        alpha: f64,

        /// Exponent on the pheromone level
        #[arg(long, default_value = "5.0")]
        beta: f64,

        /// Evaporation rate (rho)
        #[arg(long, default_value = "0.8")]
        evaporation_rate: f64,

        /// Amount of pheromone an ant distributes over its tour
        #[arg(long, default_value = "20.0")]
        pheromone_amount: f64,

        /// Number of depositing ants for the elitist and rank strategies
        #[arg(long, default_value = "5")]
        sigma: usize,

        /// Apply a 2-opt pass to every constructed tour
        #[arg(long)]
        two_opt: bool,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output solution as JSON to file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generate SVG visualization next to the output
        #[arg(long)]
        visualize: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,
    },

    /// Compare all algorithms on an instance over multiple runs
    Benchmark {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Number of runs per stochastic algorithm
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Number of ants per iteration
        #[arg(long, default_value = "50")]
        ants: usize,

        /// Number of iterations
        #[arg(long, default_value = "200")]
        iterations: usize,

        /// Output directory for CSV results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Algorithm {
    /// Every ant deposits pheromone
    Uniform,
    /// Only the sigma best ants deposit
    Elitist,
    /// Rank-weighted deposition with best-tour reinforcement
    Rank,
    /// Deterministic greedy baseline (ignores the colony parameters)
    Greedy,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            instance,
            algorithm,
            ants,
            iterations,
            alpha,
            beta,
            evaporation_rate,
            pheromone_amount,
            sigma,
            two_opt,
            seed,
            output,
            visualize,
            verbose,
        } => {
            let config = AcoConfig {
                ants_count: ants,
                max_iterations: iterations,
                alpha,
                beta,
                evaporation_rate,
                pheromone_amount,
                initial_pheromone: 0.0,
                use_two_opt: two_opt,
                seed,
            };
            solve_instance(&instance, algorithm, config, sigma, output, visualize, verbose);
        }

        Commands::Analyze { instance } => {
            analyze_instance(&instance);
        }

        Commands::Benchmark { instance, runs, ants, iterations, output } => {
            run_benchmark(&instance, runs, ants, iterations, &output);
        }
    }
}

fn load_instance(path: &PathBuf) -> CvrpInstance {
    println!("Loading instance from {:?}...", path);

    match CvrpInstance::from_file(path) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_instance(
    path: &PathBuf,
    algorithm: Algorithm,
    config: AcoConfig,
    sigma: usize,
    output: Option<PathBuf>,
    visualize: Option<PathBuf>,
    verbose: bool,
) {
    let instance = load_instance(path);

    if verbose {
        println!("{}", instance.statistics());
    }

    let solution = match algorithm {
        Algorithm::Greedy => GreedySolver::solve(&instance),
        _ => {
            let strategy: Box<dyn DepositionStrategy> = match algorithm {
                Algorithm::Elitist => Box::new(ElitistTopK::new(config.pheromone_amount, sigma)),
                Algorithm::Rank => Box::new(RankWeighted::new(sigma)),
                _ => Box::new(Uniform::new(config.pheromone_amount)),
            };
            println!("Solving with {} ants, {} iterations...", config.ants_count, config.max_iterations);
            let mut solver = AntColonySolver::new(instance.clone(), config, strategy);
            solver.solve()
        }
    };

    let solution = match solution {
        Ok(solution) => solution,
        Err(e) => {
            eprintln!("Instance is infeasible: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", solution);

    if let Some(out_path) = output {
        export_solution(&solution, &out_path);
        println!("Solution saved to {:?}", out_path);
    }

    if let Some(svg_path) = visualize {
        let visualizer = Visualizer::new();
        if let Err(e) = visualizer.save_svg(&instance, &solution, &svg_path) {
            eprintln!("Failed to write SVG: {}", e);
        } else {
            println!("Visualization saved to {:?}", svg_path);
        }
    }
}

fn export_solution(solution: &Solution, path: &PathBuf) {
    match serde_json::to_string_pretty(solution) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                eprintln!("Failed to write solution: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to serialize solution: {}", e),
    }
}

fn analyze_instance(path: &PathBuf) {
    let instance = load_instance(path);
    println!("{}", instance.statistics());

    if let Err(e) = instance.check_demands() {
        println!("WARNING: {}", e);
    }
}

fn run_benchmark(path: &PathBuf, runs: usize, ants: usize, iterations: usize, output: &PathBuf) {
    let instance = load_instance(path);

    let config = BenchmarkConfig {
        num_runs: runs,
        base: AcoConfig {
            ants_count: ants,
            max_iterations: iterations,
            ..Default::default()
        },
        sigma: 5,
    };

    let mut benchmark = Benchmark::new(config);
    if let Err(e) = benchmark.run_instance(&instance) {
        eprintln!("Instance is infeasible: {}", e);
        std::process::exit(1);
    }

    benchmark.print_summary();

    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Failed to create output directory: {}", e);
        std::process::exit(1);
    }

    let results_path = output.join("results.csv");
    if let Err(e) = benchmark.export_to_csv(&results_path) {
        eprintln!("Failed to export results: {}", e);
    } else {
        println!("Results saved to {:?}", results_path);
    }

    let stats_path = output.join("statistics.csv");
    if let Err(e) = benchmark.export_statistics_csv(&stats_path) {
        eprintln!("Failed to export statistics: {}", e);
    } else {
        println!("Statistics saved to {:?}", stats_path);
    }
}
