//! CVRP-ACO Solver Library
//!
//! A solver for the Capacitated Vehicle Routing Problem (CVRP) based on
//! Ant Colony Optimization.
//!
//! # Features
//!
//! - Probabilistic route construction driven by edge cost and pheromone
//! - Pluggable pheromone deposition strategies (uniform, elitist top-k, rank-weighted)
//! - Optional single-pass 2-opt refinement of each constructed tour
//! - Deterministic greedy nearest-feasible-neighbor baseline
//! - Benchmarking, CSV export, and SVG visualization tools
//!
//! # Example
//!
//! ```no_run
//! use cvrp_aco::instance::CvrpInstance;
//! use cvrp_aco::heuristics::aco::{AntColonySolver, AcoConfig};
//! use cvrp_aco::heuristics::deposition::Uniform;
//!
//! // Load instance
//! let instance = CvrpInstance::from_file("n32.vrp").unwrap();
//!
//! // Solve with the basic ant system
//! let config = AcoConfig { ants_count: 50, max_iterations: 200, ..Default::default() };
//! let strategy = Uniform::new(config.pheromone_amount);
//! let mut solver = AntColonySolver::new(instance, config, Box::new(strategy));
//! let solution = solver.solve().unwrap();
//!
//! println!("Best cost: {:.2}", solution.cost);
//! ```

pub mod instance;
pub mod solution;
pub mod pheromone;
pub mod heuristics;
pub mod benchmark;
pub mod visualization;

pub use instance::CvrpInstance;
pub use solution::Solution;
