//! Benchmarking and experimentation module for the CVRP solver.
//!
//! Runs the ACO variants and the greedy baseline repeatedly on an instance,
//! collects per-run results, aggregates statistics, and exports CSV files.

use crate::heuristics::aco::{AcoConfig, AntColonySolver};
use crate::heuristics::deposition::{DepositionStrategy, ElitistTopK, RankWeighted, Uniform};
use crate::heuristics::greedy::GreedySolver;
use crate::instance::{CvrpInstance, InfeasibleDemand};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Result of running a single algorithm once on an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    /// Algorithm name
    pub algorithm: String,
    /// Instance name
    pub instance: String,
    /// Instance dimension
    pub dimension: usize,
    /// Instance capacity
    pub capacity: i32,
    /// Seed used for this run (0 for deterministic algorithms)
    pub seed: u64,
    /// Solution cost
    pub cost: f64,
    /// Number of trips in the solution
    pub trips: usize,
    /// Computation time in seconds
    pub time: f64,
}

/// Aggregated statistics for one algorithm over all its runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    /// Algorithm name
    pub algorithm: String,
    /// Number of runs
    pub num_runs: usize,
    /// Average cost
    pub avg_cost: f64,
    /// Best cost
    pub best_cost: f64,
    /// Worst cost
    pub worst_cost: f64,
    /// Standard deviation of cost
    pub std_cost: f64,
    /// Average time per run
    pub avg_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of runs per stochastic algorithm
    pub num_runs: usize,
    /// Base colony configuration; each run gets its own derived seed
    pub base: AcoConfig,
    /// Sigma for the elitist and rank-weighted strategies
    pub sigma: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            base: AcoConfig::default(),
            sigma: 5,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<AlgorithmResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// All collected per-run results
    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }

    /// Run every ACO variant plus the greedy baseline on one instance
    pub fn run_instance(&mut self, instance: &CvrpInstance) -> Result<(), InfeasibleDemand> {
        log::info!("Running benchmark on instance: {}", instance.name);

        let greedy = GreedySolver::solve(instance)?;
        self.results.push(AlgorithmResult {
            algorithm: greedy.algorithm.clone(),
            instance: instance.name.clone(),
            dimension: instance.dimension,
            capacity: instance.capacity,
            seed: 0,
            cost: greedy.cost,
            trips: greedy.num_trips(instance),
            time: greedy.computation_time,
        });

        let variants: Vec<(&str, bool)> = vec![
            ("uniform", false),
            ("elitist", false),
            ("rank", false),
            ("uniform", true),
        ];

        let total = (variants.len() * self.config.num_runs) as u64;
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        for (variant, use_two_opt) in variants {
            for run in 0..self.config.num_runs {
                let mut config = self.config.base.clone();
                config.seed = self.config.base.seed.wrapping_add(run as u64);
                config.use_two_opt = use_two_opt;

                let strategy = self.build_strategy(variant);
                let seed = config.seed;
                let mut solver = AntColonySolver::new(instance.clone(), config, strategy);
                bar.set_message(solver.algorithm_name());

                let solution = solver.solve()?;
                self.results.push(AlgorithmResult {
                    algorithm: solution.algorithm.clone(),
                    instance: instance.name.clone(),
                    dimension: instance.dimension,
                    capacity: instance.capacity,
                    seed,
                    cost: solution.cost,
                    trips: solution.num_trips(instance),
                    time: solution.computation_time,
                });
                bar.inc(1);
            }
        }
        bar.finish_and_clear();

        Ok(())
    }

    fn build_strategy(&self, variant: &str) -> Box<dyn DepositionStrategy> {
        match variant {
            "elitist" => Box::new(ElitistTopK::new(
                self.config.base.pheromone_amount,
                self.config.sigma,
            )),
            "rank" => Box::new(RankWeighted::new(self.config.sigma)),
            _ => Box::new(Uniform::new(self.config.base.pheromone_amount)),
        }
    }

    /// Aggregate per-algorithm statistics over the collected results
    pub fn statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut grouped: BTreeMap<&str, Vec<&AlgorithmResult>> = BTreeMap::new();
        for result in &self.results {
            grouped.entry(&result.algorithm).or_default().push(result);
        }

        grouped
            .into_iter()
            .map(|(algorithm, results)| {
                let costs: Vec<f64> = results.iter().map(|r| r.cost).collect();
                let n = costs.len() as f64;
                let avg_cost = costs.iter().sum::<f64>() / n;
                let variance = costs.iter().map(|c| (c - avg_cost).powi(2)).sum::<f64>() / n;

                AlgorithmStatistics {
                    algorithm: algorithm.to_string(),
                    num_runs: results.len(),
                    avg_cost,
                    best_cost: costs.iter().cloned().fold(f64::INFINITY, f64::min),
                    worst_cost: costs.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
                    std_cost: variance.sqrt(),
                    avg_time: results.iter().map(|r| r.time).sum::<f64>() / n,
                }
            })
            .collect()
    }

    /// Export all per-run results to a CSV file
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Export aggregated statistics to a CSV file
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stats in self.statistics() {
            writer.serialize(stats)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Print a summary table of the aggregated statistics
    pub fn print_summary(&self) {
        println!(
            "{:<24} {:>6} {:>12} {:>12} {:>12} {:>10} {:>10}",
            "Algorithm", "Runs", "Avg cost", "Best", "Worst", "Std", "Avg time"
        );
        for stats in self.statistics() {
            println!(
                "{:<24} {:>6} {:>12.2} {:>12.2} {:>12.2} {:>10.2} {:>9.4}s",
                stats.algorithm,
                stats.num_runs,
                stats.avg_cost,
                stats.best_cost,
                stats.worst_cost,
                stats.std_cost,
                stats.avg_time,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Node;

    fn small_instance() -> CvrpInstance {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0),
            Node::new(1, 1.0, 0.0, 1),
            Node::new(2, 0.0, 1.0, 1),
            Node::new(3, 1.0, 1.0, 1),
        ];
        let distance_matrix = CvrpInstance::compute_distance_matrix(&nodes);

        CvrpInstance {
            name: "bench-test".to_string(),
            comment: String::new(),
            dimension: 4,
            capacity: 3,
            depot: 0,
            nodes,
            distance_matrix,
        }
    }

    #[test]
    fn test_benchmark_collects_all_runs() {
        let instance = small_instance();
        let config = BenchmarkConfig {
            num_runs: 2,
            base: AcoConfig {
                ants_count: 4,
                max_iterations: 5,
                ..Default::default()
            },
            sigma: 2,
        };

        let mut benchmark = Benchmark::new(config);
        benchmark.run_instance(&instance).unwrap();

        // 1 greedy run + 4 variants * 2 runs
        assert_eq!(benchmark.results().len(), 9);

        let stats = benchmark.statistics();
        // Greedy plus four distinct ACO variant labels
        assert_eq!(stats.len(), 5);
        for s in &stats {
            assert!(s.best_cost <= s.avg_cost);
            assert!(s.avg_cost <= s.worst_cost);
            assert!(s.std_cost >= 0.0);
        }
    }

    #[test]
    fn test_benchmark_propagates_infeasible() {
        let mut instance = small_instance();
        instance.nodes[1].demand = 99;

        let mut benchmark = Benchmark::new(BenchmarkConfig::default());
        assert!(benchmark.run_instance(&instance).is_err());
    }
}
