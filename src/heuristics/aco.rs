//! Ant Colony Optimization for the CVRP.
//!
//! Each iteration a colony of ants builds capacity-respecting multi-trip
//! tours by probabilistic edge selection driven by cost and pheromone. The
//! field then evaporates uniformly and the configured deposition strategy
//! reinforces completed tours. The best tour ever seen is the answer.

use crate::heuristics::deposition::DepositionStrategy;
use crate::heuristics::local_search::TwoOptPass;
use crate::instance::{CvrpInstance, InfeasibleDemand};
use crate::pheromone::PheromoneField;
use crate::solution::Solution;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Colony configuration parameters
#[derive(Debug, Clone)]
pub struct AcoConfig {
    /// Number of ants per iteration
    pub ants_count: usize,
    /// Number of iterations
    pub max_iterations: usize,
    /// Exponent applied to the inverse edge cost in the selection weight
    pub alpha: f64,
    /// Exponent applied to the pheromone level in the selection weight
    pub beta: f64,
    /// Evaporation rate (rho), in (0, 1)
    pub evaporation_rate: f64,
    /// Amount of pheromone an ant distributes over its tour
    pub pheromone_amount: f64,
    /// Initial pheromone level on every edge
    pub initial_pheromone: f64,
    /// Apply a 2-opt pass to every constructed tour
    pub use_two_opt: bool,
    /// Random seed
    pub seed: u64,
}

impl Default for AcoConfig {
    fn default() -> Self {
        AcoConfig {
            ants_count: 50,
            max_iterations: 200,
            alpha: 2.0,
            beta: 5.0,
            evaporation_rate: 0.8,
            pheromone_amount: 20.0,
            initial_pheromone: 0.0,
            use_two_opt: false,
            seed: 42,
        }
    }
}

/// Transient per-construction state of one ant
#[derive(Debug, Clone)]
pub struct Ant {
    /// Node the ant currently stands on
    pub node: usize,
    /// Remaining capacity of the current trip
    pub capacity: i32,
    /// Accumulated cost of the edges traversed so far
    pub cost: f64,
    /// Nodes visited so far, starting at the depot
    pub path: Vec<usize>,
}

/// Lowest-cost tour observed across all iterations and ants
#[derive(Debug, Clone)]
pub struct BestSolution {
    pub cost: f64,
    pub path: Vec<usize>,
}

/// Ant Colony Optimization solver
pub struct AntColonySolver {
    config: AcoConfig,
    instance: CvrpInstance,
    strategy: Box<dyn DepositionStrategy>,
    pheromone: PheromoneField,
    best: Option<BestSolution>,
    rng: ChaCha8Rng,
}

impl AntColonySolver {
    pub fn new(
        instance: CvrpInstance,
        config: AcoConfig,
        strategy: Box<dyn DepositionStrategy>,
    ) -> Self {
        let pheromone = PheromoneField::new(instance.dimension, config.initial_pheromone);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        AntColonySolver {
            config,
            instance,
            strategy,
            pheromone,
            best: None,
            rng,
        }
    }

    /// Label of the configured variant, used as the solution's algorithm name
    pub fn algorithm_name(&self) -> String {
        if self.config.use_two_opt {
            format!("ACO-{}+2opt", self.strategy.name())
        } else {
            format!("ACO-{}", self.strategy.name())
        }
    }

    /// Run the iteration loop and return the best tour found.
    ///
    /// Fails fast with [`InfeasibleDemand`] before any construction if a
    /// customer cannot fit in an empty vehicle.
    pub fn solve(&mut self) -> Result<Solution, InfeasibleDemand> {
        self.instance.check_demands()?;

        let start = std::time::Instant::now();
        let refiner = TwoOptPass::new();

        for iteration in 0..self.config.max_iterations {
            // One sub-seed per ant, drawn from the master stream: every ant
            // has its own fixed random sequence, so the colony can be built
            // in parallel without losing determinism.
            let seeds: Vec<u64> = (0..self.config.ants_count)
                .map(|_| self.rng.gen())
                .collect();

            let instance = &self.instance;
            let config = &self.config;
            let pheromone = &self.pheromone;

            let ants: Vec<Ant> = seeds
                .into_par_iter()
                .map(|seed| {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    let mut ant = construct_tour(instance, pheromone, config, &mut rng);
                    if config.use_two_opt {
                        refiner.refine(instance, &mut ant.path, &mut ant.cost);
                    }
                    ant
                })
                .collect();

            for ant in &ants {
                if self.best.as_ref().map_or(true, |best| ant.cost < best.cost) {
                    self.best = Some(BestSolution {
                        cost: ant.cost,
                        path: ant.path.clone(),
                    });
                }
            }

            // Evaporate everything, then deposit: the order is fixed
            self.pheromone.evaporate(self.config.evaporation_rate);
            self.strategy
                .deposit(&mut self.pheromone, &ants, self.best.as_ref());

            if let Some(best) = &self.best {
                log::debug!("iteration {}: best cost {:.2}", iteration, best.cost);
            }
        }

        let mut solution = match &self.best {
            Some(best) => Solution {
                path: best.path.clone(),
                cost: best.cost,
                algorithm: self.algorithm_name(),
                computation_time: 0.0,
                iterations: None,
            },
            None => Solution::new(),
        };
        solution.computation_time = start.elapsed().as_secs_f64();
        solution.iterations = Some(self.config.max_iterations);

        Ok(solution)
    }

    /// Best tour found so far, if any
    pub fn best_solution(&self) -> Option<&BestSolution> {
        self.best.as_ref()
    }
}

/// Build one complete multi-trip tour for one ant
fn construct_tour(
    instance: &CvrpInstance,
    pheromone: &PheromoneField,
    config: &AcoConfig,
    rng: &mut ChaCha8Rng,
) -> Ant {
    let depot = instance.depot;
    let mut ant = Ant {
        node: depot,
        capacity: instance.capacity,
        cost: 0.0,
        path: vec![depot],
    };
    let mut unvisited = instance.customers();
    if unvisited.is_empty() {
        return ant;
    }

    // The first customer is drawn uniformly, seeding exploration diversity
    let first = unvisited.remove(rng.gen_range(0..unvisited.len()));
    ant.cost += instance.distance(depot, first);
    ant.capacity -= instance.demand(first);
    ant.node = first;
    ant.path.push(first);

    while !unvisited.is_empty() {
        match select_next_node(instance, pheromone, config, rng, ant.node, ant.capacity, &unvisited) {
            Some(idx) => {
                let next = unvisited.remove(idx);
                ant.cost += instance.distance(ant.node, next);
                ant.capacity -= instance.demand(next);
                ant.node = next;
                ant.path.push(next);
            }
            None => {
                // No unvisited customer fits the remaining capacity:
                // return to the depot, refill, start a new trip
                ant.cost += instance.distance(ant.node, depot);
                ant.capacity = instance.capacity;
                ant.node = depot;
                ant.path.push(depot);
            }
        }
    }

    // Close the tour at the depot
    ant.cost += instance.distance(ant.node, depot);
    ant.node = depot;
    ant.path.push(depot);

    ant
}

/// Selection weights over the capacity-feasible unvisited customers.
///
/// The raw desirability of a candidate is `(1/cost)^alpha * pheromone^beta`.
/// Zero-cost edges are excluded from every divisor term. When the raw
/// desirability sum over all unvisited nodes is zero (all pheromone has
/// evaporated and none was deposited yet), the weights fall back to the
/// inverse edge cost alone. Terms are accumulated in unvisited-list order so
/// a fixed seed reproduces the exact floating-point sums.
///
/// Returns `(index into unvisited, weight)` pairs; empty when no feasible
/// candidate exists. Because zero-cost edges are skipped, a customer sitting
/// at the exact coordinates of the current node is never a candidate; callers
/// assume instances keep customers at distinct positions from the depot and
/// from each other.
fn selection_weights(
    instance: &CvrpInstance,
    pheromone: &PheromoneField,
    config: &AcoConfig,
    current: usize,
    capacity: i32,
    unvisited: &[usize],
) -> Vec<(usize, f64)> {
    let mut desirability_sum = 0.0;
    let mut inverse_cost_sum = 0.0;
    for &node in unvisited {
        let cost = instance.distance(current, node);
        if cost > 0.0 {
            desirability_sum += (1.0 / cost).powf(config.alpha)
                * pheromone.level(current, node).powf(config.beta);
            inverse_cost_sum += 1.0 / cost;
        }
    }

    let mut weights = Vec::new();
    if desirability_sum == 0.0 {
        for (idx, &node) in unvisited.iter().enumerate() {
            if instance.demand(node) <= capacity {
                let cost = instance.distance(current, node);
                if cost > 0.0 {
                    weights.push((idx, 1.0 / (cost * inverse_cost_sum)));
                }
            }
        }
    } else {
        for (idx, &node) in unvisited.iter().enumerate() {
            if instance.demand(node) <= capacity {
                let cost = instance.distance(current, node);
                if cost > 0.0 {
                    let desirability = (1.0 / cost).powf(config.alpha)
                        * pheromone.level(current, node).powf(config.beta);
                    weights.push((idx, desirability / desirability_sum));
                }
            }
        }
    }

    weights
}

/// Draw the next customer from the weighted distribution.
///
/// Returns the index into `unvisited`, or `None` when no unvisited customer
/// is capacity-feasible (the ant must return to the depot).
fn select_next_node(
    instance: &CvrpInstance,
    pheromone: &PheromoneField,
    config: &AcoConfig,
    rng: &mut ChaCha8Rng,
    current: usize,
    capacity: i32,
    unvisited: &[usize],
) -> Option<usize> {
    let weights = selection_weights(instance, pheromone, config, current, capacity, unvisited);
    if weights.is_empty() {
        return None;
    }

    let total: f64 = weights.iter().map(|&(_, w)| w).sum();
    if total == 0.0 {
        // Every candidate weight vanished: draw uniformly
        let idx = rng.gen_range(0..weights.len());
        return Some(weights[idx].0);
    }

    // Inverse-CDF sampling over the unnormalized weights
    let mut pick = rng.gen::<f64>() * total;
    for &(idx, weight) in &weights {
        pick -= weight;
        if pick <= 0.0 {
            return Some(idx);
        }
    }

    weights.last().map(|&(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::deposition::{ElitistTopK, RankWeighted, Uniform};
    use crate::instance::Node;

    /// Depot and two unit-demand customers at pairwise distance 1; the only
    /// optimal tour serves both customers in a single trip, cost 3
    fn triangle_instance() -> CvrpInstance {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0),
            Node::new(1, 1.0, 0.0, 1),
            Node::new(2, 0.5, 0.75_f64.sqrt(), 1),
        ];
        let distance_matrix = CvrpInstance::compute_distance_matrix(&nodes);

        CvrpInstance {
            name: "triangle".to_string(),
            comment: String::new(),
            dimension: 3,
            capacity: 2,
            depot: 0,
            nodes,
            distance_matrix,
        }
    }

    fn larger_instance() -> CvrpInstance {
        let coords = [
            (0.0, 0.0),
            (2.0, 1.0),
            (3.0, 4.0),
            (-1.0, 2.0),
            (-3.0, -2.0),
            (1.0, -3.0),
            (4.0, -1.0),
        ];
        let demands = [0, 3, 4, 2, 5, 3, 4];
        let nodes: Vec<Node> = coords
            .iter()
            .zip(demands.iter())
            .enumerate()
            .map(|(id, (&(x, y), &demand))| Node::new(id, x, y, demand))
            .collect();
        let distance_matrix = CvrpInstance::compute_distance_matrix(&nodes);

        CvrpInstance {
            name: "seven".to_string(),
            comment: String::new(),
            dimension: 7,
            capacity: 8,
            depot: 0,
            nodes,
            distance_matrix,
        }
    }

    #[test]
    fn test_triangle_optimum() {
        let instance = triangle_instance();
        let config = AcoConfig {
            ants_count: 5,
            max_iterations: 10,
            ..Default::default()
        };
        let strategy = Uniform::new(config.pheromone_amount);

        let mut solver = AntColonySolver::new(instance.clone(), config, Box::new(strategy));
        let solution = solver.solve().unwrap();

        assert!(solution.is_valid(&instance));
        assert!((solution.cost - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_constructed_tours_are_valid() {
        let instance = larger_instance();
        for use_two_opt in [false, true] {
            let config = AcoConfig {
                ants_count: 10,
                max_iterations: 20,
                use_two_opt,
                ..Default::default()
            };
            let strategy = Uniform::new(config.pheromone_amount);

            let mut solver = AntColonySolver::new(instance.clone(), config, Box::new(strategy));
            let solution = solver.solve().unwrap();

            assert!(solution.is_valid(&instance));
        }
    }

    #[test]
    fn test_all_strategies_produce_valid_tours() {
        let instance = larger_instance();
        let strategies: Vec<Box<dyn DepositionStrategy>> = vec![
            Box::new(Uniform::new(20.0)),
            Box::new(ElitistTopK::new(20.0, 3)),
            Box::new(RankWeighted::new(3)),
        ];

        for strategy in strategies {
            let config = AcoConfig {
                ants_count: 8,
                max_iterations: 15,
                ..Default::default()
            };
            let mut solver = AntColonySolver::new(instance.clone(), config, strategy);
            let solution = solver.solve().unwrap();
            assert!(solution.is_valid(&instance));
        }
    }

    #[test]
    fn test_determinism_with_fixed_seed() {
        let instance = larger_instance();
        let run = |seed: u64| {
            let config = AcoConfig {
                ants_count: 12,
                max_iterations: 25,
                use_two_opt: true,
                seed,
                ..Default::default()
            };
            let strategy = RankWeighted::new(4);
            let mut solver =
                AntColonySolver::new(instance.clone(), config, Box::new(strategy));
            solver.solve().unwrap()
        };

        let first = run(7);
        let second = run(7);
        assert_eq!(first.cost, second.cost);
        assert_eq!(first.path, second.path);

        let other = run(8);
        // Different seeds explore differently; paths usually diverge
        assert!(other.is_valid(&instance));
    }

    #[test]
    fn test_best_cost_never_regresses() {
        let instance = larger_instance();
        let config = AcoConfig {
            ants_count: 6,
            max_iterations: 1,
            ..Default::default()
        };

        // Run the loop manually for several iterations and watch the best
        let mut solver = AntColonySolver::new(
            instance.clone(),
            config.clone(),
            Box::new(Uniform::new(config.pheromone_amount)),
        );
        let mut previous = f64::INFINITY;
        for _ in 0..10 {
            solver.solve().unwrap();
            let best = solver.best_solution().unwrap().cost;
            assert!(best <= previous);
            previous = best;
        }
    }

    #[test]
    fn test_infeasible_demand_fails_fast() {
        let mut instance = triangle_instance();
        instance.nodes[1].demand = 5;

        let config = AcoConfig::default();
        let strategy = Uniform::new(config.pheromone_amount);
        let mut solver = AntColonySolver::new(instance, config, Box::new(strategy));

        let err = solver.solve().unwrap_err();
        assert_eq!(err.node, 1);
        assert_eq!(err.demand, 5);
        assert_eq!(err.capacity, 2);
    }

    #[test]
    fn test_capacity_forces_multiple_trips() {
        let mut instance = triangle_instance();
        // Capacity 1: each customer needs its own trip
        instance.capacity = 1;

        let config = AcoConfig {
            ants_count: 4,
            max_iterations: 5,
            ..Default::default()
        };
        let strategy = Uniform::new(config.pheromone_amount);
        let mut solver = AntColonySolver::new(instance.clone(), config, Box::new(strategy));
        let solution = solver.solve().unwrap();

        assert!(solution.is_valid(&instance));
        assert_eq!(solution.num_trips(&instance), 2);
        // Two out-and-back trips of length 2 each
        assert!((solution.cost - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_selection_falls_back_without_pheromone() {
        let instance = triangle_instance();
        let config = AcoConfig::default();
        // Initial pheromone is zero, so every desirability term vanishes
        let pheromone = PheromoneField::new(instance.dimension, 0.0);

        let weights = selection_weights(&instance, &pheromone, &config, 0, 2, &[1, 2]);
        assert_eq!(weights.len(), 2);
        assert!(weights.iter().all(|&(_, w)| w > 0.0));

        // Both customers are at distance 1, so the fallback weights are equal
        assert!((weights[0].1 - weights[1].1).abs() < 1e-12);
    }

    #[test]
    fn test_selection_respects_capacity() {
        let instance = triangle_instance();
        let config = AcoConfig::default();
        let pheromone = PheromoneField::new(instance.dimension, 1.0);

        // Remaining capacity 0: nothing fits, the ant must return
        let weights = selection_weights(&instance, &pheromone, &config, 1, 0, &[2]);
        assert!(weights.is_empty());

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pick = select_next_node(&instance, &pheromone, &config, &mut rng, 1, 0, &[2]);
        assert!(pick.is_none());
    }
}
