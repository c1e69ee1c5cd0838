//! Deterministic greedy baseline for the CVRP.
//!
//! Nearest-feasible-neighbor construction over a fleet of one vehicle per
//! customer: repeatedly assign the globally cheapest (vehicle, customer) pair
//! whose demand fits the vehicle's remaining capacity. No randomness, no
//! pheromone; used as a reference point for the colony solver.

use crate::instance::{CvrpInstance, InfeasibleDemand};
use crate::solution::Solution;

/// Per-vehicle construction state
#[derive(Debug, Clone)]
struct Vehicle {
    /// Node the vehicle currently stands on
    node: usize,
    /// Remaining capacity
    capacity: i32,
    /// Accumulated route cost
    cost: f64,
    /// Route built so far, starting at the depot
    path: Vec<usize>,
}

/// Greedy nearest-feasible-neighbor solver
pub struct GreedySolver;

impl GreedySolver {
    /// Construct a feasible solution deterministically.
    ///
    /// One vehicle per customer is a generous fleet bound; vehicles that end
    /// up unused contribute nothing to the final path. Ties between equally
    /// cheap assignments go to the first pair in scan order.
    pub fn solve(instance: &CvrpInstance) -> Result<Solution, InfeasibleDemand> {
        instance.check_demands()?;

        let start = std::time::Instant::now();
        let depot = instance.depot;

        let mut vehicles: Vec<Vehicle> = (0..instance.num_customers())
            .map(|_| Vehicle {
                node: depot,
                capacity: instance.capacity,
                cost: 0.0,
                path: vec![depot],
            })
            .collect();
        let mut unassigned = instance.customers();

        while !unassigned.is_empty() {
            let mut min_cost = f64::INFINITY;
            let mut best_pair: Option<(usize, usize)> = None;

            for (vi, vehicle) in vehicles.iter().enumerate() {
                for (ni, &node) in unassigned.iter().enumerate() {
                    let cost = instance.distance(vehicle.node, node);
                    if vehicle.capacity >= instance.demand(node) && cost < min_cost {
                        min_cost = cost;
                        best_pair = Some((vi, ni));
                    }
                }
            }

            // A fresh vehicle always fits any remaining customer once the
            // demand check passed, so a pair always exists
            let Some((vi, ni)) = best_pair else {
                break;
            };

            let node = unassigned.remove(ni);
            let vehicle = &mut vehicles[vi];
            vehicle.cost += instance.distance(vehicle.node, node);
            vehicle.capacity -= instance.demand(node);
            vehicle.node = node;
            vehicle.path.push(node);
        }

        let mut total_cost = 0.0;
        let mut full_path = vec![depot];

        for vehicle in &mut vehicles {
            if vehicle.node != depot {
                vehicle.cost += instance.distance(vehicle.node, depot);
                vehicle.node = depot;
                vehicle.path.push(depot);
            }
            total_cost += vehicle.cost;
            // Unused vehicles contribute no segment beyond the depot
            full_path.extend(vehicle.path.iter().skip(1));
        }

        let mut solution = Solution {
            path: full_path,
            cost: total_cost,
            algorithm: "Greedy".to_string(),
            computation_time: 0.0,
            iterations: None,
        };
        solution.computation_time = start.elapsed().as_secs_f64();

        Ok(solution)
    }
}
