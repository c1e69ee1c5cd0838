//! Solution representation and validation for the CVRP.
//!
//! A solution is a single multi-trip path: it starts and ends at the depot,
//! visits every customer exactly once, and every depot-to-depot trip respects
//! the vehicle capacity.

use crate::instance::CvrpInstance;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Represents a solution to the CVRP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The full path as a sequence of node indices, starting and ending at
    /// the depot; intermediate depot visits separate trips
    pub path: Vec<usize>,
    /// Total travel cost (sum of consecutive edge costs)
    pub cost: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
}

impl Solution {
    /// Create a new empty solution
    pub fn new() -> Self {
        Solution {
            path: Vec::new(),
            cost: f64::INFINITY,
            algorithm: String::new(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Create a solution from a path, computing its cost
    pub fn from_path(instance: &CvrpInstance, path: Vec<usize>, algorithm: &str) -> Self {
        let cost = instance.path_cost(&path);

        Solution {
            path,
            cost,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Split the path into trips: maximal sub-sequences between two
    /// consecutive depot visits, with the depot endpoints included
    pub fn trips(&self, instance: &CvrpInstance) -> Vec<Vec<usize>> {
        let depot = instance.depot;
        let mut trips = Vec::new();
        let mut current: Vec<usize> = Vec::new();

        for &node in &self.path {
            if node == depot {
                if current.len() > 1 {
                    current.push(depot);
                    trips.push(current);
                }
                current = vec![depot];
            } else {
                current.push(node);
            }
        }

        trips
    }

    /// Demand served by each trip
    pub fn trip_demands(&self, instance: &CvrpInstance) -> Vec<i32> {
        self.trips(instance)
            .iter()
            .map(|trip| trip.iter().map(|&v| instance.demand(v)).sum())
            .collect()
    }

    /// Check that the path starts and ends at the depot, visits every
    /// customer exactly once, and that no trip exceeds the capacity
    pub fn is_valid(&self, instance: &CvrpInstance) -> bool {
        let depot = instance.depot;

        if self.path.len() < 2 || self.path[0] != depot || *self.path.last().unwrap() != depot {
            return false;
        }

        let visited: Vec<usize> = self.path.iter().cloned().filter(|&v| v != depot).collect();
        let unique: HashSet<usize> = visited.iter().cloned().collect();
        if visited.len() != unique.len() || unique.len() != instance.num_customers() {
            return false;
        }

        self.trip_demands(instance).iter().all(|&d| d <= instance.capacity)
    }

    /// Number of non-empty trips in the solution
    pub fn num_trips(&self, instance: &CvrpInstance) -> usize {
        self.trips(instance).len()
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        writeln!(f, "  Path: {:?}", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Node;

    fn test_instance() -> CvrpInstance {
        let nodes = vec![
            Node::new(0, 0.0, 0.0, 0),
            Node::new(1, 1.0, 0.0, 3),
            Node::new(2, 0.0, 1.0, 4),
            Node::new(3, 1.0, 1.0, 5),
        ];
        let distance_matrix = CvrpInstance::compute_distance_matrix(&nodes);

        CvrpInstance {
            name: "test".to_string(),
            comment: String::new(),
            dimension: 4,
            capacity: 7,
            depot: 0,
            nodes,
            distance_matrix,
        }
    }

    #[test]
    fn test_solution_creation() {
        let sol = Solution::new();
        assert!(sol.path.is_empty());
        assert_eq!(sol.cost, f64::INFINITY);
    }

    #[test]
    fn test_trips_split() {
        let instance = test_instance();
        let sol = Solution::from_path(&instance, vec![0, 1, 2, 0, 3, 0], "test");

        let trips = sol.trips(&instance);
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0], vec![0, 1, 2, 0]);
        assert_eq!(trips[1], vec![0, 3, 0]);
        assert_eq!(sol.trip_demands(&instance), vec![7, 5]);
    }

    #[test]
    fn test_valid_solution() {
        let instance = test_instance();
        let sol = Solution::from_path(&instance, vec![0, 1, 2, 0, 3, 0], "test");
        assert!(sol.is_valid(&instance));
    }

    #[test]
    fn test_invalid_solutions() {
        let instance = test_instance();

        // Capacity exceeded on the single trip (3 + 4 + 5 > 7)
        let over = Solution::from_path(&instance, vec![0, 1, 2, 3, 0], "test");
        assert!(!over.is_valid(&instance));

        // Customer 3 never visited
        let missing = Solution::from_path(&instance, vec![0, 1, 2, 0], "test");
        assert!(!missing.is_valid(&instance));

        // Customer 1 visited twice
        let duplicated = Solution::from_path(&instance, vec![0, 1, 2, 0, 1, 3, 0], "test");
        assert!(!duplicated.is_valid(&instance));

        // Does not end at the depot
        let open = Solution::from_path(&instance, vec![0, 1, 2, 0, 3], "test");
        assert!(!open.is_valid(&instance));
    }
}
