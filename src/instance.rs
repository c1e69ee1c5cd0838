//! Module for parsing and representing CVRP instances.
//!
//! This module handles the TSPLIB-style `.vrp` files used for the Capacitated VRP.
//! It supports Euclidean 2D distances and manages node coordinates, customer
//! demands, the depot, and the vehicle capacity.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use serde::{Deserialize, Serialize};

/// Represents a node in the CVRP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier (1-indexed in files, 0-indexed internally)
    pub id: usize,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Amount of goods requested at this node (0 for the depot)
    pub demand: i32,
}

impl Node {
    pub fn new(id: usize, x: f64, y: f64, demand: i32) -> Self {
        Node { id, x, y, demand }
    }
}

/// Error raised when a single customer's demand exceeds the vehicle capacity.
///
/// No feasible visit of that customer exists, so route construction is
/// rejected before it begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfeasibleDemand {
    /// Offending customer node (internal 0-based id)
    pub node: usize,
    /// The customer's demand
    pub demand: i32,
    /// The vehicle capacity
    pub capacity: i32,
}

impl std::fmt::Display for InfeasibleDemand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "customer {} has demand {} exceeding vehicle capacity {}",
            self.node, self.demand, self.capacity
        )
    }
}

impl std::error::Error for InfeasibleDemand {}

/// Represents a complete CVRP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvrpInstance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    /// Number of nodes (including depot)
    pub dimension: usize,
    /// Vehicle capacity
    pub capacity: i32,
    /// Depot node (0-indexed internally)
    pub depot: usize,
    /// List of all nodes
    pub nodes: Vec<Node>,
    /// Precomputed distance matrix
    #[serde(skip)]
    pub distance_matrix: Vec<Vec<f64>>,
}

impl CvrpInstance {
    /// Parse a CVRP instance from a TSPLIB format `.vrp` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = File::open(&path)
            .map_err(|e| format!("Cannot open file: {}", e))?;
        let reader = BufReader::new(file);

        let mut name = String::new();
        let mut comment = String::new();
        let mut capacity = 0i32;
        let mut depot: Option<usize> = None;
        let mut coords: Vec<(usize, f64, f64)> = Vec::new();
        let mut demands: Vec<(usize, i32)> = Vec::new();

        let mut section = String::new();

        for line in reader.lines() {
            let line = line.map_err(|e| format!("Read error: {}", e))?;
            let line = line.trim();

            if line.is_empty() || line == "EOF" {
                continue;
            }

            if let Some(value) = keyword_value(line, "NAME") {
                name = value;
                continue;
            }
            if let Some(value) = keyword_value(line, "COMMENT") {
                comment = value;
                continue;
            }
            if let Some(value) = keyword_value(line, "CAPACITY") {
                capacity = value.parse().map_err(|_| "Invalid capacity")?;
                continue;
            }
            if let Some(value) = keyword_value(line, "EDGE_WEIGHT_TYPE") {
                if !value.ends_with("EUC_2D") {
                    return Err(format!("Unsupported edge weight type: {}", value));
                }
                continue;
            }
            if keyword_value(line, "DIMENSION").is_some() {
                // Recomputed from the coordinate section below
                continue;
            }

            if line.starts_with("NODE_COORD_SECTION") {
                section = "coords".to_string();
                continue;
            }
            if line.starts_with("DEMAND_SECTION") {
                section = "demands".to_string();
                continue;
            }
            if line.starts_with("DEPOT_SECTION") {
                section = "depot".to_string();
                continue;
            }

            match section.as_str() {
                "coords" => {
                    let parts: Vec<&str> = line.split_whitespace().collect();
                    if parts.len() >= 3 {
                        let id: usize = parts[0].parse().map_err(|_| "Invalid node id")?;
                        let x: f64 = parts[1].parse().map_err(|_| "Invalid x coordinate")?;
                        let y: f64 = parts[2].parse().map_err(|_| "Invalid y coordinate")?;
                        coords.push((id, x, y));
                    }
                }
                "demands" => {
                    let parts: Vec<&str> = line.split_whitespace().collect();
                    if parts.len() >= 2 {
                        let id: usize = parts[0].parse().map_err(|_| "Invalid node id")?;
                        let demand: i32 = parts[1].parse().map_err(|_| "Invalid demand")?;
                        demands.push((id, demand));
                    }
                }
                "depot" => {
                    let value: i64 = line.parse().map_err(|_| "Invalid depot id")?;
                    if value == -1 {
                        section.clear();
                    } else {
                        depot = Some(value as usize - 1);
                    }
                }
                _ => {}
            }
        }

        if coords.is_empty() {
            return Err("No NODE_COORD_SECTION found".to_string());
        }
        if capacity <= 0 {
            return Err("Missing or non-positive CAPACITY".to_string());
        }
        let depot = depot.ok_or("No DEPOT_SECTION found")?;

        let mut nodes = Vec::with_capacity(coords.len());
        for (id, x, y) in &coords {
            let demand = demands.iter()
                .find(|(did, _)| did == id)
                .map(|(_, d)| *d)
                .unwrap_or(0);
            nodes.push(Node::new(id - 1, *x, *y, demand));
        }

        let distance_matrix = Self::compute_distance_matrix(&nodes);

        Ok(CvrpInstance {
            name,
            comment,
            dimension: nodes.len(),
            capacity,
            depot,
            nodes,
            distance_matrix,
        })
    }

    /// Compute Euclidean distance matrix
    pub fn compute_distance_matrix(nodes: &[Node]) -> Vec<Vec<f64>> {
        let n = nodes.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let dx = nodes[i].x - nodes[j].x;
                    let dy = nodes[i].y - nodes[j].y;
                    matrix[i][j] = (dx * dx + dy * dy).sqrt();
                }
            }
        }

        matrix
    }

    /// Get the travel cost between two nodes
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance_matrix[i][j]
    }

    /// Get the demand of a node
    #[inline]
    pub fn demand(&self, node: usize) -> i32 {
        self.nodes[node].demand
    }

    /// Get the number of customer nodes (excluding depot)
    pub fn num_customers(&self) -> usize {
        self.dimension - 1
    }

    /// Customer node ids in ascending order (all nodes except the depot)
    pub fn customers(&self) -> Vec<usize> {
        (0..self.dimension).filter(|&v| v != self.depot).collect()
    }

    /// Sum of all customer demands
    pub fn total_demand(&self) -> i32 {
        self.nodes.iter()
            .filter(|n| n.id != self.depot)
            .map(|n| n.demand)
            .sum()
    }

    /// Lower bound on the number of trips needed to serve all customers
    pub fn min_trips(&self) -> usize {
        let total = self.total_demand().max(0) as usize;
        let cap = self.capacity as usize;
        (total + cap - 1) / cap
    }

    /// Verify that every customer can be served by a single vehicle visit.
    ///
    /// A customer whose demand exceeds the capacity makes the instance
    /// unsolvable; this is checked once before any construction starts.
    pub fn check_demands(&self) -> Result<(), InfeasibleDemand> {
        for node in &self.nodes {
            if node.id != self.depot && node.demand > self.capacity {
                return Err(InfeasibleDemand {
                    node: node.id,
                    demand: node.demand,
                    capacity: self.capacity,
                });
            }
        }
        Ok(())
    }

    /// Calculate the total cost of a path (sum of consecutive edge costs)
    pub fn path_cost(&self, path: &[usize]) -> f64 {
        if path.len() < 2 {
            return 0.0;
        }

        let mut cost = 0.0;
        for i in 0..path.len() - 1 {
            cost += self.distance(path[i], path[i + 1]);
        }

        cost
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let mut distances: Vec<f64> = Vec::new();
        for i in 0..self.dimension {
            for j in i + 1..self.dimension {
                distances.push(self.distance(i, j));
            }
        }
        let avg_distance = if distances.is_empty() {
            0.0
        } else {
            distances.iter().sum::<f64>() / distances.len() as f64
        };
        let max_distance = distances.iter().cloned().fold(0.0, f64::max);

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension,
            capacity: self.capacity,
            total_demand: self.total_demand(),
            min_trips: self.min_trips(),
            avg_distance,
            max_distance,
        }
    }
}

/// Extract the value of a `KEYWORD : value` header line, tolerating the
/// spacing variants found in TSPLIB files (`NAME: x`, `NAME : x`)
fn keyword_value(line: &str, keyword: &str) -> Option<String> {
    let rest = line.strip_prefix(keyword)?;
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':')?;
    Some(rest.trim().to_string())
}

/// Statistics about a CVRP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub capacity: i32,
    pub total_demand: i32,
    pub min_trips: usize,
    pub avg_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Nodes: {} (1 depot + {} customers)", self.dimension, self.dimension - 1)?;
        writeln!(f, "  Capacity: {}", self.capacity)?;
        writeln!(f, "  Total demand: {}", self.total_demand)?;
        writeln!(f, "  Min trips: {}", self.min_trips)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}
