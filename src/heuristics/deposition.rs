//! Pheromone deposition strategies.
//!
//! Every strategy runs after the uniform evaporation step of an iteration and
//! only ever adds pheromone. The colony solver holds a strategy value and
//! invokes it uniformly, so the reinforcement policy can be swapped without
//! touching the iteration loop.

use crate::heuristics::aco::{Ant, BestSolution};
use crate::pheromone::PheromoneField;
use ordered_float::OrderedFloat;

/// Policy controlling how much pheromone each completed tour contributes
pub trait DepositionStrategy: Send + Sync {
    /// Deposit pheromone from the colony's tours (and possibly the best tour
    /// found so far) onto the field
    fn deposit(&self, field: &mut PheromoneField, ants: &[Ant], best: Option<&BestSolution>);
    fn name(&self) -> &str;
}

/// Ants sorted by ascending tour cost, cheapest first. Stable, so colony
/// order breaks ties.
fn rank_by_cost(ants: &[Ant]) -> Vec<&Ant> {
    let mut ranked: Vec<&Ant> = ants.iter().collect();
    ranked.sort_by_key(|ant| OrderedFloat(ant.cost));
    ranked
}

/// Every ant in the colony deposits `pheromone_amount / cost` on its path
pub struct Uniform {
    pheromone_amount: f64,
}

impl Uniform {
    pub fn new(pheromone_amount: f64) -> Self {
        Uniform { pheromone_amount }
    }
}

impl DepositionStrategy for Uniform {
    fn deposit(&self, field: &mut PheromoneField, ants: &[Ant], _best: Option<&BestSolution>) {
        for ant in ants {
            field.deposit_path(&ant.path, self.pheromone_amount / ant.cost);
        }
    }

    fn name(&self) -> &str {
        "Uniform"
    }
}

/// Only the `sigma` cheapest ants of the colony deposit, each contributing
/// `pheromone_amount / cost`
pub struct ElitistTopK {
    pheromone_amount: f64,
    sigma: usize,
}

impl ElitistTopK {
    pub fn new(pheromone_amount: f64, sigma: usize) -> Self {
        ElitistTopK { pheromone_amount, sigma }
    }
}

impl DepositionStrategy for ElitistTopK {
    fn deposit(&self, field: &mut PheromoneField, ants: &[Ant], _best: Option<&BestSolution>) {
        for ant in rank_by_cost(ants).into_iter().take(self.sigma) {
            field.deposit_path(&ant.path, self.pheromone_amount / ant.cost);
        }
    }

    fn name(&self) -> &str {
        "Elitist"
    }
}

/// Rank-weighted deposition with reinforcement of the best tour found so far.
///
/// The `sigma` cheapest ants deposit `(sigma - rank) / cost` (rank 0 = best of
/// the colony). The globally best tour additionally deposits
/// `sigma / best_cost` on its own edges every iteration, whether or not the
/// colony improved in this round.
pub struct RankWeighted {
    sigma: usize,
}

impl RankWeighted {
    pub fn new(sigma: usize) -> Self {
        RankWeighted { sigma }
    }
}

impl DepositionStrategy for RankWeighted {
    fn deposit(&self, field: &mut PheromoneField, ants: &[Ant], best: Option<&BestSolution>) {
        for (rank, ant) in rank_by_cost(ants).into_iter().take(self.sigma).enumerate() {
            field.deposit_path(&ant.path, (self.sigma - rank) as f64 / ant.cost);
        }
        if let Some(best) = best {
            field.deposit_path(&best.path, self.sigma as f64 / best.cost);
        }
    }

    fn name(&self) -> &str {
        "RankWeighted"
    }
}
