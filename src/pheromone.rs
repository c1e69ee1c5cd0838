//! Pheromone field layered on top of the instance's cost graph.
//!
//! Stores one non-negative desirability value per undirected edge. The field
//! is owned by the colony solver for the duration of one run and is only
//! mutated through evaporation and deposition.

/// Per-edge pheromone levels, stored as a dense symmetric matrix
#[derive(Debug, Clone)]
pub struct PheromoneField {
    levels: Vec<Vec<f64>>,
}

impl PheromoneField {
    /// Create a field over `n` nodes with every edge at `initial`
    pub fn new(n: usize, initial: f64) -> Self {
        PheromoneField {
            levels: vec![vec![initial; n]; n],
        }
    }

    /// Pheromone level on the edge between `u` and `v`
    #[inline]
    pub fn level(&self, u: usize, v: usize) -> f64 {
        self.levels[u][v]
    }

    /// Multiply every edge's level by `1 - rho`
    pub fn evaporate(&mut self, rho: f64) {
        for row in &mut self.levels {
            for level in row.iter_mut() {
                *level *= 1.0 - rho;
            }
        }
    }

    /// Add `amount` to the edge between `u` and `v` (both directions)
    #[inline]
    pub fn deposit(&mut self, u: usize, v: usize, amount: f64) {
        self.levels[u][v] += amount;
        self.levels[v][u] += amount;
    }

    /// Add `amount` to every edge along a path
    pub fn deposit_path(&mut self, path: &[usize], amount: f64) {
        for pair in path.windows(2) {
            self.deposit(pair[0], pair[1], amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_level() {
        let field = PheromoneField::new(3, 0.5);
        assert_eq!(field.level(0, 1), 0.5);
        assert_eq!(field.level(2, 1), 0.5);
    }

    #[test]
    fn test_evaporation_monotone() {
        let mut field = PheromoneField::new(3, 1.0);

        let mut previous = field.level(0, 1);
        for _ in 0..50 {
            field.evaporate(0.2);
            let current = field.level(0, 1);
            assert!(current < previous);
            assert!(current >= 0.0);
            previous = current;
        }
        // Decays toward zero but never reaches a negative value
        assert!(previous < 1e-4);
    }

    #[test]
    fn test_deposit_additive_and_symmetric() {
        let mut field = PheromoneField::new(3, 0.0);

        field.deposit(0, 1, 0.3);
        field.deposit(0, 1, 0.2);
        assert!((field.level(0, 1) - 0.5).abs() < 1e-12);
        assert!((field.level(1, 0) - 0.5).abs() < 1e-12);
        assert_eq!(field.level(0, 2), 0.0);
    }

    #[test]
    fn test_deposit_path() {
        let mut field = PheromoneField::new(4, 0.0);

        field.deposit_path(&[0, 1, 2, 0], 1.0);
        assert_eq!(field.level(0, 1), 1.0);
        assert_eq!(field.level(1, 2), 1.0);
        assert_eq!(field.level(2, 0), 1.0);
        assert_eq!(field.level(1, 3), 0.0);
    }

    #[test]
    fn test_deposit_path_counts_each_traversal() {
        let mut field = PheromoneField::new(3, 0.0);

        // An out-and-back trip crosses the same undirected edge twice
        field.deposit_path(&[0, 1, 0], 1.0);
        assert_eq!(field.level(0, 1), 2.0);
        assert_eq!(field.level(1, 0), 2.0);
    }

    #[test]
    fn test_evaporate_then_deposit_never_negative() {
        let mut field = PheromoneField::new(2, 0.0);
        field.deposit(0, 1, 1.0);
        field.evaporate(0.9);
        assert!(field.level(0, 1) > 0.0);
        assert!((field.level(0, 1) - 0.1).abs() < 1e-12);
    }
}
