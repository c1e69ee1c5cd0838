//! Local search refinement for constructed tours.
//!
//! Implements a bounded 2-opt pass: within each depot-to-depot trip, the
//! first improving edge exchange is applied and the scan moves on to the next
//! trip. One pass per tour, never iterated to a local optimum; repeated
//! application across colony iterations compensates for the bounded effort.

use crate::instance::CvrpInstance;

/// Single-pass, first-improvement 2-opt over the trips of a tour
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoOptPass;

impl TwoOptPass {
    pub fn new() -> Self {
        TwoOptPass
    }

    /// Attempt one improving segment reversal per trip.
    ///
    /// `path` must start and end at the depot; `cost` is adjusted in place by
    /// the exact delta of every applied move. Returns true if any trip
    /// improved.
    pub fn refine(&self, instance: &CvrpInstance, path: &mut [usize], cost: &mut f64) -> bool {
        let depot = instance.depot;
        let depot_indices: Vec<usize> = path
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == depot)
            .map(|(i, _)| i)
            .collect();

        let mut any_improved = false;

        for window in depot_indices.windows(2) {
            let (s, e) = (window[0], window[1]);
            // A trip shorter than 4 edges has no non-adjacent edge pair
            if e < s + 4 {
                continue;
            }

            'trip: for i in s..=e - 4 {
                let v1 = path[i];
                let v2 = path[i + 1];
                for j in i + 2..=e - 1 {
                    let v3 = path[j];
                    let v4 = path[j + 1];

                    let old_cost = instance.distance(v1, v2) + instance.distance(v3, v4);
                    let new_cost = instance.distance(v1, v3) + instance.distance(v2, v4);
                    if old_cost > new_cost {
                        path[i + 1..=j].reverse();
                        *cost -= old_cost - new_cost;
                        any_improved = true;
                        break 'trip;
                    }
                }
            }
        }

        any_improved
    }
}
