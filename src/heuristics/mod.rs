//! Heuristics module for the CVRP.
//!
//! This module exports the colony solver, its deposition strategies,
//! the 2-opt refinement pass, and the greedy baseline.

pub mod aco;
pub mod deposition;
pub mod local_search;
pub mod greedy;

pub use aco::*;
pub use deposition::*;
pub use local_search::*;
pub use greedy::*;
