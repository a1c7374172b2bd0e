//! Simulation engine for BROADSIDE.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for the host.

pub mod engine;
pub mod motion;
pub mod score;
pub mod signal;
pub mod systems;
pub mod world_setup;

pub use broadside_core as core;
pub use engine::SimulationEngine;

#[cfg(test)]
mod tests;
