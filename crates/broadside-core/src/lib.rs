//! Core types and definitions for the BROADSIDE simulation.
//!
//! This crate defines the vocabulary shared across the workspace:
//! components, commands, state snapshots, events, and constants.
//! It has no dependency on any ECS or runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
