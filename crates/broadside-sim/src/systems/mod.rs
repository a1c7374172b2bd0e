//! Systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` plus the engine state they
//! need. They do not own state; timers and schedules live in the structs
//! the engine passes in.

pub mod ballistics;
pub mod cleanup;
pub mod gunnery;
pub mod snapshot;
pub mod spawner;
