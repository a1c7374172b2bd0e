//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods. Game logic lives in
//! systems, not components. Cross-entity links use numeric ids rather than
//! entity handles so this crate stays ECS-agnostic.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Euler rotation in radians (applied x, then y, then z).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Attacking ship state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipState {
    /// Stable id assigned at spawn, used for snapshots and cannonball links.
    pub ship_id: u32,
    pub phase: ShipPhase,
    /// Where on the spawn circle this ship appeared.
    pub spawn_point: Position,
    /// Stop point it sails to before opening fire.
    pub stop_point: Position,
    /// Tick of the next scheduled shot. Meaningful only while `Firing`;
    /// this single field is the ship's one and only fire timer.
    pub next_fire_tick: u64,
}

/// Cannonball state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannonballState {
    pub ball_id: u32,
    pub flight: FlightLeg,
    /// Id of the ship that fired this ball.
    pub source_ship: u32,
    /// Source ship's position at fire time; the return arc ends here.
    pub return_point: Position,
}

/// Transient visual effect with a time-to-live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub ttl_secs: f64,
}

/// Marks an entity as an attacking ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ship;

/// Marks an entity as a cannonball.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cannonball;

/// Marks the player's body (the hitbox at the viewpoint).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerBody;

/// Marks the reflecting shield the player holds up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Reflector;
