//! Game state snapshot, the complete visible state handed to the host each
//! tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::AudioEvent;
use crate::types::{Position, SimTime};

/// Complete game state produced by the engine after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub score: ScoreView,
    pub ships: Vec<ShipView>,
    pub cannonballs: Vec<CannonballView>,
    pub effects: Vec<EffectView>,
    pub audio_events: Vec<AudioEvent>,
}

/// A visible ship.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipView {
    pub ship_id: u32,
    pub position: Position,
    /// Euler rotation in radians (yaw toward the viewpoint, tumble while
    /// sinking).
    pub rotation: [f64; 3],
    pub phase: ShipPhase,
}

/// A cannonball in flight.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CannonballView {
    pub ball_id: u32,
    pub position: Position,
    pub flight: FlightLeg,
    pub source_ship: u32,
}

/// A live visual effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub kind: EffectKind,
    pub position: Position,
    pub ttl_secs: f64,
}

/// Running score for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: u32,
    pub ships_sunk: u32,
    pub player_hits: u32,
}
