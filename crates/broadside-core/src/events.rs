//! Events emitted by the simulation for host audio feedback.

use serde::{Deserialize, Serialize};

/// Audio events for the host sound system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// A ship fired a cannonball.
    CannonFire { ship_id: u32 },
    /// A ship was struck by its own reflected cannonball.
    ShipExplosion { ship_id: u32 },
    /// A cannonball got through to the player.
    PlayerImpact,
}
