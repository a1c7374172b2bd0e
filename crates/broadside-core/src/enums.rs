//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Ship lifecycle phase.
///
/// `Removed` has no variant: a removed ship is a despawned entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipPhase {
    /// Sailing from the spawn circle toward its stop point.
    #[default]
    Traveling,
    /// On station, firing cannonballs on a fixed cadence.
    Firing,
    /// Struck by a returned cannonball; fire timer cancelled.
    Hit,
    /// Sinking below the waterline with a tumble.
    Sinking,
}

/// Which leg of its flight a cannonball is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightLeg {
    /// Arcing from the cannon toward the player's viewpoint.
    #[default]
    Outbound,
    /// Reflected off the shield, arcing back to the source ship.
    Returning,
}

/// Visual effect kind, for host-side rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Smoke puff at the cannon mount when a ball is fired.
    MuzzleFlash,
    /// Explosion on a ship struck by its own cannonball.
    ShipExplosion,
    /// Explosion on the player when a ball gets through.
    PlayerExplosion,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No game running yet.
    #[default]
    Idle,
    /// Game in progress: ships spawn and fire.
    Active,
    /// Frozen mid-game.
    Paused,
    /// Game over. In-flight cannonballs still drain, nothing new spawns.
    Ended,
}
