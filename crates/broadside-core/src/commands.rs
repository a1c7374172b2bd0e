//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible host/player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Start a new game: reset the world and score, begin spawning ships.
    /// Ignored while a game is already active or paused.
    StartGame,
    /// End the running game: stop spawning, remove every ship immediately.
    EndGame,
    /// Pause the simulation.
    Pause,
    /// Resume from pause.
    Resume,
    /// Move the reflecting shield (the host reports the tracked shield
    /// transform here; parked at the guard position it catches every ball).
    SetReflectorPosition { x: f64, y: f64, z: f64 },
}
