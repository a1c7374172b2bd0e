//! Running score state tracked by the engine.
//!
//! Score mutations happen only through the two named reactions below;
//! nothing else writes the score. Subtraction saturates at zero.

use broadside_core::constants::{PLAYER_HIT_PENALTY, SHIP_SUNK_REWARD};

#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub score: u32,
    pub ships_sunk: u32,
    pub player_hits: u32,
}

impl ScoreState {
    /// A reflected cannonball sank its source ship.
    pub fn award_ship_sunk(&mut self) {
        self.score += SHIP_SUNK_REWARD;
        self.ships_sunk += 1;
    }

    /// A cannonball got through to the player. The score floors at zero.
    pub fn penalize_player_hit(&mut self) {
        self.score = self.score.saturating_sub(PLAYER_HIT_PENALTY);
        self.player_hits += 1;
    }

    /// New-game reset.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
