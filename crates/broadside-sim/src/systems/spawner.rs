//! Ship spawn scheduler, gated by the game-start / game-end signals.
//!
//! One spawn loop at most: a game-start while already spawning is a no-op,
//! and game-end stops the loop before the next iteration can run. Ships
//! already afloat are cancelled through their own subscriptions, not here.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use broadside_core::constants::{DT, SPAWN_GAP_SECS, TRAVEL_TIME_SECS};
use broadside_core::types::Position;

use crate::motion::MotionScheduler;
use crate::signal::SignalBus;
use crate::world_setup;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpawnPhase {
    #[default]
    Idle,
    Spawning,
}

/// The spawn loop state. `next_spawn_tick` is only consulted while
/// `Spawning`.
#[derive(Debug, Default)]
pub struct SpawnScheduler {
    pub phase: SpawnPhase,
    pub next_spawn_tick: u64,
}

impl SpawnScheduler {
    /// Begin spawning, with the first ship due immediately.
    /// Idempotent: a second game-start does not restart the cycle.
    pub fn on_game_start(&mut self, current_tick: u64) {
        if self.phase == SpawnPhase::Spawning {
            return;
        }
        self.phase = SpawnPhase::Spawning;
        self.next_spawn_tick = current_tick;
    }

    /// Stop the loop immediately; no further ships spawn.
    pub fn on_game_end(&mut self) {
        self.phase = SpawnPhase::Idle;
    }
}

/// Spawn a ship if one is due, and schedule the next.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    scheduler: &mut SpawnScheduler,
    motion: &mut MotionScheduler,
    bus: &mut SignalBus,
    next_ship_id: &mut u32,
    viewpoint: Position,
    current_tick: u64,
) {
    if scheduler.phase != SpawnPhase::Spawning || current_tick < scheduler.next_spawn_tick {
        return;
    }

    let entity = world_setup::spawn_ship(world, rng, bus, motion, next_ship_id, viewpoint);
    log::debug!("spawned ship {entity:?} at tick {current_tick}");

    // Wait out the new ship's approach plus a gap before the next one.
    scheduler.next_spawn_tick = current_tick + ((TRAVEL_TIME_SECS + SPAWN_GAP_SECS) / DT) as u64;
}
