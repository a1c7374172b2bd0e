//! Snapshot builder: the complete visible state handed to the host each
//! tick.

use hecs::World;

use broadside_core::components::*;
use broadside_core::enums::GamePhase;
use broadside_core::events::AudioEvent;
use broadside_core::state::*;
use broadside_core::types::{Position, SimTime};

use crate::score::ScoreState;

/// Build the per-tick snapshot. Views are id-sorted so output is stable
/// for a given world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    score: &ScoreState,
    audio_events: Vec<AudioEvent>,
) -> GameStateSnapshot {
    let mut ships = Vec::new();
    {
        let mut q = world.query::<(&Ship, &ShipState, &Position, &Rotation)>();
        for (_entity, (_, state, pos, rot)) in q.iter() {
            ships.push(ShipView {
                ship_id: state.ship_id,
                position: *pos,
                rotation: [rot.x, rot.y, rot.z],
                phase: state.phase,
            });
        }
    }
    ships.sort_by_key(|s| s.ship_id);

    let mut cannonballs = Vec::new();
    {
        let mut q = world.query::<(&Cannonball, &CannonballState, &Position)>();
        for (_entity, (_, state, pos)) in q.iter() {
            cannonballs.push(CannonballView {
                ball_id: state.ball_id,
                position: *pos,
                flight: state.flight,
                source_ship: state.source_ship,
            });
        }
    }
    cannonballs.sort_by_key(|b| b.ball_id);

    let mut effects = Vec::new();
    {
        let mut q = world.query::<(&Effect, &Position)>();
        for (_entity, (effect, pos)) in q.iter() {
            effects.push(EffectView {
                kind: effect.kind,
                position: *pos,
                ttl_secs: effect.ttl_secs,
            });
        }
    }

    GameStateSnapshot {
        time: *time,
        phase,
        score: ScoreView {
            score: score.score,
            ships_sunk: score.ships_sunk,
            player_hits: score.player_hits,
        },
        ships,
        cannonballs,
        effects,
        audio_events,
    }
}
