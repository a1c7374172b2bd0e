//! Cannonball collision and terminal resolution.
//!
//! Proximity checks stand in for the host's collision source. Per ball and
//! per tick, at most one of the following fires, and every terminal outcome
//! despawns the ball the same tick, so a ball can never resolve twice:
//!
//! - outbound near the reflector: flip to returning, arc back to the source
//! - outbound near the player body: player hit reaction, despawn
//! - returning near its source ship: ship hit reaction, despawn
//!
//! Balls never interact with each other. A returning ball that reaches its
//! endpoint uncontested despawns through the `ReturnMissed` completion
//! handled by the engine.

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use broadside_core::components::*;
use broadside_core::constants::*;
use broadside_core::enums::{EffectKind, FlightLeg, ShipPhase};
use broadside_core::events::AudioEvent;
use broadside_core::types::Position;

use crate::motion::{Easing, MotionDone, MotionPath, MotionRequest, MotionScheduler, Pacing};
use crate::score::ScoreState;
use crate::systems::gunnery::cannon_arc_via;

/// Run collision checks and resolve hits for every cannonball.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    motion: &mut MotionScheduler,
    score: &mut ScoreState,
    rng: &mut ChaCha8Rng,
    audio_events: &mut Vec<AudioEvent>,
    player_explosion: &mut Option<Entity>,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();

    // Snapshot collider positions before resolving anything.
    let reflector_pos = {
        let mut q = world.query::<(&Reflector, &Position)>();
        q.iter().next().map(|(_, (_, p))| *p)
    };
    let player_pos = {
        let mut q = world.query::<(&PlayerBody, &Position)>();
        q.iter().next().map(|(_, (_, p))| *p)
    };
    let ships: Vec<(Entity, u32, Position)> = {
        let mut q = world.query::<(&Ship, &ShipState, &Position)>();
        q.iter()
            .map(|(e, (_, s, p))| (e, s.ship_id, *p))
            .collect()
    };
    let balls: Vec<(Entity, Position, FlightLeg, u32, Position)> = {
        let mut q = world.query::<(&Cannonball, &CannonballState, &Position)>();
        q.iter()
            .map(|(e, (_, s, p))| (e, *p, s.flight, s.source_ship, s.return_point))
            .collect()
    };

    for (ball, ball_pos, flight, source_ship, return_point) in balls {
        match flight {
            FlightLeg::Outbound => {
                // The reflector is checked before the player hitbox, the
                // shield-up case.
                if let Some(rp) = reflector_pos {
                    if ball_pos.range_to(&rp) <= REFLECT_HIT_RANGE {
                        reflect(world, motion, ball, ball_pos, return_point);
                        continue;
                    }
                }
                if let Some(pp) = player_pos {
                    if ball_pos.range_to(&pp) <= PLAYER_HIT_RANGE {
                        on_player_hit(world, score, audio_events, player_explosion, pp);
                        motion.cancel(ball);
                        despawn_buffer.push(ball);
                    }
                }
            }
            FlightLeg::Returning => {
                // A returning ball only ever tests its own source ship.
                let source = ships.iter().find(|(_, id, _)| *id == source_ship);
                if let Some(&(ship_entity, _, ship_pos)) = source {
                    if ball_pos.range_to(&ship_pos) <= SHIP_HIT_RANGE {
                        on_ship_hit(world, motion, score, rng, audio_events, ship_entity);
                        motion.cancel(ball);
                        despawn_buffer.push(ball);
                    }
                }
            }
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Flip an outbound ball to returning and send it back along an elevated
/// arc to the position its ship fired from. The replaced outbound motion
/// never completes.
fn reflect(
    world: &mut World,
    motion: &mut MotionScheduler,
    ball: Entity,
    ball_pos: Position,
    return_point: Position,
) {
    if let Ok(mut state) = world.get::<&mut CannonballState>(ball) {
        state.flight = FlightLeg::Returning;
    }

    motion.request(
        ball,
        MotionRequest {
            path: MotionPath::Translate {
                from: ball_pos,
                via: Some(cannon_arc_via(&ball_pos, &return_point)),
                to: return_point,
            },
            easing: Easing::Spring,
            pacing: Pacing::Speed(CANNON_FIRE_SPEED),
            on_complete: Some(MotionDone::ReturnMissed),
        },
    );
}

/// Ship hit reaction. Runs fully before the cannonball that triggered it is
/// despawned. Only a ship still in the Firing phase reacts; a second ball
/// arriving at an already-hit ship is a no-op.
pub(crate) fn on_ship_hit(
    world: &mut World,
    motion: &mut MotionScheduler,
    score: &mut ScoreState,
    rng: &mut ChaCha8Rng,
    audio_events: &mut Vec<AudioEvent>,
    ship: Entity,
) {
    let ship_id = {
        let mut state = match world.get::<&mut ShipState>(ship) {
            Ok(s) => s,
            Err(_) => return,
        };
        if state.phase != ShipPhase::Firing {
            return;
        }
        state.phase = ShipPhase::Hit;
        state.ship_id
    };
    let pos = match world.get::<&Position>(ship) {
        Ok(p) => *p,
        Err(_) => return,
    };
    let current_rot = world.get::<&Rotation>(ship).map(|r| *r).unwrap_or_default();

    score.award_ship_sunk();
    audio_events.push(AudioEvent::ShipExplosion { ship_id });
    world.spawn((
        Effect {
            kind: EffectKind::ShipExplosion,
            ttl_secs: SHIP_EXPLOSION_TTL_SECS,
        },
        pos,
    ));

    // Drop any leftover motion before starting the sink; the fire timer is
    // already dead via the phase change above.
    motion.cancel(ship);

    // Randomized tumble: independent per-axis draws, normalized, scaled to
    // the fixed tumble magnitude.
    let axis = DVec3::new(
        rng.gen_range(0.0..1.0),
        rng.gen_range(0.0..1.0),
        rng.gen_range(0.0..1.0),
    )
    .try_normalize()
    .unwrap_or(DVec3::Y);
    let tumble = axis * TUMBLE_ANGLE;

    motion.request(
        ship,
        MotionRequest {
            path: MotionPath::Translate {
                from: pos,
                via: None,
                to: Position::new(pos.x, pos.y - SINK_DISTANCE, pos.z),
            },
            easing: Easing::Linear,
            pacing: Pacing::Duration(SINK_TIME_SECS),
            on_complete: Some(MotionDone::SinkComplete),
        },
    );
    motion.request(
        ship,
        MotionRequest {
            path: MotionPath::Rotate {
                from: current_rot,
                to: Rotation {
                    x: tumble.x,
                    y: tumble.y,
                    z: tumble.z,
                },
            },
            easing: Easing::Linear,
            pacing: Pacing::Duration(SINK_TIME_SECS),
            on_complete: None,
        },
    );

    if let Ok(mut state) = world.get::<&mut ShipState>(ship) {
        state.phase = ShipPhase::Sinking;
    }

    log::debug!("ship {ship_id} sunk by its own cannonball");
}

/// Player hit reaction: score penalty, impact sound, and at most one
/// concurrent explosion effect. The weak handle is liveness-checked so an
/// expired effect frees the slot.
fn on_player_hit(
    world: &mut World,
    score: &mut ScoreState,
    audio_events: &mut Vec<AudioEvent>,
    player_explosion: &mut Option<Entity>,
    player_pos: Position,
) {
    score.penalize_player_hit();
    audio_events.push(AudioEvent::PlayerImpact);

    let explosion_alive = player_explosion.map(|e| world.contains(e)).unwrap_or(false);
    if !explosion_alive {
        let effect = world.spawn((
            Effect {
                kind: EffectKind::PlayerExplosion,
                ttl_secs: PLAYER_EXPLOSION_TTL_SECS,
            },
            player_pos,
        ));
        *player_explosion = Some(effect);
    }
}
