//! Periodic cannon fire from ships on station.
//!
//! Each Firing ship carries a single `next_fire_tick` timestamp; when it
//! comes due the ship launches a cannonball on an elevated arc toward the
//! viewpoint and reschedules. Ships leave the Firing phase the moment they
//! are hit, so a hit ship can never emit another shot.

use hecs::World;

use broadside_core::components::*;
use broadside_core::constants::*;
use broadside_core::enums::{EffectKind, FlightLeg, ShipPhase};
use broadside_core::events::AudioEvent;
use broadside_core::types::Position;

use crate::motion::{Easing, MotionPath, MotionRequest, MotionScheduler, Pacing};

/// Fire every due cannon.
pub fn run(
    world: &mut World,
    motion: &mut MotionScheduler,
    next_ball_id: &mut u32,
    viewpoint: Position,
    audio_events: &mut Vec<AudioEvent>,
    current_tick: u64,
) {
    // Collect fire orders first; spawning while querying would alias the
    // world borrow.
    let mut orders: Vec<(u32, Position)> = Vec::new();
    for (_entity, (state, pos, _ship)) in world.query_mut::<(&mut ShipState, &Position, &Ship)>() {
        if state.phase != ShipPhase::Firing || current_tick < state.next_fire_tick {
            continue;
        }
        state.next_fire_tick = current_tick + (FIRE_INTERVAL_SECS / DT) as u64;
        orders.push((state.ship_id, *pos));
    }

    for (ship_id, ship_pos) in orders {
        fire_cannonball(world, motion, next_ball_id, ship_id, ship_pos, viewpoint, audio_events);
    }
}

/// Launch one cannonball: fire sound, muzzle flash at the cannon mount,
/// then the ball itself on a spring-eased arc to the viewpoint.
fn fire_cannonball(
    world: &mut World,
    motion: &mut MotionScheduler,
    next_ball_id: &mut u32,
    ship_id: u32,
    ship_pos: Position,
    viewpoint: Position,
    audio_events: &mut Vec<AudioEvent>,
) {
    audio_events.push(AudioEvent::CannonFire { ship_id });

    let muzzle = Position::new(ship_pos.x, ship_pos.y + CANNON_MOUNT_HEIGHT, ship_pos.z);
    world.spawn((
        Effect {
            kind: EffectKind::MuzzleFlash,
            ttl_secs: MUZZLE_FLASH_TTL_SECS,
        },
        muzzle,
    ));

    let ball_id = *next_ball_id;
    *next_ball_id += 1;

    let ball = world.spawn((
        Cannonball,
        muzzle,
        CannonballState {
            ball_id,
            flight: FlightLeg::Outbound,
            source_ship: ship_id,
            // The return arc ends where the ship stood when it fired.
            return_point: ship_pos,
        },
    ));

    motion.request(
        ball,
        MotionRequest {
            path: MotionPath::Translate {
                from: muzzle,
                via: Some(cannon_arc_via(&ship_pos, &viewpoint)),
                to: viewpoint,
            },
            easing: Easing::Spring,
            pacing: Pacing::Speed(CANNON_FIRE_SPEED),
            // Outbound balls resolve by collision, not by completion.
            on_complete: None,
        },
    );
}

/// Via point for a cannonball arc: the path midpoint raised by the fixed
/// arc height.
pub fn cannon_arc_via(from: &Position, to: &Position) -> Position {
    let mut mid = from.midpoint(to);
    mid.y += CANNON_ARC_HEIGHT;
    mid
}
