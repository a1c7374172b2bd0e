//! Entity spawn factories and spawn geometry.
//!
//! Creates the player body, the reflector, and attacking ships with
//! appropriate component bundles.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use broadside_core::components::*;
use broadside_core::constants::*;
use broadside_core::enums::ShipPhase;
use broadside_core::types::Position;

use crate::motion::{Easing, MotionDone, MotionPath, MotionRequest, MotionScheduler, Pacing};
use crate::signal::{GameEndSubscription, GameSignal, SignalBus, Subscriber};

/// Set up a fresh game world: the player body at the viewpoint and the
/// reflector at its guard position. Ships are spawned by the scheduler.
pub fn setup_game(world: &mut World, viewpoint: Position) {
    world.spawn((PlayerBody, viewpoint));
    world.spawn((
        Reflector,
        Position::new(DEFAULT_REFLECTOR[0], DEFAULT_REFLECTOR[1], DEFAULT_REFLECTOR[2]),
    ));
}

/// Spawn one attacking ship at a random point on the spawn circle, oriented
/// toward the viewpoint, with its approach motion already under way.
///
/// The ship subscribes to the game-end signal here; both despawn paths
/// release the subscription.
#[allow(clippy::too_many_arguments)]
pub fn spawn_ship(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    bus: &mut SignalBus,
    motion: &mut MotionScheduler,
    next_ship_id: &mut u32,
    viewpoint: Position,
) -> hecs::Entity {
    let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let spawn = spawn_point(angle);
    let stop_distance: f64 = rng.gen_range(MIN_STOP_DISTANCE..MAX_STOP_DISTANCE);
    let stop = stop_point(&spawn, &viewpoint, stop_distance);

    let ship_id = *next_ship_id;
    *next_ship_id += 1;

    let state = ShipState {
        ship_id,
        phase: ShipPhase::Traveling,
        spawn_point: spawn,
        stop_point: stop,
        next_fire_tick: 0,
    };
    let rotation = Rotation {
        x: 0.0,
        y: look_yaw(&spawn, &viewpoint),
        z: 0.0,
    };

    let entity = world.spawn((Ship, spawn, rotation, state));

    let token = bus.subscribe(GameSignal::GameEnd, Subscriber::Ship(entity));
    let _ = world.insert_one(entity, GameEndSubscription(token));

    motion.request(
        entity,
        MotionRequest {
            path: MotionPath::Translate {
                from: spawn,
                via: None,
                to: stop,
            },
            easing: Easing::EaseOutQuad,
            pacing: Pacing::Duration(TRAVEL_TIME_SECS),
            on_complete: Some(MotionDone::Arrival),
        },
    );

    entity
}

/// Point on the spawn circle at `angle` radians, at the waterline height.
pub fn spawn_point(angle: f64) -> Position {
    Position::new(
        angle.cos() * SPAWN_RADIUS,
        SPAWN_HEIGHT,
        angle.sin() * SPAWN_RADIUS,
    )
}

/// Stop point for a ship: `distance` meters out from the harbor center
/// along the horizontal direction from the viewpoint toward the spawn
/// point, with the height pinned to the spawn height.
pub fn stop_point(spawn: &Position, viewpoint: &Position, distance: f64) -> Position {
    let dx = spawn.x - viewpoint.x;
    let dz = spawn.z - viewpoint.z;
    let len = (dx * dx + dz * dz).sqrt();
    if len < 1e-9 {
        return Position::new(distance, spawn.y, 0.0);
    }
    Position::new(dx / len * distance, spawn.y, dz / len * distance)
}

/// Yaw (radians about y) that points an entity's forward axis (+z) from
/// `from` toward `to`.
pub fn look_yaw(from: &Position, to: &Position) -> f64 {
    (to.x - from.x).atan2(to.z - from.z)
}
