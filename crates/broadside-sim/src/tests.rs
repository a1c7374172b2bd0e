//! Tests for the simulation engine, motion scheduler, signal bus, spawn
//! loop, gunnery, and hit resolution.

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use broadside_core::commands::PlayerCommand;
use broadside_core::components::*;
use broadside_core::constants::*;
use broadside_core::enums::*;
use broadside_core::events::AudioEvent;
use broadside_core::types::Position;

use crate::engine::{SimConfig, SimulationEngine};
use crate::motion::{self, Easing, MotionDone, MotionPath, MotionRequest, MotionScheduler, Pacing};
use crate::score::ScoreState;
use crate::signal::GameSignal;
use crate::systems::spawner::{SpawnPhase, SpawnScheduler};
use crate::systems::{ballistics, gunnery};
use crate::world_setup;

fn started_engine(seed: u64) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::StartGame);
    engine
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = started_engine(12345);
    let mut engine_b = started_engine(12345);

    for _ in 0..400 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = started_engine(111);
    let mut engine_b = started_engine(222);

    // Spawn angles are drawn from the seed, so the first ship already
    // differs between runs.
    let mut diverged = false;
    for _ in 0..300 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();
        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Tick timing ----

#[test]
fn test_tick_timing_30_ticks_one_second() {
    let mut engine = started_engine(42);
    for _ in 0..30 {
        engine.tick();
    }

    assert_eq!(engine.time().tick, 30);
    assert!(
        (engine.time().elapsed_secs - 1.0).abs() < 1e-10,
        "30 ticks should equal 1.0 seconds, got {}",
        engine.time().elapsed_secs
    );
}

// ---- Phase gating ----

#[test]
fn test_start_game_phase_gating() {
    let mut engine = SimulationEngine::new(SimConfig::default());

    // Before StartGame nothing runs.
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Idle);
    assert!(snap.ships.is_empty());
    assert_eq!(engine.time().tick, 0);

    engine.queue_command(PlayerCommand::StartGame);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.ships.len(), 1, "First ship spawns immediately");

    // Starting again while Active is ignored.
    engine.queue_command(PlayerCommand::StartGame);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.ships.len(), 1);
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = started_engine(42);

    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 10);
    assert_eq!(engine.phase(), GamePhase::Active);

    engine.queue_command(PlayerCommand::Pause);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(
        engine.time().tick,
        10,
        "Time should not advance while paused"
    );
    assert_eq!(engine.phase(), GamePhase::Paused);

    engine.queue_command(PlayerCommand::Resume);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 20);
    assert_eq!(engine.phase(), GamePhase::Active);
}

// ---- Spawn geometry ----

#[test]
fn test_spawn_point_at_angle_zero() {
    // Angle 0 on a circle of radius R at height H is (R, H, 0).
    let spawn = world_setup::spawn_point(0.0);
    assert_eq!(spawn, Position::new(SPAWN_RADIUS, SPAWN_HEIGHT, 0.0));

    let viewpoint = Position::new(0.0, 1.8, 0.0);
    let stop = world_setup::stop_point(&spawn, &viewpoint, 40.0);
    assert_eq!(stop, Position::new(40.0, SPAWN_HEIGHT, 0.0));
}

#[test]
fn test_spawned_ship_geometry() {
    let mut engine = started_engine(7);
    engine.tick();

    let (spawn, stop) = {
        let mut q = engine.world().query::<&ShipState>();
        let (_, state) = q.iter().next().expect("one ship after first tick");
        (state.spawn_point, state.stop_point)
    };

    let center = Position::new(0.0, 0.0, 0.0);
    assert!(
        (spawn.horizontal_range_to(&center) - SPAWN_RADIUS).abs() < 1e-6,
        "Spawn point should sit on the spawn circle"
    );
    assert_eq!(spawn.y, SPAWN_HEIGHT);

    let stop_range = stop.horizontal_range_to(&center);
    assert!(
        (MIN_STOP_DISTANCE..=MAX_STOP_DISTANCE).contains(&stop_range),
        "Stop distance {stop_range} outside [{MIN_STOP_DISTANCE}, {MAX_STOP_DISTANCE}]"
    );
    assert_eq!(stop.y, SPAWN_HEIGHT, "Stop point keeps the spawn height");

    // Stop point lies along the spawn bearing: horizontal cross term zero,
    // same side as the spawn point.
    let cross = spawn.x * stop.z - spawn.z * stop.x;
    let dot = spawn.x * stop.x + spawn.z * stop.z;
    assert!(cross.abs() < 1e-6, "Stop point off the spawn bearing");
    assert!(dot > 0.0, "Stop point on the wrong side of the center");
}

#[test]
fn test_spawn_cadence() {
    let mut engine = started_engine(42);

    engine.tick();
    let count = |e: &SimulationEngine| {
        let mut q = e.world().query::<&Ship>();
        q.iter().count()
    };
    assert_eq!(count(&engine), 1);

    // Next ship is due after travel time plus the spawn gap.
    let interval = ((TRAVEL_TIME_SECS + SPAWN_GAP_SECS) / DT) as u64;
    while engine.time().tick < interval {
        engine.tick();
    }
    assert_eq!(count(&engine), 1, "Second ship not due yet");

    engine.tick();
    assert_eq!(count(&engine), 2, "Second ship due after the full interval");
}

// ---- Arrival and gunnery ----

#[test]
fn test_arrival_then_first_shot() {
    let mut engine = started_engine(42);

    // No shot can exist before travel + one fire interval.
    let quiet_ticks = ((TRAVEL_TIME_SECS + FIRE_INTERVAL_SECS) / DT) as u64 - 10;
    for _ in 0..quiet_ticks {
        let snap = engine.tick();
        assert!(
            snap.cannonballs.is_empty(),
            "Cannonball before travel + fire interval elapsed"
        );
    }

    // The first shot appears shortly after, from a Firing ship.
    let mut fired = false;
    for _ in 0..30 {
        let snap = engine.tick();
        if !snap.cannonballs.is_empty() {
            assert_eq!(snap.cannonballs[0].flight, FlightLeg::Outbound);
            assert_eq!(snap.cannonballs[0].source_ship, 0);
            assert_eq!(snap.ships[0].phase, ShipPhase::Firing);
            assert!(snap
                .audio_events
                .iter()
                .any(|e| matches!(e, AudioEvent::CannonFire { ship_id: 0 }))
                || fired);
            fired = true;
            break;
        }
    }
    assert!(fired, "First cannonball never fired");
}

// ---- Reflection and ship sinking ----

#[test]
fn test_reflected_ball_sinks_source_ship() {
    let mut engine = started_engine(42);

    let mut saw_returning = false;
    let mut exploded = false;
    let mut sunk_at = None;
    for _ in 0..700 {
        let snap = engine.tick();
        if snap
            .cannonballs
            .iter()
            .any(|b| b.flight == FlightLeg::Returning)
        {
            saw_returning = true;
        }
        if snap
            .audio_events
            .iter()
            .any(|e| matches!(e, AudioEvent::ShipExplosion { .. }))
        {
            exploded = true;
        }
        if snap.score.ships_sunk > 0 {
            sunk_at = Some(engine.time().tick);
            assert_eq!(snap.score.score, SHIP_SUNK_REWARD);
            assert_eq!(snap.score.ships_sunk, 1);
            let ship0 = snap.ships.iter().find(|s| s.ship_id == 0).unwrap();
            assert_eq!(ship0.phase, ShipPhase::Sinking);
            break;
        }
    }
    let sunk_at = sunk_at.expect("Ship 0 should be sunk by its own ball");
    assert!(saw_returning, "Ball should have flipped to returning first");
    assert!(exploded, "Ship explosion audio should have fired");

    // The reward is applied exactly once even though the ship keeps
    // getting return fire while it sinks.
    for _ in 0..30 {
        engine.tick();
    }
    assert_eq!(engine.score().score, SHIP_SUNK_REWARD);

    // After the sink duration the ship despawns and releases its game-end
    // subscription: registrations = spawner + ships still afloat.
    while engine.time().tick < sunk_at + (SINK_TIME_SECS / DT) as u64 + 10 {
        engine.tick();
    }
    let snap = engine.tick();
    assert!(
        !snap.ships.iter().any(|s| s.ship_id == 0),
        "Sunk ship should despawn after the sink animation"
    );
    let afloat = snap.ships.len();
    assert_eq!(
        engine.bus().subscriber_count(GameSignal::GameEnd),
        1 + afloat,
        "One registration per live ship plus the spawner"
    );
}

#[test]
fn test_sinking_ship_descends() {
    let mut engine = started_engine(42);

    let mut hit_pos = None;
    for _ in 0..700 {
        let snap = engine.tick();
        if let Some(ship0) = snap.ships.iter().find(|s| s.ship_id == 0) {
            if ship0.phase == ShipPhase::Sinking && hit_pos.is_none() {
                hit_pos = Some(ship0.position);
            }
        }
        if hit_pos.is_some() {
            break;
        }
    }
    let hit_pos = hit_pos.expect("Ship 0 should start sinking");

    // Halfway through the sink it should be measurably lower, and tumbling.
    for _ in 0..((SINK_TIME_SECS / DT) as u64 / 2) {
        engine.tick();
    }
    let snap = engine.tick();
    let ship0 = snap
        .ships
        .iter()
        .find(|s| s.ship_id == 0)
        .expect("Still sinking");
    assert!(
        ship0.position.y < hit_pos.y - 1.0,
        "Sinking ship should descend, was {} now {}",
        hit_pos.y,
        ship0.position.y
    );
    assert!(
        ship0.rotation.iter().any(|r| r.abs() > 1e-3),
        "Sinking ship should tumble"
    );
}

// ---- Player hits ----

#[test]
fn test_shield_down_ball_hits_player() {
    let mut engine = started_engine(42);
    // Lower the shield so outbound balls get through.
    engine.queue_command(PlayerCommand::SetReflectorPosition {
        x: 0.0,
        y: -50.0,
        z: 0.0,
    });

    let mut impacts = 0;
    for _ in 0..700 {
        let snap = engine.tick();
        impacts += snap
            .audio_events
            .iter()
            .filter(|e| matches!(e, AudioEvent::PlayerImpact))
            .count();

        // At most one player explosion alive at a time, ever.
        let explosions = snap
            .effects
            .iter()
            .filter(|e| e.kind == EffectKind::PlayerExplosion)
            .count();
        assert!(
            explosions <= 1,
            "Player explosions must not stack, saw {explosions}"
        );

        // Nothing ever reflects with the shield down.
        assert!(
            snap.cannonballs
                .iter()
                .all(|b| b.flight == FlightLeg::Outbound),
            "No ball should flip to returning with the shield down"
        );

        if impacts >= 2 {
            break;
        }
    }
    assert!(impacts >= 2, "Expected repeated player hits, got {impacts}");

    // Score started at zero and the penalty saturates, so it stays zero.
    assert_eq!(engine.score().score, 0);
    assert_eq!(engine.score().player_hits as usize, impacts);
}

#[test]
fn test_score_floor_saturates_at_zero() {
    let mut score = ScoreState::default();
    score.penalize_player_hit();
    assert_eq!(score.score, 0, "Score floors at zero");

    score.award_ship_sunk();
    assert_eq!(score.score, SHIP_SUNK_REWARD);
    score.penalize_player_hit();
    assert_eq!(score.score, SHIP_SUNK_REWARD - PLAYER_HIT_PENALTY);
    score.penalize_player_hit();
    score.penalize_player_hit();
    assert_eq!(score.score, 0);
    assert_eq!(score.player_hits, 4);
}

// ---- Game end ----

#[test]
fn test_game_end_removes_ships_and_stops_spawning() {
    let mut engine = started_engine(42);
    for _ in 0..400 {
        engine.tick();
    }
    {
        let mut q = engine.world().query::<&Ship>();
        assert!(q.iter().count() > 0, "Ships afloat before game end");
    }

    engine.queue_command(PlayerCommand::EndGame);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Ended);
    assert!(
        snap.ships.is_empty(),
        "Game end removes every ship immediately, bypassing the sink"
    );
    assert_eq!(
        engine.bus().subscriber_count(GameSignal::GameEnd),
        1,
        "Only the spawner remains registered after the ships despawn"
    );
    assert_eq!(engine.spawner().phase, SpawnPhase::Idle);

    // No further spawns and no further fire events, but in-flight balls
    // drain to their own terminal outcomes.
    for _ in 0..600 {
        let snap = engine.tick();
        assert!(snap.ships.is_empty(), "No ship may spawn after game end");
        assert!(
            !snap
                .audio_events
                .iter()
                .any(|e| matches!(e, AudioEvent::CannonFire { .. })),
            "No fire events after game end"
        );
    }
    let snap = engine.tick();
    assert!(
        snap.cannonballs.is_empty(),
        "In-flight cannonballs should all have resolved"
    );
}

#[test]
fn test_restart_after_game_end() {
    let mut engine = started_engine(42);
    for _ in 0..500 {
        engine.tick();
    }
    engine.queue_command(PlayerCommand::EndGame);
    engine.tick();

    engine.queue_command(PlayerCommand::StartGame);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(engine.time().tick, 1, "New game restarts the clock");
    assert_eq!(snap.score.score, 0, "New game resets the score");
    assert_eq!(snap.ships.len(), 1, "New game spawns again");
    assert_eq!(snap.ships[0].ship_id, 0, "Ship ids restart per game");
}

// ---- Spawn scheduler ----

#[test]
fn test_spawn_scheduler_idempotent_start() {
    let mut scheduler = SpawnScheduler::default();
    assert_eq!(scheduler.phase, SpawnPhase::Idle);

    scheduler.on_game_start(0);
    assert_eq!(scheduler.phase, SpawnPhase::Spawning);
    scheduler.next_spawn_tick = 123;

    // A second game-start while spawning must not reset the cycle.
    scheduler.on_game_start(50);
    assert_eq!(scheduler.next_spawn_tick, 123);
    assert_eq!(scheduler.phase, SpawnPhase::Spawning);

    scheduler.on_game_end();
    assert_eq!(scheduler.phase, SpawnPhase::Idle);
}

// ---- Hit handler guards ----

#[test]
fn test_double_hit_is_a_no_op() {
    let mut world = World::new();
    let mut motion = MotionScheduler::new();
    let mut score = ScoreState::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut audio = Vec::new();

    let pos = Position::new(40.0, 0.0, 0.0);
    let ship = world.spawn((
        Ship,
        pos,
        Rotation::default(),
        ShipState {
            ship_id: 0,
            phase: ShipPhase::Firing,
            spawn_point: Position::new(500.0, 0.0, 0.0),
            stop_point: pos,
            next_fire_tick: 0,
        },
    ));

    ballistics::on_ship_hit(&mut world, &mut motion, &mut score, &mut rng, &mut audio, ship);
    assert_eq!(score.score, SHIP_SUNK_REWARD);
    assert_eq!(score.ships_sunk, 1);
    {
        let state = world.get::<&ShipState>(ship).unwrap();
        assert_eq!(state.phase, ShipPhase::Sinking);
    }
    // Sink translate plus tumble rotate.
    assert_eq!(motion.active_count(ship), 2);

    // A second returning ball reaching the same ship changes nothing.
    ballistics::on_ship_hit(&mut world, &mut motion, &mut score, &mut rng, &mut audio, ship);
    assert_eq!(score.score, SHIP_SUNK_REWARD, "Reward applied exactly once");
    assert_eq!(score.ships_sunk, 1);
    assert_eq!(
        audio
            .iter()
            .filter(|e| matches!(e, AudioEvent::ShipExplosion { .. }))
            .count(),
        1
    );
}

// ---- Motion scheduler ----

#[test]
fn test_motion_completion_exactly_once() {
    let mut world = World::new();
    let mut motion = MotionScheduler::new();
    let entity = world.spawn((Position::new(0.0, 0.0, 0.0),));

    motion.request(
        entity,
        MotionRequest {
            path: MotionPath::Translate {
                from: Position::new(0.0, 0.0, 0.0),
                via: None,
                to: Position::new(10.0, 0.0, 0.0),
            },
            easing: Easing::Linear,
            pacing: Pacing::Duration(0.1),
            on_complete: Some(MotionDone::Arrival),
        },
    );

    let mut completions = 0;
    for _ in 0..30 {
        completions += motion.tick(&mut world, DT).len();
    }
    assert_eq!(completions, 1, "Completion must fire exactly once");
    assert_eq!(motion.active_count(entity), 0);

    // Endpoint is exact.
    let pos = world.get::<&Position>(entity).unwrap();
    assert_eq!(*pos, Position::new(10.0, 0.0, 0.0));
}

#[test]
fn test_motion_cancel_suppresses_completion() {
    let mut world = World::new();
    let mut motion = MotionScheduler::new();
    let entity = world.spawn((Position::new(0.0, 0.0, 0.0),));

    motion.request(
        entity,
        MotionRequest {
            path: MotionPath::Translate {
                from: Position::new(0.0, 0.0, 0.0),
                via: None,
                to: Position::new(10.0, 0.0, 0.0),
            },
            easing: Easing::Linear,
            pacing: Pacing::Duration(0.1),
            on_complete: Some(MotionDone::Arrival),
        },
    );
    motion.cancel(entity);

    for _ in 0..30 {
        assert!(
            motion.tick(&mut world, DT).is_empty(),
            "Cancelled motion must never complete"
        );
    }
}

#[test]
fn test_motion_dropped_for_despawned_entity() {
    let mut world = World::new();
    let mut motion = MotionScheduler::new();
    let entity = world.spawn((Position::new(0.0, 0.0, 0.0),));

    motion.request(
        entity,
        MotionRequest {
            path: MotionPath::Translate {
                from: Position::new(0.0, 0.0, 0.0),
                via: None,
                to: Position::new(10.0, 0.0, 0.0),
            },
            easing: Easing::Linear,
            pacing: Pacing::Duration(0.1),
            on_complete: Some(MotionDone::Arrival),
        },
    );
    let _ = world.despawn(entity);

    for _ in 0..30 {
        assert!(
            motion.tick(&mut world, DT).is_empty(),
            "Motions of despawned entities are dropped silently"
        );
    }
    assert_eq!(motion.active_count(entity), 0);
}

#[test]
fn test_motion_same_kind_replaced() {
    let mut world = World::new();
    let mut motion = MotionScheduler::new();
    let entity = world.spawn((Position::new(0.0, 0.0, 0.0), Rotation::default()));

    let translate = |to: Position| MotionRequest {
        path: MotionPath::Translate {
            from: Position::new(0.0, 0.0, 0.0),
            via: None,
            to,
        },
        easing: Easing::Linear,
        pacing: Pacing::Duration(1.0),
        on_complete: Some(MotionDone::Arrival),
    };

    motion.request(entity, translate(Position::new(10.0, 0.0, 0.0)));
    motion.request(entity, translate(Position::new(-5.0, 0.0, 0.0)));
    assert_eq!(
        motion.active_count(entity),
        1,
        "Second translate replaces the first"
    );

    motion.request(
        entity,
        MotionRequest {
            path: MotionPath::Rotate {
                from: Rotation::default(),
                to: Rotation {
                    x: 1.0,
                    y: 0.0,
                    z: 0.0,
                },
            },
            easing: Easing::Linear,
            pacing: Pacing::Duration(1.0),
            on_complete: None,
        },
    );
    assert_eq!(
        motion.active_count(entity),
        2,
        "Translate and rotate coexist"
    );

    // The replaced translate's completion never fires; only the live one
    // completes.
    let mut completions = 0;
    for _ in 0..40 {
        completions += motion.tick(&mut world, DT).len();
    }
    assert_eq!(completions, 1);
    let pos = world.get::<&Position>(entity).unwrap();
    assert_eq!(*pos, Position::new(-5.0, 0.0, 0.0));
}

#[test]
fn test_easing_boundaries() {
    for easing in [Easing::Linear, Easing::EaseOutQuad, Easing::Spring] {
        assert!(motion::ease(easing, 0.0).abs() < 1e-9, "{easing:?} at 0");
        assert!(
            (motion::ease(easing, 1.0) - 1.0).abs() < 1e-9,
            "{easing:?} at 1"
        );
    }
    // Ease-out decelerates: past the halfway mark at half time.
    assert!(motion::ease(Easing::EaseOutQuad, 0.5) > 0.5);
}

#[test]
fn test_arc_passes_through_via_point() {
    let from = Position::new(0.0, 0.0, 0.0);
    let to = Position::new(40.0, 1.8, 0.0);
    let via = gunnery::cannon_arc_via(&from, &to);

    assert!(
        (via.y - (from.y + to.y) / 2.0 - CANNON_ARC_HEIGHT).abs() < 1e-9,
        "Via point is the midpoint raised by the arc height"
    );

    let halfway = motion::sample_path(&from, Some(&via), &to, 0.5);
    assert!(halfway.range_to(&via) < 1e-9, "Arc passes through the via point");
}

// ---- Ship orientation ----

#[test]
fn test_ship_spawns_facing_viewpoint() {
    // A ship due east of the viewpoint faces west: +z forward rotated to +x
    // is yaw PI/2.
    let spawn = Position::new(500.0, 0.0, 0.0);
    let viewpoint = Position::new(0.0, 1.8, 0.0);
    let yaw = world_setup::look_yaw(&spawn, &viewpoint);
    assert!((yaw - (-std::f64::consts::FRAC_PI_2)).abs() < 1e-9);
}
