//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes host commands,
//! runs all systems at the fixed tick rate, and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic
//! testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use broadside_core::commands::PlayerCommand;
use broadside_core::components::{Reflector, ShipState};
use broadside_core::constants::{DEFAULT_VIEWPOINT, DT, FIRE_INTERVAL_SECS};
use broadside_core::enums::{GamePhase, ShipPhase};
use broadside_core::events::AudioEvent;
use broadside_core::state::GameStateSnapshot;
use broadside_core::types::{Position, SimTime};

use crate::motion::{MotionDone, MotionScheduler};
use crate::score::ScoreState;
use crate::signal::{GameEndSubscription, GameSignal, SignalBus, Subscriber};
use crate::systems;
use crate::systems::spawner::SpawnScheduler;
use crate::world_setup;

/// Configuration for starting a new simulation.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// The player's viewpoint: where cannonballs are aimed and where the
    /// player body stands.
    pub viewpoint: Position,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            viewpoint: Position::new(
                DEFAULT_VIEWPOINT[0],
                DEFAULT_VIEWPOINT[1],
                DEFAULT_VIEWPOINT[2],
            ),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    viewpoint: Position,
    motion: MotionScheduler,
    bus: SignalBus,
    spawner: SpawnScheduler,
    score: ScoreState,
    next_ship_id: u32,
    next_ball_id: u32,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    audio_events: Vec<AudioEvent>,
    /// Weak handle to the single allowed player explosion effect; checked
    /// for liveness before another is spawned.
    player_explosion: Option<Entity>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let mut bus = SignalBus::new();
        // The spawner's registrations last for the engine's lifetime, the
        // same span as the bus itself.
        bus.subscribe(GameSignal::GameStart, Subscriber::Spawner);
        bus.subscribe(GameSignal::GameEnd, Subscriber::Spawner);

        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            viewpoint: config.viewpoint,
            motion: MotionScheduler::new(),
            bus,
            spawner: SpawnScheduler::default(),
            score: ScoreState::default(),
            next_ship_id: 0,
            next_ball_id: 0,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            audio_events: Vec::new(),
            player_explosion: None,
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    ///
    /// After the game ends, motion and collision keep running so in-flight
    /// cannonballs resolve; nothing new can spawn or fire because the ships
    /// are gone and the spawn loop is idle.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if matches!(self.phase, GamePhase::Active | GamePhase::Ended) {
            self.run_systems();
            self.time.advance();
        }

        let audio_events = std::mem::take(&mut self.audio_events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.score,
            audio_events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a read-only reference to the score state.
    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    /// Get a read-only reference to the signal bus.
    #[cfg(test)]
    pub fn bus(&self) -> &SignalBus {
        &self.bus
    }

    /// Get a read-only reference to the spawn scheduler.
    #[cfg(test)]
    pub fn spawner(&self) -> &SpawnScheduler {
        &self.spawner
    }

    /// Get a read-only reference to the motion scheduler.
    #[cfg(test)]
    pub fn motion(&self) -> &MotionScheduler {
        &self.motion
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartGame => {
                if matches!(self.phase, GamePhase::Idle | GamePhase::Ended) {
                    self.reset_world();
                    world_setup::setup_game(&mut self.world, self.viewpoint);
                    self.phase = GamePhase::Active;
                    self.fire_signal(GameSignal::GameStart);
                    log::info!("game started");
                }
            }
            PlayerCommand::EndGame => {
                if matches!(self.phase, GamePhase::Active | GamePhase::Paused) {
                    self.phase = GamePhase::Ended;
                    self.fire_signal(GameSignal::GameEnd);
                    log::info!("game ended at score {}", self.score.score);
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetReflectorPosition { x, y, z } => {
                for (_entity, (_reflector, pos)) in
                    self.world.query_mut::<(&Reflector, &mut Position)>()
                {
                    *pos = Position::new(x, y, z);
                }
            }
        }
    }

    /// Tear down leftovers from a previous game before starting a new one.
    fn reset_world(&mut self) {
        self.world.clear();
        self.motion = MotionScheduler::new();
        self.player_explosion = None;
        self.score.reset();
        self.time = SimTime::default();
        self.next_ship_id = 0;
        self.next_ball_id = 0;
    }

    /// Deliver a signal to every current subscriber.
    fn fire_signal(&mut self, signal: GameSignal) {
        for subscriber in self.bus.subscribers(signal) {
            match (signal, subscriber) {
                (GameSignal::GameStart, Subscriber::Spawner) => {
                    self.spawner.on_game_start(self.time.tick);
                }
                (GameSignal::GameEnd, Subscriber::Spawner) => {
                    self.spawner.on_game_end();
                }
                // Hard cancellation: the ship is removed immediately,
                // bypassing the sink animation.
                (GameSignal::GameEnd, Subscriber::Ship(entity)) => {
                    self.despawn_ship(entity);
                }
                (GameSignal::GameStart, Subscriber::Ship(_)) => {}
            }
        }
    }

    /// Remove a ship on any path: cancel its motions, release its game-end
    /// subscription, despawn.
    fn despawn_ship(&mut self, entity: Entity) {
        self.motion.cancel(entity);
        let token = self
            .world
            .get::<&GameEndSubscription>(entity)
            .map(|sub| sub.0)
            .ok();
        if let Some(token) = token {
            self.bus.unsubscribe(token);
        }
        let _ = self.world.despawn(entity);
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Spawn loop
        systems::spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.spawner,
            &mut self.motion,
            &mut self.bus,
            &mut self.next_ship_id,
            self.viewpoint,
            self.time.tick,
        );
        // 2. Cannon fire
        systems::gunnery::run(
            &mut self.world,
            &mut self.motion,
            &mut self.next_ball_id,
            self.viewpoint,
            &mut self.audio_events,
            self.time.tick,
        );
        // 3. Motion integration + completion callbacks
        let completions = self.motion.tick(&mut self.world, DT);
        for (entity, done) in completions {
            self.handle_motion_done(entity, done);
        }
        // 4. Collision and hit resolution
        systems::ballistics::run(
            &mut self.world,
            &mut self.motion,
            &mut self.score,
            &mut self.rng,
            &mut self.audio_events,
            &mut self.player_explosion,
            &mut self.despawn_buffer,
        );
        // 5. Effect expiry
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer, DT);
    }

    /// React to a motion completion.
    fn handle_motion_done(&mut self, entity: Entity, done: MotionDone) {
        match done {
            // Ship reached its stop point: open fire after one interval.
            MotionDone::Arrival => {
                if let Ok(mut state) = self.world.get::<&mut ShipState>(entity) {
                    if state.phase == ShipPhase::Traveling {
                        state.phase = ShipPhase::Firing;
                        state.next_fire_tick = self.time.tick + (FIRE_INTERVAL_SECS / DT) as u64;
                    }
                }
            }
            // Sunk ship finished its descent: remove it.
            MotionDone::SinkComplete => {
                self.despawn_ship(entity);
            }
            // Returning ball reached its endpoint without striking the
            // source ship: a miss, no score effect.
            MotionDone::ReturnMissed => {
                let _ = self.world.despawn(entity);
            }
        }
    }
}
