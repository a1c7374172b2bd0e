//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Spawning ---

/// Distance from the harbor center at which ships spawn (meters).
pub const SPAWN_RADIUS: f64 = 500.0;

/// Height of the waterline the ships spawn and sail at (meters).
pub const SPAWN_HEIGHT: f64 = 0.0;

/// Minimum distance from the viewpoint at which a ship stops (meters).
pub const MIN_STOP_DISTANCE: f64 = 30.0;

/// Maximum distance from the viewpoint at which a ship stops (meters).
pub const MAX_STOP_DISTANCE: f64 = 50.0;

/// Time a ship takes to sail from the spawn circle to its stop point.
pub const TRAVEL_TIME_SECS: f64 = 5.0;

/// Extra wait after a ship's arrival before the next ship spawns.
pub const SPAWN_GAP_SECS: f64 = 5.0;

// --- Gunnery ---

/// Delay between shots once a ship is on station.
pub const FIRE_INTERVAL_SECS: f64 = 2.0;

/// Peak of the cannonball trajectory above the path midpoint (meters).
pub const CANNON_ARC_HEIGHT: f64 = 10.0;

/// Speed at which a cannonball travels along its arc (m/s).
pub const CANNON_FIRE_SPEED: f64 = 20.0;

/// Height of the cannon mount above the deck; balls and muzzle flashes
/// originate here.
pub const CANNON_MOUNT_HEIGHT: f64 = 2.0;

// --- Sinking ---

/// Time a hit ship takes to sink (seconds).
pub const SINK_TIME_SECS: f64 = 5.0;

/// How far a hit ship sinks below its position (meters).
pub const SINK_DISTANCE: f64 = 10.0;

/// Magnitude of the randomized tumble a sinking ship rolls through (radians).
pub const TUMBLE_ANGLE: f64 = std::f64::consts::FRAC_PI_2;

// --- Collision ranges ---

/// Range at which an outbound ball is caught by the reflector (meters).
pub const REFLECT_HIT_RANGE: f64 = 1.2;

/// Range at which an outbound ball strikes the player body (meters).
pub const PLAYER_HIT_RANGE: f64 = 0.8;

/// Range at which a returning ball strikes its source ship (meters).
pub const SHIP_HIT_RANGE: f64 = 2.5;

// --- Scoring ---

/// Points awarded when a reflected ball sinks its source ship.
pub const SHIP_SUNK_REWARD: u32 = 10;

/// Points deducted when a cannonball gets through to the player.
/// The score saturates at zero; it never goes negative.
pub const PLAYER_HIT_PENALTY: u32 = 5;

// --- Effects ---

/// Muzzle flash lifetime (seconds).
pub const MUZZLE_FLASH_TTL_SECS: f64 = 0.5;

/// Ship explosion lifetime (seconds).
pub const SHIP_EXPLOSION_TTL_SECS: f64 = 2.0;

/// Player explosion lifetime (seconds). At most one is alive at a time.
pub const PLAYER_EXPLOSION_TTL_SECS: f64 = 3.0;

// --- Defaults ---

/// Default viewpoint (player eye) position: harbor center at eye height.
pub const DEFAULT_VIEWPOINT: [f64; 3] = [0.0, 1.8, 0.0];

/// Default reflector guard position: held just below the viewpoint, where
/// its catch radius covers every inbound arc before the player hitbox does.
pub const DEFAULT_REFLECTOR: [f64; 3] = [0.0, 1.5, 0.0];
