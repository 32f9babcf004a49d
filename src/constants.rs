// --- World ---
pub const WORLD_WIDTH: f64 = 800.0;
pub const WORLD_HEIGHT: f64 = 600.0;

// --- Ship ---
pub const SHIP_SPEED: f64 = 280.0; // World units per second
pub const SHIP_RADIUS: f64 = 16.0;

// --- Bullets ---
pub const BULLET_SPEED: f64 = 560.0;
pub const BULLET_RADIUS: f64 = 4.0;
pub const BULLET_COOLDOWN_MS: f64 = 180.0;
pub const BULLET_EXPIRY_Y: f64 = -20.0; // Bullets only ever travel up

// --- Asteroids ---
pub const ASTEROID_SPAWN_MS: f64 = 980.0;
pub const ASTEROID_MIN_SPEED: f64 = 70.0;
pub const ASTEROID_MAX_SPEED: f64 = 155.0;
pub const ASTEROID_MIN_RADIUS: f64 = 18.0;
pub const ASTEROID_MAX_RADIUS: f64 = 42.0;
pub const ASTEROID_SPAWN_OFFSET: f64 = 24.0; // Distance outside the edge at spawn
pub const ASTEROID_DESPAWN_MARGIN: f64 = 70.0;
pub const ASTEROID_MAX_WOBBLE: f64 = 0.45; // Radians either side of the aim angle
pub const ASTEROID_MAX_SPIN: f64 = 1.2; // Radians per second

// --- Scoring / timing ---
pub const SCORE_PER_ASTEROID: u32 = 10;
pub const SHIP_HIT_FUDGE: f64 = 2.0; // Tightens the ship hit window slightly
pub const MAX_FRAME_DT: f64 = 0.032; // Seconds; bounds movement on frame hitches

// --- Host ---
pub const FRAME_INTERVAL_MS: u64 = 16;
pub const KEY_HOLD_WINDOW_MS: f64 = 200.0; // Autorepeat fallback when release events are unavailable
pub const HIGH_SCORE_FILE: &str = "asteroids-highscore";
