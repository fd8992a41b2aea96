//! Flap Run - tap-to-flap side-scroller run logic
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, run state machine)
//! - `hud`: Score and status labels
//! - `settings`: Data-driven run configuration

pub mod hud;
pub mod settings;
pub mod sim;

pub use hud::Hud;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the clock will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 480.0;
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;

    /// Player sprite size
    pub const PLAYER_WIDTH: f32 = 34.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;
    /// Player mass (impulse / mass = velocity change)
    pub const PLAYER_MASS: f32 = 0.2;

    /// Obstacle (pipe) sprite size
    pub const OBSTACLE_WIDTH: f32 = 52.0;
    pub const OBSTACLE_HEIGHT: f32 = 640.0;
    /// Gap height = player height * this
    pub const GAP_MULTIPLIER: f32 = 4.0;

    /// Seconds between obstacle spawns
    pub const SPAWN_INTERVAL: f32 = 3.0;
    /// Seconds between death and the "tap to play again" message
    pub const DEATH_MESSAGE_DELAY: f32 = 2.0;

    /// Pairs travel 2 * width over width / 100 seconds
    pub const SCROLL_SPEED: f32 = 200.0;
    /// Upward impulse per tap
    pub const FLAP_IMPULSE: f32 = 50.0;
    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 980.0;
}

/// Status label texts
pub mod text {
    pub const PROMPT: &str = "Tap anywhere to begin";
    pub const GAME_OVER: &str = "Game over! Tap to play again!";

    /// Status shown the moment a run ends
    pub fn final_score(score: u32) -> String {
        format!("Score: {}", score)
    }
}
