//! Run settings
//!
//! Every tunable of a run. Loaded from JSON; anything missing falls back to
//! the defaults in `crate::consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_mass: f32,
    /// Upward impulse applied per tap
    pub flap_impulse: f32,
    /// Downward acceleration while the player is dynamic
    pub gravity: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    /// Gap height as a multiple of player height
    pub gap_multiplier: f32,
    /// Leftward scroll speed (units/s)
    pub scroll_speed: f32,

    // === Timing ===
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Seconds from death until restart is accepted
    pub death_message_delay: f32,

    /// Fixed RNG seed (None = derive from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_mass: PLAYER_MASS,
            flap_impulse: FLAP_IMPULSE,
            gravity: GRAVITY,

            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            gap_multiplier: GAP_MULTIPLIER,
            scroll_speed: SCROLL_SPEED,

            spawn_interval: SPAWN_INTERVAL,
            death_message_delay: DEATH_MESSAGE_DELAY,

            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read settings {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replace degenerate values (non-finite or <= 0) with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let fields = [
            (&mut self.playfield_width, defaults.playfield_width, "playfield_width"),
            (&mut self.playfield_height, defaults.playfield_height, "playfield_height"),
            (&mut self.player_width, defaults.player_width, "player_width"),
            (&mut self.player_height, defaults.player_height, "player_height"),
            (&mut self.player_mass, defaults.player_mass, "player_mass"),
            (&mut self.obstacle_width, defaults.obstacle_width, "obstacle_width"),
            (&mut self.obstacle_height, defaults.obstacle_height, "obstacle_height"),
            (&mut self.gap_multiplier, defaults.gap_multiplier, "gap_multiplier"),
            (&mut self.scroll_speed, defaults.scroll_speed, "scroll_speed"),
            (&mut self.spawn_interval, defaults.spawn_interval, "spawn_interval"),
            (&mut self.death_message_delay, defaults.death_message_delay, "death_message_delay"),
        ];
        for (value, default, name) in fields {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("Setting {} = {} is invalid, using {}", name, value, default);
                *value = default;
            }
        }
        // Impulse and gravity may be zero, but not negative or NaN
        if !self.flap_impulse.is_finite() || self.flap_impulse < 0.0 {
            self.flap_impulse = defaults.flap_impulse;
        }
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            self.gravity = defaults.gravity;
        }
        self
    }

    /// Gap height for this run (player height * multiplier)
    pub fn gap_height(&self) -> f32 {
        self.player_height * self.gap_multiplier
    }

    /// Vertical velocity right after a tap
    pub fn flap_velocity(&self) -> f32 {
        self.flap_impulse / self.player_mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gap_is_four_players() {
        let settings = Settings::default();
        assert_eq!(settings.gap_height(), settings.player_height * 4.0);
    }

    #[test]
    fn test_from_json_partial() {
        let settings = Settings::from_json(r#"{ "spawn_interval": 1.5, "seed": 7 }"#).unwrap();
        assert_eq!(settings.spawn_interval, 1.5);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.playfield_width, PLAYFIELD_WIDTH);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_sanitized_replaces_degenerate_values() {
        let settings = Settings::from_json(r#"{ "playfield_height": -5.0, "spawn_interval": 0.0 }"#)
            .unwrap();
        assert_eq!(settings.playfield_height, PLAYFIELD_HEIGHT);
        assert_eq!(settings.spawn_interval, SPAWN_INTERVAL);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let settings = Settings::load_from("/nonexistent/flap-run/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_json_roundtrip_preserves_seed() {
        let settings = Settings {
            seed: Some(42),
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
