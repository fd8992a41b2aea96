//! Run state and core simulation types
//!
//! Everything the run controller owns lives here.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::settings::Settings;

/// Obstacle pair identifier (unique for the life of a controller)
pub type PairId = u32;

/// Current phase of a run
///
/// Restarting is not a resting phase: an accepted restart tap resets
/// straight back to `NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Player frozen in place, waiting for the first tap
    NotStarted,
    /// Active gameplay
    Running,
    /// Run over. Restart is accepted once the game-over message has shown
    Ended { message_shown: bool },
}

/// The player's sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    /// Whether physics currently affects the player
    pub dynamic: bool,
}

impl Player {
    /// Player at the playfield centre, not yet dynamic
    pub fn new(settings: &Settings) -> Self {
        Self {
            pos: Vec2::new(settings.playfield_width / 2.0, settings.playfield_height / 2.0),
            vel: Vec2::ZERO,
            radius: settings.player_height / 2.0,
            mass: settings.player_mass,
            dynamic: false,
        }
    }

    pub fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    /// Apply an impulse (no effect on a static body)
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.dynamic {
            self.vel += impulse / self.mass;
        }
    }

    /// Integrate gravity and velocity
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        if !self.dynamic {
            return;
        }
        self.vel.y -= gravity * dt;
        self.pos += self.vel * dt;
    }
}

/// Two solid obstacles and the gap sensor between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub id: PairId,
    /// Random vertical offset of the gap centre from mid-playfield
    pub gap_offset: f32,
    pub gap_height: f32,
    pub upper: Aabb,
    pub lower: Aabb,
    pub gap: Aabb,
}

impl ObstaclePair {
    /// Shared horizontal position
    pub fn x(&self) -> f32 {
        self.gap.center.x
    }

    /// Right-most edge of any of the three bodies
    pub fn right_edge(&self) -> f32 {
        self.upper.max().x.max(self.lower.max().x).max(self.gap.max().x)
    }

    /// Scroll all three bodies horizontally
    pub fn scroll(&mut self, dx: f32) {
        let delta = Vec2::new(dx, 0.0);
        self.upper.translate(delta);
        self.lower.translate(delta);
        self.gap.translate(delta);
    }
}

/// Per-run bookkeeping for a spawned pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairLedger {
    /// Gap pass already counted for this pair
    pub scored: bool,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Seed the controller's RNG was created from
    pub rng_state: RngState,
    pub phase: RunPhase,
    /// Gaps passed this run
    pub score: u32,
    pub player: Player,
    /// Runs started since the controller was created
    pub runs: u32,
    /// Pairs spawned this run that have not been destroyed yet
    pub pairs: BTreeMap<PairId, PairLedger>,
    /// Next pair ID (never reset, so old IDs cannot alias new pairs)
    next_id: PairId,
}

impl RunState {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            rng_state: RngState::new(seed),
            phase: RunPhase::NotStarted,
            score: 0,
            player: Player::new(settings),
            runs: 0,
            pairs: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Back to the freshly set up state (IDs keep counting)
    pub fn reset(&mut self, settings: &Settings) {
        self.phase = RunPhase::NotStarted;
        self.score = 0;
        self.player = Player::new(settings);
        self.pairs.clear();
    }

    /// Allocate a new pair ID
    pub fn next_pair_id(&mut self) -> PairId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_started(&self) -> bool {
        !matches!(self.phase, RunPhase::NotStarted)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, RunPhase::Ended { .. })
    }

    /// Death-message latch: set from the fatal hit until restart
    pub fn awaiting_restart_ack(&self) -> bool {
        self.is_game_over()
    }
}
