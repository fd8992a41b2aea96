//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pair ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod controller;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;
pub mod world;

pub use collision::{Aabb, BodyFilter, BodyTag, Contact, ContactKind, category, classify};
pub use controller::{RunCommand, RunController, RunTimer};
pub use spawner::{gap_offset, layout_pair, spawn_pair};
pub use state::{ObstaclePair, PairId, PairLedger, Player, RunPhase, RunState};
pub use tick::{FrameClock, Game, TickInput, tick};
pub use timer::{TimerHandle, Timers};
pub use world::{StepEvents, World};
