//! Obstacle pair generation
//!
//! Playfield space: y up, ground at y = 0, pairs enter at the right edge
//! (x = width) and scroll toward x = 0.

use glam::Vec2;
use rand::Rng;

use super::collision::Aabb;
use super::state::{ObstaclePair, PairId};
use crate::settings::Settings;

/// Random gap-centre offset, uniform in [-height/4, height/4)
pub fn gap_offset<R: Rng>(playfield_height: f32, rng: &mut R) -> f32 {
    let span = playfield_height / 2.0;
    rng.random_range(0.0..span) - playfield_height / 4.0
}

/// Lay out a pair at the right edge for a given gap offset
///
/// Both obstacles sit the same distance from the gap centre, so
/// `upper.y - lower.y == gap_height + obstacle_height` for any offset.
pub fn layout_pair(id: PairId, settings: &Settings, gap_offset: f32) -> ObstaclePair {
    let gap_height = settings.gap_height();
    let x = settings.playfield_width;
    let gap_y = settings.playfield_height / 2.0 + gap_offset;
    let obstacle_size = Vec2::new(settings.obstacle_width, settings.obstacle_height);
    let half_stack = gap_height / 2.0 + settings.obstacle_height / 2.0;

    ObstaclePair {
        id,
        gap_offset,
        gap_height,
        upper: Aabb::new(Vec2::new(x, gap_y + half_stack), obstacle_size),
        lower: Aabb::new(Vec2::new(x, gap_y - half_stack), obstacle_size),
        gap: Aabb::new(
            Vec2::new(x, gap_y),
            Vec2::new(settings.obstacle_width, gap_height),
        ),
    }
}

/// Spawn a new pair with a random gap position
pub fn spawn_pair<R: Rng>(id: PairId, settings: &Settings, rng: &mut R) -> ObstaclePair {
    let offset = gap_offset(settings.playfield_height, rng);
    layout_pair(id, settings, offset)
}
