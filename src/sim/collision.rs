//! Collision filtering and contact classification
//!
//! Bodies carry a category/contact/collision bitmask triple. The world uses
//! the masks to decide which overlaps are reported; the run controller only
//! cares whether a reported contact involved a gap sensor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::PairId;

/// Body categories (mutually exclusive bits)
pub mod category {
    pub const PLAYER: u32 = 1;
    pub const OBJECT: u32 = 2;
    pub const GAP: u32 = 4;
}

/// Category/contact/collision bitmask triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyFilter {
    /// What this body is
    pub category: u32,
    /// Categories whose overlap with this body should be reported
    pub contact_mask: u32,
    /// Categories this body physically collides with
    pub collision_mask: u32,
}

impl BodyFilter {
    pub const PLAYER: Self = Self {
        category: category::PLAYER,
        contact_mask: category::OBJECT,
        collision_mask: category::OBJECT,
    };

    /// Obstacles and ground
    pub const SOLID: Self = Self {
        category: category::OBJECT,
        contact_mask: category::PLAYER,
        collision_mask: category::PLAYER,
    };

    /// Gap sensor: reports the player but never blocks it
    pub const GAP: Self = Self {
        category: category::GAP,
        contact_mask: category::PLAYER,
        collision_mask: category::GAP,
    };

    /// Whether an overlap between the two bodies generates a contact event
    pub fn wants_contact(&self, other: &BodyFilter) -> bool {
        (self.category & other.contact_mask) != 0 || (other.category & self.contact_mask) != 0
    }

    /// Whether this body is physically blocked by `other`
    pub fn collides_with(&self, other: &BodyFilter) -> bool {
        (self.collision_mask & other.category) != 0
    }
}

/// What a contact means for the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    /// Player entered a gap sensor
    GapPass,
    /// Player touched an obstacle or the ground
    SolidHit,
}

/// Classify a contact from the categories of its two participants
pub fn classify(category_a: u32, category_b: u32) -> ContactKind {
    if category_a == category::GAP || category_b == category::GAP {
        ContactKind::GapPass
    } else {
        ContactKind::SolidHit
    }
}

/// Identifies a tracked body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BodyTag {
    Player,
    Ground,
    Upper(PairId),
    Lower(PairId),
    Gap(PairId),
}

impl BodyTag {
    pub fn filter(&self) -> BodyFilter {
        match self {
            BodyTag::Player => BodyFilter::PLAYER,
            BodyTag::Ground | BodyTag::Upper(_) | BodyTag::Lower(_) => BodyFilter::SOLID,
            BodyTag::Gap(_) => BodyFilter::GAP,
        }
    }

    pub fn category(&self) -> u32 {
        self.filter().category
    }

    /// Obstacle pair this body belongs to, if any
    pub fn pair(&self) -> Option<PairId> {
        match self {
            BodyTag::Upper(id) | BodyTag::Lower(id) | BodyTag::Gap(id) => Some(*id),
            BodyTag::Player | BodyTag::Ground => None,
        }
    }
}

/// Contact-begin notification between two bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: BodyTag,
    pub b: BodyTag,
}

impl Contact {
    pub fn new(a: BodyTag, b: BodyTag) -> Self {
        Self { a, b }
    }

    pub fn kind(&self) -> ContactKind {
        classify(self.a.category(), self.b.category())
    }

    /// Obstacle pair involved in this contact (first participant wins)
    pub fn pair(&self) -> Option<PairId> {
        self.a.pair().or(self.b.pair())
    }
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size / 2.0,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    /// Closest point inside the box to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min(), self.max())
    }

    /// Circle overlap, touching counts
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        self.closest_point(center).distance_squared(center) <= radius * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_gap_either_side() {
        assert_eq!(classify(category::GAP, category::PLAYER), ContactKind::GapPass);
        assert_eq!(classify(category::PLAYER, category::GAP), ContactKind::GapPass);
    }

    #[test]
    fn test_classify_solid() {
        assert_eq!(classify(category::PLAYER, category::OBJECT), ContactKind::SolidHit);
        assert_eq!(classify(category::OBJECT, category::PLAYER), ContactKind::SolidHit);
    }

    #[test]
    fn test_filters_report_player_contacts() {
        assert!(BodyFilter::PLAYER.wants_contact(&BodyFilter::SOLID));
        assert!(BodyFilter::PLAYER.wants_contact(&BodyFilter::GAP));
        assert!(!BodyFilter::SOLID.wants_contact(&BodyFilter::SOLID));
        assert!(!BodyFilter::SOLID.wants_contact(&BodyFilter::GAP));
    }

    #[test]
    fn test_player_blocked_by_solids_only() {
        assert!(BodyFilter::PLAYER.collides_with(&BodyFilter::SOLID));
        assert!(!BodyFilter::PLAYER.collides_with(&BodyFilter::GAP));
    }

    #[test]
    fn test_contact_pair_lookup() {
        let contact = Contact::new(BodyTag::Player, BodyTag::Gap(7));
        assert_eq!(contact.kind(), ContactKind::GapPass);
        assert_eq!(contact.pair(), Some(7));

        let ground = Contact::new(BodyTag::Ground, BodyTag::Player);
        assert_eq!(ground.kind(), ContactKind::SolidHit);
        assert_eq!(ground.pair(), None);
    }

    #[test]
    fn test_aabb_circle_overlap() {
        let aabb = Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(20.0, 40.0));

        // Inside
        assert!(aabb.overlaps_circle(Vec2::new(100.0, 100.0), 1.0));
        // Just touching the right edge
        assert!(aabb.overlaps_circle(Vec2::new(115.0, 100.0), 5.0));
        // Clear miss off the corner
        assert!(!aabb.overlaps_circle(Vec2::new(120.0, 130.0), 5.0));
    }
}
