//! Minimal physics/scroll world
//!
//! Stands in for the rendering/physics engine: integrates the player under
//! gravity, scrolls obstacle pairs, discards them off-screen and reports
//! edge-triggered contact-begin events.

use std::collections::BTreeSet;

use glam::Vec2;

use super::collision::{Aabb, BodyTag, Contact};
use super::state::{ObstaclePair, PairId, Player};
use crate::settings::Settings;

/// Ground slab thickness
const GROUND_THICKNESS: f32 = 1.0;

/// Results of one world step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepEvents {
    /// Contacts that began this step, in body order
    pub contacts: Vec<Contact>,
    /// Pairs that scrolled fully off the left edge
    pub despawned: Vec<PairId>,
}

/// The simulated world
#[derive(Debug, Clone)]
pub struct World {
    pub width: f32,
    pub height: f32,
    gravity: f32,
    scroll_speed: f32,
    time_scale: f32,
    ground: Aabb,
    pairs: Vec<ObstaclePair>,
    /// Bodies currently overlapping the player
    touching: BTreeSet<BodyTag>,
}

impl World {
    pub fn new(settings: &Settings) -> Self {
        let width = settings.playfield_width;
        Self {
            width,
            height: settings.playfield_height,
            gravity: settings.gravity,
            scroll_speed: settings.scroll_speed,
            time_scale: 1.0,
            // Spans the whole playfield; top surface at y = 0
            ground: Aabb::new(
                Vec2::new(width / 2.0, -GROUND_THICKNESS / 2.0),
                Vec2::new(width, GROUND_THICKNESS),
            ),
            pairs: Vec::new(),
            touching: BTreeSet::new(),
        }
    }

    pub fn spawn(&mut self, pair: ObstaclePair) {
        self.pairs.push(pair);
    }

    /// Remove every obstacle and forget all overlaps
    pub fn clear(&mut self) {
        self.pairs.clear();
        self.touching.clear();
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn pairs(&self) -> &[ObstaclePair] {
        &self.pairs
    }

    pub fn ground(&self) -> &Aabb {
        &self.ground
    }

    /// Advance by `dt` seconds of real time (scaled by the time scale)
    pub fn step(&mut self, player: &mut Player, dt: f32) -> StepEvents {
        let mut events = StepEvents::default();
        let dt = dt * self.time_scale;
        if dt <= 0.0 {
            return events;
        }

        player.integrate(self.gravity, dt);
        self.resolve_ground(player);

        let dx = -self.scroll_speed * dt;
        for pair in &mut self.pairs {
            pair.scroll(dx);
        }

        let touching = &mut self.touching;
        self.pairs.retain(|pair| {
            if pair.right_edge() < 0.0 {
                events.despawned.push(pair.id);
                touching.retain(|tag| tag.pair() != Some(pair.id));
                false
            } else {
                true
            }
        });

        self.detect_contacts(player, &mut events.contacts);
        events
    }

    /// Keep the player from sinking through the ground
    fn resolve_ground(&self, player: &mut Player) {
        if !BodyTag::Player.filter().collides_with(&BodyTag::Ground.filter()) {
            return;
        }
        let top = self.ground.max().y;
        if player.pos.y - player.radius < top {
            player.pos.y = top + player.radius;
            player.vel.y = player.vel.y.max(0.0);
        }
    }

    fn detect_contacts(&mut self, player: &Player, contacts: &mut Vec<Contact>) {
        let player_filter = BodyTag::Player.filter();

        let mut bodies: Vec<(BodyTag, Aabb)> = Vec::with_capacity(1 + self.pairs.len() * 3);
        bodies.push((BodyTag::Ground, self.ground));
        for pair in &self.pairs {
            bodies.push((BodyTag::Upper(pair.id), pair.upper));
            bodies.push((BodyTag::Lower(pair.id), pair.lower));
            bodies.push((BodyTag::Gap(pair.id), pair.gap));
        }

        for (tag, aabb) in bodies {
            if !player_filter.wants_contact(&tag.filter()) {
                continue;
            }
            if aabb.overlaps_circle(player.pos, player.radius) {
                if self.touching.insert(tag) {
                    contacts.push(Contact::new(BodyTag::Player, tag));
                }
            } else {
                self.touching.remove(&tag);
            }
        }
    }
}
