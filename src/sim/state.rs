//! Simulation state and entity types
//!
//! One `World` exclusively owns every entity for one episode. Non-ship
//! entities live in a single arena keyed by id, with separate per-role index
//! sets, so the "all entities" view and the role views can never diverge
//! during removal. Iteration is id-ordered for determinism.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::config::WorldConfig;
use crate::error::Result;

/// Identifier of an arena entity; monotonically increasing, never reused
/// within an episode.
pub type EntityId = u32;

/// The player-controlled ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub rect: Rect,
    /// Zero vector or unit length after every update
    pub heading: Vec2,
    pub speed: f32,
    pub can_fire: bool,
    /// Seconds until the weapon re-arms; only meaningful while `can_fire`
    /// is false
    pub cooldown_remaining: f32,
}

impl Ship {
    /// Ship starts armed at the playfield center.
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            rect: Rect::new(
                Vec2::new(config.width / 2.0, config.height / 2.0),
                config.ship_size,
            ),
            heading: Vec2::ZERO,
            speed: config.ship_speed,
            can_fire: true,
            cooldown_remaining: 0.0,
        }
    }
}

/// A laser bolt travelling straight up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub rect: Rect,
    pub speed: f32,
}

/// A falling meteor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub rect: Rect,
    /// Travel direction; left un-normalized for undirected spawns, unit
    /// length for homing spawns
    pub heading: Vec2,
    pub speed: f32,
    /// Seconds since spawn
    pub age: f32,
    pub life_time: f32,
    /// Cosmetic spin in degrees; never part of the collision hull
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Meteor {
    pub fn velocity(&self) -> Vec2 {
        self.heading * self.speed
    }
}

/// A finite explosion animation; purely cosmetic, no physical interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub frame_index: f32,
    pub frame_count: u32,
    pub frame_rate: f32,
}

impl Explosion {
    /// Frame to display this tick
    pub fn current_frame(&self) -> u32 {
        (self.frame_index as u32).min(self.frame_count.saturating_sub(1))
    }
}

/// Closed set of arena entity kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entity {
    Laser(Laser),
    Meteor(Meteor),
    Explosion(Explosion),
}

/// The simulation state for one episode
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) config: WorldConfig,
    /// Seed this episode was built from, for replay
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub ship: Ship,
    pub(crate) entities: BTreeMap<EntityId, Entity>,
    pub(crate) meteors: BTreeSet<EntityId>,
    pub(crate) lasers: BTreeSet<EntityId>,
    next_id: EntityId,
    pub(crate) spawn_timer: f32,
    /// False once the episode has terminated; `step` becomes a no-op
    pub running: bool,
    /// Elapsed simulated seconds
    pub score: f32,
    pub(crate) meteors_destroyed: u32,
}

impl World {
    /// Build a world from an immutable deployment config and an episode
    /// seed. Rejects invalid configs instead of clamping them.
    pub fn new(config: WorldConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let ship = Ship::new(&config);
        Ok(Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ship,
            entities: BTreeMap::new(),
            meteors: BTreeSet::new(),
            lasers: BTreeSet::new(),
            next_id: 1,
            spawn_timer: 0.0,
            running: true,
            score: 0.0,
            meteors_destroyed: 0,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Playfield rect in world coordinates
    pub fn bounds(&self) -> Rect {
        Rect::new(
            Vec2::new(self.config.width / 2.0, self.config.height / 2.0),
            Vec2::new(self.config.width, self.config.height),
        )
    }

    pub(crate) fn insert(&mut self, entity: Entity) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        match entity {
            Entity::Meteor(_) => {
                self.meteors.insert(id);
            }
            Entity::Laser(_) => {
                self.lasers.insert(id);
            }
            Entity::Explosion(_) => {}
        }
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity and its role-index membership in one step.
    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        self.meteors.remove(&id);
        self.lasers.remove(&id);
        Some(entity)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// All live entities in id order
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().map(|(&id, e)| (id, e))
    }

    /// Live meteors in id order
    pub fn meteors(&self) -> impl Iterator<Item = (EntityId, &Meteor)> {
        self.meteors.iter().filter_map(|&id| match self.entities.get(&id) {
            Some(Entity::Meteor(m)) => Some((id, m)),
            _ => None,
        })
    }

    /// Live lasers in id order
    pub fn lasers(&self) -> impl Iterator<Item = (EntityId, &Laser)> {
        self.lasers.iter().filter_map(|&id| match self.entities.get(&id) {
            Some(Entity::Laser(l)) => Some((id, l)),
            _ => None,
        })
    }

    pub fn meteor_count(&self) -> usize {
        self.meteors.len()
    }

    pub fn laser_count(&self) -> usize {
        self.lasers.len()
    }

    /// Meteors destroyed since the last call; resets the counter. The
    /// evaluator reads this once per tick for the destruction reward.
    pub fn take_meteors_destroyed(&mut self) -> u32 {
        std::mem::take(&mut self.meteors_destroyed)
    }
}
