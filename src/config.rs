//! Deployment configuration
//!
//! Every tunable the simulation depends on lives here. A `World` receives an
//! immutable copy at construction and never reads ambient state, so two
//! Worlds built from the same config and seed replay identically.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

/// What happens when the ship reaches a playfield edge.
///
/// The two rules are historical alternatives, not a runtime toggle: a
/// deployment picks one and the fitness weights are tuned against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoundaryPolicy {
    /// Ship is held inside the playfield; edges are never lethal.
    Clamp,
    /// Touching any edge ends the episode.
    #[default]
    Lethal,
}

/// Which fixed-arity sensor layout a deployment exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorEncoding {
    /// Angular proximity buckets around the ship.
    SectorRadar { sectors: usize },
    /// Relative position and velocity of the K nearest meteors.
    NearestK { k: usize },
}

impl Default for SensorEncoding {
    fn default() -> Self {
        SensorEncoding::SectorRadar {
            sectors: RADAR_SECTORS,
        }
    }
}

impl SensorEncoding {
    /// Sensor vector arity. Fixed for a given encoding regardless of how
    /// many meteors are live, which is what lets a controller have a fixed
    /// input layer.
    pub fn arity(&self) -> usize {
        match *self {
            // ship x, ship y, one value per sector, can-fire flag
            SensorEncoding::SectorRadar { sectors } => 2 + sectors + 1,
            // ship x, ship y, (dx, dy, vx, vy) per slot, can-fire flag
            SensorEncoding::NearestK { k } => 2 + 4 * k + 1,
        }
    }
}

/// Immutable per-deployment simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Playfield width in pixels
    pub width: f32,
    /// Playfield height in pixels
    pub height: f32,

    pub ship_size: Vec2,
    pub ship_speed: f32,
    /// Seconds between shots
    pub fire_cooldown: f32,

    pub laser_size: Vec2,
    pub laser_speed: f32,

    pub meteor_size: Vec2,
    pub meteor_speed_min: f32,
    pub meteor_speed_max: f32,
    /// Seconds a meteor lives regardless of position
    pub meteor_life_time: f32,
    /// Cosmetic spin range, degrees per second
    pub meteor_rotation_min: f32,
    pub meteor_rotation_max: f32,

    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Fraction of spawns aimed at the ship
    pub homing_chance: f32,
    /// Spawn band above the visible area (negative y, y grows downward)
    pub spawn_y_min: f32,
    pub spawn_y_max: f32,

    /// Frames in the explosion animation
    pub explosion_frames: u32,
    /// Frame advance rate, frames per second
    pub explosion_frame_rate: f32,

    pub boundary: BoundaryPolicy,
    pub sensor: SensorEncoding,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            ship_size: Vec2::new(SHIP_WIDTH, SHIP_HEIGHT),
            ship_speed: SHIP_SPEED,
            fire_cooldown: FIRE_COOLDOWN,
            laser_size: Vec2::new(LASER_WIDTH, LASER_HEIGHT),
            laser_speed: LASER_SPEED,
            meteor_size: Vec2::new(METEOR_WIDTH, METEOR_HEIGHT),
            meteor_speed_min: METEOR_SPEED_MIN,
            meteor_speed_max: METEOR_SPEED_MAX,
            meteor_life_time: METEOR_LIFE_TIME,
            meteor_rotation_min: METEOR_ROTATION_MIN,
            meteor_rotation_max: METEOR_ROTATION_MAX,
            spawn_interval: SPAWN_INTERVAL,
            homing_chance: HOMING_CHANCE,
            spawn_y_min: SPAWN_Y_MIN,
            spawn_y_max: SPAWN_Y_MAX,
            explosion_frames: EXPLOSION_FRAMES,
            explosion_frame_rate: EXPLOSION_FRAME_RATE,
            boundary: BoundaryPolicy::default(),
            sensor: SensorEncoding::default(),
        }
    }
}

impl WorldConfig {
    /// Playfield diagonal, the normalization scale for radar distances.
    #[inline]
    pub fn diagonal(&self) -> f32 {
        self.width.hypot(self.height)
    }

    /// Reject out-of-range values before a `World` is built from them.
    pub fn validate(&self) -> Result<()> {
        fn positive(param: &'static str, value: f32) -> Result<()> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(SimError::InvalidConfig {
                    param,
                    message: format!("must be positive and finite, got {value}"),
                })
            }
        }

        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("ship_size.x", self.ship_size.x)?;
        positive("ship_size.y", self.ship_size.y)?;
        positive("ship_speed", self.ship_speed)?;
        positive("fire_cooldown", self.fire_cooldown)?;
        positive("laser_size.x", self.laser_size.x)?;
        positive("laser_size.y", self.laser_size.y)?;
        positive("laser_speed", self.laser_speed)?;
        positive("meteor_size.x", self.meteor_size.x)?;
        positive("meteor_size.y", self.meteor_size.y)?;
        positive("meteor_life_time", self.meteor_life_time)?;
        positive("spawn_interval", self.spawn_interval)?;
        positive("explosion_frame_rate", self.explosion_frame_rate)?;

        if self.explosion_frames == 0 {
            return Err(SimError::InvalidConfig {
                param: "explosion_frames",
                message: "must be at least 1".to_string(),
            });
        }

        if self.ship_size.x >= self.width || self.ship_size.y >= self.height {
            return Err(SimError::InvalidConfig {
                param: "ship_size",
                message: "ship must fit inside the playfield".to_string(),
            });
        }
        if self.meteor_speed_min < 0.0 || self.meteor_speed_max < self.meteor_speed_min {
            return Err(SimError::InvalidConfig {
                param: "meteor_speed",
                message: format!(
                    "range [{}, {}] must be non-negative and ordered",
                    self.meteor_speed_min, self.meteor_speed_max
                ),
            });
        }
        if self.meteor_rotation_max < self.meteor_rotation_min {
            return Err(SimError::InvalidConfig {
                param: "meteor_rotation",
                message: "range must be ordered".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.homing_chance) {
            return Err(SimError::InvalidConfig {
                param: "homing_chance",
                message: format!("must be in [0, 1], got {}", self.homing_chance),
            });
        }
        if self.spawn_y_max < self.spawn_y_min {
            return Err(SimError::InvalidConfig {
                param: "spawn_y",
                message: "range must be ordered".to_string(),
            });
        }
        match self.sensor {
            SensorEncoding::SectorRadar { sectors } if sectors == 0 => {
                return Err(SimError::InvalidConfig {
                    param: "sensor.sectors",
                    message: "must be at least 1".to_string(),
                });
            }
            SensorEncoding::NearestK { k } if k == 0 => {
                return Err(SimError::InvalidConfig {
                    param: "sensor.k",
                    message: "must be at least 1".to_string(),
                });
            }
            _ => {}
        }
        Ok(())
    }
}

/// Weights for the per-tick fitness shaping applied by the evaluator.
///
/// These are training-objective tuning knobs, not sim invariants; defaults
/// match the sector-radar deployment the lethal boundary was tuned with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// Reward per second survived
    pub survival: f32,
    /// Reward per meteor destroyed
    pub destruction: f32,
    /// Penalty per second spent with near-zero movement
    pub idle_penalty: f32,
    /// Penalty per second at full edge proximity (scales quadratically
    /// inside the margin)
    pub edge_penalty: f32,
    /// Distance from an edge, in pixels, where the proximity penalty starts
    pub edge_margin: f32,
    /// One-time penalty when the episode terminates
    pub death_penalty: f32,
    /// Clamp each episode's fitness at a floor of zero
    pub clamp_floor: bool,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            survival: 0.1,
            destruction: 50.0,
            idle_penalty: 0.5,
            edge_penalty: 10.0,
            edge_margin: 120.0,
            death_penalty: 20.0,
            clamp_floor: true,
        }
    }
}

impl FitnessWeights {
    pub fn validate(&self) -> Result<()> {
        if self.edge_margin <= 0.0 || !self.edge_margin.is_finite() {
            return Err(SimError::InvalidConfig {
                param: "edge_margin",
                message: format!("must be positive, got {}", self.edge_margin),
            });
        }
        Ok(())
    }
}
