//! Meteor Run - a meteor-dodging arcade simulation and training environment
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, spawning, sensors)
//! - `eval`: Episodic fitness evaluation driving the sim with an external controller
//! - `config`: Data-driven deployment configuration
//! - `error`: Fail-fast contract violations

pub mod config;
pub mod error;
pub mod eval;
pub mod sim;

pub use config::{BoundaryPolicy, FitnessWeights, SensorEncoding, WorldConfig};
pub use error::{Result, SimError};

use glam::Vec2;

/// Default deployment constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate controllers are trained at)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 1280.0;
    pub const PLAYFIELD_HEIGHT: f32 = 720.0;

    /// Ship defaults
    pub const SHIP_WIDTH: f32 = 112.0;
    pub const SHIP_HEIGHT: f32 = 75.0;
    pub const SHIP_SPEED: f32 = 300.0;
    pub const FIRE_COOLDOWN: f32 = 0.4;

    /// Laser defaults
    pub const LASER_WIDTH: f32 = 9.0;
    pub const LASER_HEIGHT: f32 = 54.0;
    pub const LASER_SPEED: f32 = 400.0;

    /// Meteor defaults
    pub const METEOR_WIDTH: f32 = 101.0;
    pub const METEOR_HEIGHT: f32 = 84.0;
    pub const METEOR_SPEED_MIN: f32 = 200.0;
    pub const METEOR_SPEED_MAX: f32 = 250.0;
    pub const METEOR_LIFE_TIME: f32 = 6.0;
    /// Cosmetic spin range (degrees per second)
    pub const METEOR_ROTATION_MIN: f32 = 40.0;
    pub const METEOR_ROTATION_MAX: f32 = 80.0;

    /// Spawn policy defaults
    pub const SPAWN_INTERVAL: f32 = 0.5;
    pub const HOMING_CHANCE: f32 = 0.1;
    pub const SPAWN_Y_MIN: f32 = -200.0;
    pub const SPAWN_Y_MAX: f32 = -100.0;

    /// Sector radar resolution
    pub const RADAR_SECTORS: usize = 16;
    /// Velocity normalization scale for the nearest-K encoding
    pub const SENSOR_VELOCITY_SCALE: f32 = 500.0;

    /// Explosion playback
    pub const EXPLOSION_FRAMES: u32 = 21;
    pub const EXPLOSION_FRAME_RATE: f32 = 25.0;
}

/// Map a vector's direction to an angle in [0, 2π)
#[inline]
pub fn full_angle(v: Vec2) -> f32 {
    v.y.atan2(v.x).rem_euclid(std::f32::consts::TAU)
}
