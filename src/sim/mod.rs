//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod sensor;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::hulls_overlap;
pub use rect::Rect;
pub use sensor::sensor_state;
pub use spawn::homing_heading;
pub use state::{Entity, EntityId, Explosion, Laser, Meteor, Ship, World};
pub use tick::{Action, Axis, step};
