//! Fixed-arity sensor encodings ("radar")
//!
//! Pure functions of the current world state. The output length depends
//! only on the configured encoding, never on how many meteors are live, so
//! a controller can commit to a fixed input layer. Two historical layouts
//! are supported; a deployment picks exactly one.

use std::f32::consts::TAU;

use super::state::World;
use crate::config::SensorEncoding;
use crate::consts::SENSOR_VELOCITY_SCALE;
use crate::full_angle;

/// Encode the current world state for the controller.
///
/// Layouts (position terms in [-1, 1], everything else in [0, 1]):
/// - Sector radar: `[ship_x, ship_y, sector_0..sector_N, can_fire]`
/// - Nearest-K: `[ship_x, ship_y, (dx, dy, vx, vy) * K, can_fire]`
pub fn sensor_state(world: &World) -> Vec<f32> {
    match world.config().sensor {
        SensorEncoding::SectorRadar { sectors } => sector_radar(world, sectors),
        SensorEncoding::NearestK { k } => nearest_k(world, k),
    }
}

fn ship_position_terms(world: &World) -> (f32, f32) {
    let config = world.config();
    let center = world.ship.rect.center;
    (
        center.x / config.width * 2.0 - 1.0,
        center.y / config.height * 2.0 - 1.0,
    )
}

fn sector_radar(world: &World, sectors: usize) -> Vec<f32> {
    let mut radar = vec![0.0f32; sectors];
    let max_dist = world.config().diagonal();
    let ship_center = world.ship.rect.center;

    for (_, meteor) in world.meteors() {
        let offset = meteor.rect.center - ship_center;
        let sector = (full_angle(offset) / (TAU / sectors as f32)) as usize;
        // Guard against the angle landing exactly on 2π after rounding
        let sector = sector.min(sectors - 1);
        let proximity = 1.0 - (offset.length() / max_dist).min(1.0);
        if radar[sector] < proximity {
            radar[sector] = proximity;
        }
    }

    let (sx, sy) = ship_position_terms(world);
    let mut out = Vec::with_capacity(sectors + 3);
    out.push(sx);
    out.push(sy);
    out.extend_from_slice(&radar);
    out.push(if world.ship.can_fire { 1.0 } else { 0.0 });
    out
}

fn nearest_k(world: &World, k: usize) -> Vec<f32> {
    let config = world.config();
    let ship_center = world.ship.rect.center;

    // (distance, dx, dy, vx, vy) per meteor, nearest first
    let mut entries: Vec<(f32, [f32; 4])> = world
        .meteors()
        .map(|(_, m)| {
            let offset = m.rect.center - ship_center;
            let vel = m.velocity();
            (
                offset.length_squared(),
                [
                    offset.x / config.width,
                    offset.y / config.height,
                    vel.x / SENSOR_VELOCITY_SCALE,
                    vel.y / SENSOR_VELOCITY_SCALE,
                ],
            )
        })
        .collect();
    entries.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let (sx, sy) = ship_position_terms(world);
    let mut out = Vec::with_capacity(2 + 4 * k + 1);
    out.push(sx);
    out.push(sy);
    for slot in 0..k {
        match entries.get(slot) {
            Some((_, terms)) => out.extend_from_slice(terms),
            None => out.extend_from_slice(&[0.0; 4]),
        }
    }
    out.push(if world.ship.can_fire { 1.0 } else { 0.0 });
    out
}
