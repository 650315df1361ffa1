//! Collision resolution and termination policy
//!
//! Runs once per tick, after every entity has moved. Ship-vs-meteor uses a
//! precise circular hull test (a spinning meteor sprite must collide the
//! same way at every rotation, and rect corners would report hits the
//! sprites never make). Laser-vs-meteor keeps the coarse rect test.

use super::rect::Rect;
use super::state::{Entity, EntityId, Explosion, World};
use crate::config::BoundaryPolicy;

/// Precise hull overlap between two entities. The hull is the largest
/// circle inscribed in each rect, so rotation never changes the outcome.
pub fn hulls_overlap(a: &Rect, b: &Rect) -> bool {
    let ra = a.half.x.min(a.half.y);
    let rb = b.half.x.min(b.half.y);
    let reach = ra + rb;
    a.center.distance_squared(b.center) <= reach * reach
}

/// One collision pass: ship-vs-meteor, boundary policy, laser-vs-meteor.
///
/// Meteors whose lifetime ran out this same tick are still present here;
/// their removal is committed by the caller afterwards.
pub(crate) fn resolve(world: &mut World) {
    // Ship vs meteor: any hit ends the episode.
    let ship_rect = world.ship.rect;
    let fatal: Vec<EntityId> = world
        .meteors()
        .filter(|(_, m)| hulls_overlap(&ship_rect, &m.rect))
        .map(|(id, _)| id)
        .collect();
    if !fatal.is_empty() {
        for id in fatal {
            world.remove(id);
        }
        world.running = false;
    }

    // Edge contact is lethal only under the autonomous-control rule.
    if world.config.boundary == BoundaryPolicy::Lethal {
        let bounds = world.bounds();
        if !world.ship.rect.strictly_inside(&bounds) {
            world.running = false;
        }
    }

    // Laser vs meteor: a laser takes out every meteor it overlaps this
    // tick, then dies itself, leaving one explosion behind.
    let laser_ids: Vec<EntityId> = world.lasers.iter().copied().collect();
    for laser_id in laser_ids {
        let laser_rect = match world.entity(laser_id) {
            Some(Entity::Laser(l)) => l.rect,
            _ => continue,
        };
        let victims: Vec<EntityId> = world
            .meteors()
            .filter(|(_, m)| laser_rect.overlaps(&m.rect))
            .map(|(id, _)| id)
            .collect();
        if victims.is_empty() {
            continue;
        }
        let destroyed = victims.len() as u32;
        for id in victims {
            world.remove(id);
        }
        world.remove(laser_id);
        world.meteors_destroyed += destroyed;

        world.insert(Entity::Explosion(Explosion {
            pos: laser_rect.midtop(),
            frame_index: 0.0,
            frame_count: world.config.explosion_frames,
            frame_rate: world.config.explosion_frame_rate,
        }));
    }
}
