//! Fixed timestep simulation tick
//!
//! Advances one `World` by one deterministic step: apply the controller's
//! action to the ship, move every entity, resolve collisions, run the spawn
//! policy, accrue score. Nothing here calls out to the controller; the
//! evaluator (or a game loop) pulls sensor state and pushes actions.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Entity, EntityId, Laser, World};
use super::{collision, spawn};

/// One discrete control axis: -1, 0 or +1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    Neg,
    #[default]
    Zero,
    Pos,
}

impl Axis {
    #[inline]
    pub fn as_f32(self) -> f32 {
        match self {
            Axis::Neg => -1.0,
            Axis::Zero => 0.0,
            Axis::Pos => 1.0,
        }
    }

    /// Discretize a continuous controller output at the ±0.5 thresholds.
    /// Non-finite values fall through to `Zero`.
    pub fn from_output(value: f32) -> Self {
        if value > 0.5 {
            Axis::Pos
        } else if value < -0.5 {
            Axis::Neg
        } else {
            Axis::Zero
        }
    }
}

/// Control input for one tick. The axes are typed, so a malformed action
/// is unrepresentable rather than silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Action {
    pub move_x: Axis,
    pub move_y: Axis,
    pub fire: bool,
}

impl Action {
    pub const IDLE: Action = Action {
        move_x: Axis::Zero,
        move_y: Axis::Zero,
        fire: false,
    };

    pub fn new(move_x: Axis, move_y: Axis, fire: bool) -> Self {
        Self {
            move_x,
            move_y,
            fire,
        }
    }
}

/// Advance the world by one fixed timestep. No-op once the episode has
/// terminated.
pub fn step(world: &mut World, action: &Action, dt: f32) {
    if !world.running {
        return;
    }

    apply_action(world, action, dt);

    // Move every arena entity. Meteors that reach end of life this tick
    // are only marked here: the collision pass must still see them, so a
    // meteor expiring on top of the ship ends the episode rather than
    // quietly despawning.
    let mut exited: Vec<EntityId> = Vec::new();
    let mut expiring: Vec<EntityId> = Vec::new();
    for (&id, entity) in world.entities.iter_mut() {
        match entity {
            Entity::Laser(laser) => {
                laser.rect.center.y -= laser.speed * dt;
                if laser.rect.bottom() < 0.0 {
                    exited.push(id);
                }
            }
            Entity::Meteor(meteor) => {
                meteor.rect.center += meteor.heading * meteor.speed * dt;
                meteor.age += dt;
                meteor.rotation += meteor.rotation_speed * dt;
                if meteor.age >= meteor.life_time {
                    expiring.push(id);
                }
            }
            Entity::Explosion(explosion) => {
                explosion.frame_index += explosion.frame_rate * dt;
                if explosion.frame_index >= explosion.frame_count as f32 {
                    exited.push(id);
                }
            }
        }
    }
    for id in exited {
        world.remove(id);
    }

    collision::resolve(world);

    // Commit lifetime expiry; a collision may have removed some already.
    for id in expiring {
        world.remove(id);
    }

    spawn::run(world, dt);

    world.score += dt;
}

/// Apply the action to the ship: heading, movement, boundary clamp,
/// weapon cooldown, firing. At most one laser per tick.
fn apply_action(world: &mut World, action: &Action, dt: f32) {
    let bounds = world.bounds();
    let ship = &mut world.ship;

    let direction = Vec2::new(action.move_x.as_f32(), action.move_y.as_f32());
    ship.heading = direction.normalize_or_zero();
    ship.rect.center += ship.heading * ship.speed * dt;
    // Movement alone never leaves the arena; under the lethal boundary
    // policy the collision pass turns edge contact into termination.
    ship.rect.clamp_to(&bounds);

    if !ship.can_fire {
        ship.cooldown_remaining -= dt;
        if ship.cooldown_remaining <= 0.0 {
            ship.can_fire = true;
            ship.cooldown_remaining = 0.0;
        }
    }

    if action.fire && ship.can_fire {
        let muzzle = ship.rect.midtop();
        ship.can_fire = false;
        ship.cooldown_remaining = world.config.fire_cooldown;
        let rect = Rect::from_midbottom(muzzle, world.config.laser_size);
        let speed = world.config.laser_speed;
        world.insert(Entity::Laser(Laser { rect, speed }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoundaryPolicy, WorldConfig};
    use crate::consts::SIM_DT;
    use crate::sim::state::Meteor;
    use proptest::prelude::*;

    const DT: f32 = SIM_DT;

    fn quiet_config() -> WorldConfig {
        // No spawns interfering, clamped edges.
        let mut config = WorldConfig::default();
        config.spawn_interval = 1e9;
        config.boundary = BoundaryPolicy::Clamp;
        config
    }

    fn quiet_world() -> World {
        World::new(quiet_config(), 1).unwrap()
    }

    fn meteor_at(center: Vec2) -> Meteor {
        Meteor {
            rect: Rect::new(center, Vec2::new(101.0, 84.0)),
            heading: Vec2::Y,
            speed: 0.0,
            age: 0.0,
            life_time: 6.0,
            rotation: 0.0,
            rotation_speed: 50.0,
        }
    }

    #[test]
    fn test_zero_action_zero_heading() {
        let mut w = quiet_world();
        step(&mut w, &Action::IDLE, DT);
        assert_eq!(w.ship.heading, Vec2::ZERO);
        assert!(w.ship.heading.is_finite());
    }

    #[test]
    fn test_diagonal_heading_is_unit() {
        let mut w = quiet_world();
        let action = Action::new(Axis::Pos, Axis::Neg, false);
        let before = w.ship.rect.center;
        step(&mut w, &action, DT);
        assert!((w.ship.heading.length() - 1.0).abs() < 1e-5);
        // Diagonal speed equals axis speed: displacement is speed * dt.
        let moved = (w.ship.rect.center - before).length();
        assert!((moved - w.config().ship_speed * DT).abs() < 1e-3);
    }

    #[test]
    fn test_firing_spawns_one_laser_at_midtop() {
        let mut w = quiet_world();
        let action = Action::new(Axis::Zero, Axis::Zero, true);
        step(&mut w, &action, DT);
        assert_eq!(w.laser_count(), 1);
        assert!(!w.ship.can_fire);
        let (_, laser) = w.lasers().next().unwrap();
        // Laser was planted bottom-at-muzzle, then moved up one tick.
        let muzzle = w.ship.rect.midtop();
        let expected_bottom = muzzle.y - w.config().laser_speed * DT;
        assert!((laser.rect.bottom() - expected_bottom).abs() < 1e-3);
        assert!((laser.rect.center.x - muzzle.x).abs() < 1e-3);
    }

    #[test]
    fn test_fire_while_cooling_is_noop() {
        let mut w = quiet_world();
        let fire = Action::new(Axis::Zero, Axis::Zero, true);
        step(&mut w, &fire, DT);
        assert_eq!(w.laser_count(), 1);
        step(&mut w, &fire, DT);
        assert_eq!(w.laser_count(), 1, "second request ignored while cooling");
        assert!(!w.ship.can_fire);
    }

    #[test]
    fn test_cooldown_rearms_after_duration() {
        let mut w = quiet_world();
        let fire = Action::new(Axis::Zero, Axis::Zero, true);
        step(&mut w, &fire, DT);
        let cooldown_ticks = (w.config().fire_cooldown / DT).round() as u32;
        // One tick early the weapon is still cold.
        for _ in 0..cooldown_ticks - 1 {
            step(&mut w, &Action::IDLE, DT);
        }
        assert!(!w.ship.can_fire);
        step(&mut w, &Action::IDLE, DT);
        assert!(w.ship.can_fire);
    }

    #[test]
    fn test_held_fire_laser_count_over_one_second() {
        // 0.4 s cooldown at 60 Hz: shots on ticks 0, 24 and 48.
        let mut config = quiet_config();
        // Tall playfield so no laser exits during the test window.
        config.height = 100_000.0;
        let mut w = World::new(config, 1).unwrap();
        let fire = Action::new(Axis::Zero, Axis::Zero, true);
        for _ in 0..60 {
            step(&mut w, &fire, DT);
        }
        let expected = (1.0 / w.config().fire_cooldown) as u32 + 1;
        assert_eq!(w.laser_count() as u32, expected);
    }

    #[test]
    fn test_laser_removed_past_top() {
        let mut w = quiet_world();
        step(&mut w, &Action::new(Axis::Zero, Axis::Zero, true), DT);
        // Ship center y is 360; bottom of the laser crosses y=0 within a second.
        for _ in 0..70 {
            step(&mut w, &Action::IDLE, DT);
        }
        assert_eq!(w.laser_count(), 0);
    }

    #[test]
    fn test_meteor_expires_even_when_stationary() {
        let mut w = quiet_world();
        let mut m = meteor_at(Vec2::new(100.0, 100.0));
        m.speed = 0.0;
        let life = m.life_time;
        w.insert(Entity::Meteor(m));
        let ticks = (life / DT).ceil() as u32 + 1;
        for _ in 0..ticks {
            step(&mut w, &Action::IDLE, DT);
        }
        assert_eq!(w.meteor_count(), 0);
    }

    #[test]
    fn test_expiring_meteor_still_kills_ship_same_tick() {
        let mut w = quiet_world();
        let mut m = meteor_at(w.ship.rect.center);
        // Expires on the very next tick.
        m.age = m.life_time - DT * 0.5;
        w.insert(Entity::Meteor(m));
        step(&mut w, &Action::IDLE, DT);
        assert!(
            !w.running,
            "collision pass must see the meteor before lifetime removal"
        );
        assert_eq!(w.meteor_count(), 0);
    }

    #[test]
    fn test_step_is_noop_after_termination() {
        let mut w = quiet_world();
        w.running = false;
        let score = w.score;
        step(&mut w, &Action::new(Axis::Pos, Axis::Pos, true), DT);
        assert_eq!(w.score, score);
        assert_eq!(w.laser_count(), 0);
    }

    #[test]
    fn test_score_tracks_elapsed_time() {
        let mut w = quiet_world();
        for _ in 0..120 {
            step(&mut w, &Action::IDLE, DT);
        }
        assert!((w.score - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_lethal_boundary_terminates_on_wall_push() {
        let mut config = quiet_config();
        config.boundary = BoundaryPolicy::Lethal;
        let mut w = World::new(config, 1).unwrap();
        let left = Action::new(Axis::Neg, Axis::Zero, false);
        for _ in 0..600 {
            step(&mut w, &left, DT);
            if !w.running {
                break;
            }
        }
        assert!(!w.running, "holding into a wall is fatal under Lethal");
    }

    #[test]
    fn test_explosion_finishes_and_despawns() {
        let mut w = quiet_world();
        let laser_pos = Vec2::new(300.0, 100.0);
        w.insert(Entity::Laser(Laser {
            rect: Rect::new(laser_pos, Vec2::new(9.0, 54.0)),
            speed: 0.0,
        }));
        w.insert(Entity::Meteor(meteor_at(laser_pos)));
        step(&mut w, &Action::IDLE, DT);
        assert_eq!(
            w.entities()
                .filter(|(_, e)| matches!(e, Entity::Explosion(_)))
                .count(),
            1
        );
        // 21 frames at 25 fps is under a second.
        for _ in 0..60 {
            step(&mut w, &Action::IDLE, DT);
        }
        assert_eq!(w.entities().count(), 0);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let run = |seed| {
            let mut w = World::new(WorldConfig::default(), seed).unwrap();
            let action = Action::new(Axis::Pos, Axis::Zero, true);
            for _ in 0..300 {
                step(&mut w, &action, DT);
            }
            let meteors: Vec<_> = w
                .meteors()
                .map(|(id, m)| (id, m.rect.center.x, m.rect.center.y))
                .collect();
            (w.score, w.running, w.ship.rect.center, meteors)
        };
        assert_eq!(run(99), run(99));
    }

    proptest! {
        #[test]
        fn prop_heading_is_always_zero_or_unit(ox in -2.0f32..2.0, oy in -2.0f32..2.0) {
            let mut w = quiet_world();
            let action = Action::new(Axis::from_output(ox), Axis::from_output(oy), false);
            step(&mut w, &action, DT);
            let len = w.ship.heading.length();
            prop_assert!(len == 0.0 || (len - 1.0).abs() < 1e-5);
            prop_assert!(w.ship.heading.is_finite());
        }

        #[test]
        fn prop_clamped_ship_never_leaves_bounds(
            moves in prop::collection::vec((-2.0f32..2.0, -2.0f32..2.0), 1..300)
        ) {
            let mut w = quiet_world();
            let bounds = w.bounds();
            for (ox, oy) in moves {
                let action = Action::new(Axis::from_output(ox), Axis::from_output(oy), false);
                step(&mut w, &action, DT);
                let r = &w.ship.rect;
                prop_assert!(r.left() >= bounds.left());
                prop_assert!(r.right() <= bounds.right());
                prop_assert!(r.top() >= bounds.top());
                prop_assert!(r.bottom() <= bounds.bottom());
            }
        }
    }
}
