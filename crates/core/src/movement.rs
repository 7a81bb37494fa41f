//! Movement: local velocity-driven motion, remote interpolation, and
//! projectile flight.
//!
//! Local movement is predicted on this client; remote entities only ever
//! ease toward server-reported targets. The interpolation factors are part
//! of observable behavior and must not be retuned casually.

use glam::Vec2;
use std::f32::consts::FRAC_1_SQRT_2;

use crate::entity::{Body, EntityId, UpdateCtx};

/// Distance below which a remote entity snaps exactly onto its target.
pub const SNAP_DISTANCE: f32 = 0.5;

/// Velocity-driven movement for the locally controlled player.
///
/// Velocity components are -1, 0 or 1; diagonal input is scaled so the
/// resulting speed equals axial speed. Positions clamp to
/// `[0, world - bounds_size]` on each axis.
#[derive(Debug, Clone)]
pub struct Movement {
    pub enabled: bool,
    pub speed: f32,
    pub velocity: Vec2,
    /// Entity extent used for world clamping (visual size, not hitbox).
    pub bounds_size: f32,
}

impl Movement {
    pub fn new(speed: f32, bounds_size: f32) -> Self {
        Self {
            enabled: true,
            speed,
            velocity: Vec2::ZERO,
            bounds_size,
        }
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    pub fn is_moving(&self) -> bool {
        self.velocity != Vec2::ZERO
    }

    pub(crate) fn update(&mut self, body: &mut Body, ctx: &UpdateCtx) {
        if self.velocity == Vec2::ZERO {
            return;
        }

        let mut step = self.velocity;
        if step.x != 0.0 && step.y != 0.0 {
            step *= FRAC_1_SQRT_2;
        }

        let next = body.position + step * self.speed;
        body.position.x = next.x.clamp(0.0, ctx.world.width - self.bounds_size);
        body.position.y = next.y.clamp(0.0, ctx.world.height - self.bounds_size);
    }
}

/// Eases a remote entity toward its last server-reported position.
///
/// The factor adapts to distance: 0.5 beyond 50 units, 0.3 beyond 10,
/// 0.2 otherwise. Under [`SNAP_DISTANCE`] the position snaps exactly,
/// terminating the approach.
#[derive(Debug, Clone)]
pub struct RemoteLerp {
    pub enabled: bool,
    pub target: Vec2,
}

impl RemoteLerp {
    pub fn new(target: Vec2) -> Self {
        Self {
            enabled: true,
            target,
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    pub(crate) fn update(&mut self, body: &mut Body) {
        let delta = self.target - body.position;
        let distance = delta.length();

        if distance < SNAP_DISTANCE {
            body.position = self.target;
            return;
        }

        let factor = if distance > 50.0 {
            0.5
        } else if distance > 10.0 {
            0.3
        } else {
            0.2
        };
        body.position += delta * factor;
    }
}

/// Straight-line projectile flight with a frame-counted lifetime.
///
/// Flight only flips the body's `active` flag on expiry or when leaving the
/// world; removal from the projectile map is owned by the collision
/// pipeline and the reconciliation layer.
#[derive(Debug, Clone)]
pub struct ProjectileMotion {
    pub enabled: bool,
    pub owner: EntityId,
    /// Unit direction, normalized at creation.
    pub direction: Vec2,
    pub speed: f32,
    pub lifetime_frames: u32,
    pub max_lifetime: u32,
}

impl ProjectileMotion {
    pub fn new(owner: EntityId, direction: Vec2, speed: f32, max_lifetime: u32) -> Self {
        Self {
            enabled: true,
            owner,
            direction: direction.normalize_or_zero(),
            speed,
            lifetime_frames: 0,
            max_lifetime,
        }
    }

    pub(crate) fn update(&mut self, body: &mut Body, ctx: &UpdateCtx) {
        body.position += self.direction * self.speed;

        let out_of_world = body.position.x < 0.0
            || body.position.x > ctx.world.width
            || body.position.y < 0.0
            || body.position.y > ctx.world.height;
        if out_of_world {
            body.active = false;
        }

        self.lifetime_frames += 1;
        if self.lifetime_frames > self.max_lifetime {
            body.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    fn ctx(world: &WorldConfig) -> UpdateCtx<'_> {
        UpdateCtx {
            dt_ms: 16.0,
            world,
        }
    }

    #[test]
    fn single_axis_moves_by_full_speed() {
        let world = WorldConfig::default();
        let mut body = Body::new(Vec2::new(100.0, 100.0));
        let mut movement = Movement::new(5.0, 100.0);

        movement.set_velocity(Vec2::new(1.0, 0.0));
        movement.update(&mut body, &ctx(&world));

        assert_eq!(body.position, Vec2::new(105.0, 100.0));
    }

    #[test]
    fn diagonal_is_normalized_to_axial_speed() {
        let world = WorldConfig::default();
        let mut body = Body::new(Vec2::new(100.0, 100.0));
        let mut movement = Movement::new(5.0, 100.0);

        movement.set_velocity(Vec2::new(1.0, 1.0));
        movement.update(&mut body, &ctx(&world));

        let moved = body.position - Vec2::new(100.0, 100.0);
        // Each axis advances by speed * sqrt(2)/2, total magnitude == speed.
        assert!((moved.x - 5.0 * FRAC_1_SQRT_2).abs() < 1e-5);
        assert!((moved.y - 5.0 * FRAC_1_SQRT_2).abs() < 1e-5);
        assert!((moved.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn position_clamps_to_world_minus_bounds() {
        let world = WorldConfig::default();
        let mut body = Body::new(Vec2::new(world.width - 101.0, 2.0));
        let mut movement = Movement::new(5.0, 100.0);

        movement.set_velocity(Vec2::new(1.0, -1.0));
        for _ in 0..10 {
            movement.update(&mut body, &ctx(&world));
        }

        assert_eq!(body.position.x, world.width - 100.0);
        assert_eq!(body.position.y, 0.0);
    }

    #[test]
    fn zero_velocity_is_a_no_op() {
        let world = WorldConfig::default();
        let mut body = Body::new(Vec2::new(100.0, 100.0));
        let mut movement = Movement::new(5.0, 100.0);

        movement.update(&mut body, &ctx(&world));
        assert_eq!(body.position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn lerp_factor_follows_distance_bands() {
        let mut body = Body::new(Vec2::ZERO);
        let mut lerp = RemoteLerp::new(Vec2::new(100.0, 0.0));

        // distance 100 > 50 -> factor 0.5
        lerp.update(&mut body);
        assert!((body.position.x - 50.0).abs() < 1e-5);

        // distance 50, not > 50 -> factor 0.3
        lerp.update(&mut body);
        assert!((body.position.x - 65.0).abs() < 1e-4);

        // distance 8 -> factor 0.2
        body.position = Vec2::new(92.0, 0.0);
        lerp.update(&mut body);
        assert!((body.position.x - 93.6).abs() < 1e-4);
    }

    #[test]
    fn lerp_snaps_when_close() {
        let mut body = Body::new(Vec2::new(99.7, 0.0));
        let mut lerp = RemoteLerp::new(Vec2::new(100.0, 0.0));

        lerp.update(&mut body);
        assert_eq!(body.position, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn projectile_flies_and_expires() {
        let world = WorldConfig::default();
        let mut body = Body::new(Vec2::new(100.0, 100.0));
        let mut motion = ProjectileMotion::new("player_1".into(), Vec2::X, 8.0, 3);

        motion.update(&mut body, &ctx(&world));
        assert_eq!(body.position.x, 108.0);
        assert!(body.active);

        motion.update(&mut body, &ctx(&world));
        motion.update(&mut body, &ctx(&world));
        assert!(body.active);
        motion.update(&mut body, &ctx(&world));
        assert!(!body.active, "lifetime {} exceeded max", motion.lifetime_frames);
    }

    #[test]
    fn projectile_deactivates_outside_world() {
        let world = WorldConfig::default();
        let mut body = Body::new(Vec2::new(4.0, 100.0));
        let mut motion = ProjectileMotion::new("player_1".into(), Vec2::new(-1.0, 0.0), 8.0, 300);

        motion.update(&mut body, &ctx(&world));
        assert!(!body.active);
    }

    #[test]
    fn projectile_direction_normalized_at_creation() {
        let motion = ProjectileMotion::new("player_1".into(), Vec2::new(3.0, 4.0), 8.0, 300);
        assert!((motion.direction.length() - 1.0).abs() < 1e-5);
    }
}
