//! Camera follow and coordinate transforms.

use glam::Vec2;
use quadfire_core::config::PLAYER_VISUAL_SIZE;
use quadfire_core::WorldConfig;

/// How much of the remaining distance the camera covers per frame.
const SMOOTHING: f32 = 0.15;

/// Scrolling viewport over the world, following the local player.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Top-left corner of the view, in world coordinates.
    pub position: Vec2,
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport,
        }
    }

    /// Eases toward centering the player sprite, clamped to world bounds.
    pub fn follow(&mut self, player_pos: Vec2, world: &WorldConfig) {
        let target = player_pos - self.viewport * 0.5 + Vec2::splat(PLAYER_VISUAL_SIZE * 0.5);
        let target = Vec2::new(
            target.x.clamp(0.0, (world.width - self.viewport.x).max(0.0)),
            target.y.clamp(0.0, (world.height - self.viewport.y).max(0.0)),
        );
        self.position += (target - self.position) * SMOOTHING;
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.position
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.position
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transforms_are_inverse() {
        let mut camera = Camera::default();
        camera.position = Vec2::new(120.0, 340.0);

        let world = Vec2::new(500.0, 500.0);
        assert_eq!(camera.screen_to_world(camera.world_to_screen(world)), world);
    }

    #[test]
    fn follow_clamps_to_world_edges() {
        let world = WorldConfig::default();
        let mut camera = Camera::default();

        // Player in the top-left corner: the camera pins to the origin.
        for _ in 0..200 {
            camera.follow(Vec2::ZERO, &world);
        }
        assert!(camera.position.x.abs() < 1.0);
        assert!(camera.position.y.abs() < 1.0);

        // Player in the bottom-right corner: pins to world - viewport.
        for _ in 0..200 {
            camera.follow(Vec2::new(world.width, world.height), &world);
        }
        assert!((camera.position.x - (world.width - 800.0)).abs() < 1.0);
        assert!((camera.position.y - (world.height - 600.0)).abs() < 1.0);
    }

    #[test]
    fn follow_centers_the_player_sprite() {
        let world = WorldConfig::default();
        let mut camera = Camera::default();
        let player = Vec2::new(1200.0, 900.0);

        for _ in 0..200 {
            camera.follow(player, &world);
        }
        let sprite_center = player + Vec2::splat(PLAYER_VISUAL_SIZE * 0.5);
        let view_center = camera.position + camera.viewport * 0.5;
        assert!((sprite_center - view_center).length() < 1.0);
    }
}
