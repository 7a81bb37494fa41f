//! World dimensions and gameplay tuning.
//!
//! Values match the live game server; changing them on the client alone
//! desyncs prediction from the authoritative state.

use serde::{Deserialize, Serialize};

use crate::math::Rect;

/// Static world geometry parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub tile_width: f32,
    pub tile_height: f32,
    /// Collision height of the top/bottom wall band, thinner than a tile.
    pub wall_height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 2400.0,
            height: 1800.0,
            tile_width: 64.0,
            tile_height: 48.0,
            wall_height: 16.0,
        }
    }
}

impl WorldConfig {
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

// Player tuning.
pub const PLAYER_SPEED: f32 = 5.0;
pub const PLAYER_VISUAL_SIZE: f32 = 100.0;
pub const PLAYER_HITBOX_WIDTH: f32 = 23.0;
pub const PLAYER_HITBOX_HEIGHT: f32 = 35.0;
pub const PLAYER_HITBOX_OFFSET_X: f32 = 39.0;
pub const PLAYER_HITBOX_OFFSET_Y: f32 = 30.0;
pub const PLAYER_MAX_HP: i32 = 100;

// Projectile tuning.
pub const PROJECTILE_SPEED: f32 = 8.0;
pub const PROJECTILE_SIZE: f32 = 20.0;
pub const PROJECTILE_VISUAL_SIZE: f32 = 32.0;
pub const PROJECTILE_LIFETIME_FRAMES: u32 = 300;

// Enemy tuning (server-authoritative, mirrored for the local AI fallback).
pub const ENEMY_SPEED: f32 = 1.0;
pub const ENEMY_MAX_HP: i32 = 100;
pub const ENEMY_STOP_DISTANCE: f32 = 30.0;

/// Seconds between shots.
pub const SHOOT_COOLDOWN_SECS: f32 = 0.5;

/// Minimum milliseconds between outbound position updates.
pub const POSITION_UPDATE_INTERVAL_MS: u64 = 50;

// Health bar geometry, relative to the owner's hitbox.
pub const HEALTH_BAR_HEIGHT: f32 = 5.0;
pub const HEALTH_BAR_OFFSET_Y: f32 = -10.0;

/// Size of the one-shot impact effect spawned where a projectile dies.
pub const HIT_EFFECT_SIZE: f32 = 32.0;
