//! Rendering interface.
//!
//! The core never draws pixels. Each frame the game distills entities into
//! [`EntityVisual`]s and hands them to a [`Renderer`] implementation along
//! with the camera. The shipped [`NullRenderer`] draws nothing, which is
//! all a headless client needs.

use glam::Vec2;
use quadfire_core::config::{
    HEALTH_BAR_HEIGHT, HEALTH_BAR_OFFSET_Y, HIT_EFFECT_SIZE, PLAYER_VISUAL_SIZE,
    PROJECTILE_VISUAL_SIZE,
};
use quadfire_core::{Entity, EntityId, Rect, Tag};

use crate::camera::Camera;

/// What kind of thing a visual represents; picks the sprite set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    Player,
    Projectile,
    Enemy,
    Effect,
}

/// Everything a renderer needs to draw one entity.
#[derive(Debug, Clone)]
pub struct EntityVisual {
    pub id: EntityId,
    pub kind: VisualKind,
    pub position: Vec2,
    pub size: f32,
    pub color: [u8; 3],
    pub clip: String,
    pub frame: usize,
    /// The clip is a stand-in for a missing asset; draw the fallback.
    pub placeholder: bool,
}

/// A health bar above an entity's hitbox.
#[derive(Debug, Clone)]
pub struct HealthBarView {
    pub rect: Rect,
    pub fraction: f32,
}

/// Drawing collaborator implemented outside the core scope.
pub trait Renderer {
    fn draw_entity(&mut self, visual: &EntityVisual, camera: &Camera);
    fn draw_effect(&mut self, visual: &EntityVisual, camera: &Camera);
    fn draw_health_bar(&mut self, bar: &HealthBarView, camera: &Camera);
}

/// Renderer that draws nothing. Headless runs and tests.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_entity(&mut self, _visual: &EntityVisual, _camera: &Camera) {}
    fn draw_effect(&mut self, _visual: &EntityVisual, _camera: &Camera) {}
    fn draw_health_bar(&mut self, _bar: &HealthBarView, _camera: &Camera) {}
}

/// Server color names to RGB. Unknown names get a neutral gray.
pub fn color_rgb(name: &str) -> [u8; 3] {
    match name {
        "red" => [255, 0, 0],
        "blue" => [0, 0, 255],
        "green" => [0, 255, 0],
        "yellow" => [255, 255, 0],
        "purple" => [128, 0, 128],
        "orange" => [255, 165, 0],
        _ => [128, 128, 128],
    }
}

/// Builds the visual for one active entity, when it has something to show.
pub fn entity_visual(entity: &Entity, color: [u8; 3]) -> Option<EntityVisual> {
    let kind = if entity.body.has_tag(Tag::Player) {
        VisualKind::Player
    } else if entity.body.has_tag(Tag::Projectile) {
        VisualKind::Projectile
    } else if entity.body.has_tag(Tag::Enemy) {
        VisualKind::Enemy
    } else if entity.body.has_tag(Tag::Effect) {
        VisualKind::Effect
    } else {
        return None;
    };

    let size = match kind {
        VisualKind::Player | VisualKind::Enemy => PLAYER_VISUAL_SIZE,
        VisualKind::Projectile => PROJECTILE_VISUAL_SIZE,
        VisualKind::Effect => HIT_EFFECT_SIZE,
    };

    let animation = entity.animation()?;
    Some(EntityVisual {
        id: entity.id.clone(),
        kind,
        position: entity.body.position,
        size,
        color,
        clip: animation.clip().name.clone(),
        frame: animation.frame,
        placeholder: animation.clip().placeholder,
    })
}

/// Health bar geometry: hitbox-wide, sitting just above the hitbox.
pub fn health_bar(entity: &Entity) -> Option<HealthBarView> {
    let health = entity.health()?;
    let hitbox = entity.collider_rect()?;
    Some(HealthBarView {
        rect: Rect::new(
            hitbox.x,
            hitbox.y + HEALTH_BAR_OFFSET_Y,
            hitbox.w,
            HEALTH_BAR_HEIGHT,
        ),
        fraction: health.fraction(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadfire_core::entities::spawn_player;
    use quadfire_core::NoAssets;

    #[test]
    fn player_visual_and_health_bar() {
        let player = spawn_player("player_1".into(), Vec2::new(100.0, 100.0), true, &NoAssets);

        let visual = entity_visual(&player, color_rgb("red")).unwrap();
        assert_eq!(visual.kind, VisualKind::Player);
        assert_eq!(visual.size, PLAYER_VISUAL_SIZE);
        assert_eq!(visual.color, [255, 0, 0]);
        assert!(visual.placeholder, "no assets were provided");

        let bar = health_bar(&player).unwrap();
        assert_eq!(bar.fraction, 1.0);
        // Above the hitbox, matching its width.
        assert_eq!(bar.rect.x, 139.0);
        assert_eq!(bar.rect.y, 120.0);
        assert_eq!(bar.rect.w, 23.0);
    }

    #[test]
    fn unknown_color_is_gray() {
        assert_eq!(color_rgb("taupe"), [128, 128, 128]);
    }
}
