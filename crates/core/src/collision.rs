//! AABB collision components and queries.
//!
//! A collider's rect is always `(body position + offset, width, height)`.
//! Hitboxes are deliberately smaller than the rendered sprite; nothing in
//! collision math may use the visual size.

use glam::Vec2;

use crate::entity::{Body, Entity, Tag};
use crate::math::Rect;

/// AABB collision volume, offset from the owning body's position.
#[derive(Debug, Clone)]
pub struct Collider {
    pub enabled: bool,
    pub width: f32,
    pub height: f32,
    pub offset: Vec2,
    collision_tags: Vec<Tag>,
}

impl Collider {
    pub fn new(width: f32, height: f32, offset: Vec2) -> Self {
        Self {
            enabled: true,
            width,
            height,
            offset,
            collision_tags: Vec::new(),
        }
    }

    /// Restricts what this collider may hit. No tags means it collides with
    /// everything.
    pub fn with_tags(mut self, tags: &[Tag]) -> Self {
        self.collision_tags.extend_from_slice(tags);
        self
    }

    pub fn add_collision_tag(&mut self, tag: Tag) {
        if !self.collision_tags.contains(&tag) {
            self.collision_tags.push(tag);
        }
    }

    /// Resolved collision rect in world coordinates.
    pub fn rect(&self, body: &Body) -> Rect {
        Rect::new(
            body.position.x + self.offset.x,
            body.position.y + self.offset.y,
            self.width,
            self.height,
        )
    }

    /// Tag filter: with no tags declared this collider hits anything,
    /// otherwise the target must carry at least one declared tag.
    pub fn can_collide_with(&self, target: &Body) -> bool {
        if self.collision_tags.is_empty() {
            return true;
        }
        self.collision_tags.iter().any(|tag| target.has_tag(*tag))
    }
}

/// AABB overlap between two entities' colliders. Either side missing a
/// collider means no collision.
pub fn check_collision(a: &Entity, b: &Entity) -> bool {
    match (a.collider_rect(), b.collider_rect()) {
        (Some(rect_a), Some(rect_b)) => rect_a.overlaps(&rect_b),
        _ => false,
    }
}
