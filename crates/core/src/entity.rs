//! Entity storage and the per-entity component registry.
//!
//! Entities are generic containers: identity, a [`Body`] (position, active
//! flag, tags) and at most one component per [`ComponentKind`]. Systems ask
//! "does this entity carry kind K" before acting - capability dispatch, not
//! inheritance. Components never hold owner pointers; during an update they
//! borrow the body directly, and cross-entity references are ids re-resolved
//! by lookup.

use std::fmt;

use glam::Vec2;

use crate::component::{Component, ComponentKind};
use crate::config::WorldConfig;
use crate::math::Rect;

/// Server-assigned entity identifier (`player_3`, `proj_17`, `enemy_4`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Role tags used for lookups and collision filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Player,
    Projectile,
    Enemy,
    Effect,
}

/// The non-component part of an entity: what every system may touch.
#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vec2,
    pub active: bool,
    tags: Vec<Tag>,
}

impl Body {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            active: true,
            tags: Vec::new(),
        }
    }

    pub fn add_tag(&mut self, tag: Tag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

/// Per-frame context handed to every component update.
pub struct UpdateCtx<'a> {
    pub dt_ms: f32,
    pub world: &'a WorldConfig,
}

/// A game entity: id, body, and one slot per component kind.
pub struct Entity {
    pub id: EntityId,
    pub body: Body,
    components: [Option<Component>; ComponentKind::COUNT],
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, position: Vec2) -> Self {
        Self {
            id: id.into(),
            body: Body::new(position),
            components: std::array::from_fn(|_| None),
        }
    }

    /// Stores a component under its kind. A second add of the same kind
    /// replaces the first (last write wins).
    pub fn add(&mut self, component: Component) {
        let kind = component.kind();
        let slot = &mut self.components[kind.index()];
        if slot.is_some() {
            log::debug!("entity {}: replacing {:?} component", self.id, kind);
        }
        *slot = Some(component);
    }

    pub fn get(&self, kind: ComponentKind) -> Option<&Component> {
        self.components[kind.index()].as_ref()
    }

    pub fn get_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.components[kind.index()].as_mut()
    }

    pub fn has(&self, kind: ComponentKind) -> bool {
        self.components[kind.index()].is_some()
    }

    pub fn remove(&mut self, kind: ComponentKind) -> Option<Component> {
        self.components[kind.index()].take()
    }

    /// Runs every enabled component against this entity's body.
    /// Inactive entities are skipped entirely.
    pub fn update(&mut self, ctx: &UpdateCtx) {
        if !self.body.active {
            return;
        }
        for slot in self.components.iter_mut() {
            if let Some(component) = slot {
                if component.enabled() {
                    component.update(&mut self.body, ctx);
                }
            }
        }
    }

    /// Marks the entity inactive and tears down its components. The owning
    /// state removes it from storage during the end-of-frame sweep.
    pub fn destroy(&mut self) {
        self.body.active = false;
        for slot in self.components.iter_mut() {
            if let Some(component) = slot {
                component.set_enabled(false);
            }
            *slot = None;
        }
    }

    /// Resolved collision rect, when an enabled collider is present.
    pub fn collider_rect(&self) -> Option<Rect> {
        let collider = self.collider()?;
        if !collider.enabled {
            return None;
        }
        Some(collider.rect(&self.body))
    }
}

macro_rules! typed_accessors {
    ($($get:ident, $get_mut:ident => $kind:ident($ty:ty));* $(;)?) => {
        impl Entity {
            $(
                pub fn $get(&self) -> Option<&$ty> {
                    match self.get(ComponentKind::$kind) {
                        Some(Component::$kind(c)) => Some(c),
                        _ => None,
                    }
                }

                pub fn $get_mut(&mut self) -> Option<&mut $ty> {
                    match self.get_mut(ComponentKind::$kind) {
                        Some(Component::$kind(c)) => Some(c),
                        _ => None,
                    }
                }
            )*
        }
    };
}

typed_accessors! {
    transform, transform_mut => Transform(crate::component::Transform);
    movement, movement_mut => Movement(crate::movement::Movement);
    remote_lerp, remote_lerp_mut => RemoteLerp(crate::movement::RemoteLerp);
    projectile, projectile_mut => ProjectileMotion(crate::movement::ProjectileMotion);
    collider, collider_mut => Collider(crate::collision::Collider);
    health, health_mut => Health(crate::health::Health);
    animation, animation_mut => Animation(crate::animation::AnimationState);
    enemy_ai, enemy_ai_mut => EnemyAi(crate::enemy::EnemyAi);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Transform;
    use crate::health::Health;

    #[test]
    fn add_get_and_overwrite() {
        let mut entity = Entity::new("player_1", Vec2::new(10.0, 20.0));
        assert!(entity.health().is_none());

        entity.add(Component::Health(Health::new(100)));
        assert_eq!(entity.health().unwrap().current_hp, 100);

        // Duplicate add replaces the existing instance.
        entity.add(Component::Health(Health::new(50)));
        assert_eq!(entity.health().unwrap().max_hp, 50);
    }

    #[test]
    fn absent_lookup_is_none_not_panic() {
        let entity = Entity::new("player_1", Vec2::ZERO);
        assert!(entity.get(ComponentKind::Collider).is_none());
        assert!(entity.collider_rect().is_none());
    }

    #[test]
    fn destroy_clears_components_and_deactivates() {
        let mut entity = Entity::new("player_1", Vec2::ZERO);
        entity.add(Component::Transform(Transform::new(Vec2::ZERO)));
        entity.add(Component::Health(Health::new(100)));

        entity.destroy();
        assert!(!entity.body.active);
        assert!(entity.transform().is_none());
        assert!(entity.health().is_none());
    }

    #[test]
    fn inactive_entity_skips_updates() {
        let world = WorldConfig::default();
        let ctx = UpdateCtx {
            dt_ms: 16.0,
            world: &world,
        };
        let mut entity = Entity::new("proj_1", Vec2::new(100.0, 100.0));
        entity.add(Component::ProjectileMotion(
            crate::movement::ProjectileMotion::new("player_1".into(), Vec2::X, 8.0, 300),
        ));
        entity.body.active = false;

        entity.update(&ctx);
        assert_eq!(entity.body.position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn tags() {
        let mut body = Body::new(Vec2::ZERO);
        body.add_tag(Tag::Player);
        body.add_tag(Tag::Player);
        assert!(body.has_tag(Tag::Player));
        assert!(!body.has_tag(Tag::Enemy));
        assert_eq!(body.tags().len(), 1);
    }
}
