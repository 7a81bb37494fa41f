//! Component kinds and capability dispatch.
//!
//! Components are a closed tagged union rather than trait objects: the set
//! of behaviors is small and known, and a plain enum keeps entity storage
//! flat and the update loop free of dynamic dispatch.

use glam::Vec2;

use crate::animation::AnimationState;
use crate::collision::Collider;
use crate::enemy::EnemyAi;
use crate::entity::{Body, UpdateCtx};
use crate::health::Health;
use crate::movement::{Movement, ProjectileMotion, RemoteLerp};

/// Identifies a component slot. Slot order is update order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Transform,
    Movement,
    RemoteLerp,
    ProjectileMotion,
    Collider,
    Health,
    Animation,
    EnemyAi,
}

impl ComponentKind {
    pub const COUNT: usize = 8;

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One concrete component instance.
pub enum Component {
    Transform(Transform),
    Movement(Movement),
    RemoteLerp(RemoteLerp),
    ProjectileMotion(ProjectileMotion),
    Collider(Collider),
    Health(Health),
    Animation(AnimationState),
    EnemyAi(EnemyAi),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Transform(_) => ComponentKind::Transform,
            Component::Movement(_) => ComponentKind::Movement,
            Component::RemoteLerp(_) => ComponentKind::RemoteLerp,
            Component::ProjectileMotion(_) => ComponentKind::ProjectileMotion,
            Component::Collider(_) => ComponentKind::Collider,
            Component::Health(_) => ComponentKind::Health,
            Component::Animation(_) => ComponentKind::Animation,
            Component::EnemyAi(_) => ComponentKind::EnemyAi,
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            Component::Transform(c) => c.enabled,
            Component::Movement(c) => c.enabled,
            Component::RemoteLerp(c) => c.enabled,
            Component::ProjectileMotion(c) => c.enabled,
            Component::Collider(c) => c.enabled,
            Component::Health(c) => c.enabled,
            Component::Animation(c) => c.enabled,
            Component::EnemyAi(c) => c.enabled,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        match self {
            Component::Transform(c) => c.enabled = enabled,
            Component::Movement(c) => c.enabled = enabled,
            Component::RemoteLerp(c) => c.enabled = enabled,
            Component::ProjectileMotion(c) => c.enabled = enabled,
            Component::Collider(c) => c.enabled = enabled,
            Component::Health(c) => c.enabled = enabled,
            Component::Animation(c) => c.enabled = enabled,
            Component::EnemyAi(c) => c.enabled = enabled,
        }
    }

    pub(crate) fn update(&mut self, body: &mut Body, ctx: &UpdateCtx) {
        match self {
            Component::Transform(c) => c.update(body),
            Component::Movement(c) => c.update(body, ctx),
            Component::RemoteLerp(c) => c.update(body),
            Component::ProjectileMotion(c) => c.update(body, ctx),
            Component::Animation(c) => c.update(ctx.dt_ms),
            // Colliders, health and AI have no per-frame step of their own:
            // they are queried by the collision pipeline and state passes.
            Component::Collider(_) | Component::Health(_) | Component::EnemyAi(_) => {}
        }
    }
}

/// Records start-of-frame positions so downstream passes can read the
/// displacement an entity actually made this frame.
#[derive(Debug, Clone)]
pub struct Transform {
    pub enabled: bool,
    /// Position sampled at the start of the current frame.
    pub current: Vec2,
    /// Position sampled at the start of the previous frame.
    pub previous: Vec2,
}

impl Transform {
    pub fn new(position: Vec2) -> Self {
        Self {
            enabled: true,
            current: position,
            previous: position,
        }
    }

    /// Displacement over the previous full frame.
    pub fn delta(&self) -> Vec2 {
        self.current - self.previous
    }

    fn update(&mut self, body: &mut Body) {
        self.previous = self.current;
        self.current = body.position;
    }
}
