//! Entity archetypes: players, projectiles, enemies, impact effects.
//!
//! Spawning is just composing components; nothing here is a subclass.

use glam::Vec2;

use crate::animation::{AnimationSource, AnimationState};
use crate::collision::Collider;
use crate::component::{Component, Transform};
use crate::config::{
    ENEMY_MAX_HP, ENEMY_SPEED, PLAYER_HITBOX_HEIGHT, PLAYER_HITBOX_OFFSET_X,
    PLAYER_HITBOX_OFFSET_Y, PLAYER_HITBOX_WIDTH, PLAYER_MAX_HP, PLAYER_SPEED,
    PLAYER_VISUAL_SIZE, PROJECTILE_LIFETIME_FRAMES, PROJECTILE_SIZE, PROJECTILE_SPEED,
};
use crate::enemy::EnemyAi;
use crate::entity::{Entity, EntityId, Tag};
use crate::health::Health;
use crate::movement::{Movement, ProjectileMotion, RemoteLerp};

/// A player entity. Local players take a `Movement` component driven by
/// input; remote players interpolate toward server targets instead.
pub fn spawn_player(
    id: EntityId,
    position: Vec2,
    is_local: bool,
    assets: &dyn AnimationSource,
) -> Entity {
    let mut entity = Entity::new(id, position);
    entity.body.add_tag(Tag::Player);

    entity.add(Component::Transform(Transform::new(position)));
    if is_local {
        entity.add(Component::Movement(Movement::new(
            PLAYER_SPEED,
            PLAYER_VISUAL_SIZE,
        )));
    } else {
        entity.add(Component::RemoteLerp(RemoteLerp::new(position)));
    }

    entity.add(Component::Collider(
        Collider::new(
            PLAYER_HITBOX_WIDTH,
            PLAYER_HITBOX_HEIGHT,
            Vec2::new(PLAYER_HITBOX_OFFSET_X, PLAYER_HITBOX_OFFSET_Y),
        )
        .with_tags(&[Tag::Player, Tag::Projectile]),
    ));
    entity.add(Component::Health(Health::new(PLAYER_MAX_HP)));
    entity.add(Component::Animation(AnimationState::directional(
        "player", assets,
    )));
    entity
}

/// A projectile, either locally predicted from a shot or mirrored from a
/// server update. The hitbox is centered on the position.
pub fn spawn_projectile(
    id: EntityId,
    position: Vec2,
    direction: Vec2,
    owner: EntityId,
    assets: &dyn AnimationSource,
) -> Entity {
    let mut entity = Entity::new(id, position);
    entity.body.add_tag(Tag::Projectile);

    entity.add(Component::ProjectileMotion(ProjectileMotion::new(
        owner,
        direction,
        PROJECTILE_SPEED,
        PROJECTILE_LIFETIME_FRAMES,
    )));
    entity.add(Component::Collider(
        Collider::new(
            PROJECTILE_SIZE,
            PROJECTILE_SIZE,
            Vec2::splat(-PROJECTILE_SIZE / 2.0),
        )
        .with_tags(&[Tag::Player, Tag::Enemy]),
    ));
    entity.add(Component::Animation(AnimationState::looping(
        "projectile",
        assets,
    )));
    entity
}

/// A wave enemy. AI runs locally only until the server claims it with a
/// position update; the hitbox matches the player's sprite proportions.
pub fn spawn_enemy(
    id: EntityId,
    position: Vec2,
    target: EntityId,
    assets: &dyn AnimationSource,
) -> Entity {
    let mut entity = Entity::new(id, position);
    entity.body.add_tag(Tag::Enemy);

    entity.add(Component::Transform(Transform::new(position)));
    entity.add(Component::Collider(
        Collider::new(
            PLAYER_HITBOX_WIDTH,
            PLAYER_HITBOX_HEIGHT,
            Vec2::new(PLAYER_HITBOX_OFFSET_X, PLAYER_HITBOX_OFFSET_Y),
        )
        .with_tags(&[Tag::Projectile]),
    ));
    entity.add(Component::Health(Health::new(ENEMY_MAX_HP)));
    entity.add(Component::EnemyAi(EnemyAi::new(target, ENEMY_SPEED)));
    entity.add(Component::Animation(AnimationState::directional(
        "enemy", assets,
    )));
    entity
}

/// Cosmetic one-shot impact effect; destroys itself when its animation
/// finishes.
pub fn spawn_hit_effect(id: EntityId, position: Vec2, assets: &dyn AnimationSource) -> Entity {
    let mut entity = Entity::new(id, position);
    entity.body.add_tag(Tag::Effect);
    entity.add(Component::Animation(AnimationState::one_shot(
        "impact", assets,
    )));
    entity
}
