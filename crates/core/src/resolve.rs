//! Per-frame collision resolution.
//!
//! Ordered passes over every active projectile: walls first, then players,
//! then enemies. A projectile is considered exactly once per frame and goes
//! inactive on its first hit, so it can never register a second one. The
//! removed-id set shared with the reconciliation layer makes removal and
//! effect spawning idempotent across local and server paths.

use glam::Vec2;

use crate::animation::AnimationSource;
use crate::entities::spawn_hit_effect;
use crate::entity::{EntityId, Tag};
use crate::map::WallMap;
use crate::state::GameState;

/// Outbound hit notification for the authoritative server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitReport {
    pub victim: EntityId,
    pub shooter: EntityId,
    pub projectile: EntityId,
}

enum Outcome {
    Wall {
        position: Vec2,
    },
    Hit {
        victim: EntityId,
        shooter: EntityId,
        position: Vec2,
    },
}

/// Runs the projectile passes and applies their side effects: impact
/// effects, projectile removal, and hit reports for the network layer.
pub fn resolve_projectiles(
    state: &mut GameState,
    walls: &WallMap,
    assets: &dyn AnimationSource,
) -> Vec<HitReport> {
    let projectile_ids: Vec<EntityId> = state.projectiles.iter().cloned().collect();

    let mut player_ids: Vec<EntityId> = Vec::new();
    if let Some(local) = state.local_player() {
        if local.body.active {
            player_ids.push(local.id.clone());
        }
    }
    player_ids.extend(
        state
            .other_players
            .iter()
            .filter(|id| state.find(id).is_some_and(|e| e.body.active))
            .cloned(),
    );
    let enemy_ids = state.active_ids_with_tag(Tag::Enemy);

    let mut wall_hits: Vec<(EntityId, Vec2)> = Vec::new();
    let mut entity_hits: Vec<(EntityId, EntityId, EntityId, Vec2)> = Vec::new();

    for projectile_id in projectile_ids {
        let outcome = projectile_outcome(state, &projectile_id, walls, &player_ids, &enemy_ids);
        let Some(outcome) = outcome else { continue };

        // Deactivate immediately so nothing else can process this
        // projectile, this frame or later.
        if let Some(projectile) = state.find_mut(&projectile_id) {
            projectile.body.active = false;
        }

        match outcome {
            Outcome::Wall { position } => wall_hits.push((projectile_id, position)),
            Outcome::Hit {
                victim,
                shooter,
                position,
            } => entity_hits.push((victim, shooter, projectile_id, position)),
        }
    }

    for (projectile_id, position) in wall_hits {
        retire_projectile(state, &projectile_id, position, assets);
    }

    let mut reports = Vec::with_capacity(entity_hits.len());
    for (victim, shooter, projectile_id, position) in entity_hits {
        // The server hears about every hit, even when the projectile was
        // already retired through the network path.
        reports.push(HitReport {
            victim,
            shooter,
            projectile: projectile_id.clone(),
        });
        retire_projectile(state, &projectile_id, position, assets);
    }
    reports
}

/// First match for one projectile, in wall -> player -> enemy order.
fn projectile_outcome(
    state: &GameState,
    projectile_id: &EntityId,
    walls: &WallMap,
    player_ids: &[EntityId],
    enemy_ids: &[EntityId],
) -> Option<Outcome> {
    let projectile = state.find(projectile_id)?;
    if !projectile.body.active {
        return None;
    }
    let rect = projectile.collider_rect()?;
    let collider = projectile.collider()?;
    let owner = projectile.projectile().map(|m| m.owner.clone())?;
    let position = projectile.body.position;

    if walls.hits(&rect) {
        return Some(Outcome::Wall { position });
    }

    for target_id in player_ids {
        // A projectile never damages its own shooter.
        if target_id == &owner {
            continue;
        }
        let Some(target) = state.find(target_id) else { continue };
        if !collider.can_collide_with(&target.body) {
            continue;
        }
        if target
            .collider_rect()
            .is_some_and(|target_rect| rect.overlaps(&target_rect))
        {
            return Some(Outcome::Hit {
                victim: target_id.clone(),
                shooter: owner,
                position,
            });
        }
    }

    for target_id in enemy_ids {
        let Some(target) = state.find(target_id) else { continue };
        if !collider.can_collide_with(&target.body) {
            continue;
        }
        if target
            .collider_rect()
            .is_some_and(|target_rect| rect.overlaps(&target_rect))
        {
            return Some(Outcome::Hit {
                victim: target_id.clone(),
                shooter: owner,
                position,
            });
        }
    }

    None
}

/// Idempotent projectile teardown: at most one effect and one removal per
/// id, no matter how many paths report it.
fn retire_projectile(
    state: &mut GameState,
    projectile_id: &EntityId,
    position: Vec2,
    assets: &dyn AnimationSource,
) {
    if state.removed_projectiles.contains(projectile_id) {
        return;
    }
    if state.remove_entity(projectile_id).is_some() {
        let effect_id = state.next_effect_id();
        state.add_entity(spawn_hit_effect(effect_id, position, assets));
    }
    state.removed_projectiles.insert(projectile_id.clone());
}

/// Separates the local player from anything it overlaps, shifting along the
/// axis of smaller overlap, away from the other entity's center. Only the
/// local player ever moves - remote positions are server-owned.
pub fn resolve_push_out(state: &mut GameState) {
    let Some(local_id) = state.local_id.clone() else {
        return;
    };

    let mut obstacle_ids: Vec<EntityId> = state
        .other_players
        .iter()
        .filter(|id| **id != local_id)
        .cloned()
        .collect();
    obstacle_ids.extend(state.active_ids_with_tag(Tag::Enemy));

    for obstacle_id in obstacle_ids {
        let Some(local) = state.find(&local_id) else { return };
        if !local.body.active {
            return;
        }
        // Re-read after each shift: one push can open or close another.
        let Some(local_rect) = local.collider_rect() else { return };

        let Some(other) = state.find(&obstacle_id) else { continue };
        if !other.body.active {
            continue;
        }
        let Some(other_rect) = other.collider_rect() else { continue };
        let Some(overlap) = local_rect.intersection(&other_rect) else {
            continue;
        };

        let shift = if overlap.w < overlap.h {
            if local_rect.center().x < other_rect.center().x {
                Vec2::new(-overlap.w, 0.0)
            } else {
                Vec2::new(overlap.w, 0.0)
            }
        } else if local_rect.center().y < other_rect.center().y {
            Vec2::new(0.0, -overlap.h)
        } else {
            Vec2::new(0.0, overlap.h)
        };

        if let Some(local) = state.find_mut(&local_id) {
            local.body.position += shift;
        }
    }
}
