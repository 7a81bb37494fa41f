//! Enemy chase AI.
//!
//! AI steps locally only until the server sends the first position update
//! for an enemy; from then on the server owns its position and the client
//! merely interpolates and animates.

use glam::Vec2;

use crate::config::ENEMY_STOP_DISTANCE;
use crate::entity::{Entity, EntityId, Tag};
use crate::map::WallMap;
use crate::math::Rect;
use crate::movement::RemoteLerp;
use crate::state::GameState;

/// Chase-the-target behavior state.
#[derive(Debug, Clone)]
pub struct EnemyAi {
    pub enabled: bool,
    /// Weak reference: re-resolved by lookup every step, the target may
    /// have been destroyed.
    pub target: EntityId,
    pub speed: f32,
    pub stop_distance: f32,
    /// Latches true on the first server position update; local stepping
    /// never resumes afterwards.
    pub network_controlled: bool,
}

impl EnemyAi {
    pub fn new(target: EntityId, speed: f32) -> Self {
        Self {
            enabled: true,
            target,
            speed,
            stop_distance: ENEMY_STOP_DISTANCE,
            network_controlled: false,
        }
    }
}

/// Marks an enemy as server-owned and feeds the reported position into its
/// interpolation target.
pub fn apply_network_update(entity: &mut Entity, position: Vec2) {
    if let Some(ai) = entity.enemy_ai_mut() {
        ai.network_controlled = true;
    }
    if entity.has(crate::component::ComponentKind::RemoteLerp) {
        if let Some(lerp) = entity.remote_lerp_mut() {
            lerp.set_target(position);
        }
    } else {
        entity.add(crate::component::Component::RemoteLerp(RemoteLerp::new(
            position,
        )));
    }
}

/// Advances every locally controlled enemy one step toward its target,
/// reverting steps that would clip a wall, the target, or another enemy.
pub fn step_enemies(state: &mut GameState, walls: &WallMap) {
    let enemy_ids = state.active_ids_with_tag(Tag::Enemy);

    for id in &enemy_ids {
        let Some(enemy) = state.find(id) else { continue };
        let Some(ai) = enemy.enemy_ai() else { continue };
        if !ai.enabled || ai.network_controlled {
            continue;
        }
        let (target_id, speed, stop_distance) = (ai.target.clone(), ai.speed, ai.stop_distance);
        let position = enemy.body.position;
        let collider = enemy.collider().cloned();

        let Some(target) = state.find(&target_id) else { continue };
        if !target.body.active {
            continue;
        }
        let to_target = target.body.position - position;
        let distance = to_target.length();
        if distance <= stop_distance {
            continue;
        }

        let next = position + to_target / distance * speed;

        let blocked = collider.as_ref().is_some_and(|c| {
            let rect = Rect::new(next.x + c.offset.x, next.y + c.offset.y, c.width, c.height);
            if walls.hits(&rect) {
                return true;
            }
            if target
                .collider_rect()
                .is_some_and(|target_rect| rect.overlaps(&target_rect))
            {
                return true;
            }
            enemy_ids
                .iter()
                .filter(|other| *other != id)
                .filter_map(|other| state.find(other))
                .filter_map(|other| other.collider_rect())
                .any(|other_rect| rect.overlaps(&other_rect))
        });

        if !blocked {
            if let Some(enemy) = state.find_mut(id) {
                enemy.body.position = next;
            }
        }
    }
}
