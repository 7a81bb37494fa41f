//! Session state: entity storage, phase machine, player bookkeeping.
//!
//! One `GameState` per server session, owned and mutated only by the main
//! loop thread. The end-of-frame sweep here is the sole point where
//! destroyed entities leave storage.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use glam::Vec2;

use crate::animation::AnimationSource;
use crate::config::WorldConfig;
use crate::entity::{Entity, EntityId, Tag, UpdateCtx};

/// Top-level game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Menu,
    Playing,
    Dead,
    GameOver,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Dead => "dead",
            GamePhase::GameOver => "game_over",
        };
        f.write_str(name)
    }
}

/// Why the server ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    AllDead,
    Victory,
}

impl GameOverReason {
    pub fn as_str(self) -> &'static str {
        match self {
            GameOverReason::AllDead => "all_dead",
            GameOverReason::Victory => "victory",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all_dead" => Some(GameOverReason::AllDead),
            "victory" => Some(GameOverReason::Victory),
            _ => None,
        }
    }
}

/// Bounded memory of projectile ids that were already removed, shared by
/// the local collision pipeline and inbound removal events so each id is
/// processed at most once.
#[derive(Debug, Default)]
pub struct RemovedIds {
    order: VecDeque<EntityId>,
    set: BTreeSet<EntityId>,
}

impl RemovedIds {
    /// Above this size, the oldest half is evicted.
    pub const CAP: usize = 100;

    pub fn contains(&self, id: &EntityId) -> bool {
        self.set.contains(id)
    }

    pub fn insert(&mut self, id: EntityId) {
        if !self.set.insert(id.clone()) {
            return;
        }
        self.order.push_back(id);
        if self.order.len() > Self::CAP {
            while self.order.len() > Self::CAP / 2 {
                if let Some(old) = self.order.pop_front() {
                    self.set.remove(&old);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// All state for one connected session.
pub struct GameState {
    pub entities: Vec<Entity>,
    /// Id of the locally controlled player, set by the welcome handshake.
    pub local_id: Option<EntityId>,
    pub other_players: BTreeSet<EntityId>,
    pub projectiles: BTreeSet<EntityId>,
    pub connected: bool,
    phase: GamePhase,
    pub is_host: bool,
    pub current_wave: u32,
    pub kill_count: u32,
    pub alive_players: BTreeSet<EntityId>,
    pub dead_players: BTreeSet<EntityId>,
    pub spawn_point: Vec2,
    pub game_over_reason: Option<GameOverReason>,
    pub removed_projectiles: RemovedIds,
    effect_counter: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            local_id: None,
            other_players: BTreeSet::new(),
            projectiles: BTreeSet::new(),
            connected: false,
            phase: GamePhase::Menu,
            is_host: false,
            current_wave: 0,
            kill_count: 0,
            alive_players: BTreeSet::new(),
            dead_players: BTreeSet::new(),
            spawn_point: Vec2::ZERO,
            game_over_reason: None,
            removed_projectiles: RemovedIds::default(),
            effect_counter: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Changes phase, except out of the terminal `GameOver`.
    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == GamePhase::GameOver {
            log::warn!("ignoring phase change to {phase}: session is over");
            return;
        }
        if self.phase != phase {
            log::info!("game phase: {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Adds a remote player entity and indexes it.
    pub fn add_other_player(&mut self, entity: Entity) {
        self.other_players.insert(entity.id.clone());
        self.entities.push(entity);
    }

    /// Adds a projectile entity and indexes it.
    pub fn add_projectile(&mut self, entity: Entity) {
        self.projectiles.insert(entity.id.clone());
        self.entities.push(entity);
    }

    pub fn find(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| &e.id == id)
    }

    pub fn find_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| &e.id == id)
    }

    pub fn local_player(&self) -> Option<&Entity> {
        self.find(self.local_id.as_ref()?)
    }

    pub fn local_player_mut(&mut self) -> Option<&mut Entity> {
        let id = self.local_id.clone()?;
        self.find_mut(&id)
    }

    /// Destroys and removes an entity, dropping any index entries.
    /// Returns the entity's last position when it existed.
    pub fn remove_entity(&mut self, id: &EntityId) -> Option<Vec2> {
        self.other_players.remove(id);
        self.projectiles.remove(id);
        let index = self.entities.iter().position(|e| &e.id == id)?;
        let mut entity = self.entities.remove(index);
        let position = entity.body.position;
        entity.destroy();
        Some(position)
    }

    pub fn active_ids_with_tag(&self, tag: Tag) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.body.active && e.body.has_tag(tag))
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn mark_player_alive(&mut self, id: &EntityId) {
        self.dead_players.remove(id);
        self.alive_players.insert(id.clone());
    }

    pub fn mark_player_dead(&mut self, id: &EntityId) {
        self.alive_players.remove(id);
        self.dead_players.insert(id.clone());
    }

    pub fn is_player_alive(&self, id: &EntityId) -> bool {
        self.alive_players.contains(id)
    }

    pub fn next_effect_id(&mut self) -> EntityId {
        self.effect_counter += 1;
        EntityId::new(format!("effect_{}", self.effect_counter))
    }

    /// Per-frame update: component steps, animation selection from actual
    /// displacement, one-shot effect expiry, then the inactive-entity sweep.
    pub fn update(&mut self, dt_ms: f32, world: &WorldConfig, assets: &dyn AnimationSource) {
        let ctx = UpdateCtx { dt_ms, world };
        for entity in &mut self.entities {
            entity.update(&ctx);
        }

        for entity in &mut self.entities {
            if !entity.body.active {
                continue;
            }
            let delta = entity
                .transform()
                .map(|t| entity.body.position - t.current);
            if let Some(delta) = delta {
                if let Some(animation) = entity.animation_mut() {
                    animation.apply_motion(delta, assets);
                }
            }
        }

        for entity in &mut self.entities {
            if entity.body.active && entity.body.has_tag(Tag::Effect) {
                if let Some(animation) = entity.animation() {
                    if animation.finished {
                        entity.body.active = false;
                    }
                }
            }
        }

        self.sweep();
    }

    /// Drops inactive entities and prunes their index entries.
    fn sweep(&mut self) {
        if self.entities.iter().all(|e| e.body.active) {
            return;
        }
        let dead: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|e| !e.body.active)
            .map(|e| e.id.clone())
            .collect();
        self.entities.retain(|e| e.body.active);
        for id in dead {
            self.other_players.remove(&id);
            self.projectiles.remove(&id);
        }
    }

    /// Tears down the session on disconnect.
    pub fn clear(&mut self) {
        for entity in &mut self.entities {
            entity.destroy();
        }
        self.entities.clear();
        self.other_players.clear();
        self.projectiles.clear();
        self.alive_players.clear();
        self.dead_players.clear();
        self.local_id = None;
        self.connected = false;
    }
}
