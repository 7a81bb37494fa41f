//! Game client: reconciliation of server events and the per-tick pipeline.
//!
//! Inbound events mutate the session state here - and only here, on the
//! main loop thread. Each tick runs input, simulation, the collision
//! pipeline and outbound sends, returning the commands to put on the wire
//! so the network layer stays decoupled and the whole flow is testable
//! without sockets.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use glam::Vec2;
use quadfire_core::config::{PLAYER_VISUAL_SIZE, POSITION_UPDATE_INTERVAL_MS};
use quadfire_core::entities::{spawn_enemy, spawn_hit_effect, spawn_player, spawn_projectile};
use quadfire_core::enemy::{apply_network_update, step_enemies};
use quadfire_core::{
    resolve_projectiles, resolve_push_out, AnimationSource, EntityId, GamePhase, GameState,
    InputState, ShootControl, Tag, WallMap, WorldConfig,
};
use quadfire_protocol::{ClientCommand, ServerEvent};

use crate::camera::Camera;
use crate::net::SendInterval;
use crate::render::{color_rgb, entity_visual, health_bar, Renderer, VisualKind};

/// Client-side game session.
pub struct Game {
    pub state: GameState,
    pub world: WorldConfig,
    walls: WallMap,
    assets: Box<dyn AnimationSource>,
    shoot: ShootControl,
    move_gate: SendInterval,
    /// Server-assigned color names, a pure rendering concern.
    colors: HashMap<EntityId, String>,
}

impl Game {
    pub fn new(world: WorldConfig, assets: Box<dyn AnimationSource>) -> Self {
        let walls = WallMap::generate(&world);
        Self {
            state: GameState::new(),
            world,
            walls,
            assets,
            shoot: ShootControl::default(),
            move_gate: SendInterval::new(Duration::from_millis(POSITION_UPDATE_INTERVAL_MS)),
            colors: HashMap::new(),
        }
    }

    /// Applies one inbound server event to the session.
    pub fn apply_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Welcome {
                id,
                x,
                y,
                color,
                is_host,
            } => self.on_welcome(id, Vec2::new(x, y), color, is_host),
            ServerEvent::Players(roster) => {
                for info in roster {
                    self.upsert_remote_player(info.id, Vec2::new(info.x, info.y), Some(info.color));
                }
            }
            ServerEvent::PlayerMoved { id, x, y } => {
                self.upsert_remote_player(id, Vec2::new(x, y), None);
            }
            ServerEvent::NewPlayer { id, x, y, color } => {
                self.upsert_remote_player(id, Vec2::new(x, y), Some(color));
            }
            ServerEvent::PlayerLeft { id } => {
                log::info!("player left: {id}");
                self.state.remove_entity(&id);
                self.state.alive_players.remove(&id);
                self.state.dead_players.remove(&id);
                self.colors.remove(&id);
            }
            ServerEvent::ProjectileUpdate {
                id,
                x,
                y,
                direction_x,
                direction_y,
                owner,
            } => self.on_projectile_update(id, Vec2::new(x, y), Vec2::new(direction_x, direction_y), owner),
            ServerEvent::ProjectileRemove { id } => self.on_projectile_remove(id),
            ServerEvent::Damage {
                id,
                current_hp,
                max_hp,
            } => {
                if let Some(entity) = self.state.find_mut(&id) {
                    if let Some(health) = entity.health_mut() {
                        health.sync(current_hp, max_hp);
                        log::debug!("{id} health {current_hp}/{max_hp}");
                    }
                }
            }
            ServerEvent::Respawn { id, x, y } => self.on_respawn(id, Vec2::new(x, y)),
            ServerEvent::GameStart => self.on_game_start(),
            ServerEvent::EnemySpawn { id, x, y, target } => {
                self.on_enemy_spawn(id, Vec2::new(x, y), target)
            }
            ServerEvent::EnemyUpdate {
                id,
                x,
                y,
                current_hp,
                max_hp,
            } => self.on_enemy_update(id, Vec2::new(x, y), current_hp, max_hp),
            ServerEvent::EnemyDeath { id, killer } => {
                if Some(&killer) == self.state.local_id.as_ref() {
                    self.state.kill_count += 1;
                    log::info!("killed {id}, total {}", self.state.kill_count);
                }
                self.state.remove_entity(&id);
            }
            ServerEvent::PlayerDeath { id } => {
                self.state.mark_player_dead(&id);
                if Some(&id) == self.state.local_id.as_ref() {
                    self.state.set_phase(GamePhase::Dead);
                }
            }
            ServerEvent::WaveComplete { wave } => {
                log::info!("wave {wave} complete");
                self.state.current_wave = wave;
            }
            ServerEvent::GameOver { reason } => {
                self.state.game_over_reason = Some(reason);
                self.state.set_phase(GamePhase::GameOver);
            }
            ServerEvent::HostAssigned => {
                log::info!("assigned as the new host");
                self.state.is_host = true;
            }
        }
    }

    /// Connection dropped: keep the world for the disconnect screen, stop
    /// trusting anything.
    pub fn handle_disconnect(&mut self) {
        log::warn!("disconnected from server");
        self.state.connected = false;
    }

    /// One frame. Returns the commands to send to the server.
    pub fn tick(&mut self, input: &InputState, dt_ms: f32, now: Instant) -> Vec<ClientCommand> {
        let mut out = Vec::new();
        self.shoot.advance(dt_ms);

        match self.state.phase() {
            GamePhase::Menu => {
                // Only the host can start, nothing simulates yet.
                if input.start() && self.state.is_host {
                    if let Some(id) = self.state.local_id.clone() {
                        out.push(ClientCommand::StartGame { id });
                    }
                }
                return out;
            }
            GamePhase::Playing => {
                self.apply_movement_input(input);
                if let Some(command) = self.try_shoot(input) {
                    out.push(command);
                }
            }
            GamePhase::Dead | GamePhase::GameOver => {
                // The world stays visible and live; local input is ignored.
                if let Some(local) = self.state.local_player_mut() {
                    if let Some(movement) = local.movement_mut() {
                        movement.stop();
                    }
                }
            }
        }

        self.state.update(dt_ms, &self.world, self.assets.as_ref());

        if self.state.phase() == GamePhase::Playing {
            step_enemies(&mut self.state, &self.walls);
            resolve_push_out(&mut self.state);

            if let Some(command) = self.position_update(now) {
                out.push(command);
            }

            for report in resolve_projectiles(&mut self.state, &self.walls, self.assets.as_ref()) {
                out.push(ClientCommand::Hit {
                    victim: report.victim,
                    shooter: report.shooter,
                    projectile: report.projectile,
                });
            }
        }

        out
    }

    /// Draws the world through the renderer collaborator.
    pub fn render(&self, renderer: &mut dyn Renderer, camera: &mut Camera) {
        if let Some(local) = self.state.local_player() {
            camera.follow(local.body.position, &self.world);
        }

        for entity in &self.state.entities {
            if !entity.body.active {
                continue;
            }
            let color = self
                .colors
                .get(&entity.id)
                .map(String::as_str)
                .map_or([128, 128, 128], color_rgb);
            if let Some(visual) = entity_visual(entity, color) {
                match visual.kind {
                    VisualKind::Effect => renderer.draw_effect(&visual, camera),
                    _ => renderer.draw_entity(&visual, camera),
                }
            }
        }

        for entity in &self.state.entities {
            if entity.body.active
                && (entity.body.has_tag(Tag::Player) || entity.body.has_tag(Tag::Enemy))
            {
                if let Some(bar) = health_bar(entity) {
                    renderer.draw_health_bar(&bar, camera);
                }
            }
        }
    }

    fn on_welcome(&mut self, id: EntityId, position: Vec2, color: String, is_host: bool) {
        log::info!("welcome: {id} at {position} color {color} host {is_host}");
        let player = spawn_player(id.clone(), position, true, self.assets.as_ref());
        self.state.add_entity(player);
        self.state.local_id = Some(id.clone());
        self.state.connected = true;
        self.state.spawn_point = position;
        self.state.is_host = is_host;
        self.state.mark_player_alive(&id);
        self.colors.insert(id, color);
    }

    /// Known remote players get a new interpolation target; unknown ids are
    /// constructed and registered on the spot.
    fn upsert_remote_player(&mut self, id: EntityId, position: Vec2, color: Option<String>) {
        if Some(&id) == self.state.local_id.as_ref() {
            return;
        }
        if let Some(entity) = self.state.find_mut(&id) {
            if let Some(lerp) = entity.remote_lerp_mut() {
                lerp.set_target(position);
            }
            if let Some(color) = color {
                self.colors.insert(id, color);
            }
            return;
        }

        log::info!("new remote player: {id}");
        let player = spawn_player(id.clone(), position, false, self.assets.as_ref());
        self.state.add_other_player(player);
        self.state.mark_player_alive(&id);
        self.colors
            .insert(id, color.unwrap_or_else(|| "gray".to_owned()));
    }

    fn on_projectile_update(&mut self, id: EntityId, position: Vec2, direction: Vec2, owner: EntityId) {
        // Locally removed already: the server just has not caught up.
        if self.state.removed_projectiles.contains(&id) {
            return;
        }
        if let Some(entity) = self.state.find_mut(&id) {
            entity.body.position = position;
            return;
        }
        let projectile = spawn_projectile(id, position, direction, owner, self.assets.as_ref());
        self.state.add_projectile(projectile);
    }

    fn on_projectile_remove(&mut self, id: EntityId) {
        if self.state.removed_projectiles.contains(&id) {
            return;
        }
        let was_active = self.state.find(&id).map(|e| e.body.active);
        if let Some(position) = self.state.remove_entity(&id) {
            // Effect only when local collision had not already claimed it.
            if was_active == Some(true) {
                let effect_id = self.state.next_effect_id();
                let effect = spawn_hit_effect(effect_id, position, self.assets.as_ref());
                self.state.add_entity(effect);
            }
        }
        self.state.removed_projectiles.insert(id);
    }

    fn on_respawn(&mut self, id: EntityId, position: Vec2) {
        if let Some(entity) = self.state.find_mut(&id) {
            entity.body.position = position;
            if let Some(lerp) = entity.remote_lerp_mut() {
                lerp.set_target(position);
            }
            if let Some(health) = entity.health_mut() {
                health.restore_full();
            }
        }
        self.state.mark_player_alive(&id);
        if Some(&id) == self.state.local_id.as_ref() {
            self.state.set_phase(GamePhase::Playing);
        }
        log::info!("{id} respawned at {position}");
    }

    fn on_game_start(&mut self) {
        self.state.set_phase(GamePhase::Playing);
        // The server owns enemies from here; drop any local stragglers.
        for id in self.state.active_ids_with_tag(Tag::Enemy) {
            self.state.remove_entity(&id);
        }
    }

    fn on_enemy_spawn(&mut self, id: EntityId, position: Vec2, target: EntityId) {
        let target = if self.state.find(&target).is_some() {
            target
        } else if let Some(local) = self.state.local_id.clone() {
            // Target unknown here (left, or never seen): fall back to us.
            local
        } else {
            target
        };
        log::info!("enemy {id} spawned at {position}");
        let enemy = spawn_enemy(id, position, target, self.assets.as_ref());
        self.state.add_entity(enemy);
    }

    fn on_enemy_update(&mut self, id: EntityId, position: Vec2, current_hp: i32, max_hp: i32) {
        if self.state.find(&id).is_none() {
            // Spawn was missed; construct it as already server-owned.
            let target = self.state.local_id.clone().unwrap_or_else(|| id.clone());
            let enemy = spawn_enemy(id.clone(), position, target, self.assets.as_ref());
            self.state.add_entity(enemy);
        }
        if let Some(entity) = self.state.find_mut(&id) {
            apply_network_update(entity, position);
            if let Some(health) = entity.health_mut() {
                health.sync(current_hp, max_hp);
            }
        }
    }

    fn apply_movement_input(&mut self, input: &InputState) {
        if let Some(local) = self.state.local_player_mut() {
            if let Some(movement) = local.movement_mut() {
                movement.set_velocity(input.axis());
            }
        }
    }

    fn try_shoot(&mut self, input: &InputState) -> Option<ClientCommand> {
        if !input.fire() {
            return None;
        }
        let aim = input.aim?;
        let local = self.state.local_player()?;
        let center = local.body.position + Vec2::splat(PLAYER_VISUAL_SIZE * 0.5);
        let toward = aim - center;
        let distance = toward.length();
        if distance <= f32::EPSILON {
            return None;
        }
        if !self.shoot.try_fire() {
            return None;
        }
        let direction = toward / distance;
        Some(ClientCommand::Shoot {
            id: self.state.local_id.clone()?,
            x: center.x.round() as i32,
            y: center.y.round() as i32,
            direction_x: direction.x,
            direction_y: direction.y,
        })
    }

    /// Rate-limited position report, only while actually moving.
    fn position_update(&mut self, now: Instant) -> Option<ClientCommand> {
        let local = self.state.local_player()?;
        if !local.movement().is_some_and(|m| m.is_moving()) {
            return None;
        }
        let position = local.body.position;
        if !self.move_gate.ready(now) {
            return None;
        }
        Some(ClientCommand::Move {
            id: self.state.local_id.clone()?,
            x: position.x.round() as i32,
            y: position.y.round() as i32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadfire_core::{GameOverReason, NoAssets};

    fn game() -> Game {
        Game::new(WorldConfig::default(), Box::new(NoAssets))
    }

    fn welcomed_game() -> Game {
        let mut game = game();
        game.apply_event(ServerEvent::Welcome {
            id: "player_1".into(),
            x: 1150.0,
            y: 850.0,
            color: "red".to_owned(),
            is_host: true,
        });
        game.apply_event(ServerEvent::GameStart);
        game
    }

    fn right_input() -> InputState {
        let mut input = InputState::new();
        input.set(InputState::RIGHT, true);
        input
    }

    #[test]
    fn welcome_creates_local_player() {
        let mut game = game();
        game.apply_event(ServerEvent::Welcome {
            id: "player_1".into(),
            x: 1150.0,
            y: 850.0,
            color: "red".to_owned(),
            is_host: true,
        });

        assert!(game.state.connected);
        assert!(game.state.is_host);
        assert_eq!(game.state.phase(), GamePhase::Menu);
        let local = game.state.local_player().unwrap();
        assert_eq!(local.body.position, Vec2::new(1150.0, 850.0));
        assert!(local.movement().is_some());
        assert!(game.state.is_player_alive(&"player_1".into()));
    }

    #[test]
    fn only_the_host_can_start_from_menu() {
        let mut game = game();
        game.apply_event(ServerEvent::Welcome {
            id: "player_1".into(),
            x: 0.0,
            y: 0.0,
            color: "red".to_owned(),
            is_host: false,
        });

        let mut input = InputState::new();
        input.set(InputState::START, true);
        assert!(game.tick(&input, 16.0, Instant::now()).is_empty());

        game.state.is_host = true;
        let commands = game.tick(&input, 16.0, Instant::now());
        assert_eq!(
            commands,
            vec![ClientCommand::StartGame {
                id: "player_1".into()
            }]
        );
    }

    #[test]
    fn update_for_unknown_player_constructs_it() {
        let mut game = welcomed_game();
        game.apply_event(ServerEvent::PlayerMoved {
            id: "player_9".into(),
            x: 300.0,
            y: 400.0,
        });

        let remote = game.state.find(&"player_9".into()).unwrap();
        assert!(remote.remote_lerp().is_some());
        assert!(game.state.other_players.contains(&"player_9".into()));
    }

    #[test]
    fn update_for_known_player_moves_its_target_not_its_position() {
        let mut game = welcomed_game();
        game.apply_event(ServerEvent::NewPlayer {
            id: "player_2".into(),
            x: 100.0,
            y: 100.0,
            color: "blue".to_owned(),
        });
        game.apply_event(ServerEvent::PlayerMoved {
            id: "player_2".into(),
            x: 200.0,
            y: 100.0,
        });

        let remote = game.state.find(&"player_2".into()).unwrap();
        assert_eq!(remote.body.position, Vec2::new(100.0, 100.0));
        assert_eq!(remote.remote_lerp().unwrap().target, Vec2::new(200.0, 100.0));

        // Interpolation closes half the 100-unit gap on the next tick.
        game.tick(&InputState::new(), 16.0, Instant::now());
        let remote = game.state.find(&"player_2".into()).unwrap();
        assert!((remote.body.position.x - 150.0).abs() < 1e-3);
    }

    #[test]
    fn movement_input_moves_local_player_and_reports_position() {
        let mut game = welcomed_game();
        let t0 = Instant::now();

        let commands = game.tick(&right_input(), 16.0, t0);
        let local = game.state.local_player().unwrap();
        assert_eq!(local.body.position, Vec2::new(1155.0, 850.0));
        assert!(commands.iter().any(|c| matches!(
            c,
            ClientCommand::Move { x: 1155, y: 850, .. }
        )));
    }

    #[test]
    fn position_updates_are_rate_limited() {
        let mut game = welcomed_game();
        let t0 = Instant::now();

        let first = game.tick(&right_input(), 16.0, t0);
        let second = game.tick(&right_input(), 16.0, t0 + Duration::from_millis(16));
        let third = game.tick(&right_input(), 16.0, t0 + Duration::from_millis(60));

        let moves = |cmds: &[ClientCommand]| {
            cmds.iter()
                .filter(|c| matches!(c, ClientCommand::Move { .. }))
                .count()
        };
        assert_eq!(moves(&first), 1);
        assert_eq!(moves(&second), 0, "50ms interval not yet elapsed");
        assert_eq!(moves(&third), 1);
    }

    #[test]
    fn no_position_report_when_standing_still() {
        let mut game = welcomed_game();
        let commands = game.tick(&InputState::new(), 16.0, Instant::now());
        assert!(commands
            .iter()
            .all(|c| !matches!(c, ClientCommand::Move { .. })));
    }

    #[test]
    fn shooting_emits_unit_direction_and_respects_cooldown() {
        let mut game = welcomed_game();
        let mut input = InputState::new();
        input.set(InputState::FIRE, true);
        // Aim due east of the player center (1200, 900).
        input.aim = Some(Vec2::new(1500.0, 900.0));

        let commands = game.tick(&input, 16.0, Instant::now());
        let shot = commands
            .iter()
            .find_map(|c| match c {
                ClientCommand::Shoot {
                    x,
                    y,
                    direction_x,
                    direction_y,
                    ..
                } => Some((*x, *y, *direction_x, *direction_y)),
                _ => None,
            })
            .expect("first shot fires");
        assert_eq!((shot.0, shot.1), (1200, 900));
        assert!((shot.2 - 1.0).abs() < 1e-5);
        assert!(shot.3.abs() < 1e-5);

        // Cooldown: an immediate second frame cannot fire again.
        let commands = game.tick(&input, 16.0, Instant::now());
        assert!(commands
            .iter()
            .all(|c| !matches!(c, ClientCommand::Shoot { .. })));
    }

    #[test]
    fn dead_phase_ignores_input_until_respawn() {
        let mut game = welcomed_game();
        game.apply_event(ServerEvent::PlayerDeath {
            id: "player_1".into(),
        });
        assert_eq!(game.state.phase(), GamePhase::Dead);

        let before = game.state.local_player().unwrap().body.position;
        let commands = game.tick(&right_input(), 16.0, Instant::now());
        assert_eq!(game.state.local_player().unwrap().body.position, before);
        assert!(commands.is_empty());

        game.apply_event(ServerEvent::Respawn {
            id: "player_1".into(),
            x: 1150.0,
            y: 850.0,
        });
        assert_eq!(game.state.phase(), GamePhase::Playing);
        assert!(game.state.is_player_alive(&"player_1".into()));
        assert_eq!(
            game.state.local_player().unwrap().health().unwrap().current_hp,
            100
        );
    }

    #[test]
    fn respawn_for_someone_else_does_not_revive_us() {
        let mut game = welcomed_game();
        game.apply_event(ServerEvent::NewPlayer {
            id: "player_2".into(),
            x: 100.0,
            y: 100.0,
            color: "blue".to_owned(),
        });
        game.apply_event(ServerEvent::PlayerDeath {
            id: "player_1".into(),
        });
        game.apply_event(ServerEvent::Respawn {
            id: "player_2".into(),
            x: 50.0,
            y: 50.0,
        });
        assert_eq!(game.state.phase(), GamePhase::Dead);
    }

    #[test]
    fn game_over_is_terminal_even_across_respawn() {
        let mut game = welcomed_game();
        game.apply_event(ServerEvent::GameOver {
            reason: GameOverReason::AllDead,
        });
        assert_eq!(game.state.phase(), GamePhase::GameOver);
        assert_eq!(game.state.game_over_reason, Some(GameOverReason::AllDead));

        game.apply_event(ServerEvent::Respawn {
            id: "player_1".into(),
            x: 0.0,
            y: 0.0,
        });
        assert_eq!(game.state.phase(), GamePhase::GameOver);
    }

    #[test]
    fn projectile_remove_is_idempotent_with_one_effect() {
        let mut game = welcomed_game();
        game.apply_event(ServerEvent::ProjectileUpdate {
            id: "proj_1".into(),
            x: 500.0,
            y: 500.0,
            direction_x: 1.0,
            direction_y: 0.0,
            owner: "player_2".into(),
        });
        assert!(game.state.projectiles.contains(&"proj_1".into()));

        game.apply_event(ServerEvent::ProjectileRemove {
            id: "proj_1".into(),
        });
        assert_eq!(game.state.active_ids_with_tag(Tag::Effect).len(), 1);
        assert!(game.state.find(&"proj_1".into()).is_none());

        // Duplicate removal: no-op, no second effect.
        game.apply_event(ServerEvent::ProjectileRemove {
            id: "proj_1".into(),
        });
        assert_eq!(game.state.active_ids_with_tag(Tag::Effect).len(), 1);

        // A late update for the removed id must not resurrect it.
        game.apply_event(ServerEvent::ProjectileUpdate {
            id: "proj_1".into(),
            x: 600.0,
            y: 500.0,
            direction_x: 1.0,
            direction_y: 0.0,
            owner: "player_2".into(),
        });
        assert!(game.state.find(&"proj_1".into()).is_none());
    }

    #[test]
    fn enemy_lifecycle_and_kill_credit() {
        let mut game = welcomed_game();
        game.apply_event(ServerEvent::EnemySpawn {
            id: "enemy_1".into(),
            x: 200.0,
            y: 200.0,
            target: "player_1".into(),
        });
        assert!(game.state.find(&"enemy_1".into()).is_some());

        game.apply_event(ServerEvent::EnemyUpdate {
            id: "enemy_1".into(),
            x: 220.0,
            y: 200.0,
            current_hp: 60,
            max_hp: 100,
        });
        let enemy = game.state.find(&"enemy_1".into()).unwrap();
        assert!(enemy.enemy_ai().unwrap().network_controlled);
        assert_eq!(enemy.health().unwrap().current_hp, 60);

        game.apply_event(ServerEvent::EnemyDeath {
            id: "enemy_1".into(),
            killer: "player_1".into(),
        });
        assert_eq!(game.state.kill_count, 1);
        assert!(game.state.find(&"enemy_1".into()).is_none());
    }

    #[test]
    fn enemy_update_for_unknown_enemy_constructs_it_server_owned() {
        let mut game = welcomed_game();
        game.apply_event(ServerEvent::EnemyUpdate {
            id: "enemy_7".into(),
            x: 400.0,
            y: 400.0,
            current_hp: 100,
            max_hp: 100,
        });
        let enemy = game.state.find(&"enemy_7".into()).unwrap();
        assert!(enemy.enemy_ai().unwrap().network_controlled);
    }

    #[test]
    fn host_reassignment_and_wave_tracking() {
        let mut game = welcomed_game();
        game.state.is_host = false;

        game.apply_event(ServerEvent::HostAssigned);
        assert!(game.state.is_host);

        game.apply_event(ServerEvent::WaveComplete { wave: 4 });
        assert_eq!(game.state.current_wave, 4);
    }

    #[test]
    fn player_left_cleans_up_everything() {
        let mut game = welcomed_game();
        game.apply_event(ServerEvent::NewPlayer {
            id: "player_2".into(),
            x: 100.0,
            y: 100.0,
            color: "blue".to_owned(),
        });
        game.apply_event(ServerEvent::PlayerLeft {
            id: "player_2".into(),
        });

        assert!(game.state.find(&"player_2".into()).is_none());
        assert!(!game.state.other_players.contains(&"player_2".into()));
        assert!(!game.state.alive_players.contains(&"player_2".into()));
    }
}
