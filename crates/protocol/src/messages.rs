//! Wire message types.
//!
//! The protocol is line-delimited UTF-8 text with colon-separated fields,
//! one message per line. Inbound messages parse into [`ServerEvent`];
//! outbound [`ClientCommand`]s render through `Display`. Field layouts are
//! fixed by the server and must not drift.

use std::fmt;

use quadfire_core::{EntityId, GameOverReason};
use thiserror::Error;

/// A message the server sends to this client.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// `WELCOME:id:x:y:color[:isHost]` - session handshake.
    Welcome {
        id: EntityId,
        x: f32,
        y: f32,
        color: String,
        is_host: bool,
    },
    /// `PLAYERS:id,x,y,color;...` - full roster snapshot.
    Players(Vec<PlayerInfo>),
    /// `UPDATE:id:x:y` - a player moved.
    PlayerMoved { id: EntityId, x: f32, y: f32 },
    /// `NEW_PLAYER:id:x:y:color`
    NewPlayer {
        id: EntityId,
        x: f32,
        y: f32,
        color: String,
    },
    /// `PLAYER_LEFT:id`
    PlayerLeft { id: EntityId },
    /// `PROJECTILE_UPDATE:id:x:y:dx:dy:ownerId`
    ProjectileUpdate {
        id: EntityId,
        x: f32,
        y: f32,
        direction_x: f32,
        direction_y: f32,
        owner: EntityId,
    },
    /// `PROJECTILE_REMOVE:id`
    ProjectileRemove { id: EntityId },
    /// `DAMAGE:id:currentHp:maxHp`
    Damage {
        id: EntityId,
        current_hp: i32,
        max_hp: i32,
    },
    /// `RESPAWN:id:x:y`
    Respawn { id: EntityId, x: f32, y: f32 },
    /// `GAME_START` - the host started the round.
    GameStart,
    /// `ENEMY_SPAWN:id:x:y:targetPlayerId`
    EnemySpawn {
        id: EntityId,
        x: f32,
        y: f32,
        target: EntityId,
    },
    /// `ENEMY_UPDATE:id:x:y:hp:maxHp`
    EnemyUpdate {
        id: EntityId,
        x: f32,
        y: f32,
        current_hp: i32,
        max_hp: i32,
    },
    /// `ENEMY_DEATH:id:killerId`
    EnemyDeath { id: EntityId, killer: EntityId },
    /// `PLAYER_DEATH:id`
    PlayerDeath { id: EntityId },
    /// `WAVE_COMPLETE:n`
    WaveComplete { wave: u32 },
    /// `GAME_OVER:reason`
    GameOver { reason: GameOverReason },
    /// `HOST_ASSIGNED` - this client is the new host.
    HostAssigned,
}

/// One roster entry in a `PLAYERS` snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInfo {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub color: String,
}

/// A message this client sends to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    /// `MOVE:id:x:y` - position report, integral coordinates.
    Move { id: EntityId, x: i32, y: i32 },
    /// `SHOOT:id:x:y:dx:dy` - shot origin and unit direction.
    Shoot {
        id: EntityId,
        x: i32,
        y: i32,
        direction_x: f32,
        direction_y: f32,
    },
    /// `HIT:victim:shooter:projectileId`
    Hit {
        victim: EntityId,
        shooter: EntityId,
        projectile: EntityId,
    },
    /// `GAME_START:id` - host requests round start.
    StartGame { id: EntityId },
    /// `DISCONNECT`
    Disconnect,
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientCommand::Move { id, x, y } => write!(f, "MOVE:{id}:{x}:{y}"),
            ClientCommand::Shoot {
                id,
                x,
                y,
                direction_x,
                direction_y,
            } => write!(f, "SHOOT:{id}:{x}:{y}:{direction_x}:{direction_y}"),
            ClientCommand::Hit {
                victim,
                shooter,
                projectile,
            } => write!(f, "HIT:{victim}:{shooter}:{projectile}"),
            ClientCommand::StartGame { id } => write!(f, "GAME_START:{id}"),
            ClientCommand::Disconnect => f.write_str("DISCONNECT"),
        }
    }
}

/// Why an inbound line could not become a [`ServerEvent`].
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("empty message")]
    Empty,
    #[error("unknown message kind `{0}`")]
    UnknownKind(String),
    #[error("{kind}: missing field `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    #[error("{kind}: invalid value `{value}` for field `{field}`")]
    InvalidField {
        kind: &'static str,
        field: &'static str,
        value: String,
    },
}

/// Colon-separated field cursor with typed accessors.
struct Fields<'a> {
    kind: &'static str,
    parts: std::str::Split<'a, char>,
}

impl<'a> Fields<'a> {
    fn new(kind: &'static str, payload: &'a str) -> Self {
        Self {
            kind,
            parts: payload.split(':'),
        }
    }

    fn next_str(&mut self, field: &'static str) -> Result<&'a str, ParseError> {
        match self.parts.next() {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(ParseError::MissingField {
                kind: self.kind,
                field,
            }),
        }
    }

    fn next_id(&mut self, field: &'static str) -> Result<EntityId, ParseError> {
        Ok(EntityId::new(self.next_str(field)?))
    }

    fn next_f32(&mut self, field: &'static str) -> Result<f32, ParseError> {
        let raw = self.next_str(field)?;
        raw.parse().map_err(|_| ParseError::InvalidField {
            kind: self.kind,
            field,
            value: raw.to_owned(),
        })
    }

    fn next_i32(&mut self, field: &'static str) -> Result<i32, ParseError> {
        let raw = self.next_str(field)?;
        raw.parse().map_err(|_| ParseError::InvalidField {
            kind: self.kind,
            field,
            value: raw.to_owned(),
        })
    }

    fn next_u32(&mut self, field: &'static str) -> Result<u32, ParseError> {
        let raw = self.next_str(field)?;
        raw.parse().map_err(|_| ParseError::InvalidField {
            kind: self.kind,
            field,
            value: raw.to_owned(),
        })
    }

    fn next_opt(&mut self) -> Option<&'a str> {
        self.parts.next().filter(|s| !s.is_empty())
    }
}

impl ServerEvent {
    /// Parses one framed line. Trailing fields beyond a message's layout
    /// are ignored for forward compatibility.
    pub fn parse(line: &str) -> Result<ServerEvent, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        let (kind, payload) = line.split_once(':').unwrap_or((line, ""));

        match kind {
            "WELCOME" => {
                let mut f = Fields::new("WELCOME", payload);
                Ok(ServerEvent::Welcome {
                    id: f.next_id("id")?,
                    x: f.next_f32("x")?,
                    y: f.next_f32("y")?,
                    color: f.next_str("color")?.to_owned(),
                    is_host: f.next_opt() == Some("true"),
                })
            }
            "PLAYERS" => Ok(ServerEvent::Players(parse_roster(payload)?)),
            "UPDATE" => {
                let mut f = Fields::new("UPDATE", payload);
                Ok(ServerEvent::PlayerMoved {
                    id: f.next_id("id")?,
                    x: f.next_f32("x")?,
                    y: f.next_f32("y")?,
                })
            }
            "NEW_PLAYER" => {
                let mut f = Fields::new("NEW_PLAYER", payload);
                Ok(ServerEvent::NewPlayer {
                    id: f.next_id("id")?,
                    x: f.next_f32("x")?,
                    y: f.next_f32("y")?,
                    color: f.next_str("color")?.to_owned(),
                })
            }
            "PLAYER_LEFT" => {
                let mut f = Fields::new("PLAYER_LEFT", payload);
                Ok(ServerEvent::PlayerLeft {
                    id: f.next_id("id")?,
                })
            }
            "PROJECTILE_UPDATE" => {
                let mut f = Fields::new("PROJECTILE_UPDATE", payload);
                Ok(ServerEvent::ProjectileUpdate {
                    id: f.next_id("id")?,
                    x: f.next_f32("x")?,
                    y: f.next_f32("y")?,
                    direction_x: f.next_f32("dx")?,
                    direction_y: f.next_f32("dy")?,
                    owner: f.next_id("ownerId")?,
                })
            }
            "PROJECTILE_REMOVE" => {
                let mut f = Fields::new("PROJECTILE_REMOVE", payload);
                Ok(ServerEvent::ProjectileRemove {
                    id: f.next_id("id")?,
                })
            }
            "DAMAGE" => {
                let mut f = Fields::new("DAMAGE", payload);
                Ok(ServerEvent::Damage {
                    id: f.next_id("id")?,
                    current_hp: f.next_i32("currentHp")?,
                    max_hp: f.next_i32("maxHp")?,
                })
            }
            "RESPAWN" => {
                let mut f = Fields::new("RESPAWN", payload);
                Ok(ServerEvent::Respawn {
                    id: f.next_id("id")?,
                    x: f.next_f32("x")?,
                    y: f.next_f32("y")?,
                })
            }
            "GAME_START" => Ok(ServerEvent::GameStart),
            "ENEMY_SPAWN" => {
                let mut f = Fields::new("ENEMY_SPAWN", payload);
                Ok(ServerEvent::EnemySpawn {
                    id: f.next_id("id")?,
                    x: f.next_f32("x")?,
                    y: f.next_f32("y")?,
                    target: f.next_id("targetPlayerId")?,
                })
            }
            "ENEMY_UPDATE" => {
                let mut f = Fields::new("ENEMY_UPDATE", payload);
                Ok(ServerEvent::EnemyUpdate {
                    id: f.next_id("id")?,
                    x: f.next_f32("x")?,
                    y: f.next_f32("y")?,
                    current_hp: f.next_i32("hp")?,
                    max_hp: f.next_i32("maxHp")?,
                })
            }
            "ENEMY_DEATH" => {
                let mut f = Fields::new("ENEMY_DEATH", payload);
                Ok(ServerEvent::EnemyDeath {
                    id: f.next_id("id")?,
                    killer: f.next_id("killerId")?,
                })
            }
            "PLAYER_DEATH" => {
                let mut f = Fields::new("PLAYER_DEATH", payload);
                Ok(ServerEvent::PlayerDeath {
                    id: f.next_id("id")?,
                })
            }
            "WAVE_COMPLETE" => {
                let mut f = Fields::new("WAVE_COMPLETE", payload);
                Ok(ServerEvent::WaveComplete {
                    wave: f.next_u32("wave")?,
                })
            }
            "GAME_OVER" => {
                let mut f = Fields::new("GAME_OVER", payload);
                let raw = f.next_str("reason")?;
                let reason =
                    GameOverReason::parse(raw).ok_or_else(|| ParseError::InvalidField {
                        kind: "GAME_OVER",
                        field: "reason",
                        value: raw.to_owned(),
                    })?;
                Ok(ServerEvent::GameOver { reason })
            }
            "HOST_ASSIGNED" => Ok(ServerEvent::HostAssigned),
            other => Err(ParseError::UnknownKind(other.to_owned())),
        }
    }
}

/// `id,x,y,color;id,x,y,color;...` - entries that do not parse are skipped
/// so one bad entry cannot take down the whole snapshot.
fn parse_roster(payload: &str) -> Result<Vec<PlayerInfo>, ParseError> {
    let mut players = Vec::new();
    for entry in payload.split(';').filter(|e| !e.is_empty()) {
        let mut parts = entry.split(',');
        let (Some(id), Some(x), Some(y), Some(color)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            continue;
        };
        let (Ok(x), Ok(y)) = (x.parse(), y.parse()) else {
            continue;
        };
        players.push(PlayerInfo {
            id: EntityId::new(id),
            x,
            y,
            color: color.to_owned(),
        });
    }
    Ok(players)
}
