//! Quadfire Core - Client-Side Game Simulation
//!
//! This crate contains the simulation half of the quadfire client: the
//! entity/component registry, movement and interpolation, collision, health,
//! the game phase machine, and the per-frame collision resolution pipeline.
//!
//! # Authority Rules
//!
//! 1. The local player's position is predicted here; everything else is
//!    server-owned and only ever interpolated toward reported targets.
//! 2. Health is authoritative on the server - local values are a rendering
//!    cache overwritten by damage/respawn events.
//! 3. Projectile removal is idempotent: local collision and inbound removal
//!    events share one bounded dedupe set.
//! 4. No I/O and no clocks - callers feed in frame deltas and events.

pub mod animation;
pub mod collision;
pub mod component;
pub mod config;
pub mod enemy;
pub mod entities;
pub mod entity;
pub mod health;
pub mod input;
pub mod map;
pub mod math;
pub mod movement;
pub mod resolve;
pub mod state;

pub use animation::{AnimationClip, AnimationSource, AnimationState, NoAssets};
pub use component::{Component, ComponentKind};
pub use config::WorldConfig;
pub use entity::{Body, Entity, EntityId, Tag, UpdateCtx};
pub use input::{InputState, ShootControl};
pub use map::WallMap;
pub use math::Rect;
pub use resolve::{resolve_projectiles, resolve_push_out, HitReport};
pub use state::{GameOverReason, GamePhase, GameState};
