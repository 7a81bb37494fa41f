//! Player input state.
//!
//! The embedder (window system, bot driver, test) fills an [`InputState`]
//! once per frame; the game applies it only in the Playing phase.

use glam::Vec2;

use crate::config::SHOOT_COOLDOWN_SECS;

/// Pressed inputs plus the world-space aim point, sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub bits: u8,
    /// Where the player is aiming, in world coordinates.
    pub aim: Option<Vec2>,
}

impl InputState {
    pub const UP: u8 = 1 << 0;
    pub const DOWN: u8 = 1 << 1;
    pub const LEFT: u8 = 1 << 2;
    pub const RIGHT: u8 = 1 << 3;
    pub const FIRE: u8 = 1 << 4;
    /// Menu confirm (host starts the round).
    pub const START: u8 = 1 << 5;

    pub const fn new() -> Self {
        Self { bits: 0, aim: None }
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self { bits, aim: None }
    }

    #[inline]
    pub const fn is_pressed(&self, input: u8) -> bool {
        self.bits & input != 0
    }

    #[inline]
    pub fn set(&mut self, input: u8, pressed: bool) {
        if pressed {
            self.bits |= input;
        } else {
            self.bits &= !input;
        }
    }

    /// Horizontal axis as -1, 0 or 1; opposing keys cancel.
    pub const fn horizontal(&self) -> i8 {
        match (self.is_pressed(Self::LEFT), self.is_pressed(Self::RIGHT)) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }

    /// Vertical axis as -1, 0 or 1 (positive is down, screen convention).
    pub const fn vertical(&self) -> i8 {
        match (self.is_pressed(Self::UP), self.is_pressed(Self::DOWN)) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }

    /// Movement axes as a vector with components in {-1, 0, 1}.
    pub fn axis(&self) -> Vec2 {
        Vec2::new(self.horizontal() as f32, self.vertical() as f32)
    }

    pub const fn fire(&self) -> bool {
        self.is_pressed(Self::FIRE)
    }

    pub const fn start(&self) -> bool {
        self.is_pressed(Self::START)
    }
}

/// Shot rate limiter, advanced by game time rather than wall clock.
#[derive(Debug, Clone)]
pub struct ShootControl {
    elapsed_secs: f32,
    last_shot_secs: f32,
    cooldown_secs: f32,
}

impl Default for ShootControl {
    fn default() -> Self {
        Self::new(SHOOT_COOLDOWN_SECS)
    }
}

impl ShootControl {
    pub fn new(cooldown_secs: f32) -> Self {
        Self {
            elapsed_secs: 0.0,
            // The first shot is never gated.
            last_shot_secs: -cooldown_secs,
            cooldown_secs,
        }
    }

    pub fn advance(&mut self, dt_ms: f32) {
        self.elapsed_secs += dt_ms / 1000.0;
    }

    /// Consumes a shot if the cooldown allows it.
    pub fn try_fire(&mut self) -> bool {
        if self.elapsed_secs - self.last_shot_secs < self.cooldown_secs {
            return false;
        }
        self.last_shot_secs = self.elapsed_secs;
        true
    }
}
