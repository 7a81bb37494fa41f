//! Animation state driven by frame durations.
//!
//! The core never touches pixel data. An [`AnimationSource`] resolves a clip
//! name to an ordered list of frame durations; this module only advances a
//! frame index. A missing clip degrades to a placeholder so the entity keeps
//! simulating and colliding with a fallback visual.

use glam::Vec2;

/// Frame durations for one named animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Per-frame display time in milliseconds.
    pub frame_durations_ms: Vec<f32>,
    pub looping: bool,
    /// True when this clip stands in for a missing asset.
    pub placeholder: bool,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, frame_durations_ms: Vec<f32>, looping: bool) -> Self {
        Self {
            name: name.into(),
            frame_durations_ms,
            looping,
            placeholder: false,
        }
    }

    /// Stand-in clip for missing assets: a short fixed-rate cycle so
    /// dependent logic (one-shot expiry in particular) still terminates.
    pub fn placeholder(name: impl Into<String>, looping: bool) -> Self {
        Self {
            name: name.into(),
            frame_durations_ms: vec![150.0; 4],
            looping,
            placeholder: true,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_durations_ms.len()
    }
}

/// Resolves animation names to clips. Implemented outside the core by
/// whatever owns the sprite assets.
pub trait AnimationSource {
    fn clip(&self, name: &str) -> Option<AnimationClip>;
}

/// An [`AnimationSource`] with no assets; everything resolves to
/// placeholders. Useful headless and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAssets;

impl AnimationSource for NoAssets {
    fn clip(&self, _name: &str) -> Option<AnimationClip> {
        None
    }
}

/// Four-way facing for directional sprite sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Down,
    Up,
    Left,
    Right,
}

impl Facing {
    pub fn suffix(self) -> &'static str {
        match self {
            Facing::Down => "down",
            Facing::Up => "up",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

/// Current animation playback state for one entity.
#[derive(Debug, Clone)]
pub struct AnimationState {
    pub enabled: bool,
    clip: AnimationClip,
    pub frame: usize,
    elapsed_ms: f32,
    pub finished: bool,
    /// Set for idle/walk sprite sets that switch clips from movement.
    base: Option<String>,
    facing: Facing,
    moving: bool,
}

impl AnimationState {
    /// Directional idle/walk set: resolves `{base}_idle` and
    /// `{base}_walk_{facing}` clips as the entity moves.
    pub fn directional(base: impl Into<String>, source: &dyn AnimationSource) -> Self {
        let base = base.into();
        let clip = resolve(source, &format!("{base}_idle"), true);
        Self {
            enabled: true,
            clip,
            frame: 0,
            elapsed_ms: 0.0,
            finished: false,
            base: Some(base),
            facing: Facing::Down,
            moving: false,
        }
    }

    /// Single clip played on repeat (projectiles).
    pub fn looping(name: &str, source: &dyn AnimationSource) -> Self {
        Self::fixed(resolve(source, name, true))
    }

    /// Single clip played once; `finished` latches at the end (effects).
    pub fn one_shot(name: &str, source: &dyn AnimationSource) -> Self {
        Self::fixed(resolve(source, name, false))
    }

    fn fixed(clip: AnimationClip) -> Self {
        Self {
            enabled: true,
            clip,
            frame: 0,
            elapsed_ms: 0.0,
            finished: false,
            base: None,
            facing: Facing::Down,
            moving: false,
        }
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Advances playback. Looping clips wrap; one-shots clamp on the last
    /// frame and set `finished`.
    pub(crate) fn update(&mut self, dt_ms: f32) {
        if self.finished || self.clip.frame_count() == 0 {
            return;
        }

        self.elapsed_ms += dt_ms;
        let duration = self.clip.frame_durations_ms[self.frame];
        if self.elapsed_ms < duration {
            return;
        }

        self.elapsed_ms = 0.0;
        self.frame += 1;
        if self.frame >= self.clip.frame_count() {
            if self.clip.looping {
                self.frame = 0;
            } else {
                self.frame = self.clip.frame_count() - 1;
                self.finished = true;
            }
        }
    }

    /// Feeds this frame's displacement into the idle/walk clip selection.
    /// Non-directional states ignore motion.
    pub fn apply_motion(&mut self, delta: Vec2, source: &dyn AnimationSource) {
        let Some(base) = self.base.clone() else {
            return;
        };

        self.moving = delta != Vec2::ZERO;
        if self.moving {
            self.facing = if delta.x.abs() > delta.y.abs() {
                if delta.x > 0.0 {
                    Facing::Right
                } else {
                    Facing::Left
                }
            } else if delta.y > 0.0 {
                Facing::Down
            } else {
                Facing::Up
            };
        }

        let wanted = if self.moving {
            format!("{base}_walk_{}", self.facing.suffix())
        } else {
            format!("{base}_idle")
        };
        if wanted != self.clip.name {
            self.clip = resolve(source, &wanted, true);
            self.frame = 0;
            self.elapsed_ms = 0.0;
        }
    }
}

fn resolve(source: &dyn AnimationSource, name: &str, looping: bool) -> AnimationClip {
    match source.clip(name) {
        Some(mut clip) => {
            clip.looping = looping;
            clip
        }
        None => {
            log::debug!("animation clip `{name}` missing, using placeholder");
            AnimationClip::placeholder(name, looping)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OneClip(AnimationClip);

    impl AnimationSource for OneClip {
        fn clip(&self, name: &str) -> Option<AnimationClip> {
            (name == self.0.name).then(|| self.0.clone())
        }
    }

    #[test]
    fn frames_advance_by_duration() {
        let source = OneClip(AnimationClip::new("spark", vec![100.0, 100.0, 100.0], true));
        let mut state = AnimationState::looping("spark", &source);

        state.update(60.0);
        assert_eq!(state.frame, 0);
        state.update(60.0);
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn looping_wraps_one_shot_finishes() {
        let source = OneClip(AnimationClip::new("spark", vec![10.0, 10.0], true));
        let mut looped = AnimationState::looping("spark", &source);
        for _ in 0..4 {
            looped.update(10.0);
        }
        assert!(!looped.finished);
        assert_eq!(looped.frame, 0);

        let mut shot = AnimationState::one_shot("spark", &source);
        for _ in 0..4 {
            shot.update(10.0);
        }
        assert!(shot.finished);
        assert_eq!(shot.frame, 1);
    }

    #[test]
    fn missing_clip_falls_back_to_placeholder() {
        let state = AnimationState::one_shot("nope", &NoAssets);
        assert!(state.clip().placeholder);
        assert!(state.clip().frame_count() > 0);
    }

    #[test]
    fn motion_switches_walk_and_idle_clips() {
        let mut state = AnimationState::directional("player", &NoAssets);
        assert_eq!(state.clip().name, "player_idle");

        state.apply_motion(Vec2::new(5.0, 0.0), &NoAssets);
        assert_eq!(state.clip().name, "player_walk_right");
        assert_eq!(state.facing(), Facing::Right);
        assert!(state.is_moving());

        // Facing persists while standing still.
        state.apply_motion(Vec2::ZERO, &NoAssets);
        assert_eq!(state.clip().name, "player_idle");
        assert_eq!(state.facing(), Facing::Right);
        assert!(!state.is_moving());
    }

    #[test]
    fn vertical_motion_picks_vertical_facing() {
        let mut state = AnimationState::directional("player", &NoAssets);
        state.apply_motion(Vec2::new(1.0, -3.0), &NoAssets);
        assert_eq!(state.facing(), Facing::Up);
    }
}
