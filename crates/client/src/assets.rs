//! Clip library backing the core's animation lookups.
//!
//! The embedder loads sprite-sheet metadata however it likes (Aseprite
//! JSON, hand-written tables) and registers the frame timings here. Names
//! that were never registered fall back to placeholders inside the core.

use std::collections::HashMap;

use quadfire_core::{AnimationClip, AnimationSource};

/// In-memory name -> clip map.
#[derive(Debug, Default)]
pub struct ClipLibrary {
    clips: HashMap<String, AnimationClip>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, clip: AnimationClip) {
        self.clips.insert(clip.name.clone(), clip);
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl AnimationSource for ClipLibrary {
    fn clip(&self, name: &str) -> Option<AnimationClip> {
        self.clips.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_hits_and_misses() {
        let mut library = ClipLibrary::new();
        library.insert(AnimationClip::new("impact", vec![80.0, 80.0, 80.0], false));

        assert!(library.clip("impact").is_some());
        assert!(library.clip("missing").is_none());
        assert_eq!(library.len(), 1);
    }
}
