//! Static wall geometry derived from the tile grid.
//!
//! The world border is a band of wall tiles; collision uses precomputed
//! rects, one per tile, so the lookup is a linear scan over a small list.
//! Interior obstacles, if a map ever adds them, join the same list.

use crate::config::WorldConfig;
use crate::math::Rect;

/// Precomputed wall rectangles for the whole map.
#[derive(Debug, Clone)]
pub struct WallMap {
    walls: Vec<Rect>,
}

impl WallMap {
    /// Builds the border walls: thin bands along the top and bottom tile
    /// rows, full tiles along the left and right columns.
    pub fn generate(world: &WorldConfig) -> Self {
        let rows = (world.height / world.tile_height) as usize + 1;
        let cols = (world.width / world.tile_width) as usize + 1;
        let bottom_y = (rows - 1) as f32 * world.tile_height;
        let right_x = (cols - 1) as f32 * world.tile_width;

        let mut walls = Vec::with_capacity(2 * (rows + cols));
        for col in 0..cols {
            let x = col as f32 * world.tile_width;
            walls.push(Rect::new(x, 0.0, world.tile_width, world.wall_height));
            walls.push(Rect::new(x, bottom_y, world.tile_width, world.wall_height));
        }
        for row in 0..rows {
            let y = row as f32 * world.tile_height;
            walls.push(Rect::new(0.0, y, world.tile_width, world.tile_height));
            walls.push(Rect::new(right_x, y, world.tile_width, world.tile_height));
        }

        Self { walls }
    }

    /// Hand-built geometry, used by tests and custom maps.
    pub fn from_rects(walls: Vec<Rect>) -> Self {
        Self { walls }
    }

    /// True when the rect overlaps any wall.
    pub fn hits(&self, rect: &Rect) -> bool {
        self.walls.iter().any(|wall| wall.overlaps(rect))
    }

    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_blocks_edges_not_center() {
        let world = WorldConfig::default();
        let map = WallMap::generate(&world);

        // Center of the map is open.
        assert!(!map.hits(&Rect::new(1200.0, 900.0, 20.0, 20.0)));

        // Each border band blocks.
        // The bottom band sits on the last tile row, not at the exact world edge.
        let bottom_y = (world.height / world.tile_height) as usize as f32 * world.tile_height;
        assert!(map.hits(&Rect::new(1200.0, 4.0, 20.0, 20.0))); // top
        assert!(map.hits(&Rect::new(1200.0, bottom_y + 4.0, 20.0, 20.0))); // bottom
        assert!(map.hits(&Rect::new(4.0, 900.0, 20.0, 20.0))); // left
        assert!(map.hits(&Rect::new(world.width - 4.0, 900.0, 20.0, 20.0))); // right
    }

    #[test]
    fn top_band_is_thin() {
        let world = WorldConfig::default();
        let map = WallMap::generate(&world);

        // Just below the wall band but above the first full tile row.
        let below_band = Rect::new(
            world.tile_width * 2.0,
            world.wall_height + 1.0,
            10.0,
            10.0,
        );
        assert!(!map.hits(&below_band));
    }

    #[test]
    fn custom_geometry() {
        let map = WallMap::from_rects(vec![Rect::new(50.0, 50.0, 10.0, 10.0)]);
        assert!(map.hits(&Rect::new(55.0, 55.0, 10.0, 10.0)));
        assert!(!map.hits(&Rect::new(0.0, 0.0, 10.0, 10.0)));
    }
}
