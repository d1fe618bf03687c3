use crate::constants::{MAP_COLUMNS, MAP_HEIGHT, MAP_PITCH_SHIFT, MAP_ROWS, MAP_WIDTH, TILE_SIZE};
use crate::types::{TilePos, WorldPos, WorldPos2};
use glam::IVec2;

/// Convert a world position to its containing tile.
pub fn world_to_tile(pos: WorldPos2) -> TilePos {
    TilePos::new(pos.x.div_euclid(TILE_SIZE), pos.y.div_euclid(TILE_SIZE))
}

/// World position of a tile's north corner.
pub fn tile_to_world(tile: TilePos) -> WorldPos2 {
    IVec2::new(tile.x * TILE_SIZE, tile.y * TILE_SIZE)
}

/// Round a world position down to its tile corner.
pub fn align_to_tile(pos: WorldPos2) -> WorldPos2 {
    IVec2::new(pos.x & !(TILE_SIZE - 1), pos.y & !(TILE_SIZE - 1))
}

/// True if the tile lies on the map.
pub fn valid_tile(tile: TilePos) -> bool {
    tile.x >= 0 && tile.x < MAP_COLUMNS && tile.y >= 0 && tile.y < MAP_ROWS
}

/// True if the world position lies on the map.
pub fn valid_coords(pos: WorldPos2) -> bool {
    pos.x >= 0 && pos.x < MAP_WIDTH && pos.y >= 0 && pos.y < MAP_HEIGHT
}

/// Flat tile index `(y << 9) | x`. Caller guarantees the tile is valid.
pub fn tile_index(tile: TilePos) -> usize {
    debug_assert!(valid_tile(tile), "tile {tile:?} off map");
    ((tile.y << MAP_PITCH_SHIFT) | tile.x) as usize
}

/// Inverse of [`tile_index`].
pub fn tile_from_index(index: usize) -> TilePos {
    let index = index as i32;
    TilePos::new(index & ((1 << MAP_PITCH_SHIFT) - 1), index >> MAP_PITCH_SHIFT)
}

/// Isometric projection of a world position for one of the four view rotations.
pub fn game_to_screen(pos: WorldPos, rotation: u8) -> IVec2 {
    match rotation & 3 {
        0 => IVec2::new(pos.y - pos.x, ((pos.y + pos.x) >> 1) - pos.z),
        1 => IVec2::new(-pos.x - pos.y, ((pos.y - pos.x) >> 1) - pos.z),
        2 => IVec2::new(pos.x - pos.y, ((-pos.y - pos.x) >> 1) - pos.z),
        _ => IVec2::new(pos.y + pos.x, ((pos.x - pos.y) >> 1) - pos.z),
    }
}

/// Integer square root, rounded down.
pub fn isqrt(value: u64) -> u64 {
    if value < 2 {
        return value;
    }
    // Newton iteration from an upper bound converges monotonically.
    let mut x = value;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + value / x) / 2;
    }
    x
}

/// Horizontal distance between two positions, rounded down to a whole unit.
pub fn distance_2d(a: WorldPos, b: WorldPos) -> u16 {
    let dx = (a.x - b.x).unsigned_abs() as u64;
    let dy = (a.y - b.y).unsigned_abs() as u64;
    isqrt(dx * dx + dy * dy).min(u16::MAX as u64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAP_PITCH, MAP_TILE_COUNT, TILE_INDEX_LEN};
    use glam::IVec3;
    use std::collections::HashSet;

    #[test]
    fn test_world_to_tile() {
        assert_eq!(world_to_tile(IVec2::new(0, 0)), TilePos::new(0, 0));
        assert_eq!(world_to_tile(IVec2::new(31, 31)), TilePos::new(0, 0));
        assert_eq!(world_to_tile(IVec2::new(32, 64)), TilePos::new(1, 2));
        assert_eq!(world_to_tile(IVec2::new(12287, 12287)), TilePos::new(383, 383));
        assert_eq!(world_to_tile(IVec2::new(-1, 0)), TilePos::new(-1, 0));
    }

    #[test]
    fn test_tile_index_bijective() {
        let mut seen = HashSet::with_capacity(MAP_TILE_COUNT);
        for y in 0..MAP_ROWS {
            for x in 0..MAP_COLUMNS {
                let tile = TilePos::new(x, y);
                let index = tile_index(tile);
                assert!(index < TILE_INDEX_LEN);
                assert!(seen.insert(index), "duplicate index {index}");
                assert_eq!(tile_from_index(index), tile);
            }
        }
        assert_eq!(seen.len(), MAP_TILE_COUNT);
    }

    #[test]
    fn test_tile_index_layout() {
        assert_eq!(tile_index(TilePos::new(0, 1)), MAP_PITCH as usize);
        assert_eq!(tile_index(TilePos::new(383, 383)), (383 << 9) | 383);
    }

    #[test]
    fn test_valid_coords_bounds() {
        assert!(valid_coords(IVec2::new(0, 0)));
        assert!(valid_coords(IVec2::new(MAP_WIDTH - 1, MAP_HEIGHT - 1)));
        assert!(!valid_coords(IVec2::new(MAP_WIDTH, 0)));
        assert!(!valid_coords(IVec2::new(0, MAP_HEIGHT)));
        assert!(!valid_coords(IVec2::new(-1, 5)));
    }

    #[test]
    fn test_align_to_tile() {
        assert_eq!(align_to_tile(IVec2::new(33, 95)), IVec2::new(32, 64));
        assert_eq!(align_to_tile(IVec2::new(0, 31)), IVec2::new(0, 0));
    }

    #[test]
    fn test_game_to_screen_rotations() {
        let pos = IVec3::new(64, 32, 8);
        assert_eq!(game_to_screen(pos, 0), IVec2::new(-32, 48 - 8));
        assert_eq!(game_to_screen(pos, 1), IVec2::new(-96, -16 - 8));
        assert_eq!(game_to_screen(pos, 2), IVec2::new(32, -48 - 8));
        assert_eq!(game_to_screen(pos, 3), IVec2::new(96, 16 - 8));
        // Only the low two bits select the rotation.
        assert_eq!(game_to_screen(pos, 4), game_to_screen(pos, 0));
    }

    #[test]
    fn test_isqrt() {
        for v in 0u64..2000 {
            let r = isqrt(v);
            assert!(r * r <= v && (r + 1) * (r + 1) > v, "isqrt({v}) = {r}");
        }
        assert_eq!(isqrt(u32::MAX as u64), 65535);
    }

    #[test]
    fn test_distance_2d() {
        let a = IVec3::new(0, 0, 0);
        assert_eq!(distance_2d(a, IVec3::new(3, 4, 100)), 5);
        assert_eq!(distance_2d(a, IVec3::new(-3, -4, 0)), 5);
        assert_eq!(distance_2d(a, IVec3::new(1, 1, 0)), 1);
        assert_eq!(distance_2d(a, a), 0);
    }
}
