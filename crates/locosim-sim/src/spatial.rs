//! Per-tile chains of entities for "what is on this tile" queries.

use crate::entity::Entity;
use locosim_core::constants::{LOCATION_NULL, MAP_PITCH, SPATIAL_INDEX_LEN, SPATIAL_INDEX_NULL, TILE_SIZE};
use locosim_core::types::{EntityId, TilePos, WorldPos};

/// Bucket for a world position. Off-world and out-of-range positions share the null bucket.
pub fn spatial_offset(pos: WorldPos) -> usize {
    if pos.x == LOCATION_NULL {
        return SPATIAL_INDEX_NULL;
    }
    let tile_x = pos.x.abs() / TILE_SIZE;
    let tile_y = pos.y.abs() / TILE_SIZE;
    tile_offset(TilePos::new(tile_x, tile_y))
}

/// Bucket for a tile coordinate.
pub fn tile_offset(tile: TilePos) -> usize {
    if !(0..MAP_PITCH).contains(&tile.x) || !(0..MAP_PITCH).contains(&tile.y) {
        return SPATIAL_INDEX_NULL;
    }
    (MAP_PITCH * tile.x + tile.y) as usize
}

/// Chain heads; links live in [`Entity::next_quadrant`].
pub struct SpatialIndex {
    heads: Vec<EntityId>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            heads: vec![EntityId::NULL; SPATIAL_INDEX_LEN],
        }
    }

    pub fn clear(&mut self) {
        self.heads.fill(EntityId::NULL);
    }

    pub fn first(&self, offset: usize) -> EntityId {
        self.heads.get(offset).copied().unwrap_or(EntityId::NULL)
    }

    pub(crate) fn insert(&mut self, entities: &mut [Entity], id: EntityId, offset: usize) {
        entities[id.index()].next_quadrant = self.heads[offset];
        self.heads[offset] = id;
    }

    /// Unlink `id` from the chain at `offset`. False if it was not found there.
    pub(crate) fn remove(&mut self, entities: &mut [Entity], id: EntityId, offset: usize) -> bool {
        let mut prev = EntityId::NULL;
        let mut cur = self.heads[offset];
        // The chain cannot be longer than the pool; a longer walk means a cycle.
        for _ in 0..entities.len() {
            if cur.is_null() {
                return false;
            }
            let next = entities[cur.index()].next_quadrant;
            if cur == id {
                if prev.is_null() {
                    self.heads[offset] = next;
                } else {
                    entities[prev.index()].next_quadrant = next;
                }
                entities[cur.index()].next_quadrant = EntityId::NULL;
                return true;
            }
            prev = cur;
            cur = next;
        }
        false
    }

    /// Rebuild every chain from the live entities' positions.
    pub(crate) fn rebuild(&mut self, entities: &mut [Entity]) {
        self.clear();
        for i in 0..entities.len() {
            if !entities[i].is_live() {
                entities[i].next_quadrant = EntityId::NULL;
                continue;
            }
            let offset = spatial_offset(entities[i].position());
            let id = entities[i].id();
            self.insert(entities, id, offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn test_offsets() {
        assert_eq!(spatial_offset(IVec3::new(LOCATION_NULL, 5, 0)), SPATIAL_INDEX_NULL);
        assert_eq!(spatial_offset(IVec3::new(0, 0, 0)), 0);
        assert_eq!(spatial_offset(IVec3::new(32, 0, 0)), MAP_PITCH as usize);
        assert_eq!(spatial_offset(IVec3::new(0, 32, 0)), 1);
        assert_eq!(spatial_offset(IVec3::new(64, 96, 200)), 2 * 512 + 3);
        assert_eq!(spatial_offset(IVec3::new(512 * 32, 0, 0)), SPATIAL_INDEX_NULL);
    }

    #[test]
    fn test_null_bucket_is_last() {
        assert_eq!(SPATIAL_INDEX_NULL, 0x40000);
        assert_eq!(SPATIAL_INDEX_LEN, 0x40001);
    }

    #[test]
    fn test_tile_offset_bounds() {
        assert_eq!(tile_offset(TilePos::new(-1, 0)), SPATIAL_INDEX_NULL);
        assert_eq!(tile_offset(TilePos::new(511, 511)), 511 * 512 + 511);
    }
}
