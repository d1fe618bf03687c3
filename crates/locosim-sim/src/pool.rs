use crate::entity::{Entity, EntityBaseType, EntityKind, EntityList, EntityVariant, LIST_COUNT};
use crate::spatial::{spatial_offset, tile_offset, SpatialIndex};
use glam::IVec2;
use locosim_core::constants::{
    LOCATION_NULL, MAX_ENTITIES, MAX_MISC_ENTITIES, MAX_NORMAL_ENTITIES,
};
use locosim_core::math::{game_to_screen, valid_coords};
use locosim_core::types::{EntityId, ScreenRect, TilePos, WorldPos};

/// Fixed-capacity entity storage with intrusive free and kind lists.
///
/// Slots never move; an [`EntityId`] stays valid until the slot is released.
/// Creation fails with None when the relevant free list is empty.
pub struct EntityPool {
    entities: Vec<Entity>,
    heads: [EntityId; LIST_COUNT],
    counts: [u16; LIST_COUNT],
    spatial: SpatialIndex,
}

impl Default for EntityPool {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityPool {
    pub fn new() -> Self {
        let mut pool = Self {
            entities: Vec::with_capacity(MAX_ENTITIES),
            heads: [EntityId::NULL; LIST_COUNT],
            counts: [0; LIST_COUNT],
            spatial: SpatialIndex::new(),
        };
        pool.reset();
        pool
    }

    /// Free every slot and rebuild the free lists in id order.
    pub fn reset(&mut self) {
        self.entities.clear();
        self.heads = [EntityId::NULL; LIST_COUNT];
        self.counts = [0; LIST_COUNT];
        for i in 0..MAX_ENTITIES {
            let list = if i < MAX_NORMAL_ENTITIES {
                EntityList::Null
            } else {
                EntityList::NullMoney
            };
            self.entities.push(Entity::vacant(EntityId(i as u16), list));
        }
        // Push in reverse so each free list hands out its lowest id first.
        for i in (0..MAX_ENTITIES).rev() {
            let list = self.entities[i].list;
            self.push_front(EntityId(i as u16), list);
        }
        self.spatial.clear();
    }

    pub fn capacity(&self) -> usize {
        self.entities.len()
    }

    pub fn list_count(&self, list: EntityList) -> usize {
        self.counts[list as usize] as usize
    }

    pub fn list_head(&self, list: EntityList) -> EntityId {
        self.heads[list as usize]
    }

    /// Live entity in `id`'s slot.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index()).filter(|e| e.is_live())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index()).filter(|e| e.is_live())
    }

    /// Typed payload of a live entity, or None for dead slots and other kinds.
    pub fn get_as<T: EntityVariant>(&self, id: EntityId) -> Option<&T> {
        self.get(id)?.as_variant()
    }

    pub fn get_as_mut<T: EntityVariant>(&mut self, id: EntityId) -> Option<&mut T> {
        self.get_mut(id)?.as_variant_mut()
    }

    fn unlink(&mut self, id: EntityId) {
        let (list, prev, next) = {
            let e = &self.entities[id.index()];
            (e.list, e.prev_in_list, e.next_in_list)
        };
        if prev.is_null() {
            self.heads[list as usize] = next;
        } else {
            self.entities[prev.index()].next_in_list = next;
        }
        if !next.is_null() {
            self.entities[next.index()].prev_in_list = prev;
        }
        self.counts[list as usize] -= 1;
    }

    fn push_front(&mut self, id: EntityId, list: EntityList) {
        let head = self.heads[list as usize];
        {
            let e = &mut self.entities[id.index()];
            e.list = list;
            e.prev_in_list = EntityId::NULL;
            e.next_in_list = head;
        }
        if !head.is_null() {
            self.entities[head.index()].prev_in_list = id;
        }
        self.heads[list as usize] = id;
        self.counts[list as usize] += 1;
    }

    /// Move a slot from its current list to the front of `list`.
    pub(crate) fn move_entity_to_list(&mut self, id: EntityId, list: EntityList) {
        self.unlink(id);
        self.push_front(id, list);
    }

    fn allocate(&mut self, from: EntityList, to: EntityList, kind: EntityKind) -> Option<EntityId> {
        let id = self.heads[from as usize];
        if id.is_null() {
            log::debug!("Entity list {from:?} exhausted");
            return None;
        }
        self.move_entity_to_list(id, to);
        self.entities[id.index()].clear(kind);
        let offset = spatial_offset(self.entities[id.index()].position());
        self.spatial.insert(&mut self.entities, id, offset);
        Some(id)
    }

    /// Allocate an effect entity. Fails when the misc limit is reached or no slot is free.
    pub fn create_misc(&mut self, kind: EntityKind) -> Option<EntityId> {
        debug_assert_eq!(kind.base_type(), EntityBaseType::Misc);
        if self.list_count(EntityList::Misc) >= MAX_MISC_ENTITIES {
            return None;
        }
        self.allocate(EntityList::Null, EntityList::Misc, kind)
    }

    /// Allocate from the slots reserved for money effects.
    pub fn create_money(&mut self, kind: EntityKind) -> Option<EntityId> {
        debug_assert_eq!(kind.base_type(), EntityBaseType::Misc);
        self.allocate(EntityList::NullMoney, EntityList::Misc, kind)
    }

    pub fn create_vehicle(&mut self, kind: EntityKind) -> Option<EntityId> {
        debug_assert_eq!(kind.base_type(), EntityBaseType::Vehicle);
        self.allocate(EntityList::Null, EntityList::Vehicle, kind)
    }

    /// Return a slot to its free list. False if the slot was not live.
    pub fn release(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.get(id) else {
            return false;
        };
        let offset = spatial_offset(entity.position());
        let spatial_ok = self.spatial.remove(&mut self.entities, id, offset);

        let free_list = if id.index() < MAX_NORMAL_ENTITIES {
            EntityList::Null
        } else {
            EntityList::NullMoney
        };
        self.entities[id.index()].clear(EntityKind::Free);
        self.move_entity_to_list(id, free_list);

        if !spatial_ok {
            log::warn!("Entity {} missing from spatial index; rebuilding", id.0);
            self.reset_spatial_index();
        }
        true
    }

    /// Place an entity at `pos` (or off-world with x = LOCATION_NULL) and
    /// recompute its sprite bounds for `rotation`.
    pub fn move_to(&mut self, id: EntityId, pos: WorldPos, rotation: u8) -> bool {
        debug_assert!(
            pos.x == LOCATION_NULL || valid_coords(pos.truncate()),
            "entity {} moved off the map to {pos}",
            id.0
        );
        let Some(entity) = self.get(id) else {
            return false;
        };
        let old_offset = spatial_offset(entity.position());
        let new_offset = spatial_offset(pos);
        let bounds = sprite_bounds(entity, pos, rotation);

        let e = &mut self.entities[id.index()];
        e.set_position(pos);
        e.set_sprite_bounds(bounds);

        if old_offset != new_offset {
            if self.spatial.remove(&mut self.entities, id, old_offset) {
                self.spatial.insert(&mut self.entities, id, new_offset);
            } else {
                log::warn!("Entity {} missing from spatial index; rebuilding", id.0);
                self.reset_spatial_index();
            }
        }
        true
    }

    /// Recompute sprite bounds in place, e.g. after the view rotates.
    pub fn refresh_sprite_bounds(&mut self, id: EntityId, rotation: u8) {
        if let Some(e) = self.get_mut(id) {
            let bounds = sprite_bounds(e, e.position(), rotation);
            e.set_sprite_bounds(bounds);
        }
    }

    pub fn reset_spatial_index(&mut self) {
        self.spatial.rebuild(&mut self.entities);
    }

    /// Entities whose position lies on `tile`.
    pub fn entities_on_tile(&self, tile: TilePos) -> QuadrantIter<'_> {
        QuadrantIter {
            pool: self,
            next: self.spatial.first(tile_offset(tile)),
            remaining: self.entities.len(),
        }
    }

    /// Entities without a world position.
    pub fn off_world_entities(&self) -> QuadrantIter<'_> {
        QuadrantIter {
            pool: self,
            next: self
                .spatial
                .first(spatial_offset(WorldPos::new(LOCATION_NULL, 0, 0))),
            remaining: self.entities.len(),
        }
    }

    /// Entities in list order (most recently added first).
    pub fn iter_list(&self, list: EntityList) -> ListIter<'_> {
        ListIter {
            pool: self,
            next: self.heads[list as usize],
            remaining: self.entities.len(),
        }
    }

    /// Ids of live entities of a base type in slot order.
    pub fn live_ids(&self, base_type: EntityBaseType) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.base_type() == base_type)
            .map(|e| e.id())
            .collect()
    }

    /// True if more than `needed` general slots are free.
    pub fn check_num_free(&self, needed: usize) -> bool {
        self.list_count(EntityList::Null) > needed
    }

    /// Scrub leftover state from free slots so snapshots are deterministic.
    pub fn zero_unused(&mut self) {
        for e in self.entities.iter_mut().filter(|e| !e.is_live()) {
            e.clear(EntityKind::Free);
        }
    }

    /// Walk every list and compare with the stored counts.
    pub fn validate_lists(&self) -> Result<(), String> {
        let lists = [
            EntityList::Null,
            EntityList::NullMoney,
            EntityList::Vehicle,
            EntityList::Misc,
        ];
        let mut total = 0;
        for list in lists {
            let mut walked = 0;
            for e in self.iter_list(list) {
                if e.list() != list {
                    return Err(format!("entity {} in {list:?} tagged {:?}", e.id().0, e.list()));
                }
                let free = matches!(list, EntityList::Null | EntityList::NullMoney);
                if free == e.is_live() {
                    return Err(format!("entity {} liveness disagrees with {list:?}", e.id().0));
                }
                walked += 1;
            }
            if walked != self.list_count(list) {
                return Err(format!(
                    "{list:?} holds {walked} entities, count says {}",
                    self.list_count(list)
                ));
            }
            total += walked;
        }
        if total != self.entities.len() {
            return Err(format!("lists cover {total} of {} slots", self.entities.len()));
        }
        Ok(())
    }
}

fn sprite_bounds(entity: &Entity, pos: WorldPos, rotation: u8) -> Option<ScreenRect> {
    if pos.x == LOCATION_NULL {
        return None;
    }
    let anchor: IVec2 = game_to_screen(pos, rotation);
    let s = entity.sprite;
    Some(ScreenRect::new(
        anchor.x - s.width as i32,
        anchor.y - s.height_negative as i32,
        anchor.x + s.width as i32,
        anchor.y + s.height_positive as i32,
    ))
}

/// Follows a spatial chain.
pub struct QuadrantIter<'a> {
    pool: &'a EntityPool,
    next: EntityId,
    remaining: usize,
}

impl<'a> Iterator for QuadrantIter<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_null() || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let e = &self.pool.entities[self.next.index()];
        self.next = e.next_quadrant;
        Some(e)
    }
}

/// Follows an entity list.
pub struct ListIter<'a> {
    pool: &'a EntityPool,
    next: EntityId,
    remaining: usize,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_null() || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let e = &self.pool.entities[self.next.index()];
        self.next = e.next_in_list;
        Some(e)
    }
}
