use crate::tile::{ElementType, SurfaceElement, TileElement};
use locosim_core::constants::{
    DEFAULT_SURFACE_BASE_Z, FREE_ELEMENT_BASE_Z, MAP_COLUMNS, MAP_ROWS, MAP_TILE_COUNT,
    MAX_ELEMENTS, TILE_INDEX_LEN,
};
use locosim_core::error::LocoError;
use locosim_core::math::{tile_index, valid_tile, world_to_tile};
use locosim_core::types::{TilePos, WorldPos2};

/// Stable address of an element: its tile and position within the stack.
///
/// Positions shift when elements below them are removed or inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub tile: TilePos,
    pub index: u8,
}

/// Read handle for one tile's stack.
#[derive(Debug, Clone, Copy)]
pub struct Tile<'a> {
    pos: TilePos,
    /// Buffer from the stack head onwards; the stack ends at the first `last` element.
    head: &'a [TileElement],
}

impl<'a> Tile<'a> {
    pub fn pos(&self) -> TilePos {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_empty()
    }

    /// Iterate the stack from the head up to and including the last element.
    pub fn iter(&self) -> TileIter<'a> {
        TileIter {
            rest: self.head,
            index: 0,
        }
    }

    /// Number of elements in the stack.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn element(&self, index: u8) -> Option<&'a TileElement> {
        self.iter().nth(index as usize).map(|(_, el)| el)
    }

    /// First surface element of the stack.
    pub fn surface(&self) -> Option<&'a SurfaceElement> {
        self.surface_element().and_then(|el| el.as_variant())
    }

    /// The surface as a full element (for its base height).
    pub fn surface_element(&self) -> Option<&'a TileElement> {
        self.iter()
            .map(|(_, el)| el)
            .find(|el| el.element_type() == ElementType::Surface)
    }

    pub fn element_ref(&self, index: u8) -> ElementRef {
        ElementRef {
            tile: self.pos,
            index,
        }
    }
}

impl<'a> IntoIterator for Tile<'a> {
    type Item = (u8, &'a TileElement);
    type IntoIter = TileIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Yields `(stack index, element)` pairs and stops after the last element.
pub struct TileIter<'a> {
    rest: &'a [TileElement],
    index: u8,
}

impl<'a> Iterator for TileIter<'a> {
    type Item = (u8, &'a TileElement);

    fn next(&mut self) -> Option<Self::Item> {
        let (first, rest) = self.rest.split_first()?;
        self.rest = if first.is_last() { &[] } else { rest };
        let index = self.index;
        self.index = self.index.wrapping_add(1);
        Some((index, first))
    }
}

/// Flat element storage addressed through a fixed tile index.
///
/// Each index slot is either empty or the buffer offset of a stack head.
/// Stacks are contiguous; growing a stack moves it to the buffer tail and the
/// vacated slots are reclaimed by [`TileGrid::reorganise`].
pub struct TileGrid {
    elements: Vec<TileElement>,
    heads: Vec<Option<u32>>,
    capacity: usize,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl TileGrid {
    /// A flat map with the default element capacity.
    pub fn new() -> Self {
        Self::with_capacity(MAX_ELEMENTS, 0)
    }

    /// A flat map of `land_type` surfaces able to hold `capacity` elements.
    pub fn with_capacity(capacity: usize, land_type: u8) -> Self {
        let mut grid = Self {
            elements: Vec::with_capacity(capacity.max(MAP_TILE_COUNT)),
            heads: vec![None; TILE_INDEX_LEN],
            capacity: capacity.max(MAP_TILE_COUNT),
        };
        grid.initialise(land_type);
        grid
    }

    /// Reset every tile to a single flat surface.
    pub fn initialise(&mut self, land_type: u8) {
        self.elements.clear();
        self.heads.fill(None);
        for y in 0..MAP_ROWS {
            for x in 0..MAP_COLUMNS {
                let tile = TilePos::new(x, y);
                let offset = self.elements.len() as u32;
                let mut surface = TileElement::surface(DEFAULT_SURFACE_BASE_Z, land_type);
                surface.set_last(true);
                self.elements.push(surface);
                self.heads[tile_index(tile)] = Some(offset);
            }
        }
    }

    /// Tile containing a world position, or None off the map.
    pub fn get(&self, pos: WorldPos2) -> Option<Tile<'_>> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        self.get_tile(world_to_tile(pos))
    }

    /// Tile at a tile coordinate, or None off the map.
    pub fn get_tile(&self, tile: TilePos) -> Option<Tile<'_>> {
        if !valid_tile(tile) {
            return None;
        }
        let head = match self.heads[tile_index(tile)] {
            Some(offset) => &self.elements[offset as usize..],
            None => &[],
        };
        Some(Tile { pos: tile, head })
    }

    pub fn element(&self, r: ElementRef) -> Option<&TileElement> {
        self.get_tile(r.tile)?.element(r.index)
    }

    /// Mutable access to one element. `last` stays under grid control.
    pub(crate) fn element_mut(&mut self, r: ElementRef) -> Result<&mut TileElement, LocoError> {
        let (head, len) = self.locate(r.tile)?;
        if r.index as usize >= len {
            return Err(not_found(r));
        }
        Ok(&mut self.elements[head + r.index as usize])
    }

    /// Elements stored in the buffer, including vacated slots not yet reclaimed.
    pub fn used_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn num_free_elements(&self) -> usize {
        self.capacity - self.elements.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn stack_len(&self, head: usize) -> usize {
        self.elements[head..]
            .iter()
            .position(|el| el.is_last())
            .map_or(self.elements.len() - head, |p| p + 1)
    }

    /// Buffer offset and length of a tile's stack (length 0 when empty).
    fn locate(&self, tile: TilePos) -> Result<(usize, usize), LocoError> {
        if !valid_tile(tile) {
            return Err(LocoError::TileOutOfBounds {
                x: tile.x,
                y: tile.y,
            });
        }
        Ok(match self.heads[tile_index(tile)] {
            Some(offset) => (offset as usize, self.stack_len(offset as usize)),
            None => (0, 0),
        })
    }

    /// Insert an element into a tile's stack, ordered by `base_z`.
    ///
    /// The stack is rewritten at the buffer tail. Runs a reorganisation when
    /// the tail reaches capacity.
    pub(crate) fn insert(
        &mut self,
        tile: TilePos,
        mut element: TileElement,
    ) -> Result<ElementRef, LocoError> {
        let (_, len) = self.locate(tile)?;
        if len >= u8::MAX as usize {
            return Err(LocoError::StackFull {
                x: tile.x,
                y: tile.y,
            });
        }
        if self.elements.len() + len + 1 > self.capacity {
            self.reorganise();
            if self.elements.len() + len + 1 > self.capacity {
                log::warn!("Tile element storage full ({} elements)", self.capacity);
                return Err(LocoError::ElementStorageExhausted {
                    capacity: self.capacity,
                });
            }
        }
        // Heads may have moved during reorganisation.
        let (head, len) = self.locate(tile)?;

        element.base_z = element.base_z.min(FREE_ELEMENT_BASE_Z - 1);
        let position = self.elements[head..head + len]
            .iter()
            .position(|el| el.base_z > element.base_z)
            .unwrap_or(len);

        let new_head = self.elements.len();
        self.elements.extend_from_within(head..head + position);
        self.elements.push(element);
        self.elements.extend_from_within(head + position..head + len);
        for el in &mut self.elements[new_head..] {
            el.set_last(false);
        }
        if let Some(tail) = self.elements.last_mut() {
            tail.set_last(true);
        }
        for el in &mut self.elements[head..head + len] {
            el.mark_free();
        }
        self.heads[tile_index(tile)] = Some(new_head as u32);

        Ok(ElementRef {
            tile,
            index: position as u8,
        })
    }

    /// Unlink an element from its stack and return it.
    pub(crate) fn remove(&mut self, r: ElementRef) -> Result<TileElement, LocoError> {
        let (head, len) = self.locate(r.tile)?;
        let index = r.index as usize;
        if index >= len {
            return Err(not_found(r));
        }
        let pos = head + index;
        let mut removed = self.elements[pos];
        removed.set_last(false);

        if len == 1 {
            self.heads[tile_index(r.tile)] = None;
            self.elements[pos].mark_free();
        } else if index == len - 1 {
            self.elements[pos - 1].set_last(true);
            self.elements[pos].mark_free();
        } else {
            // Shift the rest of the stack down; the old tail carries `last` with it.
            self.elements.copy_within(pos + 1..head + len, pos);
            self.elements[head + len - 1].mark_free();
        }
        self.trim_tail();
        Ok(removed)
    }

    fn trim_tail(&mut self) {
        while self.elements.last().is_some_and(|el| el.is_free()) {
            self.elements.pop();
        }
    }

    /// Compact all stacks to the front of the buffer in tile-index order.
    pub fn reorganise(&mut self) {
        let before = self.elements.len();
        let mut compacted = Vec::with_capacity(self.capacity);
        for slot in 0..TILE_INDEX_LEN {
            if let Some(offset) = self.heads[slot] {
                let offset = offset as usize;
                let len = self.stack_len(offset);
                self.heads[slot] = Some(compacted.len() as u32);
                compacted.extend_from_slice(&self.elements[offset..offset + len]);
            }
        }
        self.elements = compacted;
        log::debug!(
            "Reorganised tile elements: {} -> {} slots",
            before,
            self.elements.len()
        );
    }

    /// Check the stack invariant for every tile. Used by tests and debug tooling.
    pub fn validate(&self) -> Result<(), String> {
        for slot in 0..TILE_INDEX_LEN {
            let Some(offset) = self.heads[slot] else {
                continue;
            };
            let offset = offset as usize;
            if offset >= self.elements.len() {
                return Err(format!("slot {slot:#x} points past the buffer"));
            }
            let stack = &self.elements[offset..];
            let Some(end) = stack.iter().position(|el| el.is_last()) else {
                return Err(format!("slot {slot:#x} stack has no last element"));
            };
            if let Some(free) = stack[..=end].iter().position(|el| el.is_free()) {
                return Err(format!("slot {slot:#x} stack holds a vacated slot at {free}"));
            }
        }
        Ok(())
    }
}

fn not_found(r: ElementRef) -> LocoError {
    LocoError::ElementNotFound {
        x: r.tile.x,
        y: r.tile.y,
        index: r.index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{ElementKind, StationElement, TrackElement, TreeElement};
    use glam::IVec2;

    fn tree(base_z: u8) -> TileElement {
        TileElement::new(ElementKind::Tree(TreeElement::default()), base_z, base_z + 4)
    }

    fn track(base_z: u8) -> TileElement {
        TileElement::new(ElementKind::Track(TrackElement::default()), base_z, base_z + 2)
    }

    fn small_grid() -> TileGrid {
        TileGrid::with_capacity(MAP_TILE_COUNT + 64, 0)
    }

    #[test]
    fn test_initialise_flat() {
        let grid = small_grid();
        for &(x, y) in &[(0, 0), (383, 0), (0, 383), (200, 17)] {
            let tile = grid.get_tile(TilePos::new(x, y)).expect("on map");
            assert_eq!(tile.len(), 1);
            let surface = tile.surface_element().expect("surface");
            assert_eq!(surface.base_z, DEFAULT_SURFACE_BASE_Z);
            assert!(surface.is_last());
        }
        assert_eq!(grid.used_elements(), MAP_TILE_COUNT);
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn test_get_out_of_range() {
        let grid = small_grid();
        assert!(grid.get(IVec2::new(-1, 0)).is_none());
        assert!(grid.get(IVec2::new(0, -32)).is_none());
        assert!(grid.get(IVec2::new(12288, 0)).is_none());
        assert!(grid.get_tile(TilePos::new(384, 0)).is_none());
        assert!(grid.get(IVec2::new(12287, 12287)).is_some());
    }

    #[test]
    fn test_get_is_stable() {
        let grid = small_grid();
        let a: Vec<_> = grid.get(IVec2::new(100, 100)).into_iter().flat_map(|t| t.iter()).collect();
        let b: Vec<_> = grid.get(IVec2::new(100, 100)).into_iter().flat_map(|t| t.iter()).collect();
        assert_eq!(a.len(), b.len());
        for ((_, x), (_, y)) in a.iter().zip(b.iter()) {
            assert!(std::ptr::eq(*x, *y));
        }
    }

    #[test]
    fn test_insert_orders_by_base_z() {
        let mut grid = small_grid();
        let tile = TilePos::new(10, 10);
        let high = grid.insert(tile, tree(40)).expect("insert");
        assert_eq!(high.index, 1);
        let low = grid.insert(tile, track(8)).expect("insert");
        assert_eq!(low.index, 1);

        let heights: Vec<u8> = grid
            .get_tile(tile)
            .expect("tile")
            .iter()
            .map(|(_, el)| el.base_z)
            .collect();
        assert_eq!(heights, vec![4, 8, 40]);
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn test_exactly_one_last() {
        let mut grid = small_grid();
        let tile = TilePos::new(3, 4);
        for z in [20, 10, 30] {
            grid.insert(tile, tree(z)).expect("insert");
        }
        let t = grid.get_tile(tile).expect("tile");
        let lasts = t.iter().filter(|(_, el)| el.is_last()).count();
        assert_eq!(lasts, 1);
        assert!(t.iter().last().is_some_and(|(_, el)| el.is_last()));
    }

    #[test]
    fn test_remove_middle_shifts() {
        let mut grid = small_grid();
        let tile = TilePos::new(5, 5);
        grid.insert(tile, track(8)).expect("insert");
        grid.insert(tile, tree(20)).expect("insert");
        let removed = grid
            .remove(ElementRef { tile, index: 1 })
            .expect("remove");
        assert_eq!(removed.element_type(), ElementType::Track);
        assert!(!removed.is_last());
        let types: Vec<_> = grid
            .get_tile(tile)
            .expect("tile")
            .iter()
            .map(|(_, el)| el.element_type())
            .collect();
        assert_eq!(types, vec![ElementType::Surface, ElementType::Tree]);
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn test_remove_last_moves_flag() {
        let mut grid = small_grid();
        let tile = TilePos::new(6, 6);
        grid.insert(tile, tree(20)).expect("insert");
        grid.remove(ElementRef { tile, index: 1 }).expect("remove");
        let t = grid.get_tile(tile).expect("tile");
        assert_eq!(t.len(), 1);
        assert!(t.element(0).is_some_and(|el| el.is_last()));
    }

    #[test]
    fn test_remove_only_element_empties_tile() {
        let mut grid = small_grid();
        let tile = TilePos::new(7, 7);
        grid.remove(ElementRef { tile, index: 0 }).expect("remove");
        let t = grid.get_tile(tile).expect("tile");
        assert!(t.is_empty());
        assert_eq!(t.iter().count(), 0);
        assert!(t.surface().is_none());
        // An empty tile can be rebuilt.
        grid.insert(tile, TileElement::surface(4, 0)).expect("insert");
        assert_eq!(grid.get_tile(tile).expect("tile").len(), 1);
    }

    #[test]
    fn test_remove_stale_ref() {
        let mut grid = small_grid();
        let err = grid.remove(ElementRef {
            tile: TilePos::new(1, 1),
            index: 3,
        });
        assert!(matches!(err, Err(LocoError::ElementNotFound { index: 3, .. })));
        let err = grid.remove(ElementRef {
            tile: TilePos::new(400, 1),
            index: 0,
        });
        assert!(matches!(err, Err(LocoError::TileOutOfBounds { .. })));
    }

    #[test]
    fn test_reorganise_reclaims_space() {
        let mut grid = small_grid();
        let tile = TilePos::new(2, 2);
        // Every cycle strands one vacated slot, so this overruns the spare
        // capacity several times and must reorganise instead of failing.
        for i in 0..200u8 {
            grid.insert(tile, tree(10 + i / 2)).expect("insert");
            grid.remove(ElementRef { tile, index: 1 }).expect("remove");
        }
        assert!(grid.used_elements() <= grid.capacity());
        grid.reorganise();
        assert_eq!(grid.used_elements(), MAP_TILE_COUNT);
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn test_storage_exhausted() {
        let mut grid = TileGrid::with_capacity(MAP_TILE_COUNT + 2, 0);
        let tile = TilePos::new(0, 0);
        grid.insert(tile, tree(10)).expect("insert");
        let err = grid.insert(tile, tree(11));
        assert!(matches!(err, Err(LocoError::ElementStorageExhausted { .. })));
        // The failed insert left the stack intact.
        assert_eq!(grid.get_tile(tile).expect("tile").len(), 2);
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn test_station_follows_track() {
        let mut grid = small_grid();
        let tile = TilePos::new(9, 9);
        let mut piece = track(8);
        if let Some(t) = piece.as_variant_mut::<TrackElement>() {
            t.has_station = true;
        }
        grid.insert(tile, piece).expect("insert");
        grid.insert(
            tile,
            TileElement::new(ElementKind::Station(StationElement::default()), 8, 12),
        )
        .expect("insert");
        let t = grid.get_tile(tile).expect("tile");
        assert_eq!(t.element(1).map(|e| e.element_type()), Some(ElementType::Track));
        assert_eq!(t.element(2).map(|e| e.element_type()), Some(ElementType::Station));
    }
}
