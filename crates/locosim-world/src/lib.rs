pub mod invalidation;
pub mod terrain;
pub mod tile;
pub mod tile_grid;

use invalidation::{InvalidationBridge, InvalidationSink, ViewSettings};
use locosim_core::config::SimConfig;
use locosim_core::error::LocoError;
use locosim_core::math::tile_to_world;
use locosim_core::types::{TilePos, WorldPos2};
use terrain::TileHeight;
use tile::TileElement;
use tile_grid::{ElementRef, Tile, TileGrid};

/// Primary public struct for the locosim-world crate.
/// Owns the tile grid and the invalidation bridge; every structural change to
/// the map goes through here so the renderer and map-changed flag stay in step.
pub struct World {
    tiles: TileGrid,
    invalidation: InvalidationBridge,
    map_changed: bool,
}

impl Default for World {
    fn default() -> Self {
        Self::new(&SimConfig::default(), Box::new(invalidation::NullSink))
    }
}

impl World {
    /// Create a flat map sized and projected according to `config`.
    pub fn new(config: &SimConfig, sink: Box<dyn InvalidationSink>) -> Self {
        let tiles = TileGrid::with_capacity(config.max_elements, config.default_land_type);
        log::info!(
            "World created: {} tile element slots, {} free",
            tiles.capacity(),
            tiles.num_free_elements()
        );
        Self {
            tiles,
            invalidation: InvalidationBridge::new(sink, ViewSettings::from(config)),
            map_changed: false,
        }
    }

    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    pub fn invalidation(&mut self) -> &mut InvalidationBridge {
        &mut self.invalidation
    }

    pub fn rotation(&self) -> u8 {
        self.invalidation.rotation()
    }

    /// Tile at a world position, or None off the map.
    pub fn get(&self, pos: WorldPos2) -> Option<Tile<'_>> {
        self.tiles.get(pos)
    }

    pub fn get_tile(&self, tile: TilePos) -> Option<Tile<'_>> {
        self.tiles.get_tile(tile)
    }

    pub fn get_height(&self, pos: WorldPos2) -> TileHeight {
        terrain::get_height(&self.tiles, pos)
    }

    pub fn element(&self, r: ElementRef) -> Option<&TileElement> {
        self.tiles.element(r)
    }

    /// True once any structural tile change happened since the last clear.
    pub fn map_changed(&self) -> bool {
        self.map_changed
    }

    pub fn clear_map_changed(&mut self) {
        self.map_changed = false;
    }

    fn touched(&mut self, tile: TilePos) {
        self.map_changed = true;
        self.invalidation.invalidate_tile_full(tile_to_world(tile));
    }

    pub fn insert_element(
        &mut self,
        tile: TilePos,
        element: TileElement,
    ) -> Result<ElementRef, LocoError> {
        let r = self.tiles.insert(tile, element)?;
        self.touched(tile);
        Ok(r)
    }

    pub fn remove_element(&mut self, r: ElementRef) -> Result<TileElement, LocoError> {
        let removed = self.tiles.remove(r)?;
        self.touched(r.tile);
        Ok(removed)
    }

    /// Change an element's heights in place. The stack order is not revisited.
    pub fn set_element_heights(
        &mut self,
        r: ElementRef,
        base_z: u8,
        clear_z: u8,
    ) -> Result<(), LocoError> {
        let el = self.tiles.element_mut(r)?;
        el.base_z = base_z.min(locosim_core::constants::FREE_ELEMENT_BASE_Z - 1);
        el.clear_z = clear_z;
        self.touched(r.tile);
        Ok(())
    }

    pub fn set_element_ghost(&mut self, r: ElementRef, ghost: bool) -> Result<(), LocoError> {
        self.tiles.element_mut(r)?.ghost = ghost;
        self.touched(r.tile);
        Ok(())
    }

    /// Apply an arbitrary edit to one element's payload and flags.
    pub fn modify_element<F>(&mut self, r: ElementRef, edit: F) -> Result<(), LocoError>
    where
        F: FnOnce(&mut TileElement),
    {
        edit(self.tiles.element_mut(r)?);
        self.touched(r.tile);
        Ok(())
    }

    /// Reset to a flat map.
    pub fn reset(&mut self, land_type: u8) {
        self.tiles.initialise(land_type);
        self.map_changed = true;
        log::info!("World reset to a flat map");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invalidation::RecordingSink;
    use locosim_core::constants::MAP_TILE_COUNT;
    use tile::{ElementKind, TreeElement};

    fn world() -> (World, RecordingSink) {
        let sink = RecordingSink::new();
        let config = SimConfig {
            max_elements: MAP_TILE_COUNT + 32,
            ..Default::default()
        };
        (World::new(&config, Box::new(sink.clone())), sink)
    }

    #[test]
    fn test_remove_marks_changed_and_invalidates() {
        let (mut w, sink) = world();
        let tile = TilePos::new(12, 3);
        let r = w
            .insert_element(tile, TileElement::new(ElementKind::Tree(TreeElement::default()), 8, 20))
            .expect("insert");
        w.clear_map_changed();
        sink.take();

        w.remove_element(r).expect("remove");
        assert!(w.map_changed());
        assert_eq!(sink.len(), 1);
        assert_eq!(w.get_tile(tile).map(|t| t.len()), Some(1));
    }

    #[test]
    fn test_failed_remove_has_no_side_effects() {
        let (mut w, sink) = world();
        let r = ElementRef {
            tile: TilePos::new(1, 1),
            index: 5,
        };
        assert!(w.remove_element(r).is_err());
        assert!(!w.map_changed());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_set_heights_changes_land() {
        let (mut w, _sink) = world();
        let tile = TilePos::new(4, 4);
        w.set_element_heights(ElementRef { tile, index: 0 }, 25, 25)
            .expect("set");
        assert_eq!(w.get_height(glam::IVec2::new(140, 140)).land, 100);
        assert!(w.map_changed());
    }

    #[test]
    fn test_modify_and_ghost() {
        let (mut w, _sink) = world();
        let r = ElementRef {
            tile: TilePos::new(8, 8),
            index: 0,
        };
        w.set_element_ghost(r, true).expect("ghost");
        assert!(w.element(r).is_some_and(|el| el.ghost));
        w.modify_element(r, |el| el.flag5 = true).expect("modify");
        assert!(w.element(r).is_some_and(|el| el.flag5));
    }
}
