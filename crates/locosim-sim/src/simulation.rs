use crate::effects;
use crate::entity::{EntityBaseType, EntityKind, SpriteExtents};
use crate::pool::EntityPool;
use crate::rng::sim_hash;
use locosim_core::config::SimConfig;
use locosim_core::constants::LOCATION_NULL;
use locosim_core::math::valid_coords;
use locosim_core::objects::ObjectProvider;
use locosim_core::types::{EntityId, WorldPos, ZoomLevel};
use locosim_world::invalidation::{InvalidationSink, NullSink};
use locosim_world::World;

/// Primary public struct for the locosim-sim crate.
///
/// Owns the world, the entity pool and the loaded object metadata. Creating
/// one is loading a world; dropping it unloads everything.
pub struct Simulation {
    pub world: World,
    pub entities: EntityPool,
    objects: Box<dyn ObjectProvider>,
    config: SimConfig,
    tick: u32,
    draws: u32,
}

impl Simulation {
    pub fn new(
        config: SimConfig,
        objects: Box<dyn ObjectProvider>,
        sink: Box<dyn InvalidationSink>,
    ) -> Self {
        let world = World::new(&config, sink);
        Self {
            world,
            entities: EntityPool::new(),
            objects,
            config,
            tick: 0,
            draws: 0,
        }
    }

    /// Simulation that discards invalidations.
    pub fn headless(config: SimConfig, objects: Box<dyn ObjectProvider>) -> Self {
        Self::new(config, objects, Box::new(NullSink))
    }

    pub fn objects(&self) -> &dyn ObjectProvider {
        self.objects.as_ref()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    pub fn rotation(&self) -> u8 {
        self.world.rotation()
    }

    /// Change the view rotation and reproject every live sprite.
    pub fn set_rotation(&mut self, rotation: u8) {
        let rotation = rotation & 3;
        self.world.invalidation().set_rotation(rotation);
        self.config.rotation = rotation;
        for base in [EntityBaseType::Vehicle, EntityBaseType::Misc] {
            for id in self.entities.live_ids(base) {
                self.entities.refresh_sprite_bounds(id, rotation);
            }
        }
    }

    /// Next deterministic random value, mixed with `pos`.
    pub(crate) fn random(&mut self, pos: WorldPos) -> u32 {
        self.draws = self.draws.wrapping_add(1);
        sim_hash(pos.x, pos.y, pos.z, self.draws ^ self.tick.rotate_left(16))
    }

    /// Redraw the entity's current sprite bounds.
    pub fn invalidate_entity(&mut self, id: EntityId, zoom: ZoomLevel) {
        if let Some(bounds) = self.entities.get(id).map(|e| e.sprite_bounds()) {
            self.world.invalidation().invalidate_sprite(bounds, zoom);
        }
    }

    /// Move an entity, redrawing both the old and the new sprite bounds.
    pub fn move_entity(&mut self, id: EntityId, pos: WorldPos) -> bool {
        self.move_entity_zoom(id, pos, ZoomLevel::Eighth)
    }

    /// Positions off the map other than `LOCATION_NULL` are refused and the
    /// entity stays where it was.
    pub(crate) fn move_entity_zoom(&mut self, id: EntityId, pos: WorldPos, zoom: ZoomLevel) -> bool {
        if self.entities.get(id).is_none() {
            return false;
        }
        if pos.x != LOCATION_NULL && !valid_coords(pos.truncate()) {
            log::debug!("Refusing to move entity {} off the map to {pos}", id.0);
            return false;
        }
        self.invalidate_entity(id, zoom);
        let rotation = self.rotation();
        self.entities.move_to(id, pos, rotation);
        self.invalidate_entity(id, zoom);
        true
    }

    /// Redraw and free an entity.
    pub fn release_entity(&mut self, id: EntityId) -> bool {
        self.invalidate_entity(id, ZoomLevel::Eighth);
        self.entities.release(id)
    }

    /// Allocate an effect, size its sprite and place it at `pos`.
    ///
    /// Positions off the map are rejected before anything is allocated.
    pub(crate) fn spawn_misc(
        &mut self,
        kind: EntityKind,
        sprite: SpriteExtents,
        pos: WorldPos,
    ) -> Option<EntityId> {
        if !valid_coords(pos.truncate()) {
            return None;
        }
        let id = self.entities.create_misc(kind)?;
        self.place(id, sprite, pos);
        Some(id)
    }

    pub(crate) fn spawn_money(
        &mut self,
        kind: EntityKind,
        sprite: SpriteExtents,
        pos: WorldPos,
    ) -> Option<EntityId> {
        if !valid_coords(pos.truncate()) {
            return None;
        }
        let id = self.entities.create_money(kind)?;
        self.place(id, sprite, pos);
        Some(id)
    }

    pub(crate) fn place(&mut self, id: EntityId, sprite: SpriteExtents, pos: WorldPos) {
        if let Some(e) = self.entities.get_mut(id) {
            e.sprite = sprite;
        }
        let rotation = self.rotation();
        self.entities.move_to(id, pos, rotation);
        self.invalidate_entity(id, ZoomLevel::Eighth);
    }

    /// Take an entity out of the world without freeing it.
    pub fn remove_from_world(&mut self, id: EntityId) -> bool {
        self.move_entity(id, WorldPos::new(LOCATION_NULL, 0, 0))
    }

    /// Advance one tick: every live effect is updated once, in slot order.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        for id in self.entities.live_ids(EntityBaseType::Misc) {
            // Earlier updates may have released this slot.
            if self.entities.get(id).is_some() {
                effects::update(self, id);
            }
        }
        log::trace!(
            "Tick {}: {} effects live",
            self.tick,
            self.entities.list_count(crate::entity::EntityList::Misc)
        );
    }

    /// Number of live effect entities.
    pub fn effect_count(&self) -> usize {
        self.entities.list_count(crate::entity::EntityList::Misc)
    }

    /// Return to an empty flat world.
    pub fn reset(&mut self) {
        self.entities.reset();
        self.world.reset(self.config.default_land_type);
        self.tick = 0;
        self.draws = 0;
        log::info!("Simulation reset");
    }
}
