//! Steam, smoke and spark puffs emitted by locomotives.

use crate::entity::{EntityKind, SpriteExtents};
use crate::simulation::Simulation;
use glam::IVec3;
use locosim_core::constants::SMALL_Z_STEP;
use locosim_core::math::{align_to_tile, valid_coords};
use locosim_core::objects::ObjectProvider;
use locosim_core::types::{EntityId, WorldPos};
use locosim_world::tile::{StationElement, TrackElement};
use locosim_world::tile_grid::Tile;

/// Wind added to the 16-bit accumulator each tick; every overflow drifts the puff one unit in x.
pub const WIND_STEP: u32 = 7000;

/// Bit 7 of the object type selects the alternate frame set.
pub const ALTERNATE_FRAMES: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Exhaust {
    /// Steam object id in the low seven bits, alternate-frames flag in bit 7.
    pub object_type: u8,
    pub frame: u16,
    pub stationary_progress: u8,
    pub wind_progress: u16,
}

impl Exhaust {
    pub fn object_id(&self) -> u8 {
        self.object_type & !ALTERNATE_FRAMES
    }

    pub fn uses_alternate_frames(&self) -> bool {
        self.object_type & ALTERNATE_FRAMES != 0
    }

    /// Emit a puff at `pos`.
    ///
    /// Nothing is allocated when `pos` is off the map, not above the tile's
    /// surface, or the steam object is unknown.
    pub fn create(sim: &mut Simulation, pos: WorldPos, object_type: u8) -> Option<EntityId> {
        if !valid_coords(pos.truncate()) {
            return None;
        }
        let surface_height = sim
            .world
            .get(align_to_tile(pos.truncate()))?
            .surface_element()?
            .base_height();
        if pos.z <= surface_height {
            return None;
        }
        let exhaust = Exhaust {
            object_type,
            ..Default::default()
        };
        let object = sim.objects().steam(exhaust.object_id())?;
        let sprite = SpriteExtents::new(
            object.sprite_width,
            object.sprite_height_negative,
            object.sprite_height_positive,
        );
        sim.spawn_misc(EntityKind::Exhaust(exhaust), sprite, pos)
    }
}

pub(crate) fn update(sim: &mut Simulation, id: EntityId) {
    let Some(mut exhaust) = sim.entities.get_as::<Exhaust>(id).copied() else {
        return;
    };
    let Some(mut pos) = sim.entities.get(id).map(|e| e.position()) else {
        return;
    };
    let behaviour = sim.objects().steam(exhaust.object_id()).map(|object| {
        let frames: Vec<i8> = object
            .frames(exhaust.uses_alternate_frames())
            .iter()
            .map(|f| f.height)
            .collect();
        (
            object.apply_wind,
            object.num_stationary_ticks,
            object.disperse_on_collision,
            frames,
        )
    });
    let Some((apply_wind, stationary_ticks, disperse, frames)) = behaviour else {
        log::warn!("Exhaust {} refers to missing steam object {}", id.0, exhaust.object_id());
        sim.release_entity(id);
        return;
    };

    if apply_wind {
        let progress = exhaust.wind_progress as u32 + WIND_STEP;
        exhaust.wind_progress = progress as u16;
        let drift = (progress >> 16) as i32;
        if drift != 0 {
            pos.x += drift;
            if !valid_coords(pos.truncate()) {
                sim.release_entity(id);
                return;
            }
            sim.move_entity(id, pos);
        }
    }

    exhaust.stationary_progress = exhaust.stationary_progress.wrapping_add(1);
    if exhaust.stationary_progress < stationary_ticks {
        store(sim, id, exhaust);
        return;
    }
    exhaust.stationary_progress = 0;
    exhaust.frame += 1;

    let Some(&height) = frames.get(exhaust.frame as usize) else {
        sim.release_entity(id);
        return;
    };
    store(sim, id, exhaust);
    pos.z += height as i32;
    sim.move_entity(id, pos);

    if disperse && collides(sim, pos) {
        sim.release_entity(id);
    }
}

fn store(sim: &mut Simulation, id: EntityId, exhaust: Exhaust) {
    if let Some(slot) = sim.entities.get_as_mut::<Exhaust>(id) {
        *slot = exhaust;
    }
}

/// True if a puff at `pos` touches a solid element or a station platform.
fn collides(sim: &Simulation, pos: WorldPos) -> bool {
    let Some(tile) = sim.world.get(pos.truncate()) else {
        return false;
    };
    let low_z = pos.z / SMALL_Z_STEP - 3;
    let high_z = low_z + 6;
    tile_collides(&tile, sim.objects(), low_z, high_z)
}

fn tile_collides(tile: &Tile<'_>, objects: &dyn ObjectProvider, low_z: i32, high_z: i32) -> bool {
    for (index, el) in tile.iter() {
        if el.flag5 || el.ghost {
            continue;
        }
        let base_z = el.base_z as i32;
        if low_z < base_z && high_z > base_z {
            return true;
        }

        let Some(track) = el.as_variant::<TrackElement>() else {
            continue;
        };
        if !track.has_station {
            continue;
        }
        // The station element sits directly above its track piece.
        let Some(station_el) = index.checked_add(1).and_then(|i| tile.element(i)) else {
            continue;
        };
        let Some(station) = station_el.as_variant::<StationElement>() else {
            continue;
        };
        if station_el.flag5 || station_el.ghost {
            continue;
        }
        if objects
            .train_station(station.object_id)
            .is_some_and(|o| o.exhaust_passes)
        {
            continue;
        }
        if station.multi_tile_index == 0 {
            continue;
        }
        let platform_z = base_z + 7;
        if low_z < platform_z && high_z > platform_z {
            return true;
        }
    }
    false
}

/// Emit a puff from a moving vehicle.
pub fn emit(sim: &mut Simulation, pos: WorldPos, object_type: u8, wind_phase: u16) -> Option<EntityId> {
    let id = Exhaust::create(sim, pos, object_type)?;
    if let Some(exhaust) = sim.entities.get_as_mut::<Exhaust>(id) {
        exhaust.wind_progress = wind_phase;
    }
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use locosim_core::config::SimConfig;
    use locosim_core::objects::{ObjectTable, SteamFrame, SteamObject, TrainStationObject};
    use locosim_core::types::TilePos;
    use locosim_world::tile::{ElementKind, TileElement};

    fn steam(id: u8, apply_wind: bool, disperse: bool) -> SteamObject {
        SteamObject {
            id,
            name: format!("steam {id}"),
            sprite_width: 10,
            sprite_height_negative: 12,
            sprite_height_positive: 4,
            num_stationary_ticks: 2,
            apply_wind,
            disperse_on_collision: disperse,
            frames: vec![SteamFrame { height: 2, image: 0 }; 4],
            alt_frames: vec![SteamFrame { height: 5, image: 0 }; 2],
        }
    }

    fn sim_with(objects: ObjectTable) -> Simulation {
        Simulation::headless(SimConfig::default(), Box::new(objects))
    }

    fn default_sim() -> Simulation {
        sim_with(ObjectTable {
            steam: vec![steam(1, false, false), steam(2, true, false), steam(3, false, true)],
            train_stations: vec![
                TrainStationObject {
                    id: 0,
                    name: "Platform".into(),
                    exhaust_passes: false,
                },
                TrainStationObject {
                    id: 1,
                    name: "Open platform".into(),
                    exhaust_passes: true,
                },
            ],
            ..Default::default()
        })
    }

    #[test]
    fn test_create_rejects_unknown_object() {
        let mut sim = default_sim();
        assert!(Exhaust::create(&mut sim, IVec3::new(100, 100, 40), 9).is_none());
        assert_eq!(sim.effect_count(), 0);
    }

    #[test]
    fn test_create_rejects_below_surface() {
        let mut sim = default_sim();
        // Flat map surface is at base_z 4, height 16.
        assert!(Exhaust::create(&mut sim, IVec3::new(100, 100, 16), 1).is_none());
        assert!(Exhaust::create(&mut sim, IVec3::new(100, 100, 17), 1).is_some());
        assert!(Exhaust::create(&mut sim, IVec3::new(-1, 100, 40), 1).is_none());
    }

    #[test]
    fn test_sprite_from_object() {
        let mut sim = default_sim();
        let id = Exhaust::create(&mut sim, IVec3::new(100, 100, 40), 1).expect("puff");
        assert_eq!(sim.entities.get(id).map(|e| e.sprite), Some(SpriteExtents::new(10, 12, 4)));
    }

    #[test]
    fn test_frames_and_release() {
        let mut sim = default_sim();
        let id = Exhaust::create(&mut sim, IVec3::new(100, 100, 40), 1).expect("puff");
        sim.tick();
        assert_eq!(sim.entities.get(id).map(|e| e.position().z), Some(40));
        sim.tick();
        assert_eq!(sim.entities.get(id).map(|e| e.position().z), Some(42));
        // Frames 1..=3 add height every second tick; frame 4 does not exist.
        for _ in 0..4 {
            sim.tick();
        }
        assert_eq!(sim.entities.get(id).map(|e| e.position().z), Some(46));
        sim.tick();
        sim.tick();
        assert!(sim.entities.get(id).is_none());
    }

    #[test]
    fn test_alternate_frames() {
        let mut sim = default_sim();
        let id = Exhaust::create(&mut sim, IVec3::new(100, 100, 40), 1 | ALTERNATE_FRAMES)
            .expect("puff");
        sim.tick();
        sim.tick();
        assert_eq!(sim.entities.get(id).map(|e| e.position().z), Some(45));
        sim.tick();
        sim.tick();
        assert!(sim.entities.get(id).is_none());
    }

    #[test]
    fn test_wind_drift() {
        let mut sim = sim_with(ObjectTable {
            steam: vec![SteamObject {
                num_stationary_ticks: 255,
                ..steam(2, true, false)
            }],
            ..Default::default()
        });
        let id = Exhaust::create(&mut sim, IVec3::new(100, 100, 40), 2).expect("puff");
        // 65536 / 7000 = 9.36, so the tenth tick overflows the accumulator.
        for _ in 0..9 {
            sim.tick();
        }
        assert_eq!(sim.entities.get(id).map(|e| e.position().x), Some(100));
        sim.tick();
        assert_eq!(sim.entities.get(id).map(|e| e.position().x), Some(101));
    }

    #[test]
    fn test_wind_drift_off_map_edge_releases() {
        let mut sim = sim_with(ObjectTable {
            steam: vec![SteamObject {
                num_stationary_ticks: 255,
                ..steam(2, true, false)
            }],
            ..Default::default()
        });
        let id = Exhaust::create(&mut sim, IVec3::new(12287, 100, 40), 2).expect("puff");
        for _ in 0..10 {
            sim.tick();
            if let Some(e) = sim.entities.get(id) {
                assert!(valid_coords(e.position().truncate()) || e.is_off_world());
            }
        }
        assert!(sim.entities.get(id).is_none());
        assert_eq!(sim.effect_count(), 0);
    }

    #[test]
    fn test_disperses_on_element() {
        let mut sim = default_sim();
        let tile = TilePos::new(3, 3);
        sim.world
            .insert_element(tile, TileElement::new(ElementKind::Wall(Default::default()), 11, 14))
            .expect("wall");
        // z 40 -> 42 after the first frame: low_z 7, high_z 13 brackets base_z 11.
        let id = Exhaust::create(&mut sim, IVec3::new(100, 100, 40), 3).expect("puff");
        sim.tick();
        sim.tick();
        assert!(sim.entities.get(id).is_none());
    }

    #[test]
    fn test_ghost_elements_ignored() {
        let mut sim = default_sim();
        let tile = TilePos::new(3, 3);
        let mut wall = TileElement::new(ElementKind::Wall(Default::default()), 11, 14);
        wall.ghost = true;
        sim.world.insert_element(tile, wall).expect("wall");
        let id = Exhaust::create(&mut sim, IVec3::new(100, 100, 40), 3).expect("puff");
        sim.tick();
        sim.tick();
        assert!(sim.entities.get(id).is_some());
    }

    fn station_tile(sim: &mut Simulation, station_object: u8, multi_tile_index: u8) {
        let tile = TilePos::new(3, 3);
        let track = TrackElement {
            has_station: true,
            ..Default::default()
        };
        sim.world
            .insert_element(tile, TileElement::new(ElementKind::Track(track), 4, 8))
            .expect("track");
        let station = StationElement {
            object_id: station_object,
            multi_tile_index,
            ..Default::default()
        };
        sim.world
            .insert_element(tile, TileElement::new(ElementKind::Station(station), 4, 12))
            .expect("station");
    }

    #[test]
    fn test_disperses_under_platform() {
        let mut sim = default_sim();
        station_tile(&mut sim, 0, 1);
        // z 42 gives low_z 7, high_z 13: the platform at 4 + 7 = 11 is inside.
        let id = Exhaust::create(&mut sim, IVec3::new(100, 100, 40), 3).expect("puff");
        sim.tick();
        sim.tick();
        assert!(sim.entities.get(id).is_none());
    }

    #[test]
    fn test_passes_open_platform() {
        let mut sim = default_sim();
        station_tile(&mut sim, 1, 1);
        let id = Exhaust::create(&mut sim, IVec3::new(100, 100, 40), 3).expect("puff");
        sim.tick();
        sim.tick();
        assert!(sim.entities.get(id).is_some());
    }

    #[test]
    fn test_passes_first_platform_tile() {
        let mut sim = default_sim();
        station_tile(&mut sim, 0, 0);
        let id = Exhaust::create(&mut sim, IVec3::new(100, 100, 40), 3).expect("puff");
        sim.tick();
        sim.tick();
        assert!(sim.entities.get(id).is_some());
    }

    #[test]
    fn test_emit_sets_wind_phase() {
        let mut sim = default_sim();
        let id = emit(&mut sim, IVec3::new(100, 100, 40), 2, 65_000).expect("puff");
        sim.tick();
        assert_eq!(sim.entities.get(id).map(|e| e.position().x), Some(101));
    }
}
