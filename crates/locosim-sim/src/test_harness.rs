//! Cross-module scenarios driven through `Simulation`.
//!
//! Randomised sequences use `sim_hash` so every run replays the same steps.

#[cfg(test)]
mod tests {
    use crate::effects::exhaust::Exhaust;
    use crate::effects::particles::Smoke;
    use crate::entity::{EntityBaseType, EntityKind, EntityList};
    use crate::rng::sim_hash;
    use crate::simulation::Simulation;
    use crate::spatial::spatial_offset;
    use glam::IVec3;
    use locosim_core::config::SimConfig;
    use locosim_core::constants::{MAP_TILE_COUNT, MAX_MISC_ENTITIES};
    use locosim_core::math::world_to_tile;
    use locosim_core::objects::{ObjectTable, SteamFrame, SteamObject};
    use locosim_core::orientation::{compute_pitch, compute_yaw, Pitch, YawAccuracy};
    use locosim_core::types::{EntityId, TilePos};
    use locosim_world::tile::{ElementKind, TileElement, TreeElement};
    use locosim_world::tile_grid::ElementRef;

    fn steam_objects() -> ObjectTable {
        ObjectTable {
            steam: vec![SteamObject {
                id: 1,
                name: "Steam".into(),
                sprite_width: 10,
                sprite_height_negative: 12,
                sprite_height_positive: 4,
                num_stationary_ticks: 1,
                apply_wind: true,
                disperse_on_collision: true,
                frames: vec![SteamFrame { height: 1, image: 0 }; 16],
                alt_frames: Vec::new(),
            }],
            ..Default::default()
        }
    }

    fn small_sim() -> Simulation {
        let config = SimConfig {
            max_elements: MAP_TILE_COUNT + 256,
            ..Default::default()
        };
        Simulation::headless(config, Box::new(steam_objects()))
    }

    #[test]
    fn test_exhaust_above_raised_surface() {
        let mut sim = small_sim();
        let tile = TilePos::new(10, 10);
        sim.world
            .set_element_heights(ElementRef { tile, index: 0 }, 25, 25)
            .expect("raise surface");
        let pos = IVec3::new(10 * 32 + 5, 10 * 32 + 5, 100);
        assert!(Exhaust::create(&mut sim, pos, 1).is_none());
        assert_eq!(sim.effect_count(), 0);
        assert!(Exhaust::create(&mut sim, pos + IVec3::new(0, 0, 4), 1).is_some());
        assert_eq!(sim.effect_count(), 1);
    }

    #[test]
    fn test_stack_invariant_under_random_edits() {
        let mut sim = small_sim();
        let tiles = [TilePos::new(0, 0), TilePos::new(5, 9), TilePos::new(383, 383)];
        let mut expected = [1usize; 3];

        for step in 0..3000u32 {
            let h = sim_hash(step as i32, 17, 3, 0xC0FFEE);
            let which = (h % 3) as usize;
            let tile = tiles[which];
            if h & 0x100 != 0 || expected[which] == 1 {
                let base_z = ((h >> 12) % 200) as u8 + 4;
                let tree = TileElement::new(ElementKind::Tree(TreeElement::default()), base_z, base_z + 4);
                if sim.world.insert_element(tile, tree).is_ok() {
                    expected[which] += 1;
                }
            } else {
                // Never remove the surface at index 0.
                let index = 1 + ((h >> 12) as usize % (expected[which] - 1)) as u8;
                sim.world
                    .remove_element(ElementRef { tile, index })
                    .expect("remove");
                expected[which] -= 1;
            }

            let stack = sim.world.get_tile(tile).expect("tile");
            assert_eq!(stack.len(), expected[which], "step {step}");
            let heights: Vec<u8> = stack.iter().map(|(_, el)| el.base_z).collect();
            assert!(heights.windows(2).all(|w| w[0] <= w[1]), "step {step}: {heights:?}");
            let lasts: Vec<bool> = stack.iter().map(|(_, el)| el.is_last()).collect();
            assert_eq!(lasts.iter().filter(|l| **l).count(), 1);
            assert!(lasts.last().copied().unwrap_or(false));
        }
        assert!(sim.world.tiles().validate().is_ok());
    }

    #[test]
    fn test_pool_exhaustion_is_graceful() {
        let mut sim = small_sim();
        let mut ids = Vec::new();
        loop {
            match Smoke::create(&mut sim, IVec3::new(1000, 1000, 50)) {
                Some(id) => ids.push(id),
                None => break,
            }
        }
        assert_eq!(ids.len(), MAX_MISC_ENTITIES);
        assert!(Exhaust::create(&mut sim, IVec3::new(1000, 1000, 50), 1).is_none());
        sim.release_entity(ids[17]);
        assert!(Exhaust::create(&mut sim, IVec3::new(1000, 1000, 50), 1).is_some());
        assert!(sim.entities.validate_lists().is_ok());
    }

    #[test]
    fn test_spatial_index_tracks_random_moves() {
        let mut sim = small_sim();
        let ids: Vec<EntityId> = (0..64)
            .map(|_| {
                sim.entities
                    .create_misc(EntityKind::Smoke(Smoke::default()))
                    .expect("slot")
            })
            .collect();
        for (i, &id) in ids.iter().enumerate() {
            sim.move_entity(id, IVec3::new(16, 16 + 32 * i as i32, 40));
        }

        for step in 0..2000u32 {
            let h = sim_hash(step as i32, 99, 1, 7);
            let id = ids[(h % ids.len() as u32) as usize];
            let pos = IVec3::new(((h >> 6) % 4000) as i32, ((h >> 18) % 4000) as i32, 40);
            sim.move_entity(id, pos);
        }

        for &id in &ids {
            let pos = sim.entities.get(id).map(|e| e.position()).expect("live");
            let tile = world_to_tile(pos.truncate());
            assert!(
                sim.entities.entities_on_tile(tile).any(|e| e.id() == id),
                "entity {} missing from tile {tile:?}",
                id.0
            );
            assert_ne!(spatial_offset(pos), spatial_offset(IVec3::new(-1, 0, 0)));
        }
        let total: usize = ids
            .iter()
            .filter_map(|&id| sim.entities.get(id))
            .map(|e| world_to_tile(e.position().truncate()))
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .map(|tile| sim.entities.entities_on_tile(tile).count())
            .sum();
        assert_eq!(total, ids.len());
    }

    #[test]
    fn test_effects_update_in_slot_order_and_expire() {
        let mut sim = small_sim();
        for i in 0..50 {
            Exhaust::create(&mut sim, IVec3::new(2000 + i * 3, 2000, 60), 1).expect("puff");
        }
        for i in 0..10 {
            Smoke::create(&mut sim, IVec3::new(3000, 3000 + i, 60)).expect("smoke");
        }
        assert_eq!(sim.effect_count(), 60);
        for _ in 0..100 {
            sim.tick();
        }
        assert_eq!(sim.effect_count(), 0);
        assert_eq!(sim.entities.list_count(EntityList::Misc), 0);
        assert!(sim.entities.live_ids(EntityBaseType::Misc).is_empty());
        assert!(sim.entities.validate_lists().is_ok());
    }

    #[test]
    fn test_orientation_consistency_across_depths() {
        for accuracy in [
            YawAccuracy::Bits3,
            YawAccuracy::Bits4,
            YawAccuracy::Bits5,
            YawAccuracy::Bits6,
            YawAccuracy::Bits7,
        ] {
            assert_eq!(compute_yaw(accuracy, -10, 0), 0, "{accuracy:?}");
        }
        assert_eq!(compute_pitch(0, 50, false), Pitch::Up12);
    }
}
