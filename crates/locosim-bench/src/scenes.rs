use glam::IVec3;
use locosim_core::constants::{MAP_COLUMNS, MAP_ROWS, TILE_SIZE};
use locosim_core::types::{EntityId, TilePos};
use locosim_sim::effects::exhaust::Exhaust;
use locosim_sim::vehicle::{explode_component, update_body_pose, VehicleBody};
use locosim_sim::Simulation;
use locosim_world::tile::{ElementKind, TileElement, TreeElement};
use locosim_world::tile_grid::ElementRef;

/// What a scene does each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Puffs of every steam object spread over the map.
    ExhaustStorm,
    /// Vehicle bodies spawned, posed and blown up.
    CrashBurst,
    /// A fixed fleet of bodies re-posed around a circle.
    PoseSweep,
    /// Tile elements inserted and removed across the map.
    TileChurn,
}

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub kind: SceneKind,
    /// Work items per tick (puffs, explosions, bodies or tile edits).
    pub intensity: u32,
}

/// Return the standard suite of benchmark scenes.
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "exhaust-100",
            kind: SceneKind::ExhaustStorm,
            intensity: 100,
        },
        SceneConfig {
            name: "exhaust-1000",
            kind: SceneKind::ExhaustStorm,
            intensity: 1000,
        },
        SceneConfig {
            name: "crash-20",
            kind: SceneKind::CrashBurst,
            intensity: 20,
        },
        SceneConfig {
            name: "pose-2000",
            kind: SceneKind::PoseSweep,
            intensity: 2000,
        },
        SceneConfig {
            name: "tiles-5000",
            kind: SceneKind::TileChurn,
            intensity: 5000,
        },
    ]
}

/// Deterministic spread of work items over the map.
pub fn scatter(seed: u32, i: u32) -> TilePos {
    let h = (seed.wrapping_mul(31337) ^ i.wrapping_mul(7919)).wrapping_mul(0x9E3779B9);
    TilePos::new(
        1 + (h % (MAP_COLUMNS as u32 - 2)) as i32,
        1 + ((h >> 16) % (MAP_ROWS as u32 - 2)) as i32,
    )
}

fn tile_centre(tile: TilePos, z: i32) -> IVec3 {
    IVec3::new(
        tile.x * TILE_SIZE + TILE_SIZE / 2,
        tile.y * TILE_SIZE + TILE_SIZE / 2,
        z,
    )
}

/// Per-scene state carried between ticks.
#[derive(Debug, Default)]
pub struct SceneState {
    fleet: Vec<EntityId>,
    churned: Vec<TilePos>,
}

/// Prepare the world before timing starts.
pub fn populate(sim: &mut Simulation, config: &SceneConfig) -> SceneState {
    let mut state = SceneState::default();
    if config.kind == SceneKind::PoseSweep {
        for i in 0..config.intensity {
            if let Some(id) = VehicleBody::spawn(sim, 1, (i % 2) as u8, (0, 0)) {
                state.fleet.push(id);
            }
        }
    }
    state
}

/// Apply one tick of scene work. Returns the number of items that took effect.
pub fn step(sim: &mut Simulation, config: &SceneConfig, state: &mut SceneState, tick: u32) -> u32 {
    match config.kind {
        SceneKind::ExhaustStorm => (0..config.intensity)
            .filter(|&i| {
                let pos = tile_centre(scatter(tick, i), 40 + (i % 32) as i32);
                Exhaust::create(sim, pos, (i % 3) as u8).is_some()
            })
            .count() as u32,
        SceneKind::CrashBurst => {
            let mut done = 0;
            for i in 0..config.intensity {
                let Some(id) = VehicleBody::spawn(sim, 0, 0, (i as u8, 1)) else {
                    continue;
                };
                let back = tile_centre(scatter(tick, i), 32);
                update_body_pose(sim, id, back, back + IVec3::new(20, 0, 0));
                if explode_component(sim, id) > 0 {
                    done += 1;
                }
                sim.release_entity(id);
            }
            done
        }
        SceneKind::PoseSweep => {
            let fleet = std::mem::take(&mut state.fleet);
            let angle = tick as f32 * 0.05;
            let (sin, cos) = angle.sin_cos();
            for (i, &id) in fleet.iter().enumerate() {
                let back = tile_centre(scatter(7, i as u32), 32);
                let offset = IVec3::new((cos * 20.0) as i32, (sin * 20.0) as i32, (tick % 9) as i32);
                update_body_pose(sim, id, back, back + offset);
            }
            let count = fleet.len() as u32;
            state.fleet = fleet;
            count
        }
        SceneKind::TileChurn => {
            let mut done = 0;
            // Remove last tick's trees before planting new ones.
            for tile in state.churned.drain(..) {
                let Some(len) = sim.world.get_tile(tile).map(|t| t.len()) else {
                    continue;
                };
                let r = ElementRef {
                    tile,
                    index: (len - 1) as u8,
                };
                if sim.world.remove_element(r).is_ok() {
                    done += 1;
                }
            }
            for i in 0..config.intensity {
                let tile = scatter(tick.wrapping_add(1000), i);
                let base_z = 4 + (i % 40) as u8;
                let tree = TileElement::new(ElementKind::Tree(TreeElement::default()), base_z, base_z + 8);
                match sim.world.insert_element(tile, tree) {
                    Ok(_) => {
                        state.churned.push(tile);
                        done += 1;
                    }
                    Err(e) => log::warn!("Tile churn insert failed: {e}"),
                }
            }
            done
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locosim_core::config::SimConfig;
    use locosim_core::math::valid_tile;

    fn sim() -> Simulation {
        let objects = locosim_objects::load_builtin_objects().expect("builtin objects");
        Simulation::headless(SimConfig::default(), Box::new(objects))
    }

    #[test]
    fn test_scatter_stays_on_map() {
        for i in 0..1000 {
            let tile = scatter(3, i);
            assert!(valid_tile(tile), "{tile:?}");
        }
    }

    #[test]
    fn test_exhaust_storm_spawns() {
        let mut s = sim();
        let config = SceneConfig {
            name: "t",
            kind: SceneKind::ExhaustStorm,
            intensity: 50,
        };
        let mut state = populate(&mut s, &config);
        assert_eq!(step(&mut s, &config, &mut state, 0), 50);
        assert_eq!(s.effect_count(), 50);
    }

    #[test]
    fn test_pose_sweep_poses_fleet() {
        let mut s = sim();
        let config = SceneConfig {
            name: "t",
            kind: SceneKind::PoseSweep,
            intensity: 10,
        };
        let mut state = populate(&mut s, &config);
        assert_eq!(step(&mut s, &config, &mut state, 5), 10);
    }

    #[test]
    fn test_tile_churn_balances() {
        let mut s = sim();
        let config = SceneConfig {
            name: "t",
            kind: SceneKind::TileChurn,
            intensity: 100,
        };
        let mut state = populate(&mut s, &config);
        let used = s.world.tiles().used_elements();
        for tick in 0..3 {
            step(&mut s, &config, &mut state, tick);
        }
        assert!(s.world.tiles().validate().is_ok());
        assert_eq!(state.churned.len(), 100);
        assert!(s.world.tiles().used_elements() >= used);
    }

    #[test]
    fn test_crash_burst_creates_debris() {
        let mut s = sim();
        let config = SceneConfig {
            name: "t",
            kind: SceneKind::CrashBurst,
            intensity: 3,
        };
        let mut state = populate(&mut s, &config);
        assert_eq!(step(&mut s, &config, &mut state, 0), 3);
        assert!(s.effect_count() >= 3);
    }
}
