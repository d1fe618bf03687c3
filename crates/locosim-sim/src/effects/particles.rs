//! Frame-counted particles that play once and free themselves.

use crate::entity::{EntityKind, EntityVariant, SpriteExtents};
use crate::simulation::Simulation;
use glam::IVec3;
use locosim_core::types::{EntityId, WorldPos, ZoomLevel};

const PARTICLE_SPRITE: SpriteExtents = SpriteExtents::new(44, 32, 34);

/// A particle whose only state is an animation counter.
pub trait FrameEffect: EntityVariant + Default {
    /// Counter increment per tick.
    const STEP: u16;
    /// The particle is freed once the counter reaches this value.
    const END: u16;
    /// Height gained per tick.
    const RISE: i32 = 0;
    /// Zoom hint for redraws.
    const ZOOM: ZoomLevel = ZoomLevel::Eighth;

    fn frame_mut(&mut self) -> &mut u16;
    fn into_kind(self) -> EntityKind;

    /// Spawn a new particle at `pos`.
    fn create(sim: &mut Simulation, pos: WorldPos) -> Option<EntityId> {
        sim.spawn_misc(Self::default().into_kind(), PARTICLE_SPRITE, pos)
    }
}

macro_rules! frame_effect {
    ($(#[$meta:meta])* $name:ident, $variant:ident, step: $step:expr, end: $end:expr $(, $($extra:tt)*)?) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name {
            pub frame: u16,
        }

        impl FrameEffect for $name {
            const STEP: u16 = $step;
            const END: u16 = $end;
            $($($extra)*)?

            fn frame_mut(&mut self) -> &mut u16 {
                &mut self.frame
            }

            fn into_kind(self) -> EntityKind {
                EntityKind::$variant(self)
            }
        }
    };
}

frame_effect!(
    /// Dark smoke rising from a damaged or burning vehicle.
    Smoke, Smoke, step: 0x55, end: 0xC00,
    const RISE: i32 = 1;
    const ZOOM: ZoomLevel = ZoomLevel::Half;
);
frame_effect!(ExplosionCloud, ExplosionCloud, step: 0x80, end: 0x1200);
frame_effect!(Splash, Splash, step: 0x55, end: 0x1C00);
frame_effect!(Fireball, Fireball, step: 0x40, end: 0x1F00);
frame_effect!(
    /// Puff left behind by an explosion.
    ExplosionSmoke, ExplosionSmoke, step: 0x80, end: 0xA00
);

impl Smoke {
    pub fn create(sim: &mut Simulation, pos: WorldPos) -> Option<EntityId> {
        <Self as FrameEffect>::create(sim, pos)
    }
}

impl ExplosionCloud {
    pub fn create(sim: &mut Simulation, pos: WorldPos) -> Option<EntityId> {
        <Self as FrameEffect>::create(sim, pos)
    }
}

impl Splash {
    pub fn create(sim: &mut Simulation, pos: WorldPos) -> Option<EntityId> {
        <Self as FrameEffect>::create(sim, pos)
    }
}

impl Fireball {
    pub fn create(sim: &mut Simulation, pos: WorldPos) -> Option<EntityId> {
        <Self as FrameEffect>::create(sim, pos)
    }
}

impl ExplosionSmoke {
    /// Spawns slightly above `pos`.
    pub fn create(sim: &mut Simulation, pos: WorldPos) -> Option<EntityId> {
        <Self as FrameEffect>::create(sim, pos + IVec3::new(0, 0, 4))
    }
}

pub(crate) fn update<T: FrameEffect>(sim: &mut Simulation, id: EntityId) {
    if T::RISE != 0 {
        let Some(pos) = sim.entities.get(id).map(|e| e.position()) else {
            return;
        };
        sim.move_entity_zoom(id, pos + IVec3::new(0, 0, T::RISE), T::ZOOM);
    } else {
        sim.invalidate_entity(id, T::ZOOM);
    }

    let Some(effect) = sim.entities.get_as_mut::<T>(id) else {
        return;
    };
    let frame = effect.frame_mut();
    *frame = frame.saturating_add(T::STEP);
    if *frame >= T::END {
        sim.entities.release(id);
    }
}
