//! Debris thrown out when a vehicle component explodes.

use crate::entity::{EntityKind, SpriteExtents};
use crate::rng::hash_to_i16;
use crate::simulation::Simulation;
use glam::IVec3;
use locosim_core::math::valid_coords;
use locosim_core::types::{EntityId, WorldPos};

/// Downward acceleration per tick, 16.16 fixed point.
pub const GRAVITY: i32 = 5041;
/// Animation advance per tick; 12 frames of 256.
pub const FRAME_STEP: u16 = 85;
pub const FRAME_COUNT: u16 = 12 * 256;
/// Number of debris sprite sets.
pub const SPRITE_SETS: u8 = 5;

const CRASH_SPRITE: SpriteExtents = SpriteExtents::new(8, 8, 8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VehicleCrashParticle {
    pub time_to_live: u16,
    pub frame: u16,
    pub colour_primary: u8,
    pub colour_secondary: u8,
    pub sprite_set: u8,
    /// Velocity in 16.16 fixed point.
    pub velocity: IVec3,
    /// Sub-unit remainder of the position, low 16 bits only.
    pub remainder: IVec3,
}

impl VehicleCrashParticle {
    /// Throw a piece of debris from `pos` in a random direction.
    pub fn create(sim: &mut Simulation, pos: WorldPos, colours: (u8, u8)) -> Option<EntityId> {
        if !valid_coords(pos.truncate()) {
            return None;
        }
        let r0 = sim.random(pos);
        let r1 = sim.random(pos);
        let r2 = sim.random(pos);
        let particle = VehicleCrashParticle {
            time_to_live: (r0 & 0xFF) as u16 + 180,
            frame: ((r0 >> 8) & 0xFF) as u16 * 12,
            colour_primary: colours.0,
            colour_secondary: colours.1,
            sprite_set: ((r0 >> 16) % SPRITE_SETS as u32) as u8,
            velocity: IVec3::new(
                hash_to_i16(r1) as i32 * 4,
                hash_to_i16(r1 >> 16) as i32 * 4,
                (r2 & 0xFFFF) as i32 * 4 + 0x10000,
            ),
            remainder: IVec3::ZERO,
        };
        sim.spawn_misc(EntityKind::CrashParticle(particle), CRASH_SPRITE, pos)
    }

    /// Apply gravity and drag, returning the whole-unit movement for this tick.
    fn integrate(&mut self) -> IVec3 {
        self.velocity.z -= GRAVITY;
        // Air resistance.
        self.velocity -= self.velocity / 256;
        let total = self.remainder + self.velocity;
        self.remainder = total & IVec3::splat(0xFFFF);
        total >> 16
    }
}

pub(crate) fn update(sim: &mut Simulation, id: EntityId) {
    let Some(mut particle) = sim.entities.get_as::<VehicleCrashParticle>(id).copied() else {
        return;
    };
    let Some(pos) = sim.entities.get(id).map(|e| e.position()) else {
        return;
    };

    particle.time_to_live = particle.time_to_live.saturating_sub(1);
    if particle.time_to_live == 0 {
        sim.release_entity(id);
        return;
    }

    let new_pos = pos + particle.integrate();
    if !valid_coords(new_pos.truncate()) {
        sim.release_entity(id);
        return;
    }
    let ground = sim.world.get_height(new_pos.truncate()).top();
    if new_pos.z < ground {
        sim.release_entity(id);
        return;
    }

    particle.frame = (particle.frame + FRAME_STEP) % FRAME_COUNT;
    if let Some(slot) = sim.entities.get_as_mut::<VehicleCrashParticle>(id) {
        *slot = particle;
    }
    sim.move_entity(id, new_pos);
}
