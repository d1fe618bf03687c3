//! Short-lived visual entities: exhaust, money labels, crash debris and
//! explosion particles. Each kind has a factory and a per-tick update.

pub mod crash;
pub mod exhaust;
pub mod money;
pub mod particles;

use crate::entity::MiscEntityType;
use crate::simulation::Simulation;
use locosim_core::types::EntityId;

/// Run one tick of the effect in `id`'s slot.
pub(crate) fn update(sim: &mut Simulation, id: EntityId) {
    let Some(misc_type) = sim.entities.get(id).and_then(|e| e.misc_type()) else {
        return;
    };
    match misc_type {
        MiscEntityType::Exhaust => exhaust::update(sim, id),
        MiscEntityType::RedGreenCurrency | MiscEntityType::WindowCurrency => {
            money::update(sim, id)
        }
        MiscEntityType::VehicleCrashParticle => crash::update(sim, id),
        MiscEntityType::ExplosionCloud => particles::update::<particles::ExplosionCloud>(sim, id),
        MiscEntityType::Splash => particles::update::<particles::Splash>(sim, id),
        MiscEntityType::Fireball => particles::update::<particles::Fireball>(sim, id),
        MiscEntityType::ExplosionSmoke => particles::update::<particles::ExplosionSmoke>(sim, id),
        MiscEntityType::Smoke => particles::update::<particles::Smoke>(sim, id),
    }
}
