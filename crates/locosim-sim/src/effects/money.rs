//! Floating income and expense labels.

use crate::entity::{EntityKind, MiscEntityType, SpriteExtents};
use crate::simulation::Simulation;
use glam::IVec3;
use locosim_core::math::valid_coords;
use locosim_core::types::{EntityId, WorldPos};

/// Frames a window-style label lives.
pub const WINDOW_LIFETIME: u16 = 160;
/// Movements a red/green label makes before it is removed.
pub const RED_GREEN_LIFETIME: u8 = 55;

const MONEY_SPRITE: SpriteExtents = SpriteExtents::new(64, 20, 30);

/// Horizontal nudge per view rotation, so labels drift up-screen.
const WIGGLE: [(i32, i32); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];

#[rustfmt::skip]
const WIGGLE_Z: [i8; WINDOW_LIFETIME as usize] = [
    3, 3, 3, 3, 3, 3, 3, 3, 3, 3,
    2, 1, 0, 0, 0, 1, 0, 0, 0, 1,
    0, 0, 0, 1, 0, 0, 0, 1, 0, 0,
    0, 1, 0, 0, 0, 1, 0, 0, 0, 1,
    0, 0, 0, 1, 0, 0, 0, 1, 0, 0,
    0, 1, 0, 0, 0, 1, 0, 0, 0, 1,
    0, 0, 0, 1, 0, 0, 0, 1, 0, 0,
    0, 1, 0, 0, 0, 1, 0, 0, 0, 1,
    0, 0, 0, 1, 0, 0, 0, 1, 0, 0,
    0, 1, 0, 0, 0, 1, 0, 0, 0, 1,
    0, 0, 0, 1, 0, 0, 0, 1, 0, 0,
    0, 1, 0, 0, 0, 1, 0, 0, 0, 1,
    0, 0, 0, 1, 0, 0, 0, 1, 0, 0,
    0, 1, 0, 0, 0, 1, 0, 0, 0, 1,
    0, 0, 0, 1, 0, 0, 0, 1, 0, 0,
    0, 1, 0, 0, 0, 1, 0, 0, 0, 1,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoneyStyle {
    /// Rises and fades over a fixed number of frames.
    #[default]
    Window,
    /// Drifts every second tick for a fixed number of movements.
    RedGreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoneyEffect {
    pub style: MoneyStyle,
    pub amount: i32,
    pub company: u8,
    pub frame: u16,
    pub wiggle: u8,
    pub move_delay: u8,
    pub num_movements: u8,
}

impl MoneyEffect {
    pub fn misc_type(&self) -> MiscEntityType {
        match self.style {
            MoneyStyle::Window => MiscEntityType::WindowCurrency,
            MoneyStyle::RedGreen => MiscEntityType::RedGreenCurrency,
        }
    }

    /// True for expenses, drawn in red.
    pub fn is_expense(&self) -> bool {
        self.amount < 0
    }

    /// Show `amount` earned or spent by `company` above `pos`. No label is
    /// created on the title screen or when the reserved slots are used up.
    pub fn create(sim: &mut Simulation, pos: WorldPos, company: u8, amount: i32) -> Option<EntityId> {
        Self::create_styled(sim, pos, company, amount, MoneyStyle::Window)
    }

    pub fn create_red_green(
        sim: &mut Simulation,
        pos: WorldPos,
        company: u8,
        amount: i32,
    ) -> Option<EntityId> {
        Self::create_styled(sim, pos, company, amount, MoneyStyle::RedGreen)
    }

    fn create_styled(
        sim: &mut Simulation,
        pos: WorldPos,
        company: u8,
        amount: i32,
        style: MoneyStyle,
    ) -> Option<EntityId> {
        if sim.config().title_mode {
            return None;
        }
        let effect = MoneyEffect {
            style,
            amount,
            company,
            ..Default::default()
        };
        sim.spawn_money(EntityKind::Money(effect), MONEY_SPRITE, pos)
    }
}

pub(crate) fn update(sim: &mut Simulation, id: EntityId) {
    let Some(mut effect) = sim.entities.get_as::<MoneyEffect>(id).copied() else {
        return;
    };
    let Some(pos) = sim.entities.get(id).map(|e| e.position()) else {
        return;
    };
    let (nudge_x, nudge_y) = WIGGLE[(sim.rotation() & 3) as usize];

    match effect.style {
        MoneyStyle::Window => {
            effect.wiggle = if effect.wiggle == 0 { 21 } else { effect.wiggle - 1 };
            let Some(&nudge_z) = WIGGLE_Z.get(effect.frame as usize) else {
                sim.release_entity(id);
                return;
            };
            let step = if effect.frame & 1 == 0 { 1 } else { 0 };
            effect.frame += 1;
            let next = pos + IVec3::new(nudge_x * step, nudge_y * step, nudge_z as i32);
            if !valid_coords(next.truncate()) {
                sim.release_entity(id);
                return;
            }
            store(sim, id, effect);
            sim.move_entity(id, next);
        }
        MoneyStyle::RedGreen => {
            effect.wiggle = if effect.wiggle == 22 { 0 } else { effect.wiggle + 1 };
            effect.move_delay += 1;
            if effect.move_delay < 2 {
                store(sim, id, effect);
                return;
            }
            effect.move_delay = 0;
            effect.num_movements += 1;
            // One unit of climb per movement. Adding the current z instead
            // would double the label's height every step.
            let next = pos + IVec3::new(nudge_x, nudge_y, 1);
            if !valid_coords(next.truncate()) {
                sim.release_entity(id);
                return;
            }
            store(sim, id, effect);
            sim.move_entity(id, next);
            if effect.num_movements >= RED_GREEN_LIFETIME {
                sim.release_entity(id);
            }
        }
    }
}

fn store(sim: &mut Simulation, id: EntityId, effect: MoneyEffect) {
    if let Some(slot) = sim.entities.get_as_mut::<MoneyEffect>(id) {
        *slot = effect;
    }
}
