//! Vehicle body entities: placement between bogies and sprite pose.

use crate::effects::crash::VehicleCrashParticle;
use crate::effects::particles::ExplosionCloud;
use crate::entity::{EntityKind, SpriteExtents};
use crate::simulation::Simulation;
use glam::IVec3;
use locosim_core::math::{distance_2d, valid_coords};
use locosim_core::orientation::{compute_pose, yaw_4bit_plane, Pitch, SpritePose};
use locosim_core::types::{EntityId, WorldPos};

/// Sprite type of a body that is never drawn.
pub const NO_BODY_SPRITE: u8 = 0xFF;

/// Height above the body at which an explosion is centred.
const EXPLOSION_HEIGHT: i32 = 22;
const MAX_CRASH_PARTICLES: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleBody {
    pub object_id: u16,
    /// Index into the vehicle object's body sprites, or [`NO_BODY_SPRITE`].
    pub sprite_type: u8,
    pub colour_primary: u8,
    pub colour_secondary: u8,
}

impl Default for VehicleBody {
    fn default() -> Self {
        Self {
            object_id: 0,
            sprite_type: NO_BODY_SPRITE,
            colour_primary: 0,
            colour_secondary: 0,
        }
    }
}

impl VehicleBody {
    /// Allocate a body for `object_id`. It stays off-world until its first pose update.
    pub fn spawn(
        sim: &mut Simulation,
        object_id: u16,
        sprite_type: u8,
        colours: (u8, u8),
    ) -> Option<EntityId> {
        let object = sim.objects().vehicle(object_id)?;
        let width = if sprite_type == NO_BODY_SPRITE {
            1
        } else {
            object.body_sprite(sprite_type)?.sprite_width
        };
        let body = VehicleBody {
            object_id,
            sprite_type,
            colour_primary: colours.0,
            colour_secondary: colours.1,
        };
        let id = sim.entities.create_vehicle(EntityKind::VehicleBody(body))?;
        if let Some(e) = sim.entities.get_mut(id) {
            e.sprite = SpriteExtents {
                width,
                ..SpriteExtents::default()
            };
        }
        Some(id)
    }
}

/// Centre the body between its bogies and pick its sprite pose.
///
/// Returns the new pose, or None if `id` is not a live body or the midpoint is
/// off the map. Bodies without a sprite are moved but keep their pose.
pub fn update_body_pose(
    sim: &mut Simulation,
    id: EntityId,
    back: WorldPos,
    front: WorldPos,
) -> Option<SpritePose> {
    let body = sim.entities.get_as::<VehicleBody>(id).copied()?;
    let midpoint = (front + back) / 2;
    if !valid_coords(midpoint.truncate()) {
        return None;
    }

    let accuracy = if body.sprite_type == NO_BODY_SPRITE {
        None
    } else {
        sim.objects()
            .vehicle(body.object_id)
            .and_then(|o| o.body_sprite(body.sprite_type))
            .map(|s| s.pose_accuracy())
    };

    let e = sim.entities.get_mut(id)?;
    let mut pose = SpritePose {
        pitch: e.sprite_pitch,
        yaw: e.sprite_yaw,
    };
    if let Some(accuracy) = accuracy {
        let delta: IVec3 = front - back;
        let horizontal = distance_2d(front, back);
        pose = compute_pose(delta, horizontal, &accuracy);
        e.sprite_pitch = pose.pitch;
        e.sprite_yaw = pose.yaw;
    }
    sim.move_entity(id, midpoint);
    Some(pose)
}

/// Place an aircraft body at `pos` facing along `heading`.
pub fn update_aircraft_pose(
    sim: &mut Simulation,
    id: EntityId,
    pos: WorldPos,
    heading: IVec3,
) -> Option<SpritePose> {
    sim.entities.get_as::<VehicleBody>(id)?;
    if !valid_coords(pos.truncate()) {
        return None;
    }
    let pose = SpritePose {
        pitch: Pitch::Flat,
        yaw: yaw_4bit_plane(heading.x, heading.y),
    };
    let e = sim.entities.get_mut(id)?;
    e.sprite_pitch = pose.pitch;
    e.sprite_yaw = pose.yaw;
    sim.move_entity(id, pos);
    Some(pose)
}

/// Blow up a body: an explosion cloud plus debris scaled to the sprite width.
///
/// Returns the number of debris particles created.
pub fn explode_component(sim: &mut Simulation, id: EntityId) -> usize {
    let Some(body) = sim.entities.get_as::<VehicleBody>(id).copied() else {
        return 0;
    };
    let Some((pos, width)) = sim.entities.get(id).map(|e| (e.position(), e.sprite.width)) else {
        return 0;
    };
    let pos = pos + IVec3::new(0, 0, EXPLOSION_HEIGHT);
    ExplosionCloud::create(sim, pos);

    let count = (width / 4).min(MAX_CRASH_PARTICLES);
    (0..count)
        .filter_map(|_| {
            VehicleCrashParticle::create(sim, pos, (body.colour_primary, body.colour_secondary))
        })
        .count()
}
