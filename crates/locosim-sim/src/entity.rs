//! Entity records: a common header plus a tagged, kind-specific payload.

use crate::effects::crash::VehicleCrashParticle;
use crate::effects::exhaust::Exhaust;
use crate::effects::money::MoneyEffect;
use crate::effects::particles::{ExplosionCloud, ExplosionSmoke, Fireball, Smoke, Splash};
use crate::vehicle::VehicleBody;
use glam::IVec3;
use locosim_core::constants::{
    DEFAULT_SPRITE_HEIGHT_NEGATIVE, DEFAULT_SPRITE_HEIGHT_POSITIVE, DEFAULT_SPRITE_WIDTH,
    LOCATION_NULL,
};
use locosim_core::orientation::Pitch;
use locosim_core::types::{EntityId, ScreenRect, WorldPos};

/// Broad class of an entity slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityBaseType {
    /// Slot is on a free list.
    Null,
    Vehicle,
    Misc,
}

/// Intrusive lists every slot belongs to exactly one of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityList {
    /// Free slots for general use.
    Null = 0,
    /// Free slots reserved for money effects.
    NullMoney = 1,
    Vehicle = 2,
    Misc = 3,
}

pub const LIST_COUNT: usize = 4;

/// Sub-kind of a misc entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MiscEntityType {
    Exhaust = 0,
    RedGreenCurrency = 1,
    WindowCurrency = 2,
    VehicleCrashParticle = 3,
    ExplosionCloud = 4,
    Splash = 5,
    Fireball = 6,
    ExplosionSmoke = 7,
    Smoke = 8,
}

/// Screen-space sprite extents around the projected anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteExtents {
    pub width: u8,
    pub height_negative: u8,
    pub height_positive: u8,
}

impl SpriteExtents {
    pub const fn new(width: u8, height_negative: u8, height_positive: u8) -> Self {
        Self {
            width,
            height_negative,
            height_positive,
        }
    }
}

impl Default for SpriteExtents {
    fn default() -> Self {
        Self::new(
            DEFAULT_SPRITE_WIDTH,
            DEFAULT_SPRITE_HEIGHT_NEGATIVE,
            DEFAULT_SPRITE_HEIGHT_POSITIVE,
        )
    }
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Free,
    VehicleBody(VehicleBody),
    Exhaust(Exhaust),
    Money(MoneyEffect),
    CrashParticle(VehicleCrashParticle),
    ExplosionCloud(ExplosionCloud),
    Splash(Splash),
    Fireball(Fireball),
    ExplosionSmoke(ExplosionSmoke),
    Smoke(Smoke),
}

impl EntityKind {
    pub fn base_type(&self) -> EntityBaseType {
        match self {
            EntityKind::Free => EntityBaseType::Null,
            EntityKind::VehicleBody(_) => EntityBaseType::Vehicle,
            _ => EntityBaseType::Misc,
        }
    }

    pub fn misc_type(&self) -> Option<MiscEntityType> {
        Some(match self {
            EntityKind::Exhaust(_) => MiscEntityType::Exhaust,
            EntityKind::Money(m) => m.misc_type(),
            EntityKind::CrashParticle(_) => MiscEntityType::VehicleCrashParticle,
            EntityKind::ExplosionCloud(_) => MiscEntityType::ExplosionCloud,
            EntityKind::Splash(_) => MiscEntityType::Splash,
            EntityKind::Fireball(_) => MiscEntityType::Fireball,
            EntityKind::ExplosionSmoke(_) => MiscEntityType::ExplosionSmoke,
            EntityKind::Smoke(_) => MiscEntityType::Smoke,
            EntityKind::Free | EntityKind::VehicleBody(_) => return None,
        })
    }
}

/// Payload types that can be narrowed out of an [`EntityKind`].
pub trait EntityVariant: Sized {
    fn narrow(kind: &EntityKind) -> Option<&Self>;
    fn narrow_mut(kind: &mut EntityKind) -> Option<&mut Self>;
}

macro_rules! entity_variant {
    ($payload:ident, $variant:ident) => {
        impl EntityVariant for $payload {
            fn narrow(kind: &EntityKind) -> Option<&Self> {
                match kind {
                    EntityKind::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn narrow_mut(kind: &mut EntityKind) -> Option<&mut Self> {
                match kind {
                    EntityKind::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

entity_variant!(VehicleBody, VehicleBody);
entity_variant!(Exhaust, Exhaust);
entity_variant!(MoneyEffect, Money);
entity_variant!(VehicleCrashParticle, CrashParticle);
entity_variant!(ExplosionCloud, ExplosionCloud);
entity_variant!(Splash, Splash);
entity_variant!(Fireball, Fireball);
entity_variant!(ExplosionSmoke, ExplosionSmoke);
entity_variant!(Smoke, Smoke);

/// One pool slot.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    position: WorldPos,
    kind: EntityKind,
    pub sprite: SpriteExtents,
    sprite_bounds: Option<ScreenRect>,
    pub sprite_yaw: u8,
    pub sprite_pitch: Pitch,
    pub owner: u8,
    pub(crate) list: EntityList,
    pub(crate) next_in_list: EntityId,
    pub(crate) prev_in_list: EntityId,
    pub(crate) next_quadrant: EntityId,
}

impl Entity {
    pub(crate) fn vacant(id: EntityId, list: EntityList) -> Self {
        Self {
            id,
            position: IVec3::new(LOCATION_NULL, 0, 0),
            kind: EntityKind::Free,
            sprite: SpriteExtents::default(),
            sprite_bounds: None,
            sprite_yaw: 0,
            sprite_pitch: Pitch::Flat,
            owner: 0,
            list,
            next_in_list: EntityId::NULL,
            prev_in_list: EntityId::NULL,
            next_quadrant: EntityId::NULL,
        }
    }

    /// Clear everything but the list links.
    pub(crate) fn clear(&mut self, kind: EntityKind) {
        self.position = IVec3::new(LOCATION_NULL, 0, 0);
        self.kind = kind;
        self.sprite = SpriteExtents::default();
        self.sprite_bounds = None;
        self.sprite_yaw = 0;
        self.sprite_pitch = Pitch::Flat;
        self.owner = 0;
        self.next_quadrant = EntityId::NULL;
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn base_type(&self) -> EntityBaseType {
        self.kind.base_type()
    }

    pub fn is_live(&self) -> bool {
        self.base_type() != EntityBaseType::Null
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn misc_type(&self) -> Option<MiscEntityType> {
        self.kind.misc_type()
    }

    pub fn position(&self) -> WorldPos {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: WorldPos) {
        self.position = position;
    }

    /// True when the entity has no world position.
    pub fn is_off_world(&self) -> bool {
        self.position.x == LOCATION_NULL
    }

    /// Bounds of the sprite as last placed; None until placed in the world.
    pub fn sprite_bounds(&self) -> Option<ScreenRect> {
        self.sprite_bounds
    }

    pub(crate) fn set_sprite_bounds(&mut self, bounds: Option<ScreenRect>) {
        self.sprite_bounds = bounds;
    }

    pub fn list(&self) -> EntityList {
        self.list
    }

    /// Typed view of the payload, or None if the tag differs.
    pub fn as_variant<T: EntityVariant>(&self) -> Option<&T> {
        T::narrow(&self.kind)
    }

    pub fn as_variant_mut<T: EntityVariant>(&mut self) -> Option<&mut T> {
        T::narrow_mut(&mut self.kind)
    }
}
