//! Sprite pitch and yaw selection from a 3D displacement.
//!
//! Pure functions over the tables in [`crate::trig`]. The result picks which
//! pre-rendered sprite a vehicle body uses, so every bucket boundary is exact.

use crate::error::LocoError;
use crate::trig::{
    bucket_of, fixed_point_ratio, YawTable, PITCH_DOWN_OFFSET, PITCH_NORMAL_THRESHOLDS,
    PITCH_STEEP_THRESHOLDS, YAW_3BIT, YAW_4BIT, YAW_4BIT_PLANE, YAW_5BIT, YAW_6BIT, YAW_7BIT,
};
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Discretised vertical slope of a sprite.
///
/// Odd discriminants are the transition pieces between two slopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Pitch {
    #[default]
    Flat = 0,
    Up6 = 1,
    Up12 = 2,
    Up18 = 3,
    Up25 = 4,
    Down6 = 5,
    Down12 = 6,
    Down18 = 7,
    Down25 = 8,
}

impl Pitch {
    pub fn is_flat(self) -> bool {
        self == Pitch::Flat
    }

    /// True for pieces that connect two different slopes.
    pub fn is_transition(self) -> bool {
        (self as u8) & 1 == 1
    }
}

/// Pitch for each composed index. Index 5 is a downward offset that reached
/// no slope bucket and maps back to flat.
const INDEX_TO_PITCH: [Pitch; 10] = [
    Pitch::Flat,
    Pitch::Up6,
    Pitch::Up12,
    Pitch::Up18,
    Pitch::Up25,
    Pitch::Flat,
    Pitch::Down6,
    Pitch::Down12,
    Pitch::Down18,
    Pitch::Down25,
];

fn pitch_from(horizontal: u16, vertical: i32, thresholds: &[u32]) -> Pitch {
    let mut index = 0;
    if vertical < 0 {
        index = PITCH_DOWN_OFFSET;
    }
    let ratio = fixed_point_ratio(vertical.unsigned_abs(), horizontal as u32);
    index += bucket_of(ratio, thresholds);
    INDEX_TO_PITCH[index]
}

/// Pitch for regular track (flat, 6 and 12 degrees).
pub fn pitch_normal(horizontal: u16, vertical: i32) -> Pitch {
    pitch_from(horizontal, vertical, &PITCH_NORMAL_THRESHOLDS)
}

/// Pitch for vehicles that carry steep-slope sprites (up to 25 degrees).
pub fn pitch_steep(horizontal: u16, vertical: i32) -> Pitch {
    pitch_from(horizontal, vertical, &PITCH_STEEP_THRESHOLDS)
}

/// Select the pitch bucket for a horizontal distance and vertical offset.
pub fn compute_pitch(horizontal: u16, vertical: i32, steep: bool) -> Pitch {
    if steep {
        pitch_steep(horizontal, vertical)
    } else {
        pitch_normal(horizontal, vertical)
    }
}

/// Yaw resolution of a sprite set. The numeric value matches the accuracy
/// byte stored in vehicle object data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum YawAccuracy {
    #[default]
    Bits3 = 0,
    Bits4 = 1,
    Bits5 = 2,
    Bits6 = 3,
    Bits7 = 4,
}

impl YawAccuracy {
    pub fn table(self) -> &'static YawTable {
        match self {
            YawAccuracy::Bits3 => &YAW_3BIT,
            YawAccuracy::Bits4 => &YAW_4BIT,
            YawAccuracy::Bits5 => &YAW_5BIT,
            YawAccuracy::Bits6 => &YAW_6BIT,
            YawAccuracy::Bits7 => &YAW_7BIT,
        }
    }

    /// Number of distinct yaw values this resolution produces.
    pub fn directions(self) -> u32 {
        4 << (self as u32)
    }
}

impl From<YawAccuracy> for u8 {
    fn from(accuracy: YawAccuracy) -> u8 {
        accuracy as u8
    }
}

impl TryFrom<u8> for YawAccuracy {
    type Error = LocoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(YawAccuracy::Bits3),
            1 => Ok(YawAccuracy::Bits4),
            2 => Ok(YawAccuracy::Bits5),
            3 => Ok(YawAccuracy::Bits6),
            4 => Ok(YawAccuracy::Bits7),
            other => Err(LocoError::InvalidYawAccuracy(other)),
        }
    }
}

fn yaw_from(table: &YawTable, dx: i32, dy: i32) -> u8 {
    let mut index = 0;
    if dx < 0 {
        index += table.x_offset();
    }
    if dy < 0 {
        index += table.y_offset();
    }
    let ratio = fixed_point_ratio(dx.unsigned_abs(), dy.unsigned_abs());
    index += bucket_of(ratio, table.thresholds);
    table.index_to_yaw[index]
}

pub fn yaw_3bit(dx: i32, dy: i32) -> u8 {
    yaw_from(&YAW_3BIT, dx, dy)
}

pub fn yaw_4bit(dx: i32, dy: i32) -> u8 {
    yaw_from(&YAW_4BIT, dx, dy)
}

/// Aircraft variant of [`yaw_4bit`] with a much wider diagonal band.
pub fn yaw_4bit_plane(dx: i32, dy: i32) -> u8 {
    yaw_from(&YAW_4BIT_PLANE, dx, dy)
}

pub fn yaw_5bit(dx: i32, dy: i32) -> u8 {
    yaw_from(&YAW_5BIT, dx, dy)
}

pub fn yaw_6bit(dx: i32, dy: i32) -> u8 {
    yaw_from(&YAW_6BIT, dx, dy)
}

pub fn yaw_7bit(dx: i32, dy: i32) -> u8 {
    yaw_from(&YAW_7BIT, dx, dy)
}

/// Select the yaw value (0..=63) for a horizontal displacement.
pub fn compute_yaw(accuracy: YawAccuracy, dx: i32, dy: i32) -> u8 {
    yaw_from(accuracy.table(), dx, dy)
}

/// Sprite-set properties that drive pose selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoseAccuracy {
    pub flat_yaw: YawAccuracy,
    pub sloped_yaw: YawAccuracy,
    pub steep_sprites: bool,
}

/// Orientation chosen for a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpritePose {
    pub pitch: Pitch,
    pub yaw: u8,
}

/// Select pitch then yaw for a body spanning `delta` (front minus back).
///
/// `horizontal` is the horizontal length of `delta`. Transition pitches always
/// use the 4-bit yaw; otherwise the flat or sloped accuracy applies.
pub fn compute_pose(delta: IVec3, horizontal: u16, accuracy: &PoseAccuracy) -> SpritePose {
    let pitch = compute_pitch(horizontal, delta.z, accuracy.steep_sprites);
    let yaw = if pitch.is_transition() {
        yaw_4bit(delta.x, delta.y)
    } else if pitch.is_flat() {
        compute_yaw(accuracy.flat_yaw, delta.x, delta.y)
    } else {
        compute_yaw(accuracy.sloped_yaw, delta.x, delta.y)
    };
    SpritePose { pitch, yaw }
}
