use glam::{IVec2, IVec3};
use serde::{Deserialize, Serialize};

/// World position in world units. z is a height in world units.
pub type WorldPos = IVec3;

/// Horizontal world position in world units.
pub type WorldPos2 = IVec2;

/// Tile coordinate (world position divided by the tile size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Index of an entity slot in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u16);

impl EntityId {
    /// Terminates entity lists and spatial chains.
    pub const NULL: EntityId = EntityId(u16::MAX);

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

/// Viewport zoom. A region invalidated at a level is redrawn by every
/// viewport zoomed in at least that far.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum ZoomLevel {
    #[default]
    Full = 0,
    Half = 1,
    Quarter = 2,
    Eighth = 3,
}

/// Screen-space rectangle, inclusive of left/top, exclusive of right/bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &ScreenRect) -> ScreenRect {
        ScreenRect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}
