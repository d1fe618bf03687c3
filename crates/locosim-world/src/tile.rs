//! Typed tile elements stacked on each map tile.

use locosim_core::constants::{FREE_ELEMENT_BASE_Z, MICRO_Z_STEP, SMALL_Z_STEP};

/// Kind tag of a tile element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementType {
    Surface = 0,
    Track = 1,
    Station = 2,
    Signal = 3,
    Building = 4,
    Tree = 5,
    Wall = 6,
    Road = 7,
    Industry = 8,
}

/// Surface corner bits and the double-height flag.
pub mod slope {
    pub const FLAT: u8 = 0;
    pub const N_CORNER: u8 = 1 << 0;
    pub const E_CORNER: u8 = 1 << 1;
    pub const S_CORNER: u8 = 1 << 2;
    pub const W_CORNER: u8 = 1 << 3;
    pub const CORNERS_MASK: u8 = 0x0F;
    /// One corner down with the opposite corner raised a second step.
    pub const DOUBLE_HEIGHT: u8 = 1 << 4;

    pub const SIDE_NE: u8 = N_CORNER | E_CORNER;
    pub const SIDE_SE: u8 = E_CORNER | S_CORNER;
    pub const SIDE_SW: u8 = S_CORNER | W_CORNER;
    pub const SIDE_NW: u8 = N_CORNER | W_CORNER;

    pub const CORNER_DOWN_W: u8 = N_CORNER | E_CORNER | S_CORNER;
    pub const CORNER_DOWN_N: u8 = E_CORNER | S_CORNER | W_CORNER;
    pub const CORNER_DOWN_E: u8 = N_CORNER | S_CORNER | W_CORNER;
    pub const CORNER_DOWN_S: u8 = N_CORNER | E_CORNER | W_CORNER;

    pub const VALLEY_WE: u8 = N_CORNER | S_CORNER;
    pub const VALLEY_NS: u8 = E_CORNER | W_CORNER;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceElement {
    /// Corner bits plus [`slope::DOUBLE_HEIGHT`].
    pub slope: u8,
    /// Water level in micro-z steps; zero means dry.
    pub water: u8,
    pub terrain: u8,
    pub industrial: bool,
}

impl SurfaceElement {
    pub fn slope_corners(&self) -> u8 {
        self.slope & slope::CORNERS_MASK
    }

    pub fn is_slope_double_height(&self) -> bool {
        self.slope & slope::DOUBLE_HEIGHT != 0
    }

    /// Water surface height in world units.
    pub fn water_height(&self) -> i32 {
        (self.water & 0x1F) as i32 * MICRO_Z_STEP
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackElement {
    pub track_id: u8,
    pub object_id: u8,
    pub sequence_index: u8,
    pub owner: u8,
    /// The next element in the stack is this piece's station platform.
    pub has_station: bool,
    pub has_signal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StationElement {
    pub object_id: u8,
    pub station_id: u16,
    pub multi_tile_index: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalElement {
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildingElement {
    pub object_id: u8,
    pub multi_tile_index: u8,
    pub construction_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeElement {
    pub object_id: u8,
    pub growth: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallElement {
    pub object_id: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoadElement {
    pub road_id: u8,
    pub object_id: u8,
    pub sequence_index: u8,
    pub owner: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndustryElement {
    pub industry_id: u8,
    pub multi_tile_index: u8,
}

/// Kind-specific payload of a tile element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Surface(SurfaceElement),
    Track(TrackElement),
    Station(StationElement),
    Signal(SignalElement),
    Building(BuildingElement),
    Tree(TreeElement),
    Wall(WallElement),
    Road(RoadElement),
    Industry(IndustryElement),
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Surface(_) => ElementType::Surface,
            ElementKind::Track(_) => ElementType::Track,
            ElementKind::Station(_) => ElementType::Station,
            ElementKind::Signal(_) => ElementType::Signal,
            ElementKind::Building(_) => ElementType::Building,
            ElementKind::Tree(_) => ElementType::Tree,
            ElementKind::Wall(_) => ElementType::Wall,
            ElementKind::Road(_) => ElementType::Road,
            ElementKind::Industry(_) => ElementType::Industry,
        }
    }
}

/// Payload types that can be narrowed out of an [`ElementKind`].
pub trait ElementVariant: Sized {
    const TYPE: ElementType;

    fn narrow(kind: &ElementKind) -> Option<&Self>;
    fn narrow_mut(kind: &mut ElementKind) -> Option<&mut Self>;
}

macro_rules! element_variant {
    ($payload:ident, $variant:ident) => {
        impl ElementVariant for $payload {
            const TYPE: ElementType = ElementType::$variant;

            fn narrow(kind: &ElementKind) -> Option<&Self> {
                match kind {
                    ElementKind::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn narrow_mut(kind: &mut ElementKind) -> Option<&mut Self> {
                match kind {
                    ElementKind::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

element_variant!(SurfaceElement, Surface);
element_variant!(TrackElement, Track);
element_variant!(StationElement, Station);
element_variant!(SignalElement, Signal);
element_variant!(BuildingElement, Building);
element_variant!(TreeElement, Tree);
element_variant!(WallElement, Wall);
element_variant!(RoadElement, Road);
element_variant!(IndustryElement, Industry);

/// One record in a tile's element stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileElement {
    pub kind: ElementKind,
    /// Bottom of the element in small-z steps.
    pub base_z: u8,
    /// Top of the element's clearance in small-z steps.
    pub clear_z: u8,
    /// Quarter turns, 0..=3.
    pub rotation: u8,
    /// Construction preview; ignored by collision.
    pub ghost: bool,
    /// Ignored by exhaust collision.
    pub flag5: bool,
    pub flag6: bool,
    /// Terminates the stack. Only the grid writes it.
    last: bool,
}

impl TileElement {
    pub fn new(kind: ElementKind, base_z: u8, clear_z: u8) -> Self {
        Self {
            kind,
            base_z,
            clear_z,
            rotation: 0,
            ghost: false,
            flag5: false,
            flag6: false,
            last: false,
        }
    }

    /// Flat grass surface at `base_z`.
    pub fn surface(base_z: u8, terrain: u8) -> Self {
        Self::new(
            ElementKind::Surface(SurfaceElement {
                terrain,
                ..Default::default()
            }),
            base_z,
            base_z,
        )
    }

    pub fn with_rotation(mut self, rotation: u8) -> Self {
        self.rotation = rotation & 3;
        self
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn is_last(&self) -> bool {
        self.last
    }

    pub(crate) fn set_last(&mut self, last: bool) {
        self.last = last;
    }

    /// Height of the element's base in world units.
    pub fn base_height(&self) -> i32 {
        self.base_z as i32 * SMALL_Z_STEP
    }

    /// Height of the element's clearance in world units.
    pub fn clear_height(&self) -> i32 {
        self.clear_z as i32 * SMALL_Z_STEP
    }

    pub(crate) fn is_free(&self) -> bool {
        self.base_z == FREE_ELEMENT_BASE_Z
    }

    pub(crate) fn mark_free(&mut self) {
        self.base_z = FREE_ELEMENT_BASE_Z;
        self.last = true;
    }

    /// Typed view of the payload, or None if the kind differs.
    pub fn as_variant<T: ElementVariant>(&self) -> Option<&T> {
        T::narrow(&self.kind)
    }

    pub fn as_variant_mut<T: ElementVariant>(&mut self) -> Option<&mut T> {
        T::narrow_mut(&mut self.kind)
    }

    pub fn is<T: ElementVariant>(&self) -> bool {
        self.element_type() == T::TYPE
    }
}
