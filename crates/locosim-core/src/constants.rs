//! Shared world, tile and entity limits.
//! Every crate reads these instead of repeating the literals.

/// Side length of a tile in world units.
pub const TILE_SIZE: i32 = 32;

/// Number of tile rows in the map.
pub const MAP_ROWS: i32 = 384;

/// Number of tile columns in the map.
pub const MAP_COLUMNS: i32 = 384;

/// Row stride of the tile index. Tile slots are addressed as `(y << 9) | x`.
pub const MAP_PITCH: i32 = 512;

/// Shift matching `MAP_PITCH`.
pub const MAP_PITCH_SHIFT: u32 = 9;

/// Map extent along x in world units (384 * 32).
pub const MAP_WIDTH: i32 = MAP_COLUMNS * TILE_SIZE;

/// Map extent along y in world units (384 * 32).
pub const MAP_HEIGHT: i32 = MAP_ROWS * TILE_SIZE;

/// Number of slots in the flat tile index: 512 * 384 = 0x30000.
pub const TILE_INDEX_LEN: usize = (MAP_PITCH * MAP_ROWS) as usize;

/// Number of real tiles on the map.
pub const MAP_TILE_COUNT: usize = (MAP_ROWS * MAP_COLUMNS) as usize;

/// Default capacity of the flat tile element buffer.
pub const MAX_ELEMENTS: usize = 0x6C000;

/// World units per tile element `base_z` step.
pub const SMALL_Z_STEP: i32 = 4;

/// World units per surface water level step (four `base_z` steps).
pub const MICRO_Z_STEP: i32 = 16;

/// `base_z` given to every surface when the map is initialised.
pub const DEFAULT_SURFACE_BASE_Z: u8 = 4;

/// `base_z` written into element slots that no tile references any more.
pub const FREE_ELEMENT_BASE_Z: u8 = 255;

/// Land height reported for positions off the map.
pub const OFF_MAP_LAND_HEIGHT: i32 = 16;

/// Sentinel x coordinate of an entity that is not placed in the world.
pub const LOCATION_NULL: i32 = -1;

/// Total entity slots.
pub const MAX_ENTITIES: usize = 20_000;

/// Slots below this id belong to the general free list; the rest are kept for money effects.
pub const MAX_NORMAL_ENTITIES: usize = 19_800;

/// Slots reserved for money effects.
pub const MAX_MONEY_ENTITIES: usize = MAX_ENTITIES - MAX_NORMAL_ENTITIES;

/// Upper bound on live misc (effect) entities.
pub const MAX_MISC_ENTITIES: usize = 4_000;

/// Buckets in the entity spatial index: one per 512x512 tile slot plus an off-world bucket.
pub const SPATIAL_INDEX_LEN: usize = (MAP_PITCH * MAP_PITCH) as usize + 1;

/// Spatial bucket holding entities without a world position.
pub const SPATIAL_INDEX_NULL: usize = SPATIAL_INDEX_LEN - 1;

/// Default sprite half width of a freshly created entity.
pub const DEFAULT_SPRITE_WIDTH: u8 = 16;

/// Default sprite extent above the anchor of a freshly created entity.
pub const DEFAULT_SPRITE_HEIGHT_NEGATIVE: u8 = 20;

/// Default sprite extent below the anchor of a freshly created entity.
pub const DEFAULT_SPRITE_HEIGHT_POSITIVE: u8 = 8;

/// Height band used when a whole tile is invalidated.
pub const TILE_INVALIDATE_Z_MAX: i32 = 1120;
