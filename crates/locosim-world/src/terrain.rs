//! Land and water height lookup from surface elements.

use crate::tile::slope;
use crate::tile_grid::TileGrid;
use locosim_core::constants::{MAP_HEIGHT, MAP_WIDTH, OFF_MAP_LAND_HEIGHT};
use locosim_core::types::WorldPos2;

/// Sub-tile extent used by the slope formulas (tile size minus one).
const SUBTILE_MAX: i32 = 31;

/// Heights at a world position, in world units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileHeight {
    pub land: i32,
    /// Zero when the tile is dry.
    pub water: i32,
}

impl TileHeight {
    /// Height of whatever is on top: water if present, otherwise land.
    pub fn top(&self) -> i32 {
        if self.water != 0 {
            self.water.max(self.land)
        } else {
            self.land
        }
    }
}

/// Land height at `pos`, interpolated across the surface slope.
///
/// Positions on or past the last world unit of the map report the default
/// off-map height.
pub fn get_height(grid: &TileGrid, pos: WorldPos2) -> TileHeight {
    let mut height = TileHeight {
        land: OFF_MAP_LAND_HEIGHT,
        water: 0,
    };
    if pos.x < 0 || pos.y < 0 || pos.x >= MAP_WIDTH - 1 || pos.y >= MAP_HEIGHT - 1 {
        return height;
    }
    let Some(tile) = grid.get(pos) else {
        return height;
    };
    let Some(element) = tile.surface_element() else {
        return height;
    };
    let Some(surface) = tile.surface() else {
        return height;
    };

    height.water = surface.water_height();
    height.land = element.base_height();

    let xl = pos.x & 0x1F;
    let yl = pos.y & 0x1F;
    let corners = surface.slope_corners();
    height.land += match corners {
        slope::FLAT => 0,
        slope::N_CORNER | slope::E_CORNER | slope::S_CORNER | slope::W_CORNER => {
            one_corner_up(xl, yl, corners)
        }
        slope::SIDE_NE | slope::SIDE_SE | slope::SIDE_NW | slope::SIDE_SW => {
            one_side_up(xl, yl, corners)
        }
        slope::CORNER_DOWN_N | slope::CORNER_DOWN_E | slope::CORNER_DOWN_S | slope::CORNER_DOWN_W => {
            one_corner_down(xl, yl, corners, surface.is_slope_double_height())
        }
        slope::VALLEY_NS | slope::VALLEY_WE => valley(xl, yl, corners),
        _ => 0,
    };
    height
}

fn one_corner_up(xl: i32, yl: i32, corners: u8) -> i32 {
    let quad = match corners {
        slope::N_CORNER => xl + yl - SUBTILE_MAX,
        slope::E_CORNER => xl - yl,
        slope::S_CORNER => SUBTILE_MAX - yl - xl,
        slope::W_CORNER => yl - xl,
        _ => 0,
    };
    if quad > 0 {
        quad / 2
    } else {
        0
    }
}

fn one_side_up(xl: i32, yl: i32, corners: u8) -> i32 {
    match corners {
        slope::SIDE_NE => xl / 2 + 1,
        slope::SIDE_SE => (SUBTILE_MAX - yl) / 2,
        slope::SIDE_NW => yl / 2 + 1,
        slope::SIDE_SW => (SUBTILE_MAX - xl) / 2,
        _ => 0,
    }
}

/// Three corners up. With the double-height flag the opposite corner rises a
/// second step; otherwise the tile sits one level up and slopes down.
fn one_corner_down(xl: i32, yl: i32, corners: u8, double_height: bool) -> i32 {
    let (quad_extra, quad) = match corners {
        slope::CORNER_DOWN_W => (xl + SUBTILE_MAX - yl, xl - yl),
        slope::CORNER_DOWN_S => (xl + yl, xl + yl - SUBTILE_MAX - 1),
        slope::CORNER_DOWN_E => (SUBTILE_MAX - xl + yl, yl - xl),
        slope::CORNER_DOWN_N => (
            (SUBTILE_MAX - xl) + (SUBTILE_MAX - yl),
            SUBTILE_MAX - yl - xl - 1,
        ),
        _ => (0, 0),
    };
    if double_height {
        quad_extra / 2 + 1
    } else {
        quad / 2 + 16
    }
}

fn valley(xl: i32, yl: i32, corners: u8) -> i32 {
    let quad = match corners {
        slope::VALLEY_WE if xl + yl > SUBTILE_MAX + 1 => SUBTILE_MAX - xl - yl,
        slope::VALLEY_NS => xl - yl,
        _ => 0,
    };
    if quad > 0 {
        quad / 2
    } else {
        0
    }
}
