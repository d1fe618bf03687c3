//! Conversion of dirty world regions into screen rectangles for the renderer.

use locosim_core::config::SimConfig;
use locosim_core::constants::{TILE_INVALIDATE_Z_MAX, TILE_SIZE};
use locosim_core::math::game_to_screen;
use locosim_core::types::{ScreenRect, WorldPos2, ZoomLevel};
use glam::IVec3;
use std::cell::RefCell;
use std::rc::Rc;

/// Screen margin added around an invalidated world area.
pub const DEFAULT_INVALIDATE_RADIUS: i32 = 32;

/// Receives screen regions that must be redrawn. Implemented by the renderer.
pub trait InvalidationSink {
    fn invalidate(&mut self, rect: ScreenRect, zoom: ZoomLevel);
}

/// Discards every region (headless runs).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl InvalidationSink for NullSink {
    fn invalidate(&mut self, _rect: ScreenRect, _zoom: ZoomLevel) {}
}

/// Records regions into a shared log. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    regions: Rc<RefCell<Vec<(ScreenRect, ZoomLevel)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<(ScreenRect, ZoomLevel)> {
        std::mem::take(&mut *self.regions.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.regions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InvalidationSink for RecordingSink {
    fn invalidate(&mut self, rect: ScreenRect, zoom: ZoomLevel) {
        self.regions.borrow_mut().push((rect, zoom));
    }
}

/// A region of the world whose appearance changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyRegion {
    /// An entity sprite's last drawn bounds. `None` means never drawn.
    Sprite {
        bounds: Option<ScreenRect>,
        zoom: ZoomLevel,
    },
    /// A tile-sized column at `pos` between two heights.
    Area {
        pos: WorldPos2,
        z_min: i32,
        z_max: i32,
        zoom: ZoomLevel,
        radius: i32,
    },
}

/// View parameters that affect projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub rotation: u8,
    pub vehicles_min_scale: ZoomLevel,
}

impl From<&SimConfig> for ViewSettings {
    fn from(config: &SimConfig) -> Self {
        Self {
            rotation: config.rotation & 3,
            vehicles_min_scale: config.vehicles_min_scale,
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from(&SimConfig::default())
    }
}

/// Forwards dirty regions to the renderer's sink.
pub struct InvalidationBridge {
    sink: Box<dyn InvalidationSink>,
    view: ViewSettings,
    forwarded: u64,
}

impl InvalidationBridge {
    pub fn new(sink: Box<dyn InvalidationSink>, view: ViewSettings) -> Self {
        Self {
            sink,
            view,
            forwarded: 0,
        }
    }

    pub fn headless() -> Self {
        Self::new(Box::new(NullSink), ViewSettings::default())
    }

    pub fn view(&self) -> ViewSettings {
        self.view
    }

    pub fn rotation(&self) -> u8 {
        self.view.rotation
    }

    pub fn set_rotation(&mut self, rotation: u8) {
        self.view.rotation = rotation & 3;
    }

    /// Number of regions passed to the sink since creation.
    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }

    /// Screen rectangle and zoom for a region, or None if nothing is on screen.
    pub fn screen_rect(&self, region: &DirtyRegion) -> Option<(ScreenRect, ZoomLevel)> {
        match *region {
            DirtyRegion::Sprite { bounds, zoom } => {
                let rect = bounds?;
                Some((rect, self.view.vehicles_min_scale.min(zoom)))
            }
            DirtyRegion::Area {
                pos,
                z_min,
                z_max,
                zoom,
                radius,
            } => {
                let centre_x = pos.x + TILE_SIZE / 2;
                let centre_y = pos.y + TILE_SIZE / 2;
                let top = game_to_screen(IVec3::new(centre_x, centre_y, z_max), self.view.rotation);
                let bottom =
                    game_to_screen(IVec3::new(centre_x, centre_y, z_min), self.view.rotation);
                let rect = ScreenRect::new(
                    top.x - radius,
                    top.y - radius,
                    bottom.x + radius,
                    bottom.y + radius,
                );
                Some((rect, zoom))
            }
        }
    }

    pub fn invalidate(&mut self, region: DirtyRegion) {
        if let Some((rect, zoom)) = self.screen_rect(&region) {
            self.sink.invalidate(rect, zoom);
            self.forwarded += 1;
        }
    }

    pub fn invalidate_sprite(&mut self, bounds: Option<ScreenRect>, zoom: ZoomLevel) {
        self.invalidate(DirtyRegion::Sprite { bounds, zoom });
    }

    pub fn invalidate_area(
        &mut self,
        pos: WorldPos2,
        z_min: i32,
        z_max: i32,
        zoom: ZoomLevel,
        radius: i32,
    ) {
        self.invalidate(DirtyRegion::Area {
            pos,
            z_min,
            z_max,
            zoom,
            radius,
        });
    }

    /// Redraw a whole tile column from the ground to the highest structure.
    pub fn invalidate_tile_full(&mut self, pos: WorldPos2) {
        self.invalidate_area(
            pos,
            0,
            TILE_INVALIDATE_Z_MAX,
            ZoomLevel::Eighth,
            DEFAULT_INVALIDATE_RADIUS,
        );
    }
}
