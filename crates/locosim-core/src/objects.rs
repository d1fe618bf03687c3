use crate::orientation::{PoseAccuracy, YawAccuracy};
use serde::{Deserialize, Serialize};

/// One animation step of an exhaust puff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteamFrame {
    /// Height gained when the puff advances to this frame (world units).
    pub height: i8,
    /// Image offset within the steam object's sprite sheet.
    #[serde(default)]
    pub image: u8,
}

/// Exhaust (steam, diesel smoke, sparks) definition loaded from RON data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteamObject {
    /// Object slot. Exhaust entities address it with the low seven bits of their type.
    pub id: u8,
    pub name: String,
    /// Sprite half width in screen units.
    pub sprite_width: u8,
    /// Sprite extent above the anchor.
    pub sprite_height_negative: u8,
    /// Sprite extent below the anchor.
    pub sprite_height_positive: u8,
    /// Ticks a frame is held before the puff advances.
    pub num_stationary_ticks: u8,
    /// Drift the puff along x with the wind.
    #[serde(default)]
    pub apply_wind: bool,
    /// Remove the puff when it touches a tile element.
    #[serde(default)]
    pub disperse_on_collision: bool,
    /// Frame sequence for the primary variant.
    pub frames: Vec<SteamFrame>,
    /// Frame sequence for the alternate variant (type bit 7 set). Falls back to `frames`.
    #[serde(default)]
    pub alt_frames: Vec<SteamFrame>,
}

impl SteamObject {
    pub fn frames(&self, alternate: bool) -> &[SteamFrame] {
        if alternate && !self.alt_frames.is_empty() {
            &self.alt_frames
        } else {
            &self.frames
        }
    }
}

/// Sprite-set description for one body of a vehicle object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodySprite {
    pub flat_yaw_accuracy: YawAccuracy,
    pub sloped_yaw_accuracy: YawAccuracy,
    #[serde(default)]
    pub steep_sprites: bool,
    /// Sprite half width used for the body entity.
    #[serde(default = "default_body_width")]
    pub sprite_width: u8,
}

fn default_body_width() -> u8 {
    24
}

impl BodySprite {
    pub fn pose_accuracy(&self) -> PoseAccuracy {
        PoseAccuracy {
            flat_yaw: self.flat_yaw_accuracy,
            sloped_yaw: self.sloped_yaw_accuracy,
            steep_sprites: self.steep_sprites,
        }
    }
}

/// Vehicle definition loaded from RON data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleObject {
    pub id: u16,
    pub name: String,
    pub body_sprites: Vec<BodySprite>,
}

impl VehicleObject {
    pub fn body_sprite(&self, sprite_type: u8) -> Option<&BodySprite> {
        self.body_sprites.get(sprite_type as usize)
    }
}

/// Train station definition loaded from RON data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainStationObject {
    pub id: u8,
    pub name: String,
    /// Exhaust passes through platforms of this station instead of dispersing.
    #[serde(default)]
    pub exhaust_passes: bool,
}

/// Read access to loaded object metadata.
pub trait ObjectProvider {
    fn steam(&self, id: u8) -> Option<&SteamObject>;
    fn vehicle(&self, id: u16) -> Option<&VehicleObject>;
    fn train_station(&self, id: u8) -> Option<&TrainStationObject>;
}

/// All loaded objects, looked up by id.
#[derive(Debug, Clone, Default)]
pub struct ObjectTable {
    pub steam: Vec<SteamObject>,
    pub vehicles: Vec<VehicleObject>,
    pub train_stations: Vec<TrainStationObject>,
}

impl ObjectTable {
    /// Total number of objects of every kind.
    pub fn len(&self) -> usize {
        self.steam.len() + self.vehicles.len() + self.train_stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectProvider for ObjectTable {
    fn steam(&self, id: u8) -> Option<&SteamObject> {
        self.steam.iter().find(|o| o.id == id)
    }

    fn vehicle(&self, id: u16) -> Option<&VehicleObject> {
        self.vehicles.iter().find(|o| o.id == id)
    }

    fn train_station(&self, id: u8) -> Option<&TrainStationObject> {
        self.train_stations.iter().find(|o| o.id == id)
    }
}
