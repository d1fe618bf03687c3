use locosim_core::config::SimConfig;
use locosim_core::constants::{MAP_TILE_COUNT, MAX_ELEMENTS};
use locosim_core::objects::ObjectTable;
use std::collections::HashSet;
use thiserror::Error;

/// Highest steam object id; bit 7 of an exhaust's type is the alternate-frames flag.
pub const MAX_STEAM_ID: u8 = 0x7F;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Duplicate steam object ID {0}")]
    DuplicateSteamId(u8),
    #[error("Duplicate vehicle object ID {0}")]
    DuplicateVehicleId(u16),
    #[error("Duplicate train station object ID {0}")]
    DuplicateStationId(u8),
    #[error("Steam object '{name}' ID {id} exceeds max {max}")]
    SteamIdTooLarge { name: String, id: u8, max: u8 },
    #[error("Steam object '{name}' has no frames")]
    EmptyFrames { name: String },
    #[error("Vehicle object '{name}' has no body sprites")]
    NoBodySprites { name: String },
    #[error("Vehicle object '{name}' body sprite {index} has zero width")]
    ZeroSpriteWidth { name: String, index: usize },
    #[error("Config rotation {0} is not in 0..=3")]
    InvalidRotation(u8),
    #[error("Config max_elements {value} outside {min}..={max}")]
    InvalidElementCapacity { value: usize, min: usize, max: usize },
}

/// Validate every object in a table.
pub fn validate_objects(table: &ObjectTable) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen_steam = HashSet::new();
    for obj in &table.steam {
        if !seen_steam.insert(obj.id) {
            errors.push(ValidationError::DuplicateSteamId(obj.id));
        }
        if obj.id > MAX_STEAM_ID {
            errors.push(ValidationError::SteamIdTooLarge {
                name: obj.name.clone(),
                id: obj.id,
                max: MAX_STEAM_ID,
            });
        }
        if obj.frames.is_empty() {
            errors.push(ValidationError::EmptyFrames {
                name: obj.name.clone(),
            });
        }
    }

    let mut seen_vehicles = HashSet::new();
    for obj in &table.vehicles {
        if !seen_vehicles.insert(obj.id) {
            errors.push(ValidationError::DuplicateVehicleId(obj.id));
        }
        if obj.body_sprites.is_empty() {
            errors.push(ValidationError::NoBodySprites {
                name: obj.name.clone(),
            });
        }
        for (index, sprite) in obj.body_sprites.iter().enumerate() {
            if sprite.sprite_width == 0 {
                errors.push(ValidationError::ZeroSpriteWidth {
                    name: obj.name.clone(),
                    index,
                });
            }
        }
    }

    let mut seen_stations = HashSet::new();
    for obj in &table.train_stations {
        if !seen_stations.insert(obj.id) {
            errors.push(ValidationError::DuplicateStationId(obj.id));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a sim config.
pub fn validate_config(config: &SimConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.rotation > 3 {
        errors.push(ValidationError::InvalidRotation(config.rotation));
    }
    if !(MAP_TILE_COUNT..=MAX_ELEMENTS).contains(&config.max_elements) {
        errors.push(ValidationError::InvalidElementCapacity {
            value: config.max_elements,
            min: MAP_TILE_COUNT,
            max: MAX_ELEMENTS,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
