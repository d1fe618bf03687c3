use locosim_core::config::SimConfig;
use locosim_core::objects::{ObjectTable, SteamObject, TrainStationObject, VehicleObject};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse steam objects RON: {0}")]
    SteamParseError(String),
    #[error("Failed to parse vehicle objects RON: {0}")]
    VehicleParseError(String),
    #[error("Failed to parse train station objects RON: {0}")]
    StationParseError(String),
    #[error("Failed to parse sim config RON: {0}")]
    ConfigParseError(String),
}

/// Parse a single RON list of steam objects.
pub fn load_steam_from_str(ron_str: &str) -> Result<Vec<SteamObject>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::SteamParseError(e.to_string()))
}

/// Parse a single RON list of vehicle objects.
pub fn load_vehicles_from_str(ron_str: &str) -> Result<Vec<VehicleObject>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::VehicleParseError(e.to_string()))
}

/// Parse a single RON list of train station objects.
pub fn load_stations_from_str(ron_str: &str) -> Result<Vec<TrainStationObject>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::StationParseError(e.to_string()))
}

/// Parse a sim config. Missing fields take their defaults.
pub fn load_config_from_str(ron_str: &str) -> Result<SimConfig, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::ConfigParseError(e.to_string()))
}

/// RON sources for one object pack.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectSources<'a> {
    pub steam: &'a [&'a str],
    pub vehicles: &'a [&'a str],
    pub stations: &'a [&'a str],
}

/// Load and merge every source into a single table.
pub fn load_object_table(sources: &ObjectSources<'_>) -> Result<ObjectTable, LoadError> {
    let mut table = ObjectTable::default();
    for source in sources.steam {
        table.steam.extend(load_steam_from_str(source)?);
    }
    for source in sources.vehicles {
        table.vehicles.extend(load_vehicles_from_str(source)?);
    }
    for source in sources.stations {
        table.train_stations.extend(load_stations_from_str(source)?);
    }
    log::info!(
        "Loaded {} steam, {} vehicle and {} station objects",
        table.steam.len(),
        table.vehicles.len(),
        table.train_stations.len()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use locosim_core::orientation::YawAccuracy;
    use locosim_core::types::ZoomLevel;

    #[test]
    fn test_load_single_steam() {
        let ron = r#"[
            (
                id: 1,
                name: "Steam",
                sprite_width: 20,
                sprite_height_negative: 24,
                sprite_height_positive: 8,
                num_stationary_ticks: 2,
                apply_wind: true,
                frames: [(height: 1), (height: 2, image: 1)],
            ),
        ]"#;
        let steam = load_steam_from_str(ron).expect("should parse");
        assert_eq!(steam.len(), 1);
        assert!(steam[0].apply_wind);
        assert!(!steam[0].disperse_on_collision);
        assert_eq!(steam[0].frames[1].image, 1);
        assert!(steam[0].alt_frames.is_empty());
    }

    #[test]
    fn test_load_vehicle_accuracy_bytes() {
        let ron = r#"[
            (
                id: 4,
                name: "Diesel",
                body_sprites: [
                    (flat_yaw_accuracy: 4, sloped_yaw_accuracy: 2, steep_sprites: true),
                ],
            ),
        ]"#;
        let vehicles = load_vehicles_from_str(ron).expect("should parse");
        let sprite = vehicles[0].body_sprite(0).expect("sprite");
        assert_eq!(sprite.flat_yaw_accuracy, YawAccuracy::Bits7);
        assert_eq!(sprite.sloped_yaw_accuracy, YawAccuracy::Bits5);
        assert_eq!(sprite.sprite_width, 24);
    }

    #[test]
    fn test_yaw_accuracy_out_of_range_rejected() {
        let ron = r#"[
            (id: 4, name: "Broken", body_sprites: [(flat_yaw_accuracy: 9, sloped_yaw_accuracy: 0)]),
        ]"#;
        let err = load_vehicles_from_str(ron).expect_err("should reject");
        assert!(err.to_string().contains("Yaw accuracy 9"));
    }

    #[test]
    fn test_malformed_ron_rejected() {
        assert!(load_steam_from_str(r#"[this is not valid RON {"#).is_err());
        assert!(load_stations_from_str(r#"[(id: 1)]"#).is_err());
    }

    #[test]
    fn test_config_defaults_fill_in() {
        let config = load_config_from_str("(rotation: 2, title_mode: true)").expect("should parse");
        assert_eq!(config.rotation, 2);
        assert!(config.title_mode);
        assert_eq!(config.vehicles_min_scale, ZoomLevel::Half);
        assert_eq!(config.max_elements, SimConfig::default().max_elements);
    }

    #[test]
    fn test_load_object_table_merges() {
        let s1 = r#"[(id: 1, name: "A", sprite_width: 8, sprite_height_negative: 8, sprite_height_positive: 8, num_stationary_ticks: 1, frames: [(height: 1)])]"#;
        let s2 = r#"[(id: 2, name: "B", sprite_width: 8, sprite_height_negative: 8, sprite_height_positive: 8, num_stationary_ticks: 1, frames: [(height: 1)])]"#;
        let stations = r#"[(id: 0, name: "Platform", exhaust_passes: false)]"#;
        let table = load_object_table(&ObjectSources {
            steam: &[s1, s2],
            stations: &[stations],
            ..Default::default()
        })
        .expect("should merge");
        assert_eq!(table.steam.len(), 2);
        assert_eq!(table.train_stations.len(), 1);
        assert!(table.vehicles.is_empty());
    }
}
