pub mod defaults;
pub mod loader;
pub mod validator;

pub use loader::{LoadError, ObjectSources};
use locosim_core::config::SimConfig;
use locosim_core::objects::ObjectTable;

/// Load the built-in object pack.
pub fn load_builtin_objects() -> Result<ObjectTable, LoadError> {
    loader::load_object_table(&ObjectSources {
        steam: &[defaults::STEAM_RON],
        vehicles: &[defaults::VEHICLES_RON],
        stations: &[defaults::STATIONS_RON],
    })
}

/// Load the built-in sim config.
pub fn load_builtin_config() -> Result<SimConfig, LoadError> {
    loader::load_config_from_str(defaults::CONFIG_RON)
}

/// Load objects and report validation failures as log errors.
///
/// Invalid objects are kept; callers decide whether to abort.
pub fn load_and_validate(sources: &ObjectSources<'_>) -> Result<(ObjectTable, Vec<String>), LoadError> {
    let table = loader::load_object_table(sources)?;
    let problems: Vec<String> = match validator::validate_objects(&table) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    };
    for problem in &problems {
        log::error!("Object validation: {problem}");
    }
    Ok((table, problems))
}
