use crate::errors::{RoadNetError, RoadNetResult};
use crate::settings::GenerationSettings;
use bevy::log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub mod range_types;

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().and_then(|mut path| {
        path.push("roadnet");
        fs::create_dir_all(&path).ok()?;
        path.push("config.toml");
        Some(path)
    })
}

/// Load settings from the user config directory, falling back to defaults
pub fn load_config() -> GenerationSettings {
    let Some(config_path) = get_config_path() else {
        return GenerationSettings::default();
    };
    if !config_path.exists() {
        return GenerationSettings::default();
    }

    match load_config_from(&config_path) {
        Ok(settings) => {
            info!("Loaded settings from {}", config_path.display());
            settings
        }
        Err(err) => {
            warn!("Ignoring {}: {err}", config_path.display());
            GenerationSettings::default()
        }
    }
}

/// Load and validate settings from an explicit file
pub fn load_config_from(path: &Path) -> RoadNetResult<GenerationSettings> {
    if !path.exists() {
        return Err(RoadNetError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    let settings: GenerationSettings = toml::from_str(&contents)?;
    settings.checked()
}

pub fn save_config(settings: &GenerationSettings) -> RoadNetResult<PathBuf> {
    let config_path = get_config_path().ok_or(RoadNetError::ConfigDirNotFound)?;
    save_config_to(settings, &config_path)?;
    Ok(config_path)
}

pub fn save_config_to(settings: &GenerationSettings, path: &Path) -> RoadNetResult<()> {
    let contents = toml::to_string_pretty(settings)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("roadnet-config-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_is_reported() {
        let path = scratch_path("does-not-exist.toml");
        assert!(matches!(
            load_config_from(&path),
            Err(RoadNetError::ConfigFileNotFound { .. })
        ));
    }

    #[test]
    fn test_saved_settings_load_back() {
        let path = scratch_path("saved.toml");
        let mut settings = GenerationSettings::default();
        settings.path_based.pois = vec![[10, 10], [2, 30]];
        settings.lsystem.iterations = 3;

        save_config_to(&settings, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.path_based.pois, vec![[10, 10], [2, 30]]);
        assert_eq!(loaded.lsystem.iterations, 3);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_file_contents_fail() {
        let path = scratch_path("invalid.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[agent_walk]\nstep_size = -3.0\n").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(RoadNetError::Validation { .. })
        ));

        fs::write(&path, "[agent_walk\n").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(RoadNetError::TomlDeserialize(_))
        ));

        let _ = fs::remove_file(&path);
    }
}
