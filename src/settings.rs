use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::viz::{BuildOptions, ExportOptions};

/// Environment variable naming a JSON settings file.
pub const SETTINGS_ENV: &str = "RUSTY_LENS_SETTINGS";

/// User-tunable settings. Every field has a default, so a partial file is fine:
///
/// ```json
/// { "export": { "width": 1600 }, "charts": { "histogram_bins": 20 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub export: ExportOptions,
    pub charts: BuildOptions,
}

impl Settings {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Read settings from `path`, falling back to defaults (with a warning)
    /// when the file is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Cannot read settings {}: {e}; using defaults", path.display());
                return Settings::default();
            }
        };
        match Settings::from_json(&text) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings {}: {e}; using defaults", path.display());
                Settings::default()
            }
        }
    }

    /// Settings from the file named by [`SETTINGS_ENV`], or defaults.
    pub fn from_env() -> Self {
        match std::env::var_os(SETTINGS_ENV) {
            Some(path) => Settings::load_or_default(Path::new(&path)),
            None => Settings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let s = Settings::from_json(r#"{ "charts": { "histogram_bins": 12 } }"#).unwrap();
        assert_eq!(s.charts.histogram_bins, Some(12));
        assert_eq!(s.export, ExportOptions::default());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let s = Settings::load_or_default(Path::new("/no/such/settings.json"));
        assert_eq!(s, Settings::default());
    }
}
