use crate::branding::APP_ID;
use crate::layout::LAYOUT_FILE_NAME;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    #[serde(default)]
    pub last_pos: Option<(f32, f32)>,
    #[serde(default)]
    pub last_size: Option<(f32, f32)>,
    #[serde(default)]
    pub layout_path: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_autoload_layout")]
    pub autoload_layout: bool,
    #[serde(default = "default_preview_canvas")]
    pub preview_canvas: (f32, f32),
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_autoload_layout() -> bool {
    true
}

fn default_preview_canvas() -> (f32, f32) {
    (960.0, 540.0)
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            last_pos: None,
            last_size: None,
            layout_path: None,
            log_level: default_log_level(),
            autoload_layout: default_autoload_layout(),
            preview_canvas: default_preview_canvas(),
        }
    }
}

impl AppSettings {
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", APP_ID, APP_ID)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn load() -> Self {
        match Self::config_dir() {
            Some(dir) => Self::load_from(&dir.join(CONFIG_FILE_NAME)),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::File::open(path) {
            Ok(file) => match serde_json::from_reader(file) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("Failed to parse settings {}: {err}, using default", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                warn!("Failed to open settings {}: {err}, using default", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        let Some(dir) = Self::config_dir() else {
            return;
        };
        if let Err(err) = std::fs::create_dir_all(&dir) {
            warn!("Failed to create settings dir {}: {err}", dir.display());
            return;
        }
        self.save_to(&dir.join(CONFIG_FILE_NAME));
    }

    pub fn save_to(&self, path: &Path) {
        let written = std::fs::File::create(path)
            .map_err(|err| err.to_string())
            .and_then(|file| {
                serde_json::to_writer_pretty(file, self).map_err(|err| err.to_string())
            });
        if let Err(err) = written {
            warn!("Failed to save settings {}: {err}", path.display());
        }
    }

    pub fn layout_path(&self) -> PathBuf {
        self.layout_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(LAYOUT_FILE_NAME))
    }

    pub fn preview_canvas_size(&self) -> (f64, f64) {
        let (w, h) = self.preview_canvas;
        (
            sanitize_canvas_dimension(w, 960.0),
            sanitize_canvas_dimension(h, 540.0),
        )
    }
}

fn sanitize_canvas_dimension(value: f32, fallback: f64) -> f64 {
    if !value.is_finite() || value < 160.0 {
        return fallback;
    }
    f64::from(value.min(3840.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("desk_widgets_settings_{}_{name}", std::process::id()))
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"last_pos": [10.0, 20.0]}"#).unwrap();
        assert_eq!(settings.last_pos, Some((10.0, 20.0)));
        assert_eq!(settings.log_level, "info");
        assert!(settings.autoload_layout);
        assert_eq!(settings.layout_path(), PathBuf::from(LAYOUT_FILE_NAME));
    }

    #[test]
    fn unreadable_file_falls_back_to_default() {
        let path = temp_file("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let path = temp_file("roundtrip.json");
        let settings = AppSettings {
            last_size: Some((900.0, 640.0)),
            layout_path: Some(PathBuf::from("custom.json")),
            autoload_layout: false,
            ..AppSettings::default()
        };
        settings.save_to(&path);
        assert_eq!(AppSettings::load_from(&path), settings);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn tiny_canvas_is_replaced() {
        let settings = AppSettings {
            preview_canvas: (20.0, f32::NAN),
            ..AppSettings::default()
        };
        assert_eq!(settings.preview_canvas_size(), (960.0, 540.0));
    }
}
