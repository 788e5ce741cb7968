use crate::error::{PersistenceError, WidgetError};
use crate::pinning::ScreenPos;
use crate::widgets::{WidgetConfig, WidgetKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::Path;

pub const LAYOUT_FILE_NAME: &str = "modern_widget_config.json";
pub const MISSING_COORDINATE: i32 = 100;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedLayout {
    #[serde(default)]
    pub widgets: Vec<LayoutEntry>,
    // Reserved, written empty and ignored on load.
    #[serde(default)]
    pub desktop_positions: Map<String, Value>,
}

/// One element of `widgets`. Anything that is not shaped like a record is kept
/// as raw JSON so a single odd entry never fails the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutEntry {
    Record(LayoutRecord),
    Other(Value),
}

impl LayoutEntry {
    pub fn into_record(self) -> Result<(WidgetKind, LayoutRecord), WidgetError> {
        match self {
            LayoutEntry::Record(record) => {
                let kind = record.widget_kind()?;
                Ok((kind, record))
            }
            LayoutEntry::Other(value) => {
                let type_name = value.get("type").and_then(Value::as_str).unwrap_or_default();
                let kind = WidgetKind::from_type_name(type_name)?;
                Err(WidgetError::invalid("layout record", format!("{kind}: {value}")))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub config: Option<WidgetConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop_x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop_y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

impl LayoutRecord {
    pub fn new(kind: WidgetKind, name: &str, config: &WidgetConfig, pin: Option<ScreenPos>) -> Self {
        Self {
            kind: kind.type_name().to_owned(),
            name: name.to_owned(),
            config: Some(config.clone()),
            desktop_x: pin.map(|pos| pos.x),
            desktop_y: pin.map(|pos| pos.y),
            pinned: pin.map(|_| true),
        }
    }

    pub fn widget_kind(&self) -> Result<WidgetKind, WidgetError> {
        WidgetKind::from_type_name(&self.kind)
    }

    pub fn widget_config(&self, kind: WidgetKind) -> WidgetConfig {
        match &self.config {
            Some(config) if !config.is_empty() => config.clone(),
            _ => kind.default_config(),
        }
    }

    pub fn pin_position(&self) -> Option<ScreenPos> {
        self.pinned.unwrap_or(false).then(|| {
            ScreenPos::new(
                self.desktop_x.unwrap_or(MISSING_COORDINATE),
                self.desktop_y.unwrap_or(MISSING_COORDINATE),
            )
        })
    }
}

impl PersistedLayout {
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string_pretty(self).map_err(PersistenceError::Encode)
    }
}

pub fn read_layout(path: &Path) -> Result<Option<PersistedLayout>, PersistenceError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PersistenceError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| PersistenceError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

pub fn write_layout(path: &Path, layout: &PersistedLayout) -> Result<(), PersistenceError> {
    let json = layout.to_json()?;
    std::fs::write(path, json).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("desk_widgets_layout_{}_{name}", std::process::id()))
    }

    #[test]
    fn pinned_record_without_coordinates_uses_default() {
        let record: LayoutRecord = serde_json::from_value(json!({
            "type": "Clock",
            "name": "Clock #1",
            "config": {},
            "pinned": true,
            "desktop_y": 250
        }))
        .unwrap();
        assert_eq!(record.pin_position(), Some(ScreenPos::new(100, 250)));
        assert_eq!(record.widget_kind().unwrap(), WidgetKind::Clock);
    }

    #[test]
    fn unpinned_record_omits_position_fields() {
        let record = LayoutRecord::new(
            WidgetKind::Todo,
            "Todo List #2",
            &WidgetConfig::new(),
            None,
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"type": "Todo List", "name": "Todo List #2", "config": {}})
        );
        assert_eq!(record.pin_position(), None);
    }

    #[test]
    fn odd_entries_parse_without_failing_the_document() {
        let layout: PersistedLayout = serde_json::from_value(json!({
            "widgets": [
                {"type": "Clock", "name": "Clock #1", "config": null},
                {"type": "Stock Ticker", "symbols": ["ACME"]},
                {"type": "Timer", "config": {}}
            ]
        }))
        .unwrap();
        let mut entries = layout.widgets.into_iter();

        let (kind, record) = entries.next().unwrap().into_record().unwrap();
        assert_eq!(kind, WidgetKind::Clock);
        assert_eq!(record.widget_config(kind), WidgetKind::Clock.default_config());

        let unknown = entries.next().unwrap().into_record().unwrap_err();
        assert!(matches!(unknown, WidgetError::UnknownWidgetType(name) if name == "Stock Ticker"));

        let nameless = entries.next().unwrap().into_record().unwrap_err();
        assert!(matches!(nameless, WidgetError::InvalidInput { .. }));
    }

    #[test]
    fn empty_config_falls_back_to_kind_defaults() {
        let record: LayoutRecord = serde_json::from_value(json!({
            "type": "Weather",
            "name": "Weather #1",
            "config": {}
        }))
        .unwrap();
        let config = record.widget_config(WidgetKind::Weather);
        assert_eq!(config.width(), 300);
        assert_eq!(config, WidgetKind::Weather.default_config());
    }

    #[test]
    fn document_keeps_reserved_section() {
        let layout = PersistedLayout::default();
        let value: Value = serde_json::from_str(&layout.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"widgets": [], "desktop_positions": {}}));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = temp_path("absent.json");
        let _ = std::fs::remove_file(&path);
        assert!(read_layout(&path).unwrap().is_none());
    }

    #[test]
    fn malformed_file_is_reported() {
        let path = temp_path("malformed.json");
        std::fs::write(&path, r#"{"widgets": {"type": "Clock"}}"#).unwrap();
        let err = read_layout(&path).unwrap_err();
        assert!(matches!(err, PersistenceError::Malformed { .. }));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn write_then_read_returns_same_document() {
        let path = temp_path("roundtrip.json");
        let layout = PersistedLayout {
            widgets: vec![LayoutEntry::Record(LayoutRecord::new(
                WidgetKind::Weather,
                "Weather #1",
                &WidgetKind::Weather.default_config(),
                Some(ScreenPos::new(130, 130)),
            ))],
            desktop_positions: Map::new(),
        };
        write_layout(&path, &layout).unwrap();
        assert_eq!(read_layout(&path).unwrap(), Some(layout));
        let _ = std::fs::remove_file(path);
    }
}
