use eframe::egui::Color32;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
pub const BG_COLOR: &str = "bg_color";
pub const TEXT_COLOR: &str = "text_color";
pub const ACCENT_COLOR: &str = "accent_color";
pub const SURFACE_COLOR: &str = "surface_color";
pub const FONT_FAMILY: &str = "font_family";
pub const FONT_SIZE: &str = "font_size";
pub const OPACITY: &str = "opacity";
pub const CORNER_RADIUS: &str = "corner_radius";
pub const FORMAT_12H: &str = "format_12h";
pub const LOCATION: &str = "location";
pub const MAX_ITEMS: &str = "max_items";

pub const MIN_OPACITY: f32 = 0.1;
pub const MAX_OPACITY: f32 = 1.0;

// Ordered option map of a widget. Keys it does not know about are carried
// through untouched so older or hand-edited layouts survive a round trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetConfig(Map<String, Value>);

impl WidgetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_owned(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn u32_or(&self, key: &str, default: u32) -> u32 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .or_else(|| {
                    n.as_f64()
                        .filter(|v| v.is_finite() && *v >= 0.0 && *v <= f64::from(u32::MAX))
                        .map(|v| v.round() as u32)
                })
                .unwrap_or(default),
            _ => default,
        }
    }

    pub fn f32_or(&self, key: &str, default: f32) -> f32 {
        self.0
            .get(key)
            .and_then(Value::as_f64)
            .map(|v| v as f32)
            .filter(|v| v.is_finite())
            .unwrap_or(default)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.0.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    pub fn color_or(&self, key: &str, default: Color32) -> Color32 {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .and_then(parse_hex_color)
            .unwrap_or(default)
    }

    pub fn width(&self) -> u32 {
        self.u32_or(WIDTH, 200).max(1)
    }

    pub fn height(&self) -> u32 {
        self.u32_or(HEIGHT, 100).max(1)
    }

    pub fn opacity(&self) -> f32 {
        self.f32_or(OPACITY, 0.9).clamp(MIN_OPACITY, MAX_OPACITY)
    }

    pub fn font_size(&self) -> f32 {
        self.f32_or(FONT_SIZE, 12.0).clamp(6.0, 96.0)
    }

    pub fn font_family(&self) -> &str {
        self.str_or(FONT_FAMILY, "Segoe UI")
    }

    pub fn bg_color(&self) -> Color32 {
        self.color_or(BG_COLOR, Color32::WHITE)
    }

    pub fn text_color(&self) -> Color32 {
        self.color_or(TEXT_COLOR, Color32::from_rgb(0x1C, 0x1B, 0x1F))
    }

    pub fn accent_color(&self) -> Color32 {
        self.color_or(ACCENT_COLOR, Color32::from_rgb(0x67, 0x50, 0xA4))
    }

    pub fn corner_radius(&self) -> f32 {
        self.f32_or(CORNER_RADIUS, 12.0).max(0.0)
    }
}

pub fn parse_hex_color(raw: &str) -> Option<Color32> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let expand = |s: &str| channel(s).map(|v| v * 17);
            Some(Color32::from_rgb(
                expand(&hex[0..1])?,
                expand(&hex[1..2])?,
                expand(&hex[2..3])?,
            ))
        }
        _ => None,
    }
}

pub fn to_hex_color(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}
