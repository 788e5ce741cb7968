use crate::error::WidgetError;
use crate::widgets::config::{
    parse_hex_color, to_hex_color, BG_COLOR, FONT_FAMILY, FONT_SIZE, HEIGHT, MAX_OPACITY,
    MIN_OPACITY, OPACITY, TEXT_COLOR, WIDTH,
};
use crate::widgets::WidgetConfig;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

pub const LIVE_PREVIEW_DEBOUNCE: Duration = Duration::from_millis(300);
pub const OPACITY_STEP: f32 = 0.1;

const SIZE_RANGE: RangeInclusive<u32> = 40..=4096;
const FONT_SIZE_RANGE: RangeInclusive<u32> = 6..=96;

pub const FONT_FAMILIES: [&str; 5] = ["Segoe UI", "Arial", "Calibri", "Consolas", "Georgia"];

#[derive(Debug, Clone, PartialEq)]
pub struct StyleDraft {
    pub width: String,
    pub height: String,
    pub bg_color: String,
    pub text_color: String,
    pub font_family: String,
    pub font_size: String,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StylePatch {
    pub width: u32,
    pub height: u32,
    pub bg_color: String,
    pub text_color: String,
    pub font_family: String,
    pub font_size: u32,
    pub opacity: f32,
}

impl StyleDraft {
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self {
            width: config.width().to_string(),
            height: config.height().to_string(),
            bg_color: to_hex_color(config.bg_color()),
            text_color: to_hex_color(config.text_color()),
            font_family: config.font_family().to_owned(),
            font_size: (config.font_size().round() as u32).to_string(),
            opacity: config.opacity(),
        }
    }

    pub fn parse(&self) -> Result<StylePatch, WidgetError> {
        let font_family = self.font_family.trim();
        if font_family.is_empty() {
            return Err(WidgetError::invalid("font family", &self.font_family));
        }
        Ok(StylePatch {
            width: parse_bounded("width", &self.width, SIZE_RANGE)?,
            height: parse_bounded("height", &self.height, SIZE_RANGE)?,
            bg_color: parse_color("background color", &self.bg_color)?,
            text_color: parse_color("text color", &self.text_color)?,
            font_family: font_family.to_owned(),
            font_size: parse_bounded("font size", &self.font_size, FONT_SIZE_RANGE)?,
            opacity: clamp_opacity(self.opacity),
        })
    }
}

impl StylePatch {
    pub fn apply_to(&self, base: &WidgetConfig) -> WidgetConfig {
        base.clone()
            .with(WIDTH, self.width)
            .with(HEIGHT, self.height)
            .with(BG_COLOR, self.bg_color.as_str())
            .with(TEXT_COLOR, self.text_color.as_str())
            .with(FONT_FAMILY, self.font_family.as_str())
            .with(FONT_SIZE, self.font_size)
            .with(OPACITY, (f64::from(self.opacity) * 100.0).round() / 100.0)
    }
}

fn parse_bounded(
    field: &'static str,
    raw: &str,
    range: RangeInclusive<u32>,
) -> Result<u32, WidgetError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|value| range.contains(value))
        .ok_or_else(|| WidgetError::invalid(field, raw))
}

fn parse_color(field: &'static str, raw: &str) -> Result<String, WidgetError> {
    parse_hex_color(raw)
        .map(to_hex_color)
        .ok_or_else(|| WidgetError::invalid(field, raw))
}

fn clamp_opacity(opacity: f32) -> f32 {
    if opacity.is_finite() {
        opacity.clamp(MIN_OPACITY, MAX_OPACITY)
    } else {
        MAX_OPACITY
    }
}

#[derive(Debug, Default)]
pub struct Debounce {
    last_edit: Option<Instant>,
}

impl Debounce {
    pub fn touch(&mut self, now: Instant) {
        self.last_edit = Some(now);
    }

    pub fn ready(&mut self, now: Instant, quiet: Duration) -> bool {
        match self.last_edit {
            Some(edited) if now.duration_since(edited) >= quiet => {
                self.last_edit = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self, quiet: Duration) -> Option<Instant> {
        self.last_edit.map(|edited| edited + quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::WidgetKind;
    use serde_json::json;

    fn clock_draft() -> StyleDraft {
        StyleDraft::from_config(&WidgetKind::Clock.default_config())
    }

    #[test]
    fn draft_reflects_current_config() {
        let draft = clock_draft();
        assert_eq!(draft.width, "280");
        assert_eq!(draft.height, "120");
        assert_eq!(draft.bg_color, "#1C1B1F");
        assert_eq!(draft.font_size, "18");
        assert!((draft.opacity - 0.95).abs() < 1e-6);
    }

    #[test]
    fn non_numeric_size_is_rejected() {
        let mut draft = clock_draft();
        draft.width = "wide".to_owned();
        let err = draft.parse().unwrap_err();
        assert!(matches!(err, WidgetError::InvalidInput { field: "width", .. }));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut draft = clock_draft();
        draft.font_size = "400".to_owned();
        assert!(draft.parse().is_err());

        let mut draft = clock_draft();
        draft.height = "0".to_owned();
        assert!(draft.parse().is_err());

        let mut draft = clock_draft();
        draft.text_color = "blue".to_owned();
        assert!(matches!(
            draft.parse().unwrap_err(),
            WidgetError::InvalidInput { field: "text color", .. }
        ));
    }

    #[test]
    fn patch_keeps_kind_specific_keys() {
        let base = WidgetKind::Weather.default_config();
        let mut draft = StyleDraft::from_config(&base);
        draft.width = " 360 ".to_owned();
        draft.bg_color = "#abc".to_owned();
        draft.opacity = 0.333;

        let updated = draft.parse().unwrap().apply_to(&base);
        assert_eq!(updated.width(), 360);
        assert_eq!(updated.get(BG_COLOR), Some(&json!("#AABBCC")));
        assert_eq!(updated.get("location"), Some(&json!("Calgary, AB")));
        assert_eq!(updated.get(OPACITY), Some(&json!(0.33)));
    }

    #[test]
    fn opacity_is_clamped_to_slider_range() {
        assert!((clamp_opacity(0.0) - 0.1).abs() < 1e-6);
        assert!((clamp_opacity(4.0) - 1.0).abs() < 1e-6);
        assert!((clamp_opacity(f32::NAN) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn debounce_waits_for_quiet_period() {
        let start = Instant::now();
        let mut debounce = Debounce::default();
        assert!(!debounce.ready(start, LIVE_PREVIEW_DEBOUNCE));

        debounce.touch(start);
        debounce.touch(start + Duration::from_millis(200));
        assert!(!debounce.ready(start + Duration::from_millis(400), LIVE_PREVIEW_DEBOUNCE));
        assert_eq!(
            debounce.deadline(LIVE_PREVIEW_DEBOUNCE),
            Some(start + Duration::from_millis(500))
        );
        assert!(debounce.ready(start + Duration::from_millis(500), LIVE_PREVIEW_DEBOUNCE));
        assert!(!debounce.ready(start + Duration::from_millis(900), LIVE_PREVIEW_DEBOUNCE));
    }
}
