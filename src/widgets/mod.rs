pub mod clock;
pub mod config;
pub mod timer;
pub mod todo;
pub mod weather;

use crate::error::WidgetError;
use crate::notify::Notice;
use chrono::NaiveDateTime;
use eframe::egui;
use std::fmt;
use std::time::Duration;

pub use clock::ClockFace;
pub use config::WidgetConfig;
pub use timer::Countdown;
pub use todo::TodoList;
pub use weather::WeatherPanel;

const PANEL_MARGIN: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Refresh {
    pub next: Option<Duration>,
    pub notice: Option<Notice>,
}

impl Refresh {
    pub fn every(interval: Duration) -> Self {
        Self {
            next: Some(interval),
            notice: None,
        }
    }
}

pub struct Rendered {
    pub response: egui::Response,
    pub notice: Option<Notice>,
}

pub trait WidgetContent {
    fn default_config() -> WidgetConfig
    where
        Self: Sized;

    fn render(&mut self, ui: &mut egui::Ui, config: &WidgetConfig) -> Rendered;

    fn refresh(&mut self, config: &WidgetConfig, now: NaiveDateTime) -> Refresh;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Clock,
    Todo,
    Weather,
    Timer,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 4] = [
        WidgetKind::Clock,
        WidgetKind::Todo,
        WidgetKind::Weather,
        WidgetKind::Timer,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            WidgetKind::Clock => "Clock",
            WidgetKind::Todo => "Todo List",
            WidgetKind::Weather => "Weather",
            WidgetKind::Timer => "Timer",
        }
    }

    pub fn from_type_name(name: &str) -> Result<Self, WidgetError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == name)
            .ok_or_else(|| WidgetError::UnknownWidgetType(name.to_owned()))
    }

    pub fn default_config(self) -> WidgetConfig {
        match self {
            WidgetKind::Clock => ClockFace::default_config(),
            WidgetKind::Todo => TodoList::default_config(),
            WidgetKind::Weather => WeatherPanel::default_config(),
            WidgetKind::Timer => Countdown::default_config(),
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

pub enum Content {
    Clock(ClockFace),
    Todo(TodoList),
    Weather(WeatherPanel),
    Timer(Countdown),
}

impl Content {
    pub fn new(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Clock => Content::Clock(ClockFace::default()),
            WidgetKind::Todo => Content::Todo(TodoList::default()),
            WidgetKind::Weather => Content::Weather(WeatherPanel::default()),
            WidgetKind::Timer => Content::Timer(Countdown::default()),
        }
    }

    pub fn kind(&self) -> WidgetKind {
        match self {
            Content::Clock(_) => WidgetKind::Clock,
            Content::Todo(_) => WidgetKind::Todo,
            Content::Weather(_) => WidgetKind::Weather,
            Content::Timer(_) => WidgetKind::Timer,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn WidgetContent {
        match self {
            Content::Clock(clock) => clock,
            Content::Todo(todo) => todo,
            Content::Weather(weather) => weather,
            Content::Timer(timer) => timer,
        }
    }

    pub fn refresh(&mut self, config: &WidgetConfig, now: NaiveDateTime) -> Refresh {
        self.inner_mut().refresh(config, now)
    }

    pub fn render(&mut self, ui: &mut egui::Ui, config: &WidgetConfig) -> Rendered {
        let fill = with_opacity(config.bg_color(), config.opacity());
        let min_size = egui::vec2(
            (config.width() as f32 - PANEL_MARGIN * 2.0).max(0.0),
            (config.height() as f32 - PANEL_MARGIN * 2.0).max(0.0),
        );
        let shown = egui::Frame::none()
            .fill(fill)
            .rounding(config.corner_radius())
            .inner_margin(egui::Margin::same(PANEL_MARGIN))
            .show(ui, |ui| {
                ui.set_min_size(min_size);
                self.inner_mut().render(ui, config)
            });
        Rendered {
            response: shown.response,
            notice: shown.inner.notice,
        }
    }
}

pub fn with_opacity(color: egui::Color32, opacity: f32) -> egui::Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(crate) fn font(ui: &egui::Ui, config: &WidgetConfig, size: f32) -> egui::FontId {
    let named = egui::FontFamily::Name(config.font_family().into());
    let family = if ui.fonts(|fonts| fonts.families().contains(&named)) {
        named
    } else {
        egui::FontFamily::Proportional
    };
    egui::FontId::new(size.max(6.0), family)
}

#[cfg(test)]
pub(crate) fn render_headless(content: &mut Content, config: &WidgetConfig) -> (egui::Rect, Option<Notice>) {
    let ctx = egui::Context::default();
    let mut result = None;
    let _ = ctx.run(egui::RawInput::default(), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            let rendered = content.render(ui, config);
            result = Some((rendered.response.rect, rendered.notice));
        });
    });
    result.unwrap_or((egui::Rect::NOTHING, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_round_trip() {
        for kind in WidgetKind::ALL {
            assert_eq!(WidgetKind::from_type_name(kind.type_name()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_type_name_is_rejected() {
        let err = WidgetKind::from_type_name("Stock Ticker").unwrap_err();
        assert!(matches!(err, WidgetError::UnknownWidgetType(name) if name == "Stock Ticker"));
    }

    #[test]
    fn every_kind_defaults_to_translucent_segoe() {
        for kind in WidgetKind::ALL {
            let config = kind.default_config();
            assert_eq!(config.font_family(), "Segoe UI");
            assert!((config.opacity() - 0.95).abs() < f32::EPSILON);
            assert_eq!(Content::new(kind).kind(), kind);
        }
    }

    #[test]
    fn panel_covers_configured_size() {
        let config = WidgetKind::Clock.default_config();
        let mut content = Content::new(WidgetKind::Clock);
        let (rect, notice) = render_headless(&mut content, &config);
        assert!(rect.width() >= config.width() as f32 - 0.5);
        assert!(rect.height() >= config.height() as f32 - 0.5);
        assert!(notice.is_none());
    }

    #[test]
    fn opacity_maps_to_alpha() {
        let color = with_opacity(egui::Color32::from_rgb(10, 20, 30), 0.5);
        assert_eq!(color.a(), 128);
    }
}
