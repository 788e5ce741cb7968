use super::config::*;
use super::{font, Refresh, Rendered, WidgetConfig, WidgetContent};
use chrono::NaiveDateTime;
use eframe::egui::{self, RichText};
use std::time::Duration;

pub const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ClockFace {
    time: String,
    date: String,
}

impl Default for ClockFace {
    fn default() -> Self {
        Self {
            time: "--:--:--".to_owned(),
            date: String::new(),
        }
    }
}

impl ClockFace {
    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn update(&mut self, now: NaiveDateTime, format_12h: bool) {
        self.time = format_time(&now, format_12h);
        self.date = now.format("%A, %B %d").to_string();
    }
}

pub fn format_time(now: &NaiveDateTime, format_12h: bool) -> String {
    let pattern = if format_12h { "%I:%M:%S %p" } else { "%H:%M:%S" };
    now.format(pattern).to_string()
}

impl WidgetContent for ClockFace {
    fn default_config() -> WidgetConfig {
        WidgetConfig::new()
            .with(WIDTH, 280)
            .with(HEIGHT, 120)
            .with(BG_COLOR, "#1C1B1F")
            .with(TEXT_COLOR, "#FFFFFF")
            .with(ACCENT_COLOR, "#D0BCFF")
            .with(FONT_FAMILY, "Segoe UI")
            .with(FONT_SIZE, 18)
            .with(OPACITY, 0.95)
            .with(FORMAT_12H, true)
            .with(CORNER_RADIUS, 16)
    }

    fn render(&mut self, ui: &mut egui::Ui, config: &WidgetConfig) -> Rendered {
        let size = config.font_size();
        let time_font = font(ui, config, size + 8.0);
        let date_font = font(ui, config, (size - 6.0).max(9.0));
        let response = ui
            .vertical_centered(|ui| {
                ui.label(
                    RichText::new(&self.time)
                        .font(time_font)
                        .color(config.text_color())
                        .strong(),
                );
                ui.label(
                    RichText::new(&self.date)
                        .font(date_font)
                        .color(config.accent_color()),
                );
            })
            .response;
        Rendered {
            response,
            notice: None,
        }
    }

    fn refresh(&mut self, config: &WidgetConfig, now: NaiveDateTime) -> Refresh {
        self.update(now, config.bool_or(FORMAT_12H, true));
        Refresh::every(TICK)
    }
}
