use super::config::*;
use super::{font, Refresh, Rendered, WidgetConfig, WidgetContent};
use crate::error::WidgetError;
use crate::notify::Notice;
use chrono::NaiveDateTime;
use eframe::egui::{self, RichText};
use std::time::Duration;

pub const TICK: Duration = Duration::from_secs(1);
pub const TIME_UP_MESSAGE: &str = "Time's up!";

#[derive(Debug, Clone)]
pub struct Countdown {
    remaining_secs: u32,
    active: bool,
    expired: bool,
    minutes_input: String,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            remaining_secs: 0,
            active: false,
            expired: false,
            minutes_input: "5".to_owned(),
        }
    }
}

impl Countdown {
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    // Starts from a whole, positive number of minutes. Anything else leaves the timer untouched.
    pub fn start(&mut self, minutes: &str) -> Result<(), WidgetError> {
        let secs = minutes
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|m| *m > 0)
            .and_then(|m| m.checked_mul(60))
            .ok_or_else(|| WidgetError::invalid("minutes", minutes))?;
        self.remaining_secs = secs;
        self.active = true;
        self.expired = false;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.expired = false;
        self.remaining_secs = 0;
    }

    pub fn tick(&mut self) -> Option<Notice> {
        if !self.active {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.active = false;
            self.expired = true;
            return Some(Notice::info(TIME_UP_MESSAGE));
        }
        None
    }

    pub fn display(&self) -> String {
        if self.expired {
            return "TIME!".to_owned();
        }
        format!(
            "{:02}:{:02}",
            self.remaining_secs() / 60,
            self.remaining_secs() % 60
        )
    }
}

impl WidgetContent for Countdown {
    fn default_config() -> WidgetConfig {
        WidgetConfig::new()
            .with(WIDTH, 250)
            .with(HEIGHT, 180)
            .with(BG_COLOR, "#FFF3E0")
            .with(TEXT_COLOR, "#E65100")
            .with(ACCENT_COLOR, "#FF9800")
            .with(FONT_FAMILY, "Segoe UI")
            .with(FONT_SIZE, 14)
            .with(OPACITY, 0.95)
    }

    fn render(&mut self, ui: &mut egui::Ui, config: &WidgetConfig) -> Rendered {
        let size = config.font_size();
        let text_color = config.text_color();
        let accent = config.accent_color();
        let title_font = font(ui, config, size);
        let display_font = font(ui, config, size + 14.0);
        let mut start_clicked = false;
        let mut stop_clicked = false;

        let response = ui
            .vertical_centered(|ui| {
                ui.label(RichText::new("Timer").font(title_font).color(accent).strong());
                ui.label(
                    RichText::new(self.display())
                        .font(display_font)
                        .color(text_color)
                        .strong(),
                );
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.minutes_input).desired_width(36.0),
                    );
                    ui.label(RichText::new("min").color(text_color));
                    if ui.button(RichText::new("Start").color(accent)).clicked() {
                        start_clicked = true;
                    }
                    let stop = egui::Button::new(RichText::new("Stop").color(accent));
                    if ui.add_enabled(self.is_active(), stop).clicked() {
                        stop_clicked = true;
                    }
                });
            })
            .response;

        let mut notice = None;
        if start_clicked {
            let input = self.minutes_input.clone();
            if let Err(err) = self.start(&input) {
                notice = Some(Notice::error(format!(
                    "Please enter a valid number of minutes ({err})"
                )));
            }
        }
        if stop_clicked {
            self.stop();
        }
        Rendered { response, notice }
    }

    fn refresh(&mut self, _config: &WidgetConfig, _now: NaiveDateTime) -> Refresh {
        Refresh {
            next: Some(TICK),
            notice: self.tick(),
        }
    }
}
