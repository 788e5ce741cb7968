use super::config::*;
use super::{font, Refresh, Rendered, WidgetConfig, WidgetContent};
use chrono::NaiveDateTime;
use eframe::egui::{self, RichText};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(600);
pub const TEMPERATURES_C: [i32; 8] = [-10, -5, 0, 5, 10, 15, 20, 25];
pub const CONDITIONS: [&str; 5] = ["Sunny", "Cloudy", "Partly Cloudy", "Light Snow", "Snow"];
pub const HUMIDITY_PERCENT: RangeInclusive<u8> = 30..=90;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSample {
    pub temperature_c: i32,
    pub condition: &'static str,
    pub humidity: u8,
}

impl WeatherSample {
    pub fn draw<R: Rng>(rng: &mut R) -> Self {
        Self {
            temperature_c: TEMPERATURES_C.choose(rng).copied().unwrap_or_default(),
            condition: CONDITIONS.choose(rng).copied().unwrap_or("Sunny"),
            humidity: rng.gen_range(HUMIDITY_PERCENT),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeatherPanel {
    sample: Option<WeatherSample>,
}

impl WeatherPanel {
    pub fn sample(&self) -> Option<&WeatherSample> {
        self.sample.as_ref()
    }

    pub fn resample<R: Rng>(&mut self, rng: &mut R) {
        self.sample = Some(WeatherSample::draw(rng));
    }
}

impl WidgetContent for WeatherPanel {
    fn default_config() -> WidgetConfig {
        WidgetConfig::new()
            .with(WIDTH, 300)
            .with(HEIGHT, 200)
            .with(BG_COLOR, "#E3F2FD")
            .with(TEXT_COLOR, "#1565C0")
            .with(ACCENT_COLOR, "#2196F3")
            .with(FONT_FAMILY, "Segoe UI")
            .with(FONT_SIZE, 12)
            .with(OPACITY, 0.95)
            .with(LOCATION, "Calgary, AB")
    }

    fn render(&mut self, ui: &mut egui::Ui, config: &WidgetConfig) -> Rendered {
        let size = config.font_size();
        let text_color = config.text_color();
        let accent = config.accent_color();
        let (temperature, condition, humidity) = match &self.sample {
            Some(sample) => (
                format!("{}°C", sample.temperature_c),
                sample.condition.to_owned(),
                format!("Humidity: {}%", sample.humidity),
            ),
            None => ("--°C".to_owned(), "Loading...".to_owned(), String::new()),
        };
        let location_font = font(ui, config, size + 2.0);
        let temperature_font = font(ui, config, size + 16.0);
        let detail_font = font(ui, config, size);

        let response = ui
            .vertical(|ui| {
                ui.label(
                    RichText::new(config.str_or(LOCATION, "Calgary, AB"))
                        .font(location_font)
                        .color(text_color)
                        .strong(),
                );
                ui.label(
                    RichText::new(temperature)
                        .font(temperature_font)
                        .color(text_color)
                        .strong(),
                );
                ui.label(RichText::new(condition).font(detail_font.clone()).color(accent));
                if !humidity.is_empty() {
                    ui.label(RichText::new(humidity).font(detail_font).color(text_color));
                }
            })
            .response;
        Rendered {
            response,
            notice: None,
        }
    }

    fn refresh(&mut self, _config: &WidgetConfig, _now: NaiveDateTime) -> Refresh {
        self.resample(&mut rand::thread_rng());
        Refresh::every(REFRESH_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_stay_inside_simulated_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let sample = WeatherSample::draw(&mut rng);
            assert!(TEMPERATURES_C.contains(&sample.temperature_c));
            assert!(CONDITIONS.contains(&sample.condition));
            assert!(HUMIDITY_PERCENT.contains(&sample.humidity));
        }
    }

    #[test]
    fn refresh_fills_sample_and_waits_ten_minutes() {
        let mut panel = WeatherPanel::default();
        assert!(panel.sample().is_none());
        let refresh = panel.refresh(&WeatherPanel::default_config(), NaiveDateTime::default());
        assert!(panel.sample().is_some());
        assert_eq!(refresh.next, Some(Duration::from_secs(600)));
    }
}
