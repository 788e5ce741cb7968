#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod app;
mod branding;
mod config;
mod customize;
mod error;
mod layout;
mod logging;
mod manager;
mod notify;
mod pinning;
mod platform;
mod preview;
mod scheduler;
mod widgets;

use crate::app::{DeskApp, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::branding::APP_DISPLAY_NAME;
use crate::config::AppSettings;
use eframe::egui;
use log::{info, warn};

// Family name as stored in widget configs, and the file under the system font directory.
const NAMED_FONTS: [(&str, &str); 5] = [
    ("Segoe UI", "segoeui.ttf"),
    ("Arial", "arial.ttf"),
    ("Calibri", "calibri.ttf"),
    ("Consolas", "consola.ttf"),
    ("Georgia", "georgia.ttf"),
];

fn main() -> eframe::Result<()> {
    let settings = AppSettings::load();
    if let Err(err) = logging::init(&settings.log_level) {
        eprintln!("failed to install logger: {err}");
    }
    info!("starting {APP_DISPLAY_NAME}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_DISPLAY_NAME)
            .with_inner_size(startup_window_size(&settings))
            .with_min_inner_size([MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        APP_DISPLAY_NAME,
        options,
        Box::new(|cc| {
            install_named_fonts(&cc.egui_ctx);
            Ok(Box::new(DeskApp::new(cc)))
        }),
    )
}

fn startup_window_size(settings: &AppSettings) -> [f32; 2] {
    if let Some((w, h)) = settings.last_size {
        [
            sanitize_dimension(w, WINDOW_WIDTH, MIN_WINDOW_WIDTH),
            sanitize_dimension(h, WINDOW_HEIGHT, MIN_WINDOW_HEIGHT),
        ]
    } else {
        [WINDOW_WIDTH, WINDOW_HEIGHT]
    }
}

fn sanitize_dimension(value: f32, fallback: f32, min: f32) -> f32 {
    if !value.is_finite() {
        return fallback;
    }
    value.clamp(min, 4096.0)
}

fn system_font_dir() -> std::path::PathBuf {
    let windir = std::env::var_os("WINDIR").unwrap_or_else(|| r"C:\Windows".into());
    std::path::PathBuf::from(windir).join("Fonts")
}

fn install_named_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    let fallback = fonts
        .families
        .get(&egui::FontFamily::Proportional)
        .cloned()
        .unwrap_or_default();
    let dir = system_font_dir();

    for (family, file) in NAMED_FONTS {
        let path = dir.join(file);
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(err) => {
                if cfg!(windows) {
                    warn!("font {family} unavailable at {}: {err}", path.display());
                }
                continue;
            }
        };
        fonts
            .font_data
            .insert(family.to_owned(), egui::FontData::from_owned(data).into());
        let mut chain = vec![family.to_owned()];
        chain.extend(fallback.iter().cloned());
        fonts
            .families
            .insert(egui::FontFamily::Name(family.into()), chain);
    }

    ctx.set_fonts(fonts);
}
