use crate::notify::NoticeLevel;
use eframe::egui::{self, Color32};

pub const CARD_ROUNDING: f32 = 12.0;
pub const CARD_PADDING: f32 = 20.0;
pub const LEFT_PANEL_WIDTH: f32 = 320.0;
pub const ACTION_BUTTON_HEIGHT: f32 = 34.0;
pub const TOAST_WIDTH: f32 = 300.0;
pub const PREVIEW_TOOLBAR_HEIGHT: f32 = 64.0;

#[derive(Clone, Copy)]
pub struct ManagerTheme {
    pub window_bg: Color32,
    pub card_bg: Color32,
    pub title: Color32,
    pub subtitle: Color32,
    pub separator: Color32,
    pub list_bg: Color32,
    pub primary: Color32,
    pub on_primary: Color32,
    pub desktop_bg: Color32,
    pub desktop_grid: Color32,
    pub icon_fill: Color32,
    pub icon_outline: Color32,
    pub taskbar_fill: Color32,
    pub taskbar_outline: Color32,
    pub item_outline: Color32,
    pub item_highlight: Color32,
}

impl Default for ManagerTheme {
    fn default() -> Self {
        Self {
            window_bg: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            card_bg: Color32::WHITE,
            title: Color32::from_rgb(0x1C, 0x1B, 0x1F),
            subtitle: Color32::from_rgb(0x49, 0x45, 0x4F),
            separator: Color32::from_rgb(0xE7, 0xE0, 0xEC),
            list_bg: Color32::from_rgb(0xF7, 0xF2, 0xFA),
            primary: Color32::from_rgb(0x67, 0x50, 0xA4),
            on_primary: Color32::WHITE,
            desktop_bg: Color32::from_rgb(0x2D, 0x2D, 0x2D),
            desktop_grid: Color32::from_rgb(0x3A, 0x3A, 0x3A),
            icon_fill: Color32::from_rgb(0x40, 0x40, 0x40),
            icon_outline: Color32::from_rgb(0x66, 0x66, 0x66),
            taskbar_fill: Color32::from_rgb(0x1F, 0x1F, 0x1F),
            taskbar_outline: Color32::from_rgb(0x33, 0x33, 0x33),
            item_outline: Color32::from_rgb(0x67, 0x50, 0xA4),
            item_highlight: Color32::from_rgb(0xFF, 0x57, 0x22),
        }
    }
}

pub fn toast_colors(level: NoticeLevel) -> (Color32, Color32) {
    let bg = match level {
        NoticeLevel::Success => Color32::from_rgb(0x4C, 0xAF, 0x50),
        NoticeLevel::Error => Color32::from_rgb(0xF4, 0x43, 0x36),
        NoticeLevel::Warning => Color32::from_rgb(0xFF, 0x98, 0x00),
        NoticeLevel::Info => Color32::from_rgb(0x21, 0x96, 0xF3),
    };
    (bg, Color32::WHITE)
}

pub fn apply_visuals(ctx: &egui::Context, theme: &ManagerTheme) {
    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = theme.window_bg;
    visuals.window_fill = theme.window_bg;
    visuals.selection.bg_fill = theme.primary;
    visuals.selection.stroke = egui::Stroke::new(1.0, theme.on_primary);
    visuals.widgets.inactive.rounding = egui::Rounding::same(8.0);
    visuals.widgets.hovered.rounding = egui::Rounding::same(8.0);
    visuals.widgets.active.rounding = egui::Rounding::same(8.0);
    ctx.set_visuals(visuals);
}
