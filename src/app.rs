mod runtime;
mod state;
mod style;
mod ui;

use crate::config::AppSettings;
use crate::manager::WidgetManager;
use crate::notify::{Notice, Notifier};
use crate::platform::ViewportSurface;
use crate::widgets::{WidgetId, WidgetKind};
use crossbeam_channel::Receiver;
use eframe::egui;
use log::{info, warn};
use runtime::RuntimeHandles;
use state::{CustomizeDialog, Toast, WidgetDrag};
use std::time::Instant;

pub const WINDOW_WIDTH: f32 = 1100.0;
pub const WINDOW_HEIGHT: f32 = 700.0;
pub const MIN_WINDOW_WIDTH: f32 = 720.0;
pub const MIN_WINDOW_HEIGHT: f32 = 480.0;

// Used when the monitor size is not reported yet.
const FALLBACK_SCREEN: (f64, f64) = (1920.0, 1080.0);

pub struct DeskApp {
    manager: WidgetManager,
    settings: AppSettings,
    notices: Receiver<Notice>,
    notifier: Notifier,
    runtime: RuntimeHandles,
    is_visible: bool,
    new_kind: WidgetKind,
    selected: Option<WidgetId>,
    customize: Option<CustomizeDialog>,
    widget_drag: Option<WidgetDrag>,
    toasts: Vec<Toast>,
}

impl DeskApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = AppSettings::load();

        if let Some((x, y)) = settings.last_pos {
            if x.is_finite() && y.is_finite() {
                cc.egui_ctx
                    .send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(x, y)));
            }
        }
        if let Some((w, h)) = settings.last_size {
            let restored = sanitize_window_size(egui::vec2(w, h));
            cc.egui_ctx
                .send_viewport_cmd(egui::ViewportCommand::InnerSize(restored));
        }

        let (notifier, notices) = Notifier::channel();
        let surface = ViewportSurface::new(cc.egui_ctx.clone());
        let mut manager = WidgetManager::new(Box::new(surface), notifier.clone());

        if settings.autoload_layout {
            let path = settings.layout_path();
            match manager.load_from(&path, Instant::now()) {
                Ok(Some(report)) => info!(
                    "restored {} widgets from {} ({} skipped)",
                    report.loaded,
                    path.display(),
                    report.skipped
                ),
                Ok(None) => {}
                Err(err) => warn!("could not restore layout: {err}"),
            }
        }

        let runtime = runtime::build_runtime(&cc.egui_ctx);

        Self {
            manager,
            settings,
            notices,
            notifier,
            runtime,
            is_visible: true,
            new_kind: WidgetKind::Clock,
            selected: None,
            customize: None,
            widget_drag: None,
            toasts: Vec::new(),
        }
    }

    fn selected_or_warn(&mut self, action: &str) -> Option<WidgetId> {
        let selected = self
            .selected
            .filter(|id| self.manager.get(*id).is_some());
        if selected.is_none() {
            self.selected = None;
            self.notifier
                .send(Notice::warning(format!("Please select a widget to {action}.")));
        }
        selected
    }

    fn open_preview(&mut self, ctx: &egui::Context) {
        let screen = ctx
            .input(|i| i.viewport().monitor_size)
            .filter(|size| size.x > 0.0 && size.y > 0.0)
            .map(|size| (f64::from(size.x), f64::from(size.y)))
            .unwrap_or(FALLBACK_SCREEN);
        self.manager
            .open_preview(screen, self.settings.preview_canvas_size());
    }

    fn remember_geometry(&mut self, ctx: &egui::Context) {
        let (outer, inner) = ctx.input(|i| (i.viewport().outer_rect, i.viewport().inner_rect));
        if let Some(outer) = outer {
            self.settings.last_pos = Some((outer.min.x, outer.min.y));
        }
        if let Some(inner) = inner {
            let size = sanitize_window_size(inner.size());
            self.settings.last_size = Some((size.x, size.y));
        }
    }

    fn shutdown(&mut self, ctx: &egui::Context) {
        self.remember_geometry(ctx);
        self.settings.save();
        info!("exiting {}", crate::branding::APP_DISPLAY_NAME);
    }
}

pub(super) fn sanitize_window_size(size: egui::Vec2) -> egui::Vec2 {
    let width = if size.x.is_finite() {
        size.x
    } else {
        WINDOW_WIDTH
    };
    let height = if size.y.is_finite() {
        size.y
    } else {
        WINDOW_HEIGHT
    };
    egui::vec2(width.max(MIN_WINDOW_WIDTH), height.max(MIN_WINDOW_HEIGHT))
}
