use crate::customize::{Debounce, StyleDraft};
use crate::manager::WidgetInstance;
use crate::notify::Notice;
use crate::pinning::ScreenPos;
use crate::widgets::WidgetId;
use eframe::egui;
use std::time::Instant;

pub struct CustomizeDialog {
    pub widget: WidgetId,
    pub title: String,
    pub draft: StyleDraft,
    pub debounce: Debounce,
    pub error: Option<String>,
}

impl CustomizeDialog {
    pub fn new(instance: &WidgetInstance) -> Self {
        Self {
            widget: instance.id(),
            title: format!("Customize {}", instance.name()),
            draft: StyleDraft::from_config(instance.config()),
            debounce: Debounce::default(),
            error: None,
        }
    }
}

pub struct Toast {
    pub notice: Notice,
    pub shown_at: Instant,
}

pub struct WidgetDrag {
    pub widget: WidgetId,
    pub origin: ScreenPos,
    pub grab: egui::Pos2,
}

impl WidgetDrag {
    pub fn target(&self, pointer: egui::Pos2) -> ScreenPos {
        let delta = pointer - self.grab;
        ScreenPos::new(
            self.origin.x + delta.x.round() as i32,
            self.origin.y + delta.y.round() as i32,
        )
    }
}
