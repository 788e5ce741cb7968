use super::runtime::UserEvent;
use super::state::{CustomizeDialog, Toast, WidgetDrag};
use super::style::{
    apply_visuals, toast_colors, ManagerTheme, ACTION_BUTTON_HEIGHT, CARD_PADDING, CARD_ROUNDING,
    LEFT_PANEL_WIDTH, PREVIEW_TOOLBAR_HEIGHT, TOAST_WIDTH,
};
use super::DeskApp;
use crate::branding::APP_DISPLAY_NAME;
use crate::customize::{FONT_FAMILIES, LIVE_PREVIEW_DEBOUNCE, OPACITY_STEP};
use crate::notify::Notice;
use crate::pinning::{PinOutcome, Placement, ScreenPos};
use crate::platform::{surface_title, viewport_id};
use crate::preview::{CanvasRect, DecorationKind};
use crate::widgets::config::{parse_hex_color, to_hex_color, MAX_OPACITY, MIN_OPACITY};
use crate::widgets::{with_opacity, WidgetId, WidgetKind};
use eframe::egui;
use log::{debug, info};
use std::time::{Duration, Instant};

const TOAST_LIFETIME: Duration = Duration::from_secs(3);
const GRID_STEP: f32 = 50.0;
const PREVIEW_TITLE: &str = "Interactive Desktop Preview";
const PREVIEW_HINT: &str = "Drag widgets to position them. Changes apply in real-time to desktop.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelAction {
    Create,
    OpenPreview,
    Customize,
    Pin,
    Unpin,
    Remove,
    Save,
    Load,
}

impl eframe::App for DeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_runtime_events(ctx);
        if ctx.input(|i| i.viewport().close_requested()) {
            self.shutdown(ctx);
        }

        let now = Instant::now();
        self.manager.sync_surface();
        self.manager.tick(now);

        let theme = ManagerTheme::default();
        apply_visuals(ctx, &theme);
        if self.is_visible {
            if let Some(action) = self.draw_main_panel(ctx, &theme) {
                self.run_action(ctx, action, now);
            }
        }
        self.draw_customize_dialog(ctx, now);
        self.draw_preview(ctx, &theme);
        self.draw_pinned_widgets(ctx);

        self.drain_notices(now);
        self.draw_toasts(ctx, now);
        self.schedule_repaint(ctx, now);
    }
}

impl DeskApp {
    fn handle_runtime_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.runtime.rx.try_recv() {
            match event {
                UserEvent::Show => self.is_visible = true,
                UserEvent::Hide => self.is_visible = false,
                UserEvent::Quit => {
                    self.shutdown(ctx);
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
            #[cfg(windows)]
            self.runtime.tray.set_visible(self.is_visible);
        }
    }

    fn drain_notices(&mut self, now: Instant) {
        while let Ok(notice) = self.notices.try_recv() {
            self.toasts.push(Toast {
                notice,
                shown_at: now,
            });
        }
        self.toasts
            .retain(|toast| now.duration_since(toast.shown_at) < TOAST_LIFETIME);
    }

    fn schedule_repaint(&mut self, ctx: &egui::Context, now: Instant) {
        let debounce = self
            .customize
            .as_ref()
            .and_then(|dialog| dialog.debounce.deadline(LIVE_PREVIEW_DEBOUNCE));
        let toast = self
            .toasts
            .iter()
            .map(|toast| toast.shown_at + TOAST_LIFETIME)
            .min();
        let next = [self.manager.next_refresh(), debounce, toast]
            .into_iter()
            .flatten()
            .min();
        if let Some(deadline) = next {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }

    fn draw_main_panel(&mut self, ctx: &egui::Context, theme: &ManagerTheme) -> Option<PanelAction> {
        let mut action = None;
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(theme.card_bg)
                    .inner_margin(egui::Margin::symmetric(CARD_PADDING, 16.0))
                    .stroke(egui::Stroke::new(1.0, theme.separator)),
            )
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(APP_DISPLAY_NAME)
                        .size(24.0)
                        .strong()
                        .color(theme.title),
                );
                ui.label(
                    egui::RichText::new("Create and manage modern desktop widgets")
                        .size(13.0)
                        .color(theme.subtitle),
                );
            });

        egui::SidePanel::left("widget_types")
            .exact_width(LEFT_PANEL_WIDTH)
            .resizable(false)
            .frame(egui::Frame::none().inner_margin(CARD_PADDING))
            .show(ctx, |ui| {
                card(ui, theme, "Select Widget Type", |ui| {
                    for kind in WidgetKind::ALL {
                        ui.radio_value(&mut self.new_kind, kind, kind.type_name());
                    }
                    ui.add_space(12.0);
                    if primary_button(ui, theme, "Create Widget").clicked() {
                        action = Some(PanelAction::Create);
                    }
                    ui.add_space(6.0);
                    if secondary_button(ui, "Desktop Preview").clicked() {
                        action = Some(PanelAction::OpenPreview);
                    }
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(CARD_PADDING))
            .show(ctx, |ui| {
                card(ui, theme, "Active Widgets", |ui| {
                    self.draw_widget_list(ui, theme);
                    ui.add_space(12.0);
                    ui.horizontal_wrapped(|ui| {
                        let buttons = [
                            ("Customize Selected", PanelAction::Customize),
                            ("Pin Selected to Desktop", PanelAction::Pin),
                            ("Unpin Selected", PanelAction::Unpin),
                            ("Remove Selected", PanelAction::Remove),
                        ];
                        for (label, clicked) in buttons {
                            if secondary_button(ui, label).clicked() {
                                action = Some(clicked);
                            }
                        }
                    });
                    ui.add_space(6.0);
                    ui.separator();
                    ui.horizontal(|ui| {
                        if primary_button(ui, theme, "Save Layout").clicked() {
                            action = Some(PanelAction::Save);
                        }
                        if secondary_button(ui, "Load Layout").clicked() {
                            action = Some(PanelAction::Load);
                        }
                    });
                });
            });
        action
    }

    fn draw_widget_list(&mut self, ui: &mut egui::Ui, theme: &ManagerTheme) {
        let list_height = (ui.available_height() - 140.0).max(120.0);
        egui::Frame::none()
            .fill(theme.list_bg)
            .rounding(8.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(list_height)
                    .min_scrolled_height(list_height)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        if self.manager.instances().is_empty() {
                            ui.label(
                                egui::RichText::new("No widgets yet.").color(theme.subtitle),
                            );
                        }
                        for instance in self.manager.instances() {
                            let marker = match instance.attachment().map(|a| a.placement) {
                                Some(Placement::Desktop) => "  📌 desktop",
                                Some(Placement::Floating) => "  📌 floating",
                                None => "",
                            };
                            let text = format!("{} ({}){marker}", instance.name(), instance.kind());
                            let is_selected = self.selected == Some(instance.id());
                            let row = ui.add_sized(
                                [ui.available_width(), 28.0],
                                egui::SelectableLabel::new(is_selected, text),
                            );
                            if row.clicked() {
                                self.selected = Some(instance.id());
                            }
                        }
                    });
            });
    }

    fn run_action(&mut self, ctx: &egui::Context, action: PanelAction, now: Instant) {
        debug!("panel action {action:?}");
        match action {
            PanelAction::Create => {
                let id = self.manager.create(self.new_kind, now);
                self.selected = Some(id);
            }
            PanelAction::OpenPreview => {
                if self.manager.preview().is_none() {
                    self.open_preview(ctx);
                }
            }
            PanelAction::Customize => {
                let Some(id) = self.selected_or_warn("customize") else {
                    return;
                };
                self.close_customize_dialog();
                if let Some(instance) = self.manager.get(id) {
                    self.customize = Some(CustomizeDialog::new(instance));
                }
            }
            PanelAction::Pin => {
                let Some(id) = self.selected_or_warn("pin") else {
                    return;
                };
                if let Some(PinOutcome::Pinned { .. }) = self.manager.pin(id) {
                    if let Some(instance) = self.manager.get(id) {
                        self.notifier.send(Notice::success(format!(
                            "{} pinned to desktop!",
                            instance.name()
                        )));
                    }
                }
            }
            PanelAction::Unpin => {
                if let Some(id) = self.selected_or_warn("unpin") {
                    self.manager.unpin(id);
                }
            }
            PanelAction::Remove => {
                let Some(id) = self.selected_or_warn("remove") else {
                    return;
                };
                if self.customize.as_ref().is_some_and(|d| d.widget == id) {
                    self.customize = None;
                }
                if self.widget_drag.as_ref().is_some_and(|d| d.widget == id) {
                    self.widget_drag = None;
                }
                self.manager.remove(id);
                self.selected = None;
            }
            PanelAction::Save => {
                let path = self.settings.layout_path();
                if let Err(err) = self.manager.save_to(&path) {
                    debug!("save failed: {err}");
                }
            }
            PanelAction::Load => {
                self.close_customize_dialog();
                self.widget_drag = None;
                let path = self.settings.layout_path();
                match self.manager.load_from(&path, now) {
                    Ok(Some(_)) => self.selected = None,
                    Ok(None) => self
                        .notifier
                        .send(Notice::info("No saved layout found.")),
                    Err(err) => debug!("load failed: {err}"),
                }
            }
        }
    }

    fn close_customize_dialog(&mut self) {
        if let Some(dialog) = self.customize.take() {
            self.manager.cancel_customization(dialog.widget);
        }
    }

    fn draw_customize_dialog(&mut self, ctx: &egui::Context, now: Instant) {
        let Some(mut dialog) = self.customize.take() else {
            return;
        };
        if self.manager.get(dialog.widget).is_none() {
            return;
        }

        let mut open = true;
        let mut apply = false;
        let mut cancel = false;
        let mut edited = false;

        egui::Window::new(dialog.title.clone())
            .id(egui::Id::new(("customize", dialog.widget.raw())))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_size([500.0, 600.0])
            .show(ctx, |ui| {
                egui::Grid::new("style_fields")
                    .num_columns(2)
                    .spacing([16.0, 10.0])
                    .show(ui, |ui| {
                        edited |= text_row(ui, "Width", &mut dialog.draft.width);
                        edited |= text_row(ui, "Height", &mut dialog.draft.height);
                        edited |= color_row(ui, "Background Color", &mut dialog.draft.bg_color);
                        edited |= color_row(ui, "Text Color", &mut dialog.draft.text_color);

                        ui.label("Font Family");
                        egui::ComboBox::from_id_salt("font_family")
                            .selected_text(dialog.draft.font_family.clone())
                            .show_ui(ui, |ui| {
                                for family in FONT_FAMILIES {
                                    edited |= ui
                                        .selectable_value(
                                            &mut dialog.draft.font_family,
                                            family.to_owned(),
                                            family,
                                        )
                                        .changed();
                                }
                            });
                        ui.end_row();

                        edited |= text_row(ui, "Font Size", &mut dialog.draft.font_size);

                        ui.label("Opacity");
                        edited |= ui
                            .add(
                                egui::Slider::new(
                                    &mut dialog.draft.opacity,
                                    MIN_OPACITY..=MAX_OPACITY,
                                )
                                .step_by(f64::from(OPACITY_STEP))
                                .fixed_decimals(1),
                            )
                            .changed();
                        ui.end_row();
                    });

                if let Some(error) = dialog.error.clone() {
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        ui.colored_label(egui::Color32::from_rgb(0xF4, 0x43, 0x36), error);
                        if ui.button("OK").clicked() {
                            dialog.error = None;
                        }
                    });
                }

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    apply = ui.button("Apply").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });

        if edited {
            dialog.debounce.touch(now);
        }
        if dialog.debounce.ready(now, LIVE_PREVIEW_DEBOUNCE) {
            self.manager
                .preview_customization(dialog.widget, &dialog.draft);
        }

        if apply {
            match self.manager.customize(dialog.widget, &dialog.draft) {
                Ok(()) => return,
                Err(err) => dialog.error = Some(format!("Invalid customization: {err}")),
            }
        }
        if cancel || !open {
            self.manager.cancel_customization(dialog.widget);
            return;
        }
        self.customize = Some(dialog);
    }

    fn draw_preview(&mut self, ctx: &egui::Context, theme: &ManagerTheme) {
        let Some((canvas_w, canvas_h)) = self.manager.preview().map(|p| p.canvas_size()) else {
            return;
        };
        let builder = egui::ViewportBuilder::default()
            .with_title(PREVIEW_TITLE)
            .with_inner_size([canvas_w as f32 + 32.0, canvas_h as f32 + PREVIEW_TOOLBAR_HEIGHT + 32.0])
            .with_resizable(false);

        let close = ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("desktop_preview"),
            builder,
            |ctx, class| {
                if class == egui::ViewportClass::Embedded {
                    let mut open = true;
                    egui::Window::new(PREVIEW_TITLE)
                        .open(&mut open)
                        .resizable(false)
                        .show(ctx, |ui| self.draw_preview_contents(ui, theme));
                    !open
                } else {
                    egui::CentralPanel::default()
                        .frame(egui::Frame::none().fill(theme.window_bg).inner_margin(16.0))
                        .show(ctx, |ui| self.draw_preview_contents(ui, theme));
                    ctx.input(|i| i.viewport().close_requested())
                }
            },
        );
        if close {
            info!("desktop preview closed");
            self.manager.close_preview();
        }
    }

    fn draw_preview_contents(&mut self, ui: &mut egui::Ui, theme: &ManagerTheme) {
        ui.horizontal(|ui| {
            if primary_button(ui, theme, "Apply Positions").clicked() {
                self.manager.apply_preview_positions();
            }
            if secondary_button(ui, "Reset Positions").clicked() {
                self.manager.reset_preview_positions();
            }
        });
        ui.label(egui::RichText::new(PREVIEW_HINT).color(theme.subtitle));
        ui.add_space(8.0);

        let Some(preview) = self.manager.preview() else {
            return;
        };
        let (w, h) = preview.canvas_size();
        let (response, painter) =
            ui.allocate_painter(egui::vec2(w as f32, h as f32), egui::Sense::drag());
        let origin = response.rect.min;

        painter.rect_filled(response.rect, 0.0, theme.desktop_bg);
        paint_grid(&painter, response.rect, theme);

        for decoration in preview.decorations() {
            let rect = to_egui_rect(origin, &decoration.rect);
            match decoration.kind {
                DecorationKind::Icon => {
                    painter.rect(rect, 4.0, theme.icon_fill, egui::Stroke::new(1.0, theme.icon_outline));
                    painter.text(
                        egui::pos2(rect.center().x, rect.bottom() + 4.0),
                        egui::Align2::CENTER_TOP,
                        decoration.label,
                        egui::FontId::proportional(10.0),
                        egui::Color32::WHITE,
                    );
                }
                DecorationKind::Taskbar => {
                    painter.rect(rect, 0.0, theme.taskbar_fill, egui::Stroke::new(1.0, theme.taskbar_outline));
                    painter.text(
                        egui::pos2(rect.left() + 12.0, rect.center().y),
                        egui::Align2::LEFT_CENTER,
                        decoration.label,
                        egui::FontId::proportional(12.0),
                        egui::Color32::WHITE,
                    );
                }
            }
        }

        let active = preview.active();
        for item in preview.items() {
            let rect = to_egui_rect(origin, &item.rect);
            let stroke = if active == Some(item.widget) {
                egui::Stroke::new(3.0, theme.item_highlight)
            } else if item.pinned {
                egui::Stroke::new(2.0, theme.item_outline)
            } else {
                egui::Stroke::new(1.0, theme.icon_outline)
            };
            let fill = self
                .manager
                .get(item.widget)
                .map(|instance| with_opacity(instance.config().bg_color(), 0.85))
                .unwrap_or(theme.icon_fill);
            painter.rect(rect, 4.0, fill, stroke);
            let label = self
                .manager
                .get(item.widget)
                .map(|instance| instance.name().to_owned())
                .unwrap_or_else(|| item.widget.to_string());
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(11.0),
                egui::Color32::WHITE,
            );
        }

        if let Some(item) = active.and_then(|id| preview.item(id)) {
            let pos = item.real_pos();
            let rect = to_egui_rect(origin, &item.rect);
            painter.text(
                egui::pos2(rect.left(), rect.top() - 4.0),
                egui::Align2::LEFT_BOTTOM,
                format!("{}, {}", pos.x, pos.y),
                egui::FontId::monospace(10.0),
                theme.item_highlight,
            );
        }

        if response.drag_started() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let local = pointer - origin;
                self.manager
                    .preview_pointer_down(f64::from(local.x), f64::from(local.y));
            }
        }
        if response.dragged() {
            let delta = response.drag_delta();
            if delta != egui::Vec2::ZERO {
                self.manager
                    .preview_drag(f64::from(delta.x), f64::from(delta.y));
            }
        }
        if response.drag_stopped() {
            self.manager.preview_release();
        }
    }

    fn draw_pinned_widgets(&mut self, ctx: &egui::Context) {
        let pinned: Vec<(WidgetId, ScreenPos, Placement, (u32, u32))> = self
            .manager
            .instances()
            .iter()
            .filter_map(|instance| {
                let attachment = instance.attachment()?;
                Some((
                    instance.id(),
                    attachment.pos,
                    attachment.placement,
                    (instance.config().width(), instance.config().height()),
                ))
            })
            .collect();

        let mut closed = Vec::new();
        for (id, pos, placement, (w, h)) in pinned {
            let level = match placement {
                Placement::Desktop => egui::WindowLevel::AlwaysOnBottom,
                Placement::Floating => egui::WindowLevel::AlwaysOnTop,
            };
            let builder = egui::ViewportBuilder::default()
                .with_title(surface_title(id))
                .with_position([pos.x as f32, pos.y as f32])
                .with_inner_size([w as f32, h as f32])
                .with_decorations(false)
                .with_transparent(true)
                .with_taskbar(false)
                .with_resizable(false)
                .with_window_level(level);

            let close = ctx.show_viewport_immediate(viewport_id(id), builder, |ctx, class| {
                if class == egui::ViewportClass::Embedded {
                    egui::Window::new(surface_title(id))
                        .title_bar(false)
                        .resizable(false)
                        .frame(egui::Frame::none())
                        .show(ctx, |ui| {
                            self.manager.render(id, ui);
                        });
                    return false;
                }
                egui::CentralPanel::default()
                    .frame(egui::Frame::none())
                    .show(ctx, |ui| self.draw_widget_body(ctx, ui, id, pos));
                ctx.input(|i| i.viewport().close_requested())
            });
            if close {
                closed.push(id);
            }
        }
        for id in closed {
            self.manager.unpin(id);
        }
    }

    fn draw_widget_body(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, id: WidgetId, pos: ScreenPos) {
        // Registered before the content so the content's own controls win the hit test.
        let handle = ui.interact(
            ui.max_rect(),
            egui::Id::new(("widget_body", id.raw())),
            egui::Sense::drag(),
        );
        self.manager.render(id, ui);

        let pointer = ctx.input(|i| {
            let outer = i.viewport().outer_rect?;
            let local = i.pointer.latest_pos()?;
            Some(outer.min + local.to_vec2())
        });
        if handle.drag_started() {
            if let Some(grab) = pointer {
                self.widget_drag = Some(WidgetDrag {
                    widget: id,
                    origin: pos,
                    grab,
                });
            }
        }
        if handle.dragged() {
            let target = match (&self.widget_drag, pointer) {
                (Some(drag), Some(pointer)) if drag.widget == id => Some(drag.target(pointer)),
                _ => None,
            };
            if let Some(target) = target {
                self.manager.reposition(id, target);
            }
        }
        if handle.drag_stopped() && self.widget_drag.as_ref().is_some_and(|d| d.widget == id) {
            self.widget_drag = None;
        }
    }

    fn draw_toasts(&self, ctx: &egui::Context, now: Instant) {
        for (index, toast) in self.toasts.iter().enumerate() {
            let (bg, fg) = toast_colors(toast.notice.level);
            let age = now.duration_since(toast.shown_at).as_secs_f32();
            let alpha = (age / 0.2).clamp(0.0, 1.0);
            egui::Area::new(egui::Id::new(("toast", index)))
                .order(egui::Order::Foreground)
                .anchor(
                    egui::Align2::RIGHT_TOP,
                    egui::vec2(-20.0, 20.0 + index as f32 * 72.0),
                )
                .interactable(false)
                .show(ctx, |ui| {
                    egui::Frame::none()
                        .fill(bg.gamma_multiply(alpha))
                        .rounding(8.0)
                        .inner_margin(egui::Margin::symmetric(16.0, 12.0))
                        .show(ui, |ui| {
                            ui.set_width(TOAST_WIDTH - 32.0);
                            ui.label(
                                egui::RichText::new(&toast.notice.message)
                                    .color(fg.gamma_multiply(alpha))
                                    .size(13.0),
                            );
                        });
                });
        }
        if self
            .toasts
            .iter()
            .any(|toast| now.duration_since(toast.shown_at) < Duration::from_millis(200))
        {
            ctx.request_repaint();
        }
    }
}

fn card<R>(
    ui: &mut egui::Ui,
    theme: &ManagerTheme,
    title: &str,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    egui::Frame::none()
        .fill(theme.card_bg)
        .rounding(CARD_ROUNDING)
        .stroke(egui::Stroke::new(1.0, theme.separator))
        .inner_margin(CARD_PADDING)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                egui::RichText::new(title)
                    .size(16.0)
                    .strong()
                    .color(theme.title),
            );
            ui.add_space(10.0);
            add_contents(ui)
        })
        .inner
}

fn primary_button(ui: &mut egui::Ui, theme: &ManagerTheme, label: &str) -> egui::Response {
    ui.add(
        egui::Button::new(egui::RichText::new(label).color(theme.on_primary))
            .fill(theme.primary)
            .min_size(egui::vec2(0.0, ACTION_BUTTON_HEIGHT)),
    )
}

fn secondary_button(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add(egui::Button::new(label).min_size(egui::vec2(0.0, ACTION_BUTTON_HEIGHT)))
}

fn text_row(ui: &mut egui::Ui, label: &str, value: &mut String) -> bool {
    ui.label(label);
    let changed = ui
        .add(egui::TextEdit::singleline(value).desired_width(160.0))
        .changed();
    ui.end_row();
    changed
}

fn color_row(ui: &mut egui::Ui, label: &str, value: &mut String) -> bool {
    ui.label(label);
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= ui
            .add(egui::TextEdit::singleline(value).desired_width(100.0))
            .changed();
        let mut color = parse_hex_color(value).unwrap_or(egui::Color32::BLACK);
        if egui::color_picker::color_edit_button_srgba(
            ui,
            &mut color,
            egui::color_picker::Alpha::Opaque,
        )
        .changed()
        {
            *value = to_hex_color(color);
            changed = true;
        }
    });
    ui.end_row();
    changed
}

fn paint_grid(painter: &egui::Painter, rect: egui::Rect, theme: &ManagerTheme) {
    let stroke = egui::Stroke::new(1.0, theme.desktop_grid);
    let mut x = rect.left() + GRID_STEP;
    while x < rect.right() {
        painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], stroke);
        x += GRID_STEP;
    }
    let mut y = rect.top() + GRID_STEP;
    while y < rect.bottom() {
        painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], stroke);
        y += GRID_STEP;
    }
}

fn to_egui_rect(origin: egui::Pos2, rect: &CanvasRect) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(rect.x as f32, rect.y as f32),
        egui::vec2(rect.w as f32, rect.h as f32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_rects_are_offset_by_the_canvas_origin() {
        let rect = CanvasRect {
            x: 10.0,
            y: 20.0,
            w: 30.0,
            h: 40.0,
        };
        let mapped = to_egui_rect(egui::pos2(5.0, 5.0), &rect);
        assert_eq!(mapped.min, egui::pos2(15.0, 25.0));
        assert_eq!(mapped.size(), egui::vec2(30.0, 40.0));
    }

    #[test]
    fn every_notice_level_has_white_text_on_a_distinct_background() {
        use crate::notify::NoticeLevel;
        let levels = [
            NoticeLevel::Success,
            NoticeLevel::Info,
            NoticeLevel::Warning,
            NoticeLevel::Error,
        ];
        let backgrounds: Vec<_> = levels.iter().map(|l| toast_colors(*l).0).collect();
        for (i, bg) in backgrounds.iter().enumerate() {
            assert!(backgrounds[i + 1..].iter().all(|other| other != bg));
        }
        assert!(levels
            .iter()
            .all(|l| toast_colors(*l).1 == egui::Color32::WHITE));
    }
}
