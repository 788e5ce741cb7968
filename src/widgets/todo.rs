use super::config::*;
use super::{font, Refresh, Rendered, WidgetConfig, WidgetContent};
use chrono::NaiveDateTime;
use eframe::egui::{self, Color32, RichText};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TodoList {
    items: Vec<TodoItem>,
    draft: String,
}

enum TodoAction {
    Add,
    Toggle(usize),
    Delete(usize),
}

impl TodoList {
    #[cfg(test)]
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn add(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.items.push(TodoItem {
            text: text.to_owned(),
            completed: false,
        });
        true
    }

    pub fn toggle(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.completed = !item.completed;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.items.remove(index);
            true
        } else {
            false
        }
    }

    fn apply(&mut self, action: TodoAction) -> bool {
        match action {
            TodoAction::Add => {
                let draft = std::mem::take(&mut self.draft);
                self.add(&draft)
            }
            TodoAction::Toggle(index) => self.toggle(index),
            TodoAction::Delete(index) => self.delete(index),
        }
    }
}

impl WidgetContent for TodoList {
    fn default_config() -> WidgetConfig {
        WidgetConfig::new()
            .with(WIDTH, 320)
            .with(HEIGHT, 400)
            .with(BG_COLOR, "#FFFFFF")
            .with(TEXT_COLOR, "#1C1B1F")
            .with(ACCENT_COLOR, "#6750A4")
            .with(SURFACE_COLOR, "#F7F2FA")
            .with(FONT_FAMILY, "Segoe UI")
            .with(FONT_SIZE, 11)
            .with(OPACITY, 0.95)
            .with(MAX_ITEMS, 10)
    }

    fn render(&mut self, ui: &mut egui::Ui, config: &WidgetConfig) -> Rendered {
        let size = config.font_size();
        let text_color = config.text_color();
        let accent = config.accent_color();
        let surface = config.color_or(SURFACE_COLOR, Color32::from_rgb(0xF7, 0xF2, 0xFA));
        let max_items = config.u32_or(MAX_ITEMS, 10) as usize;
        let title_font = font(ui, config, size + 5.0);
        let item_font = font(ui, config, size);
        let mut action = None;

        let response = ui
            .vertical(|ui| {
                ui.label(
                    RichText::new("Tasks")
                        .font(title_font)
                        .color(text_color)
                        .strong(),
                );
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    let edit = ui.add(
                        egui::TextEdit::singleline(&mut self.draft)
                            .hint_text("Add a task")
                            .desired_width((ui.available_width() - 52.0).max(40.0)),
                    );
                    let submitted =
                        edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button(RichText::new("Add").color(accent)).clicked() || submitted {
                        action = Some(TodoAction::Add);
                    }
                });
                ui.add_space(4.0);

                for (index, item) in self.items.iter().enumerate().take(max_items) {
                    egui::Frame::none()
                        .fill(surface)
                        .rounding(8.0)
                        .inner_margin(egui::Margin::symmetric(8.0, 4.0))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                let mut completed = item.completed;
                                if ui.checkbox(&mut completed, "").changed() {
                                    action = Some(TodoAction::Toggle(index));
                                }
                                let mut label =
                                    RichText::new(&item.text).font(item_font.clone());
                                label = if item.completed {
                                    label.strikethrough().color(text_color.gamma_multiply(0.5))
                                } else {
                                    label.color(text_color)
                                };
                                ui.label(label);
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        let delete = egui::Button::new(
                                            RichText::new("🗑").color(accent),
                                        )
                                        .frame(false);
                                        if ui.add(delete).on_hover_text("Delete").clicked() {
                                            action = Some(TodoAction::Delete(index));
                                        }
                                    },
                                );
                            });
                        });
                }

                let hidden = self.items.len().saturating_sub(max_items);
                if hidden > 0 {
                    ui.label(
                        RichText::new(format!("+{hidden} more"))
                            .font(item_font.clone())
                            .color(accent),
                    );
                }
            })
            .response;

        if let Some(action) = action {
            if self.apply(action) {
                ui.ctx().request_repaint();
            }
        }

        Rendered {
            response,
            notice: None,
        }
    }

    fn refresh(&mut self, _config: &WidgetConfig, _now: NaiveDateTime) -> Refresh {
        Refresh::default()
    }
}
