use crossbeam_channel::Receiver;
use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    Show,
    Hide,
    Quit,
}

pub struct RuntimeHandles {
    pub rx: Receiver<UserEvent>,
    #[cfg(windows)]
    pub tray: tray::TrayHandles,
}

#[cfg(not(windows))]
pub fn build_runtime(_ctx: &egui::Context) -> RuntimeHandles {
    // No tray outside Windows; the sender is dropped on return so nothing is ever received.
    let (_tx, rx) = crossbeam_channel::unbounded();
    RuntimeHandles { rx }
}

#[cfg(windows)]
pub fn build_runtime(ctx: &egui::Context) -> RuntimeHandles {
    let (tx, rx) = crossbeam_channel::unbounded();
    let tray = tray::build(ctx, tx);
    RuntimeHandles { rx, tray }
}

#[cfg(windows)]
pub mod tray {
    use super::UserEvent;
    use crate::branding::APP_DISPLAY_NAME;
    use crossbeam_channel::{Sender, TryRecvError};
    use eframe::egui;
    use log::error;
    use std::thread;
    use std::time::Duration;
    use tray_icon::{
        menu::{Menu, MenuEvent, MenuId, MenuItem},
        Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent,
    };

    const ICON_COLOR: [u8; 4] = [0x67, 0x50, 0xA4, 0xFF];

    pub struct TrayHandles {
        // Dropping the handle removes the icon from the tray.
        _icon: Option<TrayIcon>,
        pub toggle_item: MenuItem,
    }

    impl TrayHandles {
        pub fn set_visible(&self, visible: bool) {
            self.toggle_item
                .set_text(if visible { "Hide" } else { "Show" });
        }
    }

    pub fn build(ctx: &egui::Context, tx: Sender<UserEvent>) -> TrayHandles {
        let menu = Menu::new();
        let toggle_item = MenuItem::new("Hide", true, None);
        let quit_item = MenuItem::new("Quit", true, None);
        if let Err(err) = menu.append_items(&[&toggle_item, &quit_item]) {
            error!("failed to build tray menu: {err}");
        }

        let icon = solid_icon(ICON_COLOR).and_then(|icon| {
            TrayIconBuilder::new()
                .with_menu(Box::new(menu))
                .with_tooltip(APP_DISPLAY_NAME)
                .with_icon(icon)
                .build()
                .map_err(|err| error!("failed to create tray icon: {err}"))
                .ok()
        });

        spawn_event_loop(
            tx,
            ctx.clone(),
            toggle_item.id().clone(),
            quit_item.id().clone(),
        );
        TrayHandles {
            _icon: icon,
            toggle_item,
        }
    }

    fn solid_icon(color: [u8; 4]) -> Option<Icon> {
        let side = 32u32;
        let rgba = color.repeat((side * side) as usize);
        Icon::from_rgba(rgba, side, side)
            .map_err(|err| error!("failed to create tray icon image: {err}"))
            .ok()
    }

    fn spawn_event_loop(tx: Sender<UserEvent>, ctx: egui::Context, toggle_id: MenuId, quit_id: MenuId) {
        thread::spawn(move || {
            let mut is_visible = true;
            loop {
                match MenuEvent::receiver().try_recv() {
                    Ok(event) if event.id == toggle_id => {
                        let action = toggle(is_visible);
                        apply_action(action, &tx, &ctx, &mut is_visible);
                    }
                    Ok(event) if event.id == quit_id => {
                        apply_action(UserEvent::Quit, &tx, &ctx, &mut is_visible);
                        break;
                    }
                    Ok(_) | Err(TryRecvError::Empty) => {}
                    Err(err) => error!("menu receiver error: {err}"),
                }

                match TrayIconEvent::receiver().try_recv() {
                    Ok(TrayIconEvent::Click {
                        button: MouseButton::Left,
                        button_state: MouseButtonState::Up,
                        ..
                    }) => {
                        let action = toggle(is_visible);
                        apply_action(action, &tx, &ctx, &mut is_visible);
                    }
                    Ok(_) | Err(TryRecvError::Empty) => {}
                    Err(err) => error!("tray receiver error: {err}"),
                }

                thread::sleep(Duration::from_millis(10));
            }
        });
    }

    fn apply_action(action: UserEvent, tx: &Sender<UserEvent>, ctx: &egui::Context, is_visible: &mut bool) {
        match action {
            UserEvent::Show => {
                *is_visible = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
                ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
                ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
            }
            UserEvent::Hide => {
                *is_visible = false;
                ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true));
            }
            UserEvent::Quit => {}
        }
        let _ = tx.send(action);
        ctx.request_repaint();
    }

    fn toggle(is_visible: bool) -> UserEvent {
        if is_visible {
            UserEvent::Hide
        } else {
            UserEvent::Show
        }
    }
}
