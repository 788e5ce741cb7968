mod viewport;

#[cfg(not(windows))]
mod unsupported;
#[cfg(windows)]
mod win32;

#[cfg(not(windows))]
use unsupported as native;
#[cfg(windows)]
use win32 as native;

pub use viewport::ViewportSurface;

use crate::error::WidgetError;
use crate::pinning::{Placement, ScreenPos};
use crate::widgets::WidgetId;
use eframe::egui;

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSpec {
    pub id: WidgetId,
    pub title: String,
    pub pos: ScreenPos,
    pub size: (u32, u32),
    pub opacity: f32,
}

pub trait DesktopSurface {
    fn probe(&self) -> Result<(), WidgetError>;

    /// On `Err` the widget must still be shown, as a floating window.
    fn attach(&mut self, spec: &SurfaceSpec) -> Result<Placement, WidgetError>;

    fn reposition(&mut self, id: WidgetId, pos: ScreenPos);

    fn detach(&mut self, id: WidgetId);

    /// Called once per frame. Returns widgets demoted to floating, with the reason.
    fn sync(&mut self) -> Vec<(WidgetId, String)> {
        Vec::new()
    }
}

pub fn surface_title(id: WidgetId) -> String {
    format!("desk_widget:{}", id.raw())
}

pub fn viewport_id(id: WidgetId) -> egui::ViewportId {
    egui::ViewportId::from_hash_of(("desk_widget", id.raw()))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum SurfaceCall {
        Attach(WidgetId, ScreenPos),
        Reposition(WidgetId, ScreenPos),
        Detach(WidgetId),
    }

    // Records every call; clones share the same log so a test can keep one after boxing another.
    #[derive(Clone, Default)]
    pub struct RecordingSurface {
        calls: Rc<RefCell<Vec<SurfaceCall>>>,
        demotions: Rc<RefCell<Vec<(WidgetId, String)>>>,
        unavailable: bool,
    }

    impl RecordingSurface {
        pub fn unavailable() -> Self {
            Self {
                unavailable: true,
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<SurfaceCall> {
            self.calls.borrow().clone()
        }

        pub fn clear(&self) {
            self.calls.borrow_mut().clear();
        }

        // Makes the next `sync` report `id` as demoted to floating.
        pub fn demote(&self, id: WidgetId, reason: &str) {
            self.demotions.borrow_mut().push((id, reason.to_owned()));
        }
    }

    impl DesktopSurface for RecordingSurface {
        fn probe(&self) -> Result<(), WidgetError> {
            if self.unavailable {
                Err(WidgetError::PlatformCapabilityUnavailable(
                    "no desktop layer in tests".to_owned(),
                ))
            } else {
                Ok(())
            }
        }

        fn attach(&mut self, spec: &SurfaceSpec) -> Result<Placement, WidgetError> {
            self.calls
                .borrow_mut()
                .push(SurfaceCall::Attach(spec.id, spec.pos));
            self.probe().map(|()| Placement::Desktop)
        }

        fn reposition(&mut self, id: WidgetId, pos: ScreenPos) {
            self.calls
                .borrow_mut()
                .push(SurfaceCall::Reposition(id, pos));
        }

        fn detach(&mut self, id: WidgetId) {
            self.calls.borrow_mut().push(SurfaceCall::Detach(id));
        }

        fn sync(&mut self) -> Vec<(WidgetId, String)> {
            self.demotions.borrow_mut().drain(..).collect()
        }
    }
}
