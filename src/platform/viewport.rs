use super::{native, viewport_id, DesktopSurface, SurfaceSpec};
use crate::error::WidgetError;
use crate::pinning::{Placement, ScreenPos};
use crate::widgets::WidgetId;
use eframe::egui;
use log::{debug, info, warn};
use std::collections::HashMap;

// Frames to wait for a fresh viewport's OS window before giving up on anchoring it.
const MAX_ANCHOR_ATTEMPTS: u32 = 180;

struct Hosted {
    title: String,
    pos: ScreenPos,
    placement: Placement,
    anchored: bool,
    attempts: u32,
}

pub struct ViewportSurface {
    ctx: egui::Context,
    hosted: HashMap<WidgetId, Hosted>,
}

impl ViewportSurface {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            hosted: HashMap::new(),
        }
    }
}

impl DesktopSurface for ViewportSurface {
    fn probe(&self) -> Result<(), WidgetError> {
        native::probe().map_err(WidgetError::PlatformCapabilityUnavailable)
    }

    fn attach(&mut self, spec: &SurfaceSpec) -> Result<Placement, WidgetError> {
        let probed = self.probe();
        let placement = if probed.is_ok() {
            Placement::Desktop
        } else {
            Placement::Floating
        };
        self.hosted.insert(
            spec.id,
            Hosted {
                title: spec.title.clone(),
                pos: spec.pos,
                placement,
                anchored: false,
                attempts: 0,
            },
        );
        self.ctx.request_repaint();
        probed.map(|()| placement)
    }

    fn reposition(&mut self, id: WidgetId, pos: ScreenPos) {
        let Some(hosted) = self.hosted.get_mut(&id) else {
            return;
        };
        hosted.pos = pos;
        if hosted.anchored {
            if let Err(err) = native::move_to(&hosted.title, pos) {
                warn!("failed to move {}: {err}", hosted.title);
            }
        } else {
            self.ctx.send_viewport_cmd_to(
                viewport_id(id),
                egui::ViewportCommand::OuterPosition(egui::pos2(pos.x as f32, pos.y as f32)),
            );
        }
    }

    fn detach(&mut self, id: WidgetId) {
        if let Some(hosted) = self.hosted.remove(&id) {
            if hosted.anchored {
                native::release(&hosted.title);
            }
            debug!("released {}", hosted.title);
        }
    }

    fn sync(&mut self) -> Vec<(WidgetId, String)> {
        let mut demoted = Vec::new();
        for (id, hosted) in &mut self.hosted {
            if hosted.placement != Placement::Desktop || hosted.anchored {
                continue;
            }
            let failure = match native::anchor(&hosted.title, hosted.pos) {
                Ok(true) => {
                    hosted.anchored = true;
                    info!("anchored {} to the desktop layer", hosted.title);
                    None
                }
                Ok(false) => {
                    hosted.attempts += 1;
                    (hosted.attempts > MAX_ANCHOR_ATTEMPTS)
                        .then(|| format!("window {} never appeared", hosted.title))
                }
                Err(err) => Some(err),
            };
            if let Some(reason) = failure {
                hosted.placement = Placement::Floating;
                warn!("demoting {} to floating: {reason}", hosted.title);
                demoted.push((*id, reason));
            }
        }
        if self
            .hosted
            .values()
            .any(|hosted| hosted.placement == Placement::Desktop && !hosted.anchored)
        {
            self.ctx.request_repaint();
        }
        demoted
    }
}
