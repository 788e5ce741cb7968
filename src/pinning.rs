use crate::platform::{DesktopSurface, SurfaceSpec};
use crate::widgets::WidgetId;

pub const STAGGER_ORIGIN: i32 = 100;
pub const STAGGER_STEP: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenPos {
    pub x: i32,
    pub y: i32,
}

impl ScreenPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Desktop,
    Floating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesktopAttachment {
    pub pos: ScreenPos,
    pub placement: Placement,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PinOutcome {
    Pinned {
        attachment: DesktopAttachment,
        fallback: Option<String>,
    },
    AlreadyPinned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpinOutcome {
    Unpinned,
    NotPinned,
}

pub fn staggered_position(pinned_count: usize) -> ScreenPos {
    let k = i32::try_from(pinned_count).unwrap_or(i32::MAX / STAGGER_STEP);
    let offset = STAGGER_ORIGIN.saturating_add(STAGGER_STEP.saturating_mul(k));
    ScreenPos::new(offset, offset)
}

pub fn pin(
    slot: &mut Option<DesktopAttachment>,
    spec: &SurfaceSpec,
    surface: &mut dyn DesktopSurface,
) -> PinOutcome {
    if slot.is_some() {
        return PinOutcome::AlreadyPinned;
    }
    let (placement, fallback) = match surface.attach(spec) {
        Ok(placement) => (placement, None),
        Err(err) => (Placement::Floating, Some(err.to_string())),
    };
    let attachment = DesktopAttachment {
        pos: spec.pos,
        placement,
    };
    *slot = Some(attachment);
    PinOutcome::Pinned {
        attachment,
        fallback,
    }
}

pub fn unpin(
    slot: &mut Option<DesktopAttachment>,
    id: WidgetId,
    surface: &mut dyn DesktopSurface,
) -> UnpinOutcome {
    match slot.take() {
        Some(_) => {
            surface.detach(id);
            UnpinOutcome::Unpinned
        }
        None => UnpinOutcome::NotPinned,
    }
}

pub fn reposition(
    slot: &mut Option<DesktopAttachment>,
    id: WidgetId,
    pos: ScreenPos,
    surface: &mut dyn DesktopSurface,
) -> bool {
    match slot {
        Some(attachment) => {
            if attachment.pos != pos {
                attachment.pos = pos;
                surface.reposition(id, pos);
            }
            true
        }
        None => false,
    }
}
