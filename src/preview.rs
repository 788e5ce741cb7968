use crate::pinning::ScreenPos;
use crate::widgets::WidgetId;

pub const DEFAULT_ORIGIN_X: f64 = 200.0;
pub const DEFAULT_ORIGIN_Y: f64 = 150.0;
pub const DEFAULT_STEP: f64 = 50.0;

const TASKBAR_HEIGHT: f64 = 40.0;
const ICON_SIDE: f64 = 48.0;
const ICON_MARGIN: f64 = 20.0;
const ICON_PITCH: f64 = 90.0;
const ICON_LABELS: [&str; 2] = ["My Computer", "Recycle Bin"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl CanvasRect {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    fn distance_sq(&self, px: f64, py: f64) -> f64 {
        let dx = (self.x - px).max(px - (self.x + self.w)).max(0.0);
        let dy = (self.y - py).max(py - (self.y + self.h)).max(0.0);
        dx * dx + dy * dy
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub fn between(screen: (f64, f64), canvas: (f64, f64)) -> Self {
        Self {
            x: canvas.0 / screen.0.max(1.0),
            y: canvas.1 / screen.1.max(1.0),
        }
    }

    pub fn to_canvas(&self, real_x: f64, real_y: f64) -> (f64, f64) {
        (real_x * self.x, real_y * self.y)
    }

    pub fn to_real_delta(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx / self.x, dy / self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewSource {
    pub widget: WidgetId,
    pub attached: Option<ScreenPos>,
    pub size: (u32, u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewItem {
    pub widget: WidgetId,
    pub real_x: f64,
    pub real_y: f64,
    pub rect: CanvasRect,
    pub pinned: bool,
}

impl PreviewItem {
    pub fn real_pos(&self) -> ScreenPos {
        ScreenPos::new(self.real_x.round() as i32, self.real_y.round() as i32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    Icon,
    Taskbar,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub label: &'static str,
    pub rect: CanvasRect,
}

#[derive(Debug, Clone, Copy)]
enum Drawable {
    Decoration,
    Item(usize),
}

// Scaled model of the desktop. Items keep their real position in `f64` so a drag
// only rounds when the position is written to a pinned widget.
#[derive(Debug, Clone)]
pub struct PreviewSession {
    scale: Scale,
    canvas: (f64, f64),
    decorations: Vec<Decoration>,
    items: Vec<PreviewItem>,
    active: Option<usize>,
}

impl PreviewSession {
    pub fn open(screen: (f64, f64), canvas: (f64, f64), sources: &[PreviewSource]) -> Self {
        let scale = Scale::between(screen, canvas);
        let mut session = Self {
            scale,
            canvas,
            decorations: desktop_decorations(screen, scale),
            items: Vec::new(),
            active: None,
        };
        session.sync(sources);
        session
    }

    pub fn default_position(index: usize) -> (f64, f64) {
        let step = DEFAULT_STEP * index as f64;
        (DEFAULT_ORIGIN_X + step, DEFAULT_ORIGIN_Y + step)
    }

    #[cfg(test)]
    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        self.canvas
    }

    pub fn items(&self) -> &[PreviewItem] {
        &self.items
    }

    pub fn item(&self, widget: WidgetId) -> Option<&PreviewItem> {
        self.items.iter().find(|item| item.widget == widget)
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn active(&self) -> Option<WidgetId> {
        self.active
            .and_then(|index| self.items.get(index))
            .map(|item| item.widget)
    }

    /// Rebuilds items from the current widget collection. Pinned widgets follow their
    /// attachment; unpinned ones keep a previous preview position or take the default stagger.
    pub fn sync(&mut self, sources: &[PreviewSource]) {
        let active = self.active();
        let previous = std::mem::take(&mut self.items);
        let scale = self.scale;
        self.items = sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let known = previous.iter().find(|item| item.widget == source.widget);
                let (real_x, real_y) = match (source.attached, known) {
                    (Some(pos), Some(item)) if item.real_pos() == pos => (item.real_x, item.real_y),
                    (Some(pos), _) => (f64::from(pos.x), f64::from(pos.y)),
                    (None, Some(item)) => (item.real_x, item.real_y),
                    (None, None) => Self::default_position(index),
                };
                let (x, y) = scale.to_canvas(real_x, real_y);
                let (w, h) = scale.to_canvas(f64::from(source.size.0), f64::from(source.size.1));
                PreviewItem {
                    widget: source.widget,
                    real_x,
                    real_y,
                    rect: CanvasRect { x, y, w, h },
                    pinned: source.attached.is_some(),
                }
            })
            .collect();
        self.active = active.and_then(|widget| self.items.iter().position(|i| i.widget == widget));
    }

    pub fn follow(&mut self, widget: WidgetId, pos: ScreenPos) {
        let scale = self.scale;
        if let Some(item) = self.items.iter_mut().find(|item| item.widget == widget) {
            if item.real_pos() == pos {
                return;
            }
            item.real_x = f64::from(pos.x);
            item.real_y = f64::from(pos.y);
            let (x, y) = scale.to_canvas(item.real_x, item.real_y);
            item.rect.x = x;
            item.rect.y = y;
        }
    }

    pub fn pointer_down(&mut self, px: f64, py: f64) -> Option<WidgetId> {
        self.active = match self.nearest(px, py) {
            Some(Drawable::Item(index)) => Some(index),
            _ => None,
        };
        self.active()
    }

    pub fn pointer_move(&mut self, dx: f64, dy: f64) -> Option<(WidgetId, ScreenPos)> {
        let (rdx, rdy) = self.scale.to_real_delta(dx, dy);
        let item = self.items.get_mut(self.active?)?;
        item.rect.translate(dx, dy);
        item.real_x += rdx;
        item.real_y += rdy;
        Some((item.widget, item.real_pos()))
    }

    pub fn release(&mut self) -> Option<WidgetId> {
        let released = self.active();
        self.active = None;
        released
    }

    pub fn pinned_positions(&self) -> Vec<(WidgetId, ScreenPos)> {
        self.items
            .iter()
            .filter(|item| item.pinned)
            .map(|item| (item.widget, item.real_pos()))
            .collect()
    }

    pub fn reset(&mut self) -> Vec<(WidgetId, ScreenPos)> {
        let scale = self.scale;
        self.items
            .iter_mut()
            .enumerate()
            .map(|(index, item)| {
                let (real_x, real_y) = Self::default_position(index);
                let (x, y) = scale.to_canvas(real_x, real_y);
                item.rect.translate(x - item.rect.x, y - item.rect.y);
                item.real_x = real_x;
                item.real_y = real_y;
                (item.widget, item.real_pos())
            })
            .collect()
    }

    fn nearest(&self, px: f64, py: f64) -> Option<Drawable> {
        let decorations = self
            .decorations
            .iter()
            .map(|decoration| (decoration.rect, Drawable::Decoration));
        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| (item.rect, Drawable::Item(index)));

        let mut best: Option<(f64, Drawable)> = None;
        // Later drawables sit on top, so ties go to the last one seen.
        for (rect, drawable) in decorations.chain(items) {
            let distance = rect.distance_sq(px, py);
            if best.map_or(true, |(closest, _)| distance <= closest) {
                best = Some((distance, drawable));
            }
        }
        best.map(|(_, drawable)| drawable)
    }
}

fn desktop_decorations(screen: (f64, f64), scale: Scale) -> Vec<Decoration> {
    let to_canvas = |x: f64, y: f64, w: f64, h: f64| {
        let (cx, cy) = scale.to_canvas(x, y);
        let (cw, ch) = scale.to_canvas(w, h);
        CanvasRect {
            x: cx,
            y: cy,
            w: cw,
            h: ch,
        }
    };
    let mut decorations: Vec<Decoration> = ICON_LABELS
        .into_iter()
        .enumerate()
        .map(|(i, label)| Decoration {
            kind: DecorationKind::Icon,
            label,
            rect: to_canvas(
                ICON_MARGIN,
                ICON_MARGIN + ICON_PITCH * i as f64,
                ICON_SIDE,
                ICON_SIDE,
            ),
        })
        .collect();
    decorations.push(Decoration {
        kind: DecorationKind::Taskbar,
        label: "⊞ Start",
        rect: to_canvas(0.0, screen.1 - TASKBAR_HEIGHT, screen.0, TASKBAR_HEIGHT),
    });
    decorations
}
