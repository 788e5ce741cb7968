use crate::customize::StyleDraft;
use crate::error::WidgetError;
use crate::layout::{self, LayoutEntry, LayoutRecord, PersistedLayout};
use crate::notify::{Notice, Notifier};
use crate::pinning::{self, DesktopAttachment, PinOutcome, Placement, ScreenPos, UnpinOutcome};
use crate::platform::{surface_title, DesktopSurface, SurfaceSpec};
use crate::preview::{PreviewSession, PreviewSource};
use crate::scheduler::Scheduler;
use crate::widgets::{Content, WidgetConfig, WidgetId, WidgetKind};
use chrono::NaiveDateTime;
use eframe::egui;
use log::{debug, info, warn};
use serde_json::Map;
use std::path::Path;
use std::time::{Duration, Instant};

pub struct WidgetInstance {
    id: WidgetId,
    name: String,
    config: WidgetConfig,
    content: Content,
    attachment: Option<DesktopAttachment>,
    // Last applied config while a live customization preview is showing.
    committed: Option<WidgetConfig>,
}

impl WidgetInstance {
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn kind(&self) -> WidgetKind {
        self.content.kind()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn content_mut(&mut self) -> &mut Content {
        &mut self.content
    }

    pub fn attachment(&self) -> Option<DesktopAttachment> {
        self.attachment
    }

    pub fn is_pinned(&self) -> bool {
        self.attachment.is_some()
    }

    fn surface_spec(&self, pos: ScreenPos) -> SurfaceSpec {
        SurfaceSpec {
            id: self.id,
            title: surface_title(self.id),
            pos,
            size: (self.config.width(), self.config.height()),
            opacity: self.config.opacity(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

// Owns every widget and is the only place that mutates them, so attachments,
// scheduled refreshes and the preview never disagree after a call returns.
pub struct WidgetManager {
    instances: Vec<WidgetInstance>,
    next_id: u64,
    scheduler: Scheduler,
    surface: Box<dyn DesktopSurface>,
    preview: Option<PreviewSession>,
    notifier: Notifier,
    fallback_reported: bool,
}

impl WidgetManager {
    pub fn new(surface: Box<dyn DesktopSurface>, notifier: Notifier) -> Self {
        Self {
            instances: Vec::new(),
            next_id: 1,
            scheduler: Scheduler::new(),
            surface,
            preview: None,
            notifier,
            fallback_reported: false,
        }
    }

    pub fn instances(&self) -> &[WidgetInstance] {
        &self.instances
    }

    pub fn get(&self, id: WidgetId) -> Option<&WidgetInstance> {
        self.instances.iter().find(|instance| instance.id == id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetInstance> {
        self.instances.iter_mut().find(|instance| instance.id == id)
    }

    pub fn pinned_count(&self) -> usize {
        self.instances.iter().filter(|i| i.is_pinned()).count()
    }

    fn index_of(&self, id: WidgetId) -> Option<usize> {
        self.instances.iter().position(|instance| instance.id == id)
    }

    fn notify(&self, notice: Notice) {
        self.notifier.send(notice);
    }

    pub fn create(&mut self, kind: WidgetKind, now: Instant) -> WidgetId {
        let name = format!("{} #{}", kind.type_name(), self.instances.len() + 1);
        let id = self.insert(kind, name, kind.default_config(), now);
        self.pin(id);
        self.notify(Notice::success(format!(
            "{kind} widget created and pinned to desktop!"
        )));
        id
    }

    fn insert(&mut self, kind: WidgetKind, name: String, config: WidgetConfig, now: Instant) -> WidgetId {
        let id = WidgetId::new(self.next_id);
        self.next_id += 1;
        self.instances.push(WidgetInstance {
            id,
            name,
            config,
            content: Content::new(kind),
            attachment: None,
            committed: None,
        });
        self.scheduler.schedule(id, now, Duration::ZERO);
        debug!("inserted {kind} widget {id}");
        self.sync_preview();
        id
    }

    pub fn remove(&mut self, id: WidgetId) -> bool {
        let Some(index) = self.index_of(id) else {
            self.notify(Notice::warning("That widget no longer exists."));
            return false;
        };
        self.discard(index);
        self.sync_preview();
        self.notify(Notice::success("Widget removed successfully!"));
        true
    }

    fn discard(&mut self, index: usize) {
        let mut instance = self.instances.remove(index);
        pinning::unpin(&mut instance.attachment, instance.id, self.surface.as_mut());
        self.scheduler.cancel(instance.id);
        debug!("discarded widget {}", instance.id);
    }

    pub fn pin(&mut self, id: WidgetId) -> Option<PinOutcome> {
        let pos = pinning::staggered_position(self.pinned_count());
        self.pin_at(id, pos)
    }

    pub fn pin_at(&mut self, id: WidgetId, pos: ScreenPos) -> Option<PinOutcome> {
        let index = self.index_of(id)?;
        let outcome = self.attach(index, pos);
        match &outcome {
            PinOutcome::AlreadyPinned => {
                self.notify(Notice::info("Widget is already pinned to desktop!"));
            }
            PinOutcome::Pinned { .. } => self.sync_preview(),
        }
        Some(outcome)
    }

    fn attach(&mut self, index: usize, pos: ScreenPos) -> PinOutcome {
        let instance = &mut self.instances[index];
        let spec = instance.surface_spec(pos);
        let outcome = pinning::pin(&mut instance.attachment, &spec, self.surface.as_mut());
        if let PinOutcome::Pinned {
            fallback: Some(reason),
            ..
        } = &outcome
        {
            self.report_fallback(spec.id, reason);
        }
        outcome
    }

    // The user hears about the missing desktop layer once per session.
    fn report_fallback(&mut self, id: WidgetId, reason: &str) {
        if self.fallback_reported {
            debug!("floating fallback for {id}: {reason}");
            return;
        }
        self.fallback_reported = true;
        self.notify(Notice::warning(format!(
            "Desktop pinning unavailable, widgets float on top instead: {reason}"
        )));
    }

    pub fn unpin(&mut self, id: WidgetId) -> Option<UnpinOutcome> {
        let index = self.index_of(id)?;
        let instance = &mut self.instances[index];
        let name = instance.name.clone();
        let outcome = pinning::unpin(&mut instance.attachment, id, self.surface.as_mut());
        match outcome {
            UnpinOutcome::Unpinned => {
                self.sync_preview();
                self.notify(Notice::success(format!("{name} unpinned from desktop!")));
            }
            UnpinOutcome::NotPinned => {
                self.notify(Notice::info("Widget is not currently pinned to desktop."))
            }
        }
        Some(outcome)
    }

    fn repin(&mut self, index: usize) {
        let instance = &mut self.instances[index];
        let Some(attachment) = instance.attachment else {
            return;
        };
        pinning::unpin(&mut instance.attachment, instance.id, self.surface.as_mut());
        self.attach(index, attachment.pos);
    }

    pub fn reposition(&mut self, id: WidgetId, pos: ScreenPos) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let instance = &mut self.instances[index];
        let moved = pinning::reposition(&mut instance.attachment, id, pos, self.surface.as_mut());
        if moved {
            if let Some(preview) = self.preview.as_mut() {
                preview.follow(id, pos);
            }
        }
        moved
    }

    pub fn customize(&mut self, id: WidgetId, draft: &StyleDraft) -> Result<(), WidgetError> {
        let Some(index) = self.index_of(id) else {
            return Ok(());
        };
        // The dialog shows parse errors inline.
        let patch = draft.parse()?;
        let instance = &mut self.instances[index];
        let base = instance.committed.take().unwrap_or_else(|| instance.config.clone());
        instance.config = patch.apply_to(&base);
        self.repin(index);
        self.sync_preview();
        self.notify(Notice::success("Widget customized successfully!"));
        Ok(())
    }

    pub fn preview_customization(&mut self, id: WidgetId, draft: &StyleDraft) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let Ok(patch) = draft.parse() else {
            return false;
        };
        let instance = &mut self.instances[index];
        let base = instance
            .committed
            .get_or_insert_with(|| instance.config.clone())
            .clone();
        let previewed = patch.apply_to(&base);
        if previewed == instance.config {
            return false;
        }
        instance.config = previewed;
        self.repin(index);
        self.sync_preview();
        true
    }

    pub fn cancel_customization(&mut self, id: WidgetId) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let instance = &mut self.instances[index];
        if let Some(committed) = instance.committed.take() {
            if committed != instance.config {
                instance.config = committed;
                self.repin(index);
                self.sync_preview();
            }
        }
    }

    pub fn save(&self) -> PersistedLayout {
        let widgets = self
            .instances
            .iter()
            .map(|instance| {
                let config = instance.committed.as_ref().unwrap_or(&instance.config);
                LayoutEntry::Record(LayoutRecord::new(
                    instance.kind(),
                    &instance.name,
                    config,
                    instance.attachment.map(|attachment| attachment.pos),
                ))
            })
            .collect();
        PersistedLayout {
            widgets,
            desktop_positions: Map::new(),
        }
    }

    pub fn save_to(&mut self, path: &Path) -> Result<(), WidgetError> {
        match layout::write_layout(path, &self.save()) {
            Ok(()) => {
                info!("layout saved to {}", path.display());
                self.notify(Notice::success("Configuration saved successfully!"));
                Ok(())
            }
            Err(err) => {
                self.notify(Notice::error(format!("Failed to save configuration: {err}")));
                Err(err.into())
            }
        }
    }

    pub fn load(&mut self, document: PersistedLayout, now: Instant) -> LoadReport {
        while !self.instances.is_empty() {
            self.discard(self.instances.len() - 1);
        }
        let mut report = LoadReport::default();
        for entry in document.widgets {
            let (kind, record) = match entry.into_record() {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!("skipping saved widget: {err}");
                    report.skipped += 1;
                    continue;
                }
            };
            let pin = record.pin_position();
            let config = record.widget_config(kind);
            let id = self.insert(kind, record.name, config, now);
            if let Some(pos) = pin {
                self.pin_at(id, pos);
            }
            report.loaded += 1;
        }
        self.sync_preview();
        report
    }

    /// `Ok(None)` when no layout file exists yet; on error the current widgets stay untouched.
    pub fn load_from(&mut self, path: &Path, now: Instant) -> Result<Option<LoadReport>, WidgetError> {
        let document = match layout::read_layout(path) {
            Ok(Some(document)) => document,
            Ok(None) => {
                debug!("no saved layout at {}", path.display());
                return Ok(None);
            }
            Err(err) => {
                self.notify(Notice::error(format!("Failed to load configuration: {err}")));
                return Err(err.into());
            }
        };
        let report = self.load(document, now);
        if report.skipped > 0 {
            self.notify(Notice::warning(format!(
                "Loaded {} widgets, skipped {} of unknown type.",
                report.loaded, report.skipped
            )));
        } else {
            self.notify(Notice::success("Configuration loaded successfully!"));
        }
        Ok(Some(report))
    }

    pub fn tick(&mut self, now: Instant) -> usize {
        self.tick_at(now, chrono::Local::now().naive_local())
    }

    pub fn tick_at(&mut self, now: Instant, wall_clock: NaiveDateTime) -> usize {
        let due = self.scheduler.pop_due(now);
        let mut refreshed = 0;
        for id in due {
            let Some(instance) = self.instances.iter_mut().find(|i| i.id == id) else {
                debug!("dropping refresh for removed widget {id}");
                continue;
            };
            let refresh = instance.content.refresh(&instance.config, wall_clock);
            refreshed += 1;
            if let Some(next) = refresh.next {
                self.scheduler.schedule(id, now, next);
            }
            if let Some(notice) = refresh.notice {
                self.notifier.send(notice);
            }
        }
        refreshed
    }

    pub fn next_refresh(&mut self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn sync_surface(&mut self) {
        for (id, reason) in self.surface.sync() {
            let Some(instance) = self.get_mut(id) else {
                continue;
            };
            if let Some(attachment) = instance.attachment.as_mut() {
                attachment.placement = Placement::Floating;
            }
            self.report_fallback(id, &reason);
        }
    }

    pub fn render(&mut self, id: WidgetId, ui: &mut egui::Ui) -> Option<egui::Response> {
        let instance = self.instances.iter_mut().find(|i| i.id == id)?;
        let rendered = instance.content.render(ui, &instance.config);
        if let Some(notice) = rendered.notice {
            self.notifier.send(notice);
        }
        Some(rendered.response)
    }

    pub fn open_preview(&mut self, screen: (f64, f64), canvas: (f64, f64)) {
        let sources = self.preview_sources();
        self.preview = Some(PreviewSession::open(screen, canvas, &sources));
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    pub fn preview(&self) -> Option<&PreviewSession> {
        self.preview.as_ref()
    }

    pub fn preview_pointer_down(&mut self, x: f64, y: f64) -> Option<WidgetId> {
        self.preview.as_mut()?.pointer_down(x, y)
    }

    pub fn preview_drag(&mut self, dx: f64, dy: f64) -> Option<ScreenPos> {
        let (id, pos) = self.preview.as_mut()?.pointer_move(dx, dy)?;
        let index = self.index_of(id)?;
        let instance = &mut self.instances[index];
        pinning::reposition(&mut instance.attachment, id, pos, self.surface.as_mut());
        Some(pos)
    }

    pub fn preview_release(&mut self) {
        if let Some(preview) = self.preview.as_mut() {
            preview.release();
        }
    }

    pub fn apply_preview_positions(&mut self) -> usize {
        let Some(positions) = self.preview.as_ref().map(PreviewSession::pinned_positions) else {
            return 0;
        };
        let applied = self.write_positions(&positions);
        self.notify(Notice::success(format!(
            "Applied positions for {applied} widgets!"
        )));
        applied
    }

    pub fn reset_preview_positions(&mut self) -> usize {
        let Some(positions) = self.preview.as_mut().map(PreviewSession::reset) else {
            return 0;
        };
        let moved = self.write_positions(&positions);
        self.notify(Notice::info("Widget positions reset to defaults"));
        moved
    }

    fn write_positions(&mut self, positions: &[(WidgetId, ScreenPos)]) -> usize {
        let mut written = 0;
        for (id, pos) in positions {
            if let Some(index) = self.index_of(*id) {
                let instance = &mut self.instances[index];
                if pinning::reposition(&mut instance.attachment, *id, *pos, self.surface.as_mut()) {
                    written += 1;
                }
            }
        }
        written
    }

    fn preview_sources(&self) -> Vec<PreviewSource> {
        self.instances
            .iter()
            .map(|instance| PreviewSource {
                widget: instance.id,
                attached: instance.attachment.map(|attachment| attachment.pos),
                size: (instance.config.width(), instance.config.height()),
            })
            .collect()
    }

    fn sync_preview(&mut self) {
        if self.preview.is_none() {
            return;
        }
        let sources = self.preview_sources();
        if let Some(preview) = self.preview.as_mut() {
            preview.sync(&sources);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeLevel;
    use crate::platform::testing::{RecordingSurface, SurfaceCall};
    use crate::widgets::timer::TIME_UP_MESSAGE;
    use crate::widgets::TodoList;
    use crossbeam_channel::Receiver;
    use std::path::PathBuf;

    const SCREEN: (f64, f64) = (1920.0, 1080.0);
    const CANVAS: (f64, f64) = (960.0, 540.0);

    fn manager_with(surface: RecordingSurface) -> (WidgetManager, Receiver<Notice>) {
        let (notifier, rx) = Notifier::channel();
        (WidgetManager::new(Box::new(surface), notifier), rx)
    }

    fn manager() -> (WidgetManager, RecordingSurface, Receiver<Notice>) {
        let surface = RecordingSurface::default();
        let (manager, rx) = manager_with(surface.clone());
        (manager, surface, rx)
    }

    fn todo_mut(manager: &mut WidgetManager, id: WidgetId) -> &mut TodoList {
        match manager.get_mut(id).unwrap().content_mut() {
            Content::Todo(todo) => todo,
            _ => panic!("widget {id} is not a to-do list"),
        }
    }

    fn pos_of(manager: &WidgetManager, id: WidgetId) -> Option<ScreenPos> {
        manager.get(id).unwrap().attachment().map(|a| a.pos)
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("desk_widgets_manager_{}_{name}", std::process::id()))
    }

    #[test]
    fn create_names_pins_and_schedules() {
        let (mut manager, surface, rx) = manager();
        let now = Instant::now();
        let clock = manager.create(WidgetKind::Clock, now);
        let todo = manager.create(WidgetKind::Todo, now);

        assert_eq!(manager.get(clock).unwrap().name(), "Clock #1");
        assert_eq!(manager.get(todo).unwrap().name(), "Todo List #2");
        assert_eq!(pos_of(&manager, clock), Some(ScreenPos::new(100, 100)));
        assert_eq!(pos_of(&manager, todo), Some(ScreenPos::new(130, 130)));
        assert_eq!(surface.calls().len(), 2);
        assert_eq!(manager.next_refresh(), Some(now));
        assert!(rx.try_iter().all(|n| n.level == NoticeLevel::Success));
    }

    #[test]
    fn pin_unpin_pin_preserves_content() {
        let (mut manager, _surface, rx) = manager();
        let id = manager.create(WidgetKind::Todo, Instant::now());
        todo_mut(&mut manager, id).add("water plants");
        todo_mut(&mut manager, id).toggle(0);
        let _ = rx.try_iter().count();

        assert_eq!(manager.unpin(id), Some(UnpinOutcome::Unpinned));
        assert_eq!(manager.unpin(id), Some(UnpinOutcome::NotPinned));
        assert!(matches!(manager.pin(id), Some(PinOutcome::Pinned { .. })));
        assert_eq!(manager.pin(id), Some(PinOutcome::AlreadyPinned));

        let items = todo_mut(&mut manager, id).items().to_vec();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "water plants");
        assert!(items[0].completed);

        let levels: Vec<_> = rx.try_iter().map(|n| n.level).collect();
        assert_eq!(
            levels,
            vec![
                NoticeLevel::Success,
                NoticeLevel::Info,
                NoticeLevel::Info
            ]
        );
    }

    #[test]
    fn remove_detaches_and_cancels_refresh() {
        let (mut manager, surface, _rx) = manager();
        let now = Instant::now();
        let id = manager.create(WidgetKind::Clock, now);
        assert!(manager.remove(id));
        assert!(manager.get(id).is_none());
        assert_eq!(surface.calls().last(), Some(&SurfaceCall::Detach(id)));
        assert_eq!(manager.next_refresh(), None);
        assert_eq!(manager.tick_at(now + Duration::from_secs(5), NaiveDateTime::default()), 0);
        assert!(!manager.remove(id));
    }

    #[test]
    fn timer_expiry_is_announced_once_through_tick() {
        let (mut manager, _surface, rx) = manager();
        let start = Instant::now();
        let id = manager.create(WidgetKind::Timer, start);
        match manager.get_mut(id).unwrap().content_mut() {
            Content::Timer(timer) => timer.start("1").unwrap(),
            _ => unreachable!(),
        }
        let _ = rx.try_iter().count();

        for second in 0..=65 {
            manager.tick_at(start + Duration::from_secs(second), NaiveDateTime::default());
        }
        let expired: Vec<_> = rx
            .try_iter()
            .filter(|n| n.message == TIME_UP_MESSAGE)
            .collect();
        assert_eq!(expired.len(), 1);
    }

    #[test]
    fn save_load_round_trip_preserves_layout() {
        let (mut manager, _surface, _rx) = manager();
        let now = Instant::now();
        let clock = manager.create(WidgetKind::Clock, now);
        let weather = manager.create(WidgetKind::Weather, now);
        manager.create(WidgetKind::Timer, now);
        manager.unpin(weather);
        manager.reposition(clock, ScreenPos::new(640, 48));
        let saved = manager.save();

        let (mut restored, _surface, _rx) = self::manager();
        let report = restored.load(saved.clone(), now);
        assert_eq!(report, LoadReport { loaded: 3, skipped: 0 });
        assert_eq!(restored.save(), saved);
        assert_eq!(
            restored.instances()[0].attachment().map(|a| a.pos),
            Some(ScreenPos::new(640, 48))
        );
        assert!(!restored.instances()[1].is_pinned());
    }

    #[test]
    fn empty_layout_round_trips() {
        let (mut manager, surface, _rx) = manager();
        let saved = manager.save();
        assert!(saved.widgets.is_empty());

        let report = manager.load(saved.clone(), Instant::now());
        assert_eq!(report, LoadReport::default());
        assert!(manager.instances().is_empty());
        assert_eq!(manager.save(), saved);
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn unknown_record_without_name_or_config_is_skipped() {
        let (mut manager, _surface, rx) = manager();
        let path = temp_path("unknown_shape.json");
        std::fs::write(
            &path,
            r#"{"widgets": [
                {"type": "Clock", "name": "Clock #1", "config": {}, "pinned": true, "desktop_x": 40, "desktop_y": 60},
                {"type": "Stock Ticker", "symbols": ["ACME", "INIT"]}
            ]}"#,
        )
        .unwrap();

        let report = manager.load_from(&path, Instant::now()).unwrap();
        assert_eq!(report, Some(LoadReport { loaded: 1, skipped: 1 }));
        let clock = &manager.instances()[0];
        assert_eq!(clock.kind(), WidgetKind::Clock);
        assert_eq!(clock.attachment().map(|a| a.pos), Some(ScreenPos::new(40, 60)));
        assert_eq!(rx.try_iter().last().unwrap().level, NoticeLevel::Warning);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn record_with_empty_or_null_config_gets_kind_defaults() {
        let (mut manager, _surface, _rx) = manager();
        let document: PersistedLayout = serde_json::from_str(
            r#"{"widgets": [
                {"type": "Clock", "name": "Clock #1", "config": {}},
                {"type": "Timer", "name": "Timer #2", "config": null},
                {"type": "Weather", "name": "Weather #3"}
            ]}"#,
        )
        .unwrap();

        let report = manager.load(document, Instant::now());
        assert_eq!(report, LoadReport { loaded: 3, skipped: 0 });
        let clock = manager.instances()[0].config();
        assert_eq!(clock.width(), 280);
        assert_eq!(clock, &WidgetKind::Clock.default_config());
        assert_eq!(manager.instances()[1].config(), &WidgetKind::Timer.default_config());
        assert_eq!(manager.instances()[2].config(), &WidgetKind::Weather.default_config());
    }

    #[test]
    fn load_skips_unknown_types_and_replaces_state() {
        let (mut manager, surface, _rx) = manager();
        let now = Instant::now();
        let old = manager.create(WidgetKind::Clock, now);
        let mut document = manager.save();
        if let LayoutEntry::Record(record) = &mut document.widgets[0] {
            record.name = "Morning clock".to_owned();
        }
        document.widgets.push(LayoutEntry::Record(LayoutRecord {
            kind: "Stock Ticker".to_owned(),
            name: "Stocks".to_owned(),
            config: Some(WidgetConfig::new()),
            desktop_x: None,
            desktop_y: None,
            pinned: Some(true),
        }));

        let report = manager.load(document, now);
        assert_eq!(report, LoadReport { loaded: 1, skipped: 1 });
        assert!(manager.get(old).is_none());
        assert!(surface.calls().contains(&SurfaceCall::Detach(old)));
        assert_eq!(manager.instances().len(), 1);
        assert_eq!(manager.instances()[0].name(), "Morning clock");
    }

    #[test]
    fn missing_layout_file_changes_nothing() {
        let (mut manager, _surface, rx) = manager();
        let id = manager.create(WidgetKind::Todo, Instant::now());
        let _ = rx.try_iter().count();
        let path = temp_path("absent.json");
        let _ = std::fs::remove_file(&path);

        assert!(manager.load_from(&path, Instant::now()).unwrap().is_none());
        assert!(manager.get(id).is_some());
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn malformed_layout_file_keeps_current_widgets() {
        let (mut manager, _surface, rx) = manager();
        let id = manager.create(WidgetKind::Todo, Instant::now());
        let _ = rx.try_iter().count();
        let path = temp_path("malformed.json");
        std::fs::write(&path, "not json at all").unwrap();

        let err = manager.load_from(&path, Instant::now()).unwrap_err();
        assert!(matches!(err, WidgetError::PersistenceFailure(_)));
        assert!(manager.get(id).is_some());
        assert_eq!(rx.try_recv().unwrap().level, NoticeLevel::Error);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn save_to_then_load_from_disk() {
        let (mut manager, _surface, _rx) = manager();
        let now = Instant::now();
        manager.create(WidgetKind::Weather, now);
        let path = temp_path("disk.json");
        manager.save_to(&path).unwrap();

        let (mut restored, _surface, _rx) = self::manager();
        let report = restored.load_from(&path, now).unwrap();
        assert_eq!(report, Some(LoadReport { loaded: 1, skipped: 0 }));
        assert_eq!(restored.save(), manager.save());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn customize_repins_in_place_and_keeps_content() {
        let (mut manager, surface, _rx) = manager();
        let id = manager.create(WidgetKind::Todo, Instant::now());
        manager.reposition(id, ScreenPos::new(500, 320));
        todo_mut(&mut manager, id).add("keep me");
        surface.clear();

        let mut draft = StyleDraft::from_config(manager.get(id).unwrap().config());
        draft.width = "410".to_owned();
        manager.customize(id, &draft).unwrap();

        assert_eq!(manager.get(id).unwrap().config().width(), 410);
        assert_eq!(
            surface.calls(),
            vec![
                SurfaceCall::Detach(id),
                SurfaceCall::Attach(id, ScreenPos::new(500, 320))
            ]
        );
        assert_eq!(todo_mut(&mut manager, id).items().len(), 1);
    }

    #[test]
    fn invalid_customization_keeps_config() {
        let (mut manager, _surface, rx) = manager();
        let id = manager.create(WidgetKind::Clock, Instant::now());
        let before = manager.get(id).unwrap().config().clone();
        let mut draft = StyleDraft::from_config(&before);
        draft.font_size = "huge".to_owned();
        rx.try_iter().for_each(drop);

        assert!(manager.customize(id, &draft).is_err());
        assert!(!manager.preview_customization(id, &draft));
        assert_eq!(manager.get(id).unwrap().config(), &before);
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn cancelled_live_preview_reverts() {
        let (mut manager, _surface, _rx) = manager();
        let id = manager.create(WidgetKind::Timer, Instant::now());
        let before = manager.get(id).unwrap().config().clone();
        let mut draft = StyleDraft::from_config(&before);
        draft.bg_color = "#000000".to_owned();

        assert!(manager.preview_customization(id, &draft));
        assert_ne!(manager.get(id).unwrap().config(), &before);
        assert!(matches!(
            &manager.save().widgets[0],
            LayoutEntry::Record(record) if record.config.as_ref() == Some(&before)
        ));

        manager.cancel_customization(id);
        assert_eq!(manager.get(id).unwrap().config(), &before);
    }

    #[test]
    fn fallback_is_reported_once() {
        let (mut manager, rx) = manager_with(RecordingSurface::unavailable());
        let now = Instant::now();
        let first = manager.create(WidgetKind::Clock, now);
        manager.create(WidgetKind::Weather, now);

        assert_eq!(
            manager.get(first).unwrap().attachment().map(|a| a.placement),
            Some(Placement::Floating)
        );
        let warnings = rx
            .try_iter()
            .filter(|n| n.level == NoticeLevel::Warning)
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn demotions_share_the_single_fallback_warning() {
        let (mut manager, surface, rx) = manager();
        let now = Instant::now();
        let first = manager.create(WidgetKind::Clock, now);
        let second = manager.create(WidgetKind::Todo, now);
        rx.try_iter().for_each(drop);

        surface.demote(first, "window never appeared");
        surface.demote(second, "window never appeared");
        manager.sync_surface();
        surface.demote(first, "still missing");
        manager.sync_surface();

        for id in [first, second] {
            assert_eq!(
                manager.get(id).unwrap().attachment().map(|a| a.placement),
                Some(Placement::Floating)
            );
        }
        let warnings: Vec<_> = rx
            .try_iter()
            .filter(|n| n.level == NoticeLevel::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("window never appeared"));
    }

    #[test]
    fn preview_drag_live_syncs_pinned_widget() {
        let (mut manager, surface, _rx) = manager();
        let id = manager.create(WidgetKind::Clock, Instant::now());
        manager.open_preview(SCREEN, CANVAS);
        surface.clear();

        assert_eq!(manager.preview_pointer_down(60.0, 60.0), Some(id));
        assert_eq!(manager.preview_drag(25.0, 10.0), Some(ScreenPos::new(150, 120)));
        assert_eq!(pos_of(&manager, id), Some(ScreenPos::new(150, 120)));
        assert_eq!(
            surface.calls(),
            vec![SurfaceCall::Reposition(id, ScreenPos::new(150, 120))]
        );
        manager.preview_release();
        assert_eq!(manager.preview().unwrap().active(), None);
    }

    #[test]
    fn apply_and_reset_touch_only_pinned_widgets() {
        let (mut manager, _surface, _rx) = manager();
        let now = Instant::now();
        let pinned = manager.create(WidgetKind::Clock, now);
        let loose = manager.create(WidgetKind::Todo, now);
        manager.unpin(loose);
        manager.open_preview(SCREEN, CANVAS);

        assert_eq!(manager.apply_preview_positions(), 1);
        assert_eq!(manager.reset_preview_positions(), 1);
        assert_eq!(pos_of(&manager, pinned), Some(ScreenPos::new(200, 150)));
        assert_eq!(pos_of(&manager, loose), None);
        let item = manager.preview().unwrap().item(loose).unwrap();
        assert_eq!(item.real_pos(), ScreenPos::new(250, 200));
    }

    #[test]
    fn open_preview_tracks_collection_changes() {
        let (mut manager, _surface, _rx) = manager();
        let now = Instant::now();
        let first = manager.create(WidgetKind::Clock, now);
        manager.open_preview(SCREEN, CANVAS);
        let second = manager.create(WidgetKind::Weather, now);
        assert_eq!(manager.preview().unwrap().items().len(), 2);

        manager.reposition(second, ScreenPos::new(800, 600));
        let rect = manager.preview().unwrap().item(second).unwrap().rect;
        assert_eq!((rect.x, rect.y), (400.0, 300.0));

        manager.remove(first);
        assert!(manager.preview().unwrap().item(first).is_none());

        manager.unpin(second);
        assert!(!manager.preview().unwrap().item(second).unwrap().pinned);
    }
}
