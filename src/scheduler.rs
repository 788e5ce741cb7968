use crate::widgets::WidgetId;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    deadline: Instant,
    seq: u64,
    widget: WidgetId,
}

// Deadline queue of widget refreshes. Each widget has at most one live entry;
// superseded or cancelled entries stay in the heap and are skipped when they surface.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Entry>>,
    live: HashMap<WidgetId, u64>,
    seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, widget: WidgetId, now: Instant, delay: Duration) {
        self.seq += 1;
        self.live.insert(widget, self.seq);
        self.queue.push(Reverse(Entry {
            deadline: now + delay,
            seq: self.seq,
            widget,
        }));
    }

    pub fn cancel(&mut self, widget: WidgetId) -> bool {
        self.live.remove(&widget).is_some()
    }

    #[cfg(test)]
    pub fn is_pending(&self, widget: WidgetId) -> bool {
        self.live.contains_key(&widget)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn pop_due(&mut self, now: Instant) -> Vec<WidgetId> {
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.queue.peek().copied() {
            if entry.deadline > now {
                break;
            }
            self.queue.pop();
            if self.is_live(&entry) {
                self.live.remove(&entry.widget);
                due.push(entry.widget);
            }
        }
        due
    }

    pub fn next_deadline(&mut self) -> Option<Instant> {
        while let Some(Reverse(entry)) = self.queue.peek().copied() {
            if self.is_live(&entry) {
                return Some(entry.deadline);
            }
            self.queue.pop();
        }
        None
    }

    fn is_live(&self, entry: &Entry) -> bool {
        self.live.get(&entry.widget) == Some(&entry.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> WidgetId {
        WidgetId::new(raw)
    }

    #[test]
    fn due_entries_pop_in_deadline_order() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(id(1), start, Duration::from_secs(3));
        scheduler.schedule(id(2), start, Duration::from_secs(1));
        scheduler.schedule(id(3), start, Duration::from_secs(10));

        assert!(scheduler.pop_due(start).is_empty());
        assert_eq!(
            scheduler.pop_due(start + Duration::from_secs(5)),
            vec![id(2), id(1)]
        );
        assert_eq!(
            scheduler.next_deadline(),
            Some(start + Duration::from_secs(10))
        );
    }

    #[test]
    fn rescheduling_replaces_pending_entry() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(id(1), start, Duration::from_secs(1));
        scheduler.schedule(id(1), start, Duration::from_secs(600));

        assert!(scheduler.pop_due(start + Duration::from_secs(2)).is_empty());
        assert_eq!(scheduler.len(), 1);
        assert_eq!(
            scheduler.next_deadline(),
            Some(start + Duration::from_secs(600))
        );
    }

    #[test]
    fn cancelled_widget_never_fires() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(id(4), start, Duration::ZERO);
        assert!(scheduler.cancel(id(4)));
        assert!(!scheduler.cancel(id(4)));
        assert!(!scheduler.is_pending(id(4)));
        assert!(scheduler.pop_due(start + Duration::from_secs(1)).is_empty());
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn fired_entry_is_no_longer_pending() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(id(9), start, Duration::ZERO);
        assert_eq!(scheduler.pop_due(start), vec![id(9)]);
        assert!(!scheduler.is_pending(id(9)));
    }
}
