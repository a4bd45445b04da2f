//! Bounded notification queue with per-entry expiry.
//!
//! Entries are shown oldest first. Adding past capacity evicts the
//! oldest entry immediately; otherwise each entry is removed by its own
//! timer once the display duration has elapsed. Both paths remove by
//! id and skip entries that are already gone, so an evicted entry's
//! timer firing later is a no-op.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;

use super::surface::NotificationSurface;
use super::types::NotificationEntry;

pub const DEFAULT_CAPACITY: usize = 5;
pub const DEFAULT_TTL: Duration = Duration::from_millis(5000);

/// Shared handle to the notification queue.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    capacity: usize,
    ttl: Duration,
    surface: Arc<dyn NotificationSurface>,
    state: Mutex<QueueState>,
}

#[derive(Default)]
struct QueueState {
    entries: VecDeque<NotificationEntry>,
    next_id: u64,
}

impl NotificationQueue {
    /// Create a queue. A capacity of zero is raised to one.
    pub fn new(capacity: usize, ttl: Duration, surface: Arc<dyn NotificationSurface>) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(QueueInner {
                capacity,
                ttl,
                surface,
                state: Mutex::new(QueueState {
                    entries: VecDeque::with_capacity(capacity + 1),
                    next_id: 1,
                }),
            }),
        }
    }

    /// Show a notification.
    ///
    /// Never blocks and never fails. Must be called from within a Tokio
    /// runtime, since it schedules the entry's expiry task.
    pub fn add(&self, message: impl Into<String>, category: impl Into<String>) {
        let mut state = self.inner.lock_state();

        let id = state.next_id;
        state.next_id += 1;

        let entry = NotificationEntry {
            id,
            message: message.into(),
            category: category.into(),
            created_at: Utc::now(),
        };
        state.entries.push_back(entry.clone());
        let evicted = if state.entries.len() > self.inner.capacity {
            state.entries.pop_front()
        } else {
            None
        };

        // Every queued entry has a timer, even if the surface panics below.
        let weak = Arc::downgrade(&self.inner);
        let ttl = self.inner.ttl;
        tokio::spawn(async move {
            sleep(ttl).await;
            expire(&weak, id);
        });

        if let Some(evicted) = evicted {
            tracing::trace!(id = evicted.id, "Notification evicted (capacity)");
            self.inner.surface.remove(&evicted);
        }
        self.inner.surface.show(&entry);
        tracing::debug!(id, category = %entry.category, message = %entry.message, "Notification added");
    }

    /// Visible entries, oldest first.
    pub fn snapshot(&self) -> Vec<NotificationEntry> {
        self.inner.lock_state().entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock_state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }
}

impl QueueInner {
    /// Lock the queue, recovering from a surface that panicked mid-update.
    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Notification queue lock poisoned by a panicking surface, recovering");
            self.state.clear_poison();
            poisoned.into_inner()
        })
    }
}

/// Expiry task body: remove `id` if it is still queued.
fn expire(weak: &Weak<QueueInner>, id: u64) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let mut state = inner.lock_state();

    let Some(pos) = state.entries.iter().position(|e| e.id == id) else {
        return;
    };
    if let Some(entry) = state.entries.remove(pos) {
        tracing::trace!(id, "Notification expired");
        inner.surface.remove(&entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum SurfaceEvent {
        Show(u64),
        Remove(u64),
    }

    #[derive(Default)]
    struct RecordingSurface {
        events: Mutex<Vec<SurfaceEvent>>,
    }

    impl RecordingSurface {
        fn events(&self) -> Vec<SurfaceEvent> {
            self.events.lock().unwrap().clone()
        }

        fn visible(&self) -> BTreeSet<u64> {
            let mut visible = BTreeSet::new();
            for event in self.events() {
                match event {
                    SurfaceEvent::Show(id) => {
                        visible.insert(id);
                    }
                    SurfaceEvent::Remove(id) => {
                        visible.remove(&id);
                    }
                }
            }
            visible
        }

        fn removals_of(&self, id: u64) -> usize {
            self.events()
                .iter()
                .filter(|e| **e == SurfaceEvent::Remove(id))
                .count()
        }
    }

    impl NotificationSurface for RecordingSurface {
        fn show(&self, entry: &NotificationEntry) {
            self.events.lock().unwrap().push(SurfaceEvent::Show(entry.id));
        }

        fn remove(&self, entry: &NotificationEntry) {
            self.events.lock().unwrap().push(SurfaceEvent::Remove(entry.id));
        }
    }

    fn queue(capacity: usize) -> (NotificationQueue, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        let queue = NotificationQueue::new(capacity, DEFAULT_TTL, surface.clone());
        (queue, surface)
    }

    fn messages(queue: &NotificationQueue) -> Vec<String> {
        queue.snapshot().into_iter().map(|e| e.message).collect()
    }

    fn ids(queue: &NotificationQueue) -> BTreeSet<u64> {
        queue.snapshot().into_iter().map(|e| e.id).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn sixth_add_evicts_the_first_entry() {
        let (queue, surface) = queue(5);
        for i in 1..=6 {
            queue.add(format!("n{i}"), "version");
        }

        assert_eq!(messages(&queue), vec!["n2", "n3", "n4", "n5", "n6"]);
        assert_eq!(surface.visible(), ids(&queue));
        assert_eq!(surface.removals_of(1), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn length_never_exceeds_capacity() {
        let (queue, surface) = queue(5);
        for i in 0..40 {
            queue.add(format!("m{i}"), "error");
            assert!(queue.len() <= queue.capacity());
            assert_eq!(surface.visible(), ids(&queue));
        }

        let expected: Vec<String> = (35..40).map(|i| format!("m{i}")).collect();
        assert_eq!(messages(&queue), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn single_entry_expires_after_ttl() {
        let (queue, surface) = queue(5);
        queue.add("Software version: 1.2.0", "version");

        sleep(DEFAULT_TTL - Duration::from_millis(1)).await;
        assert_eq!(queue.len(), 1);

        sleep(Duration::from_millis(2)).await;
        assert!(queue.is_empty());
        assert!(surface.visible().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_on_their_own_schedule() {
        let (queue, _surface) = queue(5);
        queue.add("first", "no-pei");
        sleep(Duration::from_millis(2000)).await;
        queue.add("second", "foreign");

        sleep(Duration::from_millis(3001)).await;
        assert_eq!(messages(&queue), vec!["second"]);

        sleep(Duration::from_millis(2000)).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn evicted_entry_timer_is_a_no_op() {
        let (queue, surface) = queue(2);
        queue.add("a", "error");
        sleep(Duration::from_millis(100)).await;
        queue.add("b", "error");
        queue.add("c", "error");

        assert_eq!(messages(&queue), vec!["b", "c"]);
        assert_eq!(surface.removals_of(1), 1);

        // "a"'s timer fires here, before the others.
        sleep(DEFAULT_TTL - Duration::from_millis(50)).await;
        assert_eq!(surface.removals_of(1), 1);
        assert_eq!(messages(&queue), vec!["b", "c"]);

        sleep(Duration::from_millis(100)).await;
        assert!(queue.is_empty());

        let events = surface.events();
        let shows = events.iter().filter(|e| matches!(e, SurfaceEvent::Show(_))).count();
        let removes = events.iter().filter(|e| matches!(e, SurfaceEvent::Remove(_))).count();
        assert_eq!(shows, 3);
        assert_eq!(removes, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn eviction_removes_before_showing_the_new_entry() {
        let (queue, surface) = queue(1);
        queue.add("old", "version");
        queue.add("new", "version");

        assert_eq!(
            surface.events(),
            vec![
                SurfaceEvent::Show(1),
                SurfaceEvent::Remove(1),
                SurfaceEvent::Show(2),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn zero_capacity_keeps_one_entry() {
        let (queue, _surface) = queue(0);
        queue.add("x", "error");
        queue.add("y", "error");
        assert_eq!(queue.capacity(), 1);
        assert_eq!(messages(&queue), vec!["y"]);
    }

    /// Panics on the first `show`, records everything after.
    #[derive(Default)]
    struct PanickingSurface {
        panicked: std::sync::atomic::AtomicBool,
        inner: RecordingSurface,
    }

    impl NotificationSurface for PanickingSurface {
        fn show(&self, entry: &NotificationEntry) {
            if !self.panicked.swap(true, std::sync::atomic::Ordering::SeqCst) {
                panic!("surface failed");
            }
            self.inner.show(entry);
        }

        fn remove(&self, entry: &NotificationEntry) {
            self.inner.remove(entry);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_surface_does_not_disable_the_queue() {
        let surface = Arc::new(PanickingSurface::default());
        let queue = NotificationQueue::new(5, DEFAULT_TTL, surface.clone());

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            queue.add("boom", "error");
        }));
        assert!(result.is_err());

        queue.add("after", "version");
        assert_eq!(messages(&queue), vec!["boom", "after"]);
        assert_eq!(surface.inner.events(), vec![SurfaceEvent::Show(2)]);

        sleep(DEFAULT_TTL + Duration::from_millis(1)).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_queue_timers_do_nothing() {
        let (queue, surface) = queue(5);
        queue.add("gone", "error");
        drop(queue);

        sleep(DEFAULT_TTL + Duration::from_millis(1)).await;
        assert_eq!(surface.removals_of(1), 0);
    }
}
