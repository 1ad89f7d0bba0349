//! # Debounced Filter Controller
//!
//! Turns high-frequency edits (keystrokes, picker clicks, dropdown changes) into a single
//! low-frequency [`FilterCriteria`] event.
//!
//! ## How the debounce works
//!
//! Every state-changing call updates the live state immediately, aborts the pending timer
//! task and spawns a new one. Only a timer that survives the whole delay invokes the
//! callback, and it does so with a full snapshot read at fire time.
//!
//! The callback lives in its own single-slot holder. The timer looks it up when it fires,
//! so a callback replaced between edits is never invoked through a stale reference.

use crate::config::FilterConfig;
use crate::filter::criteria::{DateRange, FilterCriteria, RESERVED_KEYS};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Consumer notified with the debounced criteria.
pub type CriteriaCallback = Arc<dyn Fn(FilterCriteria) + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the transient filter inputs of one list screen.
///
/// All setters are synchronous and take `&self`, so a controller can be shared between
/// the input widgets and the list that consumes its output.
///
/// # Example
///
/// ```rust,ignore
/// let filters = FilterController::new(FilterConfig::default().with_facets(["status"]));
/// filters.on_criteria_change(move |criteria| {
///     let _ = tx.send(criteria);
/// });
///
/// filters.set_search("n");
/// filters.set_search("ni");
/// filters.set_search("nike"); // one emission, 500ms after this call
/// ```
pub struct FilterController {
    state: Arc<Mutex<FilterCriteria>>,
    callback: Arc<Mutex<Option<CriteriaCallback>>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
    delay: Duration,
    facet_keys: BTreeSet<String>,
    runtime: Handle,
}

impl FilterController {
    /// Creates a controller with empty criteria.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime; the timer tasks run on it.
    pub fn new(config: FilterConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(FilterCriteria::default())),
            callback: Arc::new(Mutex::new(None)),
            timer: Mutex::new(None),
            closed: AtomicBool::new(false),
            delay: config.debounce(),
            facet_keys: config.facet_keys,
            runtime: Handle::current(),
        }
    }

    /// Registers the consumer, replacing any previous one.
    pub fn on_criteria_change<F>(&self, callback: F)
    where
        F: Fn(FilterCriteria) + Send + Sync + 'static,
    {
        *lock(&self.callback) = Some(Arc::new(callback));
    }

    pub fn set_search(&self, text: impl Into<String>) {
        let text = text.into();
        trace!(%text, "set_search");
        lock(&self.state).search = text;
        self.rearm();
    }

    /// Applies a date picker selection.
    ///
    /// - two dates set both bounds, day-aligned;
    /// - an empty selection clears both bounds;
    /// - any other selection (one date picked, second pending) keeps the prior bounds
    ///   and does not restart the debounce.
    pub fn set_date_range(&self, selection: &[DateTime<Utc>]) {
        match selection {
            [first, second] => {
                let range = DateRange::from_selection(*first, *second);
                trace!(start = %range.start, end = %range.end, "set_date_range");
                lock(&self.state).range = Some(range);
            }
            [] => {
                trace!("set_date_range cleared");
                lock(&self.state).range = None;
            }
            partial => {
                debug!(len = partial.len(), "Incomplete date selection ignored");
                return;
            }
        }
        self.rearm();
    }

    /// Sets one facet, leaving search, range and every other facet untouched.
    ///
    /// Returns `false` (and changes nothing) when `key` is not one of the configured
    /// facet keys, or collides with `search`, `startDate` or `endDate`. An empty
    /// configured set accepts any other key.
    pub fn set_facet(&self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if !self.accepts(&key) {
            warn!(%key, "Unknown facet key rejected");
            return false;
        }
        let value = value.into();
        trace!(%key, %value, "set_facet");
        lock(&self.state).facets.insert(key, value);
        self.rearm();
        true
    }

    /// Unsets one facet. An unset facet is absent from the criteria.
    pub fn remove_facet(&self, key: &str) {
        let removed = lock(&self.state).facets.remove(key).is_some();
        if removed {
            trace!(%key, "remove_facet");
            self.rearm();
        }
    }

    /// Resets search, range and every facet in one step. Still debounced.
    pub fn clear_all(&self) {
        trace!("clear_all");
        *lock(&self.state) = FilterCriteria::default();
        self.rearm();
    }

    /// Cancels the pending timer and notifies the consumer right away.
    pub fn flush(&self) {
        if let Some(pending) = lock(&self.timer).take() {
            pending.abort();
        }
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        emit(&self.state, &self.callback);
    }

    /// Cancels the pending timer for good. Later edits still update the live state
    /// but never reach the consumer.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        if let Some(pending) = lock(&self.timer).take() {
            pending.abort();
            debug!("Pending criteria dropped on shutdown");
        }
    }

    pub fn search(&self) -> String {
        lock(&self.state).search.clone()
    }

    pub fn date_range(&self) -> Option<DateRange> {
        lock(&self.state).range
    }

    pub fn facets(&self) -> BTreeMap<String, String> {
        lock(&self.state).facets.clone()
    }

    /// Live (pre-debounce) state, for echoing controlled inputs.
    pub fn snapshot(&self) -> FilterCriteria {
        lock(&self.state).clone()
    }

    /// True while an edit is waiting for its debounce window to end.
    pub fn is_pending(&self) -> bool {
        lock(&self.timer)
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    fn accepts(&self, key: &str) -> bool {
        if RESERVED_KEYS.contains(&key) {
            return false;
        }
        self.facet_keys.is_empty() || self.facet_keys.contains(key)
    }

    fn rearm(&self) {
        let mut timer = lock(&self.timer);
        if let Some(pending) = timer.take() {
            pending.abort();
        }
        if self.closed.load(Ordering::SeqCst) {
            return;
        }

        let state = Arc::clone(&self.state);
        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        *timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            emit(&state, &callback);
        }));
    }
}

impl Drop for FilterController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Invokes the current callback with the current state. Neither lock is held during the call.
fn emit(state: &Mutex<FilterCriteria>, callback: &Mutex<Option<CriteriaCallback>>) {
    let criteria = lock(state).clone();
    let current = lock(callback).clone();
    match current {
        Some(callback) => {
            debug!(?criteria, "Criteria changed");
            callback(criteria);
        }
        None => debug!("Criteria changed with no consumer registered"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tokio::sync::mpsc;

    fn recorder(controller: &FilterController) -> mpsc::UnboundedReceiver<FilterCriteria> {
        let (tx, rx) = mpsc::unbounded_channel();
        controller.on_criteria_change(move |criteria| {
            let _ = tx.send(criteria);
        });
        rx
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, 10, 15, 0).unwrap()
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(600)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_fires_once_with_final_state() {
        let controller = FilterController::new(FilterConfig::default());
        let mut rx = recorder(&controller);

        controller.set_search("n");
        tokio::time::advance(Duration::from_millis(100)).await;
        controller.set_search("ni");
        tokio::time::advance(Duration::from_millis(100)).await;
        controller.set_facet("status", "paid");
        controller.set_date_range(&[day(3), day(1)]);
        controller.set_search("nike");
        settle().await;

        let criteria = rx.try_recv().expect("one emission");
        assert!(rx.try_recv().is_err(), "exactly one emission");
        assert_eq!(criteria.search, "nike");
        assert_eq!(criteria.facet("status"), Some("paid"));
        assert_eq!(criteria.start_date(), Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()));
        assert_eq!(criteria, controller.snapshot());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_delay() {
        let controller = FilterController::new(FilterConfig::default());
        let mut rx = recorder(&controller);

        controller.set_search("a");
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err());
        assert!(controller.is_pending());

        settle().await;
        assert_eq!(rx.try_recv().unwrap().search, "a");
        assert!(!controller.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_range_resets_both_bounds() {
        let controller = FilterController::new(FilterConfig::default());
        let mut rx = recorder(&controller);

        controller.set_date_range(&[day(1), day(2)]);
        controller.set_date_range(&[]);
        settle().await;

        let criteria = rx.try_recv().unwrap();
        assert_eq!(criteria.start_date(), None);
        assert_eq!(criteria.end_date(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_date_keeps_prior_range() {
        let controller = FilterController::new(FilterConfig::default());
        let mut rx = recorder(&controller);

        controller.set_date_range(&[day(1), day(2)]);
        settle().await;
        let full = rx.try_recv().unwrap().range;
        assert!(full.is_some());

        controller.set_date_range(&[day(9)]);
        settle().await;
        assert!(rx.try_recv().is_err(), "partial selection is not an edit");
        assert_eq!(controller.date_range(), full);

        controller.set_search("x");
        settle().await;
        assert_eq!(rx.try_recv().unwrap().range, full);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_all_resets_everything() {
        let controller = FilterController::new(FilterConfig::default());
        let mut rx = recorder(&controller);

        controller.set_search("nike");
        controller.set_facet("brand", "7");
        controller.set_date_range(&[day(1), day(2)]);
        controller.clear_all();
        assert_eq!(controller.search(), "", "live state clears immediately");
        settle().await;

        let criteria = rx.try_recv().unwrap();
        assert_eq!(criteria.search, "");
        assert_eq!(criteria.range, None);
        assert!(criteria.facets.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_facet_edit_is_partial_merge() {
        let controller = FilterController::new(FilterConfig::default());
        let mut rx = recorder(&controller);

        controller.set_search("shoe");
        controller.set_facet("brand", "1");
        controller.set_facet("category", "4");
        controller.set_facet("brand", "2");
        controller.remove_facet("category");
        settle().await;

        let criteria = rx.try_recv().unwrap();
        assert_eq!(criteria.search, "shoe");
        assert_eq!(criteria.facet("brand"), Some("2"));
        assert_eq!(criteria.facet("category"), None);
        assert!(!criteria.facets.contains_key("category"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_facet_key_rejected() {
        let controller = FilterController::new(FilterConfig::default().with_facets(["status"]));
        let mut rx = recorder(&controller);

        assert!(!controller.set_facet("color", "red"));
        settle().await;
        assert!(rx.try_recv().is_err());

        assert!(controller.set_facet("status", "refunded"));
        settle().await;
        assert_eq!(rx.try_recv().unwrap().facet("status"), Some("refunded"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_facet_cannot_shadow_criteria_fields() {
        let controller = FilterController::new(FilterConfig::default());
        let mut rx = recorder(&controller);

        for key in ["search", "startDate", "endDate"] {
            assert!(!controller.set_facet(key, "x"), "{key} accepted");
        }
        assert!(controller.facets().is_empty());
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_pending_emission() {
        let controller = FilterController::new(FilterConfig::default());
        let mut rx = recorder(&controller);

        controller.set_search("bye");
        drop(controller);
        settle().await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_callback_used_at_fire_time() {
        let controller = FilterController::new(FilterConfig::default());
        let mut stale = recorder(&controller);

        controller.set_search("a");
        let mut fresh = recorder(&controller);
        settle().await;

        assert!(stale.try_recv().is_err());
        assert_eq!(fresh.try_recv().unwrap().search, "a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_emits_immediately_and_cancels_timer() {
        let controller = FilterController::new(FilterConfig::default());
        let mut rx = recorder(&controller);

        controller.set_search("now");
        controller.flush();
        assert_eq!(rx.try_recv().unwrap().search, "now");

        settle().await;
        assert!(rx.try_recv().is_err());
    }
}
