//! # Resource List
//!
//! Wires one [`FilterController`], one [`QueryTranslator`] and one [`StoreClient`] into the
//! list screen of a single resource type:
//!
//! ```text
//! edits ──▶ FilterController ──(debounced criteria)──▶ driver task
//!                                                        │ reset page to 1
//!                                                        │ translate criteria
//!                                                        ▼
//!                                               StoreClient::begin_fetch
//! ```
//!
//! Mutations bypass the filter path and go straight to [`ResourceList::store`].

use crate::client::StoreClient;
use crate::endpoint::QueryTranslator;
use crate::entity::ResourceItem;
use crate::error::StoreError;
use crate::filter::{FilterController, FilterCriteria};
use crate::message::FetchOutcome;
use crate::pagination::Paginator;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What a table renders: the rows of the current page plus the indicators around them.
#[derive(Debug, Clone)]
pub struct PageView<T> {
    pub rows: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub loading: bool,
    pub error: Option<String>,
}

/// Filtered, paginated list of one resource type.
pub struct ResourceList<T: ResourceItem> {
    filters: Arc<FilterController>,
    translator: Arc<dyn QueryTranslator<T::Query>>,
    store: StoreClient<T>,
    pager: Arc<Mutex<Paginator>>,
    active: Arc<Mutex<FilterCriteria>>,
    driver: JoinHandle<()>,
}

impl<T: ResourceItem> ResourceList<T> {
    /// Takes ownership of the controller's callback slot and starts the driver task.
    pub fn new<Q>(filters: FilterController, translator: Q, store: StoreClient<T>, page_size: usize) -> Self
    where
        Q: QueryTranslator<T::Query>,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<FilterCriteria>();
        filters.on_criteria_change(move |criteria| {
            let _ = tx.send(criteria);
        });

        let translator: Arc<dyn QueryTranslator<T::Query>> = Arc::new(translator);
        let pager = Arc::new(Mutex::new(Paginator::new(page_size)));
        let active = Arc::new(Mutex::new(FilterCriteria::default()));

        let driver = tokio::spawn({
            let translator = Arc::clone(&translator);
            let store = store.clone();
            let pager = Arc::clone(&pager);
            let active = Arc::clone(&active);
            async move {
                while let Some(criteria) = rx.recv().await {
                    lock(&pager).reset();
                    let query = translator.translate(&criteria);
                    *lock(&active) = criteria;
                    let pending = match store.begin_fetch(query).await {
                        Ok(pending) => pending,
                        Err(e) => {
                            warn!(error = %e, "Store unavailable, list driver stopping");
                            break;
                        }
                    };
                    // The outcome is awaited off the loop so the next criteria are issued
                    // without waiting; the store drops whichever response is stale.
                    tokio::spawn(async move {
                        match pending.outcome().await {
                            Ok(outcome) => debug!(?outcome, "Filtered fetch finished"),
                            Err(e) => debug!(error = %e, "Filtered fetch failed"),
                        }
                    });
                }
            }
        });

        Self {
            filters: Arc::new(filters),
            translator,
            store,
            pager,
            active,
            driver,
        }
    }

    pub fn filters(&self) -> &FilterController {
        &self.filters
    }

    pub fn store(&self) -> &StoreClient<T> {
        &self.store
    }

    /// The criteria behind the rows currently requested (the last debounced snapshot).
    pub fn active_criteria(&self) -> FilterCriteria {
        lock(&self.active).clone()
    }

    /// Initial load: fetches with the controller's live criteria, skipping the debounce.
    pub async fn load(&self) -> Result<FetchOutcome, StoreError> {
        let criteria = self.filters.snapshot();
        lock(&self.pager).reset();
        let query = self.translator.translate(&criteria);
        *lock(&self.active) = criteria;
        info!("Loading list");
        self.store.fetch(query).await
    }

    pub fn set_page(&self, page: usize) {
        lock(&self.pager).set_page(page);
    }

    pub fn set_page_size(&self, page_size: usize) {
        lock(&self.pager).set_page_size(page_size);
    }

    /// Current page of the store's items. The page number is clamped against the
    /// current length first, so a list that shrank never shows a page past its end.
    pub fn page(&self) -> PageView<T> {
        let state = self.store.state();
        let total_items = state.items.len();
        let mut pager = lock(&self.pager);
        let page = pager.clamp(total_items);
        PageView {
            rows: pager.slice(&state.items).to_vec(),
            page,
            page_size: pager.page_size(),
            total_pages: pager.total_pages(total_items),
            total_items,
            loading: state.loading,
            error: state.error,
        }
    }

    /// Stops reacting to filter edits. Safe to call more than once.
    pub fn shutdown(&self) {
        self.filters.shutdown();
        self.driver.abort();
    }
}

impl<T: ResourceItem> Drop for ResourceList<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
