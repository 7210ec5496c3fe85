//! Chat list search orchestrator
//!
//! Holds the query and filter state of the chat list, debounces changes and
//! dispatches to the search backend:
//!
//! - blank query and no filters: plain list (merged chats hidden)
//! - otherwise: advanced search, wildcard query when blank
//! - advanced search failed and a query exists: one basic search retry
//!
//! Results land in a [`ResultSink`] that only accepts the latest dispatch.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::NaiveDate;
use tokio::sync::watch;

use crate::config::SearchConfig;
use crate::domain::models::{SearchFilters, SearchRequest, SearchRoute, TagFacet};
use crate::infrastructure::api::SearchApi;
use crate::infrastructure::speech::{SpeechError, SpeechRecognizer, recognize_once};
use crate::shared::logging::{
    log_dispatch_start, log_fallback, log_settle_error, log_settle_success, log_voice_query,
};
use crate::shared::state::{Debouncer, DispatchTicket, ResultSink, ResultState};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

struct Inner {
    api: Arc<dyn SearchApi>,
    config: SearchConfig,
    query: Mutex<String>,
    filters: Mutex<SearchFilters>,
    tag_facets: Mutex<Vec<TagFacet>>,
    sink: ResultSink,
    debouncer: Debouncer,
}

impl Inner {
    fn snapshot(&self) -> SearchRequest {
        SearchRequest::new(
            lock(&self.query).clone(),
            lock(&self.filters).clone(),
            self.config.result_limit,
        )
    }

    async fn dispatch(&self) {
        let request = self.snapshot();
        let ticket = self.sink.begin();
        let route = request.route();

        log_dispatch_start(ticket.seq(), route, &request.query, request.filters.is_active());

        match route {
            SearchRoute::ListAll => self.list_all(ticket).await,
            SearchRoute::Advanced => self.search(ticket, &request).await,
        }
    }

    async fn list_all(&self, ticket: DispatchTicket) {
        // A reload keeps the current list on screen
        if !self.sink.current().is_success() {
            self.sink.publish(ticket, ResultState::Loading);
        }
        self.sink.set_refreshing(ticket, true);

        let state = match self.api.list_all().await {
            Ok(chats) => {
                let items = chats.into_iter().filter(|c| !c.is_merged).collect();
                ResultState::success(items, Vec::new())
            }
            Err(e) => ResultState::error(e.to_string()),
        };

        self.sink.set_refreshing(ticket, false);
        self.settle(ticket, state);
    }

    async fn search(&self, ticket: DispatchTicket, request: &SearchRequest) {
        self.sink.publish(ticket, ResultState::Loading);

        let state = match self.api.advanced_search(request).await {
            Ok(response) => {
                // Facets belong to the filters that produced them
                let filters = lock(&self.filters);
                if self.sink.is_current(ticket) && *filters == request.filters {
                    *lock(&self.tag_facets) = response.tag_facets.clone();
                }
                ResultState::success(response.items, response.tag_facets)
            }
            Err(e) if request.has_query() => {
                log_fallback(ticket.seq(), &request.query, &e.to_string());
                self.basic_search(&request.query).await
            }
            Err(e) => ResultState::error(e.to_string()),
        };

        self.settle(ticket, state);
    }

    async fn basic_search(&self, query: &str) -> ResultState {
        match self.api.basic_search(query).await {
            Ok(items) => ResultState::success(items, Vec::new()),
            Err(e) => ResultState::error(e.to_string()),
        }
    }

    fn settle(&self, ticket: DispatchTicket, state: ResultState) {
        let summary = match &state {
            ResultState::Success { items, tag_facets } => Ok((items.len(), tag_facets.len())),
            ResultState::Error { message } => Err(message.clone()),
            ResultState::Loading => return,
        };

        if self.sink.publish(ticket, state) {
            match summary {
                Ok((items, facets)) => log_settle_success(ticket.seq(), items, facets),
                Err(message) => log_settle_error(ticket.seq(), &message),
            }
        }
    }
}

/// Search and filter state of the chat list screen.
///
/// Cheap to clone; all clones share one state. Setters must be called from
/// within a tokio runtime. Dropping the last clone cancels any pending timer.
#[derive(Clone)]
pub struct SearchOrchestrator {
    inner: Arc<Inner>,
}

impl SearchOrchestrator {
    pub fn new(api: Arc<dyn SearchApi>, config: SearchConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                config,
                query: Mutex::new(String::new()),
                filters: Mutex::new(SearchFilters::default()),
                tag_facets: Mutex::new(Vec::new()),
                sink: ResultSink::new(),
                debouncer: Debouncer::new(),
            }),
        }
    }

    // ===== Observers =====

    pub fn subscribe(&self) -> watch::Receiver<ResultState> {
        self.inner.sink.subscribe()
    }

    pub fn subscribe_refreshing(&self) -> watch::Receiver<bool> {
        self.inner.sink.subscribe_refreshing()
    }

    pub fn state(&self) -> ResultState {
        self.inner.sink.current()
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.sink.is_refreshing()
    }

    pub fn query(&self) -> String {
        lock(&self.inner.query).clone()
    }

    pub fn filters(&self) -> SearchFilters {
        lock(&self.inner.filters).clone()
    }

    pub fn has_active_filters(&self) -> bool {
        lock(&self.inner.filters).is_active()
    }

    /// Facets from the last accepted advanced search
    pub fn tag_facets(&self) -> Vec<TagFacet> {
        lock(&self.inner.tag_facets).clone()
    }

    pub fn has_pending_dispatch(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    // ===== Setters =====

    /// Update the search text; dispatches after the typing debounce
    pub fn set_query(&self, query: impl Into<String>) {
        *lock(&self.inner.query) = query.into();
        self.schedule(self.inner.config.query_debounce());
    }

    pub fn set_fuzzy(&self, enabled: bool) -> bool {
        self.update_filters(|f| std::mem::replace(&mut f.fuzzy, enabled) != enabled)
    }

    pub fn set_boost_recent(&self, enabled: bool) -> bool {
        self.update_filters(|f| std::mem::replace(&mut f.boost_recent, enabled) != enabled)
    }

    pub fn set_date_from(&self, date: Option<NaiveDate>) -> bool {
        self.update_filters(|f| std::mem::replace(&mut f.date_from, date) != date)
    }

    pub fn set_date_to(&self, date: Option<NaiveDate>) -> bool {
        self.update_filters(|f| std::mem::replace(&mut f.date_to, date) != date)
    }

    /// Select the tag if unselected, unselect it otherwise. Returns whether it is now selected.
    pub fn toggle_tag(&self, tag: &str) -> bool {
        let selected = lock(&self.inner.filters).toggle_tag(tag);
        self.schedule(self.inner.config.filter_debounce());
        selected
    }

    /// Reset every filter and re-dispatch exactly once
    pub fn clear_filters(&self) {
        {
            let mut filters = lock(&self.inner.filters);
            *filters = SearchFilters::default();
            lock(&self.inner.tag_facets).clear();
        }
        self.inner.debouncer.cancel();

        if self.query().trim().is_empty() {
            self.spawn_dispatch();
        } else {
            self.schedule(self.inner.config.filter_debounce());
        }
    }

    /// Dispatch now, dropping any pending debounced dispatch
    pub fn refresh(&self) {
        self.inner.debouncer.cancel();
        self.spawn_dispatch();
    }

    /// Dispatch inline and return the resulting state
    pub async fn dispatch_now(&self) -> ResultState {
        self.inner.debouncer.cancel();
        self.inner.dispatch().await;
        self.state()
    }

    /// Listen for one spoken phrase and use it as the query.
    ///
    /// The recognizer session is released before this returns. On failure
    /// the query and result state are left untouched.
    pub async fn apply_voice_query(
        &self,
        recognizer: &dyn SpeechRecognizer,
    ) -> Result<Option<String>, SpeechError> {
        match recognize_once(recognizer, self.inner.config.recognition_options()).await {
            Ok(Some(text)) => {
                log_voice_query(Some(&text), None);
                self.set_query(text.clone());
                Ok(Some(text))
            }
            Ok(None) => {
                log_voice_query(None, None);
                Ok(None)
            }
            Err(e) => {
                log_voice_query(None, Some(&e.to_string()));
                Err(e)
            }
        }
    }

    // ===== Internals =====

    fn update_filters(&self, apply: impl FnOnce(&mut SearchFilters) -> bool) -> bool {
        let changed = apply(&mut *lock(&self.inner.filters));
        if changed {
            self.schedule(self.inner.config.filter_debounce());
        }
        changed
    }

    fn schedule(&self, delay: std::time::Duration) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        self.inner.debouncer.schedule(delay, async move {
            if let Some(inner) = weak.upgrade() {
                inner.dispatch().await;
            }
        });
    }

    fn spawn_dispatch(&self) {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            inner.dispatch().await;
        });
    }
}
