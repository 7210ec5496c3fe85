//! Result state published to the UI
//!
//! Every dispatch takes a ticket with a monotonically increasing sequence
//! number. Only the holder of the latest ticket may publish; older tickets are
//! silently dropped, so a slow response can never overwrite a newer one.

use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::watch;

use crate::domain::models::{TagFacet, Transcription};
use crate::shared::logging::log_stale_dropped;

/// Loading / Success / Error projection of the chat list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ResultState {
    Loading,
    Success {
        items: Vec<Transcription>,
        tag_facets: Vec<TagFacet>,
    },
    Error {
        message: String,
    },
}

impl ResultState {
    pub fn success(items: Vec<Transcription>, tag_facets: Vec<TagFacet>) -> Self {
        ResultState::Success { items, tag_facets }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ResultState::Error {
            message: message.into(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ResultState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultState::Success { .. })
    }

    pub fn items(&self) -> &[Transcription] {
        match self {
            ResultState::Success { items, .. } => items,
            _ => &[],
        }
    }
}

/// Proof of an in-flight dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTicket {
    seq: u64,
}

impl DispatchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Single-writer cell holding the current [`ResultState`]
#[derive(Debug)]
pub struct ResultSink {
    state: watch::Sender<ResultState>,
    refreshing: watch::Sender<bool>,
    latest: Mutex<u64>,
}

impl Default for ResultSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultSink {
    pub fn new() -> Self {
        Self {
            state: watch::Sender::new(ResultState::Loading),
            refreshing: watch::Sender::new(false),
            latest: Mutex::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ResultState> {
        self.state.subscribe()
    }

    pub fn subscribe_refreshing(&self) -> watch::Receiver<bool> {
        self.refreshing.subscribe()
    }

    pub fn current(&self) -> ResultState {
        self.state.borrow().clone()
    }

    pub fn is_refreshing(&self) -> bool {
        *self.refreshing.borrow()
    }

    /// Start a dispatch. Supersedes every earlier ticket and clears the refresh flag.
    pub fn begin(&self) -> DispatchTicket {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        *latest += 1;
        self.refreshing.send_replace(false);
        DispatchTicket { seq: *latest }
    }

    pub fn is_current(&self, ticket: DispatchTicket) -> bool {
        *self.latest.lock().unwrap_or_else(|e| e.into_inner()) == ticket.seq
    }

    /// Replace the state if `ticket` is still the latest. Returns whether it was applied.
    pub fn publish(&self, ticket: DispatchTicket, state: ResultState) -> bool {
        // Check and send under one lock so a newer begin() cannot interleave
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        if *latest != ticket.seq {
            log_stale_dropped(ticket.seq, *latest);
            return false;
        }
        self.state.send_replace(state);
        true
    }

    /// Set the refresh flag if `ticket` is still the latest
    pub fn set_refreshing(&self, ticket: DispatchTicket, refreshing: bool) -> bool {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        if *latest != ticket.seq {
            return false;
        }
        self.refreshing.send_replace(refreshing);
        true
    }
}
