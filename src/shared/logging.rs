//! Structured logging for the search orchestrator
//!
//! Provides consistent, contextual logging across dispatches.
//! Every event carries an `operation` field and the dispatch sequence number.

use crate::domain::models::SearchRoute;

/// Operations that emit log events
#[derive(Debug, Clone, Copy)]
pub enum LogOperation {
    Debounce,
    Dispatch,
    Fallback,
    Settle,
    VoiceQuery,
}

impl LogOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogOperation::Debounce => "debounce",
            LogOperation::Dispatch => "dispatch",
            LogOperation::Fallback => "fallback",
            LogOperation::Settle => "settle",
            LogOperation::VoiceQuery => "voice_query",
        }
    }
}

/// Log a (re)armed debounce timer
pub fn log_debounce_armed(delay_ms: u128, superseded: bool) {
    tracing::trace!(
        operation = LogOperation::Debounce.as_str(),
        delay_ms = delay_ms as u64,
        superseded_pending = superseded,
        "Debounce timer armed"
    );
}

/// Log dispatch start with the chosen route
pub fn log_dispatch_start(seq: u64, route: SearchRoute, query: &str, filters_active: bool) {
    tracing::debug!(
        operation = LogOperation::Dispatch.as_str(),
        seq = seq,
        route = route.as_str(),
        query = query,
        filters_active = filters_active,
        "Dispatching search"
    );
}

/// Log advanced search failure and the basic search retry
pub fn log_fallback(seq: u64, query: &str, error: &str) {
    tracing::warn!(
        operation = LogOperation::Fallback.as_str(),
        seq = seq,
        query = query,
        error = error,
        "Advanced search failed, falling back to basic search"
    );
}

/// Log a successful settle
pub fn log_settle_success(seq: u64, item_count: usize, facet_count: usize) {
    tracing::info!(
        operation = LogOperation::Settle.as_str(),
        seq = seq,
        item_count = item_count,
        facet_count = facet_count,
        "Search settled"
    );
}

/// Log a failed settle
pub fn log_settle_error(seq: u64, error: &str) {
    tracing::error!(
        operation = LogOperation::Settle.as_str(),
        seq = seq,
        error = error,
        "Search failed"
    );
}

/// Log a response dropped because a newer dispatch exists
pub fn log_stale_dropped(seq: u64, latest: u64) {
    tracing::debug!(
        operation = LogOperation::Settle.as_str(),
        seq = seq,
        latest_seq = latest,
        "Dropped stale search response"
    );
}

/// Log voice query outcome
pub fn log_voice_query(recognized: Option<&str>, error: Option<&str>) {
    match (recognized, error) {
        (Some(text), _) => tracing::info!(
            operation = LogOperation::VoiceQuery.as_str(),
            recognized = text,
            "Voice query recognized"
        ),
        (None, Some(err)) => tracing::warn!(
            operation = LogOperation::VoiceQuery.as_str(),
            error = err,
            "Voice query failed"
        ),
        (None, None) => tracing::debug!(
            operation = LogOperation::VoiceQuery.as_str(),
            "Voice query returned no speech"
        ),
    }
}
