//! Client configuration
//!
//! Defaults match the mobile client; every value can be overridden from the
//! environment and then from the command line.

use std::time::Duration;

use crate::infrastructure::speech::RecognitionOptions;
use crate::shared::constants::{
    DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RESULT_LIMIT, DEFAULT_SPEECH_PAUSE_MS,
    FILTER_DEBOUNCE_MS, MAX_SPEECH_PAUSE_MS, MIN_SPEECH_PAUSE_MS, QUERY_DEBOUNCE_MS,
};
use crate::shared::errors::{AppError, Result};

pub const ENV_BASE_URL: &str = "VOICE2_BASE_URL";
pub const ENV_QUERY_DEBOUNCE_MS: &str = "VOICE2_QUERY_DEBOUNCE_MS";
pub const ENV_FILTER_DEBOUNCE_MS: &str = "VOICE2_FILTER_DEBOUNCE_MS";
pub const ENV_RESULT_LIMIT: &str = "VOICE2_RESULT_LIMIT";
pub const ENV_SPEECH_PAUSE_MS: &str = "VOICE2_SPEECH_PAUSE_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub base_url: String,
    pub query_debounce_ms: u64,
    pub filter_debounce_ms: u64,
    pub result_limit: usize,
    pub speech_pause_ms: u64,
    pub request_timeout_secs: u64,
    /// Accept self-signed certificates (development backends)
    pub accept_invalid_certs: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            query_debounce_ms: QUERY_DEBOUNCE_MS,
            filter_debounce_ms: FILTER_DEBOUNCE_MS,
            result_limit: DEFAULT_RESULT_LIMIT,
            speech_pause_ms: DEFAULT_SPEECH_PAUSE_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            accept_invalid_certs: false,
        }
    }
}

impl SearchConfig {
    /// Defaults overridden by `VOICE2_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(ms) = parse_var(&lookup, ENV_QUERY_DEBOUNCE_MS)? {
            config.query_debounce_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, ENV_FILTER_DEBOUNCE_MS)? {
            config.filter_debounce_ms = ms;
        }
        if let Some(limit) = parse_var(&lookup, ENV_RESULT_LIMIT)? {
            config = config.with_result_limit(limit)?;
        }
        if let Some(ms) = parse_var(&lookup, ENV_SPEECH_PAUSE_MS)? {
            config = config.with_speech_pause_ms(ms);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_debounce(mut self, query: Duration, filter: Duration) -> Self {
        self.query_debounce_ms = query.as_millis() as u64;
        self.filter_debounce_ms = filter.as_millis() as u64;
        self
    }

    pub fn with_result_limit(mut self, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(AppError::Config("result limit must be at least 1".to_string()));
        }
        self.result_limit = limit;
        Ok(self)
    }

    /// Clamped to the range the recognizer accepts
    pub fn with_speech_pause_ms(mut self, ms: u64) -> Self {
        self.speech_pause_ms = ms.clamp(MIN_SPEECH_PAUSE_MS, MAX_SPEECH_PAUSE_MS);
        if self.speech_pause_ms != ms {
            tracing::warn!(
                requested_ms = ms,
                applied_ms = self.speech_pause_ms,
                "Speech pause out of range, clamped"
            );
        }
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn query_debounce(&self) -> Duration {
        Duration::from_millis(self.query_debounce_ms)
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    pub fn recognition_options(&self) -> RecognitionOptions {
        RecognitionOptions {
            pause: Duration::from_millis(self.speech_pause_ms),
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{}={:?}: {}", key, raw, e))),
    }
}
