// Shared constants

/// Query sent to advanced search when only filters are set
pub const WILDCARD_QUERY: &str = "*";

/// Default page size for advanced search
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// Debounce after a keystroke in the search box
pub const QUERY_DEBOUNCE_MS: u64 = 500;

/// Debounce after a filter toggle (shorter than typing)
pub const FILTER_DEBOUNCE_MS: u64 = 300;

pub const DEFAULT_BASE_URL: &str = "https://192.168.2.120:4712";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Silence before the speech recognizer finalizes a phrase
pub const DEFAULT_SPEECH_PAUSE_MS: u64 = 3000;
pub const MIN_SPEECH_PAUSE_MS: u64 = 1500;
pub const MAX_SPEECH_PAUSE_MS: u64 = 10000;

/// Date format of the date range filter on the wire
pub const FILTER_DATE_FORMAT: &str = "%Y-%m-%d";
