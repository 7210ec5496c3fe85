use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::chat::Transcription;
use crate::shared::constants::{FILTER_DATE_FORMAT, WILDCARD_QUERY};
use crate::shared::errors::{AppError, Result};

/// Filter selections for the chat list search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub fuzzy: bool,
    pub boost_recent: bool,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub selected_tags: BTreeSet<String>,
}

impl SearchFilters {
    /// True when any field differs from its default
    pub fn is_active(&self) -> bool {
        self.fuzzy
            || self.boost_recent
            || self.date_from.is_some()
            || self.date_to.is_some()
            || !self.selected_tags.is_empty()
    }

    /// Add the tag if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.selected_tags.remove(tag) {
            false
        } else {
            self.selected_tags.insert(tag.to_string());
            true
        }
    }

    /// Parse a `YYYY-MM-DD` date as used by the date range filter
    pub fn parse_date(input: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(input.trim(), FILTER_DATE_FORMAT)
            .map_err(|e| AppError::InvalidInput(format!("invalid date '{}': {}", input, e)))
    }
}

/// Which backend operation a dispatch resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchRoute {
    /// Blank query and no filters: plain unfiltered list
    ListAll,
    /// Anything else: advanced search, with basic search as fallback when a query exists
    Advanced,
}

impl SearchRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchRoute::ListAll => "list_all",
            SearchRoute::Advanced => "advanced",
        }
    }
}

/// One search dispatch. Built fresh per dispatch and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub filters: SearchFilters,
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, filters: SearchFilters, limit: usize) -> Self {
        Self {
            query: query.into(),
            filters,
            limit,
        }
    }

    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Query sent to advanced search; the wildcard stands in for a blank query
    pub fn effective_query(&self) -> &str {
        if self.has_query() {
            &self.query
        } else {
            WILDCARD_QUERY
        }
    }

    pub fn route(&self) -> SearchRoute {
        if !self.has_query() && !self.filters.is_active() {
            SearchRoute::ListAll
        } else {
            SearchRoute::Advanced
        }
    }

    /// Query parameters for the advanced search endpoint.
    /// Absent optional values are omitted; `tags` repeats once per selected tag.
    pub fn advanced_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", self.effective_query().to_string()),
            ("limit", self.limit.to_string()),
            ("fuzzy", self.filters.fuzzy.to_string()),
            ("boost_recent", self.filters.boost_recent.to_string()),
        ];

        if let Some(from) = self.filters.date_from {
            params.push(("date_from", from.format(FILTER_DATE_FORMAT).to_string()));
        }
        if let Some(to) = self.filters.date_to {
            params.push(("date_to", to.format(FILTER_DATE_FORMAT).to_string()));
        }
        for tag in &self.filters.selected_tags {
            params.push(("tags", tag.clone()));
        }

        params
    }
}

/// Tag name plus aggregate count, returned alongside search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFacet {
    pub name: String,
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

/// Response of the advanced search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedSearchResponse {
    pub items: Vec<Transcription>,
    #[serde(default)]
    pub tag_facets: Vec<TagFacet>,
}
