//! Listing queries: filtering and pagination over a snapshot
//!
//! Filters compare a record's string field against the query value without
//! regard to case. Records whose field is absent or not a string never match
//! an active filter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::Record;

/// Page returned when `page` is omitted
pub const DEFAULT_PAGE: u32 = 1;

/// Page size returned when `limit` is omitted
pub const DEFAULT_LIMIT: u32 = 50;

/// Error for query parameters that cannot be interpreted
#[derive(Debug, Error, PartialEq)]
#[error("Invalid query parameter '{name}': expected an integer >= 1, got '{value}'")]
pub struct QueryError {
    pub name: &'static str,
    pub value: String,
}

/// Raw query string parameters as received
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub city: Option<String>,
    pub industry: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A validated listing query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Keep records whose `city` matches, ignoring case
    pub city: Option<String>,
    /// Keep records whose `industry` matches, ignoring case
    pub industry: Option<String>,
    /// 1-based page number
    pub page: u32,
    /// Records per page
    pub limit: u32,
}

/// Response envelope for a listing request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    /// Number of records matching the filters, before pagination
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub results: Vec<Record>,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            city: None,
            industry: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListingQuery {
    /// Validates raw parameters
    ///
    /// Empty filter values are treated as absent. `page` and `limit` must be
    /// integers of at least 1 when present.
    pub fn from_params(params: ListingParams) -> Result<Self, QueryError> {
        Ok(Self {
            city: non_empty(params.city),
            industry: non_empty(params.industry),
            page: parse_positive("page", params.page, DEFAULT_PAGE)?,
            limit: parse_positive("limit", params.limit, DEFAULT_LIMIT)?,
        })
    }

    /// Whether a record passes every active filter
    pub fn matches(&self, record: &Record) -> bool {
        field_matches(record, "city", self.city.as_deref())
            && field_matches(record, "industry", self.industry.as_deref())
    }

    /// Filters `items` and cuts out the requested page
    pub fn apply(&self, items: &[Record]) -> ListingPage {
        let filtered: Vec<&Record> = items.iter().filter(|record| self.matches(record)).collect();

        let start = (self.page as usize)
            .saturating_sub(1)
            .saturating_mul(self.limit as usize);
        let results = filtered
            .iter()
            .skip(start)
            .take(self.limit as usize)
            .map(|record| (*record).clone())
            .collect();

        ListingPage {
            total: filtered.len(),
            page: self.page,
            per_page: self.limit,
            results,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_positive(name: &'static str, value: Option<String>, default: u32) -> Result<u32, QueryError> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(default);
    };
    match value.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(QueryError { name, value }),
    }
}

fn field_matches(record: &Record, field: &str, wanted: Option<&str>) -> bool {
    let Some(wanted) = wanted else {
        return true;
    };
    record
        .get(field)
        .and_then(|value| value.as_str())
        .is_some_and(|actual| actual.to_lowercase() == wanted.to_lowercase())
}
