// src/pagination.rs

//! Page-number pagination
//!
//! Clients pass `page` (1-based) and `limit`. Responses are wrapped in
//! [`Page`], whose `next`/`previous` links carry the remaining query
//! parameters so filters survive paging.

use serde::Serialize;

/// Page size when the client does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Upper bound on client-requested page sizes
pub const MAX_PAGE_SIZE: u32 = 100;

/// Requested window into a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Build from raw query values, falling back to `default_limit` and
    /// clamping to `1..=max_limit`
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32, max_limit: u32) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, max_limit),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}

/// One page of results plus navigation links
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap `results` for `request` over a listing of `count` items
    ///
    /// `base` is the request path, `query` the other query pairs to keep.
    pub fn new(
        results: Vec<T>,
        count: u64,
        request: PageRequest,
        base: &str,
        query: &[(String, String)],
    ) -> Self {
        let shown = u64::from(request.page) * u64::from(request.limit);
        let next = (shown < count).then(|| link(base, query, request.page + 1, request.limit));
        let previous =
            (request.page > 1).then(|| link(base, query, request.page - 1, request.limit));

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

fn link(base: &str, query: &[(String, String)], page: u32, limit: u32) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        if key != "page" && key != "limit" {
            serializer.append_pair(key, value);
        }
    }
    serializer.append_pair("page", &page.to_string());
    serializer.append_pair("limit", &limit.to_string());
    format!("{base}?{}", serializer.finish())
}
