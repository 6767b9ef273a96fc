//! Paginated response envelope.

use serde::{Deserialize, Serialize};
use url::Url;

const CURSOR_PARAM: &str = "cursor";

/// Hypermedia links accompanying a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    /// Link to the current page.
    #[serde(rename = "self")]
    pub self_: String,
    /// Link to the following page, if any.
    pub next: Option<String>,
    /// Link to the preceding page, if any.
    pub prev: Option<String>,
}

impl PaginationLinks {
    /// Derive links from the request URL.
    ///
    /// Every query parameter other than `cursor` is preserved so filters and
    /// the limit carry over between pages.
    #[must_use]
    pub fn for_request(request_url: &Url, next: Option<&str>, prev: Option<&str>) -> Self {
        Self {
            self_: request_url.to_string(),
            next: next.map(|token| with_cursor(request_url, Some(token)).to_string()),
            prev: prev.map(|token| with_cursor(request_url, Some(token)).to_string()),
        }
    }

    /// Link to the first page of the same query.
    #[must_use]
    pub fn first_page(request_url: &Url) -> String {
        with_cursor(request_url, None).to_string()
    }
}

fn with_cursor(base: &Url, cursor: Option<&str>) -> Url {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != CURSOR_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    if retained.is_empty() && cursor.is_none() {
        return url;
    }
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        if let Some(token) = cursor {
            pairs.append_pair(CURSOR_PARAM, token);
        }
    }
    url
}

/// A page of results plus its links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Effective page size used to produce this page.
    pub limit: usize,
    /// Navigation links.
    pub links: PaginationLinks,
}

impl<T> Paginated<T> {
    /// Assemble a page.
    #[must_use]
    pub const fn new(data: Vec<T>, limit: usize, links: PaginationLinks) -> Self {
        Self { data, limit, links }
    }

    /// Convert every item while keeping the envelope.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            limit: self.limit,
            links: self.links,
        }
    }
}
