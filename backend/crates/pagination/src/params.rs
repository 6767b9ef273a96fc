//! Request-side paging parameters.

/// Page size used when the client does not ask for one.
pub const DEFAULT_LIMIT: usize = 20;

/// Largest page size a client may request.
pub const MAX_LIMIT: usize = 100;

/// Cursor and limit supplied by a client.
///
/// The limit is clamped into `1..=MAX_LIMIT`; an absent limit falls back to
/// [`DEFAULT_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    cursor: Option<String>,
    limit: Option<usize>,
}

impl PageParams {
    /// Build parameters from raw request values.
    #[must_use]
    pub fn new(cursor: Option<String>, limit: Option<usize>) -> Self {
        let cursor = cursor.filter(|token| !token.trim().is_empty());
        Self { cursor, limit }
    }

    /// Opaque cursor token, if the client supplied a non-blank one.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Effective page size.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}
