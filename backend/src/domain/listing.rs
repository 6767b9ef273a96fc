//! Offset windows over ordered listings.

/// Rows to skip and the maximum to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    /// Rows to skip.
    pub offset: usize,
    /// Maximum rows to return.
    pub limit: usize,
}

/// One window of an ordered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in order.
    pub items: Vec<T>,
    /// Whether rows exist beyond this window.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Build a page from a fetch of up to `limit + 1` rows.
    ///
    /// # Examples
    /// ```
    /// use network_backend::domain::Page;
    ///
    /// let page = Page::from_overfetch(vec![1, 2, 3], 2);
    /// assert_eq!(page.items, vec![1, 2]);
    /// assert!(page.has_more);
    /// ```
    #[must_use]
    pub fn from_overfetch(mut items: Vec<T>, limit: usize) -> Self {
        let has_more = items.len() > limit;
        items.truncate(limit);
        Self { items, has_more }
    }

    /// Slice an ordered in-memory collection.
    #[must_use]
    pub fn slice(items: impl IntoIterator<Item = T>, window: ListWindow) -> Self {
        let fetched = items
            .into_iter()
            .skip(window.offset)
            .take(window.limit.saturating_add(1))
            .collect();
        Self::from_overfetch(fetched, window.limit)
    }
}
