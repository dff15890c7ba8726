//! Pagination types shared by all list queries.

/// One window of a paged query: a zero-based item offset and a page size.
///
/// `offset` counts items, not pages; the next window starts at
/// `offset + limit`. The store query and the next-page link construction
/// both follow this convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Offset of the window immediately after this one.
    pub fn next_offset(&self) -> u64 {
        self.offset + self.limit
    }
}

/// One page of results plus whether further results exist beyond it.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Build a page from a query that over-fetched `limit + 1` rows.
    ///
    /// If more than `limit` rows came back, the extra row is dropped and
    /// `has_next` is set.
    pub fn from_overfetch(mut items: Vec<T>, limit: u64) -> Self {
        let has_next = items.len() as u64 > limit;
        items.truncate(limit as usize);
        Self { items, has_next }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            has_next: self.has_next,
        }
    }
}
