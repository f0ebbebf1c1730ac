//! Page-control arithmetic for the employee list.
//!
//! Page indices are zero-based internally; the page-jump input and the
//! rendered page buttons are one-based.

use std::ops::RangeInclusive;

/// Position within a paginated result set as last reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, total_pages: u32) -> Self {
        Self { page, total_pages }
    }

    pub fn can_previous(&self) -> bool {
        self.page != 0
    }

    /// Disabled exactly on the last reported page. With zero pages the
    /// control stays enabled.
    pub fn can_next(&self) -> bool {
        self.page + 1 != self.total_pages
    }

    pub fn previous(&self) -> Option<u32> {
        self.can_previous().then(|| self.page - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.can_next().then(|| self.page + 1)
    }

    /// Page-number buttons: the current page and one neighbor per side,
    /// clipped to the existing pages. Empty when there are no pages.
    pub fn window(&self) -> Option<RangeInclusive<u32>> {
        if self.total_pages == 0 {
            return None;
        }
        let start = self.page.saturating_sub(1);
        let end = (self.total_pages - 1).min(self.page + 1);
        (start <= end).then_some(start..=end)
    }

    /// Window as a list of zero-based page indices.
    pub fn window_pages(&self) -> Vec<u32> {
        self.window().map(|r| r.collect()).unwrap_or_default()
    }

    /// Interpret a confirmed page-jump entry. Accepts a one-based page number
    /// within `[1, total_pages]` and returns the zero-based index; anything
    /// else is ignored.
    pub fn jump(&self, input: &str) -> Option<u32> {
        let value: u32 = input.trim().parse().ok()?;
        (1..=self.total_pages).contains(&value).then(|| value - 1)
    }
}
