//! Fixed-size page windows over list results

/// Number of adverts per page
pub const PAGE_SIZE: usize = 10;

/// Requested page of a list result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page number
    pub number: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            size: PAGE_SIZE,
        }
    }

    /// Window of this page over a result of `total` items
    pub fn window(&self, total: usize) -> (usize, usize) {
        paginate(self.number, self.size, total)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Compute the `[start, end)` slice of page `page` over `total` items
///
/// Always satisfies `start <= end <= total`; a page past the end yields the
/// empty window `(total, total)`.
pub fn paginate(page: usize, page_size: usize, total: usize) -> (usize, usize) {
    let start = page.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    (start, end)
}
