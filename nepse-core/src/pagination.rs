//! Page window over stored or scraped rows

use thiserror::Error;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be greater than 0")]
    PageOutOfRange,
    #[error("page_size must be between 1 and {MAX_PAGE_SIZE}")]
    PageSizeOutOfRange,
}

/// 1-based page number and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn validate(&self) -> Result<(), PaginationError> {
        if self.page == 0 {
            return Err(PaginationError::PageOutOfRange);
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(PaginationError::PageSizeOutOfRange);
        }
        Ok(())
    }

    /// Number of rows skipped before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    /// The rows of `items` that fall on this page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        if start >= items.len() {
            return &[];
        }
        let end = start.saturating_add(self.page_size as usize).min(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Pagination::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 5);
        assert_eq!(p.offset(), 0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds() {
        assert_eq!(
            Pagination::new(0, 5).validate(),
            Err(PaginationError::PageOutOfRange)
        );
        assert_eq!(
            Pagination::new(1, 0).validate(),
            Err(PaginationError::PageSizeOutOfRange)
        );
        assert_eq!(
            Pagination::new(1, 101).validate(),
            Err(PaginationError::PageSizeOutOfRange)
        );
        assert!(Pagination::new(1, 100).validate().is_ok());
    }

    #[test]
    fn test_slice_windows() {
        let rows: Vec<u32> = (1..=7).collect();

        assert_eq!(Pagination::new(1, 5).slice(&rows), &[1, 2, 3, 4, 5]);
        assert_eq!(Pagination::new(2, 5).slice(&rows), &[6, 7]);
        assert!(Pagination::new(3, 5).slice(&rows).is_empty());
    }
}
