/// Pagination query parameters
#[derive(Debug, Clone, Copy)]
pub struct PaginationParams {
    pub page: u32,
    pub limit: u32,
}

impl PaginationParams {
    /// Clamp raw page/limit values into the accepted range.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, 100),
        }
    }

    pub fn offset(&self) -> u64 {
        ((self.page - 1) as u64) * self.limit as u64
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: 1, limit: 50 }
    }
}

/// Paginated response wrapper
#[derive(Debug)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_clamped() {
        let p = PaginationParams::new(0, 1000);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset(), 0);

        let p = PaginationParams::new(3, 20);
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn total_pages_rounds_up() {
        let r = PaginatedResult::new(vec![1, 2], 41, 1, 20);
        assert_eq!(r.total_pages, 3);
        let r = PaginatedResult::<i32>::new(vec![], 0, 1, 20);
        assert_eq!(r.total_pages, 0);
    }
}
