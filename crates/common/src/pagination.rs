//! Pagination utilities shared by list endpoints.
//!
//! Admin list pages show 4 items per page; `normalize` clamps raw inputs
//! into the shape SeaORM's paginator expects.

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

/// Items shown per admin list page.
pub const PAGE_SIZE: u32 = 4;

impl Pagination {
    pub fn page(page: u32) -> Self {
        Self { page, per_page: PAGE_SIZE }
    }

    /// Clamp to sane defaults and convert to 0-based `(page_index, per_page)`.
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: PAGE_SIZE }
    }
}
