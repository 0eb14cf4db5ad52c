/// Pagination query parameters
///
/// Accepts `?page=1&limit=20`; defaults page=1, limit=20, limit capped at
/// 100 by `PageRequest`.
use serde::Deserialize;
use sideb_core::PageRequest;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn request(self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.limit.unwrap_or(defaults.limit),
        )
    }
}
