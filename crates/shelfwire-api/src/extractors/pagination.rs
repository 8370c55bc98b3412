//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use shelfwire_core::types::pagination::PageRequest;

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (zero-based, default: 0).
    #[serde(default)]
    pub page: u64,
    /// Items per page (default: 20, max: 100).
    #[serde(default = "default_size")]
    pub size: u64,
}

fn default_size() -> u64 {
    20
}

impl PaginationParams {
    /// Converts to a `PageRequest`, clamping the size.
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}
