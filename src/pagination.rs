use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
pub struct Pagination {
    #[param(default = 1, minimum = 1)]
    pub page: Option<u64>,
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub limit: Option<u64>,
}

impl Pagination {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total_items: u64, page: u64, page_size: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            (total_items as f64 / page_size as f64).ceil() as u64
        };

        Self {
            data,
            total_items,
            total_pages,
            current_page: page,
            page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_params_missing() {
        let p = Pagination {
            page: None,
            limit: None,
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn limit_is_clamped() {
        let p = Pagination {
            page: Some(3),
            limit: Some(500),
        };
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 200);
    }

    #[test]
    fn total_pages_round_up() {
        let r: PaginatedResponse<u32> = PaginatedResponse::new(vec![], 21, 1, 10);
        assert_eq!(r.total_pages, 3);
    }
}
