//! 分页相关的数据结构

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const DEFAULT_PER_PAGE: u64 = 20;
const MAX_PER_PAGE: u64 = 100;
/// 数据库 OFFSET 按有符号 64 位绑定
const MAX_OFFSET: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    pub page: Option<u64>,
    #[serde(alias = "per_page")]
    pub per_page: Option<u64>,
}

impl PaginationParams {
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self { page, per_page }
    }

    pub fn get_page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn get_per_page(&self) -> u64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    pub fn get_offset(&self) -> u64 {
        (self.get_page() - 1)
            .saturating_mul(self.get_per_page())
            .min(MAX_OFFSET)
    }

    pub fn get_limit(&self) -> u64 {
        self.get_per_page()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        let per_page = params.get_per_page();
        Self {
            items,
            page: params.get_page(),
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// limit/offset 风格分页 (订单列表)
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct OffsetPagination {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub has_more: bool,
}

impl OffsetPagination {
    pub fn new(total: u64, limit: u64, offset: u64) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: offset.saturating_add(limit) < total,
        }
    }

    /// 归一化 limit (1..=100, 默认 20) 与 offset
    pub fn normalize(limit: Option<u64>, offset: Option<u64>) -> (u64, u64) {
        (
            limit.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
            offset.unwrap_or(0).min(MAX_OFFSET),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params() {
        let params = PaginationParams::new(Some(2), Some(10));
        assert_eq!(params.get_page(), 2);
        assert_eq!(params.get_per_page(), 10);
        assert_eq!(params.get_offset(), 10);
        assert_eq!(params.get_limit(), 10);
    }

    #[test]
    fn test_pagination_params_defaults_and_clamping() {
        let params = PaginationParams::new(None, None);
        assert_eq!(params.get_page(), 1);
        assert_eq!(params.get_per_page(), 20);
        assert_eq!(params.get_offset(), 0);

        let params = PaginationParams::new(Some(0), Some(1000));
        assert_eq!(params.get_page(), 1);
        assert_eq!(params.get_per_page(), 100);
    }

    #[test]
    fn test_paginated_response_total_pages() {
        let params = PaginationParams::new(Some(2), Some(10));
        let page = PaginatedResponse::new(vec![1, 2, 3], &params, 25);
        assert_eq!(page.total_pages, 3);

        let empty: PaginatedResponse<i32> = PaginatedResponse::new(vec![], &params, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_offset_pagination_has_more() {
        assert!(OffsetPagination::new(25, 10, 10).has_more);
        assert!(!OffsetPagination::new(25, 10, 20).has_more);
        assert_eq!(OffsetPagination::normalize(None, None), (20, 0));
        assert_eq!(OffsetPagination::normalize(Some(0), Some(5)), (1, 5));
    }

    #[test]
    fn test_huge_page_and_offset_saturate() {
        let params = PaginationParams::new(Some(u64::MAX), Some(100));
        assert_eq!(params.get_offset(), i64::MAX as u64);

        let (limit, offset) = OffsetPagination::normalize(Some(u64::MAX), Some(u64::MAX));
        assert_eq!((limit, offset), (100, i64::MAX as u64));

        let page = OffsetPagination::new(3, u64::MAX, u64::MAX);
        assert!(!page.has_more);
        assert!(OffsetPagination::new(u64::MAX, 100, offset).has_more);
    }
}
