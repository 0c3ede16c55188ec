use axum::Json;
use serde::Serialize;
use tripdesk_services::dao::base::PaginatedResult;

/// The JSON envelope every endpoint responds with.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
    })
}

#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct PagedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

pub fn paged<T: Serialize>(result: PaginatedResult<T>) -> Json<PagedResponse<T>> {
    Json(PagedResponse {
        success: true,
        pagination: PageMeta {
            page: result.page,
            per_page: result.per_page,
            total: result.total,
            total_pages: result.total_pages,
        },
        data: result.items,
    })
}
