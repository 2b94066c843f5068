//! Settlement API handlers

use axum::extract::{Query, State};
use serde::Serialize;

use crate::api::PageQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::SupplierSettlement;
use crate::db::repository::{SettlementRepository, SettlementSummary};
use shared::{ApiResponse, AppError, AppResult, Pagination};

/// A supplier's settlement page with pending/transferred totals
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MySettlementsResponse {
    pub settlements: Vec<SupplierSettlement>,
    pub summary: SettlementSummary,
}

/// GET /settlement/my-settlements (supplier)
pub async fn my_settlements(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<MySettlementsResponse>> {
    if !user.is_supplier() {
        return Err(AppError::forbidden("Supplier role required"));
    }

    let repo = SettlementRepository::new(state.get_db());
    let (settlements, total) = repo
        .find_page_by_supplier(&user.id, query.page, query.limit)
        .await?;
    let summary = repo.summary_for_supplier(&user.id).await?;

    Ok(
        ApiResponse::ok(MySettlementsResponse {
            settlements,
            summary,
        })
        .with_meta(Pagination::new(query.page, query.limit, total)),
    )
}

/// GET /settlement/all-settlements (admin)
pub async fn all_settlements(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<SupplierSettlement>>> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin role required"));
    }

    let (settlements, total) = SettlementRepository::new(state.get_db())
        .find_page_all(query.page, query.limit)
        .await?;
    Ok(ApiResponse::ok(settlements).with_meta(Pagination::new(query.page, query.limit, total)))
}
