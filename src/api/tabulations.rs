use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use crate::{
    api::middleware::{ApiError, ApiResult, AppState, AuthenticatedUser},
    events::SystemEvent,
    models::*,
    services::business_days,
};

#[derive(Deserialize)]
pub struct TabulationListParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    #[serde(default)]
    pub operator_id: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

/// Record an attendance outcome. The promise date is derived from today's
/// date and the product's business-day allowance, never taken from the
/// client.
pub async fn create_tabulation(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTabulationRequest>,
) -> ApiResult<(StatusCode, Json<Tabulation>)> {
    if request.outcome.trim().is_empty() {
        return Err(ApiError::BadRequest("Outcome is required".to_string()));
    }

    let promise_date = business_days::promise_date(request.product)
        .format("%Y-%m-%d")
        .to_string();

    let tabulation = Tabulation::new(
        auth_user.user.id.clone(),
        request.product,
        request.outcome.trim().to_string(),
        request.remarks,
        promise_date,
    );
    state.db.create_tabulation(&tabulation).await?;

    state.event_bus.publish(SystemEvent::TabulationRecorded {
        tabulation_id: tabulation.id.clone(),
        operator_id: tabulation.operator_id.clone(),
        product: tabulation.product.to_string(),
        promise_date: tabulation.promise_date.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    });

    tracing::info!(
        "Tabulation {} recorded by {} (product: {}, promise: {})",
        tabulation.id,
        tabulation.operator_id,
        tabulation.product,
        tabulation.promise_date
    );

    Ok((StatusCode::CREATED, Json(tabulation)))
}

pub async fn list_tabulations(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(params): Query<TabulationListParams>,
) -> ApiResult<Json<TabulationListResponse>> {
    let page = params.page.max(1);
    let per_page = params.per_page.clamp(1, 100);
    let offset = (page - 1) * per_page;

    let product = match params.product.as_deref() {
        Some(product_str) => Some(ProductType::parse(product_str).ok_or_else(|| {
            ApiError::BadRequest(format!("Unknown product type: {}", product_str))
        })?),
        None => None,
    };

    // Operators only ever see their own tabulations.
    let operator_filter = if auth_user.is_admin() {
        params.operator_id.clone()
    } else {
        Some(auth_user.user.id.clone())
    };

    let (tabulations, total_count) = state
        .db
        .list_tabulations(operator_filter.as_deref(), product, per_page, offset)
        .await?;

    let total_pages = (total_count + per_page - 1) / per_page;

    Ok(Json(TabulationListResponse {
        tabulations,
        pagination: PaginationMetadata {
            page,
            per_page,
            total_count,
            total_pages,
        },
    }))
}

pub async fn get_tabulation(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Tabulation>> {
    let tabulation = state
        .db
        .get_tabulation(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tabulation not found".to_string()))?;

    if !auth_user.is_admin() && tabulation.operator_id != auth_user.user.id {
        return Err(ApiError::Forbidden(
            "Cannot view another operator's tabulation".to_string(),
        ));
    }

    Ok(Json(tabulation))
}

pub async fn delete_tabulation(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    auth_user.require_admin()?;

    state.db.delete_tabulation(&id).await?;

    tracing::info!("Deleted tabulation {}", id);

    Ok(StatusCode::NO_CONTENT)
}
