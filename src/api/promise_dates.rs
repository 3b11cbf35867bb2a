use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use crate::{
    api::middleware::{ApiError, ApiResult, AppState, AuthenticatedUser},
    models::ProductType,
    services::business_days,
};

#[derive(Debug, Serialize)]
pub struct PromiseDateResponse {
    pub product: ProductType,
    pub business_days: u32,
    pub promise_date: String, // YYYY-MM-DD
}

/// Service-level deadline for a product, anchored at today.
pub async fn get_promise_date(
    State(_state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(product): Path<String>,
) -> ApiResult<Json<PromiseDateResponse>> {
    let product = ProductType::parse(&product)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown product type: {}", product)))?;

    let promise_date = business_days::promise_date(product)
        .format("%Y-%m-%d")
        .to_string();

    Ok(Json(PromiseDateResponse {
        product,
        business_days: business_days::required_business_days(product),
        promise_date,
    }))
}
