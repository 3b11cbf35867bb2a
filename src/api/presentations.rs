use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use crate::{
    api::middleware::{ApiResult, AppState, AuthenticatedUser},
    models::*,
};

pub async fn list_presentations(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<PresentationListResponse>> {
    let presentations = state.slide_store.list_presentations().await?;
    let count = presentations.len() as i64;

    Ok(Json(PresentationListResponse {
        presentations,
        count,
    }))
}

pub async fn list_slides(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(filename): Path<String>,
) -> ApiResult<Json<SlideListResponse>> {
    let slides = state.slide_store.list_slides(&filename).await?;
    let folder = crate::services::slide_store::presentation_folder(&filename)?;
    let count = slides.len() as i64;

    Ok(Json(SlideListResponse {
        folder,
        slides,
        count,
    }))
}

pub async fn get_slide(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path((folder, file)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let (bytes, content_type) = state.slide_store.read_slide(&folder, &file).await?;

    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}
