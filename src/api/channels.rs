use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Extension, Json,
};
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt as _;
use uuid::Uuid;

use crate::{
    api::middleware::{ApiError, ApiResult, AppState, AuthenticatedUser, ChatParticipant},
    events::SystemEvent,
    models::*,
    services::connection_manager::ChatEvent,
};

// Channel management (operator console)

pub async fn list_channels(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ChannelListResponse>> {
    let channels = state.db.list_channels().await?;
    let count = channels.len() as i64;

    Ok(Json(ChannelListResponse { channels, count }))
}

pub async fn create_channel(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateChannelRequest>,
) -> ApiResult<(StatusCode, Json<Channel>)> {
    auth_user.require_admin()?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Channel name is required".to_string()));
    }

    let channel = Channel::new(name.to_string(), request.description);
    state.db.create_channel(&channel).await?;

    tracing::info!("Created channel {} ({})", channel.name, channel.id);

    Ok((StatusCode::CREATED, Json(channel)))
}

pub async fn get_channel(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Channel>> {
    let channel = state
        .db
        .get_channel(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

    Ok(Json(channel))
}

pub async fn update_channel(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateChannelRequest>,
) -> ApiResult<Json<Channel>> {
    auth_user.require_admin()?;

    let description = request
        .description
        .as_ref()
        .map(|outer| outer.as_deref());

    state
        .db
        .update_channel(&id, request.name.as_deref(), description)
        .await?;

    let updated = state
        .db
        .get_channel(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

    Ok(Json(updated))
}

pub async fn delete_channel(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    auth_user.require_admin()?;

    state.db.delete_channel(&id).await?;

    tracing::info!("Deleted channel {}", id);

    Ok(StatusCode::NO_CONTENT)
}

// Messaging (operators and guests)

#[derive(Deserialize)]
pub struct MessageListParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    50
}

pub async fn list_messages(
    State(state): State<AppState>,
    Extension(_participant): Extension<ChatParticipant>,
    Path(channel_id): Path<String>,
    Query(params): Query<MessageListParams>,
) -> ApiResult<Json<MessageListResponse>> {
    state
        .db
        .get_channel(&channel_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

    let page = params.page.max(1);
    let per_page = params.per_page.clamp(1, 200);
    let offset = (page - 1) * per_page;

    let (messages, total_count) = state.db.list_messages(&channel_id, per_page, offset).await?;
    let total_pages = (total_count + per_page - 1) / per_page;

    Ok(Json(MessageListResponse {
        messages,
        pagination: PaginationMetadata {
            page,
            per_page,
            total_count,
            total_pages,
        },
    }))
}

pub async fn post_message(
    State(state): State<AppState>,
    Extension(participant): Extension<ChatParticipant>,
    Path(channel_id): Path<String>,
    Json(request): Json<PostMessageRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    state
        .db
        .get_channel(&channel_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

    let body = request.body.trim();
    if body.is_empty() {
        return Err(ApiError::BadRequest("Message body is required".to_string()));
    }
    if body.len() > 2000 {
        return Err(ApiError::BadRequest(
            "Message body must be at most 2000 characters".to_string(),
        ));
    }

    let message = Message::new(
        channel_id.clone(),
        participant.display_name.clone(),
        participant.kind,
        body.to_string(),
    );
    state.db.create_message(&message).await?;

    let delivered = state
        .connection_manager
        .broadcast(&channel_id, ChatEvent::from(&message))
        .await;

    state.event_bus.publish(SystemEvent::MessagePosted {
        message_id: message.id.clone(),
        channel_id: channel_id.clone(),
        author_kind: message.author_kind,
        timestamp: chrono::Utc::now().to_rfc3339(),
    });

    tracing::debug!(
        "Message {} posted to {} by {} ({} live subscribers)",
        message.id,
        channel_id,
        message.author_name,
        delivered
    );

    Ok((StatusCode::CREATED, Json(message)))
}

/// SSE endpoint delivering channel messages as they are posted.
pub async fn message_stream(
    State(state): State<AppState>,
    Extension(participant): Extension<ChatParticipant>,
    Path(channel_id): Path<String>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    state
        .db
        .get_channel(&channel_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

    let (tx, rx) = mpsc::channel::<ChatEvent>(100);

    let subscriber_id = Uuid::new_v4().to_string();
    state
        .connection_manager
        .subscribe(&channel_id, &subscriber_id, tx)
        .await;

    tracing::info!(
        "Chat stream opened on {} by {} ({})",
        channel_id,
        participant.display_name,
        participant.kind
    );

    let stream = ReceiverStream::new(rx).map(|event| {
        let json_data = serde_json::to_string(&event).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize chat event: {}", e);
            "{}".to_string()
        });

        Ok(Event::default().event("message").data(json_data))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
