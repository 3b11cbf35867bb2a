use crate::api::{
    self,
    middleware::{require_auth, require_chat_session, AppState},
};
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: AppState) -> Router {
    // Console routes (require an operator session)
    let protected = Router::new()
        .route("/api/auth/logout", post(api::auth::logout))
        .route("/api/auth/session", get(api::auth::get_session))
        // User management
        .route("/api/users", get(api::users::list_users))
        .route("/api/users", post(api::users::create_user))
        .route("/api/users/:id", get(api::users::get_user))
        .route("/api/users/:id", patch(api::users::update_user))
        .route("/api/users/:id", delete(api::users::delete_user))
        .route("/api/users/:id/password", post(api::users::change_password))
        // Call scripts
        .route("/api/scripts", get(api::scripts::list_scripts))
        .route("/api/scripts", post(api::scripts::create_script))
        .route("/api/scripts/:id", get(api::scripts::get_script))
        .route("/api/scripts/:id", patch(api::scripts::update_script))
        .route("/api/scripts/:id", delete(api::scripts::delete_script))
        // Attendance tabulations
        .route("/api/tabulations", get(api::tabulations::list_tabulations))
        .route("/api/tabulations", post(api::tabulations::create_tabulation))
        .route("/api/tabulations/:id", get(api::tabulations::get_tabulation))
        .route(
            "/api/tabulations/:id",
            delete(api::tabulations::delete_tabulation),
        )
        // Chat channel management
        .route("/api/channels", get(api::channels::list_channels))
        .route("/api/channels", post(api::channels::create_channel))
        .route("/api/channels/:id", get(api::channels::get_channel))
        .route("/api/channels/:id", patch(api::channels::update_channel))
        .route("/api/channels/:id", delete(api::channels::delete_channel))
        // Notes
        .route("/api/notes", get(api::notes::list_notes))
        .route("/api/notes", post(api::notes::create_note))
        .route("/api/notes/:id", get(api::notes::get_note))
        .route("/api/notes/:id", patch(api::notes::update_note))
        .route("/api/notes/:id", delete(api::notes::delete_note))
        // Quizzes
        .route("/api/quizzes", get(api::quizzes::list_quizzes))
        .route("/api/quizzes", post(api::quizzes::create_quiz))
        .route("/api/quizzes/:id", get(api::quizzes::get_quiz))
        .route("/api/quizzes/:id", patch(api::quizzes::update_quiz))
        .route("/api/quizzes/:id", delete(api::quizzes::delete_quiz))
        // Presentations and slides
        .route(
            "/api/presentations",
            get(api::presentations::list_presentations),
        )
        .route(
            "/api/presentations/:filename/slides",
            get(api::presentations::list_slides),
        )
        .route(
            "/api/slides/:folder/:file",
            get(api::presentations::get_slide),
        )
        // Promise dates
        .route(
            "/api/promise-dates/:product",
            get(api::promise_dates::get_promise_date),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Chat routes (operator or anonymous guest session)
    let chat = Router::new()
        .route(
            "/api/channels/:id/messages",
            get(api::channels::list_messages),
        )
        .route(
            "/api/channels/:id/messages",
            post(api::channels::post_message),
        )
        .route(
            "/api/channels/:id/stream",
            get(api::channels::message_stream),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_chat_session,
        ));

    // Public routes
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/auth/login", post(api::auth::login))
        .route("/api/chat/sessions", post(api::auth::create_chat_session))
        .merge(protected)
        .merge(chat)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "Calldesk Operator Console"
}

async fn health_handler() -> &'static str {
    "OK"
}
