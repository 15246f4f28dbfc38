use actix_web::{web, HttpResponse};
use frame_balance::{FrameRenderer, FrameResponse, InteractionState};

pub fn configure(config: &mut web::ServiceConfig) {
    config
        .route("/", web::get().to(index))
        .route("/", web::post().to(index))
        .route("/check", web::get().to(check))
        .route("/check", web::post().to(check))
        .route("/health", web::get().to(health));
}

async fn index(renderer: web::Data<FrameRenderer>) -> HttpResponse {
    HttpResponse::Ok().json(renderer.render_initial())
}

// A missing or malformed body degrades to the no-identity frame; the
// response is always a rendered frame, never a protocol-level failure.
async fn check(
    renderer: web::Data<FrameRenderer>,
    state: Option<web::Json<InteractionState>>,
) -> HttpResponse {
    let state = state.map(web::Json::into_inner).unwrap_or_default();
    HttpResponse::Ok().json(render_boundary(renderer.into_inner(), state).await)
}

// The render runs in its own task so that even a panic inside the
// pipeline degrades to the retry frame instead of dropping the
// connection.
async fn render_boundary(
    renderer: std::sync::Arc<FrameRenderer>,
    state: InteractionState,
) -> FrameResponse {
    let render = tokio::spawn(async move { renderer.render_check_or_error(&state).await });
    match render.await {
        Ok(frame) => frame,
        Err(error) => {
            tracing::error!("frame render panicked: {}", error);
            FrameRenderer::error_frame("Something went wrong. Please retry.")
        }
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
