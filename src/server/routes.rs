/// Route handlers: `POST /api/bot` and `GET /health`.
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::AppContext;
use crate::pipeline::{ConversationTurn, FAILURE_MESSAGE, PipelineError};

// ── Wire types ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BotRequest {
    pub prompt: String,
    #[serde(default)]
    pub historico: Option<Vec<ConversationTurn>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BotResponse {
    pub resposta: String,
}

fn failure() -> (StatusCode, Json<BotResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(BotResponse {
            resposta: FAILURE_MESSAGE.to_string(),
        }),
    )
}

// ── Router ───────────────────────────────────────────────────────────

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/bot", post(bot))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Answer one question. Every failure, whatever its cause, yields the same
/// body and status; the cause only goes to the log.
async fn bot(
    State(ctx): State<AppContext>,
    payload: Result<Json<BotRequest>, JsonRejection>,
) -> (StatusCode, Json<BotResponse>) {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let err = PipelineError::MalformedRequest(rejection.body_text());
            error!(stage = err.stage(), "request failed: {err}");
            return failure();
        }
    };

    let history = req.historico.unwrap_or_default();
    let window = ctx.history_window.apply(&history);
    if window.len() < history.len() {
        info!(
            "history trimmed from {} to {} turns",
            history.len(),
            window.len()
        );
    }

    match ctx.synthesizer.answer(&req.prompt, window).await {
        Ok(answer) => (
            StatusCode::OK,
            Json(BotResponse {
                resposta: answer.text,
            }),
        ),
        Err(err) => {
            error!(stage = err.stage(), "request failed: {err}");
            failure()
        }
    }
}
