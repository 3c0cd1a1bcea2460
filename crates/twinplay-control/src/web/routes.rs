//! Control route definitions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use twinplay_core::{Command, EngineError, PlaybackPosition};

use super::server::AppState;
use crate::protocol::ControlReply;

type Reply = (StatusCode, Json<ControlReply>);

/// Build the control router
pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/play", get(play))
        .route("/pause", get(pause))
        .route("/stop", get(stop))
        .route("/seek/:seconds", get(seek))
        .route("/is_file_loaded", get(is_file_loaded))
        // Route name used by older peers
        .route("/file_loaded", get(is_file_loaded))
        .route("/load_file", post(load_file))
}

/// GET /play
async fn play(State(state): State<AppState>) -> Reply {
    apply(&state, Command::Play)
}

/// GET /pause
async fn pause(State(state): State<AppState>) -> Reply {
    apply(&state, Command::Pause)
}

/// GET /stop
async fn stop(State(state): State<AppState>) -> Reply {
    apply(&state, Command::Stop)
}

/// GET /seek/:seconds - absolute seek
async fn seek(Path(seconds): Path<String>, State(state): State<AppState>) -> Reply {
    match seconds.parse::<i64>() {
        Ok(secs) if secs >= 0 => apply(
            &state,
            Command::Seek(PlaybackPosition::from_secs(secs as u64)),
        ),
        Ok(_) => bad_request("Seek position must not be negative"),
        Err(_) => bad_request("Seek position must be a whole number of seconds"),
    }
}

/// GET /is_file_loaded
async fn is_file_loaded(State(state): State<AppState>) -> Reply {
    apply(&state, Command::QueryReadiness)
}

/// POST /load_file
async fn load_file(State(state): State<AppState>) -> Reply {
    apply(&state, Command::NotifyLoaded)
}

fn apply(state: &AppState, command: Command) -> Reply {
    match state.session.apply(&command) {
        Ok(applied) => (StatusCode::OK, Json(ControlReply::from_applied(applied))),
        Err(EngineError::NotInitialized) => {
            tracing::info!(%command, "Partner command refused: no medium loaded");
            (
                StatusCode::CONFLICT,
                Json(ControlReply::error(EngineError::NotInitialized.to_string())),
            )
        }
        Err(err) => {
            tracing::warn!(%command, "Partner command failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ControlReply::error(err.to_string())),
            )
        }
    }
}

fn bad_request(message: &str) -> Reply {
    tracing::warn!("Invalid control request: {}", message);
    (StatusCode::BAD_REQUEST, Json(ControlReply::error(message)))
}
