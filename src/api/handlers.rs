use axum::Json;
use axum::extract::State;

use crate::encode::{Board, diagram, fen};
use crate::llm::MoveClient;
use crate::prompt::{self, GameContext};
use crate::sanitize::normalize;

use super::errors::ApiError;
use super::models::*;
use super::state::SharedState;

// =========================================================================
// Health
// =========================================================================

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        language: "rust".to_string(),
        engine: state
            .client
            .as_ref()
            .map(|c| c.provider_name().to_string())
            .unwrap_or_else(|| "none".to_string()),
        uptime,
    })
}

// =========================================================================
// Move suggestion
// =========================================================================

/// POST /api/data
///
/// Encodes the client's board as FEN plus a diagram oriented for the side
/// to move, asks the model for one SAN move, and returns the normalized
/// token together with an echo of the inputs.
pub async fn suggest_move(
    State(state): State<SharedState>,
    Json(input): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let cells = input
        .board_state
        .ok_or_else(|| ApiError::MissingInput("boardState".to_string()))?;
    let board = Board::from_cells(&cells)?;

    let history = input.move_history;
    let side = fen::side_to_move(&history);
    let position_fen = fen::full_fen(&board, &history);
    let rendered = diagram(&board, side);
    let skill = input.elo_skill.unwrap_or(state.config.default_skill);

    tracing::info!(
        moves = history.len(),
        check = input.is_check,
        skill,
        side = side.as_str(),
        fen = %position_fen,
        "move requested"
    );

    let ctx = GameContext {
        history: &history,
        in_check: input.is_check,
        skill,
        side_to_move: side,
    };

    let raw = require_client(&state)?
        .request_completion(
            &prompt::system_prompt(skill),
            &prompt::move_prompt(&ctx, &position_fen, &rendered),
        )
        .await?;

    let token = normalize(&raw);
    tracing::info!(raw = %raw.trim(), token = %token, "model answered");

    Ok(Json(MoveResponse {
        message: "Data received and move generated successfully!".to_string(),
        received_data: ReceivedData {
            move_history: history,
            is_check: input.is_check,
            fen: position_fen,
        },
        gemini_move: token,
    }))
}

// =========================================================================
// Position analysis
// =========================================================================

/// POST /api/analyze
pub async fn analyze_position(
    State(state): State<SharedState>,
    Json(input): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let cells = input
        .board_state
        .ok_or_else(|| ApiError::MissingInput("boardState".to_string()))?;
    let board = Board::from_cells(&cells)?;
    let position_fen = fen::full_fen(&board, &input.move_history);

    tracing::info!(fen = %position_fen, "analysis requested");

    let evaluation = require_client(&state)?
        .request_completion(
            "You are a strong chess analyst. Answer in plain prose.",
            &prompt::analysis_prompt(&position_fen, &input.move_history),
        )
        .await?;

    Ok(Json(AnalyzeResponse {
        evaluation: evaluation.trim().to_string(),
        fen: position_fen,
    }))
}

fn require_client(state: &SharedState) -> Result<&MoveClient, ApiError> {
    state
        .client
        .as_deref()
        .ok_or_else(|| ApiError::LlmUnavailable("set GEMINI_API_KEY or OPENAI_API_KEY".to_string()))
}
