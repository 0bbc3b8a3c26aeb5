use serde::{Deserialize, Serialize};

use crate::encode::board::CellPiece;

// ---------------------------------------------------------------------------
// Request models
// ---------------------------------------------------------------------------

/// POST /api/data body. `boardState` is an 8x8 array of `null` or
/// `{piece, color}` cells, row 0 = rank 8.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub board_state: Option<Vec<Vec<Option<CellPiece>>>>,
    #[serde(default)]
    pub move_history: Vec<String>,
    #[serde(default)]
    pub is_check: bool,
    pub elo_skill: Option<u32>,
}

/// POST /api/analyze body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub board_state: Option<Vec<Vec<Option<CellPiece>>>>,
    #[serde(default)]
    pub move_history: Vec<String>,
}

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub language: String,
    pub engine: String,
    pub uptime: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub message: String,
    // The wire contract predates this server: the envelope key is snake_case
    // while everything around it is camelCase.
    #[serde(rename = "received_data")]
    pub received_data: ReceivedData,
    pub gemini_move: String,
}

/// Echo of the relevant inputs, including the FEN derived from them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedData {
    pub move_history: Vec<String>,
    pub is_check: bool,
    pub fen: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub evaluation: String,
    pub fen: String,
}
