//! Prompt assembly for the completion provider.
//!
//! Everything here is deterministic string formatting; the wording matters
//! for move quality, but the informational content (FEN, diagram,
//! transcript, check status, side and move number, bare-SAN instruction) is
//! fixed.

use crate::encode::Side;

/// Per-request game context feeding the move prompt.
#[derive(Debug, Clone)]
pub struct GameContext<'a> {
    pub history: &'a [String],
    pub in_check: bool,
    pub skill: u32,
    pub side_to_move: Side,
}

/// System prompt: role statement naming the target strength.
pub fn system_prompt(skill: u32) -> String {
    format!(
        "You are a {skill} Elo rated chess player. You always answer with a \
         single chess move in standard algebraic notation and nothing else."
    )
}

/// The move-request prompt sent as the user message.
pub fn move_prompt(ctx: &GameContext<'_>, fen: &str, diagram: &str) -> String {
    let move_number = ctx.history.len() + 1;
    let side = ctx.side_to_move.as_str();

    let check_clause = if ctx.in_check {
        format!("URGENT: {side} is IN CHECK and must address the check this move.")
    } else {
        format!("{side} is not in check.")
    };

    format!(
        "Current position (FEN): {fen}\n\n\
         Board from {side}'s perspective:\n{diagram}\n\n\
         Moves played so far:\n{transcript}\n\
         {check_clause}\n\
         It is {side}'s turn, move {move_number}.\n\n\
         Respond with only the single best move for {side} as a {skill} Elo \
         player, in standard algebraic notation (e.g. e4, Nf3, O-O). Do not \
         add any other text, explanations, or analysis.",
        transcript = transcript(ctx.history),
        skill = ctx.skill,
    )
}

/// Position-evaluation prompt for the analysis endpoint.
pub fn analysis_prompt(fen: &str, history: &[String]) -> String {
    format!(
        "Evaluate the following chess position.\n\n\
         FEN: {fen}\n\n\
         Moves played so far:\n{transcript}\n\
         Give a short assessment of the position: material balance, which \
         side stands better and why, and the most promising plan for the \
         side to move. Two or three sentences, no move list.",
        transcript = transcript(history),
    )
}

/// Move history grouped into numbered full-move lines: `N. <white> <black>`,
/// with `...` standing in for a Black ply not yet recorded.
fn transcript(history: &[String]) -> String {
    if history.is_empty() {
        return "(no moves yet)\n".to_string();
    }

    let mut out = String::new();
    for (n, pair) in history.chunks(2).enumerate() {
        let white = &pair[0];
        let black = pair.get(1).map_or("...", String::as_str);
        out.push_str(&format!("{}. {} {}\n", n + 1, white, black));
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
