//! LLM-backed chess move server.
//!
//! Accepts a board snapshot over HTTP, encodes it as FEN plus a readable
//! diagram, asks a generative-language model for the next move, and returns
//! the cleaned-up SAN token. No legality checking or game state lives here;
//! the chess knowledge is entirely the remote model's problem.

pub mod api;
pub mod config;
pub mod encode;
pub mod llm;
pub mod prompt;
pub mod sanitize;
