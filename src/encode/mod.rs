pub mod board;
pub mod diagram;
pub mod fen;

pub use board::{Board, EncodeError, Piece, PieceKind, Side};
pub use diagram::diagram;
pub use fen::{full_fen, placement};
