use serde::Deserialize;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// Side (color) of a piece or player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

/// Kind of chess piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// FEN letter for this piece kind: uppercase for White, lowercase for
    /// Black.
    pub fn to_char(self, side: Side) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }
}

/// A piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    pub fn to_char(self) -> char {
        self.kind.to_char(self.side)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while building a [`Board`] from client input.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("board must be 8 rows of 8 columns, got {0}")]
    BadShape(String),

    #[error("unrecognized piece kind: {0:?}")]
    UnknownPiece(String),

    #[error("unrecognized piece color: {0:?}")]
    UnknownColor(String),
}

// ---------------------------------------------------------------------------
// Wire cell
// ---------------------------------------------------------------------------

/// A single occupied square as sent by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct CellPiece {
    pub piece: String,
    pub color: String,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// An 8x8 board snapshot. Row 0 is rank 8, row 7 is rank 1; this matches
/// both the inbound JSON and FEN's top-to-bottom rank order, and is never
/// reinterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Build a board from the client-supplied 8x8 cell array.
    ///
    /// An unknown piece name or color is a hard error; a piece is never
    /// silently dropped from the position.
    pub fn from_cells(cells: &[Vec<Option<CellPiece>>]) -> Result<Board, EncodeError> {
        if cells.len() != 8 {
            return Err(EncodeError::BadShape(format!("{} rows", cells.len())));
        }

        let mut squares = [[None; 8]; 8];
        for (r, row) in cells.iter().enumerate() {
            if row.len() != 8 {
                return Err(EncodeError::BadShape(format!(
                    "row {} has {} columns",
                    r,
                    row.len()
                )));
            }
            for (f, cell) in row.iter().enumerate() {
                if let Some(cp) = cell {
                    squares[r][f] = Some(Piece {
                        kind: parse_piece_kind(&cp.piece)?,
                        side: parse_side(&cp.color)?,
                    });
                }
            }
        }
        Ok(Board { squares })
    }

    /// Piece at (row, file); row 0 = rank 8.
    pub fn at(&self, row: usize, file: usize) -> Option<Piece> {
        self.squares[row][file]
    }

    /// Iterate rows in stored order (rank 8 down to rank 1).
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Piece>; 8]> {
        self.squares.iter()
    }

    /// The standard starting position.
    pub fn starting() -> Board {
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut squares = [[None; 8]; 8];
        for (f, &kind) in back.iter().enumerate() {
            squares[0][f] = Some(Piece { kind, side: Side::Black });
            squares[1][f] = Some(Piece { kind: PieceKind::Pawn, side: Side::Black });
            squares[6][f] = Some(Piece { kind: PieceKind::Pawn, side: Side::White });
            squares[7][f] = Some(Piece { kind, side: Side::White });
        }
        Board { squares }
    }

    #[cfg(test)]
    pub(crate) fn empty() -> Board {
        Board { squares: [[None; 8]; 8] }
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, row: usize, file: usize, piece: Option<Piece>) {
        self.squares[row][file] = piece;
    }
}

fn parse_piece_kind(s: &str) -> Result<PieceKind, EncodeError> {
    match s {
        "Pawn" | "pawn" => Ok(PieceKind::Pawn),
        "Rook" | "rook" => Ok(PieceKind::Rook),
        "Knight" | "knight" => Ok(PieceKind::Knight),
        "Bishop" | "bishop" => Ok(PieceKind::Bishop),
        "Queen" | "queen" => Ok(PieceKind::Queen),
        "King" | "king" => Ok(PieceKind::King),
        other => Err(EncodeError::UnknownPiece(other.to_string())),
    }
}

fn parse_side(s: &str) -> Result<Side, EncodeError> {
    match s {
        "W" | "w" | "white" | "White" => Ok(Side::White),
        "B" | "b" | "black" | "Black" => Ok(Side::Black),
        other => Err(EncodeError::UnknownColor(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
