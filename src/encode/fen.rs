//! FEN encoding of a board snapshot.
//!
//! The piece-placement field is exact. The metadata fields (active color,
//! castling rights, en-passant target, clocks) are derived from the SAN move
//! history rather than hardcoded; without a replay engine they are
//! best-effort, erring on the side of standard FEN shape over guesswork.

use super::board::{Board, Piece, PieceKind, Side};

/// Run-length-encoded FEN piece-placement field: eight `/`-separated groups,
/// rank 8 first, uppercase White / lowercase Black.
pub fn placement(board: &Board) -> String {
    let mut groups = Vec::with_capacity(8);
    for row in board.rows() {
        let mut group = String::new();
        let mut empties = 0u8;
        for sq in row.iter() {
            match sq {
                None => empties += 1,
                Some(piece) => {
                    if empties > 0 {
                        group.push((b'0' + empties) as char);
                        empties = 0;
                    }
                    group.push(piece.to_char());
                }
            }
        }
        if empties > 0 {
            group.push((b'0' + empties) as char);
        }
        groups.push(group);
    }
    groups.join("/")
}

/// Full six-field FEN for a position reached via `history` (SAN plies,
/// White first).
pub fn full_fen(board: &Board, history: &[String]) -> String {
    format!(
        "{} {} {} {} {} {}",
        placement(board),
        match side_to_move(history) {
            Side::White => 'w',
            Side::Black => 'b',
        },
        castling_rights(board, history),
        en_passant_target(board, history),
        halfmove_clock(history),
        history.len() / 2 + 1,
    )
}

/// Whose turn it is, from history parity (plies alternate starting with
/// White).
pub fn side_to_move(history: &[String]) -> Side {
    if history.len() % 2 == 0 {
        Side::White
    } else {
        Side::Black
    }
}

/// Castling-rights field derived from occupancy plus history evidence.
///
/// A right is kept only while the king and the relevant rook stand on their
/// home squares and the history records no king move or castle for that
/// side. Rook shuffles that return home are not detectable from SAN alone,
/// so this can over-grant in that corner; it never emits the original's
/// static `KQkq`.
fn castling_rights(board: &Board, history: &[String]) -> String {
    let mut rights = String::new();
    if !king_has_moved(history, Side::White) {
        if is_piece(board, 7, 4, PieceKind::King, Side::White) {
            if is_piece(board, 7, 7, PieceKind::Rook, Side::White) {
                rights.push('K');
            }
            if is_piece(board, 7, 0, PieceKind::Rook, Side::White) {
                rights.push('Q');
            }
        }
    }
    if !king_has_moved(history, Side::Black) {
        if is_piece(board, 0, 4, PieceKind::King, Side::Black) {
            if is_piece(board, 0, 7, PieceKind::Rook, Side::Black) {
                rights.push('k');
            }
            if is_piece(board, 0, 0, PieceKind::Rook, Side::Black) {
                rights.push('q');
            }
        }
    }
    if rights.is_empty() {
        rights.push('-');
    }
    rights
}

fn is_piece(board: &Board, row: usize, file: usize, kind: PieceKind, side: Side) -> bool {
    board.at(row, file) == Some(Piece { kind, side })
}

fn king_has_moved(history: &[String], side: Side) -> bool {
    plies_of(history, side).any(|san| {
        let san = strip_suffixes(san);
        san.starts_with('K') || san.starts_with("O-O")
    })
}

fn plies_of(history: &[String], side: Side) -> impl Iterator<Item = &str> {
    let parity = match side {
        Side::White => 0,
        Side::Black => 1,
    };
    history
        .iter()
        .enumerate()
        .filter(move |(i, _)| i % 2 == parity)
        .map(|(_, san)| san.as_str())
}

/// En-passant target square, emitted only when the most recent ply is
/// consistent with a double pawn push against the current occupancy:
/// a bare pawn move to rank 4 (White) or 5 (Black), the pawn actually on
/// that square, and both the origin and the skipped square empty.
fn en_passant_target(board: &Board, history: &[String]) -> String {
    let Some(last) = history.last() else {
        return "-".to_string();
    };
    let mover = side_to_move(history).opponent();
    let san = strip_suffixes(last);

    let bytes = san.as_bytes();
    if bytes.len() != 2 || !(b'a'..=b'h').contains(&bytes[0]) {
        return "-".to_string();
    }
    let file = (bytes[0] - b'a') as usize;

    let (dest_rank, target) = match (mover, bytes[1]) {
        (Side::White, b'4') => (4usize, format!("{}3", bytes[0] as char)),
        (Side::Black, b'5') => (3usize, format!("{}6", bytes[0] as char)),
        _ => return "-".to_string(),
    };

    // dest_rank is the row index of the destination; the origin and skipped
    // squares sit toward that side's home rank.
    let (skipped, origin) = match mover {
        Side::White => (dest_rank + 1, dest_rank + 2),
        Side::Black => (dest_rank - 1, dest_rank - 2),
    };

    let pushed = is_piece(board, dest_rank, file, PieceKind::Pawn, mover)
        && board.at(skipped, file).is_none()
        && board.at(origin, file).is_none();

    if pushed { target } else { "-".to_string() }
}

/// Halfmove clock: trailing plies that are neither captures nor pawn moves.
fn halfmove_clock(history: &[String]) -> usize {
    history
        .iter()
        .rev()
        .take_while(|san| {
            let san = strip_suffixes(san);
            let pawn_move = san
                .as_bytes()
                .first()
                .is_some_and(|b| (b'a'..=b'h').contains(b));
            !pawn_move && !san.contains('x') && !san.contains('=')
        })
        .count()
}

fn strip_suffixes(san: &str) -> &str {
    san.trim_end_matches(['+', '#', '!', '?'])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const START_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    fn moves(sans: &[&str]) -> Vec<String> {
        sans.iter().map(|s| s.to_string()).collect()
    }

    /// Board after 1. e4 (white pawn e2 -> e4).
    fn board_after_e4() -> Board {
        let mut board = Board::starting();
        let pawn = board.at(6, 4);
        board.set(6, 4, None);
        board.set(4, 4, pawn);
        board
    }

    #[test]
    fn starting_placement() {
        assert_eq!(placement(&Board::starting()), START_PLACEMENT);
    }

    #[test]
    fn placement_after_e4_matches_standard() {
        assert_eq!(
            placement(&board_after_e4()),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR"
        );
    }

    #[test]
    fn placement_has_eight_groups_summing_to_eight() {
        for board in [Board::starting(), board_after_e4(), Board::empty()] {
            let p = placement(&board);
            let groups: Vec<&str> = p.split('/').collect();
            assert_eq!(groups.len(), 8);
            for group in groups {
                let total: u32 = group
                    .chars()
                    .map(|c| c.to_digit(10).unwrap_or(1))
                    .sum();
                assert_eq!(total, 8, "group {group:?} in {p}");
            }
        }
    }

    #[test]
    fn placement_round_trips_occupancy() {
        let board = board_after_e4();
        let p = placement(&board);

        // Re-expand the placement field and compare square by square.
        for (row_idx, group) in p.split('/').enumerate() {
            let mut file = 0usize;
            for c in group.chars() {
                if let Some(n) = c.to_digit(10) {
                    for _ in 0..n {
                        assert!(board.at(row_idx, file).is_none());
                        file += 1;
                    }
                } else {
                    let piece = board.at(row_idx, file).expect("piece expected");
                    assert_eq!(piece.to_char(), c);
                    file += 1;
                }
            }
            assert_eq!(file, 8);
        }
    }

    #[test]
    fn empty_board_placement() {
        assert_eq!(placement(&Board::empty()), "8/8/8/8/8/8/8/8");
    }

    #[test]
    fn side_to_move_follows_parity() {
        assert_eq!(side_to_move(&[]), Side::White);
        assert_eq!(side_to_move(&moves(&["e4"])), Side::Black);
        assert_eq!(side_to_move(&moves(&["e4", "e5"])), Side::White);
    }

    #[test]
    fn full_fen_start() {
        let fen = full_fen(&Board::starting(), &[]);
        assert_eq!(fen, format!("{START_PLACEMENT} w KQkq - 0 1"));
    }

    #[test]
    fn full_fen_after_e4() {
        let fen = full_fen(&board_after_e4(), &moves(&["e4"]));
        assert_eq!(
            fen,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn castling_rights_lost_after_king_move() {
        let history = moves(&["e4", "e5", "Ke2"]);
        let board = Board::starting(); // occupancy irrelevant for the revocation path
        let fen = full_fen(&board, &history);
        let rights = fen.split(' ').nth(2).unwrap();
        assert_eq!(rights, "kq");
    }

    #[test]
    fn castling_rights_lost_after_castle() {
        let history = moves(&["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O"]);
        let fen = full_fen(&Board::starting(), &history);
        let rights = fen.split(' ').nth(2).unwrap();
        assert_eq!(rights, "kq");
    }

    #[test]
    fn castling_rights_require_rook_at_home() {
        let mut board = Board::starting();
        board.set(7, 7, None); // white h-rook gone
        let fen = full_fen(&board, &[]);
        let rights = fen.split(' ').nth(2).unwrap();
        assert_eq!(rights, "Qkq");
    }

    #[test]
    fn castling_dash_when_no_rights() {
        let fen = full_fen(&Board::empty(), &[]);
        let rights = fen.split(' ').nth(2).unwrap();
        assert_eq!(rights, "-");
    }

    #[test]
    fn en_passant_requires_matching_occupancy() {
        // History claims e4 but the board has no pawn there.
        let fen = full_fen(&Board::starting(), &moves(&["e4"]));
        let ep = fen.split(' ').nth(3).unwrap();
        assert_eq!(ep, "-");
    }

    #[test]
    fn en_passant_for_black_double_push() {
        let mut board = board_after_e4();
        let pawn = board.at(1, 2);
        board.set(1, 2, None);
        board.set(3, 2, pawn); // black c7 -> c5
        let fen = full_fen(&board, &moves(&["e4", "c5"]));
        let ep = fen.split(' ').nth(3).unwrap();
        assert_eq!(ep, "c6");
    }

    #[test]
    fn halfmove_clock_counts_quiet_piece_moves() {
        assert_eq!(halfmove_clock(&moves(&["e4", "e5", "Nf3", "Nc6"])), 2);
        assert_eq!(halfmove_clock(&moves(&["Nf3", "Nf6", "Nxe5"])), 0);
        assert_eq!(halfmove_clock(&[]), 0);
    }

    #[test]
    fn fullmove_number_advances_per_move_pair() {
        let fen = full_fen(&Board::starting(), &moves(&["e4", "e5", "Nf3"]));
        let fullmove = fen.split(' ').nth(5).unwrap();
        assert_eq!(fullmove, "2");
    }
}
