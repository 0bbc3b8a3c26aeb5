use super::board::{Board, Side};

const FILE_AXIS: &str = "  a b c d e f g h";

/// Render the board as a labeled text grid from `perspective`'s point of
/// view.
///
/// White perspective keeps the stored order (rank 8 at the top); Black
/// perspective reverses both the rows and the rank labels so rank 1 ends up
/// at the bottom of the printed diagram. Presentation only; the board itself
/// is untouched.
pub fn diagram(board: &Board, perspective: Side) -> String {
    let mut ranks: Vec<u8> = (1..=8).rev().collect();
    let mut rows: Vec<_> = board.rows().collect();

    if perspective == Side::Black {
        rows.reverse();
        ranks.reverse();
    }

    let mut lines = vec![FILE_AXIS.to_string()];
    for (row, rank) in rows.iter().zip(ranks) {
        let mut line = format!("{rank} ");
        for sq in row.iter() {
            match sq {
                Some(piece) => {
                    line.push(piece.to_char());
                    line.push(' ');
                }
                None => line.push_str(". "),
            }
        }
        lines.push(line);
    }
    lines.push(FILE_AXIS.to_string());
    lines.push("\nWhite pieces: UPPERCASE (R N B Q K P)".to_string());
    lines.push("Black pieces: lowercase (r n b q k p)".to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank_labels(rendered: &str) -> Vec<char> {
        rendered
            .lines()
            .filter_map(|l| l.chars().next().filter(|c| c.is_ascii_digit()))
            .collect()
    }

    #[test]
    fn white_perspective_ranks_descend() {
        let d = diagram(&Board::starting(), Side::White);
        assert_eq!(rank_labels(&d), "87654321".chars().collect::<Vec<_>>());
    }

    #[test]
    fn black_perspective_reverses_rank_labels() {
        let board = Board::starting();
        let white = rank_labels(&diagram(&board, Side::White));
        let mut black = rank_labels(&diagram(&board, Side::Black));
        black.reverse();
        assert_eq!(white, black);
    }

    #[test]
    fn has_file_axis_top_and_bottom() {
        let d = diagram(&Board::starting(), Side::White);
        let axes: Vec<&str> = d.lines().filter(|l| l.trim() == "a b c d e f g h").collect();
        assert_eq!(axes.len(), 2);
    }

    #[test]
    fn starting_position_rows() {
        let d = diagram(&Board::starting(), Side::White);
        let lines: Vec<&str> = d.lines().collect();
        assert_eq!(lines[1], "8 r n b q k b n r ");
        assert_eq!(lines[8], "1 R N B Q K B N R ");
        assert_eq!(lines[4], "5 . . . . . . . . ");
    }

    #[test]
    fn black_perspective_puts_white_back_rank_on_top() {
        let d = diagram(&Board::starting(), Side::Black);
        let lines: Vec<&str> = d.lines().collect();
        assert_eq!(lines[1], "1 R N B Q K B N R ");
        assert_eq!(lines[8], "8 r n b q k b n r ");
    }

    #[test]
    fn includes_case_legend() {
        let d = diagram(&Board::starting(), Side::White);
        assert!(d.contains("White pieces: UPPERCASE"));
        assert!(d.contains("Black pieces: lowercase"));
    }

    #[test]
    fn perspective_does_not_change_the_board() {
        let board = Board::starting();
        let before = board.clone();
        let _ = diagram(&board, Side::Black);
        assert_eq!(board, before);
    }
}
