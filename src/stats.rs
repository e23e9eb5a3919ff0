//! End-of-game statistics.

use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;

use crate::board::Position;
use crate::history::VisitTracker;
use crate::piece::{Piece, PlayerId};

const DIVIDER_WIDTH: usize = 75;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceMoves {
    pub name: String,
    pub moves: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceTally {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellTally {
    pub position: Position,
    pub pieces: usize,
}

/// The four statistics blocks printed when a game ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameReport {
    pub winner: PlayerId,
    pub move_histories: Vec<PieceMoves>,
    pub captures: Vec<PieceTally>,
    pub distances: Vec<PieceTally>,
    pub crowded_cells: Vec<CellTally>,
}

impl GameReport {
    pub fn build(pieces: &[Piece], visits: &VisitTracker, winner: PlayerId) -> Self {
        GameReport {
            winner,
            move_histories: move_histories(pieces, winner),
            captures: ranked(pieces, winner, Piece::captures, |p| p.captures() > 0),
            distances: ranked(pieces, winner, Piece::distance, Piece::has_moved),
            crowded_cells: crowded_cells(visits),
        }
    }
}

/// Winner's pieces first, then the loser's; each side by move count, then id
fn move_histories(pieces: &[Piece], winner: PlayerId) -> Vec<PieceMoves> {
    let side = |owner: PlayerId| {
        let mut moved: Vec<&Piece> = pieces
            .iter()
            .filter(|p| p.owner() == owner && p.has_moved())
            .collect();
        moved.sort_by_key(|p| (p.moves().len(), p.id()));
        moved
    };

    side(winner)
        .into_iter()
        .chain(side(winner.opponent()))
        .map(|p| PieceMoves {
            name: p.name(),
            moves: p.moves().to_vec(),
        })
        .collect()
}

/// Descending by `metric`, then ascending id, then winner before loser
fn ranked(
    pieces: &[Piece],
    winner: PlayerId,
    metric: impl Fn(&Piece) -> u32,
    include: impl Fn(&Piece) -> bool,
) -> Vec<PieceTally> {
    let mut selected: Vec<&Piece> = pieces.iter().filter(|p| include(*p)).collect();
    selected.sort_by_key(|p| (Reverse(metric(*p)), p.id(), p.owner() != winner));
    selected
        .into_iter()
        .map(|p| PieceTally {
            name: p.name(),
            count: metric(p),
        })
        .collect()
}

/// Cells that held more than one distinct piece; busiest first, then by
/// column and row
fn crowded_cells(visits: &VisitTracker) -> Vec<CellTally> {
    let mut cells: Vec<CellTally> = visits
        .cells()
        .filter(|&(_, pieces)| pieces > 1)
        .map(|(position, pieces)| CellTally { position, pieces })
        .collect();
    cells.sort_by_key(|c| (Reverse(c.pieces), c.position.col, c.position.row));
    cells
}

fn write_divider(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "*".repeat(DIVIDER_WIDTH))
}

impl fmt::Display for GameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.move_histories {
            let moves: Vec<String> = entry.moves.iter().map(Position::to_string).collect();
            writeln!(f, "{}: [{}]", entry.name, moves.join(", "))?;
        }
        write_divider(f)?;

        for entry in &self.captures {
            writeln!(f, "{}: {} kills", entry.name, entry.count)?;
        }
        write_divider(f)?;

        for entry in &self.distances {
            writeln!(f, "{}: {} squares", entry.name, entry.count)?;
        }
        write_divider(f)?;

        for cell in &self.crowded_cells {
            writeln!(f, "{}: {} pieces", cell.position, cell.pieces)?;
        }
        write_divider(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceId;

    fn moved(mut piece: Piece, path: &[(i32, i32)]) -> Piece {
        for &(col, row) in path {
            piece.push_move(Position::new(col, row));
        }
        piece
    }

    #[test]
    fn test_move_histories_group_winner_first() {
        let pieces = vec![
            moved(
                Piece::pawn(PlayerId::Second, 2, Position::new(4, 0)),
                &[(4, 1)],
            ),
            moved(
                Piece::pawn(PlayerId::First, 9, Position::new(7, 5)),
                &[(7, 7), (8, 7)],
            ),
            moved(
                Piece::pawn(PlayerId::First, 1, Position::new(5, 3)),
                &[(5, 2), (6, 2)],
            ),
            Piece::pawn(PlayerId::First, 2, Position::new(4, 4)),
            moved(
                Piece::king(PlayerId::First, 7, Position::new(5, 5)),
                &[(5, 4)],
            ),
        ];

        let report = GameReport::build(&pieces, &VisitTracker::new(), PlayerId::First);
        let names: Vec<&str> = report
            .move_histories
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["K7", "D1", "D9", "A2"]);
    }

    #[test]
    fn test_distance_ties_prefer_lower_id_then_winner() {
        let pieces = vec![
            moved(
                Piece::pawn(PlayerId::First, 3, Position::new(5, 4)),
                &[(8, 4)],
            ),
            moved(
                Piece::pawn(PlayerId::Second, 3, Position::new(5, 0)),
                &[(8, 0)],
            ),
            moved(
                Piece::pawn(PlayerId::Second, 1, Position::new(3, 0)),
                &[(3, 3)],
            ),
            moved(
                Piece::pawn(PlayerId::Second, 9, Position::new(0, 4)),
                &[(0, 9)],
            ),
        ];

        let report = GameReport::build(&pieces, &VisitTracker::new(), PlayerId::Second);
        let lines: Vec<(String, u32)> = report
            .distances
            .into_iter()
            .map(|t| (t.name, t.count))
            .collect();
        assert_eq!(
            lines,
            vec![
                ("A9".to_string(), 5),
                ("A1".to_string(), 3),
                ("A3".to_string(), 3),
                ("D3".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_captures_skip_pieces_without_kills() {
        let mut hunter = Piece::pawn(PlayerId::First, 4, Position::new(6, 4));
        hunter.add_captures(2);
        let mut other = Piece::pawn(PlayerId::Second, 4, Position::new(6, 0));
        other.add_captures(2);
        let mut single = Piece::pawn(PlayerId::Second, 1, Position::new(3, 0));
        single.add_captures(1);
        let idle = Piece::pawn(PlayerId::Second, 2, Position::new(4, 0));

        let pieces = vec![single, idle, other, hunter];
        let report = GameReport::build(&pieces, &VisitTracker::new(), PlayerId::First);
        let names: Vec<&str> = report.captures.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["D4", "A4", "A1"]);
    }

    #[test]
    fn test_crowded_cells_sorted_by_count_then_coordinates() {
        let mut visits = VisitTracker::new();
        for piece in 0..3 {
            visits.record(Position::new(6, 2), PieceId(piece));
        }
        visits.record(Position::new(2, 8), PieceId(0));
        visits.record(Position::new(2, 8), PieceId(1));
        visits.record(Position::new(2, 3), PieceId(4));
        visits.record(Position::new(2, 3), PieceId(5));
        visits.record(Position::new(1, 1), PieceId(0));
        visits.record(Position::new(1, 1), PieceId(0));

        let report = GameReport::build(&[], &visits, PlayerId::First);
        assert_eq!(
            report.crowded_cells,
            vec![
                CellTally {
                    position: Position::new(6, 2),
                    pieces: 3
                },
                CellTally {
                    position: Position::new(2, 3),
                    pieces: 2
                },
                CellTally {
                    position: Position::new(2, 8),
                    pieces: 2
                },
            ]
        );
    }

    #[test]
    fn test_display_has_four_blocks() {
        let mut hunter = moved(
            Piece::pawn(PlayerId::First, 1, Position::new(5, 3)),
            &[(5, 2)],
        );
        hunter.add_captures(1);
        let mut visits = VisitTracker::new();
        visits.record(Position::new(5, 2), PieceId(0));
        visits.record(Position::new(5, 2), PieceId(1));

        let report = GameReport::build(&[hunter], &visits, PlayerId::First);
        let text = report.to_string();
        let divider = "*".repeat(75);

        let expected = format!(
            "D1: [(5, 3), (5, 2)]\n{d}\nD1: 1 kills\n{d}\nD1: 1 squares\n{d}\n(5, 2): 2 pieces\n{d}\n",
            d = divider
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let pieces = vec![moved(
            Piece::king(PlayerId::First, 7, Position::new(5, 5)),
            &[(5, 4)],
        )];
        let report = GameReport::build(&pieces, &VisitTracker::new(), PlayerId::First);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["winner"], "First");
        assert_eq!(json["move_histories"][0]["name"], "K7");
        assert_eq!(json["distances"][0]["count"], 1);
        assert_eq!(json["move_histories"][0]["moves"][1]["row"], 4);
    }
}
