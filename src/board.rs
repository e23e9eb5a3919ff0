use serde::{Deserialize, Serialize};
use std::fmt;

use crate::piece::PieceId;

/// Board size constant
pub const BOARD_SIZE: usize = 11;

const LAST: i32 = BOARD_SIZE as i32 - 1;

/// The four orthogonal directions as (col, row) steps
pub const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

pub const CORNERS: [Position; 4] = [
    Position::new(0, 0),
    Position::new(0, LAST),
    Position::new(LAST, 0),
    Position::new(LAST, LAST),
];

/// A cell coordinate, `(col, row)`. May lie off the board; callers check
/// with [`Position::is_on_board`] before indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    pub const fn new(col: i32, row: i32) -> Self {
        Position { col, row }
    }

    /// Manhattan distance
    pub fn distance(&self, other: Position) -> u32 {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }

    pub fn offset(&self, dc: i32, dr: i32) -> Position {
        Position::new(self.col + dc, self.row + dr)
    }

    pub fn is_on_board(&self) -> bool {
        (0..=LAST).contains(&self.col) && (0..=LAST).contains(&self.row)
    }

    pub fn is_corner(&self) -> bool {
        CORNERS.contains(self)
    }

    /// True for cells on the outermost ring, corners included
    pub fn is_on_edge(&self) -> bool {
        self.is_on_board()
            && (self.col == 0 || self.col == LAST || self.row == 0 || self.row == LAST)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Piece placement. Cells hold handles into the engine's piece arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<PieceId>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Occupant of `pos`; off-board positions read as empty
    pub fn get(&self, pos: Position) -> Option<PieceId> {
        if pos.is_on_board() {
            self.cells[pos.row as usize][pos.col as usize]
        } else {
            None
        }
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Put `piece` on `pos`. Off-board positions are ignored.
    pub fn place(&mut self, pos: Position, piece: PieceId) {
        if pos.is_on_board() {
            self.cells[pos.row as usize][pos.col as usize] = Some(piece);
        }
    }

    /// Clear `pos`, returning whatever stood there
    pub fn take(&mut self, pos: Position) -> Option<PieceId> {
        if pos.is_on_board() {
            self.cells[pos.row as usize][pos.col as usize].take()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.cells = [[None; BOARD_SIZE]; BOARD_SIZE];
    }

    /// Cells strictly after `from` up to and including `to`. Empty unless the
    /// two positions share a row or a column.
    pub fn path(from: Position, to: Position) -> Vec<Position> {
        if from == to || (from.col != to.col && from.row != to.row) {
            return Vec::new();
        }
        let dc = (to.col - from.col).signum();
        let dr = (to.row - from.row).signum();
        let mut cells = Vec::with_capacity(from.distance(to) as usize);
        let mut cur = from;
        while cur != to {
            cur = cur.offset(dc, dr);
            cells.push(cur);
        }
        cells
    }

    /// Iterate over every occupied cell
    pub fn occupied(&self) -> impl Iterator<Item = (Position, PieceId)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| {
                cell.map(|piece| (Position::new(col as i32, row as i32), piece))
            })
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_manhattan() {
        let a = Position::new(2, 7);
        let b = Position::new(5, 3);
        assert_eq!(a.distance(b), 7);
        assert_eq!(b.distance(a), 7);
        assert_eq!(a.distance(a), 0);
    }

    #[test]
    fn test_corner_and_edge_identification() {
        for corner in CORNERS {
            assert!(corner.is_corner());
            assert!(corner.is_on_edge());
        }
        assert!(Position::new(0, 5).is_on_edge());
        assert!(Position::new(5, 10).is_on_edge());
        assert!(!Position::new(0, 5).is_corner());
        assert!(!Position::new(1, 1).is_on_edge());
        assert!(!Position::new(-1, 0).is_on_edge());
    }

    #[test]
    fn test_on_board_bounds() {
        assert!(Position::new(0, 0).is_on_board());
        assert!(Position::new(10, 10).is_on_board());
        assert!(!Position::new(11, 0).is_on_board());
        assert!(!Position::new(0, -1).is_on_board());
    }

    #[test]
    fn test_display_uses_col_row_order() {
        assert_eq!(Position::new(3, 8).to_string(), "(3, 8)");
        let mv = Move::new(Position::new(1, 2), Position::new(1, 5));
        assert_eq!(mv.to_string(), "(1, 2) -> (1, 5)");
    }

    #[test]
    fn test_path_excludes_origin_and_includes_target() {
        let path = Board::path(Position::new(5, 5), Position::new(5, 2));
        assert_eq!(
            path,
            vec![Position::new(5, 4), Position::new(5, 3), Position::new(5, 2)]
        );

        let path = Board::path(Position::new(1, 4), Position::new(3, 4));
        assert_eq!(path, vec![Position::new(2, 4), Position::new(3, 4)]);
    }

    #[test]
    fn test_path_empty_for_diagonal_or_null_move() {
        assert!(Board::path(Position::new(5, 5), Position::new(6, 6)).is_empty());
        assert!(Board::path(Position::new(5, 5), Position::new(5, 5)).is_empty());
    }

    #[test]
    fn test_place_take_roundtrip() {
        let mut board = Board::new();
        let pos = Position::new(4, 9);
        board.place(pos, PieceId(3));
        assert_eq!(board.get(pos), Some(PieceId(3)));
        assert_eq!(board.occupied().count(), 1);
        assert_eq!(board.take(pos), Some(PieceId(3)));
        assert!(board.is_empty(pos));
        assert_eq!(board.take(Position::new(20, 20)), None);
    }

    #[test]
    fn test_place_off_board_is_ignored() {
        let mut board = Board::new();
        board.place(Position::new(-1, 4), PieceId(0));
        board.place(Position::new(3, 11), PieceId(1));
        assert_eq!(board.occupied().count(), 0);
    }
}
