//! Move legality, custodian captures and win conditions.
//!
//! Everything here is a pure function of the board and the piece arena; the
//! engine in [`crate::game`] applies the results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, DIRECTIONS, Move, Position};
use crate::game::GameError;
use crate::piece::{Piece, PieceId, PlayerId};

/// Why a move was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("no piece to move")]
    NoPiece,
    #[error("piece belongs to the other player")]
    WrongPlayer,
    #[error("piece must leave its square")]
    SameSquare,
    #[error("pieces move along a row or a column")]
    NotStraight,
    #[error("only the king may enter a corner")]
    CornerReserved,
    #[error("path is blocked")]
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveValidity {
    Valid,
    Invalid(IllegalMove),
}

impl MoveValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, MoveValidity::Valid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// King reached a corner
    KingEscaped,
    /// Every attacker was captured
    AttackersCaptured,
    /// King blocked on all open sides
    KingSurrounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: PlayerId,
    pub reason: WinReason,
}

pub(crate) fn ensure_on_board(pos: Position) -> Result<(), GameError> {
    if pos.is_on_board() {
        Ok(())
    } else {
        Err(GameError::OutOfBoard(pos))
    }
}

fn piece_on<'a>(board: &Board, pieces: &'a [Piece], pos: Position) -> Option<&'a Piece> {
    board.get(pos).map(|PieceId(idx)| &pieces[idx])
}

/// Decide whether `player` may move the piece on `from` to `to`.
///
/// Rules are checked in a fixed order and the first failure is reported.
/// Off-board coordinates are an error rather than an illegal move.
pub fn check_move(
    board: &Board,
    pieces: &[Piece],
    from: Position,
    to: Position,
    player: PlayerId,
) -> Result<MoveValidity, GameError> {
    ensure_on_board(from)?;
    ensure_on_board(to)?;

    let Some(piece) = piece_on(board, pieces, from) else {
        return Ok(MoveValidity::Invalid(IllegalMove::NoPiece));
    };
    if piece.owner() != player {
        return Ok(MoveValidity::Invalid(IllegalMove::WrongPlayer));
    }
    if from == to {
        return Ok(MoveValidity::Invalid(IllegalMove::SameSquare));
    }
    if from.col != to.col && from.row != to.row {
        return Ok(MoveValidity::Invalid(IllegalMove::NotStraight));
    }
    if to.is_corner() && !piece.is_king() {
        return Ok(MoveValidity::Invalid(IllegalMove::CornerReserved));
    }
    if Board::path(from, to).into_iter().any(|cell| !board.is_empty(cell)) {
        return Ok(MoveValidity::Invalid(IllegalMove::Blocked));
    }

    Ok(MoveValidity::Valid)
}

/// Every legal move for `player`
pub fn legal_moves(board: &Board, pieces: &[Piece], player: PlayerId) -> Vec<Move> {
    let mut moves = Vec::new();

    for (from, id) in board.occupied() {
        let piece = &pieces[id.0];
        if piece.owner() != player {
            continue;
        }

        for &(dc, dr) in &DIRECTIONS {
            let mut to = from.offset(dc, dr);
            while to.is_on_board() && board.is_empty(to) {
                if !to.is_corner() || piece.is_king() {
                    moves.push(Move::new(from, to));
                }
                to = to.offset(dc, dr);
            }
        }
    }

    moves
}

/// Whether the far side of a flanked pawn counts as an ally of `owner`:
/// off the board, anywhere on the border ring, or holding one of `owner`'s
/// pieces.
fn is_capturing_ally(board: &Board, pieces: &[Piece], pos: Position, owner: PlayerId) -> bool {
    if !pos.is_on_board() || pos.is_on_edge() {
        return true;
    }
    piece_on(board, pieces, pos).is_some_and(|piece| piece.owner() == owner)
}

/// Pawns captured by the piece that just landed on `at`, at most one per
/// direction. Only pawns capture, and only pawns can be captured.
pub fn find_captures(board: &Board, pieces: &[Piece], at: Position) -> Vec<PieceId> {
    let Some(mover) = piece_on(board, pieces, at) else {
        return Vec::new();
    };
    if !mover.is_pawn() {
        return Vec::new();
    }

    let mut captured = Vec::new();
    for &(dc, dr) in &DIRECTIONS {
        let target = at.offset(dc, dr);
        let Some(target_id) = board.get(target) else {
            continue;
        };
        let victim = &pieces[target_id.0];
        if !victim.is_pawn() || victim.owner() == mover.owner() {
            continue;
        }

        let beyond = target.offset(dc, dr);
        if is_capturing_ally(board, pieces, beyond, mover.owner()) {
            captured.push(target_id);
        }
    }

    captured
}

/// Every on-board neighbour of the king holds an attacking pawn
fn is_king_surrounded(board: &Board, pieces: &[Piece], king_position: Position) -> bool {
    DIRECTIONS
        .iter()
        .map(|&(dc, dr)| king_position.offset(dc, dr))
        .filter(Position::is_on_board)
        .all(|pos| {
            piece_on(board, pieces, pos)
                .is_some_and(|piece| piece.is_pawn() && piece.owner() == PlayerId::Second)
        })
}

/// Terminal check, run after captures. The first matching rule decides.
pub fn check_winner(
    board: &Board,
    pieces: &[Piece],
    king_position: Position,
    remaining_attackers: u32,
) -> Option<Outcome> {
    if king_position.is_corner() {
        return Some(Outcome {
            winner: PlayerId::First,
            reason: WinReason::KingEscaped,
        });
    }

    if remaining_attackers == 0 {
        return Some(Outcome {
            winner: PlayerId::First,
            reason: WinReason::AttackersCaptured,
        });
    }

    if is_king_surrounded(board, pieces, king_position) {
        return Some(Outcome {
            winner: PlayerId::Second,
            reason: WinReason::KingSurrounded,
        });
    }

    None
}
