use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    /// King and defenders
    First,
    /// Attackers
    Second,
}

impl PlayerId {
    pub fn opponent(&self) -> PlayerId {
        match self {
            PlayerId::First => PlayerId::Second,
            PlayerId::Second => PlayerId::First,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::First => write!(f, "defenders"),
            PlayerId::Second => write!(f, "attackers"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    wins: u32,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Player { id, wins: 0 }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn is_first(&self) -> bool {
        self.id == PlayerId::First
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub(crate) fn add_win(&mut self) {
        self.wins += 1;
    }

    pub(crate) fn remove_win(&mut self) {
        self.wins = self.wins.saturating_sub(1);
    }
}

/// Handle into the engine's piece arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    Pawn { captures: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    id: u8,
    owner: PlayerId,
    kind: PieceKind,
    moves: Vec<Position>,
    distance: u32,
}

impl Piece {
    pub fn king(owner: PlayerId, id: u8, at: Position) -> Self {
        Self::with_kind(PieceKind::King, owner, id, at)
    }

    pub fn pawn(owner: PlayerId, id: u8, at: Position) -> Self {
        Self::with_kind(PieceKind::Pawn { captures: 0 }, owner, id, at)
    }

    fn with_kind(kind: PieceKind, owner: PlayerId, id: u8, at: Position) -> Self {
        Piece {
            id,
            owner,
            kind,
            moves: vec![at],
            distance: 0,
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    pub fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn { .. })
    }

    /// Every square this piece has stood on, starting with its initial one
    pub fn moves(&self) -> &[Position] {
        &self.moves
    }

    pub fn has_moved(&self) -> bool {
        self.moves.len() > 1
    }

    /// Where the piece currently stands (or stood when it was captured)
    pub fn position(&self) -> Position {
        // moves is never empty
        self.moves[self.moves.len() - 1]
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Always 0 for the king
    pub fn captures(&self) -> u32 {
        match self.kind {
            PieceKind::King => 0,
            PieceKind::Pawn { captures } => captures,
        }
    }

    /// `K7`, `D3`, `A12`
    pub fn name(&self) -> String {
        let prefix = match (self.kind, self.owner) {
            (PieceKind::King, _) => 'K',
            (PieceKind::Pawn { .. }, PlayerId::First) => 'D',
            (PieceKind::Pawn { .. }, PlayerId::Second) => 'A',
        };
        format!("{}{}", prefix, self.id)
    }

    pub(crate) fn push_move(&mut self, to: Position) {
        self.distance += self.position().distance(to);
        self.moves.push(to);
    }

    /// Drop the latest move and give back its distance. The initial placement
    /// is never removed.
    pub(crate) fn pop_move(&mut self) -> Option<Position> {
        if self.moves.len() < 2 {
            return None;
        }
        let last = self.moves.pop()?;
        self.distance -= self.position().distance(last);
        Some(last)
    }

    pub(crate) fn add_captures(&mut self, n: u32) {
        if let PieceKind::Pawn { captures } = &mut self.kind {
            *captures += n;
        }
    }

    pub(crate) fn remove_captures(&mut self, n: u32) {
        if let PieceKind::Pawn { captures } = &mut self.kind {
            *captures = captures.saturating_sub(n);
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
