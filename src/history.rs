use std::collections::HashMap;

use crate::board::Position;
use crate::piece::PieceId;

/// One applied move and the pawns it captured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub piece: PieceId,
    pub from: Position,
    pub to: Position,
    /// At most one per direction
    pub captured: Vec<PieceId>,
}

impl Turn {
    pub fn new(piece: PieceId, from: Position, to: Position) -> Self {
        Turn {
            piece,
            from,
            to,
            captured: Vec::with_capacity(4),
        }
    }
}

/// LIFO record of applied turns. Popping discards a turn for good.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStack {
    turns: Vec<Turn>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn pop(&mut self) -> Option<Turn> {
        self.turns.pop()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Turn> {
        self.turns.last_mut()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }
}

/// Per-cell count of how many times each piece landed there
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitTracker {
    cells: HashMap<Position, HashMap<PieceId, u32>>,
}

impl VisitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, pos: Position, piece: PieceId) {
        *self.cells.entry(pos).or_default().entry(piece).or_insert(0) += 1;
    }

    /// Undo one [`record`](Self::record). Empty entries are dropped so the
    /// tracker compares equal to its state before the visit.
    pub fn revert(&mut self, pos: Position, piece: PieceId) {
        let Some(visitors) = self.cells.get_mut(&pos) else {
            return;
        };
        if let Some(count) = visitors.get_mut(&piece) {
            *count -= 1;
            if *count == 0 {
                visitors.remove(&piece);
            }
        }
        if visitors.is_empty() {
            self.cells.remove(&pos);
        }
    }

    pub fn visits(&self, pos: Position, piece: PieceId) -> u32 {
        self.cells
            .get(&pos)
            .and_then(|visitors| visitors.get(&piece))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct pieces that ever stood on `pos`
    pub fn distinct_visitors(&self, pos: Position) -> usize {
        self.cells.get(&pos).map_or(0, HashMap::len)
    }

    /// Every tracked cell with its distinct-visitor count, in no particular order
    pub fn cells(&self) -> impl Iterator<Item = (Position, usize)> + '_ {
        self.cells.iter().map(|(pos, visitors)| (*pos, visitors.len()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_lifo() {
        let mut history = HistoryStack::new();
        let a = Turn::new(PieceId(0), Position::new(0, 3), Position::new(1, 3));
        let b = Turn::new(PieceId(5), Position::new(5, 3), Position::new(5, 2));
        history.push(a.clone());
        history.push(b.clone());

        assert_eq!(history.len(), 2);
        assert_eq!(history.pop(), Some(b));
        assert_eq!(history.pop(), Some(a));
        assert_eq!(history.pop(), None);
        assert!(history.is_empty());
    }

    #[test]
    fn test_last_mut_collects_captures() {
        let mut history = HistoryStack::new();
        history.push(Turn::new(PieceId(0), Position::new(5, 3), Position::new(5, 2)));
        history.last_mut().unwrap().captured.push(PieceId(18));

        assert_eq!(history.last().unwrap().captured, vec![PieceId(18)]);
    }

    #[test]
    fn test_tracker_counts_distinct_visitors() {
        let mut tracker = VisitTracker::new();
        let cell = Position::new(4, 5);
        tracker.record(cell, PieceId(1));
        tracker.record(cell, PieceId(1));
        tracker.record(cell, PieceId(2));

        assert_eq!(tracker.visits(cell, PieceId(1)), 2);
        assert_eq!(tracker.distinct_visitors(cell), 2);
        assert_eq!(tracker.distinct_visitors(Position::new(0, 0)), 0);
    }

    #[test]
    fn test_tracker_revert_restores_previous_state() {
        let mut tracker = VisitTracker::new();
        let cell = Position::new(4, 5);
        tracker.record(cell, PieceId(1));
        let before = tracker.clone();

        tracker.record(cell, PieceId(1));
        tracker.record(Position::new(2, 2), PieceId(9));
        tracker.revert(Position::new(2, 2), PieceId(9));
        tracker.revert(cell, PieceId(1));

        assert_eq!(tracker, before);

        tracker.revert(cell, PieceId(1));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_revert_unknown_cell_is_noop() {
        let mut tracker = VisitTracker::new();
        tracker.revert(Position::new(3, 3), PieceId(0));
        assert!(tracker.is_empty());
    }
}
