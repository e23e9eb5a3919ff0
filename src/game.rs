use log::{debug, info};
use thiserror::Error;

use crate::board::{BOARD_SIZE, Board, Move, Position};
use crate::history::{HistoryStack, Turn, VisitTracker};
use crate::piece::{Piece, PieceId, Player, PlayerId};
use crate::rules::{self, IllegalMove, MoveValidity, Outcome};
use crate::stats::GameReport;

pub const KING_ID: u8 = 7;
pub const ATTACKER_COUNT: u32 = 24;

/// Defender pawns as (id, col, row). The king takes id 7 at the centre.
const DEFENDERS: [(u8, i32, i32); 12] = [
    (1, 5, 3),
    (2, 4, 4),
    (3, 5, 4),
    (4, 6, 4),
    (5, 3, 5),
    (6, 4, 5),
    (8, 6, 5),
    (9, 7, 5),
    (10, 4, 6),
    (11, 5, 6),
    (12, 6, 6),
    (13, 5, 7),
];

/// Attacker pawns as (id, col, row)
const ATTACKERS: [(u8, i32, i32); 24] = [
    // Top
    (1, 3, 0),
    (2, 4, 0),
    (3, 5, 0),
    (4, 6, 0),
    (5, 7, 0),
    (6, 5, 1),
    // Left and right
    (7, 0, 3),
    (8, 10, 3),
    (9, 0, 4),
    (10, 10, 4),
    (11, 0, 5),
    (12, 1, 5),
    (13, 9, 5),
    (14, 10, 5),
    (15, 0, 6),
    (16, 10, 6),
    (17, 0, 7),
    (18, 10, 7),
    // Bottom
    (19, 5, 9),
    (20, 3, 10),
    (21, 4, 10),
    (22, 5, 10),
    (23, 6, 10),
    (24, 7, 10),
];

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Position {0} is not on the board")]
    OutOfBoard(Position),
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Print the statistics report to stdout when a game ends
    pub print_report: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { print_report: true }
    }
}

/// The game engine: board, pieces, turn history and win bookkeeping.
///
/// Every public operation runs to completion; a `Game` has no shared state,
/// so independent instances can be used side by side.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    /// Defenders (king included) at 0..13, attackers at 13..37
    pieces: Vec<Piece>,
    king: PieceId,
    king_position: Position,
    history: HistoryStack,
    visits: VisitTracker,
    first_player: Player,
    second_player: Player,
    second_player_turn: bool,
    remaining_attackers: u32,
    outcome: Option<Outcome>,
    report: Option<GameReport>,
}

impl Game {
    /// Create a new game with the default configuration
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        let mut game = Game {
            config,
            board: Board::new(),
            pieces: Vec::with_capacity(DEFENDERS.len() + 1 + ATTACKERS.len()),
            king: PieceId(0),
            king_position: Position::new(5, 5),
            history: HistoryStack::new(),
            visits: VisitTracker::new(),
            first_player: Player::new(PlayerId::First),
            second_player: Player::new(PlayerId::Second),
            second_player_turn: true,
            remaining_attackers: ATTACKER_COUNT,
            outcome: None,
            report: None,
        };
        game.setup();
        game
    }

    /// Seed the starting layout on an empty board
    fn setup(&mut self) {
        self.pieces.clear();

        let center = (BOARD_SIZE / 2) as i32;
        let throne = Position::new(center, center);
        self.king_position = throne;

        for &(id, col, row) in &DEFENDERS {
            // Keep the arena ordered by id
            if id == KING_ID + 1 {
                self.king = self.put(Piece::king(PlayerId::First, KING_ID, throne));
            }
            self.put(Piece::pawn(PlayerId::First, id, Position::new(col, row)));
        }

        for &(id, col, row) in &ATTACKERS {
            self.put(Piece::pawn(PlayerId::Second, id, Position::new(col, row)));
        }
    }

    fn put(&mut self, piece: Piece) -> PieceId {
        let id = PieceId(self.pieces.len());
        let at = piece.position();
        self.board.place(at, id);
        self.visits.record(at, id);
        self.pieces.push(piece);
        id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board_size(&self) -> usize {
        BOARD_SIZE
    }

    pub fn first_player(&self) -> &Player {
        &self.first_player
    }

    pub fn second_player(&self) -> &Player {
        &self.second_player
    }

    pub fn is_second_player_turn(&self) -> bool {
        self.second_player_turn
    }

    pub fn current_player(&self) -> PlayerId {
        if self.second_player_turn {
            PlayerId::Second
        } else {
            PlayerId::First
        }
    }

    pub fn is_game_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Statistics of the finished game, if any
    pub fn report(&self) -> Option<&GameReport> {
        self.report.as_ref()
    }

    pub fn king_position(&self) -> Position {
        self.king_position
    }

    /// Attackers still on the board
    pub fn remaining_attackers(&self) -> u32 {
        self.remaining_attackers
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn visits(&self) -> &VisitTracker {
        &self.visits
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)
    }

    pub fn piece_at(&self, pos: Position) -> Result<Option<&Piece>, GameError> {
        rules::ensure_on_board(pos)?;
        Ok(self.board.get(pos).and_then(|id| self.piece(id)))
    }

    pub fn can_move(
        &self,
        from: Position,
        to: Position,
        player: PlayerId,
    ) -> Result<bool, GameError> {
        Ok(self.check_move(from, to, player)?.is_valid())
    }

    pub fn check_move(
        &self,
        from: Position,
        to: Position,
        player: PlayerId,
    ) -> Result<MoveValidity, GameError> {
        rules::check_move(&self.board, &self.pieces, from, to, player)
    }

    /// All legal moves for the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_game_finished() {
            return Vec::new();
        }
        rules::legal_moves(&self.board, &self.pieces, self.current_player())
    }

    /// Try to move the piece on `from` to `to` for the side to move.
    ///
    /// Returns `Ok(false)` and leaves the game untouched when the move breaks
    /// a rule or the game is already over.
    pub fn make_move(&mut self, from: Position, to: Position) -> Result<bool, GameError> {
        rules::ensure_on_board(from)?;
        rules::ensure_on_board(to)?;

        if self.is_game_finished() {
            debug!("Move {} refused: game is over", Move::new(from, to));
            return Ok(false);
        }

        let player = self.current_player();
        if let MoveValidity::Invalid(reason) = self.check_move(from, to, player)? {
            debug!("Move {} refused for {}: {}", Move::new(from, to), player, reason);
            return Ok(false);
        }

        let Some(id) = self.board.take(from) else {
            return Ok(false);
        };
        self.board.place(to, id);
        self.pieces[id.0].push_move(to);
        self.history.push(Turn::new(id, from, to));
        if id == self.king {
            self.king_position = to;
        }
        self.visits.record(to, id);

        self.resolve_captures(id, to);

        if let Some(outcome) = rules::check_winner(
            &self.board,
            &self.pieces,
            self.king_position,
            self.remaining_attackers,
        ) {
            self.finish(outcome);
        }

        self.second_player_turn = !self.second_player_turn;
        Ok(true)
    }

    fn resolve_captures(&mut self, mover: PieceId, at: Position) {
        let captured = rules::find_captures(&self.board, &self.pieces, at);
        if captured.is_empty() {
            return;
        }

        for &victim in &captured {
            let pos = self.pieces[victim.0].position();
            self.board.take(pos);
            if self.pieces[victim.0].owner() == PlayerId::Second {
                self.remaining_attackers -= 1;
            }
            debug!(
                "{} captured {} on {}",
                self.pieces[mover.0],
                self.pieces[victim.0],
                pos
            );
        }

        self.pieces[mover.0].add_captures(captured.len() as u32);
        if let Some(turn) = self.history.last_mut() {
            turn.captured.extend(captured);
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        match outcome.winner {
            PlayerId::First => self.first_player.add_win(),
            PlayerId::Second => self.second_player.add_win(),
        }
        info!(
            "Game over after {} moves: {} win ({:?})",
            self.history.len(),
            outcome.winner,
            outcome.reason
        );

        let report = GameReport::build(&self.pieces, &self.visits, outcome.winner);
        if self.config.print_report {
            print!("{}", report);
        }
        self.outcome = Some(outcome);
        self.report = Some(report);
    }

    /// Take back the most recent move, captures included. Does nothing when
    /// no move has been made since the last reset.
    pub fn undo_last_move(&mut self) {
        let Some(turn) = self.history.pop() else {
            return;
        };

        self.board.take(turn.to);
        self.board.place(turn.from, turn.piece);
        let piece = &mut self.pieces[turn.piece.0];
        piece.pop_move();
        piece.remove_captures(turn.captured.len() as u32);

        for &victim in &turn.captured {
            let pawn = &self.pieces[victim.0];
            if pawn.owner() == PlayerId::Second {
                self.remaining_attackers += 1;
            }
            self.board.place(pawn.position(), victim);
        }

        if turn.piece == self.king {
            self.king_position = turn.from;
        }
        self.visits.revert(turn.to, turn.piece);

        // Only the finishing move can be on top of a finished game
        if let Some(outcome) = self.outcome.take() {
            match outcome.winner {
                PlayerId::First => self.first_player.remove_win(),
                PlayerId::Second => self.second_player.remove_win(),
            }
            self.report = None;
        }

        self.second_player_turn = !self.second_player_turn;
        debug!(
            "Undid {} {}",
            self.pieces[turn.piece.0],
            Move::new(turn.from, turn.to)
        );
    }

    /// Back to the starting layout with attackers to move. Win counters are
    /// kept.
    pub fn reset(&mut self) {
        self.board.clear();
        self.history.clear();
        self.visits.clear();
        self.second_player_turn = true;
        self.remaining_attackers = ATTACKER_COUNT;
        self.outcome = None;
        self.report = None;
        self.setup();
        info!("Game reset");
    }

    /// Get a string representation of the board
    pub fn display_board(&self) -> String {
        let mut result = String::new();
        result.push_str("   ");
        for col in 0..BOARD_SIZE {
            result.push_str(&format!("{:2} ", col));
        }
        result.push('\n');

        for row in 0..BOARD_SIZE {
            result.push_str(&format!("{:2} ", row));
            for col in 0..BOARD_SIZE {
                let pos = Position::new(col as i32, row as i32);
                let c = match self.board.get(pos).and_then(|id| self.piece(id)) {
                    Some(piece) if piece.is_king() => 'K',
                    Some(piece) if piece.owner() == PlayerId::First => 'D',
                    Some(_) => 'A',
                    None if pos.is_corner() => 'X',
                    None => '.',
                };
                result.push_str(&format!(" {} ", c));
            }
            result.push('\n');
        }

        result
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Explain a refused move in words
pub fn describe_rejection(game: &Game, from: Position, to: Position) -> Option<IllegalMove> {
    match game.check_move(from, to, game.current_player()) {
        Ok(MoveValidity::Invalid(reason)) => Some(reason),
        _ => None,
    }
}
