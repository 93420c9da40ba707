// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::collections::vec_deque;
use std::error::Error;
use std::fmt;

use crate::config::BoardConfig;
use crate::grid::Grid;
use crate::history::{History, MoveLogEntry, PositionSnapshot};
use crate::observer::{BoardObserver, NullObserver};
use crate::outcome::GameStatus;
use crate::special_moves::EnPassant;
use crate::types::{Color, File, Piece, PieceKind, Rank, Square};
use crate::types::{FILES, RANKS};

/// Reasons a move can be refused. A refused move leaves the board exactly as
/// it was.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveError {
    GameAlreadyOver,
    NoPieceAtSource,
    WrongTurn,
    PatternIllegal,
    OwnPieceAtDestination,
    PathBlocked,
    LeavesKingInCheck,
    CastleBlockedByCheck,
    CastleBlockedByMovedPiece,
    CastleBlockedByAttackedTransit,
    CastleBlockedByMissingRook,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            MoveError::GameAlreadyOver => "the game is over",
            MoveError::NoPieceAtSource => "no piece to move",
            MoveError::WrongTurn => "not that side's turn",
            MoveError::PatternIllegal => "illegal move for this piece",
            MoveError::OwnPieceAtDestination => "cannot capture own piece",
            MoveError::PathBlocked => "path is blocked",
            MoveError::LeavesKingInCheck => "move would leave king in check",
            MoveError::CastleBlockedByCheck => "cannot castle while in check",
            MoveError::CastleBlockedByMovedPiece => "king or rook has already moved",
            MoveError::CastleBlockedByAttackedTransit => "cannot castle through check",
            MoveError::CastleBlockedByMissingRook => "no rook to castle with",
        };
        f.write_str(msg)
    }
}

impl Error for MoveError {}

/// Errors from the administrative setup operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SetupError {
    SquareOccupied(Square),
    SquareEmpty(Square),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SetupError::SquareOccupied(sq) => write!(f, "square {} is occupied", sq),
            SetupError::SquareEmpty(sq) => write!(f, "square {} is empty", sq),
        }
    }
}

impl Error for SetupError {}

/// What a validated move will do when committed, beyond moving one piece
/// from its source to its destination.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Special {
    None,
    DoubleStep,
    EnPassant { captured: Square },
    Castle { rook_from: Square, rook_to: Square },
}

/// A move that passed every legality check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct MovePlan {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub special: Special,
    pub promotes: bool,
}

/// A chess board together with everything needed to judge the next move:
/// whose turn it is, the en passant record, the fifty-move clock and the
/// move and position histories.
#[derive(Clone, Debug)]
pub struct Board {
    grid: Grid,
    side_to_move: Color,
    status: GameStatus,
    halfmove_clock: u32,
    fullmove_number: u32,
    en_passant: Option<EnPassant>,
    history: History,
}

//
// Construction and setup
//

impl Board {
    /// An empty board, White to move.
    pub fn new() -> Board {
        Board::with_config(BoardConfig::default())
    }

    pub fn with_config(config: BoardConfig) -> Board {
        Board {
            grid: Grid::new(),
            side_to_move: Color::White,
            status: GameStatus::Active,
            halfmove_clock: 0,
            fullmove_number: 1,
            en_passant: None,
            history: History::new(config),
        }
    }

    /// A board set up with the standard 32 pieces, White to move.
    pub fn standard() -> Board {
        let mut board = Board::new();
        board.initialize_standard_game();
        board
    }

    /// Removes every piece and resets turn, status, clocks, the en passant
    /// record and both histories.
    pub fn clear_board(&mut self) {
        self.grid.clear();
        self.side_to_move = Color::White;
        self.status = GameStatus::Active;
        self.halfmove_clock = 0;
        self.fullmove_number = 1;
        self.en_passant = None;
        self.history.clear();
    }

    pub fn initialize_standard_game(&mut self) {
        self.initialize_standard_game_observed(&mut NullObserver)
    }

    /// Clears the board and sets up the standard starting position. The
    /// starting position is stored as the first snapshot, so it counts
    /// towards repetitions.
    pub fn initialize_standard_game_observed(&mut self, observer: &mut dyn BoardObserver) {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        self.clear_board();
        for (&file, &kind) in FILES.iter().zip(BACK_RANK.iter()) {
            let white = Piece::new(kind, Color::White);
            let black = Piece::new(kind, Color::Black);
            let white_pawn = Piece::new(PieceKind::Pawn, Color::White);
            let black_pawn = Piece::new(PieceKind::Pawn, Color::Black);
            self.grid.put(Square::of(Rank::One, file), white);
            self.grid.put(Square::of(Rank::Two, file), white_pawn);
            self.grid.put(Square::of(Rank::Seven, file), black_pawn);
            self.grid.put(Square::of(Rank::Eight, file), black);
        }

        self.record_position();
        info!("standard game initialized");
        observer.game_started();
    }

    /// Places a piece on an empty square.
    pub fn place(&mut self, piece: Piece, square: Square) -> Result<(), SetupError> {
        if self.grid.piece_at(square).is_some() {
            return Err(SetupError::SquareOccupied(square));
        }

        self.grid.put(square, piece);
        Ok(())
    }

    /// Places a piece on a square, returning whatever was standing there.
    pub fn place_or_replace(&mut self, piece: Piece, square: Square) -> Option<Piece> {
        self.grid.put(square, piece)
    }

    /// Removes the piece on a square, handing it back to the caller.
    pub fn remove(&mut self, square: Square) -> Result<Piece, SetupError> {
        let piece = self.grid.take(square);
        piece.ok_or(SetupError::SquareEmpty(square))
    }

    /// Overrides whose turn it is, bypassing every rule. Meant for setting
    /// up positions.
    pub fn set_current_turn(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// Stores the current position in the position log. Used after setting
    /// up a position by hand so that it counts towards repetitions.
    pub fn record_position(&mut self) {
        let snapshot = self.snapshot();
        self.history.push_position(snapshot);
    }
}

//
// Board state getters
//

impl Board {
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.grid.piece_at(square)
    }

    /// Every piece on the board with the square it stands on, A1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.grid
            .occupancy()
            .iter()
            .filter_map(move |sq| self.grid.piece_at(sq).map(|p| (sq, p)))
    }

    pub fn current_turn(&self) -> Color {
        self.side_to_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }

    pub fn move_log(&self) -> vec_deque::Iter<MoveLogEntry> {
        self.history.moves()
    }

    pub fn position_log(&self) -> vec_deque::Iter<PositionSnapshot> {
        self.history.positions()
    }

    pub fn config(&self) -> BoardConfig {
        self.history.config()
    }

    /// The snapshot of the position as it stands now.
    pub fn snapshot(&self) -> PositionSnapshot {
        PositionSnapshot::capture(&self.grid, self.side_to_move)
    }

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn history(&self) -> &History {
        &self.history
    }

    pub(crate) fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }
}

//
// Move application
//

impl Board {
    /// Attempts to play a move for the side to move. `promotion` picks the
    /// piece a pawn reaching its last rank turns into and defaults to a
    /// queen.
    pub fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<(), MoveError> {
        self.attempt_move_observed(from, to, promotion, &mut NullObserver)
    }

    /// Like `attempt_move`, reporting captures, castles, promotions and
    /// status changes to the given observer.
    pub fn attempt_move_observed(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
        observer: &mut dyn BoardObserver,
    ) -> Result<(), MoveError> {
        let plan = match self.validate(from, to) {
            Ok(plan) => plan,
            Err(err) => {
                debug!("rejecting {}{}: {}", from, to, err);
                observer.rejected(from, to, err);
                return Err(err);
            }
        };

        self.commit(plan, promotion, observer);
        Ok(())
    }

    fn validate(&self, from: Square, to: Square) -> Result<MovePlan, MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameAlreadyOver);
        }

        let piece = self.grid.piece_at(from).ok_or(MoveError::NoPieceAtSource)?;
        if piece.color != self.side_to_move {
            return Err(MoveError::WrongTurn);
        }

        self.check_move(from, to, piece)
    }

    /// Commits a validated move. Nothing in here can fail: every condition
    /// was established by `validate`.
    fn commit(
        &mut self,
        plan: MovePlan,
        promotion: Option<PieceKind>,
        observer: &mut dyn BoardObserver,
    ) {
        let MovePlan { from, to, .. } = plan;
        let color = plan.piece.color;
        let mut captured = false;
        match plan.special {
            Special::EnPassant { captured: square } => {
                if let Some(pawn) = self.grid.take(square) {
                    observer.piece_captured(square, pawn);
                    captured = true;
                }
            }
            Special::Castle { rook_from, rook_to } => {
                self.castle_rook(rook_from, rook_to);
                observer.castled(rook_from, rook_to);
            }
            Special::None | Special::DoubleStep => {}
        }

        let mut piece = plan.piece;
        piece.mark_moved();
        self.grid.take(from);
        if let Some(victim) = self.grid.put(to, piece) {
            observer.piece_captured(to, victim);
            captured = true;
        }

        if plan.promotes {
            self.promote(to, promotion, observer);
        }

        if captured || piece.kind() == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.en_passant = match plan.special {
            Special::DoubleStep => Some(EnPassant { color, from, to }),
            _ => None,
        };

        let entry = MoveLogEntry { from, to };
        self.history.push_move(entry);
        debug!("{} plays {}", color, entry);
        observer.moved(&entry);

        self.side_to_move = color.toggle();
        if color == Color::Black {
            self.fullmove_number += 1;
        }

        self.record_position();
        self.reclassify(observer);
    }
}

//
// Trait implementations
//

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            write!(f, "{} ", rank)?;
            for &file in &FILES {
                match self.grid.piece_at(Square::of(rank, file)) {
                    Some(piece) => write!(f, "{} ", piece)?,
                    None => write!(f, ". ")?,
                }
            }

            writeln!(f)?;
        }

        write!(f, " ")?;
        for &file in &FILES {
            write!(f, " {}", file)?;
        }

        writeln!(f)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

/// Shorthand for the square on `file` of `color`'s back rank.
pub(crate) fn back_rank_square(color: Color, file: File) -> Square {
    Square::of(color.back_rank(), file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::tests::RecordingObserver;
    use crate::types::SQUARES;

    fn piece(kind: PieceKind, color: Color) -> Piece {
        Piece::new(kind, color)
    }

    mod setup {
        use super::*;

        #[test]
        fn standard_position() {
            let board = Board::standard();
            assert_eq!(32, board.pieces().count());
            assert_eq!(Color::White, board.current_turn());
            assert_eq!(GameStatus::Active, board.status());

            let king = board.piece_at(Square::E1).unwrap();
            assert_eq!(PieceKind::King, king.kind());
            assert_eq!(Color::White, king.color);
            assert!(!king.has_moved());

            let queen = board.piece_at(Square::D8).unwrap();
            assert_eq!(PieceKind::Queen, queen.kind());
            assert_eq!(Color::Black, queen.color);

            for &file in FILES.iter() {
                let pawn = board.piece_at(Square::of(Rank::Seven, file)).unwrap();
                assert_eq!(PieceKind::Pawn, pawn.kind());
                assert_eq!(Color::Black, pawn.color);
                assert!(board.piece_at(Square::of(Rank::Four, file)).is_none());
            }

            // the starting position is the first stored snapshot.
            assert_eq!(1, board.position_log().count());
            assert_eq!(0, board.move_log().count());
        }

        #[test]
        fn place_refuses_occupied_square() {
            let mut board = Board::new();
            board
                .place(piece(PieceKind::Rook, Color::White), Square::A1)
                .unwrap();
            assert_eq!(
                Err(SetupError::SquareOccupied(Square::A1)),
                board.place(piece(PieceKind::Rook, Color::Black), Square::A1)
            );
            assert_eq!(Color::White, board.piece_at(Square::A1).unwrap().color);
        }

        #[test]
        fn remove_and_replace() {
            let mut board = Board::new();
            assert_eq!(
                Err(SetupError::SquareEmpty(Square::C3)),
                board.remove(Square::C3)
            );

            let knight = piece(PieceKind::Knight, Color::White);
            let bishop = piece(PieceKind::Bishop, Color::Black);
            board.place_or_replace(knight, Square::C3);
            let old = board.place_or_replace(bishop, Square::C3);
            assert_eq!(Some(knight), old);
            assert_eq!(
                Ok(piece(PieceKind::Bishop, Color::Black)),
                board.remove(Square::C3)
            );
            assert!(board.piece_at(Square::C3).is_none());
        }

        #[test]
        fn clear_resets_everything() {
            let mut board = Board::standard();
            board.attempt_move(Square::E2, Square::E4, None).unwrap();
            board.clear_board();

            assert_eq!(0, board.pieces().count());
            assert_eq!(Color::White, board.current_turn());
            assert_eq!(GameStatus::Active, board.status());
            assert_eq!(0, board.halfmove_clock());
            assert_eq!(1, board.fullmove_number());
            assert!(board.en_passant().is_none());
            assert_eq!(0, board.move_log().count());
            assert_eq!(0, board.position_log().count());
        }

        #[test]
        fn set_current_turn_overrides() {
            let mut board = Board::standard();
            board.set_current_turn(Color::Black);
            assert_eq!(Color::Black, board.current_turn());
            assert_eq!(
                Err(MoveError::WrongTurn),
                board.attempt_move(Square::E2, Square::E4, None)
            );
            assert!(board.attempt_move(Square::E7, Square::E5, None).is_ok());
        }

        #[test]
        fn display_dumps_board() {
            let board = Board::standard();
            let dump = board.to_string();
            let lines: Vec<_> = dump.lines().collect();
            assert_eq!("8 r n b q k b n r ", lines[0]);
            assert_eq!("1 R N B Q K B N R ", lines[7]);
            assert_eq!("  a b c d e f g h", lines[8]);
        }
    }

    mod apply {
        use super::*;

        #[test]
        fn opening_pawn_push() {
            let mut board = Board::standard();
            assert!(board.attempt_move(Square::E2, Square::E4, None).is_ok());

            assert_eq!(Color::Black, board.current_turn());
            assert_eq!(0, board.halfmove_clock());
            assert!(board.piece_at(Square::E2).is_none());

            let pawn = board.piece_at(Square::E4).unwrap();
            assert_eq!(PieceKind::Pawn, pawn.kind());
            assert_eq!(Color::White, pawn.color);

            let ep = board.en_passant().unwrap();
            assert_eq!(Color::White, ep.color);
            assert_eq!(Square::E2, ep.from);
            assert_eq!(Square::E4, ep.to);

            let log: Vec<_> = board.move_log().cloned().collect();
            assert_eq!(
                vec![MoveLogEntry {
                    from: Square::E2,
                    to: Square::E4
                }],
                log
            );
            assert_eq!(2, board.position_log().count());
            assert_eq!(
                Color::Black,
                board.position_log().last().unwrap().side_to_move()
            );
        }

        #[test]
        fn knight_move_advances_halfmove_clock() {
            let mut board = Board::standard();
            board.attempt_move(Square::G1, Square::F3, None).unwrap();
            assert_eq!(1, board.halfmove_clock());
            assert!(board.en_passant().is_none());
            board.attempt_move(Square::G8, Square::F6, None).unwrap();
            assert_eq!(2, board.halfmove_clock());
            assert_eq!(2, board.fullmove_number());
        }

        #[test]
        fn capture_resets_halfmove_clock() {
            let mut board = Board::new();
            board
                .place(piece(PieceKind::King, Color::White), Square::E1)
                .unwrap();
            board
                .place(piece(PieceKind::King, Color::Black), Square::E8)
                .unwrap();
            board
                .place(piece(PieceKind::Rook, Color::White), Square::A1)
                .unwrap();
            board
                .place(piece(PieceKind::Knight, Color::Black), Square::A6)
                .unwrap();
            board
                .place(piece(PieceKind::Pawn, Color::Black), Square::H7)
                .unwrap();

            board.attempt_move(Square::A1, Square::A2, None).unwrap();
            board.attempt_move(Square::E8, Square::D8, None).unwrap();
            assert_eq!(2, board.halfmove_clock());

            board.attempt_move(Square::A2, Square::A6, None).unwrap();
            assert_eq!(0, board.halfmove_clock());

            let rook = board.piece_at(Square::A6).unwrap();
            assert_eq!(PieceKind::Rook, rook.kind());
            assert!(rook.has_moved());
        }

        #[test]
        fn moving_sets_moved_flag() {
            let mut board = Board::standard();
            board.attempt_move(Square::E2, Square::E4, None).unwrap();
            board.attempt_move(Square::E7, Square::E5, None).unwrap();
            board.attempt_move(Square::E1, Square::E2, None).unwrap();
            assert!(board.piece_at(Square::E2).unwrap().has_moved());
        }

        #[test]
        fn rejections_leave_board_unchanged() {
            let mut board = Board::standard();
            let before = board.clone();
            let attempts = [
                (Square::E3, Square::E4, MoveError::NoPieceAtSource),
                (Square::E7, Square::E5, MoveError::WrongTurn),
                (Square::E2, Square::E5, MoveError::PatternIllegal),
                (Square::A1, Square::A2, MoveError::OwnPieceAtDestination),
                (Square::A1, Square::A3, MoveError::PathBlocked),
                (Square::C1, Square::E3, MoveError::PathBlocked),
                (Square::E2, Square::D3, MoveError::PathBlocked),
            ];

            for &(from, to, err) in attempts.iter() {
                assert_eq!(Err(err), board.attempt_move(from, to, None));
                assert_eq!(before.grid, board.grid);
                assert_eq!(before.side_to_move, board.side_to_move);
                assert_eq!(before.halfmove_clock, board.halfmove_clock);
                assert_eq!(before.en_passant, board.en_passant);
                assert_eq!(before.position_log().count(), board.position_log().count());
            }
        }

        #[test]
        fn observer_sees_rejection_and_move() {
            let mut board = Board::standard();
            let mut observer = RecordingObserver::default();
            assert_eq!(
                Err(MoveError::PatternIllegal),
                board.attempt_move_observed(Square::E2, Square::E5, None, &mut observer)
            );
            board
                .attempt_move_observed(Square::E2, Square::E4, None, &mut observer)
                .unwrap();
            assert_eq!(
                vec![
                    "rejected e2e5 PatternIllegal".to_owned(),
                    "moved e2e4".to_owned(),
                ],
                observer.events
            );
        }

        fn assert_untouched(before: &PositionSnapshot, after: &PositionSnapshot, moved: &[Square]) {
            for &square in SQUARES.iter().filter(|&&sq| !moved.contains(&sq)) {
                assert_eq!(before.cell(square), after.cell(square), "{}", square);
            }
        }

        #[test]
        fn only_source_and_destination_change() {
            let mut board = Board::new();
            board
                .place(piece(PieceKind::King, Color::White), Square::E1)
                .unwrap();
            board
                .place(piece(PieceKind::King, Color::Black), Square::E8)
                .unwrap();
            board
                .place(piece(PieceKind::Rook, Color::White), Square::A1)
                .unwrap();
            board
                .place(piece(PieceKind::Knight, Color::Black), Square::A6)
                .unwrap();
            board
                .place(piece(PieceKind::Pawn, Color::White), Square::G7)
                .unwrap();

            // quiet move
            let before = board.snapshot();
            board.attempt_move(Square::A1, Square::A2, None).unwrap();
            let after = board.snapshot();
            assert_untouched(&before, &after, &[Square::A1, Square::A2]);
            assert_eq!(' ', after.cell(Square::A1));
            assert_eq!('R', after.cell(Square::A2));

            board.attempt_move(Square::E8, Square::D8, None).unwrap();

            // capture
            let before = board.snapshot();
            board.attempt_move(Square::A2, Square::A6, None).unwrap();
            let after = board.snapshot();
            assert_eq!('n', before.cell(Square::A6));
            assert_untouched(&before, &after, &[Square::A2, Square::A6]);
            assert_eq!(' ', after.cell(Square::A2));
            assert_eq!('R', after.cell(Square::A6));

            board.attempt_move(Square::D8, Square::C8, None).unwrap();

            // promotion
            let before = board.snapshot();
            board.attempt_move(Square::G7, Square::G8, None).unwrap();
            let after = board.snapshot();
            assert_untouched(&before, &after, &[Square::G7, Square::G8]);
            assert_eq!(' ', after.cell(Square::G7));
            assert_eq!('Q', after.cell(Square::G8));
        }

        #[test]
        fn capture_is_announced() {
            let mut board = Board::standard();
            let mut observer = RecordingObserver::default();
            for &(from, to) in [(Square::E2, Square::E4), (Square::D7, Square::D5)].iter() {
                board.attempt_move(from, to, None).unwrap();
            }

            board
                .attempt_move_observed(Square::E4, Square::D5, None, &mut observer)
                .unwrap();
            assert_eq!(
                vec!["captured p d5".to_owned(), "moved e4d5".to_owned()],
                observer.events
            );
        }
    }
}
