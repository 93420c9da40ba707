// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::bitboard::BB_LIGHT_SQUARES;
use crate::board::Board;
use crate::grid::Grid;
use crate::observer::BoardObserver;
use crate::types::{Color, PieceKind, COLORS};

/// The state of a game. `CheckmateWhite` means White has been mated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    Active,
    CheckmateWhite,
    CheckmateBlack,
    Stalemate,
    Draw,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Active
    }

    /// The side that delivered mate, if the game ended in mate.
    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::CheckmateWhite => Some(Color::Black),
            GameStatus::CheckmateBlack => Some(Color::White),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            GameStatus::Active => "active",
            GameStatus::CheckmateWhite => "checkmate, Black wins",
            GameStatus::CheckmateBlack => "checkmate, White wins",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Draw => "draw",
        };
        f.write_str(msg)
    }
}

bitflags! {
    /// The draw rules that currently apply. Any one of them ends the game.
    pub struct DrawConditions: u8 {
        const FIFTY_MOVE = 0b0000_0001;
        const THREEFOLD_REPETITION = 0b0000_0010;
        const INSUFFICIENT_MATERIAL = 0b0000_0100;
    }
}

/// Half-moves without a capture or pawn move after which the game is drawn.
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Occurrences of one position, same side to move, that draw the game.
pub const REPETITION_LIMIT: usize = 3;

/// Piece counts for one side.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SideCensus {
    pub pawns: u32,
    pub knights: u32,
    pub bishops: u32,
    pub light_bishops: u32,
    pub rooks: u32,
    pub queens: u32,
}

impl SideCensus {
    pub fn minors(&self) -> u32 {
        self.knights + self.bishops
    }

    fn has_major_or_pawn(&self) -> bool {
        self.pawns + self.rooks + self.queens > 0
    }

    fn bishop_on_light(&self) -> bool {
        self.light_bishops > 0
    }
}

/// A count of every piece on the board, split by side. Kings are not counted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialCensus {
    pub white: SideCensus,
    pub black: SideCensus,
}

impl MaterialCensus {
    pub(crate) fn take(grid: &Grid) -> MaterialCensus {
        let mut census = MaterialCensus::default();
        for &color in COLORS.iter() {
            let side = match color {
                Color::White => &mut census.white,
                Color::Black => &mut census.black,
            };

            for sq in grid.pieces(color) {
                let piece = match grid.piece_at(sq) {
                    Some(piece) => piece,
                    None => continue,
                };

                match piece.kind() {
                    PieceKind::Pawn => side.pawns += 1,
                    PieceKind::Knight => side.knights += 1,
                    PieceKind::Bishop => {
                        side.bishops += 1;
                        if BB_LIGHT_SQUARES.test(sq) {
                            side.light_bishops += 1;
                        }
                    }
                    PieceKind::Rook => side.rooks += 1,
                    PieceKind::Queen => side.queens += 1,
                    PieceKind::King => {}
                }
            }
        }

        census
    }

    /// Whether neither side has the material to force mate. Any pawn, rook
    /// or queen is enough. Among kings and minor pieces the drawn cases are
    /// king against king, a single minor against a bare king, two knights
    /// against a bare king, and one minor each except for bishops on
    /// opposite-colored squares.
    pub fn is_insufficient(&self) -> bool {
        let (white, black) = (&self.white, &self.black);
        if white.has_major_or_pawn() || black.has_major_or_pawn() {
            return false;
        }

        match (white.minors(), black.minors()) {
            (0, 0) | (1, 0) | (0, 1) => true,
            (2, 0) => white.knights == 2,
            (0, 2) => black.knights == 2,
            (1, 1) => {
                if white.bishops == 1 && black.bishops == 1 {
                    white.bishop_on_light() == black.bishop_on_light()
                } else {
                    true
                }
            }
            _ => false,
        }
    }
}

impl Board {
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_check(color) && !self.has_any_legal_move(color)
    }

    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_check(color) && !self.has_any_legal_move(color)
    }

    pub fn material(&self) -> MaterialCensus {
        MaterialCensus::take(self.grid())
    }

    /// How many times the current position, with the current side to move,
    /// appears in the position log.
    pub fn repetition_count(&self) -> usize {
        self.history().occurrences(&self.snapshot())
    }

    pub fn draw_conditions(&self) -> DrawConditions {
        let mut conditions = DrawConditions::empty();
        if self.halfmove_clock() >= FIFTY_MOVE_HALFMOVES {
            conditions.insert(DrawConditions::FIFTY_MOVE);
        }

        if self.repetition_count() >= REPETITION_LIMIT {
            conditions.insert(DrawConditions::THREEFOLD_REPETITION);
        }

        if self.material().is_insufficient() {
            conditions.insert(DrawConditions::INSUFFICIENT_MATERIAL);
        }

        conditions
    }

    /// Whether the game is drawn as things stand: by any draw rule, or
    /// because the side to move is stalemated.
    pub fn is_draw(&self) -> bool {
        !self.draw_conditions().is_empty() || self.is_stalemate(self.current_turn())
    }

    /// Works out the game's status from scratch. Mate of either side comes
    /// first, then stalemate of the side to move, then the draw rules.
    pub fn classify(&self) -> GameStatus {
        if self.is_checkmate(Color::White) {
            return GameStatus::CheckmateWhite;
        }

        if self.is_checkmate(Color::Black) {
            return GameStatus::CheckmateBlack;
        }

        if self.is_stalemate(self.current_turn()) {
            return GameStatus::Stalemate;
        }

        if !self.draw_conditions().is_empty() {
            return GameStatus::Draw;
        }

        GameStatus::Active
    }

    pub(crate) fn reclassify(&mut self, observer: &mut dyn BoardObserver) {
        let status = self.classify();
        if status != self.status() {
            info!("game status now {:?}", status);
            self.set_status(status);
            observer.status_changed(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, Square, FILES, RANKS};

    fn board_with(pieces: &[(PieceKind, Color, Square)]) -> Board {
        let mut board = Board::new();
        board
            .place(Piece::new(PieceKind::King, Color::White), Square::E1)
            .unwrap();
        board
            .place(Piece::new(PieceKind::King, Color::Black), Square::E8)
            .unwrap();
        for &(kind, color, square) in pieces {
            board.place(Piece::new(kind, color), square).unwrap();
        }
        board
    }

    fn insufficient(pieces: &[(PieceKind, Color, Square)]) -> bool {
        board_with(pieces).material().is_insufficient()
    }

    mod material {
        use super::*;

        #[test]
        fn bare_kings() {
            assert!(insufficient(&[]));
        }

        #[test]
        fn single_minor() {
            let bishop = (PieceKind::Bishop, Color::White, Square::C1);
            let knight = (PieceKind::Knight, Color::Black, Square::B8);
            assert!(insufficient(&[bishop]));
            assert!(insufficient(&[knight]));
        }

        #[test]
        fn two_knights() {
            assert!(insufficient(&[
                (PieceKind::Knight, Color::White, Square::B1),
                (PieceKind::Knight, Color::White, Square::G1),
            ]));
        }

        #[test]
        fn two_bishops_can_mate() {
            assert!(!insufficient(&[
                (PieceKind::Bishop, Color::White, Square::C1),
                (PieceKind::Bishop, Color::White, Square::F1),
            ]));
        }

        #[test]
        fn bishops_same_color() {
            // c1 and f8 are both dark.
            assert!(insufficient(&[
                (PieceKind::Bishop, Color::White, Square::C1),
                (PieceKind::Bishop, Color::Black, Square::F8),
            ]));
        }

        #[test]
        fn bishops_opposite_color() {
            // c1 is dark, c8 is light.
            assert!(!insufficient(&[
                (PieceKind::Bishop, Color::White, Square::C1),
                (PieceKind::Bishop, Color::Black, Square::C8),
            ]));
        }

        #[test]
        fn knight_against_knight_or_bishop() {
            assert!(insufficient(&[
                (PieceKind::Knight, Color::White, Square::B1),
                (PieceKind::Knight, Color::Black, Square::B8),
            ]));
            assert!(insufficient(&[
                (PieceKind::Bishop, Color::White, Square::C1),
                (PieceKind::Knight, Color::Black, Square::B8),
            ]));
        }

        #[test]
        fn pawns_rooks_and_queens_are_enough() {
            let pawn = (PieceKind::Pawn, Color::White, Square::A2);
            let rook = (PieceKind::Rook, Color::Black, Square::A8);
            let queen = (PieceKind::Queen, Color::White, Square::D1);
            assert!(!insufficient(&[pawn]));
            assert!(!insufficient(&[rook]));
            assert!(!insufficient(&[queen]));
        }

        #[test]
        fn census_counts() {
            let census = Board::standard().material();
            assert_eq!(8, census.white.pawns);
            assert_eq!(2, census.black.knights);
            assert_eq!(1, census.white.light_bishops);
            assert_eq!(4, census.black.minors());
        }
    }

    mod classification {
        use super::*;

        #[test]
        fn start_is_active() {
            let board = Board::standard();
            assert_eq!(GameStatus::Active, board.classify());
            assert!(!board.is_draw());
            assert!(board.draw_conditions().is_empty());
        }

        #[test]
        fn king_and_bishop_against_king_is_draw() {
            let board = board_with(&[(PieceKind::Bishop, Color::White, Square::C1)]);
            assert!(board.is_draw());
            assert!(board
                .draw_conditions()
                .contains(DrawConditions::INSUFFICIENT_MATERIAL));
            assert_eq!(GameStatus::Draw, board.classify());
        }

        #[test]
        fn back_rank_mate() {
            let mut board = Board::new();
            board
                .place(Piece::new(PieceKind::King, Color::Black), Square::G8)
                .unwrap();
            for &sq in [Square::F7, Square::G7, Square::H7].iter() {
                board
                    .place(Piece::new(PieceKind::Pawn, Color::Black), sq)
                    .unwrap();
            }
            board
                .place(Piece::new(PieceKind::King, Color::White), Square::G1)
                .unwrap();
            board
                .place(Piece::new(PieceKind::Rook, Color::White), Square::A1)
                .unwrap();

            board.attempt_move(Square::A1, Square::A8, None).unwrap();
            assert!(board.is_checkmate(Color::Black));
            assert_eq!(GameStatus::CheckmateBlack, board.status());
            assert_eq!(Some(Color::White), board.status().winner());
        }

        #[test]
        fn stalemate_after_move() {
            let mut board = Board::new();
            board
                .place(Piece::new(PieceKind::King, Color::Black), Square::H8)
                .unwrap();
            board
                .place(Piece::new(PieceKind::King, Color::White), Square::F7)
                .unwrap();
            board
                .place(Piece::new(PieceKind::Queen, Color::White), Square::G5)
                .unwrap();

            board.attempt_move(Square::G5, Square::G6, None).unwrap();
            assert!(board.is_stalemate(Color::Black));
            assert!(board.is_draw());
            assert_eq!(GameStatus::Stalemate, board.status());
        }

        #[test]
        fn finished_game_refuses_moves() {
            let mut board = board_with(&[
                (PieceKind::Bishop, Color::White, Square::C1),
                (PieceKind::Knight, Color::Black, Square::B8),
                (PieceKind::Pawn, Color::Black, Square::H7),
            ]);
            board.set_current_turn(Color::Black);
            board.attempt_move(Square::B8, Square::C6, None).unwrap();
            assert_eq!(GameStatus::Active, board.status());

            // the last pawn goes and only minor pieces remain.
            board.attempt_move(Square::C1, Square::G5, None).unwrap();
            board.attempt_move(Square::H7, Square::H6, None).unwrap();
            board.attempt_move(Square::G5, Square::H6, None).unwrap();
            assert_eq!(GameStatus::Draw, board.status());
            assert_eq!(
                Err(crate::board::MoveError::GameAlreadyOver),
                board.attempt_move(Square::C6, Square::D4, None)
            );
        }

        #[test]
        fn fifty_move_rule() {
            let mut board = Board::new();
            board
                .place(Piece::new(PieceKind::King, Color::White), Square::H1)
                .unwrap();
            board
                .place(Piece::new(PieceKind::King, Color::Black), Square::H8)
                .unwrap();
            board
                .place(Piece::new(PieceKind::Rook, Color::White), Square::A1)
                .unwrap();

            // The rook snakes over files a-f of ranks 1-7 and back, so no
            // position comes up a third time before the clock runs out.
            let mut tour = Vec::new();
            for (i, &rank) in RANKS[..7].iter().enumerate() {
                let row = FILES[..6].iter().map(|&file| Square::of(rank, file));
                if i % 2 == 0 {
                    tour.extend(row);
                } else {
                    tour.extend(row.rev());
                }
            }
            let mut path = tour.clone();
            path.extend(tour.iter().rev().skip(1));

            for i in 0..50 {
                board.attempt_move(path[i], path[i + 1], None).unwrap();
                let (from, to) = if i % 2 == 0 {
                    (Square::H8, Square::G8)
                } else {
                    (Square::G8, Square::H8)
                };
                board.attempt_move(from, to, None).unwrap();
                if i < 49 {
                    assert_eq!(GameStatus::Active, board.status(), "after {} moves", i + 1);
                }
            }

            assert_eq!(FIFTY_MOVE_HALFMOVES, board.halfmove_clock());
            assert_eq!(DrawConditions::FIFTY_MOVE, board.draw_conditions());
            assert_eq!(GameStatus::Draw, board.status());
        }
    }
}
