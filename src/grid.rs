// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::bitboard::Bitboard;
use crate::movement;
use crate::types::{Color, Piece, PieceKind, Square, TableIndex};

/// The 64 squares of the board and whatever stands on them. Each slot owns
/// its piece outright; taking a piece out of a slot hands ownership to the
/// caller and dropping it is what a capture is.
///
/// A grid is `Copy`, which is what the legality checks rely on: a trial move
/// is played on a copy and the copy is thrown away afterwards, so the live
/// board is never touched by validation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    slots: [Option<Piece>; 64],
    occupied: Bitboard,
    by_color: [Bitboard; 2],
}

impl Grid {
    pub fn new() -> Grid {
        Grid {
            slots: [None; 64],
            occupied: Bitboard::none(),
            by_color: [Bitboard::none(); 2],
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.slots[square.as_index()]
    }

    /// Puts a piece on a square, handing back whatever was there before.
    pub fn put(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        let previous = self.take(square);
        self.slots[square.as_index()] = Some(piece);
        self.occupied.set(square);
        self.by_color[piece.color.as_index()].set(square);
        previous
    }

    /// Empties a square, handing back its occupant.
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.slots[square.as_index()].take()?;
        self.occupied.unset(square);
        self.by_color[piece.color.as_index()].unset(square);
        Some(piece)
    }

    /// Moves whatever stands on `from` to `to`, returning the piece that was
    /// standing on `to`. Does nothing if `from` is empty.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        match self.take(from) {
            Some(piece) => self.put(to, piece),
            None => None,
        }
    }

    pub fn clear(&mut self) {
        *self = Grid::new();
    }

    pub fn occupancy(&self) -> Bitboard {
        self.occupied
    }

    pub fn pieces(&self, color: Color) -> Bitboard {
        self.by_color[color.as_index()]
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> Bitboard {
        let mut board = Bitboard::none();
        for sq in self.pieces(color) {
            if self.slots[sq.as_index()].map(|p| p.kind()) == Some(kind) {
                board.set(sq);
            }
        }

        board
    }

    /// Whether every square strictly between `from` and `to` is empty.
    pub fn is_between_clear(&self, from: Square, to: Square) -> bool {
        movement::between(from, to).and(self.occupied).empty()
    }

    /// The squares of every piece of color `by` that could capture on
    /// `target` right now. This is a raw attack test: it never asks whether
    /// the capture would be legal, so it is safe to call from inside the
    /// legality checks themselves.
    pub fn attackers(&self, target: Square, by: Color) -> Bitboard {
        let mut attacks = Bitboard::none();
        for sq in self.pieces(by) {
            let piece = match self.piece_at(sq) {
                Some(piece) => piece,
                None => continue,
            };

            if !movement::attacks(piece, sq, target) {
                continue;
            }

            // Knights jump and the remaining non-sliders only ever attack
            // their neighbors, so only sliders can be blocked.
            if piece.is_sliding() && !self.is_between_clear(sq, target) {
                continue;
            }

            attacks.set(sq);
        }

        attacks
    }

    pub fn is_attacked(&self, target: Square, by: Color) -> bool {
        !self.attackers(target, by).empty()
    }

    /// Whether the king of the given color is attacked. A board without a
    /// king of that color is never in check.
    pub fn is_check(&self, color: Color) -> bool {
        for king in self.pieces_of_kind(color, PieceKind::King) {
            if self.is_attacked(king, color.toggle()) {
                return true;
            }
        }

        false
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(kind: PieceKind) -> Piece {
        Piece::new(kind, Color::White)
    }

    fn black(kind: PieceKind) -> Piece {
        Piece::new(kind, Color::Black)
    }

    #[test]
    fn put_and_take_track_occupancy() {
        let mut grid = Grid::new();
        assert_eq!(None, grid.put(Square::E4, white(PieceKind::Knight)));
        assert!(grid.occupancy().test(Square::E4));
        assert!(grid.pieces(Color::White).test(Square::E4));

        let displaced = grid.put(Square::E4, black(PieceKind::Bishop));
        assert_eq!(Some(white(PieceKind::Knight)), displaced);
        assert!(!grid.pieces(Color::White).test(Square::E4));
        assert!(grid.pieces(Color::Black).test(Square::E4));

        assert_eq!(Some(black(PieceKind::Bishop)), grid.take(Square::E4));
        assert!(grid.occupancy().empty());
        assert_eq!(None, grid.take(Square::E4));
    }

    #[test]
    fn relocate_returns_captured() {
        let mut grid = Grid::new();
        grid.put(Square::A1, white(PieceKind::Rook));
        grid.put(Square::A8, black(PieceKind::Rook));
        let captured = grid.relocate(Square::A1, Square::A8);
        assert_eq!(Some(black(PieceKind::Rook)), captured);
        assert_eq!(Some(white(PieceKind::Rook)), grid.piece_at(Square::A8));
        assert_eq!(None, grid.piece_at(Square::A1));
        assert_eq!(1, grid.occupancy().count());
    }

    #[test]
    fn sliders_are_blocked() {
        let mut grid = Grid::new();
        grid.put(Square::A1, white(PieceKind::Rook));
        assert!(grid.is_attacked(Square::A8, Color::White));

        grid.put(Square::A4, black(PieceKind::Pawn));
        assert!(!grid.is_attacked(Square::A8, Color::White));
        assert!(grid.is_attacked(Square::A4, Color::White));
    }

    #[test]
    fn knights_jump() {
        let mut grid = Grid::new();
        grid.put(Square::B1, white(PieceKind::Knight));
        grid.put(Square::B2, white(PieceKind::Pawn));
        grid.put(Square::C2, white(PieceKind::Pawn));
        assert!(grid.is_attacked(Square::C3, Color::White));
        assert!(grid.is_attacked(Square::A3, Color::White));
    }

    #[test]
    fn pawns_attack_empty_diagonals() {
        let mut grid = Grid::new();
        grid.put(Square::F2, black(PieceKind::Pawn));
        assert!(grid.is_attacked(Square::E1, Color::Black));
        assert!(grid.is_attacked(Square::G1, Color::Black));
        assert!(!grid.is_attacked(Square::F1, Color::Black));
    }

    #[test]
    fn attackers_lists_every_attacker() {
        let mut grid = Grid::new();
        grid.put(Square::E1, white(PieceKind::King));
        grid.put(Square::E8, black(PieceKind::Rook));
        grid.put(Square::B4, black(PieceKind::Bishop));
        grid.put(Square::D3, black(PieceKind::Knight));
        let attackers = grid.attackers(Square::E1, Color::Black);
        assert_eq!(3, attackers.count());
        assert!(grid.is_check(Color::White));
    }

    #[test]
    fn missing_king_is_not_in_check() {
        let mut grid = Grid::new();
        grid.put(Square::E8, black(PieceKind::Queen));
        assert!(!grid.is_check(Color::White));
    }
}
