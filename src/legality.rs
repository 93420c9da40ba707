// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move legality. There are two tiers here and they must stay separate:
//! raw attack detection (`Board::attackers`, backed by `Grid::attackers`)
//! only looks at movement patterns and blockers, while full legality also
//! asks whether the mover's own king ends up attacked. Attack detection
//! never calls back into full legality.
use arrayvec::ArrayVec;

use crate::bitboard::Bitboard;
use crate::board::{Board, MoveError, MovePlan, Special};
use crate::movement;
use crate::types::{Color, Piece, PieceKind, Square, SQUARES};

/// Destinations for a single piece. No piece has more than 27.
pub type DestinationVec = ArrayVec<[Square; 32]>;

impl Board {
    /// Whether a piece on `from` could travel to `to` given what stands on
    /// the board. Knights, and kings stepping to a neighbor, never need a
    /// clear path. Sliders need every square strictly between to be empty.
    /// Pawns moving forward need the destination empty as well, and pawns
    /// moving diagonally need something to capture: an enemy on `to`, or an
    /// en passant victim.
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        let piece = match self.piece_at(from) {
            Some(piece) => piece,
            None => return false,
        };

        match piece.kind() {
            PieceKind::Knight => true,
            PieceKind::Pawn => {
                let (_, file_delta) = from.delta(to);
                if file_delta != 0 {
                    return match self.piece_at(to) {
                        Some(target) => target.color != piece.color,
                        None => self.en_passant_victim(from, to).is_some(),
                    };
                }

                self.piece_at(to).is_none() && self.grid().is_between_clear(from, to)
            }
            _ => self.grid().is_between_clear(from, to),
        }
    }

    /// The squares holding pieces of color `by` that attack `target`.
    pub fn attackers(&self, target: Square, by: Color) -> Bitboard {
        self.grid().attackers(target, by)
    }

    pub fn is_attacked(&self, target: Square, by: Color) -> bool {
        self.grid().is_attacked(target, by)
    }

    /// Whether the king of `color` is attacked. Boards without such a king
    /// report false.
    pub fn is_check(&self, color: Color) -> bool {
        self.grid().is_check(color)
    }

    /// Plays `from` to `to` on a scratch copy of the board, removing the en
    /// passant victim if there is one, and reports whether `color`'s king is
    /// attacked afterwards. Turn, clocks and histories are not involved and
    /// the board itself is left exactly as it was.
    pub fn would_leave_in_check(&self, from: Square, to: Square, color: Color) -> bool {
        let mut scratch = *self.grid();
        if let Some(victim) = self.en_passant_victim(from, to) {
            scratch.take(victim);
        }

        scratch.relocate(from, to);
        scratch.is_check(color)
    }

    /// Runs every check a move has to pass apart from turn order and game
    /// state, and works out what the move will do when committed.
    pub(crate) fn check_move(
        &self,
        from: Square,
        to: Square,
        piece: Piece,
    ) -> Result<MovePlan, MoveError> {
        if !movement::can_move(piece, from, to) {
            return Err(MoveError::PatternIllegal);
        }

        if let Some(target) = self.piece_at(to) {
            if target.color == piece.color {
                return Err(MoveError::OwnPieceAtDestination);
            }
        }

        if !self.is_path_clear(from, to) {
            return Err(MoveError::PathBlocked);
        }

        let (rank_delta, file_delta) = from.delta(to);
        let special = match piece.kind() {
            PieceKind::King if file_delta.abs() == 2 => self.check_castle(from, to, piece)?,
            PieceKind::Pawn if rank_delta.abs() == 2 => Special::DoubleStep,
            PieceKind::Pawn => match self.en_passant_victim(from, to) {
                Some(captured) => Special::EnPassant { captured },
                None => Special::None,
            },
            _ => Special::None,
        };

        if self.would_leave_in_check(from, to, piece.color) {
            return Err(MoveError::LeavesKingInCheck);
        }

        let promotes = piece.kind() == PieceKind::Pawn && to.rank() == piece.color.promotion_rank();
        Ok(MovePlan {
            from,
            to,
            piece,
            special,
            promotes,
        })
    }

    /// Every square the piece on `from` may legally move to, were it that
    /// piece's turn.
    pub fn legal_destinations(&self, from: Square) -> DestinationVec {
        let mut destinations = DestinationVec::new();
        let piece = match self.piece_at(from) {
            Some(piece) => piece,
            None => return destinations,
        };

        for &to in SQUARES.iter() {
            if self.check_move(from, to, piece).is_ok() {
                destinations.push(to);
            }
        }

        destinations
    }

    /// Whether any piece of `color` has at least one legal move.
    pub fn has_any_legal_move(&self, color: Color) -> bool {
        for from in self.grid().pieces(color) {
            let piece = match self.piece_at(from) {
                Some(piece) => piece,
                None => continue,
            };

            for &to in SQUARES.iter() {
                if self.check_move(from, to, piece).is_ok() {
                    return true;
                }
            }
        }

        false
    }
}
