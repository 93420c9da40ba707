// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Castling, en passant and promotion. Each of these carries state beyond a
//! plain piece move: the moved flags of king and rook, the record of the
//! last double pawn step, and the caller's choice of promotion piece.
use crate::board::{back_rank_square, Board, MoveError, Special};
use crate::observer::BoardObserver;
use crate::types::{Color, File, Piece, PieceKind, Square};

/// The pawn that just advanced two squares. It can be captured en passant
/// on the very next half-move only; every other move clears the record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EnPassant {
    pub color: Color,
    pub from: Square,
    pub to: Square,
}

//
// En passant
//

impl Board {
    /// If moving the piece on `from` to `to` is an en passant capture,
    /// returns the square of the pawn it captures. That pawn stands on the
    /// rank being moved from and the file being moved into.
    pub(crate) fn en_passant_victim(&self, from: Square, to: Square) -> Option<Square> {
        let pawn = self.piece_at(from)?;
        if pawn.kind() != PieceKind::Pawn || self.piece_at(to).is_some() {
            return None;
        }

        let (rank_delta, file_delta) = from.delta(to);
        if rank_delta != pawn.color.forward() || file_delta.abs() != 1 {
            return None;
        }

        let record = self.en_passant()?;
        if record.color == pawn.color {
            return None;
        }

        if record.to.rank() != from.rank() || record.to.file() != to.file() {
            return None;
        }

        match self.piece_at(record.to) {
            Some(victim) if victim.kind() == PieceKind::Pawn && victim.color == record.color => {
                Some(record.to)
            }
            _ => None,
        }
    }
}

//
// Castling
//

impl Board {
    /// Validates a king's two-file step as a castle. The king must not be in
    /// check, an unmoved rook of its own color must stand on the edge file
    /// it is heading for, everything between the two must be empty and none
    /// of the squares the king stands on or crosses may be attacked.
    pub(crate) fn check_castle(
        &self,
        from: Square,
        to: Square,
        king: Piece,
    ) -> Result<Special, MoveError> {
        let color = king.color;
        if self.is_check(color) {
            return Err(MoveError::CastleBlockedByCheck);
        }

        let (_, file_delta) = from.delta(to);
        let step = file_delta.signum();
        let rook_file = if step > 0 { File::H } else { File::A };
        let rook_from = Square::of(from.rank(), rook_file);
        let rook = match self.piece_at(rook_from) {
            Some(rook) if rook.kind() == PieceKind::Rook && rook.color == color => rook,
            _ => return Err(MoveError::CastleBlockedByMissingRook),
        };

        if king.has_moved() || rook.has_moved() {
            return Err(MoveError::CastleBlockedByMovedPiece);
        }

        if !self.grid().is_between_clear(from, rook_from) {
            return Err(MoveError::PathBlocked);
        }

        let mut transit = Some(from);
        while let Some(sq) = transit {
            if self.is_attacked(sq, color.toggle()) {
                return Err(MoveError::CastleBlockedByAttackedTransit);
            }

            if sq == to {
                break;
            }

            transit = sq.offset(0, step);
        }

        // The rook lands next to the king on the side the king came from:
        // the F file when castling kingside, the D file when queenside.
        let rook_to = to
            .offset(0, -step)
            .ok_or(MoveError::CastleBlockedByMissingRook)?;
        Ok(Special::Castle { rook_from, rook_to })
    }

    /// Moves the castling rook and marks it as moved.
    pub(crate) fn castle_rook(&mut self, rook_from: Square, rook_to: Square) {
        if let Ok(mut rook) = self.remove(rook_from) {
            rook.mark_moved();
            self.place_or_replace(rook, rook_to);
        }
    }

    /// Whether `color` could castle on the given side right now, were it
    /// their turn.
    pub fn can_castle(&self, color: Color, kingside: bool) -> bool {
        let from = back_rank_square(color, File::E);
        let to = back_rank_square(color, if kingside { File::G } else { File::C });
        match self.piece_at(from) {
            Some(king) if king.kind() == PieceKind::King && king.color == color => {
                self.check_move(from, to, king).is_ok()
            }
            _ => false,
        }
    }
}

//
// Promotion
//

/// The piece a pawn of `color` turns into for a requested kind. Anything
/// other than a queen, rook, bishop or knight, including no choice at all,
/// yields a queen.
pub fn promotion_piece(choice: Option<PieceKind>, color: Color) -> Piece {
    let kind = match choice {
        Some(PieceKind::Rook) => PieceKind::Rook,
        Some(PieceKind::Bishop) => PieceKind::Bishop,
        Some(PieceKind::Knight) => PieceKind::Knight,
        Some(PieceKind::Queen) | None => PieceKind::Queen,
        Some(other) => {
            warn!("cannot promote to {}, promoting to queen", other.name());
            PieceKind::Queen
        }
    };

    let mut piece = Piece::new(kind, color);

    // A promoted rook arrives by moving, so it can never castle.
    piece.mark_moved();
    piece
}

impl Board {
    /// Replaces the pawn on `square` with the chosen piece.
    pub(crate) fn promote(
        &mut self,
        square: Square,
        choice: Option<PieceKind>,
        observer: &mut dyn BoardObserver,
    ) {
        let pawn = match self.piece_at(square) {
            Some(pawn) if pawn.kind() == PieceKind::Pawn => pawn,
            _ => return,
        };

        let piece = promotion_piece(choice, pawn.color);
        self.place_or_replace(piece, square);
        debug!("pawn on {} promoted to {}", square, piece.kind().name());
        observer.promoted(square, piece);
    }
}
