// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Movement patterns for every piece variant. Nothing in this module looks
//! at the board: whether a square is occupied, whether a path is clear and
//! whether a move exposes the king are all decided by the board itself.
use crate::bitboard::Bitboard;
use crate::types::{Piece, Square, TableIndex, Variant, SQUARES};

/// Returns whether the shape of a move from `from` to `to` matches the
/// movement pattern of `piece`.
///
/// Pawn diagonals are accepted here even though they are only legal as
/// captures, and an unmoved king accepts a two-file sideways step, which is
/// the castling pattern.
pub fn can_move(piece: Piece, from: Square, to: Square) -> bool {
    let (rank_delta, file_delta) = from.delta(to);
    let (rank_dist, file_dist) = (rank_delta.abs(), file_delta.abs());
    match piece.variant {
        Variant::Pawn => {
            let dir = piece.color.forward();
            if rank_delta == dir && file_dist <= 1 {
                return true;
            }

            file_delta == 0 && rank_delta == 2 * dir && from.rank() == piece.color.pawn_rank()
        }
        Variant::Knight => (rank_dist == 1 && file_dist == 2) || (rank_dist == 2 && file_dist == 1),
        Variant::Bishop => is_diagonal(rank_dist, file_dist),
        Variant::Rook { .. } => is_straight(rank_dist, file_dist),
        Variant::Queen => is_diagonal(rank_dist, file_dist) || is_straight(rank_dist, file_dist),
        Variant::King { has_moved } => {
            if is_adjacent(rank_dist, file_dist) {
                return true;
            }

            !has_moved && rank_dist == 0 && file_dist == 2
        }
    }
}

/// Returns whether `piece` standing on `from` could capture something on
/// `to`, ignoring what lies in between. This differs from `can_move` in
/// exactly two places: pawns only ever attack their forward diagonals, and
/// the castling step is not an attack.
pub fn attacks(piece: Piece, from: Square, to: Square) -> bool {
    let (rank_delta, file_delta) = from.delta(to);
    match piece.variant {
        Variant::Pawn => rank_delta == piece.color.forward() && file_delta.abs() == 1,
        Variant::King { .. } => is_adjacent(rank_delta.abs(), file_delta.abs()),
        _ => can_move(piece, from, to),
    }
}

/// The squares strictly between `from` and `to` when they share a rank,
/// file or diagonal. Empty for every other pair, and for neighbors.
pub fn between(from: Square, to: Square) -> Bitboard {
    BETWEEN_TABLE.between(from, to)
}

fn is_diagonal(rank_dist: i32, file_dist: i32) -> bool {
    rank_dist == file_dist && rank_dist != 0
}

fn is_straight(rank_dist: i32, file_dist: i32) -> bool {
    (rank_dist == 0) != (file_dist == 0)
}

fn is_adjacent(rank_dist: i32, file_dist: i32) -> bool {
    rank_dist <= 1 && file_dist <= 1 && rank_dist + file_dist != 0
}

struct BetweenTable {
    table: [[Bitboard; 64]; 64],
}

impl BetweenTable {
    pub fn new() -> BetweenTable {
        let mut bt = BetweenTable {
            table: [[Bitboard::none(); 64]; 64],
        };

        for &from in SQUARES.iter() {
            for &to in SQUARES.iter() {
                let (rank_delta, file_delta) = from.delta(to);
                let (rank_dist, file_dist) = (rank_delta.abs(), file_delta.abs());
                if !is_diagonal(rank_dist, file_dist) && !is_straight(rank_dist, file_dist) {
                    continue;
                }

                let (rank_step, file_step) = (rank_delta.signum(), file_delta.signum());
                let mut board = Bitboard::none();
                let mut cursor = from.offset(rank_step, file_step);
                while let Some(sq) = cursor {
                    if sq == to {
                        break;
                    }

                    board.set(sq);
                    cursor = sq.offset(rank_step, file_step);
                }

                bt.table[from.as_index()][to.as_index()] = board;
            }
        }

        bt
    }

    pub fn between(&self, from: Square, to: Square) -> Bitboard {
        self.table[from.as_index()][to.as_index()]
    }
}

lazy_static! {
    static ref BETWEEN_TABLE: BetweenTable = BetweenTable::new();
}
