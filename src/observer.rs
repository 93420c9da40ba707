// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::board::MoveError;
use crate::history::MoveLogEntry;
use crate::outcome::GameStatus;
use crate::types::{Piece, Square};

/// Receiver for the things a host may want to announce as a game goes on.
/// The board never prints anything itself; it reports to an observer and
/// the host decides what to do with it. Every method defaults to doing
/// nothing.
///
/// Events are only reported for moves that are committed, after validation
/// has finished, apart from `rejected`.
pub trait BoardObserver {
    fn game_started(&mut self) {}

    /// A piece was removed from `square` by a capture, including the pawn
    /// taken en passant.
    fn piece_captured(&mut self, _square: Square, _piece: Piece) {}

    /// The rook half of a castle moved from `rook_from` to `rook_to`.
    fn castled(&mut self, _rook_from: Square, _rook_to: Square) {}

    /// The pawn on `square` was replaced by `piece`.
    fn promoted(&mut self, _square: Square, _piece: Piece) {}

    fn moved(&mut self, _entry: &MoveLogEntry) {}

    fn status_changed(&mut self, _status: GameStatus) {}

    fn rejected(&mut self, _from: Square, _to: Square, _reason: MoveError) {}
}

/// An observer that ignores everything.
pub struct NullObserver;

impl BoardObserver for NullObserver {}
