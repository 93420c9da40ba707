// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A chess rules engine. A `Board` holds a game in progress, accepts or
//! refuses moves according to the rules of chess, and keeps track of check,
//! mate, stalemate and the draw rules. It has no opinion on which move is
//! good; that is left to whoever drives it.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod bitboard;
mod board;
mod config;
mod grid;
mod history;
mod legality;
pub mod movement;
mod observer;
mod outcome;
mod special_moves;
mod types;

pub use bitboard::{Bitboard, BitboardIterator};
pub use board::{Board, MoveError, SetupError};
pub use config::{
    BoardConfig, DEFAULT_MOVE_CAPACITY, DEFAULT_POSITION_CAPACITY, MIN_POSITION_CAPACITY,
};
pub use history::{MoveLogEntry, PositionSnapshot};
pub use legality::DestinationVec;
pub use observer::{BoardObserver, NullObserver};
pub use outcome::{
    DrawConditions, GameStatus, MaterialCensus, SideCensus, FIFTY_MOVE_HALFMOVES, REPETITION_LIMIT,
};
pub use special_moves::{promotion_piece, EnPassant};
pub use types::{Color, File, Piece, PieceKind, Rank, Square, Variant};
pub use types::{COLORS, FILES, PIECE_KINDS, RANKS, SQUARES};
