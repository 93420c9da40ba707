// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use hashbrown::HashMap;
use std::collections::vec_deque::{self, VecDeque};
use std::fmt;

use crate::config::BoardConfig;
use crate::grid::Grid;
use crate::types::{Color, Square, TableIndex, SQUARES};

/// A canonical encoding of a position for repetition counting: one byte per
/// square (a piece letter, uppercase for White, or a space) plus the side to
/// move. Castling and en passant rights are not part of it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PositionSnapshot {
    cells: [u8; 64],
    side_to_move: Color,
}

impl PositionSnapshot {
    pub fn capture(grid: &Grid, side_to_move: Color) -> PositionSnapshot {
        let mut cells = [b' '; 64];
        for &sq in SQUARES.iter() {
            if let Some(piece) = grid.piece_at(sq) {
                cells[sq.as_index()] = piece.symbol() as u8;
            }
        }

        PositionSnapshot {
            cells,
            side_to_move,
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The symbol stored for a square, `' '` when it is empty.
    pub fn cell(&self, square: Square) -> char {
        self.cells[square.as_index()] as char
    }
}

impl fmt::Display for PositionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &cell in self.cells.iter() {
            write!(f, "{}", cell as char)?;
        }

        match self.side_to_move {
            Color::White => write!(f, " w"),
            Color::Black => write!(f, " b"),
        }
    }
}

/// One committed move, kept for inspection only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MoveLogEntry {
    pub from: Square,
    pub to: Square,
}

impl fmt::Display for MoveLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Bounded move and position logs. Alongside the position ring the history
/// keeps a count per distinct snapshot, so asking how often a position has
/// occurred does not scan the log. Evicting a snapshot from the ring
/// decrements its count.
#[derive(Clone, Debug)]
pub struct History {
    moves: VecDeque<MoveLogEntry>,
    positions: VecDeque<PositionSnapshot>,
    occurrences: HashMap<PositionSnapshot, usize>,
    config: BoardConfig,
}

impl History {
    pub fn new(config: BoardConfig) -> History {
        let config = config.normalized();
        History {
            moves: VecDeque::new(),
            positions: VecDeque::new(),
            occurrences: HashMap::new(),
            config,
        }
    }

    pub fn push_move(&mut self, entry: MoveLogEntry) {
        if self.config.move_capacity == 0 {
            return;
        }

        while self.moves.len() >= self.config.move_capacity {
            self.moves.pop_front();
        }

        self.moves.push_back(entry);
    }

    pub fn push_position(&mut self, snapshot: PositionSnapshot) {
        while self.positions.len() >= self.config.position_capacity {
            if let Some(evicted) = self.positions.pop_front() {
                self.forget(&evicted);
            }
        }

        self.positions.push_back(snapshot);
        *self.occurrences.entry(snapshot).or_insert(0) += 1;
    }

    /// How many stored snapshots equal the given one.
    pub fn occurrences(&self, snapshot: &PositionSnapshot) -> usize {
        self.occurrences.get(snapshot).cloned().unwrap_or(0)
    }

    pub fn moves(&self) -> vec_deque::Iter<MoveLogEntry> {
        self.moves.iter()
    }

    pub fn positions(&self) -> vec_deque::Iter<PositionSnapshot> {
        self.positions.iter()
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn clear(&mut self) {
        self.moves.clear();
        self.positions.clear();
        self.occurrences.clear();
    }

    fn forget(&mut self, snapshot: &PositionSnapshot) {
        let remove = match self.occurrences.get_mut(snapshot) {
            Some(count) => {
                *count -= 1;
                *count == 0
            }
            None => false,
        };

        if remove {
            self.occurrences.remove(snapshot);
        }
    }
}
