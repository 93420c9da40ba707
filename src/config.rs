// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// The smallest position log that still sees every repetition. Positions can
/// only recur while no pawn has moved and nothing has been captured, and the
/// fifty-move rule ends the game after 100 such half-moves.
pub const MIN_POSITION_CAPACITY: usize = 101;

pub const DEFAULT_POSITION_CAPACITY: usize = 256;
pub const DEFAULT_MOVE_CAPACITY: usize = 1024;

/// Tunables for a `Board`. Both logs are rings: once full, the oldest entry
/// is dropped for every new one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    pub position_capacity: usize,
    pub move_capacity: usize,
}

impl BoardConfig {
    /// Returns this configuration with the position capacity raised to
    /// `MIN_POSITION_CAPACITY` if it was set lower.
    pub fn normalized(self) -> BoardConfig {
        if self.position_capacity >= MIN_POSITION_CAPACITY {
            return self;
        }

        warn!(
            "position capacity {} too small for repetition detection, using {}",
            self.position_capacity, MIN_POSITION_CAPACITY
        );
        BoardConfig {
            position_capacity: MIN_POSITION_CAPACITY,
            ..self
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            position_capacity: DEFAULT_POSITION_CAPACITY,
            move_capacity: DEFAULT_MOVE_CAPACITY,
        }
    }
}
