// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;
#[macro_use]
extern crate serde_derive;

use std::convert::TryFrom;
use std::io::{self, BufRead, Write};
use std::process;

use arbiter::{
    Board, BoardConfig, BoardObserver, Color, GameStatus, MoveError, MoveLogEntry, Piece,
    PieceKind, Square,
};
use clap::{App, Arg, ArgMatches};

/// Announces everything the board reports on stdout.
struct PrintingObserver;

impl BoardObserver for PrintingObserver {
    fn game_started(&mut self) {
        println!("new game");
    }

    fn piece_captured(&mut self, square: Square, piece: Piece) {
        println!(
            "{} {} captured on {}",
            piece.color,
            piece.kind().name(),
            square
        );
    }

    fn castled(&mut self, rook_from: Square, rook_to: Square) {
        println!("castle: rook {} -> {}", rook_from, rook_to);
    }

    fn promoted(&mut self, square: Square, piece: Piece) {
        println!("pawn on {} promoted to {}", square, piece.kind().name());
    }

    fn moved(&mut self, entry: &MoveLogEntry) {
        println!("played {}", entry);
    }

    fn status_changed(&mut self, status: GameStatus) {
        println!("game status: {}", status);
    }

    fn rejected(&mut self, from: Square, to: Square, reason: MoveError) {
        println!("illegal move {}{}: {}", from, to, reason);
    }
}

#[derive(Serialize)]
struct StatusReport<'a> {
    status: GameStatus,
    turn: Color,
    check: bool,
    halfmove_clock: u32,
    fullmove_number: u32,
    moves: Vec<&'a MoveLogEntry>,
}

enum Command {
    Move(Square, Square, Option<PieceKind>),
    Place(Piece, Square),
    Remove(Square),
    Turn(Color),
    Show,
}

fn parse_square(text: &str) -> Result<Square, String> {
    Square::try_from(text).map_err(|_| format!("bad square: {}", text))
}

fn parse_command(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["show"] => Ok(Command::Show),
        ["place", piece, square] => {
            let mut chars = piece.chars();
            let piece = match (chars.next(), chars.next()) {
                (Some(c), None) => Piece::try_from(c).map_err(|_| format!("bad piece: {}", c))?,
                _ => return Err(format!("bad piece: {}", piece)),
            };
            Ok(Command::Place(piece, parse_square(square)?))
        }
        ["remove", square] => Ok(Command::Remove(parse_square(square)?)),
        ["turn", "white"] | ["turn", "w"] => Ok(Command::Turn(Color::White)),
        ["turn", "black"] | ["turn", "b"] => Ok(Command::Turn(Color::Black)),
        [from, to] => Ok(Command::Move(parse_square(from)?, parse_square(to)?, None)),
        [mv] if mv.is_ascii() && (mv.len() == 4 || mv.len() == 5) => {
            let from = parse_square(&mv[0..2])?;
            let to = parse_square(&mv[2..4])?;
            let promotion = match mv[4..].chars().next() {
                Some(c) => {
                    Some(PieceKind::try_from(c).map_err(|_| format!("bad promotion: {}", c))?)
                }
                None => None,
            };
            Ok(Command::Move(from, to, promotion))
        }
        _ => Err(format!("unrecognized command: {}", line)),
    }
}

fn report(board: &Board, json: bool) {
    if json {
        let report = StatusReport {
            status: board.status(),
            turn: board.current_turn(),
            check: board.is_check(board.current_turn()),
            halfmove_clock: board.halfmove_clock(),
            fullmove_number: board.fullmove_number(),
            moves: board.move_log().collect(),
        };
        match serde_json::to_string(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("failed to serialize status: {}", e),
        }
        return;
    }

    println!("{}", board);
    println!("{} to move, {}", board.current_turn(), board.status());
    if board.is_check(board.current_turn()) {
        println!("check!");
    }
}

fn config_from(matches: &ArgMatches) -> BoardConfig {
    let mut config = BoardConfig::default();
    if matches.is_present("positions") {
        config.position_capacity = value_t_or_exit!(matches, "positions", usize);
    }

    if matches.is_present("moves") {
        config.move_capacity = value_t_or_exit!(matches, "moves", usize);
    }

    config
}

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .arg(
            Arg::with_name("json")
                .help("Print the game status as JSON after every move")
                .long("--json"),
        )
        .arg(
            Arg::with_name("empty")
                .help("Start from an empty board instead of the standard setup")
                .long("--empty"),
        )
        .arg(
            Arg::with_name("positions")
                .help("Number of positions kept for repetition detection")
                .value_name("N")
                .long("--positions")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("moves")
                .help("Number of moves kept in the move log")
                .value_name("N")
                .long("--moves")
                .takes_value(true),
        )
        .get_matches();

    let json = matches.is_present("json");
    let mut board = Board::with_config(config_from(&matches));
    let mut observer = PrintingObserver;
    let mut setting_up = matches.is_present("empty");
    if !setting_up {
        board.initialize_standard_game_observed(&mut observer);
    }

    report(&board, json);
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("failed to read input: {}", e);
                process::exit(1);
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line == "quit" {
            break;
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };

        match command {
            Command::Move(from, to, promotion) => {
                if setting_up {
                    // the setup position counts towards repetitions.
                    board.record_position();
                    setting_up = false;
                }

                if board
                    .attempt_move_observed(from, to, promotion, &mut observer)
                    .is_ok()
                {
                    report(&board, json);
                }
            }
            Command::Place(piece, square) => {
                if let Err(e) = board.place(piece, square) {
                    println!("{}", e);
                }
            }
            Command::Remove(square) => {
                if let Err(e) = board.remove(square) {
                    println!("{}", e);
                }
            }
            Command::Turn(color) => board.set_current_turn(color),
            Command::Show => report(&board, json),
        }

        let _ = io::stdout().flush();
    }
}
