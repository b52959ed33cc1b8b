// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;

use std::fs::File;
use std::process;
use std::time::{Duration, Instant};

use caissa::search::{CsvDataRecorder, DataRecorder, NullDataRecorder, Searcher};
use caissa::{perft, History, Position};
use clap::{App, Arg, ArgMatches, SubCommand};

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand(
            SubCommand::with_name("perft")
                .about("Count the legal move tree of a position to a fixed depth")
                .arg(
                    Arg::with_name("FEN")
                        .help("FEN string for a board position")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to count")
                        .value_name("DEPTH")
                        .short("-d")
                        .long("--depth")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("bestmove")
                .about("Search a position for the best move under a time budget")
                .arg(
                    Arg::with_name("FEN")
                        .help("FEN string for a board position")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("time")
                        .help("Time budget, in seconds")
                        .value_name("SECONDS")
                        .short("-t")
                        .long("--time")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("data")
                        .help("Write per-iteration search statistics to a CSV file")
                        .value_name("FILE")
                        .long("--data")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("worst")
                        .help("Play the worst move instead of the best")
                        .long("--worst"),
                ),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("perft") {
        run_perft(matches);
    }

    if let Some(matches) = matches.subcommand_matches("bestmove") {
        run_bestmove(matches);
    }
}

fn run_perft(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap();
    let depth = value_t_or_exit!(matches, "depth", u32);
    let pos = match Position::from_fen(fen) {
        Ok(pos) => pos,
        Err(err) => {
            println!("invalid fen: {:?}", err);
            process::exit(1);
        }
    };

    println!("fen:   {}", fen);
    println!("depth: {}", depth);
    println!();
    println!("{}", pos);
    println!();
    for i in 1..depth + 1 {
        let start = Instant::now();
        let results = perft(&pos, i);
        let duration = start.elapsed();
        println!("perft({}) = {} ({} ms)", i, results, duration.as_millis());
    }

    process::exit(0);
}

fn run_bestmove(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap();
    let seconds = if matches.is_present("time") {
        value_t_or_exit!(matches, "time", f64)
    } else {
        5.0
    };

    let (pos, halfmove, fullmove) = match Position::from_fen_with_clocks(fen) {
        Ok(parsed) => parsed,
        Err(err) => {
            println!("invalid fen: {:?}", err);
            process::exit(1);
        }
    };

    let mut history = History::new();
    history.record_position(pos.clone());
    history.seed_counters(halfmove);

    println!("fen:    {}", fen);
    println!("budget: {}s (move {})", seconds, fullmove);
    println!();
    println!("{}", pos);

    let recorder: Box<dyn DataRecorder> = if let Some(path) = matches.value_of("data") {
        match File::create(path) {
            Ok(file) => Box::new(CsvDataRecorder::new(file)),
            Err(err) => {
                println!("cannot open data file: {}", err);
                process::exit(1);
            }
        }
    } else {
        Box::new(NullDataRecorder)
    };

    let mut searcher = Searcher::new();
    searcher.set_worst_mode(matches.is_present("worst"));
    let result = searcher.search(
        &pos,
        &history,
        Duration::from_secs_f64(seconds),
        recorder.as_ref(),
    );

    match result {
        Some(result) => {
            println!("best move: {}", result.best_move);
            println!("    score: {}", result.score);
            println!("    depth: {}", result.depth);
            println!("    nodes: {}", result.nodes_searched);
        }
        None => println!("no legal moves in this position"),
    }

    process::exit(0);
}
