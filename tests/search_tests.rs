// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::time::Duration;

use caissa::search::{NullDataRecorder, Searcher};
use caissa::{terminal_test, Decision, Engine, History, MoveGenerator, Outcome, Position};

fn search(fen: &str, budget: Duration) -> caissa::search::SearchResult {
    let pos = Position::from_fen(fen).unwrap();
    let mut history = History::new();
    history.record_position(pos.clone());
    Searcher::new()
        .search(&pos, &history, budget, &NullDataRecorder)
        .expect("position has legal moves")
}

#[test]
fn mate_in_one_is_found_and_played() {
    // The classic scholar's mate battery: Qxf7 ends it.
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 1";
    let result = search(fen, Duration::from_millis(500));
    assert_eq!(f32::INFINITY, result.score);

    // The successor of the chosen move really is checkmate.
    let mut pos = Position::from_fen(fen).unwrap();
    pos.apply_move(result.best_move);
    assert_eq!(Outcome::Checkmate, terminal_test(&pos, &History::new()));
}

#[test]
fn a_bigger_budget_never_lowers_a_settled_mate_score() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 1";
    let quick = search(fen, Duration::from_millis(50));
    let long = search(fen, Duration::from_millis(500));
    assert!(long.score >= quick.score);
}

#[test]
fn zero_budget_returns_some_legal_move() {
    let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    let result = search(fen, Duration::from_secs(0));

    let pos = Position::from_fen(fen).unwrap();
    let legal = MoveGenerator::new().legal_moves(&pos);
    assert!(legal.contains(&result.best_move));
}

#[test]
fn engine_refuses_to_move_in_a_finished_game() {
    let mut engine = Engine::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(Decision::Terminal(Outcome::Stalemate), engine.choose_move());
}

#[test]
fn engine_plays_through_a_mate_threat() {
    // White mates in one; the engine should play it and then report the
    // finished game from Black's seat.
    let mut engine =
        Engine::from_fen("r1bqkbnr/pppp1ppp/2n5/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 1")
            .unwrap();
    engine.set_time_remaining(60.0);

    match engine.choose_move() {
        Decision::Move(_) => {}
        Decision::Terminal(outcome) => panic!("expected a move, got {:?}", outcome),
    }

    assert_eq!(Decision::Terminal(Outcome::Checkmate), engine.choose_move());
}

#[test]
fn primed_repetition_ring_is_a_draw() {
    // A bare-bones shuffle: with the ring primed to repeat, the draw is on
    // the table immediately.
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/3RK3 w - - 30 40").unwrap();
    let mut history = History::new();
    for _ in 0..8 {
        history.record_position(pos.clone());
    }
    history.seed_counters(30);
    assert_eq!(Outcome::RepetitionDraw, terminal_test(&pos, &history));
}
