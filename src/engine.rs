// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The engine driver: a stateful wrapper that owns the current position and
//! game history, allocates time per move, runs the searcher, and keeps the
//! bookkeeping straight as moves are played on both sides of the board.
use std::time::Instant;

use crate::clock;
use crate::history::History;
use crate::moves::Move;
use crate::outcome::{self, Outcome};
use crate::position::{FenParseError, Position};
use crate::search::{NullDataRecorder, Searcher};

/// The default clock the engine assumes until told otherwise, in seconds.
const DEFAULT_CLOCK: f64 = 300.0;

/// The engine's answer when asked for a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The chosen move, already applied to the engine's own position.
    Move(Move),
    /// The game is over; there is no move to make.
    Terminal(Outcome),
}

pub struct Engine {
    position: Position,
    history: History,
    searcher: Searcher,
    time_remaining: f64,
    half_move_number: u32,
}

impl Engine {
    /// Creates an engine playing from the given position, assumed to start
    /// at move one with fresh counters.
    pub fn new(position: Position) -> Engine {
        let mut history = History::new();
        history.record_position(position.clone());

        Engine {
            position,
            history,
            searcher: Searcher::new(),
            time_remaining: DEFAULT_CLOCK,
            half_move_number: 0,
        }
    }

    /// Creates an engine from a FEN record, seeding the irreversibility
    /// counters from the half-move clock and the half-move number from the
    /// full-move number.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Engine, FenParseError> {
        let (position, halfmove_clock, fullmove_number) = Position::from_fen_with_clocks(fen)?;
        let mut engine = Engine::new(position);
        engine.history.seed_counters(halfmove_clock);
        engine.half_move_number = 2 * fullmove_number;
        Ok(engine)
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Tells the engine how much clock time it has left, in seconds.
    pub fn set_time_remaining(&mut self, seconds: f64) {
        self.time_remaining = seconds;
    }

    /// Puts the engine in worst-move mode, where it plays the move it
    /// likes least.
    pub fn set_worst_mode(&mut self, enabled: bool) {
        self.searcher.set_worst_mode(enabled);
    }

    /// Chooses a move for the side to play, applies it to the engine's own
    /// position, and returns it. On a finished game, returns the terminal
    /// outcome instead.
    pub fn choose_move(&mut self) -> Decision {
        let outcome = outcome::terminal_test(&self.position, &self.history);
        if outcome.is_terminal() {
            return Decision::Terminal(outcome);
        }

        let budget = clock::move_budget(self.half_move_number, self.time_remaining);
        let start = Instant::now();
        let result = self
            .searcher
            .search(&self.position, &self.history, budget, &NullDataRecorder)
            .expect("nonterminal position must have a move");

        info!(
            "chose {} (score {}, depth {}, {} nodes, budget {:?})",
            result.best_move, result.score, result.depth, result.nodes_searched, budget
        );

        self.advance(result.best_move);
        self.time_remaining -= start.elapsed().as_secs_f64();
        Decision::Move(result.best_move)
    }

    /// Folds the opponent's reply into the engine's state. The move must be
    /// legal in the current position.
    pub fn apply_external_move(&mut self, mov: Move) {
        self.advance(mov);
    }

    fn advance(&mut self, mov: Move) {
        self.position.apply_move(mov);
        debug_assert!(
            self.position.validate().is_ok(),
            "move application broke a position invariant"
        );
        self.history.record_position(self.position.clone());
        self.history.record_move(mov);
        self.half_move_number += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generator::MoveGenerator;
    use crate::types::Color;

    #[test]
    fn engine_plays_a_legal_opening_move() {
        let mut engine = Engine::new(Position::from_start_position());
        engine.set_time_remaining(1.0);

        let legal = MoveGenerator::new().legal_moves(engine.position());
        match engine.choose_move() {
            Decision::Move(mov) => {
                assert!(legal.contains(&mov));
                assert_eq!(Color::Black, engine.position().side_to_move());
            }
            Decision::Terminal(outcome) => panic!("unexpected terminal outcome {:?}", outcome),
        }
    }

    #[test]
    fn engine_reports_checkmate_instead_of_moving() {
        let mut engine = Engine::from_fen("R5k1/5ppp/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(Decision::Terminal(Outcome::Checkmate), engine.choose_move());
    }

    #[test]
    fn engine_tracks_external_moves() {
        let mut engine = Engine::new(Position::from_start_position());
        let legal = MoveGenerator::new().legal_moves(engine.position());
        engine.apply_external_move(legal[0]);
        assert_eq!(Color::Black, engine.position().side_to_move());
        assert_eq!(2, engine.history().len());
    }

    #[test]
    fn from_fen_seeds_the_counters() {
        let engine = Engine::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 12 30").unwrap();
        assert_eq!(12, engine.history().moves_since_capture());
        assert_eq!(12, engine.history().moves_since_pawn_move());
    }
}
