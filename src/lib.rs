// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A bitboard chess engine. The crate provides:
//!
//!   * Representation of chess positions, including parsing FEN notation
//!   * Full legal move generation via set-wise ray fills
//!   * Application of moves to chess positions
//!   * Terminal detection: checkmate, stalemate, repetition, the fifty-move
//!     rule, and insufficient material
//!   * An iterative-deepening alpha-beta searcher with quiescence extension
//!     and history-heuristic move ordering, under a soft time budget

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;
#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate serde_derive;

pub mod attacks;
mod bitboard;
mod clock;
mod engine;
pub mod eval;
mod history;
mod move_generator;
mod moves;
mod outcome;
mod perft;
mod position;
pub mod search;
mod types;

pub use crate::bitboard::{Bitboard, BitboardIterator, SingletonIterator};
pub use crate::clock::move_budget;
pub use crate::engine::{Decision, Engine};
pub use crate::history::History;
pub use crate::move_generator::{MoveGenerator, MoveVec};
pub use crate::moves::{Move, MoveFlags};
pub use crate::outcome::{insufficient_material, terminal_test, Outcome};
pub use crate::perft::perft;
pub use crate::position::{FenParseError, InvalidPosition, Position};
pub use crate::types::{Color, Direction, File, Piece, PieceKind, Rank, Square};
