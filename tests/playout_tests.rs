// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Randomized playouts from the starting position. Every position reached
//! through generated legal moves must uphold the structural invariants of
//! the board representation; the seeds are fixed so failures replay.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use caissa::{terminal_test, History, MoveGenerator, Position};

const PLAYOUT_PLIES: usize = 80;

fn random_playout(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let gen = MoveGenerator::new();

    let mut pos = Position::from_start_position();
    let mut history = History::new();
    history.record_position(pos.clone());

    for ply in 0..PLAYOUT_PLIES {
        if terminal_test(&pos, &history).is_terminal() {
            break;
        }

        let moves = gen.legal_moves(&pos);
        assert!(!moves.is_empty(), "nonterminal position with no moves");

        let mov = moves[rng.gen_range(0, moves.len())];
        pos.apply_move(mov);
        assert_eq!(
            Ok(()),
            pos.validate(),
            "seed {} broke an invariant at ply {} with {}",
            seed,
            ply,
            mov
        );

        history.record_position(pos.clone());
        history.record_move(mov);
    }
}

#[test]
fn playouts_uphold_position_invariants() {
    for seed in 0..8 {
        random_playout(seed);
    }
}
