// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Time allocation. The per-move budget is a slice of the remaining clock,
//! shaped by a Gaussian over the half-move number so that spending peaks
//! around the fortieth full move and tapers off in the opening and the
//! endgame.
use std::time::Duration;

const BASE_FRACTION: f64 = 0.035;
const PEAK_HALF_MOVE: f64 = 80.0;
const SPREAD: f64 = 35.0;

/// Computes the time budget for the next move, given the half-move number
/// and the remaining clock time in seconds.
pub fn move_budget(half_move_number: u32, time_remaining: f64) -> Duration {
    let n = f64::from(half_move_number);
    let hump = (-(n - PEAK_HALF_MOVE).powi(2) / (2.0 * SPREAD * SPREAD)).exp();
    let seconds = time_remaining * BASE_FRACTION * (0.1 + hump);
    Duration::from_secs_f64(seconds.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_peaks_in_the_middlegame() {
        let opening = move_budget(2, 300.0);
        let middlegame = move_budget(80, 300.0);
        let endgame = move_budget(200, 300.0);

        assert!(middlegame > opening);
        assert!(middlegame > endgame);
    }

    #[test]
    fn budget_scales_with_remaining_time() {
        assert!(move_budget(80, 300.0) > move_budget(80, 30.0));
    }

    #[test]
    fn budget_at_the_peak_matches_the_curve() {
        // At the peak the Gaussian term is 1, so the slice is 3.85% of the
        // remaining time.
        let budget = move_budget(80, 100.0);
        assert!((budget.as_secs_f64() - 3.85).abs() < 1e-6);
    }

    #[test]
    fn exhausted_clock_yields_a_zero_budget() {
        assert_eq!(Duration::from_secs(0), move_budget(40, 0.0));
    }
}
