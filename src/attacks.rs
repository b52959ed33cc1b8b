// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Set-wise target generation for every piece class. Sliding pieces are
//! handled by directional ray fills: a fill repeatedly steps a set of
//! pieces in one compass direction, intersecting with a "free squares" mask
//! after every step, so the ray grows until it includes the first blocker
//! and no further. All generators operate on whole piece sets at once and
//! return the set of reachable target squares.
use crate::bitboard::{Bitboard, BB_FILE_A, BB_FILE_AB, BB_FILE_GH, BB_FILE_H, BB_RANK_2, BB_RANK_7};
use crate::types::{Color, Direction, DIRECTIONS};

/// Fills from `origin` in direction `dir`, stepping through squares present
/// in `free`. The first six steps apply the direction's file wrap mask; the
/// seventh does not, since free-square masks for the east/west-leaning
/// directions are themselves wrap-masked and the vertical directions cannot
/// wrap at all.
pub fn fill(origin: Bitboard, free: Bitboard, dir: Direction) -> Bitboard {
    let masked_free = free.and(dir.wrap_mask());
    let mut result = origin;
    let mut frontier = origin;
    for _ in 0..6 {
        frontier = frontier.shifted(dir).and(masked_free);
        result = result.or(frontier);
    }

    result.or(frontier.shifted(dir).and(free))
}

/// The free-square mask for a sliding fill: a square may be entered if it is
/// not occupied by one of our own pieces, and the ray may continue past it
/// only if the square just stepped from did not hold an enemy piece. This
/// makes enemy pieces reachable (a capture) but impassable.
fn slide_mask(own: Bitboard, enemy: Bitboard, dir: Direction) -> Bitboard {
    own.not().and(enemy.not().step(dir))
}

/// Target squares for a set of rooks: horizontal and vertical fills, with
/// the rooks' own squares removed.
pub fn rook_targets(rooks: Bitboard, own: Bitboard, enemy: Bitboard) -> Bitboard {
    let mut result = Bitboard::none();
    for &dir in &[Direction::North, Direction::South, Direction::East, Direction::West] {
        result = result.or(fill(rooks, slide_mask(own, enemy, dir), dir));
    }

    result.xor(rooks)
}

/// Target squares for a set of bishops: diagonal fills, with the bishops'
/// own squares removed.
pub fn bishop_targets(bishops: Bitboard, own: Bitboard, enemy: Bitboard) -> Bitboard {
    let mut result = Bitboard::none();
    for &dir in &[
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ] {
        result = result.or(fill(bishops, slide_mask(own, enemy, dir), dir));
    }

    result.xor(bishops)
}

/// Target squares for a set of queens: the union of the rook and bishop
/// generators.
pub fn queen_targets(queens: Bitboard, own: Bitboard, enemy: Bitboard) -> Bitboard {
    rook_targets(queens, own, enemy) | bishop_targets(queens, own, enemy)
}

/// Target squares for a set of kings: one step in each of the eight compass
/// directions, excluding squares occupied by the king's own pieces.
pub fn king_targets(kings: Bitboard, own: Bitboard) -> Bitboard {
    let mut result = Bitboard::none();
    for &dir in &DIRECTIONS {
        result = result.or(kings.step(dir));
    }

    result.and(own.not())
}

/// Target squares for a set of knights: the eight knight offsets, each
/// masked to discard jumps that wrap around the board edge.
pub fn knight_targets(knights: Bitboard, own: Bitboard) -> Bitboard {
    let not_a = BB_FILE_A.not();
    let not_h = BB_FILE_H.not();
    let not_ab = BB_FILE_AB.not();
    let not_gh = BB_FILE_GH.not();

    (((knights << 17) & not_a)
        | ((knights >> 15) & not_a)
        | ((knights << 15) & not_h)
        | ((knights >> 17) & not_h)
        | ((knights << 10) & not_ab)
        | ((knights >> 6) & not_ab)
        | ((knights << 6) & not_gh)
        | ((knights >> 10) & not_gh))
        & own.not()
}

/// Target squares for a set of pawns: a single push onto an empty square, a
/// double push from the pawn's starting rank when both squares ahead are
/// empty, and the two diagonal captures onto enemy-occupied squares only.
pub fn pawn_targets(pawns: Bitboard, own: Bitboard, enemy: Bitboard, color: Color) -> Bitboard {
    let empty = own.or(enemy).not();
    let (ahead, capture_east, capture_west, start_rank) = match color {
        Color::White => (
            Direction::North,
            Direction::NorthEast,
            Direction::NorthWest,
            BB_RANK_2,
        ),
        Color::Black => (
            Direction::South,
            Direction::SouthEast,
            Direction::SouthWest,
            BB_RANK_7,
        ),
    };

    let single = pawns.step(ahead).and(empty);
    let double = pawns
        .and(start_rank)
        .step(ahead)
        .and(empty)
        .step(ahead)
        .and(empty);
    let captures = pawns.step(capture_east).or(pawns.step(capture_west)).and(enemy);

    single.or(double).or(captures)
}

/// The subset of `own_pawns` standing immediately east or west of the enemy
/// pawn that just advanced two squares, i.e. the pawns entitled to capture
/// it en passant.
pub fn en_passant_attackers(en_passant_pawn: Bitboard, own_pawns: Bitboard) -> Bitboard {
    en_passant_pawn
        .step(Direction::East)
        .or(en_passant_pawn.step(Direction::West))
        .and(own_pawns)
}
