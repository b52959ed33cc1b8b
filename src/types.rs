// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use num_traits::FromPrimitive;
use std::convert::TryFrom;
use std::fmt::{self, Display, Write};

use crate::bitboard::{Bitboard, BB_FILE_A, BB_FILE_H};

/// A square on the chess board. Square indices number the board from A1 in
/// the lower-left corner to H8 in the upper-right, rank by rank, so that the
/// file of a square is `index % 8` and the rank is `index / 8`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Square {
    A1,
    B1,
    C1,
    D1,
    E1,
    F1,
    G1,
    H1,
    A2,
    B2,
    C2,
    D2,
    E2,
    F2,
    G2,
    H2,
    A3,
    B3,
    C3,
    D3,
    E3,
    F3,
    G3,
    H3,
    A4,
    B4,
    C4,
    D4,
    E4,
    F4,
    G4,
    H4,
    A5,
    B5,
    C5,
    D5,
    E5,
    F5,
    G5,
    H5,
    A6,
    B6,
    C6,
    D6,
    E6,
    F6,
    G6,
    H6,
    A7,
    B7,
    C7,
    D7,
    E7,
    F7,
    G7,
    H7,
    A8,
    B8,
    C8,
    D8,
    E8,
    F8,
    G8,
    H8,
}

impl Square {
    pub fn of(rank: Rank, file: File) -> Square {
        FromPrimitive::from_u32(rank as u32 * 8 + file as u32).unwrap()
    }

    pub fn rank(self) -> Rank {
        FromPrimitive::from_u32(self as u32 >> 3).unwrap()
    }

    pub fn file(self) -> File {
        FromPrimitive::from_u32(self as u32 & 7).unwrap()
    }

    /// The square `offset` indices away from this one. Panics if the result
    /// falls off the board.
    pub fn plus(self, offset: i32) -> Square {
        FromPrimitive::from_i32(self as i32 + offset).unwrap()
    }

    pub fn towards(self, dir: Direction) -> Square {
        self.plus(dir.as_vector())
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Rank::One => '1',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
        };
        f.write_char(chr)
    }
}

impl TryFrom<char> for Rank {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let res = match value {
            '1' => Rank::One,
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            _ => return Err(()),
        };
        Ok(res)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            File::A => 'a',
            File::B => 'b',
            File::C => 'c',
            File::D => 'd',
            File::E => 'e',
            File::F => 'f',
            File::G => 'g',
            File::H => 'h',
        };
        f.write_char(chr)
    }
}

impl TryFrom<char> for File {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let res = match value {
            'a' => File::A,
            'b' => File::B,
            'c' => File::C,
            'd' => File::D,
            'e' => File::E,
            'f' => File::F,
            'g' => File::G,
            'h' => File::H,
            _ => return Err(()),
        };
        Ok(res)
    }
}

pub static RANKS: [Rank; 8] = [
    Rank::One,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
];

pub static FILES: [File; 8] = [
    File::A,
    File::B,
    File::C,
    File::D,
    File::E,
    File::F,
    File::G,
    File::H,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Color::White => 'w',
            Color::Black => 'b',
        };
        f.write_char(chr)
    }
}

pub static COLORS: [Color; 2] = [Color::White, Color::Black];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        f.write_char(chr)
    }
}

pub static PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

/// One of the eight compass directions a piece may slide in. Every direction
/// knows its index offset and the file mask that discards squares which would
/// wrap around the edge of the board when stepping sets square-wise.
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub fn as_vector(self) -> i32 {
        match self {
            Direction::North => 8,
            Direction::South => -8,
            Direction::East => 1,
            Direction::West => -1,
            Direction::NorthEast => 9,
            Direction::NorthWest => 7,
            Direction::SouthEast => -7,
            Direction::SouthWest => -9,
        }
    }

    /// The set of squares a one-square step in this direction may legally
    /// land on. Stepping east from the H file (or west from the A file)
    /// wraps to the far side of the board; the mask clears those squares.
    pub fn wrap_mask(self) -> Bitboard {
        match self {
            Direction::North | Direction::South => Bitboard::all(),
            Direction::East | Direction::NorthEast | Direction::SouthEast => BB_FILE_A.not(),
            Direction::West | Direction::NorthWest | Direction::SouthWest => BB_FILE_H.not(),
        }
    }
}

pub static DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
    Direction::NorthEast,
    Direction::NorthWest,
    Direction::SouthEast,
    Direction::SouthWest,
];

/// A piece: a kind plus the color that owns it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }
}

impl TryFrom<char> for Piece {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let res = match c {
            'P' => Piece::new(PieceKind::Pawn, Color::White),
            'N' => Piece::new(PieceKind::Knight, Color::White),
            'B' => Piece::new(PieceKind::Bishop, Color::White),
            'R' => Piece::new(PieceKind::Rook, Color::White),
            'Q' => Piece::new(PieceKind::Queen, Color::White),
            'K' => Piece::new(PieceKind::King, Color::White),
            'p' => Piece::new(PieceKind::Pawn, Color::Black),
            'n' => Piece::new(PieceKind::Knight, Color::Black),
            'b' => Piece::new(PieceKind::Bishop, Color::Black),
            'r' => Piece::new(PieceKind::Rook, Color::Black),
            'q' => Piece::new(PieceKind::Queen, Color::Black),
            'k' => Piece::new(PieceKind::King, Color::Black),
            _ => return Err(()),
        };
        Ok(res)
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match (self.kind, self.color) {
            (PieceKind::Pawn, Color::White) => 'P',
            (PieceKind::Knight, Color::White) => 'N',
            (PieceKind::Bishop, Color::White) => 'B',
            (PieceKind::Rook, Color::White) => 'R',
            (PieceKind::Queen, Color::White) => 'Q',
            (PieceKind::King, Color::White) => 'K',
            (PieceKind::Pawn, Color::Black) => 'p',
            (PieceKind::Knight, Color::Black) => 'n',
            (PieceKind::Bishop, Color::Black) => 'b',
            (PieceKind::Rook, Color::Black) => 'r',
            (PieceKind::Queen, Color::Black) => 'q',
            (PieceKind::King, Color::Black) => 'k',
        };
        f.write_char(chr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_of_rank_and_file() {
        assert_eq!(Square::A1, Square::of(Rank::One, File::A));
        assert_eq!(Square::E4, Square::of(Rank::Four, File::E));
        assert_eq!(Square::H8, Square::of(Rank::Eight, File::H));
    }

    #[test]
    fn square_decomposition() {
        assert_eq!(Rank::Four, Square::E4.rank());
        assert_eq!(File::E, Square::E4.file());
        assert_eq!(Rank::Eight, Square::A8.rank());
        assert_eq!(File::A, Square::A8.file());
    }

    #[test]
    fn square_towards() {
        assert_eq!(Square::E5, Square::E4.towards(Direction::North));
        assert_eq!(Square::D3, Square::E4.towards(Direction::SouthWest));
    }

    #[test]
    fn direction_vectors_are_inverses() {
        let pairs = [
            (Direction::North, Direction::South),
            (Direction::East, Direction::West),
            (Direction::NorthEast, Direction::SouthWest),
            (Direction::NorthWest, Direction::SouthEast),
        ];
        for &(a, b) in &pairs {
            assert_eq!(a.as_vector(), -b.as_vector());
        }
    }

    #[test]
    fn piece_char_round_trip() {
        use std::convert::TryFrom;

        for &c in &['P', 'N', 'B', 'R', 'Q', 'K', 'p', 'n', 'b', 'r', 'q', 'k'] {
            let piece = Piece::try_from(c).unwrap();
            assert_eq!(c, piece.to_string().chars().next().unwrap());
        }
    }
}
