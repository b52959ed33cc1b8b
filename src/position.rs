// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::fmt;

use crate::attacks;
use crate::bitboard::{Bitboard, BB_RANK_18, BB_RANK_4, BB_RANK_5};
use crate::moves::Move;
use crate::types::{Color, Direction, File, Piece, PieceKind, Rank, Square};
use crate::types::{FILES, PIECE_KINDS, RANKS};

/// Possible errors that can arise when parsing a FEN string into a
/// `Position`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedChar(char),
    UnexpectedEnd,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece,
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
    EmptyHalfmove,
    InvalidHalfmove,
    EmptyFullmove,
    InvalidFullmove,
    IllegalPosition(InvalidPosition),
}

/// Violations of the structural invariants every `Position` must uphold.
/// Positions are only handed out once they validate, so observing one of
/// these mid-game is a bug in move application, not in the caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InvalidPosition {
    /// A cached per-color union disagrees with the piece boards it covers.
    UnionMismatch,
    /// The White and Black occupancy sets intersect.
    OverlappingColors,
    /// A side has no king, or more than one.
    KingCount(Color),
    /// A pawn stands on the first or eighth rank.
    PawnOnBackRank,
    /// The side that just moved left its own king attacked.
    OpponentInCheck,
    /// The en-passant board holds more than one square, a square on the
    /// wrong rank, or a square without the right pawn on it.
    EnPassantTarget,
    /// The castling-rights board names a square whose rook is missing or
    /// whose king has wandered off its starting square.
    CastlingRights,
}

/// The rook squares whose castling rights can ever be held: the four corner
/// squares of the board.
const CASTLING_SQUARES: Bitboard = Bitboard::from_bits(0x8100_0000_0000_0081);

/// A chess position: piece placement, the side to move, the pawn vulnerable
/// to en passant capture (if any), and the rooks retaining castling rights.
///
/// The en-passant board holds the pawn that just advanced two squares, not
/// the square behind it as FEN records it; translation between the two
/// conventions happens at the FEN boundary. Castling rights are the set of
/// rook home squares whose rook and king are both still in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    boards_by_piece: [Bitboard; 12],
    boards_by_color: [Bitboard; 2],
    en_passant_pawn: Bitboard,
    castling_rooks: Bitboard,
    side_to_move: Color,
}

//
// Board state getters
//

impl Position {
    /// An empty board with White to move. Mostly useful as a scaffold for
    /// `add_piece`; an empty board is not itself a valid position.
    pub const fn new() -> Position {
        Position {
            boards_by_piece: [Bitboard::none(); 12],
            boards_by_color: [Bitboard::none(); 2],
            en_passant_pawn: Bitboard::none(),
            castling_rooks: Bitboard::none(),
            side_to_move: Color::White,
        }
    }

    pub fn from_start_position() -> Position {
        Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap()
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The pawn that advanced two squares on the previous ply, if any.
    pub fn en_passant_pawn(&self) -> Bitboard {
        self.en_passant_pawn
    }

    /// The rook home squares whose castling rights remain intact.
    pub fn castling_rooks(&self) -> Bitboard {
        self.castling_rooks
    }

    pub fn pieces(&self, color: Color) -> Bitboard {
        self.boards_by_color[color as usize]
    }

    pub fn occupancy(&self) -> Bitboard {
        self.pieces(Color::White) | self.pieces(Color::Black)
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> Bitboard {
        let offset = match color {
            Color::White => 0,
            Color::Black => 6,
        };
        self.boards_by_piece[offset + kind as usize]
    }

    pub fn pawns(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Pawn)
    }

    pub fn knights(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Knight)
    }

    pub fn bishops(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Bishop)
    }

    pub fn rooks(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Rook)
    }

    pub fn queens(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Queen)
    }

    pub fn kings(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::King)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let (offset, color) = if self.boards_by_color[Color::White as usize].test(square) {
            (0, Color::White)
        } else if self.boards_by_color[Color::Black as usize].test(square) {
            (6, Color::Black)
        } else {
            return None;
        };

        for &kind in &PIECE_KINDS {
            if self.boards_by_piece[kind as usize + offset].test(square) {
                return Some(Piece::new(kind, color));
            }
        }

        // If we get here, we failed to update a bitboard somewhere.
        unreachable!()
    }
}

//
// Move application and board manipulation
//

impl Position {
    pub fn add_piece(&mut self, square: Square, piece: Piece) -> Result<(), ()> {
        if self.piece_at(square).is_some() {
            return Err(());
        }

        self.boards_by_color[piece.color as usize].set(square);
        let offset = if piece.color == Color::White { 0 } else { 6 };
        self.boards_by_piece[piece.kind as usize + offset].set(square);
        Ok(())
    }

    pub fn remove_piece(&mut self, square: Square) -> Result<(), ()> {
        let existing = if let Some(piece) = self.piece_at(square) {
            piece
        } else {
            return Err(());
        };

        self.boards_by_color[existing.color as usize].unset(square);
        let offset = if existing.color == Color::White { 0 } else { 6 };
        self.boards_by_piece[existing.kind as usize + offset].unset(square);
        Ok(())
    }

    /// Applies a move to this position, producing the successor state in
    /// place. The move must have been generated for this position.
    pub fn apply_move(&mut self, mov: Move) {
        let color = self.side_to_move;
        let kind = mov.piece();

        // Captures remove the captured piece before anything else moves. An
        // en passant capture is the one case where the victim does not stand
        // on the destination square; it stands on the square recorded by the
        // en-passant board.
        if mov.is_en_passant() {
            let victim = self
                .en_passant_pawn
                .first()
                .expect("invalid move: en passant without a vulnerable pawn");
            self.remove_piece(victim)
                .expect("invalid move: no pawn on the en passant square");
        } else if mov.is_capture() {
            self.remove_piece(mov.destination())
                .expect("invalid move: no piece at capture target");
        }

        // Castles are encoded as the king's two-square journey; the rook's
        // relocation is implied.
        if mov.is_castle() {
            let (rook_from, rook_to) = match (color, mov.is_kingside_castle()) {
                (Color::White, true) => (Square::H1, Square::F1),
                (Color::White, false) => (Square::A1, Square::D1),
                (Color::Black, true) => (Square::H8, Square::F8),
                (Color::Black, false) => (Square::A8, Square::D8),
            };

            self.remove_piece(rook_from)
                .expect("invalid move: castle without rook");
            self.add_piece(rook_to, Piece::new(PieceKind::Rook, color))
                .expect("invalid move: piece on the rook's castle square");
        }

        // Move the piece itself. A promotion places the promoted kind on the
        // destination square rather than the pawn.
        let placed = match mov.promotion_piece() {
            Some(promoted) => promoted,
            None => kind,
        };

        self.remove_piece(mov.source())
            .expect("invalid move: no piece at source square");
        self.add_piece(mov.destination(), Piece::new(placed, color))
            .expect("invalid move: piece at destination square");

        // Castling rights die with the squares they live on: a rook moving
        // away clears its own square, a piece landing on a rook's home
        // square clears that square (the rook was just captured in place),
        // and a king move forfeits both of its rooks' rights.
        let touched = Bitboard::from_square(mov.source()) | Bitboard::from_square(mov.destination());
        self.castling_rooks &= touched.not();
        if kind == PieceKind::King {
            let home_rank = match color {
                Color::White => Rank::One,
                Color::Black => Rank::Eight,
            };
            self.castling_rooks &= Bitboard::all().rank(home_rank).not();
        }

        // A double pawn push leaves the pushed pawn vulnerable to en passant
        // for exactly one ply; everything else clears the board.
        self.en_passant_pawn = if mov.is_double_pawn_push() {
            Bitboard::from_square(mov.destination())
        } else {
            Bitboard::none()
        };

        self.side_to_move = color.toggle();
    }
}

//
// Board analysis (attack aggregation and check detection)
//

impl Position {
    /// The aggregate set of squares the given color's pieces can move to,
    /// computed with the same per-piece generators move generation uses.
    /// This is the attack set consulted by the king-safety filter: a king
    /// standing in this set can be captured on the next ply.
    pub fn attack_targets(&self, color: Color) -> Bitboard {
        let own = self.pieces(color);
        let enemy = self.pieces(color.toggle());

        attacks::king_targets(self.kings(color), own)
            | attacks::queen_targets(self.queens(color), own, enemy)
            | attacks::rook_targets(self.rooks(color), own, enemy)
            | attacks::bishop_targets(self.bishops(color), own, enemy)
            | attacks::knight_targets(self.knights(color), own)
            | attacks::pawn_targets(self.pawns(color), own, enemy, color)
    }

    /// Tests whether the given color's king is attacked.
    pub fn is_check(&self, color: Color) -> bool {
        !self.kings(color).and(self.attack_targets(color.toggle())).empty()
    }
}

//
// Invariant validation
//

impl Position {
    /// Checks the structural invariants of the position: consistent unions,
    /// disjoint colors, exactly one king a side, no pawns on the back
    /// ranks, the mover's opponent not already in check, and well-formed
    /// en-passant and castling state.
    pub fn validate(&self) -> Result<(), InvalidPosition> {
        for &color in &[Color::White, Color::Black] {
            let mut union = Bitboard::none();
            for &kind in &PIECE_KINDS {
                union |= self.pieces_of_kind(color, kind);
            }
            if union != self.pieces(color) {
                return Err(InvalidPosition::UnionMismatch);
            }

            if self.kings(color).count() != 1 {
                return Err(InvalidPosition::KingCount(color));
            }

            if !self.pawns(color).and(BB_RANK_18).empty() {
                return Err(InvalidPosition::PawnOnBackRank);
            }
        }

        if !self.pieces(Color::White).and(self.pieces(Color::Black)).empty() {
            return Err(InvalidPosition::OverlappingColors);
        }

        // The side that just moved may not have left its king attacked.
        if self.is_check(self.side_to_move.toggle()) {
            return Err(InvalidPosition::OpponentInCheck);
        }

        if self.en_passant_pawn.count() > 1 {
            return Err(InvalidPosition::EnPassantTarget);
        }
        if !self.en_passant_pawn.empty() {
            // The vulnerable pawn belongs to the side that just moved and
            // stands on the rank a double push from that side lands on.
            let (rank, pawns) = match self.side_to_move {
                Color::White => (BB_RANK_5, self.pawns(Color::Black)),
                Color::Black => (BB_RANK_4, self.pawns(Color::White)),
            };
            if self.en_passant_pawn != self.en_passant_pawn.and(rank).and(pawns) {
                return Err(InvalidPosition::EnPassantTarget);
            }
        }

        if self.castling_rooks != self.castling_rooks.and(CASTLING_SQUARES) {
            return Err(InvalidPosition::CastlingRights);
        }
        for rook_square in self.castling_rooks {
            let color = match rook_square.rank() {
                Rank::One => Color::White,
                _ => Color::Black,
            };
            let king_home = match color {
                Color::White => Square::E1,
                Color::Black => Square::E8,
            };
            if !self.rooks(color).test(rook_square) || !self.kings(color).test(king_home) {
                return Err(InvalidPosition::CastlingRights);
            }
        }

        Ok(())
    }
}

//
// FEN parsing and position construction.
//
// FEN is the interchange format for positions. Parsing produces a validated
// Position plus the two clock counters FEN carries (half-moves since the
// last capture or pawn move, and the full-move number); the counters live
// with the game history, not the position, so the plain `from_fen` drops
// them.
//

impl Position {
    /// Constructs a new position from a FEN record, discarding the clock
    /// fields.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Position, FenParseError> {
        Position::from_fen_with_clocks(fen).map(|(pos, _, _)| pos)
    }

    /// Constructs a new position from a FEN record, also returning the
    /// half-move clock and the full-move number.
    pub fn from_fen_with_clocks<S: AsRef<str>>(
        fen: S,
    ) -> Result<(Position, u32, u32), FenParseError> {
        use std::iter::Peekable;
        use std::str::Chars;

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat(iter: &mut Stream, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn advance(iter: &mut Stream) {
            let _ = iter.next();
        }

        fn peek(iter: &mut Stream) -> Result<char, FenParseError> {
            if let Some(c) = iter.peek() {
                Ok(*c)
            } else {
                Err(FenParseError::UnexpectedEnd)
            }
        }

        fn eat_side_to_move(iter: &mut Stream) -> Result<Color, FenParseError> {
            let side = match peek(iter)? {
                'w' => Color::White,
                'b' => Color::Black,
                _ => return Err(FenParseError::InvalidSideToMove),
            };

            advance(iter);
            Ok(side)
        }

        fn eat_castling(iter: &mut Stream) -> Result<Bitboard, FenParseError> {
            if peek(iter)? == '-' {
                advance(iter);
                return Ok(Bitboard::none());
            }

            let mut rooks = Bitboard::none();
            for _ in 0..4 {
                match peek(iter)? {
                    'K' => rooks.set(Square::H1),
                    'Q' => rooks.set(Square::A1),
                    'k' => rooks.set(Square::H8),
                    'q' => rooks.set(Square::A8),
                    ' ' => break,
                    _ => return Err(FenParseError::InvalidCastle),
                }

                advance(iter);
            }

            Ok(rooks)
        }

        fn eat_en_passant(
            iter: &mut Stream,
            side_to_move: Color,
        ) -> Result<Bitboard, FenParseError> {
            if peek(iter)? == '-' {
                advance(iter);
                return Ok(Bitboard::none());
            }

            let file_c = peek(iter)?;
            let file = File::try_from(file_c).map_err(|_| FenParseError::InvalidEnPassant)?;
            advance(iter);
            let rank_c = peek(iter)?;
            let rank = Rank::try_from(rank_c).map_err(|_| FenParseError::InvalidEnPassant)?;
            advance(iter);

            // FEN records the square passed over; the engine tracks the pawn
            // itself, which stands one square beyond in the pusher's
            // direction of travel.
            let behind = Square::of(rank, file);
            let pawn_square = match side_to_move {
                Color::White => {
                    if rank != Rank::Six {
                        return Err(FenParseError::InvalidEnPassant);
                    }
                    behind.towards(Direction::South)
                }
                Color::Black => {
                    if rank != Rank::Three {
                        return Err(FenParseError::InvalidEnPassant);
                    }
                    behind.towards(Direction::North)
                }
            };

            Ok(Bitboard::from_square(pawn_square))
        }

        fn eat_clock(
            iter: &mut Stream,
            empty_err: FenParseError,
            invalid_err: FenParseError,
        ) -> Result<u32, FenParseError> {
            let mut buf = String::new();
            while let Some(&c) = iter.peek() {
                if !c.is_digit(10) {
                    break;
                }

                buf.push(c);
                advance(iter);
            }

            if buf.is_empty() {
                return Err(empty_err);
            }

            buf.parse::<u32>().map_err(|_| invalid_err)
        }

        let mut pos = Position::new();
        let str_ref = fen.as_ref();
        let iter = &mut str_ref.chars().peekable();
        for &rank in RANKS.iter().rev() {
            let mut file = 0usize;
            while file <= File::H as usize {
                let c = peek(iter)?;
                // digits 1 through 8 indicate runs of empty squares.
                if c.is_digit(10) {
                    if c < '1' || c > '8' {
                        return Err(FenParseError::InvalidDigit);
                    }

                    file += c as usize - '0' as usize;
                    if file > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    advance(iter);
                    continue;
                }

                // if it's not a digit, it represents a piece.
                let piece = if let Ok(piece) = Piece::try_from(c) {
                    piece
                } else {
                    return Err(FenParseError::UnknownPiece);
                };

                let square = Square::of(rank, num_traits::FromPrimitive::from_usize(file).unwrap());
                pos.add_piece(square, piece).expect("FEN double-add piece?");
                advance(iter);
                file += 1;
            }

            if rank != Rank::One {
                eat(iter, '/')?;
            }
        }

        eat(iter, ' ')?;
        pos.side_to_move = eat_side_to_move(iter)?;
        eat(iter, ' ')?;
        pos.castling_rooks = eat_castling(iter)?;
        eat(iter, ' ')?;
        pos.en_passant_pawn = eat_en_passant(iter, pos.side_to_move)?;
        eat(iter, ' ')?;
        let halfmove = eat_clock(
            iter,
            FenParseError::EmptyHalfmove,
            FenParseError::InvalidHalfmove,
        )?;
        eat(iter, ' ')?;
        let fullmove = eat_clock(
            iter,
            FenParseError::EmptyFullmove,
            FenParseError::InvalidFullmove,
        )?;

        pos.validate().map_err(FenParseError::IllegalPosition)?;
        Ok((pos, halfmove, fullmove))
    }
}

//
// Trait implementations
//

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            for &file in &FILES {
                let sq = Square::of(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in &FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for &file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
