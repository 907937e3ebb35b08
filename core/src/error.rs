//! Error types for everything in this crate that can fail on bad input:
//! FEN parsing and long-algebraic move-text parsing. Internal invariant
//! violations (a corrupt bitboard, an out-of-range square) are bugs, not
//! recoverable errors, and are reported with `debug_assert!` instead.

use std::num::ParseIntError;

use thiserror::Error;

/// Everything that can go wrong while parsing a FEN record.
#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum FenParseError {
    #[error("FEN must have exactly 6 space-separated fields, found {0}")]
    WrongFieldCount(usize),

    #[error("FEN piece-placement field must have 8 ranks, found {0}")]
    WrongRankCount(usize),

    #[error("FEN rank has the wrong number of squares: {0}")]
    WrongSquareCountInRank(String),

    #[error("unrecognized piece character '{0}' in piece-placement field")]
    UnrecognizedPiece(char),

    #[error("side-to-move field must be 'w' or 'b', found '{0}'")]
    UnrecognizedSideToMove(String),

    #[error("castling-rights field contains an invalid character '{0}'")]
    InvalidCastlingChar(char),

    #[error("en-passant field '{0}' is not a valid square")]
    InvalidEnPassantSquare(String),

    #[error("en-passant square '{0}' is not on the expected rank for the side to move")]
    EnPassantWrongRank(String),

    #[error("halfmove clock is not a valid non-negative integer: {0}")]
    InvalidHalfmoveClock(ParseIntError),

    #[error("fullmove number is not a valid positive integer: {0}")]
    InvalidFullmoveNumber(ParseIntError),

    #[error("position has {0} kings for one side, expected exactly 1")]
    WrongKingCount(u32),

    #[error("side not to move is in check, which is an illegal position")]
    OpponentKingInCheck,

    #[error("a pawn occupies a back rank, which is an illegal position")]
    PawnOnBackRank,

    #[error("too many pawns ({0}) for one side")]
    TooManyPawns(u32),
}

/// Everything that can go wrong parsing a long-algebraic move string
/// (`e2e4`, `e7e8q`) against a concrete position.
#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum MoveParseError {
    #[error("move text '{0}' has the wrong length, expected 4 or 5 characters")]
    WrongLength(String),

    #[error("move text '{0}' has an invalid source or destination square")]
    InvalidSquare(String),

    #[error("move text '{0}' has an unrecognized promotion piece")]
    InvalidPromotionPiece(String),

    #[error("move '{0}' is not legal in the current position")]
    IllegalMove(String),
}
