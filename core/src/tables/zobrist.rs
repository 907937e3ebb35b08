//! Zobrist hash keys: one random 64-bit number per (piece, square), per
//! castling-rights combination, per en-passant file, and one for side to
//! move. A position's hash is the XOR of the keys for everything on the
//! board; incremental updates XOR out the old key and XOR in the new one
//! rather than recomputing from scratch.

use crate::castle_rights::Castling;
use crate::masks::{ALL_CASTLING_RIGHTS, FILE_CNT, PIECE_CNT, SQ_CNT};
use crate::prng::PRNG;
use crate::square::SQ;
use crate::types::Piece;

/// Seed chosen arbitrarily and fixed so hashes are stable across builds.
const ZOBRIST_SEED: u64 = 23_081;

pub struct Zobrist {
    piece_sq: [[u64; SQ_CNT]; PIECE_CNT],
    ep_file: [u64; FILE_CNT],
    castling: [u64; ALL_CASTLING_RIGHTS],
    side: u64,
}

impl Zobrist {
    pub fn build() -> Zobrist {
        let mut rng = PRNG::init(ZOBRIST_SEED);
        let mut piece_sq = [[0u64; SQ_CNT]; PIECE_CNT];
        for row in piece_sq.iter_mut() {
            for key in row.iter_mut() {
                *key = rng.rand();
            }
        }
        let mut ep_file = [0u64; FILE_CNT];
        for key in ep_file.iter_mut() {
            *key = rng.rand();
        }
        let mut castling = [0u64; ALL_CASTLING_RIGHTS];
        for key in castling.iter_mut() {
            *key = rng.rand();
        }
        let side = rng.rand();
        Zobrist {
            piece_sq,
            ep_file,
            castling,
            side,
        }
    }

    #[inline]
    pub fn piece_at_sq(&self, piece: Piece, sq: SQ) -> u64 {
        self.piece_sq[piece as usize][sq.0 as usize]
    }

    #[inline]
    pub fn ep_file(&self, file_idx: u8) -> u64 {
        self.ep_file[file_idx as usize]
    }

    #[inline]
    pub fn castle_rights(&self, rights: Castling) -> u64 {
        self.castling[rights.bits() as usize]
    }

    #[inline]
    pub fn side_to_move(&self) -> u64 {
        self.side
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_reasonably_distinct() {
        let z = Zobrist::build();
        assert_ne!(
            z.piece_at_sq(Piece::WhitePawn, SQ(0)),
            z.piece_at_sq(Piece::WhitePawn, SQ(1))
        );
        assert_ne!(
            z.piece_at_sq(Piece::WhitePawn, SQ(0)),
            z.piece_at_sq(Piece::BlackPawn, SQ(0))
        );
    }
}
