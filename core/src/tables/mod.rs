//! Attack tables, Zobrist keys, and piece-square tables, all built once on
//! first use and shared for the lifetime of the process.
//!
//! Everything here is read-only after construction, so a single
//! process-wide [`once_cell::sync::Lazy`] instance is enough: no locking is
//! needed on the read path, only on the one-time build.

mod magic;
mod psqt;
mod zobrist;

use once_cell::sync::Lazy;

use crate::bitboard::BitBoard;
use crate::score::Score;
use crate::square::SQ;
use crate::types::{Piece, PieceType, Player};

pub use zobrist::Zobrist;

pub struct Tables {
    rook: magic::SlidingAttackTable,
    bishop: magic::SlidingAttackTable,
    knight: [u64; 64],
    king: [u64; 64],
    pawn: [[u64; 64]; 2],
    between: Vec<Vec<u64>>,
    line: Vec<Vec<u64>>,
    zobrist: Zobrist,
    psqt: psqt::Psqt,
}

impl Tables {
    fn build() -> Tables {
        let rook = magic::build_rook_table();
        let bishop = magic::build_bishop_table();
        let between = magic::build_between_table(&rook, &bishop);
        let line = magic::build_line_table(&rook, &bishop);
        Tables {
            knight: magic::build_knight_table(),
            king: magic::build_king_table(),
            pawn: magic::build_pawn_attacks_table(),
            rook,
            bishop,
            between,
            line,
            zobrist: Zobrist::build(),
            psqt: psqt::Psqt::build(),
        }
    }

    #[inline]
    pub fn knight_moves(&self, sq: SQ) -> BitBoard {
        BitBoard(self.knight[sq.0 as usize])
    }

    #[inline]
    pub fn king_moves(&self, sq: SQ) -> BitBoard {
        BitBoard(self.king[sq.0 as usize])
    }

    #[inline]
    pub fn pawn_attacks_from(&self, sq: SQ, player: Player) -> BitBoard {
        BitBoard(self.pawn[player as usize][sq.0 as usize])
    }

    #[inline]
    pub fn bishop_moves(&self, occupied: BitBoard, sq: SQ) -> BitBoard {
        BitBoard(self.bishop.attacks(sq, occupied.0))
    }

    #[inline]
    pub fn rook_moves(&self, occupied: BitBoard, sq: SQ) -> BitBoard {
        BitBoard(self.rook.attacks(sq, occupied.0))
    }

    #[inline]
    pub fn queen_moves(&self, occupied: BitBoard, sq: SQ) -> BitBoard {
        self.bishop_moves(occupied, sq) | self.rook_moves(occupied, sq)
    }

    #[inline]
    pub fn attacks_for(
        &self,
        piece_type: PieceType,
        sq: SQ,
        occupied: BitBoard,
        player: Player,
    ) -> BitBoard {
        match piece_type {
            PieceType::N => self.knight_moves(sq),
            PieceType::B => self.bishop_moves(occupied, sq),
            PieceType::R => self.rook_moves(occupied, sq),
            PieceType::Q => self.queen_moves(occupied, sq),
            PieceType::K => self.king_moves(sq),
            PieceType::P => self.pawn_attacks_from(sq, player),
            _ => BitBoard(0),
        }
    }

    /// The squares strictly between `a` and `b` if they share a rank, file,
    /// or diagonal; empty otherwise.
    #[inline]
    pub fn between(&self, a: SQ, b: SQ) -> BitBoard {
        BitBoard(self.between[a.0 as usize][b.0 as usize])
    }

    /// The full rank, file, or diagonal through `a` and `b`, extended to the
    /// board edges; empty if they share none.
    #[inline]
    pub fn line(&self, a: SQ, b: SQ) -> BitBoard {
        BitBoard(self.line[a.0 as usize][b.0 as usize])
    }

    #[inline]
    pub fn aligned(&self, a: SQ, b: SQ, c: SQ) -> bool {
        self.line(a, b).contains(c)
    }

    #[inline]
    pub fn zobrist(&self) -> &Zobrist {
        &self.zobrist
    }

    #[inline]
    pub fn psqt_bonus(&self, piece_type: PieceType, player: Player, sq: SQ) -> Score {
        self.psqt.bonus(piece_type, player, sq)
    }
}

pub static TABLES: Lazy<Tables> = Lazy::new(Tables::build);

#[inline]
pub fn z_piece_at_sq(piece: Piece, sq: SQ) -> u64 {
    TABLES.zobrist().piece_at_sq(piece, sq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::{A1, B3, D4, D5, E4};

    #[test]
    fn between_on_shared_diagonal() {
        let bb = TABLES.between(A1, D4);
        assert!(bb.contains(crate::square::SQ(9)));
        assert!(bb.contains(crate::square::SQ(18)));
        assert!(!bb.contains(A1));
        assert!(!bb.contains(D4));
    }

    #[test]
    fn between_empty_when_unaligned() {
        assert!(TABLES.between(A1, B3).is_empty());
    }

    #[test]
    fn line_extends_to_edges() {
        let bb = TABLES.line(D4, D5);
        assert!(bb.contains(crate::square::SQ(3)));
        assert!(bb.contains(crate::square::SQ(59)));
    }

    #[test]
    fn queen_moves_combine_rook_and_bishop() {
        let occ = BitBoard(0);
        let q = TABLES.queen_moves(occ, E4);
        let r = TABLES.rook_moves(occ, E4);
        let b = TABLES.bishop_moves(occ, E4);
        assert_eq!(q, r | b);
    }
}
