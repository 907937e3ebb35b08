//! Check and pin analysis: which enemy pieces currently check the king,
//! which squares a piece would have to stay on (or within) to keep blocking
//! a would-be check, and generic attacker lookups used by both legality
//! checks and static-exchange-style move ordering.

use crate::bitboard::BitBoard;
use crate::square::SQ;
use crate::tables::TABLES;
use crate::types::{PieceType, Player};

use super::Position;

impl Position {
    /// Every enemy piece currently giving check to the side to move's king.
    pub fn checkers(&self) -> BitBoard {
        let us = self.side_to_move();
        let them = us.other();
        self.attackers_to(self.king_sq(us), self.occupied()) & self.occupied_by(them)
    }

    /// Every piece of either color that attacks `sq`, given `occupied` as
    /// the blocking set (passed explicitly so callers can probe hypothetical
    /// occupancies, e.g. "if this piece moved away").
    pub fn attackers_to(&self, sq: SQ, occupied: BitBoard) -> BitBoard {
        let mut attackers = BitBoard(0);
        attackers |= TABLES.knight_moves(sq) & self.piece_bb_both(PieceType::N);
        attackers |= TABLES.king_moves(sq) & self.piece_bb_both(PieceType::K);
        attackers |= TABLES.bishop_moves(occupied, sq)
            & (self.piece_bb_both(PieceType::B) | self.piece_bb_both(PieceType::Q));
        attackers |= TABLES.rook_moves(occupied, sq)
            & (self.piece_bb_both(PieceType::R) | self.piece_bb_both(PieceType::Q));
        attackers |= TABLES.pawn_attacks_from(sq, Player::White) & self.piece_bb(Player::Black, PieceType::P);
        attackers |= TABLES.pawn_attacks_from(sq, Player::Black) & self.piece_bb(Player::White, PieceType::P);
        attackers
    }

    #[inline]
    fn piece_bb_both(&self, pt: PieceType) -> BitBoard {
        self.piece_bb(Player::White, pt) | self.piece_bb(Player::Black, pt)
    }

    /// True if any enemy piece attacks `sq`, given the real board occupancy.
    /// Used for castling legality (king may not pass through or land on an
    /// attacked square) and for "does this move give check" checks.
    pub fn is_attacked_by(&self, sq: SQ, by: Player) -> bool {
        (self.attackers_to(sq, self.occupied()) & self.occupied_by(by)).is_not_empty()
    }

    /// Pieces of `player` that are pinned against their own king: removing
    /// one would expose the king to check along the pin ray. The returned
    /// bitboard covers only `player`'s own pieces; the caller intersects it
    /// with a candidate mover to find whether *that* piece is pinned, and
    /// `line(king, pinner)` to find which squares it may still move to.
    pub fn pinned_pieces(&self, player: Player) -> BitBoard {
        let king_sq = self.king_sq(player);
        let them = player.other();
        let mut pinned = BitBoard(0);

        let snipers = (TABLES.bishop_moves(BitBoard(0), king_sq)
            & (self.piece_bb(them, PieceType::B) | self.piece_bb(them, PieceType::Q)))
            | (TABLES.rook_moves(BitBoard(0), king_sq)
                & (self.piece_bb(them, PieceType::R) | self.piece_bb(them, PieceType::Q)));

        for sniper in snipers {
            let between = TABLES.between(king_sq, sniper) & self.occupied();
            if between.count_bits() == 1 && (between & self.occupied_by(player)).is_not_empty() {
                pinned |= between;
            }
        }
        pinned
    }

    /// True if moving a pinned piece from `from` to `to` keeps it on the
    /// ray between the king and its pinner, and so does not expose check.
    /// `to` is the destination; for en-passant captures the caller should
    /// instead use the dedicated en-passant legality check, since two
    /// pieces leave the board at once.
    pub fn move_keeps_king_safe(&self, from: SQ, to: SQ, king_sq: SQ) -> bool {
        TABLES.aligned(king_sq, from, to)
    }
}
