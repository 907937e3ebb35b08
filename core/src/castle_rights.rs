//! Castling rights, tracked as a four-bit set (one bit per player/side
//! combination) so they can be XORed straight into the Zobrist hash and
//! stored cheaply in an [`crate::position::UndoRecord`].

use std::fmt;

use bitflags::bitflags;

use crate::masks::{
    BLACK_KING_START, ROOK_BLACK_KSIDE_START, ROOK_BLACK_QSIDE_START, ROOK_WHITE_KSIDE_START,
    ROOK_WHITE_QSIDE_START, WHITE_KING_START,
};
use crate::types::{CastleType, Player};

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Castling: u8 {
        const WHITE_K = 0b0001;
        const WHITE_Q = 0b0010;
        const BLACK_K = 0b0100;
        const BLACK_Q = 0b1000;
        const WHITE_ALL = Self::WHITE_K.bits() | Self::WHITE_Q.bits();
        const BLACK_ALL = Self::BLACK_K.bits() | Self::BLACK_Q.bits();
    }
}

impl Castling {
    #[inline]
    pub fn player_can_castle(self, player: Player, side: CastleType) -> bool {
        self.contains(Self::bit_for(player, side))
    }

    #[inline]
    pub fn bit_for(player: Player, side: CastleType) -> Castling {
        match (player, side) {
            (Player::White, CastleType::KingSide) => Castling::WHITE_K,
            (Player::White, CastleType::QueenSide) => Castling::WHITE_Q,
            (Player::Black, CastleType::KingSide) => Castling::BLACK_K,
            (Player::Black, CastleType::QueenSide) => Castling::BLACK_Q,
        }
    }

    #[inline]
    pub fn remove_player(&mut self, player: Player) {
        match player {
            Player::White => self.remove(Castling::WHITE_ALL),
            Player::Black => self.remove(Castling::BLACK_ALL),
        }
    }

    /// Clears whichever rights a move leaving squares `from`/`to` should
    /// revoke (king or rook moving off its home square, or a rook being
    /// captured on its home square), returning the bits actually cleared so
    /// the caller can XOR them out of the Zobrist hash.
    #[inline]
    pub fn update_for_move(&mut self, from: u8, to: u8) -> Castling {
        let revoke = Self::rights_touching(from) | Self::rights_touching(to);
        let cleared = *self & revoke;
        self.remove(revoke);
        cleared
    }

    fn rights_touching(sq: u8) -> Castling {
        match sq {
            s if s == WHITE_KING_START => Castling::WHITE_ALL,
            s if s == BLACK_KING_START => Castling::BLACK_ALL,
            s if s == ROOK_WHITE_KSIDE_START => Castling::WHITE_K,
            s if s == ROOK_WHITE_QSIDE_START => Castling::WHITE_Q,
            s if s == ROOK_BLACK_KSIDE_START => Castling::BLACK_K,
            s if s == ROOK_BLACK_QSIDE_START => Castling::BLACK_Q,
            _ => Castling::empty(),
        }
    }

    /// Parses a single FEN castling-availability character (`K`, `Q`, `k`,
    /// or `q`), returning `false` for anything else.
    pub fn add_from_fen_char(&mut self, c: char) -> bool {
        match c {
            'K' => {
                self.insert(Castling::WHITE_K);
                true
            }
            'Q' => {
                self.insert(Castling::WHITE_Q);
                true
            }
            'k' => {
                self.insert(Castling::BLACK_K);
                true
            }
            'q' => {
                self.insert(Castling::BLACK_Q);
                true
            }
            _ => false,
        }
    }

    pub fn to_fen_string(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        let mut s = String::with_capacity(4);
        if self.contains(Castling::WHITE_K) {
            s.push('K');
        }
        if self.contains(Castling::WHITE_Q) {
            s.push('Q');
        }
        if self.contains(Castling::BLACK_K) {
            s.push('k');
        }
        if self.contains(Castling::BLACK_Q) {
            s.push('q');
        }
        s
    }
}

impl fmt::Display for Castling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn king_move_clears_both_sides() {
        let mut c = Castling::WHITE_ALL;
        let cleared = c.update_for_move(WHITE_KING_START, 12);
        assert_eq!(cleared, Castling::WHITE_ALL);
        assert!(c.is_empty());
    }

    #[test]
    fn rook_move_clears_one_side() {
        let mut c = Castling::WHITE_ALL;
        c.update_for_move(ROOK_WHITE_KSIDE_START, 5);
        assert!(!c.contains(Castling::WHITE_K));
        assert!(c.contains(Castling::WHITE_Q));
    }

    #[test]
    fn fen_round_trips() {
        let mut c = Castling::empty();
        for ch in "KQkq".chars() {
            assert!(c.add_from_fen_char(ch));
        }
        assert_eq!(c, Castling::WHITE_ALL | Castling::BLACK_ALL);
        assert_eq!(c.to_fen_string(), "KQkq");
        assert_eq!(Castling::empty().to_fen_string(), "-");
    }
}
