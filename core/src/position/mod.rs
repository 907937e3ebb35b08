//! `Position`: the mutable chess position at the center of the crate —
//! piece placement, side to move, castling rights, en-passant state, move
//! counters, and the running Zobrist hash and tapered material/positional
//! score.
//!
//! Move application lives in [`make_unmake`], FEN (de)serialization in
//! [`fen`], check/pin analysis in [`pin_check`], pseudo-legal and legal move
//! generation in [`movegen`], and node-counting in [`perft`].

mod fen;
mod make_unmake;
mod movegen;
mod perft;
mod pin_check;

use crate::bitboard::BitBoard;
use crate::castle_rights::Castling;
use crate::masks::{PIECE_TYPE_CNT, SQ_CNT};
use crate::score::{Score, Value};
use crate::square::{NO_SQ, SQ};
use crate::tables::TABLES;
use crate::types::{Piece, PieceType, Player};

pub use fen::STARTING_FEN;
pub use make_unmake::UndoRecord;
pub use perft::perft;

/// The coefficient space a tapered score is blended over: each non-pawn,
/// non-king piece contributes its usual weight, and the full set of
/// starting material sums to this value.
pub const TOTAL_PHASE: i32 = 24;

const KNIGHT_PHASE: i32 = 1;
const BISHOP_PHASE: i32 = 1;
const ROOK_PHASE: i32 = 2;
const QUEEN_PHASE: i32 = 4;

#[inline]
fn phase_weight(pt: PieceType) -> i32 {
    match pt {
        PieceType::N => KNIGHT_PHASE,
        PieceType::B => BISHOP_PHASE,
        PieceType::R => ROOK_PHASE,
        PieceType::Q => QUEEN_PHASE,
        _ => 0,
    }
}

#[derive(Clone)]
pub struct Position {
    board: [Piece; SQ_CNT],
    piece_bb: [[u64; PIECE_TYPE_CNT]; 2],
    occupied: [u64; 2],
    combined: u64,
    side_to_move: Player,
    castling: Castling,
    ep_square: SQ,
    halfmove_clock: u16,
    fullmove_number: u16,
    zobrist: u64,
    psq: Score,
    phase: i32,
    history: Vec<UndoRecord>,
}

impl Position {
    pub fn blank() -> Position {
        Position {
            board: [Piece::None; SQ_CNT],
            piece_bb: [[0u64; PIECE_TYPE_CNT]; 2],
            occupied: [0u64; 2],
            combined: 0,
            side_to_move: Player::White,
            castling: Castling::empty(),
            ep_square: NO_SQ,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist: 0,
            psq: Score::ZERO,
            phase: 0,
            history: Vec::with_capacity(64),
        }
    }

    pub fn start_pos() -> Position {
        fen::parse(STARTING_FEN).expect("starting FEN is always valid")
    }

    pub fn from_fen(s: &str) -> Result<Position, crate::error::FenParseError> {
        fen::parse(s)
    }

    #[inline]
    pub fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> Castling {
        self.castling
    }

    #[inline]
    pub fn ep_square(&self) -> SQ {
        self.ep_square
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn zobrist(&self) -> u64 {
        self.zobrist
    }

    #[inline]
    pub fn ply(&self) -> u16 {
        self.history.len() as u16
    }

    #[inline]
    pub fn piece_at_sq(&self, sq: SQ) -> Piece {
        self.board[sq.0 as usize]
    }

    #[inline]
    pub fn piece_bb(&self, player: Player, pt: PieceType) -> BitBoard {
        BitBoard(self.piece_bb[player as usize][pt as usize])
    }

    #[inline]
    pub fn occupied_by(&self, player: Player) -> BitBoard {
        BitBoard(self.occupied[player as usize])
    }

    #[inline]
    pub fn occupied(&self) -> BitBoard {
        BitBoard(self.combined)
    }

    #[inline]
    pub fn king_sq(&self, player: Player) -> SQ {
        self.piece_bb(player, PieceType::K).lsb()
    }

    /// Material-and-position score from White's perspective, blended by the
    /// current game phase. Positive favors White.
    pub fn evaluate_material_psqt(&self) -> Value {
        self.psq.blend(self.phase, TOTAL_PHASE)
    }

    /// The running game-phase coefficient: `TOTAL_PHASE` for a full set of
    /// minor/major pieces, trending toward `0` as they come off the board.
    #[inline]
    pub fn phase(&self) -> i32 {
        self.phase
    }

    pub fn in_check(&self) -> bool {
        self.checkers().is_not_empty()
    }

    /// True if the current position's Zobrist key matches one seen earlier
    /// at the same side to move, within the window the halfmove clock
    /// allows (a repetition cannot span a pawn move or a capture, since
    /// both reset the clock and are irreversible).
    pub fn is_repetition(&self) -> bool {
        let limit = self.halfmove_clock as usize;
        let len = self.history.len();
        let mut k = 2;
        let mut occurrences = 0;
        while k <= limit && k <= len {
            if self.history[len - k].zobrist_before == self.zobrist {
                occurrences += 1;
                if occurrences >= 2 {
                    return true;
                }
            }
            k += 2;
        }
        false
    }

    #[inline]
    fn put_piece(&mut self, piece: Piece, sq: SQ) {
        debug_assert_eq!(self.board[sq.0 as usize], Piece::None);
        let player = piece.player().expect("put_piece requires a real piece");
        let pt = piece.type_of();
        self.board[sq.0 as usize] = piece;
        self.piece_bb[player as usize][pt as usize] |= sq.to_bb();
        self.occupied[player as usize] |= sq.to_bb();
        self.combined |= sq.to_bb();
        self.zobrist ^= TABLES.zobrist().piece_at_sq(piece, sq);
        self.psq += TABLES.psqt_bonus(pt, player, sq);
        self.phase += phase_weight(pt);
    }

    #[inline]
    fn remove_piece(&mut self, sq: SQ) -> Piece {
        let piece = self.board[sq.0 as usize];
        debug_assert_ne!(piece, Piece::None);
        let player = piece.player().expect("remove_piece requires a real piece");
        let pt = piece.type_of();
        self.board[sq.0 as usize] = Piece::None;
        self.piece_bb[player as usize][pt as usize] &= !sq.to_bb();
        self.occupied[player as usize] &= !sq.to_bb();
        self.combined &= !sq.to_bb();
        self.zobrist ^= TABLES.zobrist().piece_at_sq(piece, sq);
        self.psq -= TABLES.psqt_bonus(pt, player, sq);
        self.phase -= phase_weight(pt);
        piece
    }

    #[inline]
    fn move_piece(&mut self, from: SQ, to: SQ) {
        let piece = self.remove_piece(from);
        self.put_piece(piece, to);
    }
}

/// Plays up to `choices.len()` pseudo-random legal moves from `pos`,
/// picking at each ply the move indexed by `choice % moves.len()`. Stops
/// early if a position has no legal moves. Used by the property tests
/// below to drive positions deep enough to exercise make/unmake and move
/// generation without needing a real PRNG dependency in non-dev code.
#[cfg(test)]
fn play_pseudo_random(pos: &mut Position, choices: &[usize]) {
    use crate::types::GenTypes;
    for &choice in choices {
        let moves = pos.generate_legal(GenTypes::All);
        if moves.is_empty() {
            break;
        }
        pos.apply_move(moves[choice % moves.len()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_pos_has_expected_material() {
        let pos = Position::start_pos();
        assert_eq!(pos.occupied_by(Player::White).count_bits(), 16);
        assert_eq!(pos.occupied_by(Player::Black).count_bits(), 16);
        assert_eq!(pos.phase, TOTAL_PHASE);
        assert!(!pos.in_check());
    }

    #[test]
    fn knight_shuffle_is_detected_as_repetition() {
        use crate::piece_move::make_quiet;
        use crate::square::{B1, C3, G8, F6};

        let mut pos = Position::start_pos();
        assert!(!pos.is_repetition());
        pos.apply_move(make_quiet(B1, C3));
        pos.apply_move(make_quiet(G8, F6));
        pos.apply_move(make_quiet(C3, B1));
        pos.apply_move(make_quiet(F6, G8));
        // Position has now occurred twice (start and this one) — not yet a
        // threefold repetition.
        assert!(!pos.is_repetition());
        pos.apply_move(make_quiet(B1, C3));
        pos.apply_move(make_quiet(G8, F6));
        pos.apply_move(make_quiet(C3, B1));
        pos.apply_move(make_quiet(F6, G8));
        // Third occurrence of the starting position.
        assert!(pos.is_repetition());
    }

    #[test]
    fn no_repetition_flagged_once_a_pawn_has_moved() {
        use crate::piece_move::{make_double_pawn_push, make_quiet};
        use crate::square::{B1, C3, E2, E4, G8, F6};

        let mut pos = Position::start_pos();
        pos.apply_move(make_double_pawn_push(E2, E4));
        pos.apply_move(make_quiet(G8, F6));
        pos.apply_move(make_quiet(B1, C3));
        pos.apply_move(make_quiet(F6, G8));
        assert_eq!(pos.halfmove_clock(), 3);
        assert!(!pos.is_repetition());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::square::SQ;
    use crate::types::GenTypes;
    use proptest::prelude::*;

    /// Every square is empty, white-occupied, or black-occupied, never
    /// more than one, and a square's piece-kind bitboards hold exactly one
    /// bit when the square is occupied, zero when it isn't.
    fn assert_material_mask_consistent(pos: &Position) {
        let white = pos.occupied_by(Player::White);
        let black = pos.occupied_by(Player::Black);
        assert!((white & black).is_empty(), "white/black occupancy overlap");
        for sq in 0u8..64 {
            let sq = SQ(sq);
            let occupied = pos.occupied().contains(sq);
            let piece = pos.piece_at_sq(sq);
            assert_eq!(piece != Piece::None, occupied, "occupancy/board mismatch at {sq:?}");
        }
    }

    proptest! {
        /// Property #1 (MaterialMask consistency) and #2 (hash bijection,
        /// make/unmake half): after any sequence of pseudo-random legal
        /// moves, board/occupancy invariants still hold at every step, and
        /// undoing the whole sequence restores the starting Zobrist key
        /// byte-for-byte.
        #[test]
        fn random_play_preserves_invariants_and_unmake_restores_hash(
            choices in prop::collection::vec(0usize..64, 0..24)
        ) {
            let mut pos = Position::start_pos();
            let start_hash = pos.zobrist();
            let mut played = 0;
            for &choice in &choices {
                let moves = pos.generate_legal(GenTypes::All);
                if moves.is_empty() {
                    break;
                }
                pos.apply_move(moves[choice % moves.len()]);
                played += 1;
                assert_material_mask_consistent(&pos);
            }
            for _ in 0..played {
                pos.undo_move();
            }
            prop_assert_eq!(pos.zobrist(), start_hash);
        }

        /// Property #3 (move generation legality): every move the legal
        /// generator returns, once applied, leaves the side that moved out
        /// of check — a pin or check-evasion bug would otherwise let the
        /// mover leave its own king exposed.
        #[test]
        fn every_generated_legal_move_leaves_mover_safe(
            choices in prop::collection::vec(0usize..64, 0..16)
        ) {
            let mut pos = Position::start_pos();
            play_pseudo_random(&mut pos, &choices);
            let mover = pos.side_to_move();
            for &mv in pos.generate_legal(GenTypes::All).iter() {
                pos.apply_move(mv);
                prop_assert!(!pos.is_attacked_by(pos.king_sq(mover), mover.other()));
                pos.undo_move();
            }
        }
    }
}
