//! Applying and unapplying a [`BitMove`] on a [`Position`].
//!
//! Every apply pushes an [`UndoRecord`] capturing exactly what the inverse
//! operation needs: the move itself, whatever was captured, and the parts
//! of position state that aren't reconstructible from the move alone
//! (castling rights, en-passant square, hash, halfmove clock, and — for
//! promotions — which piece actually made the move).

use crate::castle_rights::Castling;
use crate::piece_move::{BitMove, MoveFlag};
use crate::square::{SQ, NO_SQ};
use crate::tables::TABLES;
use crate::types::{CastleType, Piece, PieceType, Player};

use super::Position;

/// Everything needed to invert one applied move.
#[derive(Copy, Clone, Debug)]
pub struct UndoRecord {
    pub mv: BitMove,
    pub captured: Piece,
    pub castling_before: Castling,
    pub ep_square_before: SQ,
    pub zobrist_before: u64,
    pub halfmove_clock_before: u16,
    pub moving_piece: Piece,
}

impl Position {
    /// Applies a pseudo-legal move. The caller is responsible for having
    /// already confirmed legality (move generation only yields legal moves,
    /// so in practice this is always true by construction).
    pub fn apply_move(&mut self, mv: BitMove) {
        let us = self.side_to_move;
        let them = us.other();
        let from = mv.src();
        let to = mv.dst();
        let moving_piece = self.piece_at_sq(from);
        debug_assert_ne!(moving_piece, Piece::None);

        let castling_before = self.castling;
        let ep_square_before = self.ep_square;
        let zobrist_before = self.zobrist;
        let halfmove_clock_before = self.halfmove_clock;

        if self.ep_square.is_okay() {
            self.zobrist ^= TABLES.zobrist().ep_file(self.ep_square.file() as u8);
        }
        self.ep_square = NO_SQ;

        let mut captured = Piece::None;
        let is_reset_move = moving_piece.type_of() == PieceType::P || mv.is_capture();

        match mv.decode() {
            MoveFlag::Quiet => {
                self.move_piece(from, to);
            }
            MoveFlag::DoublePawnPush => {
                self.move_piece(from, to);
                self.ep_square = SQ((from.0 + to.0) / 2);
                self.zobrist ^= TABLES.zobrist().ep_file(self.ep_square.file() as u8);
            }
            MoveFlag::Castle { king_side } => {
                self.move_piece(from, to);
                let (rook_from, rook_to) = castling_rook_squares(us, king_side);
                self.move_piece(rook_from, rook_to);
            }
            MoveFlag::Capture { ep: false } => {
                captured = self.remove_piece(to);
                self.move_piece(from, to);
            }
            MoveFlag::Capture { ep: true } => {
                let captured_sq = SQ(match us {
                    Player::White => to.0 - 8,
                    Player::Black => to.0 + 8,
                });
                captured = self.remove_piece(captured_sq);
                self.move_piece(from, to);
            }
            MoveFlag::Promotion { captures, piece } => {
                if captures {
                    captured = self.remove_piece(to);
                }
                self.remove_piece(from);
                self.put_piece(Piece::make(us, piece), to);
            }
        }

        let revoked = self.castling.update_for_move(from.0, to.0);
        if !revoked.is_empty() {
            self.zobrist ^= TABLES.zobrist().castle_rights(castling_before);
            self.zobrist ^= TABLES.zobrist().castle_rights(self.castling);
        }

        self.halfmove_clock = if is_reset_move {
            0
        } else {
            self.halfmove_clock + 1
        };
        if us == Player::Black {
            self.fullmove_number += 1;
        }

        self.zobrist ^= TABLES.zobrist().side_to_move();
        self.side_to_move = them;

        self.history.push(UndoRecord {
            mv,
            captured,
            castling_before,
            ep_square_before,
            zobrist_before,
            halfmove_clock_before,
            moving_piece,
        });
    }

    /// Reverses the most recently applied move. Panics if no move has been
    /// applied; callers only undo moves they themselves made.
    pub fn undo_move(&mut self) {
        let record = self.history.pop().expect("undo_move with empty history");
        let them = self.side_to_move;
        let us = them.other();
        self.side_to_move = us;

        let from = record.mv.src();
        let to = record.mv.dst();

        match record.mv.decode() {
            MoveFlag::Quiet | MoveFlag::DoublePawnPush => {
                self.move_piece(to, from);
            }
            MoveFlag::Castle { king_side } => {
                self.move_piece(to, from);
                let (rook_from, rook_to) = castling_rook_squares(us, king_side);
                self.move_piece(rook_to, rook_from);
            }
            MoveFlag::Capture { ep: false } => {
                self.move_piece(to, from);
                self.put_piece(record.captured, to);
            }
            MoveFlag::Capture { ep: true } => {
                self.move_piece(to, from);
                let captured_sq = SQ(match us {
                    Player::White => to.0 - 8,
                    Player::Black => to.0 + 8,
                });
                self.put_piece(record.captured, captured_sq);
            }
            MoveFlag::Promotion { captures, .. } => {
                self.remove_piece(to);
                self.put_piece(record.moving_piece, from);
                if captures {
                    self.put_piece(record.captured, to);
                }
            }
        }

        self.castling = record.castling_before;
        self.ep_square = record.ep_square_before;
        self.zobrist = record.zobrist_before;
        self.halfmove_clock = record.halfmove_clock_before;
        if us == Player::Black {
            self.fullmove_number -= 1;
        }
    }

    /// Applies a null move: flips the side to move and clears the
    /// en-passant square, without moving any piece. Used by null-move
    /// pruning in search; `undo_null_move` restores exactly what this
    /// changed.
    pub fn apply_null_move(&mut self) -> (SQ, u64) {
        let ep_before = self.ep_square;
        let zobrist_before = self.zobrist;
        if self.ep_square.is_okay() {
            self.zobrist ^= TABLES.zobrist().ep_file(self.ep_square.file() as u8);
        }
        self.ep_square = NO_SQ;
        self.zobrist ^= TABLES.zobrist().side_to_move();
        self.side_to_move = self.side_to_move.other();
        (ep_before, zobrist_before)
    }

    pub fn undo_null_move(&mut self, saved: (SQ, u64)) {
        self.side_to_move = self.side_to_move.other();
        self.ep_square = saved.0;
        self.zobrist = saved.1;
    }
}

fn castling_rook_squares(player: Player, king_side: bool) -> (SQ, SQ) {
    match (player, king_side) {
        (Player::White, true) => (SQ(7), SQ(5)),
        (Player::White, false) => (SQ(0), SQ(3)),
        (Player::Black, true) => (SQ(63), SQ(61)),
        (Player::Black, false) => (SQ(56), SQ(59)),
    }
}

/// The castle-type/king-side mapping used by move generation to decide which
/// rook accompanies a given castle move.
pub fn rook_for_castle(player: Player, side: CastleType) -> (SQ, SQ) {
    castling_rook_squares(player, matches!(side, CastleType::KingSide))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece_move::{make_double_pawn_push, make_quiet};
    use crate::position::Position;
    use crate::square::{E2, E4};

    #[test]
    fn apply_and_undo_restores_state() {
        let mut pos = Position::start_pos();
        let before_fen = pos.to_fen();
        let before_hash = pos.zobrist();
        pos.apply_move(make_double_pawn_push(E2, E4));
        assert_ne!(pos.to_fen(), before_fen);
        pos.undo_move();
        assert_eq!(pos.to_fen(), before_fen);
        assert_eq!(pos.zobrist(), before_hash);
    }

    #[test]
    fn double_push_sets_ep_square() {
        let mut pos = Position::start_pos();
        pos.apply_move(make_double_pawn_push(E2, E4));
        assert_eq!(pos.ep_square(), SQ(20));
    }

    #[test]
    #[should_panic]
    fn undo_without_apply_panics() {
        let mut pos = Position::start_pos();
        pos.undo_move();
    }

    #[test]
    fn halfmove_clock_resets_on_pawn_move() {
        let mut pos = Position::start_pos();
        pos.apply_move(make_quiet(SQ(1), SQ(18)));
        assert_eq!(pos.halfmove_clock(), 1);
        pos.apply_move(make_double_pawn_push(SQ(52), SQ(36)));
        assert_eq!(pos.halfmove_clock(), 0);
    }
}
