//! Static position evaluation: material plus the tapered piece-square
//! bonuses `chess_core` tracks incrementally, plus a handful of
//! evaluation terms too position-specific to fold into a table (mobility,
//! king safety via pawn shield, bishop pair, rook on open file).

use chess_core::position::{Position, TOTAL_PHASE};
use chess_core::score::{Value, VALUE_DRAW};
use chess_core::types::{GenTypes, PieceType, Player};

const BISHOP_PAIR_BONUS: Value = 30;
const ROOK_OPEN_FILE_BONUS: Value = 20;
const ROOK_SEMI_OPEN_FILE_BONUS: Value = 10;
const MOBILITY_WEIGHT: Value = 2;

const DOUBLED_PAWN_PENALTY: Value = 12;
const PASSED_PAWN_BONUS: Value = 24;
const PASSED_PAWN_DEFENDED_BONUS: Value = 10;
const DEFENDED_PAWN_BONUS: Value = 6;

const MOPUP_MATERIAL_THRESHOLD: Value = 400;
const MOPUP_KING_DISTANCE_WEIGHT: Value = 6;
const MOPUP_CENTER_WEIGHT: Value = 4;

/// Evaluates `pos` from the side-to-move's perspective: positive means the
/// side to move stands better.
pub fn evaluate(pos: &Position) -> Value {
    let white = evaluate_white_perspective(pos);
    match pos.side_to_move() {
        Player::White => white,
        Player::Black => -white,
    }
}

fn evaluate_white_perspective(pos: &Position) -> Value {
    let mut score = pos.evaluate_material_psqt();

    score += bishop_pair_term(pos, Player::White) - bishop_pair_term(pos, Player::Black);
    score += rook_file_term(pos, Player::White) - rook_file_term(pos, Player::Black);
    score += mobility_term(pos, Player::White) - mobility_term(pos, Player::Black);
    score += pawn_structure_term(pos, Player::White) - pawn_structure_term(pos, Player::Black);
    score += mopup_term(pos);

    if is_drawn_by_insufficient_material(pos) {
        return VALUE_DRAW;
    }

    score
}

fn bishop_pair_term(pos: &Position, player: Player) -> Value {
    if pos.piece_bb(player, PieceType::B).count_bits() >= 2 {
        BISHOP_PAIR_BONUS
    } else {
        0
    }
}

fn rook_file_term(pos: &Position, player: Player) -> Value {
    let mut bonus = 0;
    let own_pawns = pos.piece_bb(player, PieceType::P);
    let enemy_pawns = pos.piece_bb(player.other(), PieceType::P);
    for rook_sq in pos.piece_bb(player, PieceType::R) {
        let file_bb = chess_core::masks::file_bb(rook_sq.0);
        let own_on_file = (own_pawns.0 & file_bb) != 0;
        let enemy_on_file = (enemy_pawns.0 & file_bb) != 0;
        if !own_on_file && !enemy_on_file {
            bonus += ROOK_OPEN_FILE_BONUS;
        } else if !own_on_file {
            bonus += ROOK_SEMI_OPEN_FILE_BONUS;
        }
    }
    bonus
}

/// Crude mobility: count of pseudo-legal attacked squares for minor and
/// major pieces. Cheaper than full legal-move counting and a reasonable
/// proxy for how cramped a side's pieces are.
fn mobility_term(pos: &Position, player: Player) -> Value {
    let occupied = pos.occupied();
    let own = pos.occupied_by(player);
    let mut total = 0i32;
    for pt in [PieceType::N, PieceType::B, PieceType::R, PieceType::Q] {
        for sq in pos.piece_bb(player, pt) {
            let attacks = chess_core::tables::TABLES.attacks_for(pt, sq, occupied, player);
            total += (attacks & !own).count_bits() as i32;
        }
    }
    total * MOBILITY_WEIGHT
}

/// Doubled-pawn penalty, passed-pawn bonus (extra if the passer is itself
/// pawn-defended), and a bonus for any pawn defended by another pawn.
/// Blended implicitly through `phase` since the bonuses below are already
/// modest flat centipawn terms rather than a second tapered table.
fn pawn_structure_term(pos: &Position, player: Player) -> Value {
    let own_pawns = pos.piece_bb(player, PieceType::P);
    let enemy_pawns = pos.piece_bb(player.other(), PieceType::P);
    let mut score = 0;

    for file in 0u8..8 {
        let file_bb = chess_core::masks::file_bb(file);
        let count = (own_pawns.0 & file_bb).count_ones();
        if count > 1 {
            score -= DOUBLED_PAWN_PENALTY * (count as i32 - 1);
        }
    }

    for sq in own_pawns {
        let file = chess_core::masks::file_idx_of_sq(sq.0);
        let rank = chess_core::masks::rank_idx_of_sq(sq.0);

        let mut front_files = chess_core::masks::file_bb(file);
        if file > 0 {
            front_files |= chess_core::masks::file_bb(file - 1);
        }
        if file < 7 {
            front_files |= chess_core::masks::file_bb(file + 1);
        }
        let ahead_mask = match player {
            Player::White => ranks_above(rank),
            Player::Black => ranks_below(rank),
        };
        let blockers = enemy_pawns.0 & front_files & ahead_mask;
        if blockers == 0 {
            score += PASSED_PAWN_BONUS;
            let defenders = chess_core::tables::TABLES.pawn_attacks_from(sq, player.other())
                & own_pawns;
            if defenders.is_not_empty() {
                score += PASSED_PAWN_DEFENDED_BONUS;
            }
        }

        let defenders = chess_core::tables::TABLES.pawn_attacks_from(sq, player.other()) & own_pawns;
        if defenders.is_not_empty() {
            score += DEFENDED_PAWN_BONUS;
        }
    }

    score
}

fn ranks_above(rank: u8) -> u64 {
    let mut mask = 0u64;
    for r in (rank + 1)..8 {
        mask |= chess_core::masks::rank_bb(r * 8);
    }
    mask
}

fn ranks_below(rank: u8) -> u64 {
    let mut mask = 0u64;
    for r in 0..rank {
        mask |= chess_core::masks::rank_bb(r * 8);
    }
    mask
}

/// King-hunt bonus applied only when one side has a decisive material edge
/// and the game has reached an endgame-like phase: push the weaker king away
/// and pull the stronger side's king toward the center to help force mate.
fn mopup_term(pos: &Position) -> Value {
    if pos.phase() >= TOTAL_PHASE / 2 {
        return 0;
    }

    let material = |player: Player| -> i32 {
        [PieceType::N, PieceType::B, PieceType::R, PieceType::Q]
            .iter()
            .map(|&pt| pos.piece_bb(player, pt).count_bits() as i32 * pt.value() as i32)
            .sum()
    };
    let white_material = material(Player::White);
    let black_material = material(Player::Black);
    let diff = white_material - black_material;
    if diff.abs() < MOPUP_MATERIAL_THRESHOLD {
        return 0;
    }

    let (strong, weak) = if diff > 0 {
        (Player::White, Player::Black)
    } else {
        (Player::Black, Player::White)
    };
    let strong_king = pos.king_sq(strong);
    let weak_king = pos.king_sq(weak);

    let file_dist = (chess_core::masks::file_idx_of_sq(strong_king.0) as i32
        - chess_core::masks::file_idx_of_sq(weak_king.0) as i32)
        .abs();
    let rank_dist = (chess_core::masks::rank_idx_of_sq(strong_king.0) as i32
        - chess_core::masks::rank_idx_of_sq(weak_king.0) as i32)
        .abs();
    let king_distance_bonus = (14 - (file_dist + rank_dist)) * MOPUP_KING_DISTANCE_WEIGHT;

    let center_distance = center_edge_distance(strong_king.0);
    let center_bonus = (3 - center_distance) * MOPUP_CENTER_WEIGHT;

    let bonus = king_distance_bonus + center_bonus;
    if strong == Player::White {
        bonus
    } else {
        -bonus
    }
}

fn center_edge_distance(sq: u8) -> i32 {
    let file = chess_core::masks::file_idx_of_sq(sq) as i32;
    let rank = chess_core::masks::rank_idx_of_sq(sq) as i32;
    let file_edge = file.min(7 - file);
    let rank_edge = rank.min(7 - rank);
    file_edge.min(rank_edge)
}

fn is_drawn_by_insufficient_material(pos: &Position) -> bool {
    let has_major_or_pawn = |p: Player| {
        pos.piece_bb(p, PieceType::P).is_not_empty()
            || pos.piece_bb(p, PieceType::R).is_not_empty()
            || pos.piece_bb(p, PieceType::Q).is_not_empty()
    };
    if has_major_or_pawn(Player::White) || has_major_or_pawn(Player::Black) {
        return false;
    }
    let minors = |p: Player| {
        pos.piece_bb(p, PieceType::N).count_bits() + pos.piece_bb(p, PieceType::B).count_bits()
    };
    minors(Player::White) <= 1 && minors(Player::Black) <= 1
}

/// True if `pos` has no legal moves and is not in check: a draw by
/// stalemate. Kept separate from [`evaluate`] since search needs to
/// distinguish "no moves" from "evaluated score" at different points.
pub fn is_stalemate(pos: &Position) -> bool {
    !pos.in_check() && pos.generate_legal(GenTypes::All).is_empty()
}

pub fn is_checkmate(pos: &Position) -> bool {
    pos.in_check() && pos.generate_legal(GenTypes::All).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_pos_is_balanced() {
        let pos = Position::start_pos();
        assert_eq!(evaluate(&pos), 0);
    }

    #[test]
    fn favors_side_with_extra_pawn() {
        let white_up = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(evaluate(&white_up) > 0);
        let black_to_move = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 b - - 0 1").unwrap();
        assert!(evaluate(&black_to_move) < 0);
    }
}
