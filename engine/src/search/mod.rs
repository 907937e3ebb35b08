//! Iterative-deepening negamax with alpha-beta pruning, quiescence search,
//! null-move pruning, and late-move reductions, backed by the shared
//! transposition table and the staged move generator in `chess_core`.

mod pv;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chess_core::piece_move::BitMove;
use chess_core::position::Position;
use chess_core::score::{
    is_mate_score, mate_in, mated_in, Value, VALUE_DRAW, VALUE_INFINITE, VALUE_MATE,
};
use chess_core::staged_movegen::StagedMoveGenerator;
use chess_core::types::GenTypes;

use crate::consts::MAX_PLY;
use crate::eval::evaluate;
use crate::history::{is_quiet, SearchHeuristics};
use crate::time::TimeManager;
use crate::tt::{Bound, TTEntry, TranspositionTable};

pub use pv::PVLine;

const NULL_MOVE_REDUCTION: u8 = 2;
const LMR_MIN_DEPTH: u8 = 3;
const LMR_MIN_MOVE_INDEX: usize = 3;

/// Per-thread search state. One per worker; threads share only the
/// transposition table, the time manager, and the atomic node counter.
pub struct SearchThread {
    pub heuristics: SearchHeuristics,
    pub nodes: u64,
    pub pv: PVLine,
    pub seldepth: u16,
}

impl SearchThread {
    pub fn new(player: chess_core::types::Player) -> SearchThread {
        SearchThread {
            heuristics: SearchHeuristics::new(player),
            nodes: 0,
            pv: PVLine::new(),
            seldepth: 0,
        }
    }
}

/// State shared across every search thread for one `go` command.
pub struct SearchShared {
    pub tt: Arc<TranspositionTable>,
    pub time: Arc<TimeManager>,
    pub global_nodes: AtomicU64,
}

/// Runs iterative deepening from `pos` up to `max_depth`, returning the
/// best move and score found. Search stops early once `shared.time` signals
/// a stop, always returning the last fully-completed iteration's move.
pub fn iterative_deepening(
    pos: &mut Position,
    shared: &SearchShared,
    thread: &mut SearchThread,
    max_depth: u16,
) -> (BitMove, Value) {
    let mut best_move = BitMove::default();
    let mut best_score = VALUE_DRAW;

    for depth in 1..=max_depth.min(MAX_PLY as u16) {
        thread.heuristics.set_player(pos.side_to_move());
        let score = negamax(
            pos,
            shared,
            thread,
            -VALUE_INFINITE,
            VALUE_INFINITE,
            depth as u8,
            0,
        );

        if shared.time.should_stop_hard() && depth > 1 {
            break;
        }

        if let Some(mv) = thread.pv.first() {
            best_move = mv;
            best_score = score;
        }

        if shared.time.should_stop_soft() || is_mate_score(score) {
            break;
        }
    }

    (best_move, best_score)
}

fn negamax(
    pos: &mut Position,
    shared: &SearchShared,
    thread: &mut SearchThread,
    mut alpha: Value,
    beta: Value,
    depth: u8,
    ply: u16,
) -> Value {
    thread.pv.clear_from(ply);
    thread.nodes += 1;
    shared.global_nodes.fetch_add(1, Ordering::Relaxed);

    if ply > 0 && (is_draw_by_fifty_move_rule(pos) || pos.is_repetition()) {
        return VALUE_DRAW;
    }

    if depth == 0 {
        return quiescence(pos, shared, thread, alpha, beta, ply);
    }

    if shared.time.should_stop_hard() {
        return evaluate(pos);
    }

    let key = pos.zobrist();
    let mut tt_move = BitMove::default();
    if let Some(entry) = shared.tt.probe(key) {
        tt_move = entry.best_move;
        if entry.depth as u8 >= depth {
            let tt_score = value_from_tt(entry.score as Value, ply);
            match entry.bound {
                Bound::Exact => return tt_score,
                Bound::LowerBound if tt_score >= beta => return tt_score,
                Bound::UpperBound if tt_score <= alpha => return tt_score,
                _ => {}
            }
        }
    }

    let in_check = pos.in_check();

    // Null-move pruning: skip our move entirely and see if the opponent is
    // still losing even with a free tempo. Skipped in check (there is no
    // legal null move out of check) and with no non-pawn material on the
    // board, where zugzwang makes the null move's assumption unsound.
    if !in_check && depth > NULL_MOVE_REDUCTION && has_non_pawn_material(pos) {
        let saved = pos.apply_null_move();
        let score = -negamax(
            pos,
            shared,
            thread,
            -beta,
            -beta + 1,
            depth.saturating_sub(1 + NULL_MOVE_REDUCTION),
            ply + 1,
        );
        pos.undo_null_move(saved);
        if score >= beta && !is_mate_score(score) {
            return beta;
        }
    }

    // Collected eagerly: the staged generator borrows `pos` immutably, but
    // every move below needs `pos` mutably to apply/undo it.
    let moves: Vec<BitMove> =
        StagedMoveGenerator::new(pos, &thread.heuristics, ply, Some(tt_move)).collect();

    let mut move_count = 0usize;
    let mut best_score = -VALUE_INFINITE;
    let mut best_move = BitMove::default();
    let original_alpha = alpha;

    for mv in moves {
        move_count += 1;
        let moving_piece_type = pos.piece_at_sq(mv.src()).type_of();

        pos.apply_move(mv);
        let gives_check = pos.in_check();

        let mut reduction = 0u8;
        if depth >= LMR_MIN_DEPTH
            && move_count > LMR_MIN_MOVE_INDEX
            && !in_check
            && !gives_check
            && is_quiet(moving_piece_type, mv)
        {
            reduction = 1;
        }

        let score = if move_count == 1 {
            -negamax(pos, shared, thread, -beta, -alpha, depth - 1, ply + 1)
        } else {
            let reduced_depth = depth.saturating_sub(1 + reduction);
            let mut s = -negamax(pos, shared, thread, -alpha - 1, -alpha, reduced_depth, ply + 1);
            if s > alpha && s < beta {
                s = -negamax(pos, shared, thread, -beta, -alpha, depth - 1, ply + 1);
            }
            s
        };
        pos.undo_move();

        if shared.time.should_stop_hard() {
            return best_score.max(alpha);
        }

        if score > best_score {
            best_score = score;
            best_move = mv;
            if score > alpha {
                alpha = score;
                thread.pv.update(ply, mv);
            }
        }

        if alpha >= beta {
            if is_quiet(moving_piece_type, mv) {
                thread.heuristics.killers.record(ply, mv);
                thread.heuristics.history.bonus(pos.side_to_move(), mv, depth);
            }
            break;
        }
    }

    if move_count == 0 {
        return if in_check { mated_in(ply as i32) } else { VALUE_DRAW };
    }

    let bound = if best_score <= original_alpha {
        Bound::UpperBound
    } else if best_score >= beta {
        Bound::LowerBound
    } else {
        Bound::Exact
    };
    shared.tt.store(
        key,
        TTEntry {
            best_move,
            score: value_to_tt(best_score, ply) as i16,
            depth,
            bound,
            age: 0,
        },
    );

    best_score
}

fn quiescence(
    pos: &mut Position,
    shared: &SearchShared,
    thread: &mut SearchThread,
    mut alpha: Value,
    beta: Value,
    ply: u16,
) -> Value {
    thread.nodes += 1;
    shared.global_nodes.fetch_add(1, Ordering::Relaxed);

    let stand_pat = evaluate(pos);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }
    if ply as usize >= MAX_PLY {
        return stand_pat;
    }

    let moves = pos.generate_legal(GenTypes::Captures);
    for &mv in moves.iter() {
        pos.apply_move(mv);
        let score = -quiescence(pos, shared, thread, -beta, -alpha, ply + 1);
        pos.undo_move();

        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

fn has_non_pawn_material(pos: &Position) -> bool {
    use chess_core::types::{PieceType, Player};
    for player in [Player::White, Player::Black] {
        for pt in [PieceType::N, PieceType::B, PieceType::R, PieceType::Q] {
            if pos.piece_bb(player, pt).is_not_empty() {
                return true;
            }
        }
    }
    false
}

fn is_draw_by_fifty_move_rule(pos: &Position) -> bool {
    pos.halfmove_clock() >= 100
}

/// Converts a mate score from "distance from the search root" (what
/// `negamax` computes and compares against alpha/beta at every node) to
/// "distance from this node" (what the transposition table stores), so the
/// same entry reports the correct mate distance no matter which path a
/// later probe reaches it by. Non-mate scores pass through unchanged.
fn value_to_tt(score: Value, ply: u16) -> Value {
    if !is_mate_score(score) {
        return score;
    }
    let ply = ply as Value;
    if score > 0 {
        score + ply
    } else {
        score - ply
    }
}

/// The inverse of [`value_to_tt`]: reconstitutes a node-relative mate score
/// read back from the transposition table into one relative to the current
/// search root, using this node's own `ply`.
fn value_from_tt(score: Value, ply: u16) -> Value {
    if !is_mate_score(score) {
        return score;
    }
    let ply = ply as Value;
    if score > 0 {
        score - ply
    } else {
        score + ply
    }
}

/// Adjusts a mate score found `ply` levels into the search so it reflects
/// distance from the true root rather than from this subtree; used when
/// reporting `info score mate N` over UCI.
pub fn adjust_mate_score_for_root(score: Value, ply: u16) -> Value {
    if score > VALUE_MATE - MAX_PLY as i32 {
        mate_in(score.abs_diff(VALUE_MATE) as i32 + ply as i32)
    } else if score < -(VALUE_MATE - MAX_PLY as i32) {
        mated_in((score + VALUE_MATE).unsigned_abs() as i32 - ply as i32)
    } else {
        score
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn play_pseudo_random(pos: &mut Position, choices: &[usize]) {
        for &choice in choices {
            let moves = pos.generate_legal(GenTypes::All);
            if moves.is_empty() {
                break;
            }
            pos.apply_move(moves[choice % moves.len()]);
        }
    }

    proptest! {
        /// Property #5 (zero-window soundness): a search called with
        /// `beta == alpha + 1` must fail either low (<= alpha) or high
        /// (>= beta); it must never return a value strictly between the
        /// two, since alpha-beta pruning relies on that never happening.
        #[test]
        fn zero_window_search_never_lands_inside_the_window(
            choices in prop::collection::vec(0usize..64, 0..10),
            alpha in -2000i32..2000,
        ) {
            let mut pos = Position::start_pos();
            play_pseudo_random(&mut pos, &choices);

            let shared = SearchShared {
                tt: Arc::new(TranspositionTable::new_mb(1)),
                time: Arc::new(TimeManager::new()),
                global_nodes: AtomicU64::new(0),
            };
            let mut thread = SearchThread::new(pos.side_to_move());
            let beta = alpha + 1;
            let score = negamax(&mut pos, &shared, &mut thread, alpha, beta, 3, 0);
            prop_assert!(score <= alpha || score >= beta);
        }

        /// value_to_tt/value_from_tt must be exact inverses at any ply, so
        /// a score survives a TT store/probe round trip unchanged.
        #[test]
        fn tt_mate_score_conversion_round_trips(
            score in -32000i32..=32000,
            ply in 0u16..120,
        ) {
            let stored = value_to_tt(score, ply);
            prop_assert_eq!(value_from_tt(stored, ply), score);
        }
    }
}
