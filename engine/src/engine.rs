//! `Engine`: the top-level orchestrator tying together a [`Position`], the
//! shared transposition table, the time manager, and the worker pool behind
//! the small surface the UCI loop drives.

use std::sync::Arc;

use chess_core::piece_move::BitMove;
use chess_core::position::Position;
use chess_core::types::Player;

use crate::consts;
use crate::threadpool::{SearchResult, ThreadPool};
use crate::time::{SearchLimits, TimeManager};
use crate::tt::TranspositionTable;

pub const ID_NAME: &str = "Vellamo";
pub const ID_AUTHOR: &str = "The Vellamo Authors";

/// A depth deep enough that real games are decided by time, not by running
/// out of plies; iterative deepening always stops earlier via the time
/// manager in practice.
pub const MAX_SEARCH_DEPTH: u16 = 64;

pub struct Engine {
    pos: Position,
    tt: Arc<TranspositionTable>,
    time: Arc<TimeManager>,
    pool: ThreadPool,
}

impl Engine {
    pub fn new() -> Engine {
        consts::init_globals();
        Engine {
            pos: Position::start_pos(),
            tt: Arc::new(TranspositionTable::default_size()),
            time: Arc::new(TimeManager::new()),
            pool: ThreadPool::new(1),
        }
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn set_position(&mut self, pos: Position) {
        self.pos = pos;
    }

    pub fn set_hash_size_mb(&mut self, mb: usize) {
        self.tt = Arc::new(TranspositionTable::new_mb(mb.max(1)));
    }

    pub fn set_threads(&mut self, threads: usize) {
        self.pool = ThreadPool::new(threads.max(1));
    }

    /// A cloned handle to the time manager, so the UCI loop can request a
    /// stop from a different thread without locking the whole engine.
    pub fn time_handle(&self) -> Arc<TimeManager> {
        Arc::clone(&self.time)
    }

    pub fn new_game(&mut self) {
        self.tt.clear();
        self.pos = Position::start_pos();
    }

    pub fn apply_move(&mut self, mv: BitMove) {
        self.pos.apply_move(mv);
    }

    /// Starts a timed search from the current position and blocks until it
    /// finishes. `max_depth` bounds iterative deepening; in practice the
    /// time manager's soft/hard budget ends the search first.
    pub fn go(&mut self, limits: SearchLimits, max_depth: u16) -> SearchResult {
        let white_to_move = self.pos.side_to_move() == Player::White;
        self.time.start_search(&limits, white_to_move);
        tracing::debug!(threads = self.pool.num_threads(), "search starting");
        self.pool
            .search(&self.pos, Arc::clone(&self.tt), Arc::clone(&self.time), max_depth)
    }

    pub fn stop(&self) {
        self.time.request_stop();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
