//! Lazy-SMP worker pool: every worker runs its own iterative-deepening
//! search against a private copy of the root position, sharing only the
//! transposition table and the time manager. Extra threads exist to seed
//! the shared table with different move orderings, not to split the tree;
//! the main worker's line is what gets reported.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chess_core::piece_move::BitMove;
use chess_core::position::Position;
use chess_core::score::Value;

use crate::consts::MAX_THREADS;
use crate::search::{iterative_deepening, SearchShared, SearchThread};
use crate::time::TimeManager;
use crate::tt::TranspositionTable;

pub struct SearchResult {
    pub best_move: BitMove,
    pub score: Value,
    pub nodes: u64,
}

pub struct ThreadPool {
    num_threads: usize,
}

impl ThreadPool {
    pub fn new(num_threads: usize) -> ThreadPool {
        ThreadPool {
            num_threads: num_threads.clamp(1, MAX_THREADS),
        }
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Runs a Lazy-SMP search rooted at `root` up to `max_depth`, sharing
    /// `tt` and `time` across every worker. Blocks until every worker
    /// either completes `max_depth` or `time` calls a halt.
    pub fn search(
        &self,
        root: &Position,
        tt: Arc<TranspositionTable>,
        time: Arc<TimeManager>,
        max_depth: u16,
    ) -> SearchResult {
        tt.new_search_generation();
        let shared = SearchShared {
            tt,
            time,
            global_nodes: AtomicU64::new(0),
        };
        let player = root.side_to_move();

        let main_result = crossbeam_utils::thread::scope(|scope| {
            for _ in 1..self.num_threads {
                let mut pos = root.clone();
                let shared_ref = &shared;
                scope.spawn(move |_| {
                    let mut thread = SearchThread::new(player);
                    iterative_deepening(&mut pos, shared_ref, &mut thread, max_depth);
                });
            }

            let mut main_pos = root.clone();
            let mut main_thread = SearchThread::new(player);
            iterative_deepening(&mut main_pos, &shared, &mut main_thread, max_depth)
        })
        .expect("a search worker panicked");

        SearchResult {
            best_move: main_result.0,
            score: main_result.1,
            nodes: shared.global_nodes.load(Ordering::Relaxed),
        }
    }
}

impl Default for ThreadPool {
    fn default() -> Self {
        ThreadPool::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_thread_finds_a_move_from_startpos() {
        let pool = ThreadPool::new(1);
        let tt = Arc::new(TranspositionTable::new_mb(1));
        let time = Arc::new(TimeManager::new());
        let limits = crate::time::SearchLimits {
            depth: Some(3),
            ..Default::default()
        };
        time.start_search(&limits, true);
        let result = pool.search(&Position::start_pos(), tt, time, 3);
        assert!(!result.best_move.is_null());
    }
}
