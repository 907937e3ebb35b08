//! Time management: turns a UCI `go` command's clock/increment/movetime
//! parameters into a soft and hard budget for the current search, and lets
//! the search cooperatively check whether it has run out of time.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// What the UCI `go` command asked for.
#[derive(Copy, Clone, Debug, Default)]
pub struct SearchLimits {
    pub infinite: bool,
    pub depth: Option<u16>,
    pub nodes: Option<u64>,
    pub move_time_ms: Option<u64>,
    pub white_time_ms: Option<u64>,
    pub black_time_ms: Option<u64>,
    pub white_inc_ms: Option<u64>,
    pub black_inc_ms: Option<u64>,
    pub moves_to_go: Option<u32>,
}

/// A fraction of the remaining clock budgeted for one move, absent any
/// other constraint: enough moves are assumed still ahead that spending
/// 1/30th of the clock per move doesn't run it down prematurely.
const DEFAULT_MOVES_TO_GO: u32 = 30;

/// Fixed overhead subtracted from the computed budget to leave room for
/// engine-to-GUI communication latency, so the clock never reads genuinely
/// empty at the instant the move is sent.
const MOVE_OVERHEAD_MS: u64 = 50;

pub struct TimeManager {
    start: Instant,
    soft_limit_ms: AtomicU64,
    hard_limit_ms: AtomicU64,
    stop: AtomicBool,
}

impl TimeManager {
    pub fn new() -> TimeManager {
        TimeManager {
            start: Instant::now(),
            soft_limit_ms: AtomicU64::new(u64::MAX),
            hard_limit_ms: AtomicU64::new(u64::MAX),
            stop: AtomicBool::new(false),
        }
    }

    /// Begins a new timed search, computing soft/hard budgets from `limits`
    /// for the side to move (`white_to_move`).
    pub fn start_search(&self, limits: &SearchLimits, white_to_move: bool) {
        self.stop.store(false, Ordering::SeqCst);

        if let Some(ms) = limits.move_time_ms {
            self.soft_limit_ms.store(ms, Ordering::SeqCst);
            self.hard_limit_ms.store(ms, Ordering::SeqCst);
            return;
        }

        if limits.infinite || limits.depth.is_some() || limits.nodes.is_some() {
            self.soft_limit_ms.store(u64::MAX, Ordering::SeqCst);
            self.hard_limit_ms.store(u64::MAX, Ordering::SeqCst);
            return;
        }

        let (time_left, inc) = if white_to_move {
            (limits.white_time_ms.unwrap_or(0), limits.white_inc_ms.unwrap_or(0))
        } else {
            (limits.black_time_ms.unwrap_or(0), limits.black_inc_ms.unwrap_or(0))
        };
        let moves_to_go = limits.moves_to_go.unwrap_or(DEFAULT_MOVES_TO_GO).max(1) as u64;

        let usable = time_left.saturating_sub(MOVE_OVERHEAD_MS);
        let base = usable / moves_to_go + inc / 2;
        let soft = base.min(usable);
        let hard = (base * 3).min(usable);

        self.soft_limit_ms.store(soft, Ordering::SeqCst);
        self.hard_limit_ms.store(hard, Ordering::SeqCst);
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// True once the search has used its soft budget — iterative deepening
    /// should not start another full iteration, but may finish the current
    /// one.
    pub fn should_stop_soft(&self) -> bool {
        self.elapsed_ms() >= self.soft_limit_ms.load(Ordering::Relaxed)
    }

    /// True once the search has used its hard budget — the search must
    /// abort immediately, even mid-iteration.
    pub fn should_stop_hard(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
            || self.elapsed_ms() >= self.hard_limit_ms.load(Ordering::Relaxed)
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.stop.store(false, Ordering::SeqCst);
    }

    pub fn hard_limit(&self) -> Duration {
        Duration::from_millis(self.hard_limit_ms.load(Ordering::Relaxed))
    }
}

impl Default for TimeManager {
    fn default() -> Self {
        TimeManager::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movetime_pins_both_limits() {
        let tm = TimeManager::new();
        let limits = SearchLimits {
            move_time_ms: Some(500),
            ..Default::default()
        };
        tm.start_search(&limits, true);
        assert!(!tm.should_stop_hard());
    }

    #[test]
    fn infinite_never_stops_on_its_own() {
        let tm = TimeManager::new();
        let limits = SearchLimits {
            infinite: true,
            ..Default::default()
        };
        tm.start_search(&limits, true);
        assert!(!tm.should_stop_hard());
        assert!(!tm.should_stop_soft());
    }

    #[test]
    fn request_stop_forces_hard_stop() {
        let tm = TimeManager::new();
        tm.start_search(&SearchLimits::default(), true);
        tm.request_stop();
        assert!(tm.should_stop_hard());
    }
}
