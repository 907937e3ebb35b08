//! Engine-wide constants and the one-time global table initialization.

use once_cell::sync::Lazy;

use chess_core::tables::TABLES as CORE_TABLES;

/// Maximum search depth in plies. Bounds fixed-size ply-indexed arrays
/// (killer tables, PV tables) so they can live on the stack.
pub const MAX_PLY: usize = 126;

/// Upper bound on worker threads the pool will spin up, independent of how
/// many the host machine reports; keeps per-thread fixed allocations (stack
/// size, history tables) bounded.
pub const MAX_THREADS: usize = 256;

/// Default transposition table size, in megabytes.
pub const DEFAULT_TT_SIZE_MB: usize = 256;

/// Forces `chess_core`'s lazily-built attack/Zobrist/psqt tables to
/// initialize before the engine does any real work, so the first search
/// doesn't pay that cost mid-timed-move.
pub static GLOBALS_READY: Lazy<()> = Lazy::new(|| {
    Lazy::force(&CORE_TABLES);
});

pub fn init_globals() {
    Lazy::force(&GLOBALS_READY);
}
