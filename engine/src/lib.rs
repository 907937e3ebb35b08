//! `chess_engine` is the search, evaluation, time management, and UCI shell
//! built on top of `chess_core`'s board representation and move generation.

pub mod config;
pub mod consts;
pub mod engine;
pub mod eval;
pub mod history;
pub mod search;
pub mod threadpool;
pub mod time;
pub mod tt;
pub mod uci;

pub use engine::Engine;
pub use tt::TranspositionTable;
