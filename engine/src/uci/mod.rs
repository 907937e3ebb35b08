//! The UCI command loop: reads engine-protocol commands from stdin and
//! drives an [`Engine`] accordingly, printing responses to stdout.

mod parse;

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use std::thread;

use chess_core::piece_move::BitMove;
use chess_core::position::Position;
use chess_core::types::GenTypes;

use crate::config::EngineConfig;
use crate::engine::{Engine, ID_AUTHOR, ID_NAME, MAX_SEARCH_DEPTH};
use crate::search::adjust_mate_score_for_root;
use crate::time::TimeManager;

pub use parse::{parse_command, UciCommand};

/// Runs the UCI loop to completion (`quit` or EOF on stdin).
pub fn run(config: EngineConfig) {
    let mut engine = Engine::new();
    engine.set_hash_size_mb(config.hash_mb);
    engine.set_threads(config.threads);
    let engine = Arc::new(Mutex::new(engine));
    let time_handle: Arc<TimeManager> = engine.lock().unwrap().time_handle();
    let stdin = io::stdin();
    tracing::info!("{ID_NAME} ready, waiting for UCI commands");

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        tracing::debug!(command = %line, "received UCI command");
        match parse_command(line.trim()) {
            UciCommand::Uci => {
                println!("id name {ID_NAME}");
                println!("id author {ID_AUTHOR}");
                println!("option name Hash type spin default 256 min 1 max 65536");
                println!("option name Threads type spin default 1 min 1 max 256");
                println!("uciok");
                flush();
            }
            UciCommand::IsReady => {
                println!("readyok");
                flush();
            }
            UciCommand::UciNewGame => {
                engine.lock().unwrap().new_game();
            }
            UciCommand::SetOption { name, value } => {
                apply_option(&engine, &name, value.as_deref());
            }
            UciCommand::Position { fen, moves } => {
                apply_position(&engine, fen, moves);
            }
            UciCommand::Go(limits) => {
                run_go(Arc::clone(&engine), limits);
            }
            UciCommand::Stop => {
                time_handle.request_stop();
            }
            UciCommand::Quit => break,
            UciCommand::Unknown => {
                tracing::warn!(line = %line, "unrecognized UCI command");
            }
        }
    }
    tracing::info!("exiting UCI loop");
}

fn flush() {
    let _ = io::stdout().flush();
}

fn apply_option(engine: &Arc<Mutex<Engine>>, name: &str, value: Option<&str>) {
    let mut engine = engine.lock().unwrap();
    match name.to_ascii_lowercase().as_str() {
        "hash" => {
            if let Some(mb) = value.and_then(|v| v.parse::<usize>().ok()) {
                engine.set_hash_size_mb(mb);
            }
        }
        "threads" => {
            if let Some(n) = value.and_then(|v| v.parse::<usize>().ok()) {
                engine.set_threads(n);
            }
        }
        _ => {}
    }
}

fn apply_position(engine: &Arc<Mutex<Engine>>, fen: Option<String>, moves: Vec<String>) {
    let mut pos = match fen {
        Some(fen) => Position::from_fen(&fen).unwrap_or_else(|_| Position::start_pos()),
        None => Position::start_pos(),
    };
    for mv_str in &moves {
        match find_legal_move(&pos, mv_str) {
            Some(mv) => pos.apply_move(mv),
            None => break,
        }
    }
    engine.lock().unwrap().set_position(pos);
}

fn find_legal_move(pos: &Position, uci: &str) -> Option<BitMove> {
    pos.generate_legal(GenTypes::All)
        .iter()
        .copied()
        .find(|mv| mv.to_uci_string() == uci)
}

fn run_go(engine: Arc<Mutex<Engine>>, limits: crate::time::SearchLimits) {
    thread::spawn(move || {
        let result = engine.lock().unwrap().go(limits, MAX_SEARCH_DEPTH);
        let reported_score = adjust_mate_score_for_root(result.score, 0);
        println!(
            "info depth {MAX_SEARCH_DEPTH} score cp {reported_score} nodes {} pv {}",
            result.nodes, result.best_move
        );
        println!("bestmove {}", result.best_move);
        flush();
        tracing::info!(best_move = %result.best_move, score = reported_score, nodes = result.nodes, "search finished");
    });
}
