//! Minimal UCI command-line parsing: splits one input line into a
//! [`UciCommand`], tolerating the handful of arguments `go`, `position`, and
//! `setoption` accept.

use crate::time::SearchLimits;

#[derive(Debug, Clone)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    SetOption {
        name: String,
        value: Option<String>,
    },
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Go(SearchLimits),
    Stop,
    Quit,
    Unknown,
}

pub fn parse_command(line: &str) -> UciCommand {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("uci") => UciCommand::Uci,
        Some("isready") => UciCommand::IsReady,
        Some("ucinewgame") => UciCommand::UciNewGame,
        Some("setoption") => parse_setoption(tokens.collect()),
        Some("position") => parse_position(tokens.collect()),
        Some("go") => UciCommand::Go(parse_go(tokens.collect())),
        Some("stop") => UciCommand::Stop,
        Some("quit") => UciCommand::Quit,
        _ => UciCommand::Unknown,
    }
}

fn parse_setoption(tokens: Vec<&str>) -> UciCommand {
    let mut name_parts = Vec::new();
    let mut value_parts = Vec::new();
    let mut in_value = false;
    for tok in tokens {
        match tok {
            "name" => in_value = false,
            "value" => in_value = true,
            _ if in_value => value_parts.push(tok),
            _ => name_parts.push(tok),
        }
    }
    UciCommand::SetOption {
        name: name_parts.join(" "),
        value: if value_parts.is_empty() {
            None
        } else {
            Some(value_parts.join(" "))
        },
    }
}

fn parse_position(tokens: Vec<&str>) -> UciCommand {
    let mut iter = tokens.into_iter().peekable();
    let fen = match iter.peek().copied() {
        Some("startpos") => {
            iter.next();
            None
        }
        Some("fen") => {
            iter.next();
            let mut fen_parts = Vec::new();
            while let Some(&tok) = iter.peek() {
                if tok == "moves" {
                    break;
                }
                fen_parts.push(tok);
                iter.next();
            }
            Some(fen_parts.join(" "))
        }
        _ => None,
    };

    let mut moves = Vec::new();
    if let Some(&"moves") = iter.peek() {
        iter.next();
        moves.extend(iter.map(str::to_string));
    }

    UciCommand::Position { fen, moves }
}

fn parse_go(tokens: Vec<&str>) -> SearchLimits {
    let mut limits = SearchLimits::default();
    let mut iter = tokens.into_iter();
    while let Some(tok) = iter.next() {
        match tok {
            "infinite" => limits.infinite = true,
            "depth" => limits.depth = next_parsed(&mut iter),
            "nodes" => limits.nodes = next_parsed(&mut iter),
            "movetime" => limits.move_time_ms = next_parsed(&mut iter),
            "wtime" => limits.white_time_ms = next_parsed(&mut iter),
            "btime" => limits.black_time_ms = next_parsed(&mut iter),
            "winc" => limits.white_inc_ms = next_parsed(&mut iter),
            "binc" => limits.black_inc_ms = next_parsed(&mut iter),
            "movestogo" => limits.moves_to_go = next_parsed(&mut iter),
            _ => {}
        }
    }
    limits
}

fn next_parsed<'a, T: std::str::FromStr>(iter: &mut impl Iterator<Item = &'a str>) -> Option<T> {
    iter.next().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_position_with_moves() {
        match parse_command("position startpos moves e2e4 e7e5") {
            UciCommand::Position { fen, moves } => {
                assert!(fen.is_none());
                assert_eq!(moves, vec!["e2e4", "e7e5"]);
            }
            other => panic!("expected Position, got {other:?}"),
        }
    }

    #[test]
    fn parses_go_with_clock() {
        match parse_command("go wtime 60000 btime 60000 winc 0 binc 0") {
            UciCommand::Go(limits) => {
                assert_eq!(limits.white_time_ms, Some(60000));
                assert_eq!(limits.black_time_ms, Some(60000));
            }
            other => panic!("expected Go, got {other:?}"),
        }
    }

    #[test]
    fn parses_fen_position() {
        match parse_command("position fen 8/8/8/8/8/8/8/K6k w - - 0 1 moves") {
            UciCommand::Position { fen, moves } => {
                assert_eq!(fen.as_deref(), Some("8/8/8/8/8/8/8/K6k w - - 0 1"));
                assert!(moves.is_empty());
            }
            other => panic!("expected Position, got {other:?}"),
        }
    }

    #[test]
    fn parses_setoption_hash() {
        match parse_command("setoption name Hash value 128") {
            UciCommand::SetOption { name, value } => {
                assert_eq!(name, "Hash");
                assert_eq!(value.as_deref(), Some("128"));
            }
            other => panic!("expected SetOption, got {other:?}"),
        }
    }
}
