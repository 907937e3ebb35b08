//! Triangular principal-variation table: each ply stores its own best
//! continuation, rebuilt bottom-up as `negamax` unwinds so the root always
//! ends up holding the full predicted line.

use chess_core::piece_move::BitMove;

use crate::consts::MAX_PLY;

pub struct PVLine {
    table: Vec<Vec<BitMove>>,
}

impl PVLine {
    pub fn new() -> PVLine {
        PVLine {
            table: vec![Vec::new(); MAX_PLY + 1],
        }
    }

    pub fn clear_from(&mut self, ply: u16) {
        if let Some(slot) = self.table.get_mut(ply as usize) {
            slot.clear();
        }
    }

    /// Called when `mv` becomes the new best move at `ply`: prepends it to
    /// whatever continuation the child search already settled on.
    pub fn update(&mut self, ply: u16, mv: BitMove) {
        let ply = ply as usize;
        let mut line = Vec::with_capacity(1 + self.table.get(ply + 1).map_or(0, Vec::len));
        line.push(mv);
        if let Some(child) = self.table.get(ply + 1) {
            line.extend_from_slice(child);
        }
        self.table[ply] = line;
    }

    pub fn first(&self) -> Option<BitMove> {
        self.table[0].first().copied()
    }

    pub fn line(&self) -> &[BitMove] {
        &self.table[0]
    }
}

impl Default for PVLine {
    fn default() -> Self {
        PVLine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::square::{D2, D4, E2, E4};

    #[test]
    fn update_prepends_child_line() {
        let mut pv = PVLine::new();
        pv.update(1, chess_core::piece_move::make_quiet(D2, D4));
        pv.update(0, chess_core::piece_move::make_quiet(E2, E4));
        assert_eq!(pv.line().len(), 2);
        assert_eq!(pv.first(), Some(chess_core::piece_move::make_quiet(E2, E4)));
    }
}
