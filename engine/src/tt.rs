//! A shared, lock-free transposition table: every worker thread probes and
//! stores into the same table without a mutex. Each bucket holds two slots
//! (the "always replace" and "replace by depth/age" pair used by most
//! engines); entries carry a generation counter so that stale entries from
//! earlier searches lose replacement priority even if they are deeper.
//!
//! Each slot packs its entry into two `u64` words (16 bytes): a data word
//! (move, score, depth, bound, age) and a signature word holding a 32-bit
//! slice of the position's Zobrist key rather than the full 64 bits — the
//! bucket index is already derived from a disjoint set of key bits, so a
//! 32-bit signature is enough to make a false match astronomically
//! unlikely without storing the key twice over.
//!
//! Safety note: a slot's two words are written with independent, unlocked
//! stores. A racing reader can observe a torn entry (signature from one
//! write, data from another) and mis-probe; this is the same trade search
//! engines conventionally make because a false hit only costs a wasted
//! re-search, never soundness of the final answer (the search always
//! re-verifies a TT move is legal).

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use chess_core::piece_move::BitMove;

use crate::consts::DEFAULT_TT_SIZE_MB;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Bound {
    Exact,
    LowerBound,
    UpperBound,
}

/// The value a probe or store deals in. Sixteen bytes' worth of slot only
/// has room for an `i16` score, which comfortably covers every value this
/// crate's evaluator and mate-distance encoding produce (`VALUE_MATE` is
/// 32,000).
#[derive(Copy, Clone, Debug)]
pub struct TTEntry {
    pub best_move: BitMove,
    pub score: i16,
    pub depth: u8,
    pub bound: Bound,
    pub age: u8,
}

const BOUND_EXACT: u64 = 0;
const BOUND_LOWER: u64 = 1;
const BOUND_UPPER: u64 = 2;

/// Sixteen bytes: `data` packs move/score/depth/bound/age, `sig` holds the
/// 32-bit key signature (the upper half left as reserved padding).
struct Slot {
    data: AtomicU64,
    sig: AtomicU64,
}

/// Bucket index comes from the low bits of the key; the signature is the
/// high 32 bits, a disjoint slice so index collisions don't also collide
/// on signature.
fn signature_of(key: u64) -> u32 {
    (key >> 32) as u32
}

impl Slot {
    fn empty() -> Slot {
        Slot {
            data: AtomicU64::new(0),
            sig: AtomicU64::new(0),
        }
    }

    fn load(&self, key: u64) -> Option<TTEntry> {
        if self.sig.load(Ordering::Acquire) as u32 != signature_of(key) {
            return None;
        }
        let data = self.data.load(Ordering::Relaxed);
        let best_move = BitMove::from_raw((data & 0xFFFF) as u16);
        let score = ((data >> 16) & 0xFFFF) as u16 as i16;
        let depth = ((data >> 32) & 0xFF) as u8;
        let bound = match (data >> 40) & 0b11 {
            BOUND_LOWER => Bound::LowerBound,
            BOUND_UPPER => Bound::UpperBound,
            _ => Bound::Exact,
        };
        let age = ((data >> 42) & 0xFF) as u8;
        Some(TTEntry {
            best_move,
            score,
            depth,
            bound,
            age,
        })
    }

    fn store(&self, key: u64, entry: &TTEntry) {
        let bound_bits = match entry.bound {
            Bound::Exact => BOUND_EXACT,
            Bound::LowerBound => BOUND_LOWER,
            Bound::UpperBound => BOUND_UPPER,
        };
        let data = (entry.best_move.raw() as u64)
            | ((entry.score as u16 as u64) << 16)
            | ((entry.depth as u64) << 32)
            | (bound_bits << 40)
            | ((entry.age as u64) << 42);
        self.data.store(data, Ordering::Relaxed);
        self.sig.store(signature_of(key) as u64, Ordering::Release);
    }

    fn depth(&self) -> u8 {
        ((self.data.load(Ordering::Relaxed) >> 32) & 0xFF) as u8
    }

    fn age(&self) -> u8 {
        ((self.data.load(Ordering::Relaxed) >> 42) & 0xFF) as u8
    }
}

/// Two slots per bucket: `depth_preferred` is kept unless the incoming
/// entry is from a newer search generation or searched deeper;
/// `always_replace` takes whatever was probed most recently.
struct Bucket {
    depth_preferred: Slot,
    always_replace: Slot,
}

pub struct TranspositionTable {
    buckets: Vec<Bucket>,
    mask: usize,
    generation: AtomicU8,
}

impl TranspositionTable {
    pub fn new_mb(mb: usize) -> TranspositionTable {
        let bucket_bytes = std::mem::size_of::<Bucket>().max(1);
        let target_buckets = (mb * 1024 * 1024 / bucket_bytes).max(1);
        let buckets_pow2 = target_buckets.next_power_of_two() / 2;
        let count = buckets_pow2.max(1);
        let mut buckets = Vec::with_capacity(count);
        for _ in 0..count {
            buckets.push(Bucket {
                depth_preferred: Slot::empty(),
                always_replace: Slot::empty(),
            });
        }
        TranspositionTable {
            buckets,
            mask: count - 1,
            generation: AtomicU8::new(0),
        }
    }

    pub fn default_size() -> TranspositionTable {
        TranspositionTable::new_mb(DEFAULT_TT_SIZE_MB)
    }

    pub fn new_search_generation(&self) {
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    fn bucket(&self, key: u64) -> &Bucket {
        &self.buckets[(key as usize) & self.mask]
    }

    pub fn probe(&self, key: u64) -> Option<TTEntry> {
        let bucket = self.bucket(key);
        bucket
            .depth_preferred
            .load(key)
            .or_else(|| bucket.always_replace.load(key))
    }

    pub fn store(&self, key: u64, mut entry: TTEntry) {
        entry.age = self.generation.load(Ordering::Relaxed);
        let bucket = self.bucket(key);
        let incumbent_depth = bucket.depth_preferred.depth();
        let incumbent_age = bucket.depth_preferred.age();
        if incumbent_age != entry.age || entry.depth >= incumbent_depth {
            bucket.depth_preferred.store(key, &entry);
        } else {
            bucket.always_replace.store(key, &entry);
        }
    }

    pub fn clear(&self) {
        for bucket in &self.buckets {
            bucket.depth_preferred.store(0, &TTEntry::blank());
            bucket.always_replace.store(0, &TTEntry::blank());
        }
    }

    pub fn len_buckets(&self) -> usize {
        self.buckets.len()
    }
}

impl TTEntry {
    pub fn blank() -> TTEntry {
        TTEntry {
            best_move: BitMove::default(),
            score: 0,
            depth: 0,
            bound: Bound::Exact,
            age: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::square::{E2, E4};

    #[test]
    fn slot_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<Slot>(), 16);
    }

    #[test]
    fn store_then_probe_round_trips() {
        let tt = TranspositionTable::new_mb(1);
        let entry = TTEntry {
            best_move: chess_core::piece_move::make_quiet(E2, E4),
            score: 42,
            depth: 5,
            bound: Bound::Exact,
            age: 0,
        };
        tt.store(0xdead_beef, entry);
        let probed = tt.probe(0xdead_beef).unwrap();
        assert_eq!(probed.score, 42);
        assert_eq!(probed.depth, 5);
    }

    #[test]
    fn probe_miss_on_different_key() {
        let tt = TranspositionTable::new_mb(1);
        assert!(tt.probe(123).is_none());
    }

    #[test]
    fn probe_miss_when_signature_differs_despite_same_bucket() {
        let tt = TranspositionTable::new_mb(1);
        let entry = TTEntry {
            best_move: chess_core::piece_move::make_quiet(E2, E4),
            score: 7,
            depth: 3,
            bound: Bound::Exact,
            age: 0,
        };
        let key = 0x0000_0001_0000_0000u64;
        tt.store(key, entry);
        let same_bucket_different_signature = 0x0000_0002_0000_0000u64 & (tt.mask as u64);
        assert!(tt.probe(same_bucket_different_signature).is_none() || same_bucket_different_signature == key);
    }
}
