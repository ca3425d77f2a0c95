//! Concurrent aggregation map keyed by station name.
//!
//! The map is split into a power-of-two number of shards, each an
//! `FxHashMap` behind its own mutex. A station always hashes to the same
//! shard, so every update to one station is serialized by that shard's
//! lock while stations in other shards proceed in parallel.

use crate::constants::{DEFAULT_SHARD_COUNT, EXPECTED_STATION_COUNT};
use crate::models::Stats;
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::hash::BuildHasher;
use std::sync::{Mutex, MutexGuard, PoisonError};

type Shard = FxHashMap<String, Stats>;

// Fibonacci multiplier; spreads the shard choice over all bits of the hash
// so keys within one shard still differ in the bits its table indexes by
const SHARD_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// Sharded station → [`Stats`] map supporting atomic per-key upserts
#[derive(Debug)]
pub struct StationMap {
    shards: Box<[Mutex<Shard>]>,
    shift: u32,
}

impl StationMap {
    /// Create a map with the default shard count
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARD_COUNT)
    }

    /// Create a map with at least `shard_count` shards, rounded up to a power of two
    pub fn with_shards(shard_count: usize) -> Self {
        let shard_count = shard_count.max(1).next_power_of_two();
        let per_shard = EXPECTED_STATION_COUNT.div_ceil(shard_count);

        let shards = (0..shard_count)
            .map(|_| Mutex::new(Shard::with_capacity_and_hasher(per_shard, FxBuildHasher)))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            shards,
            shift: u64::BITS - shard_count.trailing_zeros(),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Fold `temperature` into the entry for `station`, inserting it if absent
    ///
    /// Lookup, accumulation and install all happen under the station's shard
    /// lock, so concurrent upserts to the same station are linearizable.
    /// Returns the stats as installed by this call.
    pub fn upsert(&self, station: &str, temperature: f64) -> Stats {
        let mut shard = self.lock_shard(station);

        match shard.get_mut(station) {
            Some(stats) => {
                *stats = Stats::accumulate(Some(&*stats), temperature);
                *stats
            }
            None => {
                let stats = Stats::accumulate(None, temperature);
                shard.insert(station.to_owned(), stats);
                stats
            }
        }
    }

    /// Snapshot of the current stats for `station`
    pub fn get(&self, station: &str) -> Option<Stats> {
        self.lock_shard(station).get(station).copied()
    }

    /// Number of distinct stations seen so far
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| lock(shard).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| lock(shard).is_empty())
    }

    /// Consume the map and return every entry in ascending station order
    ///
    /// Taking `self` by value is the barrier between ingestion and reporting:
    /// once this is called no worker can hold a reference to the map.
    pub fn into_sorted(self) -> Vec<(String, Stats)> {
        let mut entries: Vec<(String, Stats)> = self
            .shards
            .into_vec()
            .into_iter()
            .flat_map(|shard| shard.into_inner().unwrap_or_else(PoisonError::into_inner))
            .collect();

        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    fn lock_shard(&self, station: &str) -> MutexGuard<'_, Shard> {
        lock(&self.shards[self.shard_index(station)])
    }

    fn shard_index(&self, station: &str) -> usize {
        let spread = FxBuildHasher.hash_one(station).wrapping_mul(SHARD_SPREAD);
        // a single shard takes no bits, and shifting a u64 by 64 overflows
        spread.checked_shr(self.shift).unwrap_or(0) as usize
    }
}

impl Default for StationMap {
    fn default() -> Self {
        Self::new()
    }
}

// Entries are only ever replaced whole, so a shard poisoned by a panicking
// worker still holds valid stats.
fn lock(shard: &Mutex<Shard>) -> MutexGuard<'_, Shard> {
    shard.lock().unwrap_or_else(PoisonError::into_inner)
}
