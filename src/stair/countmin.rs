// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::hash::probe_index;
use crate::stair::DEFAULT_LEVELS;
use crate::stair::Slot;
use crate::stair::StairSketch;
use crate::stair::partition;

/// Number of counter rows each Count-Min slot uses by default.
pub const DEFAULT_NUM_ROWS: u32 = 2;

/// A stair sketch estimating per-window counts with Count-Min slots.
///
/// Estimates never undercount: a single-window query returns at least the
/// item's count in that window, a range query at least its count over the
/// range.
///
/// # Examples
///
/// ```
/// use windowbench::WindowSketch;
/// use windowbench::stair::StairCountMin;
///
/// let mut sketch = StairCountMin::with_memory(1 << 16, 3);
/// sketch.update_with_weight(1, &"apple", 3);
/// sketch.update_with_weight(2, &"apple", 2);
///
/// assert!(sketch.query(2, &"apple") >= 2);
/// assert!(sketch.query_range(1, 2, &"apple") >= 5);
/// ```
pub type StairCountMin = StairSketch<CountMinSlot>;

impl StairSketch<CountMinSlot> {
    /// Builds a Count-Min stair over `levels + 1` levels sharing `memory` bytes.
    pub fn with_memory(memory: usize, levels: u32) -> Self {
        Self::from_levels(&partition(memory, levels), CountMinParams::default())
    }

    /// Builds a stair whose slots use conservative update: an insertion only
    /// raises the counters that currently hold the item's minimum.
    pub fn conservative(memory: usize, levels: u32) -> Self {
        let params = CountMinParams {
            conservative: true,
            ..CountMinParams::default()
        };
        Self::from_levels(&partition(memory, levels), params)
    }

    /// Builds a Count-Min stair with [`DEFAULT_LEVELS`] levels.
    pub fn with_default_levels(memory: usize) -> Self {
        Self::with_memory(memory, DEFAULT_LEVELS)
    }
}

/// Parameters shared by every [`CountMinSlot`] of a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountMinParams {
    /// Number of counter rows (hash functions).
    pub num_rows: u32,
    /// Whether insertions use conservative update.
    pub conservative: bool,
}

impl Default for CountMinParams {
    fn default() -> Self {
        CountMinParams {
            num_rows: DEFAULT_NUM_ROWS,
            conservative: false,
        }
    }
}

/// A Count-Min slot: `num_rows` rows of saturating 32-bit counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMinSlot {
    params: CountMinParams,
    num_buckets: u64,
    counters: Vec<u32>,
}

impl CountMinSlot {
    /// Returns the number of buckets per row.
    pub fn num_buckets(&self) -> u64 {
        self.num_buckets
    }

    fn counter_index(&self, row: u32, h1: u64, h2: u64) -> usize {
        let bucket = probe_index(h1, h2, row, self.num_buckets);
        (u64::from(row) * self.num_buckets + bucket) as usize
    }
}

impl Slot for CountMinSlot {
    type Params = CountMinParams;

    fn with_memory(bytes: usize, params: CountMinParams) -> Self {
        assert!(params.num_rows > 0, "a Count-Min slot needs at least one row");
        let row_bytes = size_of::<u32>() as u64 * u64::from(params.num_rows);
        let num_buckets = (bytes as u64 / row_bytes).max(1);
        CountMinSlot {
            params,
            num_buckets,
            counters: vec![0; (num_buckets * u64::from(params.num_rows)) as usize],
        }
    }

    fn insert(&mut self, h1: u64, h2: u64, weight: u64) {
        let weight = u32::try_from(weight).unwrap_or(u32::MAX);
        if self.params.conservative {
            let target = self.probe(h1, h2).saturating_add(u64::from(weight));
            let target = u32::try_from(target).unwrap_or(u32::MAX);
            for row in 0..self.params.num_rows {
                let index = self.counter_index(row, h1, h2);
                self.counters[index] = self.counters[index].max(target);
            }
        } else {
            for row in 0..self.params.num_rows {
                let index = self.counter_index(row, h1, h2);
                self.counters[index] = self.counters[index].saturating_add(weight);
            }
        }
    }

    fn probe(&self, h1: u64, h2: u64) -> u64 {
        (0..self.params.num_rows)
            .map(|row| u64::from(self.counters[self.counter_index(row, h1, h2)]))
            .min()
            .unwrap_or(0)
    }

    fn merge(&mut self, other: &Self) {
        assert_eq!(
            self.counters.len(),
            other.counters.len(),
            "cannot merge Count-Min slots of different shapes"
        );
        for (counter, other_counter) in self.counters.iter_mut().zip(&other.counters) {
            *counter = counter.saturating_add(*other_counter);
        }
    }

    fn clear(&mut self) {
        self.counters.fill(0);
    }

    fn memory_usage(&self) -> usize {
        self.counters.len() * size_of::<u32>()
    }

    fn combine(acc: u64, answer: u64) -> u64 {
        acc.saturating_add(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::DEFAULT_SEED;
    use crate::hash::hash_item;

    #[test]
    fn test_slot_shape_follows_memory() {
        let slot = CountMinSlot::with_memory(800, CountMinParams::default());
        assert_eq!(slot.num_buckets(), 100);
        assert_eq!(slot.memory_usage(), 800);
        assert_eq!(
            CountMinSlot::with_memory(0, CountMinParams::default()).num_buckets(),
            1
        );
    }

    #[test]
    fn test_single_bucket_overcounts() {
        let (h1, h2) = hash_item("a", DEFAULT_SEED);
        let (g1, g2) = hash_item("b", DEFAULT_SEED);
        let mut slot = CountMinSlot::with_memory(0, CountMinParams::default());
        slot.insert(h1, h2, 3);
        slot.insert(g1, g2, 4);
        assert_eq!(slot.probe(h1, h2), 7);
        assert_eq!(slot.probe(g1, g2), 7);
    }

    #[test]
    fn test_conservative_update_raises_minimum_only() {
        let params = CountMinParams {
            num_rows: 1,
            conservative: true,
        };
        let (h1, h2) = hash_item("a", DEFAULT_SEED);
        let mut slot = CountMinSlot::with_memory(0, params);
        slot.insert(h1, h2, 2);
        slot.insert(h1, h2, 5);
        assert_eq!(slot.probe(h1, h2), 7);
    }

    #[test]
    fn test_merge_adds_counters() {
        let (h1, h2) = hash_item(&17u64, DEFAULT_SEED);
        let mut left = CountMinSlot::with_memory(1024, CountMinParams::default());
        let mut right = left.clone();
        left.insert(h1, h2, 2);
        right.insert(h1, h2, 9);
        left.merge(&right);
        assert!(left.probe(h1, h2) >= 11);
        left.clear();
        assert_eq!(left.probe(h1, h2), 0);
    }
}
