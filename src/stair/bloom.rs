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

/// Number of hash functions each Bloom slot uses by default.
pub const DEFAULT_NUM_HASHES: u32 = 2;

const MIN_NUM_BITS: u64 = 64;

/// A stair sketch answering window membership with Bloom filter slots.
///
/// Queries return `1` for "possibly present" and `0` for "definitely
/// absent"; range queries answer whether the item possibly occurred anywhere
/// in the range.
///
/// # Examples
///
/// ```
/// use windowbench::WindowSketch;
/// use windowbench::stair::StairBloomFilter;
///
/// let mut filter = StairBloomFilter::with_memory(1 << 16, 3);
/// filter.update(1, &"apple");
/// filter.update(4, &"pear");
///
/// assert_eq!(filter.query(1, &"apple"), 1);
/// assert_eq!(filter.query_range(2, 4, &"pear"), 1);
/// ```
pub type StairBloomFilter = StairSketch<BloomSlot>;

impl StairSketch<BloomSlot> {
    /// Builds a filter over `levels + 1` stair levels sharing `memory` bytes.
    pub fn with_memory(memory: usize, levels: u32) -> Self {
        Self::from_levels(&partition(memory, levels), DEFAULT_NUM_HASHES)
    }

    /// Builds a filter with [`DEFAULT_LEVELS`] levels.
    pub fn with_default_levels(memory: usize) -> Self {
        Self::with_memory(memory, DEFAULT_LEVELS)
    }
}

/// A Bloom filter slot: a bit array probed by double hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomSlot {
    num_hashes: u32,
    num_bits: u64,
    bit_array: Vec<u64>,
}

impl BloomSlot {
    /// Returns the number of bits in the slot.
    pub fn capacity(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of bits set to 1.
    pub fn bits_used(&self) -> u64 {
        self.bit_array.iter().map(|w| u64::from(w.count_ones())).sum()
    }

    fn get_bit(&self, bit_index: u64) -> bool {
        let mask = 1u64 << (bit_index % 64);
        (self.bit_array[(bit_index / 64) as usize] & mask) != 0
    }

    fn set_bit(&mut self, bit_index: u64) {
        let mask = 1u64 << (bit_index % 64);
        self.bit_array[(bit_index / 64) as usize] |= mask;
    }
}

impl Slot for BloomSlot {
    type Params = u32;

    fn with_memory(bytes: usize, num_hashes: u32) -> Self {
        assert!(num_hashes > 0, "a Bloom slot needs at least one hash");
        let num_bits = ((bytes as u64 * 8) / 64 * 64).max(MIN_NUM_BITS);
        BloomSlot {
            num_hashes,
            num_bits,
            bit_array: vec![0; (num_bits / 64) as usize],
        }
    }

    fn insert(&mut self, h1: u64, h2: u64, _weight: u64) {
        for i in 0..self.num_hashes {
            let bit_index = probe_index(h1, h2, i, self.num_bits);
            self.set_bit(bit_index);
        }
    }

    fn probe(&self, h1: u64, h2: u64) -> u64 {
        let present =
            (0..self.num_hashes).all(|i| self.get_bit(probe_index(h1, h2, i, self.num_bits)));
        u64::from(present)
    }

    fn merge(&mut self, other: &Self) {
        assert_eq!(
            self.num_bits, other.num_bits,
            "cannot merge Bloom slots of different sizes"
        );
        for (word, other_word) in self.bit_array.iter_mut().zip(&other.bit_array) {
            *word |= *other_word;
        }
    }

    fn clear(&mut self) {
        self.bit_array.fill(0);
    }

    fn memory_usage(&self) -> usize {
        self.bit_array.len() * size_of::<u64>()
    }

    fn combine(acc: u64, answer: u64) -> u64 {
        acc.max(answer)
    }

    fn settled(acc: u64) -> bool {
        acc > 0
    }
}
