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

//! Exact per-window counting.
//!
//! [`ExactWindowCounter`] stores the true count of every item in every window.
//! It is the zero-error baseline the evaluation metrics are validated against:
//! its false positive rate and its relative and absolute errors are all zero.

use std::cell::Cell;
use std::collections::HashMap;
use std::hash::Hash;

use crate::sketch::WindowSketch;

/// An exact, unbounded-memory [`WindowSketch`].
///
/// Each single-window query counts as one probe; a range query probes every
/// window of the range once.
#[derive(Debug, Clone)]
pub struct ExactWindowCounter<T> {
    windows: Vec<HashMap<T, u64>>,
    delta_updates: bool,
    query_count: Cell<u64>,
}

impl<T> Default for ExactWindowCounter<T> {
    fn default() -> Self {
        ExactWindowCounter {
            windows: Vec::new(),
            delta_updates: true,
            query_count: Cell::new(0),
        }
    }
}

impl<T> ExactWindowCounter<T> {
    /// Creates a counter that accepts batched updates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a counter that declares it can only be fed raw occurrences.
    pub fn replay_only() -> Self {
        ExactWindowCounter {
            delta_updates: false,
            ..Self::default()
        }
    }

    /// Returns the number of distinct `(window, item)` pairs stored.
    pub fn num_entries(&self) -> usize {
        self.windows.iter().map(HashMap::len).sum()
    }
}

impl<T: Hash + Eq + Clone> ExactWindowCounter<T> {
    fn count(&self, window: usize, item: &T) -> u64 {
        self.windows
            .get(window)
            .and_then(|counts| counts.get(item))
            .copied()
            .unwrap_or(0)
    }
}

impl<T: Hash + Eq + Clone> WindowSketch<T> for ExactWindowCounter<T> {
    fn supports_delta_updates(&self) -> bool {
        self.delta_updates
    }

    fn update(&mut self, window: usize, item: &T) {
        self.update_with_weight(window, item, 1);
    }

    fn update_with_weight(&mut self, window: usize, item: &T, weight: u64) {
        assert!(window > 0, "window 0 is the empty baseline and cannot be updated");
        if self.windows.len() <= window {
            self.windows.resize_with(window + 1, HashMap::new);
        }
        *self.windows[window].entry(item.clone()).or_insert(0) += weight;
    }

    fn query(&self, window: usize, item: &T) -> u64 {
        self.query_count.set(self.query_count.get() + 1);
        self.count(window, item)
    }

    fn query_range(&self, first: usize, last: usize, item: &T) -> u64 {
        let first = first.max(1);
        if first > last {
            return 0;
        }
        self.query_count
            .set(self.query_count.get() + (last - first + 1) as u64);
        (first..=last).map(|window| self.count(window, item)).sum()
    }

    fn query_count(&self) -> u64 {
        self.query_count.get()
    }

    fn memory_usage(&self) -> usize {
        let entry = size_of::<T>() + size_of::<u64>();
        self.num_entries() * entry + self.windows.len() * size_of::<HashMap<T, u64>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_are_exact() {
        let mut counter = ExactWindowCounter::new();
        counter.update(1, &7u32);
        counter.update(1, &7u32);
        counter.update_with_weight(3, &7u32, 5);

        assert_eq!(counter.query(1, &7), 2);
        assert_eq!(counter.query(2, &7), 0);
        assert_eq!(counter.query(9, &7), 0);
        assert_eq!(counter.query_range(1, 3, &7), 7);
        assert_eq!(counter.num_entries(), 2);
    }

    #[test]
    fn test_range_probes_every_window() {
        let mut counter = ExactWindowCounter::new();
        counter.update(2, &"x");
        let before = counter.query_count();
        counter.query_range(2, 5, &"x");
        assert_eq!(counter.query_count() - before, 4);
        counter.query_range(0, 0, &"x");
        assert_eq!(counter.query_count() - before, 4);
    }

    #[test]
    fn test_replay_only_flag() {
        let counter = ExactWindowCounter::<u64>::replay_only();
        assert!(!counter.supports_delta_updates());
        assert!(ExactWindowCounter::<u64>::new().supports_delta_updates());
    }

    #[test]
    #[should_panic(expected = "window 0 is the empty baseline")]
    fn test_window_zero_panics() {
        let mut counter = ExactWindowCounter::new();
        counter.update(0, &1u8);
    }
}
