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

//! Materialized view of a windowed stream.
//!
//! A [`StreamSnapshot`] holds the ground truth every metric is computed
//! against: cumulative per-item counts, the raw arrivals of every window, the
//! exact per-window frequency tables, and the set of distinct items.
//!
//! # Usage
//!
//! ```rust
//! # use windowbench::StreamSnapshot;
//! let snapshot = StreamSnapshot::from_windows(vec![
//!     vec!["a", "b", "a"],
//!     vec![],
//!     vec!["b"],
//! ]);
//!
//! assert_eq!(snapshot.num_windows(), 3);
//! assert_eq!(snapshot.num_items(), 2);
//!
//! let a = snapshot.index_of(&"a").unwrap();
//! assert_eq!(snapshot.cumulative(a), &[0, 2, 2, 2]);
//! assert_eq!(snapshot.count_in(a, 1), 2);
//! ```

mod builder;
pub use self::builder::SnapshotBuilder;

use std::collections::HashMap;
use std::hash::Hash;

/// Read-only ground truth for a stream split into windows `1..=W`.
///
/// Items are indexed in order of first appearance. Window `0` is the empty
/// baseline: every cumulative count starts at zero there, and it has no
/// arrivals.
#[derive(Debug, Clone)]
pub struct StreamSnapshot<T> {
    items: Vec<T>,
    index: HashMap<T, usize>,
    /// `cumulative[k][i]` is the number of occurrences of item `k` in windows `1..=i`.
    cumulative: Vec<Vec<u64>>,
    /// Item indices in arrival order, per window (slot 0 is the empty baseline).
    arrivals: Vec<Vec<usize>>,
    /// `(item index, count)` pairs per window, sorted by item index.
    frequencies: Vec<Vec<(usize, u64)>>,
}

impl<T: Hash + Eq + Clone> StreamSnapshot<T> {
    /// Builds a snapshot where `windows[i]` holds the arrivals of window `i + 1`.
    pub fn from_windows(windows: Vec<Vec<T>>) -> Self {
        let mut builder = SnapshotBuilder::new(windows.len());
        for (offset, arrivals) in windows.into_iter().enumerate() {
            for item in arrivals {
                builder.record(offset + 1, item);
            }
        }
        builder.build()
    }

    /// Returns the index of `item`, if it occurs anywhere in the stream.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.index.get(item).copied()
    }

    /// Returns whether `item` occurs in `window`.
    pub fn contains(&self, window: usize, item: &T) -> bool {
        self.index_of(item)
            .is_some_and(|k| window <= self.num_windows() && self.count_in(k, window) > 0)
    }
}

impl<T> StreamSnapshot<T> {
    /// Returns the number of windows `W`.
    pub fn num_windows(&self) -> usize {
        self.arrivals.len() - 1
    }

    /// Returns the number of distinct items.
    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    /// Returns the distinct items in order of first appearance.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns the item with index `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k` is not a valid item index.
    pub fn item(&self, k: usize) -> &T {
        &self.items[k]
    }

    /// Returns the cumulative counts of item `k` for windows `0..=W`.
    pub fn cumulative(&self, k: usize) -> &[u64] {
        &self.cumulative[k]
    }

    /// Returns how many times item `k` occurs in `window`.
    ///
    /// Window `0` always yields zero.
    pub fn count_in(&self, k: usize, window: usize) -> u64 {
        if window == 0 {
            return 0;
        }
        let counts = &self.cumulative[k];
        counts[window] - counts[window - 1]
    }

    /// Returns how many times item `k` occurs in windows `first..=last`.
    ///
    /// A `first` of `0` is treated as `1`.
    pub fn count_between(&self, k: usize, first: usize, last: usize) -> u64 {
        debug_assert!(first <= last, "range start {first} after end {last}");
        let counts = &self.cumulative[k];
        counts[last] - counts[first.saturating_sub(1)]
    }

    /// Returns the raw arrivals of `window`, in stream order.
    pub fn arrivals(&self, window: usize) -> impl Iterator<Item = &T> + '_ {
        self.arrivals[window].iter().map(|&k| &self.items[k])
    }

    /// Returns the exact frequency table of `window` as `(item, count)` pairs.
    pub fn frequencies(&self, window: usize) -> impl Iterator<Item = (&T, u64)> + '_ {
        self.frequencies[window]
            .iter()
            .map(|&(k, count)| (&self.items[k], count))
    }

    /// Returns the frequency table of `window` keyed by item index.
    pub(crate) fn window_counts(&self, window: usize) -> &[(usize, u64)] {
        &self.frequencies[window]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StreamSnapshot<&'static str> {
        StreamSnapshot::from_windows(vec![
            vec!["x", "y"],
            vec!["y", "y"],
            vec!["x"],
        ])
    }

    #[test]
    fn test_items_in_first_appearance_order() {
        let snapshot = sample();
        assert_eq!(snapshot.items(), &["x", "y"]);
        assert_eq!(snapshot.index_of(&"y"), Some(1));
        assert_eq!(snapshot.index_of(&"z"), None);
    }

    #[test]
    fn test_cumulative_counts_are_monotone() {
        let snapshot = sample();
        for k in 0..snapshot.num_items() {
            let counts = snapshot.cumulative(k);
            assert_eq!(counts[0], 0);
            assert!(counts.windows(2).all(|pair| pair[0] <= pair[1]));
        }
        assert_eq!(snapshot.cumulative(1), &[0, 1, 3, 3]);
    }

    #[test]
    fn test_window_views_agree() {
        let snapshot = sample();
        assert_eq!(snapshot.arrivals(2).collect::<Vec<_>>(), vec![&"y", &"y"]);
        assert_eq!(snapshot.frequencies(2).collect::<Vec<_>>(), vec![(&"y", 2)]);
        assert_eq!(snapshot.arrivals(0).count(), 0);
        assert!(snapshot.contains(3, &"x"));
        assert!(!snapshot.contains(2, &"x"));
        assert_eq!(snapshot.count_between(1, 1, 3), 3);
        assert_eq!(snapshot.count_between(0, 2, 2), 0);
    }
}
