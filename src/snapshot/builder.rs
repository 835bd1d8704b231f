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

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::Error;
use crate::snapshot::StreamSnapshot;

/// Incrementally collects arrivals and produces a [`StreamSnapshot`].
///
/// # Examples
///
/// ```
/// # use windowbench::SnapshotBuilder;
/// let mut builder = SnapshotBuilder::new(2);
/// builder.push(1, 10u64).unwrap();
/// builder.push(2, 10u64).unwrap();
/// assert!(builder.push(3, 10u64).is_err());
///
/// let snapshot = builder.build();
/// assert_eq!(snapshot.cumulative(0), &[0, 1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotBuilder<T> {
    items: Vec<T>,
    index: HashMap<T, usize>,
    arrivals: Vec<Vec<usize>>,
}

impl<T: Hash + Eq + Clone> SnapshotBuilder<T> {
    /// Creates a builder for a stream of `num_windows` windows.
    pub fn new(num_windows: usize) -> Self {
        SnapshotBuilder {
            items: Vec::new(),
            index: HashMap::new(),
            arrivals: vec![Vec::new(); num_windows + 1],
        }
    }

    /// Returns the number of windows this builder accepts.
    pub fn num_windows(&self) -> usize {
        self.arrivals.len() - 1
    }

    /// Records one arrival of `item` in `window`.
    ///
    /// Returns an error if `window` is not in `1..=num_windows`.
    pub fn push(&mut self, window: usize, item: T) -> Result<(), Error> {
        if window == 0 || window > self.num_windows() {
            return Err(Error::config_invalid("window out of range")
                .with_context("window", window)
                .with_context("num_windows", self.num_windows()));
        }
        self.record(window, item);
        Ok(())
    }

    /// Records every item of `items` as an arrival in `window`.
    pub fn extend<I>(&mut self, window: usize, items: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.push(window, item)?;
        }
        Ok(())
    }

    pub(super) fn record(&mut self, window: usize, item: T) {
        let k = match self.index.get(&item) {
            Some(&k) => k,
            None => {
                let k = self.items.len();
                self.index.insert(item.clone(), k);
                self.items.push(item);
                k
            }
        };
        self.arrivals[window].push(k);
    }

    /// Consumes the builder and derives the cumulative counts and the
    /// per-window frequency tables.
    pub fn build(self) -> StreamSnapshot<T> {
        let num_windows = self.num_windows();
        let mut cumulative = vec![vec![0u64; num_windows + 1]; self.items.len()];
        for (window, arrivals) in self.arrivals.iter().enumerate() {
            for &k in arrivals {
                cumulative[k][window] += 1;
            }
        }

        let mut frequencies = vec![Vec::new(); num_windows + 1];
        for (k, counts) in cumulative.iter_mut().enumerate() {
            for window in 1..=num_windows {
                let delta = counts[window];
                if delta > 0 {
                    frequencies[window].push((k, delta));
                }
                counts[window] += counts[window - 1];
            }
        }

        StreamSnapshot {
            items: self.items,
            index: self.index,
            cumulative,
            arrivals: self.arrivals,
            frequencies,
        }
    }
}
