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

#![allow(dead_code)]

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use windowbench::ExactWindowCounter;
use windowbench::StreamSnapshot;
use windowbench::WindowSketch;

/// A stream of `windows` windows, each with `arrivals` items drawn uniformly
/// from `0..universe`.
pub fn random_snapshot(
    seed: u64,
    windows: usize,
    arrivals: usize,
    universe: u64,
) -> StreamSnapshot<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let windows = (0..windows)
        .map(|_| {
            (0..arrivals)
                .map(|_| rng.random_range(0..universe))
                .collect::<Vec<u64>>()
        })
        .collect::<Vec<_>>();
    StreamSnapshot::from_windows(windows)
}

/// The snapshot where `"x"` occurs in windows 1, 3 and 5 of 5.
pub fn sparse_snapshot() -> StreamSnapshot<&'static str> {
    StreamSnapshot::from_windows(vec![vec!["x"], vec![], vec!["x"], vec![], vec!["x"]])
}

/// Claims every item is present in every window, once.
#[derive(Debug, Default)]
pub struct AlwaysPresent {
    queries: std::cell::Cell<u64>,
}

impl<T> WindowSketch<T> for AlwaysPresent {
    fn supports_delta_updates(&self) -> bool {
        true
    }

    fn update(&mut self, _: usize, _: &T) {}

    fn query(&self, _: usize, _: &T) -> u64 {
        self.queries.set(self.queries.get() + 1);
        1
    }

    fn query_range(&self, first: usize, last: usize, _: &T) -> u64 {
        self.queries.set(self.queries.get() + 1);
        (last - first + 1) as u64
    }

    fn query_count(&self) -> u64 {
        self.queries.get()
    }

    fn memory_usage(&self) -> usize {
        0
    }
}

/// An exact counter that silently drops every update of one item.
#[derive(Debug)]
pub struct Forgetful<T> {
    inner: ExactWindowCounter<T>,
    forgotten: T,
}

impl<T> Forgetful<T> {
    pub fn new(forgotten: T) -> Self {
        Forgetful {
            inner: ExactWindowCounter::new(),
            forgotten,
        }
    }
}

impl<T: std::hash::Hash + Eq + Clone> WindowSketch<T> for Forgetful<T> {
    fn supports_delta_updates(&self) -> bool {
        true
    }

    fn update(&mut self, window: usize, item: &T) {
        self.update_with_weight(window, item, 1);
    }

    fn update_with_weight(&mut self, window: usize, item: &T, weight: u64) {
        if *item != self.forgotten {
            self.inner.update_with_weight(window, item, weight);
        }
    }

    fn query(&self, window: usize, item: &T) -> u64 {
        self.inner.query(window, item)
    }

    fn query_range(&self, first: usize, last: usize, item: &T) -> u64 {
        self.inner.query_range(first, last, item)
    }

    fn query_count(&self) -> u64 {
        self.inner.query_count()
    }

    fn memory_usage(&self) -> usize {
        self.inner.memory_usage()
    }
}
