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

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::evaluate::Evaluator;
use crate::evaluate::Ingestion;
use crate::sketch::WindowSketch;

/// Memory usage below this fraction of the budget is reported as underuse.
const UNDERUSE_RATIO: f64 = 0.5;

impl<T> Evaluator<'_, T> {
    /// Feeds windows `1..=W` into `sketch`, in order.
    ///
    /// With [`Ingestion::Auto`], a sketch that supports delta updates receives
    /// one weighted update per item with a positive count in each window;
    /// any other sketch, or any sketch under [`Ingestion::Replay`], receives
    /// every raw occurrence.
    pub fn build_sketch<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S) {
        for window in 1..=self.num_windows() {
            self.ingest_window(sketch, window);
        }
        debug!(
            windows = self.num_windows(),
            memory = sketch.memory_usage(),
            "sketch built"
        );
    }

    /// Feeds every raw occurrence of windows `1..=W` into `sketch`,
    /// regardless of its capabilities.
    pub fn replay_sketch<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S) {
        for window in 1..=self.num_windows() {
            self.replay_window(sketch, window);
        }
    }

    pub(super) fn ingest_window<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S, window: usize) {
        let deltas =
            self.config.ingestion() == Ingestion::Auto && sketch.supports_delta_updates();
        if !deltas {
            self.replay_window(sketch, window);
            return;
        }
        for &(k, delta) in self.snapshot.window_counts(window) {
            sketch.update_with_weight(window, self.snapshot.item(k), delta);
        }
    }

    fn replay_window<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S, window: usize) {
        for item in self.snapshot.arrivals(window) {
            sketch.update(window, item);
        }
    }

    /// Logs the sketch's memory usage against the configured budget and
    /// returns it.
    pub(super) fn report_memory<S: WindowSketch<T> + ?Sized>(&self, sketch: &S) -> usize {
        let memory = sketch.memory_usage();
        let Some(budget) = self.config.memory_budget() else {
            info!(memory, "sketch memory");
            return memory;
        };
        info!(memory, budget, "sketch memory");
        if memory > budget {
            warn!(memory, budget, "sketch exceeds its memory budget");
        } else if (memory as f64) < budget as f64 * UNDERUSE_RATIO {
            warn!(memory, budget, "sketch uses well under its memory budget");
        }
        memory
    }
}

#[cfg(test)]
mod tests {
    use crate::ExactWindowCounter;
    use crate::StreamSnapshot;
    use crate::WindowSketch;
    use crate::evaluate::EvalConfig;
    use crate::evaluate::Evaluator;
    use crate::evaluate::Ingestion;

    /// Records every update call it receives.
    #[derive(Default)]
    struct Recorder {
        deltas: bool,
        calls: Vec<(usize, char, u64)>,
    }

    impl WindowSketch<char> for Recorder {
        fn supports_delta_updates(&self) -> bool {
            self.deltas
        }

        fn update(&mut self, window: usize, item: &char) {
            self.calls.push((window, *item, 1));
        }

        fn update_with_weight(&mut self, window: usize, item: &char, weight: u64) {
            self.calls.push((window, *item, weight));
        }

        fn query(&self, _: usize, _: &char) -> u64 {
            0
        }

        fn query_range(&self, _: usize, _: usize, _: &char) -> u64 {
            0
        }

        fn query_count(&self) -> u64 {
            0
        }

        fn memory_usage(&self) -> usize {
            self.calls.len()
        }
    }

    fn snapshot() -> StreamSnapshot<char> {
        StreamSnapshot::from_windows(vec![vec!['a', 'b', 'a'], vec![], vec!['b']])
    }

    #[test]
    fn test_delta_ingestion_skips_empty_windows() {
        let snapshot = snapshot();
        let evaluator = Evaluator::new(&snapshot, EvalConfig::new(3)).unwrap();
        let mut recorder = Recorder {
            deltas: true,
            ..Recorder::default()
        };
        evaluator.build_sketch(&mut recorder);
        assert_eq!(recorder.calls, vec![(1, 'a', 2), (1, 'b', 1), (3, 'b', 1)]);
    }

    #[test]
    fn test_replay_ingestion_feeds_raw_arrivals() {
        let snapshot = snapshot();
        let evaluator = Evaluator::new(&snapshot, EvalConfig::new(3)).unwrap();
        let mut recorder = Recorder::default();
        evaluator.build_sketch(&mut recorder);
        assert_eq!(
            recorder.calls,
            vec![(1, 'a', 1), (1, 'b', 1), (1, 'a', 1), (3, 'b', 1)]
        );
    }

    #[test]
    fn test_forced_replay_ignores_capability() {
        let snapshot = snapshot();
        let config = EvalConfig::new(3).with_ingestion(Ingestion::Replay);
        let evaluator = Evaluator::new(&snapshot, config).unwrap();
        let mut recorder = Recorder {
            deltas: true,
            ..Recorder::default()
        };
        evaluator.build_sketch(&mut recorder);
        assert_eq!(recorder.calls.len(), 4);
        assert!(recorder.calls.iter().all(|&(_, _, weight)| weight == 1));
    }

    #[test]
    fn test_both_paths_reach_the_same_counts() {
        let snapshot = snapshot();
        let evaluator = Evaluator::new(&snapshot, EvalConfig::new(3)).unwrap();
        let mut batched = ExactWindowCounter::new();
        let mut replayed = ExactWindowCounter::replay_only();
        evaluator.build_sketch(&mut batched);
        evaluator.replay_sketch(&mut replayed);
        for window in 1..=3 {
            for item in ['a', 'b'] {
                assert_eq!(batched.query(window, &item), replayed.query(window, &item));
            }
        }
    }

    #[test]
    fn test_memory_report_ignores_budget() {
        let snapshot = snapshot();
        let evaluator = Evaluator::new(&snapshot, EvalConfig::new(3)).unwrap();
        let mut recorder = Recorder::default();
        evaluator.build_sketch(&mut recorder);
        assert_eq!(evaluator.report_memory(&recorder), 4);

        // over budget, within it, and well under it
        for budget in [1, 5, 100] {
            let config = EvalConfig::new(3).with_memory_budget(budget);
            let evaluator = Evaluator::new(&snapshot, config).unwrap();
            assert_eq!(evaluator.report_memory(&recorder), 4);
        }
    }
}
