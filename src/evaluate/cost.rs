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

use crate::evaluate::Evaluator;
use crate::evaluate::Scores;
use crate::evaluate::WindowRanges;
use crate::evaluate::score::ScoreBuffer;
use crate::sketch::WindowSketch;

impl<T> Evaluator<'_, T> {
    /// Builds `sketch` and measures the average number of internal probes a
    /// range query takes, per range length, for items absent from the range.
    pub fn membership_query_cost<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S) -> Scores {
        self.query_cost(sketch, |count| count == 0)
    }

    /// Builds `sketch` and measures the average number of internal probes a
    /// range query takes, per range length, for items occurring in the range.
    pub fn frequency_query_cost<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S) -> Scores {
        self.query_cost(sketch, |count| count > 0)
    }

    fn query_cost<S, F>(&self, sketch: &mut S, qualifies: F) -> Scores
    where
        S: WindowSketch<T> + ?Sized,
        F: Fn(u64) -> bool,
    {
        self.build_sketch(sketch);
        self.report_memory(sketch);
        let offset = self.offset();
        let mut scores = ScoreBuffer::new(self.decision_windows());
        for range in WindowRanges::new(self.decision_windows()) {
            let (first, last) = (offset + range.first, offset + range.last);
            for (k, item) in self.snapshot.items().iter().enumerate() {
                if !qualifies(self.snapshot.count_between(k, first, last)) {
                    continue;
                }
                let before = sketch.query_count();
                sketch.query_range(first, last, item);
                let probes = sketch.query_count() - before;
                scores.add(range.num_windows(), probes as f64);
            }
        }
        scores.finish()
    }
}
