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

use crate::error::Error;
use crate::evaluate::Evaluator;
use crate::evaluate::Scores;
use crate::evaluate::score::Deviation;
use crate::evaluate::score::ScoreBuffer;
use crate::sketch::WindowSketch;

/// A range of decision windows `first..=last`, numbered from `1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRange {
    /// First decision window of the range.
    pub first: usize,
    /// Last decision window of the range.
    pub last: usize,
    /// Decay step of the last window: `1 / (D - last + 1)`.
    pub decay: f64,
    /// Sum of the decay steps of `first..=last`; the weight this range's
    /// samples carry.
    pub weight: f64,
}

impl WindowRange {
    /// Returns the number of windows in the range.
    pub fn num_windows(&self) -> usize {
        self.last - self.first + 1
    }
}

/// Iterates every range `1 <= first <= last <= D` of decision windows, by
/// increasing `first`, then increasing `last`.
///
/// # Examples
///
/// ```
/// use windowbench::evaluate::WindowRanges;
///
/// let ranges = WindowRanges::new(4).collect::<Vec<_>>();
/// assert_eq!(ranges.len(), 10);
///
/// let full = ranges.iter().find(|r| r.num_windows() == 4).unwrap();
/// assert_eq!(full.decay, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct WindowRanges {
    decision_windows: usize,
    first: usize,
    last: usize,
    weight: f64,
}

impl WindowRanges {
    /// Creates the enumeration over `decision_windows` windows.
    pub fn new(decision_windows: usize) -> Self {
        WindowRanges {
            decision_windows,
            first: 1,
            last: 1,
            weight: 0.0,
        }
    }
}

impl Iterator for WindowRanges {
    type Item = WindowRange;

    fn next(&mut self) -> Option<WindowRange> {
        if self.first > self.decision_windows {
            return None;
        }
        let decay = 1.0 / (self.decision_windows - self.last + 1) as f64;
        self.weight += decay;
        let range = WindowRange {
            first: self.first,
            last: self.last,
            decay,
            weight: self.weight,
        };

        if self.last == self.decision_windows {
            self.first += 1;
            self.last = self.first;
            self.weight = 0.0;
        } else {
            self.last += 1;
        }
        Some(range)
    }
}

impl<T> Evaluator<'_, T> {
    /// Builds `sketch` and measures its weighted false positive rate over
    /// every range of decision windows.
    ///
    /// For each range, every item absent from the whole range contributes one
    /// sample to the bucket of the range's length: the range weight if
    /// [`query_range`](WindowSketch::query_range) reports it present, zero
    /// otherwise. Fails if an item occurring in the range is reported absent.
    pub fn range_fpr<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S) -> Result<Scores, Error> {
        self.build_sketch(sketch);
        self.report_memory(sketch);
        let offset = self.offset();
        let mut scores = ScoreBuffer::new(self.decision_windows());
        for range in WindowRanges::new(self.decision_windows()) {
            let (first, last) = (offset + range.first, offset + range.last);
            for (k, item) in self.snapshot.items().iter().enumerate() {
                let positive = sketch.query_range(first, last, item) > 0;
                if self.snapshot.count_between(k, first, last) == 0 {
                    let sample = if positive { range.weight } else { 0.0 };
                    scores.add(range.num_windows(), sample);
                } else if !positive {
                    return Err(self.false_negative("range_fpr", k, first, last));
                }
            }
        }
        Ok(scores.finish())
    }

    /// Builds `sketch` and measures its weighted average relative error over
    /// every range of decision windows.
    ///
    /// Range estimates are sums of single-window estimates. Only items that
    /// occur in a range are sampled for it.
    pub fn range_are<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S) -> Result<Scores, Error> {
        self.range_error(sketch, Deviation::Relative, "range_are")
    }

    /// Builds `sketch` and measures its weighted average absolute error over
    /// every range of decision windows.
    pub fn range_aae<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S) -> Result<Scores, Error> {
        self.range_error(sketch, Deviation::Absolute, "range_aae")
    }

    fn range_error<S: WindowSketch<T> + ?Sized>(
        &self,
        sketch: &mut S,
        deviation: Deviation,
        metric: &'static str,
    ) -> Result<Scores, Error> {
        self.build_sketch(sketch);
        self.report_memory(sketch);
        let offset = self.offset();
        let decision_windows = self.decision_windows();

        // prefix[k][i]: summed estimates of item k over decision windows 1..=i
        let prefix = self
            .snapshot
            .items()
            .iter()
            .map(|item| {
                let mut sums = Vec::with_capacity(decision_windows + 1);
                let mut acc = 0u64;
                sums.push(acc);
                for i in 1..=decision_windows {
                    acc += sketch.query(offset + i, item);
                    sums.push(acc);
                }
                sums
            })
            .collect::<Vec<_>>();

        let mut scores = ScoreBuffer::new(decision_windows);
        for range in WindowRanges::new(decision_windows) {
            let (first, last) = (offset + range.first, offset + range.last);
            for (k, sums) in prefix.iter().enumerate() {
                let real = self.snapshot.count_between(k, first, last);
                if real == 0 {
                    continue;
                }
                let estimate = sums[range.last] - sums[range.first - 1];
                if estimate == 0 {
                    return Err(self.false_negative(metric, k, first, last));
                }
                let sample = range.weight * deviation.between(real, estimate);
                scores.add(range.num_windows(), sample);
            }
        }
        Ok(scores.finish())
    }
}
