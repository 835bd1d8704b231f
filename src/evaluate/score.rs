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

/// Per-bucket scores produced by a metric.
///
/// Buckets are addressed from `1`: for single-window metrics bucket `i` is the
/// `i`-th decision window, for range metrics it is the range length. Every
/// bucket remembers how many samples it averaged. A bucket without samples
/// holds `0.0`, so it never contributes to [`weighted_score`].
#[derive(Debug, Clone, PartialEq)]
pub struct Scores {
    values: Vec<f64>,
    samples: Vec<u64>,
}

impl Scores {
    /// Wraps precomputed values, each counted as a single sample.
    pub fn from_values(values: Vec<f64>) -> Self {
        let samples = vec![1; values.len()];
        Scores { values, samples }
    }

    /// Returns the number of buckets.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the score of `bucket`, or `None` if it is outside `1..=len`.
    pub fn get(&self, bucket: usize) -> Option<f64> {
        bucket.checked_sub(1).and_then(|i| self.values.get(i)).copied()
    }

    /// Returns how many samples `bucket` averaged.
    pub fn samples(&self, bucket: usize) -> u64 {
        bucket
            .checked_sub(1)
            .and_then(|i| self.samples.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Returns whether `bucket` averaged at least one sample.
    pub fn has_data(&self, bucket: usize) -> bool {
        self.samples(bucket) > 0
    }

    /// Returns the scores as a slice; index `0` is bucket `1`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterates `(bucket, score)` pairs, buckets starting at `1`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values.iter().enumerate().map(|(i, &v)| (i + 1, v))
    }

    /// Returns the largest score, `0.0` when there are no buckets.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

impl From<Vec<f64>> for Scores {
    fn from(values: Vec<f64>) -> Self {
        Scores::from_values(values)
    }
}

/// Folds per-bucket scores into a single number, weighting bucket `i` of `n`
/// by `1 / (n - i + 1)` so that the most recent buckets dominate.
///
/// # Examples
///
/// ```
/// use windowbench::evaluate::Scores;
/// use windowbench::evaluate::weighted_score;
///
/// let scores = Scores::from(vec![0.3, 0.2, 0.1]);
/// // 0.3 / 3 + 0.2 / 2 + 0.1 / 1
/// assert!((weighted_score(&scores) - 0.3).abs() < 1e-12);
/// ```
pub fn weighted_score(scores: &Scores) -> f64 {
    let n = scores.len();
    scores.iter().map(|(i, v)| v / (n - i + 1) as f64).sum()
}

/// How an estimate's error against the true count is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Deviation {
    Relative,
    Absolute,
}

impl Deviation {
    pub(crate) fn between(self, real: u64, estimate: u64) -> f64 {
        let diff = real.abs_diff(estimate) as f64;
        match self {
            Deviation::Relative => diff / real as f64,
            Deviation::Absolute => diff,
        }
    }
}

/// Accumulates weighted samples per bucket, then averages them.
#[derive(Debug)]
pub(crate) struct ScoreBuffer {
    sums: Vec<f64>,
    samples: Vec<u64>,
}

impl ScoreBuffer {
    pub(crate) fn new(buckets: usize) -> Self {
        ScoreBuffer {
            sums: vec![0.0; buckets],
            samples: vec![0; buckets],
        }
    }

    /// Adds one sample of `value` to `bucket` (1-based).
    pub(crate) fn add(&mut self, bucket: usize, value: f64) {
        self.sums[bucket - 1] += value;
        self.samples[bucket - 1] += 1;
    }

    pub(crate) fn finish(self) -> Scores {
        let values = self
            .sums
            .iter()
            .zip(&self.samples)
            .map(|(&sum, &n)| if n == 0 { 0.0 } else { sum / n as f64 })
            .collect();
        Scores {
            values,
            samples: self.samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buckets_are_zero_filled() {
        let mut buffer = ScoreBuffer::new(3);
        buffer.add(1, 0.5);
        buffer.add(1, 1.5);
        buffer.add(3, 2.0);
        let scores = buffer.finish();

        assert_eq!(scores.values(), &[1.0, 0.0, 2.0]);
        assert_eq!(scores.samples(1), 2);
        assert!(!scores.has_data(2));
        assert_eq!(scores.get(0), None);
        assert_eq!(scores.get(4), None);
        assert!(weighted_score(&scores).is_finite());
    }

    #[test]
    fn test_deviation() {
        assert_eq!(Deviation::Absolute.between(4, 7), 3.0);
        assert_eq!(Deviation::Relative.between(4, 7), 0.75);
        assert_eq!(Deviation::Relative.between(4, 4), 0.0);
    }

    #[test]
    fn test_weighted_score_of_empty_scores() {
        assert_eq!(weighted_score(&Scores::from_values(Vec::new())), 0.0);
    }
}
