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
use crate::evaluate::weighted_score;
use crate::sketch::WindowSketch;

impl<T> Evaluator<'_, T> {
    /// Builds `sketch` and measures its false positive rate in each decision
    /// window.
    ///
    /// Bucket `i` is the fraction of items absent from window `W - D + i` that
    /// the sketch reports as present. Fails if an item present in the window
    /// is reported absent.
    pub fn fpr<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S) -> Result<Scores, Error> {
        self.build_sketch(sketch);
        self.report_memory(sketch);
        let mut scores = ScoreBuffer::new(self.decision_windows());
        for bucket in 1..=self.decision_windows() {
            let window = self.offset() + bucket;
            self.measure_fpr(sketch, window, bucket, &mut scores, "fpr")?;
        }
        Ok(scores.finish())
    }

    /// Builds `sketch` and measures its average relative error in each
    /// decision window, over the items present in that window.
    ///
    /// Fails if a present item is estimated at zero.
    pub fn are<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S) -> Result<Scores, Error> {
        self.window_error(sketch, Deviation::Relative, "are")
    }

    /// Builds `sketch` and measures its average absolute error in each
    /// decision window, over the items present in that window.
    ///
    /// Fails if a present item is estimated at zero.
    pub fn aae<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S) -> Result<Scores, Error> {
        self.window_error(sketch, Deviation::Absolute, "aae")
    }

    /// [`fpr`](Self::fpr) folded with [`weighted_score`].
    pub fn weighted_fpr<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S) -> Result<f64, Error> {
        Ok(weighted_score(&self.fpr(sketch)?))
    }

    /// [`are`](Self::are) folded with [`weighted_score`].
    pub fn weighted_are<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S) -> Result<f64, Error> {
        Ok(weighted_score(&self.are(sketch)?))
    }

    /// [`aae`](Self::aae) folded with [`weighted_score`].
    pub fn weighted_aae<S: WindowSketch<T> + ?Sized>(&self, sketch: &mut S) -> Result<f64, Error> {
        Ok(weighted_score(&self.aae(sketch)?))
    }

    fn window_error<S: WindowSketch<T> + ?Sized>(
        &self,
        sketch: &mut S,
        deviation: Deviation,
        metric: &'static str,
    ) -> Result<Scores, Error> {
        self.build_sketch(sketch);
        self.report_memory(sketch);
        let mut scores = ScoreBuffer::new(self.decision_windows());
        for bucket in 1..=self.decision_windows() {
            let window = self.offset() + bucket;
            self.measure_error(sketch, window, bucket, deviation, &mut scores, metric)?;
        }
        Ok(scores.finish())
    }

    /// Adds one sample per item absent from `window` to `bucket`: `1.0` for a
    /// false positive, `0.0` otherwise.
    pub(super) fn measure_fpr<S: WindowSketch<T> + ?Sized>(
        &self,
        sketch: &S,
        window: usize,
        bucket: usize,
        scores: &mut ScoreBuffer,
        metric: &'static str,
    ) -> Result<(), Error> {
        for (k, item) in self.snapshot.items().iter().enumerate() {
            let positive = sketch.query(window, item) > 0;
            if self.snapshot.count_in(k, window) == 0 {
                scores.add(bucket, if positive { 1.0 } else { 0.0 });
            } else if !positive {
                return Err(self.false_negative(metric, k, window, window));
            }
        }
        Ok(())
    }

    /// Adds the deviation of every item present in `window` to `bucket`.
    pub(super) fn measure_error<S: WindowSketch<T> + ?Sized>(
        &self,
        sketch: &S,
        window: usize,
        bucket: usize,
        deviation: Deviation,
        scores: &mut ScoreBuffer,
        metric: &'static str,
    ) -> Result<(), Error> {
        for &(k, real) in self.snapshot.window_counts(window) {
            let estimate = sketch.query(window, self.snapshot.item(k));
            if estimate == 0 {
                return Err(self.false_negative(metric, k, window, window));
            }
            scores.add(bucket, deviation.between(real, estimate));
        }
        Ok(())
    }
}
