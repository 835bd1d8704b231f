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

/// Accuracy measured window by window while a sketch is being built.
#[derive(Debug, Clone, PartialEq)]
pub struct Stability {
    scores: Scores,
    memory_usage: usize,
}

impl Stability {
    /// Returns one bucket per window `1..=W`, measured right after that
    /// window was ingested.
    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    /// Returns the sketch's memory usage once every window was ingested.
    pub fn memory_usage(&self) -> usize {
        self.memory_usage
    }

    /// Consumes the result, returning the per-window scores.
    pub fn into_scores(self) -> Scores {
        self.scores
    }
}

impl<T> Evaluator<'_, T> {
    /// Ingests `sketch` one window at a time and measures the false positive
    /// rate of each window as soon as it has been ingested.
    pub fn fpr_stability<S: WindowSketch<T> + ?Sized>(
        &self,
        sketch: &mut S,
    ) -> Result<Stability, Error> {
        let mut scores = ScoreBuffer::new(self.num_windows());
        for window in 1..=self.num_windows() {
            self.ingest_window(sketch, window);
            self.measure_fpr(sketch, window, window, &mut scores, "fpr_stability")?;
        }
        let memory_usage = self.report_memory(sketch);
        Ok(Stability {
            scores: scores.finish(),
            memory_usage,
        })
    }

    /// Ingests `sketch` one window at a time and measures the average
    /// relative error of each window as soon as it has been ingested.
    pub fn are_stability<S: WindowSketch<T> + ?Sized>(
        &self,
        sketch: &mut S,
    ) -> Result<Stability, Error> {
        let mut scores = ScoreBuffer::new(self.num_windows());
        for window in 1..=self.num_windows() {
            self.ingest_window(sketch, window);
            self.measure_error(
                sketch,
                window,
                window,
                Deviation::Relative,
                &mut scores,
                "are_stability",
            )?;
        }
        let memory_usage = self.report_memory(sketch);
        Ok(Stability {
            scores: scores.finish(),
            memory_usage,
        })
    }
}
