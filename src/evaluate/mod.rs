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

//! Window-range accuracy and cost evaluation.
//!
//! An [`Evaluator`] ingests a [`StreamSnapshot`] into a fresh sketch and then
//! re-queries it against the snapshot's ground truth. Only the `D` most
//! recent windows (the decision windows) are scored:
//!
//! - single-window metrics ([`fpr`](Evaluator::fpr), [`are`](Evaluator::are),
//!   [`aae`](Evaluator::aae)) produce one bucket per decision window;
//! - range metrics ([`range_fpr`](Evaluator::range_fpr),
//!   [`range_are`](Evaluator::range_are), [`range_aae`](Evaluator::range_aae))
//!   enumerate every range of decision windows and produce one bucket per
//!   range length, weighting ranges that end closer to the present higher;
//! - query-cost metrics measure how many internal probes a range query needs;
//! - stability metrics measure accuracy after each window is ingested.
//!
//! [`weighted_score`] folds any bucket array into one comparable number.
//!
//! A sketch that reports a false negative fails the metric with
//! [`ErrorKind::FalseNegative`](crate::error::ErrorKind::FalseNegative).
//!
//! # Usage
//!
//! ```rust
//! use windowbench::ExactWindowCounter;
//! use windowbench::StreamSnapshot;
//! use windowbench::evaluate::EvalConfig;
//! use windowbench::evaluate::Evaluator;
//! use windowbench::evaluate::weighted_score;
//!
//! let snapshot = StreamSnapshot::from_windows(vec![
//!     vec!["x", "y"],
//!     vec!["y"],
//!     vec!["x", "x"],
//! ]);
//! let evaluator = Evaluator::new(&snapshot, EvalConfig::new(2)).unwrap();
//!
//! let aae = evaluator.aae(&mut ExactWindowCounter::new()).unwrap();
//! assert_eq!(aae.values(), &[0.0, 0.0]);
//! assert_eq!(weighted_score(&aae), 0.0);
//! ```

mod config;
mod cost;
mod ingest;
mod range;
mod score;
mod stability;
mod window;

pub use self::config::EvalConfig;
pub use self::config::Ingestion;
pub use self::range::WindowRange;
pub use self::range::WindowRanges;
pub use self::score::Scores;
pub use self::score::weighted_score;
pub use self::stability::Stability;

use tracing::warn;

use crate::error::Error;
use crate::snapshot::StreamSnapshot;

/// Scores sketches against one snapshot under one configuration.
#[derive(Debug, Clone)]
pub struct Evaluator<'a, T> {
    snapshot: &'a StreamSnapshot<T>,
    config: EvalConfig,
}

impl<'a, T> Evaluator<'a, T> {
    /// Creates an evaluator.
    ///
    /// Returns an error if the snapshot has no windows, or if the number of
    /// decision windows is zero or exceeds the number of windows.
    pub fn new(snapshot: &'a StreamSnapshot<T>, config: EvalConfig) -> Result<Self, Error> {
        let num_windows = snapshot.num_windows();
        let decision_windows = config.decision_windows();
        if num_windows == 0 {
            return Err(Error::config_invalid("snapshot has no windows"));
        }
        if decision_windows == 0 || decision_windows > num_windows {
            return Err(
                Error::config_invalid("decision windows must be in 1..=windows")
                    .with_context("decision_windows", decision_windows)
                    .with_context("windows", num_windows),
            );
        }
        Ok(Evaluator { snapshot, config })
    }

    /// Returns the snapshot under evaluation.
    pub fn snapshot(&self) -> &'a StreamSnapshot<T> {
        self.snapshot
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    fn num_windows(&self) -> usize {
        self.snapshot.num_windows()
    }

    fn decision_windows(&self) -> usize {
        self.config.decision_windows()
    }

    /// The window preceding the first decision window.
    fn offset(&self) -> usize {
        self.num_windows() - self.decision_windows()
    }

    fn false_negative(&self, metric: &'static str, k: usize, first: usize, last: usize) -> Error {
        warn!(
            metric,
            item = k,
            first_window = first,
            last_window = last,
            "sketch reported a false negative"
        );
        let error = Error::false_negative("sketch reported a present item as absent")
            .with_context("metric", metric)
            .with_context("item", k);
        if first == last {
            error.with_context("window", first)
        } else {
            error.with_context("range", format!("{first}..={last}"))
        }
    }
}
