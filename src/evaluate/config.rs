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

/// How the evaluator feeds a snapshot into a sketch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ingestion {
    /// Batched per-window deltas for sketches that support them, raw replay
    /// for the rest.
    #[default]
    Auto,
    /// Replay every raw occurrence, whatever the sketch supports.
    Replay,
}

/// Configuration of an [`Evaluator`](crate::evaluate::Evaluator).
///
/// # Examples
///
/// ```
/// use windowbench::evaluate::EvalConfig;
/// use windowbench::evaluate::Ingestion;
///
/// let config = EvalConfig::new(8)
///     .with_memory_budget(64 * 1024)
///     .with_ingestion(Ingestion::Replay);
/// assert_eq!(config.decision_windows(), 8);
/// assert_eq!(config.memory_budget(), Some(64 * 1024));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    decision_windows: usize,
    memory_budget: Option<usize>,
    ingestion: Ingestion,
}

impl EvalConfig {
    /// Scores the `decision_windows` most recent windows.
    pub fn new(decision_windows: usize) -> Self {
        EvalConfig {
            decision_windows,
            memory_budget: None,
            ingestion: Ingestion::Auto,
        }
    }

    /// Sets the memory budget sketches are checked against, in bytes.
    pub fn with_memory_budget(mut self, bytes: usize) -> Self {
        self.memory_budget = Some(bytes);
        self
    }

    /// Sets the ingestion mode.
    pub fn with_ingestion(mut self, ingestion: Ingestion) -> Self {
        self.ingestion = ingestion;
        self
    }

    /// Returns the number of most recent windows that are scored.
    pub fn decision_windows(&self) -> usize {
        self.decision_windows
    }

    /// Returns the configured memory budget, if any.
    pub fn memory_budget(&self) -> Option<usize> {
        self.memory_budget
    }

    /// Returns the ingestion mode.
    pub fn ingestion(&self) -> Ingestion {
        self.ingestion
    }
}
