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

use std::fmt;

/// Largest level count [`partition`] accepts.
pub const MAX_LEVELS: u32 = 30;

/// One level of a stair decomposition.
///
/// A level owns [`structures`](Self::structures) sub-structures that share
/// [`memory`](Self::memory) bytes, each covering an aligned block of
/// [`span`](Self::span) windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StairLevel {
    memory: usize,
    structures: usize,
    scale: usize,
    span: usize,
}

impl StairLevel {
    /// Creates a level description.
    ///
    /// # Panics
    ///
    /// Panics if `structures` or `span` is zero.
    pub fn new(memory: usize, structures: usize, scale: usize, span: usize) -> Self {
        assert!(structures > 0, "a level needs at least one structure");
        assert!(span > 0, "a level must span at least one window");
        StairLevel {
            memory,
            structures,
            scale,
            span,
        }
    }

    /// Returns the memory budget of the whole level, in bytes.
    pub fn memory(&self) -> usize {
        self.memory
    }

    /// Returns the number of co-located sub-structures.
    pub fn structures(&self) -> usize {
        self.structures
    }

    /// Returns the amplification applied to this level's memory.
    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Returns the number of windows each sub-structure covers.
    pub fn span(&self) -> usize {
        self.span
    }

    /// Returns the memory budget of a single sub-structure, in bytes.
    pub fn structure_memory(&self) -> usize {
        self.memory / self.structures
    }
}

impl fmt::Display for StairLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}B (scale {}, span {})",
            self.structures,
            self.structure_memory(),
            self.scale,
            self.span
        )
    }
}

/// Splits `memory` bytes across `levels + 1` stair levels.
///
/// With `f(i) = 4` for the top level `i == levels` (when `levels > 0`) and
/// `f(i) = 1` otherwise, the unit is `memory / Σ 2^i·f(i)`. Level 0 gets one
/// unit-sized structure spanning a single window; level `i >= 1` gets
/// `unit·2^i·f(i)` bytes split over two structures, each spanning `2^(i-1)`
/// windows. A budget smaller than the weight sum yields zero-sized levels
/// rather than an error.
///
/// # Panics
///
/// Panics if `levels` exceeds [`MAX_LEVELS`].
///
/// # Examples
///
/// ```
/// use windowbench::stair::partition;
///
/// // weights: 1 + 2 + 4 + 8 * 4 = 39
/// let levels = partition(3900, 3);
/// assert_eq!(levels.len(), 4);
/// assert_eq!(levels[0].memory(), 100);
/// assert_eq!(levels[3].memory(), 3200);
/// assert_eq!(levels[3].structure_memory(), 1600);
/// assert_eq!(levels[3].span(), 4);
/// assert_eq!(levels[3].scale(), 4);
///
/// let single = partition(4096, 0);
/// assert_eq!(single[0].memory(), 4096);
/// ```
pub fn partition(memory: usize, levels: u32) -> Vec<StairLevel> {
    assert!(
        levels <= MAX_LEVELS,
        "levels must be at most {MAX_LEVELS}, got {levels}"
    );

    let factor = |i: u32| if levels > 0 && i == levels { 4 } else { 1 };
    let sum: u64 = (0..=levels).map(|i| (1u64 << i) * factor(i)).sum();
    let unit = memory as f64 / sum as f64;

    let mut result = Vec::with_capacity(levels as usize + 1);
    result.push(StairLevel::new(unit as usize, 1, 1, 1));
    for i in 1..=levels {
        let scale = factor(i);
        let level_memory = unit * (1u64 << i) as f64 * scale as f64;
        result.push(StairLevel::new(
            level_memory as usize,
            2,
            scale as usize,
            1usize << (i - 1),
        ));
    }
    result
}
