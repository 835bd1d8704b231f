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

//! Stair decomposition: geometric multi-resolution memory partitioning and
//! the window sketches built on it.
//!
//! [`partition`] splits a memory budget over `K + 1` levels. Level 0 holds one
//! structure for a single window; each level above holds two structures whose
//! window span doubles from one level to the next, with memory growing in
//! proportion to the span and the top level amplified four times. Any range
//! of windows can then be answered by combining `O(log W)` slots.
//!
//! # Usage
//!
//! ```rust
//! use windowbench::WindowSketch;
//! use windowbench::stair::StairCountMin;
//! use windowbench::stair::partition;
//!
//! let levels = partition(64 * 1024, 3);
//! let total: usize = levels
//!     .iter()
//!     .map(|level| level.structure_memory() * level.structures())
//!     .sum();
//! assert!(64 * 1024 - total <= 2 * levels.len());
//!
//! let mut sketch = StairCountMin::with_memory(64 * 1024, 3);
//! for window in 1..=8 {
//!     sketch.update(window, &"apple");
//! }
//! assert!(sketch.query_range(1, 8, &"apple") >= 8);
//! ```

mod bloom;
mod countmin;
mod partition;
mod sketch;

pub use self::bloom::BloomSlot;
pub use self::bloom::DEFAULT_NUM_HASHES;
pub use self::bloom::StairBloomFilter;
pub use self::countmin::CountMinParams;
pub use self::countmin::CountMinSlot;
pub use self::countmin::DEFAULT_NUM_ROWS;
pub use self::countmin::StairCountMin;
pub use self::partition::MAX_LEVELS;
pub use self::partition::StairLevel;
pub use self::partition::partition;
pub use self::sketch::Slot;
pub use self::sketch::StairSketch;

/// Level count the stair builders use unless told otherwise.
pub const DEFAULT_LEVELS: u32 = 3;
