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

//! Accuracy and cost evaluation for sketches over windowed streams.
//!
//! This crate compares approximate membership and frequency structures
//! ("sketches") on identical windowed input under identical metrics:
//!
//! - [`StreamSnapshot`] materializes the ground truth of a stream split into
//!   numbered windows;
//! - [`WindowSketch`] is the capability contract a sketch under test
//!   implements;
//! - [`evaluate::Evaluator`] ingests a snapshot into a sketch and computes
//!   false positive rates, relative and absolute errors, query costs and
//!   stability, per window or per range of windows;
//! - [`stair::partition`] splits a memory budget over a geometric hierarchy of
//!   levels, and [`stair`] provides the Bloom and Count-Min sketches built on
//!   it; [`ExactWindowCounter`] is the zero-error baseline.
//!
//! # Usage
//!
//! ```rust
//! use windowbench::StreamSnapshot;
//! use windowbench::evaluate::EvalConfig;
//! use windowbench::evaluate::Evaluator;
//! use windowbench::stair::StairBloomFilter;
//!
//! let windows: Vec<Vec<u64>> = (0..16u64)
//!     .map(|w| (0..50).map(|i| w * 10 + i).collect())
//!     .collect();
//! let snapshot = StreamSnapshot::from_windows(windows);
//! let evaluator = Evaluator::new(&snapshot, EvalConfig::new(4)).unwrap();
//!
//! let mut filter = StairBloomFilter::with_memory(1 << 16, 3);
//! let fpr = evaluator.weighted_fpr(&mut filter).unwrap();
//! assert!(fpr >= 0.0);
//! ```

pub mod error;
pub mod evaluate;
pub mod exact;
pub mod snapshot;
pub mod stair;

mod hash;
mod sketch;

pub use self::exact::ExactWindowCounter;
pub use self::hash::DEFAULT_SEED;
pub use self::sketch::WindowSketch;
pub use self::snapshot::SnapshotBuilder;
pub use self::snapshot::StreamSnapshot;
