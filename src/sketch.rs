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

//! The capability contract every sketch under evaluation implements.

/// A sketch that answers membership or frequency questions about items
/// observed in numbered windows.
///
/// Windows are numbered from `1`; window `0` is the empty baseline before the
/// stream starts and is never updated. Membership sketches answer queries with
/// `0` (definitely absent) or `1` (possibly present); frequency sketches
/// answer with an estimated occurrence count.
///
/// Implementations must never report a false negative: if `item` occurred in
/// `window`, [`query`](Self::query) must return a positive value, and the same
/// holds for [`query_range`](Self::query_range) over any range containing such
/// a window.
///
/// # Examples
///
/// ```
/// use windowbench::ExactWindowCounter;
/// use windowbench::WindowSketch;
///
/// let mut sketch = ExactWindowCounter::new();
/// sketch.update(1, &"apple");
/// sketch.update_with_weight(2, &"apple", 3);
///
/// assert_eq!(sketch.query(2, &"apple"), 3);
/// assert_eq!(sketch.query_range(1, 2, &"apple"), 4);
/// assert_eq!(sketch.query(1, &"pear"), 0);
/// ```
pub trait WindowSketch<T: ?Sized> {
    /// Returns whether the sketch accepts a batch of occurrences through
    /// [`update_with_weight`](Self::update_with_weight).
    ///
    /// Sketches returning `false` are only ever fed every raw occurrence of
    /// every window, in window order.
    fn supports_delta_updates(&self) -> bool;

    /// Records one occurrence of `item` in `window`.
    fn update(&mut self, window: usize, item: &T);

    /// Records `weight` occurrences of `item` in `window`.
    fn update_with_weight(&mut self, window: usize, item: &T, weight: u64) {
        for _ in 0..weight {
            self.update(window, item);
        }
    }

    /// Answers the membership or frequency question for `item` in `window`.
    fn query(&self, window: usize, item: &T) -> u64;

    /// Answers the question aggregated over the windows `first..=last`:
    /// union membership for membership sketches, summed counts for frequency
    /// sketches.
    fn query_range(&self, first: usize, last: usize, item: &T) -> u64;

    /// Returns the number of elementary internal probes performed so far.
    ///
    /// The counter never decreases; each call to
    /// [`query_range`](Self::query_range) advances it by the probes it made.
    fn query_count(&self) -> u64;

    /// Returns the current memory footprint in bytes.
    fn memory_usage(&self) -> usize;
}
