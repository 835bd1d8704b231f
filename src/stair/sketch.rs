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

use std::cell::Cell;
use std::collections::VecDeque;
use std::hash::Hash;

use crate::hash::DEFAULT_SEED;
use crate::hash::hash_item;
use crate::sketch::WindowSketch;
use crate::stair::StairLevel;

/// A fixed-size summary stored in one stair slot.
///
/// Slots of the same level are built with identical parameters so that they
/// can be merged.
pub trait Slot: Sized {
    /// Construction parameters shared by every slot of a sketch.
    type Params: Copy;

    /// Creates an empty slot using about `bytes` bytes.
    fn with_memory(bytes: usize, params: Self::Params) -> Self;

    /// Records `weight` occurrences of the item hashed to `(h1, h2)`.
    fn insert(&mut self, h1: u64, h2: u64, weight: u64);

    /// Answers for the item hashed to `(h1, h2)`.
    fn probe(&self, h1: u64, h2: u64) -> u64;

    /// Folds `other` into this slot.
    fn merge(&mut self, other: &Self);

    /// Resets the slot to empty.
    fn clear(&mut self);

    /// Returns the memory held by this slot, in bytes.
    fn memory_usage(&self) -> usize;

    /// Folds the answer of one more block into a range answer.
    fn combine(acc: u64, answer: u64) -> u64;

    /// Returns whether a range answer can no longer change.
    fn settled(_acc: u64) -> bool {
        false
    }
}

/// A slot together with the aligned blocks `first..=last` it summarizes.
#[derive(Debug, Clone)]
struct Block<S> {
    first: usize,
    last: usize,
    slot: S,
}

/// A slot together with the windows `first..=last` it summarizes.
#[derive(Debug)]
struct Covered<'a, S> {
    slot: &'a S,
    first: usize,
    last: usize,
}

/// One level of a stair sketch: a ring of slots over aligned window blocks.
#[derive(Debug, Clone)]
struct Step<S> {
    span: usize,
    /// The top step never drops history; its oldest slot absorbs evictions.
    absorbing: bool,
    blocks: VecDeque<Block<S>>,
    spare: Vec<S>,
}

impl<S: Slot> Step<S> {
    fn new(level: &StairLevel, absorbing: bool, params: S::Params) -> Self {
        let spare = (0..level.structures())
            .map(|_| S::with_memory(level.structure_memory(), params))
            .collect();
        Step {
            span: level.span(),
            absorbing,
            blocks: VecDeque::with_capacity(level.structures()),
            spare,
        }
    }

    fn block_of(&self, window: usize) -> usize {
        (window - 1) / self.span
    }

    fn insert(&mut self, window: usize, h1: u64, h2: u64, weight: u64) {
        let block = self.block_of(window);
        // a single-slot top step keeps extending the one block it has
        let extend = self.absorbing && self.spare.is_empty() && self.blocks.len() == 1;
        match self.blocks.back_mut() {
            Some(current) if current.last == block => {
                current.slot.insert(h1, h2, weight);
                return;
            }
            Some(current) if extend => {
                current.last = block;
                current.slot.insert(h1, h2, weight);
                return;
            }
            _ => {}
        }

        let mut slot = match self.spare.pop() {
            Some(slot) => slot,
            None => self.evict(),
        };
        slot.insert(h1, h2, weight);
        self.blocks.push_back(Block {
            first: block,
            last: block,
            slot,
        });
    }

    /// Frees the oldest slot, folding it into its successor on the top step.
    fn evict(&mut self) -> S {
        let Some(mut oldest) = self.blocks.pop_front() else {
            unreachable!("a step without spare slots holds at least one block");
        };
        if self.absorbing {
            if let Some(next) = self.blocks.front_mut() {
                next.slot.merge(&oldest.slot);
                next.first = oldest.first;
            }
        }
        oldest.slot.clear();
        oldest.slot
    }

    /// Returns the slot holding `window` with the windows it covers.
    fn locate(&self, window: usize) -> Option<Covered<'_, S>> {
        let block = self.block_of(window);
        self.blocks
            .iter()
            .find(|b| b.first <= block && block <= b.last)
            .map(|b| Covered {
                slot: &b.slot,
                first: b.first * self.span + 1,
                last: (b.last + 1) * self.span,
            })
    }

    fn memory_usage(&self) -> usize {
        let active: usize = self.blocks.iter().map(|b| b.slot.memory_usage()).sum();
        let spare: usize = self.spare.iter().map(S::memory_usage).sum();
        active + spare
    }
}

/// A multi-resolution window sketch built from a stair decomposition.
///
/// Every update goes to all levels. Level 0 keeps the most recent window on
/// its own; coarser levels keep a ring of slots, each covering an aligned
/// block of windows, and drop their oldest slot when a new block begins. The
/// top level folds its oldest slot into the next one instead, so every window
/// ever ingested stays covered by at least one slot and queries never produce
/// false negatives.
///
/// Queries use the finest level that still holds the requested window. Range
/// queries walk from the last window backwards to a set of disjoint slots
/// covering the range and probe each slot once, so every ingested window is
/// counted at most once and the cost grows with the number of blocks touched
/// rather than with the range length. Windows outside the range that share a
/// block with its first window are still counted. Each slot probe advances
/// [`query_count`](WindowSketch::query_count) by one.
///
/// See [`StairBloomFilter`](crate::stair::StairBloomFilter) and
/// [`StairCountMin`](crate::stair::StairCountMin) for the concrete families.
#[derive(Debug, Clone)]
pub struct StairSketch<S> {
    levels: Vec<StairLevel>,
    steps: Vec<Step<S>>,
    seed: u32,
    latest_window: usize,
    query_count: Cell<u64>,
}

impl<S: Slot> StairSketch<S> {
    /// Creates a sketch with one step per level, finest first.
    ///
    /// The last level is the top of the stair and never drops history.
    ///
    /// # Panics
    ///
    /// Panics if `levels` is empty.
    pub fn from_levels(levels: &[StairLevel], params: S::Params) -> Self {
        Self::from_levels_with_seed(levels, params, DEFAULT_SEED)
    }

    /// Creates a sketch with an explicit hash seed.
    ///
    /// # Panics
    ///
    /// Panics if `levels` is empty.
    pub fn from_levels_with_seed(levels: &[StairLevel], params: S::Params, seed: u32) -> Self {
        assert!(!levels.is_empty(), "a stair sketch needs at least one level");
        let top = levels.len() - 1;
        let steps = levels
            .iter()
            .enumerate()
            .map(|(i, level)| Step::new(level, i == top, params))
            .collect();
        StairSketch {
            levels: levels.to_vec(),
            steps,
            seed,
            latest_window: 0,
            query_count: Cell::new(0),
        }
    }

    /// Returns the level layout this sketch was built from.
    pub fn levels(&self) -> &[StairLevel] {
        &self.levels
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Returns the most recent window that received an update, `0` if none.
    pub fn latest_window(&self) -> usize {
        self.latest_window
    }

    fn insert<T: Hash + ?Sized>(&mut self, window: usize, item: &T, weight: u64) {
        assert!(window > 0, "window 0 is the empty baseline and cannot be updated");
        assert!(
            window >= self.latest_window,
            "windows must be updated in order: got {window} after {}",
            self.latest_window
        );
        self.latest_window = window;
        if weight == 0 {
            return;
        }
        let (h1, h2) = hash_item(item, self.seed);
        for step in &mut self.steps {
            step.insert(window, h1, h2, weight);
        }
    }

    /// Returns the finest slot holding `window`.
    fn locate(&self, window: usize) -> Option<Covered<'_, S>> {
        self.steps.iter().find_map(|step| step.locate(window))
    }

    /// Returns disjoint slots covering `first..=last`, latest first.
    ///
    /// Walking backwards, the finest slot holding a window may be a coarser
    /// block that also spans windows already covered. Block boundaries nest
    /// across levels, so that block replaces the finer slots it contains.
    fn cover(&self, first: usize, last: usize) -> Vec<Covered<'_, S>> {
        let mut cover: Vec<Covered<'_, S>> = Vec::new();
        let mut window = last;
        loop {
            let next = match self.locate(window) {
                Some(covered) => {
                    while cover.last().is_some_and(|c| c.first <= covered.last) {
                        cover.pop();
                    }
                    let next = covered.first;
                    cover.push(covered);
                    next
                }
                None => window,
            };
            if next <= first {
                break;
            }
            window = next - 1;
        }
        cover
    }

    fn probe(&self, slot: &S, h1: u64, h2: u64) -> u64 {
        self.query_count.set(self.query_count.get() + 1);
        slot.probe(h1, h2)
    }
}

impl<S: Slot, T: Hash + ?Sized> WindowSketch<T> for StairSketch<S> {
    fn supports_delta_updates(&self) -> bool {
        true
    }

    fn update(&mut self, window: usize, item: &T) {
        self.insert(window, item, 1);
    }

    fn update_with_weight(&mut self, window: usize, item: &T, weight: u64) {
        self.insert(window, item, weight);
    }

    fn query(&self, window: usize, item: &T) -> u64 {
        if window == 0 {
            return 0;
        }
        let Some(covered) = self.locate(window) else {
            return 0;
        };
        let (h1, h2) = hash_item(item, self.seed);
        self.probe(covered.slot, h1, h2)
    }

    fn query_range(&self, first: usize, last: usize, item: &T) -> u64 {
        let first = first.max(1);
        if first > last {
            return 0;
        }

        let (h1, h2) = hash_item(item, self.seed);
        let mut answer = 0;
        for covered in self.cover(first, last) {
            answer = S::combine(answer, self.probe(covered.slot, h1, h2));
            if S::settled(answer) {
                break;
            }
        }
        answer
    }

    fn query_count(&self) -> u64 {
        self.query_count.get()
    }

    fn memory_usage(&self) -> usize {
        self.steps.iter().map(Step::memory_usage).sum()
    }
}
