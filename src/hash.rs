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

//! MurmurHash3 x64/128 hashing shared by the reference sketches.

use std::hash::Hash;

/// Seed used by every reference sketch unless told otherwise.
pub const DEFAULT_SEED: u32 = 9001;

/// Hashes `item` into a 128-bit MurmurHash3 digest split into two halves.
pub(crate) fn hash_item<T: Hash + ?Sized>(item: &T, seed: u32) -> (u64, u64) {
    let mut hasher = mur3::Hasher128::with_seed(seed);
    item.hash(&mut hasher);
    hasher.finish128()
}

/// Computes the `i`-th probe index in `[0, modulus)` by double hashing
/// (Kirsch-Mitzenmacher): `(h1 + i * h2) mod modulus`.
#[inline]
pub(crate) fn probe_index(h1: u64, h2: u64, i: u32, modulus: u64) -> u64 {
    let hash = h1.wrapping_add(u64::from(i).wrapping_mul(h2));
    hash % modulus
}
