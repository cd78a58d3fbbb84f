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

//! Default hash collaborator for feeding sketches.
//!
//! The estimator only consumes uniformly distributed 32-bit values; any hash with that property
//! works. This module offers MurmurHash3 (x64, 128-bit) truncated to its top 32 bits.

/// Seed shared by all sketches so that hashes of equal values agree across instances.
pub const DEFAULT_UPDATE_SEED: u32 = 9001;

/// Hashes `value` into the 32-bit space consumed by [`HllSketch::add`].
///
/// [`HllSketch::add`]: crate::hll::HllSketch::add
///
/// # Examples
///
/// ```
/// use cardinality_sketch::hash::hash;
///
/// assert_eq!(hash("thing1"), hash("thing1"));
/// assert_ne!(hash("thing1"), hash("thing2"));
/// ```
pub fn hash(value: impl AsRef<[u8]>) -> u32 {
    hash_with_seed(value, DEFAULT_UPDATE_SEED)
}

/// Hashes `value` with an explicit seed.
pub fn hash_with_seed(value: impl AsRef<[u8]>, seed: u32) -> u32 {
    let (h1, _) = mur3::murmurhash3_x64_128(value.as_ref(), seed);
    (h1 >> 32) as u32
}
