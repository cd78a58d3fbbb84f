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

//! HyperLogLog sketch implementation for cardinality estimation.
//!
//! This module provides a probabilistic data structure for estimating the cardinality
//! (number of distinct elements) of large datasets with bounded memory.
//!
//! # Overview
//!
//! A sketch of precision `p` keeps `m = 2^p` registers. Every incoming 32-bit hash is split
//! into a bucket index (its top `p` bits) and a rank (leading zeros of the remaining bits, plus
//! one); each register retains the maximum rank seen for its bucket. The cardinality estimate
//! is a bias-corrected harmonic mean over the registers, with a typical relative error of
//! `1.04 / sqrt(m)`.
//!
//! # Merging
//!
//! Sketches of different precision can be merged. The result always has the lower of the two
//! precisions: the finer register array is *folded* down, reconstructing exactly the registers
//! a coarser sketch would have built from the same input.
//!
//! # Snapshots
//!
//! A [`Snapshot`] is an owned copy of a sketch's `{precision, registers}` state. It is the input
//! to [`HllSketch::merge`], and can be persisted with [`Snapshot::serialize`].

mod bits;
mod estimator;
mod fold;
mod registers;
mod serialization;
mod sketch;
mod snapshot;

pub use self::estimator::relative_error;
pub use self::sketch::HllSketch;
pub use self::snapshot::Snapshot;

use crate::error::Error;

/// Smallest supported precision (16 registers).
pub const MIN_PRECISION: u8 = 4;
/// Largest supported precision (65536 registers).
pub const MAX_PRECISION: u8 = 16;
/// Precision used by [`HllSketch::default`].
pub const DEFAULT_PRECISION: u8 = 12;
/// Width in bits of the hashes consumed by the sketch.
pub const HASH_WIDTH: u8 = 32;

/// Largest rank a register can hold at `precision`.
///
/// Reached when all `HASH_WIDTH - precision` suffix bits are zero. Saturates at 1 for
/// precisions that leave no suffix bits.
#[inline]
pub const fn max_rank(precision: u8) -> u8 {
    HASH_WIDTH.saturating_sub(precision) + 1
}

pub(crate) fn check_precision(precision: u8) -> Result<(), Error> {
    if (MIN_PRECISION..=MAX_PRECISION).contains(&precision) && precision < HASH_WIDTH {
        Ok(())
    } else {
        Err(Error::invalid_precision(
            precision,
            MIN_PRECISION,
            MAX_PRECISION,
        ))
    }
}
