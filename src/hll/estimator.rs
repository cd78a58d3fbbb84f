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

//! Bias-corrected HyperLogLog estimation.
//!
//! Follows P. Flajolet et al., *HyperLogLog: the analysis of a near-optimal cardinality
//! estimation algorithm*: a raw harmonic-mean estimate, replaced by linear counting in the small
//! range and by a hash-collision correction in the large range.

use crate::hll::HASH_WIDTH;
use crate::hll::registers::Registers;

/// Size of the hash space, `2^HASH_WIDTH`.
const HASH_SPACE: f64 = (1u64 << HASH_WIDTH) as f64;

/// Raw estimates above this are corrected for hash collisions.
const LARGE_RANGE_THRESHOLD: f64 = HASH_SPACE / 30.0;

/// Returns the theoretical relative standard error, `1.04 / sqrt(2^precision)`.
///
/// # Examples
///
/// ```
/// use cardinality_sketch::hll::relative_error;
///
/// assert_eq!(relative_error(12), 0.01625);
/// ```
pub fn relative_error(precision: u8) -> f64 {
    1.04 / 2f64.powi(i32::from(precision)).sqrt()
}

/// Returns the alpha constant for `m` registers.
#[inline]
fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / m as f64),
    }
}

/// Returns the raw harmonic-mean estimate.
fn estimate_raw(values: &[u8]) -> f64 {
    let m = values.len();
    let sum: f64 = values.iter().map(|&value| inv_pow2(value)).sum();
    alpha(m) * (m * m) as f64 / sum
}

/// Returns `2^-value`.
#[inline]
fn inv_pow2(value: u8) -> f64 {
    1.0 / (1u64 << value) as f64
}

#[inline]
fn linear_count(m: usize, zeros: usize) -> f64 {
    m as f64 * (m as f64 / zeros as f64).ln()
}

/// Estimates the cardinality represented by `registers`.
pub(super) fn estimate(registers: &Registers) -> f64 {
    let m = registers.len();
    let zeros = registers.num_zeros() as usize;
    let raw = estimate_raw(registers.values());

    if raw <= 2.5 * m as f64 {
        if zeros != 0 {
            // Apply small range correction.
            return linear_count(m, zeros);
        }
        raw
    } else if raw > LARGE_RANGE_THRESHOLD && raw < HASH_SPACE {
        // Apply large range correction.
        -HASH_SPACE * (1.0 - raw / HASH_SPACE).ln()
    } else {
        raw
    }
}

/// Rounds [`estimate`] to the nearest integer.
pub(super) fn count(registers: &Registers) -> u64 {
    estimate(registers).round() as u64
}
