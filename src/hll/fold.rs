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

//! Cross-precision folding and merging of register arrays.
//!
//! A register array at precision `from` can be rewritten exactly as the array a sketch of
//! precision `to < from` would have built from the same hashes. For a source slot `j`, the
//! top `to` bits select the coarse bucket and the low `from - to` bits (`extra`) were bits of
//! the hash that the coarse sketch counts as part of the rank:
//!
//! - `extra != 0`: the coarse rank is decided inside `extra`, namely
//!   `leading_zeros(extra) + 1` over `from - to` bits.
//! - `extra == 0`: those bits are all zero, so the coarse rank is
//!   `(from - to) + registers[j]`.
//!
//! Untouched source registers (rank 0) contribute nothing.

use std::cmp::Ordering;

use crate::hll::bits::leading_zeros_in;
use crate::hll::registers::Registers;

/// Folds `values` from precision `from` down to precision `to`.
///
/// `values.len()` must be `2^from` and `to <= from`.
pub(super) fn fold(values: &[u8], from: u8, to: u8) -> Box<[u8]> {
    debug_assert!(to <= from);
    debug_assert_eq!(values.len(), 1 << from);

    if from == to {
        return values.into();
    }

    let shift = from - to;
    let mask = (1usize << shift) - 1;
    let mut folded = vec![0u8; 1 << to].into_boxed_slice();

    for (slot, &value) in values.iter().enumerate() {
        if value == 0 {
            continue;
        }

        let index = slot >> shift;
        let extra = (slot & mask) as u32;
        let rank = if extra != 0 {
            leading_zeros_in(extra, shift) + 1
        } else {
            shift + value
        };

        if rank > folded[index] {
            folded[index] = rank;
        }
    }

    folded
}

/// Merges `other` (at `other_precision`) into `target`.
///
/// The result has precision `min(target, other)`. When `other` is finer it is folded before the
/// merge; when it is coarser, `target` itself is folded down first and its precision drops.
pub(super) fn merge_into(target: &mut Registers, other_precision: u8, other: &[u8]) {
    let precision = target.precision();

    match other_precision.cmp(&precision) {
        Ordering::Equal => target.merge_max(other),
        Ordering::Greater => {
            tracing::debug!(
                from = other_precision,
                to = precision,
                "folding incoming registers before merge"
            );
            let folded = fold(other, other_precision, precision);
            target.merge_max(&folded);
        }
        Ordering::Less => {
            tracing::debug!(
                from = precision,
                to = other_precision,
                "merging a coarser sketch; downscaling receiver precision"
            );
            let folded = fold(target.values(), precision, other_precision);
            *target = Registers::from_values(other_precision, folded);
            target.merge_max(other);
        }
    }
}
