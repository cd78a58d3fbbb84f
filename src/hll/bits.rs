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

//! Splitting a hash into a bucket index and a rank.

use crate::hll::HASH_WIDTH;

/// Leading zero count of `value` read as a `width`-bit integer.
///
/// `value` must fit in `width` bits; a zero value yields `width`.
#[inline]
pub(super) fn leading_zeros_in(value: u32, width: u8) -> u8 {
    debug_assert!((1..=32).contains(&width));
    debug_assert!(width == 32 || value < (1u32 << width));
    (value.leading_zeros() - (32 - width as u32)) as u8
}

/// Returns `(index, rank)` for `hash` at `precision`.
///
/// The index is the top `precision` bits of the hash. The rank is one plus the number of
/// leading zeros in the remaining `HASH_WIDTH - precision` bits, so it lies in
/// `[1, HASH_WIDTH - precision + 1]`.
#[inline]
pub(super) fn decompose(hash: u32, precision: u8) -> (usize, u8) {
    let suffix_width = HASH_WIDTH - precision;
    let index = (hash >> suffix_width) as usize;
    let suffix = hash & ((1u32 << suffix_width) - 1);
    (index, leading_zeros_in(suffix, suffix_width) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_zeros_in() {
        assert_eq!(leading_zeros_in(0b100, 3), 0);
        assert_eq!(leading_zeros_in(0b001, 3), 2);
        assert_eq!(leading_zeros_in(0, 3), 3);
        assert_eq!(leading_zeros_in(1, 1), 0);
        assert_eq!(leading_zeros_in(0, 28), 28);
        assert_eq!(leading_zeros_in(0x0000_ffff, 32), 16);
    }

    #[test]
    fn test_decompose() {
        assert_eq!(decompose(0xf002e812, 8), (0xf0, 7));
        assert_eq!(decompose(0xffff_ffff, 16), (0xffff, 1));
        assert_eq!(decompose(0x0001_8000, 16), (1, 1));
        assert_eq!(decompose(0x0001_0fff, 16), (1, 5));
        // all suffix bits zero caps the rank
        assert_eq!(decompose(0x0001_0000, 16), (1, 17));
        assert_eq!(decompose(0, 4), (0, 29));
        assert_eq!(decompose(0x1fff_ffff, 4), (1, 1));
        assert_eq!(decompose(0x0800_0000, 4), (0, 1));
        assert_eq!(decompose(0x0000_0001, 4), (0, 28));
    }

    #[test]
    fn test_decompose_is_pure() {
        for hash in [0u32, 1, 0xdead_beef, u32::MAX] {
            for precision in 4..=16 {
                assert_eq!(decompose(hash, precision), decompose(hash, precision));
                let (index, rank) = decompose(hash, precision);
                assert!(index < 1 << precision);
                assert!((1..=32 - precision + 1).contains(&rank));
            }
        }
    }
}
