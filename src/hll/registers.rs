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

//! The register store: one byte per bucket holding the maximum rank seen.

use crate::hll::bits::decompose;

/// Fixed-size register array of `2^precision` ranks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Registers {
    precision: u8,
    /// Direct byte array: values[slot] = rank
    values: Box<[u8]>,
    /// Count of slots with value 0
    num_zeros: u32,
}

impl Registers {
    /// Allocates zeroed registers. `precision` must already be validated.
    pub fn new(precision: u8) -> Self {
        let k = 1u32 << precision;
        Self {
            precision,
            values: vec![0u8; k as usize].into_boxed_slice(),
            num_zeros: k,
        }
    }

    /// Wraps existing register values. `values.len()` must equal `2^precision`.
    pub fn from_values(precision: u8, values: Box<[u8]>) -> Self {
        debug_assert_eq!(values.len(), 1 << precision);
        let num_zeros = values.iter().filter(|v| **v == 0).count() as u32;
        Self {
            precision,
            values,
            num_zeros,
        }
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn num_zeros(&self) -> u32 {
        self.num_zeros
    }

    pub fn is_empty(&self) -> bool {
        self.num_zeros as usize == self.values.len()
    }

    /// Records a hashed value.
    #[inline]
    pub fn add(&mut self, hash: u32) {
        let (index, rank) = decompose(hash, self.precision);
        self.set_greater(index, rank);
    }

    /// Sets the register at `index` to `value` if `value` is greater than its current value.
    #[inline]
    pub fn set_greater(&mut self, index: usize, value: u8) {
        let cur = self.values[index];
        if value > cur {
            if cur == 0 {
                self.num_zeros -= 1;
            }
            self.values[index] = value;
        }
    }

    /// Elementwise maximum with registers of the same precision.
    pub fn merge_max(&mut self, other: &[u8]) {
        debug_assert_eq!(other.len(), self.values.len());
        for (index, &value) in other.iter().enumerate() {
            self.set_greater(index, value);
        }
    }

    pub fn reset(&mut self) {
        self.values.fill(0);
        self.num_zeros = self.values.len() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let registers = Registers::new(10);
        assert_eq!(registers.len(), 1024);
        assert_eq!(registers.num_zeros(), 1024);
        assert!(registers.is_empty());
        assert!(registers.values().iter().all(|v| *v == 0));
    }

    #[test]
    fn test_set_greater() {
        let mut registers = Registers::new(4);

        registers.set_greater(1, 0);
        assert_eq!(registers.values()[1], 0);
        assert_eq!(registers.num_zeros(), 16);

        registers.set_greater(1, 3);
        assert_eq!(registers.values()[1], 3);
        assert_eq!(registers.num_zeros(), 15);

        registers.set_greater(1, 2);
        assert_eq!(registers.values()[1], 3);
        assert_eq!(registers.num_zeros(), 15);

        registers.set_greater(9, 7);
        registers.set_greater(9, 9);
        assert_eq!(registers.values()[9], 9);
        assert_eq!(registers.num_zeros(), 14);
    }

    #[test]
    fn test_add() {
        let mut registers = Registers::new(16);

        registers.add(0x0001_0fff);
        assert_eq!(registers.values()[1], 5);

        registers.add(0x0002_ffff);
        assert_eq!(registers.values()[2], 1);

        registers.add(0x0003_0000);
        assert_eq!(registers.values()[3], 17);

        registers.add(0x0003_0001);
        assert_eq!(registers.values()[3], 17);

        registers.add(0xff03_7000);
        assert_eq!(registers.values()[0xff03], 2);

        registers.add(0xff03_0800);
        assert_eq!(registers.values()[0xff03], 5);

        assert_eq!(registers.num_zeros(), (1 << 16) - 4);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut registers = Registers::new(8);
        registers.add(0xdead_beef);
        let once = registers.clone();
        for _ in 0..100 {
            registers.add(0xdead_beef);
        }
        assert_eq!(registers, once);
    }

    #[test]
    fn test_merge_max_and_reset() {
        let values = vec![0u8, 1, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2];
        let mut registers = Registers::from_values(4, values.into_boxed_slice());
        assert_eq!(registers.num_zeros(), 13);

        let other = [3, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 7];
        registers.merge_max(&other);
        assert_eq!(
            registers.values(),
            &[3, 1, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 7]
        );
        assert_eq!(registers.num_zeros(), 11);

        registers.reset();
        assert!(registers.is_empty());
        assert_eq!(registers.precision(), 4);
    }
}
