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

use crate::error::Error;
use crate::hll::check_precision;
use crate::hll::estimator::relative_error;
use crate::hll::max_rank;

/// An owned copy of a sketch's logical state: its precision and register array.
///
/// Snapshots are values: taking one copies the registers, so later updates to the source sketch
/// are never observed through it. Use them to merge sketches or to persist one.
///
/// # Examples
///
/// ```
/// use cardinality_sketch::hll::HllSketch;
///
/// let mut sketch = HllSketch::new(8).unwrap();
/// sketch.update("apple");
/// let snapshot = sketch.snapshot();
/// sketch.update("banana");
///
/// let restored = HllSketch::restore(&snapshot).unwrap();
/// assert_eq!(restored.count(), 1);
/// assert_eq!(sketch.count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    precision: u8,
    registers: Vec<u8>,
}

impl Snapshot {
    /// Creates a snapshot from raw parts, validating them.
    ///
    /// Fails with [`InvalidPrecision`] if `precision` is unsupported, and with
    /// [`MalformedSnapshot`] if `registers.len() != 2^precision` or a register exceeds
    /// [`max_rank`]`(precision)`.
    ///
    /// [`InvalidPrecision`]: crate::error::ErrorKind::InvalidPrecision
    /// [`MalformedSnapshot`]: crate::error::ErrorKind::MalformedSnapshot
    pub fn new(precision: u8, registers: Vec<u8>) -> Result<Self, Error> {
        let snapshot = Self {
            precision,
            registers,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub(super) fn from_parts_unchecked(precision: u8, registers: Vec<u8>) -> Self {
        Self {
            precision,
            registers,
        }
    }

    /// Checks the invariants [`Snapshot::new`] enforces.
    pub fn validate(&self) -> Result<(), Error> {
        check_precision(self.precision)?;

        let expected = 1usize << self.precision;
        if self.registers.len() != expected {
            return Err(Error::malformed_snapshot(format!(
                "register count {} does not match precision {} (expected {expected})",
                self.registers.len(),
                self.precision
            ))
            .with_context("precision", self.precision));
        }

        let max = max_rank(self.precision);
        if let Some((slot, value)) = self
            .registers
            .iter()
            .enumerate()
            .find(|(_, value)| **value > max)
        {
            return Err(Error::malformed_snapshot(format!(
                "register {slot} holds rank {value}, above maximum {max}"
            ))
            .with_context("precision", self.precision));
        }

        Ok(())
    }

    /// Returns the precision recorded in this snapshot.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Returns the register values, one rank per bucket.
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Returns the theoretical relative error at this snapshot's precision.
    pub fn relative_error(&self) -> f64 {
        relative_error(self.precision)
    }

    /// Returns true if no register has been set.
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|v| *v == 0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Snapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Parts {
            precision: u8,
            registers: Vec<u8>,
        }

        // Route through `new` so deserialized snapshots hold the same invariants.
        let Parts {
            precision,
            registers,
        } = <Parts as serde::Deserialize>::deserialize(deserializer)?;
        Snapshot::new(precision, registers).map_err(serde::de::Error::custom)
    }
}
