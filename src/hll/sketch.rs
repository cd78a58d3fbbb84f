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

use crate::common::NumStdDev;
use crate::error::Error;
use crate::hash::hash;
use crate::hll::DEFAULT_PRECISION;
use crate::hll::Snapshot;
use crate::hll::check_precision;
use crate::hll::estimator;
use crate::hll::fold::merge_into;
use crate::hll::registers::Registers;

/// A HyperLogLog sketch for estimating the number of distinct hashed values.
///
/// A sketch is not synchronized: `add` and `merge` must be serialized by the caller. Independent
/// sketches share nothing, so the usual way to scale is one sketch per shard, merged
/// periodically.
///
/// # Examples
///
/// ```
/// use cardinality_sketch::hash::hash;
/// use cardinality_sketch::hll::HllSketch;
///
/// let mut sketch = HllSketch::new(8).unwrap();
/// sketch.add(hash("thing1"));
/// assert_eq!(sketch.count(), 1);
///
/// for _ in 0..100 {
///     sketch.add(hash("thing1"));
///     sketch.add(hash("thing2"));
///     sketch.add(hash("thing3"));
/// }
/// assert_eq!(sketch.count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HllSketch {
    registers: Registers,
}

impl Default for HllSketch {
    fn default() -> Self {
        Self {
            registers: Registers::new(DEFAULT_PRECISION),
        }
    }
}

impl HllSketch {
    /// Creates an empty sketch with `2^precision` registers.
    ///
    /// Fails with [`InvalidPrecision`] unless `precision` is in
    /// [`MIN_PRECISION`]`..=`[`MAX_PRECISION`].
    ///
    /// [`InvalidPrecision`]: crate::error::ErrorKind::InvalidPrecision
    /// [`MIN_PRECISION`]: crate::hll::MIN_PRECISION
    /// [`MAX_PRECISION`]: crate::hll::MAX_PRECISION
    pub fn new(precision: u8) -> Result<Self, Error> {
        check_precision(precision)?;
        Ok(Self {
            registers: Registers::new(precision),
        })
    }

    /// Rebuilds a sketch from a snapshot.
    pub fn restore(snapshot: &Snapshot) -> Result<Self, Error> {
        if let Err(err) = snapshot.validate() {
            tracing::debug!(%err, "rejecting snapshot");
            return Err(err);
        }
        tracing::trace!(precision = snapshot.precision(), "restoring sketch");

        let values = snapshot.registers().to_vec().into_boxed_slice();
        Ok(Self {
            registers: Registers::from_values(snapshot.precision(), values),
        })
    }

    /// Returns the current precision. It only changes when merging a coarser snapshot.
    pub fn precision(&self) -> u8 {
        self.registers.precision()
    }

    /// Returns the number of registers, `2^precision`.
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    /// Returns true if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Adds an already hashed value.
    ///
    /// The hash is assumed to be uniformly distributed over 32 bits. Adding the same hash again
    /// never changes the sketch.
    #[inline]
    pub fn add(&mut self, hash: u32) {
        self.registers.add(hash);
    }

    /// Hashes `value` with [`hash`](crate::hash::hash) and adds it.
    pub fn update(&mut self, value: impl AsRef<[u8]>) {
        self.add(hash(value));
    }

    /// Returns the bias-corrected cardinality estimate.
    pub fn estimate(&self) -> f64 {
        estimator::estimate(&self.registers)
    }

    /// Returns the cardinality estimate rounded to the nearest integer.
    pub fn count(&self) -> u64 {
        estimator::count(&self.registers)
    }

    /// Returns the theoretical relative error at the current precision.
    pub fn relative_error(&self) -> f64 {
        estimator::relative_error(self.precision())
    }

    /// Returns the approximate lower error bound given the specified number of standard
    /// deviations.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardinality_sketch::common::NumStdDev;
    /// use cardinality_sketch::hll::HllSketch;
    ///
    /// let mut sketch = HllSketch::new(12).unwrap();
    /// for i in 0..10000 {
    ///     sketch.update(i.to_string());
    /// }
    ///
    /// let estimate = sketch.estimate();
    /// assert!(sketch.lower_bound(NumStdDev::Two) <= estimate);
    /// assert!(estimate <= sketch.upper_bound(NumStdDev::Two));
    /// ```
    pub fn lower_bound(&self, num_std_dev: NumStdDev) -> f64 {
        let estimate = self.estimate();
        (estimate * (1.0 - num_std_dev.as_f64() * self.relative_error())).max(0.0)
    }

    /// Returns the approximate upper error bound given the specified number of standard
    /// deviations.
    pub fn upper_bound(&self, num_std_dev: NumStdDev) -> f64 {
        self.estimate() * (1.0 + num_std_dev.as_f64() * self.relative_error())
    }

    /// Returns an owned copy of the sketch state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_parts_unchecked(self.precision(), self.registers.values().to_vec())
    }

    /// Alias for [`HllSketch::snapshot`].
    pub fn output(&self) -> Snapshot {
        self.snapshot()
    }

    /// Merges a snapshot of another sketch into this one.
    ///
    /// The result has precision `min(self.precision(), other.precision())`. Merging a coarser
    /// snapshot therefore lowers this sketch's precision for good, and with it the accuracy
    /// reported by [`HllSketch::relative_error`].
    ///
    /// Fails without modifying `self` if the snapshot is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardinality_sketch::hll::HllSketch;
    ///
    /// let mut fine = HllSketch::new(14).unwrap();
    /// let mut coarse = HllSketch::new(8).unwrap();
    /// fine.update("Just hll");
    /// coarse.update("Just hll2");
    /// fine.update("both");
    /// coarse.update("both");
    ///
    /// fine.merge(&coarse.snapshot()).unwrap();
    /// assert_eq!(fine.precision(), 8);
    /// assert_eq!(fine.count(), 3);
    /// ```
    pub fn merge(&mut self, other: &Snapshot) -> Result<(), Error> {
        if let Err(err) = other.validate() {
            tracing::debug!(%err, "rejecting snapshot for merge");
            return Err(err);
        }
        merge_into(&mut self.registers, other.precision(), other.registers());
        Ok(())
    }

    /// Merges another sketch into this one. See [`HllSketch::merge`].
    pub fn merge_sketch(&mut self, other: &HllSketch) {
        merge_into(
            &mut self.registers,
            other.precision(),
            other.registers.values(),
        );
    }

    /// Clears all registers, keeping the current precision.
    pub fn reset(&mut self) {
        self.registers.reset();
    }

    /// Serializes the sketch. See [`Snapshot::serialize`] for the layout.
    pub fn serialize(&self) -> Vec<u8> {
        self.snapshot().serialize()
    }

    /// Deserializes a sketch written by [`HllSketch::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let snapshot = Snapshot::deserialize(bytes)?;
        Self::restore(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hll::max_rank;

    #[test]
    fn test_new_rejects_invalid_precision() {
        for precision in [0, 3, 17, 32] {
            let err = HllSketch::new(precision).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPrecision);
        }
    }

    #[test]
    fn test_default() {
        let sketch = HllSketch::default();
        assert_eq!(sketch.precision(), 12);
        assert_eq!(sketch.num_registers(), 4096);
        assert!(sketch.is_empty());
        assert_eq!(sketch.count(), 0);
    }

    #[test]
    fn test_add_known_hashes() {
        let mut sketch = HllSketch::new(16).unwrap();
        sketch.add(0x0001_0fff);
        sketch.add(0x0002_0fff);
        sketch.add(0x0003_0fff);
        sketch.add(0x0004_0fff);
        sketch.add(0x0005_0fff);
        sketch.add(0x0005_0fff);
        assert_eq!(sketch.count(), 5);
        assert_eq!(&sketch.snapshot().registers()[1..6], &[5, 5, 5, 5, 5]);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut sketch = HllSketch::new(10).unwrap();
        sketch.update("a");
        let snapshot = sketch.snapshot();
        sketch.update("b");
        sketch.update("c");
        assert_eq!(HllSketch::restore(&snapshot).unwrap().count(), 1);
        assert_eq!(sketch.output(), sketch.snapshot());
    }

    #[test]
    fn test_merge_rejects_malformed_snapshot_without_mutation() {
        let mut sketch = HllSketch::new(10).unwrap();
        sketch.update("a");
        let before = sketch.clone();

        let bad = Snapshot::from_parts_unchecked(10, vec![0u8; 10]);
        let err = sketch.merge(&bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedSnapshot);

        let bad = Snapshot::from_parts_unchecked(2, vec![0u8; 4]);
        let err = sketch.merge(&bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPrecision);

        assert_eq!(sketch, before);
    }

    #[test]
    fn test_restore_rejects_malformed_snapshot() {
        let short = Snapshot::from_parts_unchecked(10, vec![0u8; 512]);
        let err = HllSketch::restore(&short).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedSnapshot);
        assert!(err.message().contains("register count 512"), "{err}");

        let mut registers = vec![0u8; 1 << 10];
        registers[5] = max_rank(10) + 1;
        let too_high = Snapshot::from_parts_unchecked(10, registers);
        let err = HllSketch::restore(&too_high).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedSnapshot);
        assert!(err.message().contains("register 5 holds rank 24"), "{err}");

        let mut registers = vec![0u8; 1 << 10];
        registers[5] = max_rank(10);
        let restored = HllSketch::restore(&Snapshot::from_parts_unchecked(10, registers)).unwrap();
        assert_eq!(restored.count(), 1);
    }

    #[test]
    fn test_reset() {
        let mut sketch = HllSketch::new(6).unwrap();
        sketch.update("a");
        assert!(!sketch.is_empty());
        sketch.reset();
        assert!(sketch.is_empty());
        assert_eq!(sketch.precision(), 6);
        assert_eq!(sketch.count(), 0);
    }

    #[test]
    fn test_bounds_of_empty_sketch() {
        let sketch = HllSketch::new(8).unwrap();
        assert_eq!(sketch.lower_bound(NumStdDev::Three), 0.0);
        assert_eq!(sketch.upper_bound(NumStdDev::Three), 0.0);
    }
}
