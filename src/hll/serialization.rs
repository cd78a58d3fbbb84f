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

//! Binary layout of a serialized snapshot.
//!
//! ```text
//! byte 0     preamble longs (1)
//! byte 1     serial version (1)
//! byte 2     family id (HLL = 7)
//! byte 3     precision
//! byte 4     flags (bit 2: empty)
//! byte 5     hash width (32)
//! bytes 6-7  reserved
//! bytes 8..  2^precision register bytes, absent when empty
//! ```

use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::codec::assert::ensure_serial_version_is;
use crate::codec::family::Family;
use crate::error::Error;
use crate::hll::HASH_WIDTH;
use crate::hll::Snapshot;
use crate::hll::check_precision;

const PREAMBLE_LONGS: u8 = 1;
const PREAMBLE_BYTES: usize = 8;
const SERIAL_VERSION: u8 = 1;
const FLAG_IS_EMPTY: u8 = 1 << 2;

impl Snapshot {
    /// Serializes the snapshot to bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardinality_sketch::hll::{HllSketch, Snapshot};
    ///
    /// let mut sketch = HllSketch::new(10).unwrap();
    /// sketch.update("apple");
    ///
    /// let bytes = sketch.snapshot().serialize();
    /// let decoded = Snapshot::deserialize(&bytes).unwrap();
    /// assert_eq!(decoded, sketch.snapshot());
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let is_empty = self.is_empty();
        let size = if is_empty {
            PREAMBLE_BYTES
        } else {
            PREAMBLE_BYTES + self.registers().len()
        };

        let mut bytes = SketchBytes::with_capacity(size);
        bytes.write_u8(PREAMBLE_LONGS);
        bytes.write_u8(SERIAL_VERSION);
        bytes.write_u8(Family::HLL.id);
        bytes.write_u8(self.precision());
        bytes.write_u8(if is_empty { FLAG_IS_EMPTY } else { 0 });
        bytes.write_u8(HASH_WIDTH);
        bytes.write_u16_le(0);

        if !is_empty {
            bytes.write(self.registers());
        }
        bytes.into_bytes()
    }

    /// Deserializes a snapshot from bytes, validating it.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        fn make_error(tag: &'static str) -> impl FnOnce(std::io::Error) -> Error {
            move |err| Error::insufficient_data(tag).set_source(err)
        }

        let mut cursor = SketchSlice::new(bytes);
        let preamble_longs = cursor.read_u8().map_err(make_error("preamble_longs"))?;
        let serial_version = cursor.read_u8().map_err(make_error("serial_version"))?;
        let family_id = cursor.read_u8().map_err(make_error("family_id"))?;
        let precision = cursor.read_u8().map_err(make_error("precision"))?;
        let flags = cursor.read_u8().map_err(make_error("flags"))?;
        let hash_width = cursor.read_u8().map_err(make_error("hash_width"))?;
        cursor.read_u16_le().map_err(make_error("reserved"))?;

        Family::HLL.validate_id(family_id)?;
        ensure_serial_version_is(SERIAL_VERSION, serial_version)?;
        Family::HLL.validate_pre_longs(preamble_longs)?;
        if hash_width != HASH_WIDTH {
            return Err(Error::malformed_snapshot(format!(
                "unsupported hash width: expected {HASH_WIDTH}, got {hash_width}"
            )));
        }
        if flags & !FLAG_IS_EMPTY != 0 {
            return Err(Error::malformed_snapshot(format!(
                "unknown flags set: {flags:#010b}"
            )));
        }
        check_precision(precision)?;

        let num_registers = 1usize << precision;
        let mut registers = vec![0u8; num_registers];
        if flags & FLAG_IS_EMPTY == 0 {
            cursor
                .read_exact(&mut registers)
                .map_err(make_error("registers"))?;
        }
        if cursor.remaining() != 0 {
            return Err(Error::malformed_snapshot(format!(
                "{} trailing bytes after registers",
                cursor.remaining()
            )));
        }

        let snapshot = Snapshot::from_parts_unchecked(precision, registers);
        snapshot.validate()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use googletest::assert_that;
    use googletest::prelude::contains_substring;

    use super::*;
    use crate::error::ErrorKind;

    fn sample(precision: u8) -> Snapshot {
        let mut registers = vec![0u8; 1 << precision];
        registers[0] = 3;
        registers[7] = 1;
        Snapshot::new(precision, registers).unwrap()
    }

    #[test]
    fn test_layout() {
        let bytes = sample(4).serialize();
        assert_eq!(bytes.len(), 8 + 16);
        assert_eq!(&bytes[..8], &[1, 1, 7, 4, 0, 32, 0, 0]);
        assert_eq!(bytes[8], 3);
        assert_eq!(bytes[15], 1);
    }

    #[test]
    fn test_empty_layout() {
        let empty = Snapshot::new(12, vec![0u8; 1 << 12]).unwrap();
        let bytes = empty.serialize();
        assert_eq!(bytes, vec![1, 1, 7, 12, FLAG_IS_EMPTY, 32, 0, 0]);
        assert_eq!(Snapshot::deserialize(&bytes).unwrap(), empty);
    }

    #[test]
    fn test_deserialize_restores_registers() {
        let snapshot = sample(9);
        assert_eq!(Snapshot::deserialize(&snapshot.serialize()).unwrap(), snapshot);
    }

    #[test]
    fn test_deserialize_truncated() {
        let bytes = sample(6).serialize();
        let err = Snapshot::deserialize(&bytes[..bytes.len() - 1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedSnapshot);
        assert_that!(err.message(), contains_substring("registers"));

        let err = Snapshot::deserialize(&bytes[..3]).unwrap_err();
        assert_that!(err.message(), contains_substring("precision"));
    }

    #[test]
    fn test_deserialize_wrong_family() {
        let mut bytes = sample(6).serialize();
        bytes[2] = 3;
        let err = Snapshot::deserialize(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedSnapshot);
        assert_that!(err.message(), contains_substring("invalid family"));
    }

    #[test]
    fn test_deserialize_wrong_version() {
        let mut bytes = sample(6).serialize();
        bytes[1] = 2;
        let err = Snapshot::deserialize(&bytes).unwrap_err();
        assert_that!(err.message(), contains_substring("serial version"));
    }

    #[test]
    fn test_deserialize_unknown_flags() {
        let mut bytes = sample(4).serialize();
        bytes[4] = 1;
        let err = Snapshot::deserialize(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedSnapshot);
        assert_that!(err.message(), contains_substring("unknown flags set: 0b00000001"));
    }

    #[test]
    fn test_deserialize_invalid_precision() {
        let mut bytes = sample(4).serialize();
        bytes[3] = 2;
        let err = Snapshot::deserialize(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPrecision);
    }

    #[test]
    fn test_deserialize_rank_out_of_range() {
        let mut bytes = sample(4).serialize();
        bytes[8] = 30;
        let err = Snapshot::deserialize(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedSnapshot);
        assert_that!(err.message(), contains_substring("above maximum 29"));
    }

    #[test]
    fn test_deserialize_trailing_bytes() {
        let mut bytes = sample(4).serialize();
        bytes.push(0);
        let err = Snapshot::deserialize(&bytes).unwrap_err();
        assert_that!(err.message(), contains_substring("trailing"));
    }
}
