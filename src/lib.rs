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

//! Mergeable HyperLogLog sketches for approximate distinct counting.
//!
//! A sketch summarizes a stream of hashed values in `2^p` small registers and estimates how many
//! distinct values it has seen, with a relative error of about `1.04 / sqrt(2^p)`. Sketches of
//! different precision can be merged; the result takes the lower precision.
//!
//! ```
//! use cardinality_sketch::hll::HllSketch;
//!
//! let mut left = HllSketch::new(12).unwrap();
//! let mut right = HllSketch::new(12).unwrap();
//! for i in 0..1000 {
//!     left.update(format!("left-{i}"));
//!     right.update(format!("right-{i}"));
//! }
//!
//! left.merge(&right.snapshot()).unwrap();
//! let estimate = left.estimate();
//! assert!((estimate - 2000.0).abs() < 3.0 * left.relative_error() * 2000.0);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub(crate) mod codec;
pub mod common;
pub mod error;
pub mod hash;
pub mod hll;
