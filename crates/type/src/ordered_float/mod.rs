// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

pub use self::f32::OrderedF32;
pub use self::f64::OrderedF64;

mod f32;
mod f64;

/// NaN has no place in a total order; constructing an ordered float from
/// one fails with this error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("NaN is not an ordered float")]
pub struct OrderedFloatError;
