// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

use crate::ordered_float::OrderedFloatError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An `f64` with a total order and a stable hash; see [`super::OrderedF32`].
#[repr(transparent)]
#[derive(Copy, Clone, Default, Serialize, Deserialize)]
pub struct OrderedF64(pub f64);

fn order_key(v: f64) -> u64 {
    let bits = v.to_bits();
    if bits & 0x8000_0000_0000_0000 != 0 { !bits } else { bits | 0x8000_0000_0000_0000 }
}

impl PartialEq for OrderedF64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedF64 {}

impl PartialOrd for OrderedF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        order_key(self.0).cmp(&order_key(other.0))
    }
}

impl Hash for OrderedF64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Debug for OrderedF64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for OrderedF64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<OrderedF64> for f64 {
    fn from(v: OrderedF64) -> Self {
        v.0
    }
}

impl TryFrom<f64> for OrderedF64 {
    type Error = OrderedFloatError;

    fn try_from(f: f64) -> Result<Self, Self::Error> {
        if f.is_nan() {
            return Err(OrderedFloatError);
        }
        Ok(OrderedF64(if f == 0.0 { 0.0 } else { f }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn of(f: f64) -> OrderedF64 {
        OrderedF64::try_from(f).unwrap()
    }

    #[test]
    fn test_total_order_across_signs() {
        let mut values = vec![of(0.1), of(-1e300), of(0.0), of(7.8)];
        values.sort();
        let sorted: Vec<f64> = values.into_iter().map(f64::from).collect();
        assert_eq!(sorted, vec![-1e300, 0.0, 0.1, 7.8]);
    }

    #[test]
    fn test_negative_zero_normalized() {
        assert_eq!(of(-0.0), of(0.0));
    }

    #[test]
    fn test_nan_rejected() {
        assert_eq!(OrderedF64::try_from(f64::NAN), Err(OrderedFloatError));
    }
}
