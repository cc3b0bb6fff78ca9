// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

//! Relational comparison, three-valued: comparing against the undefined
//! value yields no ordering, and the operators turn that into the
//! undefined result rather than `false`.

use crate::Result;
use opal_type::{Decimal, Type, Value};
use std::cmp::Ordering;
use std::sync::Arc;

/// Orders two operands of the given type. `None` when either side is
/// undefined. Text compares byte-wise (case-sensitive ordinal); dates
/// compare as the `Int8` millis that carry them.
pub fn compare(ty: Type, v0: &Value, v1: &Value) -> Result<Option<Ordering>> {
    if v0.is_undefined() || v1.is_undefined() {
        return Ok(None);
    }
    let ordering = match ty {
        Type::Int4 => v0.get::<i32>()?.cmp(&v1.get()?),
        Type::Int8 | Type::Date => v0.get::<i64>()?.cmp(&v1.get()?),
        Type::Bool => v0.get::<bool>()?.cmp(&v1.get()?),
        Type::Float4 => v0.get::<f32>()?.total_cmp(&v1.get()?),
        Type::Float8 => v0.get::<f64>()?.total_cmp(&v1.get()?),
        Type::Decimal => v0.get::<Arc<Decimal>>()?.cmp(&v1.get()?),
        Type::Utf8 => v0.get::<Arc<str>>()?.as_bytes().cmp(v1.get::<Arc<str>>()?.as_bytes()),
        Type::Undefined => unimplemented!("comparison is not defined for UNDEFINED"),
    };
    Ok(Some(ordering))
}
