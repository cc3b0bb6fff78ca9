// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

//! `MIN` / `MAX` / `ABS` and the checked abs variant.

use crate::calc::relational;
use crate::{Error, Result};
use opal_type::{Decimal, Type, Value};
use std::cmp::Ordering;
use std::sync::Arc;

/// The smaller operand, by the same per-type ordering the relational
/// kernels use (so text picks the byte-wise smaller string).
pub fn min(ty: Type, v0: &Value, v1: &Value) -> Result<Value> {
    Ok(match relational::compare(ty, v0, v1)? {
        None => Value::Undefined,
        Some(Ordering::Greater) => v1.clone(),
        Some(_) => v0.clone(),
    })
}

pub fn max(ty: Type, v0: &Value, v1: &Value) -> Result<Value> {
    Ok(match relational::compare(ty, v0, v1)? {
        None => Value::Undefined,
        Some(Ordering::Less) => v1.clone(),
        Some(_) => v0.clone(),
    })
}

/// Absolute value; `abs(iN::MIN)` wraps to itself.
pub fn abs(ty: Type, v: &Value) -> Result<Value> {
    if v.is_undefined() {
        return Ok(Value::Undefined);
    }
    Ok(match ty {
        Type::Int4 => Value::Int4(v.get::<i32>()?.wrapping_abs()),
        Type::Int8 => Value::Int8(v.get::<i64>()?.wrapping_abs()),
        Type::Float4 => Value::float4(v.get::<f32>()?.abs()),
        Type::Float8 => Value::float8(v.get::<f64>()?.abs()),
        Type::Decimal => Value::decimal(v.get::<Arc<Decimal>>()?.abs()),
        other => unimplemented!("ABS is not defined for {other}"),
    })
}

/// Like [`abs`], but refuses the one lossy integer case instead of
/// wrapping.
pub fn abs_check(ty: Type, v: &Value) -> Result<Value> {
    if v.is_undefined() {
        return Ok(Value::Undefined);
    }
    match ty {
        Type::Int4 => {
            let x = v.get::<i32>()?;
            if x == i32::MIN {
                return Err(Error::ExceedsLimits(Type::Int4));
            }
            Ok(Value::Int4(x.abs()))
        }
        Type::Int8 => {
            let x = v.get::<i64>()?;
            if x == i64::MIN {
                return Err(Error::ExceedsLimits(Type::Int8));
            }
            Ok(Value::Int8(x.abs()))
        }
        _ => abs(ty, v),
    }
}
