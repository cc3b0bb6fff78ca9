// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

//! Arithmetic over the numeric types.
//!
//! Integer overflow wraps; overflow control is the encoder's business via
//! explicit checked casts. Division and modulo by zero are not errors,
//! they yield the undefined value.

use crate::Result;
use opal_type::{Decimal, Type, Value};
use std::sync::Arc;

pub fn pos(ty: Type, v: &Value) -> Result<Value> {
    if v.is_undefined() {
        return Ok(Value::Undefined);
    }
    // Identity, but the operand must still carry the operator's type.
    match ty {
        Type::Int4 => {
            v.get::<i32>()?;
        }
        Type::Int8 => {
            v.get::<i64>()?;
        }
        Type::Float4 => {
            v.get::<f32>()?;
        }
        Type::Float8 => {
            v.get::<f64>()?;
        }
        Type::Decimal => {
            v.get::<Arc<Decimal>>()?;
        }
        other => unimplemented!("POS is not defined for {other}"),
    }
    Ok(v.clone())
}

pub fn neg(ty: Type, v: &Value) -> Result<Value> {
    if v.is_undefined() {
        return Ok(Value::Undefined);
    }
    Ok(match ty {
        Type::Int4 => Value::Int4(v.get::<i32>()?.wrapping_neg()),
        Type::Int8 => Value::Int8(v.get::<i64>()?.wrapping_neg()),
        Type::Float4 => Value::float4(-v.get::<f32>()?),
        Type::Float8 => Value::float8(-v.get::<f64>()?),
        Type::Decimal => Value::decimal(-&*v.get::<Arc<Decimal>>()?),
        other => unimplemented!("NEG is not defined for {other}"),
    })
}

pub fn add(ty: Type, v0: &Value, v1: &Value) -> Result<Value> {
    if v0.is_undefined() || v1.is_undefined() {
        return Ok(Value::Undefined);
    }
    Ok(match ty {
        Type::Int4 => Value::Int4(v0.get::<i32>()?.wrapping_add(v1.get()?)),
        Type::Int8 => Value::Int8(v0.get::<i64>()?.wrapping_add(v1.get()?)),
        Type::Float4 => Value::float4(v0.get::<f32>()? + v1.get::<f32>()?),
        Type::Float8 => Value::float8(v0.get::<f64>()? + v1.get::<f64>()?),
        Type::Decimal => Value::decimal(&*v0.get::<Arc<Decimal>>()? + &*v1.get::<Arc<Decimal>>()?),
        other => unimplemented!("ADD is not defined for {other}"),
    })
}

pub fn sub(ty: Type, v0: &Value, v1: &Value) -> Result<Value> {
    if v0.is_undefined() || v1.is_undefined() {
        return Ok(Value::Undefined);
    }
    Ok(match ty {
        Type::Int4 => Value::Int4(v0.get::<i32>()?.wrapping_sub(v1.get()?)),
        Type::Int8 => Value::Int8(v0.get::<i64>()?.wrapping_sub(v1.get()?)),
        Type::Float4 => Value::float4(v0.get::<f32>()? - v1.get::<f32>()?),
        Type::Float8 => Value::float8(v0.get::<f64>()? - v1.get::<f64>()?),
        Type::Decimal => Value::decimal(&*v0.get::<Arc<Decimal>>()? - &*v1.get::<Arc<Decimal>>()?),
        other => unimplemented!("SUB is not defined for {other}"),
    })
}

pub fn mul(ty: Type, v0: &Value, v1: &Value) -> Result<Value> {
    if v0.is_undefined() || v1.is_undefined() {
        return Ok(Value::Undefined);
    }
    Ok(match ty {
        Type::Int4 => Value::Int4(v0.get::<i32>()?.wrapping_mul(v1.get()?)),
        Type::Int8 => Value::Int8(v0.get::<i64>()?.wrapping_mul(v1.get()?)),
        Type::Float4 => Value::float4(v0.get::<f32>()? * v1.get::<f32>()?),
        Type::Float8 => Value::float8(v0.get::<f64>()? * v1.get::<f64>()?),
        Type::Decimal => Value::decimal(&*v0.get::<Arc<Decimal>>()? * &*v1.get::<Arc<Decimal>>()?),
        other => unimplemented!("MUL is not defined for {other}"),
    })
}

/// Truncating for integers, IEEE for floats, exact for decimal. A zero
/// divisor yields the undefined value.
pub fn div(ty: Type, v0: &Value, v1: &Value) -> Result<Value> {
    if v0.is_undefined() || v1.is_undefined() {
        return Ok(Value::Undefined);
    }
    Ok(match ty {
        Type::Int4 => {
            let (a, b) = (v0.get::<i32>()?, v1.get::<i32>()?);
            if b == 0 { Value::Undefined } else { Value::Int4(a.wrapping_div(b)) }
        }
        Type::Int8 => {
            let (a, b) = (v0.get::<i64>()?, v1.get::<i64>()?);
            if b == 0 { Value::Undefined } else { Value::Int8(a.wrapping_div(b)) }
        }
        Type::Float4 => {
            let (a, b) = (v0.get::<f32>()?, v1.get::<f32>()?);
            if b == 0.0 { Value::Undefined } else { Value::float4(a / b) }
        }
        Type::Float8 => {
            let (a, b) = (v0.get::<f64>()?, v1.get::<f64>()?);
            if b == 0.0 { Value::Undefined } else { Value::float8(a / b) }
        }
        Type::Decimal => {
            let (a, b) = (v0.get::<Arc<Decimal>>()?, v1.get::<Arc<Decimal>>()?);
            if b.is_zero() { Value::Undefined } else { Value::decimal(&*a / &*b) }
        }
        other => unimplemented!("DIV is not defined for {other}"),
    })
}

/// Integer modulo. A zero divisor yields the undefined value.
pub fn rem(ty: Type, v0: &Value, v1: &Value) -> Result<Value> {
    if v0.is_undefined() || v1.is_undefined() {
        return Ok(Value::Undefined);
    }
    Ok(match ty {
        Type::Int4 => {
            let (a, b) = (v0.get::<i32>()?, v1.get::<i32>()?);
            if b == 0 { Value::Undefined } else { Value::Int4(a.wrapping_rem(b)) }
        }
        Type::Int8 => {
            let (a, b) = (v0.get::<i64>()?, v1.get::<i64>()?);
            if b == 0 { Value::Undefined } else { Value::Int8(a.wrapping_rem(b)) }
        }
        other => unimplemented!("MOD is not defined for {other}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_propagates() {
        let v = Value::Int4(1);
        assert_eq!(add(Type::Int4, &Value::Undefined, &v).unwrap(), Value::Undefined);
        assert_eq!(mul(Type::Int4, &v, &Value::Undefined).unwrap(), Value::Undefined);
        assert_eq!(neg(Type::Int4, &Value::Undefined).unwrap(), Value::Undefined);
    }

    #[test]
    fn test_zero_divisor_is_undefined() {
        assert_eq!(div(Type::Int4, &Value::Int4(1), &Value::Int4(0)).unwrap(), Value::Undefined);
        assert_eq!(rem(Type::Int8, &Value::Int8(1), &Value::Int8(0)).unwrap(), Value::Undefined);
        assert_eq!(
            div(Type::Float8, &Value::float8(1.0), &Value::float8(0.0)).unwrap(),
            Value::Undefined
        );
        assert_eq!(
            div(Type::Decimal, &Value::decimal(1.into()), &Value::decimal(0.into())).unwrap(),
            Value::Undefined
        );
    }

    #[test]
    fn test_integer_division_truncates() {
        assert_eq!(div(Type::Int4, &Value::Int4(7), &Value::Int4(-2)).unwrap(), Value::Int4(-3));
        assert_eq!(rem(Type::Int4, &Value::Int4(7), &Value::Int4(-2)).unwrap(), Value::Int4(1));
    }

    #[test]
    fn test_div_mul_mod_identity() {
        for (a, b) in [(17, 5), (-17, 5), (17, -5), (-17, -5), (4, 2)] {
            let q = div(Type::Int4, &Value::Int4(a), &Value::Int4(b)).unwrap();
            let qb = mul(Type::Int4, &q, &Value::Int4(b)).unwrap();
            let r = rem(Type::Int4, &Value::Int4(a), &Value::Int4(b)).unwrap();
            assert_eq!(add(Type::Int4, &qb, &r).unwrap(), Value::Int4(a));
        }
    }

    #[test]
    fn test_wrapping_overflow() {
        assert_eq!(
            add(Type::Int4, &Value::Int4(i32::MAX), &Value::Int4(1)).unwrap(),
            Value::Int4(i32::MIN)
        );
        assert_eq!(neg(Type::Int4, &Value::Int4(i32::MIN)).unwrap(), Value::Int4(i32::MIN));
    }

    #[test]
    fn test_decimal_exact() {
        let a = Value::decimal(Decimal::parse("123.123").unwrap());
        let b = Value::decimal(Decimal::parse("456.456").unwrap());
        let sum = add(Type::Decimal, &a, &b).unwrap();
        assert_eq!(sum.to_string(), "579.579");
    }

    #[test]
    fn test_type_byte_is_enforced() {
        assert!(add(Type::Int8, &Value::Int4(1), &Value::Int4(2)).is_err());
    }
}
