// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

//! The `IS_NULL` / `IS_TRUE` / `IS_FALSE` predicates. Unlike every other
//! kernel these never return the undefined value.
//!
//! Text and dates step outside the numeric rule: a string is never "true"
//! yet any bound string counts as "false", while any bound date counts as
//! "true" and no date ever counts as "false". Filter predicates compiled
//! against the engine rely on both conventions.

use crate::Result;
use opal_type::{Decimal, Type, Value};
use std::sync::Arc;

pub fn is_null(v: &Value) -> bool {
    v.is_undefined()
}

pub fn is_true(ty: Type, v: &Value) -> Result<bool> {
    if v.is_undefined() {
        return Ok(false);
    }
    Ok(match ty {
        Type::Int4 => v.get::<i32>()? != 0,
        Type::Int8 => v.get::<i64>()? != 0,
        Type::Bool => v.get::<bool>()?,
        Type::Float4 => v.get::<f32>()? != 0.0,
        Type::Float8 => v.get::<f64>()? != 0.0,
        Type::Decimal => !v.get::<Arc<Decimal>>()?.is_zero(),
        Type::Utf8 => false,
        Type::Date => true,
        Type::Undefined => false,
    })
}

pub fn is_false(ty: Type, v: &Value) -> Result<bool> {
    if v.is_undefined() {
        return Ok(false);
    }
    Ok(match ty {
        Type::Int4 => v.get::<i32>()? == 0,
        Type::Int8 => v.get::<i64>()? == 0,
        Type::Bool => !v.get::<bool>()?,
        Type::Float4 => v.get::<f32>()? == 0.0,
        Type::Float8 => v.get::<f64>()? == 0.0,
        Type::Decimal => v.get::<Arc<Decimal>>()?.is_zero(),
        Type::Utf8 => true,
        Type::Date => false,
        Type::Undefined => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null() {
        assert!(is_null(&Value::Undefined));
        assert!(!is_null(&Value::Int4(0)));
    }

    #[test]
    fn test_numeric_truthiness() {
        assert!(is_true(Type::Int4, &Value::Int4(1)).unwrap());
        assert!(!is_true(Type::Int4, &Value::Int4(0)).unwrap());
        assert!(!is_true(Type::Int4, &Value::Undefined).unwrap());
        assert!(is_false(Type::Int4, &Value::Int4(0)).unwrap());
        assert!(!is_false(Type::Int4, &Value::Undefined).unwrap());
        assert!(is_true(Type::Decimal, &Value::decimal(Decimal::parse("0.1").unwrap())).unwrap());
        assert!(is_false(Type::Decimal, &Value::decimal(0.into())).unwrap());
    }

    #[test]
    fn test_string_is_never_true_but_bound_means_false() {
        let s = Value::from("abc");
        assert!(!is_true(Type::Utf8, &s).unwrap());
        assert!(!is_true(Type::Utf8, &Value::from("")).unwrap());
        assert!(is_false(Type::Utf8, &s).unwrap());
        assert!(!is_false(Type::Utf8, &Value::Undefined).unwrap());
    }

    #[test]
    fn test_bound_date_is_always_true() {
        // epoch itself is a bound date, zero or not
        assert!(is_true(Type::Date, &Value::Int8(0)).unwrap());
        assert!(!is_false(Type::Date, &Value::Int8(0)).unwrap());
        assert!(!is_true(Type::Date, &Value::Undefined).unwrap());
    }

    #[test]
    fn test_bool_predicates() {
        assert!(is_true(Type::Bool, &Value::Bool(true)).unwrap());
        assert!(!is_true(Type::Bool, &Value::Bool(false)).unwrap());
        assert!(is_false(Type::Bool, &Value::Bool(false)).unwrap());
    }
}
