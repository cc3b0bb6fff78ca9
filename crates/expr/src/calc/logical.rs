// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

//! Kleene three-valued logic.
//!
//! Both inputs are already evaluated by the time a connective runs (the
//! bytecode pushes them first), so the short-circuit rows of the truth
//! table are value decisions, not control flow: a definite `false`
//! dominates `AND`, a definite `true` dominates `OR`.

use crate::Result;
use opal_type::Value;

fn truth(v: &Value) -> Result<Option<bool>> {
    match v {
        Value::Undefined => Ok(None),
        other => Ok(Some(other.get::<bool>()?)),
    }
}

pub fn not(v: &Value) -> Result<Value> {
    Ok(match truth(v)? {
        Some(b) => Value::Bool(!b),
        None => Value::Undefined,
    })
}

pub fn and(v0: &Value, v1: &Value) -> Result<Value> {
    Ok(match (truth(v0)?, truth(v1)?) {
        (Some(false), _) | (_, Some(false)) => Value::Bool(false),
        (Some(true), Some(true)) => Value::Bool(true),
        _ => Value::Undefined,
    })
}

pub fn or(v0: &Value, v1: &Value) -> Result<Value> {
    Ok(match (truth(v0)?, truth(v1)?) {
        (Some(true), _) | (_, Some(true)) => Value::Bool(true),
        (Some(false), Some(false)) => Value::Bool(false),
        _ => Value::Undefined,
    })
}
