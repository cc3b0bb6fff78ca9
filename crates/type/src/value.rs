// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

use crate::decimal::Decimal;
use crate::ordered_float::{OrderedF32, OrderedF64};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// All value types an expression can produce or consume.
///
/// The discriminants double as the wire tags of the expression bytecode, so
/// their numbering is frozen.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// Value is not defined (think null in common programming languages)
    Undefined,
    /// A 4-byte signed integer
    Int4,
    /// An 8-byte signed integer
    Int8,
    /// A boolean: true or false.
    Bool,
    /// A 4-byte floating point
    Float4,
    /// An 8-byte floating point
    Float8,
    /// An arbitrary-precision decimal
    Decimal,
    /// A UTF-8 encoded text.
    Utf8,
    /// A calendar day; carried as an `Int8` holding milliseconds since the
    /// Unix epoch. There is no dedicated [`Value`] variant for it.
    Date,
}

impl Type {
    /// The single-byte wire tag of this type.
    pub const fn tag(&self) -> u8 {
        match self {
            Type::Undefined => 0x00,
            Type::Int4 => 0x01,
            Type::Int8 => 0x02,
            Type::Bool => 0x03,
            Type::Float4 => 0x04,
            Type::Float8 => 0x05,
            Type::Decimal => 0x06,
            Type::Utf8 => 0x07,
            Type::Date => 0x08,
        }
    }

    /// Resolves a wire tag back to a type.
    pub fn from_tag(tag: u8) -> Option<Type> {
        match tag {
            0x00 => Some(Type::Undefined),
            0x01 => Some(Type::Int4),
            0x02 => Some(Type::Int8),
            0x03 => Some(Type::Bool),
            0x04 => Some(Type::Float4),
            0x05 => Some(Type::Float8),
            0x06 => Some(Type::Decimal),
            0x07 => Some(Type::Utf8),
            0x08 => Some(Type::Date),
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Undefined => f.write_str("UNDEFINED"),
            Type::Int4 => f.write_str("INT4"),
            Type::Int8 => f.write_str("INT8"),
            Type::Bool => f.write_str("BOOL"),
            Type::Float4 => f.write_str("FLOAT4"),
            Type::Float8 => f.write_str("FLOAT8"),
            Type::Decimal => f.write_str("DECIMAL"),
            Type::Utf8 => f.write_str("UTF8"),
            Type::Date => f.write_str("DATE"),
        }
    }
}

/// A single expression value, represented as a native Rust type.
///
/// Text and decimal payloads are shared: cloning a value never copies them,
/// which keeps pushing the same operand onto an evaluation stack cheap.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Value is not defined (think null in common programming languages)
    Undefined,
    /// A 4-byte signed integer
    Int4(i32),
    /// An 8-byte signed integer
    Int8(i64),
    /// A boolean: true or false.
    Bool(bool),
    /// A 4-byte floating point
    Float4(OrderedF32),
    /// An 8-byte floating point
    Float8(OrderedF64),
    /// An arbitrary-precision decimal
    Decimal(Arc<Decimal>),
    /// A UTF-8 encoded text.
    Utf8(Arc<str>),
}

impl Value {
    /// The type tag of this value. `Undefined` has no payload; everything
    /// else maps to exactly one tag. A date is indistinguishable from the
    /// `Int8` that carries it.
    pub fn ty(&self) -> Type {
        match self {
            Value::Undefined => Type::Undefined,
            Value::Int4(_) => Type::Int4,
            Value::Int8(_) => Type::Int8,
            Value::Bool(_) => Type::Bool,
            Value::Float4(_) => Type::Float4,
            Value::Float8(_) => Type::Float8,
            Value::Decimal(_) => Type::Decimal,
            Value::Utf8(_) => Type::Utf8,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Wraps a float, mapping NaN to `Undefined`. All kernels producing
    /// 4-byte floats construct their results through here.
    pub fn float4(v: f32) -> Self {
        OrderedF32::try_from(v).map(Value::Float4).unwrap_or(Value::Undefined)
    }

    /// Wraps a double, mapping NaN to `Undefined`.
    pub fn float8(v: impl Into<f64>) -> Self {
        OrderedF64::try_from(v.into()).map(Value::Float8).unwrap_or(Value::Undefined)
    }

    pub fn utf8(v: impl Into<Arc<str>>) -> Self {
        Value::Utf8(v.into())
    }

    pub fn decimal(v: Decimal) -> Self {
        Value::Decimal(Arc::new(v))
    }

    /// Extracts the payload as `T`, failing when the tag does not match.
    /// `Undefined` matches no `T`.
    pub fn get<T: FromValue>(&self) -> Result<T, TypeMismatch> {
        T::from_value(self)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int4(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int8(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::decimal(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Utf8(Arc::from(v))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Int4(value) => Display::fmt(value, f),
            Value::Int8(value) => Display::fmt(value, f),
            Value::Bool(true) => f.write_str("true"),
            Value::Bool(false) => f.write_str("false"),
            Value::Float4(value) => Display::fmt(value, f),
            Value::Float8(value) => Display::fmt(value, f),
            Value::Decimal(value) => Display::fmt(value, f),
            Value::Utf8(value) => f.write_str(value),
        }
    }
}

/// The payload of a [`Value`] carried the wrong tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("type mismatch: expected {expected}, found {found}")]
pub struct TypeMismatch {
    pub expected: Type,
    pub found: Type,
}

/// Typed extraction from a [`Value`], used by `Value::get` and by the
/// kernels of the expression VM.
pub trait FromValue: Sized {
    /// The tag this extraction accepts.
    const TYPE: Type;

    fn from_value(value: &Value) -> Result<Self, TypeMismatch>;
}

fn mismatch<T: FromValue>(found: &Value) -> TypeMismatch {
    TypeMismatch { expected: T::TYPE, found: found.ty() }
}

impl FromValue for i32 {
    const TYPE: Type = Type::Int4;

    fn from_value(value: &Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Int4(v) => Ok(*v),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromValue for i64 {
    const TYPE: Type = Type::Int8;

    fn from_value(value: &Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Int8(v) => Ok(*v),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromValue for bool {
    const TYPE: Type = Type::Bool;

    fn from_value(value: &Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Bool(v) => Ok(*v),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromValue for f32 {
    const TYPE: Type = Type::Float4;

    fn from_value(value: &Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Float4(v) => Ok(v.0),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromValue for f64 {
    const TYPE: Type = Type::Float8;

    fn from_value(value: &Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Float8(v) => Ok(v.0),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromValue for Arc<Decimal> {
    const TYPE: Type = Type::Decimal;

    fn from_value(value: &Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Decimal(v) => Ok(Arc::clone(v)),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromValue for Arc<str> {
    const TYPE: Type = Type::Utf8;

    fn from_value(value: &Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Utf8(v) => Ok(Arc::clone(v)),
            other => Err(mismatch::<Self>(other)),
        }
    }
}
