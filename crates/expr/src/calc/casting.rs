// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

//! The conversion kernels behind `CAST` and `CAST_CHECK`.
//!
//! The unchecked flavor never fails: overflow wraps or saturates, and
//! numeric text that does not parse becomes 0 with no error signal (a
//! compatibility quirk the wire format's encoders rely on). The checked
//! flavor reports `ExceedsLimits` instead of accepting a lossy result,
//! but string parsing stays quirk-compatible even there.

use crate::{Error, Result};
use opal_type::{Decimal, Type, Value};
use std::sync::Arc;

/// Whether a `(dst, src)` pair has a conversion kernel. Same-type pairs
/// never reach this: the decoder elides them.
pub fn supports(dst: Type, src: Type) -> bool {
    matches!(
        (dst, src),
        (
            Type::Int4,
            Type::Int8 | Type::Bool | Type::Float4 | Type::Float8 | Type::Decimal | Type::Utf8
        ) | (
            Type::Int8,
            Type::Int4
                | Type::Bool
                | Type::Float4
                | Type::Float8
                | Type::Decimal
                | Type::Utf8
                | Type::Date
        ) | (Type::Bool, Type::Int4 | Type::Int8 | Type::Float4 | Type::Float8)
            | (
                Type::Float4,
                Type::Int4 | Type::Int8 | Type::Bool | Type::Float8 | Type::Decimal | Type::Utf8
            )
            | (
                Type::Float8,
                Type::Int4 | Type::Int8 | Type::Bool | Type::Float4 | Type::Decimal | Type::Utf8
            )
            | (
                Type::Decimal,
                Type::Int4 | Type::Int8 | Type::Bool | Type::Float4 | Type::Float8 | Type::Utf8
            )
            | (
                Type::Utf8,
                Type::Int4
                    | Type::Int8
                    | Type::Bool
                    | Type::Float4
                    | Type::Float8
                    | Type::Decimal
                    | Type::Date
            )
            | (Type::Date, Type::Int4 | Type::Int8 | Type::Utf8)
    )
}

pub fn cast(dst: Type, src: Type, v: &Value, checked: bool) -> Result<Value> {
    if v.is_undefined() {
        return Ok(Value::Undefined);
    }
    match dst {
        Type::Int4 => to_int4(src, v, checked),
        Type::Int8 => to_int8(src, v, checked),
        Type::Bool => to_bool(src, v),
        Type::Float4 => to_float4(src, v),
        Type::Float8 => to_float8(src, v),
        Type::Decimal => to_decimal(src, v),
        Type::Utf8 => to_utf8(src, v),
        Type::Date => to_date(src, v),
        Type::Undefined => unimplemented!("cast to UNDEFINED"),
    }
}

fn to_int4(src: Type, v: &Value, checked: bool) -> Result<Value> {
    Ok(Value::Int4(match src {
        Type::Int8 => {
            let x = v.get::<i64>()?;
            if checked {
                i32::try_from(x).map_err(|_| Error::ExceedsLimits(Type::Int4))?
            } else {
                x as i32
            }
        }
        Type::Bool => v.get::<bool>()? as i32,
        Type::Float4 => round_to_i32(v.get::<f32>()? as f64, checked)?,
        Type::Float8 => round_to_i32(v.get::<f64>()?, checked)?,
        Type::Decimal => {
            let d = v.get::<Arc<Decimal>>()?;
            if checked {
                d.to_i32().ok_or(Error::ExceedsLimits(Type::Int4))?
            } else {
                d.to_i32().unwrap_or_else(|| d.to_f64().unwrap_or(0.0) as i32)
            }
        }
        Type::Utf8 => parse_int(&v.get::<Arc<str>>()?) as i32,
        other => unimplemented!("cast {other} to INT4"),
    }))
}

fn to_int8(src: Type, v: &Value, checked: bool) -> Result<Value> {
    Ok(Value::Int8(match src {
        Type::Int4 => v.get::<i32>()? as i64,
        Type::Bool => v.get::<bool>()? as i64,
        Type::Float4 => round_to_i64(v.get::<f32>()? as f64, checked)?,
        Type::Float8 => round_to_i64(v.get::<f64>()?, checked)?,
        Type::Decimal => {
            let d = v.get::<Arc<Decimal>>()?;
            if checked {
                d.to_i64().ok_or(Error::ExceedsLimits(Type::Int8))?
            } else {
                d.to_i64().unwrap_or_else(|| d.to_f64().unwrap_or(0.0) as i64)
            }
        }
        Type::Utf8 => parse_int(&v.get::<Arc<str>>()?),
        // a date already is its epoch-milli representation
        Type::Date => v.get::<i64>()?,
        other => unimplemented!("cast {other} to INT8"),
    }))
}

fn to_bool(src: Type, v: &Value) -> Result<Value> {
    Ok(Value::Bool(match src {
        Type::Int4 => v.get::<i32>()? != 0,
        Type::Int8 => v.get::<i64>()? != 0,
        Type::Float4 => v.get::<f32>()? != 0.0,
        Type::Float8 => v.get::<f64>()? != 0.0,
        other => unimplemented!("cast {other} to BOOL"),
    }))
}

fn to_float4(src: Type, v: &Value) -> Result<Value> {
    Ok(Value::float4(match src {
        Type::Int4 => v.get::<i32>()? as f32,
        Type::Int8 => v.get::<i64>()? as f32,
        Type::Bool => v.get::<bool>()? as i32 as f32,
        Type::Float8 => v.get::<f64>()? as f32,
        Type::Decimal => v.get::<Arc<Decimal>>()?.to_f64().unwrap_or(0.0) as f32,
        Type::Utf8 => parse_float(&v.get::<Arc<str>>()?) as f32,
        other => unimplemented!("cast {other} to FLOAT4"),
    }))
}

fn to_float8(src: Type, v: &Value) -> Result<Value> {
    Ok(Value::float8(match src {
        Type::Int4 => v.get::<i32>()? as f64,
        Type::Int8 => v.get::<i64>()? as f64,
        Type::Bool => v.get::<bool>()? as i32 as f64,
        Type::Float4 => v.get::<f32>()? as f64,
        Type::Decimal => v.get::<Arc<Decimal>>()?.to_f64().unwrap_or(0.0),
        Type::Utf8 => parse_float(&v.get::<Arc<str>>()?),
        other => unimplemented!("cast {other} to FLOAT8"),
    }))
}

fn to_decimal(src: Type, v: &Value) -> Result<Value> {
    Ok(match src {
        Type::Int4 => Value::decimal(v.get::<i32>()?.into()),
        Type::Int8 => Value::decimal(v.get::<i64>()?.into()),
        Type::Bool => Value::decimal((v.get::<bool>()? as i32).into()),
        // infinities have no decimal form
        Type::Float4 => Decimal::from_f64(v.get::<f32>()? as f64)
            .map(Value::decimal)
            .unwrap_or(Value::Undefined),
        Type::Float8 => Decimal::from_f64(v.get::<f64>()?)
            .map(Value::decimal)
            .unwrap_or(Value::Undefined),
        Type::Utf8 => Value::decimal(
            Decimal::parse(v.get::<Arc<str>>()?.trim()).unwrap_or_else(Decimal::zero),
        ),
        other => unimplemented!("cast {other} to DECIMAL"),
    })
}

fn to_utf8(src: Type, v: &Value) -> Result<Value> {
    Ok(Value::from(match src {
        Type::Int4 => v.get::<i32>()?.to_string(),
        Type::Int8 => v.get::<i64>()?.to_string(),
        Type::Bool => if v.get::<bool>()? { "true".to_string() } else { "false".to_string() },
        Type::Float4 => format_f32(v.get::<f32>()?),
        Type::Float8 => format_f64(v.get::<f64>()?),
        Type::Decimal => v.get::<Arc<Decimal>>()?.to_string(),
        Type::Date => format_date(v.get::<i64>()?),
        other => unimplemented!("cast {other} to UTF8"),
    }))
}

fn to_date(src: Type, v: &Value) -> Result<Value> {
    Ok(match src {
        // integer date literals arrive in seconds
        Type::Int4 => Value::Int8(v.get::<i32>()? as i64 * 1000),
        Type::Int8 => Value::Int8(v.get::<i64>()?.wrapping_mul(1000)),
        Type::Utf8 => match parse_date(&v.get::<Arc<str>>()?) {
            Some(millis) => Value::Int8(millis),
            None => Value::Undefined,
        },
        other => unimplemented!("cast {other} to DATE"),
    })
}

/// Rounds half away from zero, saturating at the `i32` range. The checked
/// flavor refuses anything the result cannot get within 0.5 of, which in
/// practice means out-of-range input.
fn round_to_i32(x: f64, checked: bool) -> Result<i32> {
    let rounded = x.round() as i32;
    if checked && !((rounded as f64 - x).abs() <= 0.5) {
        return Err(Error::ExceedsLimits(Type::Int4));
    }
    Ok(rounded)
}

fn round_to_i64(x: f64, checked: bool) -> Result<i64> {
    let rounded = x.round() as i64;
    if checked && !((rounded as f64 - x).abs() <= 0.5) {
        return Err(Error::ExceedsLimits(Type::Int8));
    }
    Ok(rounded)
}

/// `stoi`-style integer parse: leading ASCII whitespace, an optional
/// sign, then the longest run of digits. Anything else contributes 0.
fn parse_int(text: &str) -> i64 {
    let t = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, digits) = match t.as_bytes().first() {
        Some(&b'-') => (true, &t[1..]),
        Some(&b'+') => (false, &t[1..]),
        _ => (false, t),
    };
    let mut value = 0i64;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.wrapping_mul(10).wrapping_add((b - b'0') as i64);
    }
    if negative { value.wrapping_neg() } else { value }
}

/// `stof`-style float parse: the longest prefix shaped like a decimal
/// number with an optional exponent; no valid prefix parses as 0.
fn parse_float(text: &str) -> f64 {
    let t = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
    t[..float_prefix_len(t)].parse().unwrap_or(0.0)
}

fn float_prefix_len(t: &str) -> usize {
    let b = t.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(&b'+') | Some(&b'-')) {
        i += 1;
    }
    let mut digits = 0;
    while b.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
        digits += 1;
    }
    if b.get(i) == Some(&b'.') {
        i += 1;
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return 0;
    }
    if matches!(b.get(i), Some(&b'e') | Some(&b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(&b'+') | Some(&b'-')) {
            j += 1;
        }
        if b.get(j).is_some_and(u8::is_ascii_digit) {
            while b.get(j).is_some_and(u8::is_ascii_digit) {
                j += 1;
            }
            i = j;
        }
    }
    i
}

/// Fixed-point with 6 fractional digits, trailing zeros stripped down to
/// one digit after the point. Six digits keep every decimal a 4-byte
/// float can distinguish.
pub(crate) fn format_f32(v: f32) -> String {
    strip_zeros(format!("{v:.6}"))
}

/// Fixed-point with 15 fractional digits, same stripping rule.
pub(crate) fn format_f64(v: f64) -> String {
    strip_zeros(format!("{v:.15}"))
}

fn strip_zeros(mut s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.truncate(s.trim_end_matches('0').len());
    if s.ends_with('.') {
        s.push('0');
    }
    s
}

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Parses `YYYY-MM-DD` to milliseconds at UTC midnight.
fn parse_date(text: &str) -> Option<i64> {
    let t = text.trim();
    let mut parts = t.splitn(3, '-');
    let year: i64 = parts.next()?.parse().ok()?;
    let month: u8 = parts.next()?.parse().ok()?;
    let day: u8 = parts.next()?.parse().ok()?;
    if !(0..=9999).contains(&year) || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some(days_from_civil(year, month as i64, day as i64) * MILLIS_PER_DAY)
}

fn format_date(millis: i64) -> String {
    let (year, month, day) = civil_from_days(millis.div_euclid(MILLIS_PER_DAY));
    format!("{year:04}-{month:02}-{day:02}")
}

// Proleptic-Gregorian day arithmetic over 400-year eras.

fn days_from_civil(mut year: i64, month: i64, day: i64) -> i64 {
    year -= (month <= 2) as i64;
    let era = if year >= 0 { year } else { year - 399 } / 400;
    let yoe = year - era * 400;
    let mp = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    (yoe + era * 400 + (month <= 2) as i64, month, day)
}
