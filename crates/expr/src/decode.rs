// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

//! The bytecode decoder: one forward pass from bytes to operators.
//!
//! # Opcode layout
//!
//! The high nibble selects the class, the low nibble carries a type tag
//! where the class is type-parameterised:
//!
//! - `0x01..0x08`: typed null constant (`0x00` is EOE, not a null)
//! - `0x11..0x17`: positive literal of the tagged type
//! - `0x21..0x23`: negated literal (int4, int8; bool uses it for `false`)
//! - `0x31..0x38`: indexed variable, varint index payload
//! - `0x51..0x53`: NOT, AND, OR
//! - `0x81..0x87`: POS NEG ADD SUB MUL DIV MOD, one trailing type byte
//! - `0x91..0x96`: EQ GE GT LE LT NE, one trailing type byte
//! - `0xA1..0xA3`: IS_NULL IS_TRUE IS_FALSE, one trailing type byte
//! - `0xB1..0xB4`: MIN MAX ABS ABS_CHECK, one trailing type byte
//! - `0xF0`/`0xFC`: CAST / CAST_CHECK, trailing `(dst << 4) | src` byte
//! - `0xF1`: FUN, trailing function id byte
//!
//! Integer literals are unsigned LEB128 varints (the opcode class carries
//! the sign), floats are big-endian IEEE-754, and string and decimal
//! literals are varint-length-prefixed bytes.

use crate::codec::Cursor;
use crate::operator::{BinaryKind, FunKind, Operator, UnaryKind};
use crate::{Error, Result, calc};
use opal_type::{Decimal, Type, Value};
use tracing::trace;

const EOE: u8 = 0x00;

const NOT: u8 = 0x51;
const AND: u8 = 0x52;
const OR: u8 = 0x53;

const POS: u8 = 0x81;
const NEG: u8 = 0x82;
const ADD: u8 = 0x83;
const SUB: u8 = 0x84;
const MUL: u8 = 0x85;
const DIV: u8 = 0x86;
const MOD: u8 = 0x87;

const EQ: u8 = 0x91;
const GE: u8 = 0x92;
const GT: u8 = 0x93;
const LE: u8 = 0x94;
const LT: u8 = 0x95;
const NE: u8 = 0x96;

const IS_NULL: u8 = 0xA1;
const IS_TRUE: u8 = 0xA2;
const IS_FALSE: u8 = 0xA3;

const MIN: u8 = 0xB1;
const MAX: u8 = 0xB2;
const ABS: u8 = 0xB3;
const ABS_CHECK: u8 = 0xB4;

const CAST: u8 = 0xF0;
const FUN: u8 = 0xF1;
const CAST_CHECK: u8 = 0xFC;

/// What a successful decode tells the caller: how many bytes the
/// expression occupied (expressions pack back-to-back, so this is the
/// offset of the next one) and the type of the value a run will produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub consumed: usize,
    pub result_type: Option<Type>,
}

/// Decodes one expression, stopping after the EOE sentinel or at the end
/// of input.
pub fn decode(code: &[u8]) -> Result<(Vec<Operator>, Decoded)> {
    let mut cur = Cursor::new(code);
    let mut ops = Vec::new();

    while let Some(opcode) = cur.peek() {
        let at = cur.pos();
        let unknown = Error::UnknownCode { offset: at, remaining: cur.remaining() };
        cur.take_byte()?;

        if opcode == EOE {
            break;
        }
        let op = match opcode {
            0x01..=0x08 => Operator::Null(tag(opcode & 0x0F).ok_or(unknown)?),
            0x11..=0x17 => decode_const(&mut cur, opcode & 0x0F, false, unknown)?,
            0x21..=0x23 => decode_const(&mut cur, opcode & 0x0F, true, unknown)?,
            0x31..=0x38 => {
                let ty = tag(opcode & 0x0F).ok_or(unknown)?;
                let index = cur.read_varint()? as usize;
                Operator::Var(ty, index)
            }
            NOT => Operator::Not,
            AND => Operator::And,
            OR => Operator::Or,
            POS => Operator::Unary(UnaryKind::Pos, numeric(&mut cur, unknown)?),
            NEG => Operator::Unary(UnaryKind::Neg, numeric(&mut cur, unknown)?),
            ADD => Operator::Binary(BinaryKind::Add, numeric(&mut cur, unknown)?),
            SUB => Operator::Binary(BinaryKind::Sub, numeric(&mut cur, unknown)?),
            MUL => Operator::Binary(BinaryKind::Mul, numeric(&mut cur, unknown)?),
            DIV => Operator::Binary(BinaryKind::Div, numeric(&mut cur, unknown)?),
            MOD => {
                let ty = numeric(&mut cur, unknown.clone())?;
                if !matches!(ty, Type::Int4 | Type::Int8) {
                    return Err(unknown);
                }
                Operator::Binary(BinaryKind::Mod, ty)
            }
            EQ..=NE => {
                let kind = match opcode {
                    EQ => BinaryKind::Eq,
                    GE => BinaryKind::Ge,
                    GT => BinaryKind::Gt,
                    LE => BinaryKind::Le,
                    LT => BinaryKind::Lt,
                    _ => BinaryKind::Ne,
                };
                Operator::Binary(kind, any_tagged(&mut cur, unknown)?)
            }
            IS_NULL => Operator::Unary(UnaryKind::IsNull, any_tagged(&mut cur, unknown)?),
            IS_TRUE => Operator::Unary(UnaryKind::IsTrue, any_tagged(&mut cur, unknown)?),
            IS_FALSE => Operator::Unary(UnaryKind::IsFalse, any_tagged(&mut cur, unknown)?),
            MIN | MAX => {
                let ty = any_tagged(&mut cur, unknown.clone())?;
                if ty == Type::Bool {
                    return Err(unknown);
                }
                let kind = if opcode == MIN { BinaryKind::Min } else { BinaryKind::Max };
                Operator::Binary(kind, ty)
            }
            ABS => Operator::Unary(UnaryKind::Abs, numeric(&mut cur, unknown)?),
            ABS_CHECK => Operator::Unary(UnaryKind::AbsCheck, numeric(&mut cur, unknown)?),
            CAST | CAST_CHECK => {
                let b = cur.take_byte()?;
                // a same-type cast is the identity and emits nothing,
                // whatever the nibbles hold
                if b >> 4 == b & 0x0F {
                    continue;
                }
                let (Some(dst), Some(src)) = (tag(b >> 4), tag(b & 0x0F)) else {
                    return Err(unknown);
                };
                if !calc::casting::supports(dst, src) {
                    return Err(unknown);
                }
                Operator::Cast { dst, src, checked: opcode == CAST_CHECK }
            }
            FUN => {
                let id = cur.take_byte()?;
                Operator::Fun(FunKind::from_id(id).ok_or(unknown)?)
            }
            _ => return Err(unknown),
        };
        trace!(?op, offset = at, "decoded operator");
        ops.push(op);
    }

    let decoded = Decoded { consumed: cur.pos(), result_type: ops.last().map(Operator::result_type) };
    Ok((ops, decoded))
}

fn decode_const(cur: &mut Cursor, tag_byte: u8, negated: bool, unknown: Error) -> Result<Operator> {
    let value = match (tag(tag_byte).ok_or(unknown.clone())?, negated) {
        (Type::Int4, false) => Value::Int4(cur.read_varint()? as u32 as i32),
        (Type::Int4, true) => Value::Int4((cur.read_varint()? as u32 as i32).wrapping_neg()),
        (Type::Int8, false) => Value::Int8(cur.read_varint()? as i64),
        (Type::Int8, true) => Value::Int8((cur.read_varint()? as i64).wrapping_neg()),
        // booleans have no payload: the positive class is `true`, the
        // negated class is `false`
        (Type::Bool, negated) => Value::Bool(!negated),
        (Type::Float4, false) => Value::float4(cur.read_f32()?),
        (Type::Float8, false) => Value::float8(cur.read_f64()?),
        (Type::Decimal, false) => {
            let text = take_text(cur, unknown.clone())?;
            Value::decimal(Decimal::parse(&text).ok_or(unknown)?)
        }
        (Type::Utf8, false) => Value::utf8(take_text(cur, unknown)?),
        _ => return Err(unknown),
    };
    Ok(Operator::Const(value))
}

fn take_text(cur: &mut Cursor, unknown: Error) -> Result<String> {
    let len = cur.read_varint()? as usize;
    let bytes = cur.take_bytes(len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| unknown)
}

fn tag(tag_byte: u8) -> Option<Type> {
    match Type::from_tag(tag_byte) {
        Some(Type::Undefined) | None => None,
        some => some,
    }
}

/// Reads a type byte restricted to the arithmetic domain.
fn numeric(cur: &mut Cursor, unknown: Error) -> Result<Type> {
    match tag(cur.take_byte()?) {
        Some(ty @ (Type::Int4 | Type::Int8 | Type::Float4 | Type::Float8 | Type::Decimal)) => Ok(ty),
        _ => Err(unknown),
    }
}

/// Reads a type byte accepting every tagged type.
fn any_tagged(cur: &mut Cursor, unknown: Error) -> Result<Type> {
    tag(cur.take_byte()?).ok_or(unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(hex: &str) -> Vec<Operator> {
        decode(&hex::decode(hex).unwrap()).unwrap().0
    }

    #[test]
    fn test_const_classes() {
        assert_eq!(ops("1101"), vec![Operator::Const(Value::Int4(1))]);
        assert_eq!(ops("119601"), vec![Operator::Const(Value::Int4(150))]);
        assert_eq!(ops("219601"), vec![Operator::Const(Value::Int4(-150))]);
        assert_eq!(ops("13"), vec![Operator::Const(Value::Bool(true))]);
        assert_eq!(ops("23"), vec![Operator::Const(Value::Bool(false))]);
        assert_eq!(ops("1703616263"), vec![Operator::Const(Value::from("abc"))]);
        assert_eq!(
            ops("16073132332E313233"),
            vec![Operator::Const(Value::decimal(Decimal::parse("123.123").unwrap()))]
        );
    }

    #[test]
    fn test_typed_nulls_and_vars() {
        assert_eq!(ops("01"), vec![Operator::Null(Type::Int4)]);
        assert_eq!(ops("08"), vec![Operator::Null(Type::Date)]);
        assert_eq!(ops("3100"), vec![Operator::Var(Type::Int4, 0)]);
        assert_eq!(ops("3701"), vec![Operator::Var(Type::Utf8, 1)]);
    }

    #[test]
    fn test_typed_operator_tables() {
        assert_eq!(ops("8301"), vec![Operator::Binary(BinaryKind::Add, Type::Int4)]);
        assert_eq!(ops("9208"), vec![Operator::Binary(BinaryKind::Ge, Type::Date)]);
        assert_eq!(ops("A101"), vec![Operator::Unary(UnaryKind::IsNull, Type::Int4)]);
        assert_eq!(ops("B301"), vec![Operator::Unary(UnaryKind::Abs, Type::Int4)]);
        assert_eq!(ops("51"), vec![Operator::Not]);
    }

    #[test]
    fn test_mod_rejects_non_integer_types() {
        assert!(decode(&hex::decode("8705").unwrap()).is_err());
        assert!(decode(&hex::decode("8701").unwrap()).is_ok());
    }

    #[test]
    fn test_cast_byte_splits_nibbles() {
        assert_eq!(
            ops("F021"),
            vec![Operator::Cast { dst: Type::Int8, src: Type::Int4, checked: false }]
        );
        assert_eq!(
            ops("FC12"),
            vec![Operator::Cast { dst: Type::Int4, src: Type::Int8, checked: true }]
        );
    }

    #[test]
    fn test_same_type_cast_emits_nothing() {
        assert_eq!(ops("F011"), vec![]);
        assert_eq!(ops("1101F0118301").len(), 2);
    }

    #[test]
    fn test_unsupported_cast_pair_fails() {
        // float8 -> date has no kernel
        assert!(matches!(
            decode(&hex::decode("F085").unwrap()),
            Err(Error::UnknownCode { offset: 0, remaining: 2 })
        ));
    }

    #[test]
    fn test_consumed_stops_after_eoe() {
        let bytes = hex::decode("110100119601").unwrap();
        let (ops, decoded) = decode(&bytes).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(decoded.consumed, 3);
        // the next expression starts right where the first ended
        let (rest, tail) = decode(&bytes[decoded.consumed..]).unwrap();
        assert_eq!(rest, vec![Operator::Const(Value::Int4(150))]);
        assert_eq!(tail.consumed, 3);
    }

    #[test]
    fn test_consumed_without_eoe_is_input_len() {
        let bytes = hex::decode("11011101").unwrap();
        let (_, decoded) = decode(&bytes).unwrap();
        assert_eq!(decoded.consumed, 4);
    }

    #[test]
    fn test_result_type_is_final_operator() {
        let (_, decoded) = decode(&hex::decode("110111018301").unwrap()).unwrap();
        assert_eq!(decoded.result_type, Some(Type::Int4));
        let (_, decoded) = decode(&hex::decode("110111019101").unwrap()).unwrap();
        assert_eq!(decoded.result_type, Some(Type::Bool));
        let (_, decoded) = decode(&[0x00]).unwrap();
        assert_eq!(decoded.result_type, None);
    }

    #[test]
    fn test_unknown_opcode_reports_offset() {
        assert_eq!(
            decode(&hex::decode("110160").unwrap()),
            Err(Error::UnknownCode { offset: 2, remaining: 1 })
        );
    }

    #[test]
    fn test_truncated_literal() {
        assert_eq!(decode(&hex::decode("1196").unwrap()), Err(Error::TruncatedLiteral { offset: 2 }));
        assert_eq!(
            decode(&hex::decode("15400921FB").unwrap()),
            Err(Error::TruncatedLiteral { offset: 1 })
        );
        assert_eq!(decode(&hex::decode("83").unwrap()), Err(Error::TruncatedLiteral { offset: 1 }));
    }

    #[test]
    fn test_fun_ids_bounded() {
        assert_eq!(ops("F100"), vec![Operator::Fun(FunKind::Concat)]);
        assert_eq!(ops("F10B"), vec![Operator::Fun(FunKind::Mid3)]);
        assert!(decode(&hex::decode("F10C").unwrap()).is_err());
    }
}
