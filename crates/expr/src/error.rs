// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

use opal_type::{BindingError, Type, TypeMismatch};

/// Everything that can go wrong between handing bytes to the decoder and
/// reading a result off the stack.
///
/// Null propagation is never an error: division by zero, modulo by zero
/// and unparsable numeric text all produce values, not variants of this
/// enum.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// An unrecognised opcode, a type byte with no kernel behind it, or a
    /// literal payload that does not decode.
    #[error("unknown code at offset {offset} ({remaining} bytes remaining)")]
    UnknownCode { offset: usize, remaining: usize },

    /// The input ended in the middle of a literal or before a required
    /// type byte.
    #[error("truncated literal at offset {offset}")]
    TruncatedLiteral { offset: usize },

    /// A variable operator could not read the bound tuple.
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// A malformed-but-decodable program consumed more operands than it
    /// produced. Valid encoders never trigger this.
    #[error("operand stack underflow")]
    StackUnderflow,

    /// A checked cast or checked abs refused a lossy result.
    #[error("value exceeds the limits of {0}")]
    ExceedsLimits(Type),

    /// An operand's tag contradicted the operator's type byte.
    #[error(transparent)]
    Type(#[from] TypeMismatch),
}
