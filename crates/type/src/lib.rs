// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

pub use decimal::Decimal;
pub use ordered_float::{OrderedF32, OrderedF64, OrderedFloatError};
pub use tuple::{BindingError, Tuple, TupleBinding, TupleIter, TupleIterator};
pub use value::{FromValue, Type, TypeMismatch, Value};

mod decimal;
pub mod ordered_float;
mod tuple;
mod value;
