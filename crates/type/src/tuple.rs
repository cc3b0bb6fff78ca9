// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

//! Input rows and the slot an evaluation reads them through.
//!
//! A tuple is bound by value: the evaluator owns the row while it runs
//! and hands it back afterwards, so a filter can return the very row it
//! kept without copying it. Values inside a row share their text and
//! decimal payloads, which keeps the move-in/move-out cheap.

use crate::Value;
use dyn_clone::DynClone;

/// One input row: an ordered sequence of values, indexed from 0.
pub type Tuple = Vec<Value>;

/// A boxed tuple iterator.
pub type TupleIter = Box<dyn TupleIterator>;

/// A tuple iterator trait, which requires the iterator to be clonable and
/// object-safe. Cloning enables resetting a stream back to an initial state.
pub trait TupleIterator: Iterator<Item = Tuple> + DynClone {}

dyn_clone::clone_trait_object!(TupleIterator);

impl<I: Iterator<Item = Tuple> + DynClone> TupleIterator for I {}

/// A variable read with no tuple to read from, or one pointing past the
/// end of the bound tuple. Neither is detectable before evaluation: the
/// bytecode does not carry the row width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("variable {index} read without a bound tuple")]
    Unbound { index: usize },

    #[error("variable {index} out of range for a tuple of {len} values")]
    OutOfRange { index: usize, len: usize },
}

/// The slot variable reads go through during evaluation.
///
/// At most one tuple is bound at a time; binding another releases the
/// previous one. The tuple is immutable while bound, and taking it back
/// leaves the slot empty.
#[derive(Debug, Default)]
pub struct TupleBinding {
    tuple: Option<Tuple>,
}

impl TupleBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a row, replacing whatever was bound before.
    pub fn bind(&mut self, tuple: Tuple) {
        self.tuple = Some(tuple);
    }

    /// Releases the bound row to the caller, leaving the slot empty.
    pub fn take(&mut self) -> Option<Tuple> {
        self.tuple.take()
    }

    /// Reads the bound row at `index`.
    pub fn get(&self, index: usize) -> Result<&Value, BindingError> {
        let tuple = self.tuple.as_ref().ok_or(BindingError::Unbound { index })?;
        tuple.get(index).ok_or(BindingError::OutOfRange { index, len: tuple.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_requires_a_binding() {
        let mut binding = TupleBinding::new();
        assert_eq!(binding.get(0), Err(BindingError::Unbound { index: 0 }));

        binding.bind(vec![Value::Int4(1), Value::Bool(true)]);
        assert_eq!(binding.get(0), Ok(&Value::Int4(1)));
        assert_eq!(binding.get(1), Ok(&Value::Bool(true)));
        assert_eq!(binding.get(2), Err(BindingError::OutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_take_empties_the_slot() {
        let mut binding = TupleBinding::new();
        binding.bind(vec![Value::from("row")]);
        assert_eq!(binding.take(), Some(vec![Value::from("row")]));
        assert_eq!(binding.take(), None);
        assert_eq!(binding.get(0), Err(BindingError::Unbound { index: 0 }));
    }

    #[test]
    fn test_rebinding_replaces_the_row() {
        let mut binding = TupleBinding::new();
        binding.bind(vec![Value::Int4(1)]);
        binding.bind(vec![Value::Int4(2)]);
        assert_eq!(binding.get(0), Ok(&Value::Int4(2)));
        assert_eq!(binding.take(), Some(vec![Value::Int4(2)]));
    }

    #[test]
    fn test_taking_shares_payloads_with_reads() {
        // a value read out of the binding aliases the row's payload, so
        // cloning it and then taking the row copies no text
        let mut binding = TupleBinding::new();
        binding.bind(vec![Value::from("shared")]);
        let read = binding.get(0).unwrap().clone();
        let row = binding.take().unwrap();
        let (Value::Utf8(a), Value::Utf8(b)) = (&read, &row[0]) else { panic!() };
        assert!(std::sync::Arc::ptr_eq(a, b));
    }
}
