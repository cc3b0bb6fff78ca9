// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

use crate::decode::{Decoded, decode};
use crate::operator::Operator;
use crate::stack::OperandStack;
use crate::{Error, Result};
use opal_type::{FromValue, Tuple, Type, Value};
use tracing::{debug, instrument};

/// A decoded expression program coupled with its operand stack.
///
/// The lifecycle is decode once, then per row: bind a tuple, run, read
/// the result. A runner mutates its stack on every operator, so one
/// runner belongs to one thread; distinct runners evaluate the same
/// bytecode concurrently without sharing anything mutable.
#[derive(Debug, Default)]
pub struct Runner {
    ops: Vec<Operator>,
    stack: OperandStack,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an expression, replacing (and releasing) any program this
    /// runner held before.
    #[instrument(name = "expr::decode", level = "trace", skip_all, fields(len = code.len()))]
    pub fn decode(&mut self, code: &[u8]) -> Result<Decoded> {
        self.reset();
        let (ops, decoded) = decode(code)?;
        debug!(operators = ops.len(), consumed = decoded.consumed, "decoded expression");
        self.ops = ops;
        Ok(decoded)
    }

    /// Binds the tuple the next run reads variables from. The runner owns
    /// it until [`Runner::take_tuple`] or the next bind.
    pub fn bind_tuple(&mut self, tuple: Tuple) {
        self.stack.bind_tuple(tuple);
    }

    pub fn take_tuple(&mut self) -> Option<Tuple> {
        self.stack.take_tuple()
    }

    /// Evaluates the program: clears the stack, executes every operator
    /// in decoded order, and leaves the result on top.
    #[instrument(name = "expr::run", level = "trace", skip_all)]
    pub fn run(&mut self) -> Result<()> {
        self.stack.clear();
        for op in &self.ops {
            op.execute(&mut self.stack)?;
        }
        if self.stack.is_empty() {
            return Err(Error::StackUnderflow);
        }
        Ok(())
    }

    /// The result of the last run.
    pub fn get(&self) -> Value {
        self.stack.top().cloned().unwrap_or(Value::Undefined)
    }

    /// The result narrowed to `T`: `Ok(None)` when it is undefined, an
    /// error when `T` is not the result's type.
    pub fn get_typed<T: FromValue>(&self) -> Result<Option<T>> {
        match self.stack.top() {
            None | Some(Value::Undefined) => Ok(None),
            Some(value) => Ok(Some(value.get::<T>()?)),
        }
    }

    /// The type the program produces, read off the final operator; the
    /// caller can pick a typed getter without inspecting the stack.
    pub fn result_type(&self) -> Option<Type> {
        self.ops.last().map(Operator::result_type)
    }

    /// Drops the program, the stack contents and any bound tuple.
    pub fn reset(&mut self) {
        self.ops.clear();
        self.stack = OperandStack::new();
    }
}
