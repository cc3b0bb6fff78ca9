// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

use crate::calc::special;
use crate::{Result, Runner};
use opal_type::{Tuple, TupleIter, Type};
use tracing::trace;

/// Filters a row stream through a boolean predicate expression.
///
/// Three-valued semantics fall out of `IS_TRUE`: a predicate that
/// evaluates to the undefined value drops the row, exactly like a
/// definite `false`.
#[derive(Debug)]
pub struct FilterOp {
    filter: Runner,
}

impl FilterOp {
    /// Takes the runner holding the decoded predicate.
    pub fn new(filter: Runner) -> Self {
        FilterOp { filter }
    }

    /// Feeds one row through the predicate: the row comes back when it
    /// passes and is dropped when it does not.
    pub fn put(&mut self, tuple: Tuple) -> Result<Option<Tuple>> {
        self.filter.bind_tuple(tuple);
        self.filter.run()?;
        let keep = special::is_true(Type::Bool, &self.filter.get())?;
        trace!(keep, "filtered row");
        Ok(self.filter.take_tuple().filter(|_| keep))
    }

    /// Runs a whole stream through [`FilterOp::put`], collecting the rows
    /// that pass.
    pub fn scan(&mut self, rows: TupleIter) -> Result<Vec<Tuple>> {
        let mut kept = Vec::new();
        for row in rows {
            if let Some(tuple) = self.put(row)? {
                kept.push(tuple);
            }
        }
        Ok(kept)
    }

    /// Hands the runner back, e.g. to rebind it to another predicate.
    pub fn into_inner(self) -> Runner {
        self.filter
    }
}
