// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

//! Calculation kernels: pure functions the operators delegate to.
//!
//! Unless a kernel documents otherwise, an undefined input short-circuits
//! to the undefined value before any computation happens.

pub mod arithmetic;
pub mod casting;
pub mod logical;
pub mod mathematic;
pub mod relational;
pub mod special;
pub mod string_fun;
