// Copyright (c) opaldb.com 2025
// This file is licensed under the Apache-2.0

//! The filter contract: bind, run, keep the row iff the predicate is true.

use opal_expr::Runner;
use opal_expr::rel::FilterOp;
use opal_type::{Tuple, TupleIter, Value};

/// Builds a filter over `t0 > 10` (int4).
fn gt_ten() -> FilterOp {
    let mut runner = Runner::new();
    runner.decode(&hex::decode("3100110A9301").unwrap()).unwrap();
    FilterOp::new(runner)
}

#[test]
fn test_put_keeps_passing_rows() {
    let mut filter = gt_ten();
    assert_eq!(filter.put(vec![Value::Int4(15)]).unwrap(), Some(vec![Value::Int4(15)]));
    assert_eq!(filter.put(vec![Value::Int4(5)]).unwrap(), None);
    assert_eq!(filter.put(vec![Value::Int4(10)]).unwrap(), None);
}

#[test]
fn test_undefined_predicate_drops_the_row() {
    let mut filter = gt_ten();
    // comparing an undefined column yields unknown, and unknown is not true
    assert_eq!(filter.put(vec![Value::Undefined]).unwrap(), None);
}

#[test]
fn test_scan_collects_survivors() {
    let rows: Vec<Tuple> = vec![
        vec![Value::Int4(3)],
        vec![Value::Int4(30)],
        vec![Value::Undefined],
        vec![Value::Int4(11)],
    ];
    let stream: TupleIter = Box::new(rows.into_iter());

    let mut filter = gt_ten();
    let kept = filter.scan(stream).unwrap();
    assert_eq!(kept, vec![vec![Value::Int4(30)], vec![Value::Int4(11)]]);
}

#[test]
fn test_put_surfaces_run_errors() {
    // predicate reads t1, rows only carry one column
    let mut runner = Runner::new();
    runner.decode(&hex::decode("3101").unwrap()).unwrap();
    let mut filter = FilterOp::new(runner);
    assert!(filter.put(vec![Value::Int4(1)]).is_err());
}
