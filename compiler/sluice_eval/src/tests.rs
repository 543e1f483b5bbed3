#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use sluice_diagnostic::ErrorCode;
use sluice_ir::SharedInterner;
use sluice_resolve::{resolve, PipeChain, ScopeTable, Signature};
use sluice_value::{native_failure, type_mismatch};

use super::*;

struct Host {
    table: ScopeTable,
    calls: Arc<AtomicUsize>,
}

fn int_arg(args: &[Value], i: usize) -> Result<i64, EvalError> {
    args[i].as_int().ok_or_else(|| type_mismatch("int", &args[i]))
}

fn host() -> Host {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut table = ScopeTable::new(SharedInterner::new());
    table
        .register_function("double", Signature::piped(1), |args| {
            Ok(Value::int(int_arg(args, 0)? * 2))
        })
        .register_function("add", Signature::piped(2), |args| {
            Ok(Value::int(int_arg(args, 0)? + int_arg(args, 1)?))
        })
        .register_function("parse_int", Signature::piped(1).fallible(), |args| {
            Ok(match args[0].as_str().and_then(|s| s.parse::<i64>().ok()) {
                Some(n) => Value::ok(Value::int(n)),
                None => Value::err(args[0].clone()),
            })
        })
        .register_function("fail", Signature::piped(1).fallible(), |args| {
            Ok(Value::err(args[0].clone()))
        })
        .register_function("count", Signature::piped(1), move |args| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(args[0].clone())
        })
        .register_function("boom", Signature::new(0), |_| Err(native_failure("boom")))
        .register_method("push", Signature::new(1), |recv, args| {
            let Some(list) = recv.as_list_mut() else {
                return Err(native_failure("push on a non-list"));
            };
            list.push(args[0].clone());
            Ok(Value::int(-1))
        })
        .register_method("pop_checked", Signature::new(0).fallible(), |recv, _| {
            Ok(match recv.as_list_mut().and_then(Vec::pop) {
                Some(v) => Value::ok(v),
                None => Value::err(Value::string("empty")),
            })
        });
    table.declare_global("items");
    table.declare_global("maybe");
    Host { table, calls }
}

fn compile(table: &ScopeTable, source: &str) -> PipeChain {
    let parsed = sluice_parse::parse_source(source, table.interner())
        .unwrap_or_else(|errs| panic!("parse failed for {source:?}: {errs:?}"));
    resolve(&parsed, table).unwrap_or_else(|errs| panic!("resolve failed for {source:?}: {errs:?}"))
}

fn evaluator(table: &ScopeTable) -> Evaluator {
    Evaluator::builder(table)
        .global("items", Value::list(vec![Value::int(1)]))
        .global("maybe", Value::ok(Value::int(4)))
        .tap_handler(buffer_tap())
        .build()
}

fn run(source: &str) -> Outcome {
    let host = host();
    let chain = compile(&host.table, source);
    evaluator(&host.table).run(&chain).unwrap()
}

fn ok_int(n: i64) -> Outcome {
    Outcome::Ok(Value::int(n))
}

#[test]
fn test_transforms_thread_the_value() {
    assert_eq!(run("3 |> double |> add(1)"), ok_int(7));
}

#[test]
fn test_captures_persist_through_later_stages() {
    assert_eq!(run("5 |[a] |> double |[b] |> add(a) |> add(b)"), ok_int(25));
}

#[test]
fn test_explicit_arguments_replace_the_current_value() {
    assert_eq!(run("5 |[a] |> double |> add(a, 1)"), ok_int(6));
}

#[test]
fn test_short_circuit_skips_calls() {
    let host = host();
    let chain = compile(&host.table, "fail(1) |> count |> count");
    let outcome = evaluator(&host.table).run(&chain).unwrap();
    assert_eq!(outcome, Outcome::Err(Value::int(1)));
    assert_eq!(host.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_bang_lifted_err_skips_transforms_and_captures() {
    let host = host();
    let eval = evaluator(&host.table);

    // Only the seed call runs; both `count` stages and the capture are skipped.
    let chain = compile(
        &host.table,
        "count(Err(\"not found\")) |! |> count |[x] |> count",
    );
    assert_eq!(
        eval.run(&chain).unwrap(),
        Outcome::Err(Value::string("not found"))
    );
    assert_eq!(host.calls.load(Ordering::SeqCst), 1);

    let chain = compile(&host.table, "count(Ok(3)) |! |> count |[x] |> add(x)");
    assert_eq!(eval.run(&chain).unwrap(), ok_int(6));
    assert_eq!(host.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_handler_replaces_err_with_body_result() {
    assert_eq!(run("parse_int(\"x\") |! [e]: 0"), ok_int(0));
    assert_eq!(run("parse_int(\"21\") |! [e]: 0 |> double"), ok_int(42));
}

#[test]
fn test_handler_body_err_is_rewrapped_unless_reraised() {
    assert_eq!(
        run("parse_int(\"x\") |! [e]: Err(e)"),
        Outcome::Ok(Value::err(Value::string("x")))
    );
    assert_eq!(
        run("parse_int(\"x\") |! [e]: fail(e)"),
        Outcome::Err(Value::string("x"))
    );
}

#[test]
fn test_guard_forwards_err_to_handle() {
    assert_eq!(run("parse_int(\"x\") |! | handle [e]: 5"), ok_int(5));
    assert_eq!(run("parse_int(\"7\") |! | handle [e]: 5"), ok_int(7));
}

#[test]
fn test_captures_are_skipped_on_error_path() {
    assert_eq!(
        run("fail(3) |[lost] | handle [e]: e |> double"),
        ok_int(6)
    );
}

#[test]
fn test_match_dispatches_on_tag() {
    let src = "parse_int(\"12\") | match:\n    Ok(v): double(v)\n    Err(e): 0\n";
    assert_eq!(run(src), ok_int(24));
    let src = "parse_int(\"no\") | match:\n    Err(e): 0\n    Ok(v): double(v)\n";
    assert_eq!(run(src), ok_int(0));
}

#[test]
fn test_mutating_call_keeps_receiver() {
    let outcome = run("items |. push(2) |. push(3)");
    assert_eq!(
        outcome,
        Outcome::Ok(Value::list(vec![Value::int(1), Value::int(2), Value::int(3)]))
    );
}

#[test]
fn test_fallible_method_keeps_receiver_on_ok() {
    assert_eq!(
        run("items |. pop_checked"),
        Outcome::Ok(Value::list(vec![]))
    );
    assert_eq!(
        run("items |. pop_checked |. pop_checked"),
        Outcome::Err(Value::string("empty"))
    );
}

#[test]
fn test_outer_bindings_are_not_mutated() {
    let host = host();
    let chain = compile(&host.table, "items |. push(9)");
    let eval = evaluator(&host.table);
    let first = eval.run(&chain).unwrap();
    let second = eval.run(&chain).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        Outcome::Ok(Value::list(vec![Value::int(1), Value::int(9)]))
    );
}

#[test]
fn test_bare_bang_lifts_plain_result_values() {
    assert_eq!(run("Ok(4) |! |> double"), ok_int(8));
    assert_eq!(run("Err(4) |! |> double"), Outcome::Err(Value::int(4)));
}

#[test]
fn test_resume_after_capture_block() {
    assert_eq!(run("3 |[x]: double(x) |? |> double"), ok_int(12));
}

#[test]
fn test_capture_block_scope_ends_with_block() {
    let src = "2 |[x]:\n    x |> double |[y] |> add(y)\n|> double\n";
    assert_eq!(run(src), ok_int(16));
}

#[test]
fn test_conditional_unwrap() {
    assert_eq!(run("if maybe!? [m]: double(m) else: 0"), ok_int(8));

    let host = host();
    let chain = compile(&host.table, "if maybe!?: maybe else: 0");
    let eval = Evaluator::builder(&host.table)
        .global("maybe", Value::None)
        .build();
    assert_eq!(eval.run(&chain).unwrap(), ok_int(0));
}

#[test]
fn test_false_guard_without_else_is_none() {
    assert_eq!(run("if false: 1"), Outcome::Ok(Value::None));
}

#[test]
fn test_tap_records_without_changing_value() {
    let host = host();
    let chain = compile(&host.table, "3 |$ seen |> double |$ after(\"x\", 1)");
    let eval = evaluator(&host.table);
    assert_eq!(eval.run(&chain).unwrap(), ok_int(6));
    assert_eq!(
        eval.tap_handler().entries(),
        vec!["seen: 3".to_string(), "after(\"x\", 1): 6".to_string()]
    );
}

#[test]
fn test_evaluate_substitutes_initial_value() {
    let host = host();
    let eval = evaluator(&host.table);

    let chain = compile(&host.table, "0 |> double");
    assert_eq!(eval.evaluate(&chain, Value::int(21)).unwrap(), ok_int(42));

    // Lifted only because the seed is fallible.
    let chain = compile(&host.table, "parse_int(\"1\") |! [e]: 0");
    assert_eq!(
        eval.evaluate(&chain, Value::err(Value::int(9))).unwrap(),
        ok_int(0)
    );
    let chain = compile(&host.table, "0 |[v]");
    assert_eq!(
        eval.evaluate(&chain, Value::err(Value::int(9))).unwrap(),
        Outcome::Ok(Value::err(Value::int(9)))
    );
}

#[test]
fn test_native_failure_is_a_fault() {
    let host = host();
    let chain = compile(&host.table, "boom()");
    let err = evaluator(&host.table).run(&chain).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E3006);
    assert!(err.span.is_some());
}

#[test]
fn test_depth_limit() {
    let host = host();
    let chain = compile(&host.table, "1 |[a]:\n    a |[b]: b\n");
    let shallow = Evaluator::builder(&host.table).max_depth(1).build();
    let err = shallow.run(&chain).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E3005);

    let deep = Evaluator::builder(&host.table).build();
    assert_eq!(deep.run(&chain).unwrap(), ok_int(1));
}

#[test]
fn test_missing_outer_value_is_a_fault() {
    let host = host();
    let chain = compile(&host.table, "items");
    let bare = Evaluator::builder(&host.table).build();
    assert_eq!(bare.run(&chain).unwrap_err().code(), ErrorCode::E3001);
}

#[test]
fn test_evaluator_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Evaluator>();
}
