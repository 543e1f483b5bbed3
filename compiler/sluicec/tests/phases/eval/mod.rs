//! Resolution and evaluation of complete chains.

use pretty_assertions::assert_eq;
use sluicec::{Outcome, Value};

use crate::common::{codes, Host};

fn chars(s: &str) -> Value {
    Value::list(s.chars().map(|c| Value::string(c.to_string())).collect())
}

// Short-circuit

#[test]
fn err_skips_every_later_call() {
    let host = Host::new();
    let outcome = host.run("load(path) |> parse |> size |> describe", "missing");
    assert_eq!(outcome, Outcome::Err(Value::string("not found")));
    assert_eq!(host.take_calls(), vec!["load"]);
}

#[test]
fn err_jumps_over_captures_to_the_handler() {
    let host = Host::new();
    let src = "load(path) |[raw] |! | handle [e]: describe(e) |> size";
    let outcome = host.run(src, "missing");
    // `size` of a string is 0: the handler's output continues the chain.
    assert_eq!(outcome, Outcome::Ok(Value::int(0)));
    assert_eq!(host.take_calls(), vec!["load", "describe", "size"]);
}

#[test]
fn ok_path_runs_every_stage_once() {
    let host = Host::new();
    let outcome = host.run("load(path) |! |> parse |> size", "ab");
    assert_eq!(outcome, Outcome::Ok(Value::int(4)));
    assert_eq!(host.take_calls(), vec!["load", "parse", "size"]);
}

// Capture persistence

#[test]
fn captures_stay_visible_for_the_rest_of_the_chain() {
    let host = Host::new();
    let src = "load(path) |! |[raw] |> parse |[letters] |> size |> combine(raw, letters)";
    assert_eq!(
        host.run(src, "ab"),
        Outcome::Ok(Value::list(vec![Value::string("<ab>"), chars("<ab>")]))
    );
}

#[test]
fn captures_are_visible_inside_nested_bodies() {
    let host = Host::new();
    let src = "load(path) |! |[raw] |> parse |[letters]: combine(raw, letters)";
    assert_eq!(
        host.run(src, "ab"),
        Outcome::Ok(Value::list(vec![Value::string("<ab>"), chars("<ab>")]))
    );
}

#[test]
fn capture_skipped_by_an_error_cannot_be_read_later() {
    let host = Host::new();
    let err = host.compile_err("load(path) |[raw] |! [e]: e |> combine(raw, 1)");
    assert_eq!(codes(&err), vec!["E2004"]);
}

// Mutating-call transparency

#[test]
fn method_return_value_is_discarded() {
    let host = Host::new();
    let outcome = host.run("load(path) |! |> parse |. append(\"!\") |> size", "ab");
    assert_eq!(outcome, Outcome::Ok(Value::int(5)));
    assert_eq!(host.take_calls(), vec!["load", "parse", "append", "size"]);
}

#[test]
fn fallible_method_keeps_the_value_on_ok() {
    let host = Host::new();
    assert_eq!(
        host.run("\"x\" |> parse |. require_nonempty", "unused"),
        Outcome::Ok(chars("x"))
    );
    assert_eq!(
        host.run("\"\" |> parse |. require_nonempty | handle [e]: e", "unused"),
        Outcome::Ok(Value::string("empty"))
    );
}

// Handler re-wrap

#[test]
fn handler_output_is_ok() {
    let host = Host::new();
    assert_eq!(
        host.run("load(path) |! [e]: describe(e)", "missing"),
        Outcome::Ok(Value::string("seen \"not found\""))
    );
}

#[test]
fn handler_body_err_is_data_unless_it_reraises() {
    let host = Host::new();
    assert_eq!(
        host.run("load(path) |! [e]: Err(e)", "missing"),
        Outcome::Ok(Value::err(Value::string("not found")))
    );
    assert_eq!(
        host.run("load(path) |! [e]: load(\"missing\")", "missing"),
        Outcome::Err(Value::string("not found"))
    );
}

#[test]
fn match_arms_bind_the_payload() {
    let host = Host::new();
    let src = "\
load(path) | match:
    Ok(text):
        text |> parse |> size
    Err(e): describe(e)
";
    assert_eq!(host.run(src, "abc"), Outcome::Ok(Value::int(5)));
    assert_eq!(
        host.run(src, "missing"),
        Outcome::Ok(Value::string("seen \"not found\""))
    );
}

// Match exhaustiveness

#[test]
fn incomplete_match_is_rejected_before_running() {
    let host = Host::new();
    let err = host.compile_err("load(path) | match:\n    Ok(v): v\n");
    assert_eq!(codes(&err), vec!["E2008"]);
    assert!(host.take_calls().is_empty());

    let err = host.compile_err("load(path) | match:\n    Err(a): a\n    Err(b): b\n");
    assert_eq!(codes(&err), vec!["E2009", "E2008"]);
}

#[test]
fn handler_needs_an_error_source() {
    let host = Host::new();
    let err = host.compile_err("path |> parse | handle [e]: e");
    assert_eq!(codes(&err), vec!["E2007"]);
}

// Idempotent reuse

#[test]
fn one_plan_many_runs() {
    let host = Host::new();
    let chain = host.compile("load(path) |! |[raw] |> parse |> size |> combine(raw, 0)");

    let eval = host.evaluator("ab");
    let first = eval.run(&chain).unwrap();
    let second = eval.run(&chain).unwrap();
    assert_eq!(first, second);

    let other = host.evaluator("xyz").run(&chain).unwrap();
    assert_eq!(
        other,
        Outcome::Ok(Value::list(vec![Value::string("<xyz>"), Value::int(0)]))
    );
    assert_eq!(
        eval.run(&chain).unwrap(),
        first,
        "no bindings leak between runs"
    );
}

#[test]
fn one_plan_across_threads() {
    let host = Host::new();
    let chain = host.compile("load(path) |! |> parse |> size");
    let eval = host.evaluator("abcd");

    let results: Vec<Outcome> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| eval.run(&chain).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(results.iter().all(|r| *r == Outcome::Ok(Value::int(6))));
}

#[test]
fn evaluate_reuses_a_plan_with_new_inputs() {
    let host = Host::new();
    let chain = host.compile("load(path) |! [e]: \"fallback\" |> parse |> size");
    let eval = host.evaluator("unused");

    assert_eq!(
        eval.evaluate(&chain, Value::ok(Value::string("abc"))).unwrap(),
        Outcome::Ok(Value::int(3))
    );
    assert_eq!(
        eval.evaluate(&chain, Value::err(Value::string("gone"))).unwrap(),
        Outcome::Ok(Value::int(8))
    );
    assert_eq!(host.take_calls(), vec!["parse", "size", "parse", "size"]);
}

// Taps

#[test]
fn taps_observe_without_changing_the_value() {
    let host = Host::new();
    let chain = host.compile("load(path) |! |$ loaded |> parse |> size |$ counted(\"letters\")");
    let eval = host.evaluator("ab");
    assert_eq!(eval.run(&chain).unwrap(), Outcome::Ok(Value::int(4)));
    assert_eq!(
        eval.tap_handler().entries(),
        vec![
            "loaded: \"<ab>\"".to_string(),
            "counted(\"letters\"): 4".to_string()
        ]
    );
}

// Faults

#[test]
fn native_failure_is_a_fault_not_an_err() {
    let host = Host::new();
    let chain = host.compile("load(1)");
    let fault = host.evaluator("unused").run(&chain).unwrap_err();
    assert_eq!(fault.code().as_str(), "E3006");
    let rendered = sluicec::RunError::from(fault).render("load(1)");
    assert!(rendered.contains("load expects a path"));
}
