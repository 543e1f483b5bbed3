//! Lexer and stage parser behavior seen through `compile`.

use pretty_assertions::assert_eq;
use sluicec::{CompileError, Outcome, Value};

use crate::common::{codes, Host};

#[test]
fn multi_line_chain_with_block_handler() {
    let host = Host::new();
    let src = "\
load(path)
    |! [e]:
        describe(e)
    |> describe
";
    assert_eq!(
        host.run(src, "missing"),
        Outcome::Ok(Value::string("seen \"seen \"not found\"\""))
    );
}

#[test]
fn handler_may_sit_on_an_indented_line() {
    let host = Host::new();
    let src = "load(path) |!\n    [e]: describe(e)\n";
    assert_eq!(
        host.run(src, "missing"),
        Outcome::Ok(Value::string("seen \"not found\""))
    );
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let host = Host::new();
    let src = "// read it\nload(path) // fallible\n\n    |! |> parse |> size\n";
    assert_eq!(host.run(src, "ab"), Outcome::Ok(Value::int(4)));
}

#[test]
fn block_indentation_errors() {
    let host = Host::new();
    assert_eq!(
        codes(&host.compile_err("load(path) |!\n[e]: describe(e)\n")),
        vec!["E1004"]
    );
    assert_eq!(
        codes(&host.compile_err("path |[x]:\ndescribe(x)\n")),
        vec!["E1004"]
    );
    assert_eq!(codes(&host.compile_err("path |[x]:")), vec!["E1005"]);
}

#[test]
fn operator_errors() {
    let host = Host::new();
    assert_eq!(codes(&host.compile_err("path | frobnicate")), vec!["E1003"]);
    assert_eq!(codes(&host.compile_err("path!? |> describe")), vec!["E1006"]);
    assert_eq!(
        codes(&host.compile_err("if load(path)!?: path")),
        vec!["E1007"]
    );
}

#[test]
fn every_lex_error_is_reported() {
    let host = Host::new();
    let err = host.compile_err("path |> describe & ^");
    assert!(matches!(err, CompileError::Syntax(_)));
    assert_eq!(codes(&err), vec!["E0002", "E0002"]);
}

#[test]
fn inconsistent_dedent() {
    let host = Host::new();
    let err = host.compile_err("path\n        |> describe\n    |> describe\n");
    assert_eq!(codes(&err), vec!["E0004"]);
}

#[test]
fn syntax_errors_render_with_context() {
    let host = Host::new();
    let src = "load(path) | match:\n    Ok(v) v\n";
    let rendered = host.compile_err(src).render(src);
    assert!(rendered.contains("E1001"));
    assert!(rendered.contains("while parsing a match arm"));
}
