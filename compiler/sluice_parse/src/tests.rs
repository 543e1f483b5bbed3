#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use sluice_diagnostic::ErrorCode;
use sluice_ir::{Condition, ExprKind, ResultTag, StageKind, TokenKind};

fn parse_ok(source: &str) -> (ParsedChain, StringInterner) {
    let interner = StringInterner::new();
    let chain = parse_source(source, &interner)
        .unwrap_or_else(|errs| panic!("parse failed for {source:?}: {errs:?}"));
    (chain, interner)
}

fn parse_err(source: &str) -> ParseError {
    let interner = StringInterner::new();
    let mut errs = parse_source(source, &interner).expect_err("expected a parse error");
    errs.remove(0)
}

fn ops(chain: &ParsedChain) -> Vec<&'static str> {
    chain.stages.iter().map(|s| s.kind.operator()).collect()
}

#[test]
fn test_single_line_chain() {
    let (chain, interner) = parse_ok("load(path) |> parse |. validate(strict) |! |[doc]");
    assert_eq!(ops(&chain), vec!["|>", "|.", "|!", "|[..]"]);

    let ExprKind::Call { func, args } = &chain.seed.kind else {
        panic!("expected call seed");
    };
    assert_eq!(interner.lookup(*func), "load");
    assert_eq!(args.len(), 1);

    let StageKind::MethodCall(target) = &chain.stages[1].kind else {
        panic!("expected method call");
    };
    assert_eq!(interner.lookup(target.name), "validate");
    assert_eq!(target.args.len(), 1);
}

#[test]
fn test_multiline_continuation() {
    let src = "load(p)\n    |> parse\n    |! [e]: fallback(e)\n    |> save\n";
    let (chain, _) = parse_ok(src);
    assert_eq!(ops(&chain), vec!["|>", "|!", "|>"]);

    let StageKind::Bang { handler: Some(h) } = &chain.stages[1].kind else {
        panic!("expected handler");
    };
    assert!(h.body.inline);
}

#[test]
fn test_same_column_continuation() {
    let (chain, _) = parse_ok("a\n|> f\n|> g\n");
    assert_eq!(ops(&chain), vec!["|>", "|>"]);
}

#[test]
fn test_nested_continuation_levels() {
    let (chain, _) = parse_ok("a\n    |> b\n        |> c\n    |> d\n");
    assert_eq!(ops(&chain), vec!["|>", "|>", "|>"]);
}

#[test]
fn test_capture_block_body_is_nested_chain() {
    let src = "fetch(id)\n    |[user]:\n        lookup(user)\n            |> render\n    |?\n    |> send\n";
    let (chain, _) = parse_ok(src);
    assert_eq!(ops(&chain), vec!["|[..]", "|?", "|>"]);

    let StageKind::Capture {
        block: Some(body), ..
    } = &chain.stages[0].kind
    else {
        panic!("expected capture block");
    };
    assert!(!body.inline);
    assert_eq!(body.chain.stages.len(), 1);
}

#[test]
fn test_indented_handler_under_bang() {
    let src = "read(f) |!\n    [e]:\n        log(e)\n            |> default\n";
    let (chain, _) = parse_ok(src);
    let StageKind::Bang { handler: Some(h) } = &chain.stages[0].kind else {
        panic!("expected handler");
    };
    assert!(!h.body.inline);
    assert_eq!(h.body.chain.stages.len(), 1);
}

#[test]
fn test_match_block() {
    let src = "load(p) | match:\n    Ok(v): use_it(v)\n    Err(e):\n        report(e)\n|> done\n";
    let (chain, _) = parse_ok(src);
    assert_eq!(ops(&chain), vec!["| match", "|>"]);

    let StageKind::Match { arms } = &chain.stages[0].kind else {
        panic!("expected match");
    };
    let tags: Vec<_> = arms.iter().map(|a| a.tag).collect();
    assert_eq!(tags, vec![ResultTag::Ok, ResultTag::Err]);
    assert!(arms[0].body.inline);
    assert!(!arms[1].body.inline);
}

#[test]
fn test_handle_and_tap() {
    let (chain, interner) = parse_ok("load(p) |! | handle [e]: none |$ trace(\"after\")");
    assert_eq!(ops(&chain), vec!["|!", "| handle", "|$"]);
    let StageKind::Tap(target) = &chain.stages[2].kind else {
        panic!("expected tap");
    };
    assert_eq!(interner.lookup(target.name), "trace");
}

#[test]
fn test_conditional_unwrap_rebinds_identifier() {
    let (chain, interner) = parse_ok("if cfg!?: cfg else: none");
    let ExprKind::If {
        cond, else_branch, ..
    } = &chain.seed.kind
    else {
        panic!("expected if");
    };
    let Condition::Unwrap { binding, .. } = cond.as_ref() else {
        panic!("expected unwrap guard");
    };
    assert_eq!(interner.lookup(*binding), "cfg");
    assert!(else_branch.is_some());
}

#[test]
fn test_conditional_unwrap_with_binding_and_block_branches() {
    let src = "if find(k)!? [hit]:\n    hit |> show\nelse:\n    miss(k)\n";
    let (chain, interner) = parse_ok(src);
    let ExprKind::If {
        cond,
        then_branch,
        else_branch,
    } = &chain.seed.kind
    else {
        panic!("expected if");
    };
    let Condition::Unwrap { binding, .. } = cond.as_ref() else {
        panic!("expected unwrap guard");
    };
    assert_eq!(interner.lookup(*binding), "hit");
    assert_eq!(then_branch.chain.stages.len(), 1);
    assert!(!else_branch.as_ref().unwrap().inline);
}

#[test]
fn test_spans_cover_stage() {
    let src = "x |> scale(2)";
    let (chain, _) = parse_ok(src);
    assert_eq!(&src[chain.stages[0].span.to_range()], "|> scale(2)");
    assert_eq!(&src[chain.span.to_range()], src);
}

#[test]
fn test_unindented_block_body() {
    let err = parse_err("x |[a]:\nf(a)\n");
    assert_eq!(err.code(), ErrorCode::E1004);
}

#[test]
fn test_unindented_handler_line() {
    let err = parse_err("x |!\n[e]: f(e)\n");
    assert!(matches!(
        err.kind,
        ParseErrorKind::ExpectedIndentedBlock { .. }
    ));
    assert_eq!(err.context, Some(ErrorContext::Handler));
}

#[test]
fn test_empty_block() {
    let err = parse_err("x |[a]:");
    assert!(matches!(err.kind, ParseErrorKind::EmptyBlock { .. }));
    assert_eq!(err.code(), ErrorCode::E1005);
}

#[test]
fn test_inline_match_arms_rejected() {
    let err = parse_err("x | match: Ok(v): v");
    assert!(matches!(
        err.kind,
        ParseErrorKind::ExpectedIndentedBlock { .. }
    ));
}

#[test]
fn test_pipe_after_inline_arm_body() {
    let source = "load(p) | match:\n    Ok(v): v |> size\n    Err(e): e\n";
    let err = parse_err(source);
    assert_eq!(
        err.kind,
        ParseErrorKind::PipeAfterInlineArm {
            found: TokenKind::PipeArrow
        }
    );
    assert_eq!(err.code(), ErrorCode::E1008);
    assert_eq!(err.span.to_range(), 30..32);

    let diag = err.to_diagnostic();
    assert_eq!(diag.notes, vec!["while parsing a match arm".to_string()]);
    assert!(diag.suggestions[0].contains("use an indented block"));

    // The same chain as an indented arm body is fine.
    parse_ok("load(p) | match:\n    Ok(v):\n        v |> size\n    Err(e): e\n");
}

#[test]
fn test_unknown_operator() {
    let err = parse_err("x | frobnicate");
    assert!(matches!(err.kind, ParseErrorKind::UnknownOperator { .. }));
    assert_eq!(err.code(), ErrorCode::E1003);
}

#[test]
fn test_unwrap_outside_condition() {
    let err = parse_err("x!? |> f");
    assert_eq!(err.kind, ParseErrorKind::UnwrapOutsideCondition);
    let err = parse_err("x |> f(y!?)");
    assert_eq!(err.kind, ParseErrorKind::UnwrapOutsideCondition);
}

#[test]
fn test_missing_unwrap_binding() {
    let err = parse_err("if find(k)!?: k");
    assert_eq!(err.kind, ParseErrorKind::MissingUnwrapBinding);
}

#[test]
fn test_trailing_garbage() {
    let err = parse_err("x y");
    assert_eq!(err.code(), ErrorCode::E1001);
    assert_eq!(err.context, Some(ErrorContext::Chain));
}

#[test]
fn test_lex_errors_become_syntax_errors() {
    let interner = StringInterner::new();
    let errs = parse_source("x |> f & g ^", &interner).unwrap_err();
    assert_eq!(errs.len(), 2);
    assert!(errs.iter().all(|e| e.code() == ErrorCode::E0002));
}

#[test]
fn test_diagnostic_mentions_context() {
    let err = parse_err("x | match:\n    Ok(v) v\n");
    let diag = err.to_diagnostic();
    assert!(diag
        .notes
        .iter()
        .any(|n| n == "while parsing a match arm"));
}
