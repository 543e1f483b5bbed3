#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use sluice_ir::TokenKind as K;

fn kinds(source: &str) -> Vec<TokenKind> {
    let interner = StringInterner::new();
    let out = lex(source, &interner);
    assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    out.tokens.kinds()
}

fn errors(source: &str) -> Vec<LexErrorKind> {
    let interner = StringInterner::new();
    lex(source, &interner).errors.into_iter().map(|e| e.kind).collect()
}

#[test]
fn test_lex_pipe_operators() {
    let interner = StringInterner::new();
    let out = lex("x |> f |. g |! |[a] |? |$ t | match !?", &interner);
    let kinds = out.tokens.kinds();

    assert!(matches!(kinds[0], K::Ident(_)));
    assert_eq!(kinds[1], K::PipeArrow);
    assert_eq!(kinds[3], K::PipeDot);
    assert_eq!(kinds[5], K::PipeBang);
    assert_eq!(kinds[6], K::PipeBracket);
    assert!(matches!(kinds[7], K::Ident(_)));
    assert_eq!(kinds[8], K::RBracket);
    assert_eq!(kinds[9], K::PipeQuestion);
    assert_eq!(kinds[10], K::PipeDollar);
    assert_eq!(kinds[12], K::Pipe);
    assert_eq!(kinds[13], K::Match);
    assert_eq!(kinds[14], K::BangQuestion);
    assert_eq!(&kinds[15..], &[K::Newline, K::Eof]);
}

#[test]
fn test_lex_keywords_and_literals() {
    let interner = StringInterner::new();
    let out = lex(r#"if else handle Ok Err true false none 1_000 "a\"b""#, &interner);
    let kinds = out.tokens.kinds();

    assert_eq!(
        &kinds[..9],
        &[
            K::If,
            K::Else,
            K::Handle,
            K::Ok,
            K::Err,
            K::True,
            K::False,
            K::None,
            K::Int(1000)
        ]
    );
    let K::Str(name) = kinds[9] else {
        panic!("expected string, got {:?}", kinds[9]);
    };
    assert_eq!(interner.lookup(name), "a\"b");
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let interner = StringInterner::new();
    let out = lex("nonempty handler", &interner);
    let kinds = out.tokens.kinds();
    assert!(matches!(kinds[0], K::Ident(_)));
    assert!(matches!(kinds[1], K::Ident(_)));
}

#[test]
fn test_indent_and_dedent() {
    let src = "load(p)\n    |> parse\n        |> check\n    |> save\n";
    let kinds = kinds(src);

    let layout: Vec<_> = kinds
        .iter()
        .filter(|k| matches!(k, K::Newline | K::Indent | K::Dedent))
        .copied()
        .collect();
    assert_eq!(
        layout,
        vec![
            K::Newline,
            K::Indent,
            K::Newline,
            K::Indent,
            K::Newline,
            K::Dedent,
            K::Newline,
            K::Dedent,
        ]
    );
    assert_eq!(kinds.last(), Some(&K::Eof));
}

#[test]
fn test_blank_and_comment_lines_are_invisible() {
    let with_noise = kinds("a\n\n   // note\n    |> f\n");
    let without = kinds("a\n    |> f\n");
    assert_eq!(with_noise.len(), without.len());
}

#[test]
fn test_newlines_inside_parens_ignored() {
    let kinds = kinds("f(a,\n  b)\n");
    assert!(!kinds.contains(&K::Indent));
    assert_eq!(kinds.iter().filter(|k| **k == K::Newline).count(), 1);
}

#[test]
fn test_base_column_is_first_token() {
    let kinds = kinds("    a\n    |> f\n");
    assert!(!kinds.contains(&K::Indent));
    assert!(!kinds.contains(&K::Dedent));
}

#[test]
fn test_inconsistent_dedent() {
    let src = "a\n        |> f\n    |> g\n";
    assert_eq!(errors(src), vec![LexErrorKind::InconsistentDedent]);
}

#[test]
fn test_unterminated_string() {
    assert_eq!(errors("f(\"abc\n"), vec![LexErrorKind::UnterminatedString]);
}

#[test]
fn test_invalid_char() {
    let interner = StringInterner::new();
    let out = lex("a |> f & g", &interner);
    assert_eq!(out.errors.len(), 1);
    assert_eq!(out.errors[0].kind, LexErrorKind::InvalidChar('&'));
    assert_eq!(out.errors[0].code(), sluice_diagnostic::ErrorCode::E0002);
    assert!(out.tokens.kinds().contains(&K::Error));
}

#[test]
fn test_int_overflow() {
    assert_eq!(
        errors("99999999999999999999"),
        vec![LexErrorKind::IntOverflow]
    );
}

#[test]
fn test_spans_point_into_source() {
    let interner = StringInterner::new();
    let src = "xs |. push(1)";
    let out = lex(src, &interner);
    let op = out.tokens.get(1).unwrap();
    assert_eq!(&src[op.span.to_range()], "|.");
    let eof = out.tokens.last().unwrap();
    assert_eq!(eof.span, Span::point(13));
}
