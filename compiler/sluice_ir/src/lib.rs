//! Sluice IR - shared data types for the pipe-chain front end.
//!
//! This crate holds everything the lexer, parser and resolver exchange:
//! - `Span`: compact byte-offset source locations
//! - `Name` / `StringInterner`: interned identifiers
//! - `Token` / `TokenKind` / `TokenList`: the layout-aware token stream
//! - `ast`: the parsed (unresolved) chain, stage and expression nodes

pub mod ast;
mod interner;
mod name;
mod span;
mod token;

pub use ast::{
    Body, CallTarget, Condition, Expr, ExprKind, Handler, MatchArm, ParsedChain, ResultTag, Stage,
    StageKind,
};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
pub use token::{Token, TokenKind, TokenList};
