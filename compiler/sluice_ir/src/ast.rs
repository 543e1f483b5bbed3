//! Parsed (unresolved) pipe-chain syntax tree.
//!
//! Indentation has already been turned into nesting: every block-bearing
//! stage owns its body as a fully parsed [`ParsedChain`]. Names are still
//! plain interned identifiers; the resolver binds them to scopes and
//! callables.

use crate::{Name, Span};
use std::fmt;

/// Tag of a result arm or outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResultTag {
    Ok,
    Err,
}

impl fmt::Display for ResultTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultTag::Ok => f.write_str("Ok"),
            ResultTag::Err => f.write_str("Err"),
        }
    }
}

/// A chain: seed expression followed by zero or more stages.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedChain {
    pub seed: Expr,
    pub stages: Vec<Stage>,
    pub span: Span,
}

impl ParsedChain {
    /// A chain consisting of a bare expression.
    pub fn from_expr(seed: Expr) -> Self {
        let span = seed.span;
        ParsedChain {
            seed,
            stages: Vec::new(),
            span,
        }
    }
}

/// Body of a block-bearing stage or conditional branch.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub chain: ParsedChain,
    /// Written on the same line as its opener rather than as an indented block.
    pub inline: bool,
}

impl Body {
    pub fn span(&self) -> Span {
        self.chain.span
    }
}

/// One pipe stage as written.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    pub kind: StageKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StageKind {
    /// `|> target`
    Transform(CallTarget),
    /// `|. target`
    MethodCall(CallTarget),
    /// `|!`, optionally followed by a `[name]: body` handler.
    Bang { handler: Option<Handler> },
    /// `|[name]` or `|[name]: body`
    Capture { name: Name, block: Option<Body> },
    /// `| match:` with indented arms.
    Match { arms: Vec<MatchArm> },
    /// `| handle [name]: body`
    Handle { name: Name, body: Body },
    /// `|?`
    Resume,
    /// `|$ target`
    Tap(CallTarget),
}

impl StageKind {
    /// Operator spelling, for diagnostics and tracing.
    pub fn operator(&self) -> &'static str {
        match self {
            StageKind::Transform(_) => "|>",
            StageKind::MethodCall(_) => "|.",
            StageKind::Bang { .. } => "|!",
            StageKind::Capture { .. } => "|[..]",
            StageKind::Match { .. } => "| match",
            StageKind::Handle { .. } => "| handle",
            StageKind::Resume => "|?",
            StageKind::Tap(_) => "|$",
        }
    }
}

/// Callee of `|>`, `|.` and `|$`: a name with optional extra arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct CallTarget {
    pub name: Name,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `[name]: body` attached to `|!`.
#[derive(Clone, Debug, PartialEq)]
pub struct Handler {
    pub name: Name,
    pub body: Body,
    pub span: Span,
}

/// `Ok(name): body` or `Err(name): body`.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchArm {
    pub tag: ResultTag,
    pub binding: Name,
    pub body: Body,
    pub span: Span,
}

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Int(i64),
    Str(Name),
    Bool(bool),
    /// The absent-value sentinel `none`.
    None,
    Ident(Name),
    Call { func: Name, args: Vec<Expr> },
    Ok(Box<Expr>),
    Err(Box<Expr>),
    If {
        cond: Box<Condition>,
        then_branch: Box<Body>,
        else_branch: Option<Box<Body>>,
    },
}

/// Guard of an `if` expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// Plain boolean guard.
    Bool(Expr),
    /// `subject!?` - true when the subject is present and not `Err`; the
    /// unwrapped payload is bound to `binding` in the truthy branch only.
    Unwrap {
        subject: Expr,
        binding: Name,
        span: Span,
    },
}
