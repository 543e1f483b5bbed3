use std::fmt;

/// Error codes for all chain diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Stage parser errors
/// - E2xxx: Chain resolver errors
/// - E3xxx: Evaluation faults
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Integer literal out of range
    E0003,
    /// Dedent to a column that matches no open block
    E0004,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unknown pipe operator sequence
    E1003,
    /// Block-bearing stage not followed by an indented block
    E1004,
    /// Block-bearing stage with an empty block
    E1005,
    /// `!?` outside a conditional guard
    E1006,
    /// Conditional unwrap of a non-identifier without a binding name
    E1007,
    /// Pipe stage after an inline match arm body
    E1008,

    // Resolver Errors (E2xxx)
    /// Unknown function
    E2001,
    /// Unknown method
    E2002,
    /// Unresolved identifier
    E2003,
    /// Capture may be skipped on the error path
    E2004,
    /// Callable arity does not fit the stage
    E2005,
    /// Piped value would be discarded by an explicit call
    E2006,
    /// Handler not preceded by a stage that can produce `Err`
    E2007,
    /// Match block does not cover both `Ok` and `Err`
    E2008,
    /// Match block repeats an arm tag
    E2009,
    /// Capture name already bound in this scope
    E2010,
    /// `|?` not directly after a capture block
    E2011,

    // Evaluation Faults (E3xxx)
    /// Variable not bound at runtime
    E3001,
    /// Callable could not be dispatched at runtime
    E3002,
    /// Wrong number of arguments reached a native callable
    E3003,
    /// Value of the wrong shape
    E3004,
    /// Nested block depth limit exceeded
    E3005,
    /// Native callable reported a failure
    E3006,
}

impl ErrorCode {
    /// Check if this is a lexer or parser error.
    pub fn is_syntax_error(&self) -> bool {
        self.as_str().starts_with("E0") || self.as_str().starts_with("E1")
    }

    /// Check if this is a resolution error.
    pub fn is_resolution_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Get the error code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
