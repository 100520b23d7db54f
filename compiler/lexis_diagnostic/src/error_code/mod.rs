//! Error codes for all binding diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E2001`) with the first digit
//! indicating the phase that raises it.

use std::fmt;

/// Error codes for all binding diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E2xxx: Static binding errors (scope analysis)
/// - E6xxx: Runtime binding errors (namespace access)
/// - E9xxx: Internal errors (the caller drove a tree incorrectly)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Static Binding Errors (E2xxx)
    /// `nonlocal` declaration at module level
    E2001,
    /// No binding for a `nonlocal` name in any enclosing function
    E2002,
    /// Name declared both `nonlocal` and `global`
    E2003,
    /// Name used prior to its `nonlocal`/`global` declaration
    E2004,
    /// Name assigned before its `nonlocal`/`global` declaration
    E2005,
    /// Assignment expression inside a class body
    E2006,
    /// Assignment expression inside a comprehension iterable expression
    E2007,
    /// Assignment expression rebinding a comprehension iteration variable
    E2008,

    // Runtime Binding Errors (E6xxx)
    /// Local name referenced before assignment
    E6001,
    /// Name is not defined
    E6002,

    // Internal Errors (E9xxx)
    /// Global scope created below the root, or toplevel scope not directly
    /// below it
    E9001,
    /// Namespace nested under a namespace of a different scope, or no
    /// nested scope left to nest
    E9002,
    /// Namespace created for a scope tree that is not built
    E9003,
    /// Scope tree ran out of scope ids
    E9004,
}

impl ErrorCode {
    /// All error codes, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E9001,
        ErrorCode::E9002,
        ErrorCode::E9003,
        ErrorCode::E9004,
    ];

    /// Get the numeric code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::E9003 => "E9003",
            ErrorCode::E9004 => "E9004",
        }
    }

    /// Check if this is a static binding error (E2xxx range).
    pub fn is_static_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E2001
                | ErrorCode::E2002
                | ErrorCode::E2003
                | ErrorCode::E2004
                | ErrorCode::E2005
                | ErrorCode::E2006
                | ErrorCode::E2007
                | ErrorCode::E2008
        )
    }

    /// Check if this is a runtime binding error (E6xxx range).
    pub fn is_runtime_error(&self) -> bool {
        matches!(self, ErrorCode::E6001 | ErrorCode::E6002)
    }

    /// Check if this is an internal error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001 | ErrorCode::E9002 | ErrorCode::E9003 | ErrorCode::E9004)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"`.
///
/// Case-insensitive. Derived from [`ErrorCode::ALL`] and [`ErrorCode::as_str()`].
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
