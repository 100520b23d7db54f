//! Runtime binding errors.

use lexis_diagnostic::ErrorCode;
use lexis_ir::{Name, StringLookup};
use lexis_scope::ScopeId;
use thiserror::Error;

/// Result type for namespace operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Failure of a namespace operation.
///
/// `UnboundLocal` and `NameNotFound` come from reading or deleting a name;
/// the other variants mean the caller drove the namespace tree out of step
/// with its scope tree.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The accessing namespace binds the name but holds no value for it.
    #[error("local variable referenced before assignment")]
    UnboundLocal { name: Name },
    /// The name is bound in an enclosing namespace, the global namespace or
    /// the builtins, and none of them holds a value.
    #[error("name is not defined")]
    NameNotFound { name: Name },
    #[error("scope {scope:?} is not nested directly in scope {parent:?}")]
    ScopeMismatch { parent: ScopeId, scope: ScopeId },
    #[error("scope {parent:?} has no nested scope left")]
    NestedScopesExhausted { parent: ScopeId },
    #[error("namespaces require a built scope tree")]
    UnbuiltScopeTree,
}

impl RuntimeError {
    /// The diagnostic code.
    pub fn code(&self) -> ErrorCode {
        match self {
            RuntimeError::UnboundLocal { .. } => ErrorCode::E6001,
            RuntimeError::NameNotFound { .. } => ErrorCode::E6002,
            RuntimeError::ScopeMismatch { .. } | RuntimeError::NestedScopesExhausted { .. } => {
                ErrorCode::E9002
            }
            RuntimeError::UnbuiltScopeTree => ErrorCode::E9003,
        }
    }

    /// The name whose access failed, if any.
    pub fn name(&self) -> Option<Name> {
        match self {
            RuntimeError::UnboundLocal { name } | RuntimeError::NameNotFound { name } => {
                Some(*name)
            }
            _ => None,
        }
    }

    /// Render the error with the offending name spelled out.
    pub fn render<L: StringLookup + ?Sized>(&self, lookup: &L) -> String {
        let message = match self {
            RuntimeError::UnboundLocal { name } => format!(
                "local variable '{}' referenced before assignment",
                lookup.lookup(*name)
            ),
            RuntimeError::NameNotFound { name } => {
                format!("name '{}' is not defined", lookup.lookup(*name))
            }
            other => other.to_string(),
        };
        format!("error[{}]: {message}", self.code())
    }
}
