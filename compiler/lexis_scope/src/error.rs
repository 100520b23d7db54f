//! Static binding errors.
//!
//! Every failure raised while building a [`ScopeTree`](crate::ScopeTree) is a
//! `BindingError`. The variants of [`BindingErrorKind`] only refine the
//! message and error code; callers treat them all the same way and abandon
//! the unit being analyzed.

use lexis_diagnostic::ErrorCode;
use lexis_ir::{Name, StringLookup};
use thiserror::Error;

use crate::{ScopeId, ScopeKind};

/// Result type for scope tree mutations.
pub type BindingResult<T> = Result<T, BindingError>;

/// What went wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BindingErrorKind {
    #[error("nonlocal declaration not allowed at module level")]
    NonlocalAtModuleLevel,
    #[error("no binding for nonlocal name found")]
    NonlocalNotFound,
    #[error("name is nonlocal and global")]
    NonlocalAndGlobal,
    #[error("name used prior to nonlocal declaration")]
    UsedBeforeNonlocal,
    #[error("name assigned before nonlocal declaration")]
    AssignedBeforeNonlocal,
    #[error("name used prior to global declaration")]
    UsedBeforeGlobal,
    #[error("name assigned before global declaration")]
    AssignedBeforeGlobal,
    #[error("assignment expression within a comprehension cannot be used in a class body")]
    WalrusInClassBody,
    #[error("assignment expression cannot be used in a comprehension iterable expression")]
    WalrusInIterable,
    #[error("assignment expression cannot rebind comprehension iteration variable")]
    WalrusRebindsIterationVar,
    #[error("{0} scope cannot be nested here")]
    MisplacedScope(ScopeKind),
    #[error("scope tree has no scope ids left")]
    ScopeLimit,
}

impl BindingErrorKind {
    /// The diagnostic code for this kind.
    pub fn code(self) -> ErrorCode {
        match self {
            BindingErrorKind::NonlocalAtModuleLevel => ErrorCode::E2001,
            BindingErrorKind::NonlocalNotFound => ErrorCode::E2002,
            BindingErrorKind::NonlocalAndGlobal => ErrorCode::E2003,
            BindingErrorKind::UsedBeforeNonlocal | BindingErrorKind::UsedBeforeGlobal => {
                ErrorCode::E2004
            }
            BindingErrorKind::AssignedBeforeNonlocal | BindingErrorKind::AssignedBeforeGlobal => {
                ErrorCode::E2005
            }
            BindingErrorKind::WalrusInClassBody => ErrorCode::E2006,
            BindingErrorKind::WalrusInIterable => ErrorCode::E2007,
            BindingErrorKind::WalrusRebindsIterationVar => ErrorCode::E2008,
            BindingErrorKind::MisplacedScope(_) => ErrorCode::E9001,
            BindingErrorKind::ScopeLimit => ErrorCode::E9004,
        }
    }
}

/// A static binding error, raised by the mutation call that detected it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct BindingError {
    /// What went wrong.
    pub kind: BindingErrorKind,
    /// The offending name (`Name::EMPTY` for anonymous scopes that could not
    /// be created).
    pub name: Name,
    /// The scope whose mutation failed.
    pub scope: ScopeId,
}

impl BindingError {
    pub(crate) fn new(kind: BindingErrorKind, name: Name, scope: ScopeId) -> Self {
        Self { kind, name, scope }
    }

    /// The diagnostic code.
    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    /// Render the error with the offending name spelled out.
    pub fn render<L: StringLookup + ?Sized>(&self, lookup: &L) -> String {
        let name = lookup.lookup(self.name);
        let message = match self.kind {
            BindingErrorKind::NonlocalNotFound => {
                format!("no binding for nonlocal '{name}' found")
            }
            BindingErrorKind::NonlocalAndGlobal => {
                format!("name '{name}' is nonlocal and global")
            }
            BindingErrorKind::UsedBeforeNonlocal => {
                format!("name '{name}' is used prior to nonlocal declaration")
            }
            BindingErrorKind::AssignedBeforeNonlocal => {
                format!("name '{name}' is assigned to before nonlocal declaration")
            }
            BindingErrorKind::UsedBeforeGlobal => {
                format!("name '{name}' is used prior to global declaration")
            }
            BindingErrorKind::AssignedBeforeGlobal => {
                format!("name '{name}' is assigned to before global declaration")
            }
            BindingErrorKind::WalrusRebindsIterationVar => {
                format!("assignment expression cannot rebind comprehension iteration variable '{name}'")
            }
            kind => kind.to_string(),
        };
        format!("error[{}]: {message}", self.code())
    }
}
