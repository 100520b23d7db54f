//! Lexis Scope - static classification of names in nested scopes.
//!
//! A walker traversing a syntax tree drives a [`ScopeTree`] with name
//! occurrences (`load`, `store`, `store_walrus`, `add_nonlocal`,
//! `add_global`) and opens child scopes with `nest`. After [`ScopeTree::build`]
//! every name of every scope is classified and has a binding scope.
//!
//! # Architecture
//!
//! - `kind`: [`ScopeKind`] with the open/closed predicates, [`ScopeId`]
//!   handles into the tree's arena
//! - `tree`: the tree, its mutation contract, the build phases and reports
//! - `events`: [`ScopeEvent`] scripts replayed onto a tree
//! - `error`: [`BindingError`], the single static-binding error type
//!
//! # Scope kinds
//!
//! Open scopes (`Global`, `Toplevel`, `Class`) see their own names but are
//! skipped when a nested closure looks for a name to capture. That makes a
//! class body invisible to the methods defined in it:
//!
//! ```text
//! x = 1
//! class C:
//!     x = 2
//!     def f(self):
//!         return x      # global x, not C.x
//! ```

mod error;
mod events;
mod kind;
mod tree;

pub use error::{BindingError, BindingErrorKind, BindingResult};
pub use events::ScopeEvent;
pub use kind::{ScopeId, ScopeKind};
pub use tree::{InvariantViolation, NullBuilder, Scope, ScopeBuilder, ScopeTree, VarStatus};
