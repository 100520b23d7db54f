//! Lexis Eval - runtime namespaces for a built scope tree.
//!
//! A [`NamespaceTree`] mirrors a built [`ScopeTree`](lexis_scope::ScopeTree):
//! one namespace per scope, each holding a [`Binding`] for every name local
//! to its scope. `get`, `set` and `delete` go straight to the namespace the
//! static analysis bound the name to.
//!
//! # Architecture
//!
//! - `binding`: [`Binding`] value cells and the copy-on-write [`Builtins`]
//! - `namespace`: [`NamespaceRef`] handles and the lookup rules per scope kind
//! - `builder`: [`NamespaceBuilder`] callbacks that create nested namespaces
//! - `error`: [`RuntimeError`], unbound-local versus name-not-found
//!
//! Namespaces are single-threaded (`Rc`-based). Separate namespace trees,
//! even over one shared scope tree, are independent.

mod binding;
mod builder;
mod error;
mod namespace;

pub use binding::{Binding, Builtins};
pub use builder::{NamespaceBuilder, NestAll, NestedScopes};
pub use error::{RuntimeError, RuntimeResult};
pub use namespace::{NamespaceRef, NamespaceTree, SharedScopeTree};
