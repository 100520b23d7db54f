//! Lexis - lexical scope resolution and runtime namespace binding.
//!
//! Two phases, one crate each:
//!
//! 1. [`ScopeTree`] (`lexis_scope`): a walker reports the name occurrences
//!    of every scope, `build` classifies each name as local, nonlocal,
//!    global or top and fixes its binding scope.
//! 2. [`NamespaceTree`] (`lexis_eval`): namespaces mirroring the built
//!    scopes store and look up values through those binding scopes.
//!
//! ```
//! use lexis::{Builtins, NullBuilder, ScopeKind, ScopeTree, NamespaceTree, SharedInterner};
//!
//! let interner = SharedInterner::default();
//! let (f, v) = (interner.intern("f"), interner.intern("v"));
//!
//! let mut tree = ScopeTree::new(());
//! let func = tree.nest(tree.root(), ScopeKind::Function, Some(f), ())?;
//! tree.store(func, v);
//! tree.build(&mut NullBuilder)?;
//!
//! let namespaces: NamespaceTree<i64> = NamespaceTree::global(tree, Builtins::new())?;
//! let frame = namespaces.root().nest(func)?;
//! frame.set(v, 42);
//! assert_eq!(frame.get(v)?, 42);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::Once;

pub use lexis_diagnostic::ErrorCode;
pub use lexis_eval::{
    Binding, Builtins, NamespaceBuilder, NamespaceRef, NamespaceTree, NestAll, NestedScopes,
    RuntimeError, RuntimeResult, SharedScopeTree,
};
pub use lexis_ir::{Name, SharedInterner, StringInterner, StringLookup};
pub use lexis_scope::{
    BindingError, BindingErrorKind, BindingResult, InvariantViolation, NullBuilder, Scope,
    ScopeBuilder, ScopeEvent, ScopeId, ScopeKind, ScopeTree, VarStatus,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=lexis_scope=debug` or `RUST_LOG=lexis_eval=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
            tracing::debug!("tracing initialized");
        }
    });
}
