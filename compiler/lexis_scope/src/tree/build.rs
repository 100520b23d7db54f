//! Building a scope tree.
//!
//! `build` runs in three phases:
//!
//! 1. **Populate**: the builder callback records the occurrences of each
//!    scope and creates its children. Runs pre-order over the whole tree,
//!    so a child is populated only after its parent has been.
//! 2. **Descend**: every child is built before its parent is finalized. An
//!    assignment expression deep inside a comprehension chain can therefore
//!    still turn a used name of an outer scope into a local one.
//! 3. **Resolve**: runs post-order. Every name still `Used` in a scope is
//!    bound to the nearest enclosing closed scope where it is local, or else
//!    to the global scope, which records a use of it.
//!
//! Populating the whole tree before resolving anything keeps the result
//! independent of sibling order: a function is resolved only once every
//! sibling comprehension has had its chance to bind names in the parent.

use lexis_ir::Name;

use super::{ScopeTree, Var};
use crate::error::BindingResult;
use crate::ScopeId;

/// Populates one scope of a tree.
///
/// `build_scope` is called once per scope, parent before children, while the
/// scope's children are still empty. It records the scope's occurrences
/// through the tree's mutation methods and creates its children with
/// [`ScopeTree::nest`]. Read the scope's payload with
/// [`ScopeTree::payload`] and copy out what is needed before mutating.
pub trait ScopeBuilder<R> {
    fn build_scope(&mut self, tree: &mut ScopeTree<R>, scope: ScopeId) -> BindingResult<()>;
}

/// Builder for trees the walker has already populated eagerly.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBuilder;

impl<R> ScopeBuilder<R> for NullBuilder {
    fn build_scope(&mut self, _tree: &mut ScopeTree<R>, _scope: ScopeId) -> BindingResult<()> {
        Ok(())
    }
}

impl<R, F> ScopeBuilder<R> for F
where
    F: FnMut(&mut ScopeTree<R>, ScopeId) -> BindingResult<()>,
{
    fn build_scope(&mut self, tree: &mut ScopeTree<R>, scope: ScopeId) -> BindingResult<()> {
        self(tree, scope)
    }
}

impl<R> ScopeTree<R> {
    /// Build the whole tree.
    ///
    /// Re-invoking `build` on a built tree does not call the builder again
    /// and leaves every classification unchanged.
    #[tracing::instrument(level = "debug", skip_all, fields(scopes = self.len()))]
    pub fn build<B: ScopeBuilder<R> + ?Sized>(&mut self, builder: &mut B) -> BindingResult<()> {
        if !self.built {
            self.populate(ScopeId::ROOT, builder)?;
        }
        self.resolve(ScopeId::ROOT);
        self.built = true;
        tracing::debug!(scopes = self.len(), "scope tree built");
        Ok(())
    }

    fn populate<B: ScopeBuilder<R> + ?Sized>(
        &mut self,
        scope: ScopeId,
        builder: &mut B,
    ) -> BindingResult<()> {
        builder.build_scope(self, scope)?;
        // Index loop: a child's builder may still append scopes here.
        let mut i = 0;
        while let Some(&child) = self.nested(scope).get(i) {
            self.populate(child, builder)?;
            i += 1;
        }
        Ok(())
    }

    fn resolve(&mut self, scope: ScopeId) {
        let mut i = 0;
        while let Some(&child) = self.nested(scope).get(i) {
            self.resolve(child);
            i += 1;
        }

        let mut pending: Vec<Name> = self.uses(scope).collect();
        if pending.is_empty() {
            return;
        }
        pending.sort_unstable();

        for name in pending {
            let var = if scope == ScopeId::ROOT {
                Var::Global { declared: false }
            } else if let Some(target) = self.find_capture_target(scope, name) {
                Var::Nonlocal(target)
            } else {
                self.load(ScopeId::ROOT, name);
                Var::Global { declared: false }
            };
            tracing::trace!(?scope, ?name, ?var, "resolved");
            self.scope_mut(scope).vars.insert(name, var);
        }
    }
}
