//! Building namespace trees.
//!
//! Runtime nesting is eager: [`NamespaceRef::nest_next`] creates the child
//! namespace and runs the builder on it before returning. Static nesting in
//! [`lexis_scope`] is the opposite; a scope's children are populated only
//! after the scope itself.
//!
//! A builder walking the same syntax tree that produced the scope tree asks
//! for the nested scopes in the order it meets them, through the
//! [`NestedScopes`] cursor it is handed.

use lexis_scope::ScopeId;

use crate::error::{RuntimeError, RuntimeResult};
use crate::NamespaceRef;

/// Populates one namespace.
pub trait NamespaceBuilder<V, R> {
    /// Called once for `namespace`, with the payload of its scope and a
    /// cursor over the scope's children.
    fn build_namespace(
        &mut self,
        namespace: &NamespaceRef<V, R>,
        payload: &R,
        nested: &mut NestedScopes,
    ) -> RuntimeResult<()>;
}

impl<V, R, F> NamespaceBuilder<V, R> for F
where
    F: FnMut(&NamespaceRef<V, R>, &R, &mut NestedScopes) -> RuntimeResult<()>,
{
    fn build_namespace(
        &mut self,
        namespace: &NamespaceRef<V, R>,
        payload: &R,
        nested: &mut NestedScopes,
    ) -> RuntimeResult<()> {
        self(namespace, payload, nested)
    }
}

/// Builder that creates the namespace of every nested scope, recursively,
/// and keeps them in creation order.
pub struct NestAll<V, R = ()> {
    created: Vec<NamespaceRef<V, R>>,
}

impl<V, R> NestAll<V, R> {
    pub fn new() -> Self {
        NestAll {
            created: Vec::new(),
        }
    }

    /// Every namespace created so far, in creation order.
    pub fn created(&self) -> &[NamespaceRef<V, R>] {
        &self.created
    }

    /// The created namespace of `scope`, if any.
    pub fn find(&self, scope: ScopeId) -> Option<&NamespaceRef<V, R>> {
        self.created.iter().find(|ns| ns.scope() == scope)
    }
}

impl<V, R> Default for NestAll<V, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, R> NamespaceBuilder<V, R> for NestAll<V, R> {
    fn build_namespace(
        &mut self,
        namespace: &NamespaceRef<V, R>,
        _payload: &R,
        nested: &mut NestedScopes,
    ) -> RuntimeResult<()> {
        while let Some(scope) = nested.next() {
            let child = namespace.nest(scope)?;
            self.created.push(child.clone());
            child.build(self)?;
        }
        Ok(())
    }
}

/// Cursor over the nested scopes of one scope, in encounter order.
#[derive(Clone, Debug)]
pub struct NestedScopes {
    parent: ScopeId,
    scopes: Vec<ScopeId>,
    next: usize,
}

impl NestedScopes {
    pub(crate) fn new(parent: ScopeId, scopes: &[ScopeId]) -> Self {
        NestedScopes {
            parent,
            scopes: scopes.to_vec(),
            next: 0,
        }
    }

    /// The scope whose children this cursor walks.
    #[inline]
    pub fn parent(&self) -> ScopeId {
        self.parent
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.scopes.len() - self.next
    }

    /// Take the next nested scope.
    ///
    /// # Errors
    /// `NestedScopesExhausted` if every nested scope has been taken.
    pub fn next_scope(&mut self) -> RuntimeResult<ScopeId> {
        self.next().ok_or(RuntimeError::NestedScopesExhausted {
            parent: self.parent,
        })
    }
}

impl Iterator for NestedScopes {
    type Item = ScopeId;

    fn next(&mut self) -> Option<ScopeId> {
        let scope = self.scopes.get(self.next).copied()?;
        self.next += 1;
        Some(scope)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl ExactSizeIterator for NestedScopes {}

impl<V, R> NamespaceRef<V, R> {
    /// Run `builder` on this namespace.
    #[tracing::instrument(level = "trace", skip_all, fields(scope = ?self.scope()))]
    pub fn build<B: NamespaceBuilder<V, R> + ?Sized>(&self, builder: &mut B) -> RuntimeResult<()> {
        let tree = self.scope_tree();
        let scope = self.scope();
        let mut nested = NestedScopes::new(scope, tree.nested(scope));
        builder.build_namespace(self, tree.payload(scope), &mut nested)
    }

    /// Create and build the namespace of the next scope from `nested`.
    ///
    /// # Errors
    /// `ScopeMismatch` if `nested` walks the children of another scope,
    /// `NestedScopesExhausted` if it is used up, and any builder error.
    pub fn nest_next<B: NamespaceBuilder<V, R> + ?Sized>(
        &self,
        nested: &mut NestedScopes,
        builder: &mut B,
    ) -> RuntimeResult<Self> {
        let parent = self.scope();
        if nested.parent() != parent {
            return Err(RuntimeError::ScopeMismatch {
                parent,
                scope: nested.parent(),
            });
        }
        let scope = nested.next_scope()?;
        self.nest_with(scope, builder)
    }

    /// Create the namespace of `scope` and build it with `builder`.
    pub fn nest_with<B: NamespaceBuilder<V, R> + ?Sized>(
        &self,
        scope: ScopeId,
        builder: &mut B,
    ) -> RuntimeResult<Self> {
        let child = self.nest(scope)?;
        child.build(builder)?;
        Ok(child)
    }
}
