//! Runtime namespaces.
//!
//! A namespace mirrors one scope of a built [`ScopeTree`] and holds a
//! [`Binding`] for every name local to that scope. Every access first
//! finds the *binding namespace* of the name: the scope tree says in which
//! scope the name lives, and the namespace walks up its parent chain until
//! it reaches the namespace of that scope.
//!
//! # Lookup refinements
//!
//! - Global namespaces fall back to the builtins when the name holds no value.
//! - Class and toplevel namespaces fall back to the global namespace when they
//!   are the binding namespace and the name holds no value there. A class
//!   body can thus read a module-level entity it has not yet assigned.
//!
//! Namespaces only point at their parents. Whoever creates a nested
//! namespace owns it.

#![expect(
    clippy::disallowed_types,
    reason = "Rc is the implementation of NamespaceRef"
)]

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use lexis_ir::Name;
use lexis_scope::{ScopeId, ScopeKind, ScopeTree};
use rustc_hash::FxHashMap;

use crate::binding::{Binding, Builtins};
use crate::error::{RuntimeError, RuntimeResult};

/// A built scope tree shared by every namespace created from it.
pub type SharedScopeTree<R = ()> = Arc<ScopeTree<R>>;

/// State of a name in its binding namespace.
enum Slot<V> {
    Bound(V),
    Unbound,
    Missing,
}

struct Namespace<V, R> {
    scope: ScopeId,
    kind: ScopeKind,
    tree: SharedScopeTree<R>,
    bindings: FxHashMap<Name, Binding<V>>,
    parent: Option<NamespaceRef<V, R>>,
    /// Present on the global namespace only.
    builtins: Option<Builtins<V>>,
}

impl<V, R> Namespace<V, R> {
    fn new(
        tree: SharedScopeTree<R>,
        scope: ScopeId,
        parent: Option<NamespaceRef<V, R>>,
        builtins: Option<Builtins<V>>,
    ) -> Self {
        let bindings = tree
            .locals(scope)
            .map(|name| (name, Binding::unbound()))
            .collect();
        Namespace {
            scope,
            kind: tree.kind(scope),
            tree,
            bindings,
            parent,
            builtins,
        }
    }
}

impl<V: Clone, R> Namespace<V, R> {
    fn own_slot(&self, name: Name) -> Slot<V> {
        match self.bindings.get(&name) {
            Some(binding) => binding.value().cloned().map_or(Slot::Unbound, Slot::Bound),
            None => Slot::Missing,
        }
    }
}

/// Shared handle to a runtime namespace.
#[repr(transparent)]
pub struct NamespaceRef<V, R = ()>(Rc<RefCell<Namespace<V, R>>>);

impl<V, R> NamespaceRef<V, R> {
    fn new(namespace: Namespace<V, R>) -> Self {
        NamespaceRef(Rc::new(RefCell::new(namespace)))
    }

    /// The scope this namespace mirrors.
    #[inline]
    pub fn scope(&self) -> ScopeId {
        self.0.borrow().scope
    }

    #[inline]
    pub fn kind(&self) -> ScopeKind {
        self.0.borrow().kind
    }

    #[inline]
    pub fn parent(&self) -> Option<Self> {
        self.0.borrow().parent.clone()
    }

    /// The scope tree this namespace was created from.
    pub fn scope_tree(&self) -> SharedScopeTree<R> {
        Arc::clone(&self.0.borrow().tree)
    }

    /// The global namespace at the root of this namespace's chain.
    pub fn global(&self) -> Self {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Whether both handles refer to the same namespace.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The namespace holding the value of `name` as seen from this one.
    pub fn binding_namespace(&self, name: Name) -> Self {
        let target = {
            let ns = self.0.borrow();
            ns.tree.binding_scope(ns.scope, name)
        };
        let mut current = self.clone();
        loop {
            if current.scope() == target {
                return current;
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// Bind `value` to `name` in its binding namespace.
    ///
    /// Creates the binding if the binding namespace has none yet, which
    /// happens for names that only became global through resolution.
    pub fn set(&self, name: Name, value: V) {
        let home = self.binding_namespace(name);
        home.0
            .borrow_mut()
            .bindings
            .entry(name)
            .or_default()
            .bind(value);
    }

    /// Bind `value` to the target of an assignment expression.
    ///
    /// Inside a comprehension the target belongs to the nearest enclosing
    /// namespace that is not a comprehension; the value is set from there.
    /// Anywhere else this is [`set`](Self::set).
    pub fn store_walrus(&self, name: Name, value: V) {
        let mut target = self.clone();
        while target.kind() == ScopeKind::Comprehension {
            match target.parent() {
                Some(parent) => target = parent,
                None => break,
            }
        }
        target.set(name, value);
    }

    /// Unbind `name` in its binding namespace.
    ///
    /// # Errors
    /// Fails like [`get`](Self::get) on an unbound name when the binding
    /// holds no value. Builtins are never deleted.
    pub fn delete(&self, name: Name) -> RuntimeResult<()> {
        let home = self.binding_namespace(name);
        let mut ns = home.0.borrow_mut();
        match ns.bindings.get_mut(&name) {
            Some(binding) if binding.is_bound() => {
                binding.unbind();
                Ok(())
            }
            Some(_) if home.ptr_eq(self) => Err(RuntimeError::UnboundLocal { name }),
            _ => Err(RuntimeError::NameNotFound { name }),
        }
    }

    /// Names with a binding in this namespace itself, bound or not, sorted.
    pub fn local_names(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self.0.borrow().bindings.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Create the namespace of `scope`, a direct child of this namespace's
    /// scope.
    ///
    /// # Errors
    /// `ScopeMismatch` if `scope` is not nested directly in this scope.
    #[tracing::instrument(level = "trace", skip(self), fields(parent = ?self.scope()))]
    pub fn nest(&self, scope: ScopeId) -> RuntimeResult<Self> {
        let tree = self.scope_tree();
        let parent = self.scope();
        if scope.index() >= tree.len() || tree.parent(scope) != Some(parent) {
            return Err(RuntimeError::ScopeMismatch { parent, scope });
        }
        Ok(Self::new(Namespace::new(tree, scope, Some(self.clone()), None)))
    }
}

impl<V: Clone, R> NamespaceRef<V, R> {
    /// The value of `name`.
    ///
    /// # Errors
    /// `UnboundLocal` if this namespace is the binding namespace and holds no
    /// value; `NameNotFound` if the value is missing anywhere else.
    pub fn get(&self, name: Name) -> RuntimeResult<V> {
        let home = self.binding_namespace(name);
        match home.load(name) {
            Slot::Bound(value) => Ok(value),
            Slot::Unbound if home.ptr_eq(self) => Err(RuntimeError::UnboundLocal { name }),
            Slot::Unbound | Slot::Missing => Err(RuntimeError::NameNotFound { name }),
        }
    }

    /// Whether [`get`](Self::get) would succeed.
    pub fn has(&self, name: Name) -> bool {
        matches!(self.binding_namespace(name).load(name), Slot::Bound(_))
    }

    /// Look `name` up in this namespace, taken as its binding namespace.
    fn load(&self, name: Name) -> Slot<V> {
        let ns = self.0.borrow();
        let slot = ns.own_slot(name);
        if matches!(slot, Slot::Bound(_)) {
            return slot;
        }
        match ns.kind {
            ScopeKind::Global => match ns.builtins.as_ref().and_then(|b| b.get(name)) {
                Some(value) => Slot::Bound(value.clone()),
                None => slot,
            },
            ScopeKind::Class | ScopeKind::Toplevel => match self.global().load(name) {
                Slot::Bound(value) => Slot::Bound(value),
                Slot::Unbound | Slot::Missing => slot,
            },
            ScopeKind::Function | ScopeKind::Lambda | ScopeKind::Comprehension => slot,
        }
    }

    /// A handle on the builtins of the global namespace.
    pub fn builtins(&self) -> Builtins<V> {
        let global = self.global();
        let ns = global.0.borrow();
        ns.builtins.clone().unwrap_or_default()
    }

    /// Modify the builtins of the global namespace. Other global namespaces
    /// started from the same builtins keep the unmodified mapping.
    ///
    /// `f` edits a handle that replaces the builtins once it returns, so it
    /// may still read and write namespaces of this tree; those accesses see
    /// the builtins from before the call.
    pub fn with_builtins_mut<T>(&self, f: impl FnOnce(&mut Builtins<V>) -> T) -> T {
        let mut builtins = self.builtins();
        let result = f(&mut builtins);
        self.global().0.borrow_mut().builtins = Some(builtins);
        result
    }
}

impl<V, R> Clone for NamespaceRef<V, R> {
    #[inline]
    fn clone(&self) -> Self {
        NamespaceRef(Rc::clone(&self.0))
    }
}

impl<V, R> fmt::Debug for NamespaceRef<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(ns) => f
                .debug_struct("NamespaceRef")
                .field("scope", &ns.scope)
                .field("kind", &ns.kind)
                .field("bindings", &ns.bindings.len())
                .finish_non_exhaustive(),
            Err(_) => f.write_str("NamespaceRef(<borrowed>)"),
        }
    }
}

/// The runtime namespace tree of one compilation unit.
///
/// Holds the global namespace; nested namespaces are created on demand with
/// [`NamespaceRef::nest`] or by a [`NamespaceBuilder`](crate::NamespaceBuilder).
pub struct NamespaceTree<V, R = ()> {
    root: NamespaceRef<V, R>,
}

impl<V, R> NamespaceTree<V, R> {
    /// Create the global namespace for a built scope tree.
    ///
    /// # Errors
    /// `UnbuiltScopeTree` if the scope tree has not been built.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn global(tree: impl Into<SharedScopeTree<R>>, builtins: Builtins<V>) -> RuntimeResult<Self> {
        let tree = tree.into();
        if !tree.is_built() {
            return Err(RuntimeError::UnbuiltScopeTree);
        }
        let root = tree.root();
        let namespace = Namespace::new(tree, root, None, Some(builtins));
        tracing::debug!(bindings = namespace.bindings.len(), "global namespace created");
        Ok(NamespaceTree {
            root: NamespaceRef::new(namespace),
        })
    }

    /// The global namespace.
    #[inline]
    pub fn root(&self) -> &NamespaceRef<V, R> {
        &self.root
    }

    pub fn into_root(self) -> NamespaceRef<V, R> {
        self.root
    }

    pub fn scope_tree(&self) -> SharedScopeTree<R> {
        self.root.scope_tree()
    }
}

impl<V, R> fmt::Debug for NamespaceTree<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceTree")
            .field("root", &self.root)
            .finish()
    }
}
