//! The scope tree and its mutation contract.
//!
//! A walker drives the tree top-down while traversing a syntax tree:
//! `load`/`store`/`store_walrus`/`add_nonlocal`/`add_global` record name
//! occurrences in the current scope, and `nest` opens a child scope. Once a
//! unit is complete, [`ScopeTree::build`] resolves every pending name.
//!
//! # Classification
//!
//! Each name occurring in a scope is in exactly one state: `Used` (seen,
//! binding scope pending), `Local`, `Nonlocal(target)` or `Global`. Holding a
//! single state per name makes the local, nonlocal and global sets of a scope
//! disjoint at every point of construction.

mod build;
mod report;

pub use build::{NullBuilder, ScopeBuilder};
pub use report::InvariantViolation;

use lexis_ir::Name;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{BindingError, BindingErrorKind, BindingResult};
use crate::{ScopeId, ScopeKind};

/// Per-name state stored in a scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Var {
    /// Occurs, binding scope not resolved yet.
    Used,
    /// Bound in this scope.
    Local,
    /// Bound in an enclosing closed scope.
    Nonlocal(ScopeId),
    /// Bound in the global scope. `declared` distinguishes a `global`
    /// statement from a name that resolved to the global scope.
    Global { declared: bool },
}

/// Classification of a name as seen from one scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VarStatus {
    /// The name does not occur in the scope.
    Unknown,
    /// The name occurs but has not been resolved (before `build`).
    Used,
    /// The name is bound in this scope.
    Local,
    /// The name is bound in an enclosing closed scope.
    Nonlocal,
    /// The name is bound in the global scope.
    Global,
    /// The name is bound in the global scope, seen from the global scope:
    /// local and global at once.
    Top,
}

/// A node of the scope tree.
#[derive(Debug)]
pub struct Scope<R> {
    kind: ScopeKind,
    name: Option<Name>,
    parent: Option<ScopeId>,
    vars: FxHashMap<Name, Var>,
    no_walrus: bool,
    nested: SmallVec<[ScopeId; 4]>,
    payload: R,
}

impl<R> Scope<R> {
    fn new(kind: ScopeKind, name: Option<Name>, parent: Option<ScopeId>, payload: R) -> Self {
        Self {
            kind,
            name,
            parent,
            vars: FxHashMap::default(),
            no_walrus: false,
            nested: SmallVec::new(),
            payload,
        }
    }

    #[inline]
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// The scope's own name, for functions and classes.
    #[inline]
    pub fn name(&self) -> Option<Name> {
        self.name
    }

    #[inline]
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Child scopes in the order they were created.
    #[inline]
    pub fn nested(&self) -> &[ScopeId] {
        &self.nested
    }

    /// The opaque payload attached when the scope was created.
    #[inline]
    pub fn payload(&self) -> &R {
        &self.payload
    }

    /// Whether assignment expressions are currently forbidden here.
    #[inline]
    pub fn no_walrus(&self) -> bool {
        self.no_walrus
    }

    #[inline]
    pub(crate) fn var(&self, name: Name) -> Option<Var> {
        self.vars.get(&name).copied()
    }
}

/// Tree of scopes for one compilation unit.
///
/// Scopes live in an arena indexed by [`ScopeId`]; the root is always
/// [`ScopeId::ROOT`], the only scope of kind [`ScopeKind::Global`].
/// `R` is an opaque payload the walker attaches to each scope to find its
/// syntax node again.
#[derive(Debug)]
pub struct ScopeTree<R = ()> {
    scopes: Vec<Scope<R>>,
    built: bool,
}

impl<R> ScopeTree<R> {
    /// Create a tree holding only the global scope.
    pub fn new(payload: R) -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Global, None, None, payload)],
            built: false,
        }
    }

    /// The global scope.
    #[inline]
    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    /// The global scope of the tree containing `id`. Every tree has exactly
    /// one, so this is [`root`](Self::root) for any valid id.
    pub fn global_scope(&self, id: ScopeId) -> ScopeId {
        let mut cur = id;
        while let Some(parent) = self.parent(cur) {
            cur = parent;
        }
        cur
    }

    /// Number of scopes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Always false: a tree has at least its global scope.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Whether [`build`](Self::build) has completed.
    #[inline]
    pub fn is_built(&self) -> bool {
        self.built
    }

    #[inline]
    pub fn scope(&self, id: ScopeId) -> &Scope<R> {
        &self.scopes[id.index()]
    }

    #[inline]
    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope<R> {
        &mut self.scopes[id.index()]
    }

    /// All scope ids, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = ScopeId> + '_ {
        (0u32..).zip(&self.scopes).map(|(i, _)| ScopeId::new(i))
    }

    #[inline]
    pub fn kind(&self, id: ScopeId) -> ScopeKind {
        self.scope(id).kind
    }

    #[inline]
    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scope(id).parent
    }

    #[inline]
    pub fn nested(&self, id: ScopeId) -> &[ScopeId] {
        &self.scope(id).nested
    }

    #[inline]
    pub fn name(&self, id: ScopeId) -> Option<Name> {
        self.scope(id).name
    }

    #[inline]
    pub fn payload(&self, id: ScopeId) -> &R {
        &self.scope(id).payload
    }

    #[inline]
    pub fn payload_mut(&mut self, id: ScopeId) -> &mut R {
        &mut self.scope_mut(id).payload
    }

    /// Nearest closed ancestor of `id`, skipping open scopes.
    pub fn enclosing_closed(&self, id: ScopeId) -> Option<ScopeId> {
        let mut cur = self.parent(id);
        while let Some(s) = cur {
            if self.kind(s).is_closed() {
                return Some(s);
            }
            cur = self.parent(s);
        }
        None
    }

    // Mutation contract

    /// Record a read of `name`. Marks it `Used` if it does not occur yet.
    pub fn load(&mut self, scope: ScopeId, name: Name) {
        self.scope_mut(scope).vars.entry(name).or_insert(Var::Used);
    }

    /// Record a binding of `name`.
    ///
    /// Unknown and used names become local. A name declared global is
    /// stored in the global scope instead; local and nonlocal names are
    /// left unchanged.
    pub fn store(&mut self, scope: ScopeId, name: Name) {
        match self.scope(scope).var(name) {
            None | Some(Var::Used) => {
                self.scope_mut(scope).vars.insert(name, Var::Local);
            }
            Some(Var::Global { .. }) if scope != ScopeId::ROOT => {
                self.store(ScopeId::ROOT, name);
            }
            Some(Var::Global { .. }) => {
                self.scope_mut(scope).vars.insert(name, Var::Local);
            }
            Some(Var::Local | Var::Nonlocal(_)) => {}
        }
    }

    /// Record the target of an assignment expression (`name := value`).
    ///
    /// Inside a comprehension chain the name is bound in the nearest
    /// non-comprehension scope, exactly as a plain `store` there would bind
    /// it, and becomes a free name of the comprehension.
    pub fn store_walrus(&mut self, scope: ScopeId, name: Name) -> BindingResult<()> {
        let fail = |kind| Err(BindingError::new(kind, name, scope));

        let mut target = scope;
        loop {
            let s = self.scope(target);
            if s.no_walrus {
                return fail(BindingErrorKind::WalrusInIterable);
            }
            if s.kind != ScopeKind::Comprehension {
                break;
            }
            if s.var(name) == Some(Var::Local) {
                return fail(BindingErrorKind::WalrusRebindsIterationVar);
            }
            match s.parent {
                Some(parent) => target = parent,
                None => break,
            }
        }

        let target_kind = self.kind(target);
        if target_kind == ScopeKind::Class {
            return fail(BindingErrorKind::WalrusInClassBody);
        }

        if target == scope {
            self.store(scope, name);
            return Ok(());
        }

        tracing::trace!(?scope, ?target, "assignment expression binds in enclosing scope");
        self.store(target, name);
        if target_kind == ScopeKind::Toplevel && self.binding_scope(target, name) == target {
            // Capture search passes through open scopes; record the target here.
            if matches!(self.scope(scope).var(name), None | Some(Var::Used)) {
                self.scope_mut(scope).vars.insert(name, Var::Nonlocal(target));
            }
        } else {
            self.load(scope, name);
        }
        Ok(())
    }

    /// Record a `nonlocal name` declaration.
    ///
    /// The declaration must precede every other occurrence of `name` in the
    /// scope. The target is the nearest enclosing closed scope (class scopes
    /// are skipped) in which `name` is local.
    pub fn add_nonlocal(&mut self, scope: ScopeId, name: Name) -> BindingResult<()> {
        let fail = |kind| Err(BindingError::new(kind, name, scope));

        if !self.kind(scope).captures() {
            return fail(BindingErrorKind::NonlocalAtModuleLevel);
        }
        match self.scope(scope).var(name) {
            Some(Var::Used) => return fail(BindingErrorKind::UsedBeforeNonlocal),
            Some(Var::Local) => return fail(BindingErrorKind::AssignedBeforeNonlocal),
            Some(Var::Global { .. }) => return fail(BindingErrorKind::NonlocalAndGlobal),
            Some(Var::Nonlocal(_)) => return Ok(()),
            None => {}
        }

        let Some(target) = self.find_capture_target(scope, name) else {
            return fail(BindingErrorKind::NonlocalNotFound);
        };
        self.scope_mut(scope).vars.insert(name, Var::Nonlocal(target));
        Ok(())
    }

    /// Record a `global name` declaration.
    ///
    /// Same ordering rule as [`add_nonlocal`](Self::add_nonlocal). The name
    /// also becomes local to the global scope. In the global scope itself
    /// the declaration is a plain store.
    pub fn add_global(&mut self, scope: ScopeId, name: Name) -> BindingResult<()> {
        let fail = |kind| Err(BindingError::new(kind, name, scope));

        if scope == ScopeId::ROOT {
            self.store(scope, name);
            return Ok(());
        }
        match self.scope(scope).var(name) {
            Some(Var::Used) => return fail(BindingErrorKind::UsedBeforeGlobal),
            Some(Var::Local) => return fail(BindingErrorKind::AssignedBeforeGlobal),
            Some(Var::Nonlocal(_)) => return fail(BindingErrorKind::NonlocalAndGlobal),
            Some(Var::Global { .. }) | None => {}
        }

        self.scope_mut(scope)
            .vars
            .insert(name, Var::Global { declared: true });
        self.store(ScopeId::ROOT, name);
        Ok(())
    }

    /// Create a child scope of `parent` and return it.
    ///
    /// Function and class scopes bind their name in `parent`. The child
    /// inherits the parent's no-walrus flag. A global scope can never be
    /// nested, and a toplevel scope only directly below the global scope.
    pub fn nest(
        &mut self,
        parent: ScopeId,
        kind: ScopeKind,
        name: Option<Name>,
        payload: R,
    ) -> BindingResult<ScopeId> {
        let fail = |kind| Err(BindingError::new(kind, name.unwrap_or(Name::EMPTY), parent));

        let misplaced = match kind {
            ScopeKind::Global => true,
            ScopeKind::Toplevel => parent != ScopeId::ROOT,
            _ => false,
        };
        if misplaced {
            return fail(BindingErrorKind::MisplacedScope(kind));
        }
        let Some(id) = next_scope_id(self.scopes.len()) else {
            return fail(BindingErrorKind::ScopeLimit);
        };

        if kind.binds_name() {
            if let Some(name) = name {
                self.store(parent, name);
            }
        }

        let mut scope = Scope::new(kind, name, Some(parent), payload);
        scope.no_walrus = self.scope(parent).no_walrus;
        self.scopes.push(scope);
        self.scope_mut(parent).nested.push(id);
        tracing::trace!(?parent, ?id, %kind, "nested scope");
        Ok(id)
    }

    /// Set or clear the no-walrus flag of `scope`.
    ///
    /// Walkers set it while building the iterable expression of a
    /// comprehension; scopes nested meanwhile inherit it.
    pub fn set_no_walrus(&mut self, scope: ScopeId, on: bool) {
        self.scope_mut(scope).no_walrus = on;
    }

    /// Run `f` with the no-walrus flag of `scope` set, then restore it.
    pub fn with_no_walrus<T>(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.scope(scope).no_walrus;
        self.set_no_walrus(scope, true);
        let result = f(self);
        self.set_no_walrus(scope, previous);
        result
    }

    // Queries

    /// Classification of `name` as seen from `scope`.
    pub fn status(&self, scope: ScopeId, name: Name) -> VarStatus {
        match self.scope(scope).var(name) {
            None => VarStatus::Unknown,
            Some(Var::Used) => VarStatus::Used,
            Some(Var::Local) if scope == ScopeId::ROOT => VarStatus::Top,
            Some(Var::Local) => VarStatus::Local,
            Some(Var::Nonlocal(_)) => VarStatus::Nonlocal,
            Some(Var::Global { .. }) => VarStatus::Global,
        }
    }

    /// Whether `name` was declared `global` in `scope`.
    pub fn is_declared_global(&self, scope: ScopeId, name: Name) -> bool {
        self.scope(scope).var(name) == Some(Var::Global { declared: true })
    }

    /// The scope in which the value of `name`, as seen from `scope`, lives.
    ///
    /// Defined for every name, including names that do not occur in
    /// `scope`: those follow the same rules an unresolved name would.
    pub fn binding_scope(&self, scope: ScopeId, name: Name) -> ScopeId {
        match self.scope(scope).var(name) {
            Some(Var::Local) => scope,
            Some(Var::Nonlocal(target)) => target,
            Some(Var::Global { .. }) => ScopeId::ROOT,
            Some(Var::Used) | None => {
                if scope == ScopeId::ROOT {
                    ScopeId::ROOT
                } else {
                    self.find_capture_target(scope, name)
                        .unwrap_or(ScopeId::ROOT)
                }
            }
        }
    }

    /// Search the enclosing closed scopes of `scope` for one where `name`
    /// is local. Open scopes are passed through; a closed scope that already
    /// binds the name elsewhere, or declares it global, ends the search.
    pub(crate) fn find_capture_target(&self, scope: ScopeId, name: Name) -> Option<ScopeId> {
        let mut cur = self.enclosing_closed(scope);
        while let Some(id) = cur {
            match self.scope(id).var(name) {
                Some(Var::Local) => return Some(id),
                Some(Var::Nonlocal(target)) => return Some(target),
                Some(Var::Global { .. }) => return None,
                _ => {}
            }
            cur = self.enclosing_closed(id);
        }
        None
    }

    /// Names bound in `scope`.
    pub fn locals(&self, scope: ScopeId) -> impl Iterator<Item = Name> + '_ {
        self.scope(scope)
            .vars
            .iter()
            .filter(|(_, var)| **var == Var::Local)
            .map(|(name, _)| *name)
    }

    /// Nonlocal names of `scope` with their binding scopes.
    pub fn nonlocals(&self, scope: ScopeId) -> impl Iterator<Item = (Name, ScopeId)> + '_ {
        self.scope(scope)
            .vars
            .iter()
            .filter_map(|(name, var)| match var {
                Var::Nonlocal(target) => Some((*name, *target)),
                _ => None,
            })
    }

    /// Names of `scope` bound in the global scope (declared or resolved).
    pub fn globals(&self, scope: ScopeId) -> impl Iterator<Item = Name> + '_ {
        self.scope(scope)
            .vars
            .iter()
            .filter(|(_, var)| matches!(var, Var::Global { .. }))
            .map(|(name, _)| *name)
    }

    /// Names of `scope` still waiting for resolution.
    pub fn uses(&self, scope: ScopeId) -> impl Iterator<Item = Name> + '_ {
        self.scope(scope)
            .vars
            .iter()
            .filter(|(_, var)| **var == Var::Used)
            .map(|(name, _)| *name)
    }

    /// Every name occurring in `scope` with its status, ordered by name.
    pub fn classification(&self, scope: ScopeId) -> Vec<(Name, VarStatus)> {
        let mut names: Vec<Name> = self.scope(scope).vars.keys().copied().collect();
        names.sort_unstable();
        names
            .into_iter()
            .map(|name| (name, self.status(scope, name)))
            .collect()
    }
}

/// Id of the scope appended to an arena of `len` scopes, if one fits.
#[inline]
fn next_scope_id(len: usize) -> Option<ScopeId> {
    u32::try_from(len).ok().map(ScopeId::new)
}
