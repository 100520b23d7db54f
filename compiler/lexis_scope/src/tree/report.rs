//! Rendering and self-checks for scope trees.

use std::fmt::Write;

use lexis_ir::{Name, StringLookup};
use thiserror::Error;

use super::{ScopeTree, Var};
use crate::{ScopeId, ScopeKind};

/// A structural defect found by [`ScopeTree::check_invariants`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("root scope is not the only global scope (found at {0:?})")]
    GlobalNotRoot(ScopeId),
    #[error("scope {scope:?} does not list child {child:?}")]
    ParentMismatch { scope: ScopeId, child: ScopeId },
    #[error("toplevel scope {0:?} is not directly below the global scope")]
    ToplevelNotUnderGlobal(ScopeId),
    #[error("nonlocal {name:?} of scope {scope:?} targets {target:?}, which does not bind it")]
    BadNonlocalTarget {
        scope: ScopeId,
        name: Name,
        target: ScopeId,
    },
    #[error("name {name:?} of scope {scope:?} is still unresolved after build")]
    Unresolved { scope: ScopeId, name: Name },
}

impl<R> ScopeTree<R> {
    /// Dotted path of scope labels from below the root down to `scope`.
    pub fn qualname<L: StringLookup + ?Sized>(&self, scope: ScopeId, lookup: &L, sep: &str) -> String {
        let mut parts = Vec::new();
        let mut cur = Some(scope);
        while let Some(id) = cur {
            if id == ScopeId::ROOT {
                break;
            }
            parts.push(self.label(id, lookup));
            cur = self.parent(id);
        }
        if parts.is_empty() {
            return ScopeKind::Global.label().to_owned();
        }
        parts.reverse();
        parts.join(sep)
    }

    fn label<'a, L: StringLookup + ?Sized>(&self, scope: ScopeId, lookup: &'a L) -> &'a str {
        match self.name(scope) {
            Some(name) => lookup.lookup(name),
            None => self.kind(scope).label(),
        }
    }

    /// Indented report of every scope:
    /// `L=[..]` locals, `NL=[..]` nonlocals, `G=[..]` globals and
    /// `U={name: binding scope}` for every name read in the scope.
    pub fn dump<L: StringLookup + ?Sized>(&self, lookup: &L) -> String {
        let mut out = String::new();
        self.dump_scope(ScopeId::ROOT, 0, lookup, &mut out);
        out
    }

    fn dump_scope<L: StringLookup + ?Sized>(
        &self,
        scope: ScopeId,
        depth: usize,
        lookup: &L,
        out: &mut String,
    ) {
        let sorted = |names: Vec<Name>| {
            let mut names: Vec<&str> = names.into_iter().map(|n| lookup.lookup(n)).collect();
            names.sort_unstable();
            names.join(", ")
        };

        let locals = sorted(self.locals(scope).collect());
        let _ = write!(
            out,
            "{}{}({}): L=[{locals}]",
            "  ".repeat(depth),
            self.kind(scope),
            self.label(scope, lookup),
        );

        let nonlocals = sorted(self.nonlocals(scope).map(|(n, _)| n).collect());
        if !nonlocals.is_empty() {
            let _ = write!(out, "; NL=[{nonlocals}]");
        }
        let globals = sorted(self.globals(scope).collect());
        if !globals.is_empty() {
            let _ = write!(out, "; G=[{globals}]");
        }

        let mut uses: Vec<(&str, String)> = self
            .scope(scope)
            .vars
            .iter()
            .filter(|(_, var)| !matches!(var, Var::Local))
            .map(|(name, _)| {
                let target = self.binding_scope(scope, *name);
                (lookup.lookup(*name), self.qualname(target, lookup, "."))
            })
            .collect();
        uses.sort_unstable();
        let uses: Vec<String> = uses.into_iter().map(|(n, t)| format!("{n}: {t}")).collect();
        let _ = writeln!(out, "; U={{{}}}", uses.join(", "));

        for &child in self.nested(scope) {
            self.dump_scope(child, depth + 1, lookup, out);
        }
    }

    /// Verify the structural invariants of the tree.
    ///
    /// Checks that only the root is global, that parent and child links
    /// agree, that toplevel scopes sit directly below the root, that every
    /// nonlocal target is an ancestor binding the name, and (once built) that
    /// no name is left unresolved.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for id in self.ids() {
            let scope = self.scope(id);
            match (scope.kind, scope.parent) {
                (ScopeKind::Global, None) if id == ScopeId::ROOT => {}
                (ScopeKind::Global, _) | (_, None) => {
                    return Err(InvariantViolation::GlobalNotRoot(id));
                }
                (ScopeKind::Toplevel, Some(parent)) if parent != ScopeId::ROOT => {
                    return Err(InvariantViolation::ToplevelNotUnderGlobal(id));
                }
                (_, Some(parent)) => {
                    if !self.nested(parent).contains(&id) {
                        return Err(InvariantViolation::ParentMismatch {
                            scope: parent,
                            child: id,
                        });
                    }
                }
            }

            for (&name, &var) in &scope.vars {
                match var {
                    Var::Nonlocal(target) => {
                        if !self.is_ancestor(target, id)
                            || self.scope(target).var(name) != Some(Var::Local)
                        {
                            return Err(InvariantViolation::BadNonlocalTarget {
                                scope: id,
                                name,
                                target,
                            });
                        }
                    }
                    Var::Used if self.built => {
                        return Err(InvariantViolation::Unresolved { scope: id, name });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn is_ancestor(&self, ancestor: ScopeId, scope: ScopeId) -> bool {
        let mut cur = self.parent(scope);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }
}
