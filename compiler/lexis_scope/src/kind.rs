//! Scope kinds and scope handles.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Index into a [`ScopeTree`](crate::ScopeTree).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The root (global) scope of every tree.
    pub const ROOT: ScopeId = ScopeId(0);

    /// Create a new `ScopeId` from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index into the tree.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Hash for ScopeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// The kind of a scope.
///
/// Kinds fall into two families:
/// - *open* scopes (`Global`, `Toplevel`, `Class`) are visible to code in
///   their own body but are never a capture target for nested closures;
/// - *closed* scopes (`Function`, `Lambda`, `Comprehension`) take part in
///   closure capture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The root of the tree. Exactly one per compilation unit.
    Global,
    /// Module-level code with its own locals (exec/eval style), directly
    /// below the global scope.
    Toplevel,
    /// Class body.
    Class,
    /// Function body.
    Function,
    /// Lambda expression.
    Lambda,
    /// Comprehension or generator expression.
    Comprehension,
}

impl ScopeKind {
    /// Open scopes: visible to their own body, skipped by closure capture.
    #[inline]
    pub const fn is_open(self) -> bool {
        matches!(self, ScopeKind::Global | ScopeKind::Toplevel | ScopeKind::Class)
    }

    /// Closed scopes: may serve as the capture target of a nested scope.
    #[inline]
    pub const fn is_closed(self) -> bool {
        !self.is_open()
    }

    /// Whether unresolved names in this scope may be captured from an
    /// enclosing closed scope. Only module-level scopes never capture.
    #[inline]
    pub const fn captures(self) -> bool {
        !matches!(self, ScopeKind::Global | ScopeKind::Toplevel)
    }

    /// Whether creating a scope of this kind binds its name in the parent.
    #[inline]
    pub const fn binds_name(self) -> bool {
        matches!(self, ScopeKind::Function | ScopeKind::Class)
    }

    /// Label used for scopes without a name of their own.
    pub const fn label(self) -> &'static str {
        match self {
            ScopeKind::Global => "<globals>",
            ScopeKind::Toplevel => "<toplevel>",
            ScopeKind::Class => "<class>",
            ScopeKind::Function => "<function>",
            ScopeKind::Lambda => "<lambda>",
            ScopeKind::Comprehension => "<comprehension>",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScopeKind::Global => "global",
            ScopeKind::Toplevel => "toplevel",
            ScopeKind::Class => "class",
            ScopeKind::Function => "function",
            ScopeKind::Lambda => "lambda",
            ScopeKind::Comprehension => "comprehension",
        };
        f.write_str(s)
    }
}
