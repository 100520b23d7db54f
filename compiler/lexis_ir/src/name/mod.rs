//! Interned identifiers.

use std::fmt;

/// An identifier occurring in a scope tree.
///
/// A `Name` is the index of its spelling in the
/// [`StringInterner`](crate::StringInterner) that produced it, and is only
/// meaningful together with that interner. Scope and namespace tables key
/// on it directly.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The empty identifier, interned first by every interner. Error
    /// reports use it for anonymous scopes.
    pub const EMPTY: Name = Name(0);

    #[inline]
    pub(crate) const fn from_index(index: u32) -> Self {
        Name(index)
    }

    /// Position of the spelling in the interner's table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}
