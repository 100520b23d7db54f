//! Value cells and the builtins mapping.

#![expect(
    clippy::disallowed_types,
    reason = "Rc is the copy-on-write storage of Builtins"
)]

use std::rc::Rc;

use lexis_ir::Name;
use rustc_hash::FxHashMap;

/// A value cell for one name in one namespace.
///
/// Unbound is distinct from holding any value. A binding is created unbound
/// when its namespace is created and is never removed from it; deleting the
/// name only unbinds it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding<V> {
    value: Option<V>,
}

impl<V> Binding<V> {
    /// An empty cell.
    #[inline]
    pub const fn unbound() -> Self {
        Binding { value: None }
    }

    #[inline]
    pub fn bound(value: V) -> Self {
        Binding { value: Some(value) }
    }

    /// Bind `value`, returning the previous value if there was one.
    #[inline]
    pub fn bind(&mut self, value: V) -> Option<V> {
        self.value.replace(value)
    }

    /// Unbind the cell, returning the value it held.
    #[inline]
    pub fn unbind(&mut self) -> Option<V> {
        self.value.take()
    }

    #[inline]
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.value.is_some()
    }
}

impl<V> Default for Binding<V> {
    fn default() -> Self {
        Self::unbound()
    }
}

/// Read-only name to value mapping consulted after the global namespace.
///
/// Cloning is cheap: clones share one map until one of them is modified,
/// which copies it first. Several module namespaces can therefore start from
/// the same builtins, and a module patching its own copy does not affect the
/// others.
#[derive(Debug)]
pub struct Builtins<V> {
    values: Rc<FxHashMap<Name, V>>,
}

impl<V> Builtins<V> {
    pub fn new() -> Self {
        Builtins {
            values: Rc::new(FxHashMap::default()),
        }
    }

    #[inline]
    pub fn get(&self, name: Name) -> Option<&V> {
        self.values.get(&name)
    }

    #[inline]
    pub fn contains(&self, name: Name) -> bool {
        self.values.contains_key(&name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &V)> + '_ {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    /// Whether both mappings still share the same storage.
    pub fn shares_storage_with(&self, other: &Builtins<V>) -> bool {
        Rc::ptr_eq(&self.values, &other.values)
    }
}

impl<V: Clone> Builtins<V> {
    /// Add or replace an entry, copying shared storage first.
    pub fn insert(&mut self, name: Name, value: V) -> Option<V> {
        Rc::make_mut(&mut self.values).insert(name, value)
    }

    /// Remove an entry, copying shared storage first.
    pub fn remove(&mut self, name: Name) -> Option<V> {
        if !self.contains(name) {
            return None;
        }
        Rc::make_mut(&mut self.values).remove(&name)
    }
}

impl<V> Clone for Builtins<V> {
    fn clone(&self) -> Self {
        Builtins {
            values: Rc::clone(&self.values),
        }
    }
}

impl<V> Default for Builtins<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(Name, V)> for Builtins<V> {
    fn from_iter<I: IntoIterator<Item = (Name, V)>>(iter: I) -> Self {
        Builtins {
            values: Rc::new(iter.into_iter().collect()),
        }
    }
}
