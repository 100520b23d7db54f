//! String interner for identifiers.
//!
//! One table behind a `parking_lot` lock. Reads take the shared lock, so
//! independent scope trees analyzed on separate threads can intern through
//! one [`SharedInterner`] and compare their names.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

struct Table {
    names: FxHashMap<&'static str, Name>,
    /// Spellings indexed by `Name::index`.
    spellings: Vec<&'static str>,
}

/// Maps identifier spellings to [`Name`]s and back.
pub struct StringInterner {
    table: RwLock<Table>,
}

impl StringInterner {
    /// Create an interner holding only [`Name::EMPTY`].
    pub fn new() -> Self {
        let mut names = FxHashMap::default();
        names.insert("", Name::EMPTY);
        StringInterner {
            table: RwLock::new(Table {
                names,
                spellings: vec![""],
            }),
        }
    }

    /// The name of `s`, interning it on first sight.
    ///
    /// # Panics
    /// Panics once more than `u32::MAX` distinct spellings were interned.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(name) = self.get(s) {
            return name;
        }

        let mut table = self.table.write();
        // Another thread may have interned `s` between the two locks.
        if let Some(&name) = table.names.get(s) {
            return name;
        }
        let Ok(index) = u32::try_from(table.spellings.len()) else {
            panic!("interner exceeded {} names", u32::MAX);
        };
        let name = Name::from_index(index);
        let spelling: &'static str = Box::leak(s.to_owned().into_boxed_str());
        table.spellings.push(spelling);
        table.names.insert(spelling, name);
        name
    }

    /// The name of `s`, if it was interned.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().names.get(s).copied()
    }

    /// The spelling of `name`. Names from another interner that are out of
    /// range spell as the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .spellings
            .get(name.index())
            .copied()
            .unwrap_or_default()
    }

    /// Number of interned spellings, the empty one included.
    pub fn len(&self) -> usize {
        self.table.read().spellings.len()
    }

    /// Whether nothing beyond the empty spelling was interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Spells out interned names.
///
/// Scope dumps and error rendering accept any `StringLookup` implementor
/// instead of depending on `StringInterner` directly.
pub trait StringLookup {
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

impl StringLookup for SharedInterner {
    fn lookup(&self, name: Name) -> &str {
        self.0.lookup(name)
    }
}

/// Interner shared by every tree of one analysis session.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
