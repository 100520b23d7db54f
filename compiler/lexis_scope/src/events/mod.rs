//! Occurrence event scripts.
//!
//! A [`ScopeEvent`] list is the flattened trace a walker would produce:
//! every `Nest` opens a child of the current scope and makes it current,
//! every `End` returns to its parent. Replaying a script is the smallest
//! possible walker, used by tests and tools that have no syntax tree.

use lexis_ir::Name;

use crate::error::BindingResult;
use crate::{NullBuilder, ScopeId, ScopeKind, ScopeTree};

/// One name occurrence or structural step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeEvent {
    Load(Name),
    Store(Name),
    StoreWalrus(Name),
    Nonlocal(Name),
    Global(Name),
    /// Open a child of the current scope and enter it.
    Nest {
        kind: ScopeKind,
        name: Option<Name>,
    },
    /// Leave the current scope. Ignored at the scope replay started from.
    End,
    /// Set or clear the no-walrus flag of the current scope.
    NoWalrus(bool),
}

impl<R: Default> ScopeTree<R> {
    /// Apply `events` in order, starting at `start`.
    ///
    /// Returns the scope current after the last event. Nested scopes get
    /// `R::default()` as payload. Stops at the first failing event.
    pub fn replay<I>(&mut self, start: ScopeId, events: I) -> BindingResult<ScopeId>
    where
        I: IntoIterator<Item = ScopeEvent>,
    {
        let mut stack = vec![start];
        let mut current = start;
        for event in events {
            match event {
                ScopeEvent::Load(name) => self.load(current, name),
                ScopeEvent::Store(name) => self.store(current, name),
                ScopeEvent::StoreWalrus(name) => self.store_walrus(current, name)?,
                ScopeEvent::Nonlocal(name) => self.add_nonlocal(current, name)?,
                ScopeEvent::Global(name) => self.add_global(current, name)?,
                ScopeEvent::Nest { kind, name } => {
                    current = self.nest(current, kind, name, R::default())?;
                    stack.push(current);
                }
                ScopeEvent::End => {
                    if stack.len() > 1 {
                        stack.pop();
                    }
                    current = stack.last().copied().unwrap_or(start);
                }
                ScopeEvent::NoWalrus(on) => self.set_no_walrus(current, on),
            }
        }
        Ok(current)
    }
}

impl ScopeTree<()> {
    /// Replay `events` from the root of a fresh tree and build it.
    pub fn from_events<I>(events: I) -> BindingResult<Self>
    where
        I: IntoIterator<Item = ScopeEvent>,
    {
        let mut tree = ScopeTree::new(());
        tree.replay(ScopeId::ROOT, events)?;
        tree.build(&mut NullBuilder)?;
        Ok(tree)
    }
}
