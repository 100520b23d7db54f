//! Lexis IR - identifier types shared by every lexis phase.
//!
//! Identifiers become `Name(u32)` handles so scope and namespace tables
//! compare and hash them in O(1). Rendering goes through [`StringLookup`],
//! so the trees never hold a concrete interner.

mod interner;
mod name;

pub use interner::{SharedInterner, StringInterner, StringLookup};
pub use name::Name;
