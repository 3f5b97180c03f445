//! Identity tokens for nodes of the layout tree.
//!
//! A `BoxId` is a stable index into the box arena. It stays valid for the
//! lifetime of the tree, including for detached subtrees.

use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BoxId(u32);

impl BoxId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The arena slot this id refers to.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for BoxId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
