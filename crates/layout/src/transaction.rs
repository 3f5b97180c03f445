//! Speculative layout state.
//!
//! Every box keeps three snapshots of its [`BoxState`]:
//!
//! - `working`: what the pagination driver is currently trying.
//! - `marked`: captured at a candidate break point by [`BoxTree::mark_seen`].
//! - `applied`: the last committed state, promoted from `marked` by
//!   [`BoxTree::commit`].
//!
//! [`BoxTree::rollback`] always restores `applied`, never `marked`.

use crate::LayoutError;
use crate::node_kind::NodeKind;
use crate::tree::BoxTree;
use log::trace;
use std::collections::BTreeMap;
use std::sync::Arc;
use tabula_types::{Bounds, BoxId, Micro};

/// Layout state of a single box that pagination may need to undo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxState {
    bounds: Bounds,
    finished: bool,
    active: bool,
    /// Height of the repeated header block per page offset; shared between
    /// snapshots until written.
    header_shifts: Arc<BTreeMap<u32, Micro>>,
}

impl BoxState {
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// True once the box's content has been fully emitted.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn header_shift(&self, page_offset: u32) -> Option<Micro> {
        self.header_shifts.get(&page_offset).copied()
    }

    pub fn header_shifts(&self) -> &BTreeMap<u32, Micro> {
        &self.header_shifts
    }

    fn set_header_shift(&mut self, page_offset: u32, shift: Micro) {
        Arc::make_mut(&mut self.header_shifts).insert(page_offset, shift);
    }
}

/// Three-phase snapshot holder.
#[derive(Debug, Clone, Default)]
pub struct Transactional<S> {
    working: S,
    marked: S,
    applied: S,
}

impl<S: Clone> Transactional<S> {
    pub fn new(initial: S) -> Self {
        Self {
            working: initial.clone(),
            marked: initial.clone(),
            applied: initial,
        }
    }

    pub fn working(&self) -> &S {
        &self.working
    }

    pub fn working_mut(&mut self) -> &mut S {
        &mut self.working
    }

    pub fn marked(&self) -> &S {
        &self.marked
    }

    pub fn applied(&self) -> &S {
        &self.applied
    }

    pub fn mark_seen(&mut self) {
        self.marked = self.working.clone();
    }

    pub fn commit(&mut self) {
        self.applied = self.marked.clone();
    }

    pub fn rollback(&mut self) {
        self.working = self.applied.clone();
    }
}

impl BoxTree {
    pub fn state(&self, id: BoxId) -> Result<&Transactional<BoxState>, LayoutError> {
        Ok(&self.get(id)?.state)
    }

    fn working_mut(&mut self, id: BoxId) -> Result<&mut BoxState, LayoutError> {
        Ok(self.get_mut(id)?.state.working_mut())
    }

    /// Captures the working state of `root` and its subtree as a candidate break point.
    pub fn mark_seen(&mut self, root: BoxId) -> Result<(), LayoutError> {
        for id in self.descendants(root)? {
            self.get_mut(id)?.state.mark_seen();
        }
        Ok(())
    }

    /// Promotes the marked state of the subtree to applied.
    pub fn commit(&mut self, root: BoxId) -> Result<(), LayoutError> {
        for id in self.descendants(root)? {
            self.get_mut(id)?.state.commit();
        }
        trace!("Committed subtree {}.", root);
        Ok(())
    }

    /// Restores the subtree to its last committed state. With `deep_dirty`
    /// every restored box is flagged for re-layout.
    pub fn rollback(&mut self, root: BoxId, deep_dirty: bool) -> Result<(), LayoutError> {
        for id in self.descendants(root)? {
            let node = self.get_mut(id)?;
            node.state.rollback();
            if deep_dirty {
                node.dirty = true;
            }
        }
        trace!("Rolled back subtree {} (deep_dirty: {}).", root, deep_dirty);
        Ok(())
    }

    pub fn bounds(&self, id: BoxId) -> Result<Bounds, LayoutError> {
        Ok(self.state(id)?.working().bounds)
    }

    /// Sets the working bounds; fails once they have been locked.
    pub fn set_bounds(&mut self, id: BoxId, bounds: Bounds) -> Result<(), LayoutError> {
        let state = self.working_mut(id)?;
        state
            .bounds
            .set_rect(bounds.x(), bounds.y(), bounds.width(), bounds.height())?;
        Ok(())
    }

    /// Freezes the working bounds of a box.
    pub fn lock_bounds(&mut self, id: BoxId) -> Result<(), LayoutError> {
        self.working_mut(id)?.bounds.lock();
        Ok(())
    }

    pub fn set_finished(&mut self, id: BoxId, finished: bool) -> Result<(), LayoutError> {
        self.working_mut(id)?.finished = finished;
        Ok(())
    }

    pub fn is_finished(&self, id: BoxId) -> Result<bool, LayoutError> {
        Ok(self.state(id)?.working().finished)
    }

    pub fn set_active(&mut self, id: BoxId, active: bool) -> Result<(), LayoutError> {
        self.working_mut(id)?.active = active;
        Ok(())
    }

    fn expect_section(&self, id: BoxId) -> Result<(), LayoutError> {
        let kind = self.node_kind(id)?;
        if kind != NodeKind::Section {
            return Err(LayoutError::KindMismatch(NodeKind::Section, kind));
        }
        Ok(())
    }

    /// Records how far a repeated header pushes body content down on the page
    /// at `page_offset`.
    pub fn set_header_shift(
        &mut self,
        section: BoxId,
        page_offset: u32,
        shift: Micro,
    ) -> Result<(), LayoutError> {
        self.expect_section(section)?;
        self.working_mut(section)?.set_header_shift(page_offset, shift);
        Ok(())
    }

    pub fn header_shift(&self, section: BoxId, page_offset: u32) -> Result<Option<Micro>, LayoutError> {
        self.expect_section(section)?;
        Ok(self.state(section)?.working().header_shift(page_offset))
    }

    /// The committed header shift, as seen by output consumers.
    pub fn applied_header_shift(
        &self,
        section: BoxId,
        page_offset: u32,
    ) -> Result<Option<Micro>, LayoutError> {
        self.expect_section(section)?;
        Ok(self.state(section)?.applied().header_shift(page_offset))
    }
}
