// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section arena: registry, position bookkeeping, and structural edits.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::error::{GraphError, Result};
use crate::section::{SectionLayout, SectionState};
use crate::types::{NodeRef, SectionId};

/// A direct child of a section, addressed by position.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChildSlot {
    /// A leaf item.
    Item {
        /// Adapter position of the item.
        position: usize,
        /// Ordinal of the item among the section's direct children.
        child_index: usize,
    },
    /// A nested section.
    Section(SectionId),
}

/// Outcome of [`SectionTree::remove_items`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemovedItems {
    /// Subsections that fell entirely inside the removed range.
    ///
    /// They are detached from their parent but stay indexed until a section removal names them.
    pub detached: Vec<SectionId>,
    /// True if the range partially covered a subsection and the approximate count was used.
    pub approximate: bool,
}

/// The section tree and its identifier index.
///
/// The tree owns every node. Nodes refer to their subsections by [`SectionId`]
/// and keep a parent link so that size changes reach every ancestor: after any
/// edit, each node's `total_items` equals its header, its own leaf items, and
/// the `total_items` of its subsections.
#[derive(Debug)]
pub struct SectionTree {
    root: SectionState,
    sections: BTreeMap<SectionId, SectionState>,
    next_id: u32,
}

impl SectionTree {
    /// Create an empty tree whose root lays out its content with `root_layout`.
    pub fn new(root_layout: Rc<dyn SectionLayout>) -> Self {
        Self {
            root: SectionState::new(false, root_layout),
            sections: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// The root node.
    pub fn root(&self) -> &SectionState {
        &self.root
    }

    /// Look up a node.
    pub fn node(&self, node: NodeRef) -> Result<&SectionState> {
        match node {
            NodeRef::Root => Ok(&self.root),
            NodeRef::Section(id) => self.section(id),
        }
    }

    /// Look up an indexed section.
    pub fn section(&self, id: SectionId) -> Result<&SectionState> {
        self.sections.get(&id).ok_or(GraphError::UnknownSection(id))
    }

    /// Returns true if `id` refers to an indexed section.
    pub fn is_indexed(&self, id: SectionId) -> bool {
        self.sections.contains_key(&id)
    }

    /// Number of indexed sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if no section is indexed.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Indexed identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.sections.keys().copied()
    }

    /// Access a node that is known to be live; panics on a dangling reference.
    pub(crate) fn expect_node(&self, node: NodeRef) -> &SectionState {
        match node {
            NodeRef::Root => &self.root,
            NodeRef::Section(id) => self.sections.get(&id).expect("dangling SectionId"),
        }
    }

    pub(crate) fn expect_node_mut(&mut self, node: NodeRef) -> &mut SectionState {
        match node {
            NodeRef::Root => &mut self.root,
            NodeRef::Section(id) => self.sections.get_mut(&id).expect("dangling SectionId"),
        }
    }

    pub(crate) fn ensure(&self, node: NodeRef) -> Result<()> {
        self.node(node).map(|_| ())
    }

    // --- registry ---

    /// Index a section under the next identifier.
    pub fn index_section(&mut self, section: SectionState) -> SectionId {
        let id = SectionId::new(self.next_id);
        self.next_id += 1;
        self.sections.insert(id, section);
        id
    }

    /// Remove a section and all of its descendants from the index.
    ///
    /// Identifiers are not recycled. Does not unlink the section from its parent.
    pub fn de_index(&mut self, id: SectionId) -> Result<SectionState> {
        let section = self
            .sections
            .remove(&id)
            .ok_or(GraphError::UnknownSection(id))?;
        let mut pending = section.subsections.clone();
        while let Some(child) = pending.pop() {
            if let Some(removed) = self.sections.remove(&child) {
                pending.extend(removed.subsections);
            }
        }
        Ok(section)
    }

    /// Substitute the node indexed under `id`, returning the previous one.
    pub fn replace(&mut self, id: SectionId, section: SectionState) -> Result<SectionState> {
        let slot = self
            .sections
            .get_mut(&id)
            .ok_or(GraphError::UnknownSection(id))?;
        Ok(core::mem::replace(slot, section))
    }

    /// Drop every indexed section and empty the root.
    ///
    /// The identifier counter is kept so later identifiers stay disjoint from earlier ones.
    pub fn reset(&mut self) {
        self.sections.clear();
        let layout = Rc::clone(&self.root.layout);
        self.root = SectionState::new(false, layout);
    }

    /// Forget the heights and bounds recorded by the previous layout pass.
    pub(crate) fn clear_pass_state(&mut self) {
        for node in core::iter::once(&mut self.root).chain(self.sections.values_mut()) {
            node.height = 0;
            node.bounds = None;
        }
    }

    pub(crate) fn root_mut(&mut self) -> &mut SectionState {
        &mut self.root
    }

    pub(crate) fn section_mut(&mut self, id: SectionId) -> Result<&mut SectionState> {
        self.sections
            .get_mut(&id)
            .ok_or(GraphError::UnknownSection(id))
    }

    // --- positions ---

    /// Move a node to `position`, carrying every descendant by the same delta.
    pub fn set_adapter_position(&mut self, node: NodeRef, position: usize) {
        let current = self.expect_node(node).adapter_position;
        let delta = signed(position) - signed(current);
        self.shift(node, delta);
    }

    fn shift(&mut self, node: NodeRef, delta: isize) {
        if delta == 0 {
            return;
        }
        let children = {
            let n = self.expect_node_mut(node);
            n.adapter_position = n.adapter_position.saturating_add_signed(delta);
            n.subsections.clone()
        };
        for child in children {
            self.shift(NodeRef::Section(child), delta);
        }
    }

    /// Apply a size change of `node` to every ancestor's total.
    fn adjust_ancestor_totals(&mut self, node: NodeRef, delta: isize) {
        let mut current = node;
        while let Some(parent) = self.expect_node(current).parent {
            let p = self.expect_node_mut(parent);
            p.total_items = p.total_items.saturating_add_signed(delta);
            current = parent;
        }
    }

    /// Shift every section ordered after `node` (at each level up to the root) by `delta`.
    fn shift_following(&mut self, node: NodeRef, delta: isize) {
        let mut current = node;
        while let (NodeRef::Section(id), Some(parent)) = (current, self.expect_node(current).parent)
        {
            let siblings = self.expect_node(parent).subsections.clone();
            if let Some(i) = siblings.iter().position(|s| *s == id) {
                for sibling in &siblings[i + 1..] {
                    self.shift(NodeRef::Section(*sibling), delta);
                }
            }
            current = parent;
        }
    }

    fn propagate(&mut self, node: NodeRef, delta: isize) {
        self.adjust_ancestor_totals(node, delta);
        self.shift_following(node, delta);
    }

    // --- item edits ---

    /// Record `count` items inserted at `start`.
    ///
    /// Subsections at or after `start` move back by `count`; the node gains
    /// `count` children. Ancestors grow by the same amount.
    pub fn add_items(&mut self, node: NodeRef, start: usize, count: usize) -> Result<()> {
        self.ensure(node)?;
        if count == 0 {
            return Ok(());
        }
        let delta = signed(count);
        let subsections = self.expect_node(node).subsections.clone();
        for id in subsections {
            if self.expect_node(NodeRef::Section(id)).adapter_position >= start {
                self.shift(NodeRef::Section(id), delta);
            }
        }
        let n = self.expect_node_mut(node);
        n.num_children += count;
        n.total_items += count;
        tracing::trace!(?node, start, count, "items added");
        self.propagate(node, delta);
        Ok(())
    }

    /// Record `count` items removed at `start`.
    ///
    /// Subsections entirely inside `[start, start + count)` are detached and
    /// reported; subsections after the range move forward by `count`.
    ///
    /// The child count drops by the number of detached subsections plus the
    /// positions of the range not accounted for by them. When the range covers
    /// only part of a subsection this is an approximation: with `strict` the
    /// call fails with [`GraphError::AmbiguousRemoval`] and nothing changes,
    /// otherwise every subsection starting inside the range counts as removed.
    pub fn remove_items(
        &mut self,
        node: NodeRef,
        start: usize,
        count: usize,
        strict: bool,
    ) -> Result<RemovedItems> {
        self.ensure(node)?;
        if count == 0 {
            return Ok(RemovedItems::default());
        }
        let end = start + count;
        let subsections = self.expect_node(node).subsections.clone();

        let mut outcome = RemovedItems::default();
        let mut keep = Vec::with_capacity(subsections.len());
        let mut shifted = Vec::new();
        for id in subsections {
            let s = self.expect_node(NodeRef::Section(id));
            let (p, t) = (s.adapter_position, s.total_items);
            if t == 0 {
                if p > start && p < end {
                    outcome.detached.push(id);
                } else {
                    if p >= end {
                        shifted.push(id);
                    }
                    keep.push(id);
                }
            } else if p + t <= start {
                keep.push(id);
            } else if p >= end {
                shifted.push(id);
                keep.push(id);
            } else if p >= start && p + t <= end {
                outcome.detached.push(id);
            } else {
                if strict {
                    return Err(GraphError::AmbiguousRemoval {
                        start,
                        count,
                        section_position: p,
                        section_items: t,
                    });
                }
                outcome.approximate = true;
                if p >= start {
                    outcome.detached.push(id);
                } else {
                    keep.push(id);
                }
            }
        }

        let delta = -signed(count);
        for id in &shifted {
            self.shift(NodeRef::Section(*id), delta);
        }
        let mut removed_items = 0;
        for id in &outcome.detached {
            let s = self.expect_node_mut(NodeRef::Section(*id));
            s.parent = None;
            removed_items += s.total_items;
        }
        let n = self.expect_node_mut(node);
        n.subsections = keep;
        n.total_items = n.total_items.saturating_sub(count);
        n.num_children = n
            .num_children
            .saturating_sub(outcome.detached.len() + count.saturating_sub(removed_items));
        if outcome.approximate {
            tracing::warn!(?node, start, count, "removal partially covers a subsection; child count is approximate");
        } else {
            tracing::trace!(?node, start, count, detached = outcome.detached.len(), "items removed");
        }
        self.propagate(node, delta);
        Ok(outcome)
    }

    // --- section edits ---

    /// Insert the indexed, detached section `child` into `parent` at `position`.
    ///
    /// The child is placed before the first subsection at or after `position`;
    /// those subsections move back by the child's `total_items`.
    pub fn insert_section(
        &mut self,
        parent: NodeRef,
        position: usize,
        child: SectionId,
    ) -> Result<()> {
        self.ensure(parent)?;
        self.section(child)?;
        self.attach_section(parent, position, child);
        Ok(())
    }

    /// [`SectionTree::insert_section`] for a `parent` and `child` known to be live.
    pub(crate) fn attach_section(&mut self, parent: NodeRef, position: usize, child: SectionId) {
        self.set_adapter_position(NodeRef::Section(child), position);
        let total = self.expect_node(NodeRef::Section(child)).total_items;
        let delta = signed(total);

        let subsections = self.expect_node(parent).subsections.clone();
        let mut insert_at = subsections.len();
        for (i, id) in subsections.iter().enumerate() {
            if self.expect_node(NodeRef::Section(*id)).adapter_position >= position {
                insert_at = insert_at.min(i);
                self.shift(NodeRef::Section(*id), delta);
            }
        }
        self.expect_node_mut(NodeRef::Section(child)).parent = Some(parent);
        let p = self.expect_node_mut(parent);
        p.subsections.insert(insert_at, child);
        p.num_children += 1;
        p.total_items += total;
        tracing::trace!(?parent, position, %child, total, "section inserted");
        self.propagate(parent, delta);
    }

    /// Remove `child` from `parent`'s subsections, returning its `total_items`.
    ///
    /// Sibling positions are left as they are: the caller pairs this with
    /// [`SectionTree::close_gap`] or an item removal covering the section.
    pub fn remove_section(&mut self, parent: NodeRef, child: SectionId) -> Result<usize> {
        self.ensure(parent)?;
        let total = self.section(child)?.total_items;
        let p = self.expect_node_mut(parent);
        let Some(i) = p.subsections.iter().position(|s| *s == child) else {
            return Err(GraphError::NotAChild { parent, child });
        };
        p.subsections.remove(i);
        p.total_items = p.total_items.saturating_sub(total);
        p.num_children = p.num_children.saturating_sub(1);
        self.expect_node_mut(NodeRef::Section(child)).parent = None;
        self.adjust_ancestor_totals(parent, -signed(total));
        tracing::trace!(?parent, %child, total, "section removed");
        Ok(total)
    }

    /// Pull everything after a removed range of `count` positions at `position` forward.
    ///
    /// Shifts `parent`'s subsections starting at or after `position + count`
    /// and every section ordered after `parent` further up the tree. Totals are
    /// not touched.
    pub fn close_gap(&mut self, parent: NodeRef, position: usize, count: usize) -> Result<()> {
        self.ensure(parent)?;
        if count == 0 {
            return Ok(());
        }
        let delta = -signed(count);
        let subsections = self.expect_node(parent).subsections.clone();
        for id in subsections {
            if self.expect_node(NodeRef::Section(id)).adapter_position >= position + count {
                self.shift(NodeRef::Section(id), delta);
            }
        }
        self.shift_following(parent, delta);
        Ok(())
    }

    // --- lookups ---

    /// Direct children of `node` in position order.
    pub fn child_slots(&self, node: NodeRef) -> Result<Vec<ChildSlot>> {
        let n = self.node(node)?;
        let mut out = Vec::with_capacity(n.num_children);
        let mut position = n.content_start();
        let end = n.end();
        let mut subsections = n.subsections.iter().peekable();
        loop {
            if let Some(&&id) = subsections.peek() {
                let s = self.expect_node(NodeRef::Section(id));
                if s.adapter_position <= position {
                    out.push(ChildSlot::Section(id));
                    position = position.max(s.end());
                    subsections.next();
                    continue;
                }
            }
            if position >= end {
                break;
            }
            out.push(ChildSlot::Item {
                position,
                child_index: out.len(),
            });
            position += 1;
        }
        Ok(out)
    }

    /// Find the direct child of `node` occupying `position`.
    ///
    /// A subsection starting exactly at `position` is returned as a section
    /// child; anything else is an item.
    pub fn child_at(&self, node: NodeRef, position: usize) -> Result<ChildSlot> {
        let n = self.node(node)?;
        let (start, end) = (n.content_start(), n.end());
        if position < start || position >= end {
            return Err(GraphError::PositionOutOfRange {
                position,
                start,
                end,
            });
        }
        let mut child_index = position - start;
        for &id in &n.subsections {
            let s = self.expect_node(NodeRef::Section(id));
            if s.adapter_position < position {
                // Positions covered by a preceding subsection collapse into one child.
                let covered = s.end().min(position) - s.adapter_position;
                child_index = child_index.saturating_sub(covered) + 1;
            } else if s.adapter_position == position {
                return Ok(ChildSlot::Section(id));
            } else {
                break;
            }
        }
        Ok(ChildSlot::Item {
            position,
            child_index,
        })
    }

    /// Check the structural invariants of every node reachable from the root.
    ///
    /// Each node's header, leaf positions, and subsection ranges must tile
    /// `adapter_position..end` exactly: subsections in order, inside the
    /// content range, never overlapping, with the positions between them
    /// matching the node's leaf count. Returns the first offending node.
    pub fn check_consistency(&self) -> core::result::Result<(), NodeRef> {
        if self.root.adapter_position != 0 || self.root.parent.is_some() {
            return Err(NodeRef::Root);
        }
        let mut pending = alloc::vec![NodeRef::Root];
        while let Some(node) = pending.pop() {
            let n = self.expect_node(node);
            // A headed section covering no positions has nothing to tile yet.
            let mut cursor = n.content_start().min(n.end());
            let mut gaps = 0;
            let mut nested = 0;
            for &id in &n.subsections {
                let Some(s) = self.sections.get(&id) else {
                    return Err(node);
                };
                if s.adapter_position < cursor || s.parent != Some(node) {
                    return Err(node);
                }
                gaps += s.adapter_position - cursor;
                cursor = s.end();
                nested += s.total_items;
                pending.push(NodeRef::Section(id));
            }
            let Some(tail) = n.end().checked_sub(cursor) else {
                return Err(node);
            };
            let leaves = n.num_children.checked_sub(n.subsections.len()).ok_or(node)?;
            let header = usize::from(n.has_header && n.total_items > 0);
            if gaps + tail != leaves || n.total_items != header + leaves + nested {
                return Err(node);
            }
        }
        Ok(())
    }
}

fn signed(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}
