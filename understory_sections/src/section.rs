// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section nodes, section configurations, and the content layout strategy trait.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::Rect;

use crate::helper::LayoutHelper;
use crate::types::{NodeRef, SectionData, SectionId};

/// Content layout strategy of a section (for example linear stacking or a grid).
///
/// Strategies are stateless and shared between sections made from the same
/// configuration. The header, if any, has already been placed by the time
/// [`SectionLayout::do_layout`] runs; `helper` is scoped to the content area
/// with its origin at the top-left corner below the header.
pub trait SectionLayout: Debug {
    /// Lay out the content of `section` and report its extent for this pass.
    ///
    /// Children are obtained through [`LayoutHelper::child_slots`] and
    /// [`LayoutHelper::wrap_slot`]; subsection children recurse through
    /// [`Child::layout`](crate::Child::layout).
    fn do_layout(&self, helper: &mut LayoutHelper<'_>, section: NodeRef) -> ContentExtent;
}

/// What a [`SectionLayout`] laid out during one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContentExtent {
    /// Height consumed by the content.
    pub height: i32,
    /// First adapter position laid out, if any.
    pub head_position: Option<usize>,
    /// Last adapter position laid out, if any.
    pub tail_position: Option<usize>,
}

/// Configuration from which sections are made.
///
/// Implemented by adapters for each kind of section they expose.
pub trait SectionConfig: Debug {
    /// Whether sections made from this configuration show a header.
    fn has_header(&self) -> bool;

    /// Content layout strategy for sections made from this configuration.
    fn layout(&self) -> Rc<dyn SectionLayout>;

    /// Make a fresh, empty section.
    fn make_section(&self) -> SectionState {
        SectionState::new(self.has_header(), self.layout())
    }

    /// Make a section that replaces `old`, carrying its live state forward.
    fn make_section_from(&self, old: &SectionState) -> SectionState {
        SectionState::carried_from(self.has_header(), self.layout(), old)
    }
}

/// A node of the section tree.
///
/// Counters and positions are maintained by [`SectionTree`](crate::SectionTree); the
/// pass-scoped values (`height`, `head_position`, `tail_position`, `bounds`) are
/// only meaningful within the layout pass that produced them.
#[derive(Clone, Debug)]
pub struct SectionState {
    pub(crate) has_header: bool,
    pub(crate) height: i32,
    pub(crate) head_position: usize,
    pub(crate) tail_position: usize,
    pub(crate) num_children: usize,
    pub(crate) total_items: usize,
    pub(crate) adapter_position: usize,
    /// Sorted by `adapter_position`.
    pub(crate) subsections: Vec<SectionId>,
    pub(crate) parent: Option<NodeRef>,
    pub(crate) bounds: Option<Rect>,
    pub(crate) layout: Rc<dyn SectionLayout>,
}

impl SectionState {
    /// Create an empty, detached section.
    pub fn new(has_header: bool, layout: Rc<dyn SectionLayout>) -> Self {
        Self {
            has_header,
            height: 0,
            head_position: 0,
            tail_position: 0,
            num_children: 0,
            total_items: 0,
            adapter_position: 0,
            subsections: Vec::new(),
            parent: None,
            bounds: None,
            layout,
        }
    }

    /// Create a section with a new header flag and strategy but the live state of `old`.
    pub fn carried_from(has_header: bool, layout: Rc<dyn SectionLayout>, old: &Self) -> Self {
        Self {
            has_header,
            height: old.height,
            head_position: old.head_position,
            tail_position: old.tail_position,
            num_children: old.num_children,
            total_items: old.total_items,
            adapter_position: old.adapter_position,
            subsections: old.subsections.clone(),
            parent: old.parent,
            bounds: old.bounds,
            layout,
        }
    }

    /// Whether the section has a header at its adapter position.
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    /// Height from the most recent layout pass.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// First position displayed in the most recent layout pass.
    pub fn head_position(&self) -> usize {
        self.head_position
    }

    /// Last position displayed in the most recent layout pass.
    pub fn tail_position(&self) -> usize {
        self.tail_position
    }

    /// Number of direct children; each subsection counts as one.
    pub fn num_children(&self) -> usize {
        self.num_children
    }

    /// Number of positions covered, including the header and all nested items.
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Offset of this section in the adapter space.
    pub fn adapter_position(&self) -> usize {
        self.adapter_position
    }

    /// Direct subsections in ascending position order.
    pub fn subsections(&self) -> &[SectionId] {
        &self.subsections
    }

    /// Parent node, or `None` for the root and for detached sections.
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent
    }

    /// Host-space bounds from the most recent layout pass, or `None` if that pass did not reach this section.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// The content layout strategy.
    pub fn layout(&self) -> &Rc<dyn SectionLayout> {
        &self.layout
    }

    /// First content position, after the header if there is one.
    pub fn content_start(&self) -> usize {
        self.adapter_position + usize::from(self.has_header)
    }

    /// One past the last position covered by this section.
    pub fn end(&self) -> usize {
        self.adapter_position + self.total_items
    }

    /// Returns true if `position` lies within this section.
    pub fn contains(&self, position: usize) -> bool {
        position >= self.adapter_position && position < self.end()
    }

    /// Reinitialize counters and position from a snapshot, replacing the subsections wholesale.
    ///
    /// The positions of the new subsections are taken as they are.
    pub(crate) fn load(&mut self, data: &SectionData, subsections: Vec<SectionId>) {
        self.num_children = data.num_children;
        self.adapter_position = data.adapter_position;
        self.has_header = data.has_header;
        self.total_items = data.item_count;
        self.subsections = subsections;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LinearLayout;

    fn linear() -> Rc<dyn SectionLayout> {
        Rc::new(LinearLayout)
    }

    #[test]
    fn contains_is_half_open() {
        let mut s = SectionState::new(true, linear());
        s.adapter_position = 4;
        s.total_items = 3;
        assert!(!s.contains(3));
        assert!(s.contains(4));
        assert!(s.contains(6));
        assert!(!s.contains(7));
        assert_eq!(s.content_start(), 5);
    }

    #[test]
    fn empty_section_contains_nothing() {
        let s = SectionState::new(false, linear());
        assert!(!s.contains(0));
    }

    #[test]
    fn carried_state_survives_replacement() {
        let mut old = SectionState::new(false, linear());
        old.adapter_position = 10;
        old.total_items = 7;
        old.num_children = 5;
        old.height = 120;
        old.subsections.push(SectionId::new(3));
        old.parent = Some(NodeRef::Root);

        let new = SectionState::carried_from(true, linear(), &old);
        assert!(new.has_header());
        assert_eq!(new.adapter_position(), 10);
        assert_eq!(new.total_items(), 7);
        assert_eq!(new.num_children(), 5);
        assert_eq!(new.height(), 120);
        assert_eq!(new.subsections(), &[SectionId::new(3)]);
        assert_eq!(new.parent(), Some(NodeRef::Root));
    }

    #[test]
    fn load_replaces_counters_and_children() {
        let mut s = SectionState::new(false, linear());
        s.subsections.push(SectionId::new(9));
        let data = SectionData {
            has_header: true,
            num_children: 2,
            child_sections: Vec::new(),
            adapter_position: 3,
            item_count: 6,
        };
        s.load(&data, alloc::vec![SectionId::new(1)]);
        assert!(s.has_header());
        assert_eq!(s.num_children(), 2);
        assert_eq!(s.adapter_position(), 3);
        assert_eq!(s.total_items(), 6);
        assert_eq!(s.subsections(), &[SectionId::new(1)]);
    }
}
