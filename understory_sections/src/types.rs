// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the section graph: identifiers, event flags, and the population snapshot.

use alloc::vec::Vec;

/// Identifier for a section registered with a [`GraphManager`](crate::GraphManager).
///
/// Identifiers are issued from a counter that only ever increases, starting at `0`.
///
/// ## Semantics
///
/// - Each indexed section receives the next value of the counter.
/// - Removing a section de-indexes it; its identifier is never issued again.
/// - Reloading the graph does not reset the counter, so identifiers from an
///   earlier load are disjoint from the new ones and can never alias a live section.
///
/// Use [`GraphManager::is_indexed`](crate::GraphManager::is_indexed) to check whether an
/// identifier still refers to a live section.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub(crate) u32);

impl SectionId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw integer value of this identifier.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for SectionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "section#{}", self.0)
    }
}

/// Reference to a node in the section tree.
///
/// The root is held by the graph itself and is never indexed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeRef {
    /// The root node spanning the whole adapter space.
    Root,
    /// An indexed section.
    Section(SectionId),
}

impl From<SectionId> for NodeRef {
    fn from(id: SectionId) -> Self {
        Self::Section(id)
    }
}

/// Opaque handle for a view supplied by the [`LayoutHost`](crate::LayoutHost).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ViewId(pub u64);

bitflags::bitflags! {
    /// Flags carried by item change events.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventFlags: u8 {
        /// The change includes the section header position.
        const HEADER = 0b0000_0001;
    }
}

/// Routing data for item change events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventData {
    /// Section the items belong to.
    pub section: SectionId,
    /// Change flags.
    pub flags: EventFlags,
}

impl EventData {
    /// Event touching only content items of `section`.
    pub const fn items(section: SectionId) -> Self {
        Self {
            section,
            flags: EventFlags::empty(),
        }
    }

    /// Event whose range includes the header of `section`.
    pub const fn with_header(section: SectionId) -> Self {
        Self {
            section,
            flags: EventFlags::HEADER,
        }
    }
}

/// Animation tag for a laid out child.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AnimationState {
    /// No animation; attached as a normal view.
    #[default]
    None,
    /// The child is animating in.
    Appearing,
    /// The child is animating out; attached as a disappearing view.
    Disappearing,
}

/// Snapshot filled by [`SectionAdapter::populate_section`](crate::SectionAdapter::populate_section).
///
/// A single instance is reused for every section during a graph load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionData {
    /// Whether the section has a header.
    pub has_header: bool,
    /// Direct children: each item and each subsection counts as one.
    pub num_children: usize,
    /// Identifiers of direct subsections.
    pub child_sections: Vec<SectionId>,
    /// Offset of the section in the adapter space.
    pub adapter_position: usize,
    /// Total positions covered by the section, header and nested items included.
    pub item_count: usize,
}

impl SectionData {
    /// Reset to the empty state, keeping the child buffer's allocation.
    pub fn clear(&mut self) {
        self.has_header = false;
        self.num_children = 0;
        self.child_sections.clear();
        self.adapter_position = 0;
        self.item_count = 0;
    }
}
