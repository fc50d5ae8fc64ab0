// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The adapter contract used to build the section graph.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::section::SectionConfig;
use crate::types::{SectionData, SectionId};

/// Source of section structure for [`GraphManager::load_graph`](crate::GraphManager::load_graph).
pub trait SectionAdapter {
    /// Every section configuration, in pre-order (a section before its subsections).
    fn sections(&self) -> Vec<Rc<dyn SectionConfig>>;

    /// Receive the identifiers issued for [`SectionAdapter::sections`], in the same order.
    ///
    /// The adapter keeps them to address later item events and section edits.
    fn set_section_ids(&mut self, ids: &[SectionId]);

    /// Describe the section `id`.
    ///
    /// `data` arrives cleared. `child_sections` names direct subsections using
    /// identifiers previously passed to [`SectionAdapter::set_section_ids`].
    fn populate_section(&self, id: SectionId, data: &mut SectionData);
}
