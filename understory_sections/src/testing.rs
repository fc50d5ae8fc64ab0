// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host and adapter for unit tests.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::adapter::SectionAdapter;
use crate::helper::LayoutHost;
use crate::section::SectionConfig;
use crate::types::{SectionData, SectionId, ViewId};

fn view_of(position: usize) -> ViewId {
    ViewId(position as u64)
}

fn position_of(view: ViewId) -> usize {
    usize::try_from(view.0).unwrap()
}

/// A host whose view for position `p` is `ViewId(p)`, recording what gets placed and attached.
#[derive(Debug, Default)]
pub(crate) struct FakeHost {
    item_height: i32,
    width: i32,
    limit: i32,
    pre_layout: bool,
    heights: BTreeMap<usize, i32>,
    removed: BTreeSet<usize>,
    measured_widths: BTreeMap<usize, i32>,
    placed: BTreeMap<usize, (i32, i32, i32, i32)>,
    attached: Vec<usize>,
    disappearing: Vec<usize>,
}

impl FakeHost {
    /// Every item is `item_height` tall; the viewport is `width` by `limit`.
    pub(crate) fn uniform(item_height: i32, width: i32, limit: i32) -> Self {
        Self {
            item_height,
            width,
            limit,
            ..Self::default()
        }
    }

    pub(crate) fn pre_layout(mut self, pre_layout: bool) -> Self {
        self.pre_layout = pre_layout;
        self
    }

    pub(crate) fn set_height(&mut self, position: usize, height: i32) {
        self.heights.insert(position, height);
    }

    /// Report the item at `position` as removed from the adapter.
    pub(crate) fn remove(&mut self, position: usize) {
        self.removed.insert(position);
    }

    pub(crate) fn placed(&self, view: ViewId) -> Option<(i32, i32, i32, i32)> {
        self.placed.get(&position_of(view)).copied()
    }

    pub(crate) fn placed_at(&self, position: usize) -> Option<(i32, i32, i32, i32)> {
        self.placed(view_of(position))
    }

    /// Positions attached as normal views, in attach order.
    pub(crate) fn attached(&self) -> &[usize] {
        &self.attached
    }

    /// Positions attached as disappearing views, in attach order.
    pub(crate) fn disappearing(&self) -> &[usize] {
        &self.disappearing
    }

    fn edges(&self, view: ViewId) -> (i32, i32, i32, i32) {
        self.placed(view).unwrap_or_default()
    }
}

impl LayoutHost for FakeHost {
    fn is_pre_layout(&self) -> bool {
        self.pre_layout
    }

    fn layout_width(&self) -> i32 {
        self.width
    }

    fn layout_limit(&self) -> i32 {
        self.limit
    }

    fn get_view(&mut self, position: usize) -> ViewId {
        view_of(position)
    }

    fn measure(&mut self, view: ViewId, used_width: i32, _used_height: i32) {
        self.measured_widths
            .insert(position_of(view), self.width - used_width);
    }

    fn measured_width(&self, view: ViewId) -> i32 {
        self.measured_widths
            .get(&position_of(view))
            .copied()
            .unwrap_or(0)
    }

    fn measured_height(&self, view: ViewId) -> i32 {
        self.heights
            .get(&position_of(view))
            .copied()
            .unwrap_or(self.item_height)
    }

    fn layout_view(&mut self, view: ViewId, left: i32, top: i32, right: i32, bottom: i32) {
        self.placed
            .insert(position_of(view), (left, top, right, bottom));
    }

    fn left(&self, view: ViewId) -> i32 {
        self.edges(view).0
    }

    fn top(&self, view: ViewId) -> i32 {
        self.edges(view).1
    }

    fn right(&self, view: ViewId) -> i32 {
        self.edges(view).2
    }

    fn bottom(&self, view: ViewId) -> i32 {
        self.edges(view).3
    }

    fn is_removed(&self, view: ViewId) -> bool {
        self.removed.contains(&position_of(view))
    }

    fn add_view(&mut self, view: ViewId, _index: Option<usize>) {
        self.attached.push(position_of(view));
    }

    fn add_disappearing_view(&mut self, view: ViewId, _index: Option<usize>) {
        self.disappearing.push(position_of(view));
    }
}

#[derive(Debug)]
struct FakeSection {
    config: Rc<dyn SectionConfig>,
    position: usize,
    item_count: usize,
    num_children: usize,
    /// Indices of subsections in the adapter's list.
    children: Vec<usize>,
}

/// An adapter serving a fixed list of sections in pre-order.
#[derive(Debug, Default)]
pub(crate) struct FakeAdapter {
    sections: Vec<FakeSection>,
    ids: Vec<SectionId>,
}

impl FakeAdapter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a section; `children` index into the sections appended so far or later.
    pub(crate) fn section(
        mut self,
        config: impl SectionConfig + 'static,
        position: usize,
        item_count: usize,
        num_children: usize,
        children: &[usize],
    ) -> Self {
        self.sections.push(FakeSection {
            config: Rc::new(config),
            position,
            item_count,
            num_children,
            children: children.to_vec(),
        });
        self
    }

    /// Identifier issued for the section added `index`-th by the latest load.
    pub(crate) fn id(&self, index: usize) -> SectionId {
        self.ids[index]
    }

    pub(crate) fn ids(&self) -> &[SectionId] {
        &self.ids
    }
}

impl SectionAdapter for FakeAdapter {
    fn sections(&self) -> Vec<Rc<dyn SectionConfig>> {
        self.sections.iter().map(|s| Rc::clone(&s.config)).collect()
    }

    fn set_section_ids(&mut self, ids: &[SectionId]) {
        self.ids = ids.to_vec();
    }

    fn populate_section(&self, id: SectionId, data: &mut SectionData) {
        let index = self.ids.iter().position(|i| *i == id).unwrap();
        let s = &self.sections[index];
        data.has_header = s.config.has_header();
        data.num_children = s.num_children;
        data.adapter_position = s.position;
        data.item_count = s.item_count;
        data.child_sections
            .extend(s.children.iter().map(|c| self.ids[*c]));
    }
}
