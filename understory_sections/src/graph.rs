// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The graph manager: section registry, item events, deferred section edits, and the layout driver.

use alloc::collections::BTreeSet;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::Rect;

use crate::adapter::SectionAdapter;
use crate::child::ChildPool;
use crate::error::Result;
use crate::helper::{LayoutHelper, LayoutHost};
use crate::layout::LinearLayout;
use crate::options::GraphOptions;
use crate::section::{SectionConfig, SectionLayout, SectionState};
use crate::tree::{ChildSlot, RemovedItems, SectionTree};
use crate::types::{EventData, EventFlags, NodeRef, SectionData, SectionId};

/// A section removal recorded for the next post-pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingRemoval {
    section: SectionId,
    parent: NodeRef,
    position: usize,
}

/// A section update recorded for the next post-pass.
#[derive(Clone, Debug)]
struct PendingUpdate {
    section: SectionId,
    config: Rc<dyn SectionConfig>,
}

/// What a call to [`GraphManager::layout`] did besides laying out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Whether the pass was a speculative pre-pass.
    pub pre_layout: bool,
    /// Deferred updates applied before the descent.
    pub updates_applied: usize,
    /// Deferred removals applied after the descent.
    pub removals_applied: usize,
    /// Deferred edits dropped because they named sections no longer in the graph.
    pub edits_skipped: usize,
}

/// Child wrapper pool counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Wrappers created because none were free.
    pub allocated: usize,
    /// Wrappers handed out again after release.
    pub reused: usize,
    /// Wrappers currently free.
    pub idle: usize,
}

/// Owner of the section tree and its identifier index.
///
/// External events address sections by [`SectionId`]. Item events are applied
/// immediately; section removals and updates are queued and applied by the
/// next post-pass of [`GraphManager::layout`]: updates before the descent,
/// removals after it.
///
/// ## Lifecycle
///
/// A new manager holds an empty root. [`GraphManager::load_graph`] builds the
/// tree from an adapter; reloading discards every section and queued edit and
/// rebuilds from scratch. There is no teardown beyond dropping the manager.
#[derive(Debug)]
pub struct GraphManager {
    tree: SectionTree,
    removals: Vec<PendingRemoval>,
    updates: Vec<PendingUpdate>,
    options: GraphOptions,
    pool: RefCell<ChildPool>,
    open: Cell<usize>,
}

impl Default for GraphManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphManager {
    /// Create an empty graph with default options.
    pub fn new() -> Self {
        Self::with_options(GraphOptions::default())
    }

    /// Create an empty graph with the given options.
    pub fn with_options(options: GraphOptions) -> Self {
        Self {
            tree: SectionTree::new(Rc::new(LinearLayout)),
            removals: Vec::new(),
            updates: Vec::new(),
            options,
            pool: RefCell::new(ChildPool::new(options.pool_capacity)),
            open: Cell::new(0),
        }
    }

    /// Lay out the top-level sections with `layout` instead of stacking them.
    pub fn with_root_layout(mut self, layout: Rc<dyn SectionLayout>) -> Self {
        self.tree.root_mut().layout = layout;
        self
    }

    /// The options in effect.
    pub fn options(&self) -> GraphOptions {
        self.options
    }

    /// The section tree.
    pub fn tree(&self) -> &SectionTree {
        &self.tree
    }

    /// The root node.
    pub fn root(&self) -> &SectionState {
        self.tree.root()
    }

    /// Look up a live section.
    pub fn section(&self, id: SectionId) -> Result<&SectionState> {
        self.tree.section(id)
    }

    /// Returns true if `id` refers to a live section.
    pub fn is_indexed(&self, id: SectionId) -> bool {
        self.tree.is_indexed(id)
    }

    /// Number of section edits waiting for the next post-pass.
    pub fn pending_edits(&self) -> usize {
        self.removals.len() + self.updates.len()
    }

    /// Counters of the child wrapper pool.
    pub fn pool_stats(&self) -> PoolStats {
        let pool = self.pool.borrow();
        PoolStats {
            allocated: pool.allocated(),
            reused: pool.reused(),
            idle: pool.idle(),
        }
    }

    /// Layout sub-contexts still held; zero whenever no pass is running.
    pub fn open_subsections(&self) -> usize {
        self.open.get()
    }

    /// Sections laid out by the last pass whose bounds overlap `viewport`, in identifier order.
    pub fn sections_in(&self, viewport: Rect) -> Vec<SectionId> {
        self.tree
            .ids()
            .filter(|id| {
                self.tree
                    .expect_node(NodeRef::Section(*id))
                    .bounds()
                    .is_some_and(|b| b.overlaps(viewport))
            })
            .collect()
    }

    // --- graph load ---

    /// Discard the current graph and build a new one from `adapter`.
    ///
    /// Every configuration returned by [`SectionAdapter::sections`] becomes a
    /// section with a new identifier; the identifiers are handed back through
    /// [`SectionAdapter::set_section_ids`]. Each section is then populated and
    /// linked to its subsections. Sections no other section claims become
    /// children of the root.
    pub fn load_graph(&mut self, adapter: &mut dyn SectionAdapter) {
        self.tree.reset();
        self.removals.clear();
        self.updates.clear();

        let configs = adapter.sections();
        let ids: Vec<SectionId> = configs
            .iter()
            .map(|config| self.tree.index_section(config.make_section()))
            .collect();
        adapter.set_section_ids(&ids);

        let mut data = SectionData::default();
        let mut links = Vec::with_capacity(ids.len());
        for &id in &ids {
            data.clear();
            adapter.populate_section(id, &mut data);
            self.tree
                .expect_node_mut(NodeRef::Section(id))
                .load(&data, Vec::new());
            links.push((id, core::mem::take(&mut data.child_sections)));
        }

        // Pre-order: a subsection is always issued after its parent, which also rules out cycles.
        let mut claimed = BTreeSet::new();
        for (id, children) in links {
            let mut subsections = Vec::with_capacity(children.len());
            for child in children {
                if child <= id || !self.tree.is_indexed(child) || !claimed.insert(child) {
                    tracing::warn!(section = %id, %child, "ignoring invalid subsection link");
                    continue;
                }
                subsections.push(child);
            }
            self.link(NodeRef::Section(id), subsections);
        }

        let top: Vec<SectionId> = ids
            .iter()
            .copied()
            .filter(|id| !claimed.contains(id))
            .collect();
        let root = SectionData {
            has_header: false,
            num_children: top.len(),
            child_sections: Vec::new(),
            adapter_position: 0,
            item_count: top
                .iter()
                .map(|id| self.tree.expect_node(NodeRef::Section(*id)).total_items())
                .sum(),
        };
        self.tree.root_mut().load(&root, Vec::new());
        self.link(NodeRef::Root, top);
        tracing::debug!(sections = ids.len(), total_items = root.item_count, "graph loaded");
    }

    /// Make `children` the subsections of `node`, ordered by position.
    fn link(&mut self, node: NodeRef, mut children: Vec<SectionId>) {
        children.sort_by_key(|c| self.tree.expect_node(NodeRef::Section(*c)).adapter_position());
        for &child in &children {
            self.tree.expect_node_mut(NodeRef::Section(child)).parent = Some(node);
        }
        self.tree.expect_node_mut(node).subsections = children;
    }

    // --- section events ---

    /// Add an empty section made from `config` to `parent` at `position` and return its identifier.
    ///
    /// The section covers no positions yet, so it starts without a header.
    /// Its items, and its header if `config` has one, are announced through
    /// [`GraphManager::add_items`] with [`EventFlags::HEADER`].
    pub fn section_added(
        &mut self,
        parent: NodeRef,
        position: usize,
        config: &dyn SectionConfig,
    ) -> Result<SectionId> {
        self.tree.ensure(parent)?;
        let mut section = config.make_section();
        section.has_header = false;
        let id = self.tree.index_section(section);
        self.tree.attach_section(parent, position, id);
        tracing::debug!(?parent, position, section = %id, "section added");
        Ok(id)
    }

    /// Record that `section`, previously at `position` in `parent`, was removed.
    ///
    /// Nothing changes until the next post-pass. The gap is closed at the
    /// section's position at that time, which item events in between may have
    /// moved away from `position`.
    pub fn queue_section_removed(&mut self, section: SectionId, parent: NodeRef, position: usize) {
        self.removals.push(PendingRemoval {
            section,
            parent,
            position,
        });
    }

    /// Record that `section` should be rebuilt from `config`, keeping its live state.
    ///
    /// Nothing changes until the next post-pass. Positions and totals are kept
    /// as they are. If `config` adds a header, the section's first position
    /// becomes the header and stops counting as a child; that position must be
    /// a leaf, otherwise the section stays headerless. If `config` drops the
    /// header, the former header position becomes a leaf child.
    pub fn queue_section_updated(&mut self, section: SectionId, config: Rc<dyn SectionConfig>) {
        self.updates.push(PendingUpdate { section, config });
    }

    // --- item events ---

    /// Apply `count` items inserted at `start` in `event.section`.
    ///
    /// With [`EventFlags::HEADER`], the range includes a newly added header:
    /// the section gains a header and the header is not counted as a child.
    pub fn add_items(&mut self, event: EventData, start: usize, count: usize) -> Result<()> {
        let node = NodeRef::Section(event.section);
        self.tree.add_items(node, start, count)?;
        if event.flags.contains(EventFlags::HEADER) && count > 0 {
            let n = self.tree.expect_node_mut(node);
            if !n.has_header {
                n.has_header = true;
                n.num_children = n.num_children.saturating_sub(1);
            }
        }
        Ok(())
    }

    /// Apply `count` items removed at `start` from `event.section`.
    ///
    /// With [`EventFlags::HEADER`], the range includes the section's header,
    /// which is dropped. Subsections inside the range are detached and
    /// returned; they stay indexed until a queued removal names them.
    pub fn remove_items(
        &mut self,
        event: EventData,
        start: usize,
        count: usize,
    ) -> Result<RemovedItems> {
        let node = NodeRef::Section(event.section);
        let removed = self
            .tree
            .remove_items(node, start, count, self.options.strict_removals)?;
        if event.flags.contains(EventFlags::HEADER) && count > 0 {
            let n = self.tree.expect_node_mut(node);
            if n.has_header {
                n.has_header = false;
                n.num_children += 1;
            }
        }
        Ok(removed)
    }

    /// Move one item from `from_position` in `from` to `to_position` in `to`.
    ///
    /// Applied as a removal followed by an insertion, so `to_position` is read
    /// after the removal took effect. Header flags play no part in a move.
    pub fn move_items(
        &mut self,
        from: SectionId,
        from_position: usize,
        to: SectionId,
        to_position: usize,
    ) -> Result<()> {
        self.tree.section(from)?;
        self.tree.section(to)?;
        self.remove_items(EventData::items(from), from_position, 1)?;
        self.add_items(EventData::items(to), to_position, 1)
    }

    // --- layout ---

    /// Run one layout pass against `host`.
    ///
    /// A post-pass applies queued updates, lays out the tree from the root
    /// across the host's full width, then applies queued removals. A pre-pass
    /// only lays out.
    pub fn layout(&mut self, host: &mut dyn LayoutHost) -> PassSummary {
        let pre_layout = host.is_pre_layout();
        let mut summary = PassSummary {
            pre_layout,
            ..PassSummary::default()
        };
        tracing::debug!(pre_layout, pending = self.pending_edits(), "layout pass started");

        if !pre_layout {
            self.apply_updates(&mut summary);
        }
        self.tree.clear_pass_state();
        {
            let mut helper = LayoutHelper::new(host, &mut self.tree, &self.pool, &self.open);
            let width = helper.layout_width();
            helper.layout_section(NodeRef::Root, 0, 0, width);
        }
        if !pre_layout {
            self.apply_removals(&mut summary);
        }

        tracing::debug!(
            pre_layout,
            height = self.tree.root().height(),
            updates = summary.updates_applied,
            removals = summary.removals_applied,
            skipped = summary.edits_skipped,
            "layout pass finished"
        );
        summary
    }

    fn apply_updates(&mut self, summary: &mut PassSummary) {
        for update in core::mem::take(&mut self.updates) {
            let Ok(old) = self.tree.section(update.section) else {
                tracing::warn!(section = %update.section, "skipping update of a removed section");
                summary.edits_skipped += 1;
                continue;
            };
            let mut replacement = update.config.make_section_from(old);
            match (old.has_header, replacement.has_header) {
                (false, true) => {
                    let first = self
                        .tree
                        .child_at(NodeRef::Section(update.section), old.adapter_position);
                    if matches!(first, Ok(ChildSlot::Item { .. })) {
                        replacement.num_children = replacement.num_children.saturating_sub(1);
                    } else {
                        tracing::warn!(section = %update.section, "no leaf to turn into a header; keeping the section headerless");
                        replacement.has_header = false;
                    }
                }
                (true, false) => replacement.num_children += 1,
                _ => {}
            }
            if self.tree.replace(update.section, replacement).is_ok() {
                summary.updates_applied += 1;
            }
        }
    }

    fn apply_removals(&mut self, summary: &mut PassSummary) {
        for removal in core::mem::take(&mut self.removals) {
            let PendingRemoval {
                section,
                parent,
                position,
            } = removal;
            let (linked, current) = match self.tree.section(section) {
                Ok(s) => (s.parent(), s.adapter_position()),
                Err(_) => {
                    tracing::warn!(%section, "skipping removal of an unknown section");
                    summary.edits_skipped += 1;
                    continue;
                }
            };
            match linked {
                // Already detached by an item removal covering it.
                None => {}
                Some(actual) if actual == parent => {
                    // Edits since the removal was queued may have moved the section.
                    if current != position {
                        tracing::debug!(%section, queued = position, current, "section moved since its removal was queued");
                    }
                    let closed = self
                        .tree
                        .remove_section(parent, section)
                        .and_then(|total| self.tree.close_gap(parent, current, total));
                    if let Err(err) = closed {
                        tracing::warn!(%section, %err, "skipping removal");
                        summary.edits_skipped += 1;
                        continue;
                    }
                }
                Some(actual) => {
                    tracing::warn!(%section, ?parent, ?actual, "skipping removal naming the wrong parent");
                    summary.edits_skipped += 1;
                    continue;
                }
            }
            if self.tree.de_index(section).is_ok() {
                summary.removals_applied += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::error::GraphError;
    use crate::layout::{GridSectionConfig, LinearSectionConfig};
    use crate::testing::{FakeAdapter, FakeHost};

    /// Top-level A (header, 2 items, subsection B, 1 item) and top-level C (2 items, no header).
    ///
    /// A covers 0..7 with B (header, 2 items) at 3..6; C covers 7..9.
    fn sample() -> (GraphManager, FakeAdapter) {
        let mut adapter = FakeAdapter::new()
            .section(LinearSectionConfig::new(true), 0, 7, 4, &[1])
            .section(LinearSectionConfig::new(true), 3, 3, 2, &[])
            .section(LinearSectionConfig::new(false), 7, 2, 2, &[]);
        let mut graph = GraphManager::with_options(GraphOptions::default().with_strict_removals(true));
        graph.load_graph(&mut adapter);
        (graph, adapter)
    }

    fn snapshot(graph: &GraphManager, ids: &[SectionId]) -> Vec<(usize, usize, usize, usize)> {
        ids.iter()
            .map(|id| {
                let s = graph.section(*id).unwrap();
                (
                    s.adapter_position(),
                    s.total_items(),
                    s.num_children(),
                    s.subsections().len(),
                )
            })
            .collect()
    }

    #[test]
    fn load_builds_tree_from_adapter() {
        let (graph, adapter) = sample();
        let (a, b, c) = (adapter.id(0), adapter.id(1), adapter.id(2));
        assert_eq!(graph.root().subsections(), &[a, c]);
        assert_eq!(graph.root().total_items(), 9);
        assert_eq!(graph.root().num_children(), 2);
        assert_eq!(graph.section(a).unwrap().subsections(), &[b]);
        assert_eq!(graph.section(b).unwrap().parent(), Some(NodeRef::Section(a)));
        assert_eq!(graph.tree().check_consistency(), Ok(()));
    }

    #[test]
    fn reload_is_idempotent_with_fresh_ids() {
        let (mut graph, mut adapter) = sample();
        let first = adapter.ids().to_vec();
        let before = snapshot(&graph, &first);

        graph.load_graph(&mut adapter);
        let second = adapter.ids().to_vec();
        assert_eq!(snapshot(&graph, &second), before);
        assert!(first.iter().all(|id| !second.contains(id)));
        assert!(first.iter().all(|id| !graph.is_indexed(*id)));
    }

    #[test]
    fn section_added_issues_a_fresh_id() {
        let (mut graph, adapter) = sample();
        let a = adapter.id(0);
        let id = graph
            .section_added(NodeRef::Section(a), 6, &LinearSectionConfig::new(false))
            .unwrap();
        assert!(!adapter.ids().contains(&id));
        let s = graph.section(id).unwrap();
        assert_eq!((s.adapter_position(), s.total_items()), (6, 0));
        assert_eq!(graph.section(a).unwrap().num_children(), 5);
        assert_eq!(graph.section(a).unwrap().total_items(), 7);
        assert_eq!(graph.tree().check_consistency(), Ok(()));
    }

    #[test]
    fn section_added_to_unknown_parent_fails() {
        let (mut graph, adapter) = sample();
        let a = adapter.id(0);
        let b = adapter.id(1);
        graph.queue_section_removed(a, NodeRef::Root, 0);
        let mut host = FakeHost::uniform(10, 100, 500);
        graph.layout(&mut host);
        assert!(!graph.is_indexed(b));
        let err = graph
            .section_added(NodeRef::Section(b), 0, &LinearSectionConfig::new(false))
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownSection(b));
        assert_eq!(graph.tree().len(), 1);
    }

    #[test]
    fn queued_removal_waits_for_a_post_pass() {
        let (mut graph, adapter) = sample();
        let (a, b, c) = (adapter.id(0), adapter.id(1), adapter.id(2));
        graph.queue_section_removed(b, NodeRef::Section(a), 3);
        assert!(graph.is_indexed(b));
        assert_eq!(graph.section(a).unwrap().total_items(), 7);

        let mut host = FakeHost::uniform(10, 100, 500).pre_layout(true);
        let summary = graph.layout(&mut host);
        assert_eq!(summary.removals_applied, 0);
        assert!(graph.is_indexed(b));

        let mut host = FakeHost::uniform(10, 100, 500);
        let summary = graph.layout(&mut host);
        assert_eq!(summary.removals_applied, 1);
        assert_eq!(graph.section(b).unwrap_err(), GraphError::UnknownSection(b));
        let parent = graph.section(a).unwrap();
        assert_eq!((parent.total_items(), parent.num_children()), (4, 3));
        assert_eq!(graph.section(c).unwrap().adapter_position(), 4);
        assert_eq!(graph.root().total_items(), 6);
        assert_eq!(graph.pending_edits(), 0);
        assert_eq!(graph.tree().check_consistency(), Ok(()));
    }

    #[test]
    fn removal_after_item_removal_only_de_indexes() {
        let (mut graph, adapter) = sample();
        let (a, b, c) = (adapter.id(0), adapter.id(1), adapter.id(2));
        let removed = graph.remove_items(EventData::items(a), 3, 3).unwrap();
        assert_eq!(removed.detached, vec![b]);
        assert_eq!(graph.section(c).unwrap().adapter_position(), 4);

        graph.queue_section_removed(b, NodeRef::Section(a), 3);
        let summary = graph.layout(&mut FakeHost::uniform(10, 100, 500));
        assert_eq!(summary.removals_applied, 1);
        assert!(!graph.is_indexed(b));
        assert_eq!(graph.section(c).unwrap().adapter_position(), 4);
        assert_eq!(graph.tree().check_consistency(), Ok(()));
    }

    #[test]
    fn stale_edits_are_skipped() {
        let (mut graph, adapter) = sample();
        let stale = adapter.id(1);
        let mut adapter = adapter;
        graph.load_graph(&mut adapter);
        graph.queue_section_removed(stale, NodeRef::Root, 0);
        graph.queue_section_updated(stale, Rc::new(LinearSectionConfig::new(false)));
        let summary = graph.layout(&mut FakeHost::uniform(10, 100, 500));
        assert_eq!(summary.edits_skipped, 2);
        assert_eq!(graph.tree().len(), 3);
    }

    #[test]
    fn updates_swap_strategy_and_keep_state() {
        let (mut graph, adapter) = sample();
        let c = adapter.id(2);
        graph.queue_section_updated(c, Rc::new(GridSectionConfig::new(false, 2)));
        let mut host = FakeHost::uniform(10, 100, 500);
        let summary = graph.layout(&mut host);
        assert_eq!(summary.updates_applied, 1);

        let s = graph.section(c).unwrap();
        assert_eq!((s.adapter_position(), s.total_items()), (7, 2));
        // A is 70 high; C's two items now share a row.
        assert_eq!(host.placed_at(7), Some((0, 70, 50, 80)));
        assert_eq!(host.placed_at(8), Some((50, 70, 100, 80)));
        assert_eq!(s.height(), 10);
    }

    #[test]
    fn layout_places_every_position_in_order() {
        let (mut graph, _) = sample();
        let mut host = FakeHost::uniform(10, 100, 500);
        let summary = graph.layout(&mut host);
        assert!(!summary.pre_layout);
        assert_eq!(host.attached(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(host.placed_at(4), Some((0, 40, 100, 50)));
        assert_eq!(graph.root().height(), 90);
        assert_eq!(graph.open_subsections(), 0);
    }

    #[test]
    fn sections_in_reports_visible_sections() {
        let (mut graph, adapter) = sample();
        let (a, b, c) = (adapter.id(0), adapter.id(1), adapter.id(2));
        graph.layout(&mut FakeHost::uniform(10, 100, 500));
        assert_eq!(graph.section(b).unwrap().bounds(), Some(Rect::new(0.0, 30.0, 100.0, 60.0)));
        assert_eq!(graph.sections_in(Rect::new(0.0, 0.0, 100.0, 20.0)), vec![a]);
        assert_eq!(graph.sections_in(Rect::new(0.0, 35.0, 100.0, 40.0)), vec![a, b]);
        assert_eq!(graph.sections_in(Rect::new(0.0, 75.0, 100.0, 200.0)), vec![c]);
    }

    #[test]
    fn short_viewport_skips_later_sections() {
        let (mut graph, adapter) = sample();
        let c = adapter.id(2);
        let mut host = FakeHost::uniform(10, 100, 25);
        graph.layout(&mut host);
        assert_eq!(host.attached(), &[0, 1, 2]);
        assert_eq!(graph.root().tail_position(), 2);
        assert!(graph.sections_in(Rect::new(0.0, 0.0, 100.0, 1000.0)).iter().all(|id| *id != c));
    }

    #[test]
    fn wrappers_are_reused_across_passes() {
        let (mut graph, _) = sample();
        let mut host = FakeHost::uniform(10, 100, 500);
        graph.layout(&mut host);
        let first = graph.pool_stats();
        graph.layout(&mut host);
        let second = graph.pool_stats();
        assert_eq!(second.allocated, first.allocated);
        assert!(second.reused > first.reused);
    }

    #[test]
    fn header_flag_adds_and_drops_the_header() {
        let (mut graph, adapter) = sample();
        let c = adapter.id(2);
        graph.add_items(EventData::with_header(c), 7, 1).unwrap();
        let s = graph.section(c).unwrap();
        assert!(s.has_header());
        assert_eq!((s.total_items(), s.num_children()), (3, 2));
        assert_eq!(graph.tree().check_consistency(), Ok(()));

        graph.remove_items(EventData::with_header(c), 7, 1).unwrap();
        let s = graph.section(c).unwrap();
        assert!(!s.has_header());
        assert_eq!((s.total_items(), s.num_children()), (2, 2));
        assert_eq!(graph.tree().check_consistency(), Ok(()));
    }

    #[test]
    fn move_items_is_remove_then_add() {
        let (mut graph, adapter) = sample();
        let (a, c) = (adapter.id(0), adapter.id(2));
        // Last item of A (position 6) moves to the end of C, which now starts at 6.
        graph.move_items(a, 6, c, 8).unwrap();
        assert_eq!(graph.section(a).unwrap().total_items(), 6);
        let s = graph.section(c).unwrap();
        assert_eq!((s.adapter_position(), s.total_items()), (6, 3));
        assert_eq!(graph.root().total_items(), 9);
        assert_eq!(graph.tree().check_consistency(), Ok(()));
    }

    #[test]
    fn move_with_unknown_target_changes_nothing() {
        let (mut graph, adapter) = sample();
        let a = adapter.id(0);
        let gone = SectionId::new(99);
        assert_eq!(
            graph.move_items(a, 6, gone, 0).unwrap_err(),
            GraphError::UnknownSection(gone)
        );
        assert_eq!(graph.section(a).unwrap().total_items(), 7);
    }

    #[test]
    fn strict_removal_rejects_partial_subsection() {
        let (mut graph, adapter) = sample();
        let a = adapter.id(0);
        let err = graph.remove_items(EventData::items(a), 2, 2).unwrap_err();
        assert!(matches!(err, GraphError::AmbiguousRemoval { start: 2, count: 2, .. }));
        assert_eq!(graph.section(a).unwrap().total_items(), 7);
    }

    #[test]
    fn queued_removal_closes_the_gap_where_the_section_now_is() {
        let (mut graph, adapter) = sample();
        let (a, b, c) = (adapter.id(0), adapter.id(1), adapter.id(2));
        graph.queue_section_removed(b, NodeRef::Section(a), 3);
        graph.add_items(EventData::items(a), 1, 4).unwrap();
        let e = graph
            .section_added(NodeRef::Section(a), 6, &LinearSectionConfig::new(false))
            .unwrap();
        graph.add_items(EventData::items(e), 6, 1).unwrap();
        assert_eq!(graph.section(e).unwrap().adapter_position(), 6);
        assert_eq!(graph.section(b).unwrap().adapter_position(), 8);
        assert_eq!(graph.tree().check_consistency(), Ok(()));

        let summary = graph.layout(&mut FakeHost::uniform(10, 100, 500));
        assert_eq!(summary.removals_applied, 1);
        // E sits before B and keeps its place.
        assert_eq!(graph.section(e).unwrap().adapter_position(), 6);
        let parent = graph.section(a).unwrap();
        assert_eq!(parent.subsections(), &[e]);
        assert_eq!((parent.total_items(), parent.num_children()), (9, 8));
        assert_eq!(graph.section(c).unwrap().adapter_position(), 9);
        assert_eq!(graph.root().total_items(), 11);
        assert_eq!(graph.tree().check_consistency(), Ok(()));
    }

    #[test]
    fn mixed_edit_sequence_stays_consistent() {
        let (mut graph, adapter) = sample();
        let (a, b, c) = (adapter.id(0), adapter.id(1), adapter.id(2));
        let consistent = |graph: &GraphManager| assert_eq!(graph.tree().check_consistency(), Ok(()));

        graph.add_items(EventData::items(b), 4, 2).unwrap();
        consistent(&graph);
        graph.queue_section_removed(b, NodeRef::Section(a), 3);
        graph.add_items(EventData::items(a), 1, 3).unwrap();
        consistent(&graph);
        assert_eq!(graph.section(b).unwrap().adapter_position(), 6);

        let n = graph
            .section_added(NodeRef::Root, 12, &LinearSectionConfig::new(true))
            .unwrap();
        consistent(&graph);
        graph.add_items(EventData::with_header(n), 12, 3).unwrap();
        consistent(&graph);
        graph.remove_items(EventData::items(c), 15, 1).unwrap();
        consistent(&graph);

        graph.layout(&mut FakeHost::uniform(10, 100, 500).pre_layout(true));
        consistent(&graph);
        assert!(graph.is_indexed(b));
        graph.layout(&mut FakeHost::uniform(10, 100, 500));
        consistent(&graph);
        assert!(!graph.is_indexed(b));
        assert_eq!(graph.section(n).unwrap().adapter_position(), 7);
        assert_eq!(graph.section(c).unwrap().adapter_position(), 10);

        graph.move_items(a, 1, c, 10).unwrap();
        consistent(&graph);
        graph.queue_section_removed(n, NodeRef::Root, 6);
        graph.add_items(EventData::items(a), 6, 2).unwrap();
        consistent(&graph);
        graph.layout(&mut FakeHost::uniform(10, 100, 500));
        consistent(&graph);

        assert!(!graph.is_indexed(n));
        assert_eq!(graph.root().subsections(), &[a, c]);
        let s = graph.section(a).unwrap();
        assert_eq!((s.adapter_position(), s.total_items()), (0, 8));
        let s = graph.section(c).unwrap();
        assert_eq!((s.adapter_position(), s.total_items()), (8, 2));
        assert_eq!(graph.root().total_items(), 10);
        assert_eq!(graph.pending_edits(), 0);
    }

    #[test]
    fn added_section_gets_its_header_from_item_events() {
        let (mut graph, _) = sample();
        let n = graph
            .section_added(NodeRef::Root, 9, &LinearSectionConfig::new(true))
            .unwrap();
        assert!(!graph.section(n).unwrap().has_header());
        graph.add_items(EventData::with_header(n), 9, 3).unwrap();
        let s = graph.section(n).unwrap();
        assert!(s.has_header());
        assert_eq!((s.total_items(), s.num_children()), (3, 2));
        assert_eq!(graph.tree().check_consistency(), Ok(()));
    }

    #[test]
    fn sections_in_ignores_sections_the_pass_did_not_reach() {
        let (mut graph, adapter) = sample();
        let (a, b, c) = (adapter.id(0), adapter.id(1), adapter.id(2));
        graph.layout(&mut FakeHost::uniform(10, 100, 500));
        assert!(graph.section(c).unwrap().bounds().is_some());

        // Only A's header and first two items fit.
        graph.layout(&mut FakeHost::uniform(10, 100, 25));
        assert_eq!(graph.section(b).unwrap().bounds(), None);
        assert_eq!(graph.section(c).unwrap().bounds(), None);
        assert_eq!(graph.sections_in(Rect::new(-10.0, -10.0, 5.0, 5.0)), vec![a]);
        assert_eq!(graph.sections_in(Rect::new(-100.0, -100.0, 100.0, 1000.0)), vec![a]);
    }

    #[test]
    fn update_adding_a_header_claims_the_first_leaf() {
        let (mut graph, adapter) = sample();
        let c = adapter.id(2);
        graph.queue_section_updated(c, Rc::new(LinearSectionConfig::new(true)));
        let mut host = FakeHost::uniform(10, 100, 500);
        graph.layout(&mut host);
        let s = graph.section(c).unwrap();
        assert!(s.has_header());
        assert_eq!((s.adapter_position(), s.total_items(), s.num_children()), (7, 2, 1));
        assert_eq!(graph.root().total_items(), 9);
        assert_eq!(host.placed_at(7), Some((0, 70, 100, 80)));
        assert_eq!(graph.tree().check_consistency(), Ok(()));
    }

    #[test]
    fn update_dropping_a_header_turns_it_into_a_leaf() {
        let (mut graph, adapter) = sample();
        let b = adapter.id(1);
        graph.queue_section_updated(b, Rc::new(LinearSectionConfig::new(false)));
        graph.layout(&mut FakeHost::uniform(10, 100, 500));
        let s = graph.section(b).unwrap();
        assert!(!s.has_header());
        assert_eq!((s.total_items(), s.num_children()), (3, 3));
        assert_eq!(graph.tree().check_consistency(), Ok(()));
    }

    #[test]
    fn update_cannot_put_a_header_on_a_subsection() {
        // Outer starts with subsection T (0..2), then one leaf.
        let mut adapter = FakeAdapter::new()
            .section(LinearSectionConfig::new(false), 0, 3, 2, &[1])
            .section(LinearSectionConfig::new(false), 0, 2, 2, &[]);
        let mut graph = GraphManager::new();
        graph.load_graph(&mut adapter);
        let outer = adapter.id(0);
        graph.queue_section_updated(outer, Rc::new(LinearSectionConfig::new(true)));
        let summary = graph.layout(&mut FakeHost::uniform(10, 100, 500));
        assert_eq!(summary.updates_applied, 1);
        let s = graph.section(outer).unwrap();
        assert!(!s.has_header());
        assert_eq!(s.num_children(), 2);
        assert_eq!(graph.tree().check_consistency(), Ok(()));
    }

    #[test]
    fn root_layout_can_be_replaced() {
        let mut adapter = FakeAdapter::new()
            .section(LinearSectionConfig::new(false), 0, 1, 1, &[])
            .section(LinearSectionConfig::new(false), 1, 1, 1, &[]);
        let mut graph = GraphManager::new().with_root_layout(Rc::new(crate::GridLayout::new(2)));
        graph.load_graph(&mut adapter);
        let mut host = FakeHost::uniform(10, 100, 500);
        graph.layout(&mut host);
        assert_eq!(host.placed_at(1), Some((0, 10, 100, 20)));
        assert_eq!(graph.root().height(), 20);
    }
}
