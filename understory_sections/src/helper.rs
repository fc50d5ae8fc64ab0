// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout context: the host contract and the scoped helper handed to layout strategies.

use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::Rect;

use crate::child::{ChildPool, PooledChild};
use crate::error::Result;
use crate::layout::header;
use crate::tree::{ChildSlot, SectionTree};
use crate::types::{NodeRef, SectionId, ViewId};

/// The list widget hosting the layout.
///
/// The host owns views, measures them, and places them. All coordinates passed
/// to and returned from the host are in the host's own space.
pub trait LayoutHost {
    /// True during the speculative pass that precedes item animations.
    fn is_pre_layout(&self) -> bool;

    /// Width available to the list.
    fn layout_width(&self) -> i32;

    /// Height of the viewport; layout stops once content reaches it.
    fn layout_limit(&self) -> i32;

    /// Obtain (bind or recycle) the view for an adapter position.
    fn get_view(&mut self, position: usize) -> ViewId;

    /// Measure `view` given the space already used around it.
    fn measure(&mut self, view: ViewId, used_width: i32, used_height: i32);

    /// Measured width of `view`.
    fn measured_width(&self, view: ViewId) -> i32;

    /// Measured height of `view`.
    fn measured_height(&self, view: ViewId) -> i32;

    /// Place `view`.
    fn layout_view(&mut self, view: ViewId, left: i32, top: i32, right: i32, bottom: i32);

    /// Left edge of a placed view.
    fn left(&self, view: ViewId) -> i32;

    /// Top edge of a placed view.
    fn top(&self, view: ViewId) -> i32;

    /// Right edge of a placed view.
    fn right(&self, view: ViewId) -> i32;

    /// Bottom edge of a placed view.
    fn bottom(&self, view: ViewId) -> i32;

    /// Whether the item bound to `view` has been removed from the adapter.
    fn is_removed(&self, view: ViewId) -> bool;

    /// Attach `view`, at `index` or at the end.
    fn add_view(&mut self, view: ViewId, index: Option<usize>);

    /// Attach `view` as a disappearing view, at `index` or at the end.
    fn add_disappearing_view(&mut self, view: ViewId, index: Option<usize>);
}

/// Scoped layout context for one section region.
///
/// A helper covers a horizontal band `[left, left + width)` of the host
/// starting at `top`; coordinates given to and read from it are relative to
/// that origin. [`LayoutHelper::subsection`] narrows it further. It also lends
/// the section tree and the child pool to the code running inside it.
pub struct LayoutHelper<'a> {
    host: &'a mut dyn LayoutHost,
    tree: &'a mut SectionTree,
    pool: &'a RefCell<ChildPool>,
    open: &'a Cell<usize>,
    left: i32,
    top: i32,
    width: i32,
    limit: i32,
    pre_layout: bool,
    scoped: bool,
}

impl core::fmt::Debug for LayoutHelper<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutHelper")
            .field("left", &self.left)
            .field("top", &self.top)
            .field("width", &self.width)
            .field("limit", &self.limit)
            .field("pre_layout", &self.pre_layout)
            .finish_non_exhaustive()
    }
}

impl<'a> LayoutHelper<'a> {
    /// Create the outermost helper spanning the host's full width.
    pub(crate) fn new(
        host: &'a mut dyn LayoutHost,
        tree: &'a mut SectionTree,
        pool: &'a RefCell<ChildPool>,
        open: &'a Cell<usize>,
    ) -> Self {
        let width = host.layout_width();
        let limit = host.layout_limit();
        let pre_layout = host.is_pre_layout();
        Self {
            host,
            tree,
            pool,
            open,
            left: 0,
            top: 0,
            width,
            limit,
            pre_layout,
            scoped: false,
        }
    }

    /// Acquire a narrower context for `[left, right)` starting at `top`.
    ///
    /// It is released when dropped.
    pub fn subsection(&mut self, left: i32, top: i32, right: i32) -> LayoutHelper<'_> {
        self.open.set(self.open.get() + 1);
        LayoutHelper {
            host: &mut *self.host,
            tree: &mut *self.tree,
            pool: self.pool,
            open: self.open,
            left: self.left + left,
            top: self.top + top,
            width: right - left,
            limit: self.limit - top,
            pre_layout: self.pre_layout,
            scoped: true,
        }
    }

    /// True during the speculative pass.
    pub fn is_pre_layout(&self) -> bool {
        self.pre_layout
    }

    /// Width of this context.
    pub fn layout_width(&self) -> i32 {
        self.width
    }

    /// Remaining viewport height below this context's top.
    pub fn layout_limit(&self) -> i32 {
        self.limit
    }

    /// The section tree.
    pub fn tree(&self) -> &SectionTree {
        &*self.tree
    }

    /// Sub-contexts currently acquired and not yet released, across the whole pass.
    pub fn open_subsections(&self) -> usize {
        self.open.get()
    }

    /// Convert a context-space box into host space.
    pub fn to_host_rect(&self, left: i32, top: i32, right: i32, bottom: i32) -> Rect {
        Rect::new(
            f64::from(self.left + left),
            f64::from(self.top + top),
            f64::from(self.left + right),
            f64::from(self.top + bottom),
        )
    }

    // --- children ---

    /// Direct children of `section` in position order.
    pub fn child_slots(&self, section: NodeRef) -> Result<Vec<ChildSlot>> {
        self.tree.child_slots(section)
    }

    /// Wrap a child slot.
    pub fn wrap_slot(&mut self, slot: ChildSlot) -> PooledChild<'a> {
        match slot {
            ChildSlot::Item { position, .. } => self.wrap_item(position),
            ChildSlot::Section(id) => self.wrap_section(id),
        }
    }

    /// Wrap the item at `position`, obtaining its view from the host.
    pub fn wrap_item(&mut self, position: usize) -> PooledChild<'a> {
        let view = self.host.get_view(position);
        PooledChild::item(self.pool, view, position)
    }

    /// Wrap a nested section.
    pub fn wrap_section(&mut self, section: SectionId) -> PooledChild<'a> {
        PooledChild::section(self.pool, section)
    }

    /// Wrap the direct child of `section` occupying `position`.
    pub fn child_at(&mut self, section: NodeRef, position: usize) -> Result<PooledChild<'a>> {
        let slot = self.tree.child_at(section, position)?;
        Ok(self.wrap_slot(slot))
    }

    /// Lay out `section` (header, then content) within `[left, right)` starting at `top`.
    pub fn layout_section(&mut self, section: NodeRef, left: i32, top: i32, right: i32) {
        let mut scope = self.subsection(left, top, right);
        header::layout_with_header(&mut scope, section);
    }

    pub(crate) fn tree_mut(&mut self) -> &mut SectionTree {
        &mut *self.tree
    }

    // --- views ---

    /// Measure a view.
    pub fn measure(&mut self, view: ViewId, used_width: i32, used_height: i32) {
        self.host.measure(view, used_width, used_height);
    }

    /// Measured width of a view.
    pub fn measured_width(&self, view: ViewId) -> i32 {
        self.host.measured_width(view)
    }

    /// Measured height of a view.
    pub fn measured_height(&self, view: ViewId) -> i32 {
        self.host.measured_height(view)
    }

    /// Place a view using context coordinates.
    pub fn layout_view(&mut self, view: ViewId, left: i32, top: i32, right: i32, bottom: i32) {
        self.host.layout_view(
            view,
            self.left + left,
            self.top + top,
            self.left + right,
            self.top + bottom,
        );
    }

    /// Left edge of a view in context coordinates.
    pub fn left(&self, view: ViewId) -> i32 {
        self.host.left(view) - self.left
    }

    /// Top edge of a view in context coordinates.
    pub fn top(&self, view: ViewId) -> i32 {
        self.host.top(view) - self.top
    }

    /// Right edge of a view in context coordinates.
    pub fn right(&self, view: ViewId) -> i32 {
        self.host.right(view) - self.left
    }

    /// Bottom edge of a view in context coordinates.
    pub fn bottom(&self, view: ViewId) -> i32 {
        self.host.bottom(view) - self.top
    }

    /// Whether the item bound to a view has been removed.
    pub fn is_removed(&self, view: ViewId) -> bool {
        self.host.is_removed(view)
    }

    /// Attach a view.
    pub fn add_view(&mut self, view: ViewId, index: Option<usize>) {
        self.host.add_view(view, index);
    }

    /// Attach a disappearing view.
    pub fn add_disappearing_view(&mut self, view: ViewId, index: Option<usize>) {
        self.host.add_disappearing_view(view, index);
    }
}

impl Drop for LayoutHelper<'_> {
    fn drop(&mut self) {
        if self.scoped {
            self.open.set(self.open.get() - 1);
        }
    }
}
