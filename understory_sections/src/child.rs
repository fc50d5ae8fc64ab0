// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child wrappers handed to layout strategies, and the pool they are drawn from.
//!
//! A [`Child`] is either a leaf item backed by a host view or a nested section.
//! Both expose the same measure/layout/geometry contract so strategies can
//! arrange them uniformly. Wrappers are pass-scoped: they are taken from a
//! [`ChildPool`] through a [`PooledChild`] guard and go back to the pool when
//! the guard is dropped.

use alloc::vec::Vec;
use core::cell::RefCell;
use core::ops::{Deref, DerefMut};

use crate::helper::LayoutHelper;
use crate::types::{AnimationState, NodeRef, SectionId, ViewId};

/// A leaf item wrapper; geometry queries go to the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ItemChild {
    view: ViewId,
    position: usize,
    animation: AnimationState,
}

impl ItemChild {
    fn new(view: ViewId, position: usize) -> Self {
        Self {
            view,
            position,
            animation: AnimationState::None,
        }
    }

    fn reinit(&mut self, view: ViewId, position: usize) {
        self.view = view;
        self.position = position;
        self.animation = AnimationState::None;
    }

    /// The host view.
    pub fn view(&self) -> ViewId {
        self.view
    }

    /// Adapter position of the item.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// A nested section wrapper; its height is only known once it has laid itself out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SectionChild {
    section: SectionId,
    measured_width: i32,
    left: i32,
    top: i32,
    right: i32,
    animation: AnimationState,
}

impl SectionChild {
    fn new(section: SectionId) -> Self {
        Self {
            section,
            measured_width: 0,
            left: 0,
            top: 0,
            right: 0,
            animation: AnimationState::None,
        }
    }

    fn reinit(&mut self, section: SectionId) {
        *self = Self::new(section);
    }

    /// The wrapped section.
    pub fn section(&self) -> SectionId {
        self.section
    }
}

/// A child of a section during a layout pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Child {
    /// A leaf item.
    Item(ItemChild),
    /// A nested section.
    Section(SectionChild),
}

impl Child {
    /// Animation tag.
    pub fn animation_state(&self) -> AnimationState {
        match self {
            Self::Item(c) => c.animation,
            Self::Section(c) => c.animation,
        }
    }

    /// Set the animation tag.
    pub fn set_animation_state(&mut self, state: AnimationState) {
        match self {
            Self::Item(c) => c.animation = state,
            Self::Section(c) => c.animation = state,
        }
    }

    /// Whether the host reports the item as removed. Sections are never removed during a pass.
    pub fn is_removed(&self, helper: &LayoutHelper<'_>) -> bool {
        match self {
            Self::Item(c) => helper.is_removed(c.view),
            Self::Section(_) => false,
        }
    }

    /// Measure the child given the space already used in the context.
    ///
    /// Sections take the remaining width; their height comes from laying them out.
    pub fn measure(&mut self, helper: &mut LayoutHelper<'_>, used_width: i32, used_height: i32) {
        match self {
            Self::Item(c) => helper.measure(c.view, used_width, used_height),
            Self::Section(c) => c.measured_width = helper.layout_width() - used_width,
        }
    }

    /// Measured width.
    pub fn measured_width(&self, helper: &LayoutHelper<'_>) -> i32 {
        match self {
            Self::Item(c) => helper.measured_width(c.view),
            Self::Section(c) => c.measured_width,
        }
    }

    /// Measured height, or `None` for sections, which are not pre-measured.
    pub fn measured_height(&self, helper: &LayoutHelper<'_>) -> Option<i32> {
        match self {
            Self::Item(c) => Some(helper.measured_height(c.view)),
            Self::Section(_) => None,
        }
    }

    /// Commit the child's geometry in context coordinates.
    ///
    /// For a section this lays out the section itself within `[left, right)`
    /// starting at `top`; `bottom` is ignored.
    pub fn layout(
        &mut self,
        helper: &mut LayoutHelper<'_>,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    ) {
        match self {
            Self::Item(c) => helper.layout_view(c.view, left, top, right, bottom),
            Self::Section(c) => {
                c.left = left;
                c.top = top;
                c.right = right;
                helper.layout_section(NodeRef::Section(c.section), left, top, right);
            }
        }
    }

    /// Left edge in context coordinates.
    pub fn left(&self, helper: &LayoutHelper<'_>) -> i32 {
        match self {
            Self::Item(c) => helper.left(c.view),
            Self::Section(c) => c.left,
        }
    }

    /// Top edge in context coordinates.
    pub fn top(&self, helper: &LayoutHelper<'_>) -> i32 {
        match self {
            Self::Item(c) => helper.top(c.view),
            Self::Section(c) => c.top,
        }
    }

    /// Right edge in context coordinates.
    pub fn right(&self, helper: &LayoutHelper<'_>) -> i32 {
        match self {
            Self::Item(c) => helper.right(c.view),
            Self::Section(c) => c.right,
        }
    }

    /// Bottom edge in context coordinates, or `None` for sections.
    pub fn bottom(&self, helper: &LayoutHelper<'_>) -> Option<i32> {
        match self {
            Self::Item(c) => Some(helper.bottom(c.view)),
            Self::Section(_) => None,
        }
    }

    /// Width of the laid out child.
    pub fn width(&self, helper: &LayoutHelper<'_>) -> i32 {
        match self {
            Self::Item(c) => helper.measured_width(c.view),
            Self::Section(c) => c.right - c.left,
        }
    }

    /// Height of the laid out child; for sections, the height of this pass.
    pub fn height(&self, helper: &LayoutHelper<'_>) -> i32 {
        match self {
            Self::Item(c) => helper.measured_height(c.view),
            Self::Section(c) => helper
                .tree()
                .section(c.section)
                .map(|s| s.height())
                .unwrap_or(0),
        }
    }

    /// Attach an item's view to the host according to its animation tag.
    ///
    /// Sections attach their own children while laying out, so this does nothing for them.
    pub fn add_to_host(&self, helper: &mut LayoutHelper<'_>, index: Option<usize>) {
        if let Self::Item(c) = self {
            match c.animation {
                AnimationState::None | AnimationState::Appearing => helper.add_view(c.view, index),
                AnimationState::Disappearing => helper.add_disappearing_view(c.view, index),
            }
        }
    }
}

/// Free lists of released wrappers, one per child kind.
#[derive(Debug)]
pub struct ChildPool {
    items: Vec<ItemChild>,
    sections: Vec<SectionChild>,
    capacity: usize,
    allocated: usize,
    reused: usize,
}

impl Default for ChildPool {
    fn default() -> Self {
        Self::new(32)
    }
}

impl ChildPool {
    /// Create an empty pool retaining at most `capacity` wrappers per kind.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            sections: Vec::new(),
            capacity,
            allocated: 0,
            reused: 0,
        }
    }

    /// Wrappers created because the free list was empty.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Wrappers handed out again from the free list.
    pub fn reused(&self) -> usize {
        self.reused
    }

    /// Wrappers currently waiting in the free lists.
    pub fn idle(&self) -> usize {
        self.items.len() + self.sections.len()
    }

    fn take_item(&mut self, view: ViewId, position: usize) -> ItemChild {
        match self.items.pop() {
            Some(mut child) => {
                child.reinit(view, position);
                self.reused += 1;
                child
            }
            None => {
                self.allocated += 1;
                ItemChild::new(view, position)
            }
        }
    }

    fn take_section(&mut self, section: SectionId) -> SectionChild {
        match self.sections.pop() {
            Some(mut child) => {
                child.reinit(section);
                self.reused += 1;
                child
            }
            None => {
                self.allocated += 1;
                SectionChild::new(section)
            }
        }
    }

    fn release(&mut self, child: Child) {
        match child {
            Child::Item(c) if self.items.len() < self.capacity => self.items.push(c),
            Child::Section(c) if self.sections.len() < self.capacity => self.sections.push(c),
            _ => {}
        }
    }
}

/// A child on loan from a [`ChildPool`]; returned to the pool when dropped.
#[derive(Debug)]
pub struct PooledChild<'p> {
    pool: &'p RefCell<ChildPool>,
    child: Child,
}

impl<'p> PooledChild<'p> {
    pub(crate) fn item(pool: &'p RefCell<ChildPool>, view: ViewId, position: usize) -> Self {
        let child = Child::Item(pool.borrow_mut().take_item(view, position));
        Self { pool, child }
    }

    pub(crate) fn section(pool: &'p RefCell<ChildPool>, section: SectionId) -> Self {
        let child = Child::Section(pool.borrow_mut().take_section(section));
        Self { pool, child }
    }

    /// Return the wrapper to its pool now.
    pub fn done(self) {}
}

impl Deref for PooledChild<'_> {
    type Target = Child;

    fn deref(&self) -> &Child {
        &self.child
    }
}

impl DerefMut for PooledChild<'_> {
    fn deref_mut(&mut self) -> &mut Child {
        &mut self.child
    }
}

impl Drop for PooledChild<'_> {
    fn drop(&mut self) {
        self.pool.borrow_mut().release(self.child);
    }
}
