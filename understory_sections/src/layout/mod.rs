// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section layout: the header step shared by every section, and the stock content strategies.
//!
//! - [`LinearLayout`] stacks children top to bottom across the full width.
//! - [`GridLayout`] places items in rows of equal-width cells; subsections take a row each.
//!
//! [`LinearSectionConfig`] and [`GridSectionConfig`] are ready-made
//! [`SectionConfig`](crate::SectionConfig)s for adapters that need nothing more.

mod config;
mod grid;
pub(crate) mod header;
mod linear;

pub use config::{GridSectionConfig, LinearSectionConfig};
pub use grid::GridLayout;
pub use linear::LinearLayout;

use crate::child::Child;
use crate::helper::LayoutHelper;
use crate::section::ContentExtent;
use crate::types::{AnimationState, NodeRef};

/// Attach a laid out child to the host.
///
/// In a post-pass, items whose view has been removed go in as disappearing views.
pub(crate) fn attach(helper: &mut LayoutHelper<'_>, child: &mut Child) {
    if !helper.is_pre_layout() && child.is_removed(helper) {
        child.set_animation_state(AnimationState::Disappearing);
    }
    child.add_to_host(helper, None);
}

/// Lay out one child at `top` across `[left, right)` and return its height.
///
/// Items are measured first; sections lay themselves out and report the height they used.
pub(crate) fn place(
    helper: &mut LayoutHelper<'_>,
    child: &mut Child,
    left: i32,
    top: i32,
    right: i32,
) -> i32 {
    let used_width = helper.layout_width() - (right - left);
    child.measure(helper, used_width, top);
    match child.measured_height(helper) {
        Some(height) => {
            child.layout(helper, left, top, right, top + height);
            height
        }
        None => {
            child.layout(helper, left, top, right, top);
            child.height(helper)
        }
    }
}

/// Positions displayed by a child in the current pass, or `None` if it shows nothing.
pub(crate) fn displayed(helper: &LayoutHelper<'_>, child: &Child) -> Option<(usize, usize)> {
    match child {
        Child::Item(c) => Some((c.position(), c.position())),
        Child::Section(c) => {
            let s = helper.tree().expect_node(NodeRef::Section(c.section()));
            (s.total_items() > 0).then(|| (s.head_position(), s.tail_position()))
        }
    }
}

impl ContentExtent {
    /// Widen the displayed range with a child's first and last positions.
    pub(crate) fn include(&mut self, range: Option<(usize, usize)>) {
        if let Some((head, tail)) = range {
            self.head_position.get_or_insert(head);
            self.tail_position = Some(tail);
        }
    }
}
