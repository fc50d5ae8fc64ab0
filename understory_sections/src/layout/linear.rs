// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::helper::LayoutHelper;
use crate::section::{ContentExtent, SectionLayout};
use crate::types::NodeRef;

/// Stacks children top to bottom, each spanning the full width.
///
/// Stops once the filled height reaches the viewport limit. During a pre-pass,
/// removed items are still placed but do not count towards the limit, so the
/// items that will slide in to replace them get laid out too.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LinearLayout;

impl SectionLayout for LinearLayout {
    fn do_layout(&self, helper: &mut LayoutHelper<'_>, section: NodeRef) -> ContentExtent {
        let slots = helper.child_slots(section).unwrap_or_default();
        let width = helper.layout_width();
        let limit = helper.layout_limit();
        let pre_layout = helper.is_pre_layout();

        let mut extent = ContentExtent::default();
        let mut filled = 0;
        for slot in slots {
            if filled >= limit {
                break;
            }
            let mut child = helper.wrap_slot(slot);
            let removed = child.is_removed(helper);
            let height = super::place(helper, &mut child, 0, extent.height, width);
            super::attach(helper, &mut child);
            extent.include(super::displayed(helper, &child));
            child.done();

            extent.height += height;
            if !(pre_layout && removed) {
                filled += height;
            }
        }
        tracing::trace!(?section, height = extent.height, "linear content laid out");
        extent
    }
}
