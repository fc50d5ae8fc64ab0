// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::helper::LayoutHelper;
use crate::section::{ContentExtent, SectionLayout};
use crate::tree::ChildSlot;
use crate::types::NodeRef;

/// Places items in rows of `columns` equal-width cells.
///
/// A row is as tall as its tallest cell. A subsection breaks the row and
/// occupies a full-width row of its own. Rows are added until the filled
/// height reaches the viewport limit, with the same pre-pass allowance for
/// removed items as [`LinearLayout`](super::LinearLayout).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridLayout {
    /// Number of cells per row; values below one are treated as one.
    pub columns: usize,
}

impl GridLayout {
    /// Create a grid with `columns` cells per row.
    pub fn new(columns: usize) -> Self {
        Self { columns }
    }
}

/// Split children into rows: runs of up to `columns` items, or a single section.
fn rows(slots: Vec<ChildSlot>, columns: usize) -> Vec<Vec<ChildSlot>> {
    let mut rows: Vec<Vec<ChildSlot>> = Vec::new();
    let mut open = false;
    for slot in slots {
        match slot {
            ChildSlot::Section(_) => {
                rows.push(alloc::vec![slot]);
                open = false;
            }
            ChildSlot::Item { .. } => {
                let row = rows.last_mut().filter(|row| open && row.len() < columns);
                if let Some(row) = row {
                    row.push(slot);
                } else {
                    rows.push(alloc::vec![slot]);
                    open = true;
                }
            }
        }
    }
    rows
}

impl SectionLayout for GridLayout {
    fn do_layout(&self, helper: &mut LayoutHelper<'_>, section: NodeRef) -> ContentExtent {
        let columns = self.columns.max(1);
        let slots = helper.child_slots(section).unwrap_or_default();
        let width = helper.layout_width();
        let limit = helper.layout_limit();
        let pre_layout = helper.is_pre_layout();
        let cell_width = width / i32::try_from(columns).unwrap_or(i32::MAX);

        let mut extent = ContentExtent::default();
        let mut filled = 0;
        for row in rows(slots, columns) {
            if filled >= limit {
                break;
            }
            let full_row = matches!(row.as_slice(), [ChildSlot::Section(_)]);
            let mut row_height = 0;
            let mut counts = false;
            let mut left = 0;
            for slot in row {
                let right = if full_row { width } else { left + cell_width };
                let mut child = helper.wrap_slot(slot);
                let removed = child.is_removed(helper);
                let height = super::place(helper, &mut child, left, extent.height, right);
                super::attach(helper, &mut child);
                extent.include(super::displayed(helper, &child));
                child.done();

                row_height = row_height.max(height);
                counts |= !(pre_layout && removed);
                left = right;
            }
            extent.height += row_height;
            if counts {
                filled += row_height;
            }
        }
        tracing::trace!(?section, columns, height = extent.height, "grid content laid out");
        extent
    }
}
