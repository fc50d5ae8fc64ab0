// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Header step: every section places its header first, then hands the area below to its strategy.

use alloc::rc::Rc;

use crate::helper::LayoutHelper;
use crate::types::NodeRef;

/// Lay out `section` into `helper`, which is already scoped to the section's band.
///
/// Records the pass height, displayed positions, and host-space bounds on the node.
pub(crate) fn layout_with_header(helper: &mut LayoutHelper<'_>, section: NodeRef) {
    let (has_header, position, total, strategy) = {
        let node = helper.tree().expect_node(section);
        (
            node.has_header(),
            node.adapter_position(),
            node.total_items(),
            Rc::clone(node.layout()),
        )
    };
    let width = helper.layout_width();

    let mut header_height = 0;
    let mut header_position = None;
    if has_header && total > 0 {
        let mut header = helper.wrap_item(position);
        header_height = super::place(helper, &mut header, 0, 0, width);
        super::attach(helper, &mut header);
        header.done();
        header_position = Some(position);
    }

    let extent = {
        let mut content = helper.subsection(0, header_height, width);
        strategy.do_layout(&mut content, section)
    };

    let height = header_height + extent.height;
    let bounds = helper.to_host_rect(0, 0, width, height);
    let node = helper.tree_mut().expect_node_mut(section);
    node.height = height;
    node.head_position = header_position
        .or(extent.head_position)
        .unwrap_or(position);
    node.tail_position = extent.tail_position.or(header_position).unwrap_or(position);
    node.bounds = Some(bounds);
    tracing::trace!(?section, height, "section laid out");
}
