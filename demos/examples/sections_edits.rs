// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item events and deferred section edits across pre and post layout passes.
//!
//! Run:
//! - `RUST_LOG=understory_sections=debug cargo run -p understory_demos --example sections_edits`

use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use understory_sections::{
    EventData, GraphManager, GraphOptions, GridSectionConfig, LayoutHost, LinearSectionConfig,
    NodeRef, SectionAdapter, SectionConfig, SectionData, SectionId, ViewId,
};

/// Three headed sections of four items each.
struct ThreeSections {
    ids: Vec<SectionId>,
}

impl SectionAdapter for ThreeSections {
    fn sections(&self) -> Vec<Rc<dyn SectionConfig>> {
        (0..3)
            .map(|_| Rc::new(LinearSectionConfig::new(true)) as Rc<dyn SectionConfig>)
            .collect()
    }

    fn set_section_ids(&mut self, ids: &[SectionId]) {
        self.ids = ids.to_vec();
    }

    fn populate_section(&self, id: SectionId, data: &mut SectionData) {
        let index = self.ids.iter().position(|i| *i == id).unwrap_or(0);
        data.has_header = true;
        data.adapter_position = index * 5;
        data.item_count = 5;
        data.num_children = 4;
    }
}

/// Counts what a pass attached.
struct CountingHost {
    pre_layout: bool,
    attached: usize,
}

impl LayoutHost for CountingHost {
    fn is_pre_layout(&self) -> bool {
        self.pre_layout
    }
    fn layout_width(&self) -> i32 {
        320
    }
    fn layout_limit(&self) -> i32 {
        1000
    }
    fn get_view(&mut self, position: usize) -> ViewId {
        ViewId(position as u64)
    }
    fn measure(&mut self, _: ViewId, _: i32, _: i32) {}
    fn measured_width(&self, _: ViewId) -> i32 {
        320
    }
    fn measured_height(&self, _: ViewId) -> i32 {
        16
    }
    fn layout_view(&mut self, _: ViewId, _: i32, _: i32, _: i32, _: i32) {}
    fn left(&self, _: ViewId) -> i32 {
        0
    }
    fn top(&self, _: ViewId) -> i32 {
        0
    }
    fn right(&self, _: ViewId) -> i32 {
        320
    }
    fn bottom(&self, _: ViewId) -> i32 {
        16
    }
    fn is_removed(&self, _: ViewId) -> bool {
        false
    }
    fn add_view(&mut self, _: ViewId, _: Option<usize>) {
        self.attached += 1;
    }
    fn add_disappearing_view(&mut self, _: ViewId, _: Option<usize>) {
        self.attached += 1;
    }
}

fn pass(graph: &mut GraphManager, pre_layout: bool) {
    let mut host = CountingHost {
        pre_layout,
        attached: 0,
    };
    let summary = graph.layout(&mut host);
    println!(
        "{} pass: {} views, {} updates, {} removals, root covers {} positions",
        if pre_layout { "pre " } else { "post" },
        host.attached,
        summary.updates_applied,
        summary.removals_applied,
        graph.root().total_items()
    );
}

fn main() -> Result<(), understory_sections::GraphError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut adapter = ThreeSections { ids: Vec::new() };
    let mut graph = GraphManager::with_options(GraphOptions::default().with_strict_removals(true));
    graph.load_graph(&mut adapter);
    let (first, second, third) = (adapter.ids[0], adapter.ids[1], adapter.ids[2]);
    pass(&mut graph, false);

    // Two items appended to the first section push the others back.
    graph.add_items(EventData::items(first), 5, 2)?;
    println!("third section now starts at {}", graph.section(third)?.adapter_position());

    // A new empty section between the first and second.
    let inserted = graph.section_added(NodeRef::Root, 7, &LinearSectionConfig::new(false))?;
    graph.add_items(EventData::items(inserted), 7, 3)?;
    println!("{inserted} covers {:?}", graph.section(inserted)?.adapter_position()..graph.section(inserted)?.end());

    // Section edits wait for a post pass.
    graph.queue_section_updated(third, Rc::new(GridSectionConfig::new(true, 2)));
    graph.queue_section_removed(second, NodeRef::Root, graph.section(second)?.adapter_position());
    pass(&mut graph, true);
    println!("second still indexed after pre pass: {}", graph.is_indexed(second));
    pass(&mut graph, false);
    println!("second still indexed after post pass: {}", graph.is_indexed(second));

    // Move one item from the first section to the end of the inserted one.
    let end = graph.section(inserted)?.end();
    graph.move_items(first, 1, inserted, end - 1)?;
    println!(
        "consistent after edits: {}",
        graph.tree().check_consistency().is_ok()
    );
    Ok(())
}
