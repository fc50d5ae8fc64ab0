// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load a small nested section graph, lay it out, and print where everything landed.
//!
//! Run:
//! - `cargo run -p understory_demos --example sections_basics`
//! - `RUST_LOG=understory_sections=trace cargo run -p understory_demos --example sections_basics`

use std::collections::BTreeMap;
use std::rc::Rc;

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_sections::{
    GraphManager, GridSectionConfig, LayoutHost, LinearSectionConfig, SectionAdapter,
    SectionConfig, SectionData, SectionId, ViewId,
};

const ROW_H: i32 = 20;
const WIDTH: i32 = 240;

/// "Contacts" with a header and three items, whose "Favourites" grid subsection
/// holds six items; followed by a headerless "Footer" of two items.
struct ContactsAdapter {
    ids: Vec<SectionId>,
}

impl SectionAdapter for ContactsAdapter {
    fn sections(&self) -> Vec<Rc<dyn SectionConfig>> {
        vec![
            Rc::new(LinearSectionConfig::new(true)),
            Rc::new(GridSectionConfig::new(true, 3)),
            Rc::new(LinearSectionConfig::new(false)),
        ]
    }

    fn set_section_ids(&mut self, ids: &[SectionId]) {
        self.ids = ids.to_vec();
    }

    fn populate_section(&self, id: SectionId, data: &mut SectionData) {
        match self.ids.iter().position(|i| *i == id) {
            Some(0) => {
                data.has_header = true;
                data.adapter_position = 0;
                data.item_count = 1 + 3 + 7;
                data.num_children = 4;
                data.child_sections.push(self.ids[1]);
            }
            Some(1) => {
                data.has_header = true;
                data.adapter_position = 4;
                data.item_count = 7;
                data.num_children = 6;
            }
            _ => {
                data.adapter_position = 11;
                data.item_count = 2;
                data.num_children = 2;
            }
        }
    }
}

/// A host that lays views out in memory.
#[derive(Default)]
struct MemoryHost {
    placed: BTreeMap<usize, Rect>,
    attached: Vec<usize>,
}

fn position(view: ViewId) -> usize {
    view.0 as usize
}

impl LayoutHost for MemoryHost {
    fn is_pre_layout(&self) -> bool {
        false
    }
    fn layout_width(&self) -> i32 {
        WIDTH
    }
    fn layout_limit(&self) -> i32 {
        400
    }
    fn get_view(&mut self, position: usize) -> ViewId {
        ViewId(position as u64)
    }
    fn measure(&mut self, _: ViewId, _: i32, _: i32) {}
    fn measured_width(&self, _: ViewId) -> i32 {
        WIDTH
    }
    fn measured_height(&self, _: ViewId) -> i32 {
        ROW_H
    }
    fn layout_view(&mut self, view: ViewId, left: i32, top: i32, right: i32, bottom: i32) {
        let rect = Rect::new(left.into(), top.into(), right.into(), bottom.into());
        self.placed.insert(position(view), rect);
    }
    fn left(&self, view: ViewId) -> i32 {
        self.placed.get(&position(view)).map_or(0, |r| r.x0 as i32)
    }
    fn top(&self, view: ViewId) -> i32 {
        self.placed.get(&position(view)).map_or(0, |r| r.y0 as i32)
    }
    fn right(&self, view: ViewId) -> i32 {
        self.placed.get(&position(view)).map_or(0, |r| r.x1 as i32)
    }
    fn bottom(&self, view: ViewId) -> i32 {
        self.placed.get(&position(view)).map_or(0, |r| r.y1 as i32)
    }
    fn is_removed(&self, _: ViewId) -> bool {
        false
    }
    fn add_view(&mut self, view: ViewId, _: Option<usize>) {
        self.attached.push(position(view));
    }
    fn add_disappearing_view(&mut self, _: ViewId, _: Option<usize>) {}
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut adapter = ContactsAdapter { ids: Vec::new() };
    let mut graph = GraphManager::new();
    graph.load_graph(&mut adapter);
    println!(
        "loaded {} sections covering {} positions",
        graph.tree().len(),
        graph.root().total_items()
    );

    let mut host = MemoryHost::default();
    let summary = graph.layout(&mut host);
    println!("pass: {summary:?}");
    for (position, rect) in &host.placed {
        println!("  position {position:>2} -> {rect:?}");
    }

    for id in &adapter.ids {
        let s = graph.section(*id).unwrap();
        println!(
            "{id}: positions {}..{} height {} bounds {:?}",
            s.adapter_position(),
            s.end(),
            s.height(),
            s.bounds()
        );
    }

    let viewport = Rect::new(0.0, 100.0, f64::from(WIDTH), 160.0);
    println!("sections in {viewport:?}: {:?}", graph.sections_in(viewport));
}
