// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_sections::{
    EventData, GraphManager, GraphOptions, GridSectionConfig, LayoutHost, LinearSectionConfig,
    SectionAdapter, SectionConfig, SectionData, SectionId, ViewId,
};

/// `outer` top-level sections, each with a header, `items` items, and one grid subsection of `items` items.
struct NestedAdapter {
    outer: usize,
    items: usize,
    ids: Vec<SectionId>,
}

impl NestedAdapter {
    fn new(outer: usize, items: usize) -> Self {
        Self {
            outer,
            items,
            ids: Vec::new(),
        }
    }

    /// Positions covered by one top-level section.
    fn span(&self) -> usize {
        1 + self.items + 1 + self.items
    }
}

impl SectionAdapter for NestedAdapter {
    fn sections(&self) -> Vec<Rc<dyn SectionConfig>> {
        let mut out: Vec<Rc<dyn SectionConfig>> = Vec::with_capacity(self.outer * 2);
        for _ in 0..self.outer {
            out.push(Rc::new(LinearSectionConfig::new(true)));
            out.push(Rc::new(GridSectionConfig::new(true, 3)));
        }
        out
    }

    fn set_section_ids(&mut self, ids: &[SectionId]) {
        self.ids = ids.to_vec();
    }

    fn populate_section(&self, id: SectionId, data: &mut SectionData) {
        let index = self.ids.iter().position(|i| *i == id).unwrap();
        let start = (index / 2) * self.span();
        data.has_header = true;
        if index % 2 == 0 {
            data.adapter_position = start;
            data.item_count = self.span();
            data.num_children = self.items + 1;
            data.child_sections.push(self.ids[index + 1]);
        } else {
            data.adapter_position = start + 1 + self.items;
            data.item_count = 1 + self.items;
            data.num_children = self.items;
        }
    }
}

/// Every view is 24 high; geometry is discarded.
struct BenchHost {
    pre_layout: bool,
    limit: i32,
}

impl LayoutHost for BenchHost {
    fn is_pre_layout(&self) -> bool {
        self.pre_layout
    }
    fn layout_width(&self) -> i32 {
        1080
    }
    fn layout_limit(&self) -> i32 {
        self.limit
    }
    fn get_view(&mut self, position: usize) -> ViewId {
        ViewId(position as u64)
    }
    fn measure(&mut self, _: ViewId, _: i32, _: i32) {}
    fn measured_width(&self, _: ViewId) -> i32 {
        1080
    }
    fn measured_height(&self, _: ViewId) -> i32 {
        24
    }
    fn layout_view(&mut self, view: ViewId, _: i32, _: i32, _: i32, _: i32) {
        black_box(view);
    }
    fn left(&self, _: ViewId) -> i32 {
        0
    }
    fn top(&self, _: ViewId) -> i32 {
        0
    }
    fn right(&self, _: ViewId) -> i32 {
        1080
    }
    fn bottom(&self, _: ViewId) -> i32 {
        24
    }
    fn is_removed(&self, _: ViewId) -> bool {
        false
    }
    fn add_view(&mut self, view: ViewId, _: Option<usize>) {
        black_box(view);
    }
    fn add_disappearing_view(&mut self, view: ViewId, _: Option<usize>) {
        black_box(view);
    }
}

fn loaded(outer: usize, items: usize) -> (GraphManager, NestedAdapter) {
    let mut adapter = NestedAdapter::new(outer, items);
    let mut graph = GraphManager::with_options(GraphOptions::default().with_strict_removals(false));
    graph.load_graph(&mut adapter);
    (graph, adapter)
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("section_graph_load");
    for &outer in &[10_usize, 100, 1000] {
        group.bench_function(format!("load_{outer}x2"), |b| {
            let mut adapter = NestedAdapter::new(outer, 20);
            let mut graph = GraphManager::new();
            b.iter(|| {
                graph.load_graph(&mut adapter);
                black_box(graph.root().total_items());
            });
        });
    }
    group.finish();
}

fn bench_item_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("section_graph_items");
    for &outer in &[10_usize, 100, 1000] {
        group.bench_function(format!("add_remove_first_{outer}"), |b| {
            b.iter_batched(
                || loaded(outer, 20),
                |(mut graph, adapter)| {
                    // Edits in the first section shift every later section.
                    let first = EventData::items(adapter.ids[0]);
                    graph.add_items(first, 1, 5).unwrap();
                    graph.remove_items(first, 1, 5).unwrap();
                    black_box(graph.root().total_items());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("section_graph_layout");
    for &(name, limit) in &[("viewport", 2400), ("everything", i32::MAX)] {
        group.bench_function(format!("post_pass_{name}"), |b| {
            let (mut graph, _) = loaded(100, 20);
            let mut host = BenchHost {
                pre_layout: false,
                limit,
            };
            b.iter(|| black_box(graph.layout(&mut host)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_load, bench_item_events, bench_layout);
criterion_main!(benches);
