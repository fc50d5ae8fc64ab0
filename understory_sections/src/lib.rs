// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Sections: the section graph and recursive layout engine behind virtualized, sectioned lists.
//!
//! A sectioned list shows a flat run of adapter positions grouped into nested
//! sections. Each section may start with a header and holds items and further
//! subsections. This crate keeps that structure as a tree addressed by stable
//! identifiers, keeps every node's position and size in sync as items and
//! sections come and go, and lays the visible part of the tree out through a
//! host supplied by the list widget.
//!
//! - [`GraphManager`]: owns the tree, routes item events, queues section edits,
//!   and drives layout passes.
//! - [`SectionTree`] and [`SectionState`]: the arena of section nodes and the
//!   position bookkeeping behind every edit.
//! - [`SectionAdapter`] and [`SectionConfig`]: where the structure comes from.
//! - [`LayoutHost`]: the list widget's views, measurement, and placement.
//! - [`LayoutHelper`], [`Child`], and [`SectionLayout`]: what a content layout
//!   strategy works with. [`LinearLayout`] and [`GridLayout`] are provided.
//!
//! ## Positions
//!
//! Every position is absolute in the adapter space shared by the whole tree. A
//! header occupies its section's first position. A subsection counts as one
//! child of its parent however many items it holds.
//!
//! ## Edits
//!
//! Item additions and removals apply at once and propagate to every ancestor.
//! Section removals and updates are queued and applied by the next committed
//! (post) layout pass: updates before the tree is laid out, removals after.
//! Speculative (pre) passes never apply queued edits.
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use std::rc::Rc;
//!
//! use understory_sections::{
//!     GraphManager, LayoutHost, LinearSectionConfig, SectionAdapter, SectionConfig, SectionData,
//!     SectionId, ViewId,
//! };
//!
//! /// One section with a header and three items.
//! struct Adapter(Vec<SectionId>);
//!
//! impl SectionAdapter for Adapter {
//!     fn sections(&self) -> Vec<Rc<dyn SectionConfig>> {
//!         vec![Rc::new(LinearSectionConfig::new(true))]
//!     }
//!     fn set_section_ids(&mut self, ids: &[SectionId]) {
//!         self.0 = ids.to_vec();
//!     }
//!     fn populate_section(&self, _id: SectionId, data: &mut SectionData) {
//!         data.has_header = true;
//!         data.num_children = 3;
//!         data.item_count = 4;
//!     }
//! }
//!
//! /// Every view is 20 high; remembers where views were placed.
//! #[derive(Default)]
//! struct Host(HashMap<u64, (i32, i32, i32, i32)>);
//!
//! impl LayoutHost for Host {
//!     fn is_pre_layout(&self) -> bool { false }
//!     fn layout_width(&self) -> i32 { 320 }
//!     fn layout_limit(&self) -> i32 { 480 }
//!     fn get_view(&mut self, position: usize) -> ViewId { ViewId(position as u64) }
//!     fn measure(&mut self, _: ViewId, _: i32, _: i32) {}
//!     fn measured_width(&self, _: ViewId) -> i32 { 320 }
//!     fn measured_height(&self, _: ViewId) -> i32 { 20 }
//!     fn layout_view(&mut self, v: ViewId, l: i32, t: i32, r: i32, b: i32) {
//!         self.0.insert(v.0, (l, t, r, b));
//!     }
//!     fn left(&self, v: ViewId) -> i32 { self.0[&v.0].0 }
//!     fn top(&self, v: ViewId) -> i32 { self.0[&v.0].1 }
//!     fn right(&self, v: ViewId) -> i32 { self.0[&v.0].2 }
//!     fn bottom(&self, v: ViewId) -> i32 { self.0[&v.0].3 }
//!     fn is_removed(&self, _: ViewId) -> bool { false }
//!     fn add_view(&mut self, _: ViewId, _: Option<usize>) {}
//!     fn add_disappearing_view(&mut self, _: ViewId, _: Option<usize>) {}
//! }
//!
//! let mut adapter = Adapter(Vec::new());
//! let mut graph = GraphManager::new();
//! graph.load_graph(&mut adapter);
//! assert_eq!(graph.root().total_items(), 4);
//!
//! let mut host = Host::default();
//! graph.layout(&mut host);
//! assert_eq!(host.0[&3], (0, 60, 320, 80));
//! assert_eq!(graph.section(adapter.0[0]).unwrap().height(), 80);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapter;
pub mod child;
pub mod error;
pub mod graph;
pub mod helper;
pub mod layout;
pub mod options;
pub mod section;
pub mod tree;
pub mod types;

#[cfg(test)]
mod testing;

pub use adapter::SectionAdapter;
pub use child::{Child, ChildPool, ItemChild, PooledChild, SectionChild};
pub use error::{GraphError, Result};
pub use graph::{GraphManager, PassSummary, PoolStats};
pub use helper::{LayoutHelper, LayoutHost};
pub use layout::{GridLayout, GridSectionConfig, LinearLayout, LinearSectionConfig};
pub use options::GraphOptions;
pub use section::{ContentExtent, SectionConfig, SectionLayout, SectionState};
pub use tree::{ChildSlot, RemovedItems, SectionTree};
pub use types::{AnimationState, EventData, EventFlags, NodeRef, SectionData, SectionId, ViewId};
