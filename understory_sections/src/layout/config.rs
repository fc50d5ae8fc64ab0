// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;

use super::{GridLayout, LinearLayout};
use crate::section::{SectionConfig, SectionLayout};

/// Configuration for sections laid out by [`LinearLayout`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LinearSectionConfig {
    /// Whether the section shows a header.
    pub header: bool,
}

impl LinearSectionConfig {
    /// Linear sections with or without a header.
    pub fn new(header: bool) -> Self {
        Self { header }
    }
}

impl SectionConfig for LinearSectionConfig {
    fn has_header(&self) -> bool {
        self.header
    }

    fn layout(&self) -> Rc<dyn SectionLayout> {
        Rc::new(LinearLayout)
    }
}

/// Configuration for sections laid out by [`GridLayout`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridSectionConfig {
    /// Whether the section shows a header.
    pub header: bool,
    /// Cells per row.
    pub columns: usize,
}

impl GridSectionConfig {
    /// Grid sections with `columns` cells per row.
    pub fn new(header: bool, columns: usize) -> Self {
        Self { header, columns }
    }
}

impl SectionConfig for GridSectionConfig {
    fn has_header(&self) -> bool {
        self.header
    }

    fn layout(&self) -> Rc<dyn SectionLayout> {
        Rc::new(GridLayout::new(self.columns))
    }
}
