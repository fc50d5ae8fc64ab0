// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for graph edits and lookups.

use crate::types::{NodeRef, SectionId};

/// Result type alias for graph operations.
pub type Result<T> = core::result::Result<T, GraphError>;

/// Errors reported by the section graph.
///
/// A failing call leaves the graph unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The identifier was never issued or its section has been removed.
    #[error("unknown section {0}")]
    UnknownSection(SectionId),

    /// An item removal covers only part of a subsection.
    #[error(
        "removal of {count} items at {start} partially covers the subsection at {section_position} ({section_items} items)"
    )]
    AmbiguousRemoval {
        /// First removed position.
        start: usize,
        /// Number of removed positions.
        count: usize,
        /// Position of the partially covered subsection.
        section_position: usize,
        /// Size of the partially covered subsection.
        section_items: usize,
    },

    /// The section is not a direct subsection of the named parent.
    #[error("{child} is not a subsection of {parent:?}")]
    NotAChild {
        /// Parent named by the caller.
        parent: NodeRef,
        /// Section that was expected under `parent`.
        child: SectionId,
    },

    /// A position lookup fell outside a section's content.
    #[error("position {position} is outside the section content [{start}, {end})")]
    PositionOutOfRange {
        /// Requested position.
        position: usize,
        /// First content position.
        start: usize,
        /// One past the last content position.
        end: usize,
    },
}
