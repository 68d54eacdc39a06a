//! Navigation and search functionality.
//!
//! This module decides which nodes of the tree are displayed for a search
//! string and the attribute/junk toggles.

mod search;

pub use search::{recompute, FilterEngine, VisibleSet};
