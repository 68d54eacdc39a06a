//! h5scope - browse, filter and probe hierarchical scientific data stores.
//!
//! The crate mirrors a store of groups, datasets and attributes as an
//! editable tree, filters that tree by path search terms, and picks the
//! sample nearest to a plot cursor.
//!
//! # Features
//!
//! - Arena tree with rename, move and attribute edits written through to the store
//! - Inherited junk flags stored as a reserved attribute
//! - Multi-term path search that keeps every match's ancestors visible
//! - Nearest-sample picking on ordered and parametric curves
//! - Nearest-pixel picking and cross-sections on images
//! - NetCDF/HDF5 loading behind the `netcdf` feature
//!
//! # Example
//!
//! ```
//! use h5scope::config::FilterConfig;
//! use h5scope::data::{HierarchicalStore, MemoryStore};
//! use h5scope::model::HierarchyModel;
//! use h5scope::navigation::recompute;
//!
//! let mut store = MemoryStore::new();
//! let root = store.root();
//! let scan = store.add_group(root, "scan")?;
//! store.add_dataset(scan, "counts", &[10])?;
//!
//! let model = HierarchyModel::new(store)?;
//! let visible = recompute(model.tree(), &FilterConfig::with_terms("counts"));
//! assert_eq!(visible.len(), 2);
//! # Ok::<(), h5scope::H5ScopeError>(())
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod navigation;
pub mod plot;
pub mod util;

pub use error::{H5ScopeError, Result};
