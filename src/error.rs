//! Error types for h5scope.
//!
//! This module provides a unified error handling approach using `thiserror`.

use crate::data::NodeKind;
use thiserror::Error;

/// Result type alias for h5scope operations.
pub type Result<T> = std::result::Result<T, H5ScopeError>;

/// Opaque cause attached to a store failure.
pub type StoreCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in h5scope.
#[derive(Debug, Error)]
pub enum H5ScopeError {
    /// A rename or move target name is already taken.
    #[error("Name '{name}' already exists in {parent}")]
    NameConflict { parent: String, name: String },

    /// The underlying hierarchical store failed.
    #[error("Store error during {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreCause,
    },

    /// Curve x/y arrays of different lengths.
    #[error("Shape mismatch: x has {x_len} samples, y has {y_len}")]
    ShapeMismatch { x_len: usize, y_len: usize },

    /// Node not found in tree.
    #[error("Node not found: {path}")]
    NodeNotFound { path: String },

    /// Operation applied to a node of the wrong kind.
    #[error("{path} is a {actual:?}, expected {expected}")]
    WrongKind {
        path: String,
        actual: NodeKind,
        expected: &'static str,
    },

    /// Move would detach the root or create a cycle.
    #[error("Invalid move of {path}: {reason}")]
    InvalidMove { path: String, reason: &'static str },

    /// Attribute key reserved for store bookkeeping.
    #[error("Attribute key '{key}' is reserved")]
    ReservedKey { key: String },

    /// Image index outside the array.
    #[error("Index ({row}, {col}) out of bounds for image of shape {shape:?}")]
    OutOfBounds {
        row: usize,
        col: usize,
        shape: (usize, usize),
    },

    /// Failed to read NetCDF file.
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCDF(String),
}

impl H5ScopeError {
    /// Create a Store error from any error type.
    pub fn store(operation: &'static str, source: impl Into<StoreCause>) -> Self {
        Self::Store {
            operation,
            source: source.into(),
        }
    }

    /// Create a NameConflict error.
    pub fn name_conflict(parent: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NameConflict {
            parent: parent.into(),
            name: name.into(),
        }
    }

    /// Create a NodeNotFound error.
    pub fn node_not_found(path: impl Into<String>) -> Self {
        Self::NodeNotFound { path: path.into() }
    }

    /// Create a WrongKind error.
    pub fn wrong_kind(path: impl Into<String>, actual: NodeKind, expected: &'static str) -> Self {
        Self::WrongKind {
            path: path.into(),
            actual,
            expected,
        }
    }

    /// Create an InvalidMove error.
    pub fn invalid_move(path: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidMove {
            path: path.into(),
            reason,
        }
    }

    /// Whether this error came from the store rather than from validation.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::Store { .. })
    }
}

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for H5ScopeError {
    fn from(err: netcdf::Error) -> Self {
        Self::NetCDF(err.to_string())
    }
}
