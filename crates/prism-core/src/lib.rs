//! # prism-core
//!
//! Core types shared across all Prism crates:
//! - [`FeatureFrame`] and [`Cell`], the tabular row-set passed between the
//!   feature source, feature transforms, and predictors
//! - [`ModelId`], the sanitized registry key derived from an artifact file name
//! - Cross-cutting error types

pub mod errors;
pub mod frame;
pub mod model_id;

pub use errors::CoreError;
pub use frame::{Cell, FeatureFrame};
pub use model_id::ModelId;
