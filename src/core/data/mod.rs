//! Core data types shared by the extraction pipeline.
//!
//! ## Module Structure
//!
//! - `location`: Positions and ranges inside a source file
//! - `fragment`: Extracted query fragments and their classification

pub mod fragment;
pub mod location;

pub use fragment::{LocationKey, QueryFragment, QueryType, UnresolvedVariable};
pub use location::{Position, SourceRange};
