//! Quarry - GraphQL query extraction for Gatsby component files
//!
//! Quarry finds the query fragments a Gatsby site declares in its components:
//! page queries exported from pages, `<StaticQuery>` elements,
//! `useStaticQuery` hooks and queries inside an async `config` export. It
//! also records which Gatsby API exports each component has.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (source loading, parsing, passes, cache, batch)
//! - `diagnostics`: Error taxonomy and code frames
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod utils;
