//! Extraction engine.
//!
//! ## Module Structure
//!
//! - `source`: reading files and the cheap marker pre-filter
//! - `parsers`: component and query document parsers
//! - `collect`: bindings and scopes of one module
//! - `extract`: the three fragment extraction passes
//! - `features`: export feature flags
//! - `cache`: content-addressed result cache
//! - `sink`: component state store and error reporter seams
//! - `file_parser`: the batch entry point tying the above together
//! - `file_scanner`: finding component files under a source root

pub mod cache;
pub mod collect;
pub mod data;
pub mod error;
pub mod extract;
pub mod features;
pub mod file_parser;
pub mod file_scanner;
pub mod parsers;
pub mod sink;
pub mod source;

pub use cache::{CachedResult, MemoryCache, ResultCache};
pub use data::{Position, QueryFragment, QueryType, SourceRange, UnresolvedVariable};
pub use error::ExtractError;
pub use extract::{Extraction, ParserOptions, find_graphql_tags};
pub use features::FeatureFlags;
pub use file_parser::FileParser;
pub use sink::{ComponentStore, ErrorReporter, ExtractionFailure};
