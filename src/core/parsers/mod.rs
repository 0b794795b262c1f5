//! Parsers for component sources and the query documents embedded in them.
//!
//! - `jsx`: JS/JSX/TS/TSX source parser (uses swc for AST generation)
//! - `graphql`: query document parser, normalizer and naming helpers

pub mod graphql;
pub mod jsx;
