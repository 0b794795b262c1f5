//! Fragment extraction from a parsed component file.
//!
//! Three passes run in a fixed order over the same tree:
//!
//! 1. `<StaticQuery query={...}>` elements (can be switched off)
//! 2. `useStaticQuery(...)` calls
//! 3. named exports, including `export { name }` traced back to its declaration
//!
//! A template literal reached by more than one pass yields one fragment, the
//! one produced by the earliest pass.

mod exports;
mod hooks;
mod static_query;
mod tag;
mod visitor;


use std::collections::HashSet;

use tracing::trace;

use crate::core::collect::SymbolTable;
use crate::core::data::{QueryFragment, UnresolvedVariable};
use crate::core::error::ExtractError;
use crate::core::parsers::jsx::ParsedJSX;

use visitor::{Pass, PassVisitor};

pub use tag::GRAPHQL_TAG;

/// Package the tag and hook are imported from by default.
pub const DEFAULT_FRAMEWORK_PACKAGE: &str = "gatsby";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Run the `<StaticQuery>` element pass.
    pub static_query_elements: bool,
    /// Package `graphql` and `useStaticQuery` must come from.
    pub framework_package: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            static_query_elements: true,
            framework_package: DEFAULT_FRAMEWORK_PACKAGE.to_string(),
        }
    }
}

/// Fragments of one file in discovery order, plus non-fatal warnings.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub fragments: Vec<QueryFragment>,
    pub warnings: Vec<UnresolvedVariable>,
}

/// Read-only state shared by every pass over one file.
pub(crate) struct FileContext<'a> {
    pub file_path: &'a str,
    pub parsed: &'a ParsedJSX,
    pub symbols: &'a SymbolTable<'a>,
    pub options: &'a ParserOptions,
}

/// Find every query fragment in a parsed file.
///
/// The first failing fragment aborts the file: nothing extracted before it is
/// returned.
pub fn find_graphql_tags(
    file_path: &str,
    parsed: &ParsedJSX,
    options: &ParserOptions,
) -> Result<Extraction, ExtractError> {
    let symbols = SymbolTable::build(&parsed.module);
    let ctx = FileContext {
        file_path,
        parsed,
        symbols: &symbols,
        options,
    };

    let mut passes = Vec::with_capacity(3);
    if options.static_query_elements {
        passes.push(Pass::StaticQuery);
    }
    passes.extend([Pass::Hook, Pass::Export]);

    let mut seen = HashSet::new();
    let mut extraction = Extraction::default();
    for pass in passes {
        let output = PassVisitor::run(&ctx, pass)?;
        trace!(
            file = file_path,
            ?pass,
            fragments = output.fragments.len(),
            warnings = output.warnings.len(),
            "pass finished"
        );
        for (key, fragment) in output.fragments {
            if seen.insert(key) {
                extraction.fragments.push(fragment);
            }
        }
        extraction.warnings.extend(output.warnings);
    }

    Ok(extraction)
}
