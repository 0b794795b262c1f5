//! Failures raised while loading, parsing or extracting a single file.

use thiserror::Error;

use crate::core::data::{Position, SourceRange};

/// Everything that can stop the extraction of one file.
///
/// All variants except [`ExtractError::DeprecatedAmbientTag`] are recoverable:
/// the batch reports them and carries on with an empty result for the file.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read \"{path}\": {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// No source variant produced a syntax tree.
    ///
    /// `variants_tried` is zero when the raw text itself was parsed.
    #[error("failed to parse \"{path}\": {message}")]
    Parse {
        path: String,
        message: String,
        location: Option<Position>,
        variants_tried: usize,
    },

    #[error("string interpolation is not allowed in graphql tag")]
    InterpolationNotAllowed { start: Position, end: Position },

    #[error("empty graphql tag")]
    EmptyFragment { template: Option<SourceRange> },

    #[error("graphql syntax error: {message}")]
    FragmentSyntax {
        message: String,
        template: SourceRange,
        /// Error position mapped back into the file, when the grammar reported one.
        location: Option<Position>,
    },

    #[error("the `{export_name}` export must be an async function")]
    ExportNotAsync {
        export_name: String,
        export_start: Position,
    },

    #[error(
        "using the global `graphql` tag for queries isn't supported; import it instead like: import {{ graphql }} from \"{package}\" in file: {path}"
    )]
    DeprecatedAmbientTag { path: String, package: String },
}

impl ExtractError {
    /// Fatal errors abort the whole batch instead of being reported per file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExtractError::DeprecatedAmbientTag { .. })
    }
}
