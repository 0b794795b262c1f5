use serde::{Serialize, Serializer};

use crate::core::data::SourceRange;
use crate::core::parsers::graphql::Document;

/// Kind of query a fragment represents. Also the prefix of generated names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// Exported from a page component.
    Page,
    /// Passed to `<StaticQuery>` or `useStaticQuery`.
    Static,
    /// Declared inside the `config` export.
    Config,
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryType::Page => write!(f, "page"),
            QueryType::Static => write!(f, "static"),
            QueryType::Config => write!(f, "config"),
        }
    }
}

/// A query document found in a component file.
///
/// Every definition of `document` carries a name, either the one the author
/// wrote or one generated from the query type, file path and hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFragment {
    pub file_path: String,
    /// Name of the first definition of the document.
    pub name: String,
    #[serde(serialize_with = "serialize_document")]
    pub document: Document,
    /// Raw template text as written in the file.
    pub text: String,
    /// Hash of the normalized text.
    pub hash: u32,
    /// Location of the template literal body.
    pub template_loc: SourceRange,
    pub is_static_query: bool,
    pub is_hook: bool,
    pub is_config_query: bool,
    /// True when at least one definition received a generated name.
    pub is_auto_named: bool,
}

impl QueryFragment {
    pub fn query_type(&self) -> QueryType {
        if self.is_static_query {
            QueryType::Static
        } else if self.is_config_query {
            QueryType::Config
        } else {
            QueryType::Page
        }
    }
}

fn serialize_document<S: Serializer>(document: &Document, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(document)
}

/// Identity of a fragment occurrence inside one file.
///
/// Two fragments with the same key come from the same template literal and the
/// same document start inside it; only the first one is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationKey {
    /// Byte offset of the tagged template expression.
    pub template_start: usize,
    /// Byte offset of the document inside the template text.
    pub document_start: usize,
}

/// A `query` prop or hook argument naming a variable that is not declared in
/// the same file as a tagged template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedVariable {
    pub variable: String,
    pub file_path: String,
    /// The construct that consumed the variable, e.g. `<StaticQuery>`.
    pub consumer: String,
}

impl UnresolvedVariable {
    pub fn message(&self) -> String {
        format!(
            "We were unable to find the declaration of variable \"{var}\", which you passed as the \"query\" prop into the {usage} declaration in \"{file}\".\n\n\
             Perhaps the variable name has a typo?\n\n\
             Also note that we are currently unable to use queries defined in files other than the file where the {usage} is defined. \
             If you're attempting to import the query, please move it into \"{file}\".",
            var = self.variable,
            usage = self.consumer,
            file = self.file_path,
        )
    }
}
