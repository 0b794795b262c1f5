//! Reading component files and deciding whether they are worth parsing.

use std::fs;

use twox_hash::XxHash3_128;

use crate::core::error::ExtractError;

/// Substrings that must appear in a file for it to be parsed.
///
/// Every construct that yields a fragment, a warning or a feature flag
/// contains one of these: `graphql` covers every tag form, `StaticQuery`
/// covers `<StaticQuery>` and `useStaticQuery`, and the remaining entries
/// are the feature export names.
pub const QUERY_MARKERS: &[&str] = &["graphql", "StaticQuery", "getServerData", "config", "Head"];

/// Resource query appended to layout components that render a content file.
const CONTENT_FILE_QUERY: &str = "?__contentFilePath=";

/// Digest over a file path and its contents. Used as the result cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn compute(path: &str, text: &str) -> Self {
        let mut input = Vec::with_capacity(path.len() + text.len() + 1);
        input.extend_from_slice(path.as_bytes());
        input.push(0);
        input.extend_from_slice(text.as_bytes());
        Self(format!("{:032x}", XxHash3_128::oneshot(&input)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw text of one component file.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub path: String,
    pub text: String,
    pub content_hash: ContentHash,
}

/// Strip the content file resource query from a component path.
///
/// ```
/// use quarry::core::source::layout_component_path;
///
/// assert_eq!(
///     layout_component_path("/site/src/layout.js?__contentFilePath=/site/posts/a.mdx"),
///     "/site/src/layout.js"
/// );
/// assert_eq!(layout_component_path("/site/src/page.js"), "/site/src/page.js");
/// ```
pub fn layout_component_path(path: &str) -> &str {
    path.split_once(CONTENT_FILE_QUERY)
        .map_or(path, |(component, _)| component)
}

/// Read a component file.
///
/// The text is read from the layout component path; the returned `path` and
/// the content hash keep the path as given.
pub fn read_source(path: &str) -> Result<SourceText, ExtractError> {
    let text = fs::read_to_string(layout_component_path(path)).map_err(|source| {
        ExtractError::Read {
            path: path.to_string(),
            source,
        }
    })?;
    let content_hash = ContentHash::compute(path, &text);
    Ok(SourceText {
        path: path.to_string(),
        text,
        content_hash,
    })
}

/// Cheap textual check run before any parsing.
pub fn may_contain_queries(text: &str) -> bool {
    QUERY_MARKERS.iter().any(|marker| text.contains(marker))
}

#[cfg(test)]
mod tests {
    use crate::core::source::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_content_hash_is_stable() {
        let a = ContentHash::compute("src/pages/index.js", "export const query = 1");
        let b = ContentHash::compute("src/pages/index.js", "export const query = 1");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_content_hash_depends_on_path_and_text() {
        let base = ContentHash::compute("a.js", "graphql``");
        assert_ne!(base, ContentHash::compute("b.js", "graphql``"));
        assert_ne!(base, ContentHash::compute("a.js", "graphql` `"));
        // The separator keeps "ab" + "c" apart from "a" + "bc".
        assert_ne!(
            ContentHash::compute("ab", "c"),
            ContentHash::compute("a", "bc")
        );
    }

    #[test]
    fn test_may_contain_queries() {
        assert!(may_contain_queries("import { graphql } from 'gatsby'"));
        assert!(may_contain_queries("const data = useStaticQuery(q)"));
        assert!(may_contain_queries("export async function getServerData() {}"));
        assert!(may_contain_queries("export const Head = () => null"));
        assert!(may_contain_queries("export const config = {}"));
        assert!(!may_contain_queries("export default function Page() { return null }"));
    }

    #[test]
    fn test_read_source_missing_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.js");
        let err = read_source(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ExtractError::Read { .. }));
    }

    #[test]
    fn test_read_source_strips_content_file_query() {
        let dir = tempdir().unwrap();
        let layout = dir.path().join("layout.js");
        fs::write(&layout, "export const query = graphql`{ site { id } }`").unwrap();

        let requested = format!("{}?__contentFilePath=/posts/a.mdx", layout.display());
        let source = read_source(&requested).unwrap();

        assert_eq!(source.path, requested);
        assert!(source.text.contains("site"));
        assert_eq!(source.content_hash, ContentHash::compute(&requested, &source.text));
    }
}
