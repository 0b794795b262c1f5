//! Common utility functions shared across the codebase.

use crate::core::data::QueryType;

/// Characters kept by [`slugify`] besides alphanumerics.
const SLUG_ALLOWED: &[char] = &[
    '_', '$', '*', '+', '~', '.', '(', ')', '\'', '"', '!', ':', '@', '-',
];

/// Drop characters that are not allowed in a slug and turn whitespace runs
/// into single spaces. Case is preserved.
///
/// ```
/// use quarry::utils::slugify;
///
/// assert_eq!(slugify("/src/pages/index.js"), "srcpagesindex.js");
/// assert_eq!(slugify("my  page/[id].tsx"), "my pageid.tsx");
/// ```
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            in_space = true;
            continue;
        }
        if !(c.is_alphanumeric() || SLUG_ALLOWED.contains(&c)) {
            continue;
        }
        if in_space && !out.is_empty() {
            out.push(' ');
        }
        in_space = false;
        out.push(c);
    }
    out
}

/// Split text into words: digit runs, capitalized words, acronyms and
/// lowercase runs. Everything else separates words.
fn words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_numeric() != c.is_numeric())
                || (prev.is_lowercase() && c.is_uppercase())
                // "HTMLPage" splits before the "P" of "Page"
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(|n| n.is_lowercase()));
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Convert text to lower camel case.
///
/// ```
/// use quarry::utils::camel_case;
///
/// assert_eq!(camel_case("page-srcpagesindex.js-1234"), "pageSrcpagesindexJs1234");
/// assert_eq!(camel_case("static-HTMLPage"), "staticHtmlPage");
/// ```
pub fn camel_case(text: &str) -> String {
    words(text)
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i == 0 {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Name given to unnamed query definitions.
///
/// Deterministic in (query type, file path, hash).
pub fn generate_query_name(query_type: QueryType, file_path: &str, hash: u32) -> String {
    camel_case(&format!("{}-{}-{}", query_type, slugify(file_path), hash))
}
