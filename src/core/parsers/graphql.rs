//! Thin layer over `graphql-parser` for the documents embedded in tags.

use std::sync::LazyLock;

use graphql_parser::query::{Definition, OperationDefinition, Query};
use regex::Regex;
use twox_hash::XxHash3_128;

pub type Document = graphql_parser::query::Document<'static, String>;

static ERROR_POSITION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Parse error at (\d+):(\d+)").unwrap());

/// Syntax error reported by the query grammar.
///
/// `line` and `column` are 1-based and relative to the template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQLSyntaxError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

pub fn parse_document(text: &str) -> Result<Document, GraphQLSyntaxError> {
    graphql_parser::parse_query::<String>(text)
        .map(|doc| doc.into_static())
        .map_err(|err| {
            let raw = err.to_string();
            let raw = raw.strip_prefix("query parse error: ").unwrap_or(&raw);
            let position = ERROR_POSITION_REGEX.captures(raw).and_then(|caps| {
                let line = caps[1].parse().ok()?;
                let column = caps[2].parse().ok()?;
                Some((line, column))
            });
            // The first line only repeats the position.
            let message = match raw.split_once('\n') {
                Some((first, rest)) if ERROR_POSITION_REGEX.is_match(first) && !rest.trim().is_empty() => {
                    rest.trim().to_string()
                }
                _ => raw.trim().to_string(),
            };
            GraphQLSyntaxError {
                message,
                line: position.map(|(line, _)| line),
                column: position.map(|(_, column)| column),
            }
        })
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Remove comments, commas and insignificant whitespace.
///
/// String and block string contents are kept verbatim. A single space is
/// kept only where two names would otherwise merge.
///
/// ```
/// use quarry::core::parsers::graphql::normalize;
///
/// assert_eq!(
///     normalize("query Q {\n  site { # meta\n    title, id\n  }\n}"),
///     "query Q{site{title id}}"
/// );
/// ```
pub fn normalize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' | ',' | '\u{feff}' => {
                pending_space = true;
                i += 1;
            }
            '#' => {
                while i < chars.len() && chars[i] != '\n' && chars[i] != '\r' {
                    i += 1;
                }
                pending_space = true;
            }
            '"' => {
                let block = chars[i..].starts_with(&['"', '"', '"']);
                let start = i;
                if block {
                    i += 3;
                    while i < chars.len() && !chars[i..].starts_with(&['"', '"', '"']) {
                        i += if chars[i] == '\\' { 2 } else { 1 };
                    }
                    i = (i + 3).min(chars.len());
                } else {
                    i += 1;
                    while i < chars.len() && chars[i] != '"' && chars[i] != '\n' {
                        i += if chars[i] == '\\' { 2 } else { 1 };
                    }
                    i = (i + 1).min(chars.len());
                }
                pending_space = false;
                out.extend(&chars[start..i]);
            }
            _ => {
                if pending_space && out.chars().last().is_some_and(is_name_char) && is_name_char(c) {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Hash of the normalized document text.
pub fn document_hash(text: &str) -> u32 {
    XxHash3_128::oneshot(normalize(text).as_bytes()) as u32
}

/// Byte offset of a 1-based line/column position inside `text`.
///
/// Columns count characters. Positions past the end clamp to the text length.
pub fn locate_in_template(text: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (index, current) in text.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            return offset
                + current
                    .char_indices()
                    .nth(column.saturating_sub(1))
                    .map_or(current.len(), |(byte, _)| byte);
        }
        offset += current.len();
    }
    offset
}

/// Byte offset of the first definition inside the template text.
pub fn document_start(text: &str, document: &Document) -> usize {
    let position = document.definitions.first().map(|def| match def {
        Definition::Operation(OperationDefinition::SelectionSet(set)) => set.span.0,
        Definition::Operation(OperationDefinition::Query(q)) => q.position,
        Definition::Operation(OperationDefinition::Mutation(m)) => m.position,
        Definition::Operation(OperationDefinition::Subscription(s)) => s.position,
        Definition::Fragment(f) => f.position,
    });
    position.map_or(0, |pos| locate_in_template(text, pos.line, pos.column))
}

/// Name of the first definition, if it has one.
pub fn first_definition_name(document: &Document) -> Option<&str> {
    document.definitions.first().and_then(|def| match def {
        Definition::Operation(OperationDefinition::SelectionSet(_)) => None,
        Definition::Operation(OperationDefinition::Query(q)) => q.name.as_deref(),
        Definition::Operation(OperationDefinition::Mutation(m)) => m.name.as_deref(),
        Definition::Operation(OperationDefinition::Subscription(s)) => s.name.as_deref(),
        Definition::Fragment(f) => Some(f.name.as_str()),
    })
}

/// Give every unnamed operation `name`.
///
/// An anonymous selection set becomes a named query. Returns true if any
/// definition was renamed.
pub fn name_definitions(document: &mut Document, name: &str) -> bool {
    let mut renamed = false;
    for def in &mut document.definitions {
        let Definition::Operation(op) = def else {
            continue;
        };
        match op {
            OperationDefinition::SelectionSet(set) => {
                let span = set.span;
                let selection_set = std::mem::replace(
                    set,
                    graphql_parser::query::SelectionSet {
                        span,
                        items: Vec::new(),
                    },
                );
                *op = OperationDefinition::Query(Query {
                    position: selection_set.span.0,
                    name: Some(name.to_string()),
                    variable_definitions: Vec::new(),
                    directives: Vec::new(),
                    selection_set,
                });
                renamed = true;
            }
            OperationDefinition::Query(Query { name: slot @ None, .. }) => {
                *slot = Some(name.to_string());
                renamed = true;
            }
            OperationDefinition::Mutation(m) if m.name.is_none() => {
                m.name = Some(name.to_string());
                renamed = true;
            }
            OperationDefinition::Subscription(s) if s.name.is_none() => {
                s.name = Some(name.to_string());
                renamed = true;
            }
            _ => {}
        }
    }
    renamed
}
