use std::path::Path;

use swc_common::{BytePos, FileName, Globals, SourceFile, SourceMap, Span, Spanned, sync::Lrc};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use tracing::debug;

use crate::core::data::{Position, SourceRange};
use crate::core::error::ExtractError;
use crate::core::source::layout_component_path;

/// Source normalization hook run before parsing.
///
/// Returns zero or more alternative texts to try, in order. An empty result
/// means the raw text is parsed as is.
pub trait Preprocess: Send + Sync {
    fn preprocess(&self, file_path: &str, contents: &str) -> Vec<String>;
}

/// Hook that never produces variants.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPreprocess;

impl Preprocess for NoPreprocess {
    fn preprocess(&self, _file_path: &str, _contents: &str) -> Vec<String> {
        Vec::new()
    }
}

/// A parsed component file.
///
/// Owns its own `SourceMap` so files can be parsed on any thread.
pub struct ParsedJSX {
    pub module: Module,
    pub source_map: Lrc<SourceMap>,
    pub source_file: Lrc<SourceFile>,
}

impl ParsedJSX {
    /// Byte offset of `pos` into the parsed text.
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.source_file.start_pos.0) as usize
    }

    pub fn position(&self, pos: BytePos) -> Position {
        let loc = self.source_map.lookup_char_pos(pos);
        Position::new(loc.line, loc.col.0 + 1, self.offset(pos))
    }

    /// Position of a byte offset into the parsed text.
    pub fn position_at_offset(&self, offset: usize) -> Position {
        self.position(self.source_file.start_pos + BytePos(offset as u32))
    }

    pub fn range(&self, span: Span) -> SourceRange {
        SourceRange::new(self.position(span.lo), self.position(span.hi))
    }
}

/// A failed parse of one text, before it is turned into an [`ExtractError`].
#[derive(Debug, Clone)]
pub struct SyntaxFailure {
    pub message: String,
    pub location: Option<Position>,
}

fn syntax_for(file_path: &str) -> Syntax {
    match Path::new(file_path).extension().and_then(|e| e.to_str()) {
        Some("ts" | "mts" | "cts") => Syntax::Typescript(TsSyntax {
            tsx: false,
            ..Default::default()
        }),
        Some("tsx") => Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        }),
    }
}

/// Parse JS/JSX/TS/TSX source code into an AST.
///
/// The syntax is picked from the file extension.
pub fn parse_jsx_source(code: String, file_path: &str) -> Result<ParsedJSX, SyntaxFailure> {
    use swc_common::GLOBALS;

    let source_map: Lrc<SourceMap> = Default::default();

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            None,
        );

        match parser.parse_module() {
            Ok(module) => Ok(ParsedJSX {
                module,
                source_map: source_map.clone(),
                source_file,
            }),
            Err(err) => {
                let lo = err.span().lo;
                let location = (lo.0 >= source_file.start_pos.0).then(|| {
                    let loc = source_map.lookup_char_pos(lo);
                    Position::new(
                        loc.line,
                        loc.col.0 + 1,
                        (lo.0 - source_file.start_pos.0) as usize,
                    )
                });
                Err(SyntaxFailure {
                    message: err.kind().msg().to_string(),
                    location,
                })
            }
        }
    })
}

/// Run the preprocessing hook and parse the first variant that is valid.
///
/// Falls back to the raw text when the hook returns no variants.
pub fn parse_to_ast(
    file_path: &str,
    text: &str,
    preprocessor: &dyn Preprocess,
) -> Result<ParsedJSX, ExtractError> {
    let clean_path = layout_component_path(file_path);
    let variants = preprocessor.preprocess(clean_path, text);

    if variants.is_empty() {
        return parse_jsx_source(text.to_string(), clean_path).map_err(|failure| {
            ExtractError::Parse {
                path: clean_path.to_string(),
                message: failure.message,
                location: failure.location,
                variants_tried: 0,
            }
        });
    }

    let variants_tried = variants.len();
    let mut last_failure = None;
    for (index, variant) in variants.into_iter().enumerate() {
        match parse_jsx_source(variant, clean_path) {
            Ok(parsed) => return Ok(parsed),
            Err(failure) => {
                debug!(file = clean_path, variant = index, error = %failure.message, "source variant failed to parse");
                last_failure = Some(failure);
            }
        }
    }

    let failure = last_failure.unwrap_or(SyntaxFailure {
        message: "no source variant could be parsed".to_string(),
        location: None,
    });
    Err(ExtractError::Parse {
        path: clean_path.to_string(),
        message: failure.message,
        location: failure.location,
        variants_tried,
    })
}
