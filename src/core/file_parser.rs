//! Batch entry point: read, parse and extract many component files.
//!
//! Per file the pipeline is read -> pre-filter -> (cache or parse + extract +
//! feature scan) -> sink events. Recoverable failures are reported through
//! the [`ErrorReporter`] and the file contributes no fragments. Only the
//! deprecated ambient tag aborts the batch.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::core::cache::{CachedResult, MemoryCache, ResultCache, get_or_compute};
use crate::core::data::QueryFragment;
use crate::core::error::ExtractError;
use crate::core::extract::{ParserOptions, find_graphql_tags};
use crate::core::features::FeatureFlags;
use crate::core::parsers::jsx::{NoPreprocess, Preprocess, parse_to_ast};
use crate::core::sink::{ComponentStore, ErrorReporter, ExtractionFailure};
use crate::core::source::{SourceText, may_contain_queries, read_source};
use crate::diagnostics::{self, diagnose};

pub struct FileParser {
    preprocessor: Arc<dyn Preprocess>,
    cache: Arc<dyn ResultCache>,
    store: Arc<dyn ComponentStore>,
    reporter: Arc<dyn ErrorReporter>,
    options: ParserOptions,
    highlight_code: bool,
}

impl FileParser {
    /// Parser with no preprocessing, a fresh in-memory cache and default
    /// options.
    pub fn new(store: Arc<dyn ComponentStore>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            preprocessor: Arc::new(NoPreprocess),
            cache: Arc::new(MemoryCache::new()),
            store,
            reporter,
            options: ParserOptions::default(),
            highlight_code: false,
        }
    }

    pub fn with_preprocessor(mut self, preprocessor: Arc<dyn Preprocess>) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Color code frames in diagnostics.
    pub fn with_highlight_code(mut self, highlight_code: bool) -> Self {
        self.highlight_code = highlight_code;
        self
    }

    /// Extract the fragments of one file.
    ///
    /// Returns `Ok` with an empty list for skipped and failed files; `Err` only
    /// for fatal errors.
    pub fn parse_file(&self, path: &str) -> Result<Vec<QueryFragment>, ExtractError> {
        let source = match read_source(path) {
            Ok(source) => source,
            Err(err) => {
                self.fail(path, &err, None, ExtractionFailure::Query);
                return Ok(Vec::new());
            }
        };

        if !may_contain_queries(&source.text) {
            debug!(file = path, "no query markers, skipped");
            return Ok(Vec::new());
        }

        let result = match get_or_compute(self.cache.as_ref(), &source.content_hash, || {
            self.compute(&source)
        }) {
            Ok(result) => result,
            Err(err) => {
                let failure = match &err {
                    ExtractError::Parse {
                        variants_tried: 0, ..
                    } => ExtractionFailure::SourceSyntax,
                    _ => ExtractionFailure::Query,
                };
                self.fail(path, &err, Some(source.text.as_str()), failure);
                if err.is_fatal() {
                    return Err(err);
                }
                return Ok(Vec::new());
            }
        };

        self.store.set_component_features(path, result.features);
        if !result.fragments.is_empty() {
            self.store.query_extracted(path);
        }
        Ok(result.fragments.clone())
    }

    /// Extract the fragments of many files in parallel.
    ///
    /// Fragments of one file stay in extraction order; the order across files
    /// follows `paths`.
    pub fn parse_files<S: AsRef<str> + Sync>(
        &self,
        paths: &[S],
    ) -> Result<Vec<QueryFragment>, ExtractError> {
        let per_file = paths
            .par_iter()
            .map(|path| self.parse_file(path.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(per_file.into_iter().flatten().collect())
    }

    fn compute(&self, source: &SourceText) -> Result<CachedResult, ExtractError> {
        debug!(file = %source.path, hash = %source.content_hash, "extracting");
        let parsed = parse_to_ast(&source.path, &source.text, self.preprocessor.as_ref())?;
        let extraction = find_graphql_tags(&source.path, &parsed, &self.options)?;

        for warning in &extraction.warnings {
            self.reporter.report(diagnostics::unresolved_variable(warning));
        }

        Ok(CachedResult {
            fragments: extraction.fragments,
            features: FeatureFlags::detect(&parsed.module),
        })
    }

    fn fail(&self, path: &str, err: &ExtractError, text: Option<&str>, failure: ExtractionFailure) {
        self.reporter
            .report(diagnose(err, path, text, self.highlight_code));
        self.store.extraction_failed(path, failure);
    }
}
