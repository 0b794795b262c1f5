//! Receivers for what the batch finds: component state and diagnostics.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{error, warn};

use crate::core::features::FeatureFlags;
use crate::diagnostics::{Diagnostic, Severity};

/// Why a component yielded no queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionFailure {
    /// The component source itself did not parse.
    SourceSyntax,
    /// Reading the file, a preprocessed variant or a query failed.
    Query,
}

/// Per-component state sink.
pub trait ComponentStore: Send + Sync {
    /// Called after every successful extraction, including when every flag
    /// is false.
    fn set_component_features(&self, component_path: &str, features: FeatureFlags);
    fn query_extracted(&self, component_path: &str);
    fn extraction_failed(&self, component_path: &str, failure: ExtractionFailure);
}

/// Diagnostic callback. Never used to abort the batch.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentState {
    pub features: Option<FeatureFlags>,
    pub query_extracted: bool,
    pub failure: Option<ExtractionFailure>,
}

/// Store that keeps the latest state of every component in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    components: Mutex<BTreeMap<String, ComponentState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, component_path: &str) -> Option<ComponentState> {
        lock(&self.components).get(component_path).cloned()
    }

    /// All components, ordered by path.
    pub fn snapshot(&self) -> BTreeMap<String, ComponentState> {
        lock(&self.components).clone()
    }
}

impl ComponentStore for MemoryStore {
    fn set_component_features(&self, component_path: &str, features: FeatureFlags) {
        let mut components = lock(&self.components);
        let state = components.entry(component_path.to_string()).or_default();
        state.features = Some(features);
        state.failure = None;
    }

    fn query_extracted(&self, component_path: &str) {
        let mut components = lock(&self.components);
        components
            .entry(component_path.to_string())
            .or_default()
            .query_extracted = true;
    }

    fn extraction_failed(&self, component_path: &str, failure: ExtractionFailure) {
        let mut components = lock(&self.components);
        let state = components.entry(component_path.to_string()).or_default();
        state.query_extracted = false;
        state.failure = Some(failure);
    }
}

/// Reporter that logs every diagnostic through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => error!(
                id = %diagnostic.id,
                code = diagnostic.code,
                file = %diagnostic.file_path,
                "{}",
                diagnostic.message
            ),
            Severity::Warning => warn!(
                id = %diagnostic.id,
                file = %diagnostic.file_path,
                "{}",
                diagnostic.message
            ),
        }
    }
}

/// Reporter that keeps diagnostics for later display.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything reported so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *lock(&self.diagnostics))
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        lock(&self.diagnostics).push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use crate::core::sink::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_store_tracks_latest_state() {
        let store = MemoryStore::new();
        store.extraction_failed("a.js", ExtractionFailure::Query);
        assert_eq!(store.get("a.js").unwrap().failure, Some(ExtractionFailure::Query));

        let features = FeatureFlags {
            has_head_export: true,
            ..Default::default()
        };
        store.set_component_features("a.js", features);
        store.query_extracted("a.js");

        assert_eq!(
            store.get("a.js").unwrap(),
            ComponentState {
                features: Some(features),
                query_extracted: true,
                failure: None,
            }
        );
        assert!(store.get("b.js").is_none());
    }
}
