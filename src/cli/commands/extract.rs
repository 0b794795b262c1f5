use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use tracing::{debug, info};

use super::super::args::ExtractCommand;
use super::{CommandResult, ExtractSummary};
use crate::config::{ConfigLoadResult, load_config};
use crate::core::FileParser;
use crate::core::file_scanner::scan_files;
use crate::core::sink::{CollectingReporter, MemoryStore};
use crate::diagnostics::Diagnostic;

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let source_root = cmd
        .common
        .source_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let ConfigLoadResult { config, from_file } = load_config(&source_root)?;
    debug!(from_file, root = %source_root.display(), "configuration loaded");

    let mut options = config.parser_options();
    if cmd.no_static_query_elements {
        options.static_query_elements = false;
    }

    let scan = scan_files(
        &source_root.to_string_lossy(),
        &config.includes,
        &config.ignores,
        config.ignore_test_files,
    );
    if scan.skipped_count > 0 {
        debug!(count = scan.skipped_count, "paths could not be accessed");
    }
    let paths: Vec<String> = scan
        .files
        .into_iter()
        .map(|path| match path.strip_prefix("./") {
            Some(relative) => relative.to_string(),
            None => path,
        })
        .collect();

    let store = Arc::new(MemoryStore::new());
    let reporter = Arc::new(CollectingReporter::new());
    let parser = FileParser::new(store.clone(), reporter.clone())
        .with_options(options)
        .with_highlight_code(!cmd.json);

    let (fragments, aborted) = match parser.parse_files(&paths) {
        Ok(fragments) => (fragments, false),
        Err(err) => {
            debug!("extraction aborted: {err}");
            (Vec::new(), true)
        }
    };
    info!(
        files = paths.len(),
        fragments = fragments.len(),
        "extraction finished"
    );

    let mut diagnostics = reporter.take();
    diagnostics.sort_by(compare_diagnostics);

    Ok(CommandResult::extract(ExtractSummary {
        fragments,
        components: store.snapshot(),
        diagnostics,
        files_scanned: paths.len(),
        aborted,
        json: cmd.json,
    }))
}

/// Parallel extraction reports in any order; sort by file, then position.
fn compare_diagnostics(a: &Diagnostic, b: &Diagnostic) -> std::cmp::Ordering {
    a.file_path
        .cmp(&b.file_path)
        .then_with(|| {
            let offset = |d: &Diagnostic| d.location.map(|l| l.start.offset);
            offset(a).cmp(&offset(b))
        })
        .then_with(|| a.id.cmp(&b.id))
}
