use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use tracing::warn;
use walkdir::WalkDir;

use crate::config::TEST_FILE_PATTERNS;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Component files found under a source root.
pub struct ScanResult {
    /// Sorted, so batch output is stable between runs.
    pub files: BTreeSet<String>,
    pub skipped_count: usize,
}

pub fn scan_files(
    base_dir: &str,
    includes: &[String],
    ignore_patterns: &[String],
    ignore_test_files: bool,
) -> ScanResult {
    let mut files = BTreeSet::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => warn!(pattern = %p, "invalid ignore pattern: {e}"),
            }
        } else {
            literal_ignore_paths.push(Path::new(base_dir).join(p));
        }
    }

    if ignore_test_files {
        glob_patterns.extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
    }

    let dirs_to_scan: Vec<PathBuf> = if includes.is_empty() {
        vec![Path::new(base_dir).to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for inc in includes {
            if is_glob_pattern(inc) {
                let full_pattern = Path::new(base_dir).join(inc);
                match glob(&full_pattern.to_string_lossy()) {
                    Ok(entries) => paths.extend(entries.flatten().filter(|entry| entry.is_dir())),
                    Err(e) => warn!(pattern = %inc, "invalid include pattern: {e}"),
                }
            } else {
                let path = Path::new(base_dir).join(inc);
                if path.exists() {
                    paths.push(path);
                } else {
                    warn!(path = %path.display(), "include path does not exist");
                }
            }
        }
        paths
    };

    for dir in dirs_to_scan {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    warn!("cannot access path: {e}");
                    continue;
                }
            };
            let path = entry.path();
            let path_str = path.to_string_lossy();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }

            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if path.is_file() && is_component_file(path) {
                files.insert(path_str.into());
            }
        }
    }

    ScanResult {
        files,
        skipped_count,
    }
}

fn is_component_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tsx" | "ts" | "jsx" | "js" | "mjs" | "cjs")
    )
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn scan(dir: &Path, includes: &[&str], ignores: &[&str], ignore_test_files: bool) -> Vec<String> {
        let includes: Vec<String> = includes.iter().map(|s| s.to_string()).collect();
        let ignores: Vec<String> = ignores.iter().map(|s| s.to_string()).collect();
        scan_files(dir.to_str().unwrap(), &includes, &ignores, ignore_test_files)
            .files
            .into_iter()
            .collect()
    }

    #[test]
    fn test_scan_component_files() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("index.js")).unwrap();
        File::create(dir.path().join("seo.tsx")).unwrap();
        File::create(dir.path().join("layout.css")).unwrap();
        File::create(dir.path().join("post.md")).unwrap();

        let files = scan(dir.path(), &[], &[], false);

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("index.js"));
        assert!(files[1].ends_with("seo.tsx"));
    }

    #[test]
    fn test_scan_ignores_glob() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join(".cache");
        fs::create_dir(&cache).unwrap();
        File::create(cache.join("app.js")).unwrap();
        File::create(dir.path().join("page.jsx")).unwrap();

        let files = scan(dir.path(), &[], &["**/.cache/**"], false);

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("page.jsx"));
    }

    #[test]
    fn test_scan_with_includes() {
        let dir = tempdir().unwrap();
        let pages = dir.path().join("src").join("pages");
        fs::create_dir_all(&pages).unwrap();
        File::create(pages.join("index.js")).unwrap();
        let plugins = dir.path().join("plugins");
        fs::create_dir(&plugins).unwrap();
        File::create(plugins.join("gatsby-node.js")).unwrap();

        let files = scan(dir.path(), &["src"], &[], false);

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/pages/index.js"));
    }

    #[test]
    fn test_scan_with_glob_include() {
        let dir = tempdir().unwrap();
        for sub in ["pages", "components", "templates"] {
            let path = dir.path().join("src").join(sub);
            fs::create_dir_all(&path).unwrap();
            File::create(path.join("a.js")).unwrap();
        }
        File::create(dir.path().join("gatsby-config.js")).unwrap();

        let files = scan(dir.path(), &["src/*"], &[], false);

        assert_eq!(files.len(), 3);
        assert!(!files.iter().any(|f| f.ends_with("gatsby-config.js")));
    }

    #[test]
    fn test_scan_deduplicates_overlapping_includes() {
        let dir = tempdir().unwrap();
        let components = dir.path().join("src").join("components");
        fs::create_dir_all(&components).unwrap();
        File::create(components.join("seo.js")).unwrap();

        let files = scan(dir.path(), &["src", "src/components"], &[], false);

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_scan_with_nonexistent_include() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        File::create(src.join("index.js")).unwrap();

        assert_eq!(scan(dir.path(), &["src", "missing"], &[], false).len(), 1);
    }

    #[test]
    fn test_scan_ignores_test_files() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("seo.js")).unwrap();
        File::create(dir.path().join("seo.test.js")).unwrap();
        File::create(dir.path().join("seo.spec.tsx")).unwrap();
        let tests_dir = dir.path().join("__tests__");
        fs::create_dir(&tests_dir).unwrap();
        File::create(tests_dir.join("helper.js")).unwrap();

        assert_eq!(scan(dir.path(), &[], &[], true).len(), 1);
        assert_eq!(scan(dir.path(), &[], &[], false).len(), 4);
    }

    #[test]
    fn test_scan_ignores_literal_directory_path() {
        let dir = tempdir().unwrap();
        let components = dir.path().join("src").join("components");
        let generated = dir.path().join("src").join("generated");
        fs::create_dir_all(&components).unwrap();
        fs::create_dir_all(&generated).unwrap();
        File::create(components.join("seo.js")).unwrap();
        File::create(generated.join("types.ts")).unwrap();

        let files = scan(dir.path(), &["src"], &["src/generated"], false);

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("seo.js"));
    }

    #[test]
    fn test_scan_with_literal_bracket_path() {
        let dir = tempdir().unwrap();
        let dynamic = dir.path().join("src").join("pages").join("[slug]");
        fs::create_dir_all(&dynamic).unwrap();
        File::create(dynamic.join("index.js")).unwrap();

        let files = scan(dir.path(), &["src/pages/[slug]"], &[], false);

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("src/*"));
        assert!(is_glob_pattern("file?.js"));
        assert!(!is_glob_pattern("src/pages/[slug]"));
    }

    #[test]
    fn test_is_component_file() {
        assert!(is_component_file(Path::new("index.js")));
        assert!(is_component_file(Path::new("seo.tsx")));
        assert!(is_component_file(Path::new("gatsby-node.mjs")));
        assert!(!is_component_file(Path::new("post.mdx")));
        assert!(!is_component_file(Path::new("data.json")));
    }
}
