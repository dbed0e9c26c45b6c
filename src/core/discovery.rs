// PerfTrend - core/discovery.rs
//
// Recursive directory traversal and run-log discovery.
//
// Architecture note: this module uses `walkdir` for directory traversal as an
// OS abstraction. It reads only directory entries, never file contents; the
// app layer reads each file and hands the text to `core::extract`.
//
// Entries are visited in file-name order so the collection order, which
// breaks timestamp ties in the results table, is reproducible.

use crate::core::model::SourceFile;
use crate::core::timestamp;
use crate::util::error::DiscoveryError;
use std::path::{Path, PathBuf};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a discovery operation.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum directory recursion depth.
    pub max_depth: usize,

    /// Glob patterns (filename-only) that a file MUST match to be included.
    /// An empty list means "include every file".
    pub include_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// Discover run logs under `root`.
///
/// Each accepted file carries its stem and the raw timestamp located in it.
///
/// # Errors
/// Returns `RootNotFound` / `NotADirectory` for an invalid root and
/// `Traversal` for any entry below the root that cannot be read. There is no
/// partial result.
pub fn discover_files(
    root: &Path,
    config: &DiscoveryConfig,
) -> Result<Vec<SourceFile>, DiscoveryError> {
    let walk = walk_tree(root, config)?;

    if let Some(first) = walk.depth_limited.first() {
        tracing::warn!(
            dirs = walk.depth_limited.len(),
            first = %first.display(),
            "Directories at the depth limit were not searched; raise [discovery] max_depth to include them"
        );
    }
    tracing::debug!(files = walk.files.len(), "Discovery complete");

    Ok(walk.files)
}

/// Files accepted by a walk, plus the directories the walk reached but did
/// not enter because of the depth limit.
#[derive(Debug, Default)]
struct Walk {
    files: Vec<SourceFile>,
    depth_limited: Vec<PathBuf>,
}

fn walk_tree(root: &Path, config: &DiscoveryConfig) -> Result<Walk, DiscoveryError> {
    use crate::util::constants;

    // fs::metadata rather than Path::is_dir so that "missing" and "not a
    // directory" are reported separately.
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(DiscoveryError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(DiscoveryError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
    }

    let max_depth = config.max_depth.min(constants::ABSOLUTE_MAX_DEPTH);

    tracing::debug!(
        root = %root.display(),
        max_depth,
        include = ?config.include_patterns,
        "Discovery starting"
    );

    let include_pats = compile_patterns(&config.include_patterns);

    let mut walk = Walk::default();

    let walker = walkdir::WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .sort_by_file_name();

    for entry_result in walker {
        let entry = entry_result.map_err(|e| DiscoveryError::Traversal {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source: e,
        })?;

        if entry.file_type().is_dir() {
            if entry.depth() == max_depth {
                tracing::debug!(dir = %entry.path().display(), "Depth limit reached");
                walk.depth_limited.push(entry.path().to_path_buf());
            }
            continue;
        }

        let path = entry.path();

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => {
                tracing::warn!(file = %path.display(), "Skipping non-UTF-8 file name");
                continue;
            }
        };

        if !is_included(file_name, &include_pats) {
            tracing::trace!(file = file_name, "Not matched by include patterns");
            continue;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let raw_timestamp = timestamp::extract_from_stem(&stem);

        tracing::trace!(file = %path.display(), timestamp = %raw_timestamp, "Run log found");

        walk.files.push(SourceFile {
            path: path.to_path_buf(),
            stem,
            raw_timestamp,
        });
    }

    Ok(walk)
}

// =============================================================================
// Glob helpers
// =============================================================================

/// Compile a list of glob pattern strings into `glob::Pattern` objects.
/// Patterns that fail to compile are logged as warnings and skipped.
fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

/// Returns true if `file_name` matches at least one include pattern.
/// An empty include list means "include all" (returns true).
fn is_included(file_name: &str, include_pats: &[glob::Pattern]) -> bool {
    if include_pats.is_empty() {
        return true;
    }
    include_pats.iter().any(|p| p.matches(file_name))
}

// =============================================================================
// Tests
// =============================================================================
