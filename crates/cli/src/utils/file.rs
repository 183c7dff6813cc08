use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories that never hold sources worth mocking
const SKIPPED_DIRS: &[&str] = &[".build", ".git", "DerivedData", "Pods", "Carthage"];

fn is_swift_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "swift")
}

/// Expand files and directories into a sorted, de-duplicated list of Swift
/// sources.
pub fn collect_swift_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }

        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                // Skip build output and dependency checkouts
                if let Some(name) = e.file_name().to_str() {
                    if e.depth() > 0 && SKIPPED_DIRS.contains(&name) {
                        return false;
                    }
                }
                true
            })
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && is_swift_file(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    tracing::debug!("Collected {} Swift file(s)", files.len());
    files
}
