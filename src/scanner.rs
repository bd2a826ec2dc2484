use crate::error::Result;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories that never hold the application's router
const SKIPPED_DIRS: [&str; 4] = ["target", "tests", "benches", "examples"];

/// File scanner for collecting the Rust sources of a crate.
///
/// The `FileScanner` recursively walks a crate directory and records every `.rs` file
/// together with the module it defines. Build output, hidden directories and the
/// `tests`/`benches`/`examples` trees are skipped.
///
/// # Example
///
/// ```no_run
/// use postman_from_routes::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-service"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.source_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// A Rust source file and the module it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Innermost module name, `None` for crate roots (`main.rs`, `lib.rs`, `bin/*`)
    pub module: Option<String>,
}

/// Result of directory scanning operation.
#[derive(Debug)]
pub struct ScanResult {
    /// Every discovered `.rs` file, in walk order
    pub source_files: Vec<SourceFile>,
    /// Warning messages for paths that could not be read
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all `.rs` files.
    ///
    /// Inaccessible entries are logged and reported in [`ScanResult::warnings`]; scanning
    /// continues past them.
    pub fn scan(&self) -> Result<ScanResult> {
        // A missing or unreadable root is an error, unlike entries below it
        fs::metadata(&self.root_path)?;

        let mut source_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.path() == self.root_path {
                    return true;
                }
                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_skipped = e.file_type().is_dir() && SKIPPED_DIRS.contains(&&*file_name);
                !is_hidden && !is_skipped
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs") {
                        let relative = path.strip_prefix(&self.root_path).unwrap_or(path);
                        let module = module_name(relative);
                        debug!("Found source file {} (module {:?})", path.display(), module);
                        source_files.push(SourceFile {
                            path: path.to_path_buf(),
                            module,
                        });
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult {
            source_files,
            warnings,
        })
    }
}

/// Module name of a source file, given its path relative to the crate root.
///
/// `src/blog.rs`, `src/blog/mod.rs` and `src/api/blog.rs` all define `blog`. Crate roots and
/// binaries define no module.
pub fn module_name(relative: &Path) -> Option<String> {
    let dirs: Vec<String> = relative
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .filter(|c| c != "src")
                .collect()
        })
        .unwrap_or_default();
    let stem = relative.file_stem()?.to_string_lossy().into_owned();

    if dirs.first().map(String::as_str) == Some("bin") {
        return None;
    }
    match stem.as_str() {
        "main" | "lib" if dirs.is_empty() => None,
        "mod" => dirs.last().cloned(),
        _ => Some(stem),
    }
}
