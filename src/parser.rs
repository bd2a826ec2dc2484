use crate::scanner::SourceFile;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// AST parser for Rust source files.
///
/// Uses `syn` to turn each scanned source file into a syntax tree that the axum route
/// provider can walk.
pub struct AstParser;

/// A successfully parsed Rust file with its abstract syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    /// Module the file defines, as reported by the scanner
    pub module: Option<String>,
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Parses a single Rust source file into an AST.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid Rust syntax.
    pub fn parse_file(path: &Path, module: Option<String>) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let syntax_tree = syn::parse_file(&content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        Ok(ParsedFile {
            path: path.to_path_buf(),
            module,
            syntax_tree,
        })
    }

    /// Parses every scanned file, skipping the ones that fail.
    ///
    /// Failures are logged as warnings so a single broken file does not hide the routes
    /// defined elsewhere in the crate.
    pub fn parse_sources(sources: &[SourceFile]) -> Vec<ParsedFile> {
        debug!("Parsing {} files", sources.len());

        let parsed: Vec<ParsedFile> = sources
            .iter()
            .filter_map(|source| match Self::parse_file(&source.path, source.module.clone()) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!("Skipping {}: {:#}", source.path.display(), e);
                    None
                }
            })
            .collect();

        debug!(
            "Parsing complete: {} succeeded, {} failed",
            parsed.len(),
            sources.len() - parsed.len()
        );
        parsed
    }
}
