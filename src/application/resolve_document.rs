//! Document resolution use case
//!
//! Orchestrates the two-phase pass for each document: build the complete
//! tag registry first, then rewrite every reference against it.

use crate::domain::equations::{DocumentParser, ReferenceRewriter, Registry, ResolvedDocument};
use crate::error::Result;
use crate::infrastructure::{Config, FileSystemRepository, ProjectRepository};
use std::path::{Path, PathBuf};

/// Options for resolution
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Documents to resolve, relative to the project root (empty = all)
    pub files: Vec<String>,

    /// Overwrite the source documents instead of writing to the output dir
    pub in_place: bool,

    /// Output directory override (default: from config)
    pub output_dir: Option<String>,
}

/// Resolve a single document's source against a fresh registry.
///
/// Every document gets its own registry; no state is shared across
/// documents or runs.
pub fn resolve_source(source: &str, config: &Config) -> Result<ResolvedDocument> {
    let scan = DocumentParser::new(&config.label_prefix).scan(source);
    let registry = Registry::build(&scan.equations, &config.reference_word)?;
    ReferenceRewriter::new(&config.label_prefix).rewrite(source, &scan, &registry)
}

/// Service for resolving documents
pub struct ResolveService {
    repository: FileSystemRepository,
}

impl ResolveService {
    /// Create new resolve service
    pub fn new(repository: FileSystemRepository) -> Self {
        ResolveService { repository }
    }

    /// Execute the resolution
    ///
    /// Returns the paths of the documents written.
    ///
    /// # Errors
    ///
    /// Returns an error if any targeted document has duplicate equation
    /// identifiers, a malformed tag, or unresolved references. A failing
    /// document is never written.
    pub fn execute(&self, options: ResolveOptions) -> Result<Vec<PathBuf>> {
        let config = self.repository.load_config()?;
        let output_dir = options
            .output_dir
            .unwrap_or_else(|| config.output_dir.clone());

        let files = if options.files.is_empty() {
            self.repository.list_documents(&output_dir)?
        } else {
            options.files
        };

        let mut written = Vec::new();
        for file in files {
            let source = self.repository.read_document(&file)?;
            let resolved = resolve_source(&source, &config)?;

            let target = if options.in_place {
                file.clone()
            } else {
                join_relative(&output_dir, &file)
            };

            self.repository.write_document(&target, &resolved.text)?;
            written.push(self.repository.root().join(&target));
        }

        Ok(written)
    }
}

/// Join a relative document path under the output directory,
/// preserving subdirectories
fn join_relative(output_dir: &str, file: &str) -> String {
    Path::new(output_dir)
        .join(file)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_source_full_pipeline() {
        let config = Config::new();
        let source = "$$\nx = y\n$$ {#eq-a tag=\"\\star\"}\n\nSee @eq-a.\n";

        let resolved = resolve_source(source, &config).unwrap();
        assert!(resolved.text.contains("\\tag{$\\star$}"));
        assert!(resolved.text.contains("[$\\star$](#eq-a)"));
    }

    #[test]
    fn test_resolve_source_respects_config_prefix_and_word() {
        let mut config = Config::new();
        config.label_prefix = "eqn-".to_string();
        config.reference_word = "Eq.".to_string();

        let source = "$$\nx = y\n$$ {#eqn-a}\n\nSee @eqn-a.\n";
        let resolved = resolve_source(source, &config).unwrap();
        assert!(resolved.text.contains("[Eq. 1](#eqn-a)"));
    }

    #[test]
    fn test_join_relative_preserves_subdirectories() {
        assert_eq!(join_relative("_resolved", "ch/intro.md"), "_resolved/ch/intro.md");
    }
}
