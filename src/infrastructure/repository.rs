//! File system repository

use crate::error::{EqrefError, Result};
use crate::infrastructure::Config;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Abstract repository for project operations
pub trait ProjectRepository {
    /// Get the root directory of this repository
    fn root(&self) -> &Path;

    /// Load configuration from .eqref/config.toml
    fn load_config(&self) -> Result<Config>;

    /// Save configuration to .eqref/config.toml
    fn save_config(&self, config: &Config) -> Result<()>;

    /// Check if .eqref directory exists
    fn is_initialized(&self) -> bool;

    /// Create .eqref directory structure
    fn initialize(&self) -> Result<()>;
}

/// File system implementation of ProjectRepository
#[derive(Debug, Clone)]
pub struct FileSystemRepository {
    pub root: PathBuf,
}

impl FileSystemRepository {
    /// Create a new repository with the given root directory
    pub fn new(root: PathBuf) -> Self {
        FileSystemRepository { root }
    }

    /// Discover project root by walking up from current directory
    /// First checks EQREF_ROOT environment variable, then falls back to discovery
    pub fn discover() -> Result<Self> {
        // 1. Check EQREF_ROOT environment variable first
        if let Ok(root_path) = std::env::var("EQREF_ROOT") {
            let path = PathBuf::from(root_path);
            if Self::has_eqref_dir(&path) {
                return Ok(FileSystemRepository::new(path));
            } else {
                return Err(EqrefError::Config(format!(
                    "EQREF_ROOT is set to '{}' but no .eqref directory found. \
                    Run 'eqref init' in that directory or unset EQREF_ROOT.",
                    path.display()
                )));
            }
        }

        // 2. Fall back to walking up from current directory
        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover project root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_eqref_dir(&current) {
                return Ok(FileSystemRepository::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => {
                    // Reached filesystem root without finding .eqref
                    return Err(EqrefError::NotProjectDirectory(start.to_path_buf()));
                }
            }
        }
    }

    /// Check if a path contains a .eqref directory
    fn has_eqref_dir(path: &Path) -> bool {
        path.join(".eqref").is_dir()
    }
}

impl ProjectRepository for FileSystemRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    fn is_initialized(&self) -> bool {
        Self::has_eqref_dir(&self.root)
    }

    fn initialize(&self) -> Result<()> {
        let eqref_dir = self.root.join(".eqref");

        if eqref_dir.exists() {
            return Err(EqrefError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&eqref_dir)?;
        Ok(())
    }
}

// Document operations (not part of trait - filesystem-specific)
impl FileSystemRepository {
    /// List markdown documents under the root, relative paths sorted.
    ///
    /// Skips the .eqref directory and the configured output directory.
    pub fn list_documents(&self, output_dir: &str) -> Result<Vec<String>> {
        let mut documents = Vec::new();

        for entry in WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                name != ".eqref" && name != output_dir
            })
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let is_markdown = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == "md" || e == "qmd")
                .unwrap_or(false);
            if !is_markdown {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                if let Some(s) = relative.to_str() {
                    documents.push(s.to_string());
                }
            }
        }

        documents.sort();
        Ok(documents)
    }

    /// Check if a document exists
    pub fn document_exists(&self, filename: &str) -> bool {
        self.root.join(filename).exists()
    }

    /// Read document content
    pub fn read_document(&self, filename: &str) -> Result<String> {
        let path = self.root.join(filename);
        fs::read_to_string(&path).map_err(EqrefError::Io)
    }

    /// Write document content (creates parent directories if needed)
    pub fn write_document(&self, filename: &str, content: &str) -> Result<()> {
        let path = self.root.join(filename);

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&path, content).map_err(EqrefError::Io)
    }
}
