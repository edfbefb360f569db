//! Document validation use case
//!
//! Runs the same pipeline as resolution without writing anything, and
//! accumulates issues across all documents for a single report.

use crate::application::resolve_document::resolve_source;
use crate::error::{EqrefError, Result};
use crate::infrastructure::{FileSystemRepository, ProjectRepository};

/// One failing document and its error
#[derive(Debug)]
pub struct DocumentIssue {
    pub file: String,
    pub error: EqrefError,
}

/// Outcome of checking a set of documents
#[derive(Debug, Default)]
pub struct CheckReport {
    pub documents_checked: usize,
    pub issues: Vec<DocumentIssue>,
}

impl CheckReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Service for validating documents
pub struct CheckService {
    repository: FileSystemRepository,
}

impl CheckService {
    /// Create new check service
    pub fn new(repository: FileSystemRepository) -> Self {
        CheckService { repository }
    }

    /// Check the given documents (empty = all documents in the project).
    ///
    /// Unlike resolution, checking does not stop at the first failing
    /// document; every document is validated and reported.
    pub fn execute(&self, files: Vec<String>) -> Result<CheckReport> {
        let config = self.repository.load_config()?;

        let files = if files.is_empty() {
            self.repository.list_documents(&config.output_dir)?
        } else {
            files
        };

        let mut report = CheckReport::default();
        for file in files {
            let source = self.repository.read_document(&file)?;
            report.documents_checked += 1;

            if let Err(error) = resolve_source(&source, &config) {
                report.issues.push(DocumentIssue { file, error });
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::Config;
    use tempfile::TempDir;

    fn project_with(files: &[(&str, &str)]) -> (TempDir, FileSystemRepository) {
        let temp = TempDir::new().unwrap();
        let repo = FileSystemRepository::new(temp.path().to_path_buf());
        repo.initialize().unwrap();
        repo.save_config(&Config::new()).unwrap();
        for (name, content) in files {
            repo.write_document(name, content).unwrap();
        }
        (temp, repo)
    }

    #[test]
    fn test_check_clean_project() {
        let (_temp, repo) = project_with(&[("a.md", "$$ x $$ {#eq-a}\n\nSee @eq-a.\n")]);
        let report = CheckService::new(repo).execute(vec![]).unwrap();

        assert_eq!(report.documents_checked, 1);
        assert!(!report.has_issues());
    }

    #[test]
    fn test_check_reports_every_failing_document() {
        let (_temp, repo) = project_with(&[
            ("bad1.md", "See @eq-missing.\n"),
            ("bad2.md", "$$ x $$ {#eq-a}\n\n$$ y $$ {#eq-a}\n"),
            ("good.md", "$$ x $$ {#eq-a}\n"),
        ]);
        let report = CheckService::new(repo).execute(vec![]).unwrap();

        assert_eq!(report.documents_checked, 3);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.issues[0].file, "bad1.md");
        assert!(matches!(
            report.issues[0].error,
            EqrefError::UnresolvedReferences(_)
        ));
        assert!(matches!(
            report.issues[1].error,
            EqrefError::DuplicateIdentifier { .. }
        ));
    }

    #[test]
    fn test_check_specific_file_only() {
        let (_temp, repo) = project_with(&[
            ("bad.md", "See @eq-missing.\n"),
            ("good.md", "Nothing here.\n"),
        ]);
        let report = CheckService::new(repo)
            .execute(vec!["good.md".to_string()])
            .unwrap();

        assert_eq!(report.documents_checked, 1);
        assert!(!report.has_issues());
    }
}
