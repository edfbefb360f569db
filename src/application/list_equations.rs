//! List equations use case

use crate::domain::equations::{DocumentParser, Registry, TagKind};
use crate::error::Result;
use crate::infrastructure::{FileSystemRepository, ProjectRepository};

/// One labeled equation and its resolved tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationSummary {
    pub file: String,
    pub id: String,
    pub kind: TagKind,
    pub display_tag: String,
}

/// Service for listing labeled equations and their resolved tags.
pub struct ListService {
    repository: FileSystemRepository,
}

impl ListService {
    /// Create a new list service.
    pub fn new(repository: FileSystemRepository) -> Self {
        Self { repository }
    }

    /// List equations in one document, or in every project document.
    pub fn execute(&self, file: Option<String>) -> Result<Vec<EquationSummary>> {
        let config = self.repository.load_config()?;

        let files = match file {
            Some(f) => vec![f],
            None => self.repository.list_documents(&config.output_dir)?,
        };

        let parser = DocumentParser::new(&config.label_prefix);
        let mut summaries = Vec::new();

        for file in files {
            let source = self.repository.read_document(&file)?;
            let scan = parser.scan(&source);
            let registry = Registry::build(&scan.equations, &config.reference_word)?;

            for (id, spec) in registry.iter() {
                summaries.push(EquationSummary {
                    file: file.clone(),
                    id: id.to_string(),
                    kind: spec.kind,
                    display_tag: spec.display_tag_markup.clone(),
                });
            }
        }

        Ok(summaries)
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
    fn test_list_resolves_tags_per_document() {
        let (_temp, repo) = project_with(&[(
            "doc.md",
            "$$ a $$ {#eq-cond tag=\"Condition\"}\n\n$$ b $$ {#eq-n}\n\n$$ c $$ {#eq-star tag=\"\\star\"}\n",
        )]);

        let summaries = ListService::new(repo).execute(None).unwrap();

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].id, "eq-cond");
        assert_eq!(summaries[0].kind, TagKind::PlainText);
        assert_eq!(summaries[0].display_tag, "Condition");
        assert_eq!(summaries[1].id, "eq-n");
        assert_eq!(summaries[1].display_tag, "1");
        assert_eq!(summaries[2].kind, TagKind::LatexSymbol);
        assert_eq!(summaries[2].display_tag, "$\\star$");
    }

    #[test]
    fn test_list_numbering_is_per_document() {
        let (_temp, repo) = project_with(&[
            ("a.md", "$$ x $$ {#eq-one}\n"),
            ("b.md", "$$ y $$ {#eq-other}\n"),
        ]);

        let summaries = ListService::new(repo).execute(None).unwrap();

        // Each document gets an independent registry, so both start at 1
        assert_eq!(summaries[0].display_tag, "1");
        assert_eq!(summaries[1].display_tag, "1");
    }

    #[test]
    fn test_list_single_file() {
        let (_temp, repo) = project_with(&[
            ("a.md", "$$ x $$ {#eq-one}\n"),
            ("b.md", "$$ y $$ {#eq-other}\n"),
        ]);

        let summaries = ListService::new(repo)
            .execute(Some("b.md".to_string()))
            .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, "eq-other");
    }
}
