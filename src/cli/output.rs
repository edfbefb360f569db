//! Output formatting utilities

use crate::application::{CheckReport, EquationSummary};
use crate::domain::TagKind;
use crate::error::EqrefError;

fn kind_label(kind: TagKind) -> &'static str {
    match kind {
        TagKind::Number => "number",
        TagKind::PlainText => "text",
        TagKind::LatexSymbol => "latex",
    }
}

/// Format a list of equation summaries for display
pub fn format_equation_list(summaries: &[EquationSummary]) -> String {
    if summaries.is_empty() {
        return "No labeled equations found".to_string();
    }

    let mut output = String::new();
    for summary in summaries {
        output.push_str(&format!(
            "{}  {:<20}  {:<6}  {}\n",
            summary.file,
            summary.id,
            kind_label(summary.kind),
            summary.display_tag
        ));
    }
    output
}

/// Format a validation report for display
pub fn format_check_report(report: &CheckReport) -> String {
    if !report.has_issues() {
        return format!(
            "Checked {} document(s), no issues found\n",
            report.documents_checked
        );
    }

    let mut output = String::new();
    for issue in &report.issues {
        output.push_str(&format!("{}: {}\n", issue.file, issue.error));

        // List each missing reference under its document
        if let EqrefError::UnresolvedReferences(refs) = &issue.error {
            for r in refs {
                output.push_str(&format!("    {}\n", r));
            }
        }
    }
    output.push_str(&format!(
        "\nChecked {} document(s), {} with issues\n",
        report.documents_checked,
        report.issues.len()
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::check_document::DocumentIssue;
    use crate::domain::equations::{ReferenceContext, UnresolvedReference};

    fn summary(file: &str, id: &str, kind: TagKind, tag: &str) -> EquationSummary {
        EquationSummary {
            file: file.to_string(),
            id: id.to_string(),
            kind,
            display_tag: tag.to_string(),
        }
    }

    #[test]
    fn test_format_empty_equation_list() {
        let output = format_equation_list(&[]);
        assert_eq!(output, "No labeled equations found");
    }

    #[test]
    fn test_format_equation_list() {
        let summaries = vec![
            summary("doc.md", "eq-cond", TagKind::PlainText, "Condition"),
            summary("doc.md", "eq-n", TagKind::Number, "1"),
            summary("doc.md", "eq-star", TagKind::LatexSymbol, "$\\star$"),
        ];

        let output = format_equation_list(&summaries);
        assert!(output.contains("eq-cond"));
        assert!(output.contains("text"));
        assert!(output.contains("number"));
        assert!(output.contains("latex"));
        assert!(output.contains("$\\star$"));
    }

    #[test]
    fn test_format_clean_check_report() {
        let report = CheckReport {
            documents_checked: 3,
            issues: vec![],
        };
        let output = format_check_report(&report);
        assert_eq!(output, "Checked 3 document(s), no issues found\n");
    }

    #[test]
    fn test_format_check_report_with_unresolved_details() {
        let report = CheckReport {
            documents_checked: 2,
            issues: vec![DocumentIssue {
                file: "bad.md".to_string(),
                error: EqrefError::UnresolvedReferences(vec![UnresolvedReference {
                    id: "eq-missing".to_string(),
                    line: 4,
                    context: ReferenceContext::Prose,
                }]),
            }],
        };

        let output = format_check_report(&report);
        assert!(output.contains("bad.md"));
        assert!(output.contains("@eq-missing (line 4)"));
        assert!(output.contains("1 with issues"));
    }
}
