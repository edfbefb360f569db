//! Tag registry - classification and sequential numbering of equation tags
//!
//! The registry is built once per document, before any reference is
//! rewritten, so forward references resolve. It is immutable afterwards.

use crate::error::{EqrefError, Result};
use std::collections::HashMap;

/// One labeled display-math block, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    /// Unique label, e.g. "eq-pythag"
    pub id: String,

    /// Raw tag attribute as written by the author, if any
    pub declared_tag: Option<String>,

    /// 0-based order of appearance among all labeled equations
    pub position: usize,

    /// Raw math body (may itself contain references to other equations)
    pub math_source: String,
}

/// Classification of a declared tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// No tag declared; an automatically assigned sequential number
    Number,
    /// Author-supplied plain text (e.g. "Condition")
    PlainText,
    /// Author-supplied LaTeX source (e.g. "\star", "\star\star")
    LatexSymbol,
}

/// Resolved tag for one equation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    pub kind: TagKind,

    /// Content of the `\tag{...}` spliced into the equation display,
    /// and of math-nested references to it
    pub display_tag_markup: String,

    /// Visible link text for prose references
    pub reference_markup: String,
}

/// Immutable mapping from equation id to its resolved tag
#[derive(Debug, Clone, Default)]
pub struct Registry {
    specs: HashMap<String, TagSpec>,
    order: Vec<String>,
}

impl Registry {
    /// Build the registry from equations in document order.
    ///
    /// Sequential numbers are assigned only to untagged equations; a
    /// custom-tagged equation never consumes a number, so the numeric
    /// sequence stays dense. `reference_word` is the prose prefix for
    /// numbered references ("Equation" by default).
    ///
    /// # Errors
    ///
    /// Fails fast on a repeated id or a malformed tag attribute.
    ///
    /// # Examples
    ///
    /// ```
    /// use eqref::domain::equations::{Equation, Registry, TagKind};
    ///
    /// let equations = vec![
    ///     Equation {
    ///         id: "eq-star".to_string(),
    ///         declared_tag: Some("\\star".to_string()),
    ///         position: 0,
    ///         math_source: "x = y".to_string(),
    ///     },
    ///     Equation {
    ///         id: "eq-plain".to_string(),
    ///         declared_tag: None,
    ///         position: 1,
    ///         math_source: "a = b".to_string(),
    ///     },
    /// ];
    ///
    /// let registry = Registry::build(&equations, "Equation").unwrap();
    /// assert_eq!(registry.get("eq-star").unwrap().kind, TagKind::LatexSymbol);
    /// // The tagged equation did not consume a number
    /// assert_eq!(registry.get("eq-plain").unwrap().display_tag_markup, "1");
    /// ```
    pub fn build(equations: &[Equation], reference_word: &str) -> Result<Registry> {
        let mut specs = HashMap::new();
        let mut order = Vec::new();
        let mut next_number = 1usize;

        for eq in equations {
            let spec = match &eq.declared_tag {
                None => {
                    let spec = TagSpec {
                        kind: TagKind::Number,
                        display_tag_markup: next_number.to_string(),
                        reference_markup: format!("{} {}", reference_word, next_number),
                    };
                    // Only the untagged branch advances the counter
                    next_number += 1;
                    spec
                }
                Some(raw) => classify_declared_tag(&eq.id, raw)?,
            };

            if specs.insert(eq.id.clone(), spec).is_some() {
                return Err(EqrefError::DuplicateIdentifier { id: eq.id.clone() });
            }
            order.push(eq.id.clone());
        }

        Ok(Registry { specs, order })
    }

    /// Look up the resolved tag for an equation id
    pub fn get(&self, id: &str) -> Option<&TagSpec> {
        self.specs.get(id)
    }

    /// Iterate (id, spec) pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagSpec)> + '_ {
        self.order
            .iter()
            .map(move |id| (id.as_str(), &self.specs[id]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Classify an author-declared tag into plain text or LaTeX source.
///
/// The rule is deterministic: anything containing a control sequence
/// marker (backslash) is LaTeX and is treated as one opaque math string;
/// compound tags like `\star\star` are never decomposed.
fn classify_declared_tag(id: &str, raw: &str) -> Result<TagSpec> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return malformed(id, raw, "tag is empty");
    }
    if trimmed.contains('$') {
        return malformed(id, raw, "tag must not contain $ delimiters");
    }

    if trimmed.contains('\\') {
        validate_latex_tag(id, raw, trimmed)?;
        Ok(TagSpec {
            kind: TagKind::LatexSymbol,
            // Math delimiters, never \text{} - text-mode escaping breaks
            // macro expansion in the math renderer
            display_tag_markup: format!("${}$", trimmed),
            reference_markup: format!("${}$", trimmed),
        })
    } else {
        Ok(TagSpec {
            kind: TagKind::PlainText,
            display_tag_markup: trimmed.to_string(),
            reference_markup: trimmed.to_string(),
        })
    }
}

/// Reject syntactically broken math before it reaches the renderer
fn validate_latex_tag(id: &str, raw: &str, trimmed: &str) -> Result<()> {
    if trimmed.ends_with('\\') {
        return malformed(id, raw, "dangling backslash");
    }

    let mut depth = 0i32;
    for c in trimmed.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return malformed(id, raw, "unbalanced braces");
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return malformed(id, raw, "unbalanced braces");
    }

    Ok(())
}

fn malformed<T>(id: &str, tag: &str, reason: &str) -> Result<T> {
    Err(EqrefError::MalformedTag {
        id: id.to_string(),
        tag: tag.to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(id: &str, tag: Option<&str>, position: usize) -> Equation {
        Equation {
            id: id.to_string(),
            declared_tag: tag.map(|t| t.to_string()),
            position,
            math_source: String::new(),
        }
    }

    fn build(equations: &[Equation]) -> Registry {
        Registry::build(equations, "Equation").unwrap()
    }

    #[test]
    fn test_empty_document_yields_empty_registry() {
        let registry = build(&[]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_untagged_equations_number_sequentially() {
        let equations = vec![
            eq("eq-a", None, 0),
            eq("eq-b", None, 1),
            eq("eq-c", None, 2),
        ];
        let registry = build(&equations);

        for (i, id) in ["eq-a", "eq-b", "eq-c"].iter().enumerate() {
            let spec = registry.get(id).unwrap();
            assert_eq!(spec.kind, TagKind::Number);
            assert_eq!(spec.display_tag_markup, (i + 1).to_string());
            assert_eq!(spec.reference_markup, format!("Equation {}", i + 1));
        }
    }

    #[test]
    fn test_tagged_equations_do_not_consume_numbers() {
        // [untagged, tagged, untagged] numbers 1 and 2, not 1 and 3
        let equations = vec![
            eq("eq-first", None, 0),
            eq("eq-cond", Some("Condition"), 1),
            eq("eq-second", None, 2),
        ];
        let registry = build(&equations);

        assert_eq!(registry.get("eq-first").unwrap().display_tag_markup, "1");
        assert_eq!(registry.get("eq-second").unwrap().display_tag_markup, "2");
        assert_eq!(registry.get("eq-cond").unwrap().kind, TagKind::PlainText);
    }

    #[test]
    fn test_spec_scenario_mixed_document() {
        let equations = vec![
            eq("eq-upstream", Some("Condition"), 0),
            eq("eq-normal", None, 1),
            eq("eq-markov", Some("Markov"), 2),
            eq("eq-second", None, 3),
        ];
        let registry = build(&equations);

        assert_eq!(registry.get("eq-normal").unwrap().display_tag_markup, "1");
        assert_eq!(registry.get("eq-second").unwrap().display_tag_markup, "2");

        let upstream = registry.get("eq-upstream").unwrap();
        assert_eq!(upstream.kind, TagKind::PlainText);
        assert_eq!(upstream.display_tag_markup, "Condition");
        assert_eq!(upstream.reference_markup, "Condition");
    }

    #[test]
    fn test_plain_text_tag_is_never_math_wrapped() {
        let registry = build(&[eq("eq-markov", Some("Markov"), 0)]);
        let spec = registry.get("eq-markov").unwrap();
        assert_eq!(spec.display_tag_markup, "Markov");
        assert!(!spec.display_tag_markup.contains('$'));
    }

    #[test]
    fn test_latex_tag_is_math_wrapped_not_text_escaped() {
        let registry = build(&[eq("eq-pythag", Some("\\star"), 0)]);
        let spec = registry.get("eq-pythag").unwrap();
        assert_eq!(spec.kind, TagKind::LatexSymbol);
        assert_eq!(spec.display_tag_markup, "$\\star$");
        assert_eq!(spec.reference_markup, "$\\star$");
        assert!(!spec.display_tag_markup.contains("\\text"));
    }

    #[test]
    fn test_compound_latex_tag_is_opaque() {
        let registry = build(&[eq("eq-dblstar", Some("\\star\\star"), 0)]);
        let spec = registry.get("eq-dblstar").unwrap();
        assert_eq!(spec.kind, TagKind::LatexSymbol);
        assert_eq!(spec.display_tag_markup, "$\\star\\star$");
    }

    #[test]
    fn test_latex_tag_with_braces() {
        let registry = build(&[eq("eq-text", Some("\\mathbf{P}"), 0)]);
        assert_eq!(
            registry.get("eq-text").unwrap().display_tag_markup,
            "$\\mathbf{P}$"
        );
    }

    #[test]
    fn test_duplicate_identifier_fails() {
        let equations = vec![eq("eq-a", None, 0), eq("eq-a", Some("Condition"), 1)];
        let err = Registry::build(&equations, "Equation").unwrap_err();
        assert!(matches!(
            err,
            EqrefError::DuplicateIdentifier { id } if id == "eq-a"
        ));
    }

    #[test]
    fn test_empty_tag_is_malformed() {
        let err = Registry::build(&[eq("eq-a", Some("  "), 0)], "Equation").unwrap_err();
        assert!(matches!(err, EqrefError::MalformedTag { .. }));
    }

    #[test]
    fn test_dollar_in_tag_is_malformed() {
        let err = Registry::build(&[eq("eq-a", Some("$\\star$"), 0)], "Equation").unwrap_err();
        assert!(matches!(err, EqrefError::MalformedTag { .. }));
    }

    #[test]
    fn test_unbalanced_braces_are_malformed() {
        let err = Registry::build(&[eq("eq-a", Some("\\mathbf{P"), 0)], "Equation").unwrap_err();
        assert!(matches!(err, EqrefError::MalformedTag { .. }));
    }

    #[test]
    fn test_dangling_backslash_is_malformed() {
        let err = Registry::build(&[eq("eq-a", Some("\\star\\"), 0)], "Equation").unwrap_err();
        assert!(matches!(err, EqrefError::MalformedTag { .. }));
    }

    #[test]
    fn test_custom_reference_word() {
        let registry = Registry::build(&[eq("eq-a", None, 0)], "Eq.").unwrap();
        assert_eq!(registry.get("eq-a").unwrap().reference_markup, "Eq. 1");
    }

    #[test]
    fn test_iter_preserves_document_order() {
        let equations = vec![
            eq("eq-z", None, 0),
            eq("eq-a", Some("Condition"), 1),
            eq("eq-m", None, 2),
        ];
        let registry = build(&equations);
        let ids: Vec<&str> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["eq-z", "eq-a", "eq-m"]);
    }
}
