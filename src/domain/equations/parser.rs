//! Document scanning - locating math spans, equation labels, and code ranges

use crate::domain::equations::Equation;
use pulldown_cmark::{Event, Options, Parser as MdParser, Tag};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Regex for an attribute block trailing a display math span on the same line
fn attr_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[ \t]*\{([^}\n]*)\}").unwrap())
}

/// Regex for the identifier inside an attribute block: {#eq-pythag ...}
fn id_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"#([A-Za-z][A-Za-z0-9_-]*)").unwrap())
}

/// Regex for the tag attribute: tag="\star"
fn tag_attr_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r#"tag="([^"]*)""#).unwrap())
}

/// Attribute block following a labeled display math span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSpan {
    /// Source range including the braces
    pub range: Range<usize>,

    /// Equation identifier (with label prefix)
    pub id: String,

    /// Declared tag attribute value, if any
    pub declared_tag: Option<String>,

    /// Attribute text with the tag attribute removed, ready for re-emission
    pub stripped: String,
}

/// One math span in the source, inline or display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathSpan {
    /// Source range including the $ delimiters
    pub outer: Range<usize>,

    /// Delimiter width: 1 for inline math, 2 for display math
    pub delim_len: usize,

    /// Trailing attribute block, present only for labeled display math
    pub attr: Option<AttrSpan>,
}

impl MathSpan {
    /// Range of the math body, without delimiters
    pub fn inner(&self) -> Range<usize> {
        self.outer.start + self.delim_len..self.outer.end - self.delim_len
    }

    /// End of this span in the source, including any attribute block
    pub fn end(&self) -> usize {
        self.attr
            .as_ref()
            .map(|a| a.range.end)
            .unwrap_or(self.outer.end)
    }

    pub fn equation_id(&self) -> Option<&str> {
        self.attr.as_ref().map(|a| a.id.as_str())
    }
}

/// Everything the rewriter needs to know about a document's structure
#[derive(Debug, Clone, Default)]
pub struct DocumentScan {
    /// Labeled equations in document order
    pub equations: Vec<Equation>,

    /// All math spans in source order (labeled or not)
    pub math_spans: Vec<MathSpan>,

    /// Inline code and fenced code block ranges, never rewritten
    pub code_spans: Vec<Range<usize>>,
}

/// Scans markdown for display math blocks and their equation labels
pub struct DocumentParser {
    label_prefix: String,
}

impl DocumentParser {
    /// Create a parser recognizing labels starting with `label_prefix`
    pub fn new(label_prefix: &str) -> Self {
        DocumentParser {
            label_prefix: label_prefix.to_string(),
        }
    }

    /// Scan a document, collecting math spans, equations, and code ranges.
    ///
    /// Equations are display math blocks followed on the same line by an
    /// attribute block whose identifier carries the label prefix:
    ///
    /// ```text
    /// $$
    /// a^2 + b^2 = c^2
    /// $$ {#eq-pythag tag="\star"}
    /// ```
    ///
    /// Display math without a recognized label is still recorded as a math
    /// span (so references inside it resolve) but yields no equation.
    pub fn scan(&self, source: &str) -> DocumentScan {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_MATH);

        let mut scan = DocumentScan::default();

        for (event, range) in MdParser::new_ext(source, options).into_offset_iter() {
            match event {
                Event::DisplayMath(_) => {
                    let attr = self.parse_trailing_attr(source, range.end);
                    let span = MathSpan {
                        outer: range,
                        delim_len: 2,
                        attr,
                    };

                    if let Some(attr) = &span.attr {
                        scan.equations.push(Equation {
                            id: attr.id.clone(),
                            declared_tag: attr.declared_tag.clone(),
                            position: scan.equations.len(),
                            math_source: source[span.inner()].to_string(),
                        });
                    }
                    scan.math_spans.push(span);
                }
                Event::InlineMath(_) => {
                    scan.math_spans.push(MathSpan {
                        outer: range,
                        delim_len: 1,
                        attr: None,
                    });
                }
                Event::Code(_) => scan.code_spans.push(range),
                Event::Start(Tag::CodeBlock(_)) => scan.code_spans.push(range),
                _ => {}
            }
        }

        scan
    }

    /// Parse the `{...}` attribute block directly after a display math span,
    /// returning it only when the identifier carries the label prefix.
    fn parse_trailing_attr(&self, source: &str, from: usize) -> Option<AttrSpan> {
        let caps = attr_regex().captures(&source[from..])?;
        let whole = caps.get(0)?;
        let body = caps.get(1)?.as_str();

        let id = id_regex().captures(body)?.get(1)?.as_str();
        if !id.starts_with(&self.label_prefix) {
            return None;
        }

        let declared_tag = tag_attr_regex()
            .captures(body)
            .map(|c| c[1].to_string());

        let stripped = tag_attr_regex().replace(body, "");
        let stripped = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

        Some(AttrSpan {
            range: from + whole.start()..from + whole.end(),
            id: id.to_string(),
            declared_tag,
            stripped,
        })
    }
}
