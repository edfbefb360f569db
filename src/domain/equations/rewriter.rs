//! Reference rewriting - resolving cross-reference tokens to final markup
//!
//! Runs strictly after the registry is complete, so forward references
//! resolve. One pass over an immutable source snapshot; occurrences are
//! independent of each other, so processing order does not matter.

use crate::domain::equations::{DocumentScan, MathSpan, Registry};
use crate::error::{EqrefError, Result};
use regex::Regex;
use std::fmt;
use std::ops::Range;

/// Where a reference occurrence was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceContext {
    /// Ordinary document text
    Prose,
    /// Inside a math span; carries the enclosing equation's id when the
    /// span is a labeled equation body
    Math { equation: Option<String> },
}

/// A reference token whose id is not in the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub id: String,
    pub line: usize,
    pub context: ReferenceContext,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            ReferenceContext::Prose => write!(f, "@{} (line {})", self.id, self.line),
            ReferenceContext::Math { equation: Some(eq) } => {
                write!(f, "@{} (line {}, in equation {})", self.id, self.line, eq)
            }
            ReferenceContext::Math { equation: None } => {
                write!(f, "@{} (line {}, in math)", self.id, self.line)
            }
        }
    }
}

/// Result of a successful rewrite pass
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    /// Document text with every reference token replaced
    pub text: String,

    /// Final `\tag{...}` markup per equation, in document order
    pub tags: Vec<(String, String)>,
}

/// Rewrites reference tokens against a completed registry
pub struct ReferenceRewriter {
    token: Regex,
}

impl ReferenceRewriter {
    /// Create a rewriter matching `@<label_prefix>...` tokens
    pub fn new(label_prefix: &str) -> Self {
        let pattern = format!(r"@({}[A-Za-z0-9_-]+)", regex::escape(label_prefix));
        ReferenceRewriter {
            token: Regex::new(&pattern).unwrap(),
        }
    }

    /// Rewrite every reference occurrence in `source`.
    ///
    /// Prose tokens become markdown hyperlinks whose text is the target's
    /// reference markup; tokens inside math spans become
    /// `\href{#id}{<display markup>}`, valid in math mode. Each labeled
    /// equation additionally gets its `\tag{...}` spliced into the math
    /// body, and the consumed `tag="..."` attribute is dropped.
    ///
    /// All unresolved tokens are accumulated across the whole pass and
    /// reported together; nothing is silently left unrewritten.
    pub fn rewrite(
        &self,
        source: &str,
        scan: &DocumentScan,
        registry: &Registry,
    ) -> Result<ResolvedDocument> {
        let (text, unresolved) = self.rewrite_collecting(source, scan, registry);

        if !unresolved.is_empty() {
            return Err(EqrefError::UnresolvedReferences(unresolved));
        }

        let tags = registry
            .iter()
            .map(|(id, spec)| (id.to_string(), format!("\\tag{{{}}}", spec.display_tag_markup)))
            .collect();

        Ok(ResolvedDocument { text, tags })
    }

    /// Single pass over the source, resolving what it can and collecting
    /// the misses. Occurrence order is source order, but no occurrence
    /// depends on another having been rewritten.
    fn rewrite_collecting(
        &self,
        source: &str,
        scan: &DocumentScan,
        registry: &Registry,
    ) -> (String, Vec<UnresolvedReference>) {
        let mut out = String::with_capacity(source.len());
        let mut unresolved = Vec::new();

        enum Segment<'a> {
            Math(&'a MathSpan),
            Code(&'a Range<usize>),
        }

        let mut segments: Vec<Segment> = scan
            .math_spans
            .iter()
            .map(Segment::Math)
            .chain(scan.code_spans.iter().map(Segment::Code))
            .collect();
        segments.sort_by_key(|s| match s {
            Segment::Math(m) => m.outer.start,
            Segment::Code(r) => r.start,
        });

        let mut cursor = 0usize;
        for segment in segments {
            match segment {
                Segment::Code(range) => {
                    self.rewrite_prose(
                        &source[cursor..range.start],
                        cursor,
                        source,
                        registry,
                        &mut out,
                        &mut unresolved,
                    );
                    out.push_str(&source[range.clone()]);
                    cursor = range.end;
                }
                Segment::Math(span) => {
                    self.rewrite_prose(
                        &source[cursor..span.outer.start],
                        cursor,
                        source,
                        registry,
                        &mut out,
                        &mut unresolved,
                    );
                    self.emit_math(source, span, registry, &mut out, &mut unresolved);
                    cursor = span.end();
                }
            }
        }
        self.rewrite_prose(
            &source[cursor..],
            cursor,
            source,
            registry,
            &mut out,
            &mut unresolved,
        );

        (out, unresolved)
    }

    /// Prose context: `@eq-x` becomes `[<reference markup>](#eq-x)`
    fn rewrite_prose(
        &self,
        text: &str,
        base: usize,
        source: &str,
        registry: &Registry,
        out: &mut String,
        unresolved: &mut Vec<UnresolvedReference>,
    ) {
        let mut last = 0usize;
        for caps in self.token.captures_iter(text) {
            let whole = caps.get(0).unwrap();
            let id = &caps[1];
            out.push_str(&text[last..whole.start()]);

            match registry.get(id) {
                Some(spec) => {
                    out.push_str(&format!("[{}](#{})", spec.reference_markup, id));
                }
                None => {
                    unresolved.push(UnresolvedReference {
                        id: id.to_string(),
                        line: line_of(source, base + whole.start()),
                        context: ReferenceContext::Prose,
                    });
                    out.push_str(whole.as_str());
                }
            }
            last = whole.end();
        }
        out.push_str(&text[last..]);
    }

    /// Math context: `@eq-x` becomes `\href{#eq-x}{<display markup>}`,
    /// which is valid math syntax with no text-mode escaping
    fn rewrite_math_body(
        &self,
        body: &str,
        base: usize,
        source: &str,
        equation: Option<&str>,
        registry: &Registry,
        unresolved: &mut Vec<UnresolvedReference>,
    ) -> String {
        let mut out = String::with_capacity(body.len());
        let mut last = 0usize;
        for caps in self.token.captures_iter(body) {
            let whole = caps.get(0).unwrap();
            let id = &caps[1];
            out.push_str(&body[last..whole.start()]);

            match registry.get(id) {
                Some(spec) => {
                    out.push_str(&format!("\\href{{#{}}}{{{}}}", id, spec.display_tag_markup));
                }
                None => {
                    unresolved.push(UnresolvedReference {
                        id: id.to_string(),
                        line: line_of(source, base + whole.start()),
                        context: ReferenceContext::Math {
                            equation: equation.map(|e| e.to_string()),
                        },
                    });
                    out.push_str(whole.as_str());
                }
            }
            last = whole.end();
        }
        out.push_str(&body[last..]);
        out
    }

    /// Emit one math span: rewritten body, spliced `\tag{...}` for labeled
    /// equations, and the attribute block with the tag attribute dropped
    fn emit_math(
        &self,
        source: &str,
        span: &MathSpan,
        registry: &Registry,
        out: &mut String,
        unresolved: &mut Vec<UnresolvedReference>,
    ) {
        let inner = span.inner();
        let body = self.rewrite_math_body(
            &source[inner.clone()],
            inner.start,
            source,
            span.equation_id(),
            registry,
            unresolved,
        );

        // Opening delimiter
        out.push_str(&source[span.outer.start..inner.start]);

        let spec = span.equation_id().and_then(|id| registry.get(id));
        match spec {
            // Splice the tag before the closing delimiter, unless the body
            // already carries one (keeps re-runs a no-op)
            Some(spec) if !body.contains("\\tag{") => {
                let content_len = body.trim_end().len();
                out.push_str(&body[..content_len]);
                out.push_str(&format!(" \\tag{{{}}}", spec.display_tag_markup));
                out.push_str(&body[content_len..]);
            }
            _ => out.push_str(&body),
        }

        // Closing delimiter
        out.push_str(&source[inner.end..span.outer.end]);

        if let Some(attr) = &span.attr {
            out.push_str(&source[span.outer.end..attr.range.start]);
            out.push('{');
            out.push_str(&attr.stripped);
            out.push('}');
        }
    }
}

/// 1-based line number of a byte offset
fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}
