//! Equation tag system

pub mod parser;
pub mod registry;
pub mod rewriter;

// Re-export main types
pub use parser::{AttrSpan, DocumentParser, DocumentScan, MathSpan};
pub use registry::{Equation, Registry, TagKind, TagSpec};
pub use rewriter::{
    ReferenceContext, ReferenceRewriter, ResolvedDocument, UnresolvedReference,
};
