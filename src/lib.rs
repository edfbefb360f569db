//! eqref - Equation tag and cross-reference resolver
//!
//! A command-line tool that resolves custom equation tags (plain text or
//! LaTeX symbols) and rewrites cross-references in markdown documents
//! prior to final rendering.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::EqrefError;
