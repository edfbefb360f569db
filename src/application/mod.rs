//! Application layer - Use cases and orchestration

pub mod check_document;
pub mod init;
pub mod list_equations;
pub mod manage_config;
pub mod resolve_document;

pub use check_document::{CheckReport, CheckService, DocumentIssue};
pub use list_equations::{EquationSummary, ListService};
pub use manage_config::ConfigService;
pub use resolve_document::{ResolveOptions, ResolveService};
