//! Domain layer - Business logic and domain models

pub mod equations;

pub use equations::{Equation, Registry, TagKind, TagSpec};
