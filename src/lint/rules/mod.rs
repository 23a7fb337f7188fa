//! Built-in checks.
//!
//! - **structure** (`structure`): manifest location, naming, layout
//! - **manifest** (`manifest`): `plugin.json` fields and declared commands
//! - **frontmatter** (`frontmatter`): header fields per component kind
//! - **tools** (`tools`): explicit tool-invocation phrasing
//! - **tokens** (`tokens`): skill budget units

pub mod frontmatter;
pub mod manifest;
pub mod structure;
pub mod tokens;
pub mod tools;

use crate::lint::rule::BoxedCheck;

pub use frontmatter::FrontmatterCheck;
pub use manifest::ManifestCheck;
pub use structure::StructureCheck;
pub use tokens::TokensCheck;
pub use tools::ToolsCheck;

/// Returns all built-in checks in execution order.
#[must_use]
pub fn all_checks() -> Vec<BoxedCheck> {
    vec![
        Box::new(StructureCheck),
        Box::new(ManifestCheck),
        Box::new(FrontmatterCheck),
        Box::new(ToolsCheck),
        Box::new(TokensCheck),
    ]
}
