//! Plugin model: documents, components, manifest and budget units.

pub mod budget;
pub mod component;
pub mod frontmatter;
pub mod manifest;
pub mod tokens;

pub use budget::{BudgetStatus, FileRole, FileTokens, SkillBudget, TokenDetails};
pub use component::{Component, ComponentKind, ComponentSet};
pub use frontmatter::{ComponentHeader, Frontmatter, HeaderField, ParsedDocument};
pub use manifest::{ManifestSource, PluginManifest};
pub use tokens::{ApproxCounter, TokenCounter, TokenizerMethod, select_counter};
