//! Seam between the document compiler and the text renderer.

use crate::error::Result;
use crate::types::CatalogEntry;

/// `{user, repo}` pair parsed from a GitHub repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubRepo {
    pub user: String,
    pub repo: String,
}

/// A catalog entry together with the display helpers derived from it.
#[derive(Debug, Clone)]
pub struct EntryView<'a> {
    pub entry: &'a CatalogEntry,
    /// Lowercased name with spaces replaced by `-`; used as an anchor.
    pub slug: String,
    /// `host[:port]` of the website, if any.
    pub website_host: Option<String>,
    /// `None` when the repository is absent or not a GitHub project URL.
    pub github: Option<GithubRepo>,
}

/// Which layout to render a list of entries with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// The full catalog with every field.
    SystemsList,
    /// A short list of links into the full catalog.
    Examples,
}

impl Template {
    pub fn id(&self) -> &'static str {
        match self {
            Self::SystemsList => "systems_list",
            Self::Examples => "examples",
        }
    }
}

/// Turns an ordered list of entries into document text.
///
/// Implementations must be pure: same input, same bytes.
pub trait Renderer {
    fn render(&self, template: Template, systems: &[EntryView<'_>]) -> Result<String>;
}
