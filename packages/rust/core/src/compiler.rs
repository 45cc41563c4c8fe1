//! Document compiler.
//!
//! Partitions a loaded [`Catalog`] by pipeline shape, search strategy, and
//! meta-learning kind, derives per-entry display helpers, and hands each
//! partition to a [`Renderer`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use automl_catalog_shared::{
    CatalogEntry, Category, EntryView, GithubRepo, MetaLearningKind, PipelineShape, Renderer,
    Result, SearchStrategy, Template, WebUrl,
};

use crate::loader::Catalog;

/// Name of the full-catalog document.
pub const SYSTEMS_LIST: &str = "systems_list";

/// Compiled documents keyed by document name (no extension).
pub type Documents = BTreeMap<String, String>;

/// Matches `https://github.com/<user>/<repo>` exactly.
static GITHUB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://github\.com/(?P<user>[\w_-]+)/(?P<repo>[\w_-]+)$").expect("github regex")
});

// ---------------------------------------------------------------------------
// Partitions
// ---------------------------------------------------------------------------

/// One document to produce: a name, a layout, and the entries it lists.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    pub name: String,
    pub template: Template,
    /// In catalog order.
    pub members: Vec<&'a CatalogEntry>,
}

/// Every document the catalog compiles into, in a fixed order: the full list,
/// then one per pipeline shape, search strategy, and meta-learning kind.
///
/// Each category value gets a partition even when nothing matches it.
pub fn partitions(catalog: &Catalog) -> Vec<Partition<'_>> {
    let mut out = vec![Partition {
        name: SYSTEMS_LIST.to_string(),
        template: Template::SystemsList,
        members: catalog.iter().collect(),
    }];

    out.extend(by_tag(catalog, "pipeline", |entry, shape: PipelineShape| {
        entry.supports_pipeline(shape)
    }));
    out.extend(by_tag(catalog, "strategy", |entry, strategy: SearchStrategy| {
        entry.uses_strategy(strategy)
    }));
    out.extend(by_tag(catalog, "meta", |entry, kind: MetaLearningKind| {
        entry.uses_meta_learning(kind)
    }));

    out
}

/// `<tag>_<suffix>_examples` partitions for every tag of family `C`.
fn by_tag<'a, C: Category>(
    catalog: &'a Catalog,
    suffix: &str,
    matches: impl Fn(&CatalogEntry, C) -> bool,
) -> Vec<Partition<'a>> {
    C::ALL
        .iter()
        .map(|&tag| Partition {
            name: format!("{tag}_{suffix}_examples"),
            template: Template::Examples,
            members: catalog.iter().filter(|entry| matches(*entry, tag)).collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Render every partition of `catalog` with `renderer`.
#[instrument(skip_all, fields(entries = catalog.len()))]
pub fn compile(catalog: &Catalog, renderer: &dyn Renderer) -> Result<Documents> {
    let mut documents = Documents::new();

    for partition in partitions(catalog) {
        let views: Vec<EntryView<'_>> = partition.members.iter().copied().map(entry_view).collect();
        let text = renderer.render(partition.template, &views)?;
        debug!(
            document = %partition.name,
            members = views.len(),
            bytes = text.len(),
            "rendered document"
        );
        documents.insert(partition.name, text);
    }

    Ok(documents)
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Attach the derived display helpers to an entry.
pub fn entry_view(entry: &CatalogEntry) -> EntryView<'_> {
    EntryView {
        entry,
        slug: slug(&entry.name),
        website_host: entry.website.as_ref().map(|url| url.authority().to_string()),
        github: entry.repository.as_ref().and_then(github_info),
    }
}

/// Anchor slug: lowercase with spaces turned into dashes.
pub fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// `{user, repo}` of a GitHub project URL; `None` for anything else.
pub fn github_info(url: &WebUrl) -> Option<GithubRepo> {
    let caps = GITHUB_RE.captures(url.as_str())?;
    Some(GithubRepo {
        user: caps["user"].to_string(),
        repo: caps["repo"].to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
