//! Markdown rendering of catalog entries.
//!
//! Implements [`Renderer`] with two layouts: the full systems list and the
//! short per-category example lists that link back into it. Output depends
//! only on the entries given, so identical catalogs render identical bytes.

mod cleanup;

use std::fmt::Write;

use tracing::{debug, instrument};

use automl_catalog_shared::{
    CatalogEntry, CatalogError, Category, EntryView, Renderer, Result, Template, WebUrl,
};

use cleanup::{escape_cell, single_line};

/// Document the example lists link into.
pub const SYSTEMS_LIST_FILE: &str = "systems_list.md";

/// Title of the full systems list.
pub const SYSTEMS_LIST_TITLE: &str = "AutoML systems";

/// Line rendered for an example list with no members.
pub const NO_SYSTEMS: &str = "_No systems in the catalog use this yet._";

const NOT_AVAILABLE: &str = "not available";

/// Markdown implementation of [`Renderer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    #[instrument(skip_all, fields(template = template.id(), systems = systems.len()))]
    fn render(&self, template: Template, systems: &[EntryView<'_>]) -> Result<String> {
        let mut out = String::new();
        let written = match template {
            Template::SystemsList => systems_list(&mut out, systems),
            Template::Examples => examples(&mut out, systems),
        };
        written.map_err(|e| CatalogError::Render(format!("{} layout: {e}", template.id())))?;

        let markdown = cleanup::run_pipeline(&out);
        debug!(bytes = markdown.len(), "rendered markdown");
        Ok(markdown)
    }
}

// ---------------------------------------------------------------------------
// Systems list
// ---------------------------------------------------------------------------

fn systems_list(out: &mut String, systems: &[EntryView<'_>]) -> std::fmt::Result {
    writeln!(out, "# {SYSTEMS_LIST_TITLE}\n")?;

    match systems.len() {
        0 => writeln!(out, "The catalog is empty.\n")?,
        1 => writeln!(out, "1 system, sorted by name.\n")?,
        n => writeln!(out, "{n} systems, sorted by name.\n")?,
    }

    if !systems.is_empty() {
        summary_table(out, systems)?;
    }

    for view in systems {
        system_section(out, view)?;
    }

    Ok(())
}

fn summary_table(out: &mut String, systems: &[EntryView<'_>]) -> std::fmt::Result {
    writeln!(out, "| System | Website | Repository | License |")?;
    writeln!(out, "| --- | --- | --- | --- |")?;

    for view in systems {
        let entry = view.entry;
        let website = match (&entry.website, &view.website_host) {
            (Some(url), Some(host)) => link(host, url.as_str()),
            _ => NOT_AVAILABLE.to_string(),
        };
        writeln!(
            out,
            "| [{}](#{}) | {} | {} | {} |",
            escape_cell(&entry.name),
            view.slug,
            website,
            repository_link(view),
            escape_cell(entry.license.as_deref().unwrap_or(NOT_AVAILABLE)),
        )?;
    }

    writeln!(out)
}

fn system_section(out: &mut String, view: &EntryView<'_>) -> std::fmt::Result {
    let entry = view.entry;

    writeln!(out, "<a id=\"{}\"></a>\n", view.slug)?;
    writeln!(out, "## {}\n", single_line(&entry.name))?;

    if let Some(description) = &entry.description {
        writeln!(out, "{}\n", description.trim())?;
    }

    writeln!(out, "### Overview\n")?;
    bullet(out, "Website", &optional_url(entry.website.as_ref()))?;
    bullet(out, "Open source", yes_no(entry.open_source))?;
    bullet(out, "Repository", &repository_link(view))?;
    bullet(out, "License", entry.license.as_deref().unwrap_or(NOT_AVAILABLE))?;
    bullet(out, "Institutions", &plain_list(&entry.institutions))?;
    writeln!(out)?;

    writeln!(out, "### Interfaces\n")?;
    bullet(out, "Available as", &interfaces(entry))?;
    bullet(out, "Programming languages", &plain_list(&entry.programming_languages))?;
    writeln!(out)?;

    writeln!(out, "### Capabilities\n")?;
    bullet(out, "Domains", &tag_list(&entry.domains))?;
    bullet(out, "Multi-domain", yes_no(entry.multi_domain))?;
    bullet(out, "Techniques", &tag_list(&entry.techniques))?;
    bullet(out, "ML libraries", &plain_list(&entry.ml_libraries))?;
    bullet(out, "Tasks", &tag_list(&entry.tasks))?;
    bullet(out, "Multi-task", yes_no(entry.multi_task))?;
    bullet(out, "Distillation", yes_no(entry.distillation))?;
    writeln!(out)?;

    let space = &entry.search_space;
    writeln!(out, "### Search\n")?;
    bullet(out, "Strategies", &tag_list(&entry.search_strategies))?;
    bullet(out, "Pipelines", &tag_list(&space.pipelines))?;
    bullet(out, "Hyperparameters", &tag_list(&space.hyperparameters))?;
    bullet(
        out,
        "Search space",
        &flags(&[
            ("hierarchical", space.hierarchical),
            ("probabilistic", space.probabilistic),
            ("differentiable", space.differentiable),
            ("automatic", space.automatic),
            ("robust", space.robust),
        ]),
    )?;
    bullet(out, "Meta-learning", &tag_list(&entry.meta_learning))?;
    writeln!(out)?;

    let resources = entry.computational_resources;
    writeln!(out, "### Qualities\n")?;
    bullet(out, "Extensible", yes_no(entry.extensible))?;
    bullet(out, "Accessible", yes_no(entry.accessible))?;
    bullet(out, "Portable", yes_no(entry.portable))?;
    bullet(
        out,
        "Computational resources",
        &flags(&[
            ("GPU", resources.gpu),
            ("TPU", resources.tpu),
            ("cluster", resources.cluster),
        ]),
    )?;
    writeln!(out)?;

    if !entry.references.is_empty() {
        writeln!(out, "### References\n")?;
        for (i, reference) in entry.references.iter().enumerate() {
            writeln!(out, "{}. <{}>", i + 1, reference)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Example lists
// ---------------------------------------------------------------------------

fn examples(out: &mut String, systems: &[EntryView<'_>]) -> std::fmt::Result {
    if systems.is_empty() {
        return writeln!(out, "{NO_SYSTEMS}");
    }

    for view in systems {
        let target = format!("{SYSTEMS_LIST_FILE}#{}", view.slug);
        match &view.website_host {
            Some(host) => writeln!(
                out,
                "- {} ({host})",
                link(&single_line(&view.entry.name), &target)
            )?,
            None => writeln!(out, "- {}", link(&single_line(&view.entry.name), &target))?,
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bullet(out: &mut String, label: &str, value: &str) -> std::fmt::Result {
    writeln!(out, "- **{label}:** {value}")
}

fn link(text: &str, target: &str) -> String {
    format!("[{}]({target})", text.replace('[', "\\[").replace(']', "\\]"))
}

fn repository_link(view: &EntryView<'_>) -> String {
    match (&view.entry.repository, &view.github) {
        (Some(url), Some(github)) => link(&format!("{}/{}", github.user, github.repo), url.as_str()),
        (Some(url), None) => link(url.as_str(), url.as_str()),
        (None, _) => NOT_AVAILABLE.to_string(),
    }
}

fn optional_url(url: Option<&WebUrl>) -> String {
    url.map(|url| link(url.as_str(), url.as_str()))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn plain_list(items: &[String]) -> String {
    if items.is_empty() {
        return "none".to_string();
    }
    items
        .iter()
        .map(|item| single_line(item))
        .collect::<Vec<_>>()
        .join(", ")
}

fn tag_list<C: Category>(tags: &[C]) -> String {
    if tags.is_empty() {
        return "none".to_string();
    }
    tags.iter()
        .map(|tag| format!("`{}`", tag.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Names of the set flags, or "none".
fn flags(pairs: &[(&str, bool)]) -> String {
    let set: Vec<&str> = pairs
        .iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| *name)
        .collect();
    if set.is_empty() {
        "none".to_string()
    } else {
        set.join(", ")
    }
}

fn interfaces(entry: &CatalogEntry) -> String {
    flags(&[
        ("CLI", entry.cli),
        ("GUI", entry.gui),
        ("HTTP API", entry.http),
        ("library", entry.library),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use automl_catalog_shared::{
        ComputationalResources, GithubRepo, MetaLearningKind, PipelineShape, SearchSpace,
        SearchStrategy, Task,
    };

    fn entry(key: &str, name: &str) -> CatalogEntry {
        CatalogEntry {
            key: key.into(),
            name: name.into(),
            description: Some(format!("{name} automates model selection.")),
            website: Some(WebUrl::parse("https://epistasislab.github.io/tpot/").unwrap()),
            open_source: true,
            institutions: vec!["University of Pennsylvania".into()],
            repository: Some(WebUrl::parse("https://github.com/EpistasisLab/tpot").unwrap()),
            license: Some("LGPL-3.0".into()),
            references: vec![WebUrl::parse("https://arxiv.org/abs/1601.07996").unwrap()],
            cli: true,
            gui: false,
            http: false,
            library: true,
            programming_languages: vec!["python".into()],
            domains: vec![],
            multi_domain: false,
            techniques: vec![],
            ml_libraries: vec!["scikit-learn".into()],
            multi_task: false,
            tasks: vec![Task::Classification, Task::Regression],
            distillation: false,
            search_strategies: vec![SearchStrategy::Evolutionary],
            search_space: SearchSpace {
                hierarchical: true,
                robust: true,
                pipelines: vec![PipelineShape::Graph],
                ..SearchSpace::default()
            },
            meta_learning: vec![MetaLearningKind::WarmStart],
            extensible: true,
            accessible: true,
            portable: false,
            computational_resources: ComputationalResources {
                cluster: true,
                ..ComputationalResources::default()
            },
        }
    }

    fn view<'a>(entry: &'a CatalogEntry, slug: &str) -> EntryView<'a> {
        EntryView {
            entry,
            slug: slug.into(),
            website_host: Some("epistasislab.github.io".into()),
            github: Some(GithubRepo {
                user: "EpistasisLab".into(),
                repo: "tpot".into(),
            }),
        }
    }

    #[test]
    fn examples_link_into_systems_list() {
        let tpot = entry("tpot", "TPOT");
        let md = MarkdownRenderer
            .render(Template::Examples, &[view(&tpot, "tpot")])
            .unwrap();
        assert_eq!(
            md,
            "- [TPOT](systems_list.md#tpot) (epistasislab.github.io)\n"
        );
    }

    #[test]
    fn examples_without_website_omit_host() {
        let mut tpot = entry("tpot", "TPOT");
        tpot.website = None;
        let mut v = view(&tpot, "tpot");
        v.website_host = None;

        let md = MarkdownRenderer.render(Template::Examples, &[v]).unwrap();
        assert_eq!(md, "- [TPOT](systems_list.md#tpot)\n");
    }

    #[test]
    fn empty_examples_render_placeholder() {
        let md = MarkdownRenderer.render(Template::Examples, &[]).unwrap();
        assert_eq!(md, format!("{NO_SYSTEMS}\n"));
    }

    #[test]
    fn systems_list_has_table_and_sections_in_order() {
        let a = entry("auto-sklearn", "auto-sklearn");
        let b = entry("h2o", "H2O AutoML");
        let md = MarkdownRenderer
            .render(
                Template::SystemsList,
                &[view(&a, "auto-sklearn"), view(&b, "h2o-automl")],
            )
            .unwrap();

        assert!(md.starts_with("# AutoML systems\n\n2 systems, sorted by name.\n"));
        assert!(md.contains("| System | Website | Repository | License |"));
        assert!(md.contains(
            "| [H2O AutoML](#h2o-automl) | [epistasislab.github.io](https://epistasislab.github.io/tpot/) \
             | [EpistasisLab/tpot](https://github.com/EpistasisLab/tpot) | LGPL-3.0 |"
        ));
        assert!(md.contains("<a id=\"h2o-automl\"></a>\n\n## H2O AutoML\n"));

        let first = md.find("## auto-sklearn").unwrap();
        let second = md.find("## H2O AutoML").unwrap();
        assert!(first < second);
    }

    #[test]
    fn systems_list_section_details() {
        let tpot = entry("tpot", "TPOT");
        let md = MarkdownRenderer
            .render(Template::SystemsList, &[view(&tpot, "tpot")])
            .unwrap();

        assert!(md.contains("1 system, sorted by name."));
        assert!(md.contains("- **Available as:** CLI, library\n"));
        assert!(md.contains("- **Strategies:** `evolutionary`\n"));
        assert!(md.contains("- **Pipelines:** `graph`\n"));
        assert!(md.contains("- **Search space:** hierarchical, robust\n"));
        assert!(md.contains("- **Domains:** none\n"));
        assert!(md.contains("- **Computational resources:** cluster\n"));
        assert!(md.contains("1. <https://arxiv.org/abs/1601.07996>\n"));
        assert!(!md.contains("\n\n\n"));
        assert!(md.ends_with('\n'));
    }

    #[test]
    fn missing_links_render_not_available() {
        let mut closed = entry("closed", "Closed|Box");
        closed.website = None;
        closed.repository = None;
        closed.license = None;
        closed.open_source = false;
        let v = EntryView {
            entry: &closed,
            slug: "closed|box".into(),
            website_host: None,
            github: None,
        };

        let md = MarkdownRenderer.render(Template::SystemsList, &[v]).unwrap();
        assert!(md.contains(
            "| [Closed\\|Box](#closed|box) | not available | not available | not available |"
        ));
        assert!(md.contains("- **Repository:** not available\n"));
        assert!(md.contains("- **Open source:** no\n"));
    }

    #[test]
    fn non_github_repository_links_full_url() {
        let mut tpot = entry("tpot", "TPOT");
        tpot.repository = Some(WebUrl::parse("https://gitlab.com/group/project").unwrap());
        let mut v = view(&tpot, "tpot");
        v.github = None;

        let md = MarkdownRenderer.render(Template::SystemsList, &[v]).unwrap();
        assert!(md.contains(
            "[https://gitlab.com/group/project](https://gitlab.com/group/project)"
        ));
    }

    #[test]
    fn empty_catalog_renders_title_only() {
        let md = MarkdownRenderer.render(Template::SystemsList, &[]).unwrap();
        assert_eq!(md, "# AutoML systems\n\nThe catalog is empty.\n");
    }

    #[test]
    fn rendering_is_deterministic() {
        let tpot = entry("tpot", "TPOT");
        let views = [view(&tpot, "tpot")];
        let first = MarkdownRenderer.render(Template::SystemsList, &views).unwrap();
        let second = MarkdownRenderer.render(Template::SystemsList, &views).unwrap();
        assert_eq!(first, second);
    }
}
