//! Typed shape of a catalog entry.
//!
//! Values of these types only come out of the validation engine in
//! `automl-catalog-core`; nothing here checks record contents on its own
//! except [`WebUrl::parse`].

use serde::Serialize;
use url::Url;

use crate::registry::{
    Domain, HyperparameterKind, MetaLearningKind, PipelineShape, SearchStrategy, Task, Technique,
};

/// Longest URL accepted in a record.
pub const MAX_URL_LEN: usize = 2083;

// ---------------------------------------------------------------------------
// WebUrl
// ---------------------------------------------------------------------------

/// Why a string was rejected as a web URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("not a valid URL: {0}")]
    Syntax(String),

    #[error("URL scheme should be 'http' or 'https', found '{0}'")]
    Scheme(String),

    #[error("URL has no host")]
    MissingHost,

    #[error("URL is longer than {} characters", MAX_URL_LEN)]
    TooLong,
}

/// An absolute `http`/`https` URL with a host, kept exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WebUrl(String);

impl WebUrl {
    /// Check that `raw` is an absolute web URL and keep it verbatim.
    ///
    /// Only text the URL parser would read back unchanged is kept, so the
    /// stored string is always safe to drop into a Markdown link.
    pub fn parse(raw: &str) -> std::result::Result<Self, UrlError> {
        if raw.len() > MAX_URL_LEN {
            return Err(UrlError::TooLong);
        }
        if raw.chars().any(|c| c.is_ascii_whitespace() || c.is_control()) {
            return Err(UrlError::Syntax("contains whitespace or control characters".into()));
        }

        let parsed = Url::parse(raw).map_err(|e| UrlError::Syntax(e.to_string()))?;

        let scheme = parsed.scheme();
        match scheme {
            "http" | "https" => {}
            other => return Err(UrlError::Scheme(other.to_string())),
        }

        let marker = format!("{scheme}://");
        if !raw
            .get(..marker.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(&marker))
        {
            return Err(UrlError::Syntax(format!("expected '{marker}' before the host")));
        }

        let Some(host) = parsed.host_str().filter(|host| !host.is_empty()) else {
            return Err(UrlError::MissingHost);
        };

        let written = written_host(authority_of(raw));
        if written.is_empty() || written.contains('\\') {
            return Err(UrlError::MissingHost);
        }
        // Non-ASCII hosts come back punycoded, so only ASCII ones can be compared.
        if written.is_ascii() && !written.eq_ignore_ascii_case(host) {
            return Err(UrlError::Syntax(format!(
                "host '{written}' is read back as '{host}'"
            )));
        }

        Ok(Self(raw.to_string()))
    }

    /// The URL as it appeared in the record.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The authority part (`host[:port]`), i.e. the text between `scheme://`
    /// and the next `/`, `?` or `#`.
    pub fn authority(&self) -> &str {
        authority_of(&self.0)
    }
}

fn authority_of(raw: &str) -> &str {
    let rest = raw.split_once("://").map_or("", |(_, rest)| rest);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

/// Host as written in an authority: no user info, no port.
fn written_host(authority: &str) -> &str {
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    if host.starts_with('[') {
        return host.find(']').map_or(host, |end| &host[..=end]);
    }
    host.split_once(':').map_or(host, |(host, _)| host)
}

impl std::fmt::Display for WebUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// Shape of the space a system searches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchSpace {
    pub hierarchical: bool,
    pub probabilistic: bool,
    pub differentiable: bool,
    /// Whether the space is constructed automatically.
    pub automatic: bool,
    /// Whether the search tolerates invalid configurations.
    pub robust: bool,
    pub hyperparameters: Vec<HyperparameterKind>,
    /// Pipeline topologies the system can produce.
    pub pipelines: Vec<PipelineShape>,
}

/// Hardware a system can exploit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComputationalResources {
    pub gpu: bool,
    pub tpu: bool,
    pub cluster: bool,
}

// ---------------------------------------------------------------------------
// CatalogEntry
// ---------------------------------------------------------------------------

/// One validated AutoML system description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// File stem of the record this entry was built from.
    pub key: String,

    pub name: String,
    pub description: Option<String>,
    pub website: Option<WebUrl>,
    pub open_source: bool,
    pub institutions: Vec<String>,
    pub repository: Option<WebUrl>,
    pub license: Option<String>,
    /// Ordered by importance, not by date.
    pub references: Vec<WebUrl>,

    pub cli: bool,
    pub gui: bool,
    pub http: bool,
    pub library: bool,
    pub programming_languages: Vec<String>,

    pub domains: Vec<Domain>,
    pub multi_domain: bool,
    pub techniques: Vec<Technique>,
    pub ml_libraries: Vec<String>,
    pub multi_task: bool,
    pub tasks: Vec<Task>,
    pub distillation: bool,

    pub search_strategies: Vec<SearchStrategy>,
    pub search_space: SearchSpace,
    pub meta_learning: Vec<MetaLearningKind>,

    pub extensible: bool,
    pub accessible: bool,
    pub portable: bool,
    pub computational_resources: ComputationalResources,
}

impl CatalogEntry {
    pub fn supports_pipeline(&self, shape: PipelineShape) -> bool {
        self.search_space.pipelines.contains(&shape)
    }

    pub fn uses_strategy(&self, strategy: SearchStrategy) -> bool {
        self.search_strategies.contains(&strategy)
    }

    pub fn uses_meta_learning(&self, kind: MetaLearningKind) -> bool {
        self.meta_learning.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_url_keeps_original_text() {
        let url = WebUrl::parse("https://automl.org").expect("valid");
        assert_eq!(url.as_str(), "https://automl.org");
        assert_eq!(url.to_string(), "https://automl.org");
    }

    #[test]
    fn web_url_rejects_non_web_input() {
        assert!(matches!(WebUrl::parse("github.com/foo/bar"), Err(UrlError::Syntax(_))));
        assert!(matches!(WebUrl::parse("not a url"), Err(UrlError::Syntax(_))));
        assert_eq!(
            WebUrl::parse("ftp://example.com/file"),
            Err(UrlError::Scheme("ftp".into()))
        );
        assert!(matches!(WebUrl::parse("mailto:someone@example.com"), Err(UrlError::Scheme(_))));

        let long = format!("https://example.com/{}", "a".repeat(MAX_URL_LEN));
        assert_eq!(WebUrl::parse(&long), Err(UrlError::TooLong));
    }

    #[test]
    fn web_url_needs_an_authority_marker() {
        for raw in ["https:example.com", "https:/example.com", "https:\\example.com"] {
            assert!(WebUrl::parse(raw).is_err(), "{raw} should be rejected");
        }
        assert!(WebUrl::parse("https://\\example.com").is_err());
        assert!(WebUrl::parse("HTTPS://example.com").is_ok());
    }

    #[test]
    fn web_url_rejects_text_the_parser_would_repair() {
        for raw in [
            " https://example.com",
            "https://example.com ",
            "https://exam\tple.com",
            "https://example.com/a\nb",
            "https://ex%61mple.com",
        ] {
            assert!(WebUrl::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn web_url_host_survives_user_info_and_port() {
        let url = WebUrl::parse("https://user@Example.com:8443/path?q=1").expect("valid");
        assert_eq!(url.authority(), "user@Example.com:8443");

        let ipv6 = WebUrl::parse("http://[::1]:8080/").expect("valid");
        assert_eq!(ipv6.authority(), "[::1]:8080");

        let query = WebUrl::parse("https://h2o.ai?ref=catalog").expect("valid");
        assert_eq!(query.authority(), "h2o.ai");
    }

    #[test]
    fn authority_is_second_slash_segment() {
        let url = WebUrl::parse("https://www.automl.org:8080/automl/").expect("valid");
        assert_eq!(url.authority(), "www.automl.org:8080");

        let bare = WebUrl::parse("http://h2o.ai").expect("valid");
        assert_eq!(bare.authority(), "h2o.ai");
    }
}
