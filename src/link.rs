//! Choosing the clickable wrapper for a post.
//!
//! A slug is either an internal path handled by client-side navigation or a
//! full external URL. The decision is made once per render from the slug alone.

use htmlescape::encode_minimal;

/// Slugs starting with this prefix leave the site.
pub const EXTERNAL_SCHEME_PREFIX: &str = "https";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Internal(String),
    External(String),
}

impl LinkTarget {
    /// Anything that is not an `https` URL is treated as an internal path,
    /// including malformed slugs.
    pub fn classify(slug: &str) -> Self {
        if slug.starts_with(EXTERNAL_SCHEME_PREFIX) {
            LinkTarget::External(slug.to_string())
        } else {
            LinkTarget::Internal(slug.to_string())
        }
    }

    pub fn href(&self) -> &str {
        match self {
            LinkTarget::Internal(path) => path,
            LinkTarget::External(url) => url,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, LinkTarget::External(_))
    }

    pub fn wrapper(&self) -> Box<dyn LinkWrapper + '_> {
        match self {
            LinkTarget::Internal(path) => Box::new(InternalLink { path }),
            LinkTarget::External(url) => Box::new(ExternalAnchor { url }),
        }
    }
}

/// Wraps already-rendered children in a clickable element.
pub trait LinkWrapper {
    fn render(&self, class: &str, children: &str) -> String;
}

/// Link picked up by the client navigation script (`data-link="internal"`),
/// so following it swaps the page without a full reload.
pub struct InternalLink<'a> {
    pub path: &'a str,
}

impl LinkWrapper for InternalLink<'_> {
    fn render(&self, class: &str, children: &str) -> String {
        format!(
            "<a href=\"{}\" class=\"{}\" data-link=\"internal\">{}</a>",
            encode_minimal(self.path),
            encode_minimal(class),
            children
        )
    }
}

/// Plain anchor with no routing semantics.
pub struct ExternalAnchor<'a> {
    pub url: &'a str,
}

impl LinkWrapper for ExternalAnchor<'_> {
    fn render(&self, class: &str, children: &str) -> String {
        format!(
            "<a href=\"{}\" class=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a>",
            encode_minimal(self.url),
            encode_minimal(class),
            children
        )
    }
}
