//! Link descriptor
//!
//! A resolved view over a URL or anchor with predicates comparing it to
//! the reference location it was built against.

use serde::Serialize;
use url::Url;

use crate::anchor::Anchor;
use crate::error::LinkError;
use crate::Result;

/// A classified link. The href is always absolute: relative inputs are
/// resolved against the reference location at construction.
#[derive(Debug, Clone, Serialize)]
pub struct Link {
    #[serde(rename = "href")]
    url: Url,
    reference: Url,
    target: String,
    title: String,
    download: bool,
}

impl Link {
    /// Build a descriptor from a raw href string.
    pub fn from_href(href: &str, reference: &Url) -> Result<Self> {
        let url = reference
            .join(href)
            .map_err(|_| LinkError::InvalidInput(href.to_string()))?;

        Ok(Self {
            url,
            reference: reference.clone(),
            target: String::new(),
            title: String::new(),
            download: false,
        })
    }

    /// Build a descriptor from an anchor snapshot. An anchor with no href
    /// attribute resolves to the reference location itself.
    pub fn from_anchor(anchor: &Anchor, reference: &Url) -> Result<Self> {
        let url = match anchor.href.as_deref() {
            Some(href) => reference
                .join(href)
                .map_err(|_| LinkError::InvalidInput(href.to_string()))?,
            None => reference.clone(),
        };

        Ok(Self {
            url,
            reference: reference.clone(),
            target: anchor.target.clone(),
            title: anchor.title.clone(),
            download: anchor.download,
        })
    }

    // === Attributes ===

    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    /// Effective port: the explicit port, or the scheme default.
    pub fn port(&self) -> Option<u16> {
        self.url.port_or_known_default()
    }

    pub fn pathname(&self) -> &str {
        self.url.path()
    }

    pub fn search(&self) -> &str {
        self.url.query().unwrap_or("")
    }

    pub fn hash(&self) -> &str {
        self.url.fragment().unwrap_or("")
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    // === Predicates ===

    pub fn is_secure(&self) -> bool {
        self.url.scheme() == "https"
    }

    pub fn is_download(&self) -> bool {
        self.download
    }

    pub fn has_hash(&self) -> bool {
        !self.hash().is_empty()
    }

    pub fn has_search(&self) -> bool {
        !self.search().is_empty()
    }

    pub fn is_mailto(&self) -> bool {
        self.url.scheme() == "mailto"
    }

    pub fn is_javascript(&self) -> bool {
        self.url.scheme() == "javascript"
    }

    pub fn is_target_self(&self) -> bool {
        self.target.is_empty() || self.target == "_self"
    }

    pub fn is_target_blank(&self) -> bool {
        self.target == "_blank"
    }

    pub fn is_target_parent(&self) -> bool {
        self.target == "_parent"
    }

    pub fn is_target_top(&self) -> bool {
        self.target == "_top"
    }

    // === Comparisons against the reference location ===

    pub fn is_same_scheme(&self) -> bool {
        self.url.scheme() == self.reference.scheme()
    }

    pub fn is_same_hostname(&self) -> bool {
        self.url.host_str() == self.reference.host_str()
    }

    pub fn is_same_port(&self) -> bool {
        self.url.port_or_known_default() == self.reference.port_or_known_default()
    }

    pub fn is_same_pathname(&self) -> bool {
        self.url.path() == self.reference.path()
    }

    pub fn is_same_hash(&self) -> bool {
        self.url.fragment().unwrap_or("") == self.reference.fragment().unwrap_or("")
    }

    /// Order-insensitive query comparison: both queries deserialize into
    /// `(name, value)` multisets which must match pair for pair. A pair
    /// with no `=` carries an empty value, so `?a` and `?a=` agree.
    pub fn is_same_search(&self) -> bool {
        let mut theirs = query_pairs(self.reference.query().unwrap_or(""));
        let ours = query_pairs(self.search());

        if ours.len() != theirs.len() {
            return false;
        }

        for pair in &ours {
            match theirs.iter().position(|other| other == pair) {
                Some(idx) => {
                    theirs.swap_remove(idx);
                }
                None => return false,
            }
        }

        true
    }

    pub fn is_same_origin(&self) -> bool {
        self.is_same_scheme() && self.is_same_hostname() && self.is_same_port()
    }
}

fn query_pairs(search: &str) -> Vec<(String, String)> {
    let raw = search.strip_prefix('?').unwrap_or(search);
    raw.split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((name, value)) => (name.to_string(), value.to_string()),
            None => (segment.to_string(), String::new()),
        })
        .collect()
}
