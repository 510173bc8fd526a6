//! Live page state

use parking_lot::RwLock;
use scraper::Html;
use std::sync::Arc;
use url::Url;

use crate::script::InlineAsset;

/// Content accepted by a swap: raw markup, plain text (escaped on render),
/// or an already-materialized fragment.
#[derive(Debug, Clone)]
pub enum Content {
    Markup(String),
    Text(String),
    Fragment(Fragment),
}

impl Content {
    pub fn render(&self) -> String {
        match self {
            Content::Markup(markup) => markup.clone(),
            Content::Text(text) => escape_text(text),
            Content::Fragment(fragment) => fragment.html().to_string(),
        }
    }
}

/// A parsed, normalized piece of markup.
#[derive(Debug, Clone)]
pub struct Fragment {
    html: String,
}

impl Fragment {
    /// Materialize markup through the HTML parser, normalizing it the way
    /// the document would.
    pub fn parse(markup: &str) -> Self {
        let parsed = Html::parse_fragment(markup);
        let html = parsed
            .root_element()
            .inner_html();

        Self { html }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// The live document. Hosts hold it behind a [`PageHandle`]; the engine
/// mutates it during a transition.
pub struct Page {
    location: Url,
    title: String,
    /// Current content of the swap region.
    content: String,
    /// Head assets appended across navigations, in insertion order.
    head: Vec<InlineAsset>,
}

pub type PageHandle = Arc<RwLock<Page>>;

impl Page {
    pub fn new(location: Url, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            location,
            title: title.into(),
            content: content.into(),
            head: Vec::new(),
        }
    }

    pub fn shared(self) -> PageHandle {
        Arc::new(RwLock::new(self))
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn set_location(&mut self, location: Url) {
        self.location = location;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the swap-region content. Prior children are always removed
    /// first, so replacing with the same content is idempotent. Nothing
    /// outside the swap region is touched.
    pub fn replace_content(&mut self, content: &Content) {
        self.content.clear();
        self.content.push_str(&content.render());
    }

    pub fn append_head_asset(&mut self, asset: InlineAsset) {
        tracing::debug!(id = %asset.id, "appending head asset");
        self.head.push(asset);
    }

    pub fn head_assets(&self) -> &[InlineAsset] {
        &self.head
    }
}
