//! Response document parsing
//!
//! Scans a fetched document for the pieces a transition needs: the new
//! title, the swap-selector fragment, and allow-listed scripts and styles
//! in document order.

use scraper::{Html, Selector};

use crate::error::PageError;
use crate::script::{AssetKind, InlineAsset};
use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct Extracted {
    /// Text of the document's `<title>`, whitespace-normalized.
    pub title: Option<String>,
    /// Inner HTML of the first element matching the swap selector. `None`
    /// when the element is absent or empty, which fails the transition.
    pub fragment: Option<String>,
    /// Allow-listed inline scripts, document order.
    pub scripts: Vec<InlineAsset>,
    /// Allow-listed styles and stylesheet links, document order.
    pub styles: Vec<InlineAsset>,
}

/// Parse `html` and pull out everything the swap step consumes.
pub fn extract(
    html: &str,
    swap_selector: &str,
    script_ids: &[String],
    style_ids: &[String],
) -> Result<Extracted> {
    let doc = Html::parse_document(html);

    let swap = Selector::parse(swap_selector)
        .map_err(|e| PageError::Selector(e.to_string()))?;

    let title = extract_title(&doc);

    let fragment = doc.select(&swap).next().and_then(|el| {
        let inner = el.inner_html();
        if inner.trim().is_empty() {
            None
        } else {
            Some(inner)
        }
    });

    let mut scripts = Vec::new();
    if !script_ids.is_empty() {
        let selector =
            Selector::parse("script[id]").map_err(|e| PageError::Selector(e.to_string()))?;
        for el in doc.select(&selector) {
            let Some(id) = el.value().attr("id") else {
                continue;
            };
            if !script_ids.iter().any(|allowed| allowed == id) {
                continue;
            }
            scripts.push(InlineAsset {
                id: id.to_string(),
                kind: AssetKind::Script,
                source: el.text().collect::<Vec<_>>().join(""),
            });
        }
    }

    let mut styles = Vec::new();
    if !style_ids.is_empty() {
        let selector = Selector::parse("style[id], link[id]")
            .map_err(|e| PageError::Selector(e.to_string()))?;
        for el in doc.select(&selector) {
            let Some(id) = el.value().attr("id") else {
                continue;
            };
            if !style_ids.iter().any(|allowed| allowed == id) {
                continue;
            }
            let kind = if el.value().name() == "style" {
                AssetKind::Style
            } else {
                AssetKind::StyleLink
            };
            styles.push(InlineAsset {
                id: id.to_string(),
                kind,
                source: el.html(),
            });
        }
    }

    tracing::debug!(
        title = title.as_deref().unwrap_or(""),
        has_fragment = fragment.is_some(),
        scripts = scripts.len(),
        styles = styles.len(),
        "extracted response document"
    );

    Ok(Extracted {
        title,
        fragment,
        scripts,
        styles,
    })
}

fn extract_title(doc: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    for el in doc.select(&selector) {
        let text = el.text().collect::<Vec<_>>().join(" ");
        let cleaned = normalize_whitespace(&text);
        if !cleaned.is_empty() {
            return Some(cleaned);
        }
    }
    None
}

fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
