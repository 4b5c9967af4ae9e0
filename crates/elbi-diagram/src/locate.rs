//! Finding diagram source blocks in generated HTML and splicing rendered
//! markup back in their place.
//!
//! Pages go through `scraper`, so unquoted or reordered attributes and named
//! entities are handled by the HTML parsing rules.

use scraper::node::Comment;
use scraper::{ElementRef, Html, Node, Selector};

/// A `<pre><code class="language-mermaid">` block found in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    /// Position among the page's diagram blocks.
    pub index: usize,
    /// Generated identifier, `{prefix}{index}`.
    pub id: String,
    /// Text content of the `<code>` element.
    pub source: String,
}

impl DiagramBlock {
    pub fn svg_id(&self) -> String {
        format!("{}-svg", self.id)
    }
}

/// Whether `html` is a whole document rather than a body fragment.
fn is_document(html: &str) -> bool {
    let head: String = html.trim_start().chars().take(9).collect();
    let head = head.to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

fn parse(html: &str) -> Html {
    if is_document(html) {
        Html::parse_document(html)
    } else {
        Html::parse_fragment(html)
    }
}

/// `<code>` children of `<pre>` whose class list holds one of `marker_classes`.
fn marked_code<'a>(doc: &'a Html, marker_classes: &[String]) -> Vec<ElementRef<'a>> {
    let Ok(selector) = Selector::parse("pre > code") else {
        return Vec::new();
    };
    doc.select(&selector)
        .filter(|code| {
            code.value()
                .classes()
                .any(|class| marker_classes.iter().any(|marker| marker == class))
        })
        .collect()
}

/// Locates every block whose `<code>` carries one of `marker_classes`.
pub fn locate_blocks(html: &str, marker_classes: &[String], id_prefix: &str) -> Vec<DiagramBlock> {
    let doc = parse(html);
    marked_code(&doc, marker_classes)
        .into_iter()
        .enumerate()
        .map(|(index, code)| DiagramBlock {
            index,
            id: format!("{id_prefix}{index}"),
            source: code.text().collect(),
        })
        .collect()
}

fn placeholder(index: usize) -> String {
    format!("elbi-diagram-{index}")
}

/// Replaces the `<pre>` of the n-th located block with `markups[n]` and
/// serializes the page again.
///
/// Block order is the one [`locate_blocks`] reports for the same input.
pub fn splice_blocks(html: &str, marker_classes: &[String], markups: &[String]) -> String {
    let mut doc = parse(html);
    let pre_nodes: Vec<_> = marked_code(&doc, marker_classes)
        .iter()
        .filter_map(|code| code.parent().map(|pre| pre.id()))
        .collect();

    for (index, node) in pre_nodes.into_iter().enumerate() {
        if let Some(mut pre) = doc.tree.get_mut(node) {
            pre.insert_before(Node::Comment(Comment { comment: placeholder(index).into() }));
            pre.detach();
        }
    }

    let mut out = if is_document(html) {
        doc.html()
    } else {
        doc.root_element().inner_html()
    };
    for (index, markup) in markups.iter().enumerate() {
        out = out.replacen(&format!("<!--{}-->", placeholder(index)), markup, 1);
    }
    out
}
