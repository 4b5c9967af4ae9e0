//! HTML shapes emitted around a rendered diagram.

use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::Regex;
use scraper::{Html, Selector};

pub const WRAPPER_CLASS: &str = "sc-mermaid-wrapper";
pub const CONTAINER_CLASS: &str = "sc-mermaid-container";
pub const SVG_CLASS: &str = "sc-mermaid-svg";
pub const MODAL_CLASS: &str = "is-modal";
pub const HIDDEN_CLASS: &str = "is-hidden";

/// Final wrapper; `body` is the container's inner markup.
pub fn wrapper(id: &str, body: &str) -> String {
    format!(
        "<div class=\"{WRAPPER_CLASS}\" id=\"{id}\"><div class=\"{CONTAINER_CLASS}\">{body}</div></div>"
    )
}

/// Download control. `href` is `None` when the export is hidden.
pub fn export_control(id: &str, label: &str, href: Option<&str>) -> String {
    let icon = "<i class=\"fa-solid fa-download\"></i>";
    let label = encode_double_quoted_attribute(label);
    match href {
        Some(href) => format!(
            "<a class=\"is-action-button\" id=\"{id}-export-svg\" title=\"{label}\" href=\"{}\" download=\"{id}\">{icon}</a>",
            encode_double_quoted_attribute(href)
        ),
        None => format!(
            "<a class=\"is-action-button {HIDDEN_CLASS}\" id=\"{id}-export-svg\" title=\"{label}\">{icon}</a>"
        ),
    }
}

pub fn error_panel(id: &str, message: &str) -> String {
    format!(
        "<div class=\"sc-alert sc-alert-error\" id=\"{id}-error\">{}</div>",
        encode_text(message)
    )
}

fn element_tag_re(id: &str) -> Option<Regex> {
    Regex::new(&format!(
        r#"<[a-zA-Z][^>]*?[ \t\r\n]id\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(id)
    ))
    .ok()
}

/// Whether `markup` contains an element carrying `id`.
pub fn contains_element(markup: &str, id: &str) -> bool {
    let Ok(selector) = Selector::parse(&format!("[id=\"{id}\"]")) else {
        return false;
    };
    Html::parse_fragment(markup).select(&selector).next().is_some()
}

/// Adds `add` to and removes `remove` from the class list of the element
/// carrying `id`. Markup without that element is returned unchanged.
///
/// Works on the markup text so the library's output is kept byte for byte
/// apart from the class attribute.
pub fn toggle_classes(markup: &str, id: &str, add: &str, remove: &str) -> String {
    let Some(tag_re) = element_tag_re(id) else {
        return markup.to_string();
    };
    let Some(tag) = tag_re.find(markup) else {
        return markup.to_string();
    };
    let class_re = Regex::new(r#"[ \t\r\n]class\s*=\s*(?:"([^"]*)"|'([^']*)')"#).ok();

    let open_tag = tag.as_str();
    let rewritten = match class_re.as_ref().and_then(|re| re.captures(open_tag)) {
        Some(caps) => {
            let current = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            let mut classes: Vec<&str> = current
                .split_whitespace()
                .filter(|c| *c != remove && *c != add)
                .collect();
            classes.push(add);
            // The match starts at the whitespace before `class`.
            let whole = caps.get(0).map_or(0..0, |m| m.start() + 1..m.end());
            format!(
                "{}class=\"{}\"{}",
                &open_tag[..whole.start],
                classes.join(" "),
                &open_tag[whole.end..]
            )
        }
        None => {
            let name_end = open_tag[1..]
                .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
                .map_or(open_tag.len(), |i| i + 1);
            format!("{} class=\"{add}\"{}", &open_tag[..name_end], &open_tag[name_end..])
        }
    };

    format!("{}{}{}", &markup[..tag.start()], rewritten, &markup[tag.end()..])
}
