//! The named output parts produced by a render.
//!
//! A render produces one immutable bundle of strings keyed by part name. The
//! caller selects exactly one of them for output; selecting a name the bundle
//! does not contain is a configuration error, not a render error.

use std::collections::BTreeMap;

use crate::format::RenderFormat;
use crate::util::escape_html;

/// Canonical part names.
pub mod part {
    /// Body content only, no wrapper element.
    pub const FRAGMENT: &str = "fragment";
    /// Fragment wrapped in `<div class="document">`: the default selection.
    pub const HTML_BODY: &str = "html_body";
    /// `<meta charset>` and `<title>` block.
    pub const HTML_HEAD: &str = "html_head";
    /// Plain text of the first top-level heading; may be empty.
    pub const TITLE: &str = "title";
    /// Full document: doctype, `<html>`, head, body.
    pub const WHOLE: &str = "whole";
}

/// Immutable result bundle of one render.
#[derive(Clone, Debug)]
pub struct RenderParts {
    map: BTreeMap<&'static str, String>,
}

impl RenderParts {
    /// Assemble all parts from the rendered fragment and captured title.
    pub(crate) fn assemble(format: RenderFormat, fragment: String, title: Option<String>) -> Self {
        let title = title.unwrap_or_default();
        let html_body = format!("<div class=\"document\">\n{fragment}</div>\n");
        let html_head = format!(
            "<meta charset=\"utf-8\" />\n<title>{}</title>\n",
            escape_html(&title)
        );
        let whole = format!(
            "{}\n<html>\n<head>\n{html_head}</head>\n<body>\n{html_body}</body>\n</html>\n",
            format.doctype()
        );

        let mut map = BTreeMap::new();
        map.insert(part::FRAGMENT, fragment);
        map.insert(part::HTML_BODY, html_body);
        map.insert(part::HTML_HEAD, html_head);
        map.insert(part::TITLE, title);
        map.insert(part::WHOLE, whole);
        Self { map }
    }

    /// Look up a part by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// The part names this bundle contains, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.map.keys().copied()
    }
}
