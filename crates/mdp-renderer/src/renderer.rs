//! Markup rendering via the library event stream.
//!
//! Parsing and HTML emission belong to `pulldown-cmark`; this module adapts
//! the event stream in between. Heading levels are shifted to honor
//! [`RenderOptions::initial_header_level`], the first top-level heading is
//! captured as the document title, and constructs the preview cannot resolve
//! are replaced with `problematic` spans plus a diagnostic.

use std::collections::HashSet;

use pulldown_cmark::html::push_html;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::diagnostics::Diagnostic;
use crate::options::RenderOptions;
use crate::util::escape_html;

/// Outcome of rendering one source text to an HTML fragment.
pub(crate) struct Rendered {
    /// Body fragment HTML.
    pub html: String,
    /// Text of the first top-level heading, if any.
    pub title: Option<String>,
    /// Problems observed along the way, in document order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Render `source` into an HTML fragment.
///
/// Never fails: diagnostics are collected, and deciding whether any of them
/// is fatal is the caller's job (the halt-level policy).
pub(crate) fn render_fragment(source: &str, options: &RenderOptions) -> Rendered {
    let parser_options = options.parser_options();

    // First pass: footnote definitions, so references can be checked against
    // them during adaptation.
    let footnote_defs: HashSet<String> = Parser::new_ext(source, parser_options)
        .filter_map(|event| match event {
            Event::Start(Tag::FootnoteDefinition(name)) => Some(name.into_string()),
            _ => None,
        })
        .collect();

    let mut adapter = EventAdapter::new(options.initial_header_level, footnote_defs);
    let events: Vec<Event<'_>> = Parser::new_ext(source, parser_options)
        .map(|event| adapter.adapt(event))
        .collect();

    let mut html = String::with_capacity(source.len() * 2);
    push_html(&mut html, events.into_iter());
    adapter.finish(html)
}

/// Stateful event-stream adapter between the parser and the HTML writer.
struct EventAdapter {
    initial_header_level: u8,
    footnote_defs: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
    title: Option<String>,
    title_buf: String,
    in_first_h1: bool,
}

impl EventAdapter {
    fn new(initial_header_level: u8, footnote_defs: HashSet<String>) -> Self {
        Self {
            initial_header_level,
            footnote_defs,
            diagnostics: Vec::new(),
            title: None,
            title_buf: String::new(),
            in_first_h1: false,
        }
    }

    fn adapt<'a>(&mut self, event: Event<'a>) -> Event<'a> {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let src = heading_to_num(level);
                if src == 1 && self.title.is_none() && !self.in_first_h1 {
                    self.in_first_h1 = true;
                    self.title_buf.clear();
                }
                Event::Start(Tag::Heading {
                    level: num_to_heading(self.shifted(src, true)),
                    id,
                    classes,
                    attrs,
                })
            }
            Event::End(TagEnd::Heading(level)) => {
                let src = heading_to_num(level);
                if self.in_first_h1 && src == 1 {
                    self.in_first_h1 = false;
                    self.title = Some(self.title_buf.trim().to_owned());
                }
                Event::End(TagEnd::Heading(num_to_heading(self.shifted(src, false))))
            }
            Event::Text(text) => {
                if self.in_first_h1 {
                    self.title_buf.push_str(&text);
                }
                Event::Text(text)
            }
            Event::Code(code) => {
                if self.in_first_h1 {
                    self.title_buf.push_str(&code);
                }
                Event::Code(code)
            }
            Event::SoftBreak => {
                if self.in_first_h1 {
                    self.title_buf.push(' ');
                }
                Event::SoftBreak
            }
            Event::FootnoteReference(name) => {
                if self.footnote_defs.contains(name.as_ref()) {
                    Event::FootnoteReference(name)
                } else {
                    self.diagnostics.push(Diagnostic::error(format!(
                        "unknown footnote target: {name}"
                    )));
                    Event::Html(
                        format!(
                            "<span class=\"problematic\">[^{}]</span>",
                            escape_html(&name)
                        )
                        .into(),
                    )
                }
            }
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                if dest_url.is_empty() {
                    self.diagnostics
                        .push(Diagnostic::warning("link without destination"));
                }
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                })
            }
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                if dest_url.is_empty() {
                    self.diagnostics
                        .push(Diagnostic::warning("image without source"));
                }
                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                })
            }
            other => other,
        }
    }

    /// Shifted heading level, clamped to 6.
    ///
    /// The clamp diagnostic is emitted on the start tag only; the matching
    /// end tag recomputes silently.
    fn shifted(&mut self, src: u8, emit: bool) -> u8 {
        let shifted = src
            .saturating_add(self.initial_header_level)
            .saturating_sub(1)
            .max(1);
        if shifted > 6 {
            if emit {
                self.diagnostics.push(Diagnostic::info(format!(
                    "heading level {shifted} clamped to 6"
                )));
            }
            6
        } else {
            shifted
        }
    }

    fn finish(self, html: String) -> Rendered {
        Rendered {
            html,
            title: self.title,
            diagnostics: self.diagnostics,
        }
    }
}

/// Convert heading level enum to number (1-6).
const fn heading_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Convert a number to a heading level, saturating at H6.
const fn num_to_heading(num: u8) -> HeadingLevel {
    match num {
        1 => HeadingLevel::H1,
        2 => HeadingLevel::H2,
        3 => HeadingLevel::H3,
        4 => HeadingLevel::H4,
        5 => HeadingLevel::H5,
        _ => HeadingLevel::H6,
    }
}
