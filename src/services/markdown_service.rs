use std::collections::HashMap;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use serde::Serialize;

use crate::utils::escape_html;

/// Rendered body of a blog post
#[derive(Debug, Clone, Serialize)]
pub struct RenderedMarkdown {
    pub html: String,
    pub toc: String,
}

/// Renders stored markdown content to HTML.
///
/// Raw HTML in the source is escaped, never passed through, and every
/// heading gets a stable anchor id.
pub struct MarkdownService {
    options: Options,
}

impl MarkdownService {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }

    pub fn render(&self, content: &str) -> RenderedMarkdown {
        let headings = self.collect_headings(content);

        let mut next = headings.iter();
        let events = Parser::new_ext(content, self.options).map(|event| match event {
            Event::Start(Tag::Heading { level, id, classes, attrs }) => {
                let anchor = next.next().map(|h| CowStr::from(h.id.clone()));
                Event::Start(Tag::Heading { level, id: anchor.or(id), classes, attrs })
            }
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });

        let mut out = String::with_capacity(content.len() * 3 / 2);
        html::push_html(&mut out, events);

        RenderedMarkdown { html: out, toc: build_toc(&headings) }
    }

    fn collect_headings(&self, content: &str) -> Vec<Heading> {
        let mut headings = Vec::new();
        let mut current: Option<(u32, String)> = None;
        let mut seen: HashMap<String, usize> = HashMap::new();

        for event in Parser::new_ext(content, self.options) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => current = Some((level_number(level), String::new())),
                Event::Text(t) | Event::Code(t) => {
                    if let Some((_, text)) = current.as_mut() {
                        text.push_str(&t);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some((_, text)) = current.as_mut() {
                        text.push(' ');
                    }
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, text)) = current.take() {
                        let mut id = slugify(&text);
                        if id.is_empty() {
                            id = format!("section-{}", level);
                        }
                        let count = seen.entry(id.clone()).or_insert(0);
                        if *count > 0 {
                            id = format!("{}-{}", id, count);
                        }
                        *count += 1;
                        headings.push(Heading { level, id, text });
                    }
                }
                _ => {}
            }
        }
        headings
    }
}

impl Default for MarkdownService {
    fn default() -> Self {
        Self::new()
    }
}

struct Heading {
    level: u32,
    id: String,
    text: String,
}

fn build_toc(headings: &[Heading]) -> String {
    if headings.is_empty() {
        return String::new();
    }
    let mut toc = String::from("<nav class=\"toc\"><ul>");
    for h in headings.iter().filter(|h| h.level <= 3) {
        toc.push_str(&format!(
            "<li class=\"toc-h{}\"><a href=\"#{}\">{}</a></li>",
            h.level,
            escape_html(&h.id),
            escape_html(&h.text)
        ));
    }
    toc.push_str("</ul></nav>");
    toc
}

fn level_number(level: HeadingLevel) -> u32 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_dash = false;
    for c in text.chars().map(|c| c.to_ascii_lowercase()) {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_dash = false;
        } else if (c.is_ascii_whitespace() || c == '-' || c == '_') && !last_dash && !out.is_empty() {
            out.push('-');
            last_dash = true;
        }
    }
    if out.ends_with('-') {
        out.pop();
    }
    out
}
