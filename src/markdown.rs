//! Markdown body → HTML fragment.
//!
//! pulldown-cmark does the conversion. Extensions are switched on from the
//! `[markdown]` config table, and headings get `id` attributes derived with
//! [`slugify`] so article sections can be linked to directly.

use crate::config::MarkdownConfig;
use crate::slug::slugify;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html::push_html};

/// Render a markdown body to an HTML fragment.
pub fn render(body: &str, config: &MarkdownConfig) -> String {
    let parser = Parser::new_ext(body, options(config));
    let events = with_heading_ids(parser);
    let mut html = String::with_capacity(body.len() * 2);
    push_html(&mut html, events.into_iter());
    html
}

fn options(config: &MarkdownConfig) -> Options {
    let mut options = Options::empty();
    options.set(Options::ENABLE_TABLES, config.tables);
    options.set(Options::ENABLE_FOOTNOTES, config.footnotes);
    options.set(Options::ENABLE_STRIKETHROUGH, config.strikethrough);
    options.set(Options::ENABLE_SMART_PUNCTUATION, config.smart_punctuation);
    options.set(Options::ENABLE_HEADING_ATTRIBUTES, true);
    options
}

/// Give every heading without an explicit `{#id}` an id built from its text.
///
/// Repeated headings get `-2`, `-3`, ... suffixes so ids stay unique within
/// the fragment.
fn with_heading_ids<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events: Vec<Event<'a>> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for event in parser {
        match &event {
            Event::Start(Tag::Heading { id: None, .. }) => {
                pending = Some((events.len(), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, heading_text)) = pending.as_mut() {
                    heading_text.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, heading_text)) = pending.take() {
                    let base = slugify(&heading_text);
                    if !base.is_empty() {
                        let id = unique_id(&base, &seen);
                        seen.push(id.clone());
                        if let Event::Start(Tag::Heading { id: slot, .. }) = &mut events[start] {
                            *slot = Some(CowStr::from(id));
                        }
                    }
                }
            }
            _ => {}
        }
        events.push(event);
    }
    events
}

fn unique_id(base: &str, seen: &[String]) -> String {
    if !seen.iter().any(|s| s == base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !seen.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
