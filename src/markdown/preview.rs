//! HTML rendering of preprocessed Markdown
//!
//! Parses with pulldown-cmark (raw HTML passes through untouched) and
//! rewrites the event stream for the dialect's rendering hooks:
//!
//! - links open in a new browsing context
//! - image destinations may carry size/float hints (see [`super::image`])
//! - ` ```mermaid ` fences become `<div class="mermaid">` for client-side diagrams
//! - `# -> Title <-` headings (h1..h3) are centered with the arrows removed
//!
//! After rendering, TOC placeholders are replaced with the generated table of
//! contents and headings receive ids.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag};

use super::block::replace_toc_placeholders;
use super::escape_html;
use super::headings::{
    build_toc, extract_headings, inject_heading_ids, is_centered_heading, strip_center_arrows,
    Heading,
};
use super::image::ImageSpec;

/// Behaviour switches for [`HtmlRenderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlRenderOptions {
    /// Add `target="_blank" rel="noopener noreferrer"` to links
    pub links_new_tab: bool,
    /// Tag rendered headings with slug ids
    pub heading_ids: bool,
    /// Caption rendered above generated tables of contents
    pub toc_title: Option<String>,
}

impl Default for HtmlRenderOptions {
    fn default() -> Self {
        Self {
            links_new_tab: true,
            heading_ids: true,
            toc_title: None,
        }
    }
}

/// CommonMark renderer with the dialect's element overrides
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    options: Options,
    render_options: HtmlRenderOptions,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::with_options(HtmlRenderOptions::default())
    }

    pub fn with_options(render_options: HtmlRenderOptions) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        Self {
            options,
            render_options,
        }
    }

    pub fn render_options(&self) -> &HtmlRenderOptions {
        &self.render_options
    }

    /// Render already-preprocessed Markdown to an HTML fragment
    pub fn render_fragment(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let events = center_headings(self.rewrite_events(parser));

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Fill TOC placeholders from the headings of `source` and add heading ids
    pub fn post_process(&self, html: &str, source: &str) -> String {
        let headings = extract_headings(source);
        let html = replace_toc_placeholders(html, |level| self.toc_nav(&headings, level));

        if self.render_options.heading_ids {
            inject_heading_ids(&html)
        } else {
            html
        }
    }

    /// Wrap a generated TOC in its `<nav>` container
    pub fn toc_nav(&self, headings: &[Heading], start_level: u8) -> String {
        let toc = build_toc(headings, start_level);
        if toc.is_empty() {
            log::debug!("No headings at level {} or deeper for TOC", start_level);
            return String::new();
        }

        let title = self
            .render_options
            .toc_title
            .as_deref()
            .map(|t| format!("<div class=\"toc-title\">{}</div>\n", escape_html(t)))
            .unwrap_or_default();

        format!("<nav class=\"toc\">\n{}{}\n</nav>", title, toc)
    }

    fn rewrite_events<'a, I>(&self, events: I) -> Vec<Event<'a>>
    where
        I: Iterator<Item = Event<'a>>,
    {
        let mut output = Vec::new();
        let mut events = events;

        while let Some(event) = events.next() {
            match event {
                Event::Start(Tag::Image(_, dest, title)) => {
                    let alt = collect_image_alt(&mut events);
                    let spec = ImageSpec::parse(&dest);
                    output.push(Event::Html(spec.to_html(&alt, &title).into()));
                }
                Event::Start(Tag::Link(_, dest, title)) if self.render_options.links_new_tab => {
                    output.push(Event::Html(link_open_tag(&dest, &title).into()));
                }
                Event::End(Tag::Link(..)) if self.render_options.links_new_tab => {
                    output.push(Event::Html(CowStr::Borrowed("</a>")));
                }
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref lang)))
                    if is_mermaid(lang) =>
                {
                    let chart = collect_code(&mut events);
                    output.push(Event::Html(
                        format!(
                            "<div class=\"mermaid\">{}</div>\n",
                            escape_html(chart.trim_end_matches('\n'))
                        )
                        .into(),
                    ));
                }
                other => output.push(other),
            }
        }

        output
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn link_open_tag(dest: &str, title: &str) -> String {
    let title = if title.is_empty() {
        String::new()
    } else {
        format!(" title=\"{}\"", escape_html(title))
    };

    format!(
        "<a href=\"{}\"{} target=\"_blank\" rel=\"noopener noreferrer\">",
        escape_html(dest),
        title
    )
}

fn is_mermaid(lang: &str) -> bool {
    lang.split_whitespace().next() == Some("mermaid")
}

/// Consume events up to the image's end tag, returning its alt text
fn collect_image_alt<'a, I>(events: &mut I) -> String
where
    I: Iterator<Item = Event<'a>>,
{
    let mut alt = String::new();
    let mut depth = 0usize;

    for event in events {
        match event {
            Event::Start(Tag::Image(..)) => depth += 1,
            Event::End(Tag::Image(..)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Text(text) | Event::Code(text) => alt.push_str(&text),
            _ => {}
        }
    }

    alt
}

/// Consume events up to the code block's end tag, returning its contents
fn collect_code<'a, I>(events: &mut I) -> String
where
    I: Iterator<Item = Event<'a>>,
{
    let mut code = String::new();

    for event in events {
        match event {
            Event::End(Tag::CodeBlock(_)) => break,
            Event::Text(text) => code.push_str(&text),
            _ => {}
        }
    }

    code
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

fn heading_level_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Center h1..h3 headings written as `-> Title <-`
fn center_headings(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut output = Vec::with_capacity(events.len());
    let mut events = events.into_iter();

    while let Some(event) = events.next() {
        let level = match event {
            Event::Start(Tag::Heading(level, _, _)) => level,
            other => {
                output.push(other);
                continue;
            }
        };

        let mut inner = Vec::new();
        let mut end = None;
        for next in events.by_ref() {
            if matches!(next, Event::End(Tag::Heading(..))) {
                end = Some(next);
                break;
            }
            inner.push(next);
        }

        let inner = merge_text(inner);
        let text: String = inner
            .iter()
            .filter_map(|e| match e {
                Event::Text(t) => Some(&**t),
                _ => None,
            })
            .collect();

        if is_centered_heading(heading_level_number(level), &text) {
            let tag = heading_tag(level);
            output.push(Event::Html(
                format!("<{} style=\"text-align: center;\">", tag).into(),
            ));
            output.extend(strip_arrows(inner));
            output.push(Event::Html(format!("</{}>\n", tag).into()));
        } else {
            output.push(event);
            output.extend(inner);
            output.extend(end);
        }
    }

    output
}

/// Join runs of adjacent text events (the parser splits text at `<`)
fn merge_text(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut merged: Vec<Event<'_>> = Vec::with_capacity(events.len());

    for event in events {
        if let Event::Text(text) = &event {
            if let Some(Event::Text(previous)) = merged.last_mut() {
                let joined = format!("{}{}", previous, text);
                *previous = joined.into();
                continue;
            }
        }
        merged.push(event);
    }

    merged
}

fn strip_arrows(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut events: Vec<Event<'_>> = events
        .into_iter()
        .map(|event| match event {
            Event::Text(text) => Event::Text(strip_center_arrows(&text).into()),
            other => other,
        })
        .collect();

    if let Some(Event::Text(text)) = events.first_mut() {
        let trimmed = text.trim_start().to_string();
        *text = trimmed.into();
    }
    if let Some(Event::Text(text)) = events.last_mut() {
        let trimmed = text.trim_end().to_string();
        *text = trimmed.into();
    }

    events
}
