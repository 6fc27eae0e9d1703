//! Block-level dialect directives
//!
//! Runs after the inline directives and handles the two multi-line constructs:
//!
//! ```text
//! !!! warning Heads Up
//!     first body line
//!     second body line
//!
//! [TOC2]
//! ```
//!
//! Admonitions become a titled `<div>` block on a single line; TOC markers become an empty
//! placeholder element that the renderer later swaps for a generated table of
//! contents. Neither construct nests.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Indentation that marks an admonition body line
const BODY_INDENT: &str = "    ";

/// Joins body lines so the emitted block stays on one line and no
/// line-anchored directive can match inside it on a later pass
const BODY_LINE_BREAK: &str = "<br/>";

fn admonition_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^!!![ \t]*([A-Za-z]+)(?:[ \t]+(.*?))?[ \t]*$").expect("admonition pattern")
    })
}

fn toc_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\[TOC(\d?)\](\r?)$").expect("toc marker pattern"))
}

fn toc_placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<div class="toc" data-start-level="([1-6])"></div>"#)
            .expect("toc placeholder pattern")
    })
}

/// Recognized admonition kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdmonitionKind {
    Note,
    Info,
    Warning,
    Danger,
    Greentext,
}

impl AdmonitionKind {
    pub const ALL: [AdmonitionKind; 5] = [
        AdmonitionKind::Note,
        AdmonitionKind::Info,
        AdmonitionKind::Warning,
        AdmonitionKind::Danger,
        AdmonitionKind::Greentext,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "note" => Some(AdmonitionKind::Note),
            "info" => Some(AdmonitionKind::Info),
            "warning" => Some(AdmonitionKind::Warning),
            "danger" => Some(AdmonitionKind::Danger),
            "greentext" => Some(AdmonitionKind::Greentext),
            _ => None,
        }
    }

    /// Keyword as written in the directive and used in the CSS class
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmonitionKind::Note => "note",
            AdmonitionKind::Info => "info",
            AdmonitionKind::Warning => "warning",
            AdmonitionKind::Danger => "danger",
            AdmonitionKind::Greentext => "greentext",
        }
    }

    /// Title used when the directive does not give one
    pub fn default_title(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// A parsed `!!!` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmonitionBlock {
    pub kind: AdmonitionKind,
    pub title: String,
    pub body_lines: Vec<String>,
}

impl AdmonitionBlock {
    /// Parse a directive line (`!!! kind [title]`). Body lines are added by the
    /// caller.
    pub fn from_header(line: &str) -> Option<Self> {
        let caps = admonition_header_re().captures(line)?;
        let kind = AdmonitionKind::parse(&caps[1])?;
        let title = caps
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| kind.default_title());

        Some(Self {
            kind,
            title,
            body_lines: Vec::new(),
        })
    }

    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"admonition admonition-{kind}\"><div class=\"admonition-title\">{title}</div><div class=\"admonition-content\">{body}</div></div>",
            kind = self.kind.as_str(),
            title = self.title,
            body = self.body_lines.join(BODY_LINE_BREAK),
        )
    }
}

/// Strip the body indent from `line`, if it is an admonition body line
fn body_line(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(BODY_INDENT)?;
    let rest = rest.strip_suffix('\r').unwrap_or(rest);
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// A `[TOC]` marker and the first heading level it lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocPlaceholder {
    pub start_level: u8,
}

impl TocPlaceholder {
    /// Build from the optional digit of `[TOC<digit>]`, clamped to 1..=6
    pub fn from_digit(digit: Option<&str>) -> Self {
        let start_level = digit
            .and_then(|d| d.parse::<u8>().ok())
            .unwrap_or(1)
            .clamp(1, 6);
        Self { start_level }
    }

    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"toc\" data-start-level=\"{}\"></div>",
            self.start_level
        )
    }
}

/// Replace every rendered TOC placeholder with `render(start_level)`
pub fn replace_toc_placeholders<F>(html: &str, mut render: F) -> String
where
    F: FnMut(u8) -> String,
{
    toc_placeholder_re()
        .replace_all(html, |caps: &Captures| {
            let level = caps[1].parse::<u8>().unwrap_or(1);
            render(level)
        })
        .into_owned()
}

/// Applies the block directives in their fixed order
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockPatternEngine;

impl BlockPatternEngine {
    pub fn new() -> Self {
        Self
    }

    /// Admonitions, then TOC markers
    pub fn apply(&self, text: &str) -> String {
        let text = self.admonitions(text);
        self.toc_placeholders(&text)
    }

    /// Collapse each `!!!` directive and its indented body into one HTML line
    pub fn admonitions(&self, text: &str) -> String {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut output: Vec<String> = Vec::with_capacity(lines.len());
        let mut index = 0;

        while index < lines.len() {
            let line = lines[index];
            let header = line.strip_suffix('\r').unwrap_or(line);

            let Some(mut block) = AdmonitionBlock::from_header(header) else {
                output.push(line.to_string());
                index += 1;
                continue;
            };

            index += 1;
            while let Some(body) = lines.get(index).and_then(|l| body_line(l)) {
                block.body_lines.push(body.to_string());
                index += 1;
            }

            log::trace!(
                "Admonition '{}' with {} body line(s)",
                block.kind.as_str(),
                block.body_lines.len()
            );

            let mut html = block.to_html();
            if line.ends_with('\r') {
                html.push('\r');
            }
            output.push(html);
        }

        output.join("\n")
    }

    /// `[TOC]` / `[TOC<digit>]` on a line of its own
    pub fn toc_placeholders(&self, text: &str) -> String {
        toc_marker_re()
            .replace_all(text, |caps: &Captures| {
                let digit = caps.get(1).map(|m| m.as_str()).filter(|d| !d.is_empty());
                format!("{}{}", TocPlaceholder::from_digit(digit).to_html(), &caps[2])
            })
            .into_owned()
    }
}
