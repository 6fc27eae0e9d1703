//! Heading extraction, slugs and table of contents
//!
//! The same slug function is used when listing headings from Markdown source
//! (for the TOC) and when tagging rendered `<hN>` elements with ids, so TOC
//! links point at the rendered headings. Duplicate slugs are not
//! disambiguated.
//!
//! Source heading text is cleaned up the way the renderer displays it: the
//! closing `#` run, emphasis and code markers, and the arrows of a centered
//! heading are removed before slugging.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::escape_html;

fn atx_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,6})[ \t]+(.+)$").expect("heading pattern"))
}

fn non_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9A-Za-z_]+").expect("non-word pattern"))
}

fn html_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<h([1-6])((?:\s[^>]*)?)>(.*?)</h([1-6])>").expect("html heading pattern")
    })
}

fn id_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\s)id\s*=").expect("id attribute pattern"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern"))
}

/// Deepest heading level that `-> Title <-` centers
pub const MAX_CENTERED_LEVEL: u8 = 3;

/// Whether a heading renders centered (h1..h3 containing both arrows)
pub fn is_centered_heading(level: u8, text: &str) -> bool {
    level <= MAX_CENTERED_LEVEL && text.contains("->") && text.contains("<-")
}

/// Remove the centering arrows from heading text
pub fn strip_center_arrows(text: &str) -> String {
    text.replace("->", "").replace("<-", "")
}

/// A heading found in Markdown source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1..=6
    pub level: u8,
    pub text: String,
    pub id: String,
}

impl Heading {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        let text = text.into();
        let id = slugify(&text);
        Self { level, text, id }
    }
}

/// Lowercase `text` and collapse every run of characters other than ASCII
/// letters, digits and `_` into a single hyphen. Leading and trailing hyphens
/// are kept, and non-ASCII letters count as separators (`Café` -> `caf-`).
pub fn slugify(text: &str) -> String {
    non_word_re()
        .replace_all(&text.to_lowercase(), "-")
        .into_owned()
}

/// List the ATX headings (`#` .. `######`) of a Markdown document in order.
///
/// Lines inside fenced code blocks are skipped.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut fence: Option<char> = None;

    for line in markdown.lines() {
        let trimmed = line.trim_start();
        let marker = if trimmed.starts_with("```") {
            Some('`')
        } else if trimmed.starts_with("~~~") {
            Some('~')
        } else {
            None
        };

        match (fence, marker) {
            (None, Some(m)) => {
                fence = Some(m);
                continue;
            }
            (Some(open), Some(m)) if open == m => {
                fence = None;
                continue;
            }
            (Some(_), _) => continue,
            (None, None) => {}
        }

        let Some(caps) = atx_heading_re().captures(line) else {
            continue;
        };

        let level = caps[1].len() as u8;
        let mut text = strip_inline_markers(strip_closing_sequence(caps[2].trim()));
        if is_centered_heading(level, &text) {
            text = strip_center_arrows(&text);
        }

        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        headings.push(Heading::new(level, text));
    }

    headings
}

/// Drop an optional closing `#` run (`## Title ##`)
fn strip_closing_sequence(text: &str) -> &str {
    let without = text.trim_end_matches('#');
    if without.is_empty() {
        return without;
    }
    if without.ends_with(|c: char| c == ' ' || c == '\t') {
        without.trim_end()
    } else {
        text
    }
}

/// Drop emphasis, strikethrough and code span markers
fn strip_inline_markers(text: &str) -> String {
    text.replace("~~", "")
        .chars()
        .filter(|c| !matches!(c, '*' | '`'))
        .collect()
}

/// Render headings at `start_level` or deeper as nested `<ul>` lists.
///
/// One list level is opened or closed per step, so skipped levels still
/// produce a well-formed hierarchy. Returns an empty string when no heading
/// qualifies.
pub fn build_toc(headings: &[Heading], start_level: u8) -> String {
    let entries: Vec<&Heading> = headings
        .iter()
        .filter(|h| h.level >= start_level)
        .collect();

    if entries.is_empty() {
        return String::new();
    }

    let mut toc = String::from("<ul class=\"toc-list\">\n");
    let mut current_level = start_level;

    for heading in entries {
        while current_level < heading.level {
            toc.push_str("<ul>\n");
            current_level += 1;
        }
        while current_level > heading.level {
            toc.push_str("</ul>\n");
            current_level -= 1;
        }

        toc.push_str(&format!(
            "<li><a href=\"#{}\">{}</a></li>\n",
            heading.id,
            escape_html(&heading.text)
        ));
    }

    while current_level > start_level {
        toc.push_str("</ul>\n");
        current_level -= 1;
    }

    toc.push_str("</ul>");
    toc
}

/// Add an `id` to every rendered `<h1>`..`<h6>` that lacks one.
///
/// The id is the slug of the heading's text content with inner tags removed.
/// Headings that already have an id are left alone, which makes the pass
/// idempotent.
pub fn inject_heading_ids(html: &str) -> String {
    html_heading_re()
        .replace_all(html, |caps: &Captures| {
            let (level, attrs, inner) = (&caps[1], &caps[2], &caps[3]);

            if level != &caps[4] || id_attr_re().is_match(attrs) {
                return caps[0].to_string();
            }

            let text = decode_entities(&tag_re().replace_all(inner, ""));
            let id = slugify(text.trim());
            if id.is_empty() {
                return caps[0].to_string();
            }

            format!("<h{level} id=\"{id}\"{attrs}>{inner}</h{level}>")
        })
        .into_owned()
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's new?"), "what-s-new-");
        assert_eq!(slugify("a  --  b"), "a-b");
        assert_eq!(slugify("snake_case"), "snake_case");
    }

    #[test]
    fn test_slugify_ascii_word_characters() {
        assert_eq!(slugify("Café"), "caf-");
        assert_eq!(slugify("Ünïcode Title"), "-n-code-title");
    }

    #[test]
    fn test_extract_headings_strips_closing_hashes_and_markup() {
        let headings = extract_headings("## Title ##\n### **Bold** `code`\n# C#\n## ##");
        let texts: Vec<&str> = headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Title", "Bold code", "C#"]);
        assert_eq!(headings[0].id, "title");
        assert_eq!(headings[1].id, "bold-code");
    }

    #[test]
    fn test_extract_headings_centered() {
        let headings = extract_headings("# -> Welcome <-\n#### -> Deep <-");
        assert_eq!(headings[0].text, "Welcome");
        assert_eq!(headings[0].id, "welcome");
        assert_eq!(headings[1].text, "-> Deep <-");
    }

    #[test]
    fn test_extract_headings() {
        let headings = extract_headings("# A\n## B\n# C");
        assert_eq!(
            headings,
            vec![
                Heading { level: 1, text: "A".to_string(), id: "a".to_string() },
                Heading { level: 2, text: "B".to_string(), id: "b".to_string() },
                Heading { level: 1, text: "C".to_string(), id: "c".to_string() },
            ]
        );
    }

    #[test]
    fn test_extract_headings_requires_space() {
        let headings = extract_headings("#hashtag\n####### seven\n###   Spaced   \n");
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].level, 3);
        assert_eq!(headings[0].text, "Spaced");
    }

    #[test]
    fn test_extract_headings_skips_code_fences() {
        let md = "# Real\n```bash\n# comment\n```\n~~~\n## also code\n~~~\n## After";
        let texts: Vec<String> = extract_headings(md).into_iter().map(|h| h.text).collect();
        assert_eq!(texts, vec!["Real", "After"]);
    }

    #[test]
    fn test_extract_headings_empty_input() {
        assert!(extract_headings("").is_empty());
        assert!(extract_headings("   \n\n").is_empty());
    }

    #[test]
    fn test_build_toc_nesting() {
        let toc = build_toc(&extract_headings("# A\n## B\n# C"), 1);
        assert_eq!(
            toc,
            "<ul class=\"toc-list\">\n\
             <li><a href=\"#a\">A</a></li>\n\
             <ul>\n\
             <li><a href=\"#b\">B</a></li>\n\
             </ul>\n\
             <li><a href=\"#c\">C</a></li>\n\
             </ul>"
        );
    }

    #[test]
    fn test_build_toc_skipped_levels_balance() {
        let toc = build_toc(&extract_headings("# Top\n#### Deep"), 1);
        assert_eq!(toc.matches("<ul").count(), toc.matches("</ul>").count());
        assert_eq!(toc.matches("<ul>\n").count(), 3);
    }

    #[test]
    fn test_build_toc_start_level() {
        let headings = extract_headings("# Title\n## One\n### Sub\n## Two");
        let toc = build_toc(&headings, 2);
        assert!(!toc.contains("Title"));
        assert!(toc.contains("<a href=\"#one\">One</a>"));
        assert!(toc.contains("<a href=\"#sub\">Sub</a>"));
    }

    #[test]
    fn test_build_toc_empty() {
        assert_eq!(build_toc(&[], 1), "");
        assert_eq!(build_toc(&extract_headings("# Only top"), 2), "");
    }

    #[test]
    fn test_build_toc_escapes_text() {
        let toc = build_toc(&[Heading::new(1, "a <b> & c")], 1);
        assert!(toc.contains("a &lt;b&gt; &amp; c"));
    }

    #[test]
    fn test_inject_heading_ids() {
        let html = "<h1>Hello World</h1>\n<p>x</p>\n<h2><em>Big</em> News</h2>";
        assert_eq!(
            inject_heading_ids(html),
            "<h1 id=\"hello-world\">Hello World</h1>\n<p>x</p>\n<h2 id=\"big-news\"><em>Big</em> News</h2>"
        );
    }

    #[test]
    fn test_inject_heading_ids_keeps_attributes() {
        let html = "<h3 style=\"text-align: center;\">Centered</h3>";
        assert_eq!(
            inject_heading_ids(html),
            "<h3 id=\"centered\" style=\"text-align: center;\">Centered</h3>"
        );
    }

    #[test]
    fn test_inject_heading_ids_is_idempotent() {
        let html = "<h1>One</h1><h2 class=\"x\">Two &amp; Three</h2><h6>Six</h6>";
        let once = inject_heading_ids(html);
        assert_eq!(inject_heading_ids(&once), once);
        assert!(once.contains("id=\"two-three\""));
    }

    #[test]
    fn test_inject_heading_ids_respects_existing_id() {
        let html = "<h1 id=\"custom\">Title</h1><h2 data-id=\"x\">Other</h2>";
        let out = inject_heading_ids(html);
        assert!(out.contains("<h1 id=\"custom\">Title</h1>"));
        assert!(out.contains("<h2 id=\"other\" data-id=\"x\">Other</h2>"));
    }

    #[test]
    fn test_toc_links_match_injected_ids() {
        let headings = extract_headings("## Setup & Install");
        let html = inject_heading_ids("<h2>Setup &amp; Install</h2>");
        assert!(html.contains(&format!("id=\"{}\"", headings[0].id)));
    }
}
