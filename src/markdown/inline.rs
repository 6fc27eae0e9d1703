//! Inline dialect directives
//!
//! Rewrites the inline extensions of the dialect into literal HTML fragments:
//!
//! | Syntax                      | Output                                   |
//! |-----------------------------|------------------------------------------|
//! | `!>text` (whole line)       | `<span class="spoiler">text</span>`      |
//! | `%red% text %%`             | `<span style="color: #f38ba8">text</span>` |
//! | `==text==`                  | `<mark>text</mark>`                      |
//! | `!~red;wavy;both;2;text~!`  | `<span style="text-decoration: ...">`    |
//! | `-> text <-` (whole line)   | centered `<div>`                         |
//! | `-> text ->` (whole line)   | right-aligned `<div>`                    |
//!
//! Every pattern is single-line. Directives that do not parse are left in the
//! text untouched. None of the emitted fragments can be matched again by any
//! of the patterns, so a second pass over the output is a no-op.

use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::colors::ColorTable;

fn spoiler_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^!>([^\r\n]+)").expect("spoiler pattern"))
}

fn colored_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"%([a-zA-Z]+|#[0-9A-Fa-f]{6})%[ \t]*([^\r\n]+?)[ \t]*%%")
            .expect("colored text pattern")
    })
}

fn highlight_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"==([^=\r\n][^\r\n]*?)==").expect("highlight pattern"))
}

fn underline_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!~([^~\r\n]+?)~!").expect("underline pattern"))
}

fn align_center_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^->[ \t]*([^\r\n]+?)[ \t]*<-(\r?)$").expect("center pattern")
    })
}

fn align_right_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^->[ \t]*([^\r\n]+?)[ \t]*->(\r?)$").expect("right pattern")
    })
}

/// A color reference inside a directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorToken {
    /// Palette name, or any other CSS color keyword
    Named(String),
    /// Literal `#RRGGBB`
    Hex(String),
}

impl ColorToken {
    /// Classify a raw color slot. Never fails: anything that is not a six digit
    /// hex literal is treated as a name.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let is_hex = raw.len() == 7
            && raw.starts_with('#')
            && raw[1..].chars().all(|c| c.is_ascii_hexdigit());

        if is_hex {
            ColorToken::Hex(raw.to_string())
        } else {
            ColorToken::Named(raw.to_string())
        }
    }

    /// Resolve to a CSS color value
    pub fn resolve(&self, colors: &ColorTable) -> String {
        match self {
            ColorToken::Hex(hex) => hex.clone(),
            ColorToken::Named(name) => colors.lookup(name),
        }
    }
}

/// Line style of an underline directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Double,
    Dotted,
    Dashed,
    Wavy,
}

impl LineStyle {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "solid" => Some(LineStyle::Solid),
            "double" => Some(LineStyle::Double),
            "dotted" => Some(LineStyle::Dotted),
            "dashed" => Some(LineStyle::Dashed),
            "wavy" => Some(LineStyle::Wavy),
            _ => None,
        }
    }

    pub fn as_css(&self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Double => "double",
            LineStyle::Dotted => "dotted",
            LineStyle::Dashed => "dashed",
            LineStyle::Wavy => "wavy",
        }
    }
}

/// Which lines an underline directive draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decoration {
    #[default]
    Underline,
    LineThrough,
    Overline,
    /// Underline and overline together
    Both,
}

impl Decoration {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "underline" => Some(Decoration::Underline),
            "line-through" => Some(Decoration::LineThrough),
            "overline" => Some(Decoration::Overline),
            "both" => Some(Decoration::Both),
            _ => None,
        }
    }

    pub fn as_css(&self) -> &'static str {
        match self {
            Decoration::Underline => "underline",
            Decoration::LineThrough => "line-through",
            Decoration::Overline => "overline",
            Decoration::Both => "underline overline",
        }
    }
}

/// Parsed body of an `!~...~!` directive.
///
/// `None` in a slot means the slot was omitted, left empty or spelled
/// `default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnderlineSpec {
    pub color: Option<ColorToken>,
    pub style: Option<LineStyle>,
    pub decoration: Option<Decoration>,
    pub thickness: Option<u32>,
    pub text: String,
}

/// Number of positional slots before the text
const UNDERLINE_SLOTS: usize = 4;

impl UnderlineSpec {
    /// Parse `text` or `color;style;decoration;thickness;text` (any prefix of
    /// the slots may be given). Returns `None` for malformed bodies.
    pub fn parse(body: &str) -> Option<Self> {
        let parts: Vec<&str> = body.split(';').map(str::trim).collect();
        let (text, slots) = parts.split_last()?;

        if text.is_empty() || slots.len() > UNDERLINE_SLOTS {
            return None;
        }

        let slot = |index: usize| -> Option<&str> {
            slots
                .get(index)
                .copied()
                .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("default"))
        };

        let style = match slot(1) {
            Some(raw) => Some(LineStyle::parse(raw)?),
            None => None,
        };
        let decoration = match slot(2) {
            Some(raw) => Some(Decoration::parse(raw)?),
            None => None,
        };
        let thickness = match slot(3) {
            Some(raw) => Some(raw.parse::<u32>().ok().filter(|t| *t > 0)?),
            None => None,
        };

        Some(Self {
            color: slot(0).map(ColorToken::parse),
            style,
            decoration,
            thickness,
            text: text.to_string(),
        })
    }

    /// Render as an inline `<span>`
    pub fn to_html(&self, colors: &ColorTable) -> String {
        let color = self
            .color
            .as_ref()
            .map(|c| c.resolve(colors))
            .unwrap_or_else(|| "currentColor".to_string());

        format!(
            "<span style=\"text-decoration: {} {} {}; text-decoration-thickness: {}px;\">{}</span>",
            self.decoration.unwrap_or_default().as_css(),
            self.style.unwrap_or_default().as_css(),
            color,
            self.thickness.unwrap_or(1),
            self.text
        )
    }
}

/// Horizontal alignment of an alignment line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Center,
    Right,
}

impl Alignment {
    pub fn as_css(&self) -> &'static str {
        match self {
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

/// Applies the inline directives in their fixed order
#[derive(Debug, Clone, Default)]
pub struct InlinePatternEngine {
    colors: ColorTable,
}

impl InlinePatternEngine {
    pub fn new(colors: ColorTable) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// Run every inline stage: spoiler, colored text, highlight, underline,
    /// alignment
    pub fn apply(&self, markdown: &str) -> String {
        let text = self.spoilers(markdown);
        let text = self.colored_text(&text);
        let text = self.highlights(&text);
        let text = self.underlines(&text);
        self.alignment(&text)
    }

    /// `!>rest of line`
    pub fn spoilers(&self, text: &str) -> String {
        spoiler_re()
            .replace_all(text, "<span class=\"spoiler\">${1}</span>")
            .into_owned()
    }

    /// `%color% text %%`
    pub fn colored_text(&self, text: &str) -> String {
        colored_text_re()
            .replace_all(text, |caps: &Captures| {
                let color = ColorToken::parse(&caps[1]).resolve(&self.colors);
                format!("<span style=\"color: {}\">{}</span>", color, caps[2].trim())
            })
            .into_owned()
    }

    /// `==text==`
    pub fn highlights(&self, text: &str) -> String {
        highlight_re()
            .replace_all(text, "<mark>${1}</mark>")
            .into_owned()
    }

    /// `!~[color;style;decoration;thickness;]text~!`
    pub fn underlines(&self, text: &str) -> String {
        underline_re()
            .replace_all(text, |caps: &Captures| match UnderlineSpec::parse(&caps[1]) {
                Some(spec) => spec.to_html(&self.colors),
                None => {
                    log::trace!("Leaving malformed underline directive: {}", &caps[0]);
                    caps[0].to_string()
                }
            })
            .into_owned()
    }

    /// `-> text <-` and `-> text ->`. Centering runs first, since both forms
    /// share the leading arrow.
    pub fn alignment(&self, text: &str) -> String {
        let text = align_center_re().replace_all(text, |caps: &Captures| {
            align_div(Alignment::Center, &caps[1], &caps[2])
        });
        align_right_re()
            .replace_all(&text, |caps: &Captures| {
                align_div(Alignment::Right, &caps[1], &caps[2])
            })
            .into_owned()
    }
}

fn align_div(alignment: Alignment, content: &str, line_end: &str) -> String {
    format!(
        "<div style=\"text-align: {};\">{}</div>{}",
        alignment, content, line_end
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> InlinePatternEngine {
        InlinePatternEngine::new(ColorTable::new())
    }

    #[test]
    fn test_spoiler_line() {
        let out = engine().spoilers("before\n!>the butler did it\nafter");
        assert_eq!(
            out,
            "before\n<span class=\"spoiler\">the butler did it</span>\nafter"
        );
    }

    #[test]
    fn test_spoiler_must_start_line() {
        let input = "not a !>spoiler";
        assert_eq!(engine().spoilers(input), input);
    }

    #[test]
    fn test_colored_text_named() {
        let out = engine().colored_text("say %red% hi %% now");
        assert_eq!(out, "say <span style=\"color: #f38ba8\">hi</span> now");
    }

    #[test]
    fn test_colored_text_hex_passthrough() {
        let out = engine().colored_text("%#123ABC% hi %%");
        assert!(out.contains("color: #123ABC"));
    }

    #[test]
    fn test_colored_text_unknown_name_passthrough() {
        let out = engine().colored_text("%rebeccapurple%text%%");
        assert_eq!(out, "<span style=\"color: rebeccapurple\">text</span>");
    }

    #[test]
    fn test_colored_text_is_non_greedy() {
        let out = engine().colored_text("%red% a %% and %blue% b %%");
        assert_eq!(
            out,
            "<span style=\"color: #f38ba8\">a</span> and <span style=\"color: #89b4fa\">b</span>"
        );
    }

    #[test]
    fn test_colored_text_unterminated_is_literal() {
        let input = "%red% never closed";
        assert_eq!(engine().colored_text(input), input);
    }

    #[test]
    fn test_highlight() {
        assert_eq!(engine().highlights("==bold me=="), "<mark>bold me</mark>");
        assert_eq!(
            engine().highlights("==a== and ==b=="),
            "<mark>a</mark> and <mark>b</mark>"
        );
    }

    #[test]
    fn test_highlight_ignores_setext_underline() {
        let input = "Title\n=====";
        assert_eq!(engine().highlights(input), input);
    }

    #[test]
    fn test_underline_defaults() {
        assert_eq!(
            engine().underlines("!~x~!"),
            "<span style=\"text-decoration: underline solid currentColor; text-decoration-thickness: 1px;\">x</span>"
        );
    }

    #[test]
    fn test_underline_full_spec() {
        let out = engine().underlines("!~red;double;line-through;5; y~!");
        assert_eq!(
            out,
            "<span style=\"text-decoration: line-through double #f38ba8; text-decoration-thickness: 5px;\">y</span>"
        );
    }

    #[test]
    fn test_underline_default_slots_and_both() {
        let out = engine().underlines("!~default;wavy;both;default;z~!");
        assert!(out.contains("text-decoration: underline overline wavy currentColor;"));
        assert!(out.contains("text-decoration-thickness: 1px;"));
    }

    #[test]
    fn test_underline_partial_slots() {
        let out = engine().underlines("!~#00ff00;dotted;text~!");
        assert!(out.contains("text-decoration: underline dotted #00ff00;"));
    }

    #[test]
    fn test_underline_malformed_is_literal() {
        for input in [
            "!~red;solid;sideways;2;text~!",
            "!~red;zigzag;text~!",
            "!~red;solid;underline;thick;text~!",
            "!~red;solid;underline;0;text~!",
            "!~a;b;c;d;e;f~!",
            "!~unterminated",
        ] {
            assert_eq!(engine().underlines(input), input, "input: {}", input);
        }
    }

    #[test]
    fn test_underline_spec_parse() {
        let spec = UnderlineSpec::parse("sky; dashed ; overline ; 3 ; hello").unwrap();
        assert_eq!(spec.color, Some(ColorToken::Named("sky".to_string())));
        assert_eq!(spec.style, Some(LineStyle::Dashed));
        assert_eq!(spec.decoration, Some(Decoration::Overline));
        assert_eq!(spec.thickness, Some(3));
        assert_eq!(spec.text, "hello");

        let plain = UnderlineSpec::parse("just text").unwrap();
        assert_eq!(plain.color, None);
        assert_eq!(plain.text, "just text");

        assert!(UnderlineSpec::parse("red;  ").is_none());
    }

    #[test]
    fn test_color_token_parse() {
        assert_eq!(
            ColorToken::parse("#a1B2c3"),
            ColorToken::Hex("#a1B2c3".to_string())
        );
        assert_eq!(
            ColorToken::parse("#a1B2"),
            ColorToken::Named("#a1B2".to_string())
        );
        assert_eq!(ColorToken::parse("red").resolve(&ColorTable::new()), "#f38ba8");
    }

    #[test]
    fn test_alignment_center_and_right() {
        assert_eq!(
            engine().alignment("-> centered <-"),
            "<div style=\"text-align: center;\">centered</div>"
        );
        assert_eq!(
            engine().alignment("-> right ->"),
            "<div style=\"text-align: right;\">right</div>"
        );
    }

    #[test]
    fn test_alignment_preserves_crlf() {
        assert_eq!(
            engine().alignment("-> a <-\r\nnext"),
            "<div style=\"text-align: center;\">a</div>\r\nnext"
        );
    }

    #[test]
    fn test_alignment_requires_whole_line() {
        let input = "text -> not aligned <-";
        assert_eq!(engine().alignment(input), input);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let input = "!>secret\n%red% a %% ==b== !~c~!\n-> d <-\n-> e ->";
        let once = engine().apply(input);
        let twice = engine().apply(&once);
        assert_eq!(once, twice);
    }
}
