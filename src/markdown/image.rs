//! Image URL extensions
//!
//! Image destinations may carry rendering hints that are stripped before the
//! URL is emitted:
//!
//! - a size suffix: `photo.png{300}`, `photo.png{300x200}`, `photo.png{50%:auto}`
//! - a float marker: `photo.png#left`, `photo.png#right`
//!
//! Sizes accept `px`, `%`, `vw`, `hw` (emitted as `vh`) or a bare number of
//! pixels. Anything out of range or unparseable becomes `auto`.

use std::fmt;

use super::escape_html;

/// Largest accepted pixel size
const MAX_PIXELS: u32 = 4000;

/// Largest accepted relative size (`%`, `vw`, `vh`)
const MAX_RELATIVE: u32 = 500;

/// Horizontal float of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFloat {
    Left,
    Right,
}

impl ImageFloat {
    fn marker(&self) -> &'static str {
        match self {
            ImageFloat::Left => "#left",
            ImageFloat::Right => "#right",
        }
    }

    fn margin(&self) -> &'static str {
        match self {
            ImageFloat::Left => "0 1rem 1rem 0",
            ImageFloat::Right => "0 0 1rem 1rem",
        }
    }
}

impl fmt::Display for ImageFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFloat::Left => f.write_str("left"),
            ImageFloat::Right => f.write_str("right"),
        }
    }
}

/// An image destination with its rendering hints split out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpec {
    pub src: String,
    pub width: Option<String>,
    pub height: Option<String>,
    pub float: Option<ImageFloat>,
}

impl ImageSpec {
    /// Split size and float hints off an image destination
    pub fn parse(dest: &str) -> Self {
        let mut src = dest.to_string();

        let float = [ImageFloat::Left, ImageFloat::Right]
            .into_iter()
            .find(|f| src.contains(f.marker()));
        if let Some(f) = float {
            src = src.replacen(f.marker(), "", 1);
        }

        let sized = split_size_suffix(&src)
            .map(|(base, size)| (base.to_string(), parse_dimensions(size)));

        let (mut width, mut height) = (None, None);
        if let Some((base, (w, h))) = sized {
            src = base;
            width = Some(w);
            height = h;
        }

        Self {
            src,
            width,
            height,
            float,
        }
    }

    /// Inline CSS for the hints, empty when there are none
    pub fn style(&self) -> String {
        let mut style = String::new();
        if let Some(ref width) = self.width {
            style.push_str(&format!("width: {}; ", width));
        }
        if let Some(ref height) = self.height {
            style.push_str(&format!("height: {}; ", height));
        }
        if let Some(float) = self.float {
            style.push_str(&format!("float: {}; margin: {}; ", float, float.margin()));
        }
        style.trim_end().to_string()
    }

    /// Render an `<img>` element
    pub fn to_html(&self, alt: &str, title: &str) -> String {
        let mut html = format!(
            "<img src=\"{}\" alt=\"{}\"",
            escape_html(&self.src),
            escape_html(alt)
        );
        if !title.is_empty() {
            html.push_str(&format!(" title=\"{}\"", escape_html(title)));
        }
        let style = self.style();
        if !style.is_empty() {
            html.push_str(&format!(" style=\"{}\"", style));
        }
        html.push_str(" />");
        html
    }
}

/// `base{size}` -> (`base`, `size`)
fn split_size_suffix(src: &str) -> Option<(&str, &str)> {
    let inner = src.strip_suffix('}')?;
    let open = inner.rfind('{')?;
    let (base, size) = (&inner[..open], &inner[open + 1..]);
    if base.is_empty() || size.is_empty() {
        None
    } else {
        Some((base, size))
    }
}

/// `W`, `W:H` or `WxH`
fn parse_dimensions(size: &str) -> (String, Option<String>) {
    if let Some((w, h)) = size.split_once(':') {
        return (parse_size_unit(w), Some(parse_size_unit(h)));
    }

    // `x` also appears inside `px`, so only split where both halves are sizes
    for (index, _) in size.match_indices(|c: char| c == 'x' || c == 'X') {
        let (w, h) = (&size[..index], &size[index + 1..]);
        if let (Some(w), Some(h)) = (parse_size(w), parse_size(h)) {
            return (w, Some(h));
        }
    }

    (parse_size_unit(size), None)
}

/// Parse a single size, falling back to `auto`
pub fn parse_size_unit(size: &str) -> String {
    parse_size(size).unwrap_or_else(|| "auto".to_string())
}

fn parse_size(size: &str) -> Option<String> {
    let size = size.trim();
    let digits_end = size
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(size.len());

    let (number, unit) = size.split_at(digits_end);
    let value: u32 = number.parse().ok()?;

    match unit {
        "px" if value <= MAX_PIXELS => Some(format!("{}px", value)),
        "" if value <= MAX_PIXELS => Some(format!("{}px", value)),
        "%" if value <= MAX_RELATIVE => Some(format!("{}%", value)),
        "vw" if value <= MAX_RELATIVE => Some(format!("{}vw", value)),
        "hw" if value <= MAX_RELATIVE => Some(format!("{}vh", value)),
        _ => None,
    }
}
