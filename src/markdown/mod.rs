//! Markdown dialect for awsm-md
//!
//! Handles the extended Markdown dialect including:
//! - Color table and inline directives (spoilers, colors, highlights, underlines, alignment)
//! - Block directives (admonitions, TOC markers)
//! - Heading extraction, slugs and table of contents
//! - HTML rendering and export

pub mod colors;
pub mod inline;
pub mod block;
pub mod headings;
pub mod preprocessor;
pub mod image;
pub mod preview;
pub mod export;

pub use colors::{ColorTable, DEFAULT_COLORS};
pub use inline::{Alignment, ColorToken, Decoration, InlinePatternEngine, LineStyle, UnderlineSpec};
pub use block::{
    replace_toc_placeholders, AdmonitionBlock, AdmonitionKind, BlockPatternEngine, TocPlaceholder,
};
pub use headings::{build_toc, extract_headings, inject_heading_ids, slugify, Heading};
pub use preprocessor::{Preprocessor, Stage};
pub use image::{ImageFloat, ImageSpec};
pub use preview::{HtmlRenderOptions, HtmlRenderer};
pub use export::{ExportFormat, HtmlExportOptions, MarkdownExporter};

/// Escape text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Main Markdown renderer combining the preprocessor and the HTML renderer
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    preprocessor: Preprocessor,
    html_renderer: HtmlRenderer,
}

impl MarkdownRenderer {
    pub fn new(colors: ColorTable, options: HtmlRenderOptions) -> Self {
        Self {
            preprocessor: Preprocessor::new(colors),
            html_renderer: HtmlRenderer::with_options(options),
        }
    }

    /// Get the preprocessor
    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// Get the HTML renderer
    pub fn html_renderer(&self) -> &HtmlRenderer {
        &self.html_renderer
    }

    /// Rewrite dialect directives into Markdown with embedded HTML
    pub fn preprocess(&self, markdown: &str) -> String {
        self.preprocessor.transform(markdown)
    }

    /// Render a dialect document to an HTML fragment
    pub fn render_html(&self, markdown: &str) -> String {
        let processed = self.preprocessor.transform(markdown);
        let html = self.html_renderer.render_fragment(&processed);
        self.html_renderer.post_process(&html, markdown)
    }

    /// Table of contents for the whole document, empty if it has no headings
    pub fn toc(&self, markdown: &str, start_level: u8) -> String {
        self.html_renderer
            .toc_nav(&extract_headings(markdown), start_level.clamp(1, 6))
    }
}
