//! Export functionality for Markdown documents
//!
//! This module provides export capabilities for dialect documents:
//! - Markdown export (directives expanded to embedded HTML)
//! - Standalone HTML export with themed, embedded styles

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{escape_html, MarkdownRenderer};
use crate::error::{ExportError, ExportResult};
use crate::file_handler::write_file_atomic;

/// Client-side renderer for `<div class="mermaid">` diagrams
const MERMAID_SCRIPT: &str = r#"<script type="module">
        import mermaid from "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs";
        mermaid.initialize({ startOnLoad: true });
    </script>"#;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Preprocessed Markdown with embedded HTML
    #[serde(rename = "md")]
    Markdown,
    /// Standalone HTML document
    #[serde(rename = "html")]
    Html,
}

impl ExportFormat {
    /// Get the file extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
        }
    }

    /// Get display name for the format
    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "Markdown",
            ExportFormat::Html => "HTML",
        }
    }

    /// Parse a format name or file extension
    pub fn from_name(name: &str) -> ExportResult<Self> {
        match name.to_lowercase().as_str() {
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "html" | "htm" => Ok(ExportFormat::Html),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Detect the format from an output path's extension
    pub fn from_path(path: &Path) -> ExportResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ExportError::InvalidPath(path.to_path_buf()))?;
        Self::from_name(extension)
    }
}

/// Options for HTML export
#[derive(Debug, Clone)]
pub struct HtmlExportOptions {
    /// Include CSS styles inline
    pub include_styles: bool,
    /// Document title
    pub title: Option<String>,
    /// Use dark mode styles
    pub dark_mode: bool,
    /// Custom CSS to include
    pub custom_css: Option<String>,
    /// Include table of contents
    pub include_toc: bool,
}

impl Default for HtmlExportOptions {
    fn default() -> Self {
        Self {
            include_styles: true,
            title: None,
            dark_mode: false,
            custom_css: None,
            include_toc: false,
        }
    }
}

/// Main exporter for dialect documents
#[derive(Debug, Clone, Default)]
pub struct MarkdownExporter {
    renderer: MarkdownRenderer,
}

impl MarkdownExporter {
    /// Create a new exporter
    pub fn new(renderer: MarkdownRenderer) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Export to a string in the given format
    pub fn export(&self, markdown: &str, format: ExportFormat, options: &HtmlExportOptions) -> String {
        match format {
            ExportFormat::Markdown => self.renderer.preprocess(markdown),
            ExportFormat::Html => self.export_html(markdown, options),
        }
    }

    /// Export markdown to a standalone HTML document
    pub fn export_html(&self, markdown: &str, options: &HtmlExportOptions) -> String {
        let html_content = self.renderer.render_html(markdown);

        let title = options.title.as_deref().unwrap_or("Document");
        let styles = if options.include_styles {
            Self::get_styles(options.dark_mode, options.custom_css.as_deref())
        } else {
            String::new()
        };

        let toc = if options.include_toc {
            self.renderer.toc(markdown, 1)
        } else {
            String::new()
        };

        let scripts = if html_content.contains("<div class=\"mermaid\">") {
            MERMAID_SCRIPT
        } else {
            ""
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="awsm-md">
    <title>{}</title>
    {}
</head>
<body>
    <article class="markdown-body">
        {}
        {}
    </article>
    {}
</body>
</html>"#,
            escape_html(title),
            styles,
            toc,
            html_content,
            scripts
        )
    }

    /// Export to a file, written atomically
    pub fn export_to_file(
        &self,
        markdown: &str,
        output_path: &Path,
        format: ExportFormat,
        options: &HtmlExportOptions,
    ) -> ExportResult<()> {
        if output_path.file_name().is_none() {
            return Err(ExportError::InvalidPath(output_path.to_path_buf()));
        }

        let content = self.export(markdown, format, options);
        write_file_atomic(output_path, &content)?;

        log::info!(
            "Exported {} to {}",
            format.display_name(),
            output_path.display()
        );
        Ok(())
    }

    /// Generate suggested output path from input path
    pub fn suggest_output_path(input_path: &Path, format: ExportFormat) -> PathBuf {
        let stem = input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");

        let mut output = input_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();

        // Markdown export must not overwrite its own input
        let name = match format {
            ExportFormat::Markdown => format!("{}.out.{}", stem, format.extension()),
            ExportFormat::Html => format!("{}.{}", stem, format.extension()),
        };

        output.push(name);
        output
    }

    fn get_styles(dark_mode: bool, custom_css: Option<&str>) -> String {
        let theme_styles = if dark_mode {
            r#"
            :root {
                --color-bg: #1e1e2e;
                --color-text: #cdd6f4;
                --color-heading: #cdd6f4;
                --color-link: #89b4fa;
                --color-code-bg: #181825;
                --color-border: #45475a;
                --color-blockquote: #a6adc8;
                --color-mark: #f9e2af;
                --color-mark-text: #1e1e2e;
                --color-spoiler: #585b70;
                --color-note: #89b4fa;
                --color-info: #94e2d5;
                --color-warning: #fab387;
                --color-danger: #f38ba8;
                --color-greentext: #a6e3a1;
            }"#
        } else {
            r#"
            :root {
                --color-bg: #eff1f5;
                --color-text: #4c4f69;
                --color-heading: #4c4f69;
                --color-link: #1e66f5;
                --color-code-bg: #e6e9ef;
                --color-border: #ccd0da;
                --color-blockquote: #6c6f85;
                --color-mark: #df8e1d;
                --color-mark-text: #eff1f5;
                --color-spoiler: #9ca0b0;
                --color-note: #1e66f5;
                --color-info: #179299;
                --color-warning: #fe640b;
                --color-danger: #d20f39;
                --color-greentext: #40a02b;
            }"#
        };

        let custom = custom_css.unwrap_or("");

        format!(
            r#"<style>
        {}

        * {{
            box-sizing: border-box;
        }}

        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            font-size: 16px;
            line-height: 1.6;
            color: var(--color-text);
            background-color: var(--color-bg);
            max-width: 900px;
            margin: 0 auto;
            padding: 2rem;
        }}

        .markdown-body h1, .markdown-body h2, .markdown-body h3,
        .markdown-body h4, .markdown-body h5, .markdown-body h6 {{
            color: var(--color-heading);
            margin-top: 24px;
            margin-bottom: 16px;
            font-weight: 600;
            line-height: 1.25;
        }}

        .markdown-body h1 {{ font-size: 2em; border-bottom: 1px solid var(--color-border); padding-bottom: .3em; }}
        .markdown-body h2 {{ font-size: 1.5em; border-bottom: 1px solid var(--color-border); padding-bottom: .3em; }}
        .markdown-body h3 {{ font-size: 1.25em; }}
        .markdown-body h4 {{ font-size: 1em; }}
        .markdown-body h5 {{ font-size: .875em; }}
        .markdown-body h6 {{ font-size: .85em; color: var(--color-blockquote); }}

        .markdown-body a {{
            color: var(--color-link);
            text-decoration: none;
        }}

        .markdown-body a:hover {{
            text-decoration: underline;
        }}

        .markdown-body code {{
            background-color: var(--color-code-bg);
            padding: .2em .4em;
            border-radius: 6px;
            font-size: 85%;
            font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, monospace;
        }}

        .markdown-body pre {{
            background-color: var(--color-code-bg);
            padding: 16px;
            overflow: auto;
            border-radius: 6px;
            line-height: 1.45;
        }}

        .markdown-body pre code {{
            background: transparent;
            padding: 0;
            font-size: 100%;
        }}

        .markdown-body blockquote {{
            margin: 16px 0;
            padding: 0 1em;
            color: var(--color-blockquote);
            border-left: .25em solid var(--color-border);
        }}

        .markdown-body table {{
            border-collapse: collapse;
            width: 100%;
            margin: 16px 0;
        }}

        .markdown-body table th,
        .markdown-body table td {{
            padding: 6px 13px;
            border: 1px solid var(--color-border);
        }}

        .markdown-body img {{
            max-width: 100%;
            border-radius: 6px;
        }}

        .markdown-body input[type="checkbox"] {{
            margin-right: 8px;
        }}

        .markdown-body mark {{
            background-color: var(--color-mark);
            color: var(--color-mark-text);
            padding: 0 .2em;
            border-radius: 3px;
        }}

        .spoiler {{
            background-color: var(--color-spoiler);
            color: transparent;
            border-radius: 3px;
            cursor: pointer;
            transition: color .2s;
        }}

        .spoiler:hover {{
            color: var(--color-text);
            background-color: transparent;
        }}

        .admonition {{
            margin: 16px 0;
            padding: 8px 16px;
            border-left: 4px solid var(--admonition-color, var(--color-border));
            background-color: var(--color-code-bg);
            border-radius: 0 6px 6px 0;
            white-space: pre-line;
        }}

        .admonition-title {{
            font-weight: 600;
            color: var(--admonition-color, var(--color-heading));
            margin-bottom: 4px;
        }}

        .admonition-note {{ --admonition-color: var(--color-note); }}
        .admonition-info {{ --admonition-color: var(--color-info); }}
        .admonition-warning {{ --admonition-color: var(--color-warning); }}
        .admonition-danger {{ --admonition-color: var(--color-danger); }}
        .admonition-greentext {{ --admonition-color: var(--color-greentext); }}
        .admonition-greentext .admonition-content {{ color: var(--color-greentext); }}

        .mermaid {{
            margin: 16px 0;
            text-align: center;
        }}

        .toc {{
            background-color: var(--color-code-bg);
            padding: 16px 24px;
            border-radius: 6px;
            margin-bottom: 24px;
        }}

        .toc-title {{
            font-weight: 600;
            margin-bottom: 12px;
        }}

        .toc ul {{
            margin: 0;
            padding-left: 1.5em;
            list-style-type: none;
        }}

        .toc a {{
            color: var(--color-link);
            text-decoration: none;
        }}

        @media print {{
            body {{
                max-width: none;
                padding: 1cm;
            }}

            .spoiler {{
                color: var(--color-text);
            }}

            pre, blockquote, .admonition {{
                page-break-inside: avoid;
            }}
        }}

        {}
    </style>"#,
            theme_styles, custom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_export() {
        let exporter = MarkdownExporter::default();
        let options = HtmlExportOptions {
            title: Some("Test <1>".to_string()),
            ..Default::default()
        };

        let html = exporter.export_html("# Hello\n\nWorld", &options);

        assert!(html.contains("<title>Test &lt;1&gt;</title>"));
        assert!(html.contains("<h1 id=\"hello\">Hello</h1>"));
        assert!(html.contains("<p>World</p>"));
        assert!(html.contains(".admonition-warning"));
        assert!(!html.contains("mermaid.initialize"));
    }

    #[test]
    fn test_html_export_themes() {
        let exporter = MarkdownExporter::default();
        let light = exporter.export_html("x", &HtmlExportOptions::default());
        let dark = exporter.export_html(
            "x",
            &HtmlExportOptions {
                dark_mode: true,
                custom_css: Some(".custom { color: red; }".to_string()),
                ..Default::default()
            },
        );
        assert!(light.contains("--color-bg: #eff1f5"));
        assert!(dark.contains("--color-bg: #1e1e2e"));
        assert!(dark.contains(".custom { color: red; }"));
    }

    #[test]
    fn test_html_export_without_styles() {
        let options = HtmlExportOptions {
            include_styles: false,
            ..Default::default()
        };
        let html = MarkdownExporter::default().export_html("x", &options);
        assert!(!html.contains("<style>"));
    }

    #[test]
    fn test_html_export_toc_and_mermaid() {
        let options = HtmlExportOptions {
            include_toc: true,
            ..Default::default()
        };
        let html = MarkdownExporter::default()
            .export_html("# One\n## Two\n\n```mermaid\ngraph TD;\n```\n", &options);
        assert!(html.contains("<nav class=\"toc\">"));
        assert!(html.contains("<a href=\"#two\">Two</a>"));
        assert!(html.contains("mermaid.initialize"));
    }

    #[test]
    fn test_markdown_export() {
        let out = MarkdownExporter::default().export(
            "==hi==",
            ExportFormat::Markdown,
            &HtmlExportOptions::default(),
        );
        assert_eq!(out, "<mark>hi</mark>");
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out.HTM")).unwrap(),
            ExportFormat::Html
        );
        assert_eq!(ExportFormat::from_name("markdown").unwrap(), ExportFormat::Markdown);
        assert!(matches!(
            ExportFormat::from_name("pdf"),
            Err(ExportError::UnsupportedFormat(f)) if f == "pdf"
        ));
        assert!(matches!(
            ExportFormat::from_path(Path::new("noext")),
            Err(ExportError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_export_to_file() {
        let path = std::env::temp_dir().join(format!("awsm-md-export-{}.html", std::process::id()));
        let exporter = MarkdownExporter::default();
        exporter
            .export_to_file("# Saved", &path, ExportFormat::Html, &HtmlExportOptions::default())
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(written.contains("Saved</h1>"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_suggest_output_path() {
        let input = PathBuf::from("/docs/readme.md");
        let output = MarkdownExporter::suggest_output_path(&input, ExportFormat::Html);
        assert_eq!(output, PathBuf::from("/docs/readme.html"));

        let output = MarkdownExporter::suggest_output_path(&input, ExportFormat::Markdown);
        assert_eq!(output, PathBuf::from("/docs/readme.out.md"));
    }
}
