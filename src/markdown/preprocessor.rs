//! Dialect preprocessor
//!
//! Turns dialect Markdown into plain Markdown with embedded HTML, ready for a
//! CommonMark renderer that passes raw HTML through. The rewrite is an ordered
//! pipeline of named stages; the order is part of the contract because later
//! stages must not see syntax that earlier stages already turned into HTML.

use std::fmt;

use super::block::BlockPatternEngine;
use super::colors::ColorTable;
use super::inline::InlinePatternEngine;

/// One rewrite step of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Spoiler,
    ColoredText,
    Highlight,
    Underline,
    Alignment,
    Admonition,
    TocPlaceholder,
    /// Literal `\n` (backslash, `n`) becomes `<br/>`
    LineBreak,
}

impl Stage {
    /// Every stage, in the order `Preprocessor::transform` applies them
    pub const PIPELINE: [Stage; 8] = [
        Stage::Spoiler,
        Stage::ColoredText,
        Stage::Highlight,
        Stage::Underline,
        Stage::Alignment,
        Stage::Admonition,
        Stage::TocPlaceholder,
        Stage::LineBreak,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Spoiler => "spoiler",
            Stage::ColoredText => "colored-text",
            Stage::Highlight => "highlight",
            Stage::Underline => "underline",
            Stage::Alignment => "alignment",
            Stage::Admonition => "admonition",
            Stage::TocPlaceholder => "toc-placeholder",
            Stage::LineBreak => "line-break",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Composition root of the dialect
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    inline: InlinePatternEngine,
    block: BlockPatternEngine,
}

impl Preprocessor {
    pub fn new(colors: ColorTable) -> Self {
        Self {
            inline: InlinePatternEngine::new(colors),
            block: BlockPatternEngine::new(),
        }
    }

    pub fn colors(&self) -> &ColorTable {
        self.inline.colors()
    }

    /// Run the whole pipeline. Never fails; unrecognised syntax is left as is.
    pub fn transform(&self, markdown: &str) -> String {
        Stage::PIPELINE
            .iter()
            .fold(markdown.to_string(), |text, stage| {
                let next = self.apply_stage(*stage, &text);
                if next != text {
                    log::trace!("Stage '{}' rewrote the document", stage);
                }
                next
            })
    }

    /// Run a single stage in isolation
    pub fn apply_stage(&self, stage: Stage, text: &str) -> String {
        match stage {
            Stage::Spoiler => self.inline.spoilers(text),
            Stage::ColoredText => self.inline.colored_text(text),
            Stage::Highlight => self.inline.highlights(text),
            Stage::Underline => self.inline.underlines(text),
            Stage::Alignment => self.inline.alignment(text),
            Stage::Admonition => self.block.admonitions(text),
            Stage::TocPlaceholder => self.block.toc_placeholders(text),
            Stage::LineBreak => text.replace("\\n", "<br/>"),
        }
    }
}
