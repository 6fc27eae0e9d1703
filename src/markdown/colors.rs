//! Color lookup table for the colored-text and underline directives
//!
//! Maps human-readable color names (`red`, `sky`, `mauve`, ...) to the
//! concrete hex values used in generated `style` attributes. The palette is
//! built once at startup, optionally extended from configuration, and never
//! mutated afterwards.

use std::collections::HashMap;

/// Default palette (Catppuccin Mocha accents)
pub const DEFAULT_COLORS: &[(&str, &str)] = &[
    ("red", "#f38ba8"),
    ("green", "#a6e3a1"),
    ("blue", "#89b4fa"),
    ("yellow", "#f9e2af"),
    ("orange", "#fab387"),
    ("purple", "#cba6f7"),
    ("pink", "#f5c2e7"),
    ("violet", "#cba6f7"),
    ("cyan", "#89dceb"),
    ("magenta", "#f5c2e7"),
    ("lime", "#a6e3a1"),
    ("indigo", "#89b4fa"),
    ("teal", "#94e2d5"),
    ("brown", "#eba0ac"),
    ("gray", "#9399b2"),
    ("grey", "#9399b2"),
    ("black", "#11111b"),
    ("white", "#cdd6f4"),
    ("lavender", "#b4befe"),
    ("peach", "#fab387"),
    ("maroon", "#eba0ac"),
    ("sky", "#89dceb"),
    ("sapphire", "#74c7ec"),
    ("rosewater", "#f5e0dc"),
    ("flamingo", "#f2cdcd"),
    ("mauve", "#cba6f7"),
];

/// Immutable name -> CSS color mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    colors: HashMap<String, String>,
}

impl ColorTable {
    /// Create the table with the default palette
    pub fn new() -> Self {
        let colors = DEFAULT_COLORS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Self { colors }
    }

    /// Create the default table extended with user-supplied entries.
    ///
    /// Override names are matched case-insensitively, and an override with the
    /// same name as a default entry replaces it.
    pub fn with_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut table = Self::new();
        for (name, value) in overrides {
            table
                .colors
                .insert(name.trim().to_lowercase(), value.trim().to_string());
        }
        table
    }

    /// Resolve a color name to a CSS color value.
    ///
    /// Unknown names (including hex literals and CSS keywords) are returned
    /// unchanged.
    pub fn lookup(&self, name: &str) -> String {
        self.colors
            .get(&name.to_lowercase())
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Whether `name` is a known palette entry
    pub fn contains(&self, name: &str) -> bool {
        self.colors.contains_key(&name.to_lowercase())
    }

    /// Number of palette entries
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new()
    }
}
