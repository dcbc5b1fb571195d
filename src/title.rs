//! Title cleanup for generated documents.
//!
//! Generated titles embed section numbering as markup, e.g.
//! `<span class="section-number">2. </span>Set up AWS cloud architecture`.
//! The number (possibly dotted, `2.3.`) is pulled out as structured data and
//! all remaining tags are stripped for display.

use regex::Regex;

/// Parses generated title strings into display text plus section numbering.
pub(crate) struct TitleParser {
    section: Regex,
    tags: Regex,
}

/// A parsed title: clean display text and the optional section ordinal.
pub(crate) struct ParsedTitle {
    pub(crate) text: String,
    pub(crate) section: Option<Vec<u32>>,
}

impl TitleParser {
    pub(crate) fn new() -> Self {
        Self {
            section: Regex::new(
                r#"^\s*<span class="section-number">\s*(\d+(?:\.\d+)*)\.?\s*</span>"#,
            )
            .unwrap(),
            tags: Regex::new(r"<[^>]*>").unwrap(),
        }
    }

    pub(crate) fn parse(&self, raw: &str) -> ParsedTitle {
        let mut section = None;
        let mut rest = raw;

        if let Some(captures) = self.section.captures(raw) {
            section = Some(
                captures[1]
                    .split('.')
                    .filter_map(|part| part.parse().ok())
                    .collect(),
            );
            rest = &raw[captures.get(0).map_or(0, |m| m.end())..];
        }

        ParsedTitle {
            text: self.tags.replace_all(rest, "").trim().to_string(),
            section,
        }
    }
}
