//! Enhanced context types.

use std::fmt;

/// Kind of a context section. Declaration order is output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    Sentiment,
    Relationship,
    Style,
}

/// One formatted block of enrichment text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSection {
    pub kind: SectionKind,
    pub body: String,
}

impl ContextSection {
    pub fn new(kind: SectionKind, body: String) -> Self {
        Self { kind, body }
    }
}

/// Enrichment gathered for one message.
///
/// Sections appear at most once each, ordered sentiment, relationship, style, regardless
/// of which source answered first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnhancedContext {
    sections: Vec<ContextSection>,
}

impl EnhancedContext {
    /// Sorts by kind and keeps the first section of each kind.
    pub fn from_sections(mut sections: Vec<ContextSection>) -> Self {
        sections.sort_by_key(|s| s.kind);
        sections.dedup_by_key(|s| s.kind);
        Self { sections }
    }

    pub fn sections(&self) -> &[ContextSection] {
        &self.sections
    }

    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }

    pub fn has(&self, kind: SectionKind) -> bool {
        self.sections.iter().any(|s| s.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections joined by a blank line; empty string when nothing was gathered.
    pub fn to_prompt_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.body.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl fmt::Display for EnhancedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_prompt_text())
    }
}
