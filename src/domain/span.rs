//! Detected entity spans
//!
//! Spans carry byte offsets into the analyzed text. Offsets always lie on
//! char boundaries because every producer derives them from regex matches or
//! NLP output validated against the same text.

use serde::{Deserialize, Serialize};

use super::entity::EntityType;

/// A candidate entity location produced by a recognizer or the NLP engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first matched char.
    pub start: usize,
    /// Byte offset one past the last matched char.
    pub end: usize,
    pub entity_type: EntityType,
    /// Recognizer confidence; regex recognizers use fixed per-pattern scores.
    pub score: f32,
}

impl Span {
    pub fn new(start: usize, end: usize, entity_type: EntityType, score: f32) -> Self {
        debug_assert!(start < end);
        Self {
            start,
            end,
            entity_type,
            score,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True when the two spans share at least one byte.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A span that survived conflict resolution, with its covered text extracted.
///
/// Within one resolution pass no two resolved spans overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSpan {
    pub start: usize,
    pub end: usize,
    pub entity_type: EntityType,
    pub score: f32,
    pub extracted_text: String,
}

impl ResolvedSpan {
    pub fn from_span(span: Span, text: &str) -> Self {
        Self {
            start: span.start,
            end: span.end,
            entity_type: span.entity_type,
            score: span.score,
            extracted_text: text[span.start..span.end].to_string(),
        }
    }
}
