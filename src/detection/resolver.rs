//! Span conflict resolution
//!
//! Two-stage policy over the combined regex and NLP output:
//!
//! 1. per-overlap merge of NLP spans against regex spans; the NLP span wins
//!    when it is strictly longer or carries a higher score, otherwise it is
//!    dropped in favor of the regex span
//! 2. global greedy acceptance, longest span first; later candidates that
//!    overlap an accepted span are discarded
//!
//! Ties on length resolve to the span listed first, which is why recognizer
//! execution order is fixed. The output is sorted by start offset and
//! guaranteed non-overlapping.

use crate::domain::{ResolvedSpan, Span};
use tracing::debug;

use super::stoplist::is_ignored;

/// Resolves regex and NLP candidates into a non-overlapping span set.
pub fn resolve(text: &str, regex_spans: Vec<Span>, nlp_spans: Vec<Span>) -> Vec<ResolvedSpan> {
    let mut regex_spans: Vec<Span> = regex_spans
        .into_iter()
        .filter(|s| !span_ignored(text, s))
        .collect();
    let nlp_spans: Vec<Span> = nlp_spans
        .into_iter()
        .filter(|s| !span_ignored(text, s))
        .collect();

    // Stage 1: NLP vs regex merge.
    let mut merged_nlp: Vec<Span> = Vec::new();
    for nlp in nlp_spans {
        let overlapping: Vec<usize> = regex_spans
            .iter()
            .enumerate()
            .filter(|(_, r)| r.overlaps(&nlp))
            .map(|(i, _)| i)
            .collect();

        if overlapping.is_empty() {
            merged_nlp.push(nlp);
            continue;
        }

        let nlp_wins = overlapping.iter().all(|&i| {
            let r = &regex_spans[i];
            nlp.len() > r.len() || nlp.score > r.score
        });

        if nlp_wins {
            // remove in reverse so indices stay valid
            for &i in overlapping.iter().rev() {
                regex_spans.remove(i);
            }
            merged_nlp.push(nlp);
        } else {
            debug!(
                start = nlp.start,
                end = nlp.end,
                entity = %nlp.entity_type,
                "NLP span lost to overlapping regex span"
            );
        }
    }

    // Stage 2: greedy longest-first acceptance.
    let mut candidates: Vec<Span> = regex_spans;
    candidates.extend(merged_nlp);
    candidates.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut accepted: Vec<Span> = Vec::new();
    for candidate in candidates {
        if accepted.iter().all(|a| !a.overlaps(&candidate)) {
            accepted.push(candidate);
        }
    }

    accepted.sort_by_key(|s| s.start);
    accepted
        .into_iter()
        .map(|s| ResolvedSpan::from_span(s, text))
        .collect()
}

fn span_ignored(text: &str, span: &Span) -> bool {
    is_ignored(&text[span.start..span.end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityType;

    #[test]
    fn test_output_is_sorted_and_non_overlapping() {
        let text = "15 Januar 1910 10115 Berlin";
        let regex = vec![
            Span::new(15, 20, EntityType::ZipCode, 1.0),
            Span::new(0, 14, EntityType::Date, 1.0),
        ];
        let resolved = resolve(text, regex, vec![]);

        assert_eq!(resolved.len(), 2);
        assert!(resolved[0].start < resolved[1].start);
        for pair in resolved.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn test_longer_span_wins_overlap() {
        let text = "DE89 3704 0044 0532 0130 00";
        let regex = vec![
            // spaced IBAN prefix also looks like a license plate
            Span::new(0, 4, EntityType::LicensePlate, 1.0),
            Span::new(0, 27, EntityType::Iban, 1.0),
        ];
        let resolved = resolve(text, regex, vec![]);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].entity_type, EntityType::Iban);
        assert_eq!(resolved[0].extracted_text, text);
    }

    #[test]
    fn test_nlp_wins_when_strictly_longer() {
        let text = "Anna Schmidt";
        let regex = vec![Span::new(0, 4, EntityType::FirstName, 0.7)];
        let nlp = vec![Span::new(0, 12, EntityType::Person, 0.6)];
        let resolved = resolve(text, regex, nlp);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].entity_type, EntityType::Person);
        assert_eq!(resolved[0].extracted_text, "Anna Schmidt");
    }

    #[test]
    fn test_regex_wins_when_nlp_shorter_and_weaker() {
        let text = "Hauptstraße 5";
        let regex = vec![Span::new(0, text.len(), EntityType::Street, 1.5)];
        let nlp = vec![Span::new(0, 11, EntityType::Location, 0.8)];
        let resolved = resolve(text, regex, nlp);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].entity_type, EntityType::Street);
    }

    #[test]
    fn test_non_overlapping_nlp_span_kept() {
        let text = "Emma wohnt in Berlin";
        let regex = vec![Span::new(0, 4, EntityType::FirstName, 0.7)];
        let nlp = vec![Span::new(14, 20, EntityType::Location, 0.9)];
        let resolved = resolve(text, regex, nlp);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[1].extracted_text, "Berlin");
    }

    #[test]
    fn test_stop_words_filtered() {
        let text = "Der Patient war zufrieden";
        let nlp = vec![
            Span::new(4, 11, EntityType::Person, 0.9), // "Patient"
            Span::new(16, 25, EntityType::Misc, 0.9),  // "zufrieden"
        ];
        let resolved = resolve(text, vec![], nlp);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_ignored_phrase_filtered_case_insensitive() {
        let text = "Mein Name ist Emma";
        let nlp = vec![Span::new(0, 9, EntityType::Person, 0.9)]; // "Mein Name"
        let regex = vec![Span::new(14, 18, EntityType::FirstName, 0.7)];
        let resolved = resolve(text, regex, nlp);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].extracted_text, "Emma");
    }

    #[test]
    fn test_equal_length_tie_keeps_earlier_candidate() {
        let text = "1234567890";
        let regex = vec![
            Span::new(0, 10, EntityType::TaxId, 1.0),
            Span::new(0, 10, EntityType::PhoneNumber, 1.0),
        ];
        let resolved = resolve(text, regex, vec![]);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].entity_type, EntityType::TaxId);
    }
}
