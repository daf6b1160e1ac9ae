//! Text normalization pre-passes
//!
//! Street abbreviations are expanded in place on the working copy before
//! detection runs; the substitution step therefore operates on the expanded
//! form (`"Hauptstr. 5"` anonymizes as `"Hauptstraße 5"`).

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

fn abbreviation_passes() -> &'static [(Regex, &'static str)] {
    static PASSES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PASSES.get_or_init(|| {
        vec![
            (Regex::new(r"\bStr\.").unwrap(), "Straße"),
            (Regex::new(r"\bPl\.").unwrap(), "Platz"),
            (Regex::new(r"\bAl\.").unwrap(), "Allee"),
            // lowercase suffix variants glued to a name, e.g. "Hauptstr. 5"
            (Regex::new(r"str\.").unwrap(), "straße"),
            (Regex::new(r"pl\.").unwrap(), "platz"),
            (Regex::new(r"al\.").unwrap(), "allee"),
            // dotless variants; must run after the dotted passes
            (Regex::new(r"\bStr\b").unwrap(), "Straße"),
            (Regex::new(r"\bPl\b").unwrap(), "Platz"),
            (Regex::new(r"\bAl\b").unwrap(), "Allee"),
        ]
    })
}

/// Expands street abbreviations, e.g. `Str.` to `Straße`.
pub fn expand_street_abbreviations(text: &str) -> String {
    let mut result = Cow::Borrowed(text);
    for (regex, replacement) in abbreviation_passes() {
        if let Cow::Owned(replaced) = regex.replace_all(&result, *replacement) {
            result = Cow::Owned(replaced);
        }
    }
    result.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expands_standalone_abbreviation() {
        assert_eq!(
            expand_street_abbreviations("Berliner Str. 12"),
            "Berliner Straße 12"
        );
    }

    #[test]
    fn test_expands_glued_abbreviation() {
        assert_eq!(
            expand_street_abbreviations("Hauptstr. 5"),
            "Hauptstraße 5"
        );
    }

    #[test]
    fn test_expands_platz_and_allee() {
        assert_eq!(
            expand_street_abbreviations("Am Marienpl. 8 und Lindenal. 3"),
            "Am Marienplatz 8 und Lindenallee 3"
        );
    }

    #[test]
    fn test_expands_dotless_abbreviation() {
        assert_eq!(
            expand_street_abbreviations("Berliner Str 12"),
            "Berliner Straße 12"
        );
        assert_eq!(
            expand_street_abbreviations("Am Opernpl 3"),
            "Am Opernpl 3"
        );
    }

    #[test]
    fn test_leaves_plain_text_alone() {
        let text = "Kein Straßenname hier";
        assert_eq!(expand_street_abbreviations(text), text);
    }
}
