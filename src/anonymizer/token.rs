//! Token minting and extraction
//!
//! Tokens are deterministic content hashes: `anno_` plus the first 8
//! lowercase hex chars of SHA-256 over `extracted_text 0x1F entity_label`.
//! Identical content anonymized twice in a session yields the same token,
//! making re-anonymization idempotent.

use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Prefix shared by every minted token.
pub const TOKEN_PREFIX: &str = "anno_";

/// Unit separator between hash inputs; never appears in natural text.
const HASH_SEPARATOR: char = '\u{1F}';

/// Compiled matcher for tokens embedded in text.
pub fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\banno_[0-9a-f]{8}\b").unwrap())
}

/// Mints the token for an extracted value and its entity label.
pub fn mint_token(extracted_text: &str, entity_label: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(extracted_text.as_bytes());
    hasher.update(HASH_SEPARATOR.to_string().as_bytes());
    hasher.update(entity_label.as_bytes());
    let digest = hasher.finalize();

    let mut token = String::with_capacity(TOKEN_PREFIX.len() + 8);
    token.push_str(TOKEN_PREFIX);
    for byte in &digest[..4] {
        token.push_str(&format!("{byte:02x}"));
    }
    token
}

/// Extracts every distinct token from the text, in first-seen order.
pub fn extract_tokens(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    token_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = mint_token("Emma", "FIRST_NAME");
        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(token.len(), TOKEN_PREFIX.len() + 8);
        assert!(token[TOKEN_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_token_is_deterministic() {
        assert_eq!(
            mint_token("Hauptstraße 5", "STREET"),
            mint_token("Hauptstraße 5", "STREET")
        );
    }

    #[test]
    fn test_token_depends_on_label() {
        assert_ne!(mint_token("10115", "ZIP_CODE"), mint_token("10115", "TAX_ID"));
    }

    #[test]
    fn test_token_depends_on_text() {
        assert_ne!(
            mint_token("Emma", "FIRST_NAME"),
            mint_token("Elena", "FIRST_NAME")
        );
    }

    #[test]
    fn test_extract_tokens_dedupes_in_order() {
        let a = mint_token("a", "DATE");
        let b = mint_token("b", "DATE");
        let text = format!("{b} und {a} und {b}");
        assert_eq!(extract_tokens(&text), vec![b, a]);
    }

    #[test]
    fn test_pattern_requires_word_boundary() {
        assert!(extract_tokens("xanno_0123abcd").is_empty());
        assert!(extract_tokens("anno_0123abcdef").is_empty());
        assert_eq!(extract_tokens("(anno_0123abcd)").len(), 1);
    }
}
