//! Stop lists applied before conflict resolution
//!
//! Two lists with different matching rules:
//! - ignored phrases match case-insensitively (possessive lead-ins and
//!   articles the NLP engine tends to flag as entities)
//! - stop words match exactly (common nouns and adjectives that regex
//!   recognizers occasionally capture)

/// Phrases skipped when the extracted text equals one of them, lowercased.
const IGNORED_PHRASES: &[&str] = &[
    "mein name",
    "krankenversicherungsnummer",
    "meine kreditkartennummer",
    "mein iban",
    "mein code",
    "ich",
    "ich wohne",
    "meine",
    "mein",
    "und",
    "in",
    "der",
    "am",
    "ist",
    "das",
    "die",
    "den",
    "dem",
    "ein",
    "eine",
    "meine telefonnummer",
    "meine steuernummer",
];

/// Words skipped only on exact (case-sensitive) match.
const STOP_WORDS: &[&str] = &[
    "Strategie",
    "zufrieden",
    "Statement",
    "Spielfeld",
    "Ergebnis",
    "erfolgreichste",
    "beste",
    "neue",
    "alte",
    "große",
    "kleine",
    "wichtige",
    "interessante",
    "aktuelle",
    "zukünftige",
    "vergangene",
    "politische",
    "wirtschaftliche",
    "soziale",
    "kulturelle",
    "wissenschaftliche",
    "technische",
    "medizinische",
    "rechtliche",
    "finanzielle",
    "sportliche",
    "Lieferant",
    "Patient",
    "Zeuge",
    "Firma",
    "Restaurant",
    "Hotel",
    "Geschäft",
    "Konferenz",
    "Ausstellung",
    "Konzert",
    "Demonstration",
    "Veranstaltung",
    "Treffen",
    "Ecke",
    "Adresse",
    "Paket",
    "Ware",
    "Filiale",
    "Unfall",
    "Tatort",
];

/// True when the extracted text must never be anonymized.
pub fn is_ignored(text: &str) -> bool {
    let lowered = text.to_lowercase();
    IGNORED_PHRASES.contains(&lowered.as_str()) || STOP_WORDS.contains(&text)
}
