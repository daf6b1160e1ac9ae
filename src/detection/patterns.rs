//! Pattern library for German PII detection
//!
//! Structured-identifier patterns live in `patterns/pii_patterns.toml`,
//! embedded at compile time. Word-list recognizers (job titles, academic
//! titles) are built from embedded data at startup and appended after the
//! TOML recognizers, so the overall execution order stays fixed.

use crate::domain::{EntityType, Span};
use anyhow::{Context, Result};
use fancy_regex::Regex;
use serde::Deserialize;
use tracing::warn;

const DEFAULT_PATTERNS: &str = include_str!("../../patterns/pii_patterns.toml");
const GERMAN_JOBS: &str = include_str!("../../data/german_jobs.txt");

/// Academic and professional titles matched together with a following name.
/// Sorted longest-first at regex build time to avoid partial matches.
const ACADEMIC_TITLES: &[&str] = &[
    "Dr",
    "Dr.",
    "Doktor",
    "Prof",
    "Prof.",
    "Professor",
    "Professorin",
    "Priv.-Doz.",
    "Privatdozent",
    "Privatdozentin",
    "PD",
    "PD.",
    "P.D.",
    "Dipl.-Ing.",
    "Diplom-Ingenieur",
    "Diplom-Ingenieurin",
    "Dipl.-Psych.",
    "Diplom-Psychologe",
    "Diplom-Psychologin",
    "Dipl.-Kfm.",
    "Diplom-Kaufmann",
    "Diplom-Kauffrau",
    "Dipl.-Vw.",
    "Diplom-Volkswirt",
    "Diplom-Volkswirtin",
    "Dipl.-Biol.",
    "Diplom-Biologe",
    "Diplom-Biologin",
    "Dipl.-Chem.",
    "Diplom-Chemiker",
    "Diplom-Chemikerin",
    "Dipl.-Phys.",
    "Diplom-Physiker",
    "Diplom-Physikerin",
    "Dipl.-Math.",
    "Diplom-Mathematiker",
    "Diplom-Mathematikerin",
    "Dipl.-Inf.",
    "Diplom-Informatiker",
    "Diplom-Informatikerin",
    "M.Sc.",
    "Master of Science",
    "M.A.",
    "Master of Arts",
    "B.Sc.",
    "Bachelor of Science",
    "B.A.",
    "Bachelor of Arts",
    "M.D.",
    "Medical Doctor",
    "Ph.D.",
    "Doctor of Philosophy",
    "M.B.A.",
    "Master of Business Administration",
    "LL.M.",
    "Master of Laws",
    "LL.B.",
    "Bachelor of Laws",
    "Mag.",
    "Magister",
    "Magistra",
    "OA",
    "OA.",
    "O.A.",
    "Oberarzt",
    "Oberärztin",
    "CA",
    "CA.",
    "C.A.",
    "Chefarzt",
    "Chefärztin",
    "FA",
    "FA.",
    "F.A.",
    "Facharzt",
    "Fachärztin",
    "MdB",
    "MdL",
    "MdEP",
    "MEP",
];

/// Recognizer definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RecognizerDefinition {
    pub name: String,
    /// Entity label, e.g. "PHONE_NUMBER"
    pub entity: String,
    /// Fixed confidence score
    pub score: f32,
    /// Regex patterns for this recognizer
    pub patterns: Vec<String>,
    /// Sample strings that must be matched; checked at startup
    #[serde(default)]
    pub fixtures: Vec<String>,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    recognizer: Vec<RecognizerDefinition>,
}

/// A compiled recognizer with metadata
pub struct CompiledRecognizer {
    pub name: String,
    pub entity: EntityType,
    pub score: f32,
    regexes: Vec<Regex>,
}

impl CompiledRecognizer {
    fn compile(def: &RecognizerDefinition) -> Result<Self> {
        let mut regexes = Vec::with_capacity(def.patterns.len());
        for pattern_str in &def.patterns {
            let regex = Regex::new(pattern_str).with_context(|| {
                format!("Invalid regex in recognizer '{}': {pattern_str}", def.name)
            })?;
            regexes.push(regex);
        }

        let recognizer = Self {
            name: def.name.clone(),
            entity: EntityType::parse_label(&def.entity),
            score: def.score,
            regexes,
        };

        for fixture in &def.fixtures {
            if !recognizer.matches(fixture) {
                anyhow::bail!(
                    "Recognizer '{}' does not match its fixture '{fixture}'",
                    def.name
                );
            }
        }

        Ok(recognizer)
    }

    /// True when any pattern matches somewhere in the text.
    fn matches(&self, text: &str) -> bool {
        self.regexes
            .iter()
            .any(|re| re.is_match(text).unwrap_or(false))
    }

    /// Collects spans for every match in the text.
    ///
    /// A runtime regex error (backtrack limit) degrades this recognizer to
    /// zero spans instead of failing the detection pass.
    fn detect(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        for regex in &self.regexes {
            for matched in regex.find_iter(text) {
                match matched {
                    Ok(m) if m.start() < m.end() => {
                        spans.push(Span::new(m.start(), m.end(), self.entity, self.score));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(recognizer = %self.name, error = %e, "Recognizer failed, skipping");
                        spans.clear();
                        return spans;
                    }
                }
            }
        }
        spans
    }
}

/// Ordered registry of compiled recognizers
///
/// Recognizers run in declaration order; equal-length conflicts between
/// their spans resolve in favor of the earlier recognizer, so the order is
/// part of the observable behavior.
pub struct PatternRegistry {
    recognizers: Vec<CompiledRecognizer>,
}

impl PatternRegistry {
    /// Create a registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut recognizers = Vec::with_capacity(library.recognizer.len() + 2);
        for def in &library.recognizer {
            recognizers.push(CompiledRecognizer::compile(def)?);
        }

        Ok(Self { recognizers })
    }

    /// Create the default registry: embedded TOML patterns plus the
    /// word-list recognizers for job titles and academic titles.
    pub fn default_patterns() -> Result<Self> {
        let mut registry = Self::from_toml(DEFAULT_PATTERNS)?;

        registry
            .recognizers
            .push(CompiledRecognizer::compile(&job_title_recognizer())?);
        registry
            .recognizers
            .push(CompiledRecognizer::compile(&academic_title_recognizer())?);

        Ok(registry)
    }

    /// Runs every recognizer in order and concatenates their spans.
    pub fn detect(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        for recognizer in &self.recognizers {
            spans.extend(recognizer.detect(text));
        }
        spans
    }

    /// Recognizer names in execution order.
    pub fn recognizer_names(&self) -> Vec<&str> {
        self.recognizers.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Builds an alternation of word-list entries, longest first.
fn word_alternation(words: &[&str]) -> String {
    let mut sorted: Vec<&str> = words.to_vec();
    sorted.sort_by_key(|w| std::cmp::Reverse(w.len()));
    sorted
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

fn job_title_recognizer() -> RecognizerDefinition {
    let jobs: Vec<&str> = GERMAN_JOBS
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    RecognizerDefinition {
        name: "job_title".to_string(),
        entity: "POSITION".to_string(),
        score: 0.8,
        patterns: vec![format!(r"\b(?:{})\b", word_alternation(&jobs))],
        fixtures: vec!["Ingenieurin".to_string(), "Steuerberater".to_string()],
    }
}

fn academic_title_recognizer() -> RecognizerDefinition {
    // Title plus an optional first name and a mandatory surname.
    let pattern = format!(
        r"\b(?:{})\s+(?:[A-Z][a-zäöüß]+\s+)?[A-Z][a-zäöüß\-]+\b",
        word_alternation(ACADEMIC_TITLES)
    );

    RecognizerDefinition {
        name: "academic_title".to_string(),
        entity: "ACADEMIC_TITLE".to_string(),
        score: 0.9,
        patterns: vec![pattern],
        fixtures: vec![
            "Dr. Anna Schmidt".to_string(),
            "Prof. Dr. Weber".to_string(),
            "Dipl.-Ing. Müller".to_string(),
        ],
    }
}
