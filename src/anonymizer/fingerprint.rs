//! Session recovery for deanonymization uploads
//!
//! A caller who lost the session id can still deanonymize a document. The
//! fallback chain, in order:
//!
//! 1. explicit session id parameter
//! 2. UUID embedded in the uploaded filename
//! 3. `session_id` field embedded in the document body (JSON or XML)
//! 4. fingerprint of the anonymized content, recorded at anonymization time
//!
//! The fingerprint index is a bounded in-process cache; the oldest entry is
//! evicted at capacity. Explicit session ids remain the primary path.

use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, OnceLock};
use tracing::debug;

const DEFAULT_CAPACITY: usize = 1024;

fn uuid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
            .unwrap()
    })
}

fn embedded_json_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""session_id"\s*:\s*"([^"]+)""#).unwrap())
}

fn embedded_xml_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<session_id>\s*([^<]+?)\s*</session_id>").unwrap())
}

/// Stable fingerprint of anonymized document content.
pub fn fingerprint(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

struct IndexInner {
    map: HashMap<String, String>,
    order: VecDeque<String>,
}

/// Bounded fingerprint-to-session cache.
pub struct SessionIndex {
    capacity: usize,
    inner: Mutex<IndexInner>,
}

impl Default for SessionIndex {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl SessionIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(IndexInner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Records the fingerprint of an anonymized output for its session.
    pub fn record(&self, content_fingerprint: String, session_id: String) {
        let mut inner = self.inner.lock().expect("session index poisoned");
        if inner.map.insert(content_fingerprint.clone(), session_id).is_none() {
            inner.order.push_back(content_fingerprint);
            if inner.order.len() > self.capacity {
                if let Some(evicted) = inner.order.pop_front() {
                    inner.map.remove(&evicted);
                }
            }
        }
    }

    pub fn lookup(&self, content_fingerprint: &str) -> Option<String> {
        let inner = self.inner.lock().expect("session index poisoned");
        inner.map.get(content_fingerprint).cloned()
    }
}

/// Resolves the session id for a deanonymization request.
pub fn recover_session(
    explicit: Option<&str>,
    filename: Option<&str>,
    content: &str,
    index: &SessionIndex,
) -> Option<String> {
    if let Some(session_id) = explicit {
        if !session_id.trim().is_empty() {
            return Some(session_id.trim().to_string());
        }
    }

    if let Some(name) = filename {
        if let Some(m) = uuid_pattern().find(name) {
            debug!(filename = name, "Recovered session id from filename");
            return Some(m.as_str().to_lowercase());
        }
    }

    if let Some(caps) = embedded_json_pattern().captures(content) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = embedded_xml_pattern().captures(content) {
        return Some(caps[1].to_string());
    }

    let recovered = index.lookup(&fingerprint(content));
    if recovered.is_some() {
        debug!("Recovered session id from content fingerprint");
    }
    recovered
}
