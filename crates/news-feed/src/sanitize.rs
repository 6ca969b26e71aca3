use regex::Regex;
use sha2::{Digest, Sha256};

/// Maximum length of a sanitized excerpt, in characters
pub const MAX_EXCERPT_CHARS: usize = 500;

/// Fingerprint length in hex characters
const FINGERPRINT_LEN: usize = 16;

/// Marker substituted for scrubbed injection patterns
const FILTERED_MARKER: &str = "[filtered]";

/// Text sanitizer for untrusted feed content.
///
/// Strips markup, scrubs known prompt-injection patterns, collapses
/// whitespace and caps the length. Compiled once, reused per item.
pub struct Sanitizer {
    tags: Regex,
    injections: Regex,
    whitespace: Regex,
}

impl Sanitizer {
    pub fn new() -> Self {
        // The patterns are fixed literals; compilation cannot fail
        let tags = Regex::new(r"<[^>]*>").unwrap();
        let injections = Regex::new(
            r"(?i)ignore\s+(all\s+)?previous\s+instructions|you\s+are\s+now|\[/?INST\]|<</?SYS>>|```\s*system",
        )
        .unwrap();
        let whitespace = Regex::new(r"\s+").unwrap();

        Self {
            tags,
            injections,
            whitespace,
        }
    }

    /// Sanitize one title or body string
    pub fn clean(&self, raw: &str) -> String {
        let stripped = self.tags.replace_all(raw, " ");
        let scrubbed = self.injections.replace_all(&stripped, FILTERED_MARKER);
        let collapsed = self.whitespace.replace_all(&scrubbed, " ");
        let trimmed = collapsed.trim();

        if trimmed.chars().count() > MAX_EXCERPT_CHARS {
            trimmed.chars().take(MAX_EXCERPT_CHARS).collect()
        } else {
            trimmed.to_string()
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic dedup key: short hash over title + URL.
///
/// Collisions are decided by the hash's collision resistance; there is
/// no secondary tie-break.
pub fn fingerprint(title: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(url.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)[..FINGERPRINT_LEN].to_string()
}
