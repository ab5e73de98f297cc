//! Cosmetic clean-up of generated replies.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

static BLANK_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+").expect("valid blank-run pattern"));

/// Maximum length kept from a generated reply, in characters.
pub const MAX_REPLY_CHARS: usize = 4_000;

/// Normalizes generated text before it is appended to a transcript.
///
/// # Steps
/// 1. Trim surrounding whitespace
/// 2. Collapse runs of blank lines into one
/// 3. Restore the canonical casing of the organization name
/// 4. Cap the length
#[derive(Debug, Clone)]
pub struct ResponseNormalizer {
    organization: String,
    organization_pattern: Option<Regex>,
}

impl ResponseNormalizer {
    pub fn new(organization: impl Into<String>) -> Self {
        let organization = organization.into();
        let organization_pattern = if organization.trim().is_empty() {
            None
        } else {
            Regex::new(&format!(r"(?i)\b{}\b", regex::escape(organization.trim()))).ok()
        };
        Self {
            organization,
            organization_pattern,
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        let trimmed = text.trim();
        let collapsed = BLANK_RUNS.replace_all(trimmed, "\n\n");

        let cased = match &self.organization_pattern {
            Some(pattern) => pattern
                .replace_all(&collapsed, NoExpand(self.organization.trim()))
                .into_owned(),
            None => collapsed.into_owned(),
        };

        if cased.chars().count() > MAX_REPLY_CHARS {
            cased.chars().take(MAX_REPLY_CHARS).collect()
        } else {
            cased
        }
    }
}
