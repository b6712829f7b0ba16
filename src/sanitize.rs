//! Redaction of disallowed phrases from untrusted field values.
//!
//! Contract fields are burned into an immutable artifact, so values coming
//! from the enrollment forms are scrubbed before rendering. The rule set
//! removes academic-credential mentions (honorific abbreviations and degree
//! phrases) that must not appear next to an applicant or guardian name on
//! the signed document. The list is configuration data and is not assumed
//! to be exhaustive.

use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use serde::Deserialize;

/// Serde-loadable redaction rule set.
#[derive(Debug, Clone, Deserialize)]
pub struct RedactionConfig {
    /// Literal phrases removed case-insensitively as a whole.
    pub literals: Vec<String>,
    /// Regex patterns removed case-insensitively, globally.
    pub patterns: Vec<String>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            literals: [
                "LIC.", "ING.", "MTRO.", "MTRA.", "DR.", "DRA.", "PROF.", "PROFR.", "C.P.",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            patterns: [
                r"\b(licenciad[oa]|ingenier[oa]|maestr[oa]|doctor(a)?)\s+(en\s+\S+\s*)?",
                r"\bpasante\s+de\s+\S+",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

lazy_static! {
    static ref WHITESPACE_RUNS: Regex = Regex::new(r"\s{2,}").expect("static regex");
}

/// Compiled sanitizer. Construction validates the configured patterns;
/// invalid ones are dropped with a warning rather than failing assembly.
#[derive(Debug)]
pub struct Redactor {
    rules: Vec<Regex>,
}

impl Redactor {
    pub fn from_config(config: &RedactionConfig) -> Self {
        let mut rules = Vec::with_capacity(config.literals.len() + config.patterns.len());
        for literal in &config.literals {
            let source = format!("(?i){}", regex::escape(literal));
            match Regex::new(&source) {
                Ok(re) => rules.push(re),
                Err(err) => warn!("skipping unusable literal rule {literal:?}: {err}"),
            }
        }
        for pattern in &config.patterns {
            match Regex::new(&format!("(?i){pattern}")) {
                Ok(re) => rules.push(re),
                Err(err) => warn!("skipping unusable redaction pattern {pattern:?}: {err}"),
            }
        }
        Self { rules }
    }

    /// Remove every configured phrase and pattern, then normalize
    /// whitespace. Deterministic and idempotent; unmatched input passes
    /// through trimmed only.
    pub fn clean(&self, value: &str) -> String {
        let mut out = value.to_string();
        for rule in &self.rules {
            // Replace with a space so removals never glue two words together.
            out = rule.replace_all(&out, " ").into_owned();
        }
        let collapsed = WHITESPACE_RUNS.replace_all(&out, " ");
        collapsed.trim().to_string()
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::from_config(&RedactionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_credential_abbreviations() {
        let r = Redactor::default();
        assert_eq!(r.clean("LIC. MARIA PEREZ"), "MARIA PEREZ");
        assert_eq!(r.clean("Dra. Ana Torres"), "Ana Torres");
    }

    #[test]
    fn removal_is_case_insensitive() {
        let r = Redactor::default();
        assert_eq!(r.clean("lic. Juan"), "Juan");
        assert_eq!(r.clean("mTrO. Juan"), "Juan");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        let r = Redactor::default();
        assert_eq!(r.clean("  JUAN   PABLO  "), "JUAN PABLO");
    }

    #[test]
    fn clean_is_idempotent() {
        let r = Redactor::default();
        for input in [
            "LIC. MARIA   PEREZ",
            "Ingeniero en Sistemas Pedro Gomez",
            "  sin   titulos  ",
            "",
        ] {
            let once = r.clean(input);
            assert_eq!(r.clean(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn unmatched_input_passes_through_trimmed() {
        let r = Redactor::default();
        assert_eq!(r.clean(" ANA LOPEZ "), "ANA LOPEZ");
    }

    #[test]
    fn invalid_pattern_is_dropped_not_fatal() {
        let config = RedactionConfig {
            literals: vec!["DR.".into()],
            patterns: vec!["(unclosed".into()],
        };
        let r = Redactor::from_config(&config);
        assert_eq!(r.clean("DR. LUIS"), "LUIS");
    }

    #[test]
    fn custom_config_extends_the_list() {
        let config = RedactionConfig {
            literals: vec!["CONFIDENCIAL".into()],
            patterns: vec![],
        };
        let r = Redactor::from_config(&config);
        assert_eq!(r.clean("dato confidencial aqui"), "dato aqui");
    }
}
