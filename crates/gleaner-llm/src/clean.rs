//! Reply cleaning
//!
//! Turns an arbitrary model reply into either a clean short value or the
//! literal `"null"` marker. The heuristic is deliberately conservative: a
//! real value drowned in prose is rejected rather than risk accepting
//! prose as data.
//!
//! The hedging fragments and the explanatory-prefix marker encode
//! assumptions about the language the model replies in. The defaults match
//! the original deployment (Russian-language documents and replies) and are
//! configurable rather than translated, because translating them would
//! silently change acceptance behavior.

use gleaner_domain::NULL_VALUE;
use crate::LlmError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Localizable knobs of the cleaning heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanRules {
    /// Tag name whose `<tag>…</tag>` spans are stripped wherever they
    /// appear in the reply
    pub reasoning_tag: String,

    /// Lines starting with this marker are skipped during line selection;
    /// an empty marker disables the check
    pub explanation_prefix: String,

    /// A candidate containing any of these fragments (case-insensitive) is
    /// rejected as prose
    pub hedging_fragments: Vec<String>,

    /// Candidates longer than this many characters are rejected as
    /// verbose non-answers
    pub max_value_len: usize,
}

impl Default for CleanRules {
    fn default() -> Self {
        Self {
            reasoning_tag: "think".to_string(),
            explanation_prefix: "Объяснение".to_string(),
            hedging_fragments: vec![
                "найдено".to_string(),
                "содержится".to_string(),
                "указано".to_string(),
                "упоминается".to_string(),
                "в тексте".to_string(),
                "анализ".to_string(),
                "рассмотрим".to_string(),
                "видно что".to_string(),
                "согласно".to_string(),
                "поэтому".to_string(),
                "таким образом".to_string(),
            ],
            max_value_len: 500,
        }
    }
}

/// Compiled cleaning rules.
#[derive(Debug, Clone)]
pub struct Cleaner {
    rules: CleanRules,
    reasoning: Regex,
    hedging_lower: Vec<String>,
}

impl Cleaner {
    /// Compile a set of rules.
    pub fn new(rules: CleanRules) -> Result<Self, LlmError> {
        let tag = regex::escape(&rules.reasoning_tag);
        let reasoning = Regex::new(&format!("(?s)<{tag}>.*?</{tag}>"))?;
        let hedging_lower = rules
            .hedging_fragments
            .iter()
            .map(|f| f.to_lowercase())
            .collect();
        Ok(Self {
            rules,
            reasoning,
            hedging_lower,
        })
    }

    /// Compile the default (source-deployment) rules.
    pub fn default_rules() -> Self {
        // The default reasoning tag always compiles.
        Self::new(CleanRules::default()).expect("default rules compile")
    }

    /// Normalize a raw reply to an accepted value or `"null"`.
    ///
    /// Idempotent on its own output: cleaning an already-clean value
    /// returns it unchanged.
    pub fn clean(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return NULL_VALUE.to_string();
        }

        let stripped = self.reasoning.replace_all(trimmed, "");
        let stripped = stripped.trim();
        if stripped.is_empty() {
            return NULL_VALUE.to_string();
        }

        let Some(selected) = self.select_line(stripped) else {
            return NULL_VALUE.to_string();
        };

        let selected = selected.trim_matches('"').trim_matches('\'');
        if selected.is_empty() {
            return NULL_VALUE.to_string();
        }

        let lower = selected.to_lowercase();
        if self.hedging_lower.iter().any(|f| lower.contains(f)) {
            return NULL_VALUE.to_string();
        }

        if selected.chars().count() > self.rules.max_value_len {
            return NULL_VALUE.to_string();
        }

        selected.to_string()
    }

    /// First non-empty line that is neither an angle-bracket tag line nor
    /// an explanatory lead-in.
    fn select_line<'a>(&self, reply: &'a str) -> Option<&'a str> {
        reply.lines().map(str::trim).find(|line| {
            !line.is_empty()
                && !line.starts_with('<')
                && !(!self.rules.explanation_prefix.is_empty()
                    && line.starts_with(&self.rules.explanation_prefix))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> Cleaner {
        Cleaner::default_rules()
    }

    #[test]
    fn empty_reply_is_null() {
        assert_eq!(cleaner().clean(""), NULL_VALUE);
        assert_eq!(cleaner().clean("   \n  "), NULL_VALUE);
    }

    #[test]
    fn bare_value_passes_through() {
        assert_eq!(cleaner().clean("45/ЦБ-2024"), "45/ЦБ-2024");
    }

    #[test]
    fn reasoning_span_is_stripped() {
        assert_eq!(cleaner().clean("<think>internal</think>ANSWER"), "ANSWER");
    }

    #[test]
    fn reply_that_is_only_reasoning_is_null() {
        assert_eq!(cleaner().clean("<think>nothing useful</think>"), NULL_VALUE);
    }

    #[test]
    fn multiline_reasoning_is_stripped_non_greedily() {
        let reply = "<think>line one\nline two</think>42<think>more</think>";
        assert_eq!(cleaner().clean(reply), "42");
    }

    #[test]
    fn tag_lines_and_explanation_lines_are_skipped() {
        let reply = "<note>\nОбъяснение: потому что\n12345";
        assert_eq!(cleaner().clean(reply), "12345");
    }

    #[test]
    fn surrounding_quotes_are_stripped() {
        assert_eq!(cleaner().clean("\"value\""), "value");
        assert_eq!(cleaner().clean("'value'"), "value");
    }

    #[test]
    fn hedging_prose_is_rejected() {
        // A literal value is embedded, but the hedging fragment wins.
        assert_eq!(
            cleaner().clean("Согласно документу, значение 42"),
            NULL_VALUE
        );
        assert_eq!(cleaner().clean("В тексте указано 42"), NULL_VALUE);
    }

    #[test]
    fn overlong_candidate_is_rejected() {
        let long = "x".repeat(501);
        assert_eq!(cleaner().clean(&long), NULL_VALUE);

        let exactly = "x".repeat(500);
        assert_eq!(cleaner().clean(&exactly), exactly);
    }

    #[test]
    fn cleaning_is_idempotent_on_clean_values() {
        let c = cleaner();
        let once = c.clean("  \"Договор 45/ЦБ-2024\"  ");
        let twice = c.clean(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn custom_reasoning_tag() {
        let rules = CleanRules {
            reasoning_tag: "reasoning".to_string(),
            ..CleanRules::default()
        };
        let c = Cleaner::new(rules).unwrap();
        assert_eq!(c.clean("<reasoning>hmm</reasoning>ok"), "ok");
    }

    #[test]
    fn empty_explanation_prefix_disables_the_check() {
        let rules = CleanRules {
            explanation_prefix: String::new(),
            ..CleanRules::default()
        };
        let c = Cleaner::new(rules).unwrap();
        assert_eq!(c.clean("plain value"), "plain value");
    }

    #[test]
    fn rules_deserialize_with_defaults() {
        let rules: CleanRules = toml_like_json("{}");
        assert_eq!(rules.reasoning_tag, "think");
        assert_eq!(rules.max_value_len, 500);
        assert!(!rules.hedging_fragments.is_empty());
    }

    #[test]
    fn rules_deserialize_partial_override() {
        let rules: CleanRules =
            toml_like_json(r#"{"hedging_fragments": ["according to"], "max_value_len": 100}"#);
        assert_eq!(rules.hedging_fragments, vec!["according to".to_string()]);
        assert_eq!(rules.max_value_len, 100);
        assert_eq!(rules.explanation_prefix, "Объяснение");
    }

    fn toml_like_json(s: &str) -> CleanRules {
        serde_json::from_str(s).unwrap()
    }
}
