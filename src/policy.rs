//! Immutable gateway policy
//!
//! Built once from configuration at startup; every component receives a
//! shared reference and nothing may add or remove rules afterwards.
//! Construction fails fast on a non-positive limit or a pattern that does
//! not compile.

use regex::Regex;

use crate::config::Config;
use crate::error::GatewayError;
use crate::rules::dangerous;
use crate::rules::{PatternKind, PatternRule};

/// Numeric limits enforced by validation
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_input_chars: usize,
    pub max_output_chars: usize,
    pub max_artifacts: usize,
    pub max_lines_per_artifact: usize,
}

/// A dangerous-pattern rule compiled for scanning
#[derive(Debug)]
pub struct CompiledPattern {
    pub id: &'static str,
    pub kind: PatternKind,
    pub reason: &'static str,
    regex: Regex,
}

impl CompiledPattern {
    fn compile(rule: &PatternRule) -> Result<Self, GatewayError> {
        let regex = Regex::new(rule.pattern).map_err(|e| {
            GatewayError::Configuration(format!("pattern {} does not compile: {}", rule.id, e))
        })?;
        Ok(Self {
            id: rule.id,
            kind: rule.kind,
            reason: rule.reason,
            regex,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Replace every match with the given marker
    pub fn replace_all(&self, text: &str, marker: &str) -> String {
        self.regex.replace_all(text, marker).into_owned()
    }
}

/// The immutable rule set applied to every request/response pair
pub struct Policy {
    allowed_task_phrases: Vec<String>,
    forbidden_phrases: Vec<String>,
    dangerous: Vec<CompiledPattern>,
    limits: Limits,
}

impl Policy {
    /// Build a policy from configuration, compiling all patterns once.
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let limits = Limits {
            max_input_chars: config.limits.max_input_chars,
            max_output_chars: config.limits.max_output_chars,
            max_artifacts: config.limits.max_artifacts,
            max_lines_per_artifact: config.limits.max_lines_per_artifact,
        };
        if limits.max_input_chars == 0
            || limits.max_output_chars == 0
            || limits.max_artifacts == 0
            || limits.max_lines_per_artifact == 0
        {
            return Err(GatewayError::Configuration(
                "all limits must be positive".to_string(),
            ));
        }

        if config.phrases.allowed_task_phrases.is_empty() {
            return Err(GatewayError::Configuration(
                "allowed_task_phrases must not be empty".to_string(),
            ));
        }

        let dangerous = dangerous::all_rules()
            .into_iter()
            .map(CompiledPattern::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            allowed_task_phrases: lowercase_all(&config.phrases.allowed_task_phrases),
            forbidden_phrases: lowercase_all(&config.phrases.forbidden_phrases),
            dangerous,
            limits,
        })
    }

    /// Lowercase phrases a request must contain one of to be in scope
    pub fn allowed_task_phrases(&self) -> &[String] {
        &self.allowed_task_phrases
    }

    /// Lowercase phrases that force rejection
    pub fn forbidden_phrases(&self) -> &[String] {
        &self.forbidden_phrases
    }

    /// Ordered dangerous-pattern matchers
    pub fn dangerous_patterns(&self) -> &[CompiledPattern] {
        &self.dangerous
    }

    /// Prompt-override matchers, the subset the sanitizer neutralizes
    pub fn override_patterns(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.dangerous
            .iter()
            .filter(|p| p.kind == PatternKind::PromptOverride)
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }
}

fn lowercase_all(phrases: &[String]) -> Vec<String> {
    phrases.iter().map(|p| p.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_default_config() {
        let policy = Policy::from_config(&Config::default()).unwrap();
        assert!(!policy.dangerous_patterns().is_empty());
        assert!(policy.override_patterns().count() > 0);
        assert!(policy.limits().max_input_chars > 0);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let mut config = Config::default();
        config.limits.max_input_chars = 0;
        let result = Policy::from_config(&config);
        assert!(matches!(result, Err(GatewayError::Configuration(_))));
    }

    #[test]
    fn test_empty_allowed_phrases_rejected() {
        let mut config = Config::default();
        config.phrases.allowed_task_phrases.clear();
        assert!(Policy::from_config(&config).is_err());
    }

    #[test]
    fn test_phrases_lowercased() {
        let mut config = Config::default();
        config.phrases.forbidden_phrases = vec!["Drop Database".to_string()];
        let policy = Policy::from_config(&config).unwrap();
        assert_eq!(policy.forbidden_phrases(), &["drop database".to_string()]);
    }
}
