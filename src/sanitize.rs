//! Inbound text sanitization
//!
//! Neutralizes known override phrases and strips characters with no
//! legitimate role in a task description. Applied between input validation
//! and prompt framing; the provider only ever sees sanitized text.

use std::sync::Arc;

use crate::policy::Policy;

/// Marker substituted for override-attempt phrases. Contains none of the
/// stripped characters and matches no override pattern, which is what
/// keeps sanitization idempotent.
pub const NEUTRAL_MARKER: &str = "[filtered]";

/// Characters with no legitimate role in a task-description string
const STRIPPED_CHARS: &[char] = &[
    '<', '>', '"', '\'', '`', ';', '{', '}', '|', '&', '$', '\\',
];

/// Neutralizes override phrases and unsafe characters in inbound text
pub struct Sanitizer {
    policy: Arc<Policy>,
}

impl Sanitizer {
    pub fn new(policy: Arc<Policy>) -> Self {
        Self { policy }
    }

    /// Sanitize text. Pure, no I/O, idempotent.
    ///
    /// Passes run in order: override-phrase replacement, character strip,
    /// whitespace collapse. Stripping can juxtapose fragments into a phrase
    /// the first replacement pass could not see, so the passes repeat until
    /// the text is stable. Each pass only ever shortens the text, so the
    /// loop terminates.
    pub fn sanitize(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = self.pass(&current);
            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn pass(&self, text: &str) -> String {
        let mut result = text.to_string();

        for pattern in self.policy.override_patterns() {
            result = pattern.replace_all(&result, NEUTRAL_MARKER);
        }

        result.retain(|c| !STRIPPED_CHARS.contains(&c));

        collapse_whitespace(&result)
    }
}

/// Collapse runs of whitespace to a single space and trim
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space && !out.is_empty() {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}
