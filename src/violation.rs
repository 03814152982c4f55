//! Violation value types
//!
//! A violation is produced by the validator, recorded by the audit sink,
//! and surfaced to the caller inside the gateway outcome. It is never
//! mutated after construction.

use serde::Serialize;

/// Maximum length of the evidence excerpt attached to a violation.
/// Bounds audit log size and avoids re-leaking the full offending text.
const MAX_EVIDENCE_CHARS: usize = 80;

/// What kind of policy breach a violation represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// Attempt to override or extract the system instructions
    PromptInjection,

    /// Request or response outside the allowed task scope
    ScopeViolation,

    /// Dangerous operation detected in generated content
    DangerousCommand,

    /// Attempt to assume an elevated role or access level
    UnauthorizedAccess,
}

/// How serious a violation is; `High` and above block the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Whether this severity forces the gateway to abort the call
    pub fn is_blocking(&self) -> bool {
        *self >= Severity::High
    }
}

/// A single policy violation
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub category: ViolationCategory,
    pub severity: Severity,
    pub message: String,
    /// Truncated excerpt of the offending text, never the full input
    pub evidence: String,
}

impl Violation {
    /// Create a violation with a bounded evidence excerpt
    pub fn new(
        category: ViolationCategory,
        severity: Severity,
        message: impl Into<String>,
        offending_text: &str,
    ) -> Self {
        Self {
            category,
            severity,
            message: message.into(),
            evidence: excerpt(offending_text),
        }
    }

    /// Whether this violation forces the gateway to abort
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }
}

/// Truncate text to the evidence bound on a character boundary
fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_EVIDENCE_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(MAX_EVIDENCE_CHARS).collect();
    format!("{}...", cut)
}
