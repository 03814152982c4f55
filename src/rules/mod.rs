//! Security pattern rules for llm-gateway
//!
//! Defines the dangerous-pattern tables scanned against both inbound
//! requests and provider output.

pub mod dangerous;

/// Detection category a pattern rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Shell command smuggled into task text
    CommandInjection,

    /// Directory escape sequences
    PathTraversal,

    /// Embedded script or code execution
    ScriptInjection,

    /// SQL fragments aimed at a backing store
    SqlInjection,

    /// Attempt to override the system instructions
    PromptOverride,

    /// Attempt to assume an elevated role
    PrivilegeEscalation,
}

impl PatternKind {
    /// Short label used in violation messages and audit entries
    pub fn label(&self) -> &'static str {
        match self {
            PatternKind::CommandInjection => "command-injection",
            PatternKind::PathTraversal => "path-traversal",
            PatternKind::ScriptInjection => "script-injection",
            PatternKind::SqlInjection => "sql-injection",
            PatternKind::PromptOverride => "prompt-override",
            PatternKind::PrivilegeEscalation => "privilege-escalation",
        }
    }
}

/// A dangerous-pattern rule definition
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Unique identifier for this rule
    pub id: &'static str,

    /// Detection category
    pub kind: PatternKind,

    /// Regex pattern to match
    pub pattern: &'static str,

    /// Human-readable reason for flagging
    pub reason: &'static str,
}

impl PatternRule {
    /// Create a new rule
    pub const fn new(
        id: &'static str,
        kind: PatternKind,
        pattern: &'static str,
        reason: &'static str,
    ) -> Self {
        Self {
            id,
            kind,
            pattern,
            reason,
        }
    }
}
