//! Dangerous-pattern tables
//!
//! Text signatures scanned against every request and every provider
//! response. Grouped by detection category; the full ordered list is what
//! the policy compiles at startup.

use crate::rules::{PatternKind, PatternRule};

/// Prompt-override attempts - instructions aimed at the system preamble
pub const PROMPT_OVERRIDE_RULES: &[PatternRule] = &[
    PatternRule::new(
        "ignore-previous",
        PatternKind::PromptOverride,
        r"(?i)\bignore\s+(all\s+)?(previous|prior|above|earlier)\s+instructions\b",
        "Instructing the system to ignore prior instructions",
    ),
    PatternRule::new(
        "disregard-instructions",
        PatternKind::PromptOverride,
        r"(?i)\bdisregard\s+(the\s+)?(previous|prior|above|system)\s+(instructions|prompt|rules)\b",
        "Instructing the system to disregard its instructions",
    ),
    PatternRule::new(
        "forget-instructions",
        PatternKind::PromptOverride,
        r"(?i)\bforget\s+(everything|all|your)\s+(previous|prior|above)?\s*(instructions|rules|training)\b",
        "Instructing the system to forget its instructions",
    ),
    PatternRule::new(
        "new-instructions",
        PatternKind::PromptOverride,
        r"(?i)\b(new|updated|real)\s+instructions\s*:",
        "Presenting replacement instructions",
    ),
    PatternRule::new(
        "reveal-system-prompt",
        PatternKind::PromptOverride,
        r"(?i)\b(reveal|show|print|repeat)\b.{0,30}\bsystem\s+prompt\b",
        "Asking for the system prompt",
    ),
    PatternRule::new(
        "pretend-unrestricted",
        PatternKind::PromptOverride,
        r"(?i)\bpretend\s+(you\s+are|to\s+be)\b.{0,40}\b(unrestricted|unfiltered|jailbroken|dan)\b",
        "Asking the model to role-play without restrictions",
    ),
];

/// Privilege-escalation attempts - assuming an elevated role
pub const PRIVILEGE_ESCALATION_RULES: &[PatternRule] = &[
    PatternRule::new(
        "act-as-admin",
        PatternKind::PrivilegeEscalation,
        r"(?i)\b(act|running|operate)\s+as\s+(a\s+|an\s+|the\s+)?(system\s+)?(admin|administrator|root|superuser)\b",
        "Assuming an administrator role",
    ),
    PatternRule::new(
        "you-are-admin",
        PatternKind::PrivilegeEscalation,
        r"(?i)\byou\s+are\s+(now\s+)?(a\s+|an\s+|the\s+)?(system\s+)?(admin|administrator|root|superuser)\b",
        "Assigning the model an administrator role",
    ),
    PatternRule::new(
        "sudo-command",
        PatternKind::PrivilegeEscalation,
        r"(?i)\bsudo\s+\S",
        "Requesting privileged command execution",
    ),
    PatternRule::new(
        "grant-privileges",
        PatternKind::PrivilegeEscalation,
        r"(?i)\b(grant|give)\s+(me\s+|yourself\s+)?(all\s+|full\s+|admin\s+|root\s+)(privileges|permissions|access)\b",
        "Requesting privilege grant",
    ),
];

/// Command-injection signatures
pub const COMMAND_INJECTION_RULES: &[PatternRule] = &[
    PatternRule::new(
        "rm-recursive",
        PatternKind::CommandInjection,
        r"(?i)\brm\s+-[rf]{1,2}\b",
        "Recursive delete command",
    ),
    PatternRule::new(
        "chained-shell-command",
        PatternKind::CommandInjection,
        r"(?i)[;&|]\s*(rm|curl|wget|chmod|chown|mkfs|dd|nc)\b",
        "Shell command chained behind a separator",
    ),
    PatternRule::new(
        "pipe-to-shell",
        PatternKind::CommandInjection,
        r"(?i)\|\s*(ba|z)?sh\b",
        "Piping content to a shell",
    ),
    PatternRule::new(
        "command-substitution",
        PatternKind::CommandInjection,
        r"\$\([^)]*\)|`[^`]+`",
        "Command substitution syntax",
    ),
    PatternRule::new(
        "format-disk",
        PatternKind::CommandInjection,
        r"(?i)\b(mkfs|fdisk|dd)\b.{0,40}/dev/",
        "Disk device manipulation",
    ),
];

/// Path-traversal signatures
pub const PATH_TRAVERSAL_RULES: &[PatternRule] = &[
    PatternRule::new(
        "dotdot-slash",
        PatternKind::PathTraversal,
        r"\.\./\.\./|\.\.\\\.\.\\",
        "Repeated parent-directory escape",
    ),
    PatternRule::new(
        "encoded-traversal",
        PatternKind::PathTraversal,
        r"(?i)%2e%2e(%2f|%5c)",
        "URL-encoded directory escape",
    ),
    PatternRule::new(
        "system-credential-files",
        PatternKind::PathTraversal,
        r"(?i)/etc/(passwd|shadow|sudoers)\b|\.ssh/id_",
        "Referencing system credential files",
    ),
];

/// Script/code-injection signatures
pub const SCRIPT_INJECTION_RULES: &[PatternRule] = &[
    PatternRule::new(
        "script-tag",
        PatternKind::ScriptInjection,
        r"(?i)<\s*script\b",
        "Embedded script tag",
    ),
    PatternRule::new(
        "javascript-uri",
        PatternKind::ScriptInjection,
        r"(?i)\bjavascript\s*:",
        "javascript: URI scheme",
    ),
    PatternRule::new(
        "inline-event-handler",
        PatternKind::ScriptInjection,
        r"(?i)\bon(load|error|click|mouseover)\s*=",
        "Inline event handler attribute",
    ),
    PatternRule::new(
        "eval-call",
        PatternKind::ScriptInjection,
        r"(?i)\b(eval|exec)\s*\(",
        "Dynamic code evaluation call",
    ),
];

/// SQL-injection signatures
pub const SQL_INJECTION_RULES: &[PatternRule] = &[
    PatternRule::new(
        "union-select",
        PatternKind::SqlInjection,
        r"(?i)\bunion\s+(all\s+)?select\b",
        "UNION SELECT injection fragment",
    ),
    PatternRule::new(
        "drop-table",
        PatternKind::SqlInjection,
        r"(?i)\bdrop\s+(table|database)\b",
        "DROP statement",
    ),
    PatternRule::new(
        "tautology",
        PatternKind::SqlInjection,
        r"(?i)'\s*or\s+'?1'?\s*=\s*'?1",
        "Always-true WHERE clause",
    ),
    PatternRule::new(
        "stacked-delete",
        PatternKind::SqlInjection,
        r"(?i);\s*(delete|truncate)\s+(from\s+)?\w+",
        "Stacked destructive statement",
    ),
];

/// All dangerous-pattern rules in scan order
pub fn all_rules() -> Vec<&'static PatternRule> {
    PROMPT_OVERRIDE_RULES
        .iter()
        .chain(PRIVILEGE_ESCALATION_RULES.iter())
        .chain(COMMAND_INJECTION_RULES.iter())
        .chain(PATH_TRAVERSAL_RULES.iter())
        .chain(SCRIPT_INJECTION_RULES.iter())
        .chain(SQL_INJECTION_RULES.iter())
        .collect()
}
