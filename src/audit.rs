//! JSONL audit logging
//!
//! Records every violation for later inspection. Critical violations
//! additionally fire an escalation hook. The sink never fails the overall
//! call: write errors are logged and swallowed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::context::InteractionContext;
use crate::violation::{Severity, Violation};

/// An audit log entry
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    /// When the violation was recorded
    pub timestamp: DateTime<Utc>,

    /// Rate-limit subject the call belonged to
    pub subject_id: String,

    /// Task category claimed by the caller
    pub task_category: String,

    /// The violation itself (category, severity, message, evidence)
    #[serde(flatten)]
    pub violation: Violation,
}

impl AuditEntry {
    pub fn new(violation: &Violation, ctx: &InteractionContext) -> Self {
        Self {
            timestamp: Utc::now(),
            subject_id: ctx.subject_id.clone(),
            task_category: ctx.task_category.label().to_string(),
            violation: violation.clone(),
        }
    }
}

/// Hook invoked for Critical-severity violations. The collaborator behind
/// it owns alert routing; implementations must not block.
pub trait EscalationHook: Send + Sync {
    fn escalate(&self, entry: &AuditEntry);
}

/// Default hook: emits an error-level trace event
pub struct LogEscalation;

impl EscalationHook for LogEscalation {
    fn escalate(&self, entry: &AuditEntry) {
        tracing::error!(
            subject = %entry.subject_id,
            category = ?entry.violation.category,
            message = %entry.violation.message,
            "critical violation"
        );
    }
}

/// Violation recorder
pub struct AuditSink {
    writer: Option<Mutex<BufWriter<File>>>,
    hook: Box<dyn EscalationHook>,
}

impl AuditSink {
    /// Create a sink appending to the given path. A `None` path disables
    /// file output; escalation still fires.
    pub fn new(path: Option<&Path>) -> Self {
        let writer = path.and_then(|p| {
            if let Some(parent) = p.parent() {
                let _ = std::fs::create_dir_all(parent);
            }

            OpenOptions::new()
                .create(true)
                .append(true)
                .open(p)
                .ok()
                .map(|f| Mutex::new(BufWriter::new(f)))
        });

        Self {
            writer,
            hook: Box::new(LogEscalation),
        }
    }

    /// Replace the escalation hook
    pub fn with_hook(mut self, hook: Box<dyn EscalationHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Record one violation. Never propagates sink errors.
    pub fn record(&self, violation: &Violation, ctx: &InteractionContext) {
        let entry = AuditEntry::new(violation, ctx);

        if let Some(writer) = &self.writer {
            let mut guard = match writer.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Err(e) = write_entry(&mut guard, &entry) {
                tracing::warn!(error = %e, "audit write failed, continuing");
            }
        }

        if entry.violation.severity == Severity::Critical {
            self.hook.escalate(&entry);
        }
    }

    /// Record a batch of violations from one call
    pub fn record_all(&self, violations: &[Violation], ctx: &InteractionContext) {
        for violation in violations {
            self.record(violation, ctx);
        }
    }

    /// Check if file output is enabled
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}

/// Create a disabled sink (no file, log-only escalation)
impl Default for AuditSink {
    fn default() -> Self {
        Self {
            writer: None,
            hook: Box::new(LogEscalation),
        }
    }
}

fn write_entry(writer: &mut BufWriter<File>, entry: &AuditEntry) -> std::io::Result<()> {
    let json = serde_json::to_string(entry)?;
    writeln!(writer, "{}", json)?;
    writer.flush()
}
