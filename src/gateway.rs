//! Gateway orchestration
//!
//! The sole entry point between the application and the provider. Every
//! call runs the same pipeline:
//!
//! rate limit -> input validation -> sanitization -> framing ->
//! provider call (under timeout) -> output validation
//!
//! Rate limiting runs first because it is the cheapest way to shed abusive
//! load; input validation runs before any external call so a malicious
//! prompt never reaches the provider; output validation runs after the
//! call because a confused provider can emit unsafe content even from a
//! clean prompt. A response that fails output validation is discarded and
//! never returned, even though the network call succeeded.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::audit::AuditSink;
use crate::config::Config;
use crate::context::InteractionContext;
use crate::error::GatewayError;
use crate::frame::PromptFramer;
use crate::limiter::RateLimiter;
use crate::policy::Policy;
use crate::provider::{CompletionProvider, ModelParameters};
use crate::sanitize::Sanitizer;
use crate::validate::Validator;
use crate::violation::Violation;

/// Result of one gateway call.
///
/// Policy violations and rate limiting are outcomes, not errors: the
/// caller gets structured data it can act on. Only provider failures
/// surface as [`GatewayError`].
#[derive(Debug, Serialize)]
pub struct GatewayOutcome {
    /// Whether validated provider content is being returned
    pub accepted: bool,

    /// Validated provider content, present only when accepted
    pub content: Option<String>,

    /// Every violation found, blocking or not
    pub violations: Vec<Violation>,

    /// Whether the call was shed by the rate limiter
    pub rate_limited: bool,

    /// When the subject's window resets, present when rate limited
    pub reset_at: Option<DateTime<Utc>>,
}

impl GatewayOutcome {
    fn rate_limited(reset_at: DateTime<Utc>) -> Self {
        Self {
            accepted: false,
            content: None,
            violations: Vec::new(),
            rate_limited: true,
            reset_at: Some(reset_at),
        }
    }

    fn blocked(violations: Vec<Violation>) -> Self {
        Self {
            accepted: false,
            content: None,
            violations,
            rate_limited: false,
            reset_at: None,
        }
    }

    fn accepted(content: String, violations: Vec<Violation>) -> Self {
        Self {
            accepted: true,
            content: Some(content),
            violations,
            rate_limited: false,
            reset_at: None,
        }
    }
}

/// Orchestrates the full request/response mediation pipeline
pub struct Gateway {
    validator: Validator,
    sanitizer: Sanitizer,
    framer: PromptFramer,
    limiter: RateLimiter,
    audit: AuditSink,
    provider: Arc<dyn CompletionProvider>,
    params: ModelParameters,
    provider_timeout: Duration,
}

impl Gateway {
    /// Build a gateway from configuration and a provider implementation.
    /// Fails fast on invalid configuration.
    pub fn new(
        config: &Config,
        provider: Arc<dyn CompletionProvider>,
    ) -> Result<Self, GatewayError> {
        let policy = Arc::new(Policy::from_config(config)?);
        let audit = AuditSink::new(config.audit_path().as_deref());

        Ok(Self {
            validator: Validator::new(Arc::clone(&policy)),
            sanitizer: Sanitizer::new(Arc::clone(&policy)),
            framer: PromptFramer::new(Arc::clone(&policy)),
            limiter: RateLimiter::new(config.rate_limit.quota, config.rate_limit.window_secs),
            audit,
            provider,
            params: ModelParameters::from_config(&config.provider),
            provider_timeout: Duration::from_secs(config.provider.timeout_secs),
        })
    }

    /// Replace the audit sink (custom escalation hooks, test capture)
    pub fn with_audit(mut self, audit: AuditSink) -> Self {
        self.audit = audit;
        self
    }

    /// Execute one mediated call. Callers never see intermediate sanitized
    /// or framed text.
    pub async fn execute(
        &self,
        raw_text: &str,
        ctx: &InteractionContext,
    ) -> Result<GatewayOutcome, GatewayError> {
        let decision = self.limiter.check_and_consume(&ctx.subject_id, Utc::now());
        if !decision.allowed {
            tracing::info!(subject = %ctx.subject_id, reset_at = %decision.reset_at, "rate limited");
            return Ok(GatewayOutcome::rate_limited(decision.reset_at));
        }

        let inbound = self.validator.validate_inbound(raw_text, ctx);
        if inbound.iter().any(Violation::is_blocking) {
            self.audit.record_all(&inbound, ctx);
            tracing::info!(
                subject = %ctx.subject_id,
                violations = inbound.len(),
                "request blocked before provider call"
            );
            return Ok(GatewayOutcome::blocked(inbound));
        }
        self.audit.record_all(&inbound, ctx);

        let sanitized = self.sanitizer.sanitize(raw_text);
        let framed = self.framer.frame(&sanitized, ctx.task_category);

        let response = match tokio::time::timeout(
            self.provider_timeout,
            self.provider.complete(&framed, &self.params),
        )
        .await
        {
            Err(_elapsed) => {
                tracing::warn!(subject = %ctx.subject_id, "provider call timed out");
                return Err(GatewayError::Timeout(self.provider_timeout));
            }
            Ok(Err(provider_err)) => {
                tracing::warn!(subject = %ctx.subject_id, error = %provider_err, "provider call failed");
                return Err(GatewayError::Provider(provider_err));
            }
            Ok(Ok(text)) => text,
        };

        let outbound = self.validator.validate_outbound(&response, ctx);
        self.audit.record_all(&outbound, ctx);
        if outbound.iter().any(Violation::is_blocking) {
            // The response is discarded on purpose: fetching and throwing
            // away an unsafe completion costs one provider call, returning
            // it costs an incident.
            tracing::info!(
                subject = %ctx.subject_id,
                violations = outbound.len(),
                "provider response discarded"
            );
            let mut violations = inbound;
            violations.extend(outbound);
            return Ok(GatewayOutcome::blocked(violations));
        }

        let mut violations = inbound;
        violations.extend(outbound);
        Ok(GatewayOutcome::accepted(response, violations))
    }
}
