//! llm-gateway - Security gateway for LLM provider interactions
//!
//! This library mediates every request/response pair between an
//! application and an external generative-text provider, so untrusted
//! natural-language input can never escalate into unauthorized actions,
//! leaked credentials, or off-scope behavior.
//!
//! # Features
//!
//! - **Dangerous-pattern scanning**: prompt override, privilege
//!   escalation, command/path/script/SQL injection signatures
//! - **Scope enforcement**: allowed-task and forbidden-phrase lists
//! - **Sanitization**: override phrases neutralized, shell metacharacters
//!   stripped, before any text reaches the provider
//! - **Prompt framing**: policy preamble always precedes user text
//! - **Rate limiting**: per-subject fixed windows, sharded buckets
//! - **Output validation**: unsafe provider responses are discarded
//! - **Audit logging**: JSONL record of every violation, with an
//!   escalation hook for critical ones
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use llm_gateway::{Config, Gateway, HttpCompletionProvider, InteractionContext, TaskCategory};
//!
//! # async fn run() -> Result<(), llm_gateway::GatewayError> {
//! let config = Config::load();
//! let provider = Arc::new(HttpCompletionProvider::from_config(&config.provider)?);
//! let gateway = Gateway::new(&config, provider)?;
//!
//! let ctx = InteractionContext::new("user-42", TaskCategory::Codegen);
//! let outcome = gateway.execute("generate a csv parser", &ctx).await?;
//! assert!(outcome.accepted);
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod config;
pub mod context;
pub mod error;
pub mod frame;
pub mod gateway;
pub mod limiter;
pub mod policy;
pub mod provider;
pub mod rules;
pub mod sanitize;
pub mod validate;
pub mod violation;

// Re-exports for convenience
pub use config::Config;
pub use context::{InteractionContext, TaskCategory};
pub use error::{GatewayError, ProviderError};
pub use gateway::{Gateway, GatewayOutcome};
pub use policy::Policy;
pub use provider::{CompletionProvider, HttpCompletionProvider, ModelParameters};
pub use violation::{Severity, Violation, ViolationCategory};
