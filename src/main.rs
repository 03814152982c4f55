//! llm-gateway - Security gateway for LLM provider interactions
//!
//! One mediated call per invocation: the request text is read from stdin,
//! the outcome is written to stdout as JSON.
//!
//! # Usage
//!
//! ```bash
//! echo "generate a csv parser" | llm-gateway --subject user-42 --category codegen
//!
//! # Inspect what would be sent without calling the provider
//! echo "generate a csv parser" | llm-gateway --dry-run
//! ```

use std::env;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use llm_gateway::{
    frame::PromptFramer, policy::Policy, sanitize::Sanitizer, validate::Validator, Config, Gateway,
    HttpCompletionProvider, InteractionContext, TaskCategory,
};

/// Print version information
fn print_version() {
    println!("llm-gateway {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"llm-gateway - Security gateway for LLM provider interactions

USAGE:
    llm-gateway [OPTIONS]    (request text on stdin, outcome JSON on stdout)

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -s, --subject ID        Rate-limit subject (default: "cli")
    -t, --category NAME     Task category: creation, codegen, documentation, testing
                            (default: codegen)
    -c, --config PATH       Path to config file
    -d, --dry-run           Validate, sanitize, and frame only; never call
                            the provider

ENVIRONMENT:
    LLM_GATEWAY_API_KEY     Provider credential (name configurable)
    RUST_LOG                Tracing filter (e.g. llm_gateway=debug)
"#
    );
}

struct CliArgs {
    subject: String,
    category: TaskCategory,
    config_path: Option<PathBuf>,
    dry_run: bool,
}

fn parse_args() -> Result<Option<CliArgs>, String> {
    let mut parsed = CliArgs {
        subject: "cli".to_string(),
        category: TaskCategory::Codegen,
        config_path: None,
        dry_run: false,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return Ok(None);
            }
            "-v" | "--version" => {
                print_version();
                return Ok(None);
            }
            "-d" | "--dry-run" => parsed.dry_run = true,
            "-s" | "--subject" => {
                parsed.subject = args.next().ok_or("--subject requires a value")?;
            }
            "-t" | "--category" => {
                let value = args.next().ok_or("--category requires a value")?;
                parsed.category = TaskCategory::parse(&value)
                    .ok_or_else(|| format!("unknown category: {}", value))?;
            }
            "-c" | "--config" => {
                parsed.config_path = Some(PathBuf::from(
                    args.next().ok_or("--config requires a value")?,
                ));
            }
            other => return Err(format!("unknown option: {}", other)),
        }
    }

    Ok(Some(parsed))
}

fn read_stdin() -> std::io::Result<String> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim().to_string())
}

/// Validate/sanitize/frame without a provider call and print the result
fn dry_run(config: &Config, text: &str, ctx: &InteractionContext) -> ExitCode {
    let policy = match Policy::from_config(config) {
        Ok(policy) => Arc::new(policy),
        Err(e) => {
            eprintln!("llm-gateway: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let validator = Validator::new(Arc::clone(&policy));
    let violations = validator.validate_inbound(text, ctx);
    let blocked = violations.iter().any(|v| v.is_blocking());

    let sanitizer = Sanitizer::new(Arc::clone(&policy));
    let framer = PromptFramer::new(policy);
    let framed = framer.frame(&sanitizer.sanitize(text), ctx.task_category);

    let report = serde_json::json!({
        "blocked": blocked,
        "violations": violations,
        "framed_prompt": if blocked { None } else { Some(framed) },
    });
    println!("{}", report);

    if blocked {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("llm-gateway: {}", message);
            return ExitCode::FAILURE;
        }
    };

    let config = match &args.config_path {
        Some(path) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("llm-gateway: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::load(),
    };

    let text = match read_stdin() {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => {
            eprintln!("llm-gateway: empty request");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("llm-gateway: cannot read stdin: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ctx = InteractionContext::new(args.subject.clone(), args.category);

    if args.dry_run {
        return dry_run(&config, &text, &ctx);
    }

    let provider = match HttpCompletionProvider::from_config(&config.provider) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            eprintln!("llm-gateway: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let gateway = match Gateway::new(&config, provider) {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("llm-gateway: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match gateway.execute(&text, &ctx).await {
        Ok(outcome) => {
            match serde_json::to_string(&outcome) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("llm-gateway: cannot serialize outcome: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            if outcome.accepted {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("llm-gateway: {}", e);
            ExitCode::FAILURE
        }
    }
}
