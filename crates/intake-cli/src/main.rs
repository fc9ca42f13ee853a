// # intake - Customer Intake CLI
//
// Thin front end over intake-core. All workflow logic (validation,
// submission, list synchronization, CRM push) lives in the library; this
// binary only:
// 1. Reads configuration from environment variables
// 2. Initializes logging and the runtime
// 3. Registers backends and builds an `IntakeSession`
// 4. Runs one command and prints the outcome
//
// ## Commands
//
// - `intake list`: fetch and print every record
// - `intake validate <draft.json>`: validate a draft locally (no network)
// - `intake submit <draft.json>`: validate, then create the record
// - `intake push <record-id>`: push a listed record to the CRM
//
// ## Configuration
//
// - `INTAKE_STORE_TYPE`: Record store (http, memory). Default: http
// - `INTAKE_API_BASE_URL`: Customer API base URL. Default: http://localhost:8000
// - `INTAKE_CRM_TYPE`: CRM integration (http, disabled). Default: http
// - `INTAKE_CRM_BASE_URL`: CRM bridge base URL. Default: the API base URL
// - `INTAKE_HTTP_TIMEOUT_SECS`: Per-request timeout (1-300). Default: 30
// - `INTAKE_DEFAULT_COUNTRY`: Country assumed for new drafts. Default: IN
// - `INTAKE_LOG_LEVEL`: trace, debug, info, warn, error. Default: warn
//
// ## Example
//
// ```bash
// export INTAKE_API_BASE_URL=http://localhost:8000
// intake submit customer.json
// ```

use anyhow::{Context, Result};
use intake_core::config::{DEFAULT_API_BASE_URL, IntakeConfig, IntegrationConfig, StoreConfig};
use intake_core::error::Error as IntakeError;
use intake_core::model::{CustomerDraft, DEFAULT_COUNTRY, RecordId};
use intake_core::{BackendRegistry, IntakeEvent, IntakeSession, SubmitOutcome, ValidationResult};
use std::env;
use std::process::ExitCode;
use tokio::sync::mpsc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the different ways a command can end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntakeExitCode {
    /// Command succeeded
    Success = 0,
    /// Configuration error or bad usage
    ConfigError = 1,
    /// A remote call or the runtime failed
    RuntimeError = 2,
    /// The draft did not pass validation
    InvalidDraft = 3,
}

impl From<IntakeExitCode> for ExitCode {
    fn from(code: IntakeExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// One CLI invocation
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Validate { path: String },
    Submit { path: String },
    Push { id: String },
}

const USAGE: &str =
    "usage: intake <list | validate <draft.json> | submit <draft.json> | push <record-id>>";

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let mut args = args.iter().map(String::as_str);
        let command = match (args.next(), args.next()) {
            (Some("list"), None) => Command::List,
            (Some("validate"), Some(path)) => Command::Validate {
                path: path.to_string(),
            },
            (Some("submit"), Some(path)) => Command::Submit {
                path: path.to_string(),
            },
            (Some("push"), Some(id)) => Command::Push { id: id.to_string() },
            _ => anyhow::bail!("{}", USAGE),
        };
        if args.next().is_some() {
            anyhow::bail!("{}", USAGE);
        }
        Ok(command)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    store_type: String,
    api_base_url: String,
    crm_type: String,
    crm_base_url: String,
    http_timeout_secs: u64,
    default_country: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let api_base_url =
            env::var("INTAKE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        Ok(Self {
            store_type: env::var("INTAKE_STORE_TYPE").unwrap_or_else(|_| "http".to_string()),
            crm_type: env::var("INTAKE_CRM_TYPE").unwrap_or_else(|_| "http".to_string()),
            crm_base_url: env::var("INTAKE_CRM_BASE_URL").unwrap_or_else(|_| api_base_url.clone()),
            api_base_url,
            http_timeout_secs: match env::var("INTAKE_HTTP_TIMEOUT_SECS") {
                Ok(s) => s
                    .parse()
                    .with_context(|| format!("INTAKE_HTTP_TIMEOUT_SECS is not a number: {}", s))?,
                Err(_) => 30,
            },
            default_country: env::var("INTAKE_DEFAULT_COUNTRY")
                .unwrap_or_else(|_| DEFAULT_COUNTRY.to_string()),
            log_level: env::var("INTAKE_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        })
    }

    /// Validate the environment-level settings
    ///
    /// Backend types must be registered in `registry`. URL schemes and
    /// timeouts are checked again by `IntakeConfig::validate`.
    fn validate(&self, registry: &BackendRegistry) -> Result<()> {
        if !registry.has_store(&self.store_type) {
            anyhow::bail!(
                "INTAKE_STORE_TYPE '{}' is not supported. Supported types: {}",
                self.store_type,
                supported(registry.list_stores())
            );
        }

        if !registry.has_integration(&self.crm_type) {
            anyhow::bail!(
                "INTAKE_CRM_TYPE '{}' is not supported. Supported types: {}",
                self.crm_type,
                supported(registry.list_integrations())
            );
        }

        if !(1..=300).contains(&self.http_timeout_secs) {
            anyhow::bail!(
                "INTAKE_HTTP_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.http_timeout_secs
            );
        }

        if self.default_country.trim().is_empty() {
            anyhow::bail!("INTAKE_DEFAULT_COUNTRY cannot be empty");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "INTAKE_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Build the library configuration
    fn intake_config(&self) -> IntakeConfig {
        let mut config = IntakeConfig::new();
        config.default_country = self.default_country.clone();
        config.store = match self.store_type.as_str() {
            "memory" => StoreConfig::Memory,
            _ => StoreConfig::Http {
                base_url: self.api_base_url.clone(),
                timeout_secs: self.http_timeout_secs,
            },
        };
        config.integration = match self.crm_type.as_str() {
            "disabled" => IntegrationConfig::Disabled,
            _ => IntegrationConfig::Http {
                base_url: self.crm_base_url.clone(),
                timeout_secs: self.http_timeout_secs,
            },
        };
        config
    }

    fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            return IntakeExitCode::ConfigError.into();
        }
    };

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return IntakeExitCode::ConfigError.into();
        }
    };

    let registry = build_registry();
    if let Err(e) = config.validate(&registry) {
        eprintln!("Configuration validation error: {}", e);
        return IntakeExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return IntakeExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return IntakeExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(&registry, config, command).await {
            Ok(code) => code,
            Err(e) => {
                error!("Command failed: {:#}", e);
                eprintln!("Error: {:#}", e);
                if let Some(hint) = failure_hint(&e) {
                    eprintln!("{}", hint);
                }
                IntakeExitCode::RuntimeError
            }
        }
    })
    .into()
}

fn build_registry() -> BackendRegistry {
    let registry = BackendRegistry::with_builtins();

    #[cfg(feature = "http")]
    intake_http::register(&registry);

    registry
}

/// Sorted, comma-separated backend type names
fn supported(mut names: Vec<String>) -> String {
    names.sort();
    names.join(", ")
}

/// Extra line printed under a failed command
fn failure_hint(error: &anyhow::Error) -> Option<&'static str> {
    match error.downcast_ref::<IntakeError>() {
        Some(e) if e.is_retryable() => Some("The remote call failed; the command can be retried."),
        _ => None,
    }
}

/// Run one command against a fresh session
async fn run(
    registry: &BackendRegistry,
    config: Config,
    command: Command,
) -> Result<IntakeExitCode> {
    info!(
        "Using store '{}' and CRM '{}'",
        config.store_type, config.crm_type
    );
    let intake_config = config.intake_config();
    let (mut session, mut events) = IntakeSession::from_registry(registry, &intake_config)
        .context("Failed to create session")?;

    let code = match command {
        Command::List => {
            session.start().await?;
            let records = session.records().await;
            println!("{}", serde_json::to_string_pretty(&records)?);
            IntakeExitCode::Success
        }
        Command::Validate { path } => {
            session.form_mut().load(read_draft(&path)?);
            let result = session.form().validation().clone();
            report_validation(&result)
        }
        Command::Submit { path } => {
            // A failed list load only logs; the submission is still possible
            if let Err(e) = session.start().await {
                info!("Continuing without the record list: {}", e);
            }
            session.form_mut().load(read_draft(&path)?);
            let outcome = session.submit().await;
            drain_notifications(&mut events);
            match outcome? {
                SubmitOutcome::Invalid(result) => report_validation(&result),
                SubmitOutcome::Submitted(record) => {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                    IntakeExitCode::Success
                }
            }
        }
        Command::Push { id } => {
            session.start().await?;
            let outcome = session.push(&RecordId::new(id)).await;
            drain_notifications(&mut events);
            let receipt = outcome?;
            println!("{}", serde_json::to_string_pretty(&receipt.response)?);
            IntakeExitCode::Success
        }
    };

    drain_notifications(&mut events);
    Ok(code)
}

fn read_draft(path: &str) -> Result<CustomerDraft> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft file {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse draft file {}", path))
}

fn report_validation(result: &ValidationResult) -> IntakeExitCode {
    if result.is_valid() {
        println!("Draft is valid");
        return IntakeExitCode::Success;
    }
    for (field, message) in result.errors() {
        println!("{}: {}", field, message);
    }
    IntakeExitCode::InvalidDraft
}

/// Print the user-facing notifications queued so far
fn drain_notifications(events: &mut mpsc::Receiver<IntakeEvent>) {
    while let Ok(event) = events.try_recv() {
        if let Some(notification) = event.notification() {
            let tag = if notification.is_success() { "ok" } else { "failed" };
            eprintln!("[{}] {}", tag, notification.message());
        }
    }
}
