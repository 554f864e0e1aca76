//! Command execution.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use sentinel_application::{AccountStore, ProgressReporter, RequestError, RequestPipeline, TransportError};
use sentinel_domain::{ApiRequest, AuthorizationGrant, ClientConfig};
use sentinel_infrastructure::{
    ConfigError, FileAccountRepository, ReqwestTransport, SystemClock, TokioFileSystem, UuidDeviceIdSource,
    account_path,
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cli::{Command, LoginCommand};

/// Failures surfaced to the user.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("failed to create HTTP client: {0}")]
    Client(#[from] TransportError),

    #[error("invalid --body: {0}")]
    Body(serde_json::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    /// Suggestion printed after the error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Request(e) if e.requires_login() => Some("log in again with `sentinel login`"),
            _ => None,
        }
    }
}

/// Wires the production adapters around `config`.
pub async fn build_pipeline(config: ClientConfig) -> Result<RequestPipeline, AppError> {
    let path = account_path(&config)?;
    info!(path = %path.display(), "using account file");
    let repository = Arc::new(FileAccountRepository::new(TokioFileSystem::new(), path));
    let accounts = Arc::new(AccountStore::load(repository, &UuidDeviceIdSource).await);
    let transport = Arc::new(ReqwestTransport::new()?);
    Ok(RequestPipeline::new(transport, accounts, Arc::new(SystemClock::new()), config))
}

/// Runs one command, then flushes the account record.
pub async fn run(pipeline: &RequestPipeline, command: Command, out: &mut impl Write) -> Result<(), AppError> {
    let result = execute(pipeline, command, out).await;
    if let Err(e) = pipeline.shutdown().await {
        warn!(error = %e, "account record not flushed");
    }
    result
}

async fn execute(pipeline: &RequestPipeline, command: Command, out: &mut impl Write) -> Result<(), AppError> {
    match command {
        Command::Login { provider } => {
            let progress = ProgressReporter::disabled();
            match provider {
                LoginCommand::Credentials { username, password } => {
                    pipeline
                        .authorize(&AuthorizationGrant::credentials(username, password), &progress)
                        .await?;
                }
                LoginCommand::Wallet {
                    address,
                    signature,
                    message,
                } => {
                    pipeline
                        .authorize(&AuthorizationGrant::wallet(address, signature, message), &progress)
                        .await?;
                }
                LoginCommand::Device => {
                    pipeline.authorize_device(&progress).await?;
                }
            }
            writeln!(out, "{}", pipeline.authorization_status().display_message())?;
        }

        Command::Request {
            method,
            path,
            body,
            query,
            anonymous,
            no_refresh,
            timeout_ms,
            progress,
        } => {
            let mut request = ApiRequest::new(method, path);
            if let Some(body) = body {
                request = request.with_body(serde_json::from_str(&body).map_err(AppError::Body)?);
            }
            for (name, value) in query {
                request = request.with_query(name, value);
            }
            if anonymous {
                request = request.anonymous();
            }
            if no_refresh {
                request = request.without_refresh();
            }
            if let Some(ms) = timeout_ms {
                request = request.with_timeout(Duration::from_millis(ms));
            }

            let response = if progress {
                let (reporter, receiver) = ProgressReporter::channel();
                let printer = tokio::spawn(print_progress(receiver));
                let response = pipeline.send_raw(&request, &reporter).await;
                drop(reporter);
                let _ = printer.await;
                response?
            } else {
                pipeline.send_raw(&request, &ProgressReporter::disabled()).await?
            };

            write_body(out, &response.body)?;
        }

        Command::Status => {
            writeln!(out, "device id: {}", pipeline.accounts().device_id())?;
            writeln!(out, "session:   {}", pipeline.authorization_status().display_message())?;
        }

        Command::SignOut => {
            pipeline.sign_out().await?;
            writeln!(out, "{}", pipeline.authorization_status().display_message())?;
        }
    }
    Ok(())
}

/// Pretty-prints JSON bodies; anything else is written as is.
fn write_body(out: &mut impl Write, body: &[u8]) -> std::io::Result<()> {
    if body.is_empty() {
        return Ok(());
    }
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => {
            let pretty = serde_json::to_string_pretty(&value).map_err(std::io::Error::other)?;
            writeln!(out, "{pretty}")
        }
        Err(_) => {
            out.write_all(body)?;
            writeln!(out)
        }
    }
}

async fn print_progress(mut receiver: watch::Receiver<f32>) {
    while receiver.changed().await.is_ok() {
        let fraction = *receiver.borrow_and_update();
        eprint!("\r{:>5.1}%", fraction * 100.0);
    }
    eprintln!();
}
