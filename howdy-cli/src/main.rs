//! Howdy command-line front end.
//!
//! Greets a name under a deadline, printing the greeting on success. The
//! process exit code identifies the outcome:
//!
//! | Code | Outcome |
//! |------|---------|
//! | 0 | greeting printed |
//! | 1 | invalid input |
//! | 2 | canceled (SIGINT/SIGTERM) |
//! | 3 | deadline exceeded |
//! | 4 | any other failure, including setup errors |

mod app;
mod cli;
mod shutdown;
mod telemetry;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use howdy::cancellation::CancellationSignal;
use howdy::errors::OutcomeKind;
use howdy::greeting::Greeter;
use howdy::logging::{install_default, ContextLogger, TracingSink};

use crate::app::{App, GreetRequest};
use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("howdy: {e:#}");
            ExitCode::from(OutcomeKind::Failed.exit_code())
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    telemetry::init(cli.log_format)?;

    let config = cli.greeter_config()?;
    tracing::debug!(?config, "Configuration loaded");

    let logger = Arc::new(ContextLogger::new(Arc::new(TracingSink::new())));
    let _default_logger = install_default(Arc::clone(&logger))?;

    let root = CancellationSignal::new();
    let listener = shutdown::spawn_listener(root.clone());

    let mut signal = root.with_request_id(cli.request_id());
    if let Some(user_id) = &cli.user_id {
        signal = signal.with_user_id(user_id.clone());
    }

    let mut request = GreetRequest::new(cli.name.clone());
    if let Some(cents) = cli.winnings {
        request = request.with_winnings(cents);
    }

    let timeout = config.timeout();
    let greeter = Greeter::new(config, Arc::clone(&logger));
    let app = App::new(Arc::new(greeter), logger);

    let outcome = app.run(&signal, &request, timeout).await;
    listener.abort();

    if let Some(message) = &outcome.message {
        println!("{message}");
    }
    Ok(ExitCode::from(outcome.exit_code()))
}
