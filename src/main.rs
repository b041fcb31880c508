//! barbican - Command-line client for the Barbican key management service.

use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use barbican::cli::{self, Cli};
use barbican::core::credentials::Credentials;
use barbican::core::keystone::KeystoneClient;
use barbican::core::session::Session;
use barbican::error::{AuthError, Error};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("BARBICAN_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("barbican=debug")
        } else {
            EnvFilter::new("barbican=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = run(cli) {
        // Missing credentials is the one failure that also shows usage.
        if matches!(e, Error::Auth(AuthError::MissingCredentials)) {
            eprintln!("{}", Cli::command().render_usage());
        }
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

/// Bootstrap, then dispatch: resolve the credential bundle, validate it,
/// establish the session, and only then run the requested sub-command.
fn run(cli: Cli) -> barbican::error::Result<()> {
    let credentials = Credentials::from_args(&cli.globals);
    debug!("Resolved credentials: {:?}", credentials);

    let mode = credentials.validate()?;
    debug!("Credentials validated");

    let provider = KeystoneClient::new(cli.globals.insecure);
    let session = Session::establish(mode, &provider)?;

    match cli.command {
        Some(command) => cli::execute(command, &session),
        None => {
            eprintln!("{}", Cli::command().render_usage());
            std::process::exit(1);
        }
    }
}
