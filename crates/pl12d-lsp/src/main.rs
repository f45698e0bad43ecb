//! 12dPL Language Server.
//!
//! Usage:
//!   pl12d-lsp                      # Start LSP server (stdio)
//!   pl12d-lsp --log-file lsp.log   # Log to a file instead of stderr
//!   pl12d-lsp --version            # Print version
//!   pl12d-lsp --help               # Print help

use std::fs::File;
use std::io;
use std::process::ExitCode;
use std::sync::Mutex;

use pl12d_lsp::config::USAGE;
use pl12d_lsp::{Command, Server, ServerConfig};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let config = match ServerConfig::from_args(std::env::args().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("pl12d-lsp {}", pl12d_lsp::VERSION);
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("Try 'pl12d-lsp --help' for more information.");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_tracing(&config) {
        eprintln!("error: cannot open log file: {err}");
        return ExitCode::FAILURE;
    }

    let mut server = match Server::new(config) {
        Ok(server) => server,
        Err(err) => {
            tracing::error!(%err, "failed to start");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    match server.serve(stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "session ended with an error");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr or the configured file; stdout carries the protocol.
fn init_tracing(config: &ServerConfig) -> io::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match &config.log_file {
        Some(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}
