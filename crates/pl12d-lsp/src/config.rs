//! Server configuration from the command line.
//!
//! No argument parser is needed for a handful of flags, so argv is walked
//! by hand.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Language identifier accepted by default in `textDocument/didOpen`.
pub const DEFAULT_LANGUAGE_ID: &str = "12dpl";

/// Help text printed for `--help`.
pub const USAGE: &str = "\
Language server for the 12d Programming Language

Usage: pl12d-lsp [OPTIONS]

Options:
  -l, --log-file <PATH>     Write logs to PATH instead of stderr
      --language-id <ID>    Language id accepted on open [default: 12dpl]
      --no-completion-filter
                            Always offer the full completion list
  -h, --help                Print help
  -V, --version             Print version

The server communicates via stdio using the Language Server Protocol.
Set RUST_LOG to control log verbosity.
";

/// Runtime options of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Log destination; stderr when unset.
    pub log_file: Option<PathBuf>,
    /// `languageId` a document must be opened with to be tracked.
    pub language_id: String,
    /// Whether completion items are narrowed by cursor context.
    pub filter_completions: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            language_id: DEFAULT_LANGUAGE_ID.to_string(),
            filter_completions: true,
        }
    }
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve with the given configuration.
    Run(ServerConfig),
    /// Print [`USAGE`].
    Help,
    /// Print the version.
    Version,
}

impl ServerConfig {
    /// Parse arguments, excluding the program name.
    ///
    /// `--help` and `--version` win over everything else on the line.
    pub fn from_args<I, S>(args: I) -> Result<Command, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().map(Into::into);
        let mut command = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => command = Some(Command::Help),
                "-V" | "--version" => {
                    command.get_or_insert(Command::Version);
                }
                "-l" | "--log-file" => {
                    let path = args.next().ok_or(ConfigError::MissingValue(arg))?;
                    config.log_file = Some(PathBuf::from(path));
                }
                "--language-id" => {
                    config.language_id = args.next().ok_or(ConfigError::MissingValue(arg))?;
                }
                "--no-completion-filter" => config.filter_completions = false,
                _ => {
                    if let Some(path) = arg.strip_prefix("--log-file=") {
                        config.log_file = Some(PathBuf::from(path));
                    } else if let Some(id) = arg.strip_prefix("--language-id=") {
                        config.language_id = id.to_string();
                    } else {
                        return Err(ConfigError::UnknownOption(arg));
                    }
                }
            }
        }

        Ok(command.unwrap_or(Command::Run(config)))
    }
}
