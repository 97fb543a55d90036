//! Command line parsing.
//!
//! ```text
//! thinqd [sync] [--config FILE] [-i JEEDOM] [-k APIKEY] [-p PORT]
//!        [-j LOGICAL_ID] [-v]
//! ```
//!
//! Flags accept both `--flag value` and `--flag=value`.

/// What the daemon should do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Command {
    /// Serve the REST API.
    #[default]
    Serve,
    /// Push the state of every (or one) eqLogic to Jeedom once and exit.
    Sync,
}

/// Parsed command line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Cli {
    pub command: Command,
    pub config: Option<String>,
    pub ip: Option<String>,
    pub key: Option<String>,
    pub port: Option<u16>,
    pub id: Option<String>,
    pub verbose: bool,
    pub help: bool,
}

pub const USAGE: &str = "\
usage: thinqd [sync] [options]

  sync                push device states to Jeedom once and exit

  --config FILE       configuration file (default thinq-bridge.toml)
  --ip, -i ADDRESS    Jeedom address (default http://localhost)
  --key, -k APIKEY    Jeedom API key, enables Jeedom
  --port, -p PORT     HTTP port (default 5025)
  --id, -j LOGICAL_ID only sync this eqLogic
  --verbose, -v       debug logging
  --help, -h          show this help";

impl Cli {
    /// Parse arguments (without the program name).
    ///
    /// # Errors
    ///
    /// Returns a [`CliError`] for unknown flags, missing values or an
    /// invalid port.
    pub fn parse<I, A>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let mut cli = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg, None),
            };
            let mut value = |name: &'static str| {
                inline
                    .clone()
                    .or_else(|| args.next())
                    .ok_or(CliError::MissingValue(name))
            };

            match flag.as_str() {
                "sync" => cli.command = Command::Sync,
                "serve" => cli.command = Command::Serve,
                "--config" => cli.config = Some(value("--config")?),
                "--ip" | "-i" => cli.ip = Some(value("--ip")?),
                "--key" | "-k" => cli.key = Some(value("--key")?),
                "--id" | "-j" => cli.id = Some(value("--id")?),
                "--port" | "-p" => {
                    let raw = value("--port")?;
                    let port = raw.parse().map_err(|_| CliError::InvalidPort(raw))?;
                    cli.port = Some(port);
                }
                "--verbose" | "-v" => cli.verbose = true,
                "--help" | "-h" => cli.help = true,
                other => return Err(CliError::Unknown(other.to_string())),
            }
        }
        Ok(cli)
    }
}

/// Command line errors.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CliError {
    #[error("missing value for {0}")]
    MissingValue(&'static str),
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    #[error("unknown argument '{0}'")]
    Unknown(String),
}
