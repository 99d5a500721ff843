use crate::config;
use crate::repl::models::Mode;
use std::ffi::OsString;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Base address of the analysis service.
    /// Falls back to CODEPAD_SERVER_URL, then to http://localhost:8000.
    #[clap(short = 's', long, help = "analysis service address")]
    server: Option<String>,

    /// Mode active at startup: compare, indent, syntax or ai
    #[clap(short = 'm', long, default_value = "compare", value_parser = parse_mode)]
    mode: Mode,

    /// Write trace output to this file; `~` is expanded
    #[clap(short = 'l', long, help = "log file path")]
    log_file: Option<String>,
}

fn parse_mode(value: &str) -> Result<Mode, String> {
    value.parse()
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    server: Option<String>,
    mode: Mode,
    log_file: Option<String>,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from(ClapArgs::parse_from(itr))
    }

    /// Service address after applying the environment and default fallbacks
    pub fn server_url(&self) -> String {
        config::resolve_server_url(self.server.as_deref())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Log file path with `~` and environment variables expanded
    pub fn log_file(&self) -> Option<String> {
        self.log_file.as_deref().map(|path| {
            shellexpand::full(path).map_or_else(|_| path.to_string(), |p| p.into_owned())
        })
    }
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            server: args.server,
            mode: args.mode,
            log_file: args.log_file,
        }
    }
}
