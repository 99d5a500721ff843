//! # codepad Main Entry Point

use anyhow::{bail, Result};
use codepad::cmd_args::CommandLineArgs;
use codepad::io::{TerminalEventStream, TerminalRenderStream};
use codepad::{logging, AnalysisController, AppController, HttpService};

#[tokio::main]
async fn main() -> Result<()> {
    let cmd_args = CommandLineArgs::parse();
    let log_file = cmd_args.log_file();
    if logging::init_tracing(log_file.as_deref())? {
        tracing::info!("codepad {} starting", env!("CARGO_PKG_VERSION"));
    }

    if !atty::is(atty::Stream::Stdout) {
        bail!("codepad needs an interactive terminal on stdout");
    }

    let server_url = cmd_args.server_url();
    tracing::info!("Using analysis service at {}", server_url);

    let transport = HttpService::new(server_url.clone())?;
    let controller = AnalysisController::with_mode(transport, cmd_args.mode());
    let mut app = AppController::with_io_streams(
        controller,
        server_url,
        TerminalEventStream::new(),
        TerminalRenderStream::new(),
    )?;

    app.run().await
}
