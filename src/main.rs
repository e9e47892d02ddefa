mod banner;
mod capacity;
mod cmd;
mod error;
mod io;
mod payload;
mod qr;

use clap::{ArgAction, Parser};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// qrgen — Turn a URL, a text file, or a small binary file into a QR code image.
///
/// Run without a subcommand for the interactive menu. Text is embedded
/// as-is; binary files are base64-encoded first, so decode the scanned
/// text with base64 to get the original bytes back.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<cmd::Command>,

    #[command(flatten)]
    render: cmd::RenderArgs,

    /// Diagnostic logging on stderr (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "qrgen=debug",
        _ => "qrgen=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// One-line failure report. Rejected menu input reads as a plain `[-]`
/// line; everything else is prefixed with `Error:`.
fn report(e: &anyhow::Error) -> String {
    match e.downcast_ref::<error::Error>() {
        Some(err @ (error::Error::EmptyInput(_) | error::Error::InvalidMenuChoice(_))) => {
            format!("[-] {err}")
        }
        _ => format!("[-] Error: {e:#}"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cmd::run(cli.command, &cli.render.options()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", report(&e));
            let code = e
                .downcast_ref::<error::Error>()
                .map(error::Error::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
