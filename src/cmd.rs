use crate::banner;
use crate::capacity::format_kb;
use crate::error::Error;
use crate::io;
use crate::payload::{Payload, Preparer};
use crate::qr::{self, RenderOptions};
use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output path used when none is given.
pub const DEFAULT_OUTPUT: &str = "qrcode.png";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a URL (or any literal string)
    Url(UrlArgs),
    /// Encode the contents of a text file as-is
    Text(FileArgs),
    /// Encode a binary file as base64 text
    Binary(FileArgs),
}

// ---------------------------------------------------------------------------
// Shared arg groups
// ---------------------------------------------------------------------------

/// Symbol rendering options, shared by every mode.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Pixels per QR module
    #[arg(long, global = true, default_value_t = qr::MODULE_PX,
          value_parser = clap::value_parser!(u32).range(1..=100))]
    pub module_size: u32,

    /// Quiet-zone width in modules
    #[arg(long, global = true, default_value_t = qr::QUIET_MODULES,
          value_parser = clap::value_parser!(u32).range(0..=64))]
    pub border: u32,
}

impl RenderArgs {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            module_px: self.module_size,
            border: self.border,
            ..RenderOptions::default()
        }
    }
}

/// Where the image goes.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output image (.png, or .jpg/.jpeg for JPEG); missing directories are created
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

// ---------------------------------------------------------------------------
// Per-command args
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Text to embed
    pub url: String,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Args, Debug)]
pub struct FileArgs {
    /// File to embed
    pub file: PathBuf,

    #[command(flatten)]
    pub out: OutputArgs,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run one command, or the interactive menu when none was given.
pub fn run(command: Option<Command>, opts: &RenderOptions) -> Result<()> {
    let preparer = Preparer::default();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    match command {
        None => interactive(&preparer, opts, &mut stdin.lock(), &mut stdout),
        Some(Command::Url(args)) => {
            let payload = preparer.from_literal(&args.url)?;
            emit(&payload, &args.out.output, opts, &mut stdout)
        }
        Some(Command::Text(args)) => {
            let payload = preparer.from_text_file(&args.file)?;
            emit(&payload, &args.out.output, opts, &mut stdout)
        }
        Some(Command::Binary(args)) => {
            let payload = preparer.from_binary_file(&args.file)?;
            emit(&payload, &args.out.output, opts, &mut stdout)
        }
    }
}

/// Create the output directory if needed, render, and report.
fn emit(payload: &Payload, output: &Path, opts: &RenderOptions, out: &mut impl Write) -> Result<()> {
    if let Some(dir) = io::ensure_parent_dir(output)? {
        info!(dir = %dir.display(), "created output directory");
        writeln!(out, "[+] Created directory: {}", dir.display())?;
    }

    debug!(kind = ?payload.kind, size = payload.size, chars = payload.text.len(), "encoding payload");
    let rendered = qr::generate(&payload.text, output, opts)?;
    info!(modules = rendered.modules, pixels = rendered.pixels, "symbol rendered");

    if payload.needs_decoding() {
        writeln!(
            out,
            "[+] QR code successfully generated from binary file and saved as {}",
            output.display()
        )?;
        writeln!(
            out,
            "[!] Note: The QR code contains base64 encoded data. \
             Decode with base64 to recover the original file."
        )?;
    } else {
        writeln!(
            out,
            "[+] QR code successfully generated and saved as {}",
            output.display()
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Interactive menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Url,
    TextFile,
    BinaryFile,
}

fn parse_choice(raw: &str) -> Result<MenuChoice, Error> {
    match raw.trim() {
        "1" => Ok(MenuChoice::Url),
        "2" => Ok(MenuChoice::TextFile),
        "3" => Ok(MenuChoice::BinaryFile),
        other => Err(Error::InvalidMenuChoice(other.to_string())),
    }
}

/// One pass through the menu: banner, choice, source, output path, encode.
fn interactive(
    preparer: &Preparer,
    opts: &RenderOptions,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    banner::show(out)?;
    writeln!(
        out,
        "[i] Maximum file size: {}\n",
        format_kb(preparer.limits().max_binary_bytes())
    )?;

    writeln!(out, "Options:")?;
    writeln!(out, "1. Convert URL to QR Code")?;
    writeln!(out, "2. Convert Text File to QR Code")?;
    writeln!(out, "3. Convert Binary File to QR Code")?;

    let choice = parse_choice(&prompt(input, out, "Enter choice (1-3)", None)?)?;
    debug!(?choice, "menu selection");

    let payload = match choice {
        MenuChoice::Url => {
            let url = prompt(input, out, "Enter URL", None)?;
            preparer.from_literal(&url)?
        }
        MenuChoice::TextFile => {
            let path = prompt_path(input, out, "Enter text file path")?;
            preparer.from_text_file(&path)?
        }
        MenuChoice::BinaryFile => {
            let path = prompt_path(input, out, "Enter binary file path")?;
            preparer.from_binary_file(&path)?
        }
    };

    let output = prompt(input, out, "Output file path", Some(DEFAULT_OUTPUT))?;
    emit(&payload, Path::new(&output), opts, out)
}

fn prompt_path(input: &mut impl BufRead, out: &mut impl Write, label: &str) -> Result<PathBuf> {
    let raw = prompt(input, out, label, None)?;
    if raw.is_empty() {
        return Err(Error::EmptyInput("File path").into());
    }
    Ok(PathBuf::from(raw))
}

// ---------------------------------------------------------------------------
// Interactive prompt helpers
// ---------------------------------------------------------------------------

/// Prompt for a value and read one line.
///
/// Shows `(default: ...)` when a default is provided and returns it on empty
/// input. Without a default an empty line comes back as `""`; the caller
/// decides what that means. The menu runs once, so there is no re-prompt.
fn prompt(
    input: &mut impl BufRead,
    out: &mut impl Write,
    label: &str,
    default: Option<&str>,
) -> Result<String> {
    match default {
        Some(d) => write!(out, "{} (default: {}): ", label, d)?,
        None => write!(out, "{}: ", label)?,
    }
    out.flush()?;
    let mut buf = String::new();
    input.read_line(&mut buf).context("read from stdin")?;
    if buf.is_empty() {
        bail!("unexpected end of input");
    }
    let trimmed = buf.trim();
    match default {
        Some(d) if trimmed.is_empty() => Ok(d.to_string()),
        _ => Ok(trimmed.to_string()),
    }
}
