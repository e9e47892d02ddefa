use crossterm::style::Stylize;
use std::io::Write;

const LOGO: &str = r#"
  ___  ____   ____              _____           _
 / _ \|  _ \ / ___| ___ _ __   |_   _|__   ___ | |
| | | | |_) | |  _ / _ \ '_ \    | |/ _ \ / _ \| |
| |_| |  _ <| |_| |  __/ | | |   | | (_) | (_) | |
 \__\_\_| \_\\____|\___|_| |_|   |_|\___/ \___/|_|
"#;

const SEPARATOR: &str = "------------------------------------------------------------";

/// Print the startup banner.
pub fn show(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{}", LOGO.green())?;
    writeln!(out, " QR Code Generator Tool - Convert Files/URLs to QR Codes")?;
    writeln!(out)?;
    writeln!(out, "{}", SEPARATOR.white())?;
    writeln!(out)
}
