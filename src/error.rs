//! Failure kinds surfaced to the user.
//!
//! Every variant renders as a single line that the command layer prints
//! after a `[-] Error: ` prefix. Size values are carried raw and formatted
//! in kilobytes at display time.

use std::path::PathBuf;

use crate::capacity::format_kb;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0} cannot be empty!")]
    EmptyInput(&'static str),

    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error(
        "Not a text file. Detected: {extension}. \
         Use the binary mode (option 3 / `qrgen binary`) for binary files."
    )]
    UnsupportedExtension { extension: String },

    #[error(
        "{} is a binary file. Use the binary mode (option 3 / `qrgen binary`) instead.",
        .path.display()
    )]
    UndecodableContent { path: PathBuf },

    #[error(
        "File too large. Max: {}, Your file: {}",
        kb(.limit),
        kb(.actual)
    )]
    PayloadTooLarge { limit: u64, actual: u64 },

    #[error("Error generating QR code: {0}")]
    EncodingFailure(String),

    #[error("Invalid choice! Expected 1-3, got {0:?}")]
    InvalidMenuChoice(String),

    #[error("cannot access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Process exit code for this failure.
    ///
    /// Input the user can fix on the spot (an empty field, a bad menu entry)
    /// exits with 2; everything else with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::EmptyInput(_) | Error::InvalidMenuChoice(_) => 2,
            _ => 1,
        }
    }
}

fn kb(bytes: &u64) -> String {
    format_kb(*bytes)
}

pub type Result<T> = std::result::Result<T, Error>;
