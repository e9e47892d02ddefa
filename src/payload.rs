//! Payload preparation: turn a URL, a text file, or a binary file into the
//! string that gets embedded in the symbol.
//!
//! | Source      | Checks (in order)                                 | Embedded text     |
//! |-------------|---------------------------------------------------|-------------------|
//! | literal     | non-empty                                         | as given          |
//! | text file   | extension allow-list, exists, UTF-8, char count   | file content      |
//! | binary file | exists, byte size (metadata only)                 | base64 of bytes   |
//!
//! The binary size check runs before the file is read so an oversized file
//! never gets pulled into memory.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use std::path::Path;
use tracing::debug;

use crate::capacity::Limits;
use crate::error::{Error, Result};
use crate::io;

/// Extensions accepted by [`Preparer::from_text_file`].
pub const TEXT_EXTENSIONS: &[&str] = &[
    ".txt", ".py", ".js", ".html", ".css", ".json", ".xml", ".csv", ".md",
];

/// Where a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Url,
    TextFile,
    BinaryFile,
}

/// Text ready for the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub text: String,
    pub kind: SourceKind,
    /// Characters for text sources, raw bytes for binary files.
    pub size: u64,
}

impl Payload {
    /// Whether the embedded text must be base64-decoded to get the original
    /// file back.
    pub fn needs_decoding(&self) -> bool {
        self.kind == SourceKind::BinaryFile
    }
}

/// Validates sources against the capacity limits and an extension
/// allow-list.
#[derive(Debug, Clone)]
pub struct Preparer {
    limits: Limits,
    text_extensions: Vec<String>,
}

impl Default for Preparer {
    fn default() -> Self {
        Self::new(Limits::default(), TEXT_EXTENSIONS)
    }
}

impl Preparer {
    pub fn new(limits: Limits, text_extensions: &[&str]) -> Self {
        Self {
            limits,
            text_extensions: text_extensions
                .iter()
                .map(|e| e.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Pass a literal string (typically a URL) through unchanged.
    pub fn from_literal(&self, text: &str) -> Result<Payload> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput("URL"));
        }
        Ok(Payload {
            text: text.to_string(),
            kind: SourceKind::Url,
            size: text.chars().count() as u64,
        })
    }

    /// Load a text file and embed its content verbatim.
    pub fn from_text_file(&self, path: &Path) -> Result<Payload> {
        let extension = dotted_extension(path);
        if !self.text_extensions.contains(&extension) {
            return Err(Error::UnsupportedExtension {
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    extension
                },
            });
        }

        let content = io::read_text(path)?;
        let chars = content.chars().count() as u64;
        let limit = self.limits.max_text_chars() as u64;
        debug!(path = %path.display(), chars, limit, "text file loaded");
        if chars > limit {
            return Err(Error::PayloadTooLarge {
                limit,
                actual: chars,
            });
        }

        Ok(Payload {
            text: content,
            kind: SourceKind::TextFile,
            size: chars,
        })
    }

    /// Load a binary file and embed it as base64 text.
    pub fn from_binary_file(&self, path: &Path) -> Result<Payload> {
        let size = io::file_size(path)?;
        let limit = self.limits.max_binary_bytes();
        debug!(path = %path.display(), size, limit, "binary file probed");
        if size > limit {
            return Err(Error::PayloadTooLarge {
                limit,
                actual: size,
            });
        }

        let bytes = io::read_bytes(path)?;
        let text = B64.encode(&bytes);
        debug!(raw = bytes.len(), encoded = text.len(), "base64 encoded");

        Ok(Payload {
            text,
            kind: SourceKind::BinaryFile,
            size: bytes.len() as u64,
        })
    }
}

/// Lower-cased extension with its leading dot, or `""` when there is none.
fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}
