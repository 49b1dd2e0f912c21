//! An append-only file of delimited lines.
//!
//! The first line of the file is a header naming each field (see [crate::record::Schema]). Every
//! following line holds one record. Lines are addressed by the byte offset at which they begin,
//! which remains valid for as long as the file is only ever appended to.
//!
//! # Format
//!
//! ```text
//! record_id,first_name,last_name,birthday_date\n
//! 1,Ada,Lovelace,1815-12-10\n
//! 2,Alan,Turing,1912-06-23\n
//! ```
//!
//! Every line, including the last, must end with the terminator. A file whose last line is cut
//! short (for example by a crash mid-write) is refused by every read and is never appended to.
//!
//! # File Handles
//!
//! [Store] does not hold a file handle between calls. Every operation opens the file, does its
//! work, and closes the file before returning (including on error). Only a single writer is
//! supported and nothing guards against another process appending to the file concurrently.

mod storage;

pub use storage::{Scan, Store};

use std::{io::Error as IoError, path::PathBuf};
use thiserror::Error;

/// Delimiter used between values when none is configured.
pub const DEFAULT_DELIMITER: char = ',';

/// Terminator used at the end of each line when none is configured.
pub const DEFAULT_TERMINATOR: u8 = b'\n';

/// Errors that can occur when interacting with a [Store].
#[derive(Debug, Error)]
pub enum Error {
    #[error("schema read failed: {0}")]
    SchemaRead(String),
    #[error("invalid schema: {0}")]
    Schema(#[from] crate::record::Error),
    #[error("file open failed: {0} error: {1}")]
    OpenFailed(String, IoError),
    #[error("file already exists: {0}")]
    AlreadyExists(String),
    #[error("read failed at offset {0}: {1}")]
    ReadFailed(u64, IoError),
    #[error("offset out of range: {0} >= {1}")]
    OffsetOutOfRange(u64, u64),
    #[error("no line at offset {0}")]
    EmptyRead(u64),
    #[error("invalid utf-8 at offset {0}")]
    InvalidUtf8(u64),
    #[error("line at offset {0} is not terminated")]
    Unterminated(u64),
    #[error("file does not end with a terminator (length {0})")]
    MissingTerminator(u64),
    #[error("terminator must be ASCII: {0:#04x}")]
    InvalidTerminator(u8),
    #[error("write failed: {0}")]
    WriteFailed(IoError),
}

/// Configuration for a [Store].
#[derive(Clone, Debug)]
pub struct Config {
    /// Path of the backing file.
    pub path: PathBuf,

    /// Character placed between values (and between field names in the header).
    pub delimiter: char,

    /// Byte marking the end of each line. Must be ASCII.
    pub terminator: u8,
}

impl Config {
    /// Create a [Config] for `path` with the default delimiter and terminator.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: DEFAULT_DELIMITER,
            terminator: DEFAULT_TERMINATOR,
        }
    }
}
