use super::{Config, Error};
use crate::record::{Codec, Record, Schema};
use std::{
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom, Write},
};
use tracing::debug;

/// Implementation of the append-only line store.
#[derive(Clone, Debug)]
pub struct Store {
    cfg: Config,
    schema: Schema,
}

impl Store {
    /// Open an existing file and read its header.
    pub fn open(cfg: Config) -> Result<Self, Error> {
        validate(&cfg)?;
        let file = File::open(&cfg.path)
            .map_err(|err| Error::OpenFailed(cfg.path.display().to_string(), err))?;
        let mut reader = BufReader::new(file);
        let header = read_line(&mut reader, cfg.terminator, 0)?
            .ok_or_else(|| Error::SchemaRead(cfg.path.display().to_string()))?;
        let schema = Schema::parse(&header, cfg.delimiter, cfg.terminator)?;
        debug!(
            path = %cfg.path.display(),
            fields = schema.len(),
            "opened store"
        );

        Ok(Self { cfg, schema })
    }

    /// Create a new file containing only the header for `schema`.
    ///
    /// Fails if the file already exists.
    pub fn create(cfg: Config, schema: Schema) -> Result<Self, Error> {
        validate(&cfg)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&cfg.path)
            .map_err(|err| match err.kind() {
                ErrorKind::AlreadyExists => Error::AlreadyExists(cfg.path.display().to_string()),
                _ => Error::OpenFailed(cfg.path.display().to_string(), err),
            })?;
        let mut header = schema.encode(cfg.delimiter).into_bytes();
        header.push(cfg.terminator);
        file.write_all(&header).map_err(Error::WriteFailed)?;
        file.sync_all().map_err(Error::WriteFailed)?;
        debug!(
            path = %cfg.path.display(),
            fields = schema.len(),
            "created store"
        );

        Ok(Self { cfg, schema })
    }

    /// The configuration of the store.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// The schema read from (or written to) the header line.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// A [Codec] for records of type `R` matching this file's layout.
    pub fn codec<R: Record>(&self) -> Codec<R> {
        Codec::new(self.schema.clone(), self.cfg.delimiter, self.cfg.terminator)
    }

    /// Current length of the file in bytes.
    pub fn len(&self) -> Result<u64, Error> {
        let metadata = fs::metadata(&self.cfg.path)
            .map_err(|err| Error::OpenFailed(self.cfg.path.display().to_string(), err))?;
        Ok(metadata.len())
    }

    /// Append `line` (plus a terminator) to the end of the file.
    ///
    /// Returns the offset at which `line` begins, which is the length of the file
    /// before the write. Fails without writing if the file does not end with a terminator.
    pub fn append(&self, line: &str) -> Result<u64, Error> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.cfg.path)
            .map_err(|err| Error::OpenFailed(self.cfg.path.display().to_string(), err))?;
        let offset = file.seek(SeekFrom::End(0)).map_err(Error::WriteFailed)?;

        // The previous line (at least the header) must be complete
        if offset == 0 {
            return Err(Error::MissingTerminator(offset));
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))
            .map_err(|err| Error::ReadFailed(offset - 1, err))?;
        file.read_exact(&mut last)
            .map_err(|err| Error::ReadFailed(offset - 1, err))?;
        if last[0] != self.cfg.terminator {
            return Err(Error::MissingTerminator(offset));
        }

        // Write the line and its terminator in a single call
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(self.cfg.terminator);
        file.write_all(&buf).map_err(Error::WriteFailed)?;
        file.flush().map_err(Error::WriteFailed)?;

        Ok(offset)
    }

    /// Read the line beginning at `offset` (including its terminator).
    pub fn read_at(&self, offset: u64) -> Result<String, Error> {
        let mut file = File::open(&self.cfg.path)
            .map_err(|err| Error::OpenFailed(self.cfg.path.display().to_string(), err))?;
        let len = file
            .metadata()
            .map_err(|err| Error::ReadFailed(offset, err))?
            .len();
        if offset >= len {
            return Err(Error::OffsetOutOfRange(offset, len));
        }
        file.seek(SeekFrom::Start(offset))
            .map_err(|err| Error::ReadFailed(offset, err))?;
        let mut reader = BufReader::new(file);
        read_line(&mut reader, self.cfg.terminator, offset)?.ok_or(Error::EmptyRead(offset))
    }

    /// Iterate over every record line (skipping the header) with the offset it begins at.
    ///
    /// Each call opens the file anew, so a [Scan] observes all appends made before it was
    /// created.
    pub fn scan(&self) -> Result<Scan, Error> {
        let file = File::open(&self.cfg.path)
            .map_err(|err| Error::OpenFailed(self.cfg.path.display().to_string(), err))?;
        let mut reader = BufReader::new(file);

        // Skip the header
        let mut header = Vec::new();
        let offset = reader
            .read_until(self.cfg.terminator, &mut header)
            .map_err(|err| Error::ReadFailed(0, err))?;
        if offset == 0 {
            return Err(Error::SchemaRead(self.cfg.path.display().to_string()));
        }
        if header.last() != Some(&self.cfg.terminator) {
            return Err(Error::Unterminated(0));
        }

        Ok(Scan {
            reader,
            offset: offset as u64,
            terminator: self.cfg.terminator,
            done: false,
        })
    }
}

/// Lines of a [Store] paired with the offset each begins at.
///
/// The underlying file is closed when the [Scan] is dropped.
pub struct Scan {
    reader: BufReader<File>,
    offset: u64,
    terminator: u8,
    done: bool,
}

impl Iterator for Scan {
    type Item = Result<(String, u64), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let offset = self.offset;
        let mut buf = Vec::new();
        match self.reader.read_until(self.terminator, &mut buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(read) => {
                self.offset += read as u64;
                let line = into_line(buf, self.terminator, offset);
                if line.is_err() {
                    self.done = true;
                }
                Some(line.map(|line| (line, offset)))
            }
            Err(err) => {
                self.done = true;
                Some(Err(Error::ReadFailed(offset, err)))
            }
        }
    }
}

/// Read a single terminated line starting at the reader's position (`offset` is used for errors
/// only).
///
/// Returns `None` at the end of the file.
fn read_line(
    reader: &mut BufReader<File>,
    terminator: u8,
    offset: u64,
) -> Result<Option<String>, Error> {
    let mut buf = Vec::new();
    let read = reader
        .read_until(terminator, &mut buf)
        .map_err(|err| Error::ReadFailed(offset, err))?;
    if read == 0 {
        return Ok(None);
    }
    into_line(buf, terminator, offset).map(Some)
}

/// Convert the bytes of a line read at `offset` into a [String], requiring the terminator.
fn into_line(buf: Vec<u8>, terminator: u8, offset: u64) -> Result<String, Error> {
    if buf.last() != Some(&terminator) {
        return Err(Error::Unterminated(offset));
    }
    String::from_utf8(buf).map_err(|_| Error::InvalidUtf8(offset))
}

/// Reject configurations that cannot be read back.
fn validate(cfg: &Config) -> Result<(), Error> {
    if !cfg.terminator.is_ascii() {
        return Err(Error::InvalidTerminator(cfg.terminator));
    }
    Ok(())
}
