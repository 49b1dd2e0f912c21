//! Persist and retrieve fixed-schema records from a single delimited file.
//!
//! Records are appended to a plain text file whose first line names each field ([record]). The
//! file is only ever appended to ([file]), and records are looked up by primary key either by
//! scanning the whole file or through an in-memory index rebuilt when the file is opened
//! ([access]).
//!
//! # Status
//!
//! `roster-storage` is **ALPHA** software. Only a single writer per file is supported.

pub mod access;
pub mod file;
pub mod record;
