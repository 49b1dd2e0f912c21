//! Add and find students in a single-file record store from the terminal.
//!
//! # Usage
//!
//! ```sh
//! cargo run --release --bin roster-console -- --config console/config.yaml
//! ```
//!
//! The configuration names the student file and the lookup strategy:
//!
//! ```yaml
//! path: students.txt
//! kind: indexed
//! ```
//!
//! If the file does not exist it is created with a header naming the student fields. Logs are
//! written to stderr so they do not interleave with prompts.

pub mod config;
pub mod menu;
pub mod prompt;

pub use config::Config;
