use roster_storage::{
    access::{self, DEFAULT_MAX_KEY},
    file::{self, DEFAULT_DELIMITER},
    record::PrimaryKey,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lookup strategy to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Linear,
    Indexed,
}

impl From<Kind> for access::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Linear => access::Kind::Linear,
            Kind::Indexed => access::Kind::Indexed,
        }
    }
}

/// Configuration for the console.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Path of the student file.
    pub path: PathBuf,

    #[serde(default = "default_kind")]
    pub kind: Kind,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(default = "default_max_key")]
    pub max_key: PrimaryKey,
}

fn default_kind() -> Kind {
    Kind::Indexed
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

fn default_max_key() -> PrimaryKey {
    DEFAULT_MAX_KEY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("students.txt"),
            kind: default_kind(),
            delimiter: default_delimiter(),
            max_key: default_max_key(),
        }
    }
}

impl Config {
    /// Parse a YAML configuration.
    pub fn parse(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    /// Configuration of the backing [file::Store].
    pub fn store(&self) -> file::Config {
        let mut cfg = file::Config::new(&self.path);
        cfg.delimiter = self.delimiter;
        cfg
    }

    /// Configuration of the [access::Indexed] implementation.
    pub fn access(&self) -> access::Config {
        access::Config {
            max_key: self.max_key,
        }
    }
}
