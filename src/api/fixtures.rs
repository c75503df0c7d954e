//! JSON fixtures
//!
//! Mock endpoints serve canned data from `<data_dir>/<name>.json`. Files are read
//! on every call, so edits show up without a restart.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Fixture loading errors
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("invalid fixture name '{0}'")]
    InvalidName(String),
    #[error("fixture '{0}' not found")]
    NotFound(String),
    #[error("failed to read fixture '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("fixture '{name}' is not valid JSON: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of named JSON documents
pub trait FixtureProvider: Send + Sync {
    fn load(&self, name: &str) -> Result<Value, FixtureError>;
}

/// Fixtures stored as `.json` files in one directory
#[derive(Debug, Clone)]
pub struct FsFixtures {
    dir: PathBuf,
}

impl FsFixtures {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Fixture names are flat: letters, digits, `-` and `_`
fn validate_name(name: &str) -> Result<(), FixtureError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(FixtureError::InvalidName(name.to_string()))
    }
}

impl FixtureProvider for FsFixtures {
    fn load(&self, name: &str) -> Result<Value, FixtureError> {
        validate_name(name)?;
        let path = self.dir.join(format!("{name}.json"));
        let text = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                FixtureError::NotFound(name.to_string())
            } else {
                FixtureError::Io {
                    name: name.to_string(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&text).map_err(|source| FixtureError::Parse {
            name: name.to_string(),
            source,
        })
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;

    use super::{validate_name, FixtureError, FixtureProvider, Value};

    /// Fixture set held in memory
    #[derive(Debug, Default)]
    pub struct MemoryFixtures(HashMap<String, Value>);

    impl MemoryFixtures {
        pub fn with(mut self, name: &str, value: Value) -> Self {
            self.0.insert(name.to_string(), value);
            self
        }
    }

    impl FixtureProvider for MemoryFixtures {
        fn load(&self, name: &str) -> Result<Value, FixtureError> {
            validate_name(name)?;
            self.0
                .get(name)
                .cloned()
                .ok_or_else(|| FixtureError::NotFound(name.to_string()))
        }
    }
}
