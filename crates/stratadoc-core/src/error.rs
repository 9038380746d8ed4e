//! Error types for scanning, loading and configuration

use std::path::PathBuf;

use thiserror::Error;

use crate::host::ModuleId;

/// Errors raised while enumerating the modules under a scan target.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open archive '{}': {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Errors raised while loading a single module.
///
/// A load error never aborts an extraction run; it is routed to the
/// exception handler and the module is left out of the output.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("module '{0}' was not found by any scan")]
    UnknownModule(ModuleId),

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed symbol table in {location}: {source}")]
    Malformed {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read '{entry}' from archive '{}': {source}", .archive.display())]
    Archive {
        archive: PathBuf,
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("symbol table at {location} declares module '{found}', expected '{expected}'")]
    NameMismatch {
        location: String,
        expected: ModuleId,
        found: ModuleId,
    },

    #[error("{0}")]
    Failed(String),
}

impl LoadError {
    /// The innermost error in the source chain, used when reporting a failure.
    pub fn root_cause(&self) -> &(dyn std::error::Error + 'static) {
        let mut cause: &(dyn std::error::Error + 'static) = self;
        while let Some(next) = cause.source() {
            cause = next;
        }
        cause
    }
}

/// Errors that can occur when loading `stratadoc.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid module pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_cause_walks_source_chain() {
        let err = LoadError::Io {
            path: PathBuf::from("/src/a.symbols.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.root_cause().to_string(), "gone");
    }

    #[test]
    fn root_cause_of_leaf_error_is_itself() {
        let err = LoadError::Failed("boom".to_string());
        assert_eq!(err.root_cause().to_string(), "boom");
    }
}
