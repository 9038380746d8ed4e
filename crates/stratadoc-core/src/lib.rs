//! Stratadoc Core - documentation metadata extraction
//!
//! This crate turns a tree of compiled modules into an intermediate
//! documentation model for renderers:
//! - Scanner: discovers modules in directories and archives
//! - Loader: loads each module in isolation, containing failures
//! - Classifier: tags members as values, macros, multimethods or protocols
//! - Grouping: nests protocol methods under their protocol
//! - Normalizer: produces stable, omit-if-absent member records
//! - Extractor: orchestrates the run across source roots

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Module introspection capability and the bundled hosts
pub mod host;

/// Output records
pub mod types;

/// Error types
pub mod error;

/// `stratadoc.toml` configuration
pub mod config;

pub mod classify;
pub mod extractor;
pub mod grouping;
pub mod loader;
pub mod normalize;
pub mod scanner;
pub mod text;
pub mod typecheck;

pub use config::{Config, ModuleFilter, CONFIG_FILE};
pub use error::{ConfigError, HostError, LoadError};
pub use extractor::{extract, DocExtractor, ExtractOptions};
pub use host::{
    Deprecation, LoadedModule, Member, MemberId, MemberMeta, MemoryHost, ModuleHost, ModuleId,
    ModuleMeta, RuntimeValue, SymbolTableHost,
};
pub use loader::log_and_continue;
pub use typecheck::{StaticTypeChecker, TypeCheckResult, TypeChecker, TypeTable};
pub use types::{MemberKind, MemberRecord, ModuleRecord};
