//! Documentation extractor - walks source roots and collects module records

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::ModuleFilter;
use crate::error::LoadError;
use crate::host::{ModuleHost, ModuleId};
use crate::loader::{load_module, log_and_continue, read_module, ExceptionHandler};
use crate::scanner::scan;
use crate::typecheck::TypeChecker;
use crate::types::ModuleRecord;

/// Options controlling an extraction run
pub struct ExtractOptions<'a> {
    exception_handler: ExceptionHandler<'a>,
    type_checker: Option<&'a dyn TypeChecker>,
    filter: ModuleFilter,
}

impl Default for ExtractOptions<'_> {
    fn default() -> Self {
        Self {
            exception_handler: Box::new(log_and_continue),
            type_checker: None,
            filter: ModuleFilter::default(),
        }
    }
}

impl<'a> ExtractOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the handler invoked for each module that fails to load.
    pub fn with_exception_handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&LoadError, &ModuleId) + 'a,
    {
        self.exception_handler = Box::new(handler);
        self
    }

    /// Enrich members with type signatures from `checker`.
    pub fn with_type_checker(mut self, checker: &'a dyn TypeChecker) -> Self {
        self.type_checker = Some(checker);
        self
    }

    /// Skip modules the filter rejects, before they are loaded.
    pub fn with_filter(mut self, filter: ModuleFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Extracts documentation metadata through a [`ModuleHost`]
pub struct DocExtractor<'h, 'a, H: ModuleHost + ?Sized> {
    host: &'h mut H,
    options: ExtractOptions<'a>,
}

impl<'h, 'a, H: ModuleHost + ?Sized> DocExtractor<'h, 'a, H> {
    pub fn new(host: &'h mut H) -> Self {
        Self {
            host,
            options: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions<'a>) -> Self {
        self.options = options;
        self
    }

    /// Extract every documentable module under `roots`.
    ///
    /// Roots are processed in order and their results concatenated; within a
    /// root, modules come in whatever order the host reported them.
    pub fn extract<P: AsRef<Path>>(&mut self, roots: &[P]) -> Vec<ModuleRecord> {
        let canonical: Vec<PathBuf> = roots
            .iter()
            .filter_map(|root| {
                let root = root.as_ref();
                match root.canonicalize() {
                    Ok(path) => Some(path),
                    Err(error) => {
                        warn!(root = %root.display(), error = %error, "skipping source root");
                        None
                    }
                }
            })
            .collect();

        let mut records = Vec::new();
        for root in &canonical {
            records.extend(self.extract_root(root, &canonical));
        }

        info!(
            roots = canonical.len(),
            modules = records.len(),
            "extracted documentation metadata"
        );
        records
    }

    fn extract_root(&mut self, root: &Path, all_roots: &[PathBuf]) -> Vec<ModuleRecord> {
        let Some(ids) = scan(&mut *self.host, root) else {
            return Vec::new();
        };
        debug!(root = %root.display(), modules = ids.len(), "scanned source root");

        // Files are relativized against the root being read first.
        let roots: Vec<PathBuf> = std::iter::once(root.to_path_buf())
            .chain(all_roots.iter().filter(|r| r.as_path() != root).cloned())
            .collect();

        let mut records = Vec::new();
        for id in ids {
            if !self.options.filter.allows(&id) {
                debug!(module = %id, "excluded by module filter");
                continue;
            }

            let Some(module) =
                load_module(&mut *self.host, &id, &mut *self.options.exception_handler)
            else {
                continue;
            };

            // Loaded for its side effects, but never documented.
            if module.meta.is_no_doc() {
                debug!(module = %id, "module marked no-doc");
                continue;
            }

            let types = self
                .options
                .type_checker
                .map(|checker| checker.precheck_module(&module));
            records.push(read_module(&module, &roots, types.as_ref()));
        }
        records
    }
}

/// Extract with the given options.
///
/// Convenience wrapper around [`DocExtractor`].
pub fn extract<H, P>(host: &mut H, roots: &[P], options: ExtractOptions<'_>) -> Vec<ModuleRecord>
where
    H: ModuleHost + ?Sized,
    P: AsRef<Path>,
{
    DocExtractor::new(host).with_options(options).extract(roots)
}
