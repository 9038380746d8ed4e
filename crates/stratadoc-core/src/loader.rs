//! Per-module loading and extraction
//!
//! Each discovered module is loaded once and ends up either loaded or
//! failed. Failures are contained here: they are handed to the exception
//! handler and never stop sibling modules from loading.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::grouping::is_protocol_method;
use crate::host::{LoadedModule, Member, ModuleHost, ModuleId};
use crate::normalize::{factory_record_name, Normalizer};
use crate::text::{correct_indent, is_empty_value, non_empty};
use crate::typecheck::TypeTable;
use crate::types::{MemberRecord, ModuleRecord};

/// Callback invoked with every module load failure.
pub type ExceptionHandler<'a> = Box<dyn FnMut(&LoadError, &ModuleId) + 'a>;

/// Module annotations that describe where the module was read from rather
/// than what it documents.
pub const LOCATION_KEYS: [&str; 5] = ["file", "line", "column", "end-line", "end-column"];

/// Keys the module record serializes itself; annotations may not shadow them.
pub const RECORD_KEYS: [&str; 4] = ["name", "doc", "author", "publics"];

static PROXY_NAME: OnceLock<Option<Regex>> = OnceLock::new();

/// Default exception handler: log a warning and carry on.
pub fn log_and_continue(error: &LoadError, module: &ModuleId) {
    warn!(
        subsystem = "stratadoc",
        module = %module,
        error = %error,
        cause = %error.root_cause(),
        "could not generate documentation for module"
    );
}

/// Load `id` through `host`, routing any failure to `handler`.
pub fn load_module<H, F>(host: &mut H, id: &ModuleId, handler: &mut F) -> Option<LoadedModule>
where
    H: ModuleHost + ?Sized,
    F: FnMut(&LoadError, &ModuleId) + ?Sized,
{
    debug!(module = %id, "loading module");
    match host.load(id) {
        Ok(module) => {
            debug!(module = %id, publics = module.publics.len(), "loaded module");
            Some(module)
        }
        Err(error) => {
            handler(&error, id);
            None
        }
    }
}

/// Compiler-generated proxy classes are not part of the documented surface.
fn is_proxy(member: &Member) -> bool {
    PROXY_NAME
        .get_or_init(|| Regex::new(r"proxy\$").ok())
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(member.name()))
}

/// Build the documented record of a loaded module.
///
/// `roots` are the source roots used to relativize file paths, most specific
/// first. `types` holds the module's precheck results, if a checker ran.
pub fn read_module(
    module: &LoadedModule,
    roots: &[PathBuf],
    types: Option<&TypeTable>,
) -> ModuleRecord {
    let documentable: Vec<&Member> = module
        .publics
        .iter()
        .filter(|m| !is_proxy(m))
        .filter(|m| !m.meta.is_no_doc())
        .collect();

    let normalizer = Normalizer::new(&module.id, roots).with_types(types);
    let mut factories = HashSet::new();
    let mut publics: Vec<MemberRecord> = documentable
        .iter()
        .filter(|m| !is_protocol_method(m, &module.id, &module.publics))
        .filter(|m| match factory_record_name(m.name()) {
            // `->T` and `map->T` collapse onto one name; keep the first.
            Some(record) => factories.insert(record.to_string()),
            None => true,
        })
        .map(|m| normalizer.normalize(m, &documentable))
        .collect();
    publics.sort_by_cached_key(|m| m.name.to_lowercase());

    let mut record = ModuleRecord::new(module.id.clone());
    record.doc = non_empty(module.meta.doc.clone()).map(|doc| correct_indent(&doc));
    record.author = non_empty(module.meta.author.clone());
    record.annotations = module
        .meta
        .annotations
        .iter()
        .filter(|(key, _)| !LOCATION_KEYS.contains(&key.as_str()))
        .filter(|(key, _)| !RECORD_KEYS.contains(&key.as_str()))
        .filter(|(_, value)| !is_empty_value(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    record.publics = publics;
    record
}
