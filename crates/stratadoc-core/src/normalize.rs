//! Member metadata normalization
//!
//! Turns a member's raw host metadata into a [`MemberRecord`]: generated
//! record factories are renamed, only recognized fields are kept, docs are
//! reindented, file paths are made root-relative, and the kind, type
//! signature and protocol methods are attached. Fields are only set when the
//! source value is present and non-empty.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::classify::classify;
use crate::grouping::protocol_methods;
use crate::host::{Member, MemberId, ModuleId};
use crate::text::{correct_indent, non_empty, relativize};
use crate::typecheck::TypeTable;
use crate::types::{MemberKind, MemberRecord};

static FACTORY_NAME: OnceLock<Option<Regex>> = OnceLock::new();

/// Record name for a generated factory function such as `->Point` or
/// `map->Point`.
pub fn factory_record_name(name: &str) -> Option<&str> {
    let pattern = FACTORY_NAME
        .get_or_init(|| Regex::new(r"^(?:map)?->(\p{Lu}.*)$").ok())
        .as_ref()?;
    Some(pattern.captures(name)?.get(1)?.as_str())
}

/// Normalizes the members of one module
pub struct Normalizer<'a> {
    module: &'a ModuleId,
    roots: &'a [PathBuf],
    types: Option<&'a TypeTable>,
}

impl<'a> Normalizer<'a> {
    /// Create a normalizer; `roots` are tried in order when relativizing files.
    pub fn new(module: &'a ModuleId, roots: &'a [PathBuf]) -> Self {
        Self {
            module,
            roots,
            types: None,
        }
    }

    /// Attach the module's precheck results.
    pub fn with_types(mut self, types: Option<&'a TypeTable>) -> Self {
        self.types = types;
        self
    }

    /// Normalize `member`. Protocol methods are drawn from `candidates`.
    pub fn normalize(&self, member: &Member, candidates: &[&Member]) -> MemberRecord {
        self.normalize_within(member, candidates, &mut Vec::new())
    }

    fn normalize_within(
        &self,
        member: &Member,
        candidates: &[&Member],
        ancestors: &mut Vec<MemberId>,
    ) -> MemberRecord {
        let meta = &member.meta;
        let kind = classify(member);

        // A factory defers to the record's own documentation.
        let (name, doc, arglists) = match factory_record_name(&meta.name) {
            Some(record) => (record.to_string(), None, None),
            None => (meta.name.clone(), meta.doc.clone(), meta.arglists.clone()),
        };

        let mut record = MemberRecord::new(name, kind);
        record.file = non_empty(meta.file.clone()).map(|file| relativize(&file, self.roots));
        record.line = meta.line;
        record.arglists = arglists.filter(|lists| !lists.is_empty());
        record.doc = non_empty(doc).map(|doc| correct_indent(&doc));
        record.dynamic = meta.dynamic;
        record.added = non_empty(meta.added.clone());
        record.deprecated = meta.deprecated.clone().filter(|d| !d.is_empty());
        record.doc_format = non_empty(meta.doc_format.clone());
        record.type_sig = self
            .types
            .and_then(|types| types.type_sig(&meta.name))
            .map(str::to_string);

        if kind == MemberKind::Protocol {
            let id = member.id(self.module);
            if !ancestors.contains(&id) {
                let mut methods = protocol_methods(&id, candidates);
                methods.sort_by_cached_key(|m| m.name().to_lowercase());

                ancestors.push(id);
                record.members = methods
                    .into_iter()
                    .map(|m| self.normalize_within(m, candidates, ancestors))
                    .collect();
                ancestors.pop();
            }
        }

        record
    }
}
