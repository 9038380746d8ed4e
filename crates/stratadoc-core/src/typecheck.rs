//! Optional type signature enrichment
//!
//! Type checking runs in two explicit phases: a whole-module precheck that
//! produces a [`TypeTable`], then a per-member lookup against that table.

use std::collections::HashMap;

use crate::host::LoadedModule;

/// Outcome of checking a single member
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeCheckResult {
    /// Inferred type, if the checker produced one
    pub inferred: Option<String>,
    /// Errors reported for the member
    pub errors: Vec<String>,
}

impl TypeCheckResult {
    pub fn inferred(ty: impl Into<String>) -> Self {
        Self {
            inferred: Some(ty.into()),
            errors: Vec::new(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            inferred: None,
            errors: vec![error.into()],
        }
    }

    /// The signature to publish; only error-free results contribute one.
    pub fn type_sig(&self) -> Option<&str> {
        if self.errors.is_empty() {
            self.inferred.as_deref()
        } else {
            None
        }
    }
}

/// Per-member results of a module precheck, keyed by member name
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    results: HashMap<String, TypeCheckResult>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, member: impl Into<String>, result: TypeCheckResult) {
        self.results.insert(member.into(), result);
    }

    pub fn lookup(&self, member: &str) -> Option<&TypeCheckResult> {
        self.results.get(member)
    }

    /// Published signature for `member`, if it checked cleanly.
    pub fn type_sig(&self, member: &str) -> Option<&str> {
        self.lookup(member).and_then(TypeCheckResult::type_sig)
    }
}

/// A type inference collaborator
pub trait TypeChecker {
    /// Check a whole module once, before its members are extracted.
    fn precheck_module(&self, module: &LoadedModule) -> TypeTable;
}

/// Checker that trusts the `type` annotations embedded in member metadata.
///
/// Members without an annotation get no entry; a blank annotation is
/// reported as an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticTypeChecker;

impl TypeChecker for StaticTypeChecker {
    fn precheck_module(&self, module: &LoadedModule) -> TypeTable {
        let mut table = TypeTable::new();
        for member in &module.publics {
            let Some(hint) = &member.meta.type_hint else {
                continue;
            };
            let result = if hint.trim().is_empty() {
                TypeCheckResult::failed(format!("empty type annotation on '{}'", member.name()))
            } else {
                TypeCheckResult::inferred(hint.trim())
            };
            table.insert(member.name(), result);
        }
        table
    }
}
