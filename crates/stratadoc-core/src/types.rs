//! Types for representing extracted documentation metadata
//!
//! These records are the output schema handed to renderers. Absent fields are
//! never serialized, and empty member lists are omitted.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host::{Deprecation, ModuleId};

/// Kind of documented member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// Ordinary function or data value
    Value,
    /// Compile-time transformation construct
    Macro,
    /// Function dispatching on a runtime dispatch value
    Multimethod,
    /// Polymorphic interface definition
    Protocol,
}

impl MemberKind {
    /// Get the schema name for the member kind
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Value => "value",
            MemberKind::Macro => "macro",
            MemberKind::Multimethod => "multimethod",
            MemberKind::Protocol => "protocol",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Normalized metadata for one public member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MemberRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arglists: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(rename = "type")]
    pub kind: MemberKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_sig: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dynamic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_format: Option<String>,
    /// Methods owned by a protocol, empty for every other kind
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberRecord>,
}

impl MemberRecord {
    /// Create a record carrying only the required fields
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            file: None,
            line: None,
            arglists: None,
            doc: None,
            kind,
            type_sig: None,
            dynamic: false,
            added: None,
            deprecated: None,
            doc_format: None,
            members: Vec::new(),
        }
    }
}

/// Documentation metadata for a complete module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub name: ModuleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Other declared annotations, passed through as-is
    #[serde(flatten)]
    pub annotations: BTreeMap<String, Value>,
    /// Public members sorted case-insensitively by name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publics: Vec<MemberRecord>,
}

impl ModuleRecord {
    pub fn new(name: ModuleId) -> Self {
        Self {
            name,
            doc: None,
            author: None,
            annotations: BTreeMap::new(),
            publics: Vec::new(),
        }
    }

    /// Find a top-level public member by name
    pub fn public(&self, name: &str) -> Option<&MemberRecord> {
        self.publics.iter().find(|m| m.name == name)
    }

    /// Get all protocols
    pub fn protocols(&self) -> impl Iterator<Item = &MemberRecord> {
        self.publics
            .iter()
            .filter(|m| m.kind == MemberKind::Protocol)
    }
}
