//! Module introspection capability
//!
//! The extractor never reads source text. It asks a [`ModuleHost`] to
//! enumerate the modules under a directory or archive, and to load a module
//! by identifier, exposing its public members with their raw metadata and a
//! description of each member's live value.

mod memory;
mod symbols;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HostError, LoadError};

pub use memory::MemoryHost;
pub use symbols::{SymbolTableHost, SYMBOL_TABLE_SUFFIX};

/// A host capable of discovering and loading modules.
///
/// Identifiers returned by the scan operations must be accepted by
/// [`ModuleHost::load`] for the lifetime of the host.
pub trait ModuleHost {
    /// Enumerate every module discoverable under `dir`.
    fn scan_directory(&mut self, dir: &Path) -> Result<Vec<ModuleId>, HostError>;

    /// Enumerate every module packaged in the archive at `archive`.
    fn scan_archive(&mut self, archive: &Path) -> Result<Vec<ModuleId>, HostError>;

    /// Load a module, making its public members available.
    fn load(&mut self, id: &ModuleId) -> Result<LoadedModule, LoadError>;
}

/// Dotted module identifier such as `net.http.client`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Fully qualified member reference, written `module/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId {
    pub module: ModuleId,
    pub name: String,
}

impl MemberId {
    pub fn new(module: impl Into<ModuleId>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.module, self.name)
    }
}

impl FromStr for MemberId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Module ids never contain '/', so the first one separates the name,
        // which keeps a member literally named "/" intact.
        match s.split_once('/') {
            Some((module, name)) if !module.is_empty() && !name.is_empty() => {
                Ok(Self::new(ModuleId::new(module), name))
            }
            _ => Err(format!("expected a qualified 'module/name' reference, got '{s}'")),
        }
    }
}

impl TryFrom<String> for MemberId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.to_string()
    }
}

/// Deprecation marker: either a bare flag or the version that deprecated the member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Deprecation {
    Flag(bool),
    Since(String),
}

impl Deprecation {
    /// Whether this marker carries no information and should be dropped.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flag(flag) => !flag,
            Self::Since(version) => version.trim().is_empty(),
        }
    }
}

/// Raw metadata attached to a public member, as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MemberMeta {
    pub name: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub arglists: Option<Vec<String>>,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default)]
    pub added: Option<String>,
    #[serde(default)]
    pub deprecated: Option<Deprecation>,
    #[serde(default)]
    pub doc_format: Option<String>,
    /// Set on compile-time transformation constructs.
    #[serde(default, rename = "macro")]
    pub is_macro: bool,
    #[serde(default)]
    pub no_doc: bool,
    #[serde(default)]
    pub skip_wiki: bool,
    /// Owning protocol, for members that are protocol methods.
    #[serde(default)]
    pub protocol: Option<MemberId>,
    /// Declared type annotation, read by the static type checker.
    #[serde(default, rename = "type")]
    pub type_hint: Option<String>,
    /// Any other annotations the host attached.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl MemberMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether the member opted out of documentation.
    pub fn is_no_doc(&self) -> bool {
        self.no_doc || self.skip_wiki
    }
}

/// Description of a member's live value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RuntimeValue {
    Function,
    /// A multiple-dispatch function.
    MultiFn,
    /// A map-like value; protocol descriptors are unsorted maps carrying
    /// an `on-interface` key.
    Map {
        #[serde(default)]
        sorted: bool,
        #[serde(default)]
        keys: Vec<String>,
    },
    #[default]
    Other,
}

impl RuntimeValue {
    /// Key under which a protocol descriptor records its implementation handle.
    pub const INTERFACE_KEY: &'static str = "on-interface";

    /// A descriptor value for a protocol.
    pub fn protocol_descriptor() -> Self {
        Self::Map {
            sorted: false,
            keys: vec![
                "on".to_string(),
                Self::INTERFACE_KEY.to_string(),
                "sigs".to_string(),
            ],
        }
    }
}

/// A public member of a loaded module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub meta: MemberMeta,
    #[serde(default)]
    pub value: RuntimeValue,
}

impl Member {
    pub fn new(meta: MemberMeta, value: RuntimeValue) -> Self {
        Self { meta, value }
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Qualified reference to this member within `module`.
    pub fn id(&self, module: &ModuleId) -> MemberId {
        MemberId::new(module.clone(), self.meta.name.clone())
    }
}

/// Module-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleMeta {
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub no_doc: bool,
    #[serde(default)]
    pub skip_wiki: bool,
    /// Declared annotations, including location keys the extractor drops.
    #[serde(flatten)]
    pub annotations: BTreeMap<String, Value>,
}

impl ModuleMeta {
    /// Whether the module opted out of documentation.
    pub fn is_no_doc(&self) -> bool {
        self.no_doc || self.skip_wiki
    }
}

/// A module after a successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModule {
    pub id: ModuleId,
    pub meta: ModuleMeta,
    /// Public members in host enumeration order.
    pub publics: Vec<Member>,
}

impl LoadedModule {
    pub fn new(id: impl Into<ModuleId>) -> Self {
        Self {
            id: id.into(),
            meta: ModuleMeta::default(),
            publics: Vec::new(),
        }
    }

    pub fn with_meta(mut self, meta: ModuleMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.publics.push(member);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_parses_qualified_reference() {
        let id: MemberId = "net.http/Handler".parse().unwrap();
        assert_eq!(id.module.as_str(), "net.http");
        assert_eq!(id.name, "Handler");
        assert_eq!(id.to_string(), "net.http/Handler");
    }

    #[test]
    fn member_id_keeps_slash_name() {
        let id: MemberId = "core.math//".parse().unwrap();
        assert_eq!(id.module.as_str(), "core.math");
        assert_eq!(id.name, "/");
    }

    #[test]
    fn member_id_rejects_unqualified_name() {
        assert!("Handler".parse::<MemberId>().is_err());
        assert!("/Handler".parse::<MemberId>().is_err());
    }

    #[test]
    fn member_meta_deserializes_kebab_case_and_extras() {
        let meta: MemberMeta = serde_json::from_value(serde_json::json!({
            "name": "render",
            "doc-format": "markdown",
            "macro": true,
            "protocol": "ui.view/View",
            "since-build": 42
        }))
        .unwrap();

        assert_eq!(meta.doc_format.as_deref(), Some("markdown"));
        assert!(meta.is_macro);
        assert_eq!(meta.protocol, Some(MemberId::new("ui.view", "View")));
        assert_eq!(meta.extra.get("since-build"), Some(&serde_json::json!(42)));
    }

    #[test]
    fn runtime_value_defaults_to_other() {
        let member: Member = serde_json::from_value(serde_json::json!({
            "meta": { "name": "x" }
        }))
        .unwrap();
        assert_eq!(member.value, RuntimeValue::Other);
    }

    #[test]
    fn deprecation_accepts_flag_or_version() {
        let flag: Deprecation = serde_json::from_value(serde_json::json!(true)).unwrap();
        let since: Deprecation = serde_json::from_value(serde_json::json!("1.2")).unwrap();
        assert_eq!(flag, Deprecation::Flag(true));
        assert_eq!(since, Deprecation::Since("1.2".to_string()));
        assert!(Deprecation::Flag(false).is_empty());
    }
}
