//! Host backed by compiler-emitted symbol tables
//!
//! Each module is described by a `*.symbols.json` file, either on disk under
//! a source root or packaged inside a `.zip`/`.jar` archive:
//!
//! ```json
//! {
//!   "name": "net.http",
//!   "meta": { "doc": "HTTP client.", "author": "Ada" },
//!   "publics": [
//!     { "meta": { "name": "get", "file": "/src/net/http.strat", "line": 12,
//!                 "arglists": ["[url]"] },
//!       "value": { "kind": "function" } }
//!   ]
//! }
//! ```
//!
//! The module identifier is derived from the file's path relative to the
//! scanned directory (`net/http.symbols.json` is `net.http`). A declared
//! `name` must agree with it.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::{LoadedModule, Member, ModuleHost, ModuleId, ModuleMeta};
use crate::error::{HostError, LoadError};
use crate::text::slash_path;

/// File name suffix that marks a symbol table.
pub const SYMBOL_TABLE_SUFFIX: &str = ".symbols.json";

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    ArchiveEntry { archive: PathBuf, entry: String },
}

impl Location {
    fn describe(&self) -> String {
        match self {
            Self::File(path) => format!("'{}'", path.display()),
            Self::ArchiveEntry { archive, entry } => {
                format!("'{}' in '{}'", entry, archive.display())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SymbolTable {
    #[serde(default)]
    name: Option<ModuleId>,
    #[serde(default)]
    meta: ModuleMeta,
    #[serde(default)]
    publics: Vec<Member>,
}

/// Module host reading symbol tables from directories and archives.
///
/// Scanning records where each module lives; the first location seen for an
/// identifier wins, mirroring first-match resolution along a search path.
#[derive(Debug, Default)]
pub struct SymbolTableHost {
    index: HashMap<ModuleId, Location>,
}

impl SymbolTableHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, id: ModuleId, location: Location) -> ModuleId {
        self.index.entry(id.clone()).or_insert(location);
        id
    }

    fn read(location: &Location) -> Result<String, LoadError> {
        match location {
            Location::File(path) => fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            Location::ArchiveEntry { archive, entry } => {
                let archive_err = |source| LoadError::Archive {
                    archive: archive.clone(),
                    entry: entry.clone(),
                    source,
                };
                let file = File::open(archive).map_err(|source| LoadError::Io {
                    path: archive.clone(),
                    source,
                })?;
                let mut zip = zip::ZipArchive::new(file).map_err(archive_err)?;
                let mut zipped = zip.by_name(entry).map_err(archive_err)?;
                let mut contents = String::new();
                zipped
                    .read_to_string(&mut contents)
                    .map_err(|source| LoadError::Io {
                        path: archive.clone(),
                        source,
                    })?;
                Ok(contents)
            }
        }
    }
}

impl ModuleHost for SymbolTableHost {
    fn scan_directory(&mut self, dir: &Path) -> Result<Vec<ModuleId>, HostError> {
        let mut files = Vec::new();
        collect_symbol_tables(dir, &mut files)?;

        let mut ids = Vec::new();
        for file in files {
            let Some(relative) = file.strip_prefix(dir).ok().and_then(slash_path) else {
                continue;
            };
            if let Some(id) = module_id_for(&relative) {
                ids.push(self.record(id, Location::File(file)));
            }
        }

        debug!(dir = %dir.display(), modules = ids.len(), "scanned directory");
        Ok(ids)
    }

    fn scan_archive(&mut self, archive: &Path) -> Result<Vec<ModuleId>, HostError> {
        let file = File::open(archive).map_err(|source| HostError::Io {
            path: archive.to_path_buf(),
            source,
        })?;
        let zip = zip::ZipArchive::new(file).map_err(|source| HostError::Archive {
            path: archive.to_path_buf(),
            source,
        })?;

        let entries: Vec<(ModuleId, String)> = zip
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .filter_map(|name| module_id_for(name).map(|id| (id, name.to_string())))
            .collect();

        let ids: Vec<ModuleId> = entries
            .into_iter()
            .map(|(id, entry)| {
                let location = Location::ArchiveEntry {
                    archive: archive.to_path_buf(),
                    entry,
                };
                self.record(id, location)
            })
            .collect();

        debug!(archive = %archive.display(), modules = ids.len(), "scanned archive");
        Ok(ids)
    }

    fn load(&mut self, id: &ModuleId) -> Result<LoadedModule, LoadError> {
        let location = self
            .index
            .get(id)
            .ok_or_else(|| LoadError::UnknownModule(id.clone()))?;

        let contents = Self::read(location)?;
        let table: SymbolTable =
            serde_json::from_str(&contents).map_err(|source| LoadError::Malformed {
                location: location.describe(),
                source,
            })?;

        if let Some(declared) = table.name {
            if &declared != id {
                return Err(LoadError::NameMismatch {
                    location: location.describe(),
                    expected: id.clone(),
                    found: declared,
                });
            }
        }

        Ok(LoadedModule {
            id: id.clone(),
            meta: table.meta,
            publics: table.publics,
        })
    }
}

/// Recursively collect symbol table files, skipping hidden directories.
fn collect_symbol_tables(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), HostError> {
    let io_err = |source| HostError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if path.is_dir() {
            if !name.starts_with('.') {
                collect_symbol_tables(&path, files)?;
            }
        } else if name.ends_with(SYMBOL_TABLE_SUFFIX) {
            files.push(path);
        }
    }

    Ok(())
}

/// Map a `/`-separated relative symbol table path to its module identifier.
fn module_id_for(relative: &str) -> Option<ModuleId> {
    let stem = relative.strip_suffix(SYMBOL_TABLE_SUFFIX)?;
    if stem.is_empty() || stem.ends_with('/') || stem.split('/').any(str::is_empty) {
        return None;
    }
    Some(ModuleId::new(stem.replace('/', ".")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const TABLE: &str = r#"{
        "meta": { "doc": "Geometry helpers." },
        "publics": [
            { "meta": { "name": "area", "line": 3 }, "value": { "kind": "function" } }
        ]
    }"#;

    #[test]
    fn module_id_from_relative_path() {
        assert_eq!(
            module_id_for("net/http/client.symbols.json"),
            Some(ModuleId::new("net.http.client"))
        );
        assert_eq!(module_id_for("core.symbols.json"), Some(ModuleId::new("core")));
        assert_eq!(module_id_for("net/http.strat"), None);
        assert_eq!(module_id_for(".symbols.json"), None);
        assert_eq!(module_id_for("net//a.symbols.json"), None);
    }

    #[test]
    fn scan_directory_walks_nested_and_skips_hidden() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("geo/shapes")).unwrap();
        fs::create_dir_all(tmp.path().join(".cache")).unwrap();
        fs::write(tmp.path().join("geo/shapes/circle.symbols.json"), TABLE).unwrap();
        fs::write(tmp.path().join("geo/notes.txt"), "ignored").unwrap();
        fs::write(tmp.path().join(".cache/stale.symbols.json"), TABLE).unwrap();

        let mut host = SymbolTableHost::new();
        let ids = host.scan_directory(tmp.path()).unwrap();
        assert_eq!(ids, vec![ModuleId::new("geo.shapes.circle")]);
    }

    #[test]
    fn load_parses_scanned_module() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("geo.symbols.json"), TABLE).unwrap();

        let mut host = SymbolTableHost::new();
        host.scan_directory(tmp.path()).unwrap();
        let module = host.load(&ModuleId::new("geo")).unwrap();

        assert_eq!(module.meta.doc.as_deref(), Some("Geometry helpers."));
        assert_eq!(module.publics.len(), 1);
        assert_eq!(module.publics[0].name(), "area");
    }

    #[test]
    fn load_before_scan_is_unknown() {
        let mut host = SymbolTableHost::new();
        let err = host.load(&ModuleId::new("geo")).unwrap_err();
        assert!(matches!(err, LoadError::UnknownModule(_)));
    }

    #[test]
    fn malformed_table_is_a_load_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.symbols.json"), "{ not json").unwrap();

        let mut host = SymbolTableHost::new();
        host.scan_directory(tmp.path()).unwrap();
        let err = host.load(&ModuleId::new("broken")).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[test]
    fn declared_name_must_match_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("geo.symbols.json"),
            r#"{ "name": "geometry", "publics": [] }"#,
        )
        .unwrap();

        let mut host = SymbolTableHost::new();
        host.scan_directory(tmp.path()).unwrap();
        let err = host.load(&ModuleId::new("geo")).unwrap_err();
        assert!(matches!(err, LoadError::NameMismatch { .. }));
    }

    #[test]
    fn scan_and_load_from_archive() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("geo.jar");
        let mut writer = zip::ZipWriter::new(File::create(&archive).unwrap());
        let options = zip::write::SimpleFileOptions::default();
        writer.add_directory("geo/", options).unwrap();
        writer.start_file("geo/shapes.symbols.json", options).unwrap();
        writer.write_all(TABLE.as_bytes()).unwrap();
        writer.start_file("META-INF/MANIFEST.MF", options).unwrap();
        writer.write_all(b"Manifest-Version: 1.0\n").unwrap();
        writer.finish().unwrap();

        let mut host = SymbolTableHost::new();
        let ids = host.scan_archive(&archive).unwrap();
        assert_eq!(ids, vec![ModuleId::new("geo.shapes")]);

        let module = host.load(&ids[0]).unwrap();
        assert_eq!(module.publics[0].name(), "area");
    }

    #[test]
    fn first_scanned_location_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("geo.symbols.json"), TABLE).unwrap();
        fs::write(
            second.path().join("geo.symbols.json"),
            r#"{ "meta": { "doc": "Shadowed." } }"#,
        )
        .unwrap();

        let mut host = SymbolTableHost::new();
        host.scan_directory(first.path()).unwrap();
        host.scan_directory(second.path()).unwrap();
        let module = host.load(&ModuleId::new("geo")).unwrap();
        assert_eq!(module.meta.doc.as_deref(), Some("Geometry helpers."));
    }
}
