//! In-memory module host for embedders and tests

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{LoadedModule, ModuleHost, ModuleId};
use crate::error::{HostError, LoadError};

/// A host whose modules are registered programmatically.
///
/// Modules are registered under a scan target path. The extractor still
/// checks the real filesystem to decide whether a root is a directory or an
/// archive, so those paths should exist.
#[derive(Debug, Default)]
pub struct MemoryHost {
    targets: HashMap<PathBuf, Vec<ModuleId>>,
    modules: HashMap<ModuleId, Result<LoadedModule, String>>,
    loads: Vec<ModuleId>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module discoverable under `target`.
    pub fn add_module(&mut self, target: impl Into<PathBuf>, module: LoadedModule) {
        let id = module.id.clone();
        self.register(target.into(), id.clone());
        self.modules.insert(id, Ok(module));
    }

    /// Register a module whose load fails with `message`.
    pub fn add_failing_module(
        &mut self,
        target: impl Into<PathBuf>,
        id: impl Into<ModuleId>,
        message: impl Into<String>,
    ) {
        let id = id.into();
        self.register(target.into(), id.clone());
        self.modules.insert(id, Err(message.into()));
    }

    /// Every module id passed to [`ModuleHost::load`], in call order.
    pub fn loads(&self) -> &[ModuleId] {
        &self.loads
    }

    fn register(&mut self, target: PathBuf, id: ModuleId) {
        let ids = self.targets.entry(target).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    fn scan(&self, target: &Path) -> Vec<ModuleId> {
        self.targets.get(target).cloned().unwrap_or_default()
    }
}

impl ModuleHost for MemoryHost {
    fn scan_directory(&mut self, dir: &Path) -> Result<Vec<ModuleId>, HostError> {
        Ok(self.scan(dir))
    }

    fn scan_archive(&mut self, archive: &Path) -> Result<Vec<ModuleId>, HostError> {
        Ok(self.scan(archive))
    }

    fn load(&mut self, id: &ModuleId) -> Result<LoadedModule, LoadError> {
        self.loads.push(id.clone());
        match self.modules.get(id) {
            Some(Ok(module)) => Ok(module.clone()),
            Some(Err(message)) => Err(LoadError::Failed(message.clone())),
            None => Err(LoadError::UnknownModule(id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_returns_registered_modules() {
        let mut host = MemoryHost::new();
        host.add_module("/src", LoadedModule::new("a"));
        host.add_failing_module("/src", "b", "boom");

        let ids = host.scan_directory(Path::new("/src")).unwrap();
        assert_eq!(ids, vec![ModuleId::new("a"), ModuleId::new("b")]);
        assert!(host.scan_directory(Path::new("/other")).unwrap().is_empty());
    }

    #[test]
    fn load_reports_failures_and_records_calls() {
        let mut host = MemoryHost::new();
        host.add_failing_module("/src", "b", "boom");

        let err = host.load(&ModuleId::new("b")).unwrap_err();
        assert!(matches!(err, LoadError::Failed(ref m) if m == "boom"));

        let err = host.load(&ModuleId::new("missing")).unwrap_err();
        assert!(matches!(err, LoadError::UnknownModule(_)));

        assert_eq!(host.loads().len(), 2);
    }
}
