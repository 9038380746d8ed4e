//! `stratadoc.toml` configuration
//!
//! ```toml
//! [extract]
//! source-paths = ["src", "lib/vendor.jar"]
//! include = ["net.*"]
//! exclude = ["*.internal"]
//!
//! [output]
//! path = "target/doc-meta.json"
//! pretty = true
//! ```

use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::host::ModuleId;

/// The config filename looked up in the working directory.
pub const CONFIG_FILE: &str = "stratadoc.toml";

/// Source root used when none is configured.
pub const DEFAULT_SOURCE_PATH: &str = "src";

/// The complete configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// What to extract.
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Where to write the result.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Extraction section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ExtractConfig {
    /// Directories and archives to scan, in order.
    #[serde(default = "default_source_paths")]
    pub source_paths: Vec<PathBuf>,

    /// Glob patterns over module ids; when non-empty only matches are kept.
    #[serde(default)]
    pub include: Vec<String>,

    /// Glob patterns over module ids to leave out.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            source_paths: default_source_paths(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

fn default_source_paths() -> Vec<PathBuf> {
    vec![PathBuf::from(DEFAULT_SOURCE_PATH)]
}

/// Output section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// File to write; standard output when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[serde(default)]
    pub pretty: bool,
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file, resolving relative paths against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Make every relative path in the config relative to `base` instead.
    pub fn resolve_paths(&mut self, base: &Path) {
        for source in &mut self.extract.source_paths {
            if source.is_relative() {
                *source = base.join(&*source);
            }
        }
        if let Some(output) = &mut self.output.path {
            if output.is_relative() {
                *output = base.join(&*output);
            }
        }
    }

    /// Compile the include and exclude patterns.
    pub fn module_filter(&self) -> Result<ModuleFilter, ConfigError> {
        ModuleFilter::new(&self.extract.include, &self.extract.exclude)
    }
}

/// Module-level include/exclude filter over module ids.
#[derive(Debug, Clone, Default)]
pub struct ModuleFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl ModuleFilter {
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, ConfigError> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Whether the module with `id` should be extracted.
    pub fn allows(&self, id: &ModuleId) -> bool {
        let id = id.as_str();
        let included = self.include.is_empty() || self.include.iter().any(|p| p.matches(id));
        included && !self.exclude.iter().any(|p| p.matches(id))
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            Pattern::new(pattern).map_err(|source| ConfigError::Pattern {
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.extract.source_paths, vec![PathBuf::from("src")]);
        assert!(config.output.path.is_none());
        assert!(!config.output.pretty);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[extract]
source-paths = ["src", "vendor/geo.jar"]
include = ["geo.*"]
exclude = ["geo.internal"]

[output]
path = "out/meta.json"
pretty = true
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.extract.source_paths.len(), 2);
        assert_eq!(config.extract.include, vec!["geo.*"]);
        assert_eq!(config.output.path, Some(PathBuf::from("out/meta.json")));
        assert!(config.output.pretty);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::parse("[extract]\nsources = [\"src\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_resolves_relative_paths() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "[extract]\nsource-paths = [\"src\", \"/abs/lib\"]\n[output]\npath = \"meta.json\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.extract.source_paths,
            vec![tmp.path().join("src"), PathBuf::from("/abs/lib")]
        );
        assert_eq!(config.output.path, Some(tmp.path().join("meta.json")));
    }

    #[test]
    fn filter_include_and_exclude() {
        let filter = ModuleFilter::new(&["geo.*"], &["*.internal"]).unwrap();
        assert!(filter.allows(&ModuleId::new("geo.shapes")));
        assert!(!filter.allows(&ModuleId::new("geo.internal")));
        assert!(!filter.allows(&ModuleId::new("net.http")));
    }

    #[test]
    fn empty_filter_allows_everything() {
        let filter = ModuleFilter::default();
        assert!(filter.allows(&ModuleId::new("anything")));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = ModuleFilter::new(&["geo.[", ""], &[]).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { ref pattern, .. } if pattern == "geo.["));
    }
}
