//! Source root scanning
//!
//! Decides whether a path is a directory or a packaged archive and asks the
//! host for the modules it contains. The returned order carries no meaning.

use std::path::Path;

use tracing::{debug, warn};

use crate::host::{ModuleHost, ModuleId};

/// File extensions recognized as module archives.
pub const ARCHIVE_EXTENSIONS: [&str; 2] = ["jar", "zip"];

/// Whether `path` is a file with a recognized archive extension.
pub fn is_archive(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ARCHIVE_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
}

/// Enumerate the modules under `path`.
///
/// Returns `None` when `path` is neither a directory nor an archive. A scan
/// target the host cannot read contributes no modules.
pub fn scan<H>(host: &mut H, path: &Path) -> Option<Vec<ModuleId>>
where
    H: ModuleHost + ?Sized,
{
    let result = if path.is_dir() {
        host.scan_directory(path)
    } else if is_archive(path) {
        host.scan_archive(path)
    } else {
        debug!(path = %path.display(), "not a directory or archive, skipping");
        return None;
    };

    match result {
        Ok(ids) => Some(ids),
        Err(error) => {
            warn!(path = %path.display(), error = %error, "failed to scan source root");
            Some(Vec::new())
        }
    }
}
