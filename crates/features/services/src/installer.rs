//! # Client library installer
//!
//! Fetching and caching belong to an [`ArtifactFetcher`] supplied by the caller. The installer
//! decides what is missing from the library directory and how each fetched artifact lands there.

use crate::bindings::BindingRegistry;
use crate::error::{BindingError, BindingErrorExt, FetchError};
use crate::uris::UriCatalog;
use bindery_domain::constants::LIBRARY_EXTENSION;
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

/// What a fetched file is, which decides how it is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Archive whose library files are all installed.
    Archive,
    /// A single library file.
    Library,
    /// Archive-typed download holding exactly one artifact; installed as is.
    SingleArtifactArchive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

/// Download and cache layer.
pub trait ArtifactFetcher {
    /// Returns a local copy of `url`.
    ///
    /// # Errors
    /// [`FetchError::Unavailable`] when the artifact cannot be obtained.
    fn fetch(&self, url: &str) -> Result<FetchedArtifact, FetchError>;

    /// Unpacks `archive` into the directory `into`.
    ///
    /// # Errors
    /// [`FetchError::Extract`] when the archive cannot be unpacked.
    fn extract(&self, archive: &Path, into: &Path) -> Result<(), FetchError>;
}

/// File names in `dir` (top level only) carrying `extension`, sorted. A missing directory has none.
///
/// # Errors
/// Returns [`BindingError::Io`] if the directory exists but cannot be read.
pub fn installed_libraries(dir: &Path, extension: &str) -> Result<Vec<String>, BindingError> {
    let mut names = file_names(dir)?;
    names.retain(|name| has_extension(Path::new(name), extension));
    Ok(names)
}

fn file_names(dir: &Path) -> Result<Vec<String>, BindingError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).context(format!("Failed to list {}", dir.display())),
    };

    let mut names = Vec::new();
    for entry in entries {
        let path = entry.context(format!("Failed to list {}", dir.display()))?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(OsStr::to_str) {
            names.push(name.to_owned());
        }
    }
    names.sort_unstable();
    Ok(names)
}

/// Installs every client library the eligible bindings still need into one directory.
#[derive(Debug, Clone)]
pub struct ClientLibraryInstaller {
    lib_dir: PathBuf,
    extension: String,
}

impl ClientLibraryInstaller {
    #[must_use]
    pub fn new(lib_dir: impl Into<PathBuf>) -> Self {
        Self { lib_dir: lib_dir.into(), extension: LIBRARY_EXTENSION.to_owned() }
    }

    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    #[must_use]
    pub fn lib_dir(&self) -> &Path {
        &self.lib_dir
    }

    /// Fetches the missing libraries and places them in the library directory.
    ///
    /// URLs whose trailing path segment names a file already in the directory are skipped, so an
    /// archive URL is fetched again on every run. Returns the paths written.
    ///
    /// # Errors
    /// Fetch, extraction and filesystem failures are returned as is.
    #[instrument(skip_all, fields(lib_dir = %self.lib_dir.display()))]
    pub fn install(
        &self,
        registry: &BindingRegistry,
        uris: &UriCatalog,
        fetcher: &dyn ArtifactFetcher,
    ) -> Result<Vec<PathBuf>, BindingError> {
        let mut installed = file_names(&self.lib_dir)?;
        let urls = registry.required_client_library_urls(&installed, uris);
        if urls.is_empty() {
            debug!("No client libraries to install");
            return Ok(Vec::new());
        }

        fs::create_dir_all(&self.lib_dir)
            .context(format!("Failed to create {}", self.lib_dir.display()))?;

        let mut written = Vec::new();
        for url in &urls {
            let Some(segment) = trailing_segment(url) else {
                warn!(url, "Client library URL has no file name, skipping");
                continue;
            };
            if installed.iter().any(|name| name == segment) {
                debug!(url, "Client library already installed");
                continue;
            }

            let artifact = fetcher.fetch(url).context(format!("Failed to fetch {url}"))?;
            let placed = match artifact.kind {
                ArtifactKind::Archive => self.install_archive(&artifact.path, fetcher, url)?,
                ArtifactKind::Library | ArtifactKind::SingleArtifactArchive => {
                    let target = self.lib_dir.join(segment);
                    fs::copy(&artifact.path, &target)
                        .context(format!("Failed to copy {} into place", artifact.path.display()))?;
                    vec![target]
                },
            };

            installed.push(segment.to_owned());
            for path in &placed {
                if let Some(name) = path.file_name().and_then(OsStr::to_str) {
                    installed.push(name.to_owned());
                }
            }
            written.extend(placed);
        }

        info!(count = written.len(), "Client libraries installed");
        Ok(written)
    }

    fn install_archive(
        &self,
        archive: &Path,
        fetcher: &dyn ArtifactFetcher,
        url: &str,
    ) -> Result<Vec<PathBuf>, BindingError> {
        let scratch = tempfile::Builder::new()
            .prefix("bindery-extract-")
            .tempdir()
            .context("Failed to create extraction directory")?;
        fetcher.extract(archive, scratch.path()).context(format!("Failed to extract {url}"))?;

        let mut moved = Vec::new();
        for entry in WalkDir::new(scratch.path()) {
            let entry = entry
                .map_err(std::io::Error::from)
                .context(format!("Failed to walk archive of {url}"))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !has_extension(path, &self.extension) {
                continue;
            }
            let Some(name) = path.file_name() else { continue };
            let target = self.lib_dir.join(name);
            move_file(path, &target)?;
            moved.push(target);
        }

        if moved.is_empty() {
            warn!(url, "Archive contained no client libraries");
        }
        Ok(moved)
    }
}

fn move_file(from: &Path, to: &Path) -> Result<(), BindingError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to).context(format!("Failed to move {} into place", from.display()))?;
    fs::remove_file(from).context(format!("Failed to remove {}", from.display()))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(OsStr::to_str).is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Last non-empty path segment of a URL, ignoring any query or fragment.
fn trailing_segment(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/').rsplit('/').next().filter(|s| !s.is_empty() && !s.contains(':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_segment() {
        assert_eq!(trailing_segment("https://repo/x/driver-1.0.jar"), Some("driver-1.0.jar"));
        assert_eq!(trailing_segment("https://repo/x/bundle.zip?sig=1#top"), Some("bundle.zip"));
        assert_eq!(trailing_segment("https://repo/x/dir/"), Some("dir"));
        assert_eq!(trailing_segment("https://"), None);
        assert_eq!(trailing_segment(""), None);
    }

    #[test]
    fn test_installed_libraries_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.jar"), b"").unwrap();
        fs::write(dir.path().join("a.JAR"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("nested.jar")).unwrap();

        let names = installed_libraries(dir.path(), "jar").unwrap();
        assert_eq!(names, vec!["a.JAR", "b.jar"]);
    }

    #[test]
    fn test_missing_directory_has_no_libraries() {
        let dir = tempfile::tempdir().unwrap();
        assert!(installed_libraries(&dir.path().join("lib"), "jar").unwrap().is_empty());
    }
}
