//! File discovery and plain-text reads: the thin input adapter.
//!
//! Discovery walks a directory recursively and filters by extension and
//! size. Reads are lossy UTF-8; anything unreadable or unsupported becomes
//! an empty string plus a warning, so a bad file never takes down a batch.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

use chronolex_core::config::InputConfig;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot access {}: {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type: {}", .0.display())]
    Unsupported(PathBuf),
}

/// Finds and reads processable documents under a directory.
pub struct DocumentSource {
    /// Accepted extensions, lowercased, with leading dot.
    extensions: Vec<String>,
    max_file_size: u64,
}

impl DocumentSource {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            extensions: config.extensions.iter().map(|e| e.to_lowercase()).collect(),
            max_file_size: config.max_file_size_bytes(),
        }
    }

    /// Recursively collect processable files in deterministic path order.
    ///
    /// Oversized and unreadable entries are warned about and skipped; the
    /// walk itself never fails.
    pub fn discover(&self, directory: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkDir::new(directory) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(%error, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.supported(entry.path()) {
                continue;
            }
            match entry.metadata() {
                Ok(meta) if meta.len() <= self.max_file_size => {
                    files.push(entry.path().to_path_buf());
                }
                Ok(_) => warn!(path = %entry.path().display(), "skipping oversized file"),
                Err(error) => {
                    warn!(path = %entry.path().display(), %error, "cannot stat file");
                }
            }
        }
        files.sort();
        files
    }

    /// Read a document as plain text.
    ///
    /// Unsupported or corrupt input reads as an empty string (the pipeline
    /// then yields zero events for it); invalid UTF-8 is replaced, not
    /// rejected.
    pub fn read_content(&self, path: &Path) -> String {
        match self.try_read(path) {
            Ok(text) => text,
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to read document");
                String::new()
            }
        }
    }

    fn try_read(&self, path: &Path) -> Result<String, InputError> {
        if !self.supported(path) {
            return Err(InputError::Unsupported(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|source| InputError::Access {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let dotted = format!(".{}", ext.to_lowercase());
                self.extensions.contains(&dotted)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn source() -> DocumentSource {
        DocumentSource::new(&InputConfig::default())
    }

    #[test]
    fn discovers_supported_files_recursively_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.txt"), "beta").unwrap();
        fs::write(dir.path().join("sub/a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("scan.pdf"), "%PDF-").unwrap();

        let files = source().discover(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("b.txt"));
        assert!(files[1].ends_with("sub/a.txt"));
    }

    #[test]
    fn skips_oversized_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = InputConfig {
            extensions: vec![".txt".into()],
            max_file_size_mb: 0,
        };
        fs::write(dir.path().join("big.txt"), "over the zero-byte limit").unwrap();

        let files = DocumentSource::new(&config).discover(dir.path());
        assert!(files.is_empty());
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("DEED.TXT"), "text").unwrap();
        assert_eq!(source().discover(dir.path()).len(), 1);
    }

    #[test]
    fn reads_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deed.txt");
        fs::write(&path, "The lease was executed on March 11, 1921.").unwrap();
        assert_eq!(
            source().read_content(&path),
            "The lease was executed on March 11, 1921."
        );
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deed.txt");
        fs::write(&path, [b'o', b'k', 0xFF, b'!']).unwrap();
        let text = source().read_content(&path);
        assert!(text.starts_with("ok"));
        assert!(text.ends_with('!'));
    }

    #[test]
    fn unsupported_extension_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        fs::write(&path, "%PDF-1.4").unwrap();
        assert_eq!(source().read_content(&path), "");
    }

    #[test]
    fn missing_file_reads_as_empty() {
        assert_eq!(source().read_content(Path::new("/no/such/file.txt")), "");
    }
}
