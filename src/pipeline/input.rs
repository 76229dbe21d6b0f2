//! Input resolution: turn the user's file path / URL pair into something the
//! OCR service can analyse.
//!
//! The checks here run before any client is built, so a missing file never
//! costs a network round trip.

use crate::error::DocIntelError;
use crate::pipeline::ocr::DocumentSource;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A validated document to analyse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentInput {
    /// A file that existed when the input was resolved.
    Local(PathBuf),
    /// A publicly reachable document the service fetches itself.
    Remote(String),
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

impl DocumentInput {
    /// Resolve an optional file path and optional URL.
    ///
    /// The file path wins when both are given. Empty strings count as absent.
    pub fn from_parts(
        file_path: Option<&str>,
        doc_url: Option<&str>,
    ) -> Result<Self, DocIntelError> {
        let file_path = file_path.filter(|s| !s.is_empty());
        let doc_url = doc_url.filter(|s| !s.is_empty());

        match (file_path, doc_url) {
            (Some(path), _) => Self::local(path),
            (None, Some(url)) => Ok(DocumentInput::Remote(url.to_string())),
            (None, None) => Err(DocIntelError::MissingInput),
        }
    }

    /// Resolve a single string that is either a URL or a local path.
    pub fn parse(input: &str) -> Result<Self, DocIntelError> {
        if is_url(input) {
            Self::from_parts(None, Some(input))
        } else {
            Self::from_parts(Some(input), None)
        }
    }

    fn local(path_str: &str) -> Result<Self, DocIntelError> {
        let path = PathBuf::from(path_str);
        if !path.is_file() {
            return Err(DocIntelError::FileNotFound { path });
        }
        debug!("Resolved local document: {}", path.display());
        Ok(DocumentInput::Local(path))
    }

    /// The local path, if this input is a file.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            DocumentInput::Local(p) => Some(p),
            DocumentInput::Remote(_) => None,
        }
    }

    /// Human-readable form for logs.
    pub fn display(&self) -> String {
        match self {
            DocumentInput::Local(p) => p.display().to_string(),
            DocumentInput::Remote(url) => url.clone(),
        }
    }

    /// Load the request body: raw bytes for a file, the URL otherwise.
    pub async fn load(&self) -> Result<DocumentSource, DocIntelError> {
        match self {
            DocumentInput::Local(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        DocIntelError::FileNotFound { path: path.clone() }
                    } else {
                        DocIntelError::ReadFailed {
                            path: path.clone(),
                            source: e,
                        }
                    }
                })?;
                debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(DocumentSource::Bytes(bytes))
            }
            DocumentInput::Remote(url) => Ok(DocumentSource::Url(url.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn neither_input_is_missing() {
        let err = DocumentInput::from_parts(None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingInput);
        let err = DocumentInput::from_parts(Some(""), Some("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingInput);
    }

    #[test]
    fn nonexistent_file_is_not_found() {
        let err = DocumentInput::from_parts(Some("/definitely/not/here.pdf"), None).unwrap_err();
        assert!(
            matches!(err, DocIntelError::FileNotFound { ref path } if path == Path::new("/definitely/not/here.pdf"))
        );
    }

    #[test]
    fn url_only_is_remote() {
        let input = DocumentInput::from_parts(None, Some("https://example.com/a.pdf")).unwrap();
        assert_eq!(input, DocumentInput::Remote("https://example.com/a.pdf".into()));
        assert_eq!(input.local_path(), None);
    }

    #[test]
    fn file_wins_over_url() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        let input = DocumentInput::from_parts(Some(path), Some("https://example.com/a.pdf")).unwrap();
        assert_eq!(input.local_path(), Some(file.path()));
    }

    #[test]
    fn directory_is_not_a_document() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocumentInput::parse(dir.path().to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }

    #[test]
    fn load_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, b"\x89PNG").unwrap();
        let input = DocumentInput::parse(path.to_str().unwrap()).unwrap();
        match tokio_test::block_on(input.load()).unwrap() {
            DocumentSource::Bytes(b) => assert_eq!(b, b"\x89PNG"),
            other => panic!("expected bytes, got {other:?}"),
        }
    }

    #[test]
    fn load_remote_is_url_source() {
        let input = DocumentInput::parse("https://example.com/doc.pdf").unwrap();
        assert_eq!(
            tokio_test::block_on(input.load()).unwrap(),
            DocumentSource::Url("https://example.com/doc.pdf".into())
        );
    }

    #[test]
    fn load_reports_file_removed_after_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.pdf");
        std::fs::write(&path, b"x").unwrap();
        let input = DocumentInput::parse(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        let err = tokio_test::block_on(input.load()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }
}
