//! Lyric documents and the tokenization contract shared by every feature.
//!
//! A document carries two parallel token views: the raw whitespace-split
//! tokens, and the normalized tokens (ASCII punctuation removed, lowercased).
//! Both views always have the same length. A token made only of punctuation
//! normalizes to the empty string and is kept, so positional alignment between
//! the two views is never lost.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::core::errors::{Result, ResultExt};

/// Unique identifier for a document (file name without extension)
pub type DocumentId = String;

/// The ASCII punctuation set, in the conventional `!` to `~` order.
pub const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Split raw text into whitespace-delimited tokens. Never yields empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

/// Strip every ASCII punctuation character from a token, then lowercase it.
pub fn normalize_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .to_lowercase()
}

/// Normalize every raw token, preserving length and order.
pub fn normalize_tokens(raw: &[String]) -> Vec<String> {
    raw.iter().map(|token| normalize_token(token)).collect()
}

/// One lyric file prepared for feature extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Identity derived from the file name, extension stripped
    pub id: DocumentId,

    /// Absolute path handed to external tools
    pub path: PathBuf,

    /// Raw file contents
    pub text: String,

    /// Whitespace-split tokens
    pub raw_tokens: Vec<String>,

    /// Punctuation-stripped, lowercased tokens (same length as `raw_tokens`)
    pub normalized_tokens: Vec<String>,
}

impl Document {
    /// Build a document from in-memory text.
    pub fn from_text(
        id: impl Into<DocumentId>,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let raw_tokens = tokenize(&text);
        let normalized_tokens = normalize_tokens(&raw_tokens);

        Self {
            id: id.into(),
            path: path.into(),
            text,
            raw_tokens,
            normalized_tokens,
        }
    }

    /// Read a document from disk, falling back to lossy UTF-8 decoding.
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read document {}", path.display()))?;

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    "Document contained invalid UTF-8, converted with lossy encoding: {}",
                    path.display()
                );
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };

        let absolute = std::path::absolute(path)
            .with_context(|| format!("Failed to resolve path {}", path.display()))?;

        Ok(Self::from_text(document_id(path), absolute, text))
    }

    /// Number of raw tokens
    pub fn token_count(&self) -> usize {
        self.raw_tokens.len()
    }

    /// True when the document has no tokens at all
    pub fn is_empty(&self) -> bool {
        self.raw_tokens.is_empty()
    }
}

/// Derive the data set identifier for a path: its file name minus the last extension.
pub fn document_id(path: &Path) -> DocumentId {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_set() {
        assert_eq!(PUNCTUATION.chars().count(), 32);
        assert!(PUNCTUATION.chars().all(|c| c.is_ascii_punctuation()));
    }

    #[test]
    fn test_tokenize_and_normalize() {
        let doc = Document::from_text("song", "/tmp/song.txt", "The cat and the dog.");

        assert_eq!(doc.raw_tokens, vec!["The", "cat", "and", "the", "dog."]);
        assert_eq!(doc.normalized_tokens, vec!["the", "cat", "and", "the", "dog"]);
        assert_eq!(doc.token_count(), 5);
    }

    #[test]
    fn test_punctuation_only_token_becomes_empty() {
        let doc = Document::from_text("song", "/tmp/song.txt", "oh -- yeah");

        assert_eq!(doc.raw_tokens.len(), 3);
        assert_eq!(doc.normalized_tokens, vec!["oh", "", "yeah"]);
    }

    #[test]
    fn test_whitespace_only_text_is_empty() {
        let doc = Document::from_text("blank", "/tmp/blank.txt", " \n\t \r\n");
        assert!(doc.is_empty());
        assert!(doc.normalized_tokens.is_empty());
    }

    #[test]
    fn test_normalize_token_keeps_non_ascii_letters() {
        assert_eq!(normalize_token("Café!"), "café");
        assert_eq!(normalize_token("don't"), "dont");
    }

    #[test]
    fn test_document_id_strips_last_extension() {
        assert_eq!(document_id(Path::new("/lyrics/track01.txt")), "track01");
        assert_eq!(document_id(Path::new("/lyrics/a.b.txt")), "a.b");
        assert_eq!(document_id(Path::new("/lyrics/noext")), "noext");
    }

    #[tokio::test]
    async fn test_load_lossy_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.txt");
        std::fs::write(&path, b"hello \xff world").unwrap();

        let doc = Document::load(&path).await.unwrap();
        assert_eq!(doc.id, "broken");
        assert_eq!(doc.raw_tokens.len(), 3);
        assert!(doc.path.is_absolute());
    }

    #[tokio::test]
    async fn test_load_missing_file_names_the_document() {
        let err = Document::load(Path::new("/definitely/not/here.txt"))
            .await
            .unwrap_err();

        match err {
            crate::core::errors::LyricalError::Io { message, .. } => {
                assert!(message.starts_with("Failed to read document /definitely/not/here.txt: "));
            }
            other => panic!("Expected Io error, got {other}"),
        }
    }
}
