//! Document sources: where the corpus comes from.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::document::Document;
use crate::error::{RagError, Result};

/// A readable collection of text-bearing files.
///
/// The core only needs `list()`; ordering is not guaranteed by the
/// contract, though [`DirSource`] sorts for determinism.
pub trait DocumentSource: Send + Sync {
    /// Load all documents from the source.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] when the source is absent.
    fn list(&self) -> Result<Vec<Document>>;
}

/// Extensions loaded by default: plain text and markdown.
const DEFAULT_EXTENSIONS: [&str; 3] = ["txt", "md", "markdown"];

/// A [`DocumentSource`] that reads UTF-8 text files from a directory tree.
///
/// Files are discovered recursively, filtered by extension, and sorted by
/// path so repeated loads produce the same document order. Files that
/// cannot be read as UTF-8 text are skipped with a warning rather than
/// failing the whole corpus.
///
/// # Example
///
/// ```rust,ignore
/// use askdocs_rag::DirSource;
///
/// let source = DirSource::new("docs");
/// let documents = source.list()?;
/// ```
pub struct DirSource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirSource {
    /// Create a source reading `.txt`/`.md`/`.markdown` files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Override the set of file extensions to load.
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    fn load(&self, path: &Path) -> Option<Document> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                return None;
            }
        };

        let relative =
            path.strip_prefix(&self.root).unwrap_or(path).to_string_lossy().into_owned();

        let mut metadata = HashMap::new();
        metadata.insert("file_name".to_string(), relative.clone());

        Some(Document {
            id: relative,
            text,
            metadata,
            source_uri: Some(path.display().to_string()),
        })
    }
}

impl DocumentSource for DirSource {
    fn list(&self) -> Result<Vec<Document>> {
        if !self.root.is_dir() {
            return Err(RagError::Config(format!(
                "document directory not found: {}",
                self.root.display()
            )));
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry.path().extension().is_some_and(|ext| {
                    self.extensions.iter().any(|wanted| ext.eq_ignore_ascii_case(wanted))
                })
            })
            .map(|entry| entry.into_path())
            .collect();
        paths.sort();

        let documents: Vec<Document> =
            paths.iter().filter_map(|path| self.load(path)).collect();

        info!(root = %self.root.display(), count = documents.len(), "loaded corpus");
        Ok(documents)
    }
}

/// A fixed in-memory corpus, mainly for tests and demos.
pub struct StaticSource {
    documents: Vec<Document>,
}

impl StaticSource {
    /// Create a source that always returns the given documents.
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

impl DocumentSource for StaticSource {
    fn list(&self) -> Result<Vec<Document>> {
        Ok(self.documents.clone())
    }
}
